use egui::{RichText, Ui};
use egui_phosphor::regular as icon;

use crate::app::TimelineApp;
use crate::model::view::MAX_LANES_LIMIT;
use crate::model::{LaneOffset, ViewMode};

/// Render the top toolbar: view controls on the left, data actions on the right.
pub fn show_toolbar(app: &mut TimelineApp, ui: &mut Ui) {
    ui.horizontal(|ui| {
        ui.add_space(4.0);
        view_controls(app, ui);

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .button(format!("{} Edge cases", icon::WARNING))
                .on_hover_text("Month-boundary test data")
                .clicked()
            {
                app.load_edge_cases();
            }
            if ui.button(format!("{} Regenerate demo", icon::SHUFFLE)).clicked() {
                app.regenerate_demo();
            }
            if ui.button(format!("{} Save", icon::FLOPPY_DISK)).clicked() {
                app.save_dataset_as();
            }
            if ui.button(format!("{} Open", icon::FOLDER_OPEN)).clicked() {
                app.open_dataset();
            }
        });
    });
}

fn view_controls(app: &mut TimelineApp, ui: &mut Ui) {
    let view = app.timeline.view().clone();

    for mode in ViewMode::ALL {
        if ui.selectable_label(view.mode == mode, mode.label()).clicked() {
            app.timeline.set_mode(mode);
        }
    }
    ui.separator();

    egui::ComboBox::from_id_salt("preset_combo")
        .selected_text(view.preset.label())
        .show_ui(ui, |ui| {
            for &preset in view.mode.presets() {
                if ui.selectable_label(view.preset == preset, preset.label()).clicked() {
                    if let Err(e) = app.timeline.set_preset(preset) {
                        app.status_message = e.to_string();
                    }
                }
            }
        });

    if ui.button(icon::CARET_LEFT).on_hover_text("Previous").clicked() {
        app.timeline.step_anchor(-1);
    }
    if ui.button("Today").clicked() {
        app.timeline.set_anchor(chrono::Local::now().date_naive());
    }
    if ui.button(icon::CARET_RIGHT).on_hover_text("Next").clicked() {
        app.timeline.step_anchor(1);
    }

    // Keep the picker in step with prev/next before drawing it.
    if app.anchor_pick != app.timeline.view().anchor {
        app.anchor_pick = app.timeline.view().anchor;
    }
    let picked = ui
        .add(egui_extras::DatePickerButton::new(&mut app.anchor_pick))
        .changed();
    if picked {
        app.timeline.set_anchor(app.anchor_pick);
    }
    ui.separator();

    ui.label(RichText::new("Snap").small().weak());
    egui::ComboBox::from_id_salt("snap_combo")
        .selected_text(app.timeline.view().snap_label())
        .show_ui(ui, |ui| {
            let current = app.timeline.view().snap_unit;
            for option in app.timeline.view().preset.snap_options() {
                let selected = (option.units - current).abs() < 1e-9;
                if ui.selectable_label(selected, option.label).clicked() {
                    app.timeline.set_snap_unit(option.units);
                }
            }
        });

    ui.label(RichText::new("Gap").small().weak());
    egui::ComboBox::from_id_salt("lane_offset_combo")
        .selected_text(format!("{} px", view.lane_offset.px()))
        .show_ui(ui, |ui| {
            for offset in LaneOffset::ALL {
                if ui
                    .selectable_label(view.lane_offset == offset, format!("{} px", offset.px()))
                    .clicked()
                {
                    app.timeline.set_lane_offset(offset);
                }
            }
        });

    ui.label(RichText::new("Lanes").small().weak());
    let mut max_lanes = view.max_lanes;
    if ui
        .add(egui::DragValue::new(&mut max_lanes).range(1..=MAX_LANES_LIMIT))
        .changed()
    {
        if let Err(e) = app.timeline.set_max_lanes(max_lanes) {
            app.status_message = e.to_string();
        }
    }
}
