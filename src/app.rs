use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};

use chrono::{Duration, NaiveDate};

use crate::io::{self, demo, ViewSettings};
use crate::layout::{DragMode, StyleConfig, TaskChange, ViewWindow};
use crate::model::{Task, ViewMode, ViewState};
use crate::timeline::{Timeline, TimelineConfig};
use crate::ui;

/// Main application state. Owns the task list; the timeline only proposes
/// changes.
pub struct TimelineApp {
    pub timeline: Timeline,
    changes: Receiver<(Task, TaskChange)>,

    pub file_path: Option<PathBuf>,
    pub demo_seed: u64,
    /// Date picker buffer, copied into the view anchor when it changes.
    pub anchor_pick: NaiveDate,

    pub status_message: String,

    settings_path: PathBuf,
    saved_settings: ViewSettings,
}

impl TimelineApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let today = chrono::Local::now().date_naive();
        let dataset = demo::demo_dataset(today);
        let config = TimelineConfig {
            resources: dataset.resources,
            tasks: dataset.tasks,
            ..Default::default()
        };
        let mut app = match Timeline::new(config) {
            Ok(timeline) => Self::with_timeline(timeline),
            Err(e) => {
                tracing::error!("falling back to an empty timeline: {}", e);
                Self::with_timeline(Self::empty_timeline())
            }
        };

        app.settings_path = io::settings_path();
        app.saved_settings = io::load_settings(&app.settings_path);
        if let Err(e) = app.saved_settings.apply(&mut app.timeline) {
            app.status_message = format!("Some saved view settings were ignored: {}", e);
        }
        app.anchor_pick = app.timeline.view().anchor;
        app
    }

    fn empty_timeline() -> Timeline {
        let view = ViewState::for_mode(ViewMode::Month, chrono::Local::now().date_naive());
        let mut timeline = Timeline::with_view(view, ui::theme::TASK_COLORS.to_vec(), StyleConfig::default());
        timeline.set_data(Vec::new(), &[]);
        timeline
    }

    fn with_timeline(mut timeline: Timeline) -> Self {
        let (tx, rx) = mpsc::channel();
        timeline.on_tasks_change(move |task, change| {
            let _ = tx.send((task.clone(), change.clone()));
        });
        let anchor_pick = timeline.view().anchor;
        let task_count = timeline.tasks().len();
        Self {
            timeline,
            changes: rx,
            file_path: None,
            demo_seed: demo::DEMO_SEED,
            anchor_pick,
            status_message: format!("Demo data: {} tasks", task_count),
            settings_path: PathBuf::new(),
            saved_settings: ViewSettings::default(),
        }
    }

    // ── Data ────────────────────────────────────────────────────

    pub fn open_dataset(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Timeline dataset", &["json"])
            .pick_file()
        else {
            return;
        };
        match io::load_dataset(&path) {
            Ok(dataset) => {
                let skipped = dataset.skipped + self.timeline.set_data(dataset.resources, &dataset.tasks);
                self.status_message = format!(
                    "Opened {} ({} tasks, {} skipped)",
                    path.display(),
                    self.timeline.tasks().len(),
                    skipped
                );
                self.file_path = Some(path);
            }
            Err(e) => {
                tracing::error!("failed to open {}: {}", path.display(), e);
                self.status_message = format!("Error opening file: {}", e);
            }
        }
    }

    pub fn save_dataset_as(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Timeline dataset", &["json"])
            .set_file_name("timeline.json")
            .save_file()
        else {
            return;
        };
        match io::save_dataset(self.timeline.resources(), self.timeline.tasks(), &path) {
            Ok(()) => {
                self.status_message = format!("Saved to {}", path.display());
                self.file_path = Some(path);
            }
            Err(e) => {
                tracing::error!("failed to save {}: {}", path.display(), e);
                self.status_message = format!("Error saving: {}", e);
            }
        }
    }

    pub fn regenerate_demo(&mut self) {
        self.demo_seed = self.demo_seed.wrapping_add(1);
        let dataset = demo::generate(
            self.demo_seed,
            self.timeline.view().anchor,
            demo::DEMO_RESOURCES,
            demo::DEMO_TASKS_PER_RESOURCE,
        );
        self.timeline.set_data(dataset.resources, &dataset.tasks);
        self.file_path = None;
        self.status_message = format!("Demo data regenerated (seed {})", self.demo_seed);
    }

    pub fn load_edge_cases(&mut self) {
        let dataset = demo::edge_case_dataset(self.timeline.view().anchor);
        self.timeline.set_data(dataset.resources, &dataset.tasks);
        self.file_path = None;
        self.status_message = "Loaded month edge cases".into();
    }

    /// Apply every change the timeline reported since the last frame.
    fn apply_pending_changes(&mut self) {
        let Some(window) = self.timeline.current_frame().map(|f| f.window) else {
            return;
        };
        let mut tasks = self.timeline.tasks().to_vec();
        let mut applied = 0;
        while let Ok((original, change)) = self.changes.try_recv() {
            if change.is_noop() {
                continue;
            }
            if let Some(task) = tasks.iter_mut().find(|t| t.id == original.id) {
                *task = apply_change(&original, &change, &window);
                self.status_message = format!(
                    "'{}' {} {} → {}",
                    task.title,
                    match change.mode {
                        DragMode::Move => "moved",
                        DragMode::ResizeLeft | DragMode::ResizeRight => "resized",
                    },
                    task.start.format("%d/%m %H:%M"),
                    task.end.format("%d/%m %H:%M"),
                );
                applied += 1;
            }
        }
        if applied > 0 {
            tracing::info!("applied {} task change(s)", applied);
            self.timeline.set_tasks(tasks);
        }
    }

    // ── View ────────────────────────────────────────────────────

    fn persist_settings(&mut self) {
        let current = ViewSettings::from(self.timeline.view());
        if current == self.saved_settings {
            return;
        }
        if let Err(e) = io::save_settings(&current, &self.settings_path) {
            tracing::warn!("could not save view settings: {}", e);
        }
        self.saved_settings = current;
    }
}

/// Apply a finished gesture to the task it came from.
///
/// A moved task keeps its duration and shifts by the drag delta. A resized
/// edge lands where the bar edge was dropped when that edge is inside the
/// window; an edge the window clipped moves by the delta instead, so the
/// hidden part keeps its length.
pub fn apply_change(task: &Task, change: &TaskChange, window: &ViewWindow) -> Task {
    let shift = |units: f64| Duration::milliseconds((units * window.unit_ms()).round() as i64);
    let (start, end) = match change.mode {
        DragMode::Move => {
            let delta = shift(change.start_delta());
            (task.start + delta, task.end + delta)
        }
        DragMode::ResizeLeft => {
            let start = if task.start >= window.start {
                window.instant_at(change.start_unit)
            } else {
                task.start + shift(change.start_delta())
            };
            (start, task.end)
        }
        DragMode::ResizeRight => {
            let end = if task.end <= window.end {
                window.instant_at(change.end_unit())
            } else {
                task.end + shift(change.end_delta())
            };
            (task.start, end)
        }
    };
    Task {
        start,
        end: end.max(start),
        ..task.clone()
    }
}

impl eframe::App for TimelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_STATUS)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(ui::theme::font_status())
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "Resources: {}  Tasks: {}",
                                self.timeline.resources().len(),
                                self.timeline.tasks().len()
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(ui::theme::BG_DARK))
            .show(ctx, |ui| {
                let interaction = ui::timeline_chart::show_timeline(&mut self.timeline, ui);
                if interaction.cancelled {
                    self.status_message = "Drag cancelled".into();
                }
            });

        self.apply_pending_changes();
        self.persist_settings();
    }
}
