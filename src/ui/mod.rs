pub mod resource_panel;
pub mod theme;
pub mod timeline_chart;
pub mod toolbar;
