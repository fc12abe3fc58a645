pub mod demo;
pub mod file;
pub mod settings;

pub use file::{load_dataset, parse_dataset, save_dataset, Dataset};
pub use settings::{load_settings, save_settings, settings_path, ViewSettings};
