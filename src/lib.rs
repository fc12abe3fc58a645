//! Interactive resource timeline: projects time-bounded tasks onto hour, week
//! and month views, packs overlapping tasks into lanes and turns pointer
//! drags into snapped change records for the task owner.

pub mod app;
pub mod error;
pub mod io;
pub mod layout;
pub mod model;
pub mod timeline;
pub mod ui;

pub use error::{Result, TimelineError};
pub use timeline::{Timeline, TimelineConfig};
