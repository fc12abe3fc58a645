pub mod resource;
pub mod task;
pub mod view;

pub use resource::Resource;
pub use task::{RawTask, RawTimestamp, Task};
pub use view::{LaneOffset, Preset, SnapOption, ViewMode, ViewState};
