//! Geometry and layout engine: projection, scale, lanes, hit-testing, drag,
//! ruler and scroll synchronization. Nothing in here paints.

pub mod drag;
pub mod frame;
pub mod hit_test;
pub mod lanes;
pub mod projection;
pub mod ruler;
pub mod scale;
pub mod scroll;
pub mod style;

pub use drag::{DragAnchor, DragContext, DragController, DragMode, DragPreview, TaskChange, TooltipOverlay};
pub use frame::{derive_frame, derive_lanes, derive_scale, derive_segments, BarLayout, FrameLayout, RowLayout};
pub use hit_test::{BarHit, GeometryIndex};
pub use lanes::{assign_lanes, LaneAssignment, PlacedTask, ProjectedTask};
pub use projection::{project, Segment, ViewWindow};
pub use ruler::{build_ruler, period_bands, Band, Gridline, LabelAlign, Ruler, RulerLabel, TickKind};
pub use scale::{compute_scale, Scale};
pub use scroll::ScrollSync;
pub use style::StyleConfig;
