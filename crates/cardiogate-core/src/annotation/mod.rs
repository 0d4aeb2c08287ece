pub mod machine;
pub mod markers;

pub use machine::{AnnotationState, InteractionMode, PointerButton, PointerEvent, SelectionState};
pub use markers::{BoundaryMarker, LineStyle, MarkerColor};
