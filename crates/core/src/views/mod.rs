pub mod chart;
pub mod editable_text;
pub mod frame_editor;

pub use chart::{ChartConfig, ChartScales, ProfileChart};
pub use editable_text::EditableText;
pub use frame_editor::{Control, ControlKind, FrameAction, FrameEditor, TriggerVisibility};
