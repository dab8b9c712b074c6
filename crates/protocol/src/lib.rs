pub mod commands;
pub mod path;
pub mod theme;
pub mod types;

pub use commands::{RenderCommand, TextAlign};
pub use path::{PathData, PathSegment};
pub use theme::ThemeToken;
pub use types::{Point, Rect};
