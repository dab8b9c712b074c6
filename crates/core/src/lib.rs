//! Core of the crema espresso profile editor: the profile model, the
//! partial-update merge, chart geometry, and the editor state that ties
//! them together. Renderers consume the `RenderCommand` lists produced
//! here.

pub mod editor;
pub mod model;
pub mod svg;
pub mod views;

pub use editor::{EditError, EditorCommand, ProfileEditor};
