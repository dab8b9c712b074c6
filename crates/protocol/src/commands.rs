use serde::{Deserialize, Serialize};

use crate::path::PathData;
use crate::theme::ThemeToken;
use crate::types::{Point, Rect};

/// A single, stateless render instruction.
///
/// The chart emits a `Vec<RenderCommand>` per render. Renderers consume
/// this list sequentially; each command carries all the data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Draw a filled rectangle. `frame_index` identifies the profile frame
    /// the rectangle belongs to, for hit-testing / selection.
    DrawRect {
        rect: Rect,
        color: ThemeToken,
        label: Option<String>,
        frame_index: Option<usize>,
    },

    /// Draw a text string anchored at a position.
    DrawText {
        position: Point,
        text: String,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
    },

    /// Stroke an open path with round caps. Paths are never filled.
    DrawPath {
        path: PathData,
        color: ThemeToken,
        width: f64,
    },

    /// Begin a logical group (grid, highlight, one frame's tracks).
    /// Renderers may use this for layering or accessibility.
    BeginGroup { id: String, label: Option<String> },

    /// End the current group.
    EndGroup,
}

/// Horizontal anchoring of a `DrawText` position. Text is always centred
/// vertically on the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_serialize_as_tagged_variants() {
        let cmd = RenderCommand::DrawText {
            position: Point::new(14.0, 338.5),
            text: "2".into(),
            color: ThemeToken::AxisLabel,
            font_size: 10.0,
            align: TextAlign::Center,
        };
        let json = serde_json::to_value(&cmd).expect("command serializes");
        assert_eq!(json["DrawText"]["text"], "2");
        assert_eq!(json["DrawText"]["align"], "Center");
    }
}
