use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,

    // Chart
    GridLine,
    AxisLabel,
    HighlightFill,
    FlowTrace,
    PressureTrace,
    TemperatureTrace,

    // Frame editor blocks
    TempBlock,
    DurationBlock,
    FlowBlock,
    PressureBlock,
    TriggerBlock,
    TriggerNoneBlock,

    TextPrimary,
    TextMuted,
    BlockText,
}

impl ThemeToken {
    /// Translucent fills, drawn over the chart rather than replacing it.
    pub fn alpha(self) -> f64 {
        match self {
            ThemeToken::HighlightFill => 0.25,
            _ => 1.0,
        }
    }
}
