use crema_protocol::ThemeToken;
use egui::Color32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn visuals(self) -> egui::Visuals {
        match self {
            ThemeMode::Dark => egui::Visuals::dark(),
            ThemeMode::Light => egui::Visuals::light(),
        }
    }
}

/// Resolve a token, applying its alpha.
pub fn resolve(token: ThemeToken, mode: ThemeMode) -> Color32 {
    let [r, g, b] = match mode {
        ThemeMode::Dark => resolve_dark(token),
        ThemeMode::Light => resolve_light(token),
    };
    let a = (token.alpha() * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

fn resolve_dark(token: ThemeToken) -> [u8; 3] {
    use ThemeToken::*;
    match token {
        Background => [0x18, 0x18, 0x18],
        GridLine => [0x30, 0x30, 0x30],
        AxisLabel | TextMuted => [0x77, 0x77, 0x77],
        HighlightFill => [0xdc, 0xdc, 0xdc],
        FlowTrace | FlowBlock => [0x5b, 0x8f, 0xb9],
        PressureTrace | PressureBlock => [0x4c, 0xc9, 0xb0],
        TemperatureTrace | TempBlock => [0xff, 0x8a, 0x3d],
        DurationBlock | TriggerNoneBlock => [0x44, 0x44, 0x44],
        TriggerBlock => [0xc0, 0x39, 0x2b],
        TextPrimary | BlockText => [0xec, 0xec, 0xec],
    }
}

fn resolve_light(token: ThemeToken) -> [u8; 3] {
    use ThemeToken::*;
    match token {
        Background | BlockText => [0xff, 0xff, 0xff],
        GridLine => [0xee, 0xee, 0xee],
        AxisLabel => [0xaa, 0xaa, 0xaa],
        HighlightFill => [0xdc, 0xdc, 0xdc],
        FlowTrace | FlowBlock => [0x33, 0x65, 0x8a],
        PressureTrace | PressureBlock => [0x2a, 0x9d, 0x8f],
        TemperatureTrace | TempBlock => [0xf2, 0x64, 0x19],
        DurationBlock | TriggerNoneBlock => [0x33, 0x33, 0x33],
        TriggerBlock => [0x9e, 0x2a, 0x2b],
        TextPrimary => [0x1a, 0x1a, 0x2e],
        TextMuted => [0x66, 0x66, 0x77],
    }
}
