//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use crema_protocol::{RenderCommand, TextAlign, ThemeToken};

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions.
/// `dark` selects the color palette.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64, dark: bool) -> String {
    let mut svg = String::with_capacity(commands.len() * 160);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif">"#,
    ));

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect, color, label, ..
            } => {
                let fill = resolve_color(*color, dark);
                svg.push_str(&format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}""#,
                    rect.x, rect.y, rect.w, rect.h,
                ));
                let alpha = color.alpha();
                if alpha < 1.0 {
                    svg.push_str(&format!(r#" fill-opacity="{alpha}""#));
                }
                svg.push('>');
                if let Some(label) = label {
                    svg.push_str(&format!("<title>{}</title>", escape_xml(label)));
                }
                svg.push_str("</rect>");
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
            } => {
                let fill = resolve_color(*color, dark);
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                svg.push_str(&format!(
                    r#"<text x="{}" y="{}" fill="{fill}" font-size="{font_size}" text-anchor="{anchor}" dominant-baseline="central">{}</text>"#,
                    position.x,
                    position.y,
                    escape_xml(text),
                ));
            }
            RenderCommand::DrawPath { path, color, width } => {
                let stroke = resolve_color(*color, dark);
                svg.push_str(&format!(
                    r#"<path d="{}" stroke="{stroke}" stroke-width="{width}" stroke-linecap="round" fill="none"/>"#,
                    path.to_svg(),
                ));
            }
            RenderCommand::BeginGroup { id, label } => {
                svg.push_str(&format!(r#"<g id="{}">"#, escape_xml(id)));
                if let Some(label) = label {
                    svg.push_str(&format!("<title>{}</title>", escape_xml(label)));
                }
            }
            RenderCommand::EndGroup => svg.push_str("</g>"),
        }
    }

    svg.push_str("</svg>");
    svg
}

fn resolve_color(token: ThemeToken, dark: bool) -> &'static str {
    if dark {
        match token {
            ThemeToken::Background => "#181818",
            ThemeToken::GridLine => "#303030",
            ThemeToken::AxisLabel | ThemeToken::TextMuted => "#777777",
            ThemeToken::HighlightFill => "#dcdcdc",
            ThemeToken::FlowTrace | ThemeToken::FlowBlock => "#5b8fb9",
            ThemeToken::PressureTrace | ThemeToken::PressureBlock => "#4cc9b0",
            ThemeToken::TemperatureTrace | ThemeToken::TempBlock => "#ff8a3d",
            ThemeToken::DurationBlock | ThemeToken::TriggerNoneBlock => "#444444",
            ThemeToken::TriggerBlock => "#c0392b",
            ThemeToken::TextPrimary | ThemeToken::BlockText => "#ececec",
        }
    } else {
        match token {
            ThemeToken::Background | ThemeToken::BlockText => "#ffffff",
            ThemeToken::GridLine => "#eeeeee",
            ThemeToken::AxisLabel => "#aaaaaa",
            ThemeToken::HighlightFill => "#dcdcdc",
            ThemeToken::FlowTrace | ThemeToken::FlowBlock => "#33658a",
            ThemeToken::PressureTrace | ThemeToken::PressureBlock => "#2a9d8f",
            ThemeToken::TemperatureTrace | ThemeToken::TempBlock => "#f26419",
            ThemeToken::DurationBlock | ThemeToken::TriggerNoneBlock => "#333333",
            ThemeToken::TriggerBlock => "#9e2a2b",
            ThemeToken::TextPrimary => "#1a1a2e",
            ThemeToken::TextMuted => "#666677",
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Profile;
    use crate::views::{ChartConfig, ProfileChart};

    #[test]
    fn chart_renders_to_svg() {
        let mut chart = ProfileChart::new(Profile::default(), ChartConfig::default());
        chart.set_highlight(Some(0));
        let svg = render_svg(&chart.render(), 800.0, 400.0, false);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"viewBox="0 0 800 400""#));
        assert!(svg.contains("#33658a"));
        assert!(svg.contains("#f26419"));
        assert!(svg.contains(r#"fill-opacity="0.25""#));
        assert!(svg.contains(r#"<g id="frame-0"><title>Infuse</title>"#));
        assert!(svg.contains(r#"d="M0 0 L0 384 M400 0 L400 384 M24 400 L800 400 "#));
    }

    #[test]
    fn dark_palette() {
        let chart = ProfileChart::new(Profile::default(), ChartConfig::default());
        let svg = render_svg(&chart.render(), 800.0, 400.0, true);
        assert!(svg.contains("#181818"));
        assert!(svg.contains("#5b8fb9"));
    }

    #[test]
    fn escapes_xml_entities() {
        let commands = vec![RenderCommand::BeginGroup {
            id: "frame-0".into(),
            label: Some("Bloom <fast> & \"hot\"".into()),
        }];
        let svg = render_svg(&commands, 400.0, 100.0, false);
        assert!(svg.contains("Bloom &lt;fast&gt; &amp; &quot;hot&quot;"));
    }
}
