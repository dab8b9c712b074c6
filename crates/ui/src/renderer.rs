use crema_protocol::{PathData, PathSegment, RenderCommand, TextAlign};
use egui::epaint::CubicBezierShape;
use egui::{Align2, Color32, CornerRadius, FontId, Pos2, Rect, Stroke};

use crate::theme::{self, ThemeMode};

/// Render a list of `RenderCommand` into an egui `Painter`.
///
/// `offset` is the top-left pixel position of the chart area; commands are
/// already laid out at the painter's size.
pub fn render_commands(
    painter: &egui::Painter,
    commands: &[RenderCommand],
    offset: Pos2,
    mode: ThemeMode,
) {
    let to_screen = |x: f64, y: f64| Pos2::new(x as f32 + offset.x, y as f32 + offset.y);

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect { rect, color, .. } => {
                let min = to_screen(rect.x, rect.y);
                let egui_rect = Rect::from_min_size(min, egui::vec2(rect.w as f32, rect.h as f32));
                if !painter.clip_rect().intersects(egui_rect) {
                    continue;
                }
                painter.rect_filled(egui_rect, CornerRadius::ZERO, theme::resolve(*color, mode));
            }

            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
            } => {
                let anchor = match align {
                    TextAlign::Left => Align2::LEFT_CENTER,
                    TextAlign::Center => Align2::CENTER_CENTER,
                    TextAlign::Right => Align2::RIGHT_CENTER,
                };
                painter.text(
                    to_screen(position.x, position.y),
                    anchor,
                    text,
                    FontId::proportional(*font_size as f32),
                    theme::resolve(*color, mode),
                );
            }

            RenderCommand::DrawPath { path, color, width } => {
                let stroke = Stroke::new(*width as f32, theme::resolve(*color, mode));
                paint_path(painter, path, stroke, &to_screen);
            }

            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
        }
    }
}

fn paint_path(
    painter: &egui::Painter,
    path: &PathData,
    stroke: Stroke,
    to_screen: &impl Fn(f64, f64) -> Pos2,
) {
    let mut cursor: Option<Pos2> = None;
    for seg in path.segments() {
        let end = seg.end();
        let end = to_screen(end.x, end.y);
        match (*seg, cursor) {
            (PathSegment::LineTo(_), Some(from)) => {
                painter.line_segment([from, end], stroke);
            }
            (PathSegment::CubicTo { ctrl1, ctrl2, .. }, Some(from)) => {
                painter.add(CubicBezierShape::from_points_stroke(
                    [
                        from,
                        to_screen(ctrl1.x, ctrl1.y),
                        to_screen(ctrl2.x, ctrl2.y),
                        end,
                    ],
                    false,
                    Color32::TRANSPARENT,
                    stroke,
                ));
            }
            _ => {}
        }
        cursor = Some(end);
    }
}
