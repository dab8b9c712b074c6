//! Profile chart: projects a profile's frames onto a `width × height`
//! canvas as a grid, an optional highlight, and per-frame target and
//! temperature tracks.

use crema_protocol::{PathData, Point, Rect, RenderCommand, TextAlign, ThemeToken};
use serde::{Deserialize, Serialize};

use crate::model::{MAX_TEMP, MIN_TEMP, Measure, Profile};

/// Vertical unit ceiling shared by flow (ml/s) and pressure (bar).
pub const MAX_Y: f64 = 13.0;
/// Seconds between vertical grid lines.
pub const X_GRID: f64 = 5.0;
/// Units between horizontal grid lines.
pub const Y_GRID: f64 = 2.0;

const Y_GRID_LIMIT: f64 = 15.0;
const X_AXIS_INSET: f64 = 16.0;
const X_LABEL_INSET: f64 = 8.0;
const Y_AXIS_X: f64 = 24.0;
const Y_LABEL_X: f64 = 14.0;
/// 8pt in CSS pixels.
const FONT_SIZE: f64 = 8.0 * 4.0 / 3.0;
/// Closest two vertical grid lines may be, in pixels.
const MIN_GRID_SPACING: f64 = 24.0;
const TRACK_WIDTH: f64 = 4.0;
const GRID_WIDTH: f64 = 1.0;
/// Upper bound on the S-curve control distance, in seconds.
const CURVE_SECONDS: f64 = 1.5;

/// Canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
        }
    }
}

/// Pixel scale factors derived from a profile and the canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartScales {
    /// Pixels per second. Zero when the profile has no duration.
    pub x_scale: f64,
    /// Pixels per flow/pressure unit.
    pub y_scale: f64,
    /// Pixels per °C above `MIN_TEMP`.
    pub temp_scale: f64,
    pub total_duration: f64,
    pub frame_count: usize,
}

impl ChartScales {
    pub fn compute(profile: &Profile, width: f64, height: f64) -> Self {
        let total_duration = profile.total_duration();
        let x_scale = if total_duration > 0.0 {
            width / total_duration
        } else {
            0.0
        };
        Self {
            x_scale,
            y_scale: height / MAX_Y,
            temp_scale: height / (MAX_TEMP - MIN_TEMP),
            total_duration,
            frame_count: profile.frames.len(),
        }
    }

    /// Nothing to draw along the time axis.
    pub fn is_degenerate(&self) -> bool {
        self.x_scale <= 0.0 || !self.x_scale.is_finite()
    }
}

/// Chart state. Every setter recomputes the scales immediately; reads
/// never trigger recomputation.
#[derive(Debug, Clone)]
pub struct ProfileChart {
    profile: Profile,
    width: f64,
    height: f64,
    highlight: Option<usize>,
    scales: ChartScales,
}

impl ProfileChart {
    pub fn new(profile: Profile, config: ChartConfig) -> Self {
        let scales = ChartScales::compute(&profile, config.width, config.height);
        Self {
            profile,
            width: config.width,
            height: config.height,
            highlight: None,
            scales,
        }
    }

    pub fn set_profile(&mut self, profile: Profile) -> ChartScales {
        self.profile = profile;
        self.recompute()
    }

    pub fn set_width(&mut self, width: f64) -> ChartScales {
        self.width = width;
        self.recompute()
    }

    pub fn set_height(&mut self, height: f64) -> ChartScales {
        self.height = height;
        self.recompute()
    }

    pub fn set_size(&mut self, width: f64, height: f64) -> ChartScales {
        self.width = width;
        self.height = height;
        self.recompute()
    }

    /// Select the frame to shade. Indices outside the profile are kept but
    /// render as no highlight.
    pub fn set_highlight(&mut self, index: Option<usize>) {
        self.highlight = index;
    }

    fn recompute(&mut self) -> ChartScales {
        self.scales = ChartScales::compute(&self.profile, self.width, self.height);
        self.scales
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn scales(&self) -> ChartScales {
        self.scales
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// The highlighted frame, if it exists in the current profile.
    pub fn highlight(&self) -> Option<usize> {
        self.highlight.filter(|&i| i < self.scales.frame_count)
    }

    /// Pixel span of the highlighted frame over the full chart height.
    pub fn highlight_rect(&self) -> Option<Rect> {
        if self.scales.is_degenerate() {
            return None;
        }
        let index = self.highlight()?;
        let start = self.profile.frame_start(index)?;
        let duration = self.profile.frames[index].duration;
        Some(Rect::new(
            start * self.scales.x_scale,
            0.0,
            duration * self.scales.x_scale,
            self.height,
        ))
    }

    /// Index of the frame under pixel column `x`.
    pub fn frame_at(&self, x: f64) -> Option<usize> {
        if self.scales.is_degenerate() || x < 0.0 {
            return None;
        }
        let mut right = 0.0;
        for (i, frame) in self.profile.frames.iter().enumerate() {
            right += frame.duration * self.scales.x_scale;
            if x < right {
                return Some(i);
            }
        }
        None
    }

    /// Render the chart: background, grid, highlight, then each frame's
    /// target and temperature tracks from left to right.
    pub fn render(&self) -> Vec<RenderCommand> {
        let mut commands = Vec::with_capacity(self.profile.frames.len() * 4 + 24);

        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(0.0, 0.0, self.width, self.height),
            color: ThemeToken::Background,
            label: None,
            frame_index: None,
        });
        self.render_grid(&mut commands);

        if let Some(rect) = self.highlight_rect() {
            commands.push(RenderCommand::DrawRect {
                rect,
                color: ThemeToken::HighlightFill,
                label: None,
                frame_index: self.highlight(),
            });
        }

        if !self.scales.is_degenerate() {
            self.render_frames(&mut commands);
        }
        commands
    }

    fn render_grid(&self, commands: &mut Vec<RenderCommand>) {
        let ChartScales {
            x_scale,
            y_scale,
            total_duration,
            ..
        } = self.scales;
        let mut grid = PathData::new();
        let mut labels = Vec::new();

        if !self.scales.is_degenerate() {
            let step = time_grid_step(x_scale);
            let lines = (total_duration / step).ceil();
            if lines.is_finite() {
                for i in 0..lines as usize {
                    let t = i as f64 * step;
                    let x = t * x_scale;
                    grid = grid.move_to(x, 0.0).line_to(x, self.height - X_AXIS_INSET);
                    if i > 0 {
                        labels.push(axis_label(x, self.height - X_LABEL_INSET, t));
                    }
                }
            }
        }

        let mut v = 0.0;
        while v < Y_GRID_LIMIT {
            let y = self.height - v * y_scale;
            grid = grid.move_to(Y_AXIS_X, y).line_to(self.width, y);
            if v > 0.0 {
                labels.push(axis_label(Y_LABEL_X, y, v));
            }
            v += Y_GRID;
        }

        commands.push(RenderCommand::BeginGroup {
            id: "grid".into(),
            label: None,
        });
        commands.push(RenderCommand::DrawPath {
            path: grid,
            color: ThemeToken::GridLine,
            width: GRID_WIDTH,
        });
        commands.extend(labels);
        commands.push(RenderCommand::EndGroup);
    }

    fn render_frames(&self, commands: &mut Vec<RenderCommand>) {
        let ChartScales {
            x_scale,
            y_scale,
            temp_scale,
            ..
        } = self.scales;
        let mut x = 0.0;
        // (target kind, target y, temperature y) of the previous frame
        let mut prev: Option<(Measure, f64, f64)> = None;

        for (i, frame) in self.profile.frames.iter().enumerate() {
            let w = frame.duration * x_scale;
            let y = self.height - frame.target.value * y_scale;
            let temp_y = self.height - (frame.temp - MIN_TEMP) * temp_scale;

            // A change of target kind is drawn as a jump, never a curve.
            let target = match prev {
                Some((kind, prev_y, _)) if kind == frame.target.kind => {
                    curve_path(x, prev_y, x + w, y, frame.target.interpolate, x_scale)
                }
                _ => line_path(x, y, x + w, y),
            };
            let temp = match prev {
                Some((_, _, prev_temp_y)) => {
                    curve_path(x, prev_temp_y, x + w, temp_y, false, x_scale)
                }
                None => line_path(x, temp_y, x + w, temp_y),
            };

            commands.push(RenderCommand::BeginGroup {
                id: format!("frame-{i}"),
                label: Some(frame.name.clone()),
            });
            commands.push(RenderCommand::DrawPath {
                path: target,
                color: target_token(frame.target.kind),
                width: TRACK_WIDTH,
            });
            commands.push(RenderCommand::DrawPath {
                path: temp,
                color: ThemeToken::TemperatureTrace,
                width: TRACK_WIDTH,
            });
            commands.push(RenderCommand::EndGroup);

            x += w;
            prev = Some((frame.target.kind, y, temp_y));
        }
    }
}

pub fn target_token(kind: Measure) -> ThemeToken {
    match kind {
        Measure::Flow => ThemeToken::FlowTrace,
        Measure::Pressure => ThemeToken::PressureTrace,
    }
}

/// Seconds between vertical grid lines: a multiple of `X_GRID` wide
/// enough that lines stay `MIN_GRID_SPACING` pixels apart.
pub fn time_grid_step(x_scale: f64) -> f64 {
    let multiple = (MIN_GRID_SPACING / (X_GRID * x_scale)).ceil().max(1.0);
    X_GRID * multiple
}

fn axis_label(x: f64, y: f64, value: f64) -> RenderCommand {
    RenderCommand::DrawText {
        position: Point::new(x, y),
        text: format!("{value}"),
        color: ThemeToken::AxisLabel,
        font_size: FONT_SIZE,
        align: TextAlign::Center,
    }
}

/// Straight segment from `(x1, y1)` to `(x2, y2)`.
pub fn line_path(x1: f64, y1: f64, x2: f64, y2: f64) -> PathData {
    PathData::new().move_to(x1, y1).line_to(x2, y2)
}

/// Transition from `y1` to `y2` across `[x1, x2]`.
///
/// Without interpolation the level changes in a short S-curve whose control
/// distance is `min(1.5 s, width / 4)` and then holds. With interpolation
/// a gentler cubic reaches a quarter of the way along (and a quarter of
/// the rise) before a straight ramp finishes the segment.
pub fn curve_path(x1: f64, y1: f64, x2: f64, y2: f64, interpolate: bool, x_scale: f64) -> PathData {
    if !interpolate {
        let c = (CURVE_SECONDS * x_scale).min((x2 - x1) / 4.0);
        return PathData::new()
            .move_to(x1, y1)
            .cubic_to(
                Point::new(x1 + c, y1),
                Point::new(x1 + c, y2),
                Point::new(x1 + c * 2.0, y2),
            )
            .line_to(x2, y2);
    }

    let xm = x1 + (x2 - x1) / 4.0;
    let ym = y1 + (y2 - y1) / 4.0;
    let c = (CURVE_SECONDS * x_scale).min((xm - x1) / 4.0);
    let cx = (x2 - x1) / 8.0;
    let cy = (y2 - y1) / 8.0;
    PathData::new()
        .move_to(x1, y1)
        .cubic_to(
            Point::new(x1 + c, y1),
            Point::new(xm - cx, ym - cy),
            Point::new(xm, ym),
        )
        .line_to(x2, y2)
}
