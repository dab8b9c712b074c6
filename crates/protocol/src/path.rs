//! Open vector paths made of move/line/cubic segments.

use serde::{Deserialize, Serialize};

use crate::types::Point;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    CubicTo { ctrl1: Point, ctrl2: Point, to: Point },
}

impl PathSegment {
    pub fn end(&self) -> Point {
        match *self {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) => p,
            PathSegment::CubicTo { to, .. } => to,
        }
    }
}

/// An ordered list of path segments. A path may contain several subpaths,
/// each starting with a `MoveTo`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathData {
    segments: Vec<PathSegment>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.segments.push(PathSegment::MoveTo(Point::new(x, y)));
        self
    }

    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.segments.push(PathSegment::LineTo(Point::new(x, y)));
        self
    }

    pub fn cubic_to(mut self, ctrl1: Point, ctrl2: Point, to: Point) -> Self {
        self.segments.push(PathSegment::CubicTo { ctrl1, ctrl2, to });
        self
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// SVG path data (`d` attribute). Coordinates are written unrounded.
    pub fn to_svg(&self) -> String {
        self.segments
            .iter()
            .map(|seg| match seg {
                PathSegment::MoveTo(p) => format!("M{} {}", p.x, p.y),
                PathSegment::LineTo(p) => format!("L{} {}", p.x, p.y),
                PathSegment::CubicTo { ctrl1, ctrl2, to } => format!(
                    "C{} {}, {} {}, {} {}",
                    ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y
                ),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Approximate the path with polylines, one per subpath. Each cubic is
    /// sampled at `steps` evenly spaced parameter values.
    pub fn flatten(&self, steps: usize) -> Vec<Vec<Point>> {
        let steps = steps.max(1);
        let mut polylines: Vec<Vec<Point>> = Vec::new();
        let mut current: Vec<Point> = Vec::new();

        for seg in &self.segments {
            match *seg {
                PathSegment::MoveTo(p) => {
                    if current.len() > 1 {
                        polylines.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push(p);
                }
                PathSegment::LineTo(p) => current.push(p),
                PathSegment::CubicTo { ctrl1, ctrl2, to } => {
                    let Some(&from) = current.last() else {
                        current.push(to);
                        continue;
                    };
                    for i in 1..=steps {
                        let t = i as f64 / steps as f64;
                        current.push(cubic_point(from, ctrl1, ctrl2, to, t));
                    }
                }
            }
        }
        if current.len() > 1 {
            polylines.push(current);
        }
        polylines
    }
}

/// De Casteljau evaluation of a cubic Bézier at `t`.
fn cubic_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let a = p0.lerp(p1, t);
    let b = p1.lerp(p2, t);
    let c = p2.lerp(p3, t);
    let d = a.lerp(b, t);
    let e = b.lerp(c, t);
    d.lerp(e, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_path_data() {
        let path = PathData::new()
            .move_to(0.0, 330.0)
            .cubic_to(
                Point::new(7.5, 330.0),
                Point::new(7.5, 300.0),
                Point::new(15.0, 300.0),
            )
            .line_to(100.0, 300.0);
        assert_eq!(
            path.to_svg(),
            "M0 330 C7.5 330, 7.5 300, 15 300 L100 300"
        );
    }

    #[test]
    fn flatten_hits_cubic_endpoints() {
        let path = PathData::new()
            .move_to(0.0, 0.0)
            .cubic_to(Point::new(1.0, 0.0), Point::new(1.0, 4.0), Point::new(2.0, 4.0))
            .move_to(10.0, 0.0)
            .line_to(20.0, 0.0);
        let lines = path.flatten(8);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 9);
        assert_eq!(lines[0].first(), Some(&Point::new(0.0, 0.0)));
        assert_eq!(lines[0].last(), Some(&Point::new(2.0, 4.0)));
        assert_eq!(lines[1], vec![Point::new(10.0, 0.0), Point::new(20.0, 0.0)]);
    }

    #[test]
    fn lone_move_to_is_dropped() {
        let path = PathData::new().move_to(5.0, 5.0);
        assert!(path.flatten(4).is_empty());
    }
}
