//! Detection geometry
//!
//! Types for the output of an external text recognizer and the axis-aligned
//! rectangles the raster projector produces from it.

use serde::{Deserialize, Serialize};

/// A point in image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// One recognized text region: a quadrilateral, its text and a confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Corner points, usually clockwise from top-left
    pub polygon: [Point; 4],
    /// Recognized text
    pub text: String,
    /// Recognition confidence (0.0 to 1.0)
    pub confidence: f64,
}

impl Detection {
    pub fn new(polygon: [Point; 4], text: impl Into<String>, confidence: f64) -> Self {
        Self {
            polygon,
            text: text.into(),
            confidence,
        }
    }

    /// Detection covering an axis-aligned box
    pub fn from_rect(rect: Rect, text: impl Into<String>, confidence: f64) -> Self {
        let polygon = [
            Point::new(rect.x1, rect.y1),
            Point::new(rect.x2, rect.y1),
            Point::new(rect.x2, rect.y2),
            Point::new(rect.x1, rect.y2),
        ];
        Self::new(polygon, text, confidence)
    }

    pub fn bounding_rect(&self) -> Rect {
        Rect::bounding(&self.polygon)
    }
}

/// Axis-aligned rectangle, `(x1, y1)` top-left and `(x2, y2)` bottom-right
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Rect {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Smallest rectangle containing every point; empty input yields a
    /// zero rectangle at the origin
    pub fn bounding(points: &[Point]) -> Self {
        let Some(first) = points.first() else {
            return Self::new(0.0, 0.0, 0.0, 0.0);
        };

        points.iter().skip(1).fold(
            Self::new(first.x, first.y, first.x, first.y),
            |rect, p| Self {
                x1: rect.x1.min(p.x),
                y1: rect.y1.min(p.y),
                x2: rect.x2.max(p.x),
                y2: rect.y2.max(p.y),
            },
        )
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}
