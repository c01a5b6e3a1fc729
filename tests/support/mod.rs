#![allow(dead_code)]

use voronoi_backdrop::geometry::Point;
use voronoi_backdrop::{Dimensions, Fill, FrameScheduler, Rgb, Surface};

/// Scheduler that only counts requests; tests call `tick` themselves.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pub requested: usize,
    pub cancelled: usize,
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.requested += 1;
    }

    fn cancel(&mut self) {
        self.cancelled += 1;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Resize(Dimensions),
    Clear(Rgb),
    Fill(Vec<Point>, Fill),
    Stroke(usize, f64),
}

/// Surface that records every call.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn fills(&self) -> impl Iterator<Item = &Fill> {
        self.calls.iter().filter_map(|c| match c {
            DrawCall::Fill(_, fill) => Some(fill),
            _ => None,
        })
    }

    pub fn resizes(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Resize(_)))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, dims: Dimensions) {
        self.calls.push(DrawCall::Resize(dims));
    }

    fn clear(&mut self, color: Rgb) {
        self.calls.push(DrawCall::Clear(color));
    }

    fn fill_polygon(&mut self, points: &[Point], fill: &Fill) {
        self.calls.push(DrawCall::Fill(points.to_vec(), fill.clone()));
    }

    fn stroke_polygon(&mut self, points: &[Point], alpha: f64) {
        self.calls.push(DrawCall::Stroke(points.len(), alpha));
    }
}

pub fn approx_point(a: Point, b: Point, eps: f64) -> bool {
    (a.x - b.x).abs() < eps && (a.y - b.y).abs() < eps
}
