// src/drawing/mod.rs
//! Freehand drawing on the background grid of the 3D scene.
//!
//! Strokes are captured in screen space, converted to world space on the
//! plane `z = PLANE_Z` and stored there, so they stay put when the viewport
//! is resized or the camera moves.

pub mod projector;
pub mod session;

use glam::DVec3;
use serde::{Deserialize, Serialize};

pub use projector::{
    Camera, PLANE_Z, ProjectionError, Viewport, grid_screen_bounds, screen_to_world,
    world_to_screen,
};
pub use session::{DrawingSession, DrawnLine};

/// Pixel position, origin top-left, y growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WorldPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<DVec3> for WorldPoint {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<WorldPoint> for DVec3 {
    fn from(p: WorldPoint) -> Self {
        DVec3::new(p.x, p.y, p.z)
    }
}

/// Screen-space rectangle covered by the background grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridBounds {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for GridBounds {
    fn default() -> Self {
        Self {
            left: 0.0,
            right: 1920.0,
            top: 0.0,
            bottom: 1080.0,
        }
    }
}

impl GridBounds {
    pub fn from_viewport(viewport: Viewport) -> Self {
        Self {
            left: 0.0,
            right: viewport.width(),
            top: 0.0,
            bottom: viewport.height(),
        }
    }

    pub fn contains(&self, p: ScreenPoint) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
}
