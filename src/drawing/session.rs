// src/drawing/session.rs
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use uuid::Uuid;

use super::projector::{Camera, Viewport, screen_to_world};
use super::{GridBounds, ScreenPoint, WorldPoint};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawnLine {
    pub id: String,
    /// World-space points, never empty.
    pub points: Vec<WorldPoint>,
}

#[derive(Debug, Default)]
struct DrawingState {
    pen_mode: bool,
    grid_bounds: GridBounds,
    lines: Vec<DrawnLine>,
    active: Option<String>,
}

/// Pen mode, grid bounds and strokes for one interactive session.
///
/// Every mutation bumps a revision number that renderers can watch.
#[derive(Debug)]
pub struct DrawingSession {
    state: RwLock<DrawingState>,
    revision: watch::Sender<u64>,
}

impl Default for DrawingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingSession {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            state: RwLock::new(DrawingState::default()),
            revision,
        }
    }

    pub fn with_viewport(viewport: Viewport) -> Self {
        let session = Self::new();
        session.write().grid_bounds = GridBounds::from_viewport(viewport);
        session
    }

    fn read(&self) -> RwLockReadGuard<'_, DrawingState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, DrawingState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    pub fn pen_mode(&self) -> bool {
        self.read().pen_mode
    }

    pub fn set_pen_mode(&self, on: bool) {
        {
            let mut state = self.write();
            state.pen_mode = on;
            if !on {
                state.active = None;
            }
        }
        self.bump();
    }

    pub fn toggle_pen_mode(&self) -> bool {
        let on = !self.pen_mode();
        self.set_pen_mode(on);
        on
    }

    pub fn grid_bounds(&self) -> GridBounds {
        self.read().grid_bounds
    }

    pub fn set_grid_bounds(&self, bounds: GridBounds) {
        self.write().grid_bounds = bounds;
        self.bump();
    }

    /// Starts a new stroke at `point` and returns its id.
    pub fn begin_line(&self, point: WorldPoint) -> String {
        let id = format!("line-{}", Uuid::new_v4());
        {
            let mut state = self.write();
            state.lines.push(DrawnLine {
                id: id.clone(),
                points: vec![point],
            });
            state.active = Some(id.clone());
        }
        self.bump();
        id
    }

    /// Appends to the stroke `id`. Returns `false` if no such stroke exists.
    pub fn extend_line(&self, id: &str, point: WorldPoint) -> bool {
        let found = {
            let mut state = self.write();
            match state.lines.iter_mut().find(|l| l.id == id) {
                Some(line) => {
                    line.points.push(point);
                    true
                }
                None => false,
            }
        };
        if found {
            self.bump();
        }
        found
    }

    /// Finishes the current stroke; the next `draw_at` starts a new one.
    pub fn end_stroke(&self) {
        self.write().active = None;
    }

    /// Projects a pointer position onto the plane and feeds the current stroke.
    ///
    /// Ignored when pen mode is off, the pointer is outside the grid, or the
    /// ray misses the plane.
    pub fn draw_at(
        &self,
        point: ScreenPoint,
        camera: Option<&Camera>,
        viewport: Viewport,
    ) -> Option<WorldPoint> {
        {
            let state = self.read();
            if !state.pen_mode || !state.grid_bounds.contains(point) {
                return None;
            }
        }

        let world = screen_to_world(point, camera, viewport)?;
        let active = self.read().active.clone();
        match active {
            Some(id) if self.extend_line(&id, world) => {}
            _ => {
                self.begin_line(world);
            }
        }
        Some(world)
    }

    pub fn lines(&self) -> Vec<DrawnLine> {
        self.read().lines.clone()
    }

    pub fn clear_drawings(&self) {
        {
            let mut state = self.write();
            state.lines.clear();
            state.active = None;
        }
        self.bump();
    }
}
