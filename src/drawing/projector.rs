// src/drawing/projector.rs
use glam::{DMat4, DVec3, DVec4};

use super::{GridBounds, ScreenPoint, WorldPoint};

/// Depth of the drawing plane, behind the scene's origin.
pub const PLANE_Z: f64 = -50.0;

const EPSILON: f64 = 1.0e-9;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    #[error("invalid viewport size {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
}

/// Rendered size of the canvas in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f64,
    height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Result<Self, ProjectionError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(ProjectionError::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    fn screen_to_ndc(&self, p: ScreenPoint) -> (f64, f64) {
        let x = (p.x / self.width) * 2.0 - 1.0;
        let y = 1.0 - (p.y / self.height) * 2.0;
        (x, y)
    }

    fn ndc_to_screen(&self, x: f64, y: f64) -> ScreenPoint {
        ScreenPoint {
            x: (x * 0.5 + 0.5) * self.width,
            y: (1.0 - (y * 0.5 + 0.5)) * self.height,
        }
    }
}

/// Perspective camera with OpenGL clip conventions (NDC depth in [-1, 1]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: DVec3,
    pub target: DVec3,
    pub up: DVec3,
    /// Vertical field of view in radians.
    pub fovy: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    pub fn perspective(eye: DVec3, target: DVec3, fovy_degrees: f64, viewport: Viewport) -> Self {
        Self {
            eye,
            target,
            up: DVec3::Y,
            fovy: fovy_degrees.to_radians(),
            aspect: viewport.aspect(),
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn view(&self) -> DMat4 {
        DMat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection(&self) -> DMat4 {
        DMat4::perspective_rh_gl(self.fovy, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> DMat4 {
        self.projection() * self.view()
    }

    fn ray_through(&self, ndc_x: f64, ndc_y: f64) -> Option<(DVec3, DVec3)> {
        let inverse = self.view_projection().inverse();
        let through = inverse.project_point3(DVec3::new(ndc_x, ndc_y, 0.5));
        let dir = (through - self.eye).normalize_or_zero();
        if dir == DVec3::ZERO || !dir.is_finite() {
            return None;
        }
        Some((self.eye, dir))
    }
}

fn intersect_plane(origin: DVec3, dir: DVec3, plane_z: f64) -> Option<DVec3> {
    if dir.z.abs() <= EPSILON {
        return None;
    }

    let t = (plane_z - origin.z) / dir.z;
    if t < 0.0 {
        return None;
    }

    Some(origin + dir * t)
}

/// Casts a ray from the camera through `point` and hits the drawing plane.
///
/// `None` when there is no camera yet, or the ray never reaches the plane.
pub fn screen_to_world(
    point: ScreenPoint,
    camera: Option<&Camera>,
    viewport: Viewport,
) -> Option<WorldPoint> {
    let camera = camera?;
    let (x, y) = viewport.screen_to_ndc(point);
    let (origin, dir) = camera.ray_through(x, y)?;
    intersect_plane(origin, dir, PLANE_Z).map(WorldPoint::from)
}

/// Projects `point` to pixels. `None` when there is no camera or the point
/// lies behind it.
pub fn world_to_screen(
    point: WorldPoint,
    camera: Option<&Camera>,
    viewport: Viewport,
) -> Option<ScreenPoint> {
    let camera = camera?;
    let clip = camera.view_projection() * DVec4::new(point.x, point.y, point.z, 1.0);
    if !clip.is_finite() || clip.w.abs() <= EPSILON {
        return None;
    }

    let ndc = clip.truncate() / clip.w;
    if !ndc.is_finite() || ndc.z > 1.0 {
        return None;
    }

    Some(viewport.ndc_to_screen(ndc.x, ndc.y))
}

/// Screen rectangle covered by the square `[-half_extent, half_extent]²` on the plane.
pub fn grid_screen_bounds(
    camera: Option<&Camera>,
    viewport: Viewport,
    half_extent: f64,
) -> Option<GridBounds> {
    let corners = [
        (-half_extent, -half_extent),
        (half_extent, -half_extent),
        (half_extent, half_extent),
        (-half_extent, half_extent),
    ];

    let mut bounds = GridBounds {
        left: f64::INFINITY,
        right: f64::NEG_INFINITY,
        top: f64::INFINITY,
        bottom: f64::NEG_INFINITY,
    };
    for (x, y) in corners {
        let p = world_to_screen(WorldPoint::new(x, y, PLANE_Z), camera, viewport)?;
        bounds.left = bounds.left.min(p.x);
        bounds.right = bounds.right.max(p.x);
        bounds.top = bounds.top.min(p.y);
        bounds.bottom = bounds.bottom.max(p.y);
    }
    Some(bounds)
}
