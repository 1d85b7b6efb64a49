//! Virtual-trackball orientation driven by mouse drags.

use glam::{Mat4, Quat, Vec2, Vec3};

const TRACKBALL_RADIUS: f32 = 0.8;

/// Widget-space rectangle, in logical pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    fn centre(&self) -> Vec2 {
        Vec2::new(
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }
}

/// Turns press/drag positions into a rotation.
///
/// Positions are mapped into the viewport with the shorter side spanning
/// `-1..1`, lifted onto a sphere (or the hyperbolic sheet around it), and the
/// arc between successive points is accumulated into a quaternion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DraggableOrientation {
    quaternion: Quat,
    viewport: Viewport,
    last_mouse: Vec2,
}

impl Default for DraggableOrientation {
    fn default() -> Self {
        Self {
            quaternion: Quat::IDENTITY,
            viewport: Viewport::default(),
            last_mouse: Vec2::ZERO,
        }
    }
}

impl DraggableOrientation {
    /// Resets to a half turn about `axis`. A zero axis resets to identity.
    pub fn reset(&mut self, axis: Vec3) {
        self.quaternion = if axis.length_squared() <= f32::EPSILON {
            Quat::IDENTITY
        } else {
            let axis = axis.normalize();
            Quat::from_xyzw(axis.x, axis.y, axis.z, 0.0)
        };
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn mouse_down(&mut self, x: f32, y: f32) {
        self.last_mouse = self.to_proportion(x, y);
    }

    pub fn mouse_drag(&mut self, x: f32, y: f32) {
        let old = project_on_sphere(self.last_mouse);
        self.last_mouse = self.to_proportion(x, y);
        let new = project_on_sphere(self.last_mouse);
        self.quaternion = (self.quaternion * rotation_from_move(new, old)).normalize();
    }

    pub fn quaternion(&self) -> Quat {
        self.quaternion
    }

    pub fn rotation_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.quaternion)
    }

    fn to_proportion(&self, x: f32, y: f32) -> Vec2 {
        let scale = self.viewport.width.min(self.viewport.height) as f32 / 2.0;
        if scale <= 0.0 {
            return Vec2::ZERO;
        }
        let centre = self.viewport.centre();
        Vec2::new((x - centre.x) / scale, (centre.y - y) / scale)
    }
}

fn project_on_sphere(pos: Vec2) -> Vec3 {
    let radius_sq = TRACKBALL_RADIUS * TRACKBALL_RADIUS;
    let xy_sq = pos.length_squared();
    let z = if xy_sq < radius_sq * 0.5 {
        (radius_sq - xy_sq).sqrt()
    } else {
        radius_sq / (2.0 * xy_sq.sqrt())
    };
    pos.extend(z)
}

fn rotation_from_move(from: Vec3, to: Vec3) -> Quat {
    let mut axis = to.cross(from);
    if axis.length() < 1e-6 {
        axis = Vec3::X;
    }
    let d = ((from - to).length() / (2.0 * TRACKBALL_RADIUS)).clamp(-1.0, 1.0);
    Quat::from_axis_angle(axis.normalize(), 2.0 * d.asin())
}
