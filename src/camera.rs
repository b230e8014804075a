use glam::{Mat4, Vec3};

/// Fixed camera placement, pulled back along +Z and aimed at the origin.
const EYE: Vec3 = Vec3::new(0.0, 0.0, 15.0);
/// Vertical field of view in degrees.
const FOV_Y: f32 = 75.0;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 1000.0;

/// A terminal cell is about twice as tall as it is wide; the aspect ratio
/// treats the viewport as `width x 2*height` square pixels so spheres stay
/// round on screen.
pub const CELL_ASPECT: f32 = 2.0;

/// Perspective camera over a viewport measured in terminal cells.
///
/// Position, field of view, and clip planes are fixed; only the viewport
/// changes, via [`Camera::set_viewport`], when the terminal is resized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    width: f32,
    height: f32,
}

/// A world-space point projected onto the cell grid.
#[derive(Debug, Clone, Copy)]
pub struct ScreenPoint {
    /// Fractional column.
    pub x: f32,
    /// Fractional row.
    pub y: f32,
    /// Distance from the camera eye, for depth ordering and dimming.
    pub depth: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Camera {
    pub fn new(width: u16, height: u16) -> Self {
        let mut camera = Self {
            width: 1.0,
            height: 1.0,
        };
        camera.set_viewport(width, height);
        camera
    }

    /// Recomputes the aspect ratio for a new terminal size.
    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.width = width.max(1) as f32;
        self.height = height.max(1) as f32;
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn view_projection(&self) -> Mat4 {
        let aspect = self.width / (self.height * CELL_ASPECT);
        let projection = Mat4::perspective_rh(FOV_Y.to_radians(), aspect, Z_NEAR, Z_FAR);
        let view = Mat4::look_at_rh(EYE, Vec3::ZERO, Vec3::Y);
        projection * view
    }

    /// Screen coordinate to normalized device coordinates:
    /// `ndc_x = (x/width)*2 - 1`, `ndc_y = -(y/height)*2 + 1`.
    fn ndc(&self, x: f32, y: f32) -> (f32, f32) {
        let ndc_x = (x / self.width) * 2.0 - 1.0;
        let ndc_y = -(y / self.height) * 2.0 + 1.0;
        (ndc_x, ndc_y)
    }

    /// Projects a world point onto the cell grid. Returns `None` for points
    /// behind the camera or outside the clip range.
    pub fn project(&self, point: Vec3) -> Option<ScreenPoint> {
        let clip = self.view_projection() * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }

        let ndc = clip.truncate() / clip.w;
        if ndc.z < 0.0 || ndc.z > 1.0 {
            return None;
        }

        Some(ScreenPoint {
            x: (ndc.x + 1.0) / 2.0 * self.width,
            y: (1.0 - ndc.y) / 2.0 * self.height,
            depth: (point - EYE).length(),
        })
    }

    /// Casts a ray from the eye through a screen coordinate.
    pub fn screen_ray(&self, x: f32, y: f32) -> Ray {
        let (ndc_x, ndc_y) = self.ndc(x, y);

        // Unproject a point on the far plane; every perspective ray passes
        // through the eye.
        let inverse = self.view_projection().inverse();
        let far = inverse * glam::Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        let far = far.truncate() / far.w;

        Ray {
            origin: EYE,
            direction: (far - EYE).normalize(),
        }
    }
}

impl Ray {
    /// Distance along the ray to the first intersection with a sphere, or
    /// `None` when the ray misses. The direction must be normalized.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_disc = discriminant.sqrt();
        let near = -b - sqrt_disc;
        if near >= 0.0 {
            return Some(near);
        }
        // Origin inside the sphere: the exit point still counts as a hit
        let far = -b + sqrt_disc;
        (far >= 0.0).then_some(far)
    }
}
