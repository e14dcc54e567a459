use winit::event::{ElementState, KeyboardInput, VirtualKeyCode, WindowEvent};

use crate::{
    error::{Error, Result},
    geometry::Ray,
    util::math,
};

/// Pinhole camera. `forward` is added to the screen-space offset instead of
/// rotating it, so the projection only holds near the default orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: glam::Vec3,
    pub forward: glam::Vec3,
    /// Field of view in degrees.
    pub fov: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: glam::Vec3::ZERO,
            forward: glam::Vec3::X,
            fov: 60.0,
        }
    }
}

/// Per-frame constants of the pixel to screen-space mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    width: u32,
    height: u32,
    aspect_ratio: f32,
    angle: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32, fov: f32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidResolution { width, height });
        }
        if !(fov > 0.0 && fov < 180.0) {
            return Err(Error::InvalidFieldOfView { fov });
        }

        Ok(Self {
            width,
            height,
            aspect_ratio: width as f32 / height as f32,
            angle: (math::degree_to_radian(fov) * 0.5).tan(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Screen-space offset of the center of pixel `(x, y)`, `y = 0` at the top.
    pub fn screen_offset(&self, x: u32, y: u32) -> glam::Vec2 {
        let xx = (2.0 * ((x as f32 + 0.5) / self.width as f32) - 1.0)
            * self.angle
            * self.aspect_ratio;
        // Only the second term is scaled by the view angle.
        let yy = 1.0 - 2.0 * ((y as f32 + 0.5) / self.height as f32) * self.angle;
        glam::Vec2::new(xx, yy)
    }
}

impl Camera {
    pub fn new(position: glam::Vec3, forward: glam::Vec3, fov: f32) -> Self {
        Self {
            position,
            forward,
            fov,
        }
    }

    pub fn projection(&self, width: u32, height: u32) -> Result<Projection> {
        Projection::new(width, height, self.fov)
    }

    pub fn primary_ray(&self, projection: &Projection, x: u32, y: u32) -> Result<Ray> {
        if x >= projection.width || y >= projection.height {
            return Err(Error::PixelOutOfBounds {
                x,
                y,
                width: projection.width,
                height: projection.height,
            });
        }
        let offset = projection.screen_offset(x, y);
        Ray::try_new(
            self.position,
            glam::Vec3::new(offset.x, offset.y, -1.0) + self.forward,
        )
    }
}

/// Build the primary ray through pixel `(x, y)` of a `width` x `height` frame.
pub fn generate_primary_ray(
    camera: &Camera,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> Result<Ray> {
    camera.primary_ray(&camera.projection(width, height)?, x, y)
}

pub struct CameraController {
    pub speed: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl CameraController {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }

    /// Camera moved by one step for `keycode`, or `None` for unbound keys.
    pub fn translate(&self, camera: Camera, keycode: VirtualKeyCode) -> Option<Camera> {
        let step = match keycode {
            VirtualKeyCode::W => glam::Vec3::Y,
            VirtualKeyCode::S => glam::Vec3::NEG_Y,
            VirtualKeyCode::A => glam::Vec3::NEG_X,
            VirtualKeyCode::D => glam::Vec3::X,
            VirtualKeyCode::Q => glam::Vec3::NEG_Z,
            VirtualKeyCode::E => glam::Vec3::Z,
            _ => return None,
        };
        Some(Camera {
            position: camera.position + step * self.speed,
            ..camera
        })
    }

    pub fn process_events(&self, camera: Camera, event: &WindowEvent) -> Option<Camera> {
        match event {
            WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        state: ElementState::Pressed,
                        virtual_keycode: Some(keycode),
                        ..
                    },
                ..
            } => {
                let moved = self.translate(camera, *keycode)?;
                tracing::debug!(?keycode, position = ?moved.position, "camera moved");
                Some(moved)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_projection_rejects_bad_input() {
        assert!(matches!(
            Projection::new(0, 10, 60.0),
            Err(Error::InvalidResolution { .. })
        ));
        assert!(matches!(
            Projection::new(10, 10, 0.0),
            Err(Error::InvalidFieldOfView { .. })
        ));
        assert!(matches!(
            Projection::new(10, 10, 180.0),
            Err(Error::InvalidFieldOfView { .. })
        ));
    }

    #[test]
    fn test_screen_offset_center_pixel() {
        // 90 degrees gives angle = 1.
        let projection = Projection::new(3, 3, 90.0).unwrap();
        let offset = projection.screen_offset(1, 1);
        assert!(offset.x.abs() < EPSILON);
        assert!(offset.y.abs() < EPSILON);
    }

    #[test]
    fn test_screen_offset_scales_x_by_aspect_ratio() {
        let projection = Projection::new(4, 2, 90.0).unwrap();
        let offset = projection.screen_offset(3, 0);
        assert!((offset.x - 1.5).abs() < EPSILON);
        assert!((offset.y - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_vertical_offset_only_scales_second_term() {
        // 60 degrees: angle = tan(30) ~ 0.57735
        let projection = Projection::new(1, 1, 60.0).unwrap();
        let offset = projection.screen_offset(0, 0);
        let angle = (30.0f32).to_radians().tan();
        assert!((offset.y - (1.0 - angle)).abs() < EPSILON);
        assert!(offset.x.abs() < EPSILON);
    }

    #[test]
    fn test_primary_ray_is_unit_and_adds_forward() {
        let camera = Camera::new(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, 90.0);
        let ray = generate_primary_ray(&camera, 1, 1, 3, 3).unwrap();
        assert_eq!(ray.origin, Vec3::new(1.0, 2.0, 3.0));
        assert!((ray.direction - Vec3::new(0.0, 0.0, -1.0)).length() < EPSILON);

        let camera = Camera::default();
        let ray = generate_primary_ray(&camera, 0, 0, 150, 150).unwrap();
        assert!((ray.direction.length() - 1.0).abs() < EPSILON);
        assert!(ray.direction.x > 0.0);
    }

    #[test]
    fn test_primary_ray_degenerate_direction() {
        let projection = Projection::new(3, 3, 90.0).unwrap();
        let offset = projection.screen_offset(2, 0);
        // Forward exactly cancels the screen-space direction of this pixel.
        let camera = Camera::new(Vec3::ZERO, Vec3::new(-offset.x, -offset.y, 1.0), 90.0);
        let result = camera.primary_ray(&projection, 2, 0);
        assert!(matches!(result, Err(Error::DegenerateVector { .. })));
    }

    #[test]
    fn test_primary_ray_out_of_bounds() {
        let result = generate_primary_ray(&Camera::default(), 150, 0, 150, 150);
        assert!(matches!(result, Err(Error::PixelOutOfBounds { .. })));
    }

    #[test]
    fn test_controller_translates_copy() {
        let controller = CameraController::default();
        let camera = Camera::default();

        let moved = controller.translate(camera, VirtualKeyCode::W).unwrap();
        assert!((moved.position.y - 0.1).abs() < EPSILON);
        assert_eq!(camera.position, Vec3::ZERO);

        let moved = controller.translate(moved, VirtualKeyCode::Q).unwrap();
        assert!((moved.position.z + 0.1).abs() < EPSILON);
        assert_eq!(moved.forward, camera.forward);

        assert!(controller.translate(camera, VirtualKeyCode::Space).is_none());
    }
}
