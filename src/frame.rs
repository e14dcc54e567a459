use std::{path::Path, time::Instant};

use image::RgbaImage;
use rayon::prelude::*;

use crate::{
    camera::Camera,
    color::Color,
    error::Result,
    scene::SceneQuery,
    trace::trace,
};

/// Everything that changes between frames. Input handling produces a new
/// value instead of mutating shared state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    pub camera: Camera,
    pub width: u32,
    pub height: u32,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            width: 150,
            height: 150,
        }
    }
}

impl RenderState {
    pub fn with_camera(self, camera: Camera) -> Self {
        Self { camera, ..self }
    }
}

/// Row-major grid of traced colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Frame {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            self.pixels[y as usize * self.width as usize + x as usize].into()
        })
    }

    /// Write the frame into an existing image of the same size.
    pub fn write_into(&self, img: &mut RgbaImage) {
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            if let Some(color) = self.pixel(x, y) {
                *pixel = color.into();
            }
        }
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_image()
            .save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

/// Trace every pixel of the frame, one rayon task per row.
///
/// The scene is only borrowed, so any number of rows may be traced at once.
/// The first failing pixel aborts the frame.
pub fn render_frame<S>(state: &RenderState, scene: &S) -> Result<Frame>
where
    S: SceneQuery + Sync + ?Sized,
{
    let start = Instant::now();
    let projection = state.camera.projection(state.width, state.height)?;
    let width = state.width as usize;
    let mut pixels = vec![Color::BLACK; width * state.height as usize];

    pixels
        .par_chunks_mut(width)
        .enumerate()
        .try_for_each(|(y, row)| -> Result<()> {
            for (x, pixel) in row.iter_mut().enumerate() {
                let ray = state.camera.primary_ray(&projection, x as u32, y as u32)?;
                *pixel = trace(&ray, scene)?;
            }
            Ok(())
        })?;

    tracing::info!(
        width = state.width,
        height = state.height,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "frame rendered"
    );

    Ok(Frame {
        width: state.width,
        height: state.height,
        pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{geometry::Sphere, scene::Scene};

    #[test]
    fn test_empty_scene_renders_black() {
        let state = RenderState {
            width: 8,
            height: 4,
            ..RenderState::default()
        };
        let frame = render_frame(&state, &Scene::empty()).unwrap();
        assert_eq!(frame.pixels().len(), 32);
        assert!(frame.pixels().iter().all(|c| *c == Color::BLACK));
    }

    #[test]
    fn test_frame_matches_per_pixel_trace() {
        let state = RenderState {
            width: 16,
            height: 12,
            camera: Camera::new(glam::Vec3::ZERO, glam::Vec3::ZERO, 60.0),
        };
        let scene = Scene::new(vec![Sphere::new(
            glam::Vec3::new(0.0, 0.0, -3.0),
            1.0,
            Color::new(40, 80, 200),
        )
        .unwrap()]);

        let frame = render_frame(&state, &scene).unwrap();
        let projection = state.camera.projection(16, 12).unwrap();
        for y in 0..12 {
            for x in 0..16 {
                let ray = state.camera.primary_ray(&projection, x, y).unwrap();
                assert_eq!(frame.pixel(x, y), Some(trace(&ray, &scene).unwrap()));
            }
        }
        // Row 10 is where the vertical offset crosses zero at this field of view.
        assert_ne!(frame.pixel(8, 10), Some(Color::BLACK));
    }

    #[test]
    fn test_invalid_resolution_fails() {
        let state = RenderState {
            width: 0,
            ..RenderState::default()
        };
        assert!(render_frame(&state, &Scene::empty()).is_err());
    }

    #[test]
    fn test_to_image_layout() {
        let frame = Frame {
            width: 2,
            height: 1,
            pixels: vec![Color::new(1, 2, 3), Color::new(4, 5, 6)],
        };
        let img = frame.to_image();
        assert_eq!(img.get_pixel(1, 0).0, [4, 5, 6, 255]);
        assert_eq!(frame.pixel(2, 0), None);
    }
}
