use crate::{
    color::Color,
    error::Result,
    geometry::{sphere_intersect, Ray, Sphere},
};

/// Closest sphere along a ray and the ray parameter of the surface that was hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestHit<'a> {
    pub sphere: &'a Sphere,
    pub t: f32,
}

/// Anything the trace engine can ask for the nearest surface along a ray.
pub trait SceneQuery {
    fn nearest_hit(&self, ray: &Ray) -> Option<NearestHit<'_>>;
}

/// An ordered list of spheres. Read-only while a frame is being traced.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    spheres: Vec<Sphere>,
}

impl Scene {
    pub fn new(spheres: Vec<Sphere>) -> Self {
        Self { spheres }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// The two-sphere scene the viewer starts with.
    pub fn demo() -> Result<Self> {
        Ok(Self::new(vec![
            Sphere::new(glam::Vec3::new(0.0, 2.0, -4.0), 1.0, Color::new(255, 50, 50))?,
            Sphere::new(glam::Vec3::new(3.0, 2.0, -6.0), 2.0, Color::new(50, 255, 50))?,
        ]))
    }

    pub fn push(&mut self, sphere: Sphere) {
        self.spheres.push(sphere);
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }
}

impl SceneQuery for Scene {
    /// Spheres whose near parameter is negative are scored by their far one.
    /// Ties keep the sphere that comes first.
    fn nearest_hit(&self, ray: &Ray) -> Option<NearestHit<'_>> {
        let mut nearest: Option<NearestHit<'_>> = None;

        for sphere in &self.spheres {
            let Some(hit) = sphere_intersect(ray, sphere) else {
                continue;
            };
            let t = if hit.t0 < 0.0 { hit.t1 } else { hit.t0 };
            if nearest.map_or(true, |n| t < n.t) {
                nearest = Some(NearestHit { sphere, t });
            }
        }

        nearest
    }
}
