use crate::{
    color::Color,
    error::{Error, Result},
    util::math,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: glam::Vec3,
    radius: f32,
    color: Color,
}

impl Sphere {
    pub fn new(center: glam::Vec3, radius: f32, color: Color) -> Result<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(Error::InvalidSphere { radius });
        }
        Ok(Self {
            center,
            radius,
            color,
        })
    }

    pub fn center(&self) -> glam::Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: glam::Vec3,
    /// Expected to be unit length, see [`Ray::try_new`].
    pub direction: glam::Vec3,
}

impl Ray {
    pub fn new(origin: glam::Vec3, direction: glam::Vec3) -> Self {
        Self { origin, direction }
    }

    /// Build a ray, normalizing `direction` first.
    pub fn try_new(origin: glam::Vec3, direction: glam::Vec3) -> Result<Self> {
        Ok(Self::new(origin, math::try_normalize(direction)?))
    }

    pub fn at(&self, t: f32) -> glam::Vec3 {
        self.origin + self.direction * t
    }
}

/// Entry and exit parameters of a ray crossing a sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub t0: f32,
    pub t1: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// The ray left the sphere from within and the normal was flipped.
    pub inside: bool,
    pub point: glam::Vec3,
    /// Unit normal, always facing against the incoming ray.
    pub normal: glam::Vec3,
}

/// Geometric ray/sphere test.
///
/// A sphere whose center projects behind the ray origin is rejected even when
/// the origin lies inside it.
pub fn sphere_intersect(ray: &Ray, sphere: &Sphere) -> Option<Intersection> {
    let l = sphere.center - ray.origin;
    let tca = l.dot(ray.direction);
    if tca < 0.0 {
        return None;
    }

    let radius2 = sphere.radius * sphere.radius;
    let d2 = l.dot(l) - tca * tca;
    if d2 > radius2 {
        return None;
    }

    let thc = (radius2 - d2).sqrt();
    Some(Intersection {
        t0: tca - thc,
        t1: tca + thc,
    })
}

pub fn get_hit(ray: &Ray, sphere: &Sphere, t_near: f32) -> Result<HitRecord> {
    let point = ray.at(t_near);
    let normal = math::try_normalize(point - sphere.center)?;

    Ok(if ray.direction.dot(normal) > 0.0 {
        HitRecord {
            inside: true,
            point,
            normal: -normal,
        }
    } else {
        HitRecord {
            inside: false,
            point,
            normal,
        }
    })
}
