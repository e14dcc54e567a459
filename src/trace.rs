use crate::{
    color::Color,
    error::Result,
    geometry::{get_hit, Ray},
    scene::SceneQuery,
    util::math,
};

/// Number of reflection bounces followed after the primary hit.
pub const MAX_RAY_DEPTH: u32 = 4;
/// Offset applied along the normal to reflected ray origins.
pub const BIAS: f32 = 1e-4;

/// Grazing-angle reflectivity in `[0.1, 1]` for a facing ratio in `[0, 1]`.
///
/// Not a physical Fresnel term: a cubic falloff biased 10% toward full
/// reflection.
pub fn fresnel(facing_ratio: f32) -> f32 {
    math::mix((1.0 - facing_ratio).powi(3), 1.0, 0.1).max(0.0)
}

/// Mirror `direction` about `normal`, returning a unit vector.
pub fn reflect(direction: glam::Vec3, normal: glam::Vec3) -> Result<glam::Vec3> {
    math::try_normalize(direction - normal * 2.0 * direction.dot(normal))
}

/// Color seen along a primary ray.
pub fn trace<S: SceneQuery + ?Sized>(ray: &Ray, scene: &S) -> Result<Color> {
    trace_depth(ray, scene, 0)
}

/// Color seen along `ray`, which is `depth` bounces away from the camera.
///
/// A hit below [`MAX_RAY_DEPTH`] spawns exactly one reflected ray, so a primary
/// ray costs at most `MAX_RAY_DEPTH + 1` scene queries.
pub fn trace_depth<S: SceneQuery + ?Sized>(ray: &Ray, scene: &S, depth: u32) -> Result<Color> {
    let Some(nearest) = scene.nearest_hit(ray) else {
        return Ok(Color::BLACK);
    };
    let sphere = nearest.sphere;
    let hit = get_hit(ray, sphere, nearest.t)?;
    tracing::trace!(depth, t = nearest.t, inside = hit.inside, "ray hit sphere");

    let mut surface_color = Color::ZERO;
    if depth < MAX_RAY_DEPTH {
        let facing_ratio = -ray.direction.dot(hit.normal);
        let fresnel = fresnel(facing_ratio);

        let reflect_ray = Ray::new(
            hit.point + hit.normal * BIAS,
            reflect(ray.direction, hit.normal)?,
        );
        let reflection = trace_depth(&reflect_ray, scene, depth + 1)?;

        surface_color = reflection.scale(fresnel).lerp(sphere.color(), 0.5)?;
    }

    Ok(sphere.color() + surface_color)
}
