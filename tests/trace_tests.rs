use std::cell::Cell;

use glam::Vec3;
use ray_tracing_lib::{
    camera::{generate_primary_ray, Camera},
    color::Color,
    geometry::{sphere_intersect, Ray, Sphere},
    scene::{NearestHit, Scene, SceneQuery},
    trace::{trace, MAX_RAY_DEPTH},
};

const EPSILON: f32 = 1e-4;

/// Wraps a scene and counts how often the trace engine queries it.
struct CountingScene {
    inner: Scene,
    queries: Cell<u32>,
}

impl CountingScene {
    fn new(inner: Scene) -> Self {
        Self {
            inner,
            queries: Cell::new(0),
        }
    }
}

impl SceneQuery for CountingScene {
    fn nearest_hit(&self, ray: &Ray) -> Option<NearestHit<'_>> {
        self.queries.set(self.queries.get() + 1);
        self.inner.nearest_hit(ray)
    }
}

fn forward_ray() -> Ray {
    Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0))
}

#[test]
fn test_recursion_is_bounded_by_max_depth() {
    // Inside a sphere every reflected ray hits the same sphere again.
    let enclosing = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 10.0, Color::new(10, 10, 10)).unwrap();
    let scene = CountingScene::new(Scene::new(vec![enclosing]));

    trace(&forward_ray(), &scene).unwrap();
    assert_eq!(scene.queries.get(), MAX_RAY_DEPTH + 1);
}

#[test]
fn test_miss_queries_once() {
    let scene = CountingScene::new(Scene::demo().unwrap());
    let color = trace(&forward_ray(), &scene).unwrap();
    assert_eq!(color, Color::BLACK);
    assert_eq!(scene.queries.get(), 1);
}

#[test]
fn test_first_demo_sphere_is_missed_by_straight_ray() {
    // Center (0, 2, -4) sits 2 units off the ray, radius is 1.
    let sphere = Scene::demo().unwrap().spheres()[0];
    assert!(sphere_intersect(&forward_ray(), &sphere).is_none());
}

#[test]
fn test_ray_toward_first_demo_sphere() {
    let scene = Scene::demo().unwrap();
    let to_center = Vec3::new(0.0, 2.0, -4.0);
    let ray = Ray::try_new(Vec3::ZERO, to_center).unwrap();

    let hit = scene.nearest_hit(&ray).unwrap();
    assert_eq!(hit.sphere.color(), Color::new(255, 50, 50));
    assert!((hit.t - (to_center.length() - 1.0)).abs() < EPSILON);

    // Head-on hit, the reflection leaves the scene: base + half of base.
    assert_eq!(trace(&ray, &scene).unwrap(), Color::new(255, 75, 75));
}

#[test]
fn test_ray_through_both_spheres_selects_nearest() {
    let near = Sphere::new(Vec3::new(0.0, 0.0, -4.0), 1.0, Color::new(255, 50, 50)).unwrap();
    let far = Sphere::new(Vec3::new(0.0, 0.0, -8.0), 2.0, Color::new(50, 255, 50)).unwrap();
    let ray = forward_ray();

    assert!(sphere_intersect(&ray, &near).is_some());
    assert!(sphere_intersect(&ray, &far).is_some());

    for scene in [
        Scene::new(vec![near, far]),
        Scene::new(vec![far, near]),
    ] {
        let hit = scene.nearest_hit(&ray).unwrap();
        assert_eq!(hit.sphere, &near);
        assert!((hit.t - 3.0).abs() < EPSILON);
    }
}

#[test]
fn test_miss_is_black_regardless_of_scene() {
    let away = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
    for scene in [Scene::empty(), Scene::demo().unwrap()] {
        assert_eq!(trace(&away, &scene).unwrap(), Color::BLACK);
    }
}

#[test]
fn test_trace_is_deterministic() {
    let scene = Scene::demo().unwrap();
    let camera = Camera::default();
    for (x, y) in [(0, 0), (75, 20), (120, 40), (149, 149)] {
        let ray = generate_primary_ray(&camera, x, y, 150, 150).unwrap();
        assert_eq!(trace(&ray, &scene).unwrap(), trace(&ray, &scene).unwrap());
    }
}

#[test]
fn test_through_center_parameters() {
    let sphere = Sphere::new(Vec3::new(1.0, 1.0, -6.0), 1.5, Color::WHITE).unwrap();
    let to_center = sphere.center();
    let ray = Ray::try_new(Vec3::ZERO, to_center).unwrap();

    let hit = sphere_intersect(&ray, &sphere).unwrap();
    let distance = to_center.length();
    assert!((hit.t0 - (distance - 1.5)).abs() < EPSILON);
    assert!((hit.t1 - (distance + 1.5)).abs() < EPSILON);
}
