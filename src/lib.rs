//! Recursive reflection ray tracer for scenes made of spheres.
//!
//! The core is [`camera::generate_primary_ray`] and [`trace::trace`]; the
//! presentation modules only move traced frames onto the screen.

pub mod application;
pub mod camera;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod renderer;
pub mod scene;
pub mod texture;
pub mod trace;
pub mod util;

pub use camera::{generate_primary_ray, Camera};
pub use color::Color;
pub use error::{Error, Result};
pub use frame::{render_frame, Frame, RenderState};
pub use geometry::{Ray, Sphere};
pub use scene::{Scene, SceneQuery};
pub use trace::trace;
