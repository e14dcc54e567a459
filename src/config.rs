use std::path::Path;

use serde::Deserialize;

use crate::{
    color::Color,
    error::{Error, Result},
    geometry::Sphere,
    scene::Scene,
};

/// On-disk scene description.
///
/// ```toml
/// [[spheres]]
/// center = [0.0, 2.0, -4.0]
/// radius = 1.0
/// color = [255, 50, 50]
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SceneFile {
    #[serde(default)]
    pub spheres: Vec<SphereEntry>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SphereEntry {
    pub center: [f32; 3],
    pub radius: f32,
    pub color: [u8; 3],
}

impl SceneFile {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::SceneFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Validate every entry and build the scene in file order.
    pub fn into_scene(self) -> Result<Scene> {
        let spheres = self
            .spheres
            .into_iter()
            .map(|entry| {
                Sphere::new(
                    glam::Vec3::from_array(entry.center),
                    entry.radius,
                    Color::from(entry.color),
                )
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Scene::new(spheres))
    }
}

/// Load the scene at `path`, or the demo scene when no path is given.
pub fn load_scene(path: Option<&Path>) -> Result<Scene> {
    match path {
        Some(path) => {
            let scene = SceneFile::load(path)?.into_scene()?;
            tracing::info!(?path, spheres = scene.len(), "scene loaded");
            Ok(scene)
        }
        None => Scene::demo(),
    }
}
