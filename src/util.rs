pub mod math {
    use crate::error::{Error, Result};

    pub fn degree_to_radian(degree: f32) -> f32 {
        degree * std::f32::consts::PI / 180.0
    }

    /// Linear interpolation, `x` at `a = 0` and `y` at `a = 1`.
    #[inline]
    pub fn mix(x: f32, y: f32, a: f32) -> f32 {
        x * (1.0 - a) + y * a
    }

    /// Normalize `vector`, refusing zero-length and non-finite input.
    pub fn try_normalize(vector: glam::Vec3) -> Result<glam::Vec3> {
        vector
            .try_normalize()
            .ok_or(Error::DegenerateVector { vector })
    }

}
