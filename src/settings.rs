//! Startup configuration.
//!
//! Every field has a default matching the classic snow globe look. Native builds can
//! override the particle count and the RNG seed through the environment:
//!
//! - `SNOWGLOBE_PARTICLES`: number of snowstorm particles.
//! - `SNOWGLOBE_SEED`: seed for particle and color generation (random when unset).
//!
//! Values that fail to parse are logged and ignored, as are particle counts of zero or
//! beyond what one instanced draw call can cover.

use crate::scene::{Camera, Projection};
use crate::snowstorm::DEFAULT_PARTICLE_COUNT;

pub const PARTICLES_VAR: &str = "SNOWGLOBE_PARTICLES";
pub const SEED_VAR: &str = "SNOWGLOBE_SEED";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub particle_count: usize,
    /// Seed for the particle field and snowflake colors. `None` draws from entropy.
    pub seed: Option<u64>,
    pub camera: Camera,
    pub projection: Projection,
    /// Fraction of the remaining distance the snowflake rotation covers each frame.
    pub smoothing: f32,
    pub clear_color: wgpu::Color,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            seed: None,
            camera: Camera::default(),
            projection: Projection {
                fov_y: std::f32::consts::FRAC_PI_4,
                near: 0.01,
                far: 100.0,
            },
            smoothing: 0.1,
            clear_color: wgpu::Color {
                r: 0.01,
                g: 0.02,
                b: 0.06,
                a: 1.0,
            },
        }
    }
}

impl Settings {
    /// Defaults with overrides read through `lookup` (normally [`std::env::var`]).
    pub fn with_overrides(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        match parse_var::<usize>(&lookup, PARTICLES_VAR) {
            Some(0) => log::warn!("Ignoring {PARTICLES_VAR}=0: the snowstorm needs particles"),
            Some(count) if u32::try_from(count).is_err() => {
                log::warn!("Ignoring {PARTICLES_VAR}={count}: too many particles for one draw call")
            }
            Some(count) => settings.particle_count = count,
            None => {}
        }
        settings.seed = parse_var(&lookup, SEED_VAR).or(settings.seed);
        settings
    }

    pub fn from_env() -> Self {
        Self::with_overrides(|name| std::env::var(name).ok())
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => {
            log::info!("{name} = {raw}");
            Some(value)
        }
        Err(err) => {
            log::warn!("Ignoring {name}={raw:?}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_scene() {
        let settings = Settings::default();
        assert_eq!(settings.particle_count, 6000);
        assert_eq!(settings.seed, None);
        assert_eq!(settings.camera.eye, nalgebra_glm::vec3(0.0, 0.0, 5.0));
        assert_eq!(settings.projection.near, 0.01);
        assert_eq!(settings.projection.far, 100.0);
    }

    #[test]
    fn overrides_apply_and_bad_values_are_ignored() {
        let settings = Settings::with_overrides(|name| match name {
            PARTICLES_VAR => Some(" 1200 ".to_string()),
            SEED_VAR => Some("not-a-number".to_string()),
            _ => None,
        });
        assert_eq!(settings.particle_count, 1200);
        assert_eq!(settings.seed, None);

        let seeded = Settings::with_overrides(|name| (name == SEED_VAR).then(|| "42".to_string()));
        assert_eq!(seeded.seed, Some(42));
        assert_eq!(seeded.particle_count, DEFAULT_PARTICLE_COUNT);
    }

    #[test]
    fn empty_and_oversized_particle_counts_keep_the_default() {
        let oversized = (u64::from(u32::MAX) + 1).to_string();
        for raw in ["0", oversized.as_str()] {
            let settings =
                Settings::with_overrides(|name| (name == PARTICLES_VAR).then(|| raw.to_string()));
            assert_eq!(settings.particle_count, DEFAULT_PARTICLE_COUNT, "{raw}");
        }
    }
}
