//! # Shaders
//!
//! WGSL stage sources for the two snow programs, registered under the identifiers the
//! renderables ask for, plus the prelude every program starts with.
//!
//! A program is assembled by [`compose`]: prelude, then vertex stage, then fragment stage,
//! in one module. The prelude declares the shared math constants and the `Uniforms` block
//! bound at `@group(0) @binding(0)`, whose layout mirrors
//! [`UniformBuffer`](crate::uniform_buffer::UniformBuffer).

use crate::error::SnowError;

pub const PRELUDE: &str = include_str!("shaders/prelude.wgsl");

pub const SNOWSTORM_VERT: &str = "snowstorm-vert";
pub const SNOWSTORM_FRAG: &str = "snowstorm-frag";
pub const SNOWFLAKE_VERT: &str = "snowflake-vert";
pub const SNOWFLAKE_FRAG: &str = "snowflake-frag";

const STAGES: [(&str, &str); 4] = [
    (SNOWSTORM_VERT, include_str!("shaders/snowstorm.vert.wgsl")),
    (SNOWSTORM_FRAG, include_str!("shaders/snowstorm.frag.wgsl")),
    (SNOWFLAKE_VERT, include_str!("shaders/snowflake.vert.wgsl")),
    (SNOWFLAKE_FRAG, include_str!("shaders/snowflake.frag.wgsl")),
];

/// Entry point every vertex stage defines.
pub const VERTEX_ENTRY: &str = "vertex_main";
/// Entry point every fragment stage defines.
pub const FRAGMENT_ENTRY: &str = "fragment_main";

/// Looks up a stage source by identifier.
pub fn source(id: &str) -> Result<&'static str, SnowError> {
    STAGES
        .iter()
        .find(|(stage_id, _)| *stage_id == id)
        .map(|(_, source)| *source)
        .ok_or_else(|| SnowError::MissingShader(id.to_string()))
}

/// Builds a complete WGSL module from the prelude and the two named stages.
pub fn compose(vertex_id: &str, fragment_id: &str) -> Result<String, SnowError> {
    let vertex = source(vertex_id)?;
    let fragment = source(fragment_id)?;
    Ok(format!("{PRELUDE}\n{vertex}\n{fragment}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registered_stage_resolves() {
        for id in [SNOWSTORM_VERT, SNOWSTORM_FRAG, SNOWFLAKE_VERT, SNOWFLAKE_FRAG] {
            assert!(source(id).is_ok(), "{id}");
        }
    }

    #[test]
    fn unknown_stage_is_reported_by_id() {
        match source("rain-vert") {
            Err(SnowError::MissingShader(id)) => assert_eq!(id, "rain-vert"),
            other => panic!("unexpected lookup result: {other:?}"),
        }
    }

    #[test]
    fn composed_program_orders_prelude_vertex_fragment() {
        let program = compose(SNOWSTORM_VERT, SNOWSTORM_FRAG).unwrap();
        let prelude_at = program.find("struct Uniforms").unwrap();
        let vertex_at = program.find(VERTEX_ENTRY).unwrap();
        let fragment_at = program.find(FRAGMENT_ENTRY).unwrap();
        assert!(prelude_at < vertex_at && vertex_at < fragment_at);
        assert!(program.contains("const TWO_PI"));
    }
}
