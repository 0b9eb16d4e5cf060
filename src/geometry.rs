//! Snowflake geometry input.
//!
//! The snowflake is a triangle soup: a flat list of `[x, y, z]` points where every three
//! consecutive points form one triangle. It arrives as JSON, either as the bare list or
//! wrapped as `{ "positions": [...] }`. A default snowflake ships with the crate.

use serde::Deserialize;

use crate::error::SnowError;

const EMBEDDED_SNOWFLAKE: &str = include_str!("../assets/snowflake.json");

#[derive(Deserialize)]
#[serde(untagged)]
enum GeometryDocument {
    Points(Vec<[f32; 3]>),
    Complex { positions: Vec<[f32; 3]> },
}

/// An ordered list of 3D points.
#[derive(Debug, Clone, PartialEq)]
pub struct PointList {
    points: Vec<[f32; 3]>,
}

impl PointList {
    pub fn new(points: Vec<[f32; 3]>) -> Result<Self, SnowError> {
        if points.is_empty() {
            return Err(SnowError::EmptyGeometry);
        }
        Ok(Self { points })
    }

    pub fn from_json(json: &str) -> Result<Self, SnowError> {
        let points = match serde_json::from_str::<GeometryDocument>(json)? {
            GeometryDocument::Points(points) => points,
            GeometryDocument::Complex { positions } => positions,
        };
        Self::new(points)
    }

    /// The snowflake bundled with the crate.
    pub fn embedded() -> Result<Self, SnowError> {
        Self::from_json(EMBEDDED_SNOWFLAKE)
    }

    pub fn points(&self) -> &[[f32; 3]] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_and_wrapped_lists() {
        let bare = PointList::from_json("[[0, 1, 2], [3, 4, 5], [6, 7, 8]]").unwrap();
        let wrapped =
            PointList::from_json(r#"{"positions": [[0, 1, 2], [3, 4, 5], [6, 7, 8]]}"#).unwrap();
        assert_eq!(bare, wrapped);
        assert_eq!(bare.points()[1], [3.0, 4.0, 5.0]);
    }

    #[test]
    fn rejects_malformed_and_empty_input() {
        assert!(matches!(
            PointList::from_json("[[0, 1]]"),
            Err(SnowError::Geometry(_))
        ));
        assert!(matches!(
            PointList::from_json("[]"),
            Err(SnowError::EmptyGeometry)
        ));
    }

    #[test]
    fn embedded_snowflake_is_a_whole_triangle_soup() {
        let snowflake = PointList::embedded().unwrap();
        assert!(snowflake.len() >= 3);
        assert_eq!(snowflake.len() % 3, 0);
    }
}
