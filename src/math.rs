//! # Math Utilities
//!
//! Small helpers shared by the renderables: a seedable random-value generator with the
//! handful of sampling forms the scene needs, a builder for index-driven sequences, and a
//! triangle centroid.
//!
//! ## Random Values
//!
//! [`Random`] wraps a [`rand`] generator and exposes one method per sampling form:
//!
//! - [`Random::unit`]: a value in `[0, 1)`.
//! - [`Random::below`]: a value between `0` and `max` (the one-bound form).
//! - [`Random::range`]: a value in `[min, max)`.
//! - [`Random::pick`]: one element of a slice.
//!
//! Seeding with [`Random::seeded`] makes every particle field and color buffer built from
//! the generator reproducible, which is what the tests rely on.
//!
//! ```rust
//! use snowglobe::math::Random;
//!
//! let mut random = Random::seeded(7);
//! let x = random.range(-20.0, 20.0);
//! assert!((-20.0..20.0).contains(&x));
//! ```

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A random-value generator with the sampling forms used to build particle and color data.
///
/// The generator type defaults to [`SmallRng`], which is fast, seedable and available on
/// every target including `wasm32` (entropy comes from `getrandom`'s `js` backend there).
#[derive(Debug, Clone)]
pub struct Random<R = SmallRng> {
    rng: R,
}

impl Random<SmallRng> {
    /// Creates a generator seeded from the operating system (or the browser) entropy source.
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Creates a generator with a fixed seed. Two generators with the same seed produce the
    /// same sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Uses `seed` when present, entropy otherwise.
    pub fn from_seed_or_entropy(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> Random<R> {
    /// Returns a value in `[0, 1)`.
    pub fn unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    /// Returns a value between `0` and `max`.
    ///
    /// `0` is included and `max` is excluded, so for a negative `max` the result lies in
    /// `(max, 0]`.
    pub fn below(&mut self, max: f32) -> f32 {
        self.range(0.0, max)
    }

    /// Returns a value in `[min, max)`.
    ///
    /// Equal bounds return `min`. Reversed bounds interpolate from `min` towards `max`,
    /// which keeps `min` reachable and `max` excluded.
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if min < max {
            self.rng.gen_range(min..max)
        } else if min == max {
            min
        } else {
            min + self.unit() * (max - min)
        }
    }

    /// Returns a uniformly chosen element of `items`, or `None` when the slice is empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..items.len());
        items.get(index)
    }
}

/// Builds a sequence of `size` elements by calling `f` with each index in order.
pub fn fill<T>(size: usize, f: impl FnMut(usize) -> T) -> Vec<T> {
    (0..size).map(f).collect()
}

/// Returns the component-wise mean of the three corners of `triangle`.
pub fn centroid<const D: usize>(triangle: &[[f32; D]; 3]) -> [f32; D] {
    let mut result = [0.0; D];
    for (axis, value) in result.iter_mut().enumerate() {
        *value = (triangle[0][axis] + triangle[1][axis] + triangle[2][axis]) / 3.0;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_values_stay_in_half_open_interval() {
        let mut random = Random::seeded(1);
        for _ in 0..10_000 {
            let value = random.unit();
            assert!((0.0..1.0).contains(&value), "{value}");
        }
    }

    #[test]
    fn range_values_stay_in_bounds() {
        let mut random = Random::seeded(2);
        for _ in 0..10_000 {
            let value = random.range(1.0, 6.0);
            assert!((1.0..6.0).contains(&value), "{value}");
        }
        assert_eq!(random.range(3.5, 3.5), 3.5);
    }

    #[test]
    fn below_with_negative_bound_lands_between_bound_and_zero() {
        let mut random = Random::seeded(3);
        for _ in 0..1_000 {
            let value = random.below(-50.0);
            assert!(value <= 0.0 && value > -50.0, "{value}");
        }
    }

    #[test]
    fn pick_returns_an_element_of_the_slice() {
        let mut random = Random::seeded(4);
        let items = ["a", "b", "c"];
        for _ in 0..100 {
            let picked = random.pick(&items).copied();
            assert!(matches!(picked, Some("a" | "b" | "c")));
        }
        let empty: [u8; 0] = [];
        assert_eq!(random.pick(&empty), None);
    }

    #[test]
    fn same_seed_gives_same_sequence() {
        let mut a = Random::seeded(99);
        let mut b = Random::seeded(99);
        let first: Vec<f32> = fill(16, |_| a.unit());
        let second: Vec<f32> = fill(16, |_| b.unit());
        assert_eq!(first, second);
    }

    #[test]
    fn fill_passes_indices_in_order() {
        assert_eq!(fill(4, |i| i * 2), vec![0, 2, 4, 6]);
        assert!(fill(0, |i| i).is_empty());
    }

    #[test]
    fn centroid_averages_corners() {
        let triangle = [[0.0, 0.0, 0.0], [3.0, 0.0, 3.0], [0.0, 3.0, 6.0]];
        assert_eq!(centroid(&triangle), [1.0, 1.0, 3.0]);
    }
}
