//! Exact-equality deduplication of positions and UV coordinates.
//!
//! Two coordinates are the same only if all three components compare equal
//! as floats. No epsilon is applied: near-duplicates stay distinct.

use crate::float_types::ImportReal;
use hashbrown::HashMap;
use nalgebra::Vector3;
use std::hash::{Hash, Hasher};

/// Hash key for a 3-component coordinate with float equality semantics.
///
/// `-0.0` and `+0.0` map to the same key, as they compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordKey([u32; 3]);

impl CoordKey {
    pub fn new(v: &Vector3<ImportReal>) -> Self {
        // adding +0.0 turns -0.0 into +0.0 and leaves every other value alone
        CoordKey([(v.x + 0.0).to_bits(), (v.y + 0.0).to_bits(), (v.z + 0.0).to_bits()])
    }
}

/// Boost-style `hash_combine` step.
#[inline]
const fn hash_combine(seed: u64, value: u64) -> u64 {
    seed ^ (value
        .wrapping_add(0x9e37_79b9_7f4a_7c15)
        .wrapping_add(seed << 6)
        .wrapping_add(seed >> 2))
}

impl Hash for CoordKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let combined = self
            .0
            .iter()
            .fold(0u64, |seed, &bits| hash_combine(seed, bits as u64));
        state.write_u64(combined);
    }
}

/// Insertion-ordered set of unique coordinates.
///
/// Indices are handed out in first-occurrence order and never change.
#[derive(Debug, Clone, Default)]
pub struct UniqueCoords {
    indices: HashMap<CoordKey, usize>,
    ordered: Vec<Vector3<ImportReal>>,
}

impl UniqueCoords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `coord`, inserting it if unseen.
    pub fn insert(&mut self, coord: &Vector3<ImportReal>) -> usize {
        let next = self.ordered.len();
        let index = *self.indices.entry(CoordKey::new(coord)).or_insert(next);
        if index == next {
            self.ordered.push(*coord);
        }
        index
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Unique coordinates, in first-occurrence order.
    pub fn as_slice(&self) -> &[Vector3<ImportReal>] {
        &self.ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(v: Vector3<ImportReal>) -> u64 {
        let mut hasher = DefaultHasher::new();
        CoordKey::new(&v).hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn first_occurrence_order() {
        let mut set = UniqueCoords::new();
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(3.0, 2.0, 1.0);
        assert_eq!(set.insert(&a), 0);
        assert_eq!(set.insert(&b), 1);
        assert_eq!(set.insert(&a), 0);
        assert_eq!(set.len(), 2);
        assert_eq!(set.as_slice(), &[a, b]);
        assert_eq!(set.insert(&b), 1);
    }

    #[test]
    fn near_duplicates_are_kept_apart() {
        let mut set = UniqueCoords::new();
        let a = Vector3::new(1.0f32, 0.0, 0.0);
        let b = Vector3::new(f32::from_bits(1.0f32.to_bits() + 1), 0.0, 0.0);
        set.insert(&a);
        set.insert(&b);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn signed_zero_is_one_coordinate() {
        let mut set = UniqueCoords::new();
        set.insert(&Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(set.insert(&Vector3::new(-0.0, 1.0, -0.0)), 0);
    }

    #[test]
    fn hash_mixes_every_component() {
        let base = Vector3::new(1.0f32, 2.0, 3.0);
        let bump = |c: f32| f32::from_bits(c.to_bits() ^ 1);
        let base_hash = hash_of(base);
        assert_ne!(base_hash, hash_of(Vector3::new(bump(1.0), 2.0, 3.0)));
        assert_ne!(base_hash, hash_of(Vector3::new(1.0, bump(2.0), 3.0)));
        assert_ne!(base_hash, hash_of(Vector3::new(1.0, 2.0, bump(3.0))));
        // component order matters
        assert_ne!(base_hash, hash_of(Vector3::new(3.0, 2.0, 1.0)));
    }
}
