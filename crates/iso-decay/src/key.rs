//! Content hashes of compositions.

use std::fmt;

use iso_core::{Composition, CompositionMap};

/// BLAKE3 digest of a composition map.
///
/// Hashes `(isotope id, f64 bits)` pairs in ascending isotope order. Two maps
/// have equal keys iff they are bit-identical.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositionKey([u8; 32]);

impl CompositionKey {
    /// Key over a composition's stored quantities, magnitude included.
    pub fn of(composition: &Composition) -> Self {
        Self::of_map(composition.fractions())
    }

    /// Key over a composition's mass fractions. Compositions with equal
    /// proportions share it whatever their total mass.
    pub fn normalized(composition: &Composition) -> Self {
        Self::of_map(&composition.mass_fractions())
    }

    pub fn of_map(fractions: &CompositionMap) -> Self {
        let mut hasher = blake3::Hasher::new();
        for (id, q) in fractions {
            hasher.update(&id.raw().to_le_bytes());
            // Fold -0.0 into 0.0 so sign of zero does not split entries.
            let q = if *q == 0.0 { 0.0f64 } else { *q };
            hasher.update(&q.to_bits().to_le_bytes());
        }
        Self(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for CompositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0[..8]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iso_core::Basis;

    fn comp(entries: &[(i64, f64)]) -> Composition {
        Composition::from_raw(entries.iter().copied(), Basis::Mass).unwrap()
    }

    #[test]
    fn equal_content_equal_key() {
        let a = comp(&[(92235, 0.0072), (92238, 0.9928)]);
        let b = comp(&[(92238, 0.9928), (92235, 0.0072)]);
        assert_eq!(CompositionKey::of(&a), CompositionKey::of(&b));
    }

    #[test]
    fn different_content_different_key() {
        let a = comp(&[(92235, 0.0072), (92238, 0.9928)]);
        let b = comp(&[(92235, 0.0073), (92238, 0.9928)]);
        let c = comp(&[(92235, 0.0072), (92238, 0.9928), (94239, 0.0)]);
        assert_ne!(CompositionKey::of(&a), CompositionKey::of(&b));
        assert_ne!(CompositionKey::of(&a), CompositionKey::of(&c));
    }

    #[test]
    fn normalized_key_ignores_magnitude() {
        let a = comp(&[(92235, 0.0072), (92238, 0.9928)]);
        let b = comp(&[(92235, 0.0144), (92238, 1.9856)]);
        assert_ne!(CompositionKey::of(&a), CompositionKey::of(&b));
        assert_eq!(CompositionKey::normalized(&a), CompositionKey::normalized(&b));
        assert_eq!(CompositionKey::normalized(&a), CompositionKey::of_map(&a.mass_fractions()));
    }

    #[test]
    fn magnitude_is_part_of_the_key() {
        let a = comp(&[(92235, 1.0)]);
        let b = comp(&[(92235, 2.0)]);
        assert_ne!(CompositionKey::of(&a), CompositionKey::of(&b));
    }

    #[test]
    fn display_is_short_hex() {
        let key = CompositionKey::of(&comp(&[(1001, 1.0)]));
        let shown = key.to_string();
        assert_eq!(shown.len(), 16);
        assert!(shown.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
