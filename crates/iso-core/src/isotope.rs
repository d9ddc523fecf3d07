//! Isotope identifiers and composition bases.
//!
//! Isotopes are encoded as `ZZZAAA` integers: `Z * 1000 + A`, where `Z` is the
//! atomic number and `A` the mass number. U-235 is `92235`, H-1 is `1001`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{ISOTOPE_ID_FACTOR, MAX_ATOMIC_NUMBER};
use crate::error::CompositionError;

/// A validated `ZZZAAA` isotope identifier.
///
/// Construction guarantees `1 <= Z <= 103` and `A >= Z`.
///
/// # Examples
///
/// ```
/// use iso_core::IsotopeId;
/// let u235 = IsotopeId::new(92235).unwrap();
/// assert_eq!(u235.atomic_number(), 92);
/// assert_eq!(u235.mass_number(), 235);
/// assert!(IsotopeId::new(104300).is_err());
/// ```
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "i64", into = "u32")]
pub struct IsotopeId(u32);

impl IsotopeId {
    /// Validate and wrap a raw `ZZZAAA` integer.
    pub fn new(raw: i64) -> Result<Self, CompositionError> {
        if raw <= 0 || raw > u32::MAX as i64 {
            return Err(CompositionError::InvalidIsotope(raw));
        }
        let id = raw as u32;
        let z = id / ISOTOPE_ID_FACTOR;
        let a = id % ISOTOPE_ID_FACTOR;
        if !(1..=MAX_ATOMIC_NUMBER).contains(&z) || a < z {
            return Err(CompositionError::InvalidIsotope(raw));
        }
        Ok(Self(id))
    }

    /// Build from atomic and mass numbers.
    pub fn from_za(z: u32, a: u32) -> Result<Self, CompositionError> {
        if a >= ISOTOPE_ID_FACTOR {
            return Err(CompositionError::InvalidIsotope(
                z as i64 * ISOTOPE_ID_FACTOR as i64 + a as i64,
            ));
        }
        Self::new(z as i64 * ISOTOPE_ID_FACTOR as i64 + a as i64)
    }

    /// The raw `ZZZAAA` value.
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Atomic number `Z`.
    pub fn atomic_number(&self) -> u32 {
        self.0 / ISOTOPE_ID_FACTOR
    }

    /// Mass number `A`.
    pub fn mass_number(&self) -> u32 {
        self.0 % ISOTOPE_ID_FACTOR
    }

    /// Mass number as a float, the per-atom weight used for basis conversion.
    pub(crate) fn weight(&self) -> f64 {
        self.mass_number() as f64
    }
}

impl fmt::Display for IsotopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for IsotopeId {
    type Error = CompositionError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<IsotopeId> for u32 {
    fn from(id: IsotopeId) -> Self {
        id.0
    }
}

/// Whether quantities describe mass or atom (mole) proportions.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Basis {
    /// Quantities are masses.
    #[default]
    Mass,
    /// Quantities are atom counts.
    Atom,
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mass => f.write_str("mass"),
            Self::Atom => f.write_str("atom"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // --- decomposition ---

    #[test]
    fn decomposes_uranium() {
        let id = IsotopeId::new(92238).unwrap();
        assert_eq!(id.atomic_number(), 92);
        assert_eq!(id.mass_number(), 238);
        assert_eq!(id.raw(), 92238);
    }

    #[test]
    fn hydrogen_is_valid() {
        let h1 = IsotopeId::new(1001).unwrap();
        assert_eq!(h1.atomic_number(), 1);
        assert_eq!(h1.mass_number(), 1);
    }

    #[test]
    fn lawrencium_is_upper_bound() {
        assert!(IsotopeId::new(103262).is_ok());
        assert_eq!(
            IsotopeId::new(104267),
            Err(CompositionError::InvalidIsotope(104267))
        );
    }

    // --- rejection ---

    #[test]
    fn zero_atomic_number_rejected() {
        assert_eq!(IsotopeId::new(1), Err(CompositionError::InvalidIsotope(1)));
    }

    #[test]
    fn mass_below_atomic_number_rejected() {
        // Z = 92, A = 10
        assert!(IsotopeId::new(92010).is_err());
    }

    #[test]
    fn negative_and_zero_rejected() {
        assert!(IsotopeId::new(0).is_err());
        assert!(IsotopeId::new(-92235).is_err());
    }

    #[test]
    fn from_za_matches_new() {
        assert_eq!(IsotopeId::from_za(94, 239), IsotopeId::new(94239));
        assert!(IsotopeId::from_za(94, 1239).is_err());
    }

    // --- serde ---

    #[test]
    fn deserializes_from_integer() {
        let id: IsotopeId = serde_json::from_str("92235").unwrap();
        assert_eq!(id.raw(), 92235);
        assert!(serde_json::from_str::<IsotopeId>("999").is_err());
    }

    #[test]
    fn basis_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Basis::Atom).unwrap(), "\"atom\"");
        let b: Basis = serde_json::from_str("\"mass\"").unwrap();
        assert_eq!(b, Basis::Mass);
    }

    proptest! {
        #[test]
        fn valid_ids_round_trip(z in 1u32..=103, extra in 0u32..(1000 - 103)) {
            let a = z + extra;
            let id = IsotopeId::from_za(z, a).unwrap();
            prop_assert_eq!(id.atomic_number(), z);
            prop_assert_eq!(id.mass_number(), a);
        }
    }
}
