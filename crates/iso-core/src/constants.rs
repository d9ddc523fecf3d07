//! Numeric tolerances and isotope encoding constants.

/// Multiplier separating atomic number from mass number in an isotope id.
///
/// `id = Z * ISOTOPE_ID_FACTOR + A`.
pub const ISOTOPE_ID_FACTOR: u32 = 1000;

/// Largest atomic number accepted (lawrencium).
pub const MAX_ATOMIC_NUMBER: u32 = 103;

/// Smallest meaningful quantity of a single isotope, in mass units.
///
/// Used for equality, zero checks, and subtraction underflow.
pub const MASS_TOLERANCE: f64 = 1e-6;

/// Smallest meaningful fraction. Normalized mass fractions sum to one
/// within this tolerance.
pub const PERCENT_TOLERANCE: f64 = 1e-14;
