//! Copy-on-write handle over a shared composition.

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};
use std::sync::Arc;

use tracing::trace;

use iso_core::error::{CompositionError, DecayError, PersistError, RecipeError};
use iso_core::{Basis, Composition, CompositionMap, IsotopeId, StateId};
use iso_decay::DecayChainCache;
use iso_recipe::{RecipeRegistry, Recorder};

/// A lightweight value referencing one shared [`Composition`].
///
/// Cloning a handle shares the composition. No operation edits a shared
/// composition in place: every change builds a new composition and rebinds
/// only the handle it was called on.
///
/// # Examples
///
/// ```
/// use iso_core::Basis;
/// use iso_vector::IsoVector;
///
/// let a = IsoVector::from_raw([(92235, 1.0)], Basis::Mass).unwrap();
/// let b = IsoVector::from_raw([(92238, 3.0)], Basis::Mass).unwrap();
/// let sum = &a + &b;
/// assert_eq!(sum.total_mass(), 4.0);
/// assert_eq!((&sum - &b).unwrap(), a);
/// ```
#[derive(Clone, Debug)]
pub struct IsoVector {
    composition: Arc<Composition>,
}

impl IsoVector {
    /// Handle over a new root composition.
    pub fn new(fractions: CompositionMap, basis: Basis) -> Result<Self, CompositionError> {
        Ok(Self::from_composition(Arc::new(Composition::new(fractions, basis)?)))
    }

    /// Handle over a new root composition built from raw `ZZZAAA` ids.
    pub fn from_raw<I>(entries: I, basis: Basis) -> Result<Self, CompositionError>
    where
        I: IntoIterator<Item = (i64, f64)>,
    {
        Ok(Self::from_composition(Arc::new(Composition::from_raw(entries, basis)?)))
    }

    pub fn from_composition(composition: Arc<Composition>) -> Self {
        Self { composition }
    }

    /// Handle sharing the interned recipe `name`.
    pub fn from_recipe(registry: &RecipeRegistry, name: &str) -> Result<Self, RecipeError> {
        Ok(Self::from_composition(registry.lookup(name)?))
    }

    /// The wrapped composition.
    pub fn composition(&self) -> &Arc<Composition> {
        &self.composition
    }

    /// Whether both handles reference the same composition object.
    pub fn shares_composition(&self, other: &IsoVector) -> bool {
        Arc::ptr_eq(&self.composition, &other.composition)
    }

    // --- reads ---

    pub fn state_id(&self) -> StateId {
        self.composition.state_id()
    }

    pub fn is_logged(&self) -> bool {
        self.composition.is_logged()
    }

    pub fn mass_fraction(&self, tope: IsotopeId) -> f64 {
        self.composition.mass_fraction(tope)
    }

    pub fn atom_fraction(&self, tope: IsotopeId) -> f64 {
        self.composition.atom_fraction(tope)
    }

    pub fn mass_fractions(&self) -> CompositionMap {
        self.composition.mass_fractions()
    }

    pub fn atom_fractions(&self) -> CompositionMap {
        self.composition.atom_fractions()
    }

    pub fn quantity(&self, tope: IsotopeId) -> f64 {
        self.composition.quantity(tope)
    }

    pub fn total_mass(&self) -> f64 {
        self.composition.total_mass()
    }

    pub fn mass_normalizer(&self) -> f64 {
        self.composition.mass_normalizer()
    }

    pub fn is_zero(&self, tope: IsotopeId) -> bool {
        self.composition.is_zero(tope)
    }

    /// Elapsed time of the decay that produced the wrapped composition.
    pub fn decay_time(&self) -> i64 {
        self.composition.decay_time()
    }

    pub fn parent(&self) -> Option<Arc<Composition>> {
        self.composition.parent()
    }

    // --- arithmetic ---

    pub fn add(&self, other: &IsoVector) -> IsoVector {
        Self::from_composition(Arc::new(self.composition.add(&other.composition)))
    }

    /// Fails with [`CompositionError::Range`] if `other` holds more of any
    /// isotope than `self`, beyond the mass tolerance.
    pub fn subtract(&self, other: &IsoVector) -> Result<IsoVector, CompositionError> {
        Ok(Self::from_composition(Arc::new(
            self.composition.subtract(&other.composition)?,
        )))
    }

    pub fn scale(&self, factor: f64) -> Result<IsoVector, CompositionError> {
        Ok(Self::from_composition(Arc::new(self.composition.scale(factor)?)))
    }

    pub fn divide(&self, divisor: f64) -> Result<IsoVector, CompositionError> {
        Ok(Self::from_composition(Arc::new(self.composition.divide(divisor)?)))
    }

    /// Rebind to a unit-mass copy. No-op when already at unit mass.
    pub fn minimize(&mut self) {
        if self.composition.mass_normalizer() != 1.0 {
            self.composition = Arc::new(self.composition.minimized());
        }
    }

    // --- decay ---

    /// Decay for `elapsed_time` and rebind to the cached daughter.
    ///
    /// On error the handle is left unchanged.
    pub fn decay(&mut self, cache: &DecayChainCache, elapsed_time: i64) -> Result<(), DecayError> {
        let daughter = cache.get_or_compute_daughter(&self.composition, elapsed_time)?;
        trace!(
            elapsed_time,
            parent_state = self.composition.state_id(),
            "rebinding to decayed composition"
        );
        self.composition = daughter;
        Ok(())
    }

    /// Decayed copy of this handle; `self` is unchanged.
    pub fn decayed(&self, cache: &DecayChainCache, elapsed_time: i64) -> Result<IsoVector, DecayError> {
        let mut copy = self.clone();
        copy.decay(cache, elapsed_time)?;
        Ok(copy)
    }

    // --- persistence ---

    /// Log the wrapped composition. Returns `true` if a new record was written.
    pub fn record(&self, recorder: &Recorder) -> Result<bool, PersistError> {
        recorder.record(&self.composition)
    }

    /// Human-readable listing of mass fractions.
    pub fn detail(&self) -> String {
        self.composition.detail()
    }
}

/// Quantities equal within the mass tolerance.
impl PartialEq for IsoVector {
    fn eq(&self, other: &Self) -> bool {
        self.shares_composition(other) || self.composition.approx_eq(&other.composition)
    }
}

impl fmt::Display for IsoVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IsoVector(state={}, mass={}, isotopes={})",
            self.state_id(),
            self.total_mass(),
            self.composition.fractions().len()
        )
    }
}

impl Add<&IsoVector> for &IsoVector {
    type Output = IsoVector;

    fn add(self, rhs: &IsoVector) -> IsoVector {
        IsoVector::add(self, rhs)
    }
}

impl Add for IsoVector {
    type Output = IsoVector;

    fn add(self, rhs: IsoVector) -> IsoVector {
        IsoVector::add(&self, &rhs)
    }
}

impl Sub<&IsoVector> for &IsoVector {
    type Output = Result<IsoVector, CompositionError>;

    fn sub(self, rhs: &IsoVector) -> Self::Output {
        self.subtract(rhs)
    }
}

impl Mul<f64> for &IsoVector {
    type Output = Result<IsoVector, CompositionError>;

    fn mul(self, factor: f64) -> Self::Output {
        self.scale(factor)
    }
}

impl Mul<&IsoVector> for f64 {
    type Output = Result<IsoVector, CompositionError>;

    fn mul(self, v: &IsoVector) -> Self::Output {
        v.scale(self)
    }
}

impl Div<f64> for &IsoVector {
    type Output = Result<IsoVector, CompositionError>;

    fn div(self, divisor: f64) -> Self::Output {
        self.divide(divisor)
    }
}
