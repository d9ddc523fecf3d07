//! Mass-basis isotopic compositions.
//!
//! A [`Composition`] stores absolute per-isotope quantities on a mass basis
//! together with two normalizers:
//! - `mass_normalizer = Σ q[i]`, so `mass_fraction(i) = q[i] / mass_normalizer`
//! - `atom_normalizer = Σ q[i] / A[i]`, so `atom_fraction(i) = (q[i] / A[i]) / atom_normalizer`
//!
//! Reads never rescale the map. [`Composition::minimize`] folds the mass
//! normalizer back into the map when a canonical, unit-mass form is needed.
//!
//! A composition becomes logged once it receives a positive state id. The id is
//! set at most once and a logged composition never changes. Shared compositions
//! live behind `Arc`; arithmetic always builds a new, unlogged composition.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::{Arc, OnceLock, Weak};

use crate::constants::MASS_TOLERANCE;
use crate::error::CompositionError;
use crate::isotope::{Basis, IsotopeId};

/// Permanent identity of a logged composition. Zero means "not logged".
pub type StateId = u64;

/// Isotope → quantity map. Ordered so iteration and hashing are deterministic.
pub type CompositionMap = BTreeMap<IsotopeId, f64>;

/// An isotopic composition stored on a mass basis.
#[derive(Debug)]
pub struct Composition {
    state_id: OnceLock<StateId>,
    fractions: CompositionMap,
    mass_normalizer: f64,
    atom_normalizer: f64,
    parent: Option<Weak<Composition>>,
    decay_time: i64,
}

fn validate_quantity(isotope: IsotopeId, value: f64) -> Result<(), CompositionError> {
    if !value.is_finite() {
        return Err(CompositionError::NonFiniteFraction { isotope });
    }
    if value < 0.0 {
        return Err(CompositionError::NegativeFraction { isotope, value });
    }
    Ok(())
}

/// Convert atom-basis quantities to normalized mass fractions.
///
/// `m[i] = n[i] * A[i] / Σ n[j] * A[j]`
fn massify(atoms: &CompositionMap) -> CompositionMap {
    let total: f64 = atoms.iter().map(|(id, n)| n * id.weight()).sum();
    if total <= 0.0 {
        return atoms.keys().map(|id| (*id, 0.0)).collect();
    }
    atoms
        .iter()
        .map(|(id, n)| (*id, n * id.weight() / total))
        .collect()
}

fn normalizers(fractions: &CompositionMap) -> (f64, f64) {
    fractions
        .iter()
        .fold((0.0, 0.0), |(mass, atom), (id, q)| {
            (mass + q, atom + q / id.weight())
        })
}

impl Composition {
    /// Build a root composition from validated isotope ids.
    ///
    /// Every quantity must be finite and non-negative. Atom-basis input is
    /// converted to normalized mass fractions; mass-basis input keeps its
    /// magnitude.
    pub fn new(fractions: CompositionMap, basis: Basis) -> Result<Self, CompositionError> {
        for (id, q) in &fractions {
            validate_quantity(*id, *q)?;
        }
        let fractions = match basis {
            Basis::Mass => fractions,
            Basis::Atom => massify(&fractions),
        };
        Ok(Self::from_quantities(fractions))
    }

    /// Build a root composition from raw `ZZZAAA` integers.
    ///
    /// Repeated ids accumulate.
    ///
    /// # Examples
    ///
    /// ```
    /// use iso_core::{Basis, Composition, IsotopeId};
    /// let nu = Composition::from_raw([(92235, 0.0072), (92238, 0.9928)], Basis::Mass).unwrap();
    /// let u235 = IsotopeId::new(92235).unwrap();
    /// assert!((nu.mass_fraction(u235) - 0.0072).abs() < 1e-12);
    /// ```
    pub fn from_raw<I>(entries: I, basis: Basis) -> Result<Self, CompositionError>
    where
        I: IntoIterator<Item = (i64, f64)>,
    {
        let mut fractions = CompositionMap::new();
        for (raw, q) in entries {
            let id = IsotopeId::new(raw)?;
            validate_quantity(id, q)?;
            *fractions.entry(id).or_insert(0.0) += q;
        }
        Self::new(fractions, basis)
    }

    /// Build a daughter of `parent` produced by decaying for `decay_time`.
    ///
    /// The daughter holds a weak back-reference only; it never keeps the
    /// parent alive.
    pub fn daughter_of(
        parent: &Arc<Composition>,
        fractions: CompositionMap,
        decay_time: i64,
    ) -> Result<Self, CompositionError> {
        let mut daughter = Self::new(fractions, Basis::Mass)?;
        daughter.parent = Some(Arc::downgrade(parent));
        daughter.decay_time = decay_time;
        Ok(daughter)
    }

    /// Trusted constructor: quantities are already validated and mass-basis.
    fn from_quantities(fractions: CompositionMap) -> Self {
        let (mass_normalizer, atom_normalizer) = normalizers(&fractions);
        Self {
            state_id: OnceLock::new(),
            fractions,
            mass_normalizer,
            atom_normalizer,
            parent: None,
            decay_time: 0,
        }
    }

    // --- identity ---

    /// State id, or `0` when the composition has not been logged.
    pub fn state_id(&self) -> StateId {
        self.state_id.get().copied().unwrap_or(0)
    }

    /// Whether a state id has been assigned.
    pub fn is_logged(&self) -> bool {
        self.state_id.get().is_some()
    }

    /// Assign the permanent state id. Fails with [`CompositionError::Frozen`]
    /// if one is already set, and with [`CompositionError::InvalidStateId`]
    /// for `0`, which is reserved for unlogged compositions.
    pub fn set_state_id(&self, id: StateId) -> Result<(), CompositionError> {
        if id == 0 {
            return Err(CompositionError::InvalidStateId(id));
        }
        self.state_id
            .set(id)
            .map_err(|_| CompositionError::Frozen(self.state_id()))
    }

    /// The composition this one decayed from, if it is still alive.
    pub fn parent(&self) -> Option<Arc<Composition>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    /// Elapsed time of the decay that produced this composition.
    pub fn decay_time(&self) -> i64 {
        self.decay_time
    }

    // --- reads ---

    /// Stored mass-basis quantities, not divided by the normalizer.
    pub fn fractions(&self) -> &CompositionMap {
        &self.fractions
    }

    pub fn mass_normalizer(&self) -> f64 {
        self.mass_normalizer
    }

    pub fn atom_normalizer(&self) -> f64 {
        self.atom_normalizer
    }

    /// Total mass: the sum of stored quantities.
    pub fn total_mass(&self) -> f64 {
        self.mass_normalizer
    }

    /// Isotopes present in the map, ascending.
    pub fn isotopes(&self) -> impl Iterator<Item = IsotopeId> + '_ {
        self.fractions.keys().copied()
    }

    /// Absolute stored quantity of `tope`, `0` if absent.
    pub fn quantity(&self, tope: IsotopeId) -> f64 {
        self.fractions.get(&tope).copied().unwrap_or(0.0)
    }

    /// Normalized mass fraction of `tope`, `0` if absent.
    pub fn mass_fraction(&self, tope: IsotopeId) -> f64 {
        if self.mass_normalizer <= 0.0 {
            return 0.0;
        }
        self.quantity(tope) / self.mass_normalizer
    }

    /// Normalized atom fraction of `tope`, `0` if absent.
    pub fn atom_fraction(&self, tope: IsotopeId) -> f64 {
        if self.atom_normalizer <= 0.0 {
            return 0.0;
        }
        self.quantity(tope) / tope.weight() / self.atom_normalizer
    }

    /// All normalized mass fractions.
    pub fn mass_fractions(&self) -> CompositionMap {
        self.fractions
            .keys()
            .map(|id| (*id, self.mass_fraction(*id)))
            .collect()
    }

    /// All normalized atom fractions.
    pub fn atom_fractions(&self) -> CompositionMap {
        self.fractions
            .keys()
            .map(|id| (*id, self.atom_fraction(*id)))
            .collect()
    }

    /// True if the quantity of `tope` is below [`MASS_TOLERANCE`].
    pub fn is_zero(&self, tope: IsotopeId) -> bool {
        self.quantity(tope) < MASS_TOLERANCE
    }

    /// True if every isotope present in either composition differs by at
    /// most [`MASS_TOLERANCE`].
    pub fn approx_eq(&self, other: &Composition) -> bool {
        self.fractions
            .keys()
            .chain(other.fractions.keys())
            .all(|id| (self.quantity(*id) - other.quantity(*id)).abs() <= MASS_TOLERANCE)
    }

    // --- normalization ---

    /// Rescale in place so the mass normalizer is exactly one.
    ///
    /// Fails if the composition is logged. A zero-mass composition is left
    /// untouched.
    pub fn minimize(&mut self) -> Result<(), CompositionError> {
        if let Some(id) = self.state_id.get() {
            return Err(CompositionError::Frozen(*id));
        }
        self.rescale_to_unit();
        Ok(())
    }

    /// Unit-mass copy of this composition. The copy is unlogged.
    pub fn minimized(&self) -> Composition {
        let mut copy = Self::from_quantities(self.fractions.clone());
        copy.rescale_to_unit();
        copy
    }

    fn rescale_to_unit(&mut self) {
        if self.mass_normalizer <= 0.0 || self.mass_normalizer == 1.0 {
            return;
        }
        let scale = self.mass_normalizer;
        for q in self.fractions.values_mut() {
            *q /= scale;
        }
        self.atom_normalizer /= scale;
        self.mass_normalizer = 1.0;
    }

    // --- arithmetic ---

    /// Per-isotope sum of quantities.
    pub fn add(&self, other: &Composition) -> Composition {
        let mut fractions = self.fractions.clone();
        for (id, q) in &other.fractions {
            *fractions.entry(*id).or_insert(0.0) += q;
        }
        Self::from_quantities(fractions)
    }

    /// Per-isotope difference of quantities.
    ///
    /// Fails with [`CompositionError::Range`] if any isotope would drop below
    /// `-MASS_TOLERANCE`. Results within the tolerance of zero are dropped.
    pub fn subtract(&self, other: &Composition) -> Result<Composition, CompositionError> {
        let mut fractions = self.fractions.clone();
        for (id, q) in &other.fractions {
            let remaining = self.quantity(*id) - q;
            if remaining < -MASS_TOLERANCE {
                return Err(CompositionError::Range {
                    isotope: *id,
                    deficit: -remaining,
                });
            }
            fractions.insert(*id, remaining);
        }
        fractions.retain(|_, q| *q > 0.0);
        Ok(Self::from_quantities(fractions))
    }

    /// Multiply every quantity by `factor`.
    pub fn scale(&self, factor: f64) -> Result<Composition, CompositionError> {
        if !factor.is_finite() || factor < 0.0 {
            return Err(CompositionError::InvalidScale(factor));
        }
        let fractions = self
            .fractions
            .iter()
            .map(|(id, q)| (*id, q * factor))
            .collect();
        Ok(Self::from_quantities(fractions))
    }

    /// Divide every quantity by `divisor`.
    pub fn divide(&self, divisor: f64) -> Result<Composition, CompositionError> {
        if !divisor.is_finite() || divisor <= 0.0 {
            return Err(CompositionError::InvalidScale(divisor));
        }
        self.scale(1.0 / divisor)
    }

    // --- printing ---

    /// Human-readable listing, one `isotope: mass fraction` line per entry.
    pub fn detail(&self) -> String {
        let mut out = String::new();
        for id in self.fractions.keys() {
            let _ = writeln!(out, "{id}: {:.6e}", self.mass_fraction(*id));
        }
        out
    }
}
