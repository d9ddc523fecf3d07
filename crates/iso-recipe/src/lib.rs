//! # iso-recipe — Named recipes and logged compositions.
//!
//! - **State ids**: a single monotonic [`StateIdCounter`] shared by every
//!   consumer that logs compositions, starting at 1.
//! - **Recorder**: the one funnel through which ids are assigned and rows are
//!   written to a [`PersistenceSink`](iso_core::traits::PersistenceSink), so the
//!   sink always sees ids in increasing order.
//! - **Registry**: append-only name → composition map populated at setup.
//! - **Config**: serde records describing recipes, fed into the registry.

pub mod config;
pub mod ids;
pub mod recorder;
pub mod registry;
pub mod sink;

pub use config::{IsotopeEntry, RecipeBook, RecipeRecord};
pub use ids::StateIdCounter;
pub use recorder::Recorder;
pub use registry::RecipeRegistry;
pub use sink::{JsonLinesSink, MemorySink, NullSink};
