//! ChainWalk Ports
//!
//! Port definitions (traits) for the constraint fusion engine.
//! These define the boundaries between the deterministic core and the
//! collaborators it deliberately does not implement: block/mempool data
//! acquisition, realized-market statistics, and report renderers.

mod clock;
mod error;
mod source;
mod surface;

pub use clock::Clock;
pub use error::{SourceError, SourceResult};
pub use source::{FeatureSource, RealizedStatsSource};
pub use surface::Surface;
