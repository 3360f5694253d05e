use crate::error::SourceResult;
use chainwalk_core::{StateVector, SurfaceReading};

/// A rendered view of a state vector (detailed report, compact post, ...).
///
/// Renderers live outside the core; they register here so that every view
/// published for a date can be checked against the canonical spine line.
pub trait Surface: Send + Sync {
    /// Render the state vector
    fn render(&self, state: &StateVector) -> String;

    /// Recover field → token pairs from a rendered view
    fn read(&self, rendered: &str) -> SourceResult<SurfaceReading>;

    /// Surface name for diagnostics
    fn name(&self) -> &str;
}
