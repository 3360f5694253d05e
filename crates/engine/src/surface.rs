//! Surface consistency
//!
//! Every rendered view of a date must agree with the canonical spine line on
//! every field it shows. Disagreement is fail-closed: the caller rejects the
//! whole date and publishes nothing.

use crate::error::SurfaceMismatch;
use crate::spine::SpineLine;
use chainwalk_core::{StateVector, SurfaceReading};
use chainwalk_ports::{SourceError, SourceResult, Surface};
use log::{debug, error};

/// Fields every surface must carry
pub const REQUIRED_FIELDS: [&str; 6] = ["date", "R", "CTI", "TH", "EP", "IRQ"];

/// The canonical line itself, as a surface
#[derive(Debug, Clone, Copy, Default)]
pub struct SpineSurface;

impl Surface for SpineSurface {
    fn render(&self, state: &StateVector) -> String {
        SpineLine::from_state(state).to_string()
    }

    fn read(&self, rendered: &str) -> SourceResult<SurfaceReading> {
        let line: SpineLine = rendered.parse().map_err(|e| SourceError::Malformed {
            location: "spine line".to_string(),
            reason: format!("{}", e),
        })?;
        Ok(line.reading())
    }

    fn name(&self) -> &str {
        "spine"
    }
}

/// Machine-readable view: the spine tokens as a flat JSON object
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSurface;

impl Surface for JsonSurface {
    fn render(&self, state: &StateVector) -> String {
        let reading = SpineLine::from_state(state).reading();
        serde_json::to_string(&reading).unwrap_or_default()
    }

    fn read(&self, rendered: &str) -> SourceResult<SurfaceReading> {
        serde_json::from_str(rendered).map_err(|e| SourceError::Malformed {
            location: "json surface".to_string(),
            reason: e.to_string(),
        })
    }

    fn name(&self) -> &str {
        "json"
    }
}

/// Registered surfaces checked against the canonical line
#[derive(Default)]
pub struct ConsistencyCheck {
    surfaces: Vec<Box<dyn Surface>>,
}

impl ConsistencyCheck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: register a surface
    pub fn with_surface(mut self, surface: Box<dyn Surface>) -> Self {
        self.surfaces.push(surface);
        self
    }

    pub fn register(&mut self, surface: Box<dyn Surface>) {
        self.surfaces.push(surface);
    }

    pub fn surface_names(&self) -> Vec<&str> {
        self.surfaces.iter().map(|s| s.name()).collect()
    }

    /// Render the canonical line and every surface; the first disagreement
    /// rejects the date. Returns the canonical line and each surface's
    /// rendering on success.
    pub fn verify(
        &self,
        state: &StateVector,
    ) -> Result<(String, Vec<(String, String)>), SurfaceMismatch> {
        let canonical = SpineLine::from_state(state);
        let expected = canonical.reading();

        let mut rendered = Vec::with_capacity(self.surfaces.len());
        for surface in &self.surfaces {
            let output = surface.render(state);
            let reading = surface.read(&output).map_err(|e| {
                mismatch(surface.name(), "<unreadable>", "", &e.to_string())
            })?;
            compare(surface.name(), &expected, &reading)?;
            debug!("[SURFACE] {} agrees for {}", surface.name(), state.date);
            rendered.push((surface.name().to_string(), output));
        }

        Ok((canonical.to_string(), rendered))
    }
}

fn mismatch(surface: &str, field: &str, expected: &str, found: &str) -> SurfaceMismatch {
    let m = SurfaceMismatch {
        surface: surface.to_string(),
        field: field.to_string(),
        expected: expected.to_string(),
        found: found.to_string(),
    };
    error!("[SURFACE] {}", m);
    m
}

fn compare(
    surface: &str,
    expected: &SurfaceReading,
    reading: &SurfaceReading,
) -> Result<(), SurfaceMismatch> {
    for field in REQUIRED_FIELDS {
        if !reading.contains_key(field) {
            let want = expected.get(field).map(String::as_str).unwrap_or_default();
            return Err(mismatch(surface, field, want, "<missing>"));
        }
    }
    for (field, found) in reading {
        match expected.get(field) {
            Some(want) if want == found => {}
            Some(want) => return Err(mismatch(surface, field, want, found)),
            None => return Err(mismatch(surface, field, "<absent>", found)),
        }
    }
    Ok(())
}
