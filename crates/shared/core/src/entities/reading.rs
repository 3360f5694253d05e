//! Surface readings
//!
//! A surface (the canonical spine line, a detailed report, a compact post) is
//! reduced to field → token pairs so that two surfaces for the same date can be
//! compared field by field.

use std::collections::BTreeMap;

/// Field name → rendered token (e.g. `"IRQ.band"` → `"primed"`)
pub type SurfaceReading = BTreeMap<String, String>;
