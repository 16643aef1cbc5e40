//! Data models for trait layers and composite traits

mod composite;
mod record;

pub use composite::{CompositeTrait, TraitId, TraitSlice};
pub use record::{normalize_hex, CoverageValue, RawRecordJson, RawTraitRecord, Warning};
