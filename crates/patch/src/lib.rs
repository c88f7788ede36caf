#![forbid(unsafe_code)]

mod document;
mod driver;
mod error;
mod manifest;
mod patch;

pub use driver::{EntryReport, EntryStatus, RunMode, RunReport, run};
pub use error::{ManifestError, PatchError, PatchStep};
pub use manifest::{load_manifest, parse_manifest};
pub use patch::{CheckOutcome, PatchOutcome, check, patch};
