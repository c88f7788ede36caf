#![forbid(unsafe_code)]

use crate::document::{metadata_matches, parse_document, render, set_metadata};
use crate::error::PatchError;
use fixmeta_core::ids::ProgramAddress;
use std::path::Path;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatchOutcome {
    /// Whether the bytes on disk differ from before the patch.
    pub changed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckOutcome {
    pub in_sync: bool,
}

fn read_text(path: &Path) -> Result<String, PatchError> {
    std::fs::read_to_string(path).map_err(|e| PatchError::from_read(path, e))
}

fn write_text(path: &Path, text: &str) -> Result<(), PatchError> {
    std::fs::write(path, text).map_err(|e| PatchError::Unwritable {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Replace the top-level `metadata` of the IDL at `path` with `{"address": address}`
/// and overwrite the file.
///
/// Nothing is written unless the file parsed as a JSON object. The write itself is a
/// plain truncate-and-write.
pub fn patch(path: &Path, address: &ProgramAddress) -> Result<PatchOutcome, PatchError> {
    let original = read_text(path)?;
    let mut doc = parse_document(path, &original)?;
    set_metadata(&mut doc, address);
    let text = render(path, &doc)?;

    write_text(path, &text)?;

    let changed = text != original;
    info!(path = %path.display(), address = %address, changed, "idl metadata patched");
    Ok(PatchOutcome { changed })
}

/// Read-only counterpart of [`patch`]: reports whether the metadata block already
/// matches `address` exactly.
pub fn check(path: &Path, address: &ProgramAddress) -> Result<CheckOutcome, PatchError> {
    let text = read_text(path)?;
    let doc = parse_document(path, &text)?;
    let in_sync = metadata_matches(&doc, address);
    debug!(path = %path.display(), address = %address, in_sync, "idl metadata checked");
    Ok(CheckOutcome { in_sync })
}
