#![forbid(unsafe_code)]

use fixmeta_core::idl::{DEFAULT_IDL_DIR, WORKSPACE_MARKER};
use fixmeta_core::targets::{TargetEntry, default_targets};
use fixmeta_patch::{ManifestError, RunMode, load_manifest};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub(crate) struct RunConfig {
    pub mode: RunMode,
    pub targets: Vec<TargetEntry>,
}

fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(WORKSPACE_MARKER).is_file() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// `target/idl` under the nearest Anchor workspace root, or under `start` when
/// no `Anchor.toml` is found.
pub(crate) fn default_idl_dir_from_start(start: &Path) -> PathBuf {
    find_workspace_root(start)
        .unwrap_or_else(|| start.to_path_buf())
        .join(DEFAULT_IDL_DIR)
}

pub(crate) fn resolve(
    cwd: &Path,
    idl_dir: Option<&Path>,
    targets_file: Option<&Path>,
    check: bool,
) -> Result<RunConfig, ManifestError> {
    let mode = if check { RunMode::Check } else { RunMode::Write };
    let idl_dir = idl_dir.map(|dir| cwd.join(dir));
    let targets = match targets_file {
        Some(file) => load_manifest(&cwd.join(file), idl_dir.as_deref())?,
        None => {
            let dir = idl_dir.unwrap_or_else(|| default_idl_dir_from_start(cwd));
            default_targets(&dir)
        }
    };
    Ok(RunConfig { mode, targets })
}
