#![forbid(unsafe_code)]

use crate::error::ManifestError;
use fixmeta_core::ids::ProgramAddress;
use fixmeta_core::idl::DEFAULT_IDL_DIR;
use fixmeta_core::targets::{TargetEntry, known_program};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    #[serde(default)]
    idl_dir: Option<PathBuf>,
    #[serde(default)]
    targets: Vec<RawTarget>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTarget {
    #[serde(default)]
    idl: Option<String>,
    #[serde(default)]
    path: Option<PathBuf>,
    #[serde(default)]
    address: Option<String>,
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Load a target manifest (YAML or JSON) from disk.
///
/// Relative paths inside the manifest resolve against the manifest's directory.
/// `idl_dir_override` wins over the manifest's own `idl_dir`.
pub fn load_manifest(
    manifest_path: &Path,
    idl_dir_override: Option<&Path>,
) -> Result<Vec<TargetEntry>, ManifestError> {
    let text = std::fs::read_to_string(manifest_path).map_err(|e| ManifestError::Io {
        path: manifest_path.to_path_buf(),
        source: e,
    })?;
    let base_dir = manifest_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    parse_manifest(manifest_path, &base_dir, &text, idl_dir_override)
}

pub fn parse_manifest(
    manifest_path: &Path,
    base_dir: &Path,
    text: &str,
    idl_dir_override: Option<&Path>,
) -> Result<Vec<TargetEntry>, ManifestError> {
    let raw: RawManifest = serde_yaml::from_str(text).map_err(|e| ManifestError::Parse {
        path: manifest_path.to_path_buf(),
        source: e,
    })?;
    if raw.targets.is_empty() {
        return Err(ManifestError::Empty {
            path: manifest_path.to_path_buf(),
        });
    }

    let idl_dir = match (idl_dir_override, raw.idl_dir.as_deref()) {
        (Some(dir), _) => dir.to_path_buf(),
        (None, Some(dir)) => resolve(base_dir, dir),
        (None, None) => base_dir.join(DEFAULT_IDL_DIR),
    };

    let invalid = |index: usize, message: String| ManifestError::InvalidEntry {
        path: manifest_path.to_path_buf(),
        index,
        message,
    };

    let mut entries = Vec::with_capacity(raw.targets.len());
    for (index, target) in raw.targets.into_iter().enumerate() {
        let idl = target
            .idl
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        // `idl` entries of known programs may omit the address.
        let address = match (target.address, idl.and_then(known_program)) {
            (Some(raw), _) => {
                ProgramAddress::try_new(raw).map_err(|e| invalid(index, e.to_string()))?
            }
            (None, Some(program)) => program.program_address(),
            (None, None) => {
                return Err(invalid(
                    index,
                    "missing `address` and `idl` is not a known program".to_string(),
                ));
            }
        };
        let entry = match (idl, target.path.as_deref()) {
            (Some(name), None) => TargetEntry::for_idl(&idl_dir, name, address),
            (None, Some(path)) => TargetEntry::new(resolve(base_dir, path), address),
            (Some(_), Some(_)) => {
                return Err(invalid(
                    index,
                    "set either `idl` or `path`, not both".to_string(),
                ));
            }
            (None, None) => {
                return Err(invalid(index, "missing `idl` or `path`".to_string()));
            }
        };
        entries.push(entry);
    }
    Ok(entries)
}
