#![forbid(unsafe_code)]

use crate::error::PatchError;
use crate::patch::{check, patch};
use fixmeta_core::ids::ProgramAddress;
use fixmeta_core::targets::TargetEntry;
use std::path::PathBuf;
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    Write,
    Check,
}

impl RunMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RunMode::Write => "write",
            RunMode::Check => "check",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryStatus {
    Written { changed: bool },
    InSync,
    Drifted,
}

#[derive(Clone, Debug)]
pub struct EntryReport {
    pub path: PathBuf,
    pub address: ProgramAddress,
    pub status: EntryStatus,
}

#[derive(Clone, Debug)]
pub struct RunReport {
    pub mode: RunMode,
    pub entries: Vec<EntryReport>,
}

impl RunReport {
    pub fn changed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, EntryStatus::Written { changed: true }))
            .count()
    }

    pub fn drifted(&self) -> Vec<&EntryReport> {
        self.entries
            .iter()
            .filter(|e| e.status == EntryStatus::Drifted)
            .collect()
    }
}

/// Process every target in order. The first error aborts the run; later targets
/// are not touched.
pub fn run(targets: &[TargetEntry], mode: RunMode) -> Result<RunReport, PatchError> {
    let mut entries = Vec::with_capacity(targets.len());
    for target in targets {
        let status = match mode {
            RunMode::Write => {
                let outcome = patch(&target.path, &target.address)?;
                EntryStatus::Written {
                    changed: outcome.changed,
                }
            }
            RunMode::Check => {
                if check(&target.path, &target.address)?.in_sync {
                    EntryStatus::InSync
                } else {
                    EntryStatus::Drifted
                }
            }
        };
        entries.push(EntryReport {
            path: target.path.clone(),
            address: target.address.clone(),
            status,
        });
    }

    let report = RunReport { mode, entries };
    info!(
        mode = mode.as_str(),
        targets = report.entries.len(),
        changed = report.changed_count(),
        drifted = report.drifted().len(),
        "metadata run finished"
    );
    Ok(report)
}
