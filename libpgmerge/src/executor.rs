//! The seam to the external merge tool.
//!
//! The scheduler only depends on the [`MergeExecutor`] contract: combine an
//! ordered, non-empty list of file sets into one new file set, or fail.
//! [`PlinkMergeExecutor`] is the production implementation, shelling out to
//! `plink2 --pmerge-list`.
use std::ffi::{OsStr, OsString};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, trace};
use uuid::Uuid;

use crate::artifact::ArtifactHandle;
use crate::error::MergeError;

/// The contract the scheduler depends on to combine file sets.
pub trait MergeExecutor: Sync {
    /// Merge `inputs` into one new [`ArtifactHandle`].
    ///
    /// `inputs` must not be empty. Calling this with a single input is legal
    /// but wasteful; the scheduler short-circuits that case before it gets
    /// here.
    fn merge(&self, inputs: &[ArtifactHandle]) -> crate::Result<ArtifactHandle>;
}

/// Merges pgen file sets by invoking `plink2 --pmerge-list`.
///
/// Each invocation allocates a fresh UUID, writes a mergelist file named
/// `<uuid>_mergelist.txt` into the working directory with one input base path
/// per line, and directs the tool's output to `<uuid>.pgen/.psam/.pvar`. The
/// UUID keying means concurrent invocations sharing one working directory
/// never collide.
pub struct PlinkMergeExecutor {
    program: OsString,
    workdir: PathBuf,
    ignore_exit_status: bool,
}

impl PlinkMergeExecutor {
    /// Create an executor writing mergelists and merged file sets into
    /// `workdir`.
    pub fn new<P: AsRef<Path>>(workdir: P) -> Self {
        Self {
            program: OsString::from("plink2"),
            workdir: workdir.as_ref().to_path_buf(),
            ignore_exit_status: false,
        }
    }

    /// Override the program to invoke. Defaults to `plink2` (resolved via
    /// `PATH`).
    pub fn program<S: AsRef<OsStr>>(mut self, program: S) -> Self {
        self.program = program.as_ref().to_os_string();
        self
    }

    /// Treat a non-zero exit status from the merge tool as success.
    ///
    /// Off by default: a failed invocation would otherwise hand the scheduler
    /// a handle to files that were never written.
    pub fn ignore_exit_status(mut self, ignore: bool) -> Self {
        self.ignore_exit_status = ignore;
        self
    }
}

impl MergeExecutor for PlinkMergeExecutor {
    fn merge(&self, inputs: &[ArtifactHandle]) -> crate::Result<ArtifactHandle> {
        debug_assert!(!inputs.is_empty());

        let merge_id = Uuid::new_v4().to_string();
        let mergelist_path = self.workdir.join(format!("{merge_id}_mergelist.txt"));
        let out_base = self.workdir.join(&merge_id);

        debug!(
            "Merging {} file sets into {}",
            inputs.len(),
            out_base.display()
        );

        {
            let mut mergelist = File::create(&mergelist_path).map(BufWriter::new)?;
            for input in inputs {
                writeln!(mergelist, "{}", input.base().display())?;
            }
        }

        trace!(
            "Running {} --silent --pmerge-list {} --out {}",
            self.program.to_string_lossy(),
            mergelist_path.display(),
            out_base.display()
        );
        let output = Command::new(&self.program)
            .arg("--silent")
            .arg("--pmerge-list")
            .arg(&mergelist_path)
            .arg("--out")
            .arg(&out_base)
            .output()
            .map_err(|e| {
                MergeError::PlinkError(format!(
                    "Failed to run {}: {}",
                    self.program.to_string_lossy(),
                    e
                ))
            })?;

        // The mergelist is transient regardless of how the tool fared.
        fs::remove_file(&mergelist_path)?;

        if !output.status.success() && !self.ignore_exit_status {
            return Err(MergeError::PlinkError(format!(
                "{} exited with {} while merging {} file sets into {}: {}",
                self.program.to_string_lossy(),
                output.status,
                inputs.len(),
                out_base.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(ArtifactHandle::derived(out_base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn inputs(dir: &Path) -> Vec<ArtifactHandle> {
        vec![
            ArtifactHandle::leaf(dir.join("a")),
            ArtifactHandle::leaf(dir.join("b")),
        ]
    }

    fn mergelists_in(dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.to_string_lossy().ends_with("_mergelist.txt"))
            .collect()
    }

    #[test]
    #[cfg(unix)]
    fn test_successful_invocation_returns_derived_handle() {
        let dir = TempDir::new().unwrap();
        let executor = PlinkMergeExecutor::new(dir.path()).program("true");

        let merged = executor.merge(&inputs(dir.path())).unwrap();

        assert!(merged.is_derived());
        assert!(merged.base().starts_with(dir.path()));
        // the transient mergelist must be gone
        assert!(mergelists_in(dir.path()).is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn test_non_zero_exit_status_is_an_error() {
        let dir = TempDir::new().unwrap();
        let executor = PlinkMergeExecutor::new(dir.path()).program("false");

        let err = executor.merge(&inputs(dir.path())).unwrap_err();

        assert!(matches!(err, MergeError::PlinkError(_)));
        assert!(mergelists_in(dir.path()).is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn test_non_zero_exit_status_can_be_ignored() {
        let dir = TempDir::new().unwrap();
        let executor = PlinkMergeExecutor::new(dir.path())
            .program("false")
            .ignore_exit_status(true);

        let merged = executor.merge(&inputs(dir.path())).unwrap();
        assert!(merged.is_derived());
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let dir = TempDir::new().unwrap();
        let executor =
            PlinkMergeExecutor::new(dir.path()).program("definitely-not-a-real-program");

        let err = executor.merge(&inputs(dir.path())).unwrap_err();
        assert!(matches!(err, MergeError::PlinkError(_)));
    }

    #[test]
    #[cfg(unix)]
    fn test_fresh_merge_ids_per_invocation() {
        let dir = TempDir::new().unwrap();
        let executor = PlinkMergeExecutor::new(dir.path()).program("true");

        let first = executor.merge(&inputs(dir.path())).unwrap();
        let second = executor.merge(&inputs(dir.path())).unwrap();
        assert_ne!(first.base(), second.base());
    }
}
