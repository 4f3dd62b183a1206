//! Handles for on-disk pgen file sets.
//!
//! A pgen file set is a group of sibling files sharing one base path: the
//! genotype data (`.pgen`), sample metadata (`.psam`) and variant metadata
//! (`.pvar`). File sets written by `plink2` additionally carry a `.log` file.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The extensions of the data files every pgen file set carries.
pub const DATA_EXTENSIONS: [&str; 3] = ["pgen", "psam", "pvar"];

/// The extension of the log file `plink2` writes next to a merged file set.
pub const LOG_EXTENSION: &str = "log";

/// Where an artifact came from.
///
/// This tag decides deletion eligibility: the scheduler reclaims `Derived`
/// artifacts once they have been consumed by a later merge, and never touches
/// `Leaf` artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Present in the original input list.
    Leaf,
    /// Produced by a merge step.
    Derived,
}

/// One on-disk pgen file set, identified by the base path its files share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactHandle {
    base: PathBuf,
    origin: Origin,
}

impl ArtifactHandle {
    /// Create a handle for a file set from the original input list.
    pub fn leaf<P: AsRef<Path>>(base: P) -> Self {
        Self {
            base: base.as_ref().to_path_buf(),
            origin: Origin::Leaf,
        }
    }

    /// Create a handle for a file set produced by a merge step.
    pub fn derived<P: AsRef<Path>>(base: P) -> Self {
        Self {
            base: base.as_ref().to_path_buf(),
            origin: Origin::Derived,
        }
    }

    /// The base path shared by the file set's files.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Where this artifact came from.
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Whether this artifact was produced by a merge step.
    pub fn is_derived(&self) -> bool {
        self.origin == Origin::Derived
    }

    /// The path of the file set member with the given extension.
    ///
    /// The extension is appended rather than substituted, so base paths that
    /// themselves contain dots (e.g. `cohort.chr1`) are left intact.
    pub fn path_with_extension(&self, ext: &str) -> PathBuf {
        let mut path = self.base.clone().into_os_string();
        path.push(".");
        path.push(ext);
        PathBuf::from(path)
    }

    /// Remove the file set from disk: all data files, plus the log if one
    /// exists.
    pub fn remove_files(&self) -> io::Result<()> {
        for ext in DATA_EXTENSIONS {
            fs::remove_file(self.path_with_extension(ext))?;
        }
        let log = self.path_with_extension(LOG_EXTENSION);
        if log.exists() {
            fs::remove_file(log)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        File::create(path).unwrap();
    }

    #[test]
    fn test_path_with_extension() {
        let handle = ArtifactHandle::leaf("/data/cohort");
        assert_eq!(
            handle.path_with_extension("pgen"),
            PathBuf::from("/data/cohort.pgen")
        );
    }

    #[test]
    fn test_path_with_extension_keeps_dotted_base() {
        let handle = ArtifactHandle::leaf("/data/cohort.chr1");
        assert_eq!(
            handle.path_with_extension("psam"),
            PathBuf::from("/data/cohort.chr1.psam")
        );
    }

    #[test]
    fn test_origin_tags() {
        assert!(!ArtifactHandle::leaf("a").is_derived());
        assert!(ArtifactHandle::derived("a").is_derived());
        assert_eq!(ArtifactHandle::leaf("a").origin(), Origin::Leaf);
    }

    #[test]
    fn test_remove_files_with_log() {
        let dir = TempDir::new().unwrap();
        let handle = ArtifactHandle::derived(dir.path().join("merged"));
        for ext in DATA_EXTENSIONS {
            touch(&handle.path_with_extension(ext));
        }
        touch(&handle.path_with_extension(LOG_EXTENSION));

        handle.remove_files().unwrap();

        for ext in DATA_EXTENSIONS {
            assert!(!handle.path_with_extension(ext).exists());
        }
        assert!(!handle.path_with_extension(LOG_EXTENSION).exists());
    }

    #[test]
    fn test_remove_files_without_log() {
        let dir = TempDir::new().unwrap();
        let handle = ArtifactHandle::derived(dir.path().join("merged"));
        for ext in DATA_EXTENSIONS {
            touch(&handle.path_with_extension(ext));
        }

        handle.remove_files().unwrap();

        for ext in DATA_EXTENSIONS {
            assert!(!handle.path_with_extension(ext).exists());
        }
    }

    #[test]
    fn test_remove_files_missing_data_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let handle = ArtifactHandle::derived(dir.path().join("merged"));
        touch(&handle.path_with_extension("pgen"));

        assert!(handle.remove_files().is_err());
    }
}
