//! # libpgmerge
//!
//! `libpgmerge` merges a large number of PLINK 2 pgen file sets into one by
//! invoking `plink2 --pmerge-list` hierarchically.
//!
//! A single `--pmerge-list` call over hundreds of thousands of file sets is
//! impractical, so the library arranges the inputs into a balanced merge
//! tree: the input list is split into a configurable number of contiguous
//! groups per level, sibling groups are merged concurrently on a bounded
//! worker pool, and each parent reduces its children's results with one more
//! merge until a single file set remains. Intermediate file sets are deleted
//! as soon as the merge above them has consumed them; file sets from the
//! original input list are never deleted.
//!
//! The pieces:
//!
//! - [`ArtifactHandle`] identifies one on-disk file set and carries the
//!   origin tag ([`Origin`]) that decides whether it may be deleted.
//! - [`MergeExecutor`] is the contract to the external merge tool;
//!   [`PlinkMergeExecutor`] is the `plink2` implementation.
//! - [`MergeScheduler`] runs the merge tree; see the
//!   [`scheduler`] module for the algorithm and examples.
//!
//! Unlike the tool it wraps, this library treats a non-zero exit status from
//! `plink2` as an error. The old behaviour of pressing on regardless is
//! available through [`PlinkMergeExecutor::ignore_exit_status`].
pub mod artifact;
pub mod error;
pub mod executor;
pub(crate) mod partition;
pub mod scheduler;

pub use self::artifact::{ArtifactHandle, Origin};
pub use self::executor::{MergeExecutor, PlinkMergeExecutor};
pub use self::scheduler::MergeScheduler;

/// A type alias for `Result` with [`MergeError`](error::MergeError) as the
/// error type.
pub type Result<T> = std::result::Result<T, error::MergeError>;
