//! The hierarchical merge scheduler.
//!
//! Merging hundreds of thousands of pgen file sets in a single
//! `plink2 --pmerge-list` call is impractical, so the scheduler arranges the
//! input list into a balanced merge tree instead: the list is split into
//! `chunks` contiguous groups per level, sibling groups are merged
//! concurrently, and each parent reduces its children's results with one more
//! merge until a single file set remains. `depth` caps the number of levels;
//! once the last level is reached, whatever is left in a group is merged in
//! one call.
//!
//! Intermediate file sets are reclaimed as soon as the merge above them has
//! consumed them. File sets from the input list are never deleted.
//!
//! # Examples
//!
//! ```no_run
//! use libpgmerge::scheduler::Builder;
//! use libpgmerge::{ArtifactHandle, PlinkMergeExecutor};
//!
//! let files: Vec<ArtifactHandle> = ["cohort-1", "cohort-2", "cohort-3"]
//!     .iter()
//!     .map(ArtifactHandle::leaf)
//!     .collect();
//!
//! let scheduler = Builder::new()
//!     .depth(2)
//!     .chunks(2)
//!     .build(PlinkMergeExecutor::new("."));
//!
//! let merged = scheduler.merge(&files).expect("merge failed");
//! println!("merged file set: {}", merged.base().display());
//! ```
use crossbeam_channel as channel;
use log::{debug, info, trace, warn};

use crate::artifact::ArtifactHandle;
use crate::error::MergeError;
use crate::executor::MergeExecutor;
use crate::partition;

/// The default number of fan-out levels before merging directly.
pub const DEFAULT_DEPTH: u32 = 3;
/// The default number of groups the list is split into per level.
pub const DEFAULT_CHUNKS: usize = 2;

/// A builder for [`MergeScheduler`].
pub struct Builder {
    depth: u32,
    chunks: usize,
    threads: usize,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            chunks: DEFAULT_CHUNKS,
            threads: 0,
        }
    }
}

impl Builder {
    /// Create a new builder with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of fan-out levels before merging directly.
    /// Must be at least 1.
    pub fn depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Set the number of groups the file list is split into per level.
    /// Must be at least 1.
    pub fn chunks(mut self, chunks: usize) -> Self {
        self.chunks = chunks;
        self
    }

    /// Set the number of worker threads running merges. `0` (the default)
    /// uses one worker per logical CPU.
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Build the [`MergeScheduler`], using the given executor for every merge
    /// invocation.
    pub fn build<E: MergeExecutor>(self, executor: E) -> MergeScheduler<E> {
        MergeScheduler {
            executor,
            depth: self.depth,
            chunks: self.chunks,
            threads: self.threads,
        }
    }
}

/// Recursively merges an ordered list of file sets down to a single one.
///
/// See the [module-level documentation](crate::scheduler) for more
/// information and examples.
pub struct MergeScheduler<E> {
    /// Performs the actual merge invocations.
    executor: E,
    /// Maximum number of fan-out levels before merging directly.
    depth: u32,
    /// Number of groups the file list is split into per level.
    chunks: usize,
    /// Size of the worker pool; 0 means one worker per logical CPU.
    threads: usize,
}

impl<E: MergeExecutor> MergeScheduler<E> {
    /// Merge `files` down to a single file set and return its handle.
    ///
    /// A single-element list is returned as-is without invoking the executor.
    /// Otherwise the executor is invoked once per internal node of the merge
    /// tree, and every intermediate result is deleted as soon as the merge
    /// above it completes. On failure the error of the first failing subtree
    /// (in input order) is returned; file sets already produced by other
    /// subtrees are left on disk for inspection.
    pub fn merge(&self, files: &[ArtifactHandle]) -> crate::Result<ArtifactHandle> {
        if files.is_empty() {
            return Err(MergeError::EmptyInput);
        }
        if self.depth == 0 {
            return Err(MergeError::InvalidDepth(
                "depth must be at least 1".to_string(),
            ));
        }
        if self.chunks == 0 {
            return Err(MergeError::InvalidChunks(
                "chunk count must be at least 1".to_string(),
            ));
        }

        info!(
            "Merging {} file sets (depth {}, width {})",
            files.len(),
            self.depth,
            self.chunks
        );

        // Bounded worker pool: the external tool is resource-hungry, so the
        // number of concurrently running merges must not scale with the size
        // of the tree.
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .map_err(|e| {
                MergeError::ThreadError(format!("Error setting number of threads: {e}"))
            })?;

        pool.install(|| self.merge_level(files, self.depth))
    }

    fn merge_level(&self, files: &[ArtifactHandle], depth: u32) -> crate::Result<ArtifactHandle> {
        // A single file set needs no merging. Ownership does not change here,
        // so a leaf stays a leaf and is never cleaned up below.
        if let [only] = files {
            trace!("Single file set {}, returning as-is", only.base().display());
            return Ok(only.clone());
        }

        // The last permitted level merges everything that is left in one call.
        if depth == 1 {
            return self.executor.merge(files);
        }

        let chunk_size = files.len().div_ceil(self.chunks);
        let groups = partition::split(files, chunk_size);
        debug!(
            "Splitting {} file sets into {} group(s) of at most {} at depth {}",
            files.len(),
            groups.len(),
            chunk_size,
            depth
        );

        // One subtask per group. Results are keyed by group position so that
        // sibling completion order never affects the reduction input order.
        let (sender, receiver) = channel::unbounded();
        rayon::scope(|s| {
            for (pos, group) in groups.iter().copied().enumerate() {
                let sender = sender.clone();
                s.spawn(move |_| {
                    let result = self.merge_level(group, depth - 1);
                    // the receiver outlives the scope, so this cannot fail
                    let _ = sender.send((pos, result));
                });
            }
        });
        drop(sender);

        // The scope above is a strict join barrier: every sibling has
        // finished before any failure is inspected, and the first failure in
        // group order wins.
        let mut collected: Vec<(usize, crate::Result<ArtifactHandle>)> =
            receiver.into_iter().collect();
        collected.sort_unstable_by_key(|(pos, _)| *pos);

        let mut children = Vec::with_capacity(collected.len());
        for (_, result) in collected {
            children.push(result?);
        }

        let merged = self.executor.merge(&children)?;

        // The children have been consumed; reclaim the intermediate ones.
        // Anything that fell through the singleton case unchanged keeps its
        // original origin tag and is only deleted if a deeper merge produced
        // it.
        for child in &children {
            if child.is_derived() {
                trace!(
                    "Removing intermediate file set {}",
                    child.base().display()
                );
                if let Err(e) = child.remove_files() {
                    warn!(
                        "Failed to remove intermediate file set {}: {}",
                        child.base().display(),
                        e
                    );
                }
            }
        }

        Ok(merged)
    }
}
