#[cfg(feature = "parallel")]
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(feature = "parallel")]
static PARALLEL_ENABLED: AtomicBool = AtomicBool::new(true);

/// Minimum number of items handed to one rayon task; hashing a pair of
/// digests is too cheap to split finer.
const MIN_CHUNK_SIZE: usize = 256;

/// Chunk size used for rayon splitting over `total_items` items.
pub fn preferred_chunk_size(total_items: usize) -> usize {
    MIN_CHUNK_SIZE.min(total_items.max(1))
}

/// Whether tree building and entitlement tables fan out over rayon.
///
/// Always `false` without the `parallel` feature.
#[cfg(feature = "parallel")]
pub fn parallelism_enabled() -> bool {
    PARALLEL_ENABLED.load(Ordering::SeqCst)
}

#[cfg(not(feature = "parallel"))]
pub fn parallelism_enabled() -> bool {
    false
}

/// Switches parallel execution on or off until the returned guard drops.
#[cfg(feature = "parallel")]
pub fn set_parallelism(enabled: bool) -> ParallelismGuard {
    let previous = PARALLEL_ENABLED.swap(enabled, Ordering::SeqCst);
    tracing::trace!(enabled, previous, "parallelism toggled");
    ParallelismGuard { previous }
}

#[cfg(not(feature = "parallel"))]
pub fn set_parallelism(_enabled: bool) -> ParallelismGuard {
    ParallelismGuard {}
}

/// Restores the previous parallelism setting on drop.
#[must_use = "parallelism reverts as soon as the guard is dropped"]
pub struct ParallelismGuard {
    #[cfg(feature = "parallel")]
    previous: bool,
}

#[cfg(feature = "parallel")]
impl Drop for ParallelismGuard {
    fn drop(&mut self) {
        PARALLEL_ENABLED.store(self.previous, Ordering::SeqCst);
    }
}
