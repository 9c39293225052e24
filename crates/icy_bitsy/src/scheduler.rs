//! Cooperative iteration over long item lists.
//!
//! Work is processed in batches whose size adapts so that each batch stays
//! below a fixed time slice. Between batches the loop yields to the runtime
//! for one tick, keeping the host responsive without fixed tuning.

use std::time::{Duration, Instant};

/// Upper bound for the time a single batch may block the host.
pub const TIME_SLICE: Duration = Duration::from_millis(32);

/// Adaptive batch size search.
///
/// Doubles the batch size until a batch exceeds the time slice, then binary
/// searches between the largest size that fit and the smallest one that did
/// not. A size once marked too large is never selected again.
#[derive(Debug, Clone)]
pub struct ChunkSizer {
    chunk_size: usize,
    highest_good: usize,
    lowest_bad: Option<usize>,
    budget: Duration,
    slice_start: Instant,
}

impl Default for ChunkSizer {
    fn default() -> Self {
        Self::with_budget(TIME_SLICE)
    }
}

impl ChunkSizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_budget(budget: Duration) -> Self {
        Self {
            chunk_size: 1,
            highest_good: 1,
            lowest_bad: None,
            budget,
            slice_start: Instant::now(),
        }
    }

    /// Number of items to process before the next yield
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn highest_good(&self) -> usize {
        self.highest_good
    }

    pub fn lowest_bad(&self) -> Option<usize> {
        self.lowest_bad
    }

    /// Restart the slice clock after yielding.
    pub fn start_slice(&mut self) {
        self.slice_start = Instant::now();
    }

    /// Measure the batch that just ended and pick the next batch size.
    pub fn finish_slice(&mut self) -> usize {
        let elapsed = self.slice_start.elapsed();
        self.record_batch(elapsed)
    }

    /// Record how long a batch of the current size took and return the next size.
    pub fn record_batch(&mut self, elapsed: Duration) -> usize {
        let size = self.chunk_size;

        if elapsed > self.budget {
            let bad = self.lowest_bad.map_or(size, |bad| bad.min(size));
            self.lowest_bad = Some(bad);
            // keep good strictly below bad, a size can't be both
            if self.highest_good >= bad {
                self.highest_good = (bad - 1).max(1);
            }
        } else {
            self.highest_good = self.highest_good.max(size);
        }

        self.chunk_size = match self.lowest_bad {
            None => size.saturating_mul(2),
            Some(bad) if bad > self.highest_good => self.highest_good + (bad - self.highest_good) / 2,
            Some(_) => 1,
        };

        log::trace!(
            "batch of {size} took {elapsed:?}, next {} (good {}, bad {:?})",
            self.chunk_size,
            self.highest_good,
            self.lowest_bad
        );
        self.chunk_size
    }
}

/// Handle passed to the loop body. Calling [`LoopController::stop`] ends the
/// loop after the current item.
#[derive(Debug, Default)]
pub struct LoopController {
    stopped: bool,
}

impl LoopController {
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

/// Run `handler` over every item of `collection` without blocking the runtime
/// for longer than [`TIME_SLICE`] at a time.
///
/// The handler receives the item, its zero-based index and the loop controller.
/// An error returned by the handler aborts the loop immediately and is passed
/// through unchanged; work the handler already committed stays as it is.
pub async fn long_running_loop<I, F, E>(collection: I, mut handler: F) -> std::result::Result<(), E>
where
    I: IntoIterator,
    F: FnMut(I::Item, usize, &mut LoopController) -> std::result::Result<(), E>,
{
    let mut sizer = ChunkSizer::new();
    let mut controller = LoopController::default();
    let mut chunk = 0;

    for (index, item) in collection.into_iter().enumerate() {
        handler(item, index, &mut controller)?;
        if controller.is_stopped() {
            break;
        }

        chunk += 1;
        if chunk >= sizer.chunk_size() {
            chunk = 0;
            sizer.finish_slice();
            tokio::task::yield_now().await;
            sizer.start_slice();
        }
    }
    Ok(())
}
