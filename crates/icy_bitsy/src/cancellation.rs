//! Cooperative cancellation and progress reporting for a conversion task.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};

use crate::{ConvertError, Result};

/// Polled cancellation flag.
///
/// Clones share the same flag, so the caller keeps one clone to arm it while
/// the conversion checks another at its checkpoints. A fresh token must be
/// created for each task.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the token. Does not wait for in-flight work to stop.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Checkpoint: fails with [`ConvertError::Cancelled`] once the token is armed.
    pub fn throw_if_cancelled(&self) -> Result<()> {
        if self.is_cancelled() { Err(ConvertError::Cancelled) } else { Ok(()) }
    }
}

/// Which pass a conversion is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConversionPhase {
    Idle = 0,
    /// Pass 1: computing the shared baseline
    Baseline = 1,
    /// Pass 2: rasterizing and binarizing glyphs
    Rasterize = 2,
    Finished = 3,
}

impl ConversionPhase {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Baseline,
            2 => Self::Rasterize,
            3 => Self::Finished,
            _ => Self::Idle,
        }
    }
}

impl std::fmt::Display for ConversionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Baseline => "baseline",
            Self::Rasterize => "rasterize",
            Self::Finished => "finished",
        };
        f.pad(name)
    }
}

/// Progress state shared between a running conversion and its observers
#[derive(Debug, Default)]
pub struct ConversionProgress {
    phase: AtomicU8,
    /// Items processed in the current phase
    processed: AtomicUsize,
    /// Number of items in the current phase
    total: AtomicUsize,
}

impl ConversionProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ConversionPhase {
        ConversionPhase::from_u8(self.phase.load(Ordering::Relaxed))
    }

    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    /// Fraction of the current phase that is done, in `0.0..=1.0`
    pub fn fraction(&self) -> f32 {
        let total = self.total();
        if total == 0 {
            return if self.phase() == ConversionPhase::Finished { 1.0 } else { 0.0 };
        }
        (self.processed() as f32 / total as f32).min(1.0)
    }

    pub(crate) fn begin_phase(&self, phase: ConversionPhase, total: usize) {
        self.total.store(total, Ordering::Relaxed);
        self.processed.store(0, Ordering::Relaxed);
        self.phase.store(phase as u8, Ordering::Relaxed);
    }

    pub(crate) fn advance(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn finish(&self) {
        self.phase.store(ConversionPhase::Finished as u8, Ordering::Relaxed);
    }
}
