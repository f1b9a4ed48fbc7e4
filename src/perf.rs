//! Scoped timing for hot paths.
//!
//! Gesture handlers, packing, painting and background decoding are wrapped in
//! [`profile_scope!`]. Without the `profiling` feature the macro compiles to
//! nothing. With it, every scope records its duration into a process-wide
//! table (shared with worker threads) and logs scopes that run long.
//!
//! ```ignore
//! fn pack() {
//!     profile_scope!("pack_rects");
//!     // ...
//! }
//! ```

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{trace, warn};

/// Scopes slower than this are logged at warn level
pub const DEFAULT_THRESHOLD_MS: f64 = 16.0;

static PROFILING_ENABLED: AtomicBool = AtomicBool::new(cfg!(feature = "profiling"));

static STATS: Mutex<BTreeMap<&'static str, OperationStats>> = parking_lot::const_mutex(BTreeMap::new());

/// Time the rest of the enclosing block. No-op without the `profiling`
/// feature.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::new($name, $crate::perf::DEFAULT_THRESHOLD_MS);
        #[cfg(not(feature = "profiling"))]
        let _ = $name;
    };
    ($name:expr, $threshold_ms:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::new($name, $threshold_ms);
        #[cfg(not(feature = "profiling"))]
        let _ = ($name, $threshold_ms);
    };
}

/// Turn recording on or off at runtime. Only matters with the feature.
pub fn set_profiling_enabled(enabled: bool) {
    PROFILING_ENABLED.store(enabled, Ordering::Relaxed);
}

#[inline]
pub fn is_profiling_enabled() -> bool {
    PROFILING_ENABLED.load(Ordering::Relaxed)
}

/// Aggregate timings for one scope name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperationStats {
    pub count: u64,
    pub total_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

impl Default for OperationStats {
    fn default() -> Self {
        Self {
            count: 0,
            total_ms: 0.0,
            min_ms: f64::MAX,
            max_ms: 0.0,
        }
    }
}

impl OperationStats {
    pub fn record(&mut self, ms: f64) {
        self.count += 1;
        self.total_ms += ms;
        self.min_ms = self.min_ms.min(ms);
        self.max_ms = self.max_ms.max(ms);
    }

    pub fn average_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_ms / self.count as f64
        }
    }
}

/// Record one sample for `name`.
pub fn record_operation(name: &'static str, elapsed_ms: f64) {
    STATS.lock().entry(name).or_default().record(elapsed_ms);
}

/// Snapshot of every recorded scope, by name.
pub fn operation_stats() -> BTreeMap<&'static str, OperationStats> {
    STATS.lock().clone()
}

pub fn reset_stats() {
    STATS.lock().clear();
}

/// Records its lifetime on drop.
pub struct ScopedTimer {
    name: &'static str,
    start: Instant,
    threshold_ms: f64,
}

impl ScopedTimer {
    pub fn new(name: &'static str, threshold_ms: f64) -> Self {
        Self {
            name,
            start: Instant::now(),
            threshold_ms,
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        if !is_profiling_enabled() {
            return;
        }
        let elapsed = self.elapsed_ms();
        record_operation(self.name, elapsed);
        if elapsed > self.threshold_ms {
            warn!(scope = self.name, elapsed_ms = elapsed, "slow scope");
        } else {
            trace!(scope = self.name, elapsed_ms = elapsed);
        }
    }
}

/// Run `f` and return its result with the elapsed milliseconds.
pub fn measure<T>(f: impl FnOnce() -> T) -> (T, f64) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed().as_secs_f64() * 1000.0)
}
