//! Elapsed-time accumulation for a single named interval.

use std::cmp;
use std::num::NonZero;
use std::time::Duration;

use crate::TimeUnit;
use crate::pal::{Platform, PlatformFacade};

/// Accumulates completed intervals and tracks whether one is currently open.
///
/// Starting a stopwatch that is already running moves the start of the open interval to
/// "now" instead of failing. Stopping one that is not running does nothing.
#[derive(Clone, Debug)]
pub(crate) struct Stopwatch {
    platform: PlatformFacade,

    // Clock reading at the start of the open interval. `None` when stopped.
    started_at: Option<Duration>,

    samples: Samples,
}

impl Stopwatch {
    pub(crate) fn new(platform: PlatformFacade) -> Self {
        Self {
            platform,
            started_at: None,
            samples: Samples::default(),
        }
    }

    pub(crate) fn start(&mut self) {
        self.started_at = Some(self.platform.now());
    }

    pub(crate) fn stop(&mut self) {
        if let Some(started_at) = self.started_at.take() {
            // A monotonic clock cannot go backwards but a fake one can be set to anything.
            let elapsed = self.platform.now().saturating_sub(started_at);
            self.samples.record(elapsed);
        }
    }

    pub(crate) fn reset(&mut self) {
        self.started_at = None;
        self.samples = Samples::default();
    }

    pub(crate) fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    pub(crate) fn num_samples(&self) -> u64 {
        self.samples.count
    }

    pub(crate) fn samples(&self) -> Samples {
        self.samples
    }

    pub(crate) fn platform(&self) -> &PlatformFacade {
        &self.platform
    }

    /// A copy with the same completed samples but no open interval.
    pub(crate) fn to_stopped(&self) -> Self {
        Self {
            platform: self.platform.clone(),
            started_at: None,
            samples: self.samples,
        }
    }
}

/// Running aggregate of completed intervals. Individual samples are not retained.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Samples {
    count: u64,
    total: Duration,
    min: Duration,
    max: Duration,
    last: Option<Duration>,
}

impl Samples {
    fn record(&mut self, elapsed: Duration) {
        if self.count == 0 {
            self.min = elapsed;
            self.max = elapsed;
        } else {
            self.min = cmp::min(self.min, elapsed);
            self.max = cmp::max(self.max, elapsed);
        }

        self.count = self
            .count
            .checked_add(1)
            .expect("sample count overflows u64 - this indicates an unrealistic scenario");

        self.total = self.total.checked_add(elapsed).expect(
            "elapsed time accumulation overflows Duration - this indicates an unrealistic scenario",
        );

        self.last = Some(elapsed);
    }

    pub(crate) fn count(&self) -> u64 {
        self.count
    }

    pub(crate) fn last(&self) -> Option<Duration> {
        self.last
    }

    pub(crate) fn statistics(&self, unit: TimeUnit) -> Statistics {
        let Some(count) = NonZero::new(self.count) else {
            return Statistics::default();
        };

        let total = unit.convert(self.total);

        #[expect(
            clippy::cast_precision_loss,
            reason = "sample counts beyond 2^53 are not realistic"
        )]
        let mean = total / count.get() as f64;

        Statistics {
            count: count.get(),
            min: unit.convert(self.min),
            max: unit.convert(self.max),
            mean,
            total,
        }
    }
}

/// Summary of the completed intervals of one timing, expressed in a chosen [`TimeUnit`].
///
/// All values are zero if nothing has completed yet. An interval that is still running
/// does not contribute.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Statistics {
    count: u64,
    min: f64,
    max: f64,
    mean: f64,
    total: f64,
}

impl Statistics {
    /// Number of completed intervals.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Shortest completed interval.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Longest completed interval.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Mean of the completed intervals.
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sum of all completed intervals.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.total
    }
}
