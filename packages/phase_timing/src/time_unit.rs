use std::fmt;
use std::time::Duration;

/// The resolution in which statistics and reports express elapsed time.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum TimeUnit {
    /// Seconds.
    Seconds,

    /// Milliseconds.
    Milliseconds,

    /// Microseconds.
    Microseconds,

    /// Nanoseconds.
    Nanoseconds,
}

impl TimeUnit {
    /// Expresses a duration in this unit.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use phase_timing::TimeUnit;
    ///
    /// let value = TimeUnit::Milliseconds.convert(Duration::from_micros(2500));
    /// assert!((value - 2.5).abs() < f64::EPSILON);
    /// ```
    #[must_use]
    pub fn convert(self, duration: Duration) -> f64 {
        // Dividing two integers that are exactly representable keeps whole-unit
        // values exact, which going through `as_secs_f64()` does not.
        #[expect(
            clippy::cast_precision_loss,
            reason = "durations beyond 2^53 ns (~104 days) lose sub-unit precision, acceptable for display"
        )]
        let nanos = duration.as_nanos() as f64;

        #[expect(
            clippy::cast_precision_loss,
            reason = "all divisors are small powers of ten"
        )]
        let per_unit = self.nanos_per_unit() as f64;

        nanos / per_unit
    }

    /// The ASCII abbreviation used in report column titles.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Seconds => "s",
            Self::Milliseconds => "ms",
            Self::Microseconds => "us",
            Self::Nanoseconds => "ns",
        }
    }

    fn nanos_per_unit(self) -> u64 {
        match self {
            Self::Seconds => 1_000_000_000,
            Self::Milliseconds => 1_000_000,
            Self::Microseconds => 1_000,
            Self::Nanoseconds => 1,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}
