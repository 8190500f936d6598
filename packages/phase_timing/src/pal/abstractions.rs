use std::fmt::Debug;
use std::time::Duration;

/// Provides the time source that stopwatches measure intervals against.
pub(crate) trait Platform: Debug + Send + Sync + 'static {
    /// Monotonic time elapsed since an arbitrary, fixed anchor point.
    ///
    /// Only differences between two readings are meaningful.
    fn now(&self) -> Duration;
}
