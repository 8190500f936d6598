use std::sync::LazyLock;
use std::time::{Duration, Instant};

use crate::pal::abstractions::Platform;

// All readings in the process are taken against the same anchor, so they are comparable
// no matter which node or thread took them.
static ANCHOR: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Real implementation of the platform abstraction, backed by [`Instant`].
#[derive(Clone, Debug)]
pub(crate) struct RealPlatform;

impl Platform for RealPlatform {
    fn now(&self) -> Duration {
        ANCHOR.elapsed()
    }
}
