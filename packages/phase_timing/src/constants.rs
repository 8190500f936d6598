// A poisoned lock means some thread panicked halfway through mutating the tree. The owner and
// running markers may disagree at that point, so we refuse to continue.
pub(crate) const ERR_POISONED_LOCK: &str = "encountered poisoned lock - the timing tree may be \
    structurally inconsistent and continued execution cannot be trusted";
