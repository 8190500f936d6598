//! The shared, lock-per-node timing tree.

use std::ptr;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::{self, ThreadId};
use std::time::Duration;

use tracing::{debug, trace};

use crate::constants::ERR_POISONED_LOCK;
use crate::pal::PlatformFacade;
use crate::stopwatch::Stopwatch;
use crate::{Error, Result, Statistics, TimeUnit};

/// One tagged phase in a timing tree, together with all phases nested under it.
///
/// A `Timing` is a stopwatch extended with a tag, an optional display color and an ordered
/// list of uniquely tagged children. Any number of threads may start and stop phases on the
/// same tree at the same time. Every node guards its own state with its own lock, so
/// threads working in different subtrees rarely contend.
///
/// There is no explicit call stack. Each node remembers which thread, if any, currently has
/// an unstopped interval open on it. When a thread calls [`start()`][Self::start], the new
/// phase is nested beneath the deepest phase that same thread has open in this subtree.
/// [`stop()`][Self::stop] closes that deepest phase again.
///
/// # Examples
///
/// ```
/// use phase_timing::Timing;
///
/// let timing = Timing::new("frame");
///
/// timing.start("update");
/// timing.start("physics"); // Nested under "update".
/// timing.stop(); // Stops "physics".
/// timing.stop(); // Stops "update".
///
/// let update = timing.child("update").unwrap();
/// assert_eq!(update.num_samples(), 1);
/// assert_eq!(update.child("physics").unwrap().num_samples(), 1);
/// ```
///
/// # Thread safety
///
/// Locks are only ever taken from ancestor to descendant and never held across a
/// caller-controlled duration.
///
/// If two threads start the same tag on the same node while the first still has it open,
/// the second thread takes over the node: its open interval is restarted and the first
/// thread's next `stop()` no longer finds it.
#[derive(Debug)]
pub struct Timing {
    state: RwLock<TimingState>,
}

#[derive(Debug)]
pub(crate) struct TimingState {
    pub(crate) tag: String,
    pub(crate) color: Option<String>,
    pub(crate) stopwatch: Stopwatch,

    // Thread with an unstopped interval open on this exact node.
    // Present if and only if `stopwatch` is running.
    owner: Option<ThreadId>,

    // Sibling tags are pairwise distinct. Insertion order is report order.
    pub(crate) children: Vec<Arc<Timing>>,
}

impl Timing {
    /// Creates the root of a new timing tree.
    ///
    /// The root is never started itself. Phases started on it become its children.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self::with_stopwatch(tag.into(), Stopwatch::new(PlatformFacade::real()))
    }

    #[cfg(test)]
    pub(crate) fn with_platform(tag: impl Into<String>, platform: PlatformFacade) -> Self {
        Self::with_stopwatch(tag.into(), Stopwatch::new(platform))
    }

    fn with_stopwatch(tag: String, stopwatch: Stopwatch) -> Self {
        Self {
            state: RwLock::new(TimingState {
                tag,
                color: None,
                stopwatch,
                owner: None,
                children: Vec::new(),
            }),
        }
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, TimingState> {
        self.state.read().expect(ERR_POISONED_LOCK)
    }

    fn write(&self) -> RwLockWriteGuard<'_, TimingState> {
        self.state.write().expect(ERR_POISONED_LOCK)
    }

    /// Starts a phase for the calling thread and returns the node that records it.
    ///
    /// The phase is placed beneath the deepest phase the calling thread already has open in
    /// this subtree. If the thread has nothing open here, it becomes a direct child of `self`.
    /// An existing child with the same tag is reused and restarted; otherwise a new child is
    /// appended.
    ///
    /// The returned handle can be used to start further phases directly on that node.
    pub fn start(&self, tag: impl Into<String>) -> Arc<Self> {
        self.start_impl(tag.into(), None)
    }

    /// Same as [`start()`][Self::start] but also sets the display color of the started node.
    ///
    /// The color is a name understood by the `colored` package, such as `"red"` or
    /// `"bright blue"`.
    pub fn start_with_color(&self, tag: impl Into<String>, color: impl Into<String>) -> Arc<Self> {
        self.start_impl(tag.into(), Some(color.into()))
    }

    fn start_impl(&self, tag: String, color: Option<String>) -> Arc<Self> {
        let thread = thread::current().id();
        let mut state = self.write();

        if let Some(active) = state.owned_child(thread) {
            let active = Arc::clone(active);
            return active.start_impl(tag, color);
        }

        if let Some(existing) = state.child_tagged(&tag) {
            let existing = Arc::clone(existing);
            existing.claim(thread, color);
            return existing;
        }

        let child = Arc::new(Self::with_stopwatch(
            tag,
            Stopwatch::new(state.stopwatch.platform().clone()),
        ));
        child.claim(thread, color);

        trace!(parent = %state.tag, child = %child.read().tag, "created timing node");
        state.children.push(Arc::clone(&child));

        child
    }

    // Opens an interval on this node on behalf of `thread`.
    fn claim(&self, thread: ThreadId, color: Option<String>) {
        let mut state = self.write();

        if let Some(previous) = state.owner.filter(|owner| *owner != thread) {
            debug!(
                tag = %state.tag,
                ?previous,
                current = ?thread,
                "timing node taken over by another thread"
            );
        }

        state.stopwatch.start();
        state.owner = Some(thread);

        if let Some(color) = color {
            state.color = Some(color);
        }
    }

    /// Stops the deepest phase the calling thread has open in this subtree.
    ///
    /// Returns `false` if the calling thread has nothing open here.
    pub fn stop(&self) -> bool {
        let thread = thread::current().id();
        let mut state = self.write();

        for child in state.children.iter().filter(|child| child.is_owned_by(thread)) {
            if child.stop() {
                return true;
            }
        }

        state.release(thread)
    }

    /// Stops up to `levels` of the calling thread's open phases in this subtree, deepest first.
    ///
    /// Returns how many were actually stopped, which is less than `levels` if the thread had
    /// fewer phases open here.
    pub fn stop_levels(&self, levels: usize) -> usize {
        if levels == 0 {
            return 0;
        }

        let thread = thread::current().id();
        let mut state = self.write();

        let mut stopped = 0;
        for child in state.children.iter().filter(|child| child.is_owned_by(thread)) {
            stopped = child.stop_levels(levels);

            if stopped == levels {
                return stopped;
            }
        }

        if state.release(thread) {
            #[expect(
                clippy::arithmetic_side_effects,
                reason = "stopped < levels here, so this cannot overflow"
            )]
            {
                stopped += 1;
            }
        }

        stopped
    }

    /// Stops every phase the calling thread has open from its deepest one up to and
    /// including `self`.
    ///
    /// Useful to unwind all of a thread's phases at once on an early return or error path.
    /// Returns how many phases were stopped.
    pub fn stop_all(&self) -> usize {
        let thread = thread::current().id();
        let mut state = self.write();

        let mut stopped = state
            .owned_child(thread)
            .map_or(0, |child| child.stop_all());

        if state.release(thread) {
            #[expect(
                clippy::arithmetic_side_effects,
                reason = "bounded by tree depth, which cannot approach usize::MAX"
            )]
            {
                stopped += 1;
            }
        }

        stopped
    }

    /// Clears the samples of this node and discards all of its children.
    ///
    /// The node itself stays in its parent. Handles to discarded children stay valid but are
    /// no longer part of this tree.
    pub fn reset(&self) {
        let mut state = self.write();

        state.stopwatch.reset();
        state.owner = None;

        let discarded = state.children.len();
        state.children.clear();

        trace!(tag = %state.tag, discarded, "reset timing node");
    }

    /// The tag of this node.
    #[must_use]
    pub fn tag(&self) -> String {
        self.read().tag.clone()
    }

    /// Renames this node.
    ///
    /// Renaming a node to the tag of one of its siblings breaks the uniqueness of sibling
    /// tags. Subsequent lookups by that tag will find the earlier sibling.
    pub fn set_tag(&self, tag: impl Into<String>) {
        self.write().tag = tag.into();
    }

    /// The display color of this node, if any.
    #[must_use]
    pub fn color(&self) -> Option<String> {
        self.read().color.clone()
    }

    /// Sets the display color of this node.
    pub fn set_color(&self, color: impl Into<String>) {
        self.write().color = Some(color.into());
    }

    /// Removes the display color of this node.
    pub fn clear_color(&self) {
        self.write().color = None;
    }

    /// Number of completed intervals recorded on this node.
    #[must_use]
    pub fn num_samples(&self) -> u64 {
        self.read().stopwatch.num_samples()
    }

    /// Whether some thread currently has an interval open on this node.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.read().stopwatch.is_active()
    }

    /// Statistics of the completed intervals on this node, in the given unit.
    #[must_use]
    pub fn statistics(&self, unit: TimeUnit) -> Statistics {
        self.read().stopwatch.samples().statistics(unit)
    }

    /// The most recently completed interval on this node.
    #[must_use]
    pub fn last_sample(&self) -> Option<Duration> {
        self.read().stopwatch.samples().last()
    }

    /// The thread that currently has an interval open on this node, if any.
    #[must_use]
    pub fn owner(&self) -> Option<ThreadId> {
        self.read().owner
    }

    /// The direct children of this node, in insertion order.
    #[must_use]
    pub fn children(&self) -> Vec<Arc<Self>> {
        self.read().children.clone()
    }

    /// Looks up the direct child with the given tag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TagNotFound`] if there is no such child.
    pub fn child(&self, tag: &str) -> Result<Arc<Self>> {
        self.read()
            .child_tagged(tag)
            .map(Arc::clone)
            .ok_or_else(|| Error::TagNotFound {
                tag: tag.to_owned(),
            })
    }

    /// Returns the direct child with the given tag, appending an idle one if there is none.
    ///
    /// Unlike [`start()`][Self::start], this never starts anything or changes ownership. Use it
    /// to lay out the tree ahead of time, for example to fix the order in which phases are
    /// reported.
    pub fn child_or_insert(&self, tag: &str) -> Arc<Self> {
        let mut state = self.write();

        if let Some(existing) = state.child_tagged(tag) {
            return Arc::clone(existing);
        }

        let child = Arc::new(Self::with_stopwatch(
            tag.to_owned(),
            Stopwatch::new(state.stopwatch.platform().clone()),
        ));

        trace!(parent = %state.tag, child = tag, "created idle timing node");
        state.children.push(Arc::clone(&child));

        child
    }

    /// Replaces the contents of `self` with a copy of `source`.
    ///
    /// The copy of `source` is taken first, with only its own subtree read-locked, and `self`
    /// is write-locked afterwards just to swap in the result. No lock of `source` is held while
    /// `self` is locked, so concurrent copies between any nodes cannot deadlock, including
    /// copies between a node and its own ancestor or descendant. Intervals open on `source`
    /// are not carried over: the copy has its completed samples but nothing running.
    pub fn copy_from(&self, source: &Self) {
        if ptr::eq(self, source) {
            return;
        }

        let copy = source.read().to_stopped();

        let mut target = self.write();
        *target = copy;

        debug!(tag = %target.tag, "copied timing tree");
    }

    fn is_owned_by(&self, thread: ThreadId) -> bool {
        self.read().owner == Some(thread)
    }
}

impl Clone for Timing {
    /// Deep-copies this node and its subtree.
    ///
    /// Each node is read-locked only while it is being copied. Intervals that are open at
    /// the time are not carried over.
    fn clone(&self) -> Self {
        Self {
            state: RwLock::new(self.read().to_stopped()),
        }
    }
}

impl TimingState {
    fn owned_child(&self, thread: ThreadId) -> Option<&Arc<Timing>> {
        self.children.iter().find(|child| child.is_owned_by(thread))
    }

    fn child_tagged(&self, tag: &str) -> Option<&Arc<Timing>> {
        self.children.iter().find(|child| child.read().tag == tag)
    }

    // Closes the interval open on this node if `thread` owns it.
    fn release(&mut self, thread: ThreadId) -> bool {
        if self.owner != Some(thread) {
            return false;
        }

        self.stopwatch.stop();
        self.owner = None;
        true
    }

    fn to_stopped(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            color: self.color.clone(),
            stopwatch: self.stopwatch.to_stopped(),
            owner: None,
            children: self
                .children
                .iter()
                .map(|child| Arc::new(Timing::clone(child)))
                .collect(),
        }
    }
}
