//! Depth-first flattening of a timing tree for reporting.

use std::sync::Arc;
use std::time::Duration;

use crate::stopwatch::Samples;
use crate::timing::TimingState;
use crate::{Statistics, TimeUnit, Timing};

/// One row of a flattened timing tree: a snapshot of a node plus its position in the tree.
///
/// Produced by [`Timing::timings()`].
#[derive(Clone, Debug)]
pub struct FlatTiming {
    tag: String,
    color: Option<String>,
    index: usize,
    level: usize,
    samples: Samples,
    active: bool,
}

impl FlatTiming {
    fn capture(state: &TimingState, index: usize, level: usize) -> Self {
        Self {
            tag: state.tag.clone(),
            color: state.color.clone(),
            index,
            level,
            samples: state.stopwatch.samples(),
            active: state.stopwatch.is_active(),
        }
    }

    /// The tag of the node.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The display color of the node, if any.
    #[must_use]
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// 1-based position of the node among its siblings.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Depth of the node. The root is level 0, its children level 1 and so on.
    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Number of completed intervals at the time of the snapshot.
    #[must_use]
    pub fn num_samples(&self) -> u64 {
        self.samples.count()
    }

    /// Whether an interval was open on the node at the time of the snapshot.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Statistics of the completed intervals at the time of the snapshot.
    #[must_use]
    pub fn statistics(&self, unit: TimeUnit) -> Statistics {
        self.samples.statistics(unit)
    }

    /// The most recently completed interval at the time of the snapshot.
    #[must_use]
    pub fn last_sample(&self) -> Option<Duration> {
        self.samples.last()
    }
}

impl Timing {
    /// Flattens the subtree rooted at `self` in depth-first pre-order.
    ///
    /// `self` is included as the first entry (level 0) only if it has ever run, that is if it
    /// has completed samples or is running right now. Its children are always at level 1.
    ///
    /// Each node is locked only while it is being captured, so other threads may keep
    /// starting and stopping phases during the traversal. Every node's captured child list is
    /// a state that really existed at some point.
    ///
    /// # Examples
    ///
    /// ```
    /// use phase_timing::Timing;
    ///
    /// let timing = Timing::new("Test");
    /// timing.start("A");
    /// timing.start("B");
    /// timing.stop_all();
    ///
    /// let rows: Vec<_> = timing
    ///     .timings()
    ///     .iter()
    ///     .map(|entry| (entry.tag().to_string(), entry.level()))
    ///     .collect();
    ///
    /// assert_eq!(rows, [("A".to_string(), 1), ("B".to_string(), 2)]);
    /// ```
    #[must_use]
    pub fn timings(&self) -> Vec<FlatTiming> {
        let mut entries = Vec::new();

        let children = {
            let state = self.read();

            if state.stopwatch.num_samples() > 0 || state.stopwatch.is_active() {
                entries.push(FlatTiming::capture(&state, 1, 0));
            }

            state.children.clone()
        };

        flatten_children(&children, 1, &mut entries);

        entries
    }

    fn flatten_into(&self, index: usize, level: usize, entries: &mut Vec<FlatTiming>) {
        let children = {
            let state = self.read();
            entries.push(FlatTiming::capture(&state, index, level));
            state.children.clone()
        };

        let child_level = level
            .checked_add(1)
            .expect("tree depth overflows usize - this indicates an unrealistic scenario");

        flatten_children(&children, child_level, entries);
    }
}

fn flatten_children(children: &[Arc<Timing>], level: usize, entries: &mut Vec<FlatTiming>) {
    for (index, child) in (1..).zip(children) {
        child.flatten_into(index, level, entries);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::thread;

    use super::*;
    use crate::pal::{FakePlatform, PlatformFacade};

    fn create_test_timing() -> Timing {
        Timing::with_platform("Test", PlatformFacade::fake(FakePlatform::new()))
    }

    fn shape(entries: &[FlatTiming]) -> Vec<(&str, usize, usize)> {
        entries
            .iter()
            .map(|entry| (entry.tag(), entry.index(), entry.level()))
            .collect()
    }

    #[test]
    fn empty_tree_flattens_to_nothing() {
        let timing = create_test_timing();
        assert!(timing.timings().is_empty());
    }

    #[test]
    fn idle_root_is_skipped() {
        let timing = create_test_timing();

        timing.start("A");
        timing.start("B");
        timing.stop_all();

        assert_eq!(shape(&timing.timings()), [("A", 1, 1), ("B", 1, 2)]);
    }

    #[test]
    fn pre_order_with_sibling_indices() {
        let timing = create_test_timing();

        let a = timing.child_or_insert("A");
        a.child_or_insert("A1");
        a.child_or_insert("A2");
        let b = timing.child_or_insert("B");
        b.child_or_insert("B1");

        assert_eq!(
            shape(&timing.timings()),
            [
                ("A", 1, 1),
                ("A1", 1, 2),
                ("A2", 2, 2),
                ("B", 2, 1),
                ("B1", 1, 2),
            ]
        );
    }

    #[test]
    fn root_that_ran_is_level_zero() {
        let timing = create_test_timing();

        let a = timing.start("A");
        a.start("B");
        timing.stop_all();

        // Flattening from "A", which has run, includes it at level 0.
        assert_eq!(shape(&a.timings()), [("A", 1, 0), ("B", 1, 1)]);
    }

    #[test]
    fn active_root_is_included() {
        let timing = create_test_timing();

        let a = timing.start("A");

        let entries = a.timings();
        assert_eq!(shape(&entries), [("A", 1, 0)]);
        assert!(entries.first().unwrap().is_active());
        assert_eq!(entries.first().unwrap().num_samples(), 0);
    }

    #[test]
    fn snapshot_carries_color_and_samples() {
        let timing = create_test_timing();

        timing.start_with_color("A", "cyan");
        timing.stop();

        let entries = timing.timings();
        let entry = entries.first().unwrap();
        assert_eq!(entry.color(), Some("cyan"));
        assert_eq!(entry.num_samples(), 1);
        assert_eq!(entry.last_sample(), Some(Duration::ZERO));
        assert!(!entry.is_active());
    }

    #[test]
    #[cfg_attr(miri, ignore = "many threads and iterations are too slow under Miri")]
    fn traversal_tolerates_concurrent_mutation() {
        let timing = create_test_timing();

        thread::scope(|scope| {
            scope.spawn(|| {
                for i in 0..200 {
                    timing.start(format!("phase {}", i % 7));
                    timing.start("inner");
                    timing.stop_all();
                }
            });

            for _ in 0..50 {
                for entry in timing.timings() {
                    // Every captured entry is a complete node at a valid depth.
                    assert!(entry.level() == 1 || entry.level() == 2);
                    assert!(entry.index() >= 1);
                }
            }
        });

        assert_eq!(timing.children().len(), 7);
    }
}
