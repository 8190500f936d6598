#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Hierarchical, thread-aware phase timing.
//!
//! Mark named phases with [`Timing::start()`] and [`Timing::stop()`] from any number of threads.
//! Every phase records its elapsed time, and phases started while another one is still open on
//! the same thread are nested beneath it. All threads that use the same root share one tree,
//! which can be rendered as an aligned, optionally colorized [`Report`].
//!
//! The core types are:
//! - [`Timing`] - one node of the timing tree, starting and stopping phases beneath it
//! - [`FlatTiming`] - a snapshot of one node and its position, produced by [`Timing::timings()`]
//! - [`Report`] - the columnized rendering of a flattened tree
//! - [`ReportOptions`] - numbering, coloring and precision settings for reports
//!
//! This package is meant as a development tool for finding out where time goes. It is not a
//! sampling profiler and keeps nothing beyond the lifetime of the tree.
//!
//! # Simple usage
//!
//! ```
//! use phase_timing::{ReportOptions, Timing};
//!
//! let timing = Timing::new("Startup");
//!
//! timing.start("load config");
//! timing.start("parse"); // Nested under "load config".
//! timing.stop();
//! timing.stop();
//!
//! timing.start("connect");
//! timing.stop();
//!
//! timing.print_milliseconds(&ReportOptions::new());
//! ```
//!
//! # Nesting without a call stack
//!
//! The caller never says how deep a phase is. Each node remembers which thread has an
//! interval open on it, and `start()` places the new phase beneath the deepest phase the
//! calling thread already has open. `stop()` closes that deepest phase, [`Timing::stop_levels()`]
//! closes several and [`Timing::stop_all()`] unwinds all of them, which is handy on error paths.
//!
//! ```
//! use phase_timing::Timing;
//!
//! let timing = Timing::new("Request");
//!
//! timing.start("handle");
//! timing.start("query");
//! timing.start("decode");
//!
//! assert_eq!(timing.stop_levels(2), 2); // "decode" and "query"
//! assert_eq!(timing.stop_all(), 1); // "handle"
//! assert!(!timing.stop()); // Nothing left open.
//! ```
//!
//! # Threading
//!
//! [`Timing`] is `Send` and `Sync`. Share the root by reference or in an `Arc` and start
//! phases from as many threads as needed. Each thread's phases nest independently of the
//! others'.
//!
//! A node has at most one open interval at a time. If a second thread starts a tag that
//! another thread still has open under the same parent, it takes that node over. Give
//! phases that run concurrently distinct tags.
//!
//! ```
//! use std::thread;
//!
//! use phase_timing::Timing;
//!
//! let timing = Timing::new("Workers");
//!
//! thread::scope(|scope| {
//!     for worker in 0..4 {
//!         let timing = &timing;
//!         scope.spawn(move || {
//!             timing.start(format!("worker {worker}"));
//!             timing.start("work"); // Nested under this thread's own phase.
//!             timing.stop_all();
//!         });
//!     }
//! });
//!
//! assert_eq!(timing.children().len(), 4);
//! for worker in timing.children() {
//!     assert_eq!(worker.child("work").unwrap().num_samples(), 1);
//! }
//! ```

mod constants;
mod error;
mod flatten;
mod pal;
mod report;
mod report_options;
mod stopwatch;
mod time_unit;
mod timing;

pub use error::{Error, Result};
pub use flatten::FlatTiming;
pub use report::{Report, ReportRow};
pub use report_options::ReportOptions;
pub use stopwatch::Statistics;
pub use time_unit::TimeUnit;
pub use timing::Timing;
