//! Demonstrates nested phases recorded from two threads into one timing tree.
//!
//! Run with: `cargo run --example phase_timing_basic`.

use std::hint::black_box;
use std::thread;
use std::time::Duration;

use phase_timing::{ReportOptions, Timing};

fn main() {
    let timing = Timing::new("Example");

    thread::scope(|scope| {
        scope.spawn(|| {
            timing.start("download");
            thread::sleep(Duration::from_millis(20));

            timing.start("verify");
            checksum(200_000);
            timing.stop();

            timing.stop();
        });

        scope.spawn(|| {
            for _ in 0..3 {
                timing.start_with_color("compute", "cyan");

                timing.start("prepare");
                checksum(50_000);
                timing.stop();

                timing.start("solve");
                checksum(150_000);
                timing.stop();

                timing.stop();
            }
        });
    });

    println!("Default report:");
    timing.print_milliseconds(&ReportOptions::new());
    println!();

    println!("Random colors, bold, two decimal places:");
    timing.print_microseconds(
        &ReportOptions::new()
            .random_colors(true)
            .bold(true)
            .precision(2),
    );
}

fn checksum(iterations: u64) -> u64 {
    let mut sum = 0_u64;
    for i in 0..iterations {
        sum = sum.wrapping_add(black_box(i).wrapping_mul(31));
    }
    black_box(sum)
}
