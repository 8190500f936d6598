//! Columnized, optionally colorized rendering of a flattened timing tree.

use std::fmt::{self, Display};

use colored::{Color, ColoredString, Colorize};
use rand::seq::IndexedRandom;

use crate::{FlatTiming, ReportOptions, TimeUnit, Timing};

const COLUMN_COUNT: usize = 6;

const COLUMN_SEPARATOR: &str = "  ";

/// Colors handed out to groups when random colors are requested.
const RANDOM_PALETTE: &[&str] = &[
    "red",
    "green",
    "yellow",
    "blue",
    "magenta",
    "cyan",
    "bright red",
    "bright green",
    "bright yellow",
    "bright blue",
    "bright magenta",
    "bright cyan",
];

/// A human-readable table of the phases recorded in a timing tree.
///
/// The first column holds the tags, indented by two spaces per depth level and optionally
/// numbered. The remaining columns hold the number of completed intervals and the total,
/// mean, minimum and maximum elapsed time, centered within their column.
///
/// For terminal output, use the `Display` implementation or
/// [`print_to_stdout()`][Self::print_to_stdout]. Colors follow the usual `NO_COLOR` and
/// `CLICOLOR` conventions. For programmatic access, inspect [`rows()`][Self::rows].
///
/// # Examples
///
/// ```
/// use phase_timing::{ReportOptions, TimeUnit, Timing};
///
/// let timing = Timing::new("Test");
/// timing.start("A");
/// timing.start("B");
/// timing.stop_all();
///
/// let report = timing.report(
///     TimeUnit::Milliseconds,
///     &ReportOptions::new().numbering_levels(1..=2),
/// );
///
/// let tags: Vec<_> = report.rows().map(|row| row.tag()).collect();
/// assert_eq!(tags, ["  1. A", "    1. B"]);
/// ```
#[derive(Clone, Debug)]
pub struct Report {
    title: ReportRow,
    rows: Vec<ReportRow>,
    bold: bool,
}

/// One line of a [`Report`]: the display strings of every column plus the row's color.
#[derive(Clone, Debug)]
pub struct ReportRow {
    // Tag, calls, total, mean, min, max.
    cells: [String; COLUMN_COUNT],
    color: Option<String>,
}

impl Report {
    /// Lays out a flattened timing tree as a report.
    ///
    /// `root_tag` labels the title line if [`ReportOptions::first_as_tag()`] is enabled and
    /// the root does not already have a row of its own (an entry at level 0).
    #[must_use]
    pub fn new(
        root_tag: &str,
        entries: &[FlatTiming],
        unit: TimeUnit,
        options: &ReportOptions,
    ) -> Self {
        let root_has_row = entries.first().is_some_and(|entry| entry.level() == 0);

        let title_tag = if options.is_first_as_tag() && !root_has_row {
            root_tag.to_owned()
        } else {
            String::new()
        };

        let title = ReportRow {
            cells: [
                title_tag,
                "Calls".to_owned(),
                format!("Total ({unit})"),
                format!("Mean ({unit})"),
                format!("Min ({unit})"),
                format!("Max ({unit})"),
            ],
            color: None,
        };

        let rows = entries
            .iter()
            .zip(group_colors(entries, options))
            .map(|(entry, color)| ReportRow {
                cells: row_cells(entry, unit, options),
                color,
            })
            .collect();

        Self {
            title,
            rows,
            bold: options.is_bold(),
        }
    }

    /// The title line naming each column.
    #[must_use]
    pub fn title(&self) -> &ReportRow {
        &self.title
    }

    /// The data rows, one per flattened timing, in tree order.
    pub fn rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter()
    }

    /// Whether the report has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders the report without any colors or text styles.
    #[must_use]
    pub fn to_plain_string(&self) -> String {
        let widths = self.column_widths();

        let mut output = String::new();
        for row in self.lines() {
            output.push_str(&row.render(&widths));
            output.push('\n');
        }

        output
    }

    /// Prints the report to stdout.
    ///
    /// Prints nothing if there are no data rows.
    #[cfg_attr(test, mutants::skip)] // Too difficult to test stdout output reliably - manually tested.
    pub fn print_to_stdout(&self) {
        if self.is_empty() {
            return;
        }

        print!("{self}");
    }

    fn lines(&self) -> impl Iterator<Item = &ReportRow> {
        std::iter::once(&self.title).chain(&self.rows)
    }

    fn column_widths(&self) -> [usize; COLUMN_COUNT] {
        let mut widths = [0; COLUMN_COUNT];

        for row in self.lines() {
            for (width, cell) in widths.iter_mut().zip(&row.cells) {
                *width = (*width).max(cell.chars().count());
            }
        }

        widths
    }

    fn style(&self, line: &str, row: &ReportRow) -> ColoredString {
        let mut styled = line.normal();

        if let Some(color) = row.color.as_deref().and_then(|color| color.parse::<Color>().ok()) {
            styled = styled.color(color);
        }

        if self.bold {
            styled = styled.bold();
        }

        styled
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.column_widths();

        writeln!(f, "{}", self.title.render(&widths))?;

        for row in &self.rows {
            writeln!(f, "{}", self.style(&row.render(&widths), row))?;
        }

        Ok(())
    }
}

impl ReportRow {
    /// The tag column, including indentation and numbering.
    #[must_use]
    pub fn tag(&self) -> &str {
        let [tag, ..] = &self.cells;
        tag
    }

    /// All columns of the row: tag, calls, total, mean, min and max.
    #[must_use]
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// The color this row is rendered in, if any.
    #[must_use]
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    // The tag column is left-aligned, all others are centered.
    fn render(&self, widths: &[usize; COLUMN_COUNT]) -> String {
        let [tag, values @ ..] = &self.cells;
        let [tag_width, value_widths @ ..] = widths;

        let mut line = String::new();
        line.push_str(tag);
        line.push_str(&" ".repeat(tag_width.saturating_sub(tag.chars().count())));

        for (value, width) in values.iter().zip(value_widths) {
            let (left, right) = centering_padding(value.chars().count(), *width);

            line.push_str(COLUMN_SEPARATOR);
            line.push_str(&" ".repeat(left));
            line.push_str(value);
            line.push_str(&" ".repeat(right));
        }

        line.truncate(line.trim_end().len());
        line
    }
}

/// Splits the free space around a value of `len` characters in a column `width` wide.
///
/// The left side gets the larger half when the free space is odd.
fn centering_padding(len: usize, width: usize) -> (usize, usize) {
    let spare = width.saturating_sub(len);
    let left = spare.div_ceil(2);
    let right = spare
        .checked_sub(left)
        .expect("ceil of half is never more than the whole");

    (left, right)
}

fn tag_cell(entry: &FlatTiming, options: &ReportOptions) -> String {
    let indent = " ".repeat(entry.level().saturating_mul(2));

    if options.is_numbered(entry.level()) {
        format!("{indent}{}. {}", entry.index(), entry.tag())
    } else {
        format!("{indent}{}", entry.tag())
    }
}

fn row_cells(entry: &FlatTiming, unit: TimeUnit, options: &ReportOptions) -> [String; COLUMN_COUNT] {
    let stats = entry.statistics(unit);
    let precision = options.decimal_places();

    [
        tag_cell(entry, options),
        entry.num_samples().to_string(),
        format!("{:.precision$}", stats.total()),
        format!("{:.precision$}", stats.mean()),
        format!("{:.precision$}", stats.min()),
        format!("{:.precision$}", stats.max()),
    ]
}

/// Decides the color of every row.
///
/// A row at or above the grouping level starts a new group. The group takes a random palette
/// color if requested, otherwise the color of the row that started it. A row's own color
/// always takes precedence over its group's.
fn group_colors(entries: &[FlatTiming], options: &ReportOptions) -> Vec<Option<String>> {
    let mut rng = rand::rng();
    let mut group_color: Option<String> = None;

    entries
        .iter()
        .map(|entry| {
            if options.starts_color_group(entry.level()) {
                group_color = if options.is_random_colors() {
                    RANDOM_PALETTE.choose(&mut rng).map(|color| (*color).to_owned())
                } else {
                    entry.color().map(str::to_owned)
                };
            }

            entry
                .color()
                .map(str::to_owned)
                .or_else(|| group_color.clone())
        })
        .collect()
}

impl Timing {
    /// Builds a report of the subtree rooted at `self`, with time values in `unit`.
    #[must_use]
    pub fn report(&self, unit: TimeUnit, options: &ReportOptions) -> Report {
        Report::new(&self.tag(), &self.timings(), unit, options)
    }

    /// Prints a report of the subtree rooted at `self` to stdout, in seconds.
    ///
    /// Prints nothing if nothing in the subtree has been recorded.
    #[cfg_attr(test, mutants::skip)] // Too difficult to test stdout output reliably - manually tested.
    pub fn print_seconds(&self, options: &ReportOptions) {
        self.report(TimeUnit::Seconds, options).print_to_stdout();
    }

    /// Prints a report of the subtree rooted at `self` to stdout, in milliseconds.
    ///
    /// Prints nothing if nothing in the subtree has been recorded.
    #[cfg_attr(test, mutants::skip)] // Too difficult to test stdout output reliably - manually tested.
    pub fn print_milliseconds(&self, options: &ReportOptions) {
        self.report(TimeUnit::Milliseconds, options).print_to_stdout();
    }

    /// Prints a report of the subtree rooted at `self` to stdout, in microseconds.
    ///
    /// Prints nothing if nothing in the subtree has been recorded.
    #[cfg_attr(test, mutants::skip)] // Too difficult to test stdout output reliably - manually tested.
    pub fn print_microseconds(&self, options: &ReportOptions) {
        self.report(TimeUnit::Microseconds, options).print_to_stdout();
    }

    /// Prints a report of the subtree rooted at `self` to stdout, in nanoseconds.
    ///
    /// Prints nothing if nothing in the subtree has been recorded.
    #[cfg_attr(test, mutants::skip)] // Too difficult to test stdout output reliably - manually tested.
    pub fn print_nanoseconds(&self, options: &ReportOptions) {
        self.report(TimeUnit::Nanoseconds, options).print_to_stdout();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::pal::{FakePlatform, PlatformFacade};

    fn create_test_timing() -> (Timing, FakePlatform) {
        let clock = FakePlatform::new();
        let timing = Timing::with_platform("Test", PlatformFacade::fake(clock.clone()));
        (timing, clock)
    }

    fn plain_lines(report: &Report) -> Vec<String> {
        report.to_plain_string().lines().map(str::to_owned).collect()
    }

    #[test]
    fn centering_gives_left_the_larger_half() {
        assert_eq!(centering_padding(3, 3), (0, 0));
        assert_eq!(centering_padding(2, 5), (2, 1));
        assert_eq!(centering_padding(1, 5), (2, 2));
        assert_eq!(centering_padding(0, 1), (1, 0));
        assert_eq!(centering_padding(7, 3), (0, 0));
    }

    #[test]
    fn nested_tags_indent_and_number() {
        let (timing, _clock) = create_test_timing();

        timing.start("A");
        timing.start("B");
        timing.stop_all();

        let report = timing.report(
            TimeUnit::Milliseconds,
            &ReportOptions::new().numbering_levels(1..=2),
        );

        let mut tags = vec![report.title().tag()];
        tags.extend(report.rows().map(ReportRow::tag));
        assert_eq!(tags, ["Test", "  1. A", "    1. B"]);
    }

    #[test]
    fn numbering_range_limits_prefixes() {
        let (timing, _clock) = create_test_timing();

        timing.start("A");
        timing.start("B");
        timing.stop_all();
        timing.start("C");
        timing.stop();

        let report = timing.report(
            TimeUnit::Milliseconds,
            &ReportOptions::new().numbering_levels(2..=2),
        );

        let tags: Vec<_> = report.rows().map(ReportRow::tag).collect();
        assert_eq!(tags, ["  A", "    1. B", "  C"]);
    }

    #[test]
    fn root_that_ran_gets_its_own_row() {
        let (timing, _clock) = create_test_timing();

        let a = timing.start("A");
        a.start("B");
        timing.stop_all();

        let report = a.report(TimeUnit::Milliseconds, &ReportOptions::new());

        // The root's own row carries its tag, so the title cell stays blank.
        assert_eq!(report.title().tag(), "");
        let tags: Vec<_> = report.rows().map(ReportRow::tag).collect();
        assert_eq!(tags, ["A", "  1. B"]);
    }

    #[test]
    fn unlabeled_title_without_first_as_tag() {
        let (timing, _clock) = create_test_timing();

        timing.start("A");
        timing.stop();

        let report = timing.report(
            TimeUnit::Milliseconds,
            &ReportOptions::new().first_as_tag(false),
        );

        assert_eq!(report.title().tag(), "");
        assert_eq!(
            report.title().cells(),
            ["", "Calls", "Total (ms)", "Mean (ms)", "Min (ms)", "Max (ms)"]
        );
    }

    #[test]
    fn value_columns_use_unit_and_precision() {
        let (timing, clock) = create_test_timing();

        for millis in [10, 30] {
            timing.start("A");
            clock.advance(Duration::from_millis(millis));
            timing.stop();
        }

        let report = timing.report(TimeUnit::Seconds, &ReportOptions::new().precision(2));

        let row = report.rows().next().unwrap();
        assert_eq!(row.cells(), ["  1. A", "2", "0.04", "0.02", "0.01", "0.03"]);
        assert_eq!(report.title().cells().get(2).map(String::as_str), Some("Total (s)"));
    }

    #[test]
    fn lines_are_aligned() {
        let (timing, clock) = create_test_timing();

        timing.start("Load");
        clock.advance(Duration::from_millis(1500));
        timing.start("Parse");
        clock.advance(Duration::from_millis(5));
        timing.stop_all();

        let report = timing.report(
            TimeUnit::Milliseconds,
            &ReportOptions::new().precision(1),
        );

        assert_eq!(
            plain_lines(&report),
            [
                "Test          Calls  Total (ms)  Mean (ms)  Min (ms)  Max (ms)",
                "  1. Load       1      1505.0      1505.0    1505.0    1505.0",
                "    1. Parse    1        5.0        5.0        5.0       5.0",
            ]
        );
    }

    #[test]
    fn empty_tree_gives_empty_report() {
        let (timing, _clock) = create_test_timing();

        let report = timing.report(TimeUnit::Nanoseconds, &ReportOptions::new());

        assert!(report.is_empty());
        assert_eq!(plain_lines(&report).len(), 1);
    }

    #[test]
    fn group_inherits_leader_color() {
        let (timing, _clock) = create_test_timing();

        timing.start_with_color("A", "red");
        timing.start("A.1");
        timing.stop_all();
        timing.start("B");
        timing.start_with_color("B.1", "blue");
        timing.stop_all();

        let report = timing.report(TimeUnit::Milliseconds, &ReportOptions::new());

        let colors: Vec<_> = report.rows().map(ReportRow::color).collect();
        assert_eq!(colors, [Some("red"), Some("red"), None, Some("blue")]);
    }

    #[test]
    fn deeper_group_level_splits_groups() {
        let (timing, _clock) = create_test_timing();

        timing.start_with_color("A", "red");
        timing.start_with_color("A.1", "green");
        timing.start("A.1.x");
        timing.stop_all();

        let shallow = timing.report(TimeUnit::Milliseconds, &ReportOptions::new());
        let colors: Vec<_> = shallow.rows().map(ReportRow::color).collect();
        assert_eq!(colors, [Some("red"), Some("green"), Some("red")]);

        let deep = timing.report(
            TimeUnit::Milliseconds,
            &ReportOptions::new().group_colors_level(2),
        );
        let colors: Vec<_> = deep.rows().map(ReportRow::color).collect();
        assert_eq!(colors, [Some("red"), Some("green"), Some("green")]);
    }

    #[test]
    fn random_colors_come_from_palette_and_cover_groups() {
        let (timing, _clock) = create_test_timing();

        timing.start("A");
        timing.start("A.1");
        timing.stop_all();
        timing.start("B");
        timing.stop();

        let report = timing.report(
            TimeUnit::Milliseconds,
            &ReportOptions::new().random_colors(true),
        );

        let colors: Vec<_> = report.rows().map(ReportRow::color).collect();
        assert_eq!(colors.len(), 3);
        for color in &colors {
            let color = color.expect("every row is in a colored group");
            assert!(RANDOM_PALETTE.contains(&color));
        }

        // "A.1" is in the group that "A" started.
        assert_eq!(colors.first(), colors.get(1));
    }

    #[test]
    fn own_color_wins_over_random_group_color() {
        let (timing, _clock) = create_test_timing();

        timing.start_with_color("A", "not a real color");
        timing.stop();

        let report = timing.report(
            TimeUnit::Milliseconds,
            &ReportOptions::new().random_colors(true),
        );

        let row = report.rows().next().unwrap();
        assert_eq!(row.color(), Some("not a real color"));

        // Unknown color names render as plain text.
        assert_eq!(report.style("x", row), "x".normal());
    }

    #[test]
    fn plain_rendering_has_no_escape_codes() {
        let (timing, _clock) = create_test_timing();

        timing.start_with_color("A", "red");
        timing.stop();

        let report = timing.report(
            TimeUnit::Milliseconds,
            &ReportOptions::new().bold(true).random_colors(true),
        );

        assert!(!report.to_plain_string().contains('\u{1b}'));
    }

    static_assertions::assert_impl_all!(Report: Send, Sync);
    static_assertions::assert_impl_all!(ReportRow: Send, Sync);
}
