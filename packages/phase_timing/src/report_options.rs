use std::ops::RangeInclusive;

/// Controls how a [`Report`][crate::Report] lays out and decorates a timing tree.
///
/// # Examples
///
/// ```
/// use phase_timing::{ReportOptions, Timing};
///
/// let timing = Timing::new("Startup");
/// timing.start("load config");
/// timing.stop();
///
/// let options = ReportOptions::new()
///     .numbering_levels(1..=2)
///     .bold(true)
///     .precision(2);
///
/// timing.print_milliseconds(&options);
/// ```
#[derive(Clone, Debug)]
pub struct ReportOptions {
    first_as_tag: bool,
    random_colors: bool,
    bold: bool,
    numbering_levels: RangeInclusive<usize>,
    group_colors_level: usize,
    precision: usize,
}

impl ReportOptions {
    /// Creates options with the default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            first_as_tag: true,
            random_colors: false,
            bold: false,
            numbering_levels: 1..=usize::MAX,
            group_colors_level: 1,
            precision: 4,
        }
    }

    /// Whether the tag column of the title line shows the tag of the reported node.
    /// When disabled, that cell is left blank. It is also left blank when the reported node
    /// has run itself, because its tag then heads its own row.
    ///
    /// Defaults to `true`.
    #[must_use]
    pub fn first_as_tag(self, first_as_tag: bool) -> Self {
        Self {
            first_as_tag,
            ..self
        }
    }

    /// Whether each color group gets a randomly picked color.
    ///
    /// Rows that have a color of their own keep it. Defaults to `false`.
    #[must_use]
    pub fn random_colors(self, random_colors: bool) -> Self {
        Self {
            random_colors,
            ..self
        }
    }

    /// Whether data rows are rendered in bold. Defaults to `false`.
    #[must_use]
    pub fn bold(self, bold: bool) -> Self {
        Self { bold, ..self }
    }

    /// The depth levels, inclusive, whose rows are prefixed with their position among
    /// their siblings (`1.`, `2.`, ...).
    ///
    /// Defaults to every level below the root.
    #[must_use]
    pub fn numbering_levels(self, numbering_levels: RangeInclusive<usize>) -> Self {
        Self {
            numbering_levels,
            ..self
        }
    }

    /// Rows at or above this depth start a new color group; deeper rows inherit the color
    /// of the group they are in.
    ///
    /// Defaults to `1`, so every direct child of the reported node starts a group.
    #[must_use]
    pub fn group_colors_level(self, group_colors_level: usize) -> Self {
        Self {
            group_colors_level,
            ..self
        }
    }

    /// Number of decimal places for time values. Defaults to `4`.
    #[must_use]
    pub fn precision(self, precision: usize) -> Self {
        Self { precision, ..self }
    }

    pub(crate) fn is_first_as_tag(&self) -> bool {
        self.first_as_tag
    }

    pub(crate) fn is_random_colors(&self) -> bool {
        self.random_colors
    }

    pub(crate) fn is_bold(&self) -> bool {
        self.bold
    }

    pub(crate) fn is_numbered(&self, level: usize) -> bool {
        self.numbering_levels.contains(&level)
    }

    pub(crate) fn starts_color_group(&self, level: usize) -> bool {
        level <= self.group_colors_level
    }

    pub(crate) fn decimal_places(&self) -> usize {
        self.precision
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::new()
    }
}
