//! Text report with proportional bars
//!
//! ```text
//! a           3  ∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎
//! b           2  ∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎
//! OTHER       1  ∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎∎
//! ```

use std::borrow::Cow;
use std::io::{self, Write};

use crate::frequency::ItemCount;

/// Label of the aggregate row
pub const OTHER_LABEL: &str = "OTHER";
/// Bar length of the largest row
pub const BAR_WIDTH: u64 = 50;
/// Bar glyph
pub const BAR_GLYPH: char = '∎';
/// Minimum width of the count column
pub const COUNT_WIDTH: usize = 6;

/// Ranked rows plus the stream total they were drawn from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report<T> {
    rows: Vec<ItemCount<T>>,
    total: u64,
    other: Option<u64>,
}

impl<T: AsRef<[u8]>> Report<T> {
    pub fn new(rows: Vec<ItemCount<T>>, total: u64) -> Self {
        Self {
            rows,
            total,
            other: None,
        }
    }

    /// Add or remove the aggregate row for records not covered by `rows`
    ///
    /// The aggregate is `total - Σ counts`, floored at zero: approximate
    /// engines may over-estimate, so the sum can exceed the total.
    pub fn with_other(mut self, enabled: bool) -> Self {
        self.other = enabled.then(|| self.total.saturating_sub(self.reported()));
        self
    }

    pub fn rows(&self) -> &[ItemCount<T>] {
        &self.rows
    }

    /// Records in the stream
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Sum of the reported counts
    pub fn reported(&self) -> u64 {
        self.rows.iter().map(|row| row.count).sum()
    }

    /// Count of the aggregate row, if enabled
    pub fn other(&self) -> Option<u64> {
        self.other
    }

    /// Check if there is nothing to render
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Labels and counts in output order, aggregate row last
    pub fn lines(&self) -> Vec<(Cow<'_, str>, u64)> {
        if self.rows.is_empty() {
            return Vec::new();
        }
        let mut lines: Vec<_> = self
            .rows
            .iter()
            .map(|row| (String::from_utf8_lossy(row.item.as_ref()), row.count))
            .collect();
        if let Some(other) = self.other {
            lines.push((Cow::Borrowed(OTHER_LABEL), other));
        }
        lines
    }

    /// Write one aligned line per row
    ///
    /// Nothing is written when there are no rows, even with the aggregate
    /// row enabled.
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let lines = self.lines();

        let label_width = lines
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);
        let max_count = lines.iter().map(|&(_, count)| count).max().unwrap_or(0);

        for (label, count) in &lines {
            let bar = bar_length(*count, max_count);
            let bar: String = std::iter::repeat(BAR_GLYPH).take(bar).collect();
            writeln!(
                out,
                "{:<label_width$}  {:>count_width$}  {}",
                label,
                count,
                bar,
                label_width = label_width,
                count_width = COUNT_WIDTH,
            )?;
        }
        Ok(())
    }

    /// Render into a string
    pub fn to_text(&self) -> String {
        let mut out = Vec::new();
        // writing into a Vec cannot fail
        let _ = self.render(&mut out);
        String::from_utf8_lossy(&out).into_owned()
    }
}

/// Bar length for `count` when `max_count` maps to [`BAR_WIDTH`]
pub fn bar_length(count: u64, max_count: u64) -> usize {
    if max_count == 0 {
        return 0;
    }
    (u128::from(count) * u128::from(BAR_WIDTH) / u128::from(max_count)) as usize
}
