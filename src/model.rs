use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Calendar date — the only time type. Stays have day granularity;
/// check-in/check-out clock times are a front-desk concern, not a layout one.
pub type Day = NaiveDate;

/// Every grid week starts on this weekday.
pub const WEEK_START: Weekday = Weekday::Mon;

pub const DAYS_PER_WEEK: usize = 7;

/// Half-open date range `[start, end)` — `end` is the checkout day and is
/// not occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: Day,
    pub end: Day,
}

impl Span {
    pub fn new(start: Day, end: Day) -> Self {
        debug_assert!(start < end, "Span start must be before end");
        Self { start, end }
    }

    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains_day(&self, day: Day) -> bool {
        self.start <= day && day < self.end
    }

    /// Iterate the occupied days, checkout day excluded.
    pub fn days(&self) -> impl Iterator<Item = Day> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d < end)
    }

    /// Intersection with `other`, or None when they don't overlap.
    pub fn clamp_to(&self, other: &Span) -> Option<Span> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Span::new(
            self.start.max(other.start),
            self.end.min(other.end),
        ))
    }
}

/// Exactly seven consecutive days, Monday through Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Week {
    start: Day,
}

impl Week {
    /// The week containing `day`, snapped back to Monday.
    pub fn containing(day: Day) -> Self {
        let back = day.weekday().num_days_from_monday() as u64;
        Self {
            start: day - Days::new(back),
        }
    }

    /// Monday.
    pub fn start(&self) -> Day {
        self.start
    }

    /// Exclusive end: the Monday of the following week.
    pub fn end(&self) -> Day {
        self.start + Days::new(7)
    }

    /// Sunday — the last day on the grid row.
    pub fn last_day(&self) -> Day {
        self.start + Days::new(6)
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end())
    }

    pub fn next(&self) -> Week {
        Week { start: self.end() }
    }

    /// Column (0–6) of `day`, or None when the day is outside this week.
    pub fn col(&self, day: Day) -> Option<usize> {
        if day < self.start || day >= self.end() {
            return None;
        }
        Some((day - self.start).num_days() as usize)
    }

    pub fn day_at(&self, col: usize) -> Day {
        debug_assert!(col < DAYS_PER_WEEK, "column out of range");
        self.start + Days::new(col as u64)
    }

    pub fn days(&self) -> impl Iterator<Item = Day> + use<> {
        self.span().days()
    }
}

/// A calendar month, anchoring the grid view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Month {
    /// Always the 1st.
    first: Day,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    pub fn containing(day: Day) -> Self {
        Self {
            first: day.with_day(1).expect("day 1 exists in every month"),
        }
    }

    pub fn first_day(&self) -> Day {
        self.first
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    /// True for days belonging to this month proper — lets the renderer gray
    /// out the leading/trailing cells of the grid.
    pub fn contains(&self, day: Day) -> bool {
        day.year() == self.first.year() && day.month() == self.first.month()
    }

    pub fn next(&self) -> Month {
        Month {
            first: self.first + Months::new(1),
        }
    }

    pub fn prev(&self) -> Month {
        Month {
            first: self.first - Months::new(1),
        }
    }
}

/// The contiguous run of days currently on screen. May be empty — an empty
/// calendar view is a valid state, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewWindow {
    start: Day,
    days: u32,
}

impl ViewWindow {
    pub fn new(start: Day, days: u32) -> Self {
        Self { start, days }
    }

    /// A window of `count` full weeks starting at `first`.
    pub fn weeks(first: Week, count: u32) -> Self {
        Self::new(first.start(), count * DAYS_PER_WEEK as u32)
    }

    pub fn start(&self) -> Day {
        self.start
    }

    /// Exclusive end.
    pub fn end(&self) -> Day {
        self.start + Days::new(self.days as u64)
    }

    pub fn len_days(&self) -> u32 {
        self.days
    }

    pub fn is_empty(&self) -> bool {
        self.days == 0
    }

    pub fn span(&self) -> Option<Span> {
        if self.is_empty() {
            return None;
        }
        Some(Span::new(self.start, self.end()))
    }

    /// Signed day offset of `day` from the window start (negative = before).
    pub fn offset_of(&self, day: Day) -> i64 {
        (day - self.start).num_days()
    }
}

/// One booking on one bookable unit (tent, pod, pitch). A booking covering
/// several units arrives as one event per unit, each with its own id.
///
/// `start`/`end` are raw fields rather than a [`Span`] — input from the
/// booking store may violate `start < end`, and that has to be reportable
/// instead of a panic. `metadata` is an opaque payload (guest name, status,
/// …) carried through to the output untouched; the engine never reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event<M> {
    pub id: String,
    pub item_id: String,
    /// Check-in day.
    pub start: Day,
    /// Checkout day, not occupied.
    pub end: Day,
    pub metadata: M,
}

impl<M> Event<M> {
    /// The occupied range. Only meaningful once `start < end` has been
    /// screened.
    pub fn stay(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

/// One visual bar: an event pinned to a row, with a day-unit offset and
/// width relative to the week (grid view) or window (timeline view) start.
/// Within a single row, no two bars' `[offset, offset + span)` ranges
/// intersect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedBar<M> {
    pub event: Event<M>,
    pub row: usize,
    pub offset: u32,
    /// Width in days, always >= 1.
    pub span: u32,
    /// The real check-in lies before the visible range — rendered as a
    /// continuation arrow on the left edge.
    pub clipped_start: bool,
    /// The real checkout lies past the visible range.
    pub clipped_end: bool,
}

impl<M> PlacedBar<M> {
    /// Exclusive end offset.
    pub fn end_offset(&self) -> u32 {
        self.offset + self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Day {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn span_basics() {
        let s = Span::new(d(2026, 1, 5), d(2026, 1, 8));
        assert_eq!(s.nights(), 3);
        assert!(s.contains_day(d(2026, 1, 5)));
        assert!(s.contains_day(d(2026, 1, 7)));
        assert!(!s.contains_day(d(2026, 1, 8))); // checkout day, half-open
    }

    #[test]
    fn span_overlap() {
        let a = Span::new(d(2026, 1, 5), d(2026, 1, 10));
        let b = Span::new(d(2026, 1, 8), d(2026, 1, 12));
        let c = Span::new(d(2026, 1, 10), d(2026, 1, 14));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c)); // back-to-back, not overlapping
    }

    #[test]
    fn span_days_excludes_checkout() {
        let s = Span::new(d(2026, 1, 30), d(2026, 2, 2));
        let days: Vec<Day> = s.days().collect();
        assert_eq!(days, vec![d(2026, 1, 30), d(2026, 1, 31), d(2026, 2, 1)]);
    }

    #[test]
    fn span_clamp_to() {
        let s = Span::new(d(2026, 1, 3), d(2026, 1, 20));
        let w = Span::new(d(2026, 1, 5), d(2026, 1, 12));
        assert_eq!(s.clamp_to(&w), Some(w));
        let disjoint = Span::new(d(2026, 2, 1), d(2026, 2, 5));
        assert_eq!(s.clamp_to(&disjoint), None);
    }

    #[test]
    fn week_snaps_to_monday() {
        // 2026-01-08 is a Thursday
        let w = Week::containing(d(2026, 1, 8));
        assert_eq!(w.start(), d(2026, 1, 5));
        assert_eq!(w.last_day(), d(2026, 1, 11));
        assert_eq!(w.end(), d(2026, 1, 12));
        // A Monday snaps to itself
        assert_eq!(Week::containing(d(2026, 1, 5)).start(), d(2026, 1, 5));
    }

    #[test]
    fn week_columns() {
        let w = Week::containing(d(2026, 1, 5));
        assert_eq!(w.col(d(2026, 1, 5)), Some(0));
        assert_eq!(w.col(d(2026, 1, 11)), Some(6));
        assert_eq!(w.col(d(2026, 1, 12)), None); // next Monday
        assert_eq!(w.col(d(2026, 1, 4)), None);
        assert_eq!(w.day_at(3), d(2026, 1, 8));
    }

    #[test]
    fn week_next_is_contiguous() {
        let w = Week::containing(d(2026, 1, 5));
        assert_eq!(w.next().start(), w.end());
    }

    #[test]
    fn month_validation_and_navigation() {
        assert!(Month::new(2026, 13).is_none());
        let jan = Month::new(2026, 1).unwrap();
        assert_eq!(jan.first_day(), d(2026, 1, 1));
        assert_eq!(jan.next().first_day(), d(2026, 2, 1));
        assert_eq!(jan.prev().first_day(), d(2025, 12, 1));
        assert_eq!(Month::containing(d(2026, 1, 17)), jan);
    }

    #[test]
    fn month_contains_only_its_own_days() {
        let jan = Month::new(2026, 1).unwrap();
        assert!(jan.contains(d(2026, 1, 1)));
        assert!(jan.contains(d(2026, 1, 31)));
        assert!(!jan.contains(d(2025, 12, 31)));
        assert!(!jan.contains(d(2026, 2, 1)));
        assert!(!jan.contains(d(2025, 1, 15))); // same month, other year
    }

    #[test]
    fn window_offsets_are_signed() {
        let w = ViewWindow::new(d(2026, 1, 10), 14);
        assert_eq!(w.end(), d(2026, 1, 24));
        assert_eq!(w.offset_of(d(2026, 1, 10)), 0);
        assert_eq!(w.offset_of(d(2026, 1, 8)), -2);
        assert_eq!(w.offset_of(d(2026, 1, 24)), 14);
    }

    #[test]
    fn empty_window_is_valid() {
        let w = ViewWindow::new(d(2026, 1, 10), 0);
        assert!(w.is_empty());
        assert!(w.span().is_none());
        assert_eq!(w.end(), w.start());
    }

    #[test]
    fn window_from_weeks() {
        let w = ViewWindow::weeks(Week::containing(d(2026, 1, 7)), 6);
        assert_eq!(w.start(), d(2026, 1, 5));
        assert_eq!(w.len_days(), 42);
    }
}
