use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::{DAYS_PER_WEEK, Day, Event, PlacedBar, Week};

use super::LayoutConfig;
use super::index::EventIndex;

// ── Week packing ─────────────────────────────────────────────────

/// One packed row of the month grid: the visible bars for a week plus the
/// per-day counts of what didn't fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekLayout<M> {
    pub week: Week,
    /// Visible bars, sorted by (row, offset).
    pub bars: Vec<PlacedBar<M>>,
    /// Per-column "+N more" counts: events touching that day assigned a row
    /// past the visibility cap.
    pub overflow: [u32; DAYS_PER_WEEK],
}

impl<M> WeekLayout<M> {
    /// Overflow count for `day`; zero for days outside the week.
    pub fn overflow_on(&self, day: Day) -> u32 {
        self.week.col(day).map(|c| self.overflow[c]).unwrap_or(0)
    }

    /// Number of visible rows — the renderer sizes the week row from this.
    pub fn rows_used(&self) -> usize {
        self.bars.iter().map(|b| b.row + 1).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty() && self.overflow.iter().all(|&n| n == 0)
    }
}

/// A candidate bar before row assignment: one event clipped to this week.
struct Slot<'a, M> {
    event: &'a Event<M>,
    start_col: u32,
    span: u32,
    clipped_start: bool,
    clipped_end: bool,
}

impl<'a, M> Slot<'a, M> {
    /// Map a stay onto the week's columns, clamping at both edges. A
    /// degenerate stay that slipped past screening renders one column wide
    /// rather than crashing the pass.
    fn clip(event: &'a Event<M>, week: Week) -> Self {
        let start_col = (event.start.max(week.start()) - week.start()).num_days();
        let end_col = (event.end.min(week.end()) - week.start()).num_days();
        let start_col = start_col.clamp(0, DAYS_PER_WEEK as i64 - 1);
        let span = (end_col - start_col).clamp(1, DAYS_PER_WEEK as i64 - start_col);
        Self {
            event,
            start_col: start_col as u32,
            span: span as u32,
            clipped_start: event.start < week.start(),
            clipped_end: event.end > week.end(),
        }
    }
}

/// Greedy first-fit interval packing. `ranges` are half-open `[start, end)`
/// pairs in the caller's priority order; each takes the lowest row whose
/// occupied ranges it doesn't intersect. Returns one row index per range,
/// in input order.
///
/// Not guaranteed row-minimal across all orderings — with the wide-bars-first
/// ordering used here it packs tightly and, more importantly, stably: a
/// booking doesn't jump rows because an unrelated one was added.
pub(super) fn assign_rows(ranges: &[(u32, u32)]) -> Vec<usize> {
    let mut rows: Vec<Vec<(u32, u32)>> = Vec::new();
    let mut assigned = Vec::with_capacity(ranges.len());

    for &(start, end) in ranges {
        let row = match rows
            .iter()
            .position(|taken| taken.iter().all(|&(s, e)| end <= s || e <= start))
        {
            Some(row) => row,
            None => {
                rows.push(Vec::new());
                rows.len() - 1
            }
        };
        rows[row].push((start, end));
        assigned.push(row);
    }

    assigned
}

/// Resolve one week of the grid: which bars are visible, on which row, and
/// how many events each day hides past the cap.
pub fn pack_week<M: Clone>(
    week: Week,
    index: &EventIndex<'_, M>,
    config: &LayoutConfig,
) -> WeekLayout<M> {
    // Candidates: union of events touching the week, collapsed to one slot
    // per id (the index keeps duplicates; first occurrence wins).
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut slots: Vec<Slot<'_, M>> = Vec::new();
    for day in week.days() {
        for &event in index.on(day) {
            if seen.insert(event.id.as_str()) {
                slots.push(Slot::clip(event, week));
            }
        }
    }

    // Wider bars first so long stays sink to the top rows and fragment the
    // packing less; id is the deterministic tie-break.
    slots.sort_by(|a, b| {
        a.start_col
            .cmp(&b.start_col)
            .then(b.span.cmp(&a.span))
            .then(a.event.id.cmp(&b.event.id))
    });

    let ranges: Vec<(u32, u32)> = slots
        .iter()
        .map(|s| (s.start_col, s.start_col + s.span))
        .collect();
    let assigned = assign_rows(&ranges);

    let cap = config.max_visible_rows.unwrap_or(usize::MAX);
    let mut bars = Vec::new();
    let mut overflow = [0u32; DAYS_PER_WEEK];
    for (slot, row) in slots.iter().zip(assigned) {
        if row < cap {
            bars.push(PlacedBar {
                event: slot.event.clone(),
                row,
                offset: slot.start_col,
                span: slot.span,
                clipped_start: slot.clipped_start,
                clipped_end: slot.clipped_end,
            });
        } else {
            for col in slot.start_col..slot.start_col + slot.span {
                overflow[col as usize] += 1;
            }
        }
    }
    bars.sort_by(|a, b| a.row.cmp(&b.row).then(a.offset.cmp(&b.offset)));

    WeekLayout {
        week,
        bars,
        overflow,
    }
}
