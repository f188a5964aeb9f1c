use chrono::Days;
use serde::Serialize;

use crate::model::{DAYS_PER_WEEK, Day, Event, Month, Span, Week};
use crate::observability;

use super::LayoutConfig;
use super::error::{Rejected, screen};
use super::index::EventIndex;
use super::week::{WeekLayout, pack_week};

// ── Month grid ───────────────────────────────────────────────────

/// The month view always renders this many week rows, including leading and
/// trailing days from the neighbouring months, so the grid keeps its height
/// when navigating.
pub const GRID_WEEKS: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthLayout<M> {
    pub month: Month,
    /// Exactly [`GRID_WEEKS`] entries; the first week contains the 1st.
    pub weeks: Vec<WeekLayout<M>>,
    pub rejected: Vec<Rejected>,
}

impl<M> MonthLayout<M> {
    /// The grid row holding `day`, if it is on the grid at all.
    pub fn week_containing(&self, day: Day) -> Option<&WeekLayout<M>> {
        self.weeks.iter().find(|w| w.week.col(day).is_some())
    }

    /// Full `[start, end)` range of the grid.
    pub fn grid_span(&self) -> Span {
        grid_span(self.month)
    }
}

fn grid_span(month: Month) -> Span {
    let start = Week::containing(month.first_day()).start();
    Span::new(
        start,
        start + Days::new((GRID_WEEKS * DAYS_PER_WEEK) as u64),
    )
}

/// Build the full month grid: screen the input once, index it once over the
/// 42-day span, and pack each of the six weeks. Pure composition.
pub fn build_month<M: Clone>(
    events: &[Event<M>],
    month: Month,
    config: &LayoutConfig,
) -> MonthLayout<M> {
    metrics::counter!(observability::LAYOUTS_TOTAL, "view" => "month").increment(1);

    let (admitted, rejected) = screen(events);
    let index = EventIndex::build(admitted.iter().copied(), grid_span(month));

    let mut weeks = Vec::with_capacity(GRID_WEEKS);
    let mut week = Week::containing(month.first_day());
    for _ in 0..GRID_WEEKS {
        weeks.push(pack_week(week, &index, config));
        week = week.next();
    }

    MonthLayout {
        month,
        weeks,
        rejected,
    }
}
