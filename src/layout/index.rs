use std::collections::BTreeMap;

use crate::model::{Day, Event, Span};

/// Events bucketed by each day of their stay inside a window.
///
/// Duplicate ids are preserved here — collapsing them to one logical bar is
/// the packer's job. Building is O(events × nights), which is fine at the
/// tens-of-events-per-window scale this engine sees.
#[derive(Debug)]
pub struct EventIndex<'a, M> {
    buckets: BTreeMap<Day, Vec<&'a Event<M>>>,
}

impl<'a, M> EventIndex<'a, M> {
    /// Bucket `events` into every day of `window` their stay covers.
    ///
    /// Events are expected pre-screened; a degenerate stay (`start >= end`)
    /// covers no days and simply lands in no bucket.
    pub fn build<I>(events: I, window: Span) -> Self
    where
        I: IntoIterator<Item = &'a Event<M>>,
    {
        let mut buckets: BTreeMap<Day, Vec<&'a Event<M>>> = BTreeMap::new();
        for event in events {
            // Degenerate stays cover no days; outside-window stays have none visible.
            if event.start >= event.end || event.start >= window.end || event.end <= window.start {
                continue;
            }
            let visible = Span::new(
                event.start.max(window.start),
                event.end.min(window.end),
            );
            for day in visible.days() {
                buckets.entry(day).or_default().push(event);
            }
        }
        Self { buckets }
    }

    /// Events whose stay covers `day`. Empty slice for untouched days.
    pub fn on(&self, day: Day) -> &[&'a Event<M>] {
        self.buckets.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Days with at least one event, ascending.
    pub fn days(&self) -> impl Iterator<Item = Day> + '_ {
        self.buckets.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> Day {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn event(id: &str, start: Day, end: Day) -> Event<()> {
        Event {
            id: id.into(),
            item_id: "T1".into(),
            start,
            end,
            metadata: (),
        }
    }

    #[test]
    fn buckets_each_occupied_day() {
        let events = vec![event("A", d(2026, 1, 5), d(2026, 1, 8))];
        let window = Span::new(d(2026, 1, 1), d(2026, 2, 1));
        let idx = EventIndex::build(&events, window);
        assert_eq!(idx.on(d(2026, 1, 5)).len(), 1);
        assert_eq!(idx.on(d(2026, 1, 7)).len(), 1);
        assert!(idx.on(d(2026, 1, 8)).is_empty()); // checkout day
        assert!(idx.on(d(2026, 1, 4)).is_empty());
    }

    #[test]
    fn clamps_to_window() {
        // Stay runs past both window edges; only in-window days get buckets.
        let events = vec![event("A", d(2025, 12, 28), d(2026, 1, 10))];
        let window = Span::new(d(2026, 1, 1), d(2026, 1, 5));
        let idx = EventIndex::build(&events, window);
        let days: Vec<Day> = idx.days().collect();
        assert_eq!(
            days,
            vec![d(2026, 1, 1), d(2026, 1, 2), d(2026, 1, 3), d(2026, 1, 4)]
        );
    }

    #[test]
    fn outside_window_excluded() {
        let events = vec![
            event("A", d(2025, 12, 1), d(2025, 12, 5)),
            event("B", d(2026, 3, 1), d(2026, 3, 5)),
            // ends exactly at window start — half-open, no overlap
            event("C", d(2025, 12, 28), d(2026, 1, 1)),
        ];
        let window = Span::new(d(2026, 1, 1), d(2026, 2, 1));
        let idx = EventIndex::build(&events, window);
        assert!(idx.is_empty());
    }

    #[test]
    fn duplicates_preserved() {
        let events = vec![
            event("A", d(2026, 1, 5), d(2026, 1, 7)),
            event("A", d(2026, 1, 5), d(2026, 1, 7)),
        ];
        let window = Span::new(d(2026, 1, 1), d(2026, 2, 1));
        let idx = EventIndex::build(&events, window);
        assert_eq!(idx.on(d(2026, 1, 5)).len(), 2);
    }

    #[test]
    fn empty_input_empty_index() {
        let events: Vec<Event<()>> = vec![];
        let window = Span::new(d(2026, 1, 1), d(2026, 2, 1));
        let idx = EventIndex::build(&events, window);
        assert!(idx.is_empty());
    }
}
