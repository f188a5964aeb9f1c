use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{Event, PlacedBar, ViewWindow};
use crate::observability;

use super::error::{Rejected, screen};
use super::week::assign_rows;

// ── Timeline positioning ─────────────────────────────────────────

/// Per-unit lanes for the linear timeline view. Every unit renders as one
/// horizontal lane; bar offsets are day units from the window start, scaled
/// to pixels by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineLayout<M> {
    /// Unit id → bars sorted by (row, offset). Row stays 0 unless the unit
    /// is double-booked (see [`TimelineLayout::lanes`]).
    pub items: BTreeMap<String, Vec<PlacedBar<M>>>,
    pub rejected: Vec<Rejected>,
}

impl<M> TimelineLayout<M> {
    /// Sub-row count for a unit — the renderer multiplies lane height by
    /// this. Zero for units with nothing in view.
    pub fn lanes(&self, item_id: &str) -> usize {
        self.items
            .get(item_id)
            .map(|bars| bars.iter().map(|b| b.row + 1).max().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn bar_count(&self) -> usize {
        self.items.values().map(Vec::len).sum()
    }
}

/// A stay clamped to day offsets inside the window, before lane assignment.
struct Clip<'a, M> {
    event: &'a Event<M>,
    offset: u32,
    span: u32,
    clipped_start: bool,
    clipped_end: bool,
}

/// Lay the events that intersect `window` out on per-unit timeline lanes.
///
/// Stays on one unit can't honestly overlap — the booking store prevents
/// double-booking — so every bar is expected on sub-row 0. The packer runs
/// anyway: when upstream data is broken, stacked sub-rows beat bars drawn
/// over each other, and the violation is logged and counted for monitoring.
pub fn position<M: Clone>(events: &[Event<M>], window: ViewWindow) -> TimelineLayout<M> {
    metrics::counter!(observability::LAYOUTS_TOTAL, "view" => "timeline").increment(1);

    let (admitted, rejected) = screen(events);

    let mut items: BTreeMap<String, Vec<PlacedBar<M>>> = BTreeMap::new();
    if window.is_empty() {
        return TimelineLayout { items, rejected };
    }

    // Clamp each stay to the window; a stay with no visible days drops out.
    // A bar ending exactly at the window edge is fully visible (half-open).
    let len = window.len_days() as i64;
    let mut by_item: BTreeMap<&str, Vec<Clip<'_, M>>> = BTreeMap::new();
    for event in admitted {
        let start_off = window.offset_of(event.start).max(0);
        let end_off = window.offset_of(event.end).min(len);
        if end_off <= start_off {
            continue;
        }
        by_item.entry(event.item_id.as_str()).or_default().push(Clip {
            event,
            offset: start_off as u32,
            span: (end_off - start_off) as u32,
            clipped_start: event.start < window.start(),
            clipped_end: event.end > window.end(),
        });
    }

    for (item_id, mut clips) in by_item {
        clips.sort_by(|a, b| {
            a.offset
                .cmp(&b.offset)
                .then(b.span.cmp(&a.span))
                .then(a.event.id.cmp(&b.event.id))
        });
        let ranges: Vec<(u32, u32)> = clips
            .iter()
            .map(|c| (c.offset, c.offset + c.span))
            .collect();
        let assigned = assign_rows(&ranges);

        let stacked = assigned.iter().filter(|&&row| row > 0).count();
        if stacked > 0 {
            tracing::warn!(
                "unit {item_id:?} has {stacked} overlapping stay(s) in view, stacking into sub-rows"
            );
            metrics::counter!(observability::TIMELINE_OVERLAPS_STACKED_TOTAL)
                .increment(stacked as u64);
        }

        let mut bars: Vec<PlacedBar<M>> = clips
            .iter()
            .zip(assigned)
            .map(|(clip, row)| PlacedBar {
                event: clip.event.clone(),
                row,
                offset: clip.offset,
                span: clip.span,
                clipped_start: clip.clipped_start,
                clipped_end: clip.clipped_end,
            })
            .collect();
        bars.sort_by(|a, b| a.row.cmp(&b.row).then(a.offset.cmp(&b.offset)));
        items.insert(item_id.to_string(), bars);
    }

    TimelineLayout { items, rejected }
}
