use serde::Serialize;

use crate::model::{Day, Event};
use crate::observability;

/// Why an event was excluded from layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InvalidEvent {
    /// `start >= end` — a stay must cover at least one night.
    EmptyStay { start: Day, end: Day },
    MissingId,
    MissingItemId,
}

impl InvalidEvent {
    /// Short label for the rejection-counter metric.
    pub fn label(&self) -> &'static str {
        match self {
            InvalidEvent::EmptyStay { .. } => "empty_stay",
            InvalidEvent::MissingId => "missing_id",
            InvalidEvent::MissingItemId => "missing_item_id",
        }
    }
}

impl std::fmt::Display for InvalidEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidEvent::EmptyStay { start, end } => {
                write!(f, "stay [{start}, {end}) covers no nights")
            }
            InvalidEvent::MissingId => write!(f, "event id is empty"),
            InvalidEvent::MissingItemId => write!(f, "item id is empty"),
        }
    }
}

impl std::error::Error for InvalidEvent {}

/// An event the layout refused, reported back so the caller can surface it.
/// The rest of the batch is laid out normally — one bad record never blanks
/// the whole view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejected {
    pub event_id: String,
    pub item_id: String,
    pub reason: InvalidEvent,
}

pub fn validate<M>(event: &Event<M>) -> Result<(), InvalidEvent> {
    if event.id.is_empty() {
        return Err(InvalidEvent::MissingId);
    }
    if event.item_id.is_empty() {
        return Err(InvalidEvent::MissingItemId);
    }
    if event.start >= event.end {
        return Err(InvalidEvent::EmptyStay {
            start: event.start,
            end: event.end,
        });
    }
    Ok(())
}

/// Split a batch into events fit for layout and rejection records for the
/// rest. Rejections are data-quality signals from the booking store, so
/// each one is logged and counted.
pub(super) fn screen<M>(events: &[Event<M>]) -> (Vec<&Event<M>>, Vec<Rejected>) {
    let mut admitted = Vec::with_capacity(events.len());
    let mut rejected = Vec::new();

    for event in events {
        match validate(event) {
            Ok(()) => admitted.push(event),
            Err(reason) => {
                tracing::warn!(
                    "rejecting event {:?} on unit {:?}: {reason}",
                    event.id,
                    event.item_id
                );
                metrics::counter!(
                    observability::EVENTS_REJECTED_TOTAL,
                    "reason" => reason.label()
                )
                .increment(1);
                rejected.push(Rejected {
                    event_id: event.id.clone(),
                    item_id: event.item_id.clone(),
                    reason,
                });
            }
        }
    }

    (admitted, rejected)
}
