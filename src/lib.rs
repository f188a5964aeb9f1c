//! Calendar layout engine for the booking dashboard.
//!
//! Takes the booking events touching a view window and turns them into
//! positioned bars: a Monday-start month grid (weeks × rows, with "+N more"
//! overflow counts) and a linear per-unit timeline. Interval math only —
//! what a bar looks like, and whether the booking underneath it is legal,
//! are the neighbours' problems.
//!
//! Everything here is a pure function of its inputs: no I/O, no shared
//! state, no clock. The UI recomputes on every navigation; results are
//! deterministic down to iteration order, so identical input gives
//! byte-identical output.

pub mod layout;
pub mod model;
pub mod observability;

pub use layout::{
    DEFAULT_VISIBLE_ROWS, EventIndex, GRID_WEEKS, InvalidEvent, LayoutConfig, MonthLayout,
    Rejected, TimelineLayout, WeekLayout, build_month, pack_week, position, validate,
};
pub use model::{DAYS_PER_WEEK, Day, Event, Month, PlacedBar, Span, ViewWindow, WEEK_START, Week};
