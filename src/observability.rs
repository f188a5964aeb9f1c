// Metric name constants. The crate records through the `metrics` facade
// only — the host process owns recorder installation and export.

/// Counter: layout passes computed. Labels: view ("month" | "timeline").
pub const LAYOUTS_TOTAL: &str = "pitchgrid_layouts_total";

/// Counter: events excluded by input screening. Labels: reason.
pub const EVENTS_REJECTED_TOTAL: &str = "pitchgrid_events_rejected_total";

/// Counter: same-unit overlaps stacked into sub-rows by the timeline
/// fallback packer. Nonzero values point at an upstream double-booking bug.
pub const TIMELINE_OVERLAPS_STACKED_TOTAL: &str = "pitchgrid_timeline_overlaps_stacked_total";
