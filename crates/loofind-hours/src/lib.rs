pub mod availability;
pub mod model;
pub mod normalize;
pub(crate) mod parse;
pub mod raw;

pub use availability::{
    is_facility_open, is_open, next_change, snapshot, AvailabilitySnapshot, LocalInstant,
    NextChange, Transition,
};
pub use model::{CanonicalHours, TimeWindow, WeeklySchedule, MINUTES_PER_DAY};
pub use normalize::{
    normalize, normalize_json, normalize_logged, normalize_with_report, Degradation, Normalized,
};
pub use raw::{LegacyWeeklyHours, RawDay, RawHours, StructuredHours};
