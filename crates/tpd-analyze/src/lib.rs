pub mod analysis;
pub mod classify;
pub mod datetime;
pub mod distribution;
pub mod join;
pub mod normalize;
pub mod summary;

pub use analysis::{Analysis, run_analysis};
pub use classify::{CULTURES_CATEGORY, OTHER_CATEGORY, classify};
pub use datetime::{date_part, delay_days, parse_instant};
pub use distribution::{Distribution, DistributionRow};
pub use join::join_delays;
pub use normalize::{
    derive_discharge_date, filter_encounter_class, normalize_encounter_ref,
    normalize_observation_refs,
};
pub use summary::{SummaryStats, attach_pending_counts, summarize};
