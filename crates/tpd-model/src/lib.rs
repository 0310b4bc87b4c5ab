pub mod bucket;
pub mod codes;
pub mod columns;
pub mod error;
pub mod options;
pub mod status;

pub use bucket::DelayBucket;
pub use codes::{CULTURE_LAB_CODES, is_culture_code};
pub use error::{Result, TpdError};
pub use options::{AnalysisOptions, PendingPolicy, ReferencePoint};
pub use status::ObservationStatus;
