//! Column vocabulary for the two projected tables.
//!
//! Both ViewDefinition projections produce flat string tables; the names
//! here are the contract between ingestion, analysis, and export. Derived
//! columns are appended by the analysis stages and share this vocabulary
//! so that the CSV exports keep a stable column order.

/// Columns of the encounter projection.
pub mod encounter {
    /// Unique encounter key.
    pub const ID: &str = "encounter_id";
    /// Encounter class code (e.g. "IMP" for inpatient).
    pub const CLASS: &str = "encounter_class";
    /// Encounter type display text.
    pub const TYPE: &str = "encounter_type";
    /// Encounter start instant (ISO 8601 string).
    pub const START_TIME: &str = "start_time";
    /// Encounter end instant (ISO 8601 string).
    pub const END_TIME: &str = "end_time";
    /// Derived: calendar date of discharge (date part of `end_time`).
    pub const DISCHARGE_DATE: &str = "discharge_date";
    /// Derived: pending observations attributed to this encounter.
    pub const PENDING_LAB_COUNT: &str = "pending_lab_count";

    /// Column order of the raw projection.
    pub const PROJECTED: [&str; 5] = [ID, CLASS, TYPE, START_TIME, END_TIME];

    /// Column order of the exported encounter table.
    pub const EXPORTED: [&str; 7] = [
        ID,
        CLASS,
        TYPE,
        START_TIME,
        END_TIME,
        DISCHARGE_DATE,
        PENDING_LAB_COUNT,
    ];
}

/// Columns of the lab observation projection.
pub mod observation {
    /// Observation identifier.
    pub const ID: &str = "observation_id";
    /// Foreign key into the encounter table. May arrive as a reference
    /// with a `ResourceType/` prefix and must be normalized before joins.
    pub const ENCOUNTER_ID: &str = "encounter_id";
    /// Laboratory test code (LOINC).
    pub const LAB_CODE: &str = "lab_code";
    /// Laboratory test display text.
    pub const LAB_DISPLAY: &str = "lab_display";
    /// Instant the result was issued (ISO 8601 string).
    pub const ISSUED_TIME: &str = "issued_time";
    /// Result status code (registered, preliminary, final, ...).
    pub const STATUS: &str = "status";
    /// Derived: issued minus reference instant, in days. Null when either
    /// timestamp fails to parse.
    pub const DELAY_DAYS: &str = "delay_days";
    /// Derived: pending under the active policy.
    pub const IS_PENDING: &str = "is_pending";
    /// Derived: lab code belongs to the culture code set.
    pub const IS_CULTURE: &str = "is_culture";
    /// Derived: delay bucket label.
    pub const BUCKET: &str = "bucket";
    /// Derived: distribution category ("Cultures"/"Other" or status value).
    pub const CATEGORY: &str = "category";

    /// Column order of the raw projection.
    pub const PROJECTED: [&str; 6] = [ID, ENCOUNTER_ID, LAB_CODE, LAB_DISPLAY, ISSUED_TIME, STATUS];
}
