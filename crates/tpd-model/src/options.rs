//! Configuration options for the pending-lab analysis.

use serde::{Deserialize, Serialize};

/// How an observation is classified as pending.
///
/// The two definitions are mutually exclusive and must never be mixed in
/// one run; the policy is always an explicit configuration choice, not a
/// fallback inferred from which columns happen to be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PendingPolicy {
    /// Pending when the result was issued after the reference instant
    /// (delay > 0 days). Observations with an unparseable timestamp are
    /// not pending.
    #[default]
    DelayBased,
    /// Pending when the result status has not reached `final`.
    StatusBased,
}

/// The instant delays are measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReferencePoint {
    /// Encounter start time.
    #[default]
    EncounterStart,
    /// Encounter end time (the discharge boundary).
    Discharge,
}

/// Options controlling one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Active pending classification policy.
    pub policy: PendingPolicy,
    /// Reference instant for delay computation.
    pub reference: ReferencePoint,
    /// Restrict delay analysis to encounters of this class code.
    /// `None` analyzes every encounter.
    pub encounter_class: Option<String>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            policy: PendingPolicy::default(),
            reference: ReferencePoint::default(),
            encounter_class: Some("IMP".to_string()),
        }
    }
}

impl AnalysisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_policy(mut self, policy: PendingPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_reference(mut self, reference: ReferencePoint) -> Self {
        self.reference = reference;
        self
    }

    /// Set or clear the encounter class filter.
    #[must_use]
    pub fn with_encounter_class(mut self, class: Option<String>) -> Self {
        self.encounter_class = class;
        self
    }
}
