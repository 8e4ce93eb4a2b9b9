use serde::{Deserialize, Serialize};
use std::fmt;

/// A criterion the committee grades in every presentation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriterionKind {
    Presentation,
    Research,
    Project,
}

// Weights in whole percent; the phase score is computed on these integers
const PRESENTATION_WEIGHT: u32 = 20;
const RESEARCH_WEIGHT: u32 = 30;
const PROJECT_WEIGHT: u32 = 50;

const _: () = assert!(
    PRESENTATION_WEIGHT + RESEARCH_WEIGHT + PROJECT_WEIGHT == 100,
    "criterion weights must sum to 100%"
);

impl CriterionKind {
    /// Criteria in form order
    pub const ALL: [CriterionKind; 3] = [
        CriterionKind::Presentation,
        CriterionKind::Research,
        CriterionKind::Project,
    ];

    pub const fn weight_percent(self) -> u32 {
        match self {
            CriterionKind::Presentation => PRESENTATION_WEIGHT,
            CriterionKind::Research => RESEARCH_WEIGHT,
            CriterionKind::Project => PROJECT_WEIGHT,
        }
    }

    /// Weight as a fraction of the phase score (0.20, 0.30, 0.50)
    pub fn weight(self) -> f64 {
        self.weight_percent() as f64 / 100.0
    }

    pub fn label(self) -> &'static str {
        match self {
            CriterionKind::Presentation => "Presentation",
            CriterionKind::Research => "Research",
            CriterionKind::Project => "Project",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for CriterionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
