use serde::Serialize;

/// Minimum score (inclusive) for the student to be approved.
pub const APPROVAL_THRESHOLD: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Approved,
    NotApproved,
}

impl Verdict {
    pub fn for_score(score: f64) -> Self {
        if score >= APPROVAL_THRESHOLD {
            Verdict::Approved
        } else {
            Verdict::NotApproved
        }
    }

    pub fn is_approved(self) -> bool {
        matches!(self, Verdict::Approved)
    }

    pub fn label(self) -> &'static str {
        match self {
            Verdict::Approved => "Approved",
            Verdict::NotApproved => "Not approved",
        }
    }
}
