use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Qualitative level a committee assigns to one criterion.
///
/// Variants are declared in ascending order of quality, so the derived
/// `Ord` matches the grading scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeLevel {
    Insufficient,
    Sufficient,
    Good,
    Excellent,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradeError {
    #[error("unknown grade '{0}' (expected insufficient, sufficient, good or excellent)")]
    UnknownName(String),
    #[error("grade index {0} out of range (expected 0-3)")]
    IndexOutOfRange(u8),
}

impl GradeLevel {
    pub const ALL: [GradeLevel; 4] = [
        GradeLevel::Insufficient,
        GradeLevel::Sufficient,
        GradeLevel::Good,
        GradeLevel::Excellent,
    ];

    /// Percentage credited for this level (40, 70, 80, 100).
    pub const fn percentage(self) -> u32 {
        match self {
            GradeLevel::Insufficient => 40,
            GradeLevel::Sufficient => 70,
            GradeLevel::Good => 80,
            GradeLevel::Excellent => 100,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GradeLevel::Insufficient => "Insufficient",
            GradeLevel::Sufficient => "Sufficient",
            GradeLevel::Good => "Good",
            GradeLevel::Excellent => "Excellent",
        }
    }

    /// Next level up, saturating at Excellent
    pub fn raised(self) -> Self {
        match self {
            GradeLevel::Insufficient => GradeLevel::Sufficient,
            GradeLevel::Sufficient => GradeLevel::Good,
            GradeLevel::Good | GradeLevel::Excellent => GradeLevel::Excellent,
        }
    }

    /// Next level down, saturating at Insufficient
    pub fn lowered(self) -> Self {
        match self {
            GradeLevel::Excellent => GradeLevel::Good,
            GradeLevel::Good => GradeLevel::Sufficient,
            GradeLevel::Sufficient | GradeLevel::Insufficient => GradeLevel::Insufficient,
        }
    }
}

impl fmt::Display for GradeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GradeLevel {
    type Err = GradeError;

    /// Accepts English names and the Spanish names used on the paper form,
    /// ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "insufficient" | "insuficiente" => Ok(GradeLevel::Insufficient),
            "sufficient" | "suficiente" => Ok(GradeLevel::Sufficient),
            "good" | "bueno" => Ok(GradeLevel::Good),
            "excellent" | "excelente" => Ok(GradeLevel::Excellent),
            _ => Err(GradeError::UnknownName(s.trim().to_string())),
        }
    }
}

impl TryFrom<u8> for GradeLevel {
    type Error = GradeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        GradeLevel::ALL
            .get(value as usize)
            .copied()
            .ok_or(GradeError::IndexOutOfRange(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_table() {
        assert_eq!(GradeLevel::Insufficient.percentage(), 40);
        assert_eq!(GradeLevel::Sufficient.percentage(), 70);
        assert_eq!(GradeLevel::Good.percentage(), 80);
        assert_eq!(GradeLevel::Excellent.percentage(), 100);
    }

    #[test]
    fn test_order_matches_quality() {
        for pair in GradeLevel::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].percentage() < pair[1].percentage());
        }
    }

    #[test]
    fn test_parse_english_and_spanish() {
        assert_eq!("good".parse::<GradeLevel>().unwrap(), GradeLevel::Good);
        assert_eq!("Excelente".parse::<GradeLevel>().unwrap(), GradeLevel::Excellent);
        assert_eq!(" suficiente ".parse::<GradeLevel>().unwrap(), GradeLevel::Sufficient);
        assert_eq!("INSUFFICIENT".parse::<GradeLevel>().unwrap(), GradeLevel::Insufficient);
    }

    #[test]
    fn test_parse_unknown_is_domain_error() {
        let err = "great".parse::<GradeLevel>().unwrap_err();
        assert_eq!(err, GradeError::UnknownName("great".to_string()));
        assert!(err.to_string().contains("great"));
    }

    #[test]
    fn test_try_from_index() {
        assert_eq!(GradeLevel::try_from(0).unwrap(), GradeLevel::Insufficient);
        assert_eq!(GradeLevel::try_from(3).unwrap(), GradeLevel::Excellent);
        assert_eq!(GradeLevel::try_from(4), Err(GradeError::IndexOutOfRange(4)));
    }

    #[test]
    fn test_raise_and_lower_saturate() {
        assert_eq!(GradeLevel::Excellent.raised(), GradeLevel::Excellent);
        assert_eq!(GradeLevel::Insufficient.lowered(), GradeLevel::Insufficient);
        assert_eq!(GradeLevel::Sufficient.raised(), GradeLevel::Good);
        assert_eq!(GradeLevel::Good.lowered(), GradeLevel::Sufficient);
    }
}
