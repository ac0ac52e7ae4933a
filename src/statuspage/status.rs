// src/statuspage/status.rs
use std::fmt;

/// Published state of a status-page component.
///
/// The numeric codes are the ones the status page stores, so they must not
/// change. Variants are ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComponentStatus {
    Operational = 1,
    PerformanceIssues = 2,
    PartialOutage = 3,
    MajorOutage = 4,
}

impl ComponentStatus {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Raise severity to `other` if it is worse. Never lowers it.
    pub fn escalate(self, other: ComponentStatus) -> ComponentStatus {
        self.max(other)
    }
}

impl TryFrom<i64> for ComponentStatus {
    type Error = i64;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(ComponentStatus::Operational),
            2 => Ok(ComponentStatus::PerformanceIssues),
            3 => Ok(ComponentStatus::PartialOutage),
            4 => Ok(ComponentStatus::MajorOutage),
            other => Err(other),
        }
    }
}

impl fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ComponentStatus::Operational => "operational",
            ComponentStatus::PerformanceIssues => "performance issues",
            ComponentStatus::PartialOutage => "partial outage",
            ComponentStatus::MajorOutage => "major outage",
        };
        f.write_str(label)
    }
}
