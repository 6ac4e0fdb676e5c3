//! Severity bands for pain and fatigue levels.
//!
//! 1–3 is low, 4–7 medium, 8–10 high. Each band carries the label and
//! colour tone the tracker shows next to a level.

use serde::{Deserialize, Serialize};

const LOW_MAX: u8 = 3;
const MEDIUM_MAX: u8 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn classify(level: u8) -> Self {
        if level <= LOW_MAX {
            Severity::Low
        } else if level <= MEDIUM_MAX {
            Severity::Medium
        } else {
            Severity::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Mild",
            Severity::Medium => "Moderate",
            Severity::High => "Severe",
        }
    }

    pub fn tone(&self) -> &'static str {
        match self {
            Severity::Low => "green",
            Severity::Medium => "amber",
            Severity::High => "red",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityView {
    pub level: u8,
    pub band: Severity,
    pub label: String,
    pub tone: String,
}

impl SeverityView {
    pub fn for_level(level: u8) -> Self {
        let band = Severity::classify(level);
        SeverityView {
            level,
            band,
            label: band.label().to_string(),
            tone: band.tone().to_string(),
        }
    }
}
