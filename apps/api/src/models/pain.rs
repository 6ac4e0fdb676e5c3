use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherImpact {
    ColdWorse,
    Humidity,
    NoEffect,
    SunnyHelped,
}

impl WeatherImpact {
    pub fn label(&self) -> &'static str {
        match self {
            WeatherImpact::ColdWorse => "Cold made it worse",
            WeatherImpact::Humidity => "Humidity affected me",
            WeatherImpact::NoEffect => "Weather had no effect",
            WeatherImpact::SunnyHelped => "Sunny day helped",
        }
    }
}

/// A row of `pain_entries`. Visible only to its owner; never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PainEntry {
    pub id: i64,
    pub user_id: Uuid,
    pub pain_level: u8,
    pub fatigue_level: u8,
    pub medication: Option<String>,
    pub weather_impact: Option<WeatherImpact>,
    pub triggers: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPainEntry {
    pub user_id: Uuid,
    pub pain_level: u8,
    pub fatigue_level: u8,
    pub medication: Option<String>,
    pub weather_impact: Option<WeatherImpact>,
    pub triggers: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_impact_wire_names() {
        assert_eq!(
            serde_json::to_string(&WeatherImpact::ColdWorse).unwrap(),
            "\"cold_worse\""
        );
        let parsed: WeatherImpact = serde_json::from_str("\"sunny_helped\"").unwrap();
        assert_eq!(parsed, WeatherImpact::SunnyHelped);
    }

    #[test]
    fn test_weather_impact_labels() {
        assert_eq!(WeatherImpact::Humidity.label(), "Humidity affected me");
        assert_eq!(WeatherImpact::NoEffect.label(), "Weather had no effect");
    }
}
