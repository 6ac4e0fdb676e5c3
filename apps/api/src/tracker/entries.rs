use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::backend::{BackendError, DataStore};
use crate::errors::AppError;
use crate::models::pain::{NewPainEntry, PainEntry, WeatherImpact};
use crate::models::user::Session;
use crate::tracker::severity::SeverityView;

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 10;
/// How many entries the "Recent Entries" list shows.
pub const RECENT_LIMIT: usize = 10;

pub const LOAD_FAILED_NOTICE: &str = "Could not load your entries. Please try again later.";

pub fn clamp_level(level: i64) -> u8 {
    level.clamp(MIN_LEVEL as i64, MAX_LEVEL as i64) as u8
}

fn default_level() -> i64 {
    MIN_LEVEL as i64
}

#[derive(Debug, Deserialize)]
pub struct NewEntryRequest {
    #[serde(default = "default_level")]
    pub pain_level: i64,
    #[serde(default = "default_level")]
    pub fatigue_level: i64,
    #[serde(default)]
    pub medication: Option<String>,
    #[serde(default)]
    pub weather_impact: Option<WeatherImpact>,
    #[serde(default)]
    pub triggers: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewEntryRequest {
    pub fn into_new_entry(self, session: &Session) -> NewPainEntry {
        NewPainEntry {
            user_id: session.user.id,
            pain_level: clamp_level(self.pain_level),
            fatigue_level: clamp_level(self.fatigue_level),
            medication: non_blank(self.medication),
            weather_impact: self.weather_impact,
            triggers: non_blank(self.triggers),
            notes: non_blank(self.notes),
        }
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

/// A tracker entry with its levels classified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryView {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub pain: SeverityView,
    pub fatigue: SeverityView,
    pub medication: Option<String>,
    pub weather_impact: Option<WeatherImpact>,
    pub weather_label: Option<String>,
    pub triggers: Option<String>,
    pub notes: Option<String>,
}

impl From<PainEntry> for EntryView {
    fn from(entry: PainEntry) -> Self {
        EntryView {
            id: entry.id,
            created_at: entry.created_at,
            pain: SeverityView::for_level(clamp_level(entry.pain_level.into())),
            fatigue: SeverityView::for_level(clamp_level(entry.fatigue_level.into())),
            weather_label: entry.weather_impact.map(|w| w.label().to_string()),
            medication: entry.medication,
            weather_impact: entry.weather_impact,
            triggers: entry.triggers,
            notes: entry.notes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerResponse {
    pub entries: Vec<EntryView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl TrackerResponse {
    pub fn empty_with_notice(notice: &str) -> Self {
        TrackerResponse {
            entries: Vec::new(),
            notice: Some(notice.to_string()),
        }
    }
}

/// The user's most recent entries, newest first.
pub async fn recent_entries(
    store: &dyn DataStore,
    session: &Session,
) -> Result<Vec<EntryView>, BackendError> {
    let entries = store.recent_pain_entries(session, RECENT_LIMIT).await?;
    Ok(entries.into_iter().map(EntryView::from).collect())
}

/// Recent entries for display; a failed fetch renders an empty list with a notice.
pub async fn current_entries(store: &dyn DataStore, session: &Session) -> TrackerResponse {
    match recent_entries(store, session).await {
        Ok(entries) => TrackerResponse {
            entries,
            notice: None,
        },
        Err(e) => {
            error!("Failed to load pain entries for {}: {e}", session.user.id);
            TrackerResponse::empty_with_notice(LOAD_FAILED_NOTICE)
        }
    }
}

pub async fn record_entry(
    store: &dyn DataStore,
    session: &Session,
    req: NewEntryRequest,
) -> Result<(), AppError> {
    let entry = req.into_new_entry(session);
    store.insert_pain_entry(session, &entry).await?;
    info!(
        "Recorded entry for {} (pain {}, fatigue {})",
        session.user.id, entry.pain_level, entry.fatigue_level
    );
    Ok(())
}
