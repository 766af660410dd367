//! Fixture import.
//!
//! A seed file nests the meet hierarchy the way organisers hand it over:
//!
//! ```json
//! { "events": [ { "id": 3, "name": "Spring Cup", "date": "2026-05-01",
//!     "classes": [ { "id": 7, "name": "H21",
//!         "competitors": [ { "id": 42, "firstName": "Ada", "lastName": "Berg" } ] } ] } ] }
//! ```
//!
//! Ids are optional at every level; the repository allocates missing ones.

use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use super::Repository;
use crate::model::{CompetitorStatus, NewClass, NewCompetitor, NewEvent};
use crate::utils::error::SeedError;

#[derive(Debug, Clone, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub events: Vec<SeedEvent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedEvent {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub classes: Vec<SeedClass>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedClass {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub competitors: Vec<SeedCompetitor>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedCompetitor {
    #[serde(default)]
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub club: Option<String>,
    #[serde(default)]
    pub card_number: Option<i64>,
    #[serde(default)]
    pub status: CompetitorStatus,
}

/// Number of records created by `SeedData::import`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub events: usize,
    pub classes: usize,
    pub competitors: usize,
}

impl SeedData {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Create every record in `repo`, parents before children.
    ///
    /// Stops at the first failing write; records created before it stay.
    pub fn import(self, repo: &dyn Repository) -> Result<ImportSummary, SeedError> {
        let mut summary = ImportSummary::default();

        for seed_event in self.events {
            let event = repo.create_event(NewEvent {
                id: seed_event.id,
                name: seed_event.name,
                date: seed_event.date,
                location: seed_event.location,
            })?;
            summary.events += 1;

            for seed_class in seed_event.classes {
                let class = repo.create_class(NewClass {
                    id: seed_class.id,
                    event_id: event.id,
                    name: seed_class.name,
                })?;
                summary.classes += 1;

                for c in seed_class.competitors {
                    repo.create_competitor(NewCompetitor {
                        id: c.id,
                        class_id: class.id,
                        first_name: c.first_name,
                        last_name: c.last_name,
                        club: c.club,
                        card_number: c.card_number,
                        status: c.status,
                    })?;
                    summary.competitors += 1;
                }
            }

            info!(event_id = event.id, name = %event.name, "imported event");
        }

        Ok(summary)
    }
}
