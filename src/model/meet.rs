use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An orienteering meet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub location: Option<String>,
}

/// A start class (e.g. `H21E`) within one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClass {
    #[serde(default)]
    pub id: Option<i64>,
    pub event_id: i64,
    pub name: String,
}

impl NewEvent {
    pub fn into_event(self, id: i64) -> Event {
        Event {
            id,
            name: self.name,
            date: self.date,
            location: self.location,
        }
    }
}

impl NewClass {
    pub fn into_class(self, id: i64) -> Class {
        Class {
            id,
            event_id: self.event_id,
            name: self.name,
        }
    }
}
