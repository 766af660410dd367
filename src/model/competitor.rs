use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result status of a competitor, using the IOF status names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CompetitorStatus {
    #[default]
    Inactive,
    Active,
    DidNotStart,
    DidNotFinish,
    Finished,
    MissingPunch,
    Disqualified,
    OverTime,
    NotCompeting,
}

/// Elapsed time at one control, in seconds since the competitor's start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Split {
    pub control_code: i32,
    pub time: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    pub id: i64,
    pub class_id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub club: Option<String>,
    #[serde(default)]
    pub card_number: Option<i64>,
    #[serde(default)]
    pub status: CompetitorStatus,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finish_time: Option<DateTime<Utc>>,
    /// Running time in seconds.
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub splits: Vec<Split>,
}

/// Partial update of a competitor. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompetitorUpdate {
    pub class_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub club: Option<String>,
    pub card_number: Option<i64>,
    pub status: Option<CompetitorStatus>,
    pub start_time: Option<DateTime<Utc>>,
    pub finish_time: Option<DateTime<Utc>>,
    pub time: Option<i64>,
    pub splits: Option<Vec<Split>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompetitor {
    #[serde(default)]
    pub id: Option<i64>,
    pub class_id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub club: Option<String>,
    #[serde(default)]
    pub card_number: Option<i64>,
    #[serde(default)]
    pub status: CompetitorStatus,
}

/// Selection used by `Repository::find_competitors`. Set fields are ANDed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompetitorFilter {
    pub class_id: Option<i64>,
    pub event_id: Option<i64>,
    pub status: Option<CompetitorStatus>,
}

impl CompetitorFilter {
    pub fn by_class(class_id: i64) -> Self {
        Self {
            class_id: Some(class_id),
            ..Self::default()
        }
    }

    pub fn by_event(event_id: i64) -> Self {
        Self {
            event_id: Some(event_id),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: CompetitorStatus) -> Self {
        self.status = Some(status);
        self
    }
}

impl CompetitorUpdate {
    pub fn is_empty(&self) -> bool {
        *self == CompetitorUpdate::default()
    }
}

impl Competitor {
    /// Apply `update` in place.
    ///
    /// A finished competitor with both start and finish punches and no
    /// explicit running time gets `time` derived from the two.
    pub fn apply(&mut self, update: &CompetitorUpdate) {
        if let Some(class_id) = update.class_id {
            self.class_id = class_id;
        }
        if let Some(first_name) = &update.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = &update.last_name {
            self.last_name = last_name.clone();
        }
        if let Some(club) = &update.club {
            self.club = Some(club.clone());
        }
        if let Some(card_number) = update.card_number {
            self.card_number = Some(card_number);
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(start_time) = update.start_time {
            self.start_time = Some(start_time);
        }
        if let Some(finish_time) = update.finish_time {
            self.finish_time = Some(finish_time);
        }
        if let Some(splits) = &update.splits {
            self.splits = splits.clone();
        }

        match update.time {
            Some(time) => self.time = Some(time),
            None => {
                if self.status == CompetitorStatus::Finished {
                    if let Some(elapsed) = self.elapsed_seconds() {
                        self.time = Some(elapsed);
                    }
                }
            }
        }
    }

    /// Seconds between start and finish punches, when both are known.
    pub fn elapsed_seconds(&self) -> Option<i64> {
        match (self.start_time, self.finish_time) {
            (Some(start), Some(finish)) => Some((finish - start).num_seconds()),
            _ => None,
        }
    }
}

impl NewCompetitor {
    pub fn into_competitor(self, id: i64) -> Competitor {
        Competitor {
            id,
            class_id: self.class_id,
            first_name: self.first_name,
            last_name: self.last_name,
            club: self.club,
            card_number: self.card_number,
            status: self.status,
            start_time: None,
            finish_time: None,
            time: None,
            splits: Vec::new(),
        }
    }
}
