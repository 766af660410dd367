//! Repository backed by `sled`
//!
//! Each entity kind lives in its own tree (`events`, `classes`,
//! `competitors`). Keys are big-endian ids so iteration yields records in
//! ascending id order; values are JSON.
//!
//! Ids are positive. A create without an explicit id takes the highest id in
//! the tree plus one. Every write goes through one store-wide lock so the
//! read-check-write sequences (parent exists, id free, record present) do
//! not interleave.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sled::{Db, Tree};
use tracing::debug;

use super::{Repository, Revision};
use crate::model::{
    Class, Competitor, CompetitorFilter, CompetitorUpdate, Event, NewClass, NewCompetitor,
    NewEvent,
};
use crate::utils::error::{StoreError, StoreResult};

const EVENTS: &str = "events";
const CLASSES: &str = "classes";
const COMPETITORS: &str = "competitors";

#[derive(Clone)]
pub struct SledStore {
    db: Db,
    events: Tree,
    classes: Tree,
    competitors: Tree,
    write_lock: Arc<Mutex<()>>,
}

impl SledStore {
    /// Open or create a sled database at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    /// A store that is deleted when the last handle is dropped.
    pub fn temporary() -> StoreResult<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: Db) -> StoreResult<Self> {
        Ok(Self {
            events: db.open_tree(EVENTS)?,
            classes: db.open_tree(CLASSES)?,
            competitors: db.open_tree(COMPETITORS)?,
            db,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Block until all pending writes are on disk.
    pub fn flush(&self) -> StoreResult<()> {
        self.db.flush()?;
        Ok(())
    }
}

fn key(id: i64) -> [u8; 8] {
    (id as u64).to_be_bytes()
}

fn get<T: DeserializeOwned>(tree: &Tree, id: i64) -> StoreResult<Option<T>> {
    match tree.get(key(id))? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

fn put<T: Serialize>(tree: &Tree, id: i64, value: &T) -> StoreResult<()> {
    let bytes = serde_json::to_vec(value)?;
    tree.insert(key(id), bytes)?;
    Ok(())
}

fn scan<T: DeserializeOwned>(tree: &Tree) -> StoreResult<Vec<T>> {
    tree.iter()
        .values()
        .map(|res| -> StoreResult<T> {
            let bytes = res?;
            Ok(serde_json::from_slice(&bytes)?)
        })
        .collect()
}

fn next_id(tree: &Tree) -> StoreResult<i64> {
    match tree.last()? {
        Some((k, _)) => {
            let raw: [u8; 8] = k
                .as_ref()
                .try_into()
                .map_err(|_| StoreError::constraint("malformed key in store"))?;
            (u64::from_be_bytes(raw) as i64)
                .checked_add(1)
                .ok_or_else(|| StoreError::constraint("id space exhausted"))
        }
        None => Ok(1),
    }
}

fn assign_id(tree: &Tree, requested: Option<i64>, entity: &str) -> StoreResult<i64> {
    match requested {
        Some(id) if id <= 0 => Err(StoreError::constraint(format!(
            "{entity} id must be positive, got {id}"
        ))),
        Some(id) if tree.contains_key(key(id))? => Err(StoreError::constraint(format!(
            "{entity} {id} already exists"
        ))),
        Some(id) => Ok(id),
        None => next_id(tree),
    }
}

fn require_name(value: &str, field: &str) -> StoreResult<()> {
    if value.trim().is_empty() {
        return Err(StoreError::constraint(format!("{field} must not be empty")));
    }
    Ok(())
}

fn validate_competitor(c: &Competitor) -> StoreResult<()> {
    require_name(&c.first_name, "firstName")?;
    require_name(&c.last_name, "lastName")?;
    if let Some(elapsed) = c.elapsed_seconds() {
        if elapsed < 0 {
            return Err(StoreError::constraint(format!(
                "competitor {} finishes before start",
                c.id
            )));
        }
    }
    Ok(())
}

impl SledStore {
    fn require_class(&self, class_id: i64) -> StoreResult<Class> {
        get(&self.classes, class_id)?
            .ok_or_else(|| StoreError::constraint(format!("class {class_id} does not exist")))
    }
}

impl Repository for SledStore {
    fn find_event(&self, id: i64) -> StoreResult<Event> {
        get(&self.events, id)?.ok_or_else(|| StoreError::not_found("event", id))
    }

    fn list_events(&self) -> StoreResult<Vec<Event>> {
        scan(&self.events)
    }

    fn create_event(&self, data: NewEvent) -> StoreResult<Event> {
        require_name(&data.name, "name")?;

        let _guard = self.write_lock.lock();
        let id = assign_id(&self.events, data.id, "event")?;
        let event = data.into_event(id);
        put(&self.events, id, &event)?;
        debug!(event_id = id, "created event");
        Ok(event)
    }

    fn find_class(&self, id: i64) -> StoreResult<Class> {
        get(&self.classes, id)?.ok_or_else(|| StoreError::not_found("class", id))
    }

    fn classes_by_event(&self, event_id: i64) -> StoreResult<Vec<Class>> {
        let classes: Vec<Class> = scan(&self.classes)?;
        Ok(classes
            .into_iter()
            .filter(|c| c.event_id == event_id)
            .collect())
    }

    fn create_class(&self, data: NewClass) -> StoreResult<Class> {
        require_name(&data.name, "name")?;

        let _guard = self.write_lock.lock();
        if get::<Event>(&self.events, data.event_id)?.is_none() {
            return Err(StoreError::constraint(format!(
                "event {} does not exist",
                data.event_id
            )));
        }
        let id = assign_id(&self.classes, data.id, "class")?;
        let class = data.into_class(id);
        put(&self.classes, id, &class)?;
        debug!(class_id = id, event_id = class.event_id, "created class");
        Ok(class)
    }

    fn find_competitors(&self, filter: &CompetitorFilter) -> StoreResult<Vec<Competitor>> {
        let event_classes: Option<HashSet<i64>> = match filter.event_id {
            Some(event_id) => Some(
                self.classes_by_event(event_id)?
                    .into_iter()
                    .map(|c| c.id)
                    .collect(),
            ),
            None => None,
        };

        let competitors: Vec<Competitor> = scan(&self.competitors)?;
        Ok(competitors
            .into_iter()
            .filter(|c| filter.class_id.is_none_or(|id| c.class_id == id))
            .filter(|c| filter.status.is_none_or(|s| c.status == s))
            .filter(|c| {
                event_classes
                    .as_ref()
                    .is_none_or(|ids| ids.contains(&c.class_id))
            })
            .collect())
    }

    fn find_competitor(&self, id: i64) -> StoreResult<Competitor> {
        get(&self.competitors, id)?.ok_or_else(|| StoreError::not_found("competitor", id))
    }

    fn create_competitor(&self, data: NewCompetitor) -> StoreResult<Competitor> {
        let _guard = self.write_lock.lock();
        self.require_class(data.class_id)?;
        let id = assign_id(&self.competitors, data.id, "competitor")?;
        let competitor = data.into_competitor(id);
        validate_competitor(&competitor)?;
        put(&self.competitors, id, &competitor)?;
        debug!(competitor_id = id, class_id = competitor.class_id, "created competitor");
        Ok(competitor)
    }

    fn revise_competitor(
        &self,
        id: i64,
        data: &CompetitorUpdate,
    ) -> StoreResult<Revision<Competitor>> {
        let _guard = self.write_lock.lock();
        let before: Competitor =
            get(&self.competitors, id)?.ok_or_else(|| StoreError::not_found("competitor", id))?;

        if let Some(class_id) = data.class_id {
            if class_id != before.class_id {
                self.require_class(class_id)?;
            }
        }

        let mut after = before.clone();
        after.apply(data);
        validate_competitor(&after)?;
        put(&self.competitors, id, &after)?;
        debug!(competitor_id = id, status = ?after.status, "updated competitor");
        Ok(Revision { before, after })
    }

    fn delete_competitor(&self, id: i64) -> StoreResult<Competitor> {
        let _guard = self.write_lock.lock();
        let competitor: Competitor =
            get(&self.competitors, id)?.ok_or_else(|| StoreError::not_found("competitor", id))?;
        self.competitors.remove(key(id))?;
        debug!(competitor_id = id, "deleted competitor");
        Ok(competitor)
    }
}

impl std::fmt::Debug for SledStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledStore")
            .field("db", &"sled::Db")
            .field("events", &self.events.len())
            .field("classes", &self.classes.len())
            .field("competitors", &self.competitors.len())
            .finish()
    }
}
