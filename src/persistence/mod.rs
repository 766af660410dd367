//! The `persistence` module owns the meet data: events, classes and
//! competitors.
//!
//! Resolvers only see the object-safe `Repository` trait. `SledStore` is the
//! embedded implementation backed by `sled`; `seed` imports JSON fixtures
//! through the same trait.

pub mod seed;
pub mod sled_store;

pub use seed::{ImportSummary, SeedData};
pub use sled_store::SledStore;

use crate::model::{
    Class, Competitor, CompetitorFilter, CompetitorUpdate, Event, NewClass, NewCompetitor,
    NewEvent,
};
use crate::utils::error::StoreResult;

/// A record as stored before a write and as stored after it.
#[derive(Debug, Clone, PartialEq)]
pub struct Revision<T> {
    pub before: T,
    pub after: T,
}

/// Record access used by the resolvers.
///
/// Lookups by id fail with `StoreError::NotFound`; writes that would break a
/// parent/child relation or a field rule fail with `StoreError::Constraint`.
/// Collections are returned in ascending id order.
pub trait Repository: Send + Sync {
    fn find_event(&self, id: i64) -> StoreResult<Event>;
    fn list_events(&self) -> StoreResult<Vec<Event>>;
    fn create_event(&self, data: NewEvent) -> StoreResult<Event>;

    fn find_class(&self, id: i64) -> StoreResult<Class>;
    fn classes_by_event(&self, event_id: i64) -> StoreResult<Vec<Class>>;
    fn create_class(&self, data: NewClass) -> StoreResult<Class>;

    fn find_competitors(&self, filter: &CompetitorFilter) -> StoreResult<Vec<Competitor>>;
    fn find_competitor(&self, id: i64) -> StoreResult<Competitor>;
    fn create_competitor(&self, data: NewCompetitor) -> StoreResult<Competitor>;
    fn update_competitor(&self, id: i64, data: &CompetitorUpdate) -> StoreResult<Competitor> {
        Ok(self.revise_competitor(id, data)?.after)
    }
    /// `update_competitor`, also returning the record it replaced. Both come
    /// from the same locked read-modify-write.
    fn revise_competitor(
        &self,
        id: i64,
        data: &CompetitorUpdate,
    ) -> StoreResult<Revision<Competitor>>;
    fn delete_competitor(&self, id: i64) -> StoreResult<Competitor>;
}

#[cfg(test)]
pub(crate) mod test_support;
#[cfg(test)]
mod tests;
