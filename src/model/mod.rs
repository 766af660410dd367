//! Domain model: meets (`Event`), their `Class`es and the `Competitor`s
//! running in each class.
//!
//! All types serialize with camelCase field names, which is also the shape
//! clients receive in subscription payloads.

pub mod competitor;
pub mod meet;

pub use competitor::{
    Competitor, CompetitorFilter, CompetitorStatus, CompetitorUpdate, NewCompetitor, Split,
};
pub use meet::{Class, Event, NewClass, NewEvent};
