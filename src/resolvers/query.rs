use super::Context;
use crate::model::{Class, Competitor, CompetitorFilter, Event};
use crate::utils::error::ResolverError;

pub fn events(ctx: &Context) -> Result<Vec<Event>, ResolverError> {
    Ok(ctx.store.list_events()?)
}

pub fn classes_by_event(ctx: &Context, event_id: i64) -> Result<Vec<Class>, ResolverError> {
    ctx.store.find_event(event_id)?;
    Ok(ctx.store.classes_by_event(event_id)?)
}

/// Current competitor list of a class; fails for an unknown class.
pub fn competitors_by_class(ctx: &Context, class_id: i64) -> Result<Vec<Competitor>, ResolverError> {
    ctx.store.find_class(class_id)?;
    Ok(ctx
        .store
        .find_competitors(&CompetitorFilter::by_class(class_id))?)
}

pub fn competitor(ctx: &Context, id: i64) -> Result<Competitor, ResolverError> {
    Ok(ctx.store.find_competitor(id)?)
}
