//! Competitor mutations.
//!
//! Each mutation writes through the repository first. Only after the write
//! has succeeded are the class topic and the event topic published; a failed
//! write returns its error and publishes nothing. Write and publish are not
//! atomic: subscribers that miss a notification recover on their next
//! subscribe, which starts from a fresh snapshot.

use tracing::{debug, info};

use super::Context;
use super::payload;
use crate::broker::TopicKind;
use crate::model::{Competitor, CompetitorFilter, CompetitorUpdate, NewCompetitor};
use crate::persistence::Revision;
use crate::utils::error::ResolverError;

pub fn update_competitor(
    ctx: &Context,
    id: i64,
    data: &CompetitorUpdate,
) -> Result<Competitor, ResolverError> {
    if data.is_empty() {
        return Err(ResolverError::InvalidInput(format!(
            "update of competitor {id} changes no field"
        )));
    }

    let Revision {
        before,
        after: updated,
    } = ctx.store.revise_competitor(id, data)?;
    info!(competitor_id = id, status = ?updated.status, "competitor updated");

    publish_class(ctx, updated.class_id)?;
    if before.class_id != updated.class_id {
        publish_class(ctx, before.class_id)?;
    }
    publish_competitor(ctx, &updated)?;

    Ok(updated)
}

pub fn create_competitor(ctx: &Context, data: NewCompetitor) -> Result<Competitor, ResolverError> {
    let created = ctx.store.create_competitor(data)?;
    info!(competitor_id = created.id, class_id = created.class_id, "competitor created");

    publish_class(ctx, created.class_id)?;
    publish_competitor(ctx, &created)?;
    Ok(created)
}

/// Remove a competitor. The event topic receives the removed record.
pub fn delete_competitor(ctx: &Context, id: i64) -> Result<Competitor, ResolverError> {
    let removed = ctx.store.delete_competitor(id)?;
    info!(competitor_id = id, class_id = removed.class_id, "competitor deleted");

    publish_class(ctx, removed.class_id)?;
    publish_competitor(ctx, &removed)?;
    Ok(removed)
}

/// The list is read under the broker lock, so the last list delivered on a
/// class topic is never older than one delivered before it.
fn publish_class(ctx: &Context, class_id: i64) -> Result<usize, ResolverError> {
    let topic = TopicKind::CompetitorsByClassUpdated.topic(class_id);
    let delivered = ctx.broker.publish_with(&topic, || {
        let list = ctx
            .store
            .find_competitors(&CompetitorFilter::by_class(class_id))?;
        Ok::<_, ResolverError>(payload::competitors_by_class_updated(&list)?)
    })?;
    debug!(%topic, delivered, "class list published");
    Ok(delivered)
}

fn publish_competitor(ctx: &Context, competitor: &Competitor) -> Result<usize, ResolverError> {
    let class = ctx.store.find_class(competitor.class_id)?;
    let topic = TopicKind::CompetitorUpdated.topic(class.event_id);
    let delivered = ctx
        .broker
        .publish(&topic, payload::competitor_updated(competitor)?);
    debug!(%topic, delivered, "competitor published");
    Ok(delivered)
}
