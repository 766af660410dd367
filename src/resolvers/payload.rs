//! Payload shapes published on the topics, keyed by the subscription field
//! name clients select.

use serde::Serialize;
use serde_json::Value;

use crate::model::Competitor;
use crate::utils::error::ResolverError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompetitorsByClassUpdated<'a> {
    competitors_by_class_updated: &'a [Competitor],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompetitorUpdated<'a> {
    competitor_updated: &'a Competitor,
}

/// `{ "competitorsByClassUpdated": [Competitor] }`
pub fn competitors_by_class_updated(list: &[Competitor]) -> Result<Value, ResolverError> {
    Ok(serde_json::to_value(CompetitorsByClassUpdated {
        competitors_by_class_updated: list,
    })?)
}

/// `{ "competitorUpdated": Competitor }`
pub fn competitor_updated(competitor: &Competitor) -> Result<Value, ResolverError> {
    Ok(serde_json::to_value(CompetitorUpdated {
        competitor_updated: competitor,
    })?)
}
