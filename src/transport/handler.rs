//! Frame dispatch: turns one client frame into resolver calls and replies.

use futures_util::StreamExt;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::client::{Client, send_frame};
use crate::resolvers::{Context, LiveStream, mutation, query, subscription};
use crate::transport::message::{
    ClientMessage, MutationRequest, QueryRequest, ServerMessage, SubscriptionRequest,
};
use crate::utils::error::ResolverError;

/// Handle one text frame from `client`.
///
/// Subscriptions are driven by spawned tasks, so this must run inside a
/// Tokio runtime. `ctx` is the connection's context.
pub fn handle_message(client: &mut Client, ctx: &Context, text: &str) {
    let msg = match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => msg,
        Err(err) => {
            warn!(
                "Invalid client message from {}: {err} | {}",
                client.id,
                text.chars().take(100).collect::<String>()
            );
            client.send(&ServerMessage::error(None, format!("invalid message: {err}")));
            return;
        }
    };

    match msg {
        ClientMessage::Subscribe { id, payload } => start_subscription(client, ctx, id, payload),
        ClientMessage::Complete { id } => {
            if client.complete(&id) {
                debug!(client = %client.id, op = %id, "subscription completed by client");
            }
        }
        ClientMessage::Query { id, payload } => {
            let result = run_query(ctx, payload);
            reply(client, id, result);
        }
        ClientMessage::Mutation { id, payload } => {
            let result = run_mutation(ctx, payload);
            reply(client, id, result);
        }
        ClientMessage::Ping => {
            client.send(&ServerMessage::Pong);
        }
    }
}

fn start_subscription(client: &mut Client, ctx: &Context, id: String, request: SubscriptionRequest) {
    if client.is_active(&id) {
        client.send(&ServerMessage::error(
            Some(id),
            "subscription id already in use",
        ));
        return;
    }
    debug!(client = %client.id, op = %id, ?request, "subscription requested");

    let stream = match request {
        SubscriptionRequest::CompetitorsByClassUpdated { class_id } => {
            subscription::competitors_by_class_updated(ctx, class_id)
        }
        SubscriptionRequest::CompetitorUpdated { event_id } => {
            Ok(subscription::competitor_updated(ctx, event_id))
        }
    };

    match stream {
        Ok(stream) => {
            client.track(id.clone(), stream.cancellation_token());
            tokio::spawn(forward(stream, id, client.sender.clone()));
        }
        Err(err) => {
            warn!(client = %client.id, op = %id, "subscription failed: {err}");
            client.send(&ServerMessage::error(Some(id), err.to_string()));
        }
    }
}

/// Relay stream items as `next` frames, then report `complete`.
async fn forward(mut stream: LiveStream, id: String, sender: UnboundedSender<WsMessage>) {
    let token = stream.cancellation_token();
    while let Some(payload) = stream.next().await {
        let frame = ServerMessage::Next {
            id: id.clone(),
            payload,
        };
        if !send_frame(&sender, &frame) {
            break;
        }
    }
    token.cancel();
    drop(stream);
    send_frame(&sender, &ServerMessage::Complete { id });
}

fn run_query(ctx: &Context, request: QueryRequest) -> Result<Value, ResolverError> {
    let value = match request {
        QueryRequest::Events => serde_json::to_value(query::events(ctx)?)?,
        QueryRequest::ClassesByEvent { event_id } => {
            serde_json::to_value(query::classes_by_event(ctx, event_id)?)?
        }
        QueryRequest::CompetitorsByClass { class_id } => {
            serde_json::to_value(query::competitors_by_class(ctx, class_id)?)?
        }
        QueryRequest::Competitor { id } => serde_json::to_value(query::competitor(ctx, id)?)?,
    };
    Ok(value)
}

fn run_mutation(ctx: &Context, request: MutationRequest) -> Result<Value, ResolverError> {
    let competitor = match request {
        MutationRequest::UpdateCompetitor { id, data } => {
            mutation::update_competitor(ctx, id, &data)?
        }
        MutationRequest::CreateCompetitor { data } => mutation::create_competitor(ctx, data)?,
        MutationRequest::DeleteCompetitor { id } => mutation::delete_competitor(ctx, id)?,
    };
    Ok(serde_json::to_value(competitor)?)
}

fn reply(client: &Client, id: String, result: Result<Value, ResolverError>) {
    let msg = match result {
        Ok(payload) => ServerMessage::Reply { id, payload },
        Err(err) => {
            debug!(client = %client.id, op = %id, "operation failed: {err}");
            ServerMessage::error(Some(id), err.to_string())
        }
    };
    client.send(&msg);
}
