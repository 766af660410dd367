//! CLI for SplitSub
//!
//! Subcommands:
//! - `server`: run the WebSocket server
//! - `seed`: import a meet from a JSON file into the configured store
//! - `watch`: subscribe to one class and print every update (useful for smoke tests)

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use splitsub::broker::BrokerHandle;
use splitsub::config::{Settings, load_config};
use splitsub::persistence::{SeedData, SledStore};
use splitsub::resolvers::Context;
use splitsub::transport::websocket::start_websocket_server;
use splitsub::transport::{ClientMessage, ServerMessage, SubscriptionRequest};
use splitsub::utils;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "splitsub")]
enum Command {
    /// Start the WebSocket server
    Server,
    /// Import events, classes and competitors from a JSON file
    Seed {
        #[arg(long)]
        file: PathBuf,
    },
    /// Print live updates of one class
    Watch {
        /// WebSocket server URL to connect to
        #[arg(long, default_value = "ws://127.0.0.1:8080")]
        url: String,
        #[arg(long)]
        class_id: i64,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cmd = Command::parse();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            utils::logging::init("info");
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    utils::logging::init(&config.logging.level);

    let result = match cmd {
        Command::Server => run_server(&config).await,
        Command::Seed { file } => run_seed(&config, file),
        Command::Watch { url, class_id } => run_watch(&url, class_id).await,
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run_server(config: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let store = SledStore::open(&config.storage.path)?;
    let ctx = Context::new(Arc::new(store.clone()), BrokerHandle::new());
    let addr = config.bind_addr();

    tokio::select! {
        res = start_websocket_server(&addr, ctx.clone()) => {
            res?;
            error!("WebSocket server exited unexpectedly.");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
            ctx.shutdown();
        }
    }

    store.flush()?;
    Ok(())
}

fn run_seed(config: &Settings, file: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let store = SledStore::open(&config.storage.path)?;
    let summary = SeedData::from_path(&file)?.import(&store)?;
    store.flush()?;
    info!(
        events = summary.events,
        classes = summary.classes,
        competitors = summary.competitors,
        "imported {}",
        file.display()
    );
    Ok(())
}

async fn run_watch(url: &str, class_id: i64) -> Result<(), Box<dyn std::error::Error>> {
    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::connect_async;
    use tokio_tungstenite::tungstenite::Message as WsMessage;

    let (mut ws_stream, _response) = connect_async(url).await?;

    let subscribe = ClientMessage::Subscribe {
        id: "watch".to_string(),
        payload: SubscriptionRequest::CompetitorsByClassUpdated { class_id },
    };
    ws_stream
        .send(WsMessage::text(serde_json::to_string(&subscribe)?))
        .await?;
    info!("Watching class {class_id} on {url}");

    while let Some(frame) = ws_stream.next().await {
        let WsMessage::Text(text) = frame? else {
            continue;
        };
        match serde_json::from_str::<ServerMessage>(text.as_str())? {
            ServerMessage::Next { payload, .. } => {
                println!("{}", serde_json::to_string_pretty(&payload)?);
            }
            ServerMessage::Error { message, .. } => return Err(message.into()),
            ServerMessage::Complete { .. } => break,
            _ => {}
        }
    }

    Ok(())
}
