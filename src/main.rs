use courier_sim::adapters::outbound::{init_configured_logger, FilesystemFloorPlanSource};
use courier_sim::application::{EnvironmentContext, OperationGateway};
use courier_sim::domains::navigation::FloorPlanSource;
use courier_sim::{ApplicationResult, Config};
use std::error::Error;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "config.toml";

fn load_episode(config_path: &str) -> ApplicationResult<(Config, EnvironmentContext)> {
    let config = Config::load(config_path)?;
    info!("Configuration loaded from {}", config_path);

    let source = FilesystemFloorPlanSource::new(config.floor_plan.data_dir.as_ref().map(PathBuf::from));
    let plan = source.load_floor_plan(&config.floor_plan.name)?;
    let env = EnvironmentContext::from_floor_plan(&plan, config.navigation.clone())?;
    Ok((config, env))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Diagnostics go to stderr; stdout carries responses only.
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = std::env::args().nth(1).unwrap_or_else(|| CONFIG_PATH.to_string());
    let (config, env) = load_episode(&config_path)?;
    info!(
        episode = %env.episode_id(),
        floor_plan = %config.floor_plan.name,
        nodes = env.graph().node_count(),
        rooms = env.graph().rooms().len(),
        "Episode ready, robot at {}",
        env.current_position()
    );

    let logger = init_configured_logger(&config.logging);
    let handle = OperationGateway::spawn(env, logger);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = handle.gateway.call_json(&line).await;
        stdout.write_all(response.to_string().as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    drop(handle.gateway);
    if let Err(e) = handle.actor.await {
        error!("Robot event actor failed: {}", e);
    }
    info!("Input closed, shutting down");
    Ok(())
}
