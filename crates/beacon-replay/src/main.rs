//! beacon-replay binary
//!
//! Replays a session script and prints each active-tip change as a JSON line.

use beacon_replay::{JsonFileStore, ReplayConfig, Replayer, Session};
use beacon_tips::Platform;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "beacon_replay=info,beacon_tips=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = ReplayConfig::from_env()?;
    if let Some(script) = std::env::args().nth(1) {
        config = config.with_script(script);
    }

    let session = Session::load(&config.script)?;
    let platform = config
        .platform
        .unwrap_or_else(|| Platform::detect(&session.device));
    let store = JsonFileStore::open(&config.store_path)?;

    tracing::info!(
        script = %config.script.display(),
        store = %store.path().display(),
        platform = %platform,
        "Starting replay"
    );

    let mut replayer = Replayer::new(platform, store, session.ready_after);
    for transition in replayer.run(&session) {
        println!("{}", serde_json::to_string(&transition)?);
    }

    let finished = replayer.engine().finished_tips();
    tracing::info!(
        "Finished tips: {}",
        finished.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(", ")
    );

    Ok(())
}
