//! Per-node fitness scorer. Sets up logging and state, then runs the
//! API server and the score refresh loop concurrently. Each refresh
//! turns live CPU/memory/latency telemetry for this node into a single
//! comparable score served on `/score`.

use scorer::{api, refresh, state};
use tracing_subscriber::{self, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), String> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,actix_server=warn,actix_web=warn"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let state = state::new_state();
    println!("nodefit-scorer ready");

    tokio::try_join!(api::run(state.clone()), refresh::run(state.clone()))?;

    Ok(())
}
