//! Cluster-wide score aggregator. Discovers all scorer agents and
//! traffic emitters, polls them into two cached snapshots, and serves
//! routing-decision queries on top of them.

use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use tracing_subscriber::{self, EnvFilter};

mod config;
mod decision;
mod discovery;
mod endpoints;
mod poll;
mod state;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,actix_server=warn,actix_web=warn"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let state = state::new_state();
    let port = state.config.port;
    let api_workers = state.config.api_workers;

    tokio::spawn(poll::scores::run(state.clone()));
    tokio::spawn(poll::traffic::run(state.clone()));

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(endpoints::config)
            .route("/", web::get().to(root))
    })
    .bind(("0.0.0.0", port))?
    .workers(api_workers);

    println!("nodefit-aggregator ready");
    server.run().await
}

async fn root() -> impl Responder {
    HttpResponse::Ok().body("Hello from nodefit-aggregator")
}
