use std::sync::Arc;

use navlun::config::Config;
use navlun::engine::{Engine, Sources};
use navlun::error::Error;
use navlun::external::{BackendClient, OsrmClient};
use navlun::server::serve;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let backend = Arc::new(BackendClient::from_config(&config)?);
    let routing = Arc::new(OsrmClient::new(&config.osrm_api_base, config.request_timeout)?);

    let engine = Arc::new(Engine::new(Sources {
        rates: backend.clone(),
        extras: backend.clone(),
        vehicles: backend.clone(),
        commission: backend,
        routing,
    }));

    let status = engine.load().await;
    tracing::info!(?status, "catalogs loaded");

    serve(engine, config.bind_addr).await
}
