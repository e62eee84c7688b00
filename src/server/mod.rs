mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};

use crate::api::API;
use crate::error::{bind_error, Error};
use crate::server::handlers::{catalogs, quotes};

type DynAPI = Arc<dyn API + Send + Sync>;

pub fn router(api: DynAPI) -> Router {
    Router::new()
        .route("/quotes", post(quotes::create))
        .route("/rates", get(catalogs::rates))
        .route("/extras", get(catalogs::extras))
        .route("/vehicles", get(catalogs::vehicles))
        .route("/commission", get(catalogs::commission))
        .route("/catalogs/reload", post(catalogs::reload))
        .layer(Extension(api))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: Arc<T>, addr: SocketAddr) -> Result<(), Error> {
    let app = router(api as DynAPI);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(bind_error)
}
