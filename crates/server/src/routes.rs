pub mod artists;

use axum::{
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::artists::ArtistService;
use service::storage::CsvTableStore;

use crate::openapi::ApiDoc;

pub type ArtistStoreService = ArtistService<CsvTableStore>;

/// Shared handler state: the artist service over the CSV store.
#[derive(Clone)]
pub struct AppState {
    pub artists: ArtistStoreService,
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: artist CRUD under `/data`, health and the OpenAPI document
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let data = Router::new()
        .route("/data", get(artists::list_artists))
        .route("/data/artist/:name", get(artists::get_artist_by_name))
        .route("/data/index/:n", get(artists::get_artist_by_index))
        .route("/data/update/:name", put(artists::update_artist_by_name))
        .route("/data/update/index/:n", put(artists::update_artist_by_index))
        .route("/data/delete/:name", delete(artists::delete_artist_by_name))
        .route("/data/delete/index/:n", delete(artists::delete_artist_by_index))
        .route("/data/add", post(artists::add_artist));

    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json));

    public
        .merge(data)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
