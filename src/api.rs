//! REST API for the candidate engine.
//!
//! Stateless HTTP endpoints: every request carries the full packing state,
//! which is rebuilt into a `Configuration` for the duration of the call.
//! Uses Axum as the web framework and supports CORS.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::OnceLock;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use utoipa::{OpenApi, ToSchema};

use crate::config::{ApiConfig, EngineSettings};
use crate::error::PackingError;
use crate::inventory::SizeInventory;
use crate::model::{CornerOrientation, Rectangle};
use crate::packing::{Configuration, ConfigurationSnapshot, EngineConfig};
use crate::types::Point;

#[derive(Clone)]
struct ApiState {
    engine: EngineSettings,
}

static OPENAPI_DOC: OnceLock<utoipa::openapi::OpenApi> = OnceLock::new();

const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8" />
        <title>corner-pack API Docs</title>
        <link
            rel="stylesheet"
            href="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui.css"
            integrity="sha384-wxLW6kwyHktdDGr6Pv1zgm/VGJh99lfUbzSn6HNHBENZlCN7W602k9VkGdxuFvPn"
            crossorigin="anonymous"
        />
    </head>
    <body>
        <div id="swagger-ui"></div>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-bundle.js"
            integrity="sha384-wmyclcVGX/WhUkdkATwhaK1X1JtiNrr2EoYJ+diV3vj4v6OC5yCeSu+yW13SYJep"
            crossorigin="anonymous"
        ></script>
        <script>
            window.onload = function () {
                window.ui = SwaggerUIBundle({
                    url: "/docs/openapi.json",
                    dom_id: "#swagger-ui",
                });
            };
        </script>
    </body>
    </html>"##;

fn openapi_doc() -> &'static utoipa::openapi::OpenApi {
    OPENAPI_DOC.get_or_init(ApiDoc::openapi)
}

/// Packing state sent by the client.
///
/// `placed` holds rectangles committed so far; `sizes` the sizes still to place.
#[derive(Deserialize, Clone, ToSchema)]
#[schema(
    example = json!({
        "container": [10.0, 10.0],
        "sizes": [[4.0, 4.0], [2.0, 3.0]],
        "placed": [],
        "allow_rotations": true
    })
)]
pub struct StateRequest {
    #[schema(value_type = [f64; 2])]
    pub container: (f64, f64),
    #[serde(default)]
    #[schema(value_type = Vec<[f64; 2]>)]
    pub sizes: Vec<(f64, f64)>,
    #[serde(default)]
    pub placed: Vec<Rectangle>,
    #[serde(default)]
    #[schema(nullable = true)]
    pub allow_rotations: Option<bool>,
}

/// Packing state plus the rectangle to commit.
#[derive(Deserialize, ToSchema)]
pub struct PlaceRequest {
    #[serde(flatten)]
    pub state: StateRequest,
    pub rect: Rectangle,
}

impl StateRequest {
    fn into_configuration(self, defaults: EngineConfig) -> Result<Configuration, PackingError> {
        let mut engine = defaults;
        if let Some(allow_rotations) = self.allow_rotations {
            engine.allow_rotation = allow_rotations;
        }

        let sizes = SizeInventory::from_dims(self.sizes)?;
        Configuration::with_placed(Point::from(self.container), sizes, self.placed, engine)
    }
}

/// A concave corner and the direction of its free quadrant.
#[derive(Debug, Serialize, ToSchema)]
pub struct CornerResponse {
    #[schema(value_type = [f64; 2])]
    pub point: Point,
    pub orientation: CornerOrientation,
}

/// Full packing state after the request was applied.
#[derive(Debug, Serialize, ToSchema)]
pub struct StateResponse {
    #[schema(value_type = [f64; 2])]
    pub container: Point,
    pub placed: Vec<Rectangle>,
    #[schema(value_type = Vec<[f64; 2]>)]
    pub unplaced: Vec<(f64, f64)>,
    pub corners: Vec<CornerResponse>,
    pub candidates: Vec<Rectangle>,
    pub density: f64,
    pub is_complete: bool,
    pub total: usize,
}

impl From<ConfigurationSnapshot> for StateResponse {
    fn from(snapshot: ConfigurationSnapshot) -> Self {
        Self {
            container: snapshot.container,
            placed: snapshot.placed,
            unplaced: snapshot.unplaced.into_iter().map(Into::into).collect(),
            corners: snapshot
                .corners
                .into_iter()
                .map(|c| CornerResponse {
                    point: c.point,
                    orientation: c.orientation,
                })
                .collect(),
            candidates: snapshot.candidates,
            density: snapshot.density,
            is_complete: snapshot.is_complete,
            total: snapshot.total,
        }
    }
}

#[derive(Serialize, ToSchema)]
struct ErrorResponse {
    error: String,
    details: String,
    code: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, details: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
            code: code.into(),
        }
    }
}

fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    details: impl Into<String>,
    code: impl Into<String>,
) -> Response {
    (status, Json(ErrorResponse::new(error, details, code))).into_response()
}

fn json_deserialize_error(err: JsonRejection) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid JSON data",
        err.to_string(),
        "invalid_json",
    )
}

fn packing_error_response(err: &PackingError) -> Response {
    let (status, title) = match err {
        PackingError::IllegalPlacement { .. } | PackingError::UnknownSize { .. } => {
            (StatusCode::CONFLICT, "Placement rejected")
        }
        PackingError::DegenerateContainer { .. }
        | PackingError::InvalidSeed { .. }
        | PackingError::Validation(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "Invalid packing state")
        }
    };
    error_response(status, title, err.to_string(), err.code())
}

fn internal_error(details: impl Into<String>) -> Response {
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal error",
        details,
        "internal",
    )
}

/// Runs CPU-bound engine work on the blocking pool.
async fn run_engine<F>(work: F) -> Response
where
    F: FnOnce() -> Result<StateResponse, PackingError> + Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(Ok(response)) => (StatusCode::OK, Json(response)).into_response(),
        Ok(Err(err)) => packing_error_response(&err),
        Err(err) => {
            error!("Engine task failed: {err}");
            internal_error(err.to_string())
        }
    }
}

fn evaluate_state(
    request: StateRequest,
    defaults: EngineConfig,
) -> Result<StateResponse, PackingError> {
    let configuration = request.into_configuration(defaults)?;
    Ok(configuration.snapshot()?.into())
}

fn evaluate_place(
    request: PlaceRequest,
    defaults: EngineConfig,
) -> Result<StateResponse, PackingError> {
    let mut configuration = request.state.into_configuration(defaults)?;
    configuration.place(request.rect)?;
    Ok(configuration.snapshot()?.into())
}

#[derive(OpenApi)]
#[openapi(
    paths(handle_candidates, handle_place),
    components(
        schemas(
            StateRequest,
            PlaceRequest,
            StateResponse,
            CornerResponse,
            ErrorResponse,
            Rectangle,
            CornerOrientation
        )
    ),
    tags((name = "packing", description = "Corner candidate generation and placement"))
)]
struct ApiDoc;

/// Builds the application router.
pub fn router(engine: EngineSettings) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let state = ApiState { engine };

    Router::new()
        .route("/candidates", post(handle_candidates))
        .route("/place", post(handle_place))
        .route("/health", get(handle_health))
        .route("/docs/openapi.json", get(serve_openapi_json))
        .route("/docs", get(serve_openapi_ui))
        .layer(cors)
        .with_state(state)
}

/// Starts the API server.
///
/// Blocks until the server is terminated.
pub async fn start_api_server(config: ApiConfig, engine: EngineSettings) -> std::io::Result<()> {
    let app = router(engine);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|err| {
        error!("Could not bind API server to {}: {}", addr, err);
        err
    })?;

    info!(
        "Server running on http://{}:{}",
        config.display_host(),
        config.port()
    );
    if config.binds_to_all_interfaces() && config.uses_default_host() {
        info!("Local access: http://localhost:{}", config.port());
    }
    info!("Endpoints: POST /candidates, POST /place, GET /health, GET /docs");

    axum::serve(listener, app).await
}

/// Handler for POST /candidates.
///
/// Rebuilds the packing state and returns its concave corners and candidates.
#[utoipa::path(
    post,
    path = "/candidates",
    request_body = StateRequest,
    responses(
        (
            status = 200,
            description = "Current corners and candidate placements",
            body = StateResponse
        ),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid container, sizes or placed rectangles",
            body = ErrorResponse
        )
    ),
    tag = "packing"
)]
async fn handle_candidates(
    State(state): State<ApiState>,
    payload: Result<Json<StateRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(err) => return json_deserialize_error(err),
    };

    info!(
        "Candidate request: {} sizes, {} placed",
        request.sizes.len(),
        request.placed.len()
    );
    let defaults = state.engine.engine_config();
    run_engine(move || evaluate_state(request, defaults)).await
}

/// Handler for POST /place.
///
/// Commits one rectangle to the packing state and returns the new state.
#[utoipa::path(
    post,
    path = "/place",
    request_body = PlaceRequest,
    responses(
        (status = 200, description = "State after the placement", body = StateResponse),
        (
            status = CONFLICT,
            description = "Illegal placement or unknown size",
            body = ErrorResponse
        ),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid container, sizes or placed rectangles",
            body = ErrorResponse
        )
    ),
    tag = "packing"
)]
async fn handle_place(
    State(state): State<ApiState>,
    payload: Result<Json<PlaceRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(err) => return json_deserialize_error(err),
    };

    info!(
        "Place request: {}x{} at ({}, {})",
        request.rect.width, request.rect.height, request.rect.origin.x, request.rect.origin.y
    );
    let defaults = state.engine.engine_config();
    run_engine(move || evaluate_place(request, defaults)).await
}

async fn handle_health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn serve_openapi_json(State(_state): State<ApiState>) -> impl IntoResponse {
    Json(openapi_doc())
}

async fn serve_openapi_ui(State(_state): State<ApiState>) -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}
