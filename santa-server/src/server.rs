// HTTP layer: routes, handlers, and error-to-status mapping.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::db::Database;
use crate::exchange::{self, draw, wishlist, ExchangeError, Participant};

/// Shared handler state. All mutable state lives in the store; handlers
/// only share the database handle.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

/// Build the application router with the three exchange routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/participants", get(list_participants))
        .route("/addWishlist", post(add_wishlist))
        .route("/draw", post(run_draw))
        .with_state(state)
}

/// JSON error body: `{"error": message}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// JSON success body for wishlist submission: `{"message": ...}`.
#[derive(Debug, Serialize)]
struct MessageBody {
    message: String,
}

impl IntoResponse for ExchangeError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ExchangeError::Validation { .. } => (StatusCode::BAD_REQUEST, self.to_string()),
            ExchangeError::ParticipantNotFound { .. } => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            ExchangeError::PoolExhausted => (StatusCode::NOT_FOUND, self.to_string()),
            ExchangeError::Store(err) => {
                // Log the details for the operator; the client only gets a
                // generic message.
                error!("store error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal storage error".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// `GET /participants` — every stored participant, id plus all fields.
async fn list_participants(
    State(state): State<AppState>,
) -> Result<Json<Vec<Participant>>, ExchangeError> {
    let participants = state.db.list_participants().map_err(ExchangeError::from)?;
    Ok(Json(participants))
}

/// `POST /addWishlist` — overwrite a named participant's wishlist.
///
/// The body is parsed as untyped JSON so missing or mis-shaped fields map
/// to 400 rather than a framework rejection.
async fn add_wishlist(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<MessageBody>, ExchangeError> {
    let (name, items) = wishlist::parse_request(&body)?;
    wishlist::submit(&state.db, &name, &items)?;
    Ok(Json(MessageBody {
        message: "wishlist saved".to_string(),
    }))
}

#[derive(Debug, Deserialize)]
struct DrawRequest {
    #[serde(rename = "excludeName")]
    exclude_name: Option<String>,
}

/// `POST /draw` — select one eligible participant uniformly at random and
/// mark them drawn. The body is optional; when present it may carry an
/// `excludeName` to keep out of the pool.
async fn run_draw(
    State(state): State<AppState>,
    body: Option<Json<DrawRequest>>,
) -> Result<Json<exchange::DrawResult>, ExchangeError> {
    let exclude = body.and_then(|Json(req)| req.exclude_name);
    let result = draw::run_draw(&state.db, exclude.as_deref(), &mut rand::thread_rng())?;
    Ok(Json(result))
}
