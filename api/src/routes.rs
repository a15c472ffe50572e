use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{Method, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;
use webmail_types::{Email, Envelope, NewEmail};

use crate::error::ApiError;
use crate::store::EmailStore;

const MISSING_FIELDS: &str = "To and subject are required";

#[derive(Clone)]
pub struct AppState<S> {
    pub store: S,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
}

/// Builds the full HTTP surface around an already opened store.
pub fn router<S: EmailStore>(store: S) -> Router {
    let emails = Router::new()
        .route("/emails", get(list_emails::<S>).post(create_email::<S>))
        .route("/emails/search", get(search_emails::<S>))
        .route("/emails/{id}", get(get_email::<S>));

    Router::new()
        .route("/ping", get(ping))
        .nest("/api", emails)
        .fallback(not_found)
        .with_state(AppState { store })
        .layer(TraceLayer::new_for_http())
        .layer(cors())
}

/// Allows any origin. The layer also answers every OPTIONS request itself,
/// whatever the path, so no route needs an OPTIONS handler.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

async fn ping() -> Json<Envelope<()>> {
    Json(Envelope::message("pong"))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(Envelope::<()>::failure("Not found")))
}

async fn list_emails<S: EmailStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Envelope<Vec<Email>>>, ApiError> {
    let emails = state
        .store
        .list_all()
        .await
        .map_err(|e| ApiError::internal("Failed to fetch emails", e))?;

    Ok(Json(Envelope::ok(emails)))
}

async fn search_emails<S: EmailStore>(
    State(state): State<AppState<S>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Envelope<Vec<Email>>>, ApiError> {
    // an unreadable query string (e.g. a repeated `q`) is treated as no filter
    let params = params.map(|Query(params)| params).unwrap_or_else(|rejection| {
        tracing::debug!(%rejection, "Ignoring search query string");
        SearchParams { q: None }
    });
    let term = params.q.as_deref().map(str::trim).unwrap_or_default();

    let emails = if term.is_empty() {
        state.store.list_all().await
    } else {
        tracing::debug!(term, "Searching emails");
        state.store.search(term).await
    }
    .map_err(|e| ApiError::internal("Failed to search emails", e))?;

    Ok(Json(Envelope::ok(emails)))
}

async fn get_email<S: EmailStore>(
    State(state): State<AppState<S>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Envelope<Email>>, ApiError> {
    // a malformed id was never issued, so it cannot resolve
    let Ok(Path(id)) = id else {
        return Err(ApiError::NotFound);
    };
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::NotFound)?;

    let email = state
        .store
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch email", e))?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(Envelope::ok(email)))
}

async fn create_email<S: EmailStore>(
    State(state): State<AppState<S>>,
    payload: Result<Json<NewEmail>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Email>>), ApiError> {
    let Json(new_email) = payload.map_err(|rejection| {
        tracing::debug!(%rejection, "Rejected create request body");
        ApiError::Validation(MISSING_FIELDS)
    })?;

    if !new_email.has_required_fields() {
        return Err(ApiError::Validation(MISSING_FIELDS));
    }

    let email = state
        .store
        .create(new_email)
        .await
        .map_err(|e| ApiError::internal("Failed to create email", e))?;
    tracing::info!(id = %email.id, "Created email");

    Ok((StatusCode::CREATED, Json(Envelope::ok(email))))
}
