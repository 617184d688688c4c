//! HTTP surface.
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `GET /` | Catalog with the session's cart overlaid |
//! | `POST /logout` | Clear the session's cart |
//! | `POST /cart` | Add units of a movie to the cart |
//! | `GET /movies/{id}` | One catalog record |
//! | `GET /healthz` | Liveness |

mod session;

pub use session::{Session, SESSION_COOKIE};

use crate::backend::SessionBackend;
use crate::catalog::CatalogProvider;
use crate::error::Error;
use crate::service::MovieStoreService;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

/// Body of `POST /cart`.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub movie_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Build the application router.
pub fn router<P, B>(service: MovieStoreService<P, B>) -> Router
where
    P: CatalogProvider + 'static,
    B: SessionBackend + 'static,
{
    Router::new()
        .route("/", get(home::<P, B>))
        .route("/logout", post(logout::<P, B>))
        .route("/cart", post(add_to_cart::<P, B>))
        .route("/movies/{id}", get(movie::<P, B>))
        .route("/healthz", get(healthz::<P, B>))
        .with_state(service)
}

async fn home<P, B>(State(service): State<MovieStoreService<P, B>>, session: Session) -> Response
where
    P: CatalogProvider,
    B: SessionBackend,
{
    let view = service.home(&session.id).await;
    session.attach(Json(view))
}

async fn logout<P, B>(State(service): State<MovieStoreService<P, B>>, session: Session) -> Response
where
    P: CatalogProvider,
    B: SessionBackend,
{
    let view = service.clear_cart(&session.id).await;
    session.attach(Json(view))
}

async fn add_to_cart<P, B>(
    State(service): State<MovieStoreService<P, B>>,
    session: Session,
    Json(request): Json<AddToCartRequest>,
) -> Response
where
    P: CatalogProvider,
    B: SessionBackend,
{
    match service
        .add_to_cart(&session.id, &request.movie_id, request.quantity)
        .await
    {
        Ok(cart_count) => session.attach(Json(json!({ "cartCount": cart_count }))),
        Err(e) => session.attach(error_response(&e)),
    }
}

async fn movie<P, B>(
    State(service): State<MovieStoreService<P, B>>,
    Path(id): Path<String>,
) -> Response
where
    P: CatalogProvider,
    B: SessionBackend,
{
    match service.movie(&id) {
        Some(movie) => (StatusCode::OK, Json(movie)).into_response(),
        None => error_response(&Error::NotFound(id)),
    }
}

/// Liveness: always 200 while the process serves requests.
async fn healthz<P, B>(State(service): State<MovieStoreService<P, B>>) -> Response
where
    P: CatalogProvider,
    B: SessionBackend,
{
    let store = if service.store_healthy().await {
        "up"
    } else {
        "down"
    };

    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "sessionStore": store,
            "catalogSize": service.catalog().len(),
            "version": crate::VERSION,
        })),
    )
        .into_response()
}

fn error_response(err: &Error) -> Response {
    let status = match err {
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::ValidationError(_) => StatusCode::BAD_REQUEST,
        Error::BackendError(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
