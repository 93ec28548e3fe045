use axum::{
	Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use reel_domain::MediaItem;
use reel_service::{
	RecommendRequest, ServiceError, SimilarRequest, WishlistAck, WishlistItemRequest,
	WishlistListRequest,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/recommend", post(recommend))
		.route("/v1/similar", post(similar))
		.route("/v1/wishlist/add", post(wishlist_add))
		.route("/v1/wishlist/remove", post(wishlist_remove))
		.route("/v1/wishlist/list", post(wishlist_list))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn recommend(
	State(state): State<AppState>,
	Json(payload): Json<RecommendRequest>,
) -> Result<Json<Vec<MediaItem>>, ApiError> {
	let response = state.service.recommend(payload).await?;
	Ok(Json(response))
}

async fn similar(
	State(state): State<AppState>,
	Json(payload): Json<SimilarRequest>,
) -> Result<Json<Vec<MediaItem>>, ApiError> {
	let response = state.service.similar_to(payload).await?;
	Ok(Json(response))
}

async fn wishlist_add(
	State(state): State<AppState>,
	Json(payload): Json<WishlistItemRequest>,
) -> Result<Json<WishlistAck>, ApiError> {
	let response = state.service.wishlist_add(payload).await?;
	Ok(Json(response))
}

async fn wishlist_remove(
	State(state): State<AppState>,
	Json(payload): Json<WishlistItemRequest>,
) -> Result<Json<WishlistAck>, ApiError> {
	let response = state.service.wishlist_remove(payload).await?;
	Ok(Json(response))
}

async fn wishlist_list(
	State(state): State<AppState>,
	Json(payload): Json<WishlistListRequest>,
) -> Result<Json<Vec<MediaItem>>, ApiError> {
	let response = state.service.wishlist_list(payload).await?;
	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}

impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } => {
				Self::new(StatusCode::BAD_REQUEST, "invalid_request", message)
			},
			ServiceError::Storage { message } => {
				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };
		(self.status, Json(body)).into_response()
	}
}
