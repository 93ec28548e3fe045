use axum::{
	body::{self, Body},
	http::{Request, StatusCode},
};
use tower::util::ServiceExt;

use reel_api::{routes, state::AppState};
use reel_testkit::{
	DownEmbedding, FakeCatalog, MissingDiscovery, MissingEmbedding, StaticEmbedding, backends,
	neighbor, service_with,
};

fn app(catalog: FakeCatalog) -> axum::Router {
	let service = service_with(backends(StaticEmbedding(vec![0.1, 0.2, 0.3]), MissingDiscovery, catalog));

	routes::router(AppState::with_service(service))
}

fn post_json(uri: &str, payload: serde_json::Value) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri(uri)
		.header("content-type", "application/json")
		.body(Body::from(payload.to_string()))
		.expect("Failed to build request.")
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");

	serde_json::from_slice(&bytes).expect("Failed to parse response.")
}

#[tokio::test]
async fn health_ok() {
	let response = app(FakeCatalog::new())
		.oneshot(
			Request::builder()
				.uri("/health")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn recommend_returns_scored_items() {
	let catalog = FakeCatalog {
		neighbors: vec![neighbor("1", Some(0.9), "First"), neighbor("2", Some(0.4), "Second")],
		..FakeCatalog::new()
	};
	let payload = serde_json::json!({ "text": "slow sci-fi" });
	let response = app(catalog)
		.oneshot(post_json("/v1/recommend", payload))
		.await
		.expect("Failed to call recommend.");

	assert_eq!(response.status(), StatusCode::OK);

	let json = json_body(response).await;

	assert_eq!(json[0]["id"], "1");
	assert_eq!(json[0]["score"], 90);
	assert_eq!(json[0]["type"], "Movie");
	assert_eq!(json[1]["score"], 40);
}

#[tokio::test]
async fn recommend_rejects_blank_text() {
	let payload = serde_json::json!({ "text": "   " });
	let response = app(FakeCatalog::new())
		.oneshot(post_json("/v1/recommend", payload))
		.await
		.expect("Failed to call recommend.");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let json = json_body(response).await;

	assert_eq!(json["error_code"], "invalid_request");
}

#[tokio::test]
async fn similar_on_an_ephemeral_id_is_empty() {
	let payload = serde_json::json!({ "id": "eph:0f0f0f" });
	let response = app(FakeCatalog::new())
		.oneshot(post_json("/v1/similar", payload))
		.await
		.expect("Failed to call similar.");

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(json_body(response).await, serde_json::json!([]));
}

#[tokio::test]
async fn provider_outages_never_surface_as_errors() {
	let service = service_with(backends(DownEmbedding, MissingDiscovery, FakeCatalog::new()));
	let app = routes::router(AppState::with_service(service));
	let payload = serde_json::json!({ "text": "anything" });
	let response =
		app.oneshot(post_json("/v1/recommend", payload)).await.expect("Failed to call recommend.");

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(json_body(response).await, serde_json::json!([]));
}

#[tokio::test]
async fn wishlist_add_refuses_ephemeral_items() {
	let service = service_with(backends(MissingEmbedding, MissingDiscovery, FakeCatalog::new()));
	let app = routes::router(AppState::with_service(service));
	let payload = serde_json::json!({ "user_id": "u1", "id": "eph:0f0f0f" });
	let response = app
		.oneshot(post_json("/v1/wishlist/add", payload))
		.await
		.expect("Failed to call wishlist add.");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let json = json_body(response).await;

	assert_eq!(json["error_code"], "invalid_request");
}
