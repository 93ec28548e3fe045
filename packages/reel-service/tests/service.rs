use reel_domain::MediaId;
use reel_service::{
	RecommendMode, RecommendRequest, ServiceError, SimilarRequest, WishlistItemRequest,
};
use reel_testkit::{
	DownEmbedding, FakeCatalog, MissingDiscovery, MissingEmbedding, ScriptedDiscovery,
	StaticEmbedding, backends, neighbor, point, service_with,
};

fn internal(text: &str) -> RecommendRequest {
	RecommendRequest { text: text.to_string(), top_k: None, mode: RecommendMode::Internal }
}

fn api(text: &str) -> RecommendRequest {
	RecommendRequest { text: text.to_string(), top_k: None, mode: RecommendMode::Api }
}

#[tokio::test]
async fn vector_scores_follow_similarity() {
	let catalog = FakeCatalog {
		neighbors: vec![
			neighbor("1", Some(0.95), "First"),
			neighbor("2", Some(0.80), "Second"),
			neighbor("3", Some(0.5), "Third"),
			neighbor("4", Some(0.3), "Fourth"),
			neighbor("5", Some(0.1), "Fifth"),
		],
		..FakeCatalog::new()
	};
	let service = service_with(backends(
		StaticEmbedding(vec![0.1, 0.2, 0.3]),
		MissingDiscovery,
		catalog,
	));
	let items = service.recommend(internal("slow sci-fi")).await.unwrap();
	let scores: Vec<u8> = items.iter().map(|item| item.score).collect();

	assert_eq!(scores, vec![95, 80, 50, 30, 10]);
}

#[tokio::test]
async fn missing_similarity_falls_back_to_the_configured_score() {
	let catalog =
		FakeCatalog { neighbors: vec![neighbor("1", None, "Scoreless")], ..FakeCatalog::new() };
	let service = service_with(backends(
		StaticEmbedding(vec![0.1, 0.2, 0.3]),
		MissingDiscovery,
		catalog,
	));
	let items = service.recommend(internal("anything")).await.unwrap();

	assert_eq!(items.len(), 1);
	assert_eq!(items[0].score, 65);
}

#[tokio::test]
async fn api_mode_puts_discovery_items_first_and_backfills_to_quota() {
	let neighbors: Vec<_> =
		(1..=12).map(|n| neighbor(&n.to_string(), Some(0.9), &format!("Catalog {n}"))).collect();
	let catalog = FakeCatalog {
		neighbors,
		titled: vec![
			neighbor("d1", None, "Alpha"),
			neighbor("d2", None, "Beta"),
			neighbor("d3", None, "Gamma"),
		],
		..FakeCatalog::new()
	};
	let service = service_with(backends(
		StaticEmbedding(vec![0.1, 0.2, 0.3]),
		ScriptedDiscovery(r#"["Alpha", "Beta", "Gamma"]"#.to_string()),
		catalog,
	));
	let items = service.recommend(api("something fresh")).await.unwrap();

	assert_eq!(items.len(), 12);
	assert_eq!(items[0].id, MediaId::catalog("d1"));
	assert_eq!(items[1].id, MediaId::catalog("d2"));
	assert_eq!(items[2].id, MediaId::catalog("d3"));
	assert!(items[..3].iter().all(|item| item.score == 100));
	assert!(items[3..].iter().all(|item| item.score == 90));
}

#[tokio::test]
async fn overlapping_tiers_are_deduplicated_by_identity() {
	let catalog = FakeCatalog {
		neighbors: vec![neighbor("d1", Some(0.9), "Alpha"), neighbor("x2", Some(0.8), "Other")],
		titled: vec![neighbor("d1", None, "Alpha")],
		..FakeCatalog::new()
	};
	let service = service_with(backends(
		StaticEmbedding(vec![0.1, 0.2, 0.3]),
		ScriptedDiscovery(r#"["Alpha"]"#.to_string()),
		catalog,
	));
	let items = service.recommend(api("anything")).await.unwrap();

	assert_eq!(items.len(), 2);
	// The discovery tier claimed the identity first, score included.
	assert_eq!(items[0].id, MediaId::catalog("d1"));
	assert_eq!(items[0].score, 100);
	assert_eq!(items[1].id, MediaId::catalog("x2"));
}

#[tokio::test]
async fn unresolved_discovery_titles_become_ephemeral_items() {
	let service = service_with(backends(
		MissingEmbedding,
		ScriptedDiscovery(
			r#"[{"title": "Ghost Feature", "description": "Unreleased.", "rating": 8.1, "type": "Movie"}]"#
				.to_string(),
		),
		FakeCatalog::new(),
	));
	let items = service.recommend(api("obscure picks")).await.unwrap();

	assert_eq!(items.len(), 1);
	assert!(items[0].id.is_ephemeral());
	assert_eq!(items[0].score, 100);
	assert_eq!(items[0].title, "Ghost Feature");
	assert_eq!(items[0].rating, Some(8.1));
	assert!(items[0].image.as_deref().unwrap().contains("Ghost+Feature"));
}

#[tokio::test]
async fn embedding_outage_degrades_to_keyword_matches() {
	let catalog = FakeCatalog {
		titled: vec![
			neighbor("7", None, "Space Odyssey"),
			neighbor("8", None, "Lost in Space"),
		],
		..FakeCatalog::new()
	};
	let service = service_with(backends(DownEmbedding, MissingDiscovery, catalog));
	let items = service.recommend(internal("space")).await.unwrap();

	assert_eq!(items.len(), 2);
	assert!(items.iter().all(|item| item.score == 80));
}

#[tokio::test]
async fn nothing_configured_yields_an_empty_list() {
	let service = service_with(backends(MissingEmbedding, MissingDiscovery, FakeCatalog::new()));
	let items = service.recommend(api("anything at all")).await.unwrap();

	assert!(items.is_empty());
}

#[tokio::test]
async fn catalog_outage_yields_an_empty_list() {
	let service = service_with(backends(
		StaticEmbedding(vec![0.1, 0.2, 0.3]),
		MissingDiscovery,
		FakeCatalog::offline(),
	));
	let items = service.recommend(internal("anything")).await.unwrap();

	assert!(items.is_empty());
}

#[tokio::test]
async fn results_never_exceed_the_quota() {
	let neighbors: Vec<_> =
		(1..=20).map(|n| neighbor(&n.to_string(), Some(0.9), &format!("Title {n}"))).collect();
	let catalog = FakeCatalog { neighbors, ..FakeCatalog::new() };
	let service = service_with(backends(
		StaticEmbedding(vec![0.1, 0.2, 0.3]),
		MissingDiscovery,
		catalog,
	));

	let items = service.recommend(internal("anything")).await.unwrap();

	assert_eq!(items.len(), 12);

	let mut capped = internal("anything");

	capped.top_k = Some(4);

	let items = service.recommend(capped).await.unwrap();

	assert_eq!(items.len(), 4);
}

#[tokio::test]
async fn blank_query_is_rejected() {
	let service = service_with(backends(MissingEmbedding, MissingDiscovery, FakeCatalog::new()));
	let err = service.recommend(internal("   ")).await.unwrap_err();

	assert!(matches!(err, ServiceError::InvalidRequest { .. }));
}

#[tokio::test]
async fn similar_excludes_the_anchor_item() {
	let catalog = FakeCatalog {
		neighbors: vec![
			neighbor("x", Some(1.0), "Anchor"),
			neighbor("a", Some(0.9), "Close"),
			neighbor("b", Some(0.8), "Closer"),
		],
		points: vec![point("x", Some(vec![1.0, 0.0, 0.0]), "Anchor")],
		..FakeCatalog::new()
	};
	let service = service_with(backends(MissingEmbedding, MissingDiscovery, catalog));
	let items = service.similar_to(SimilarRequest { id: MediaId::catalog("x") }).await.unwrap();

	assert_eq!(items.len(), 2);
	assert!(items.iter().all(|item| item.id != MediaId::catalog("x")));
	assert!(items.iter().all(|item| item.score == 95));
}

#[tokio::test]
async fn similar_on_an_ephemeral_id_is_empty_without_touching_storage() {
	let service = service_with(backends(MissingEmbedding, MissingDiscovery, FakeCatalog::offline()));
	let items = service.similar_to(SimilarRequest { id: MediaId::ephemeral() }).await.unwrap();

	assert!(items.is_empty());
}

#[tokio::test]
async fn similar_on_an_unknown_id_is_empty() {
	let service = service_with(backends(MissingEmbedding, MissingDiscovery, FakeCatalog::new()));
	let items =
		service.similar_to(SimilarRequest { id: MediaId::catalog("missing") }).await.unwrap();

	assert!(items.is_empty());
}

#[tokio::test]
async fn wishlist_refuses_ephemeral_items() {
	let service = service_with(backends(MissingEmbedding, MissingDiscovery, FakeCatalog::new()));
	let err = service
		.wishlist_add(WishlistItemRequest { user_id: "u1".to_string(), id: MediaId::ephemeral() })
		.await
		.unwrap_err();

	assert!(matches!(err, ServiceError::InvalidRequest { .. }));
}

#[tokio::test]
async fn wishlist_requires_a_user() {
	let service = service_with(backends(MissingEmbedding, MissingDiscovery, FakeCatalog::new()));
	let err = service
		.wishlist_add(WishlistItemRequest { user_id: "  ".to_string(), id: MediaId::catalog("1") })
		.await
		.unwrap_err();

	assert!(matches!(err, ServiceError::InvalidRequest { .. }));
}
