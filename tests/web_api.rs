//! HTTP surface exercised end to end through the router.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};

use channel_player::catalog::{Catalog, CatalogCollections, CatalogStore};
use channel_player::config::Config;
use channel_player::library::Library;
use channel_player::models::{Category, Channel, Country, Language, Logo, Stream};
use channel_player::web::{AppState, WebServer};

fn channel(id: &str, name: &str, country: &str, categories: &[&str]) -> Channel {
    Channel {
        id: id.into(),
        name: name.into(),
        country: country.into(),
        categories: categories.iter().map(|c| c.to_string()).collect(),
        ..Default::default()
    }
}

fn catalog() -> Catalog {
    let mut closed = channel("gone.fr", "Gone News", "FR", &["news"]);
    closed.closed = Some("2021-01-01".into());

    Catalog::new(CatalogCollections {
        channels: vec![
            channel("news.fr", "France News", "FR", &["news"]),
            channel("music.de", "Musik DE", "DE", &["music"]),
            channel("silent.de", "Silent News", "DE", &["news"]),
            closed,
        ],
        streams: vec![
            Stream {
                channel: Some("news.fr".into()),
                url: "http://cdn.example/news/index.m3u8".into(),
                ..Default::default()
            },
            Stream {
                channel: Some("music.de".into()),
                url: "https://cdn.example/musik.mpd".into(),
                ..Default::default()
            },
        ],
        categories: vec![
            Category {
                id: "news".into(),
                name: "News".into(),
                ..Default::default()
            },
            Category {
                id: "music".into(),
                name: "Music".into(),
                ..Default::default()
            },
        ],
        countries: vec![
            Country {
                code: "FR".into(),
                name: "France".into(),
                flag: "🇫🇷".into(),
                ..Default::default()
            },
            Country {
                code: "DE".into(),
                name: "Germany".into(),
                flag: "🇩🇪".into(),
                ..Default::default()
            },
        ],
        languages: vec![Language {
            code: "fra".into(),
            name: "French".into(),
        }],
        logos: vec![Logo {
            channel: Some("news.fr".into()),
            url: "https://img.example/news.png".into(),
            ..Default::default()
        }],
    })
}

fn server() -> TestServer {
    let state = AppState {
        config: Arc::new(Config::default()),
        catalog: CatalogStore::fixed(catalog()),
        library: Library::in_memory(2),
    };
    TestServer::new(WebServer::create_router(state)).unwrap()
}

async fn data(server: &TestServer, path: &str) -> Value {
    let response = server.get(path).await;
    assert_eq!(response.status_code(), StatusCode::OK, "GET {path}");
    let body = response.json::<Value>();
    assert_eq!(body["success"], true);
    body["data"].clone()
}

#[tokio::test]
async fn health_reports_catalog_size() {
    let server = server();
    let health = data(&server, "/api/health").await;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["catalog_channels"], 4);
}

#[tokio::test]
async fn stats_count_listed_channels() {
    let server = server();
    let stats = data(&server, "/api/stats").await;
    assert_eq!(stats["channels"]["value"], 3);
    assert_eq!(stats["countries"]["value"], 2);
    assert_eq!(stats["categories"]["value"], 2);
    assert_eq!(stats["languages"]["value"], 1);
}

#[tokio::test]
async fn latest_channels_require_a_stream() {
    let server = server();
    let latest = data(&server, "/api/channels/latest").await;
    let ids: Vec<&str> = latest
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["news.fr", "music.de"]);
}

#[tokio::test]
async fn channel_listing_filters_by_category_and_country() {
    let server = server();
    let response = server
        .get("/api/channels")
        .add_query_param("category", "news")
        .add_query_param("country", "DE")
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    let cards = body["data"].as_array().unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["id"], "silent.de");
    assert_eq!(cards[0]["display_meta"], "Germany • News");
}

#[tokio::test]
async fn search_needs_two_characters() {
    let server = server();

    let short = server.get("/api/search").add_query_param("q", "n").await;
    assert_eq!(short.json::<Value>()["data"], json!([]));

    let hits = server.get("/api/search").add_query_param("q", "NEWS").await;
    let body = hits.json::<Value>();
    let hits = body["data"].as_array().unwrap();
    // Closed channels never show up
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0]["id"], "news.fr");
    assert_eq!(hits[0]["has_stream"], true);
    assert_eq!(hits[1]["id"], "silent.de");
    assert_eq!(hits[1]["has_stream"], false);
}

#[tokio::test]
async fn playback_descriptor_classifies_the_stream() {
    let server = server();
    let descriptor = data(&server, "/api/channels/news.fr/playback").await;

    assert_eq!(descriptor["display_name"], "France News");
    assert_eq!(descriptor["logo_url"], "https://img.example/news.png");
    assert_eq!(descriptor["stream"]["url"], "https://cdn.example/news/index.m3u8");
    assert_eq!(descriptor["stream"]["hint"], "hls");
    assert_eq!(
        descriptor["fallback_url"],
        "/player?src=https%3A%2F%2Fcdn.example%2Fnews%2Findex.m3u8"
    );

    let dash = data(&server, "/api/channels/music.de/playback").await;
    assert_eq!(dash["stream"]["hint"], "dash");
}

#[tokio::test]
async fn playback_for_unknown_or_streamless_channel_is_404() {
    let server = server();
    for path in [
        "/api/channels/missing.xx/playback",
        "/api/channels/silent.de/playback",
    ] {
        let response = server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND, "{path}");
        assert_eq!(response.json::<Value>()["success"], false);
    }
}

#[tokio::test]
async fn favorites_toggle_round_trip() {
    let server = server();

    let added = server.post("/api/favorites/news.fr/toggle").await;
    added.assert_status_ok();
    let body = added.json::<Value>();
    assert_eq!(body["data"]["is_favorite"], true);
    assert_eq!(body["data"]["favorites"], json!(["news.fr"]));

    server.put("/api/favorites/music.de").await.assert_status_ok();
    server.put("/api/favorites/news.fr").await.assert_status_ok();
    assert_eq!(
        data(&server, "/api/favorites").await,
        json!(["news.fr", "music.de"])
    );

    let removed = server.post("/api/favorites/news.fr/toggle").await;
    assert_eq!(removed.json::<Value>()["data"]["is_favorite"], false);

    server.delete("/api/favorites/music.de").await.assert_status_ok();
    assert_eq!(data(&server, "/api/favorites").await, json!([]));
}

#[tokio::test]
async fn recent_is_most_recent_first_and_capped() {
    let server = server();
    for id in ["news.fr", "music.de", "news.fr", "silent.de"] {
        server
            .post(&format!("/api/recent/{id}"))
            .await
            .assert_status_ok();
    }
    assert_eq!(
        data(&server, "/api/recent").await,
        json!(["silent.de", "news.fr"])
    );
}

#[tokio::test]
async fn blank_channel_id_is_rejected() {
    let server = server();
    let response = server.post("/api/recent/%20").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn fallback_page_requires_http_source() {
    let server = server();

    let missing = server.get("/player").await;
    assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);
    let body = missing.json::<Value>();
    assert_eq!(body["details"]["src"], "missing stream url");

    let scheme = server
        .get("/player")
        .add_query_param("src", "file:///etc/passwd")
        .await;
    assert_eq!(scheme.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn fallback_page_embeds_the_stream() {
    let server = server();

    let hls = server
        .get("/player")
        .add_query_param("src", "http://cdn.example/news/index.m3u8")
        .await;
    hls.assert_status_ok();
    let html = hls.text();
    assert!(html.contains("<video"));
    assert!(html.contains("hls.js"));

    let mp4 = server
        .get("/player")
        .add_query_param("src", "https://cdn.example/clip.mp4")
        .await;
    mp4.assert_status_ok();
    let html = mp4.text();
    assert!(html.contains("clip.mp4"));
    assert!(!html.contains("hls.js"));
}
