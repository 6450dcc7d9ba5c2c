// crates/company-directory-server/tests/http_api.rs
// ============================================================================
// Module: Directory HTTP API Tests
// Description: End-to-end tests over a bound axum listener.
// Purpose: Validate routes, status mapping, localization, and auditing.
// Dependencies: company-directory-server, reqwest, tokio
// ============================================================================

//! ## Overview
//! Each test binds the directory server on `127.0.0.1:0`, seeds data through
//! the public routes, and asserts on JSON responses.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::sync::Arc;
use std::sync::Mutex;

use company_directory_config::DirectoryConfig;
use company_directory_config::StoreType;
use company_directory_core::InMemoryDirectoryStore;
use company_directory_server::DirectoryAuditEvent;
use company_directory_server::DirectoryAuditSink;
use company_directory_server::DirectoryServer;
use company_directory_server::NoopAuditSink;
use company_directory_server::RequestOutcome;
use reqwest::Client;
use reqwest::RequestBuilder;
use serde_json::Value;
use serde_json::json;
use tokio::net::TcpListener;

// ============================================================================
// SECTION: Helpers
// ============================================================================

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<DirectoryAuditEvent>>,
}

impl DirectoryAuditSink for RecordingSink {
    fn record(&self, event: &DirectoryAuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

async fn serve(server: DirectoryServer) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let _server = tokio::spawn(server.serve_listener(listener));
    format!("http://{addr}")
}

async fn spawn_with(config: DirectoryConfig, audit: Arc<dyn DirectoryAuditSink>) -> String {
    let server =
        DirectoryServer::with_parts(config, Arc::new(InMemoryDirectoryStore::new()), audit)
            .unwrap();
    serve(server).await
}

async fn spawn_default() -> String {
    spawn_with(DirectoryConfig::default(), Arc::new(NoopAuditSink)).await
}

async fn send(request: RequestBuilder) -> (u16, Value) {
    let response = request.send().await.unwrap();
    let status = response.status().as_u16();
    let body = response.json::<Value>().await.unwrap();
    (status, body)
}

fn in_language(request: RequestBuilder, language: &str) -> RequestBuilder {
    request.header("x-wanted-language", language)
}

fn tag(ko: &str, en: &str) -> Value {
    json!({ "tag_name": { "ko": ko, "en": en } })
}

async fn add_company(client: &Client, base: &str, names: Value, tags: Vec<Value>) -> Value {
    let (status, body) = send(
        client.post(format!("{base}/companies")).json(&json!({ "company_name": names, "tags": tags })),
    )
    .await;
    assert_eq!(status, 200, "add failed: {body}");
    body
}

async fn seed_wantedlab(client: &Client, base: &str) {
    add_company(
        client,
        base,
        json!({ "ko": "원티드랩", "en": "Wantedlab", "tw": "" }),
        vec![tag("태그_16", "tag_16"), tag("태그_20", "tag_20")],
    )
    .await;
}

// ============================================================================
// SECTION: Probes
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn health_and_ready_report_ok() {
    let base = spawn_default().await;
    let client = Client::new();
    let (status, body) = send(client.get(format!("{base}/health"))).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "status": "ok" }));
    let (status, body) = send(client.get(format!("{base}/ready"))).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "status": "ready" }));
}

// ============================================================================
// SECTION: Directory Routes
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn add_returns_sorted_tags_and_get_keeps_association_order() {
    let base = spawn_default().await;
    let client = Client::new();
    let created = add_company(
        &client,
        &base,
        json!({ "ko": "라인 프레쉬", "en": "LINE FRESH", "tw": "LINE FRESH" }),
        vec![tag("태그_1", "tag_1"), tag("태그_8", "tag_8"), tag("태그_15", "tag_15")],
    )
    .await;
    assert_eq!(
        created,
        json!({ "company_name": "LINE FRESH", "tags": ["tag_1", "tag_15", "tag_8"] })
    );

    let (status, body) =
        send(in_language(client.get(format!("{base}/companies/라인 프레쉬")), "ko")).await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({ "company_name": "라인 프레쉬", "tags": ["태그_1", "태그_8", "태그_15"] })
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn search_by_name_matches_any_language_without_fallback() {
    let base = spawn_default().await;
    let client = Client::new();
    add_company(
        &client,
        &base,
        json!({ "ko": "주식회사 링크드코리아", "en": "LinkedKorea", "tw": "" }),
        vec![],
    )
    .await;
    add_company(&client, &base, json!({ "ko": "", "en": "Link Labs", "tw": "" }), vec![]).await;
    add_company(&client, &base, json!({ "ko": "스피링크", "en": "Spilink", "tw": "" }), vec![])
        .await;

    let (status, body) =
        send(in_language(client.get(format!("{base}/search?query=링크")), "ko")).await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!([{ "company_name": "주식회사 링크드코리아" }, { "company_name": "스피링크" }])
    );

    let (_, body) = send(in_language(client.get(format!("{base}/search?query=Link")), "ko")).await;
    assert_eq!(
        body,
        json!([{ "company_name": "주식회사 링크드코리아" }, { "company_name": "" }])
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn search_by_tag_falls_back_and_sorts_by_identity() {
    let base = spawn_default().await;
    let client = Client::new();
    let shared = || tag("태그_22", "tag_22");
    add_company(&client, &base, json!({ "ko": "", "en": "Acme", "tw": "艾克米" }), vec![shared()])
        .await;
    add_company(
        &client,
        &base,
        json!({ "ko": "비바리퍼블리카", "en": "Viva Republica", "tw": "" }),
        vec![shared(), shared()],
    )
    .await;
    add_company(&client, &base, json!({ "ko": "", "en": "", "tw": "只有台灣" }), vec![shared()])
        .await;

    let (status, body) =
        send(in_language(client.get(format!("{base}/tags?query=tag_22")), "ko")).await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!([
            { "company_name": "Acme" },
            { "company_name": "비바리퍼블리카" },
            { "company_name": "只有台灣" },
        ])
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn append_then_delete_follows_the_wantedlab_scenario() {
    let base = spawn_default().await;
    let client = Client::new();
    seed_wantedlab(&client, &base).await;

    let (status, body) = send(
        client
            .put(format!("{base}/companies/원티드랩/tags"))
            .json(&json!([tag("태그_50", "tag_50"), tag("태그_4", "tag_4")])),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({ "company_name": "Wantedlab", "tags": ["tag_16", "tag_20", "tag_4", "tag_50"] })
    );

    let (status, body) = send(client.delete(format!("{base}/companies/원티드랩/tags/태그_16"))).await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({ "company_name": "Wantedlab", "tags": ["tag_20", "tag_4", "tag_50"] })
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn append_accepts_jp_alias_for_japanese_names() {
    let base = spawn_default().await;
    let client = Client::new();
    seed_wantedlab(&client, &base).await;

    let (status, _) = send(client.put(format!("{base}/companies/Wantedlab/tags")).json(&json!([
        { "tag_name": { "ko": "태그_30", "en": "tag_30", "jp": "タグ_30" } }
    ])))
    .await;
    assert_eq!(status, 200);

    let (_, body) =
        send(in_language(client.get(format!("{base}/companies/Wantedlab")), "ja")).await;
    assert_eq!(body, json!({ "company_name": "", "tags": ["", "", "タグ_30"] }));
}

// ============================================================================
// SECTION: Error Mapping
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn not_found_errors_are_localized_404s() {
    let base = spawn_default().await;
    let client = Client::new();
    seed_wantedlab(&client, &base).await;

    let (status, body) =
        send(in_language(client.get(format!("{base}/companies/없는회사")), "ko")).await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({ "detail": "없는회사 회사가 존재하지 않습니다." }));

    let (status, body) = send(client.get(format!("{base}/tags?query=tag_404"))).await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({ "detail": "Tag not found: tag_404" }));

    let (status, _) =
        send(client.delete(format!("{base}/companies/원티드랩/tags/태그_없음"))).await;
    assert_eq!(status, 404);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn deleting_an_unattached_tag_is_a_business_error() {
    let base = spawn_default().await;
    let client = Client::new();
    seed_wantedlab(&client, &base).await;
    add_company(
        &client,
        &base,
        json!({ "ko": "라인", "en": "LINE", "tw": "LINE" }),
        vec![tag("태그_99", "tag_99")],
    )
    .await;

    let (status, body) =
        send(client.delete(format!("{base}/companies/Wantedlab/tags/tag_99"))).await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "detail": "Tag not associated with this company: tag_99" }));

    let (_, body) = send(client.get(format!("{base}/companies/Wantedlab"))).await;
    assert_eq!(body["tags"], json!(["tag_16", "tag_20"]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unsupported_language_header_is_rejected() {
    let base = spawn_default().await;
    let client = Client::new();
    let (status, body) =
        send(in_language(client.get(format!("{base}/search?query=x")), "fr")).await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "detail": "Unsupported language: fr" }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn missing_query_is_rejected() {
    let base = spawn_default().await;
    let client = Client::new();
    let (status, body) = send(client.get(format!("{base}/search"))).await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "detail": "Missing query parameter: query" }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn malformed_query_strings_get_localized_details_and_audit_events() {
    let sink = Arc::new(RecordingSink::default());
    let audit: Arc<dyn DirectoryAuditSink> = Arc::clone(&sink) as Arc<dyn DirectoryAuditSink>;
    let base = spawn_with(DirectoryConfig::default(), audit).await;
    let client = Client::new();

    let (status, body) = send(client.get(format!("{base}/tags?query=a&query=b"))).await;
    assert_eq!(status, 400);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Invalid query string:"), "detail: {detail}");

    let (status, body) =
        send(in_language(client.get(format!("{base}/search?query=a&query=b")), "ko")).await;
    assert_eq!(status, 400);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("쿼리 문자열이 올바르지 않습니다:"), "detail: {detail}");

    let events = sink.events.lock().unwrap().clone();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].operation, "search_by_tag");
    assert_eq!(events[0].status, 400);
    assert_eq!(events[0].error_kind, Some("query_invalid"));
    assert_eq!(events[1].operation, "search_by_name");
    assert_eq!(events[1].error_kind, Some("query_invalid"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn malformed_and_incomplete_bodies_are_rejected() {
    let base = spawn_default().await;
    let client = Client::new();

    let (status, body) = send(
        client
            .post(format!("{base}/companies"))
            .header("content-type", "application/json")
            .body("{not json"),
    )
    .await;
    assert_eq!(status, 400);
    assert!(body["detail"].as_str().unwrap().starts_with("Invalid request body:"));

    let (status, body) = send(
        client
            .post(format!("{base}/companies"))
            .json(&json!({ "company_name": { "ko": "라인", "en": "LINE" } })),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "detail": "Company name is required for language tw." }));

    let (status, _) = send(
        client
            .post(format!("{base}/companies"))
            .json(&json!({ "company_name": { "ko": "x".repeat(101), "en": "LINE", "tw": "" } })),
    )
    .await;
    assert_eq!(status, 400);

    let (_, body) = send(client.get(format!("{base}/search?query=LINE"))).await;
    assert_eq!(body, json!([]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn oversized_body_is_rejected_with_413() {
    let mut config = DirectoryConfig::default();
    config.server.max_body_bytes = 64;
    let base = spawn_with(config, Arc::new(NoopAuditSink)).await;
    let client = Client::new();
    let names = json!({ "ko": "가".repeat(40), "en": "LINE", "tw": "LINE" });
    let (status, body) =
        send(client.post(format!("{base}/companies")).json(&json!({ "company_name": names }))).await;
    assert_eq!(status, 413);
    assert_eq!(body, json!({ "detail": "Request body exceeds 64 bytes." }));
}

// ============================================================================
// SECTION: Auditing
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn every_directory_request_is_audited() {
    let sink = Arc::new(RecordingSink::default());
    let audit: Arc<dyn DirectoryAuditSink> = Arc::clone(&sink) as Arc<dyn DirectoryAuditSink>;
    let base = spawn_with(DirectoryConfig::default(), audit).await;
    let client = Client::new();
    seed_wantedlab(&client, &base).await;
    send(in_language(client.get(format!("{base}/companies/없는회사")), "ko")).await;

    let events = sink.events.lock().unwrap().clone();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].operation, "add_company");
    assert_eq!(events[0].status, 200);
    assert_eq!(events[0].outcome, RequestOutcome::Ok);
    assert_eq!(events[1].operation, "get_by_name");
    assert_eq!(events[1].status, 404);
    assert_eq!(events[1].outcome, RequestOutcome::Error);
    assert_eq!(events[1].error_kind, Some("company_not_found"));
}

// ============================================================================
// SECTION: SQLite Backend
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn sqlite_backed_servers_share_committed_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = DirectoryConfig::default();
    config.store.store_type = StoreType::Sqlite;
    config.store.path = Some(dir.path().join("directory.db"));
    config.server.audit.enabled = false;

    let first = serve(DirectoryServer::from_config(config.clone()).unwrap()).await;
    let client = Client::new();
    seed_wantedlab(&client, &first).await;

    let second = serve(DirectoryServer::from_config(config).unwrap()).await;
    let (status, body) =
        send(in_language(client.get(format!("{second}/companies/Wantedlab")), "ko")).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "company_name": "원티드랩", "tags": ["태그_16", "태그_20"] }));
    let (status, _) = send(client.get(format!("{second}/ready"))).await;
    assert_eq!(status, 200);
}
