//! Integration tests using mock HTTP servers
//!
//! Tests the full flow: login → authenticated GET → paged reads

use beacon_api::{BeaconApi, Client, ClientConfig, Environment, Error, RequestOptions};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USERNAME: &str = "volunteer";
const PASSWORD: &str = "correct-horse";

// ============================================================================
// Fixtures
// ============================================================================

async fn mount_identity(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/core/connect/token"))
        .and(body_string_contains(format!("username={USERNAME}")))
        .and(body_string_contains(format!("password={PASSWORD}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "integration-token",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .mount(server)
        .await;

    // Anything else is a rejected login
    Mock::given(method("POST"))
        .and(path("/core/connect/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant"
        })))
        .mount(server)
        .await;
}

async fn mount_job(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/Api/v1/Jobs/1"))
        .and(header("Authorization", "Bearer integration-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Id": 1,
            "Identifier": "JOB-0001",
            "JobStatusType": {"Name": "Active"}
        })))
        .mount(server)
        .await;
}

fn entity(i: usize) -> Value {
    json!({"Id": i, "Name": format!("Unit {i}")})
}

/// Serve `total` entities in pages of `page_size`
async fn mount_entities(server: &MockServer, total: usize, page_size: usize) {
    let pages = total.div_ceil(page_size).max(1);
    for page in 1..=pages {
        let start = (page - 1) * page_size;
        let end = (start + page_size).min(total);
        let results: Vec<Value> = (start..end).map(entity).collect();

        Mock::given(method("GET"))
            .and(path("/Api/v1/Entities"))
            .and(query_param("PageIndex", page.to_string()))
            .and(query_param("PageSize", page_size.to_string()))
            .and(header("Authorization", "Bearer integration-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Results": results,
                "PageIndex": page,
                "PageSize": page_size,
                "TotalItems": total
            })))
            .expect(1)
            .mount(server)
            .await;
    }
}

fn api_for(server: &MockServer) -> BeaconApi {
    let config = ClientConfig::new("beacon-client", "client-secret", Environment::Train)
        .with_base_url(format!("{}/Api/v1/", server.uri()))
        .with_identity_url(format!("{}/core/connect/token", server.uri()));
    BeaconApi::from_config(config).unwrap()
}

async fn logged_in(server: &MockServer) -> Client {
    mount_identity(server).await;
    api_for(server).login(USERNAME, PASSWORD).await.unwrap()
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_with_invalid_credentials_fails() {
    let server = MockServer::start().await;
    mount_identity(&server).await;

    let err = api_for(&server).login("test", "test").await.unwrap_err();
    assert!(matches!(err, Error::Authentication { .. }));
}

#[tokio::test]
async fn test_login_success_yields_usable_client() {
    let server = MockServer::start().await;
    mount_job(&server).await;
    let client = logged_in(&server).await;

    assert!(client.credentials().is_authenticated().await);
    assert_eq!(client.credentials().environment(), Environment::Train);

    let job = client.get("Jobs/1", &RequestOptions::new()).await.unwrap();
    assert_eq!(job["Id"], 1);
}

#[tokio::test]
async fn test_requests_before_login_fail() {
    let server = MockServer::start().await;
    let client = api_for(&server).client().unwrap();

    let err = client.get("Jobs/1", &RequestOptions::new()).await.unwrap_err();
    assert!(matches!(err, Error::NotAuthenticated));

    let mut calls = Vec::new();
    client
        .get_paged_results("Entities", RequestOptions::new(), |page| calls.push(page))
        .await;
    assert_eq!(calls.len(), 1);
    assert!(matches!(calls[0], Err(Error::NotAuthenticated)));
}

#[tokio::test]
async fn test_clients_hold_separate_credentials() {
    let server = MockServer::start().await;
    mount_identity(&server).await;
    let api = api_for(&server);

    let authenticated = api.login(USERNAME, PASSWORD).await.unwrap();
    let anonymous = api.client().unwrap();

    assert!(authenticated.credentials().is_authenticated().await);
    assert!(!anonymous.credentials().is_authenticated().await);
}

// ============================================================================
// get()
// ============================================================================

#[tokio::test]
async fn test_get_fetches_a_job() {
    let server = MockServer::start().await;
    mount_job(&server).await;
    let client = logged_in(&server).await;

    let job = client.get("Jobs/1", &RequestOptions::new()).await.unwrap();
    assert!(job.get("Id").is_some());
    assert!(job.get("Identifier").is_some());
}

#[tokio::test]
async fn test_get_with_header_override() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Api/v1/Jobs/1"))
        .and(header("X-Test", "1"))
        .and(header("Authorization", "Bearer integration-token"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Id": 1,
            "Identifier": "JOB-0001"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = logged_in(&server).await;

    let options: RequestOptions =
        serde_json::from_value(json!({"headers": {"X-Test": 1}})).unwrap();
    let job = client.get("Jobs/1", &options).await.unwrap();
    assert!(job.get("Id").is_some());
    assert!(job.get("Identifier").is_some());
}

#[tokio::test]
async fn test_get_missing_resource() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    let err = client.get("Jobs/404", &RequestOptions::new()).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

// ============================================================================
// get_paged_results()
// ============================================================================

#[tokio::test]
async fn test_paged_results_sixty_one_locations() {
    let server = MockServer::start().await;
    mount_entities(&server, 61, 50).await;
    let client = logged_in(&server).await;

    let mut calls: Vec<(bool, usize)> = Vec::new();
    let mut locations: Vec<Value> = Vec::new();
    client
        .get_paged_results(
            "Entities",
            RequestOptions::new().query("Q", ""),
            |page| {
                let page = page.expect("no paging error");
                calls.push((page.finished, page.len()));
                locations.extend(page.records);
            },
        )
        .await;

    assert_eq!(calls, vec![(false, 50), (true, 11)]);
    assert_eq!(locations.len(), 61);
    assert_eq!(locations[0], entity(0));
    assert_eq!(locations[60], entity(60));
}

#[tokio::test]
async fn test_paged_results_empty_resource() {
    let server = MockServer::start().await;
    mount_entities(&server, 0, 50).await;
    let client = logged_in(&server).await;

    let mut calls = Vec::new();
    client
        .get_paged_results("Entities", RequestOptions::new(), |page| {
            let page = page.unwrap();
            calls.push((page.finished, page.len()));
        })
        .await;

    assert_eq!(calls, vec![(true, 0)]);
}

#[tokio::test]
async fn test_paged_results_on_non_paged_resource() {
    let server = MockServer::start().await;
    mount_job(&server).await;
    let client = logged_in(&server).await;

    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    client
        .get_paged_results("Jobs/1", RequestOptions::new(), move |page| {
            sink.lock().unwrap().push(page);
        })
        .await;

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        Err(Error::PaginationNotSupported { path }) => assert_eq!(path, "Jobs/1"),
        other => panic!("Expected PaginationNotSupported, got {other:?}"),
    }
}

#[tokio::test]
async fn test_paged_results_server_error_is_terminal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Api/v1/Entities"))
        .and(query_param("PageIndex", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Results": (0..50).map(entity).collect::<Vec<_>>(),
            "TotalItems": 500
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Api/v1/Entities"))
        .and(query_param("PageIndex", "2"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .expect(1)
        .mount(&server)
        .await;
    let client = logged_in(&server).await;

    let mut outcomes = Vec::new();
    client
        .get_paged_results("Entities", RequestOptions::new(), |page| {
            outcomes.push(page.map(|p| (p.finished, p.len())).map_err(|e| e.status()));
        })
        .await;

    assert_eq!(outcomes, vec![Ok((false, 50)), Err(Some(502))]);
}

#[tokio::test]
async fn test_get_all_results() {
    let server = MockServer::start().await;
    mount_entities(&server, 120, 50).await;
    let client = logged_in(&server).await;

    let records = client
        .get_all_results("Entities", RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(records.len(), 120);
    assert_eq!(records[119], entity(119));
}

#[tokio::test]
async fn test_custom_page_size() {
    let server = MockServer::start().await;
    mount_entities(&server, 30, 10).await;
    let client = logged_in(&server).await;
    let pagination = client.pagination().clone().with_page_size(10);
    let client = client.with_pagination(pagination);

    let mut pages = client.pages("Entities", RequestOptions::new());
    let mut sizes = Vec::new();
    while let Some(page) = pages.next_page().await {
        sizes.push(page.unwrap().len());
    }
    assert_eq!(sizes, vec![10, 10, 10]);
}

#[tokio::test]
async fn test_concurrent_paged_reads() {
    let server = MockServer::start().await;

    for (page, count) in [(1, 50), (2, 5)] {
        Mock::given(method("GET"))
            .and(path("/Api/v1/Entities"))
            .and(query_param("PageIndex", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Results": (0..count).map(entity).collect::<Vec<_>>(),
                "TotalItems": 55
            })))
            .expect(2)
            .mount(&server)
            .await;
    }
    let client = logged_in(&server).await;

    let (a, b) = tokio::join!(
        client.get_all_results("Entities", RequestOptions::new()),
        client.get_all_results("Entities", RequestOptions::new()),
    );
    assert_eq!(a.unwrap().len(), 55);
    assert_eq!(b.unwrap().len(), 55);
}
