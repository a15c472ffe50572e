//! End-to-end tests driving the router over the in-memory store.

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;
use webmail_api::{EmailStore, MemoryEmailStore, StoreError, router};
use webmail_types::{Email, NewEmail};

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

async fn get(app: &Router, uri: &str) -> TestResponse {
    let request = Request::builder()
        .uri(uri)
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn post_json(app: &Router, body: Value) -> TestResponse {
    post_raw(app, body.to_string()).await
}

async fn post_raw(app: &Router, body: String) -> TestResponse {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/emails")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

fn emails(body: &Value) -> Vec<Email> {
    serde_json::from_value(body["data"].clone()).unwrap()
}

fn ids(emails: &[Email]) -> Vec<Uuid> {
    emails.iter().map(|email| email.id).collect()
}

#[tokio::test]
async fn test_ping() {
    let app = router(MemoryEmailStore::new());

    let response = get(&app, "/ping").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"success": true, "message": "pong"}));
}

#[tokio::test]
async fn test_create_normalizes_omitted_fields() {
    let app = router(MemoryEmailStore::new());

    let response = post_json(&app, json!({"to": "a@x.com", "subject": "S"})).await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["success"], json!(true));
    let email: Email = serde_json::from_value(response.body["data"].clone()).unwrap();
    assert_eq!(email.to, "a@x.com");
    assert_eq!(email.subject, "S");
    assert_eq!(email.cc, "");
    assert_eq!(email.bcc, "");
    assert_eq!(email.body, "");
    assert_eq!(email.created_at, email.updated_at);
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let app = router(MemoryEmailStore::seeded());

    let response = get(&app, "/api/emails").await;

    assert_eq!(response.status, StatusCode::OK);
    let emails = emails(&response.body);
    assert_eq!(emails.len(), 5);
    assert_eq!(emails[0].subject, "Project Update - Q1 Results");
    assert!(
        emails
            .windows(2)
            .all(|pair| pair[0].created_at > pair[1].created_at)
    );
}

#[tokio::test]
async fn test_blank_search_lists_everything() {
    let app = router(MemoryEmailStore::seeded());
    let all = ids(&emails(&get(&app, "/api/emails").await.body));

    for uri in [
        "/api/emails/search",
        "/api/emails/search?q=",
        "/api/emails/search?q=%20",
        "/api/emails/search?q=+++",
    ] {
        let response = get(&app, uri).await;
        assert_eq!(response.status, StatusCode::OK, "{uri}");
        assert_eq!(ids(&emails(&response.body)), all, "{uri}");
    }
}

#[tokio::test]
async fn test_search_matches_any_field() {
    let store = MemoryEmailStore::seeded();
    let app = router(store.clone());
    post_json(
        &app,
        json!({"to": "sales@x.com", "subject": "Discount", "body": "100% off_today"}),
    )
    .await;
    let all = store.list_all().await.unwrap();

    for term in ["legal", "hr@", "Q1", "Maintenance", "%", "_", "off_today", "zzz"] {
        let uri = format!(
            "/api/emails/search?q={}",
            term.replace('%', "%25").replace(' ', "%20")
        );
        let response = get(&app, &uri).await;

        let expected: Vec<Uuid> = all
            .iter()
            .filter(|email| {
                [&email.to, &email.cc, &email.bcc, &email.subject, &email.body]
                    .iter()
                    .any(|field| field.contains(term))
            })
            .map(|email| email.id)
            .collect();
        assert_eq!(ids(&emails(&response.body)), expected, "term {term:?}");
    }
}

fn encode_query(term: &str) -> String {
    term.bytes()
        .map(|byte| {
            if byte.is_ascii_alphanumeric() {
                (byte as char).to_string()
            } else {
                format!("%{byte:02X}")
            }
        })
        .collect()
}

#[tokio::test]
async fn test_search_matches_naive_scan_for_every_subject_window() {
    let store = MemoryEmailStore::seeded();
    let app = router(store.clone());
    let all = store.list_all().await.unwrap();

    for email in &all {
        let chars: Vec<char> = email.subject.chars().collect();
        for window in chars.windows(3) {
            let term: String = window.iter().collect();
            let uri = format!("/api/emails/search?q={}", encode_query(&term));
            let response = get(&app, &uri).await;
            assert_eq!(response.status, StatusCode::OK, "term {term:?}");

            // the route trims the term before searching
            let trimmed = term.trim();
            let expected: Vec<Uuid> = all
                .iter()
                .filter(|email| email.contains(trimmed))
                .map(|email| email.id)
                .collect();
            let found = ids(&emails(&response.body));
            assert!(found.contains(&email.id), "term {term:?}");
            assert_eq!(found, expected, "term {term:?}");
        }
    }
}

#[tokio::test]
async fn test_search_term_is_trimmed() {
    let app = router(MemoryEmailStore::seeded());

    let response = get(&app, "/api/emails/search?q=%20%20legal%20").await;

    let found = emails(&response.body);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].bcc, "legal@example.com");
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let app = router(MemoryEmailStore::seeded());

    for uri in [
        format!("/api/emails/{}", Uuid::new_v4()),
        "/api/emails/42".to_string(),
    ] {
        let response = get(&app, &uri).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(
            response.body,
            json!({"success": false, "error": "Email not found"})
        );
    }
}

#[tokio::test]
async fn test_undecodable_id_is_not_found() {
    let app = router(MemoryEmailStore::seeded());

    let response = get(&app, "/api/emails/%FF").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.body,
        json!({"success": false, "error": "Email not found"})
    );
}

#[tokio::test]
async fn test_repeated_query_parameter_lists_everything() {
    let app = router(MemoryEmailStore::seeded());
    let all = ids(&emails(&get(&app, "/api/emails").await.body));

    let response = get(&app, "/api/emails/search?q=a&q=b").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], json!(true));
    assert_eq!(ids(&emails(&response.body)), all);
}

#[tokio::test]
async fn test_unknown_route_is_an_envelope() {
    let app = router(MemoryEmailStore::seeded());

    for uri in ["/api/nope", "/nothing/here"] {
        let response = get(&app, uri).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(
            response.headers[header::CONTENT_TYPE],
            "application/json",
            "{uri}"
        );
        assert_eq!(
            response.body,
            json!({"success": false, "error": "Not found"}),
            "{uri}"
        );
    }
}

#[tokio::test]
async fn test_missing_required_fields_are_rejected() {
    let store = MemoryEmailStore::seeded();
    let app = router(store.clone());

    for body in [
        json!({"subject": "S"}),
        json!({"to": "a@x.com"}),
        json!({"to": "", "subject": "S"}),
        json!({"to": "a@x.com", "subject": null}),
    ] {
        let response = post_json(&app, body.clone()).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(
            response.body,
            json!({"success": false, "error": "To and subject are required"})
        );
    }

    let response = post_raw(&app, "{not json".to_string()).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    assert_eq!(store.list_all().await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_created_email_reads_back_identically() {
    let app = router(MemoryEmailStore::seeded());

    let created = post_json(
        &app,
        json!({"to": "a@x.com", "cc": "c@x.com", "subject": "Hello", "body": "Line one\nLine two"}),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let created_data = created.body["data"].clone();
    let id = created_data["id"].as_str().unwrap().to_string();
    assert_eq!(created_data["bcc"], json!(""));

    let fetched = get(&app, &format!("/api/emails/{id}")).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["data"], created_data);

    let listed = get(&app, "/api/emails").await;
    let in_list = listed.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|email| email["id"] == json!(id))
        .cloned();
    assert_eq!(in_list, Some(created_data.clone()));
    assert_eq!(listed.body["data"][0], created_data);
}

#[tokio::test]
async fn test_every_response_allows_any_origin() {
    let app = router(MemoryEmailStore::seeded());

    for uri in ["/api/emails", "/api/emails/not-an-id", "/ping"] {
        let response = get(&app, uri).await;
        assert_eq!(
            response.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*",
            "{uri}"
        );
    }
}

#[tokio::test]
async fn test_options_is_answered_on_any_path() {
    let app = router(MemoryEmailStore::new());

    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/emails")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, preflight).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let bare = Request::builder()
        .method(Method::OPTIONS)
        .uri("/some/other/path")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, bare).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, Value::Null);
}

#[derive(Clone)]
struct BrokenStore;

impl EmailStore for BrokenStore {
    async fn list_all(&self) -> Result<Vec<Email>, StoreError> {
        Err(sqlx::Error::PoolClosed.into())
    }

    async fn search(&self, _term: &str) -> Result<Vec<Email>, StoreError> {
        Err(sqlx::Error::PoolClosed.into())
    }

    async fn get_by_id(&self, _id: Uuid) -> Result<Option<Email>, StoreError> {
        Err(sqlx::Error::PoolClosed.into())
    }

    async fn create(&self, _email: NewEmail) -> Result<Email, StoreError> {
        Err(sqlx::Error::PoolClosed.into())
    }

    async fn close(&self) {}
}

#[tokio::test]
async fn test_store_failures_are_generic_server_errors() {
    let app = router(BrokenStore);

    let cases = [
        (get(&app, "/api/emails").await, "Failed to fetch emails"),
        (
            get(&app, "/api/emails/search?q=x").await,
            "Failed to search emails",
        ),
        (
            get(&app, &format!("/api/emails/{}", Uuid::new_v4())).await,
            "Failed to fetch email",
        ),
        (
            post_json(&app, json!({"to": "a@x.com", "subject": "S"})).await,
            "Failed to create email",
        ),
    ];

    for (response, message) in cases {
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body, json!({"success": false, "error": message}));
    }
}
