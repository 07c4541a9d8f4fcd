//! Integration tests using mock HTTP server
//!
//! Tests the full flow: request descriptor → HTTP request → classified
//! outcome → pagination links → decoded records

use anyhow::Context;
use canvas_api::{
    is_rate_limit, Client, ClientConfig, Error, Method, RawRequest, RequestDescriptor, Scheme,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
struct Course {
    id: u64,
    name: String,
}

/// Typed endpoint: GET /accounts/:id/courses
struct ListAccountCourses {
    account_id: u64,
    state: &'static str,
}

impl RequestDescriptor for ListAccountCourses {
    fn method(&self) -> Method {
        Method::GET
    }

    fn url_path(&self) -> String {
        format!("accounts/{}/courses/", self.account_id)
    }

    fn query(&self) -> canvas_api::Result<String> {
        Ok(canvas_api::request::query_string([
            ("state[]", self.state),
            ("per_page", "2"),
        ]))
    }

    fn validate(&self) -> canvas_api::Result<()> {
        canvas_api::request::check_one_of(
            "state[]",
            self.state,
            &["created", "claimed", "available", "completed", "deleted", "all"],
        )
    }
}

/// The blocking client is built inside `spawn_blocking`, never on the runtime
fn config_for(server: &MockServer) -> ClientConfig {
    let host = server.uri().trim_start_matches("http://").to_string();
    ClientConfig::new(host, "integration-token")
        .user_agent("canvas-api-integration")
        .scheme(Scheme::Http)
}

fn links(server: &MockServer, current: u32, next: Option<u32>) -> String {
    let uri = server.uri();
    let link = |page: u32, rel: &str| {
        format!(
            "<{uri}/api/v1/accounts/1/courses?state%5B%5D=available&page={page}&per_page=2>; \
             rel=\"{rel}\""
        )
    };

    let mut parts = vec![link(current, "current"), link(1, "first"), link(3, "last")];
    if let Some(next) = next {
        parts.push(link(next, "next"));
    }
    parts.join(",")
}

async fn mount_courses_page(
    server: &MockServer,
    page: u32,
    next: Option<u32>,
    body: serde_json::Value,
) {
    Mock::given(method("GET"))
        .and(path("/api/v1/accounts/1/courses"))
        .and(query_param("page", page.to_string()))
        .and(header("Authorization", "Bearer integration-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Link", links(server, page, next).as_str())
                .set_body_json(body),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_collect_all_walks_every_page() {
    let server = MockServer::start().await;

    mount_courses_page(
        &server,
        2,
        Some(3),
        json!([{"id": 3, "name": "Chemistry"}, {"id": 4, "name": "Physics"}]),
    )
    .await;
    mount_courses_page(&server, 3, None, json!([{"id": 5, "name": "Rust"}])).await;

    // The initial request carries no page parameter
    Mock::given(method("GET"))
        .and(path("/api/v1/accounts/1/courses"))
        .and(query_param("state[]", "available"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Link", links(&server, 1, Some(2)).as_str())
                .set_body_json(json!([{"id": 1, "name": "Biology"}, {"id": 2, "name": "Algebra"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let courses: Vec<Course> = tokio::task::spawn_blocking(move || {
        Client::new(config)
            .unwrap()
            .collect_all(&ListAccountCourses {
                account_id: 1,
                state: "available",
            })
            .unwrap()
    })
    .await
    .unwrap();

    let ids: Vec<u64> = courses.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    assert_eq!(courses[4].name, "Rust");
}

#[tokio::test]
async fn test_invalid_descriptor_never_reaches_server() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let err = tokio::task::spawn_blocking(move || {
        Client::new(config)
            .unwrap()
            .send(&ListAccountCourses {
                account_id: 1,
                state: "archived",
            })
            .unwrap_err()
    })
    .await
    .unwrap();

    assert!(matches!(err, Error::InvalidEnumValue { .. }));
}

#[tokio::test]
async fn test_rate_limit_survives_wrapping() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/self"))
        .respond_with(
            ResponseTemplate::new(403).set_body_string("403 Forbidden (Rate Limit Exceeded)"),
        )
        .mount(&server)
        .await;

    let config = config_for(&server);
    let err = tokio::task::spawn_blocking(move || {
        Client::new(config)
            .unwrap()
            .send(&RawRequest::get("/users/self"))
            .map(|_| ())
            .context("fetching profile")
            .context("syncing roster")
            .unwrap_err()
    })
    .await
    .unwrap();

    assert!(is_rate_limit(&*err));
    assert_eq!(err.to_string(), "syncing roster");
}

#[tokio::test]
async fn test_shared_client_across_threads() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/courses/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7, "name": "Art"})))
        .expect(4)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let courses = tokio::task::spawn_blocking(move || {
        let client = Arc::new(Client::new(config).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let client = Arc::clone(&client);
                std::thread::spawn(move || {
                    client
                        .send_json::<Course, _>(&RawRequest::get("/courses/7"))
                        .unwrap()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect::<Vec<_>>()
    })
    .await
    .unwrap();

    assert_eq!(courses.len(), 4);
    assert!(courses.iter().all(|c| c.id == 7));
}
