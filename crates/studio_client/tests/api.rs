use std::time::Duration;

use pretty_assertions::assert_eq;
use studio_client::{
    ApiSettings, HttpSwapApi, ImagePayload, JobRequest, JobState, PollError, SubmitError, SwapApi,
    TaskId, TemplateSelector,
};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_request() -> JobRequest {
    JobRequest {
        source: ImagePayload {
            file_name: "face.jpg".to_string(),
            mime: "image/jpeg".to_string(),
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
        },
        template: TemplateSelector::Catalog {
            id: "2".to_string(),
        },
        source_face_index: 0,
        target_face_index: 0,
    }
}

fn api_for(server: &MockServer) -> HttpSwapApi {
    HttpSwapApi::new(ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    })
    .expect("http client")
}

#[tokio::test]
async fn submit_posts_multipart_and_returns_task_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/face-swap"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("name=\"template_id\""))
        .and(body_string_contains("name=\"source_face_index\""))
        .and(body_string_contains("name=\"target_face_index\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "task_id": "abc123def456"
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let task_id = api.submit(&sample_request()).await.expect("submit ok");
    assert_eq!(task_id, TaskId::new("abc123def456"));
}

#[tokio::test]
async fn custom_template_uploads_template_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/face-swap"))
        .and(body_string_contains("name=\"template_file\""))
        .and(body_string_contains("custom"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "task_id": "t1" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut request = sample_request();
    request.template = TemplateSelector::Custom(ImagePayload {
        file_name: "my_template.png".to_string(),
        mime: "image/png".to_string(),
        bytes: vec![0x89, 0x50, 0x4E, 0x47],
    });

    let api = api_for(&server);
    api.submit(&request).await.expect("submit ok");
}

#[tokio::test]
async fn queue_full_503_is_translated_and_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/face-swap"))
        .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
            "detail": { "error": "queue_full" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);
    let err = api.submit(&sample_request()).await.unwrap_err();
    assert_eq!(err, SubmitError::QueueFull);
    assert!(err.to_string().contains("queue is full"));
}

#[tokio::test]
async fn rejection_surfaces_server_detail_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/face-swap"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "detail": "no face detected in source image"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);
    let err = api.submit(&sample_request()).await.unwrap_err();
    assert_eq!(
        err,
        SubmitError::Rejected {
            message: "no face detected in source image".to_string()
        }
    );
}

#[tokio::test]
async fn rejection_without_parsable_body_reports_status_line() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/face-swap"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);
    let err = api.submit(&sample_request()).await.unwrap_err();
    assert_eq!(
        err,
        SubmitError::Rejected {
            message: "HTTP 500: Internal Server Error".to_string()
        }
    );
}

#[tokio::test]
async fn submission_retries_on_timeout_until_exhausted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/face-swap"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(serde_json::json!({ "task_id": "late" })),
        )
        // One initial attempt plus exactly max_retries retries.
        .expect(3)
        .mount(&server)
        .await;

    let api = HttpSwapApi::new(ApiSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        max_retries: 2,
        retry_delay: Duration::from_millis(10),
        ..ApiSettings::default()
    })
    .expect("http client");

    let err = api.submit(&sample_request()).await.unwrap_err();
    assert_eq!(err, SubmitError::Timeout { retries: 2 });
    server.verify().await;
}

#[tokio::test]
async fn non_timeout_failure_is_never_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/face-swap"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpSwapApi::new(ApiSettings {
        base_url: server.uri(),
        max_retries: 3,
        retry_delay: Duration::from_millis(1),
        ..ApiSettings::default()
    })
    .expect("http client");

    let err = api.submit(&sample_request()).await.unwrap_err();
    assert!(matches!(err, SubmitError::Rejected { .. }));
    server.verify().await;
}

#[tokio::test]
async fn poll_maps_snapshot_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/face-swap-status/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "task_status": {
                "status": "processing",
                "progress": 42,
                "message": "detecting faces"
            }
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let snapshot = api.poll(&TaskId::new("abc123")).await.expect("poll ok");
    assert_eq!(snapshot.state, JobState::Processing);
    assert_eq!(snapshot.progress, 42);
    assert_eq!(snapshot.message, "detecting faces");
    assert_eq!(snapshot.result_url, None);
}

#[tokio::test]
async fn poll_carries_completed_payload_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/face-swap-status/xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "task_status": {
                "status": "completed",
                "progress": 100,
                "message": "done",
                "result_url": "https://x/r.jpg",
                "template_name": "模板 2"
            }
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let snapshot = api.poll(&TaskId::new("xyz")).await.expect("poll ok");
    assert_eq!(snapshot.state, JobState::Completed);
    assert_eq!(snapshot.result_url.as_deref(), Some("https://x/r.jpg"));
    assert_eq!(snapshot.template_name.as_deref(), Some("模板 2"));
}

#[tokio::test]
async fn poll_http_error_is_a_hard_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/face-swap-status/gone"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);
    let err = api.poll(&TaskId::new("gone")).await.unwrap_err();
    assert_eq!(err, PollError::Http { status: 500 });
}

#[tokio::test]
async fn health_probe_reports_both_outcomes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let api = api_for(&server);
    assert!(api.health().await.is_ok());

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = api.health().await.unwrap_err();
    assert!(err.message.contains("503"));
}
