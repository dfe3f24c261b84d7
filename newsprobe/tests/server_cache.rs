use std::sync::Arc;
use std::time::{Duration, Instant};

use mockito::Matcher;
use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use serde_json::json;

use newsprobe::analyzer::NewsAnalyzer;
use newsprobe::inference::remote::RemoteModel;
use newsprobe::server::build_rocket;

fn test_config(api_url: &str) -> common::Config {
    toml::from_str(&format!(
        r#"
        [inference]
        api_url = "{api_url}"

        [models.category]
        id = "elozano/news-category"
        [models.fake]
        id = "elozano/news-fake"
        [models.clickbait]
        id = "elozano/news-clickbait"
        [models.ner]
        id = "dslim/bert-base-NER"
        "#
    ))
    .expect("test config")
}

fn analyzer_over(server: &mockito::ServerGuard) -> Arc<NewsAnalyzer> {
    let remote = |model_id: &str| Arc::new(RemoteModel::new(server.url(), model_id, None));
    Arc::new(NewsAnalyzer::new(
        (remote("elozano/news-category"), "[SEP]".into()),
        (remote("elozano/news-fake"), "[SEP]".into()),
        (remote("elozano/news-clickbait"), "[SEP]".into()),
        remote("dslim/bert-base-NER"),
    ))
}

async fn client_over(server: &mockito::ServerGuard) -> Client {
    let config = Arc::new(test_config(&server.url()));
    let rocket = build_rocket(analyzer_over(server), config);
    Client::tracked(rocket).await.expect("rocket client")
}

#[tokio::test]
async fn identical_resubmission_is_served_from_cache() {
    let mut server = mockito::Server::new_async().await;

    // Each model expects exactly one hit; the second submission must be
    // served from the last-result cache without any inference.
    let category_mock = server
        .mock("POST", "/models/elozano/news-category")
        .with_status(200)
        .with_body(r#"[[{"label": "Sports", "score": 0.97}]]"#)
        .expect(1)
        .create_async()
        .await;
    let fake_mock = server
        .mock("POST", "/models/elozano/news-fake")
        .with_status(200)
        .with_body(r#"[[{"label": "Real", "score": 0.92}]]"#)
        .expect(1)
        .create_async()
        .await;
    let clickbait_mock = server
        .mock("POST", "/models/elozano/news-clickbait")
        .with_status(200)
        .with_body(r#"[[{"label": "Normal", "score": 0.85}]]"#)
        .expect(1)
        .create_async()
        .await;
    let ner_mock = server
        .mock("POST", "/models/dslim/bert-base-NER")
        .with_status(200)
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;

    let client = client_over(&server).await;
    let body = r#"{"headline": "Lakers Won!", "content": ""}"#;

    for _ in 0..2 {
        let response = client
            .post("/api/v1/analyze")
            .header(ContentType::JSON)
            .body(body)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let view: serde_json::Value =
            response.into_json().await.expect("json response body");
        assert_eq!(view["lines"][0]["value"], "Sports");
        assert_eq!(view["lines"][0]["emoji"], "🏀");
        assert_eq!(view["lines"][1]["value"], "No");
        assert_eq!(view["lines"][2]["value"], "No");
        // Empty content: explicit absent marker plus degraded-input warning.
        assert!(view["content"].is_null());
        assert!(view["warning"].is_string());
    }

    category_mock.assert_async().await;
    fake_mock.assert_async().await;
    clickbait_mock.assert_async().await;
    ner_mock.assert_async().await;
}

#[tokio::test]
async fn empty_headline_is_rejected_before_any_inference() {
    let mut server = mockito::Server::new_async().await;

    let category_mock = server
        .mock("POST", "/models/elozano/news-category")
        .with_status(200)
        .with_body(r#"[[{"label": "Sports", "score": 0.97}]]"#)
        .expect(0)
        .create_async()
        .await;

    let client = client_over(&server).await;
    let response = client
        .post("/api/v1/analyze")
        .header(ContentType::JSON)
        .body(r#"{"headline": "   ", "content": "Some body."}"#)
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadRequest);
    let body: serde_json::Value = response.into_json().await.expect("json error body");
    assert_eq!(body["error"], "Please provide a headline.");

    category_mock.assert_async().await;
}

#[tokio::test]
async fn failed_analysis_has_no_partial_result() {
    let mut server = mockito::Server::new_async().await;

    // Category succeeds, fake fails: the whole request fails.
    server
        .mock("POST", "/models/elozano/news-category")
        .with_status(200)
        .with_body(r#"[[{"label": "Sports", "score": 0.97}]]"#)
        .create_async()
        .await;
    server
        .mock("POST", "/models/elozano/news-fake")
        .with_status(500)
        .with_body(r#"{"error": "internal"}"#)
        .create_async()
        .await;

    let client = client_over(&server).await;
    let response = client
        .post("/api/v1/analyze")
        .header(ContentType::JSON)
        .body(r#"{"headline": "Lakers Won!"}"#)
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadGateway);
}

#[tokio::test]
async fn distinct_concurrent_submissions_do_not_serialize() {
    let mut server = mockito::Server::new_async().await;

    // The category model stalls for 500 ms per call. Two concurrent
    // submissions with different headlines must overlap: back-to-back
    // analyses would need at least a full second.
    server
        .mock("POST", "/models/elozano/news-category")
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(Duration::from_millis(500));
            w.write_all(br#"[[{"label": "Sports", "score": 0.97}]]"#)
        })
        .expect(2)
        .create_async()
        .await;
    server
        .mock("POST", "/models/elozano/news-fake")
        .with_status(200)
        .with_body(r#"[[{"label": "Real", "score": 0.92}]]"#)
        .expect(2)
        .create_async()
        .await;
    server
        .mock("POST", "/models/elozano/news-clickbait")
        .with_status(200)
        .with_body(r#"[[{"label": "Normal", "score": 0.85}]]"#)
        .expect(2)
        .create_async()
        .await;
    server
        .mock("POST", "/models/dslim/bert-base-NER")
        .with_status(200)
        .with_body("[]")
        .expect(2)
        .create_async()
        .await;

    let config = Arc::new(test_config(&server.url()));
    let client = Client::untracked(build_rocket(analyzer_over(&server), config))
        .await
        .expect("rocket client");

    let post = |headline: &'static str| {
        client
            .post("/api/v1/analyze")
            .header(ContentType::JSON)
            .body(json!({ "headline": headline }).to_string())
            .dispatch()
    };

    let started = Instant::now();
    let (first, second) = tokio::join!(post("Lakers Won!"), post("Celtics Won!"));
    let elapsed = started.elapsed();

    assert_eq!(first.status(), Status::Ok);
    assert_eq!(second.status(), Status::Ok);
    assert!(
        elapsed < Duration::from_millis(900),
        "concurrent submissions took {elapsed:?}"
    );
}

#[tokio::test]
async fn submitted_text_is_analyzed_and_rendered_untrimmed() {
    let mut server = mockito::Server::new_async().await;

    let headline = "  Lakers Won! ";

    // The body matcher only accepts the headline exactly as submitted; a
    // trimmed request would go unmatched and fail the analysis.
    let category_mock = server
        .mock("POST", "/models/elozano/news-category")
        .match_body(Matcher::PartialJson(json!({ "inputs": headline })))
        .with_status(200)
        .with_body(r#"[[{"label": "Sports", "score": 0.97}]]"#)
        .create_async()
        .await;
    server
        .mock("POST", "/models/elozano/news-fake")
        .with_status(200)
        .with_body(r#"[[{"label": "Real", "score": 0.92}]]"#)
        .create_async()
        .await;
    server
        .mock("POST", "/models/elozano/news-clickbait")
        .with_status(200)
        .with_body(r#"[[{"label": "Normal", "score": 0.85}]]"#)
        .create_async()
        .await;
    server
        .mock("POST", "/models/dslim/bert-base-NER")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let client = client_over(&server).await;
    let response = client
        .post("/api/v1/analyze")
        .header(ContentType::JSON)
        .body(json!({ "headline": headline }).to_string())
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);
    let view: serde_json::Value = response.into_json().await.expect("json response body");
    assert_eq!(view["headline"][0]["kind"], "plain");
    assert_eq!(view["headline"][0]["text"], headline);

    category_mock.assert_async().await;
}

#[tokio::test]
async fn status_reports_configured_models() {
    let server = mockito::Server::new_async().await;
    let client = client_over(&server).await;

    let response = client.get("/health").dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    let response = client.get("/api/v1/status").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let body: serde_json::Value = response.into_json().await.expect("status body");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["models"]["category"], "elozano/news-category");
    assert_eq!(body["models"]["ner"], "dslim/bert-base-NER");
}
