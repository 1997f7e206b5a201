//! Integration tests for the marketing HTTP endpoints.
//!
//! Each test spins up the real Axum app on a random port with stub providers
//! and drives it over HTTP with reqwest.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use tactix::error::LlmError;
use tactix::llm::{
    CompletionRequest, CompletionResponse, ImageProvider, ImageRequest, ImageResponse, LlmProvider,
};
use tactix::marketing::{self, MarketingService};
use tactix::origin::OriginPolicy;

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

const ALLOWED: &str = "http://localhost:5173";

const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// Stub LLM that returns a fixed reply and counts calls.
struct StubLlm {
    reply: String,
    calls: AtomicUsize,
}

impl StubLlm {
    fn new(reply: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.into(),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for StubLlm {
    fn model_name(&self) -> &str {
        "stub"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(CompletionResponse {
            content: self.reply.clone(),
            ..Default::default()
        })
    }
}

/// Stub LLM that always fails upstream.
struct FailingLlm;

#[async_trait]
impl LlmProvider for FailingLlm {
    fn model_name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Err(LlmError::Upstream {
            provider: "stub".into(),
            status: 502,
            body: "bad gateway".into(),
        })
    }
}

/// Stub LLM whose completion panics mid-request.
struct PanickingLlm;

#[async_trait]
impl LlmProvider for PanickingLlm {
    fn model_name(&self) -> &str {
        "panicking"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        panic!("provider blew up");
    }
}

/// Image stub: `None` means every call fails.
struct StubImages {
    url: Option<String>,
    calls: AtomicUsize,
}

impl StubImages {
    fn new(url: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            url: url.map(str::to_string),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ImageProvider for StubImages {
    async fn generate_image(&self, _request: ImageRequest) -> Result<ImageResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.url {
            Some(url) => Ok(ImageResponse { url: url.clone() }),
            None => Err(LlmError::RequestFailed {
                provider: "stub".into(),
                reason: "connection reset".into(),
            }),
        }
    }
}

fn policy() -> Arc<OriginPolicy> {
    Arc::new(OriginPolicy::new(
        vec![ALLOWED.to_string()],
        vec![".lovableproject.com".to_string(), ".lovable.app".to_string()],
    ))
}

/// Start the app on a random port, return its base URL.
async fn start_server(
    llm: Arc<dyn LlmProvider>,
    images: Option<Arc<dyn ImageProvider>>,
) -> String {
    let service = Arc::new(MarketingService::new(llm, images));
    let app = marketing::app(service, policy());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    format!("http://127.0.0.1:{port}")
}

async fn post_json(
    base: &str,
    path: &str,
    origin: &str,
    body: Value,
) -> (StatusCode, reqwest::header::HeaderMap, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{base}/functions/v1/{path}"))
        .header("Origin", origin)
        .json(&body)
        .send()
        .await
        .expect("request failed");
    let status = resp.status();
    let headers = resp.headers().clone();
    let json = resp.json::<Value>().await.expect("response was not JSON");
    (status, headers, json)
}

fn agent_reply() -> String {
    r#"Sure, here is the analysis:
{"summary":"Demand is rising","insights":["i1","i2"],"recommendations":["r1"],"nextSteps":["n1"]}
Let me know if you need more."#
        .to_string()
}

fn ideas_reply(count: usize) -> String {
    let ideas: Vec<Value> = (1..=count)
        .map(|n| {
            json!({
                "id": format!("idea-{n}"),
                "title": format!("Idea {n}"),
                "content": "Partner with a local gym for co-branded content.",
                "hook": "Sweat now, sip later.",
                "category": "partnership",
                "engagement": "+30%",
                "difficulty": "Medium",
                "timeframe": "1 week"
            })
        })
        .collect();
    format!("```json\n{}\n```", serde_json::to_string_pretty(&ideas).unwrap())
}

fn onboarding_body() -> Value {
    json!({
        "onboardingData": {
            "businessType": "local",
            "goals": ["awareness"],
            "channels": ["instagram"],
            "budget": "$200",
            "timeline": "1 month"
        },
        "category": "all"
    })
}

// ── agent-workflow ──────────────────────────────────────────────────────

#[tokio::test]
async fn agent_workflow_returns_structured_result() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server(StubLlm::new(agent_reply()), None).await;

        let (status, headers, json) = post_json(
            &base,
            "agent-workflow",
            ALLOWED,
            json!({"agentType": "market-intelligence", "action": "analyze", "context": {"niche": "coffee"}}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["access-control-allow-origin"], ALLOWED);
        assert_eq!(headers["access-control-allow-credentials"], "true");
        assert_eq!(headers["access-control-allow-headers"], ALLOW_HEADERS);
        assert_eq!(json["success"], true);
        assert_eq!(json["agentType"], "market-intelligence");
        assert_eq!(json["result"]["summary"], "Demand is rising");
        assert_eq!(json["result"]["nextSteps"][0], "n1");
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn agent_workflow_upstream_failure_is_500() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server(Arc::new(FailingLlm), None).await;

        let (status, headers, json) =
            post_json(&base, "agent-workflow", ALLOWED, json!({"agentType": "x"})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(headers["access-control-allow-origin"], ALLOWED);
        assert_eq!(headers["access-control-allow-headers"], ALLOW_HEADERS);
        let msg = json["error"].as_str().unwrap();
        assert!(msg.contains("502"));
        assert!(!msg.contains("bad gateway"));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn agent_workflow_accepts_string_context() {
    timeout(TEST_TIMEOUT, async {
        let llm = StubLlm::new(agent_reply());
        let base = start_server(llm.clone(), None).await;

        let (status, _, json) = post_json(
            &base,
            "agent-workflow",
            ALLOWED,
            json!({"agentType": "content-generation", "action": "generate", "context": "launch a cafe"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["result"]["summary"], "Demand is rising");
        assert_eq!(llm.calls(), 1);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn handler_panic_is_500_with_cors_headers() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server(Arc::new(PanickingLlm), None).await;

        let (status, headers, json) =
            post_json(&base, "agent-workflow", ALLOWED, json!({"agentType": "x"})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(headers["access-control-allow-origin"], ALLOWED);
        assert_eq!(headers["access-control-allow-credentials"], "true");
        assert_eq!(headers["access-control-allow-headers"], ALLOW_HEADERS);
        assert!(json["error"].as_str().unwrap().contains("provider blew up"));
    })
    .await
    .expect("test timed out");
}

// ── create-post ─────────────────────────────────────────────────────────

#[tokio::test]
async fn create_post_empty_title_is_400_without_llm_call() {
    timeout(TEST_TIMEOUT, async {
        let llm = StubLlm::new("{}");
        let base = start_server(llm.clone(), None).await;

        let (status, headers, json) = post_json(
            &base,
            "create-post",
            ALLOWED,
            json!({"ideaTitle": "", "ideaContent": "x", "platform": "instagram", "tone": "casual"}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(headers["access-control-allow-origin"], ALLOWED);
        assert_eq!(headers["access-control-allow-headers"], ALLOW_HEADERS);
        assert!(json["error"].as_str().unwrap().contains("missing required fields"));
        assert_eq!(llm.calls(), 0);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn create_post_malformed_body_is_400() {
    timeout(TEST_TIMEOUT, async {
        let llm = StubLlm::new("{}");
        let base = start_server(llm.clone(), None).await;

        let resp = reqwest::Client::new()
            .post(format!("{base}/functions/v1/create-post"))
            .header("Origin", ALLOWED)
            .header("Content-Type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json: Value = resp.json().await.unwrap();
        assert!(json["error"].is_string());
        assert_eq!(llm.calls(), 0);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn create_post_attaches_image() {
    timeout(TEST_TIMEOUT, async {
        let llm = StubLlm::new(
            r##"{"headline":"Fresh roast","content":"Try our new blend.","hashtags":["#coffee"],"callToAction":"Order now","tips":["Post at 8am"],"imagePrompt":"Steam over a mug"}"##,
        );
        let images = StubImages::new(Some("https://images.example/abc.png"));
        let base = start_server(llm, Some(images.clone())).await;

        let (status, _, json) = post_json(
            &base,
            "create-post",
            "https://foo.lovableproject.com",
            json!({"ideaTitle": "New blend", "ideaContent": "Launch it", "platform": "instagram", "tone": "casual"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["platform"], "instagram");
        assert_eq!(json["post"]["hashtags"][0], "coffee");
        assert_eq!(json["post"]["imageUrl"], "https://images.example/abc.png");
        assert_eq!(images.calls.load(Ordering::SeqCst), 1);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn create_post_survives_image_failure() {
    timeout(TEST_TIMEOUT, async {
        let llm = StubLlm::new(
            r#"{"headline":"Fresh roast","content":"Try our new blend.","hashtags":["coffee"],"callToAction":"Order now","tips":["t"]}"#,
        );
        let base = start_server(llm, Some(StubImages::new(None))).await;

        let (status, _, json) = post_json(
            &base,
            "create-post",
            ALLOWED,
            json!({"ideaTitle": "New blend", "ideaContent": "Launch it", "platform": "linkedin", "tone": "witty"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert!(json["post"].get("imageUrl").is_none());
        assert_eq!(json["post"]["headline"], "Fresh roast");
        assert_eq!(json["post"]["content"], "Try our new blend.");
        assert_eq!(json["post"]["callToAction"], "Order now");
    })
    .await
    .expect("test timed out");
}

// ── generate-ideas ──────────────────────────────────────────────────────

#[tokio::test]
async fn generate_ideas_returns_six_complete_ideas() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server(StubLlm::new(ideas_reply(6)), None).await;

        let (status, _, json) = post_json(&base, "generate-ideas", ALLOWED, onboarding_body()).await;

        assert_eq!(status, StatusCode::OK);
        let ideas = json["ideas"].as_array().unwrap();
        assert_eq!(ideas.len(), 6);
        for idea in ideas {
            for field in [
                "id", "title", "content", "hook", "category", "engagement", "difficulty",
                "timeframe",
            ] {
                assert!(idea[field].is_string(), "missing {field}");
            }
        }
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn generate_ideas_unparseable_is_500() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server(StubLlm::new("Here are some thoughts, no list."), None).await;

        let (status, _, json) = post_json(&base, "generate-ideas", ALLOWED, onboarding_body()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json.get("ideas").is_none());
        assert!(
            json["error"]
                .as_str()
                .unwrap()
                .to_lowercase()
                .contains("failed to parse")
        );
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn generate_ideas_missing_onboarding_is_400() {
    timeout(TEST_TIMEOUT, async {
        let llm = StubLlm::new(ideas_reply(6));
        let base = start_server(llm.clone(), None).await;

        let (status, _, json) =
            post_json(&base, "generate-ideas", ALLOWED, json!({"category": "seo"})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("missing onboarding data"));
        assert_eq!(llm.calls(), 0);
    })
    .await
    .expect("test timed out");
}

// ── Origin guard ────────────────────────────────────────────────────────

#[tokio::test]
async fn disallowed_origin_is_403_on_every_endpoint() {
    timeout(TEST_TIMEOUT, async {
        let llm = StubLlm::new(agent_reply());
        let base = start_server(llm.clone(), None).await;

        for path in ["agent-workflow", "create-post", "generate-ideas"] {
            let (status, headers, json) =
                post_json(&base, path, "https://evil.example.com", onboarding_body()).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "{path}");
            assert!(headers.get("access-control-allow-origin").is_none());
            assert_eq!(json["error"], "Origin not allowed");
        }
        assert_eq!(llm.calls(), 0);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn preflight_is_answered_without_body() {
    timeout(TEST_TIMEOUT, async {
        let llm = StubLlm::new(agent_reply());
        let base = start_server(llm.clone(), None).await;

        let resp = reqwest::Client::new()
            .request(
                reqwest::Method::OPTIONS,
                format!("{base}/functions/v1/create-post"),
            )
            .header("Origin", "https://foo.lovableproject.com")
            .header("Access-Control-Request-Method", "POST")
            .header("Access-Control-Request-Headers", "content-type, apikey")
            .send()
            .await
            .unwrap();

        assert!(resp.status().is_success());
        assert_eq!(
            resp.headers()["access-control-allow-origin"],
            "https://foo.lovableproject.com"
        );
        assert!(resp.headers().contains_key("access-control-allow-headers"));
        assert!(resp.text().await.unwrap().is_empty());
        assert_eq!(llm.calls(), 0);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn health_is_not_origin_guarded() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server(StubLlm::new(""), None).await;

        let json: Value = reqwest::get(format!("{base}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(json["status"], "ok");
    })
    .await
    .expect("test timed out");
}
