//! Router assembly: generation endpoints, simulated functions, static files, CORS, and HTTP tracing.

use std::{path::Path, sync::Arc};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod functions;
pub mod http;

/// Build the application router with:
/// - course generation at `/generate-course` and `/api/generate-course`
/// - simulated functions under `/functions/v1/...` (exports also under `/api/...`)
/// - static SPA from `static_dir` with index fallback
/// - CORS (allow any origin/method/headers)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>, static_dir: &Path) -> Router {
    let static_service = ServeDir::new(static_dir)
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/health", get(http::http_health))
        // Generation
        .route("/generate-course", post(http::http_generate_course))
        .route("/api/generate-course", post(http::http_api_generate_course))
        // Simulated functions
        .route("/functions/v1/generate-course", post(functions::fn_generate_course))
        .route("/functions/v1/ai-coach", post(functions::fn_ai_coach))
        .route("/functions/v1/translate-content", post(functions::fn_translate_content))
        .route("/functions/v1/export-pdf", post(functions::fn_export_pdf))
        .route("/functions/v1/export-ppt", post(functions::fn_export_ppt))
        .route("/api/export-pdf", post(functions::fn_export_pdf))
        .route("/api/export-ppt", post(functions::fn_export_ppt))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{AppConfig, ParseFailurePolicy, SimulationDelays};
    use crate::llm::{CourseModel, LlmError};

    /// Records prompts and answers with a fixed reply.
    struct FakeModel {
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
        reply: Option<String>,
    }

    impl FakeModel {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0), prompts: Mutex::new(Vec::new()), reply: Some(text.into()) })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0), prompts: Mutex::new(Vec::new()), reply: None })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CourseModel for FakeModel {
        fn name(&self) -> &str {
            "fake"
        }

        async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().ok_or(LlmError::Status { status: 429, message: "quota exceeded for key AIza-secret".into() })
        }
    }

    fn config() -> AppConfig {
        AppConfig { simulation: SimulationDelays::none(), ..AppConfig::default() }
    }

    fn app_with(config: AppConfig, model: Option<Arc<FakeModel>>) -> Router {
        let model = model.map(|m| m as Arc<dyn CourseModel>);
        build_router(Arc::new(AppState::new(config, model)), Path::new("./static"))
    }

    fn app(model: &Arc<FakeModel>) -> Router {
        app_with(config(), Some(model.clone()))
    }

    async fn post(app: Router, uri: &str, body: Value) -> Response {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        app.oneshot(req).await.unwrap()
    }

    async fn json_body(resp: Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn status_header(resp: &Response) -> &str {
        resp.headers().get("x-course-status").unwrap().to_str().unwrap()
    }

    #[tokio::test]
    async fn missing_topic_is_400_without_model_call() {
        let model = FakeModel::replying("{}");
        for uri in ["/generate-course", "/api/generate-course"] {
            for body in [json!({}), json!({"topic": ""}), json!({"language": "French", "tone": "Casual"})] {
                let resp = post(app(&model), uri, body).await;
                assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
                assert_eq!(json_body(resp).await, json!({"error": "Missing topic"}));
            }
        }
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn one_call_with_every_supplied_field_in_prompt() {
        let model = FakeModel::replying(r#"{"title": "T", "description": "D", "outline": []}"#);
        let body = json!({
            "topic": "Sourdough baking",
            "language": "Portuguese",
            "tone": "Playful",
            "difficulty": "Advanced",
            "duration": 90,
            "audience": "home bakers"
        });
        let resp = post(app(&model), "/api/generate-course", body).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(model.calls(), 1);

        let prompts = model.prompts.lock().unwrap();
        for needle in ["Sourdough baking", "Portuguese", "Playful", "Advanced", "90", "home bakers"] {
            assert!(prompts[0].contains(needle), "prompt lacks {}", needle);
        }
    }

    #[tokio::test]
    async fn photosynthesis_fenced_json_is_returned_clean() {
        let model = FakeModel::replying(
            "```json\n{\"title\":\"Photosynthesis 101\",\"description\":\"...\", \"chapters\":[]}\n```",
        );
        let body = json!({"topic": "Photosynthesis", "language": "English", "tone": "Friendly", "difficulty": "Beginner"});
        let resp = post(app(&model), "/generate-course", body).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(status_header(&resp), "structured");
        assert_eq!(
            json_body(resp).await,
            json!({"title": "Photosynthesis 101", "description": "...", "chapters": []})
        );
    }

    #[tokio::test]
    async fn matching_json_passes_through_unchanged() {
        let course = json!({
            "title": "Knots",
            "description": "Tie things",
            "outline": [{"module": 1, "title": "Bowline", "description": "Loop", "topics": ["rabbit", "tree"], "estimated_time": "10m"}],
            "extra": {"kept": true}
        });
        let model = FakeModel::replying(&course.to_string());
        let resp = post(app(&model), "/api/generate-course", json!({"topic": "Knots"})).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await, course);
    }

    #[tokio::test]
    async fn non_json_reply_degrades_per_route_shape() {
        let model = FakeModel::replying("Sorry, I cannot help.");

        let resp = post(app(&model), "/api/generate-course", json!({"topic": "X"})).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(status_header(&resp), "degraded");
        assert_eq!(
            json_body(resp).await,
            json!({"title": "Generated Course", "description": "Sorry, I cannot help.", "outline": []})
        );

        let resp = post(app(&model), "/generate-course", json!({"topic": "X"})).await;
        assert_eq!(
            json_body(resp).await,
            json!({"title": "Generated Course", "description": "Sorry, I cannot help.", "chapters": []})
        );
    }

    #[tokio::test]
    async fn empty_completion_degrades_instead_of_failing() {
        let model = FakeModel::replying("");
        let resp = post(app(&model), "/generate-course", json!({"topic": "X"})).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(status_header(&resp), "degraded");
        assert_eq!(
            json_body(resp).await,
            json!({"title": "Generated Course", "description": "The model returned no content.", "chapters": []})
        );
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn body_shape_overrides_route_default() {
        let model = FakeModel::replying("plain text");
        let resp = post(app(&model), "/generate-course", json!({"topic": "X", "shape": "outline"})).await;
        let v = json_body(resp).await;
        assert_eq!(v["outline"], json!([]));
        assert!(v.get("chapters").is_none());
        assert!(model.prompts.lock().unwrap()[0].contains("estimated_time"));
    }

    #[tokio::test]
    async fn upstream_failure_is_generic_500() {
        let model = FakeModel::failing();
        let resp = post(app(&model), "/generate-course", json!({"topic": "X"})).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(resp).await, json!({"error": "Failed to generate course"}));
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn no_model_configured_is_500() {
        let resp = post(app_with(config(), None), "/api/generate-course", json!({"topic": "X"})).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(resp).await, json!({"error": "Failed to generate course"}));
    }

    #[tokio::test]
    async fn strict_parse_policy_is_502() {
        let model = FakeModel::replying("not json");
        let mut cfg = config();
        cfg.policy.on_parse_failure = ParseFailurePolicy::Reject;
        let resp = post(app_with(cfg, Some(model)), "/generate-course", json!({"topic": "X"})).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(json_body(resp).await, json!({"error": "Model returned an unusable course"}));
    }

    #[tokio::test]
    async fn mismatched_shape_is_flagged_not_changed() {
        let model = FakeModel::replying(r#"{"name": "no title here"}"#);
        let resp = post(app(&model), "/api/generate-course", json!({"topic": "X"})).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(status_header(&resp), "unchecked");
        assert_eq!(json_body(resp).await, json!({"name": "no title here"}));
    }

    #[tokio::test]
    async fn malformed_body_is_400() {
        let model = FakeModel::replying("{}");
        let req = Request::builder()
            .method("POST")
            .uri("/generate-course")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let resp = app(&model).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(resp).await["error"].is_string());
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn health_reports_model_presence() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = app_with(config(), None).oneshot(req).await.unwrap();
        assert_eq!(json_body(resp).await, json!({"ok": true, "model": false}));
    }

    #[tokio::test]
    async fn template_course_needs_no_model() {
        let model = FakeModel::replying("{}");
        let resp = post(app(&model), "/functions/v1/generate-course", json!({"topic": "Chess", "difficulty": "beginner", "duration": 120})).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let v = json_body(resp).await;
        assert_eq!(v["title"], "Chess - Comprehensive Guide");
        assert_eq!(v["outline"]["estimatedDuration"], 120);
        assert_eq!(v["outline"]["prerequisites"], "None");
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn coach_and_translate_answer_canned() {
        let model = FakeModel::replying("{}");
        let coach = post(
            app(&model),
            "/functions/v1/ai-coach",
            json!({"message": "help", "context": {"topic": "Rust", "courseData": {}, "currentStep": "review"}}),
        )
        .await;
        assert_eq!(coach.status(), StatusCode::OK);
        let v = json_body(coach).await;
        assert_eq!(v["confidence"], json!(0.92));
        assert_eq!(v["suggestions"].as_array().unwrap().len(), 5);

        let tr = post(
            app(&model),
            "/functions/v1/translate-content",
            json!({"content": "Hi", "fromLanguage": "es", "toLanguage": "en", "contentType": "title"}),
        )
        .await;
        let v = json_body(tr).await;
        assert_eq!(v["translatedContent"], "Content translated to English");
        assert_eq!(v["originalContent"], "Hi");
    }

    #[tokio::test]
    async fn bad_function_body_is_400_with_error() {
        let model = FakeModel::replying("{}");
        let resp = post(app(&model), "/functions/v1/ai-coach", json!({"message": "no context"})).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(resp).await["error"].is_string());

        let resp = post(app(&model), "/functions/v1/translate-content", json!({"content": "x", "fromLanguage": "en"})).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_content_type_is_echoed() {
        let model = FakeModel::replying("{}");
        let resp = post(
            app(&model),
            "/functions/v1/translate-content",
            json!({"content": "x", "fromLanguage": "en", "toLanguage": "es", "contentType": "video"}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["contentType"], "video");

        let resp = post(
            app(&model),
            "/functions/v1/translate-content",
            json!({"content": "x", "fromLanguage": "en", "toLanguage": "es"}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(json_body(resp).await.get("contentType").is_none());
    }

    #[tokio::test]
    async fn exports_are_json_attachments() {
        let model = FakeModel::replying("{}");
        let lessons = json!([
            {"title": "Intro", "content": "Hello", "duration": 10, "learning_objectives": ["a"]},
            {"title": "Next", "content": "World", "duration": 20, "learning_objectives": null}
        ]);

        let resp = post(
            app(&model),
            "/api/export-pdf",
            json!({"courseId": "c-1", "course": {"title": "T", "difficulty_level": "beginner"}, "lessons": lessons}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(resp.headers()[header::CONTENT_DISPOSITION], "attachment; filename=\"course-c-1.pdf.json\"");
        let v = json_body(resp).await;
        assert_eq!(v["metadata"]["difficulty"], "beginner");
        assert_eq!(v["chapters"][1]["chapterNumber"], 2);

        let resp = post(app(&model), "/functions/v1/export-ppt", json!({"courseId": "c-1", "lessons": lessons})).await;
        assert_eq!(resp.headers()[header::CONTENT_DISPOSITION], "attachment; filename=\"course-c-1.pptx.json\"");
        let v = json_body(resp).await;
        assert_eq!(v["slides"].as_array().unwrap().len(), 2);
        assert_eq!(v["slides"][0]["objectives"], json!(["a"]));
    }
}
