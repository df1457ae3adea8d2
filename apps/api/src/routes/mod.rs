pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::shell::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Shell
        .route("/api/v1/shell", get(handlers::handle_get_shell))
        .route("/api/v1/navigate", post(handlers::handle_navigate))
        // Onboarding
        .route(
            "/api/v1/onboarding",
            get(handlers::handle_get_onboarding).put(handlers::handle_update_onboarding),
        )
        .route("/api/v1/onboarding/skills", post(handlers::handle_add_skill))
        .route(
            "/api/v1/onboarding/skills/:index",
            patch(handlers::handle_update_skill).delete(handlers::handle_remove_skill),
        )
        .route(
            "/api/v1/onboarding/submit",
            post(handlers::handle_submit_profile),
        )
        // Dashboard & roadmap
        .route("/api/v1/dashboard", get(handlers::handle_get_dashboard))
        .route(
            "/api/v1/dashboard/roadmap",
            post(handlers::handle_select_role),
        )
        .route("/api/v1/roadmap", get(handlers::handle_get_roadmap))
        .route(
            "/api/v1/roadmap/milestones/:index/toggle",
            post(handlers::handle_toggle_milestone),
        )
        .route("/api/v1/roadmap/back", post(handlers::handle_roadmap_back))
        // Mentor chat
        .route("/api/v1/mentor", get(handlers::handle_get_mentor))
        .route(
            "/api/v1/mentor/messages",
            post(handlers::handle_mentor_message),
        )
        // Resume & interview
        .route("/api/v1/resume", get(handlers::handle_get_resume))
        .route("/api/v1/resume/tab", post(handlers::handle_select_tab))
        .route(
            "/api/v1/resume/feedback",
            post(handlers::handle_resume_feedback),
        )
        .route(
            "/api/v1/resume/interview/messages",
            post(handlers::handle_interview_message),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::llm_client::fake::FakeLlm;
    use crate::screens::resume::ResumeTab;
    use crate::screens::Screen;
    use crate::shell::effects::run_effect;

    const MILESTONES: &str = r#"[
        {"title": "Learn SQL", "type": "course", "description": "Joins.", "resources": ["https://example.com/sql"]}
    ]"#;

    fn test_state() -> (AppState, Arc<FakeLlm>) {
        let llm = Arc::new(FakeLlm::new());
        (AppState::new(llm.clone()), llm)
    }

    fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        match body {
            Some(body) => request.body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap()
    }

    async fn send(state: &AppState, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let response = build_router(state.clone())
            .oneshot(request(method, uri, body))
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn send_json(state: &AppState, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = send(state, method, uri, body).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn onboard(state: &AppState) {
        state.shell.lock().await.submit_profile().unwrap();
    }

    /// Sends a request and gives up on it after a short wait, as a client that disconnects would.
    async fn send_and_disconnect(state: &AppState, uri: &str, body: Value) {
        let pending = build_router(state.clone()).oneshot(request(Method::POST, uri, Some(body)));
        assert!(tokio::time::timeout(Duration::from_millis(50), pending)
            .await
            .is_err());
    }

    async fn let_tasks_run() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_health() {
        let (state, _) = test_state();
        let (status, body) = send_json(&state, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "pathway-api");
    }

    #[tokio::test]
    async fn test_starts_on_onboarding_with_sample_draft() {
        let (state, _) = test_state();
        let (status, body) = send_json(&state, Method::GET, "/api/v1/shell", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["screen"], "onboarding");
        assert!(body["profile"].is_null());

        let (_, draft) = send_json(&state, Method::GET, "/api/v1/onboarding", None).await;
        assert_eq!(draft["name"], "Aisha Sharma");
    }

    #[tokio::test]
    async fn test_navigation_requires_a_profile() {
        let (state, _) = test_state();
        let (status, body) = send_json(
            &state,
            Method::POST,
            "/api/v1/navigate",
            Some(json!({ "screen": "dashboard" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_onboarding_edits_the_draft() {
        let (state, _) = test_state();
        let (status, draft) = send_json(
            &state,
            Method::PUT,
            "/api/v1/onboarding",
            Some(json!({ "name": "Sam", "interests": "Art, , Music " })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(draft["name"], "Sam");
        assert_eq!(draft["interests"], json!(["Art", "Music"]));

        let (status, body) = send_json(
            &state,
            Method::POST,
            "/api/v1/onboarding/skills",
            Some(json!({ "name": "python" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, draft) = send_json(
            &state,
            Method::PATCH,
            "/api/v1/onboarding/skills/0",
            Some(json!({ "proficiency": 250 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(draft["skills"][0]["proficiency"], 100);

        let (status, _) = send_json(&state, Method::DELETE, "/api/v1/onboarding/skills/9", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_onboarding_is_closed_after_submit() {
        let (state, _) = test_state();
        let (status, body) = send_json(&state, Method::POST, "/api/v1/onboarding/submit", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["screen"], "dashboard");
        assert_eq!(body["readiness_score"], 23);

        let (status, body) = send_json(
            &state,
            Method::PUT,
            "/api/v1/onboarding",
            Some(json!({ "name": "Someone else" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_roadmap_nav_disabled_until_role_selected() {
        let (state, _) = test_state();
        onboard(&state).await;
        let (_, body) = send_json(&state, Method::GET, "/api/v1/shell", None).await;
        let roadmap = body["nav"]
            .as_array()
            .unwrap()
            .iter()
            .find(|item| item["screen"] == "roadmap")
            .unwrap();
        assert_eq!(roadmap["enabled"], false);
        assert_eq!(roadmap["label"], "My Roadmap");
    }

    #[tokio::test]
    async fn test_toggle_milestone() {
        let (state, llm) = test_state();
        onboard(&state).await;
        llm.push_json(MILESTONES);
        let effects = state.shell.lock().await.select_target_role("Data Analyst").unwrap();
        for effect in effects {
            run_effect(&state.shell, llm.as_ref(), effect).await;
        }

        let (status, body) = send_json(
            &state,
            Method::POST,
            "/api/v1/roadmap/milestones/0/toggle",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["milestones"][0]["status"], "done");
        assert_eq!(body["completed_milestones"], 1);

        let (status, body) = send_json(
            &state,
            Method::POST,
            "/api/v1/roadmap/milestones/5/toggle",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_mentor_reply_streams_as_sse() {
        let (state, llm) = test_state();
        onboard(&state).await;
        state.shell.lock().await.navigate(Screen::MentorChat).unwrap();
        llm.push_stream(&["Hel", "lo, ", "world"]);

        let (status, bytes) = send(
            &state,
            Method::POST,
            "/api/v1/mentor/messages",
            Some(json!({ "message": "Hi" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body = String::from_utf8(bytes).unwrap();
        assert!(body.contains("event: fragment"));
        assert!(body.contains("data: Hello, world"));
        assert!(body.contains("event: done"));

        let (_, mentor) = send_json(&state, Method::GET, "/api/v1/mentor", None).await;
        assert_eq!(mentor["messages"][1]["text"], "Hello, world");
        assert_eq!(mentor["busy"], false);
    }

    #[tokio::test]
    async fn test_empty_mentor_message_is_rejected() {
        let (state, _) = test_state();
        onboard(&state).await;
        state.shell.lock().await.navigate(Screen::MentorChat).unwrap();

        let (status, _) = send(
            &state,
            Method::POST,
            "/api/v1/mentor/messages",
            Some(json!({ "message": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_resume_feedback_is_rendered() {
        let (state, llm) = test_state();
        onboard(&state).await;
        state.shell.lock().await.navigate(Screen::Resume).unwrap();
        llm.push_text("### Strengths\n- **Clear** layout");

        let (status, body) = send_json(
            &state,
            Method::POST,
            "/api/v1/resume/feedback",
            Some(json!({ "resume_text": "Jane Doe\nEngineer" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let html = body["builder"]["feedback_html"].as_str().unwrap();
        assert!(html.contains("<h3>Strengths</h3>"));
        assert!(html.contains("<li><strong>Clear</strong> layout</li>"));
    }

    #[tokio::test]
    async fn test_interview_turn_completes_after_client_disconnects() {
        let (state, llm) = test_state();
        onboard(&state).await;
        let opening = {
            let mut shell = state.shell.lock().await;
            shell.navigate(Screen::Resume).unwrap();
            shell.select_resume_tab(ResumeTab::Interview).unwrap()
        };
        llm.push_turn("Tell me about yourself.");
        for effect in opening {
            run_effect(&state.shell, llm.as_ref(), effect).await;
        }

        llm.push_turn("Thanks. Why SQL?");
        let release = llm.hold_next_call();
        send_and_disconnect(
            &state,
            "/api/v1/resume/interview/messages",
            json!({ "message": "I like SQL." }),
        )
        .await;
        release.notify_one();
        let_tasks_run().await;

        let (_, resume) = send_json(&state, Method::GET, "/api/v1/resume", None).await;
        assert_eq!(resume["interview"]["busy"], false);
        assert_eq!(resume["interview"]["state"], "idle");
        assert_eq!(resume["interview"]["messages"][2]["text"], "Thanks. Why SQL?");

        llm.push_turn("Good answer.");
        let (status, resume) = send_json(
            &state,
            Method::POST,
            "/api/v1/resume/interview/messages",
            Some(json!({ "message": "It is everywhere." })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resume["interview"]["messages"][4]["text"], "Good answer.");
    }

    #[tokio::test]
    async fn test_feedback_completes_after_client_disconnects() {
        let (state, llm) = test_state();
        onboard(&state).await;
        state.shell.lock().await.navigate(Screen::Resume).unwrap();

        llm.push_text("### Overall Impression\nSolid.");
        let release = llm.hold_next_call();
        send_and_disconnect(
            &state,
            "/api/v1/resume/feedback",
            json!({ "resume_text": "Jane Doe\nEngineer" }),
        )
        .await;
        release.notify_one();
        let_tasks_run().await;

        let (_, resume) = send_json(&state, Method::GET, "/api/v1/resume", None).await;
        assert_eq!(resume["builder"]["loading"], false);
        assert_eq!(resume["builder"]["feedback"], "### Overall Impression\nSolid.");

        llm.push_text("### Overall Impression\nBetter.");
        let (status, _) = send_json(
            &state,
            Method::POST,
            "/api/v1/resume/feedback",
            Some(json!({ "resume_text": "Jane Doe\nSenior Engineer" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}
