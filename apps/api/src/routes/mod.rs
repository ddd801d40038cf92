pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions API
        .route("/api/v1/sessions", post(handlers::handle_start_session))
        .route(
            "/api/v1/sessions/restore",
            post(handlers::handle_restore_session),
        )
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/messages",
            post(handlers::handle_submit_message),
        )
        .route(
            "/api/v1/sessions/:id/snapshot",
            get(handlers::handle_get_snapshot),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::session::registry::SessionRegistry;
    use crate::testing::{
        coordinator_with, sample_profile, ScriptedGenerator, StaticProfileSource, ACME_JOB,
    };

    fn app(source: StaticProfileSource, label: &str) -> (Router, Arc<SessionRegistry>) {
        let sessions = Arc::new(SessionRegistry::new());
        let generator = Arc::new(ScriptedGenerator::classifying(label));
        let state = AppState {
            sessions: sessions.clone(),
            coordinator: Arc::new(coordinator_with(generator, Duration::from_secs(90))),
            profile_source: Arc::new(source),
        };
        (build_router(state), sessions)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn start_body() -> Value {
        json!({
            "profile_url": "https://www.linkedin.com/in/jane-doe/",
            "job_description": ACME_JOB
        })
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app(StaticProfileSource::Private, "fallback");
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_private_profile_creates_no_session() {
        let (app, sessions) = app(StaticProfileSource::Private, "fallback");
        let (status, body) =
            send(&app, Method::POST, "/api/v1/sessions", Some(start_body())).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "ACQUISITION_FAILED");
        assert!(sessions.is_empty());
    }

    #[tokio::test]
    async fn test_start_session_then_ask_about_job_fit() {
        let (app, sessions) = app(StaticProfileSource::Found(sample_profile()), "job_fit");

        let (status, started) =
            send(&app, Method::POST, "/api/v1/sessions", Some(start_body())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(started["welcome"].as_str().unwrap().contains("Jane Doe"));
        assert_eq!(sessions.len(), 1);

        let id = started["session_id"].as_str().unwrap().to_string();
        let (status, reply) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/messages"),
            Some(json!({"message": "Am I a good fit for the Senior Backend Engineer role at Acme?"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply["sequence"], 1);
        assert_eq!(reply["intent"], "job_fit");
        assert_eq!(reply["responder"], "job_fit");
        assert_eq!(reply["completion"], "answered");
        assert_eq!(reply["payload"]["kind"], "job_fit");
        let score = reply["payload"]["score"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&score));

        let (_, detail) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(detail["status"]["state"], "idle");
        assert_eq!(detail["transcript"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_message_is_bad_request() {
        let (app, _) = app(StaticProfileSource::Found(sample_profile()), "fallback");
        let (_, started) = send(&app, Method::POST, "/api/v1/sessions", Some(start_body())).await;
        let id = started["session_id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/messages"),
            Some(json!({"message": "  "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let (app, _) = app(StaticProfileSource::Private, "fallback");
        let (status, body) = send(
            &app,
            Method::GET,
            "/api/v1/sessions/00000000-0000-0000-0000-000000000000",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_snapshot_restore_and_delete() {
        let (app, sessions) = app(StaticProfileSource::Found(sample_profile()), "career_guidance");
        let (_, started) = send(&app, Method::POST, "/api/v1/sessions", Some(start_body())).await;
        let id = started["session_id"].as_str().unwrap().to_string();
        send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/messages"),
            Some(json!({"message": "What skills should I develop?"})),
        )
        .await;

        let (status, snapshot) =
            send(&app, Method::GET, &format!("/api/v1/sessions/{id}/snapshot"), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, restored) =
            send(&app, Method::POST, "/api/v1/sessions/restore", Some(snapshot)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(restored["turns"], 1);
        assert_eq!(restored["restored_from"].as_str().unwrap(), id);
        assert_eq!(sessions.len(), 2);

        let new_id = restored["session_id"].as_str().unwrap().to_string();
        let (_, reply) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{new_id}/messages"),
            Some(json!({"message": "And after that?"})),
        )
        .await;
        assert_eq!(reply["sequence"], 2);

        let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(sessions.len(), 1);
    }
}
