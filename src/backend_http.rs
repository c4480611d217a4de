use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Method};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use url::Url;

use crate::{
    calendar_options::{self, BackendSettings, CalendarOption},
    http_response::ResponseBody,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum BackendError {
    #[error("{0}")]
    Transport(String),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("Backend returned non-JSON response")]
    NonJson,
}

impl From<reqwest::Error> for BackendError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.to_string())
    }
}

/// Body of `POST /schedule`: `{"event": …}` or `{"text": …}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ScheduleRequest {
    Event(Value),
    Text(String),
}

#[async_trait]
pub(crate) trait BackendApi: Send + Sync {
    async fn parse(&self, text: &str) -> Result<Value, BackendError>;
    async fn schedule(&self, request: &ScheduleRequest) -> Result<(), BackendError>;
    async fn settings(&self) -> Result<BackendSettings, BackendError>;
    async fn calendars(&self) -> Result<Vec<CalendarOption>, BackendError>;
    async fn set_calendar(&self, calendar_id: &str) -> Result<(), BackendError>;
}

#[derive(Debug, Clone)]
pub(crate) struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    pub(crate) fn new(base_url: Url) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder().no_proxy().build()?;
        Ok(Self { http, base_url })
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path)
            .map_err(|error| BackendError::Transport(format!("Invalid backend path {path}: {error}")))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        failure_label: &str,
    ) -> Result<ResponseBody, BackendError> {
        let mut request = self.http.request(method, self.endpoint(path)?);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let text = response.text().await?;
        let body = ResponseBody::read(content_type.as_deref(), text);

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: body.failure_message(failure_label, status.as_u16()),
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl BackendApi for BackendClient {
    async fn parse(&self, text: &str) -> Result<Value, BackendError> {
        let body = self
            .send(Method::POST, "parse", Some(json!({ "text": text })), "Backend error")
            .await?;
        body.data.ok_or(BackendError::NonJson)
    }

    async fn schedule(&self, request: &ScheduleRequest) -> Result<(), BackendError> {
        let payload = serde_json::to_value(request)
            .map_err(|error| BackendError::Transport(error.to_string()))?;
        self.send(Method::POST, "schedule", Some(payload), "Schedule failed")
            .await
            .map(|_| ())
    }

    async fn settings(&self) -> Result<BackendSettings, BackendError> {
        let body = self
            .send(Method::GET, "settings", None, "Settings error")
            .await?;
        Ok(BackendSettings::from_data(body.data.as_ref()))
    }

    async fn calendars(&self) -> Result<Vec<CalendarOption>, BackendError> {
        let body = self
            .send(Method::GET, "calendars", None, "Calendars error")
            .await?;
        Ok(calendar_options::calendars_from_data(body.data.as_ref()))
    }

    async fn set_calendar(&self, calendar_id: &str) -> Result<(), BackendError> {
        self.send(
            Method::POST,
            "settings/calendar",
            Some(json!({ "calendarId": calendar_id })),
            "Calendar update failed",
        )
        .await
        .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::State,
        http::{header, StatusCode},
        response::IntoResponse,
        routing::{get, post},
        Json, Router,
    };

    use super::*;

    #[derive(Clone, Default)]
    struct Recorded {
        bodies: Arc<Mutex<Vec<(String, Value)>>>,
    }

    impl Recorded {
        fn push(&self, path: &str, body: Value) {
            if let Ok(mut bodies) = self.bodies.lock() {
                bodies.push((path.to_string(), body));
            }
        }

        fn take(&self) -> Vec<(String, Value)> {
            self.bodies
                .lock()
                .map(|mut bodies| std::mem::take(&mut *bodies))
                .unwrap_or_default()
        }
    }

    async fn parse_handler(State(recorded): State<Recorded>, Json(body): Json<Value>) -> impl IntoResponse {
        recorded.push("/parse", body.clone());
        match body.get("text").and_then(Value::as_str) {
            Some("html please") => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html")],
                "<p>nope</p>".to_string(),
            )
                .into_response(),
            Some("") => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Missing 'text' field in request body" })),
            )
                .into_response(),
            Some(text) => Json(json!({ "title": text, "start": "2026-10-15T13:00:00" })).into_response(),
            None => StatusCode::BAD_REQUEST.into_response(),
        }
    }

    async fn schedule_handler(
        State(recorded): State<Recorded>,
        Json(body): Json<Value>,
    ) -> impl IntoResponse {
        recorded.push("/schedule", body);
        Json(json!({ "enqueued": true, "task_id": "t-1" }))
    }

    async fn settings_handler() -> impl IntoResponse {
        Json(json!({ "selectedCalendarId": "work@example.com" }))
    }

    async fn calendars_handler() -> impl IntoResponse {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load calendars: token expired",
        )
    }

    async fn set_calendar_handler(
        State(recorded): State<Recorded>,
        Json(body): Json<Value>,
    ) -> impl IntoResponse {
        recorded.push("/settings/calendar", body);
        StatusCode::NO_CONTENT
    }

    async fn fake_backend() -> (BackendClient, Recorded) {
        let recorded = Recorded::default();
        let app = Router::new()
            .route("/parse", post(parse_handler))
            .route("/schedule", post(schedule_handler))
            .route("/settings", get(settings_handler))
            .route("/calendars", get(calendars_handler))
            .route("/settings/calendar", post(set_calendar_handler))
            .with_state(recorded.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake backend");
        let port = listener.local_addr().expect("local addr").port();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let base_url = crate::backend_config::backend_base_url(port).expect("base url");
        (BackendClient::new(base_url).expect("client"), recorded)
    }

    #[tokio::test]
    async fn parse_returns_backend_json() {
        let (client, recorded) = fake_backend().await;

        let preview = client.parse("lunch tomorrow 1pm").await.expect("parse");
        assert_eq!(preview["title"], "lunch tomorrow 1pm");
        assert_eq!(
            recorded.take(),
            vec![("/parse".to_string(), json!({ "text": "lunch tomorrow 1pm" }))]
        );
    }

    #[tokio::test]
    async fn parse_surfaces_error_field_and_non_json_bodies() {
        let (client, _recorded) = fake_backend().await;

        assert_eq!(
            client.parse("").await,
            Err(BackendError::Status {
                status: 400,
                message: "Missing 'text' field in request body".to_string()
            })
        );
        assert_eq!(client.parse("html please").await, Err(BackendError::NonJson));
    }

    #[tokio::test]
    async fn schedule_posts_event_or_text_payload() {
        let (client, recorded) = fake_backend().await;

        client
            .schedule(&ScheduleRequest::Event(json!({ "title": "Lunch" })))
            .await
            .expect("schedule event");
        client
            .schedule(&ScheduleRequest::Text("dentist friday".to_string()))
            .await
            .expect("schedule text");

        assert_eq!(
            recorded.take(),
            vec![
                ("/schedule".to_string(), json!({ "event": { "title": "Lunch" } })),
                ("/schedule".to_string(), json!({ "text": "dentist friday" })),
            ]
        );
    }

    #[tokio::test]
    async fn settings_and_calendar_update_round_trip() {
        let (client, recorded) = fake_backend().await;

        let settings = client.settings().await.expect("settings");
        assert_eq!(settings.selected_calendar_id.as_deref(), Some("work@example.com"));

        client.set_calendar("home@example.com").await.expect("set calendar");
        assert_eq!(
            recorded.take(),
            vec![(
                "/settings/calendar".to_string(),
                json!({ "calendarId": "home@example.com" })
            )]
        );
    }

    #[tokio::test]
    async fn calendars_failure_uses_plain_text_body() {
        let (client, _recorded) = fake_backend().await;

        let error = client.calendars().await.expect_err("calendars should fail");
        assert_eq!(error.to_string(), "Failed to load calendars: token expired");
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        drop(listener);
        let client = BackendClient::new(crate::backend_config::backend_base_url(port).expect("url"))
            .expect("client");

        assert!(matches!(
            client.settings().await,
            Err(BackendError::Transport(_))
        ));
    }
}
