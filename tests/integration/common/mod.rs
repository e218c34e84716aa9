//! Shared fixtures for the API integration tests
//!
//! Every `TestApp` owns its own in-memory stores, so tests never share state.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, Response, StatusCode},
    Router,
};
use serde_json::{json, Value};
use soudan_accounts::InMemoryUsers;
use soudan_app::{build_router, AppServices};
use soudan_auth::AuthConfig;
use soudan_conversations::InMemoryConversations;
use soudan_llm::mock::{MockLlmService, MockReply};
use tower::ServiceExt;

pub const JWT_SECRET: &str = "test_secret_key_for_testing_only";
pub const PASSWORD: &str = "password123";

pub struct TestApp {
    pub users: InMemoryUsers,
    pub conversations: InMemoryConversations,
    pub llm: MockLlmService,
    router: Router,
}

impl TestApp {
    /// App with an echoing provider and no server-wide key
    pub fn new() -> Self {
        Self::build(MockLlmService::new(), None)
    }

    pub fn with_reply(reply: MockReply) -> Self {
        Self::build(MockLlmService::with_reply(reply), None)
    }

    pub fn with_default_api_key(key: &str) -> Self {
        Self::build(MockLlmService::new(), Some(key.to_string()))
    }

    fn build(llm: MockLlmService, default_api_key: Option<String>) -> Self {
        let users = InMemoryUsers::new();
        let conversations = InMemoryConversations::new();

        let router = build_router(AppServices {
            users: Arc::new(users.clone()),
            identities: Arc::new(users.clone()),
            conversations: conversations.repositories(),
            llm: Arc::new(llm.clone()),
            auth_config: AuthConfig::new(JWT_SECRET).with_bcrypt_cost(4 /* bcrypt minimum cost */),
            default_api_key,
        });

        Self {
            users,
            conversations,
            llm,
            router,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Send a request and decode the JSON body
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.send(request(method, uri, token, body)).await;
        let status = response.status();
        (status, parse_body(response).await)
    }

    /// Register a user and return `(user_id, token)`
    pub async fn register(&self, email: &str, api_key: Option<&str>) -> (String, String) {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/v1/auth/register",
                None,
                Some(json!({
                    "email": email,
                    "password": PASSWORD,
                    "api_key": api_key,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

        (
            body["user"]["id"].as_str().unwrap().to_string(),
            body["token"].as_str().unwrap().to_string(),
        )
    }

    /// Create a conversation and return its id
    pub async fn create_conversation(&self, token: &str, specialist_type: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/v1/conversations",
                Some(token),
                Some(json!({ "specialist_type": specialist_type })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {body}");

        body["conversation"]["id"].as_str().unwrap().to_string()
    }

    pub async fn send_message(&self, token: &str, conversation_id: &str, content: &str) -> (StatusCode, Value) {
        self.call(
            Method::POST,
            &format!("/api/v1/conversations/{conversation_id}/messages"),
            Some(token),
            Some(json!({ "content": content })),
        )
        .await
    }
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }

    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn parse_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
}

/// Assertions on the shared error envelope
pub mod assertions {
    use super::*;

    pub fn assert_error(status: StatusCode, body: &Value, expected_status: StatusCode, code: &str) {
        assert_eq!(status, expected_status, "unexpected body: {body}");
        assert_eq!(body["error"]["code"], code, "unexpected body: {body}");
    }
}
