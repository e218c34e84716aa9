//! Registration, login and bearer token tests

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::common::{assertions::assert_error, TestApp, PASSWORD};

mod test_register {
    use super::*;

    #[tokio::test]
    async fn test_register_returns_token_and_hides_key() {
        let app = TestApp::new();

        let (status, body) = app
            .call(
                Method::POST,
                "/api/v1/auth/register",
                None,
                Some(json!({
                    "email": "Taro@Example.com",
                    "password": PASSWORD,
                    "username": "taro",
                    "api_key": "AIza-personal",
                })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["email"], "taro@example.com");
        assert_eq!(body["user"]["username"], "taro");
        assert_eq!(body["user"]["has_api_key"], true);
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert!(!body.to_string().contains("AIza-personal"));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let app = TestApp::new();
        app.register("dup@example.com", None).await;

        let (status, body) = app
            .call(
                Method::POST,
                "/api/v1/auth/register",
                None,
                Some(json!({ "email": "DUP@example.com", "password": PASSWORD })),
            )
            .await;

        assert_error(status, &body, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "Email already exists");
        assert_eq!(app.users.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let app = TestApp::new();

        let (status, body) = app
            .call(
                Method::POST,
                "/api/v1/auth/register",
                None,
                Some(json!({ "email": "not-an-email", "password": PASSWORD })),
            )
            .await;

        assert_error(status, &body, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
        assert!(app.users.is_empty());
    }
}

mod test_login {
    use super::*;

    #[tokio::test]
    async fn test_login_token_opens_profile() {
        let app = TestApp::new();
        let (user_id, _) = app.register("login@example.com", None).await;

        let (status, body) = app
            .call(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "email": "login@example.com", "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["token"].as_str().unwrap().to_string();

        let (status, profile) = app
            .call(Method::GET, "/api/v1/users/profile", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(profile["user"]["id"], user_id.as_str());
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let app = TestApp::new();
        app.register("login@example.com", None).await;

        let (status, body) = app
            .call(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "email": "login@example.com", "password": "nope" })),
            )
            .await;

        assert_error(status, &body, StatusCode::UNAUTHORIZED, "AUTHENTICATION_ERROR");
        assert_eq!(body["error"]["message"], "Invalid email or password");
    }

    #[tokio::test]
    async fn test_logout_acknowledges() {
        let app = TestApp::new();
        let (_, token) = app.register("bye@example.com", None).await;

        let (status, body) = app
            .call(Method::DELETE, "/api/v1/auth/logout", Some(&token), None)
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }
}

mod test_bearer_tokens {
    use super::*;

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let app = TestApp::new();

        for (method, uri) in [
            (Method::GET, "/api/v1/users/profile"),
            (Method::GET, "/api/v1/conversations"),
            (Method::GET, "/api/v1/specialists"),
        ] {
            let (status, body) = app.call(method, uri, None, None).await;
            assert_error(status, &body, StatusCode::UNAUTHORIZED, "MISSING_AUTHORIZATION");
        }
    }

    #[tokio::test]
    async fn test_garbage_token_rejected() {
        let app = TestApp::new();

        let (status, body) = app
            .call(Method::GET, "/api/v1/users/profile", Some("not.a.jwt"), None)
            .await;

        assert_error(status, &body, StatusCode::UNAUTHORIZED, "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn test_token_from_other_instance_rejected() {
        let issuer = TestApp::new();
        let (_, token) = issuer.register("elsewhere@example.com", None).await;

        // Same secret, but the user only exists in the issuing app's store
        let app = TestApp::new();
        let (status, body) = app
            .call(Method::GET, "/api/v1/users/profile", Some(&token), None)
            .await;

        assert_error(status, &body, StatusCode::UNAUTHORIZED, "USER_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let app = TestApp::new();

        let (status, body) = app.call(Method::GET, "/health", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }
}
