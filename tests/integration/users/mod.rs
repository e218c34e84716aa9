//! Profile and password endpoint tests

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::common::{assertions::assert_error, TestApp, PASSWORD};

mod test_profile {
    use super::*;

    #[tokio::test]
    async fn test_update_profile_sets_and_clears_key() {
        let app = TestApp::new();
        let (_, token) = app.register("profile@example.com", None).await;

        let (status, body) = app
            .call(
                Method::PUT,
                "/api/v1/users/profile",
                Some(&token),
                Some(json!({ "username": "  hanako ", "api_key": "AIza-new" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["username"], "hanako");
        assert_eq!(body["user"]["has_api_key"], true);

        let (status, body) = app
            .call(
                Method::PUT,
                "/api/v1/users/profile",
                Some(&token),
                Some(json!({ "api_key": null })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["username"], "hanako");
        assert_eq!(body["user"]["has_api_key"], false);
    }

    #[tokio::test]
    async fn test_overlong_username_rejected() {
        let app = TestApp::new();
        let (_, token) = app.register("profile@example.com", None).await;

        let (status, body) = app
            .call(
                Method::PUT,
                "/api/v1/users/profile",
                Some(&token),
                Some(json!({ "username": "x".repeat(101) })),
            )
            .await;

        assert_error(status, &body, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
    }
}

mod test_password {
    use super::*;

    fn change(current: &str, new: &str, confirmation: &str) -> serde_json::Value {
        json!({
            "current_password": current,
            "new_password": new,
            "new_password_confirmation": confirmation,
        })
    }

    #[tokio::test]
    async fn test_password_change_then_login_with_new_password() {
        let app = TestApp::new();
        let (_, token) = app.register("pw@example.com", None).await;

        let (status, body) = app
            .call(
                Method::PUT,
                "/api/v1/users/password",
                Some(&token),
                Some(change(PASSWORD, "new-secret", "new-secret")),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (old_status, _) = app
            .call(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "email": "pw@example.com", "password": PASSWORD })),
            )
            .await;
        assert_eq!(old_status, StatusCode::UNAUTHORIZED);

        let (new_status, _) = app
            .call(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "email": "pw@example.com", "password": "new-secret" })),
            )
            .await;
        assert_eq!(new_status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_wrong_current_password_rejected() {
        let app = TestApp::new();
        let (_, token) = app.register("pw@example.com", None).await;

        let (status, body) = app
            .call(
                Method::PUT,
                "/api/v1/users/password",
                Some(&token),
                Some(change("wrong", "new-secret", "new-secret")),
            )
            .await;

        assert_error(status, &body, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "現在のパスワードが正しくありません");
    }

    #[tokio::test]
    async fn test_mismatched_confirmation_rejected() {
        let app = TestApp::new();
        let (_, token) = app.register("pw@example.com", None).await;

        let (status, body) = app
            .call(
                Method::PUT,
                "/api/v1/users/password",
                Some(&token),
                Some(change(PASSWORD, "new-secret", "other-secret")),
            )
            .await;

        assert_error(status, &body, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
        assert_eq!(
            body["error"]["message"],
            "新しいパスワードと確認用パスワードが一致しません"
        );
    }
}
