//! Conversation and specialist catalogue endpoint tests

use axum::http::{Method, StatusCode};
use serde_json::json;
use soudan_conversations::SpecialistType;
use soudan_llm::mock::MockReply;
use soudan_llm::LlmError;
use uuid::Uuid;

use crate::common::{assertions::assert_error, TestApp};

mod test_specialists {
    use super::*;

    #[tokio::test]
    async fn test_catalogue_lists_five_specialists() {
        let app = TestApp::new();
        let (_, token) = app.register("cat@example.com", None).await;

        let (status, body) = app
            .call(Method::GET, "/api/v1/specialists", Some(&token), None)
            .await;

        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body["specialists"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["psychologist", "career", "health", "legal", "finance"]);
        assert!(body["specialists"][0]["name"].as_str().is_some_and(|n| !n.is_empty()));
    }
}

mod test_create_conversation {
    use super::*;

    #[tokio::test]
    async fn test_create_returns_201_with_empty_history() {
        let app = TestApp::new();
        let (user_id, token) = app.register("create@example.com", None).await;

        let (status, body) = app
            .call(
                Method::POST,
                "/api/v1/conversations",
                Some(&token),
                Some(json!({ "specialist_type": "legal" })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED);
        let conversation = &body["conversation"];
        assert_eq!(conversation["specialist_type"], "legal");
        assert_eq!(conversation["user_id"], user_id.as_str());
        assert!(conversation["title"].is_null());
        assert_eq!(conversation["messages"], json!([]));
    }

    #[tokio::test]
    async fn test_explicit_title_kept() {
        let app = TestApp::new();
        let (_, token) = app.register("create@example.com", None).await;

        let (_, body) = app
            .call(
                Method::POST,
                "/api/v1/conversations",
                Some(&token),
                Some(json!({ "specialist_type": "career", "title": "転職の相談" })),
            )
            .await;

        assert_eq!(body["conversation"]["title"], "転職の相談");
    }

    #[tokio::test]
    async fn test_unknown_specialist_gets_default_persona() {
        let app = TestApp::with_reply(MockReply::Fail(LlmError::Timeout));
        let (_, token) = app.register("create@example.com", Some("AIza-user")).await;

        let (status, body) = app
            .call(
                Method::POST,
                "/api/v1/conversations",
                Some(&token),
                Some(json!({ "specialist_type": "astrologer" })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["conversation"]["specialist_type"], "general");
        let conversation = body["conversation"]["id"].as_str().unwrap();

        let (status, turn) = app.send_message(&token, conversation, "占ってください").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            turn["messages"][1]["content"],
            SpecialistType::General.fallback_message()
        );

        let request = &app.llm.recorded_requests()[0];
        assert_eq!(
            request.messages[1].content,
            SpecialistType::General.acknowledgment()
        );
    }

    #[tokio::test]
    async fn test_blank_specialist_rejected() {
        let app = TestApp::new();
        let (_, token) = app.register("create@example.com", None).await;

        for specialist_type in ["", "   "] {
            let (status, body) = app
                .call(
                    Method::POST,
                    "/api/v1/conversations",
                    Some(&token),
                    Some(json!({ "specialist_type": specialist_type })),
                )
                .await;

            assert_error(status, &body, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
        }
    }
}

mod test_list_and_get {
    use super::*;

    #[tokio::test]
    async fn test_list_shows_only_own_conversations_with_counts() {
        let app = TestApp::new();
        let (_, alice) = app.register("alice@example.com", None).await;
        let (_, bob) = app.register("bob@example.com", None).await;

        let first = app.create_conversation(&alice, "health").await;
        let second = app.create_conversation(&alice, "finance").await;
        app.create_conversation(&bob, "legal").await;
        app.send_message(&alice, &first, "眠れません").await;

        let (status, body) = app
            .call(Method::GET, "/api/v1/conversations", Some(&alice), None)
            .await;

        assert_eq!(status, StatusCode::OK);
        let list = body["conversations"].as_array().unwrap();
        assert_eq!(list.len(), 2);
        // Newest first
        assert_eq!(list[0]["id"], second.as_str());
        assert_eq!(list[0]["title"], "新しい会話");
        assert_eq!(list[0]["message_count"], 0);
        assert_eq!(list[1]["id"], first.as_str());
        assert_eq!(list[1]["title"], "眠れません");
        assert_eq!(list[1]["message_count"], 2);
    }

    #[tokio::test]
    async fn test_other_users_conversation_is_not_found() {
        let app = TestApp::new();
        let (_, alice) = app.register("alice@example.com", None).await;
        let (_, bob) = app.register("bob@example.com", None).await;
        let conversation = app.create_conversation(&alice, "health").await;

        let (status, body) = app
            .call(
                Method::GET,
                &format!("/api/v1/conversations/{conversation}"),
                Some(&bob),
                None,
            )
            .await;

        assert_error(status, &body, StatusCode::NOT_FOUND, "NOT_FOUND");
        assert_eq!(body["error"]["message"], "Conversation not found");
    }

    #[tokio::test]
    async fn test_unknown_conversation_is_not_found() {
        let app = TestApp::new();
        let (_, token) = app.register("alice@example.com", None).await;

        let (status, body) = app
            .call(
                Method::GET,
                &format!("/api/v1/conversations/{}", Uuid::new_v4()),
                Some(&token),
                None,
            )
            .await;

        assert_error(status, &body, StatusCode::NOT_FOUND, "NOT_FOUND");
    }
}
