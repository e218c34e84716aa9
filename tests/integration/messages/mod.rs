//! Message turn tests: user message, AI reply, title derivation, fallbacks

use axum::http::{Method, StatusCode};
use soudan_conversations::{MISSING_API_KEY_MESSAGE, TRUNCATED_MESSAGE};
use soudan_llm::mock::MockReply;
use soudan_llm::LlmError;

use crate::common::{assertions::assert_error, TestApp};

mod test_send_message {
    use super::*;

    #[tokio::test]
    async fn test_turn_returns_user_and_assistant_messages() {
        let app = TestApp::with_reply(MockReply::Text("お話を聞かせてください。".to_string()));
        let (_, token) = app.register("turn@example.com", Some("AIza-user")).await;
        let conversation = app.create_conversation(&token, "psychologist").await;

        let (status, body) = app
            .send_message(&token, &conversation, "  最近、眠れません。仕事が忙しくて  ")
            .await;

        assert_eq!(status, StatusCode::CREATED);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "最近、眠れません。仕事が忙しくて");
        assert_eq!(messages[1]["role"], "assistant");
        assert_eq!(messages[1]["content"], "お話を聞かせてください。");
        assert_eq!(messages[0]["conversation_id"], conversation.as_str());

        let requests = app.llm.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].api_key, "AIza-user");
    }

    #[tokio::test]
    async fn test_first_message_sets_title_once() {
        let app = TestApp::with_default_api_key("AIza-server");
        let (_, token) = app.register("title@example.com", None).await;
        let conversation = app.create_conversation(&token, "career").await;

        app.send_message(&token, &conversation, "転職を考えています。アドバイスをください")
            .await;
        app.send_message(&token, &conversation, "二通目のメッセージ").await;

        let (status, body) = app
            .call(
                Method::GET,
                &format!("/api/v1/conversations/{conversation}"),
                Some(&token),
                None,
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["conversation"]["title"], "転職を考えています");

        let history = body["conversation"]["messages"].as_array().unwrap();
        let roles: Vec<&str> = history.iter().map(|m| m["role"].as_str().unwrap()).collect();
        assert_eq!(roles, ["user", "assistant", "user", "assistant"]);
        assert_eq!(history[2]["content"], "二通目のメッセージ");

        // Server key used when the user has none
        assert!(app
            .llm
            .recorded_requests()
            .iter()
            .all(|r| r.api_key == "AIza-server"));
    }

    #[tokio::test]
    async fn test_history_sent_to_provider_in_order() {
        let app = TestApp::new();
        let (_, token) = app.register("order@example.com", Some("AIza-user")).await;
        let conversation = app.create_conversation(&token, "finance").await;

        app.send_message(&token, &conversation, "一つ目").await;
        app.send_message(&token, &conversation, "二つ目").await;

        let requests = app.llm.recorded_requests();
        let last = requests.last().unwrap();
        let contents: Vec<&str> = last.messages.iter().map(|m| m.content.as_str()).collect();
        // System prompt and acknowledgment precede the stored history
        assert_eq!(contents.len(), 5);
        assert_eq!(contents[2], "一つ目");
        assert_eq!(contents[3], "Mock response to: 一つ目");
        assert_eq!(contents[4], "二つ目");
    }
}

mod test_fallbacks {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_stores_notice_without_calling_provider() {
        let app = TestApp::new();
        let (_, token) = app.register("nokey@example.com", None).await;
        let conversation = app.create_conversation(&token, "health").await;

        let (status, body) = app.send_message(&token, &conversation, "頭が痛いです").await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["messages"][1]["content"], MISSING_API_KEY_MESSAGE);
        assert_eq!(app.llm.call_count(), 0);
        assert_eq!(app.conversations.all_messages().len(), 2);
    }

    #[tokio::test]
    async fn test_truncated_reply_uses_notice() {
        let app = TestApp::with_reply(MockReply::Truncated);
        let (_, token) = app.register("long@example.com", Some("AIza-user")).await;
        let conversation = app.create_conversation(&token, "legal").await;

        let (_, body) = app.send_message(&token, &conversation, "契約について").await;

        assert_eq!(body["messages"][1]["content"], TRUNCATED_MESSAGE);
    }

    #[tokio::test]
    async fn test_provider_failure_still_completes_turn() {
        let app = TestApp::with_reply(MockReply::Fail(LlmError::RateLimit));
        let (_, token) = app.register("busy@example.com", Some("AIza-user")).await;
        let conversation = app.create_conversation(&token, "psychologist").await;

        let (status, body) = app.send_message(&token, &conversation, "こんにちは").await;

        assert_eq!(status, StatusCode::CREATED);
        let reply = body["messages"][1]["content"].as_str().unwrap();
        assert!(!reply.is_empty());
        assert_eq!(body["messages"][1]["role"], "assistant");
    }
}

mod test_rejections {
    use super::*;

    #[tokio::test]
    async fn test_blank_content_rejected_without_side_effects() {
        let app = TestApp::new();
        let (_, token) = app.register("blank@example.com", Some("AIza-user")).await;
        let conversation = app.create_conversation(&token, "health").await;

        let (status, body) = app.send_message(&token, &conversation, "   ").await;

        assert_error(status, &body, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
        assert!(app.conversations.all_messages().is_empty());
        assert_eq!(app.llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_posting_to_foreign_conversation_is_not_found() {
        let app = TestApp::new();
        let (_, alice) = app.register("alice@example.com", Some("AIza-a")).await;
        let (_, mallory) = app.register("mallory@example.com", Some("AIza-m")).await;
        let conversation = app.create_conversation(&alice, "finance").await;

        let (status, body) = app.send_message(&mallory, &conversation, "見せて").await;

        assert_error(status, &body, StatusCode::NOT_FOUND, "NOT_FOUND");
        assert!(app.conversations.all_messages().is_empty());
    }

    #[tokio::test]
    async fn test_send_requires_token() {
        let app = TestApp::new();
        let (_, token) = app.register("anon@example.com", None).await;
        let conversation = app.create_conversation(&token, "finance").await;

        let (status, body) = app
            .call(
                Method::POST,
                &format!("/api/v1/conversations/{conversation}/messages"),
                None,
                Some(serde_json::json!({ "content": "hi" })),
            )
            .await;

        assert_error(status, &body, StatusCode::UNAUTHORIZED, "MISSING_AUTHORIZATION");
    }
}
