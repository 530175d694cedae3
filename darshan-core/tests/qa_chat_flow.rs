//! QA tests for the chatbot flow through a full session.
//!
//! All chat traffic goes through the scripted mock backend; no network.

use darshan_core::chat::{APOLOGY, PERSONA, PLACEHOLDER};
use darshan_core::testing::GuideHarness;
use darshan_core::{SendOutcome, TurnRole};
use gemini::Role;

#[tokio::test]
async fn test_round_trip_appends_turns_in_order() {
    let mut harness = GuideHarness::new();
    harness
        .expect_reply("Hampi was the Vijayanagara capital.")
        .expect_reply("Mostly in the 14th century.");

    assert_eq!(harness.send("Tell me about Hampi").await, SendOutcome::Replied);
    assert_eq!(harness.send("When was it built?").await, SendOutcome::Replied);

    let history = harness.session.chat_history();
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].role, TurnRole::User);
    assert_eq!(history[1].role, TurnRole::Assistant);
    assert!(history[3].text.contains("14th century"));
}

#[tokio::test]
async fn test_context_window_after_twelve_sends() {
    let mut harness = GuideHarness::new();

    for i in 0..12 {
        harness.expect_reply(format!("answer {i}"));
        harness.send(&format!("question {i}")).await;
    }

    let request = harness.backend.last_request().unwrap();
    assert_eq!(request.contents.len(), 5);

    // The 12th send puts 23 turns in history; the last-5 window runs
    // from "question 9" through the just-sent "question 11".
    assert_eq!(request.contents[4].text, "question 11");
    assert_eq!(request.contents[4].role, Role::User);
    assert_eq!(request.contents[3].text, "answer 10");
    assert_eq!(request.contents[3].role, Role::Model);
    assert_eq!(request.contents[0].text, "question 9");
    assert_eq!(request.contents[0].role, Role::User);
}

#[tokio::test]
async fn test_every_request_carries_the_persona() {
    let mut harness = GuideHarness::new();
    harness.expect_reply("ok").expect_reply("ok");

    harness.send("first").await;
    harness.send("second").await;

    for request in harness.backend.requests() {
        assert_eq!(request.system.as_deref(), Some(PERSONA));
    }
}

#[tokio::test]
async fn test_whitespace_input_makes_no_request() {
    let mut harness = GuideHarness::new();

    assert_eq!(harness.send("").await, SendOutcome::Ignored);
    assert_eq!(harness.send("   \t ").await, SendOutcome::Ignored);

    assert!(harness.session.chat_history().is_empty());
    assert!(harness.backend.requests().is_empty());
}

#[tokio::test]
async fn test_server_error_yields_one_apology() {
    let mut harness = GuideHarness::new();
    harness.backend.queue_status(500);

    assert_eq!(harness.send("Hello?").await, SendOutcome::Failed);

    let history = harness.session.chat_history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].text, APOLOGY);

    // The session keeps working after a failure.
    harness.expect_reply("Back again.");
    assert_eq!(harness.send("Still there?").await, SendOutcome::Replied);
    assert_eq!(harness.session.chat_history().len(), 4);
}

#[tokio::test]
async fn test_unrecognized_shape_yields_placeholder() {
    let mut harness = GuideHarness::new();
    harness
        .backend
        .queue_raw(serde_json::json!({"promptFeedback": {"blockReason": "SAFETY"}}));

    assert_eq!(harness.send("Hmm").await, SendOutcome::Replied);
    assert_eq!(harness.session.chat_history()[1].text, PLACEHOLDER);
}
