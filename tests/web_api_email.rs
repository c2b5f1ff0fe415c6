//! Web API Email Tests
//!
//! Integration tests for sending, listing, reading and deleting emails,
//! and for the live `emailReceived` fanout.

mod common;

use axum::http::StatusCode;
use serde_json::Value;

use common::{
    create_test_server, email_form, file_part, send_email, send_form, subjects, TestContext,
};
use mailroom::notify::MailEvent;

async fn get_json(ctx: &TestContext, path: &str) -> Value {
    let response = ctx.server.get(path).await;
    response.assert_status_ok();
    response.json::<Value>()
}

// ============================================================================
// Send Tests
// ============================================================================

#[tokio::test]
async fn test_send_lands_in_inbox_unread() {
    let ctx = create_test_server().await;

    let body = send_email(&ctx.server, "a@x.com", "b@x.com", "Hi", "Hello").await;
    assert!(body["message"].is_string());
    assert_eq!(body["email"]["subject"], "Hi");
    assert_eq!(body["email"]["isRead"], false);
    assert_eq!(body["email"]["labels"], serde_json::json!([]));
    assert!(body["email"]["attachment"].is_null());

    let inbox = get_json(&ctx, "/api/emails/inbox/b@x.com").await;
    let inbox = inbox.as_array().unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0]["subject"], "Hi");
    assert_eq!(inbox[0]["isRead"], false);
}

#[tokio::test]
async fn test_send_missing_fields() {
    let ctx = create_test_server().await;

    let form = email_form("a@x.com", "b@x.com", "", "Hello");
    let response = ctx.server.post("/api/emails/send").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let form = axum_test::multipart::MultipartForm::new().add_text("from", "a@x.com");
    let response = ctx.server.post("/api/emails/send").multipart(form).await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_send_invalid_labels() {
    let ctx = create_test_server().await;

    let form = email_form("a@x.com", "b@x.com", "Hi", "Hello").add_text("labels", "Snoozed");
    let response = ctx.server.post("/api/emails/send").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_send_normalizes_addresses() {
    let ctx = create_test_server().await;

    send_email(&ctx.server, " A@X.com ", "B@X.COM", "Hi", "Hello").await;

    let inbox = get_json(&ctx, "/api/emails/inbox/b@x.com").await;
    assert_eq!(subjects(&inbox), ["Hi"]);
    let inbox_upper = get_json(&ctx, "/api/emails/inbox/B@X.com").await;
    assert_eq!(subjects(&inbox_upper), ["Hi"]);
    assert_eq!(inbox[0]["from"], "a@x.com");
}

#[tokio::test]
async fn test_send_with_attachment() {
    let ctx = create_test_server().await;

    let form = email_form("a@x.com", "b@x.com", "Report", "See attached")
        .add_part("attachment", file_part("q3 report.pdf", b"%PDF-1.4"));
    let body = send_form(&ctx.server, form).await;

    let attachment = body["email"]["attachment"].as_str().unwrap();
    assert!(attachment.starts_with("/uploads/"));
    assert!(attachment.ends_with("-q3 report.pdf"));
    assert_eq!(std::fs::read(ctx.upload_path(attachment)).unwrap(), b"%PDF-1.4");
}

#[tokio::test]
async fn test_send_attachment_too_large() {
    let ctx = create_test_server().await;

    let too_big = vec![0u8; ctx.state.storage.max_bytes() + 1];
    let form = email_form("a@x.com", "b@x.com", "Big", "x").add_part("attachment", file_part("big.bin", &too_big));
    let response = ctx.server.post("/api/emails/send").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let inbox = get_json(&ctx, "/api/emails/inbox/b@x.com").await;
    assert!(subjects(&inbox).is_empty());
}

// ============================================================================
// Folder View Tests
// ============================================================================

#[tokio::test]
async fn test_inbox_newest_first() {
    let ctx = create_test_server().await;

    for subject in ["t1", "t2", "t3"] {
        send_email(&ctx.server, "a@x.com", "b@x.com", subject, "x").await;
    }

    let inbox = get_json(&ctx, "/api/emails/inbox/b@x.com").await;
    assert_eq!(subjects(&inbox), ["t3", "t2", "t1"]);
}

#[tokio::test]
async fn test_inbox_and_sent_are_separate() {
    let ctx = create_test_server().await;

    send_email(&ctx.server, "a@x.com", "b@x.com", "to b", "x").await;
    send_email(&ctx.server, "b@x.com", "a@x.com", "to a", "x").await;

    let inbox_b = get_json(&ctx, "/api/emails/inbox/b@x.com").await;
    assert_eq!(subjects(&inbox_b), ["to b"]);
    let sent_b = get_json(&ctx, "/api/emails/sent/b@x.com").await;
    assert_eq!(subjects(&sent_b), ["to a"]);
    let inbox_c = get_json(&ctx, "/api/emails/inbox/c@x.com").await;
    assert!(subjects(&inbox_c).is_empty());
}

#[tokio::test]
async fn test_snoozed_view() {
    let ctx = create_test_server().await;

    let snoozed = email_form("a@x.com", "b@x.com", "later", "x").add_text("labels", r#"["Work","Snoozed"]"#);
    send_form(&ctx.server, snoozed).await;
    let lower = email_form("a@x.com", "b@x.com", "lower", "x").add_text("labels", r#"["snoozed"]"#);
    send_form(&ctx.server, lower).await;
    send_email(&ctx.server, "a@x.com", "b@x.com", "plain", "x").await;

    let view = get_json(&ctx, "/api/emails/snoozed/b@x.com").await;
    assert_eq!(subjects(&view), ["later"]);
    assert_eq!(view[0]["labels"], serde_json::json!(["Work", "Snoozed"]));
}

// ============================================================================
// Get / Read / Delete Tests
// ============================================================================

#[tokio::test]
async fn test_get_email() {
    let ctx = create_test_server().await;
    let sent = send_email(&ctx.server, "a@x.com", "b@x.com", "Hi", "Hello").await;
    let id = sent["email"]["id"].as_i64().unwrap();

    let email = get_json(&ctx, &format!("/api/emails/{id}")).await;
    assert_eq!(email, sent["email"]);
}

#[tokio::test]
async fn test_get_unknown_email() {
    let ctx = create_test_server().await;

    let response = ctx.server.get("/api/emails/999").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "NOT_FOUND");

    ctx.server
        .get("/api/emails/not-a-number")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mark_read_idempotent() {
    let ctx = create_test_server().await;
    let sent = send_email(&ctx.server, "a@x.com", "b@x.com", "Hi", "Hello").await;
    let id = sent["email"]["id"].as_i64().unwrap();

    for _ in 0..2 {
        let response = ctx.server.put(&format!("/api/emails/read/{id}")).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["isRead"], true);
        assert_eq!(body["id"], id);
    }

    let email = get_json(&ctx, &format!("/api/emails/{id}")).await;
    assert_eq!(email["isRead"], true);

    ctx.server
        .put("/api/emails/read/999")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_email() {
    let ctx = create_test_server().await;
    let sent = send_email(&ctx.server, "a@x.com", "b@x.com", "Hi", "Hello").await;
    let id = sent["email"]["id"].as_i64().unwrap();

    let response = ctx.server.delete(&format!("/api/emails/{id}")).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["message"].is_string());

    ctx.server
        .get(&format!("/api/emails/{id}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    // Deleting again is not an error.
    ctx.server
        .delete(&format!("/api/emails/{id}"))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_delete_removes_attachment() {
    let ctx = create_test_server().await;

    let form = email_form("a@x.com", "b@x.com", "Report", "x")
        .add_part("attachment", file_part("report.txt", b"numbers"));
    let sent = send_form(&ctx.server, form).await;
    let id = sent["email"]["id"].as_i64().unwrap();
    let path = ctx.upload_path(sent["email"]["attachment"].as_str().unwrap());
    assert!(path.exists());

    ctx.server
        .delete(&format!("/api/emails/{id}"))
        .await
        .assert_status_ok();
    assert!(!path.exists());
}

// ============================================================================
// Live Fanout Tests
// ============================================================================

#[tokio::test]
async fn test_send_publishes_email_received() {
    let ctx = create_test_server().await;
    let mut first = ctx.state.hub.subscribe();
    let mut second = ctx.state.hub.subscribe();

    let sent = send_email(&ctx.server, "a@x.com", "b@x.com", "Hi", "Hello").await;

    for rx in [&mut first, &mut second] {
        let event = rx.recv().await.unwrap();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "emailReceived");
        assert_eq!(json["data"], sent["email"]);

        let MailEvent::EmailReceived(email) = event;
        assert_eq!(email.subject, "Hi");
    }
}

#[tokio::test]
async fn test_failed_send_publishes_nothing() {
    let ctx = create_test_server().await;
    let mut rx = ctx.state.hub.subscribe();

    let form = email_form("a@x.com", "b@x.com", "Hi", "");
    ctx.server
        .post("/api/emails/send")
        .multipart(form)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_send_without_listeners_succeeds() {
    let ctx = create_test_server().await;
    assert_eq!(ctx.state.hub.subscriber_count(), 0);

    send_email(&ctx.server, "a@x.com", "b@x.com", "Hi", "Hello").await;
}
