use crate::helpers::{CHAT_ID, TestApp, spawn_app, spawn_app_with};
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, ResponseTemplate};

fn paragraphs(count: usize) -> String {
    (1..=count)
        .map(|i| format!("<p>Paragraph number {i:02} of this issue.</p>\n"))
        .collect()
}

#[tokio::test]
async fn short_newsletter_is_delivered_as_one_message() {
    let app = spawn_app().await;

    Mock::given(path(TestApp::method_path("sendMessage")))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.telegram_server)
        .await;

    let response = app
        .post_newsletter_webhook(&serde_json::json!({
            "html": "<h1>Weekly</h1><p>Hello <b>there</b>.</p>"
        }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["chunks_delivered"], 1);
    assert_eq!(body["lead_image_sent"], false);
    assert!(body["invocation_id"].is_string());

    let calls = app.telegram_calls().await;
    assert_eq!(calls[0].1["chat_id"], CHAT_ID);
    assert_eq!(calls[0].1["parse_mode"], "HTML");
    assert_eq!(calls[0].1["text"], "\n<b>Weekly</b>\n\nHello <b>there</b>.");
}

#[tokio::test]
async fn payload_under_data_field_is_accepted() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.telegram_server)
        .await;

    let response = app
        .post_newsletter_webhook(&serde_json::json!({ "data": "<p>Hi</p>" }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn lead_image_is_sent_before_the_text() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&app.telegram_server)
        .await;

    let html = concat!(
        "<img src=\"https://cdn.example.com/logo.png\" height=\"40\" width=\"120\">",
        "<img src=\"https://cdn.example.com/hero.jpg?w=600&amp;h=300\" width=\"600\">",
        "<p>Story of the week</p>",
    );
    let response = app
        .post_newsletter_webhook(&serde_json::json!({ "html": html }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["lead_image_sent"], true);

    let calls = app.telegram_calls().await;
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, "sendPhoto");
    assert_eq!(calls[0].1["photo"], "https://cdn.example.com/hero.jpg?w=600&h=300");
    assert_eq!(calls[1].0, "sendMessage");
    assert_eq!(calls[1].1["text"], "\nStory of the week");
}

#[tokio::test]
async fn long_newsletter_is_split_into_ordered_line_aligned_messages() {
    let app = spawn_app_with(|c| c.newsletter.message_limit = 100).await;

    Mock::given(path(TestApp::method_path("sendMessage")))
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.telegram_server)
        .await;

    let payload = serde_json::json!({ "html": paragraphs(12) });

    let preview: serde_json::Value = app
        .post_newsletter_preview(&payload)
        .await
        .json()
        .await
        .unwrap();
    let response = app.post_newsletter_webhook(&payload).await;
    assert_eq!(response.status().as_u16(), 200);

    let texts: Vec<String> = app
        .telegram_calls()
        .await
        .into_iter()
        .map(|(_, body)| body["text"].as_str().unwrap().to_string())
        .collect();

    assert!(texts.len() > 1);
    assert!(texts.iter().all(|text| text.chars().count() <= 100));
    assert_eq!(texts.join("\n"), preview["text"].as_str().unwrap());
    assert!(texts[0].contains("Paragraph number 01"));
    assert!(texts.last().unwrap().contains("Paragraph number 12"));
}

#[tokio::test]
async fn blank_newsletter_is_rejected_with_400() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.telegram_server)
        .await;

    let invalid_cases = vec![
        (serde_json::json!({ "html": "" }), "empty html"),
        (serde_json::json!({ "html": "  \n\t" }), "whitespace only html"),
        (serde_json::json!({}), "missing html"),
        (serde_json::json!({ "html": 42 }), "html is not a string"),
    ];

    for (invalid_body, desc) in invalid_cases {
        let response = app.post_newsletter_webhook(&invalid_body).await;
        assert_eq!(
            400,
            response.status().as_u16(),
            "Did not return 400 when payload was {desc}"
        );
    }
}

#[tokio::test]
async fn unsplittable_newsletter_is_rejected_before_anything_is_sent() {
    let app = spawn_app_with(|c| c.newsletter.message_limit = 40).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.telegram_server)
        .await;

    let html = format!("<p>{}</p>", "word".repeat(30));
    let response = app
        .post_newsletter_webhook(&serde_json::json!({ "html": html }))
        .await;

    assert_eq!(response.status().as_u16(), 422);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], 422);
}

#[tokio::test]
async fn failed_delivery_returns_502_after_every_chunk_was_attempted() {
    let app = spawn_app_with(|c| c.newsletter.message_limit = 100).await;

    Mock::given(path(TestApp::method_path("sendMessage")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.telegram_server)
        .await;

    let payload = serde_json::json!({ "html": paragraphs(12) });
    let preview: serde_json::Value = app
        .post_newsletter_preview(&payload)
        .await
        .json()
        .await
        .unwrap();
    let expected_attempts = preview["chunks"].as_array().unwrap().len();

    let response = app.post_newsletter_webhook(&payload).await;

    assert_eq!(response.status().as_u16(), 502);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], 502);
    assert!(body["message"].as_str().unwrap().starts_with("Message 1 of"));
    assert_eq!(app.telegram_calls().await.len(), expected_attempts);
}

#[tokio::test]
async fn bot_api_rejection_returns_502() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: chat not found",
        })))
        .expect(1)
        .mount(&app.telegram_server)
        .await;

    let response = app
        .post_newsletter_webhook(&serde_json::json!({ "html": "<p>Hi</p>" }))
        .await;

    assert_eq!(response.status().as_u16(), 502);
}
