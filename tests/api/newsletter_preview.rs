use crate::helpers::spawn_app;
use wiremock::matchers::any;
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn preview_renders_without_sending_anything() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.telegram_server)
        .await;

    let html = concat!(
        "<img src=\"https://cdn.example.com/hero.png\" height=\"300\">",
        "<h2>News</h2>",
        "<ul><li>One &amp; only</li></ul>",
        "<table><tr><td>Footer</td></tr></table>",
    );
    let response = app
        .post_newsletter_preview(&serde_json::json!({ "html": html }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["lead_image"], "https://cdn.example.com/hero.png");
    assert_eq!(body["text"], "\n<b>News</b>\n\n* One &amp; only\nFooter");
    assert_eq!(body["chunks"], serde_json::json!([body["text"]]));
}

#[tokio::test]
async fn preview_without_images_has_null_lead_image() {
    let app = spawn_app().await;

    let response = app
        .post_newsletter_preview(&serde_json::json!({ "html": "<p>Plain</p>" }))
        .await;

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["lead_image"].is_null());
}

#[tokio::test]
async fn preview_rejects_blank_html() {
    let app = spawn_app().await;

    let response = app
        .post_newsletter_preview(&serde_json::json!({ "html": " " }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
}
