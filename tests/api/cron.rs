use crate::helpers::{CRON_SECRET, mock_search_response, spawn_app, spawn_app_with_database};
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn cron_rejects_requests_without_valid_credentials() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.news_server)
        .await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let wrong_secret = format!("Bearer {}-nope", CRON_SECRET);
    let test_cases = vec![
        (None, "a missing header"),
        (Some(wrong_secret.as_str()), "a wrong secret"),
        (Some(CRON_SECRET), "a missing scheme"),
    ];

    for (authorization, description) in test_cases {
        // Act
        let response = app.get_cron(authorization).await;

        // Assert
        assert_eq!(
            401,
            response.status().as_u16(),
            "The API did not fail with 401 Unauthorized for {}.",
            description
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body, serde_json::json!({"error": "Unauthorized"}));
    }
}

#[tokio::test]
async fn cron_reports_when_there_are_no_subscribers() {
    // Arrange
    let app = spawn_app_with_database().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.news_server)
        .await;

    // Act
    let response = app.trigger_dispatch().await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({"success": true, "message": "No subscribers found"})
    );
}

#[tokio::test]
async fn cron_reports_when_there_is_no_news() {
    // Arrange
    let app = spawn_app_with_database().await;
    app.insert_subscribers(&["a@example.com".to_string()]).await;

    Mock::given(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_search_response(0)))
        .expect(1)
        .mount(&app.news_server)
        .await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&app.email_server)
        .await;

    // Act
    let response = app.trigger_dispatch().await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({"success": true, "message": "No news found for today"})
    );
}

#[tokio::test]
async fn cron_sends_the_newsletter_to_every_subscriber() {
    // Arrange
    let app = spawn_app_with_database().await;
    let emails: Vec<String> = (0..12).map(|i| format!("fan{}@example.com", i)).collect();
    app.insert_subscribers(&emails).await;

    Mock::given(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_search_response(3)))
        .expect(1)
        .mount(&app.news_server)
        .await;
    Mock::given(path("/v3/mail/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .expect(12)
        .mount(&app.email_server)
        .await;

    // Act
    let response = app.trigger_dispatch().await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Newsletter sent to 12 subscribers, 0 failed");
    assert_eq!(body["sent"], 12);
    assert_eq!(body["failed"], 0);
    assert_eq!(body["results"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn cron_counts_failed_deliveries_without_aborting() {
    // Arrange
    let app = spawn_app_with_database().await;
    let emails: Vec<String> = (0..3).map(|i| format!("fan{}@example.com", i)).collect();
    app.insert_subscribers(&emails).await;

    Mock::given(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_search_response(1)))
        .mount(&app.news_server)
        .await;
    Mock::given(path("/v3/mail/send"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&app.email_server)
        .await;

    // Act
    let response = app.trigger_dispatch().await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["sent"], 0);
    assert_eq!(body["failed"], 3);
    assert_eq!(body["results"][0]["status"], "failed");
}

#[tokio::test]
async fn cron_returns_a_500_when_the_news_service_fails() {
    // Arrange
    let app = spawn_app_with_database().await;
    app.insert_subscribers(&["a@example.com".to_string()]).await;

    Mock::given(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.news_server)
        .await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&app.email_server)
        .await;

    // Act
    let response = app.trigger_dispatch().await;

    // Assert
    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn cron_returns_a_500_when_subscribers_cannot_be_loaded() {
    // Arrange
    let app = spawn_app_with_database().await;
    app.insert_subscribers(&["a@example.com".to_string()]).await;

    // Sabotage the database
    sqlx::query("ALTER TABLE subscribers DROP COLUMN email;")
        .execute(&app.db_pool)
        .await
        .unwrap();

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.news_server)
        .await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&app.email_server)
        .await;

    // Act
    let response = app.trigger_dispatch().await;

    // Assert
    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Newsletter dispatch failed");
}
