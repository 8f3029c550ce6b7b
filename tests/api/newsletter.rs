use crate::helpers::{spawn_app, spawn_app_with_database};
use claims::assert_ok;
use footstats_api::domain::{NewSubscriber, SubscriberEmail};
use footstats_api::models::StoreSubscriberError;
use footstats_api::utils::ResponseMessage;
use wiremock::matchers::{any, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn subscribe_returns_a_200_for_a_valid_email() {
    // Arrange
    let app = spawn_app_with_database().await;

    Mock::given(path("/v3/mail/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&app.email_server)
        .await;

    // Act
    let response = app
        .post_newsletter(&serde_json::json!({"email": "ursula_le_guin@gmail.com"}))
        .await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: ResponseMessage = response.json().await.unwrap();
    assert_eq!(body.message, "Successfully subscribed");
}

#[tokio::test]
async fn subscribe_persists_the_new_subscriber() {
    // Arrange
    let app = spawn_app_with_database().await;

    Mock::given(path("/v3/mail/send"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&app.email_server)
        .await;

    // Act
    app.post_newsletter(&serde_json::json!({"email": "  ursula_le_guin@gmail.com "}))
        .await;

    // Assert
    assert_eq!(app.subscriber_count("ursula_le_guin@gmail.com").await, 1);
}

#[tokio::test]
async fn subscribe_sends_a_welcome_email() {
    // Arrange
    let app = spawn_app_with_database().await;

    Mock::given(path("/v3/mail/send"))
        .and(method("POST"))
        .and(header("Authorization", "Bearer email-token"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&app.email_server)
        .await;

    // Act
    app.post_newsletter(&serde_json::json!({"email": "ursula_le_guin@gmail.com"}))
        .await;

    // Assert
    let email_request = &app.email_server.received_requests().await.unwrap()[0];
    let body: serde_json::Value = serde_json::from_slice(&email_request.body).unwrap();
    assert_eq!(
        body["personalizations"][0]["to"][0]["email"],
        "ursula_le_guin@gmail.com"
    );
    assert_eq!(body["content"][0]["type"], "text/plain");
    assert_eq!(body["content"][1]["type"], "text/html");
}

#[tokio::test]
async fn subscribe_returns_a_400_for_invalid_emails() {
    // Arrange
    let app = spawn_app_with_database().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let test_cases = vec![
        (serde_json::json!({"email": "definitely-not-an-email"}), "missing @"),
        (serde_json::json!({"email": ""}), "empty email"),
        (serde_json::json!({}), "missing email"),
    ];

    for (invalid_body, description) in test_cases {
        // Act
        let response = app.post_newsletter(&invalid_body).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            description
        );
        let body: ResponseMessage = response.json().await.unwrap();
        assert_eq!(body.message, "Invalid email address");
    }

    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM subscribers")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(row.0, 0);
}

#[tokio::test]
async fn subscribe_rejects_an_email_that_is_already_subscribed() {
    // Arrange
    let app = spawn_app_with_database().await;
    app.insert_subscribers(&["ursula_le_guin@gmail.com".to_string()])
        .await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&app.email_server)
        .await;

    // Act
    let response = app
        .post_newsletter(&serde_json::json!({"email": "ursula_le_guin@gmail.com"}))
        .await;

    // Assert
    assert_eq!(400, response.status().as_u16());
    let body: ResponseMessage = response.json().await.unwrap();
    assert_eq!(body.message, "Email already subscribed");
    assert_eq!(app.subscriber_count("ursula_le_guin@gmail.com").await, 1);
}

#[tokio::test]
async fn subscribe_returns_a_500_if_the_welcome_email_cannot_be_sent() {
    // Arrange
    let app = spawn_app_with_database().await;

    Mock::given(path("/v3/mail/send"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.email_server)
        .await;

    // Act
    let response = app
        .post_newsletter(&serde_json::json!({"email": "ursula_le_guin@gmail.com"}))
        .await;

    // Assert
    assert_eq!(500, response.status().as_u16());
    let body: ResponseMessage = response.json().await.unwrap();
    assert_eq!(body.message, "Internal server error");
}

#[tokio::test]
async fn subscribe_fails_if_there_is_a_fatal_database_error() {
    // Arrange
    let app = spawn_app_with_database().await;

    // Sabotage the database
    sqlx::query("ALTER TABLE subscribers DROP COLUMN email;")
        .execute(&app.db_pool)
        .await
        .unwrap();

    // Act
    let response = app
        .post_newsletter(&serde_json::json!({"email": "ursula_le_guin@gmail.com"}))
        .await;

    // Assert
    assert_eq!(500, response.status().as_u16());
}

#[tokio::test]
async fn subscribe_returns_a_json_400_for_unreadable_bodies() {
    // Arrange
    let app = spawn_app().await;

    let test_cases = vec![
        (r#"{"email": 5}"#, "a numeric email"),
        (r#"["ursula_le_guin@gmail.com"]"#, "an array body"),
        ("not json at all", "a malformed body"),
    ];

    for (invalid_body, description) in test_cases {
        // Act
        let response = app
            .api_client
            .post(&format!("{}/api/newsletter", &app.address))
            .header("Content-Type", "application/json")
            .body(invalid_body)
            .send()
            .await
            .expect("Failed to execute request.");

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            description
        );
        let body: ResponseMessage = response.json().await.unwrap();
        assert_eq!(body.message, "Invalid email address");
    }
}

#[tokio::test]
async fn storing_the_same_email_twice_is_reported_as_already_subscribed() {
    // Arrange
    let app = spawn_app_with_database().await;
    let email = SubscriberEmail::parse("ursula_le_guin@gmail.com".to_string()).unwrap();
    assert_ok!(NewSubscriber::new(email.clone()).store(&app.db_pool).await);

    // Act
    let outcome = NewSubscriber::new(email).store(&app.db_pool).await;

    // Assert
    assert!(matches!(outcome, Err(StoreSubscriberError::AlreadySubscribed)));
    assert_eq!(app.subscriber_count("ursula_le_guin@gmail.com").await, 1);
}
