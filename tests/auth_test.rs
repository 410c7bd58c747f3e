mod common;

use mockito::Matcher;
use recipebox::auth::{
    Registration, CONNECTION_ERROR, EMAIL_NOT_FOUND, EMAIL_TAKEN, PASSWORD_MISMATCH,
    WRONG_CURRENT_PASSWORD,
};
use recipebox::session::SessionContext;
use recipebox::Error;
use serde_json::json;

async fn users_mock(server: &mut mockito::ServerGuard) -> mockito::Mock {
    server
        .mock("GET", "/users")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::users().to_string())
        .create_async()
        .await
}

#[tokio::test]
async fn test_login_survives_failed_last_login_update() {
    let mut server = mockito::Server::new_async().await;
    users_mock(&mut server).await;
    let patch = server
        .mock("PATCH", "/users/2")
        .match_body(Matcher::Regex("lastLogin".to_string()))
        .with_status(500)
        .create_async()
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let storage = dir.path().join("storage.json");
    let app = common::app_with_storage(
        common::settings(&server.url(), common::UNREACHABLE, None),
        &storage,
    );

    let user = app
        .auth
        .login("user@test.com", "user123")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.name, "Demo User");
    assert_eq!(user.preferences.diet_type, "vegetarian");
    patch.assert_async().await;

    // The signed-in user survives a restart, without the password
    let reopened = SessionContext::open(&storage);
    assert_eq!(reopened.current_user(), Some(user));
    let raw = std::fs::read_to_string(&storage).unwrap();
    assert!(!raw.contains("user123"));
}

#[tokio::test]
async fn test_login_with_bad_credentials() {
    let mut server = mockito::Server::new_async().await;
    users_mock(&mut server).await;

    let app = common::app(common::settings(&server.url(), common::UNREACHABLE, None));
    let result = app.auth.login("user@test.com", "wrong").await.unwrap();

    assert!(result.is_none());
    assert!(!app.session.is_authenticated());
}

#[tokio::test]
async fn test_login_uses_demo_users_when_backend_is_down() {
    let app = common::app(common::settings(common::UNREACHABLE, common::UNREACHABLE, None));

    let user = app.auth.login("admin@test.com", "admin123").await.unwrap();
    assert!(user.is_some());
    assert!(app.session.is_admin());

    app.auth.logout().unwrap();
    assert!(!app.session.is_authenticated());
}

#[tokio::test]
async fn test_login_backend_error_is_connection_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/users")
        .with_status(503)
        .create_async()
        .await;

    let app = common::app(common::settings(&server.url(), common::UNREACHABLE, None));
    let err = app.auth.login("user@test.com", "user123").await.unwrap_err();
    assert_eq!(err.user_message(), CONNECTION_ERROR);
}

#[tokio::test]
async fn test_register_validates_and_rejects_taken_email() {
    let mut server = mockito::Server::new_async().await;
    users_mock(&mut server).await;
    let app = common::app(common::settings(&server.url(), common::UNREACHABLE, None));

    let mismatch = Registration {
        name: "Ana".to_string(),
        email: "ana@test.com".to_string(),
        password: "secret1".to_string(),
        confirm_password: "secret2".to_string(),
        diet_type: None,
        accept_terms: true,
    };
    let err = app.auth.register(mismatch).await.unwrap_err();
    assert!(matches!(err, Error::Validation(ref m) if m == PASSWORD_MISMATCH));

    let taken = Registration {
        name: "Someone".to_string(),
        email: "user@test.com".to_string(),
        password: "secret1".to_string(),
        confirm_password: "secret1".to_string(),
        diet_type: None,
        accept_terms: true,
    };
    let err = app.auth.register(taken).await.unwrap_err();
    assert!(matches!(err, Error::Validation(ref m) if m == EMAIL_TAKEN));
}

#[tokio::test]
async fn test_register_creates_and_signs_in() {
    let mut server = mockito::Server::new_async().await;
    users_mock(&mut server).await;
    let post = server
        .mock("POST", "/users")
        .match_body(Matcher::PartialJson(json!({
            "email": "ana@test.com",
            "role": "user",
            "preferences": {"dietType": "vegan"}
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(json!({"id": 77, "email": "ana@test.com", "name": "Ana", "password": "secret1"}).to_string())
        .create_async()
        .await;

    let app = common::app(common::settings(&server.url(), common::UNREACHABLE, None));
    let user = app
        .auth
        .register(Registration {
            name: "Ana".to_string(),
            email: "ana@test.com".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
            diet_type: Some("vegan".to_string()),
            accept_terms: true,
        })
        .await
        .unwrap();

    assert_eq!(user.id, 77);
    assert_eq!(app.session.current_user().map(|u| u.id), Some(77));
    post.assert_async().await;
}

#[tokio::test]
async fn test_change_password_checks_current_password() {
    let mut server = mockito::Server::new_async().await;
    users_mock(&mut server).await;
    let patch = server
        .mock("PATCH", "/users/2")
        .match_body(Matcher::PartialJson(json!({"password": "newpass1"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"id": 2}).to_string())
        .expect(1)
        .create_async()
        .await;
    server
        .mock("PATCH", "/users/2")
        .match_body(Matcher::Regex("lastLogin".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"id": 2}).to_string())
        .create_async()
        .await;

    let app = common::app(common::settings(&server.url(), common::UNREACHABLE, None));
    app.auth.login("user@test.com", "user123").await.unwrap();

    let err = app.auth.change_password("nope", "newpass1").await.unwrap_err();
    assert!(matches!(err, Error::Validation(ref m) if m == WRONG_CURRENT_PASSWORD));

    app.auth.change_password("user123", "newpass1").await.unwrap();
    patch.assert_async().await;
}

#[tokio::test]
async fn test_reset_password_issues_temporary_password() {
    let mut server = mockito::Server::new_async().await;
    users_mock(&mut server).await;
    server
        .mock("PATCH", "/users/1")
        .match_body(Matcher::Regex("password".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"id": 1}).to_string())
        .create_async()
        .await;

    let app = common::app(common::settings(&server.url(), common::UNREACHABLE, None));

    let temp = app.auth.reset_password("admin@test.com").await.unwrap();
    assert_eq!(temp.len(), 8);
    assert!(temp.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));

    let err = app.auth.reset_password("ghost@test.com").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(ref m) if m == EMAIL_NOT_FOUND));
}
