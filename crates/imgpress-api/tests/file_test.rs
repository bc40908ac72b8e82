//! Download and health endpoint integration tests.

mod helpers;

use helpers::{api_path, setup_test_app};

#[tokio::test]
async fn test_health() {
    let app = setup_test_app(&[]).await;

    let response = app.client().get(&api_path("/health")).await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_download_existing_file() {
    let app = setup_test_app(&[]).await;
    let dir = app.storage_path().join("compressed");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("known.jpeg"), b"stored bytes").unwrap();

    let response = app
        .client()
        .get(&api_path("/file"))
        .add_query_param("path", "compressed/known.jpeg")
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("content-length"), "12");
    assert!(response
        .header("content-disposition")
        .to_str()
        .unwrap()
        .contains("known.jpeg"));
    assert_eq!(response.as_bytes().as_ref(), b"stored bytes");
}

#[tokio::test]
async fn test_missing_path_is_400() {
    let app = setup_test_app(&[]).await;

    let response = app.client().get(&api_path("/file")).await;
    assert_eq!(response.status_code(), 400);

    let response = app
        .client()
        .get(&api_path("/file"))
        .add_query_param("path", "")
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_traversal_is_400_even_when_target_exists() {
    let app = setup_test_app(&[]).await;
    std::fs::write(app.root_path().join("secret.txt"), b"secret").unwrap();

    let response = app
        .client()
        .get(&api_path("/file"))
        .add_query_param("path", "../secret.txt")
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_PATH");
    assert!(!response.text().contains("secret"));
}

#[tokio::test]
async fn test_absolute_path_is_400() {
    let app = setup_test_app(&[]).await;

    let response = app
        .client()
        .get(&api_path("/file"))
        .add_query_param("path", "/etc/passwd")
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_unknown_file_is_404() {
    let app = setup_test_app(&[]).await;

    let response = app
        .client()
        .get(&api_path("/file"))
        .add_query_param("path", "compressed/does-not-exist.jpeg")
        .await;

    assert_eq!(response.status_code(), 404);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
}
