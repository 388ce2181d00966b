mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn create_estate(server: &common::TestServer, body: Value) -> Result<(StatusCode, Value)> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/api/digital-estates", server.base_url))
        .json(&body)
        .send()
        .await?;
    let status = res.status();
    let body = res.json().await?;
    Ok((status, body))
}

#[tokio::test]
async fn create_get_delete_roundtrip() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // Create
    let (status, created) = create_estate(
        server,
        json!({
            "name": "Jane Doe",
            "dob": "1990-01-01",
            "assets": [],
            "beneficiaries": ["Bob"],
        }),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);

    let id = created["id"].as_str().unwrap_or_default().to_string();
    assert!(!id.is_empty());
    assert_eq!(created["name"], "Jane Doe");
    assert_eq!(created["dob"], "1990-01-01");
    assert_eq!(created["assets"], json!([]));
    assert_eq!(created["beneficiaries"], json!(["Bob"]));
    assert!(created["file"].is_null());

    // Get returns an equal record
    let res = client
        .get(format!("{}/api/digital-estates/{}", server.base_url, id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: Value = res.json().await?;
    assert_eq!(fetched, created);

    // Delete
    let res = client
        .delete(format!("{}/api/digital-estates/{}", server.base_url, id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Digital estate deleted successfully");

    // Gone
    let res = client
        .get(format!("{}/api/digital-estates/{}", server.base_url, id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Digital estate not found");

    // Deleting again reports the absence
    let res = client
        .delete(format!("{}/api/digital-estates/{}", server.base_url, id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn update_patches_only_named_fields() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (_, created) = create_estate(
        server,
        json!({
            "name": "John Doe",
            "dob": "1985-06-15",
            "assets": ["house"],
            "beneficiaries": ["Alice", "Bob"],
        }),
    )
    .await?;
    let id = created["id"].as_str().unwrap().to_string();

    let res = client
        .put(format!("{}/api/digital-estates/{}", server.base_url, id))
        .json(&json!({ "name": "X" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await?;

    assert_eq!(updated["name"], "X");
    assert_eq!(updated["dob"], "1985-06-15");
    assert_eq!(updated["assets"], json!(["house"]));
    assert_eq!(updated["beneficiaries"], json!(["Alice", "Bob"]));

    // The merge is persisted, not just reflected in the response.
    let res = client
        .get(format!("{}/api/digital-estates/{}", server.base_url, id))
        .send()
        .await?;
    let fetched: Value = res.json().await?;
    assert_eq!(fetched, updated);
    Ok(())
}

#[tokio::test]
async fn update_of_unknown_id_is_not_found() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .put(format!(
            "{}/api/digital-estates/00000000-0000-4000-8000-000000000000",
            server.base_url
        ))
        .json(&json!({ "name": "X" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn malformed_id_is_not_found() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!(
            "{}/api/digital-estates/not-a-uuid",
            server.base_url
        ))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Digital estate not found");
    Ok(())
}

#[tokio::test]
async fn list_contains_created_records() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (_, created) = create_estate(
        server,
        json!({
            "name": "List Me",
            "dob": "1970-12-31",
            "assets": [],
            "beneficiaries": [],
        }),
    )
    .await?;

    let res = client
        .get(format!("{}/api/digital-estates", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let records: Vec<Value> = res.json().await?;
    assert!(records.iter().any(|r| r["id"] == created["id"]));
    Ok(())
}

#[tokio::test]
async fn create_with_missing_fields_is_a_storage_failure() -> Result<()> {
    let server = common::ensure_server().await?;

    let (status, body) = create_estate(server, json!({ "name": "Jane Doe" })).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to create digital estate");
    Ok(())
}

#[tokio::test]
async fn multipart_create_attaches_the_file() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let form = reqwest::multipart::Form::new()
        .text("name", "Jane Doe")
        .text("dob", "1990-01-01")
        .text("assets", "[\"car\"]")
        .text("beneficiaries", "[\"Bob\"]")
        .part(
            "file",
            reqwest::multipart::Part::bytes(b"last will".to_vec()).file_name("will.txt"),
        );

    let res = client
        .post(format!("{}/api/digital-estates", server.base_url))
        .multipart(form)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await?;

    assert_eq!(created["name"], "Jane Doe");
    assert_eq!(created["assets"], json!(["car"]));
    assert_eq!(created["file"]["original_name"], "will.txt");
    assert_eq!(created["file"]["size"], 9);
    assert!(created["file"]["path"]
        .as_str()
        .unwrap()
        .ends_with("-will.txt"));
    Ok(())
}

#[tokio::test]
async fn multipart_create_without_a_file_succeeds() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let form = reqwest::multipart::Form::new()
        .text("name", "No Attachment")
        .text("dob", "1990-01-01")
        .text("assets", "[]")
        .text("beneficiaries", "[]");

    let res = client
        .post(format!("{}/api/digital-estates", server.base_url))
        .multipart(form)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await?;
    assert!(created["file"].is_null());
    Ok(())
}
