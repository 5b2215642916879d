mod common;

use anyhow::Result;
use futures::future::join_all;
use reqwest::StatusCode;
use serde_json::json;

use passgate_api::auth::{DirectoryError, PasswordService, UserDirectory};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registration_yields_one_winner() -> Result<()> {
    let directory = UserDirectory::new(PasswordService::new(common::test_config().password)?);

    let attempts = (0..16).map(|i| {
        let directory = directory.clone();
        tokio::spawn(async move { directory.register("racer", &format!("pw-{}", i)).await })
    });

    let results = join_all(attempts).await;

    let mut successes = 0;
    let mut duplicates = 0;
    for result in results {
        match result? {
            Ok(_) => successes += 1,
            Err(DirectoryError::DuplicateUsername(_)) => duplicates += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(duplicates, 15);
    assert_eq!(directory.len().await, 1);
    Ok(())
}

#[tokio::test]
async fn concurrent_signups_over_http_yield_one_winner() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let username = common::unique_username("race");

    let requests = (0..8).map(|i| {
        client
            .post(server.url("/signup"))
            .json(&json!({ "username": username, "password": format!("pw-{}", i) }))
            .send()
    });

    let responses = join_all(requests).await;

    let mut ok = 0;
    let mut rejected = 0;
    for response in responses {
        match response?.status() {
            StatusCode::OK => ok += 1,
            StatusCode::BAD_REQUEST => rejected += 1,
            other => panic!("unexpected status {other}"),
        }
    }

    assert_eq!(ok, 1);
    assert_eq!(rejected, 7);
    Ok(())
}
