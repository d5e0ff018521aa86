//! CLI tests that talk to a local mock server through a config file
//! pointing the endpoints at it.

#![allow(deprecated)] // cargo_bin deprecation, replacement not yet stable

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_file(base: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[endpoints]\nconfig = \"{base}/video/{{id}}/config\"\nmetadata = \"{base}/api/v2/video/{{id}}.json\""
    )
    .unwrap();
    file
}

async fn mock_vimeo() -> MockServer {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/video/42/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "video": {"title": "Mock clip"},
            "request": {"files": {"progressive": [
                {"url": format!("{base}/media/720.mp4"), "quality": "720p"},
                {"url": format!("{base}/media/240.mp4"), "quality": "240p"}
            ]}}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/video/42.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 42,
            "title": "Mock clip",
            "user_name": "Tester",
            "duration": 75,
            "stats_number_of_plays": 9
        }])))
        .mount(&server)
        .await;
    for name in ["720.mp4", "240.mp4"] {
        Mock::given(method("GET"))
            .and(path(format!("/media/{name}")))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(name.as_bytes().to_vec()))
            .mount(&server)
            .await;
    }
    server
}

#[tokio::test]
async fn streams_lists_qualities_in_order() {
    let server = mock_vimeo().await;
    let config = config_file(&server.uri());

    let output = tokio::task::spawn_blocking(move || {
        Command::cargo_bin("vimeo-dl")
            .unwrap()
            .arg("--config")
            .arg(config.path())
            .args(["streams", "--id", "42"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let p240 = stdout.find("240p").unwrap();
    let p720 = stdout.find("720p").unwrap();
    assert!(p240 < p720, "{stdout}");
}

#[tokio::test]
async fn info_prints_metadata() {
    let server = mock_vimeo().await;
    let config = config_file(&server.uri());

    let assert = tokio::task::spawn_blocking(move || {
        Command::cargo_bin("vimeo-dl")
            .unwrap()
            .arg("--config")
            .arg(config.path())
            .args(["info", "--id", "42"])
            .assert()
    })
    .await
    .unwrap();

    assert
        .success()
        .stdout(predicate::str::contains("Title: Mock clip"))
        .stdout(predicate::str::contains("Uploader: Tester"))
        .stdout(predicate::str::contains("Duration: 1:15"))
        .stdout(predicate::str::contains("Views: 9"));
}

#[tokio::test]
async fn download_picks_requested_quality() {
    let server = mock_vimeo().await;
    let config = config_file(&server.uri());
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().to_path_buf();

    let output = tokio::task::spawn_blocking(move || {
        Command::cargo_bin("vimeo-dl")
            .unwrap()
            .arg("--config")
            .arg(config.path())
            .args(["download", "--id", "42", "-q", "240", "-f", "clip", "--quiet", "-o"])
            .arg(&out)
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let written = std::fs::read(dir.path().join("clip.mp4")).unwrap();
    assert_eq!(written, b"240.mp4");
}

#[tokio::test]
async fn download_unknown_quality_lists_available() {
    let server = mock_vimeo().await;
    let config = config_file(&server.uri());

    let assert = tokio::task::spawn_blocking(move || {
        Command::cargo_bin("vimeo-dl")
            .unwrap()
            .arg("--config")
            .arg(config.path())
            .args(["download", "--id", "42", "-q", "1080p", "--quiet"])
            .assert()
    })
    .await
    .unwrap();

    assert
        .failure()
        .stderr(predicate::str::contains("240p, 720p"));
}
