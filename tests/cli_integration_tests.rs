//! Runs the compiled binary against wiremock servers.
//!
//! Every command gets a cleared environment and a scratch working directory so
//! stray `.env` files or proxy settings on the host cannot leak in.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::io::Write;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WORKFLOWS: &str = "/api/v1/workflows";

fn setup_command(server: &MockServer, workdir: &TempDir) -> Command {
    let address = server.address();
    let mut cmd = Command::cargo_bin("shaad-n8n-setup").unwrap();
    cmd.env_clear()
        .current_dir(workdir.path())
        .env("N8N_HOST", address.ip().to_string())
        .env("N8N_PORT", address.port().to_string());
    cmd
}

async fn mock_empty_listing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(WORKFLOWS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(server)
        .await;
}

#[test]
fn help_describes_the_tool() {
    let mut cmd = Command::cargo_bin("shaad-n8n-setup").unwrap();

    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("SHAAD"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--env-file"));
}

#[tokio::test(flavor = "multi_thread")]
async fn creates_missing_workflows_and_prints_summary() {
    let server = MockServer::start().await;
    mock_empty_listing(&server).await;
    Mock::given(method("POST"))
        .and(path(WORKFLOWS))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"id": "abc"}})))
        .expect(4)
        .mount(&server)
        .await;
    let workdir = TempDir::new().unwrap();

    setup_command(&server, &workdir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Setting up n8n workflows for SHAAD..."))
        .stdout(predicate::str::contains(
            "✓ Created workflow 'SHAAD_Send_Notification' with ID: abc",
        ))
        .stdout(predicate::str::contains(
            "✓ Created workflow 'SHAAD_Schedule_Task' with ID: abc",
        ))
        .stdout(predicate::str::contains("✓ Workflow setup complete!"))
        .stdout(predicate::str::contains(
            "- SHAAD_Home_Control: Control smart home devices",
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn existing_workflows_are_reported_not_recreated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(WORKFLOWS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [
            {"id": "1", "name": "SHAAD_Send_Notification"},
            {"id": "2", "name": "SHAAD_Web_Search"},
            {"id": "3", "name": "SHAAD_Home_Control"},
            {"id": "4", "name": "SHAAD_Schedule_Task"}
        ]})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(WORKFLOWS))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let workdir = TempDir::new().unwrap();

    setup_command(&server, &workdir)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "✓ Workflow 'SHAAD_Web_Search' already exists",
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_creation_still_exits_successfully() {
    let server = MockServer::start().await;
    mock_empty_listing(&server).await;
    Mock::given(method("POST"))
        .and(path(WORKFLOWS))
        .respond_with(ResponseTemplate::new(500).set_body_string("database is locked"))
        .mount(&server)
        .await;
    let workdir = TempDir::new().unwrap();

    setup_command(&server, &workdir)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Failed to create workflow: database is locked",
        ))
        .stdout(predicate::str::contains("Created workflow").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn dry_run_does_not_post() {
    let server = MockServer::start().await;
    mock_empty_listing(&server).await;
    Mock::given(method("POST"))
        .and(path(WORKFLOWS))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let workdir = TempDir::new().unwrap();

    setup_command(&server, &workdir)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "→ Would create workflow 'SHAAD_Web_Search'",
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn env_file_api_key_takes_precedence_over_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(WORKFLOWS))
        .and(header("X-N8N-API-KEY", "from-env-file"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(4)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(WORKFLOWS))
        .and(header("X-N8N-API-KEY", "from-env-file"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"id": "k"}})))
        .expect(4)
        .mount(&server)
        .await;
    let workdir = TempDir::new().unwrap();
    let env_path = workdir.path().join("n8n.env");
    let mut env_file = std::fs::File::create(&env_path).unwrap();
    writeln!(env_file, "N8N_API_KEY=from-env-file").unwrap();
    writeln!(env_file, "N8N_BASIC_AUTH_USER=admin").unwrap();
    writeln!(env_file, "N8N_BASIC_AUTH_PASSWORD=hunter2").unwrap();

    setup_command(&server, &workdir)
        .arg("--env-file")
        .arg(&env_path)
        .assert()
        .success();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 8);
    assert!(requests
        .iter()
        .all(|r| r.headers.get("authorization").is_none()));
}

#[test]
fn unreachable_instance_fails_the_run() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let workdir = TempDir::new().unwrap();

    Command::cargo_bin("shaad-n8n-setup")
        .unwrap()
        .env_clear()
        .current_dir(workdir.path())
        .env("N8N_HOST", "127.0.0.1")
        .env("N8N_PORT", port.to_string())
        .assert()
        .failure()
        .stderr(predicate::str::contains("n8n request failed"));
}
