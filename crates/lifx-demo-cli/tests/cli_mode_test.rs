use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn lifx_demo(state_dir: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_lifx-demo"));
    command
        .env_remove("LIFX_DEMO_CONFIG")
        .env_remove("LIFX_DEMO_BACKEND_URL")
        .env_remove("LIFX_DEMO_KEY")
        .arg("--state-dir")
        .arg(state_dir)
        .arg("--log-level")
        .arg("error");
    command
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "Process exited with non-zero status: {}\nStdout: {}\nStderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

async fn run_blocking(mut command: Command) -> Output {
    tokio::task::spawn_blocking(move || command.output())
        .await
        .expect("join blocking task")
        .expect("Failed to start lifx-demo binary")
}

#[test]
fn format_raw_reads_file() {
    let state = TempDir::new().unwrap();
    let mut input = tempfile::NamedTempFile::new().unwrap();
    write!(input, r#"{{"output": "{{\"jsonrpc\":\"2.0\"}}", "pid": 241}}"#).unwrap();

    let output = lifx_demo(state.path())
        .arg("format-raw")
        .arg(input.path())
        .output()
        .expect("Failed to start lifx-demo binary");

    assert_eq!(
        stdout_of(&output),
        "{\n  \"output\": {\n    \"jsonrpc\": 2.0\n  },\n  \"pid\": 241\n}\n"
    );
}

#[test]
fn format_raw_reads_stdin_and_escapes_invalid_json() {
    let state = TempDir::new().unwrap();
    let mut child = lifx_demo(state.path())
        .arg("format-raw")
        .arg("--html")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to start lifx-demo binary");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"not <json>")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert_eq!(
        stdout_of(&output),
        "<span class=\"log-raw\">not &lt;json&gt;</span>\n"
    );
}

#[test]
fn session_id_persists_between_runs() {
    let state = TempDir::new().unwrap();

    let first = stdout_of(&lifx_demo(state.path()).args(["session", "show"]).output().unwrap());
    let second = stdout_of(&lifx_demo(state.path()).args(["session", "show"]).output().unwrap());

    assert!(first.starts_with("Session: session_"));
    assert!(first.contains("Usage: 0/100 requests used (0%), 100 remaining"));
    assert_eq!(first.lines().next(), second.lines().next());

    let reset = stdout_of(&lifx_demo(state.path()).args(["session", "reset"]).output().unwrap());
    let third = stdout_of(&lifx_demo(state.path()).args(["session", "show"]).output().unwrap());
    assert_ne!(first.lines().next(), third.lines().next());
    assert!(reset.contains(third.lines().next().unwrap().trim_start_matches("Session: ")));
}

#[test]
fn config_set_is_persisted() {
    let state = TempDir::new().unwrap();

    stdout_of(
        &lifx_demo(state.path())
            .args(["config", "set", "--url", "http://localhost:3001", "--key", "OtherKey"])
            .output()
            .unwrap(),
    );
    let shown = stdout_of(&lifx_demo(state.path()).args(["config", "show"]).output().unwrap());

    assert!(shown.contains("Backend URL: http://localhost:3001"));
    assert!(shown.contains("Demo key: OtherKey"));
    assert!(shown.contains("Context: development (health check cooldown 120s)"));

    stdout_of(&lifx_demo(state.path()).args(["config", "reset"]).output().unwrap());
    let shown = stdout_of(&lifx_demo(state.path()).args(["config", "show"]).output().unwrap());
    assert!(shown.contains("Backend URL: https://your-app.railway.app"));
}

#[test]
fn keys_are_validated_and_masked() {
    let state = TempDir::new().unwrap();

    let rejected = lifx_demo(state.path())
        .args(["keys", "set", "--claude", "not-a-claude-key"])
        .output()
        .unwrap();
    assert!(!rejected.status.success());
    assert!(String::from_utf8_lossy(&rejected.stderr).contains("should start with"));

    stdout_of(
        &lifx_demo(state.path())
            .args([
                "keys",
                "set",
                "--lifx",
                "c0ffeec0ffeec0ffeec0ffee",
                "--claude",
                "sk-ant-api03-secret",
            ])
            .output()
            .unwrap(),
    );
    let shown = stdout_of(&lifx_demo(state.path()).args(["keys", "show"]).output().unwrap());

    assert!(shown.contains("Claude API key: sk-ant-…"));
    assert!(!shown.contains("secret"));
    assert!(shown.contains("(valid)"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn health_reports_connected_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    let state = TempDir::new().unwrap();
    let mut command = lifx_demo(state.path());
    command.args(["--backend-url", &server.uri(), "health"]);

    let stdout = stdout_of(&run_blocking(command).await);
    assert!(stdout.starts_with("Backend: connected"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn logs_fetch_prints_export() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/logs/backend"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "count": 1,
            "logs": [{
                "timestamp": "2025-07-29T06:08:42.000Z",
                "level": "info",
                "message": "Server started",
                "meta": {"port": 3001}
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/logs/mcp"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let state = TempDir::new().unwrap();
    let mut command = lifx_demo(state.path());
    command.args(["--backend-url", &server.uri(), "logs", "fetch"]);

    let stdout = stdout_of(&run_blocking(command).await);
    assert!(stdout.starts_with("=== LIFX MCP Server Logs (ALL) ==="));
    assert!(stdout.contains("[BACKEND] ["));
    assert!(stdout.contains("INFO  Server started"));
    assert!(stdout.contains("\"port\": 3001"));
    assert!(stdout.contains("MCP logs endpoint not yet implemented on server"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn request_retries_with_session_reset() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/claude"))
        .and(header("X-Force-New-Session", "true"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Requests-Used", "1")
                .insert_header("X-Requests-Remaining", "99")
                .insert_header("X-Daily-Limit", "100")
                .set_body_json(json!({"response": "Lights on"})),
        )
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/claude"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({"code": "MULTIPLE_SESSIONS"})))
        .mount(&server)
        .await;

    let state = TempDir::new().unwrap();
    let mut command = lifx_demo(state.path());
    command.args([
        "--backend-url",
        &server.uri(),
        "request",
        "/api/claude",
        "--data",
        r#"{"message": "turn on the lights"}"#,
    ]);

    let stdout = stdout_of(&run_blocking(command).await);
    assert!(stdout.contains("retrying with a session reset"));
    assert!(stdout.contains("HTTP 200"));
    assert!(stdout.contains("\"response\": \"Lights on\""));
    assert!(stdout.contains("Usage: 1/100 requests used, 99 remaining"));
}
