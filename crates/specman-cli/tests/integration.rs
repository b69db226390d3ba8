use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn specman(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("specman").unwrap();
    cmd.current_dir(dir.path()).env("SPECMAN_ROOT", dir.path());
    cmd
}

fn init_project(dir: &TempDir) {
    specman(dir).arg("init").assert().success();
}

// ---------------------------------------------------------------------------
// specman init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_store_layout() {
    let dir = TempDir::new().unwrap();
    specman(&dir).arg("init").assert().success();

    assert!(dir.path().join(".specs").is_dir());
    assert!(dir.path().join(".specs/requirements").is_dir());
    assert!(dir.path().join(".specs/plans").is_dir());
    assert!(dir.path().join(".specs/decisions").is_dir());
    assert!(dir.path().join(".specs/components").is_dir());
    assert!(dir.path().join(".specs/constitutions").is_dir());
    assert!(dir.path().join(".specs/milestones").is_dir());
    assert!(dir.path().join(".specs/drafts").is_dir());
    assert!(dir.path().join(".specs/config.yaml").exists());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    specman(&dir).arg("init").assert().success();
    specman(&dir).arg("init").assert().success();
}

// ---------------------------------------------------------------------------
// specman spec create / list / show / update / delete
// ---------------------------------------------------------------------------

#[test]
fn spec_create_and_list() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    specman(&dir)
        .args(["spec", "create", "requirement", "user-login", "--name", "User Login"])
        .assert()
        .success()
        .stdout(predicate::str::contains("req-001-user-login"));

    specman(&dir)
        .args(["spec", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("req-001-user-login"));
}

#[test]
fn spec_create_without_init_fails() {
    let dir = TempDir::new().unwrap();

    specman(&dir)
        .args(["spec", "create", "plan", "build-it"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn spec_numbers_increment_per_type() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    specman(&dir)
        .args(["spec", "create", "requirement", "first"])
        .assert()
        .success();
    specman(&dir)
        .args(["spec", "create", "requirement", "second"])
        .assert()
        .success()
        .stdout(predicate::str::contains("req-002-second"));
    specman(&dir)
        .args(["spec", "create", "plan", "build-it"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pln-001-build-it"));
}

#[test]
fn spec_show_displays_details() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    specman(&dir)
        .args([
            "spec", "create", "decision", "use-yaml",
            "--name", "Use YAML",
            "--description", "Entities live in YAML files",
        ])
        .assert()
        .success();

    specman(&dir)
        .args(["spec", "show", "dec-001-use-yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Use YAML"))
        .stdout(predicate::str::contains("Entities live in YAML files"));
}

#[test]
fn spec_show_json_is_parseable() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    specman(&dir)
        .args(["spec", "create", "requirement", "user-login"])
        .assert()
        .success();

    let output = specman(&dir)
        .args(["--json", "spec", "show", "req-001-user-login"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["type"], "requirement");
    assert_eq!(value["slug"], "user-login");
}

#[test]
fn spec_update_changes_name() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    specman(&dir)
        .args(["spec", "create", "requirement", "user-login"])
        .assert()
        .success();
    specman(&dir)
        .args(["spec", "update", "req-001-user-login", "--name", "Login v2"])
        .assert()
        .success();

    specman(&dir)
        .args(["spec", "show", "req-001-user-login"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Login v2"));
}

#[test]
fn spec_approve_marks_plan() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    specman(&dir)
        .args(["spec", "create", "plan", "auth-backend"])
        .assert()
        .success();
    specman(&dir)
        .args(["spec", "approve", "pln-001-auth-backend"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Approved pln-001-auth-backend"));

    specman(&dir)
        .args(["--json", "spec", "show", "pln-001-auth-backend"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"approved\": true"));
}

#[test]
fn spec_approve_rejects_requirements() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    specman(&dir)
        .args(["spec", "create", "requirement", "user-login"])
        .assert()
        .success();
    specman(&dir)
        .args(["spec", "approve", "req-001-user-login"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot approve a requirement"));
}

#[test]
fn spec_delete_removes_but_number_not_reused() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    specman(&dir)
        .args(["spec", "create", "requirement", "user-login"])
        .assert()
        .success();
    specman(&dir)
        .args(["spec", "delete", "req-001-user-login"])
        .assert()
        .success();

    specman(&dir)
        .args(["spec", "show", "req-001-user-login"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn spec_create_rejects_bad_slug() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    specman(&dir)
        .args(["spec", "create", "requirement", "Bad_Slug"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("slug"));
}

// ---------------------------------------------------------------------------
// specman item add / supersede / complete
// ---------------------------------------------------------------------------

#[test]
fn item_add_and_supersede() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    specman(&dir)
        .args(["spec", "create", "requirement", "user-login"])
        .assert()
        .success();
    specman(&dir)
        .args(["item", "add", "req-001-user-login", "criterion", "Sign in with email"])
        .assert()
        .success()
        .stdout(predicate::str::contains("crt-001"));

    specman(&dir)
        .args([
            "item", "supersede", "req-001-user-login", "crt-001",
            "Sign in with email or passkey",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("crt-002"));

    // superseding the same item again must fail
    specman(&dir)
        .args(["item", "supersede", "req-001-user-login", "crt-001", "third try"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already superseded"));
}

#[test]
fn item_complete_task_resolves_superseded_ids() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    specman(&dir)
        .args(["spec", "create", "plan", "build-login"])
        .assert()
        .success();
    specman(&dir)
        .args(["item", "add", "pln-001-build-login", "task", "Write handler"])
        .assert()
        .success();
    specman(&dir)
        .args(["item", "supersede", "pln-001-build-login", "tsk-001", "Write async handler"])
        .assert()
        .success();

    specman(&dir)
        .args(["item", "complete", "pln-001-build-login", "tsk-001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tsk-002"));
}

// ---------------------------------------------------------------------------
// specman validate
// ---------------------------------------------------------------------------

#[test]
fn validate_clean_project_succeeds() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    specman(&dir)
        .args(["spec", "create", "requirement", "user-login"])
        .assert()
        .success();

    specman(&dir)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("valid").or(predicate::str::contains("warning")));
}

#[test]
fn validate_fails_on_missing_ref() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    specman(&dir)
        .args(["spec", "create", "requirement", "user-login"])
        .assert()
        .success();

    // Point depends_on at a spec that does not exist
    let file = dir.path().join(".specs/requirements/req-001-user-login.yaml");
    let content = std::fs::read_to_string(&file).unwrap();
    assert!(content.contains("depends_on: []"));
    let content = content.replace("depends_on: []", "depends_on:\n- req-099-ghost");
    std::fs::write(&file, content).unwrap();

    specman(&dir)
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("missing-ref"));
}

// ---------------------------------------------------------------------------
// specman draft
// ---------------------------------------------------------------------------

#[test]
fn draft_flow_end_to_end() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    specman(&dir)
        .args(["draft", "start", "requirement", "user-login"])
        .assert()
        .success()
        .stdout(predicate::str::contains("draft-001"));

    for answer in [
        "User Login",
        "Users need to sign in",
        "business",
        "critical",
        "Sign in with email\nLockout after 5 failures",
        "",
    ] {
        specman(&dir)
            .args(["draft", "answer", "draft-001", answer])
            .assert()
            .success();
    }

    specman(&dir)
        .args(["draft", "finalize", "draft-001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("req-001-user-login"));

    specman(&dir)
        .args(["spec", "show", "req-001-user-login"])
        .assert()
        .success()
        .stdout(predicate::str::contains("crt-001"));

    // draft file is removed after finalize
    specman(&dir)
        .args(["draft", "show", "draft-001"])
        .assert()
        .failure();
}

#[test]
fn draft_finalize_incomplete_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    specman(&dir)
        .args(["draft", "start", "plan", "build-it"])
        .assert()
        .success();
    specman(&dir)
        .args(["draft", "answer", "draft-001", "Build it"])
        .assert()
        .success();

    specman(&dir)
        .args(["draft", "finalize", "draft-001"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required answers"));
}

#[test]
fn draft_abandon_removes_draft() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    specman(&dir)
        .args(["draft", "start", "milestone", "v1-launch"])
        .assert()
        .success();
    specman(&dir)
        .args(["draft", "abandon", "draft-001"])
        .assert()
        .success();

    specman(&dir)
        .args(["draft", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No drafts"));
}

// ---------------------------------------------------------------------------
// specman mcp (handshake over stdio)
// ---------------------------------------------------------------------------

#[test]
fn mcp_initialize_handshake() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let output = specman(&dir)
        .arg("mcp")
        .write_stdin(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"test","version":"0.0.1"}}}
"#,
        )
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let response: serde_json::Value = serde_json::from_str(stdout.lines().next().unwrap()).unwrap();
    assert_eq!(response["result"]["serverInfo"]["name"], "specman");
}

#[test]
fn mcp_tools_list_names_every_tool() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let output = specman(&dir)
        .arg("mcp")
        .write_stdin(
            r#"{"jsonrpc":"2.0","id":1,"method":"tools/list","params":{}}
"#,
        )
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let response: serde_json::Value = serde_json::from_str(stdout.lines().next().unwrap()).unwrap();
    let tools = response["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 13);
}
