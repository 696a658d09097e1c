use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_klistra"))
}

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    fn config_home(&self) -> PathBuf {
        self.dir.path().join("c")
    }

    fn data_home(&self) -> PathBuf {
        self.dir.path().join("d")
    }

    fn default_db(&self) -> PathBuf {
        self.data_home().join("klistra").join("klistra.db")
    }

    fn config_file(&self) -> PathBuf {
        self.config_home().join("klistra").join("config.toml")
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(bin());
        cmd.args(args)
            .env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.config_home())
            .env("XDG_DATA_HOME", self.data_home())
            .env_remove("KLISTRA_DB")
            .env_remove("KLISTRA_CONFIG")
            .env_remove("KLISTRA_PASSWORD")
            .env_remove("RUST_LOG")
            .stdin(Stdio::null());
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command(args).output().expect("run klistra")
    }

    fn run_with_stdin(&self, args: &[&str], input: &str) -> Output {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn klistra");
        child
            .stdin
            .take()
            .expect("stdin")
            .write_all(input.as_bytes())
            .expect("write stdin");
        child.wait_with_output().expect("wait klistra")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn create_id(sandbox: &Sandbox, args: &[&str]) -> String {
    let output = sandbox.run(args);
    assert_success(&output);
    stdout(&output).trim().to_string()
}

#[test]
fn test_unprotected_create_read_status() {
    let sandbox = Sandbox::new();
    let id = create_id(&sandbox, &["create", "--text", "world", "--expiry", "10m"]);
    assert!(!id.is_empty());
    assert!(sandbox.default_db().exists());

    let read = sandbox.run(&["read", &id]);
    assert_success(&read);
    assert_eq!(stdout(&read), "world\n");

    let status = sandbox.run(&["status", &id]);
    assert_success(&status);
    assert_eq!(
        stdout(&status),
        format!("id={}\nprotected=false\n", id)
    );
}

#[test]
fn test_protected_paste_requires_password() {
    let sandbox = Sandbox::new();
    let id = create_id(
        &sandbox,
        &["create", "--text", "hello", "--protect", "--password", "secret1"],
    );

    let status = sandbox.run(&["status", &id, "--json"]);
    assert_success(&status);
    let value: serde_json::Value = serde_json::from_slice(&status.stdout).unwrap();
    assert_eq!(value["protected"], true);

    // No password and no TTY to prompt on.
    let missing = sandbox.run(&["read", &id]);
    assert_eq!(missing.status.code(), Some(5));

    let wrong = sandbox.run(&["read", &id, "--password", "wrong"]);
    assert_eq!(wrong.status.code(), Some(5));

    let right = sandbox.run(&["read", &id, "--password", "secret1"]);
    assert_success(&right);
    assert_eq!(stdout(&right), "hello\n");
}

#[test]
fn test_password_from_environment() {
    let sandbox = Sandbox::new();
    let output = sandbox
        .command(&["create", "--text", "env secret", "--protect"])
        .env("KLISTRA_PASSWORD", "hunter22")
        .output()
        .unwrap();
    assert_success(&output);
    let id = stdout(&output).trim().to_string();

    let read = sandbox
        .command(&["read", &id])
        .env("KLISTRA_PASSWORD", "hunter22")
        .output()
        .unwrap();
    assert_success(&read);
    assert_eq!(stdout(&read), "env secret\n");
}

#[test]
fn test_create_from_stdin_with_files() {
    let sandbox = Sandbox::new();
    let output = sandbox.run_with_stdin(
        &[
            "create",
            "--file",
            "https://files.example/a.png",
            "--json",
        ],
        "line one\nline two\n",
    );
    assert_success(&output);
    let created: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["protected"], false);

    let read = sandbox.run(&["read", &id, "--json"]);
    assert_success(&read);
    let view: serde_json::Value = serde_json::from_slice(&read.stdout).unwrap();
    assert_eq!(view["text"], "line one\nline two\n");
    assert_eq!(view["files"][0], "https://files.example/a.png");
    assert!(view["timeoutUnix"].as_i64().unwrap() > 0);
}

#[test]
fn test_invalid_expiry_is_rejected() {
    let sandbox = Sandbox::new();
    let short = sandbox.run(&["create", "--text", "x", "--expiry", "30"]);
    assert_eq!(short.status.code(), Some(4));

    let long = sandbox.run(&["create", "--text", "x", "--expiry", "8d"]);
    assert_eq!(long.status.code(), Some(4));

    let garbage = sandbox.run(&["create", "--text", "x", "--expiry", "soon"]);
    assert_eq!(garbage.status.code(), Some(4));

    let multibyte = sandbox.run(&["create", "--text", "x", "--expiry", "5µ"]);
    assert_eq!(multibyte.status.code(), Some(4));
}

#[test]
fn test_missing_paste_and_missing_database() {
    let sandbox = Sandbox::new();

    let no_db = sandbox.run(&["read", "apple42"]);
    assert_eq!(no_db.status.code(), Some(3));
    assert!(!sandbox.default_db().exists());

    create_id(&sandbox, &["create", "--text", "x"]);
    let missing = sandbox.run(&["status", "nosuch10"]);
    assert_eq!(missing.status.code(), Some(3));
}

#[test]
fn test_init_writes_config_and_respects_force() {
    let sandbox = Sandbox::new();
    let db = sandbox.dir.path().join("elsewhere").join("pastes.db");
    let db_str = db.to_string_lossy().to_string();

    let init = sandbox.run(&["init", "--db-path", &db_str, "--expiry", "2h"]);
    assert_success(&init);
    assert!(db.exists());

    let config = std::fs::read_to_string(sandbox.config_file()).unwrap();
    assert!(config.contains("default_expiry_seconds = 7200"));
    assert!(config.contains(&db_str));

    let again = sandbox.run(&["init"]);
    assert_eq!(again.status.code(), Some(4));

    let forced = sandbox.run(&["init", "--db-path", &db_str, "--force"]);
    assert_success(&forced);

    // Commands now use the configured database.
    let id = create_id(&sandbox, &["create", "--text", "configured"]);
    assert!(!sandbox.default_db().exists());
    let read = sandbox.run(&["read", &id]);
    assert_eq!(stdout(&read), "configured\n");
}

#[test]
fn test_db_flag_overrides_config() {
    let sandbox = Sandbox::new();
    let db = sandbox.dir.path().join("flag.db");
    let db_str = db.to_string_lossy().to_string();

    let id = create_id(&sandbox, &["--db", &db_str, "create", "--text", "flagged"]);
    assert!(db.exists());
    assert!(!sandbox.default_db().exists());

    let via_env = sandbox
        .command(&["read", &id])
        .env("KLISTRA_DB", &db_str)
        .output()
        .unwrap();
    assert_success(&via_env);
    assert_eq!(stdout(&via_env), "flagged\n");
}

#[test]
fn test_sweep_reports_count() {
    let sandbox = Sandbox::new();
    create_id(&sandbox, &["create", "--text", "fresh"]);

    let sweep = sandbox.run(&["sweep"]);
    assert_success(&sweep);
    assert_eq!(stdout(&sweep).trim(), "0");
}

#[test]
fn test_completions() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["completions", "bash"]);
    assert_success(&output);
    assert!(stdout(&output).contains("klistra"));
}
