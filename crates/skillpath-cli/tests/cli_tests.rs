//! CLI integration tests using assert_cmd.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ALL_BEST: &str = "2,1,2,2,2,1,1,1,1,1,1,2,2,1,2";
const ALL_FIRST: &str = "0,0,0,0,0,0,0,0,0,0,0,0,0,0,0";

fn skillpath(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("skillpath").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("GEMINI_API_KEY")
        .env_remove("SKILLPATH_GENERATION_URL")
        .env_remove("XGB_MODEL_PATH");
    cmd
}

/// Write a config with no key and no model, returning its path.
fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("test-config.toml");
    let content = format!(
        "model_path = \"{}\"\nstore_path = \"{}\"\n",
        dir.join("no-model.json").display(),
        dir.join("store.json").display()
    );
    std::fs::write(&path, content).unwrap();
    path
}

fn register(dir: &Path, config: &Path, email: &str) {
    skillpath(dir)
        .args(["register", "--name", "Ada", "--email", email])
        .arg("--config")
        .arg(config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered Ada"));
}

#[test]
fn questions_lists_catalogue() {
    let dir = TempDir::new().unwrap();
    skillpath(dir.path())
        .arg("questions")
        .assert()
        .success()
        .stdout(predicate::str::contains("15 questions"))
        .stdout(predicate::str::contains("'for' loop"));
}

#[test]
fn questions_json_has_fifteen_entries() {
    let dir = TempDir::new().unwrap();
    let output = skillpath(dir.path())
        .args(["questions", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let questions: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let questions = questions.as_array().unwrap();
    assert_eq!(questions.len(), 15);
    assert_eq!(questions[3]["options"][2], "1/4");
    assert_eq!(questions[3]["scores"], serde_json::json!([3, 2, 10, 1]));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    skillpath(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created skillpath.toml"));

    assert!(dir.path().join("skillpath.toml").exists());
    assert!(dir.path().join("models").is_dir());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    skillpath(dir.path()).arg("init").assert().success();

    skillpath(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn submit_best_answers_scores_150_with_heuristic_roadmap() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    register(dir.path(), &config, "ada@example.com");

    let output = skillpath(dir.path())
        .args([
            "submit",
            "--email",
            "ada@example.com",
            "--answers",
            ALL_BEST,
            "--format",
            "json",
        ])
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["result_id"], 1);
    assert_eq!(body["total_score"], 150);
    assert_eq!(body["prediction"], serde_json::Value::Null);
    assert_eq!(body["roadmap"]["source"], "heuristic");
    assert_eq!(body["roadmap"]["weeks"].as_array().unwrap().len(), 6);

    let per_question = body["per_question"].as_array().unwrap();
    assert_eq!(per_question.len(), 15);
    assert!(per_question
        .iter()
        .all(|q| q["is_correct"] == true && q["chosen_index"] == q["correct_index"]));
}

#[test]
fn submit_text_output_shows_total() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    register(dir.path(), &config, "ada@example.com");

    skillpath(dir.path())
        .args(["submit", "--email", "ada@example.com", "--answers", ALL_FIRST])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total score: 32"))
        .stdout(predicate::str::contains("Roadmap (heuristic)"))
        .stdout(predicate::str::contains("Saved as result 1"));
}

#[test]
fn submit_rejects_wrong_answer_count() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    register(dir.path(), &config, "ada@example.com");

    skillpath(dir.path())
        .args(["submit", "--email", "ada@example.com", "--answers", "1,2,3"])
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected 15 answers, got 3"));
}

#[test]
fn submit_rejects_out_of_range_index() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    register(dir.path(), &config, "ada@example.com");

    skillpath(dir.path())
        .args([
            "submit",
            "--email",
            "ada@example.com",
            "--answers",
            "0,0,0,0,0,0,0,0,0,0,0,0,0,0,4",
        ])
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn submit_requires_registered_user() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    skillpath(dir.path())
        .args(["submit", "--email", "ghost@example.com", "--answers", ALL_BEST])
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("user not found"));
}

#[test]
fn duplicate_registration_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    register(dir.path(), &config, "ada@example.com");

    skillpath(dir.path())
        .args(["register", "--name", "Ada", "--email", "ada@example.com"])
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already registered"));
}

#[test]
fn feedback_and_dashboard_round_trip() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    register(dir.path(), &config, "ada@example.com");

    skillpath(dir.path())
        .args(["submit", "--email", "ada@example.com", "--answers", ALL_FIRST])
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    skillpath(dir.path())
        .args([
            "feedback",
            "--email",
            "ada@example.com",
            "--result-id",
            "1",
            "--rating",
            "9",
        ])
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 1 and 5"));

    skillpath(dir.path())
        .args([
            "feedback",
            "--email",
            "ada@example.com",
            "--result-id",
            "1",
            "--rating",
            "4",
            "--comment",
            "useful plan",
        ])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Feedback saved (id 1)"));

    let output = skillpath(dir.path())
        .args(["dashboard", "--email", "ada@example.com", "--format", "json"])
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success());

    let dashboard: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(dashboard["user"]["email"], "ada@example.com");
    assert_eq!(dashboard["results"][0]["score"], 32);
    assert_eq!(dashboard["feedbacks"][0]["rating"], 4);
    assert_eq!(dashboard["feedbacks"][0]["comment"], "useful plan");

    skillpath(dir.path())
        .args(["dashboard", "--email", "ada@example.com"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("4/5 on result 1: useful plan"));
}

#[test]
fn store_flag_overrides_config() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let custom = dir.path().join("elsewhere").join("custom-store.json");

    skillpath(dir.path())
        .args(["register", "--name", "Ada", "--email", "ada@example.com"])
        .arg("--store")
        .arg(&custom)
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    assert!(custom.exists());
    assert!(!dir.path().join("store.json").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn submit_with_key_uses_generation_service() {
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    let plan = serde_json::json!({
        "summary": "Generated plan",
        "weeks": [{"week": 1, "goal": "Statistics", "activities": ["Practice means"]}],
        "resources": []
    });
    Mock::given(method("POST"))
        .and(header("Authorization", "Bearer cli-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"output_text": plan.to_string()})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    register(dir.path(), &config, "ada@example.com");

    let output = skillpath(dir.path())
        .env("SKILLPATH_GENERATION_URL", server.uri())
        .args([
            "submit",
            "--email",
            "ada@example.com",
            "--answers",
            ALL_BEST,
            "--gemini-key",
            "cli-key",
            "--format",
            "json",
        ])
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["roadmap"]["source"], "generated");
    assert_eq!(body["roadmap"]["summary"], "Generated plan");
    assert_eq!(body["roadmap"]["weeks"][0]["goal"], "Statistics");
}

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    skillpath(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Quiz-driven learning roadmaps"));
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    skillpath(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("skillpath"));
}
