//! CLI integration tests for the pedigree registry
//!
//! Each test runs the binary against its own temporary data directory and
//! config file.

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Isolated registry: data directory plus config file path
struct Stable {
    dir: TempDir,
}

impl Stable {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Registry pre-loaded with the sample stable
    fn seeded() -> Self {
        let stable = Self::new();
        stable.cmd().arg("seed").assert().success();
        stable
    }

    fn config_path(&self) -> std::path::PathBuf {
        self.dir.path().join("config.toml")
    }

    /// Get a command instance for the pedigree binary bound to this stable
    fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("pedigree"));
        cmd.env_remove("RUST_LOG")
            .env("PEDIGREE_CONFIG", self.config_path())
            .arg("--data-dir")
            .arg(self.dir.path().join("data"));
        cmd
    }

    fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self
            .cmd()
            .args(["--format", "json"])
            .args(args)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "command failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }
}

// =============================================================================
// Horse Tests
// =============================================================================

#[test]
fn test_add_and_get_horse() {
    let stable = Stable::seeded();

    stable
        .cmd()
        .args(["horse", "add", "--name", "Foal", "--dob", "2022-04-01", "--sex", "MALE"])
        .args(["--mother", "-1", "--father", "-4", "--owner", "-2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created horse: Foal"))
        .stdout(predicate::str::contains("Mother: Wendy"))
        .stdout(predicate::str::contains("Owner: Tom Becker"));

    let list = stable.json(&["horse", "list", "--name", "foal"]);
    let items = list.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["mother_id"], -1);
    assert_eq!(items[0]["owner"]["first_name"], "Tom");
}

#[test]
fn test_add_with_missing_name_and_future_birth_is_validation_error() {
    let stable = Stable::new();

    stable
        .cmd()
        .args(["horse", "add", "--name", " ", "--dob", "2999-01-01", "--sex", "FEMALE"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Validation of horse to create failed"))
        .stderr(predicate::str::contains("Horse name cannot be empty"))
        .stderr(predicate::str::contains("Horse date of birth cannot be in the future"));
}

#[test]
fn test_add_with_bad_sex_is_validation_error() {
    let stable = Stable::new();

    stable
        .cmd()
        .args(["horse", "add", "--name", "Odd", "--dob", "2015-01-01", "--sex", "GELDING"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Horse sex should be either MALE or FEMALE"));
}

#[test]
fn test_add_with_lowercase_sex_is_validation_error() {
    let stable = Stable::new();

    stable
        .cmd()
        .args(["horse", "add", "--name", "Odd", "--dob", "2015-01-01", "--sex", "female"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Horse sex should be either MALE or FEMALE"));
}

#[test]
fn test_male_mother_is_conflict() {
    let stable = Stable::seeded();

    stable
        .cmd()
        .args(["horse", "add", "--name", "Foal", "--dob", "2022-04-01", "--sex", "MALE"])
        .args(["--mother", "-4"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Mother has to be female"));
}

#[test]
fn test_parent_younger_than_child_is_conflict() {
    let stable = Stable::seeded();

    // Candy was born 2020-10-10
    stable
        .cmd()
        .args(["horse", "add", "--name", "Foal", "--dob", "2015-04-01", "--sex", "MALE"])
        .args(["--father", "-2"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains(
            "Horse father cannot be younger than the horse itself",
        ));
}

#[test]
fn test_unknown_parent_is_not_found() {
    let stable = Stable::seeded();

    stable
        .cmd()
        .args(["horse", "add", "--name", "Foal", "--dob", "2022-04-01", "--sex", "MALE"])
        .args(["--mother", "404"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("No horse with ID 404 found"));
}

#[test]
fn test_update_sex_of_parent_is_conflict() {
    let stable = Stable::seeded();

    stable
        .cmd()
        .args(["horse", "update", "-1", "--sex", "MALE"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Validation of horse for update failed"))
        .stderr(predicate::str::contains(
            "Horse is already a parent of Luna (id -5). Cannot change sex",
        ));
}

#[test]
fn test_update_clears_references() {
    let stable = Stable::seeded();

    stable
        .cmd()
        .args(["horse", "update", "-5", "--clear-mother", "--description", "Bay mare"])
        .assert()
        .success();

    let detail = stable.json(&["horse", "get", "-5"]);
    assert!(detail.get("mother_id").is_none());
    assert_eq!(detail["father_id"], -4);
    assert_eq!(detail["description"], "Bay mare");
    assert_eq!(detail["name"], "Luna");
}

#[test]
fn test_get_unknown_horse_is_not_found() {
    let stable = Stable::new();

    stable
        .cmd()
        .args(["horse", "get", "0"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("No horse with ID 0 found"));
}

#[test]
fn test_delete_horse() {
    let stable = Stable::seeded();

    stable
        .cmd()
        .args(["horse", "delete", "-2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted horse -2"));

    stable.cmd().args(["horse", "get", "-2"]).assert().code(4);
    stable.cmd().args(["horse", "delete", "-2"]).assert().code(4);
}

#[test]
fn test_list_filters() {
    let stable = Stable::seeded();

    let mares = stable.json(&["horse", "list", "--sex", "female"]);
    assert!(mares
        .as_array()
        .unwrap()
        .iter()
        .all(|h| h["sex"] == "FEMALE"));

    let gwe = stable.json(&["horse", "list", "--name", "Gwe", "--limit", "5"]);
    assert_eq!(gwe.as_array().unwrap().len(), 1);
    assert_eq!(gwe[0]["id"], -7);

    stable
        .cmd()
        .args(["horse", "list", "--owner-name", "lena"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bella"))
        .stdout(predicate::str::contains("Wendy").not());
}

#[test]
fn test_list_with_bad_sex_is_rejected() {
    let stable = Stable::new();

    stable
        .cmd()
        .args(["horse", "list", "--sex", "pony"])
        .assert()
        .code(2);
}

#[test]
fn test_parent_candidates() {
    let stable = Stable::seeded();

    let stallions = stable.json(&["horse", "parents", "--sex", "MALE", "--limit", "2"]);
    let items = stallions.as_array().unwrap();
    assert!(items.len() <= 2);
    assert!(items.iter().all(|h| h["sex"] == "MALE"));
}

// =============================================================================
// Family Tree Tests
// =============================================================================

#[test]
fn test_tree_of_horse_without_parents_is_just_root() {
    let stable = Stable::seeded();

    let records = stable.json(&["horse", "tree", "-2", "--generations", "2"]);
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["name"], "Candy");
    assert_eq!(records[0]["generation"], 0);
}

#[test]
fn test_tree_respects_generation_bound() {
    let stable = Stable::seeded();

    let records = stable.json(&["horse", "tree", "-7", "--generations", "1"]);
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r["generation"].as_u64().unwrap() <= 1));

    stable
        .cmd()
        .args(["horse", "tree", "-7", "--generations", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gwendy"))
        .stdout(predicate::str::contains("  mother: Luna"))
        .stdout(predicate::str::contains("    mother: Wendy"));
}

#[test]
fn test_tree_with_negative_generations_is_rejected() {
    let stable = Stable::seeded();

    stable
        .cmd()
        .args(["horse", "tree", "-7", "--generations", "-1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("non-negative"));
}

#[test]
fn test_tree_of_unknown_horse_is_not_found() {
    let stable = Stable::new();

    stable
        .cmd()
        .args(["horse", "tree", "12"])
        .assert()
        .code(4);
}

// =============================================================================
// Owner Tests
// =============================================================================

#[test]
fn test_owner_add_list_get() {
    let stable = Stable::new();

    stable
        .cmd()
        .args(["owner", "add", "--first-name", "Ada", "--last-name", "Byron"])
        .args(["--email", "ada@example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created owner: Ada Byron"));

    let owners = stable.json(&["owner", "list", "--name", "ada"]);
    let id = owners[0]["id"].as_i64().unwrap();

    stable
        .cmd()
        .args(["owner", "get", &id.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("ada@example.com"));
}

#[test]
fn test_owner_with_duplicate_email_is_rejected() {
    let stable = Stable::seeded();

    stable
        .cmd()
        .args(["owner", "add", "--first-name", "Sam", "--last-name", "Miller"])
        .args(["--email", "sarah.miller@example.com"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Validation of owner to create failed"));
}

#[test]
fn test_unknown_owner_is_not_found() {
    let stable = Stable::new();

    stable.cmd().args(["owner", "get", "-42"]).assert().code(4);
}

// =============================================================================
// Config, Import/Export and Completions Tests
// =============================================================================

#[test]
fn test_config_set_get() {
    let stable = Stable::new();

    stable
        .cmd()
        .args(["config", "set", "default_generations", "1"])
        .assert()
        .success();
    stable
        .cmd()
        .args(["config", "get", "default_generations"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1"));

    let content = fs::read_to_string(stable.config_path()).unwrap();
    assert!(content.contains("default_generations = 1"));
}

#[test]
fn test_config_default_generations_applies_to_tree() {
    let stable = Stable::seeded();
    stable
        .cmd()
        .args(["config", "set", "default_generations", "0"])
        .assert()
        .success();

    let records = stable.json(&["horse", "tree", "-7"]);
    assert_eq!(records.as_array().unwrap().len(), 1);
}

#[test]
fn test_config_format_applies_without_flag() {
    let stable = Stable::seeded();
    stable
        .cmd()
        .args(["config", "set", "format", "json"])
        .assert()
        .success();

    let output = stable.cmd().args(["owner", "get", "-1"]).output().unwrap();
    let owner: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(owner["last_name"], "Miller");
}

#[test]
fn test_config_init_uses_flags_and_unset_resets() {
    let stable = Stable::new();

    // The global --data-dir is set by every command of the stable
    stable
        .cmd()
        .args(["config", "init", "--generations", "5", "--format", "json"])
        .assert()
        .success();

    let content = fs::read_to_string(stable.config_path()).unwrap();
    assert!(content.contains("default_generations = 5"));
    assert!(content.contains("format = \"json\""));
    assert!(content.contains("data_dir = "));

    stable
        .cmd()
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    stable
        .cmd()
        .args(["config", "unset", "default_generations"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_generations = 3"));

    stable
        .cmd()
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* format = json"))
        .stdout(predicate::str::contains("  default_generations = 3"));
}

#[test]
fn test_config_init_rejects_negative_generations() {
    let stable = Stable::new();

    stable
        .cmd()
        .args(["config", "init", "--generations", "-1"])
        .assert()
        .failure();
    assert!(!stable.config_path().exists());
}

#[test]
fn test_config_unknown_key_fails() {
    let stable = Stable::new();

    stable
        .cmd()
        .args(["config", "get", "colour"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_export_import_round_trip() {
    let source = Stable::seeded();
    let export_path = source.dir.path().join("export.json");

    source
        .cmd()
        .args(["export", "--output"])
        .arg(&export_path)
        .assert()
        .success();

    let target = Stable::new();
    target
        .cmd()
        .arg("import")
        .arg(&export_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 3 owners and 11 horses"));

    // A second import needs --merge
    target.cmd().arg("import").arg(&export_path).assert().failure();
    target
        .cmd()
        .args(["import", "--merge"])
        .arg(&export_path)
        .assert()
        .success();

    let records = target.json(&["horse", "tree", "-10", "--generations", "1"]);
    assert_eq!(records.as_array().unwrap().len(), 3);
}

#[test]
fn test_completions() {
    let stable = Stable::new();

    stable
        .cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pedigree"));
}
