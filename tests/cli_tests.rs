//! Integration tests for the CLI interface
//!
//! Runs the binary against temporary application directories.

mod common;

use assert_cmd::Command;
use common::{TestContextBuilder, DATABASE_CONFIG};
use predicates::prelude::*;

fn gae_setup() -> Command {
    Command::cargo_bin("gae-setup").unwrap()
}

#[test]
fn test_cli_help_flag() {
    gae_setup()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("configure"))
        .stdout(predicate::str::contains("restore"));
}

#[test]
fn test_invalid_command() {
    gae_setup()
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_configure_application() {
    let ctx = TestContextBuilder::new().unwrap().with_lumen_app().build().unwrap();

    gae_setup()
        .arg("configure")
        .arg("--path")
        .arg(ctx.path())
        .args(["--app-id", "my-app", "--generate-config"])
        .args(["--db-socket", "/cloudsql/my-app:sql", "--db-name", "lumen"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created the \".env.production\" file."))
        .stdout(predicate::str::contains("Generated the \"app.yaml\" file."));

    assert!(ctx
        .read_file(".env.production")
        .unwrap()
        .contains("CLOUD_SQL_SOCKET=/cloudsql/my-app:sql\n"));
    assert!(ctx.file_exists("config/database.php.bak"));
    assert!(ctx.file_exists("php.ini"));
}

#[test]
fn test_configure_reads_options_file() {
    let ctx = TestContextBuilder::new()
        .unwrap()
        .with_lumen_app()
        .with_file("gae-setup.toml", "app_id = \"from-file\"\ngenerate_config = true\n")
        .build()
        .unwrap();

    gae_setup()
        .arg("configure")
        .arg("--path")
        .arg(ctx.path())
        .assert()
        .success();

    assert!(ctx.read_file("app.yaml").unwrap().contains("from-file"));
}

#[test]
fn test_configure_flag_turns_off_generation_from_file() {
    let ctx = TestContextBuilder::new()
        .unwrap()
        .with_lumen_app()
        .with_file("gae-setup.toml", "app_id = \"from-file\"\ngenerate_config = true\n")
        .build()
        .unwrap();

    gae_setup()
        .arg("configure")
        .arg("--path")
        .arg(ctx.path())
        .arg("--no-generate-config")
        .assert()
        .success();

    assert!(!ctx.file_exists("app.yaml"));
    assert!(!ctx.file_exists("php.ini"));
    assert!(ctx.file_exists(".env.production"));
}

#[test]
fn test_configure_rejects_line_break_in_db_name() {
    let ctx = TestContextBuilder::new().unwrap().with_lumen_app().build().unwrap();

    gae_setup()
        .arg("configure")
        .arg("--path")
        .arg(ctx.path())
        .args(["--db-name", "mydb\nAPP_DEBUG=true"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("db_name must not contain line breaks"));

    assert!(!ctx.file_exists(".env.production"));
}

#[test]
fn test_configure_without_app_id_for_generation() {
    let ctx = TestContextBuilder::new().unwrap().with_lumen_app().build().unwrap();

    gae_setup()
        .arg("configure")
        .arg("--path")
        .arg(ctx.path())
        .arg("--generate-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("application id is required"));

    assert!(!ctx.file_exists(".env.production"));
}

#[test]
fn test_configure_missing_directory() {
    let ctx = TestContextBuilder::new().unwrap().build().unwrap();

    gae_setup()
        .arg("configure")
        .arg("--path")
        .arg(ctx.path().join("nowhere"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_process_and_restore() {
    let ctx = TestContextBuilder::new()
        .unwrap()
        .with_file("config/database.php", DATABASE_CONFIG)
        .build()
        .unwrap();
    let target = ctx.path().join("config/database.php");

    gae_setup()
        .arg("process")
        .arg(&target)
        .args(["--rule", "add-cloud-sql-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added Cloud SQL driver configuration"));
    assert!(ctx
        .read_file("config/database.php")
        .unwrap()
        .contains("'cloudsql' => ["));

    gae_setup()
        .arg("backups")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("database.php.bak"));

    gae_setup()
        .arg("restore")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored"));

    assert_eq!(ctx.read_file("config/database.php").unwrap(), DATABASE_CONFIG);
    assert!(!ctx.file_exists("config/database.php.bak"));
}

#[test]
fn test_restore_without_backup_leaves_file() {
    let ctx = TestContextBuilder::new()
        .unwrap()
        .with_file("config/queue.php", "<?php\n")
        .build()
        .unwrap();

    gae_setup()
        .arg("restore")
        .arg(ctx.path().join("config/queue.php"))
        .assert()
        .success();

    assert_eq!(ctx.read_file("config/queue.php").unwrap(), "<?php\n");
}

#[test]
fn test_process_rejects_unknown_rule() {
    gae_setup()
        .args(["process", "app.php", "--rule", "add-redis"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown rule 'add-redis'"));
}
