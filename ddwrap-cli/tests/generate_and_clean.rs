use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;

const SERVICE: &str = r#"service: shop
provider:
  name: aws
  runtime: python3.8
functions:
  checkout:
    handler: shop/checkout.handle
  search:
    handler: src/search.query
    runtime: nodejs12.x
  broken:
    handler: not-a-handler
package:
  include:
    - shop/**
"#;

fn ddwrap_cmd(cwd: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ddwrap"));
    cmd.current_dir(cwd).env_remove("RUST_LOG");
    cmd
}

fn service_dir() -> assert_fs::TempDir {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    dir.child("serverless.yml").write_str(SERVICE).expect("write config");
    dir
}

#[test]
fn generate_writes_wrappers_and_updated_config() {
    let dir = service_dir();
    dir.child("datadog_handlers/unused-file").write_str("stale").expect("seed");

    ddwrap_cmd(dir.path())
        .args(["generate", "--output", "out/serverless.yml"])
        .assert()
        .success()
        .stdout(contains("2 wrapper(s) generated, 1 skipped"))
        .stdout(contains("datadog_handlers/checkout.py"))
        .stdout(contains("broken"));

    dir.child("datadog_handlers/checkout.py")
        .assert(contains("from shop.checkout import handle as handle_impl"));
    dir.child("datadog_handlers/search.js")
        .assert(contains("require(\"../src/search\")"));
    dir.child("datadog_handlers/unused-file").assert(predicate::path::missing());
    dir.child("datadog_handlers/broken.py").assert(predicate::path::missing());

    let saved = fs::read_to_string(dir.path().join("out/serverless.yml")).expect("saved config");
    assert!(saved.contains("handler: datadog_handlers/checkout.handle"), "{saved}");
    assert!(saved.contains("handler: datadog_handlers/search.query"), "{saved}");
    assert!(saved.contains("handler: not-a-handler"), "{saved}");
    assert!(saved.contains("service: shop"), "{saved}");

    let include_at = |needle: &str| saved.find(needle).unwrap_or_else(|| panic!("missing {needle}"));
    assert!(include_at("shop/**") < include_at("datadog_handlers/checkout.py"));
    assert!(include_at("datadog_handlers/checkout.py") < include_at("datadog_handlers/search.js"));
    assert!(include_at("datadog_handlers/search.js") < include_at("datadog_handlers/**"));

    // The input file is never rewritten.
    dir.child("serverless.yml").assert(SERVICE);
}

#[test]
fn default_log_level_reports_writes_and_skips() {
    let dir = service_dir();
    ddwrap_cmd(dir.path())
        .arg("generate")
        .assert()
        .success()
        .stderr(contains("wrote:"))
        .stderr(contains("skipping 'broken'"));
}

#[test]
fn non_identifier_method_is_skipped() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    dir.child("serverless.yml")
        .write_str(
            "provider:\n  runtime: python3.8\nfunctions:\n  dashed:\n    handler: app.main-handler\n",
        )
        .expect("write config");

    ddwrap_cmd(dir.path())
        .arg("generate")
        .assert()
        .success()
        .stdout(contains("0 wrapper(s) generated, 1 skipped"))
        .stdout(contains("not an identifier"));
    dir.child("datadog_handlers/dashed.py").assert(predicate::path::missing());
}

#[test]
fn generate_detects_typescript_sources() {
    let dir = service_dir();
    dir.child("src/search.ts").write_str("export const query = () => 1;").expect("seed");

    ddwrap_cmd(dir.path()).arg("generate").assert().success();

    dir.child("datadog_handlers/search.ts").assert(predicate::path::exists());
    dir.child("datadog_handlers/search.js").assert(predicate::path::missing());
}

#[test]
fn typescript_flag_uses_import_syntax() {
    let dir = service_dir();

    ddwrap_cmd(dir.path())
        .args(["generate", "--typescript"])
        .assert()
        .success();

    dir.child("datadog_handlers/search.ts")
        .assert(predicate::str::starts_with("/* eslint-disable */\n// @ts-nocheck\n"));
}

#[test]
fn dry_run_touches_nothing() {
    let dir = service_dir();

    ddwrap_cmd(dir.path())
        .args(["generate", "--dry-run", "--output", "out.yml"])
        .assert()
        .success()
        .stdout(contains("[dry-run]"))
        .stdout(contains("datadog_handlers/search.js"));

    dir.child("datadog_handlers").assert(predicate::path::missing());
    dir.child("out.yml").assert(predicate::path::missing());
}

#[test]
fn missing_config_fails_with_path() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    ddwrap_cmd(dir.path())
        .arg("generate")
        .assert()
        .failure()
        .stderr(contains("serverless.yml"));
}

#[test]
fn clean_removes_wrapper_directory() {
    let dir = service_dir();
    ddwrap_cmd(dir.path()).arg("generate").assert().success();
    dir.child("datadog_handlers").assert(predicate::path::is_dir());

    ddwrap_cmd(dir.path())
        .arg("clean")
        .assert()
        .success()
        .stdout(contains("removed"));
    dir.child("datadog_handlers").assert(predicate::path::missing());

    ddwrap_cmd(dir.path())
        .arg("clean")
        .assert()
        .success()
        .stdout(contains("nothing to do"));
}
