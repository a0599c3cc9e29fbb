//! Manifest generation tests
//!
//! End-to-end resolve runs over descriptor files, asserting the written
//! deployment manifest: bucket headers, pinned versions, use-bundle
//! narrowing and import-package computation.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)]
fn stowage_cmd() -> Command {
    Command::cargo_bin("stowage").unwrap()
}

const BASIC_APP: &str = r#"
application:
  name: shop.backend
  version: 2.0.0
content:
  - name: shop.core
    version: "[1.0.0,2.0.0)"
use-bundles:
  - name: logging
bundles:
  - name: shop.core
    version: 1.1.0
    imports:
      packages:
        - name: log.api
          version: "[1.0.0,2.0.0)"
"#;

const BASIC_REPO: &str = r#"
resources:
  - name: logging
    version: 1.4.0
    exports:
      packages:
        - name: log.api
          version: 1.4.0
    imports:
      packages:
        - name: sys.io
          version: "1.0.0"
  - name: sys
    version: 1.1.0
    exports:
      packages:
        - name: sys.io
          version: 1.1.0
"#;

#[test]
fn test_resolve_writes_partitioned_manifest() {
    let workspace = common::TestWorkspace::new();
    workspace.write_file("app.yaml", BASIC_APP);
    workspace.write_file("repo.yaml", BASIC_REPO);

    stowage_cmd()
        .current_dir(&workspace.path)
        .args(["resolve", "app.yaml", "-r", "repo.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolved"));

    let manifest = workspace.read_file("deployment.mf");
    assert!(manifest.contains("Manifest-Version: 1.0"));
    assert!(manifest.contains("Application-SymbolicName: shop.backend"));
    assert!(manifest.contains("Application-Version: 2.0.0"));
    assert!(manifest.contains("Deployed-Content: shop.core;deployed-version=1.1.0"));
    // logging satisfies a content import, so it is a required use-bundle
    assert!(manifest.contains("Deployed-Use-Bundle: logging;deployed-version=1.4.0"));
    // sys is dragged in by logging and lands in the shared space
    assert!(manifest.contains("Provision-Bundle: sys;deployed-version=1.1.0"));
    // the external import is written at the matched export's version
    assert!(manifest.contains("Import-Package: log.api;version=1.4.0"));
}

#[test]
fn test_resolve_custom_output_path() {
    let workspace = common::TestWorkspace::new();
    workspace.write_file("app.yaml", BASIC_APP);
    workspace.write_file("repo.yaml", BASIC_REPO);

    stowage_cmd()
        .current_dir(&workspace.path)
        .args(["resolve", "app.yaml", "-r", "repo.yaml", "-o", "out/frozen.mf"])
        .assert()
        .failure();
    // parent directories are not created implicitly

    stowage_cmd()
        .current_dir(&workspace.path)
        .args(["resolve", "app.yaml", "-r", "repo.yaml", "-o", "frozen.mf"])
        .assert()
        .success();
    assert!(workspace.file_exists("frozen.mf"));
    assert!(!workspace.file_exists("deployment.mf"));
}

#[test]
fn test_redundant_use_bundle_is_dropped() {
    let workspace = common::TestWorkspace::new();
    // content has no external imports, so the use-bundle entry is redundant
    workspace.write_file(
        "app.yaml",
        r#"
application:
  name: standalone.app
  version: 1.0.0
content:
  - name: standalone.core
use-bundles:
  - name: logging
bundles:
  - name: standalone.core
    version: 1.0.0
"#,
    );
    workspace.write_file("repo.yaml", BASIC_REPO);

    stowage_cmd()
        .current_dir(&workspace.path)
        .args(["resolve", "app.yaml", "-r", "repo.yaml"])
        .assert()
        .success();

    let manifest = workspace.read_file("deployment.mf");
    assert!(manifest.contains("Deployed-Content: standalone.core;deployed-version=1.0.0"));
    assert!(!manifest.contains("Deployed-Use-Bundle"));
    assert!(!manifest.contains("logging"));
}

#[test]
fn test_two_api_versions_split_across_isolation_boundary() {
    let workspace = common::TestWorkspace::new();
    // The archive carries api 1.1.0 as isolated content; the repository also
    // offers api 1.0.0, which only the legacy package pulls in. Both versions
    // deploy: 1.1.0 isolated, 1.0.0 provisioned.
    workspace.write_file(
        "app.yaml",
        r#"
application:
  name: shop.backend
  version: 1.0.0
content:
  - name: api
    version: "[1.1.0,1.1.0]"
  - name: consumer
  - name: provider
bundles:
  - name: api
    version: 1.1.0
    exports:
      packages:
        - name: api
          version: 1.1.0
  - name: consumer
    version: 1.0.0
    imports:
      packages:
        - name: api
          version: "[1.0.0,2.0.0]"
        - name: api.legacy
          version: "[1.0.0,1.1.0)"
  - name: provider
    version: 1.0.0
    exports:
      packages:
        - name: api
          version: 1.0.5
"#,
    );
    workspace.write_file(
        "repo.yaml",
        r#"
resources:
  - name: api
    version: 1.0.0
    exports:
      packages:
        - name: api
          version: 1.0.0
        - name: api.legacy
          version: 1.0.0
"#,
    );

    stowage_cmd()
        .current_dir(&workspace.path)
        .args(["resolve", "app.yaml", "-r", "repo.yaml"])
        .assert()
        .success();

    let manifest = workspace.read_file("deployment.mf");
    assert!(manifest.contains("api;deployed-version=1.1.0"));
    assert!(manifest.contains("Provision-Bundle: api;deployed-version=1.0.0"));
    let content_line = manifest
        .lines()
        .find(|line| line.starts_with("Deployed-Content: "))
        .unwrap();
    assert!(content_line.contains("api;deployed-version=1.1.0"));
    assert!(content_line.contains("consumer;deployed-version=1.0.0"));
    assert!(content_line.contains("provider;deployed-version=1.0.0"));
    assert!(!content_line.contains("deployed-version=1.0.0,api"));
}

#[test]
fn test_import_service_header_for_unsatisfied_singular_import() {
    let workspace = common::TestWorkspace::new();
    workspace.write_file(
        "app.yaml",
        r#"
application:
  name: svc.app
  version: 1.0.0
content:
  - name: svc.core
import-services:
  - name: payments
bundles:
  - name: svc.core
    version: 1.0.0
    imports:
      services:
        - name: events
"#,
    );
    workspace.write_file("repo.yaml", "resources: []\n");

    stowage_cmd()
        .current_dir(&workspace.path)
        .args(["resolve", "app.yaml", "-r", "repo.yaml"])
        .assert()
        .failure()
        // nothing exports the events service, not even the stub
        .stderr(predicate::str::contains("Unable to resolve service events"));

    // declaring the import makes the stub provide it; the singular import is
    // then satisfied within the isolated content and the deployment succeeds
    workspace.write_file(
        "app.yaml",
        r#"
application:
  name: svc.app
  version: 1.0.0
content:
  - name: svc.core
import-services:
  - name: events
bundles:
  - name: svc.core
    version: 1.0.0
    imports:
      services:
        - name: events
"#,
    );
    stowage_cmd()
        .current_dir(&workspace.path)
        .args(["resolve", "app.yaml", "-r", "repo.yaml"])
        .assert()
        .success();
    let manifest = workspace.read_file("deployment.mf");
    assert!(!manifest.contains("Deployed-ImportService"));
}

#[test]
fn test_multiple_service_import_is_always_written() {
    let workspace = common::TestWorkspace::new();
    workspace.write_file(
        "app.yaml",
        r#"
application:
  name: svc.app
  version: 1.0.0
content:
  - name: svc.core
import-services:
  - name: events
bundles:
  - name: svc.core
    version: 1.0.0
    imports:
      services:
        - name: events
          multiple: true
"#,
    );
    workspace.write_file("repo.yaml", "resources: []\n");

    stowage_cmd()
        .current_dir(&workspace.path)
        .args(["resolve", "app.yaml", "-r", "repo.yaml"])
        .assert()
        .success();

    let manifest = workspace.read_file("deployment.mf");
    assert!(manifest.contains("Deployed-ImportService: events;multiple:=true"));
}

#[test]
fn test_check_reports_partition_without_writing() {
    let workspace = common::TestWorkspace::new();
    workspace.write_file("app.yaml", BASIC_APP);
    workspace.write_file("repo.yaml", BASIC_REPO);

    stowage_cmd()
        .current_dir(&workspace.path)
        .args(["check", "app.yaml", "-r", "repo.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shop.core_1.1.0"))
        .stdout(predicate::str::contains("logging_1.4.0"))
        .stdout(predicate::str::contains("sys_1.1.0"));

    assert!(!workspace.file_exists("deployment.mf"));
}

#[test]
fn test_resolve_with_constraint_pins_version() {
    let workspace = common::TestWorkspace::new();
    workspace.write_file("app.yaml", BASIC_APP);
    // two logging versions; the constraint pins the older one
    workspace.write_file(
        "repo.yaml",
        r#"
resources:
  - name: logging
    version: 1.2.0
    exports:
      packages:
        - name: log.api
          version: 1.2.0
  - name: logging
    version: 1.4.0
    exports:
      packages:
        - name: log.api
          version: 1.4.0
"#,
    );

    stowage_cmd()
        .current_dir(&workspace.path)
        .args([
            "resolve",
            "app.yaml",
            "-r",
            "repo.yaml",
            "-c",
            "logging=1.2.0",
        ])
        .assert()
        .success();

    let manifest = workspace.read_file("deployment.mf");
    assert!(manifest.contains("logging;deployed-version=1.2.0"));
    assert!(!manifest.contains("logging;deployed-version=1.4.0"));
}

#[test]
fn test_manifest_is_deterministic_across_runs() {
    let workspace = common::TestWorkspace::new();
    workspace.write_file("app.yaml", BASIC_APP);
    workspace.write_file("repo.yaml", BASIC_REPO);

    stowage_cmd()
        .current_dir(&workspace.path)
        .args(["resolve", "app.yaml", "-r", "repo.yaml", "-o", "first.mf"])
        .assert()
        .success();
    stowage_cmd()
        .current_dir(&workspace.path)
        .args(["resolve", "app.yaml", "-r", "repo.yaml", "-o", "second.mf"])
        .assert()
        .success();

    assert_eq!(workspace.read_file("first.mf"), workspace.read_file("second.mf"));
}
