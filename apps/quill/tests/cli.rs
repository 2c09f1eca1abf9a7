//! Integration tests for the quill binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// quill running inside `project`, so `.quill/` lands there
fn quill(project: &Path) -> Command {
    let mut cmd = Command::cargo_bin("quill").unwrap();
    cmd.current_dir(project)
        .env_remove("RUST_LOG")
        .env("LOG_FORMAT", "json");
    cmd
}

#[test]
fn test_languages_lists_builtins() {
    let project = TempDir::new().unwrap();
    quill(project.path())
        .arg("languages")
        .assert()
        .success()
        .stdout(predicate::str::contains("Java"))
        .stdout(predicate::str::contains("Python"))
        .stdout(predicate::str::contains("interpreted"));
}

#[test]
fn test_set_persists_and_get_reads_back() {
    let project = TempDir::new().unwrap();

    quill(project.path())
        .args(["set", "java", "javaVersion", "Java 17"])
        .assert()
        .success();

    let saved = std::fs::read_to_string(project.path().join(".quill/settings.toml")).unwrap();
    assert!(saved.contains("[java]"), "{saved}");
    assert!(saved.contains("javaVersion = \"Java 17\""), "{saved}");

    quill(project.path())
        .args(["get", "java", "javaversion"])
        .assert()
        .success()
        .stdout("Java 17\n");
}

#[test]
fn test_set_keeps_other_languages() {
    let project = TempDir::new().unwrap();

    quill(project.path())
        .args(["set", "python", "mainFile", "app.py"])
        .assert()
        .success();
    quill(project.path())
        .args(["set", "java", "execute", "yes"])
        .assert()
        .success();

    quill(project.path())
        .args(["get", "py", "mainFile"])
        .assert()
        .success()
        .stdout("app.py\n");
}

#[test]
fn test_unknown_option_is_rejected() {
    let project = TempDir::new().unwrap();
    quill(project.path())
        .args(["set", "java", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown option 'colour'"));

    assert!(!project.path().join(".quill/settings.toml").exists());
}

#[test]
fn test_options_json() {
    let project = TempDir::new().unwrap();
    let output = quill(project.path())
        .args(["options", "python", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let document: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(document["language"], "Python");
    assert_eq!(document["options"][0]["name"], "inputDirectory");
    assert_eq!(document["options"][0]["required"], true);
    assert!(document["options"][0]["value"].is_null());
}

#[test]
fn test_unconfigured_build_names_missing_setting() {
    let project = TempDir::new().unwrap();
    quill(project.path())
        .args(["build", "java", "--no-execute"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Missing required setting 'inputDirectory'",
        ));
}

#[test]
fn test_workspace_generates_java_descriptors() {
    let project = TempDir::new().unwrap();
    let install = project.path().join("jdtls");
    std::fs::create_dir_all(&install).unwrap();
    std::fs::write(
        project.path().join("quill.toml"),
        format!(
            "[project]\nname = \"demo\"\nroot = '{}'\n\n[languages.java]\nserverInstallPath = '{}'\n",
            project.path().display(),
            install.display()
        ),
    )
    .unwrap();

    quill(project.path())
        .args(["set", "java", "javaVersion", "Java 11"])
        .assert()
        .success();
    quill(project.path())
        .args(["workspace", "java", "ws"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    let workspace = project.path().join("ws");
    let prefs =
        std::fs::read_to_string(workspace.join(".settings/org.eclipse.jdt.core.prefs")).unwrap();
    assert!(prefs.contains("compiler.source=11"), "{prefs}");
    let descriptor = std::fs::read_to_string(workspace.join(".project")).unwrap();
    assert!(descriptor.contains("<name>demo</name>"), "{descriptor}");
}

#[test]
fn test_set_with_workspace_updates_descriptors() {
    let project = TempDir::new().unwrap();
    let install = project.path().join("jdtls");
    std::fs::create_dir_all(&install).unwrap();
    std::fs::write(
        project.path().join("quill.toml"),
        format!(
            "[project]\nroot = '{}'\n\n[languages.java]\nserverInstallPath = '{}'\n",
            project.path().display(),
            install.display()
        ),
    )
    .unwrap();

    quill(project.path())
        .args(["set", "java", "classOutput", "bin"])
        .assert()
        .success();
    quill(project.path())
        .args(["workspace", "java", "ws"])
        .assert()
        .success();
    quill(project.path())
        .args(["set", "java", "javaVersion", "Java 17", "--workspace", "ws"])
        .assert()
        .success();

    let workspace = project.path().join("ws");
    let prefs =
        std::fs::read_to_string(workspace.join(".settings/org.eclipse.jdt.core.prefs")).unwrap();
    assert!(prefs.contains("compiler.source=17"), "{prefs}");
    let classpath = std::fs::read_to_string(workspace.join(".classpath")).unwrap();
    assert!(classpath.contains("JavaSE-17"), "{classpath}");
    assert!(classpath.contains(r#"kind="output" path="bin""#), "{classpath}");

    quill(project.path())
        .args(["get", "java", "javaVersion"])
        .assert()
        .success()
        .stdout("Java 17\n");
}
