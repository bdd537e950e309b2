use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const SAMPLE_TESTS: &str = r#"#include "simulant/test.h"

namespace {

class BaseFixture : public smlt::test::SimulantTestCase {
public:
    void set_up() {}
};

class SampleTest : public BaseFixture {
public:
    void test_one() {
        assert_true(true);
    }

    void test_two();
};

}
"#;

#[allow(deprecated)]
fn declscan(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("declscan").expect("binary");
    cmd.current_dir(workdir).env_remove("RUST_LOG");
    cmd
}

#[test]
fn list_tests_prints_qualified_names() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("test_sample.h"), SAMPLE_TESTS).unwrap();

    declscan(dir.path())
        .args(["generate-harness", "--list-tests", "test_sample.h"])
        .assert()
        .success()
        .stdout("SampleTest::test_one\nSampleTest::test_two\n");

    assert!(!dir.path().join("main.cpp").exists());
}

#[test]
fn verbose_logs_harvested_methods_and_written_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("test_sample.h"), SAMPLE_TESTS).unwrap();

    declscan(dir.path())
        .args(["-v", "generate-harness", "--output", "main.cpp", "test_sample.h"])
        .assert()
        .success()
        .stderr(predicate::str::contains("harvested SampleTest::test_one"))
        .stderr(predicate::str::contains("harvested SampleTest::test_two"))
        .stderr(predicate::str::contains("wrote main.cpp"));
}

#[test]
fn rust_log_overrides_verbose() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("test_sample.h"), SAMPLE_TESTS).unwrap();

    declscan(dir.path())
        .env("RUST_LOG", "warn")
        .args(["-v", "generate-harness", "--list-tests", "test_sample.h"])
        .assert()
        .success()
        .stderr(predicate::str::contains("harvested").not());
}

#[test]
fn list_tests_is_stable_across_runs() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.h"), SAMPLE_TESTS).unwrap();
    fs::write(
        dir.path().join("b.h"),
        "class Other : public TestCase { void test_z() {} };\n",
    )
    .unwrap();

    let run = || {
        declscan(dir.path())
            .args(["generate-harness", "--list-tests", "a.h", "b.h"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn harness_requires_output() {
    let dir = tempdir().unwrap();

    declscan(dir.path())
        .args(["generate-harness", "does_not_exist.h"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--output"));
}

#[test]
fn harness_is_written_to_output() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("test_sample.h"), SAMPLE_TESTS).unwrap();

    declscan(dir.path())
        .args([
            "generate-harness",
            "--output",
            "build/main.cpp",
            "--verbose",
            "test_sample.h",
        ])
        .assert()
        .success();

    let main = fs::read_to_string(dir.path().join("build/main.cpp")).unwrap();
    assert!(main.contains("#include \"test_sample.h\""));
    assert!(main.contains("runner->register_case<BaseFixture>("));
    assert!(main.contains("runner->register_case<SampleTest>("));
    assert!(main.contains("{&SampleTest::test_one, &SampleTest::test_two}"));
}

#[test]
fn unbalanced_file_is_reported_but_others_are_generated() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("good.h"), SAMPLE_TESTS).unwrap();
    fs::write(
        dir.path().join("bad.h"),
        "class Bad : public TestCase {\n    void test_x() {\n",
    )
    .unwrap();

    declscan(dir.path())
        .args(["--no-color", "generate-harness", "--output", "main.cpp", "bad.h", "good.h"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unbalanced block"))
        .stderr(predicate::str::contains("bad.h"));

    let main = fs::read_to_string(dir.path().join("main.cpp")).unwrap();
    assert!(main.contains("register_case<SampleTest>"));
    assert!(!main.contains("Bad"));
}

#[test]
fn no_tests_found_still_writes_empty_harness() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("plain.h"), "struct Point { int x; };\n").unwrap();

    declscan(dir.path())
        .args(["generate-harness", "--output", "main.cpp", "plain.h"])
        .assert()
        .success();

    let main = fs::read_to_string(dir.path().join("main.cpp")).unwrap();
    assert!(main.contains("return 0;"));
    assert!(!main.contains("register_case"));
}

#[test]
fn config_file_changes_roots() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("declscan.toml"),
        "[harness]\nroot_names = [\"Fixture\"]\ntest_prefix = \"check_\"\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("custom.h"),
        "class Mine : public Fixture {\n    void check_it() {}\n    void test_not() {}\n};\n",
    )
    .unwrap();

    declscan(dir.path())
        .args([
            "--config",
            "declscan.toml",
            "generate-harness",
            "--list-tests",
            "custom.h",
        ])
        .assert()
        .success()
        .stdout("Mine::check_it\n");
}

#[test]
fn invalid_config_is_fatal() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("bad.toml"), "[harness]\nunknown = 1\n").unwrap();

    declscan(dir.path())
        .args(["--config", "bad.toml", "generate-harness", "--list-tests", "x.h"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid config"));
}

#[test]
fn wrappers_mirror_the_source_tree() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("include");
    fs::create_dir_all(src.join("scenes")).unwrap();
    fs::write(
        src.join("scenes/scene.h"),
        "#pragma once\n\nclass Scene {\npublic:\n    void load();\n};\n",
    )
    .unwrap();

    declscan(dir.path())
        .args(["generate-wrappers", "include", "out"])
        .assert()
        .success();

    let header = fs::read_to_string(dir.path().join("out/scenes/scene.h")).unwrap();
    let source = fs::read_to_string(dir.path().join("out/scenes/scene.cpp")).unwrap();
    assert_eq!(header.matches("smlt_scene_create();").count(), 1);
    assert_eq!(header.matches("smlt_scene_destroy(smlt_scene_t* scene);").count(), 1);
    assert!(source.contains("#include \"./scenes/scene.h\""));
}

#[test]
fn list_declarations_shows_scopes() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("api.h"),
        "int version();\nclass Engine : public Base {\npublic:\n    bool start(int flags);\n};\n",
    )
    .unwrap();

    declscan(dir.path())
        .args(["list-declarations", "api.h"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  class Engine : Base  (line 2)"))
        .stdout(predicate::str::contains("  int version()  [<file scope>]  (line 1)"))
        .stdout(predicate::str::contains("  bool start(int flags)  [Engine]  (line 4)"));
}
