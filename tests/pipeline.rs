mod common;

use common::{process_lock, FakeRunner};
use psbuild::builder::{build_all, build_native, publish_managed};
use psbuild::config::{Layout, ProjectConfig};
use psbuild::{BuildError, Platform};
use std::cell::Cell;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use tempfile::TempDir;

/// A scratch repository with the native source directory in place.
fn scratch_repo() -> (TempDir, Layout) {
    let tmp = tempfile::tempdir().unwrap();
    let layout = Layout::new(tmp.path(), ProjectConfig::default());
    fs::create_dir_all(layout.native_dir.join("src")).unwrap();
    (tmp, layout)
}

/// Runner whose `make -j` writes the native library, like a real build would.
fn producing_runner(artifact: &Path) -> FakeRunner {
    let artifact = artifact.to_path_buf();
    FakeRunner::new().on_run(move |inv| {
        if inv.program == "make" && inv.arg_strings() == ["-j"] {
            fs::write(&artifact, b"\x7fELF").unwrap();
        }
    })
}

#[test]
fn native_stage_is_a_noop_on_windows() {
    let _lock = process_lock();
    let (_tmp, layout) = scratch_repo();
    let runner = FakeRunner::new();

    let artifact = build_native(Platform::Windows, &layout, &runner).unwrap();

    assert!(artifact.is_none());
    assert!(runner.lookups.borrow().is_empty());
    assert!(runner.calls.borrow().is_empty());
}

#[test]
fn native_stage_runs_configure_compile_test_in_native_dir() {
    let _lock = process_lock();
    let (_tmp, layout) = scratch_repo();
    let runner = producing_runner(&layout.native_artifact(Platform::Linux));
    let before = std::env::current_dir().unwrap();

    let copied = build_native(Platform::Linux, &layout, &runner).unwrap().unwrap();

    assert_eq!(
        runner.programs(),
        vec!["cmake -DCMAKE_BUILD_TYPE=Debug .", "make -j", "make test"]
    );
    let native_dir = layout.native_dir.canonicalize().unwrap();
    for cwd in runner.cwds.borrow().iter() {
        assert_eq!(cwd.canonicalize().unwrap(), native_dir);
    }
    assert_eq!(std::env::current_dir().unwrap(), before);
    assert_eq!(copied, layout.output.join("libpsl-native.so"));
    assert!(copied.is_file());
}

#[test]
fn native_stage_fails_when_build_succeeds_without_artifact() {
    let _lock = process_lock();
    let (_tmp, layout) = scratch_repo();
    let runner = FakeRunner::new();
    let before = std::env::current_dir().unwrap();

    let err = build_native(Platform::Linux, &layout, &runner).unwrap_err();

    match err {
        BuildError::CompilationFailure { artifact, .. } => {
            assert_eq!(artifact, layout.native_artifact(Platform::Linux));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(runner.calls.borrow().len(), 3);
    assert_eq!(std::env::current_dir().unwrap(), before);
    assert!(!layout.output.join("libpsl-native.so").exists());
}

#[test]
fn unusable_output_dir_is_reported_with_its_path() {
    let _lock = process_lock();
    let (tmp, layout) = scratch_repo();
    let blocker = tmp.path().join("not-a-dir");
    fs::write(&blocker, b"").unwrap();
    let layout = layout.with_output(Some(blocker.clone()));
    let runner = producing_runner(&layout.native_artifact(Platform::Linux));

    let err = build_native(Platform::Linux, &layout, &runner).unwrap_err();

    match &err {
        BuildError::Io { path, .. } => assert_eq!(path, &blocker),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains(&blocker.display().to_string()));
}

#[test]
fn native_stage_stops_at_failing_step_and_restores_cwd() {
    let _lock = process_lock();
    let (_tmp, layout) = scratch_repo();
    let runner = FakeRunner::new().failing("make", "-j", 2);
    let before = std::env::current_dir().unwrap();

    let err = build_native(Platform::MacOs, &layout, &runner).unwrap_err();

    assert!(matches!(err, BuildError::CompilationFailure { .. }));
    assert!(err.to_string().contains("libpsl-native.dylib"));
    assert!(err.to_string().contains("exit code 2"));
    assert_eq!(runner.programs(), vec!["cmake -DCMAKE_BUILD_TYPE=Debug .", "make -j"]);
    assert_eq!(std::env::current_dir().unwrap(), before);
}

#[test]
fn native_stage_checks_toolchain_before_building() {
    let _lock = process_lock();
    let (_tmp, layout) = scratch_repo();
    let runner = FakeRunner::new().missing("g++");

    let err = build_native(Platform::Linux, &layout, &runner).unwrap_err();

    assert!(matches!(err, BuildError::MissingDependency { ref name, .. } if name == "g++"));
    assert_eq!(*runner.lookups.borrow(), vec!["cmake", "g++"]);
    assert!(runner.calls.borrow().is_empty());
}

#[test]
fn publish_failure_carries_tool_message() {
    let _lock = process_lock();
    let (_tmp, layout) = scratch_repo();
    let runner = FakeRunner::new().failing("dotnet", "publish", 1);

    let err = publish_managed(Platform::Linux, &layout, false, &runner).unwrap_err();

    assert!(matches!(err, BuildError::PublishFailure(_)));
    assert!(err.to_string().contains("exit code 1"));
}

#[test]
fn publish_restores_first_when_requested() {
    let _lock = process_lock();
    let (_tmp, layout) = scratch_repo();
    let runner = FakeRunner::new();

    publish_managed(Platform::Windows, &layout, true, &runner).unwrap();

    let calls = runner.calls.borrow();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].arg_strings()[0], "restore");
    assert_eq!(calls[1].arg_strings()[0], "publish");
    assert!(calls[1]
        .arg_strings()
        .windows(2)
        .any(|w| w[0] == "--configuration" && w[1] == "Debug"));
}

#[test]
fn missing_dotnet_blocks_publish() {
    let _lock = process_lock();
    let (_tmp, layout) = scratch_repo();
    let runner = FakeRunner::new().missing("dotnet");

    let err = publish_managed(Platform::Linux, &layout, false, &runner).unwrap_err();

    assert!(err.to_string().contains("'dotnet'"));
    assert!(runner.calls.borrow().is_empty());
}

#[test]
fn full_linux_build_publishes_over_native_output() {
    let _lock = process_lock();
    let (_tmp, layout) = scratch_repo();
    let lib_in_output = layout.output.join("libpsl-native.so");
    let artifact = layout.native_artifact(Platform::Linux);

    let seen_lib = Rc::new(Cell::new(false));
    let seen = Rc::clone(&seen_lib);
    let runner = FakeRunner::new().on_run(move |inv| {
        if inv.program == "make" && inv.arg_strings() == ["-j"] {
            fs::write(&artifact, b"\x7fELF").unwrap();
        }
        if inv.program == "dotnet" {
            seen.set(lib_in_output.is_file());
        }
    });

    build_all(Platform::Linux, &layout, false, &runner).unwrap();

    assert!(seen_lib.get(), "publish ran before the native library was copied");
    let publish = runner.call_for("dotnet", "publish").unwrap();
    let output = layout.output.display().to_string();
    let project = layout.managed_project.display().to_string();
    assert_eq!(
        publish.arg_strings(),
        vec![
            "publish",
            "--output",
            output.as_str(),
            "--configuration",
            "Linux",
            "--framework",
            "netstandardapp1.5",
            project.as_str(),
        ]
    );
}

#[test]
fn native_failure_prevents_publish() {
    let _lock = process_lock();
    let (_tmp, layout) = scratch_repo();
    let runner = FakeRunner::new();

    assert!(build_all(Platform::Linux, &layout, false, &runner).is_err());
    assert!(runner.call_for("dotnet", "publish").is_none());
    assert!(layout.output.is_dir());
}

#[test]
fn windows_build_goes_straight_to_publish() {
    let _lock = process_lock();
    let (_tmp, layout) = scratch_repo();
    let runner = FakeRunner::new();

    let native = build_all(Platform::Windows, &layout, false, &runner).unwrap();

    assert!(native.is_none());
    assert_eq!(runner.calls.borrow().len(), 1);
    assert!(runner.call_for("dotnet", "publish").is_some());
}
