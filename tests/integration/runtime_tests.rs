// Executes generated bundles with node when it is installed; skipped otherwise.

use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use tinypack::core::{BuildConfig, Compiler};
use tinypack::infrastructure::MemoryFileSystemService;

fn node_available() -> bool {
    Command::new("node")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// Builds `entry` from in-memory `files` under /app and returns the bundle text.
async fn bundle(files: &[(&str, &str)], entry: &str) -> String {
    let mut fs = MemoryFileSystemService::new();
    for (path, content) in files {
        fs = fs.with_file(Path::new("/app").join(path), *content);
    }

    let config = BuildConfig::new("/app").with_entry("main", entry);
    let report = Compiler::new(config, Arc::new(fs)).compile().await.unwrap();
    report.assets.get("main.js").unwrap().clone()
}

/// Runs the bundle followed by `probe` in a fresh node process, returning stdout.
fn run_node(bundle: &str, probe: &str) -> String {
    let script = format!("{}\n{}", bundle, probe);
    let output = Command::new("node").arg("-e").arg(script).output().unwrap();
    assert!(
        output.status.success(),
        "node failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[tokio::test]
async fn test_entry_sees_dependency_exports() {
    if !node_available() {
        return;
    }
    let code = bundle(
        &[
            ("main.js", "const b = require('./b');\nglobalThis.result = b.value;"),
            ("b.js", "module.exports = { value: 42 };"),
        ],
        "main.js",
    )
    .await;

    assert_eq!(run_node(&code, "console.log(globalThis.result);"), "42");
}

#[tokio::test]
async fn test_cycle_returns_partial_exports() {
    if !node_available() {
        return;
    }
    let code = bundle(
        &[
            (
                "a.js",
                "exports.early = 'a-early';\nconst b = require('./b');\nexports.late = 'a-late';\nglobalThis.seenByB = b.sawA;",
            ),
            (
                "b.js",
                "const a = require('./a');\nexports.sawA = [a.early, a.late === undefined].join(',');",
            ),
        ],
        "a.js",
    )
    .await;

    assert_eq!(run_node(&code, "console.log(globalThis.seenByB);"), "a-early,true");
}

#[tokio::test]
async fn test_module_body_runs_once() {
    if !node_available() {
        return;
    }
    let code = bundle(
        &[
            (
                "main.js",
                "const first = require('./counter');\nconst second = require('./counter');\nglobalThis.same = first === second;",
            ),
            (
                "counter.js",
                "globalThis.runs = (globalThis.runs || 0) + 1;\nmodule.exports = {};",
            ),
        ],
        "main.js",
    )
    .await;

    assert_eq!(
        run_node(&code, "console.log(globalThis.runs, globalThis.same);"),
        "1 true"
    );
}

#[tokio::test]
async fn test_entry_scope_is_isolated() {
    if !node_available() {
        return;
    }
    let code = bundle(&[("main.js", "var leaked = 1;")], "main.js").await;

    assert_eq!(run_node(&code, "console.log(typeof leaked);"), "undefined");
}

#[tokio::test]
async fn test_hashbang_entry_runs() {
    if !node_available() {
        return;
    }
    let code = bundle(
        &[
            ("main.js", "#!/usr/bin/env node\nconst b = require('./b');\nglobalThis.result = b.value;"),
            ("b.js", "module.exports = { value: 'ran' };"),
        ],
        "main.js",
    )
    .await;

    assert_eq!(run_node(&code, "console.log(globalThis.result);"), "ran");
}

#[tokio::test]
async fn test_two_chunks_share_one_global_scope() {
    if !node_available() {
        return;
    }
    let fs = MemoryFileSystemService::new()
        .with_file("/app/a.js", "var shared = require('./value'); globalThis.fromA = shared;")
        .with_file("/app/b.js", "var shared = require('./value'); globalThis.fromB = shared;")
        .with_file("/app/value.js", "module.exports = 7;");
    let config = BuildConfig::new("/app")
        .with_entry("a", "a.js")
        .with_entry("b", "b.js");
    let report = Compiler::new(config, Arc::new(fs)).compile().await.unwrap();

    let combined = format!(
        "{}\n{}",
        report.assets.get("a.js").unwrap(),
        report.assets.get("b.js").unwrap()
    );

    assert_eq!(
        run_node(
            &combined,
            "console.log(globalThis.fromA, globalThis.fromB, typeof shared, typeof __tinypack_modules__);"
        ),
        "7 7 undefined undefined"
    );
}
