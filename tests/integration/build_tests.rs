use regex::Regex;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;
use tinypack::core::{BuildConfig, Compiler, TransformRule};
use tinypack::infrastructure::TokioFileSystemService;
use tinypack::plugins::{builtin_registry, JsonTransform, StatsPlugin};
use tinypack::utils::{CliOverrides, ConfigLoader, CONFIG_FILE_NAME};
use tinypack::TinypackError;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

#[tokio::test]
async fn test_simple_project_build() {
    let project = tempdir().unwrap();
    let root = project.path();
    write(root, "main.js", "const b = require('./b');\nconsole.log(b.value);\n");
    write(root, "b.js", "module.exports = { value: 42 };\n");

    let config = BuildConfig::new(root)
        .with_entry("main", "main.js")
        .with_output("dist", "[name].js");
    let compiler = Compiler::new(config, Arc::new(TokioFileSystemService));

    let report = compiler.run().await.expect("build should succeed");

    let ids: Vec<&str> = report.modules.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["./main.js", "./b.js"]);
    assert_eq!(report.chunks.len(), 1);
    assert_eq!(report.chunks[0].name, "main");
    assert_eq!(report.files, vec!["main.js"]);

    let bundle = std::fs::read_to_string(root.join("dist/main.js")).unwrap();
    assert_eq!(&bundle, report.assets.get("main.js").unwrap());
    assert_eq!(bundle.matches("(module, exports, __tinypack_require__) =>").count(), 2);
    assert!(bundle.contains("const b = __tinypack_require__(\"./b.js\");"));
}

#[tokio::test]
async fn test_missing_module_aborts_without_output() {
    let project = tempdir().unwrap();
    let root = project.path();
    write(root, "src/main.js", "require('./missing');\n");

    let config = BuildConfig::new(root).with_entry("main", "src/main.js");
    let compiler = Compiler::new(config, Arc::new(TokioFileSystemService));

    let err = compiler.run().await.unwrap_err();

    match &err {
        TinypackError::Resolution { specifier, directory } => {
            assert_eq!(specifier, "./missing");
            assert!(directory.ends_with("src"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!root.join("dist").exists());
}

#[tokio::test]
async fn test_two_entries_share_module() {
    let project = tempdir().unwrap();
    let root = project.path();
    write(root, "a.js", "require('./util').log('a');\n");
    write(root, "b.js", "require('./util').log('b');\n");
    write(root, "util.js", "exports.log = (x) => console.log(x);\n");

    let config = BuildConfig::new(root)
        .with_entry("a", "a.js")
        .with_entry("b", "b.js");
    let report = Compiler::new(config, Arc::new(TokioFileSystemService))
        .run()
        .await
        .unwrap();

    let util: Vec<_> = report.modules.iter().filter(|m| m.id == "./util.js").collect();
    assert_eq!(util.len(), 1);
    assert_eq!(util[0].owning_entries.iter().collect::<Vec<_>>(), vec!["a", "b"]);
    for name in ["a", "b"] {
        let chunk = report.chunk(name).unwrap();
        assert!(chunk.module_ids().any(|id| id == "./util.js"));
    }
    assert!(root.join("dist/a.js").is_file());
    assert!(root.join("dist/b.js").is_file());
}

#[tokio::test]
async fn test_builds_are_byte_identical() {
    let project = tempdir().unwrap();
    let root = project.path();
    write(root, "src/index.js", "const x = require('./lib/x');\nconst y = require('./lib/y');\n");
    write(root, "src/lib/x.js", "module.exports = require('./y') + 1;\n");
    write(root, "src/lib/y.js", "module.exports = 1;\n");

    let config = BuildConfig::new(root).with_entry("main", "src/index.js");
    let compiler = Compiler::new(config, Arc::new(TokioFileSystemService));

    let first = compiler.compile().await.unwrap();
    let second = compiler.compile().await.unwrap();
    assert_eq!(first.assets, second.assets);
    assert_eq!(first.modules.len(), 3);
}

#[tokio::test]
async fn test_json_loader_rule() {
    let project = tempdir().unwrap();
    let root = project.path();
    write(root, "main.js", "const data = require('./data');\n");
    write(root, "data.json", "{ \"value\": 42 }");

    let rule = TransformRule::new(Regex::new(r"\.json$").unwrap(), Arc::new(JsonTransform));
    let config = BuildConfig::new(root).with_entry("main", "main.js").with_rule(rule);
    let report = Compiler::new(config, Arc::new(TokioFileSystemService))
        .compile()
        .await
        .unwrap();

    let data = report.module("./data.json").unwrap();
    assert_eq!(data.source, "module.exports = {\"value\":42};");
}

#[tokio::test]
async fn test_json_without_loader_is_parse_error() {
    let project = tempdir().unwrap();
    let root = project.path();
    write(root, "main.js", "require('./data');\n");
    write(root, "data.json", "{ \"value\": 42 }");

    let config = BuildConfig::new(root).with_entry("main", "main.js");
    let err = Compiler::new(config, Arc::new(TokioFileSystemService))
        .compile()
        .await
        .unwrap_err();

    assert!(matches!(err, TinypackError::Parse { .. }));
}

#[tokio::test]
async fn test_config_file_project() {
    let project = tempdir().unwrap();
    let root = project.path();
    write(root, "src/admin.js", "require('./shared');\n");
    write(root, "src/app.js", "require('./shared');\n");
    write(root, "src/shared.js", "module.exports = 'shared';\n");
    write(
        root,
        CONFIG_FILE_NAME,
        r#"{
            "entry": { "admin": "./src/admin.js", "app": "./src/app.js" },
            "output": { "path": "build", "filename": "[name].bundle.js" },
            "module": { "rules": [{ "test": "src/.*\\.js$", "loader": "banner" }] },
            "banner": "/*! tinypack test */"
        }"#,
    );

    let file_config = ConfigLoader::find(root).unwrap();
    let banner = file_config.as_ref().and_then(|c| c.banner.clone());
    let config = ConfigLoader::merge_with_cli(
        file_config,
        CliOverrides::default(),
        root,
        &builtin_registry(banner.as_deref()),
    )
    .unwrap();

    let stats = Arc::new(StatsPlugin::new(false));
    let report = Compiler::new(config, Arc::new(TokioFileSystemService))
        .with_plugin(stats.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(report.files, vec!["admin.bundle.js", "app.bundle.js"]);
    assert!(root.join("build/admin.bundle.js").is_file());
    assert!(report.module("./src/shared.js").unwrap().source.starts_with("/*! tinypack test */"));
    assert_eq!(stats.phases().len(), 2);
}
