//! Batch driver tests: files on disk in, generated files on disk out.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use codesplice::cli::commands::builtin_registry;
use codesplice::{GenerateConfig, LineEnding, ProjectError, ProjectGenerator, SourceFile};
use codesplice_core::{Compilation, DiagnosticBag};

const LIBRARY: &str = r#"
#[Generator("codesplice.generators.DuplicateWithSuffix, codesplice.generators")]
pub struct DuplicateAttribute;

#[Generator("codesplice.generators.Missing, nowhere")]
pub struct BrokenAttribute;
"#;

fn write(dir: &Path, name: &str, text: &str) -> SourceFile {
    let path = dir.join(name);
    fs::write(&path, text).expect("write input");
    codesplice::read_source(&path).expect("parse input")
}

fn compile(sources: &[SourceFile]) -> Arc<Compilation> {
    let library = SourceFile::parse("acme.rs", LIBRARY.to_string()).expect("library parses");
    let mut builder = Compilation::builder("App");
    builder.add_module_source("Acme", &library.syntax);
    for source in sources {
        builder.add_source(&source.syntax);
    }
    Arc::new(builder.build())
}

#[tokio::test]
async fn writes_one_output_per_generating_input() {
    let dir = tempfile::tempdir().expect("tempdir");
    let sources = vec![
        write(dir.path(), "point.rs", "use std::fmt;\n#[Duplicate]\npub struct Point;\n"),
        write(dir.path(), "plain.rs", "pub struct Plain;\n"),
    ];
    let out = dir.path().join("gen");
    let list = dir.path().join("generated.txt");
    let registry = builtin_registry();
    let diagnostics = DiagnosticBag::new();

    let summary = ProjectGenerator::new(&out, compile(&sources), &registry, &diagnostics)
        .with_config(GenerateConfig::new().with_line_ending(LineEnding::Lf))
        .with_generated_files_list(&list)
        .generate(&sources)
        .await
        .expect("generated");

    let expected = out.join("point.generated.rs");
    assert_eq!(summary.outputs, vec![expected.clone()]);
    assert!(summary.failed.is_empty());
    assert!(!out.join("plain.generated.rs").exists());

    let text = fs::read_to_string(&expected).expect("output written");
    assert!(text.starts_with("// ----"));
    assert!(text.contains("use std::fmt;"));
    assert!(text.contains("pub struct PointCopy;"));
    assert!(!text.contains('\r'));

    let listed = fs::read_to_string(&list).expect("list written");
    assert_eq!(listed, format!("{}\n", expected.display()));
}

#[tokio::test]
async fn failing_file_is_reported_and_others_still_generate() {
    let dir = tempfile::tempdir().expect("tempdir");
    let sources = vec![
        write(dir.path(), "bad.rs", "#[Broken]\nfn f() {}\n"),
        write(dir.path(), "good.rs", "#[Duplicate(\"Again\")]\nfn g() {}\n"),
    ];
    let out = dir.path().join("gen");
    let registry = builtin_registry();
    let diagnostics = DiagnosticBag::new();

    let result = ProjectGenerator::new(&out, compile(&sources), &registry, &diagnostics)
        .generate(&sources)
        .await;
    assert!(matches!(result, Err(ProjectError::FilesFailed { failed: 1, total: 2 })));

    let good = fs::read_to_string(out.join("good.generated.rs")).expect("good output");
    assert!(good.contains("fn gAgain()"));
    assert!(!out.join("bad.generated.rs").exists());

    let errors: Vec<_> = diagnostics.entries().into_iter().filter(|d| d.is_error()).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code.as_deref(), Some("CSG0001"));
    assert!(errors[0].message.contains("bad.rs"));
    assert!(errors[0].message.contains("nowhere"));
}

#[tokio::test]
async fn unchanged_output_is_not_rewritten() {
    let dir = tempfile::tempdir().expect("tempdir");
    let sources = vec![write(dir.path(), "point.rs", "#[Duplicate]\npub struct Point;\n")];
    let out = dir.path().join("gen");
    let registry = builtin_registry();
    let diagnostics = DiagnosticBag::new();
    let generator = ProjectGenerator::new(&out, compile(&sources), &registry, &diagnostics);

    generator.generate(&sources).await.expect("first run");
    let output = generator.output_path(&sources[0]);
    let first = fs::metadata(&output).and_then(|m| m.modified()).expect("mtime");
    std::thread::sleep(std::time::Duration::from_millis(20));
    generator.generate(&sources).await.expect("second run");
    let second = fs::metadata(&output).and_then(|m| m.modified()).expect("mtime");
    assert_eq!(first, second);
}

#[tokio::test]
async fn colliding_output_names_fail_the_second_input() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir(dir.path().join("a")).expect("mkdir");
    fs::create_dir(dir.path().join("b")).expect("mkdir");
    let sources = vec![
        write(&dir.path().join("a"), "same.rs", "#[Duplicate]\nfn f() {}\n"),
        write(&dir.path().join("b"), "same.rs", "#[Duplicate]\nfn g() {}\n"),
    ];
    let registry = builtin_registry();
    let diagnostics = DiagnosticBag::new();

    let result = ProjectGenerator::new(dir.path().join("gen"), compile(&sources), &registry, &diagnostics)
        .generate(&sources)
        .await;
    assert!(matches!(result, Err(ProjectError::FilesFailed { failed: 1, total: 2 })));
}
