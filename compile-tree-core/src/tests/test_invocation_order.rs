use super::{os, touch, StubRunner};
use crate::{
    CompileInvoker, CompileRequest, Compiler, CompilerInvocation, SourceFileSet,
    DESTINATION_FLAG,
};
use pretty_assertions::assert_eq;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[test]
fn test_destination_then_options_then_sources() {
    let compiler = Compiler::new("/jdk/bin/javac");
    let sources: SourceFileSet = ["/src/A.src", "/src/B.src"].iter().map(PathBuf::from).collect();

    let invocation = CompilerInvocation::new(
        &compiler,
        Path::new("/out"),
        &["-Xlint:none".to_string()],
        &sources,
    );

    assert_eq!(
        invocation.argv(),
        os(&["/jdk/bin/javac", "-d", "/out", "-Xlint:none", "/src/A.src", "/src/B.src"])
    );
    assert_eq!(
        invocation.to_string(),
        "/jdk/bin/javac -d /out -Xlint:none /src/A.src /src/B.src"
    );
}

#[test]
fn test_options_keep_caller_order() {
    let compiler = Compiler::new("javac");
    let options: Vec<String> = ["-g", "-encoding", "UTF-8", "-Werror"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let invocation =
        CompilerInvocation::new(&compiler, Path::new("out"), &options, &SourceFileSet::new());

    assert_eq!(invocation.program(), Path::new("javac"));
    assert_eq!(
        invocation.arguments(),
        os(&["-d", "out", "-g", "-encoding", "UTF-8", "-Werror"]).as_slice()
    );
}

#[test]
fn test_empty_source_set_has_no_file_arguments() {
    let invocation = CompilerInvocation::new(
        &Compiler::new("javac"),
        Path::new("out"),
        &[],
        &SourceFileSet::new(),
    );
    assert_eq!(invocation.arguments(), os(&[DESTINATION_FLAG, "out"]).as_slice());
}

#[test]
fn test_invoker_dry_run_matches_scanned_order() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src");
    touch(&src, "B.src");
    touch(&src, "A.src");
    let dest = dir.path().join("classes");

    let runner = StubRunner::exiting_with(0, "", "");
    let invoker = CompileInvoker::new(Some(Compiler::new("/jdk/bin/javac")), &runner)
        .with_source_suffix(".src");
    let request = CompileRequest::new(&src, &dest).option("-Xlint:none");

    let invocation = invoker.invocation(&request).unwrap();

    let expected: Vec<OsString> = vec![
        "/jdk/bin/javac".into(),
        "-d".into(),
        dest.clone().into_os_string(),
        "-Xlint:none".into(),
        src.join("A.src").into_os_string(),
        src.join("B.src").into_os_string(),
    ];
    assert_eq!(invocation.argv(), expected);

    // A dry run neither creates the destination nor runs anything
    assert!(!dest.exists());
    assert!(runner.calls().is_empty());
}
