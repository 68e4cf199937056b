use clap::Parser;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};
use tfidf_indexer::{run, Cli};

fn cat_and_dog() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("doc1.txt"), "the cat sat on the mat").unwrap();
    fs::write(dir.path().join("doc2.txt"), "the dog sat on the log").unwrap();
    dir
}

fn run_args(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(std::iter::once("tfidf").chain(args.iter().copied()))?;
    let mut out = Vec::new();
    run(&cli, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

fn arg(p: &Path) -> String {
    p.display().to_string()
}

#[test]
fn ranks_unique_words_first() {
    let dir = cat_and_dog();
    let doc1 = dir.path().join("doc1.txt");
    let out = run_args(&[&arg(dir.path()), &arg(&doc1), "-n", "2"]).unwrap();

    let score = format!("{:?}", (1.0f64 / 6.0) * 2f64.ln());
    let expected = format!("Most important words in {}:\n  cat: {score}\n  mat: {score}\n", doc1.display());
    assert_eq!(out, expected);
}

#[test]
fn reports_every_document_when_none_requested() {
    let dir = cat_and_dog();
    let out = run_args(&[&arg(dir.path()), "--num-words", "all"]).unwrap();
    let sections: Vec<&str> = out.split("\n\n").collect();
    assert_eq!(sections.len(), 2);
    assert!(sections[0].starts_with(&format!("Most important words in {}:", dir.path().join("doc1.txt").display())));
    assert!(sections[1].starts_with(&format!("Most important words in {}:", dir.path().join("doc2.txt").display())));
    assert_eq!(sections[0].lines().count(), 6);
    assert!(sections[1].contains("  the: 0.0"));
}

#[test]
fn requested_file_must_exist() {
    let dir = cat_and_dog();
    let missing = dir.path().join("nope.txt");
    let err = run_args(&[&arg(dir.path()), &arg(&missing)]).unwrap_err();
    assert_eq!(err.to_string(), format!("File {} not found", missing.display()));
}

#[test]
fn requested_file_must_be_in_the_corpus() {
    let dir = cat_and_dog();
    fs::write(dir.path().join("notes.md"), "the bird").unwrap();
    let notes = dir.path().join("notes.md");
    let err = run_args(&[&arg(dir.path()), &arg(&notes), "-p", "*.txt"]).unwrap_err();
    let msg = err.to_string();
    assert!(msg.starts_with(&format!("file {} is not in the specified corpus", notes.display())));
    assert!(msg.contains("*.txt"));
}

#[test]
fn requested_paths_are_resolved_canonically() {
    let dir = cat_and_dog();
    let roundabout = dir.path().join(".").join("doc2.txt");
    let out = run_args(&[&arg(dir.path()), &arg(&roundabout), "-n", "1"]).unwrap();
    assert!(out.contains(&format!("Most important words in {}:", dir.path().join("doc2.txt").display())));
    assert!(out.contains("  dog: "));
}

#[test]
fn pattern_limits_the_corpus() {
    let dir = cat_and_dog();
    fs::write(dir.path().join("doc3.md"), "the cat").unwrap();
    let doc1 = dir.path().join("doc1.txt");
    // with doc3.md excluded, "cat" is still unique to doc1
    let out = run_args(&[&arg(dir.path()), &arg(&doc1), "-p", "*.txt", "-n", "1"]).unwrap();
    assert!(out.contains("  cat: "));
    let out = run_args(&[&arg(dir.path()), &arg(&doc1), "-n", "1"]).unwrap();
    assert!(out.contains("  mat: "));
}

#[test]
fn recursive_patterns_reach_subdirectories() {
    let dir = cat_and_dog();
    fs::create_dir(dir.path().join("more")).unwrap();
    let nested = dir.path().join("more").join("doc3.txt");
    fs::write(&nested, "a fish swam").unwrap();

    let out = run_args(&[&arg(dir.path()), "-p", "*.txt"]).unwrap();
    assert!(!out.contains("doc3.txt"));
    let out = run_args(&[&arg(dir.path()), &arg(&nested), "-p", "**/*.txt"]).unwrap();
    assert!(out.contains("  fish: "));
}

#[test]
fn empty_documents_are_skipped_unless_requested() {
    let dir = cat_and_dog();
    let blank = dir.path().join("blank.txt");
    fs::write(&blank, "  -- \n").unwrap();

    let out = run_args(&[&arg(dir.path())]).unwrap();
    assert!(!out.contains("blank.txt"));
    assert_eq!(out.matches("Most important words in").count(), 2);

    let err = run_args(&[&arg(dir.path()), &arg(&blank)]).unwrap_err();
    assert!(err.to_string().contains("empty document"));
}

#[test]
fn unique_mode_lists_words_in_no_other_file() {
    let dir = cat_and_dog();
    let doc2 = dir.path().join("doc2.txt");
    let out = run_args(&[&arg(dir.path()), &arg(&doc2), "--unique"]).unwrap();
    assert_eq!(out, format!("Words unique to {}:\n  dog\n  log\n", doc2.display()));
}

#[test]
fn json_output() {
    let dir = cat_and_dog();
    let out = run_args(&[&arg(dir.path()), "-n", "2", "--format", "json"]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let docs = value.as_array().unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[1]["words"][0]["word"], "dog");
    assert_eq!(docs[1]["words"][1]["word"], "log");
    assert_eq!(docs[0]["words"].as_array().unwrap().len(), 2);
}

#[test]
fn bad_limit_is_rejected_by_the_parser() {
    let err = Cli::try_parse_from(["tfidf", ".", "-n", "lots"]).unwrap_err();
    assert!(err.to_string().contains("lots"));
}

#[test]
fn keys_drop_current_dir_prefixes() {
    // the only test that changes the working directory
    let root = tempdir().unwrap();
    let corpus = root.path().join("corpus");
    fs::create_dir(&corpus).unwrap();
    fs::write(corpus.join("doc1.txt"), "the cat sat on the mat").unwrap();
    fs::write(corpus.join("doc2.txt"), "the dog sat on the log").unwrap();

    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(&corpus).unwrap();
    let from_inside = run_args(&[".", "doc1.txt", "-n", "1"]);
    let dotted_request = run_args(&[".", "./doc2.txt", "-n", "1"]);
    std::env::set_current_dir(root.path()).unwrap();
    let from_parent = run_args(&["./corpus", "--unique"]);
    std::env::set_current_dir(previous).unwrap();

    assert!(from_inside.unwrap().starts_with("Most important words in doc1.txt:\n  cat: "));
    assert!(dotted_request.unwrap().starts_with("Most important words in doc2.txt:\n  dog: "));
    assert_eq!(
        from_parent.unwrap(),
        "Words unique to corpus/doc1.txt:\n  cat\n  mat\n\nWords unique to corpus/doc2.txt:\n  dog\n  log\n"
    );
}

#[test]
fn unique_json_output() {
    let dir = cat_and_dog();
    let out = run_args(&[&arg(dir.path()), "--unique", "--format", "json"]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let expected = serde_json::json!([
        { "document": arg(&dir.path().join("doc1.txt")), "unique": ["cat", "mat"] },
        { "document": arg(&dir.path().join("doc2.txt")), "unique": ["dog", "log"] },
    ]);
    assert_eq!(value, expected);
}

#[cfg(unix)]
#[test]
fn linked_copies_report_under_the_requested_name() {
    use std::os::unix::fs::symlink;

    let dir = cat_and_dog();
    let elsewhere = tempdir().unwrap();
    let target = elsewhere.path().join("shared.txt");
    fs::write(&target, "a fish swam").unwrap();
    let first = dir.path().join("a_link.txt");
    let second = dir.path().join("b_link.txt");
    symlink(&target, &first).unwrap();
    symlink(&target, &second).unwrap();

    for link in [&first, &second] {
        let out = run_args(&[&arg(dir.path()), &arg(link), "-n", "1"]).unwrap();
        assert!(out.starts_with(&format!("Most important words in {}:", link.display())));
    }

    // naming the link target itself resolves to the first link found
    let out = run_args(&[&arg(dir.path()), &arg(&target), "-n", "1"]).unwrap();
    assert!(out.starts_with(&format!("Most important words in {}:", first.display())));
}
