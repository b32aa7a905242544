use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use typelist_scan::{
    BucketOrder, Classifier, ClassifyError, Emitter, Label, ListConfig, OutputFormat, ScanError,
    ScanReport, SignatureClassifier, TypeScanner, WarningKind,
};

/// Classifier that records every path it is asked about.
#[derive(Default)]
struct RecordingClassifier {
    calls: RefCell<Vec<PathBuf>>,
}

impl Classifier for RecordingClassifier {
    fn classify(&self, path: &Path) -> Result<Label, ClassifyError> {
        self.calls.borrow_mut().push(path.to_path_buf());
        SignatureClassifier::new().classify(path)
    }
}

/// Classifier that always fails.
struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn classify(&self, path: &Path) -> Result<Label, ClassifyError> {
        Err(ClassifyError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidData, "magic database missing"),
        ))
    }
}

fn temp_root() -> TempDir {
    tempfile::Builder::new().prefix("typelist-").tempdir().unwrap()
}

fn labeled(roots: Vec<PathBuf>, include_hidden: bool) -> ListConfig {
    ListConfig::builder()
        .roots(roots)
        .format(OutputFormat::Labeled)
        .include_hidden(include_hidden)
        .build()
        .unwrap()
}

fn recorded_paths(report: &ScanReport) -> Vec<PathBuf> {
    report
        .index
        .iter()
        .flat_map(|(_, bucket)| bucket.paths().to_vec())
        .collect()
}

fn run(config: &ListConfig) -> Result<String, ScanError> {
    let report = TypeScanner::new(SignatureClassifier::new()).scan(config)?;
    let mut out = Vec::new();
    Emitter::from_config(config).emit(&report.index, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn test_empty_and_text_files_grouped() {
    let temp = temp_root();
    let root = temp.path();
    fs::write(root.join("empty.txt"), "").unwrap();
    fs::write(root.join("note.txt"), "buy milk\n").unwrap();

    let out = run(&labeled(vec![root.to_path_buf()], false)).unwrap();
    let expected = format!(
        "inode/x-empty; charset=binary: {}\ntext/plain; charset=us-ascii: {}\n",
        root.join("empty.txt").display(),
        root.join("note.txt").display(),
    );
    assert_eq!(out, expected);

    // Name-only output is the same order without labels.
    let out = run(&ListConfig::new([root])).unwrap();
    assert_eq!(
        out,
        format!(
            "{}\n{}\n",
            root.join("empty.txt").display(),
            root.join("note.txt").display()
        )
    );
}

#[test]
fn test_empty_files_never_reach_classifier() {
    let temp = temp_root();
    let root = temp.path();
    fs::write(root.join("a"), "").unwrap();
    fs::write(root.join("b"), "").unwrap();
    fs::write(root.join("c"), "content\n").unwrap();

    let scanner = TypeScanner::new(RecordingClassifier::default());
    let report = scanner.scan(&ListConfig::new([root])).unwrap();

    assert_eq!(*scanner.classifier().calls.borrow(), vec![root.join("c")]);
    assert_eq!(report.stats.empty_files, 2);
    assert_eq!(report.index.get(typelist_scan::Label::empty_file().as_str()).unwrap().len(), 2);
}

#[test]
fn test_hidden_directory_scenario() {
    let temp = temp_root();
    let root = temp.path();
    fs::create_dir(root.join(".git")).unwrap();
    fs::write(root.join(".git/config"), "[core]\n\tbare = false\n").unwrap();
    fs::write(root.join("README"), "hello\n").unwrap();

    let out = run(&labeled(vec![root.to_path_buf()], false)).unwrap();
    assert!(!out.contains(".git"));
    assert!(out.contains("README"));

    let out = run(&labeled(vec![root.to_path_buf()], true)).unwrap();
    assert!(out.contains(&format!(
        "text/plain; charset=us-ascii: {}",
        root.join(".git/config").display()
    )));
}

#[test]
fn test_hidden_root_is_pruned() {
    let temp = temp_root();
    let hidden = temp.path().join(".cache");
    fs::create_dir(&hidden).unwrap();
    fs::write(hidden.join("blob"), "data\n").unwrap();

    let result = run(&ListConfig::new([&hidden]));
    assert!(matches!(result, Err(ScanError::NothingToList)));
}

#[test]
fn test_dot_root_is_walked() {
    let temp = temp_root();
    let root = temp.path();
    fs::write(root.join("file.txt"), "x\n").unwrap();

    let report = TypeScanner::new(SignatureClassifier::new())
        .scan(&ListConfig::new([root.join(".")]))
        .unwrap();
    assert_eq!(report.index.len(), 1);
}

#[test]
fn test_relative_dot_roots_are_walked() {
    // Tests run from the crate directory, which holds `Cargo.toml` and `src/`.
    let cases = [
        ("./", "./Cargo.toml"),
        ("src/..", "src/../Cargo.toml"),
        ("src/../", "src/../Cargo.toml"),
        ("../", "../typelist-scan/Cargo.toml"),
    ];

    for (root, manifest) in cases {
        let report = TypeScanner::new(SignatureClassifier::new())
            .scan(&ListConfig::new([root]))
            .unwrap();
        let paths = recorded_paths(&report);
        assert!(
            paths.iter().any(|p| p == Path::new(manifest)),
            "root {root:?} did not record {manifest}"
        );
    }
}

#[test]
fn test_root_order_does_not_change_output() {
    let temp = temp_root();
    let a = temp.path().join("a");
    let b = temp.path().join("b");
    fs::create_dir(&a).unwrap();
    fs::create_dir(&b).unwrap();
    fs::write(a.join("script.sh"), "#!/bin/sh\necho hi\n").unwrap();
    fs::write(b.join("image.png"), b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR").unwrap();

    let forward = run(&labeled(vec![a.clone(), b.clone()], false)).unwrap();
    let backward = run(&labeled(vec![b.clone(), a.clone()], false)).unwrap();

    assert_eq!(forward, backward);
    assert!(forward.starts_with("image/png; charset=binary: "));
}

#[test]
fn test_bucket_is_newest_first_across_roots() {
    let temp = temp_root();
    let first = temp.path().join("first");
    let second = temp.path().join("second");
    fs::create_dir(&first).unwrap();
    fs::create_dir(&second).unwrap();
    fs::write(first.join("x.txt"), "one\n").unwrap();
    fs::write(second.join("y.txt"), "two\n").unwrap();

    let config = ListConfig::new([&first, &second]);
    let out = run(&config).unwrap();
    assert_eq!(
        out,
        format!(
            "{}\n{}\n",
            second.join("y.txt").display(),
            first.join("x.txt").display()
        )
    );

    let config = ListConfig::builder()
        .roots(vec![first.clone(), second.clone()])
        .bucket_order(BucketOrder::Discovery)
        .build()
        .unwrap();
    let out = run(&config).unwrap();
    assert_eq!(
        out,
        format!(
            "{}\n{}\n",
            first.join("x.txt").display(),
            second.join("y.txt").display()
        )
    );
}

#[test]
fn test_classification_failure_aborts() {
    let temp = temp_root();
    fs::write(temp.path().join("data.bin"), b"\x01\x02").unwrap();

    let result = TypeScanner::new(FailingClassifier).scan(&ListConfig::new([temp.path()]));
    match result {
        Err(ScanError::Classification(ClassifyError::Io { path, .. })) => {
            assert_eq!(path, temp.path().join("data.bin"));
        }
        other => panic!("expected classification error, got {other:?}"),
    }
}

#[test]
fn test_failing_classifier_unused_for_shortcuts() {
    let temp = temp_root();
    fs::write(temp.path().join("empty"), "").unwrap();

    let report = TypeScanner::new(FailingClassifier)
        .scan(&ListConfig::new([temp.path()]))
        .unwrap();
    assert_eq!(report.index.len(), 1);
}

#[test]
fn test_nothing_to_list() {
    let temp = temp_root();
    fs::create_dir(temp.path().join("empty-dir")).unwrap();
    fs::write(temp.path().join(".only-hidden"), "x\n").unwrap();

    assert!(matches!(
        run(&ListConfig::new([temp.path()])),
        Err(ScanError::NothingToList)
    ));
    assert!(matches!(
        run(&ListConfig::new(Vec::<PathBuf>::new())),
        Err(ScanError::NothingToList)
    ));
}

#[test]
fn test_inaccessible_root_stops_before_later_roots() {
    let temp = temp_root();
    fs::write(temp.path().join("kept.txt"), "x\n").unwrap();
    let missing = temp.path().join("missing");

    let result = run(&ListConfig::new([missing.clone(), temp.path().to_path_buf()]));
    assert!(matches!(result, Err(ScanError::InaccessibleRoot { .. })));

    let config = ListConfig::builder()
        .roots(vec![missing, temp.path().to_path_buf()])
        .ignore_inaccessible(true)
        .build()
        .unwrap();
    let out = run(&config).unwrap();
    assert!(out.contains("kept.txt"));
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_not_classified() {
    use std::os::unix::fs::symlink;

    let temp = temp_root();
    let root = temp.path();
    fs::create_dir(root.join("real")).unwrap();
    fs::write(root.join("real/target.txt"), "target\n").unwrap();
    symlink(root.join("real/target.txt"), root.join("live")).unwrap();
    symlink(root.join("nowhere"), root.join("broken")).unwrap();
    symlink(root.join("real"), root.join("dirlink")).unwrap();

    let scanner = TypeScanner::new(RecordingClassifier::default());
    let report = scanner.scan(&ListConfig::new([root])).unwrap();

    let links = report.index.get("inode/symlink").unwrap();
    let mut paths = links.paths().to_vec();
    paths.sort();
    assert_eq!(
        paths,
        vec![root.join("broken"), root.join("dirlink"), root.join("live")]
    );

    // Only the real file was classified, once; the linked directory was not entered.
    assert_eq!(
        *scanner.classifier().calls.borrow(),
        vec![root.join("real/target.txt")]
    );
    assert_eq!(report.stats.symlinks, 3);
}

#[cfg(unix)]
#[test]
fn test_symlink_root_is_not_followed() {
    use std::os::unix::fs::symlink;

    let temp = temp_root();
    fs::create_dir(temp.path().join("real")).unwrap();
    fs::write(temp.path().join("real/file.txt"), "x\n").unwrap();
    let link = temp.path().join("link");
    symlink(temp.path().join("real"), &link).unwrap();

    let report = TypeScanner::new(SignatureClassifier::new())
        .scan(&ListConfig::new([&link]))
        .unwrap();
    assert_eq!(report.index.len(), 1);
    assert_eq!(report.index.get("inode/symlink").unwrap().paths(), &[link]);
}

#[cfg(unix)]
#[test]
fn test_unreadable_directories_warn_and_walk_continues() {
    use std::os::unix::fs::PermissionsExt;

    let temp = temp_root();
    let root = temp.path();
    let locked = root.join("locked");
    let secret = root.join(".secret");
    fs::create_dir(&locked).unwrap();
    fs::create_dir(&secret).unwrap();
    fs::write(root.join("sibling.txt"), "still here\n").unwrap();
    for dir in [&locked, &secret] {
        fs::set_permissions(dir, fs::Permissions::from_mode(0o000)).unwrap();
    }

    // Permission bits do not stop a privileged user.
    let enforced = fs::read_dir(&locked).is_err();
    let report = enforced.then(|| {
        TypeScanner::new(SignatureClassifier::new())
            .scan(&ListConfig::new([root]))
            .unwrap()
    });

    for dir in [&locked, &secret] {
        fs::set_permissions(dir, fs::Permissions::from_mode(0o755)).unwrap();
    }
    let Some(report) = report else {
        return;
    };

    assert_eq!(recorded_paths(&report), vec![root.join("sibling.txt")]);

    let mut warned: Vec<_> = report
        .warnings
        .iter()
        .map(|w| (w.kind, w.path.clone()))
        .collect();
    warned.sort_by(|a, b| a.1.cmp(&b.1));
    assert_eq!(
        warned,
        vec![
            (WarningKind::PermissionDenied, secret.clone()),
            (WarningKind::PermissionDenied, locked.clone()),
        ]
    );
    assert_eq!(report.stats.roots_scanned, 1);

    // Hidden or not, the warning does not depend on `--all`.
    for dir in [&locked, &secret] {
        fs::set_permissions(dir, fs::Permissions::from_mode(0o000)).unwrap();
    }
    let config = ListConfig::builder()
        .roots(vec![root.to_path_buf()])
        .include_hidden(true)
        .build()
        .unwrap();
    let report = TypeScanner::new(SignatureClassifier::new()).scan(&config);
    for dir in [&locked, &secret] {
        fs::set_permissions(dir, fs::Permissions::from_mode(0o755)).unwrap();
    }
    assert_eq!(report.unwrap().warnings.len(), 2);
}
