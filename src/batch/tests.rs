use super::*;
use crate::smd::tests::sample_smd_bytes;

fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

fn config(dispatch: Dispatch, on_error: FailurePolicy) -> BatchConfig {
    BatchConfig {
        dispatch,
        on_error,
        ..Default::default()
    }
}

#[test]
fn test_dispatch_threshold() {
    assert!(!Dispatch::Sequential.is_parallel(1000));
    assert!(Dispatch::Parallel.is_parallel(1));
    assert!(!Dispatch::Threshold(10).is_parallel(10));
    assert!(Dispatch::Threshold(10).is_parallel(11));
    assert_eq!(Dispatch::default(), Dispatch::Threshold(DEFAULT_PARALLEL_THRESHOLD));
}

#[test]
fn test_find_files_sorted_and_filtered() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "b.smd", b"");
    write(dir.path(), "a.SMD", b"");
    write(dir.path(), "notes.txt", b"");
    fs::create_dir(dir.path().join("sub.smd")).unwrap();

    let files = find_smd_files(dir.path(), SMD_EXTENSION).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.SMD", "b.smd"]);
}

#[test]
fn test_missing_folder() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    let err = find_smd_files(&missing, SMD_EXTENSION).unwrap_err();
    assert_eq!(err.path(), Some(missing.as_path()));
}

#[test]
fn test_loads_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "2.smd", &sample_smd_bytes(1, 2, 3));
    write(dir.path(), "1.smd", &sample_smd_bytes(2, 2, 3));

    for dispatch in [Dispatch::Sequential, Dispatch::Parallel] {
        let outcome = load_smd_folder(dir.path(), &config(dispatch, FailurePolicy::Abort)).unwrap();
        assert!(outcome.is_complete());
        let counts: Vec<_> = outcome.loaded.iter().map(|(_, m)| m.spectra_count()).collect();
        assert_eq!(counts, vec![4, 2]);
    }
}

#[test]
fn test_abort_reports_first_failure() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.smd", &sample_smd_bytes(1, 1, 2));
    let bad = write(dir.path(), "b.smd", b"");
    write(dir.path(), "c.smd", b"<SCANDATA>");

    for dispatch in [Dispatch::Sequential, Dispatch::Parallel] {
        let err = load_smd_folder(dir.path(), &config(dispatch, FailurePolicy::Abort)).unwrap_err();
        assert_eq!(err.path(), Some(bad.as_path()));
        assert!(matches!(err.root(), SmdError::EmptyFile));
    }
}

#[test]
fn test_skip_records_failures() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.smd", b"");
    write(dir.path(), "b.smd", &sample_smd_bytes(1, 1, 2));
    write(dir.path(), "c.smd", b"<SCANDATA>");

    let outcome = load_smd_folder(dir.path(), &config(Dispatch::Sequential, FailurePolicy::Skip)).unwrap();
    assert_eq!(outcome.loaded.len(), 1);
    assert!(outcome.loaded[0].0.ends_with("b.smd"));
    assert_eq!(outcome.failed.len(), 2);
    assert!(matches!(outcome.failed[0].1.root(), SmdError::EmptyFile));
    assert!(matches!(outcome.failed[1].1.root(), SmdError::MalformedFile(_)));
}

#[test]
fn test_iter_folder_is_lazy_per_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.smd", b"");
    write(dir.path(), "b.smd", &sample_smd_bytes(1, 1, 2));

    let results: Vec<_> = iter_smd_folder(dir.path()).unwrap().collect();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_err());
    assert!(results[1].is_ok());
}

#[test]
fn test_config_from_toml() {
    let config: BatchConfig = toml::from_str(
        r#"
dispatch = { threshold = 4 }
on_error = "skip"
"#,
    )
    .unwrap();
    assert_eq!(config.dispatch, Dispatch::Threshold(4));
    assert_eq!(config.on_error, FailurePolicy::Skip);
    assert_eq!(config.extension, "smd");

    let config: BatchConfig = toml::from_str(r#"dispatch = "sequential""#).unwrap();
    assert_eq!(config.dispatch, Dispatch::Sequential);
    assert_eq!(config.on_error, FailurePolicy::Abort);
}
