//! Tests for locating and opening float files

use super::*;
use crate::config::LoaderConfig;
use crate::dataset::AttrValue;
use crate::error::ArgoError;
use crate::loader::{Institute, LocalLoader};
use std::cell::Cell;

#[test]
fn test_profile_path_from_code() {
    let loader = LocalLoader::new(LoaderConfig::new("/data/argo"), stub_reader);
    let path = loader
        .profile_path(Institute::Code("IF"), 6902746)
        .unwrap();

    assert_eq!(
        path,
        PathBuf::from("/data/argo/coriolis/6902746/6902746_prof.nc")
    );
}

#[test]
fn test_profile_path_from_name() {
    let loader = LocalLoader::new(LoaderConfig::new("/data/argo"), stub_reader);
    let path = loader
        .profile_path(Institute::Name("aoml"), 4903218)
        .unwrap();

    assert_eq!(path, PathBuf::from("/data/argo/aoml/4903218/4903218_prof.nc"));
}

#[test]
fn test_unknown_institute_code() {
    let loader = LocalLoader::new(LoaderConfig::new("/data/argo"), stub_reader);

    match loader.load_from_inst_code("ZZ", 6902746) {
        Err(ArgoError::Configuration { message }) => assert!(message.contains("ZZ")),
        other => panic!("Expected Configuration error, got {other:?}"),
    }
}

#[test]
fn test_missing_file_reports_path() {
    let temp_dir = TempDir::new().unwrap();
    let loader = LocalLoader::new(LoaderConfig::new(temp_dir.path()), stub_reader);

    match loader.load_from_inst_code("IF", 999999999) {
        Err(ArgoError::FileNotFound { path }) => {
            assert_eq!(
                path,
                temp_dir
                    .path()
                    .join("coriolis/999999999/999999999_prof.nc")
            );
        }
        other => panic!("Expected FileNotFound, got {other:?}"),
    }
}

#[test]
fn test_directory_is_not_a_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("bodc/1901/1901_prof.nc")).unwrap();
    let loader = LocalLoader::new(LoaderConfig::new(temp_dir.path()), stub_reader);

    let result = loader.load_from_inst("bodc", 1901);
    assert!(matches!(result, Err(ArgoError::FileNotFound { .. })));
}

#[test]
fn test_existing_file_is_read() {
    let temp_dir = TempDir::new().unwrap();
    let expected = create_profile_file(&temp_dir, "coriolis", 6902746);
    let loader = LocalLoader::new(LoaderConfig::new(temp_dir.path()), stub_reader);

    let by_code = loader.load_from_inst_code("IF", 6902746).unwrap();
    let by_name = loader.load_from_inst("coriolis", 6902746).unwrap();

    let source = AttrValue::Text(expected.display().to_string());
    assert_eq!(by_code.attr("source"), Some(&source));
    assert_eq!(by_name.attr("source"), Some(&source));
    assert_eq!(by_code.dim_len("N_PROF"), Some(1));
}

#[test]
fn test_reader_not_called_for_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let calls = Cell::new(0);
    let reader = |path: &Path| {
        calls.set(calls.get() + 1);
        stub_reader(path)
    };
    let loader = LocalLoader::new(LoaderConfig::new(temp_dir.path()), reader);

    assert!(loader.load(Institute::Name("jma"), 2902000).is_err());
    assert_eq!(calls.get(), 0);

    create_profile_file(&temp_dir, "jma", 2902000);
    loader.load(Institute::Name("jma"), 2902000).unwrap();
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_custom_institute_table() {
    let mut config = LoaderConfig::new("/mnt/gdac");
    config
        .institutes
        .insert("XX".to_string(), "experimental".to_string());
    let loader = LocalLoader::new(config, stub_reader);

    let path = loader.profile_path(Institute::Code("XX"), 7).unwrap();
    assert_eq!(path, PathBuf::from("/mnt/gdac/experimental/7/7_prof.nc"));
}

#[test]
fn test_institute_parse() {
    assert_eq!(Institute::parse("IF"), Institute::Code("IF"));
    assert_eq!(Institute::parse("coriolis"), Institute::Name("coriolis"));
    assert_eq!(Institute::parse("If"), Institute::Name("If"));
    assert_eq!(Institute::Code("AO").to_string(), "AO");
}
