//! Type normalisation tests

use super::*;
use crate::accessor::ArgoAccessor;
use crate::constants::DIM_INDEX;
use crate::dataset::Variable;
use crate::error::ArgoError;

fn points_with(name: &str, data: Series) -> Dataset {
    let mut dataset = two_float_points();
    dataset
        .insert(name, Variable::new(&[DIM_INDEX], data))
        .unwrap();
    dataset
}

#[test]
fn test_qc_text_becomes_integer() {
    let mut argo = ArgoAccessor::new(two_float_points()).unwrap();
    let report = argo.cast_types().unwrap();

    assert!(report.is_clean());
    assert!(report.converted.contains(&"TEMP_QC".to_string()));
    assert_eq!(
        ints(argo.dataset(), "TEMP_QC"),
        [1, 1, 2, 0, 1, 4, 1, 1, 1, 0]
            .into_iter()
            .map(Some)
            .collect::<Vec<_>>()
    );
    assert_eq!(
        argo.dataset().get("TEMP_QC").unwrap().dtype(),
        &DataType::Int64
    );
}

#[test]
fn test_three_character_qc_is_cleaned_and_narrowed() {
    let qc = Series::new(
        "PSAL_QC".into(),
        ["1", "nan", "   ", "4", "1  ", "2", "nan", "1", "1", "3"],
    );
    let mut argo = ArgoAccessor::new(points_with("PSAL_QC", qc)).unwrap();
    let report = argo.cast_types().unwrap();

    assert!(report.is_clean(), "{report:?}");
    assert_eq!(
        ints(argo.dataset(), "PSAL_QC"),
        [1, 0, 0, 4, 1, 2, 0, 1, 1, 3]
            .into_iter()
            .map(Some)
            .collect::<Vec<_>>()
    );
}

#[test]
fn test_byte_qc_is_decoded_then_cast() {
    let cells: [&[u8]; 10] = [b"1", b" ", b"1", b"1", b"2", b"1", b"1", b"8", b"1", b"1"];
    let qc = Series::new("PRES_QC".into(), cells);
    let mut argo = ArgoAccessor::new(points_with("PRES_QC", qc)).unwrap();
    argo.cast_types().unwrap();

    assert_eq!(
        ints(argo.dataset(), "PRES_QC"),
        [1, 0, 1, 1, 2, 1, 1, 8, 1, 1]
            .into_iter()
            .map(Some)
            .collect::<Vec<_>>()
    );
}

#[test]
fn test_platform_number_float_becomes_integer() {
    let mut argo = ArgoAccessor::new(two_float_points()).unwrap();
    argo.cast_types().unwrap();

    let platform = argo.dataset().get("PLATFORM_NUMBER").unwrap();
    assert_eq!(platform.dtype(), &DataType::Int64);
    assert_eq!(ints(argo.dataset(), "PLATFORM_NUMBER")[1], Some(FLOAT_A));
}

#[test]
fn test_byte_metadata_becomes_text() {
    let modes: [&[u8]; 10] = [b"R".as_slice(); 10];
    let directions: [&[u8]; 10] = [b"A".as_slice(); 10];
    let mut dataset = points_with("DATA_MODE", Series::new("DATA_MODE".into(), modes));
    dataset
        .insert(
            "DIRECTION",
            Variable::new(&[DIM_INDEX], Series::new("DIRECTION".into(), directions)),
        )
        .unwrap();

    let mut argo = ArgoAccessor::new(dataset).unwrap();
    argo.cast_types().unwrap();

    assert_eq!(texts(argo.dataset(), "DATA_MODE")[0].as_deref(), Some("R"));
    assert_eq!(texts(argo.dataset(), "DIRECTION")[9].as_deref(), Some("A"));
}

#[test]
fn test_failed_cast_is_reported_and_left_alone() {
    let qc = Series::new(
        "DOXY_QC".into(),
        ["1", "A", "1", "1", "1", "1", "1", "1", "1", "1"],
    );
    let mut argo = ArgoAccessor::new(points_with("DOXY_QC", qc)).unwrap();
    let report = argo.cast_types().unwrap();

    assert_eq!(report.failures.len(), 1);
    let failure = &report.failures[0];
    assert_eq!(failure.column, "DOXY_QC");
    assert_eq!(failure.from, DataType::String);
    assert_eq!(failure.to, DataType::Int64);
    assert!(failure.distinct_values.iter().any(|v| v.contains('A')));

    // The failing column keeps its text, the rest of the pass still ran
    assert_eq!(
        argo.dataset().get("DOXY_QC").unwrap().dtype(),
        &DataType::String
    );
    assert_eq!(
        argo.dataset().get("TEMP_QC").unwrap().dtype(),
        &DataType::Int64
    );
}

#[test]
fn test_other_variables_are_untouched() {
    let before = two_float_points();
    let mut argo = ArgoAccessor::new(before.clone()).unwrap();
    argo.cast_types().unwrap();
    let after = argo.dataset();

    assert_eq!(after.dim_len(DIM_INDEX), before.dim_len(DIM_INDEX));
    for name in ["PRES", "CYCLE_NUMBER", "DATA_MODE", "latitude", "longitude", "time"] {
        let a = after.get(name).unwrap().data();
        let b = before.get(name).unwrap().data();
        assert!(a.equals_missing(b), "{name} changed");
    }
}

#[test]
fn test_cast_types_is_idempotent() {
    let mut argo = ArgoAccessor::new(two_float_points()).unwrap();
    argo.cast_types().unwrap();
    let once = argo.dataset().to_frame().unwrap();

    let report = argo.cast_types().unwrap();
    let twice = argo.dataset().to_frame().unwrap();

    assert!(once.equals_missing(&twice));
    assert!(report.converted.is_empty());
}

#[test]
fn test_cast_types_requires_points() {
    let mut argo = ArgoAccessor::new(two_float_points()).unwrap();
    let profiles = argo.point2profile().unwrap();

    let result = argo.cast_types();
    assert!(matches!(result, Err(ArgoError::StructuralMismatch { .. })));
    assert_eq!(argo.dataset().variable_names(), profiles.variable_names());
    assert_eq!(
        argo.dataset().get("TEMP_QC").unwrap().dtype(),
        &DataType::String
    );
}

#[test]
fn test_coordinates_are_not_cast() {
    let mut dataset = two_float_points();
    let position_qc = Series::new(
        "POSITION_QC".into(),
        ["1", "1", "1", "1", "1", "1", "1", "1", "1", "8"],
    );
    dataset
        .insert(
            "POSITION_QC",
            Variable::coordinate(&[DIM_INDEX], position_qc),
        )
        .unwrap();

    let mut argo = ArgoAccessor::new(dataset).unwrap();
    let report = argo.cast_types().unwrap();

    assert!(!report.converted.contains(&"POSITION_QC".to_string()));
    assert_eq!(
        argo.dataset().get("POSITION_QC").unwrap().dtype(),
        &DataType::String
    );
    assert_eq!(
        argo.dataset().get("TEMP_QC").unwrap().dtype(),
        &DataType::Int64
    );
}
