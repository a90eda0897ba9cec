//! Tests for the netCDF reader


use std::path::Path;

/// Two profiles of two levels, one padded `PRES` cell and per-profile axes
pub fn write_profile_file(path: &Path) {
    let mut file = netcdf::create(path).unwrap();
    file.add_dimension("N_PROF", 2).unwrap();
    file.add_dimension("N_LEVELS", 2).unwrap();
    file.add_attribute("Conventions", "Argo-3.1 CF-1.6").unwrap();

    let mut pres = file
        .add_variable::<f32>("PRES", &["N_PROF", "N_LEVELS"])
        .unwrap();
    pres.set_fill_value(99999.0f32).unwrap();
    pres.put_attribute("axis", "Z").unwrap();
    pres.put_values(&[5.0f32, 10.0, 5.0, 99999.0], ..).unwrap();

    let mut latitude = file.add_variable::<f64>("LATITUDE", &["N_PROF"]).unwrap();
    latitude.put_attribute("axis", "Y").unwrap();
    latitude.put_values(&[-12.5f64, 3.25], ..).unwrap();

    let mut cycle = file.add_variable::<i32>("CYCLE_NUMBER", &["N_PROF"]).unwrap();
    cycle.put_values(&[1i32, 2], ..).unwrap();
}
