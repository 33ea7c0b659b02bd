use std::path::Path;
use std::path::PathBuf;

pub fn tests_path() -> PathBuf {
    Path::new(file!())
        .parent()
        .map(|p| p.join("../tests"))
        .unwrap_or_else(|| PathBuf::from("tests"))
}

pub fn assert_float_is_close(x: f64, y: f64) {
    assert!((x - y).abs() < 1e-10, "{} {}", x, y)
}

pub fn assert_float_is_close_high_error(x: f64, y: f64) {
    assert!((x - y).abs() < 1e-6, "{} {}", x, y)
}
