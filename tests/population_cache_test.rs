//! Tests for the modification-time keyed population cache

use std::io::Write;

use indicator_engine::PopulationCache;

const HEADER: &str = "DEPARTAMENTO;MUNICIPIO;PRESTADOR;POBLACION HTA;POBLACION DM\n";

fn write_reference(path: &std::path::Path, rows: &str) {
    let mut file = std::fs::File::create(path).unwrap();
    file.write_all(HEADER.as_bytes()).unwrap();
    file.write_all(rows.as_bytes()).unwrap();
    file.sync_all().unwrap();
}

#[test]
fn test_cache_serves_and_invalidates_on_change() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("population.csv");
    write_reference(&path, "Antioquia;Medellín;IPS Norte;10;4\n");

    let mut cache = PopulationCache::new();
    assert_eq!(cache.load(&path).unwrap().totals().hypertension, 10);

    // unchanged file: still the same data
    assert_eq!(cache.load(&path).unwrap().totals().hypertension, 10);

    // rewrite bumps the modification time, the cached parse must go
    std::thread::sleep(std::time::Duration::from_millis(20));
    write_reference(&path, "Antioquia;Medellín;IPS Norte;25;9\n");
    assert_eq!(cache.load(&path).unwrap().totals().hypertension, 25);
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut cache = PopulationCache::new();
    let err = cache.load(&dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, indicator_engine::EngineError::Io(_)));
}
