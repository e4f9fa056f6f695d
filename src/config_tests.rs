use super::*;

#[test]
fn default_config_validates_and_round_trips_through_disk() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("nested").join("config.json");
    let config = default_config();
    validate_config(&config).expect("default config is valid");

    write_config(&path, &config).expect("write config");
    let loaded = load_config_optional(Some(path.as_path())).expect("load config");
    assert_eq!(loaded, config);
}

#[test]
fn missing_config_file_uses_defaults() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let loaded =
        load_config_optional(Some(dir.path().join("absent.json").as_path())).expect("load defaults");
    assert_eq!(loaded, default_config());
    assert_eq!(load_config_optional(None).expect("load defaults"), default_config());
}

#[test]
fn validate_rejects_bad_schema_and_blank_fields() {
    let mut config = default_config();
    config.schema_version = 99;
    assert!(validate_config(&config).is_err());

    let mut config = default_config();
    config.data_source = "  ".to_string();
    assert!(validate_config(&config).is_err());

    let mut config = default_config();
    config.override_key = String::new();
    assert!(validate_config(&config).is_err());

    let mut config = default_config();
    config.narrator_command = Some("espeak-ng \"unterminated".to_string());
    assert!(validate_config(&config).is_err());

    let mut config = default_config();
    config.print_opener = Some("   ".to_string());
    assert!(validate_config(&config).is_err());
}

#[test]
fn data_source_override_ignores_blank_values() {
    let mut config = default_config();
    config.override_data_source(Some("   "));
    assert_eq!(config.data_source, DEFAULT_DATA_SOURCE);
    config.override_data_source(None);
    assert_eq!(config.data_source, DEFAULT_DATA_SOURCE);
    config.override_data_source(Some(" https://example.test/procedures.json "));
    assert_eq!(config.data_source, "https://example.test/procedures.json");
}

#[test]
fn explicit_store_dir_wins() {
    let mut config = default_config();
    config.store_dir = Some(PathBuf::from("/tmp/officina-store"));
    assert_eq!(
        config.resolve_store_dir().expect("resolve store dir"),
        PathBuf::from("/tmp/officina-store")
    );
}

#[test]
fn partial_config_file_is_rejected() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{\"schema_version\": 1}").expect("write config");
    assert!(load_config(&path).is_err());
}
