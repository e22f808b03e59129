use fintrack_config::{AppConfig, ConfigError, ConfigManager, StorageKind};
use fintrack_domain::TimeFrame;
use tempfile::tempdir;

#[test]
fn default_config_uses_json_storage_and_monthly_reports() {
    let cfg = AppConfig::default();

    assert_eq!(cfg.storage, StorageKind::Json);
    assert_eq!(cfg.backup_retention, 5);
    assert_eq!(cfg.recent_limit, 5);
    assert_eq!(cfg.default_time_frame, TimeFrame::Monthly);
    assert_eq!(cfg.log_filter, "fintrack=info");
}

#[test]
fn explicit_data_dir_wins() {
    let dir = tempdir().expect("tempdir");
    let cfg = AppConfig::default().with_data_dir(dir.path());
    assert_eq!(cfg.resolve_data_dir(), dir.path());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path()).expect("manager");
    assert_eq!(manager.load().expect("defaults"), AppConfig::default());

    let cfg = AppConfig {
        storage: StorageKind::Memory,
        recent_limit: 10,
        default_time_frame: TimeFrame::Weekly,
        ..AppConfig::default()
    };
    manager.save(&cfg).expect("save config");
    assert_eq!(manager.load().expect("load config"), cfg);
    assert!(manager.config_path().ends_with("config/config.json"));
}

#[test]
fn partial_documents_merge_over_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path()).expect("manager");
    std::fs::write(manager.config_path(), r#"{"storage": "memory"}"#).unwrap();
    let loaded = manager.load().unwrap();
    assert_eq!(loaded.storage, StorageKind::Memory);
    assert_eq!(loaded.backup_retention, 5);
}

#[test]
fn config_backups_round_trip() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path()).expect("manager");
    let cfg = AppConfig {
        backup_retention: 9,
        ..AppConfig::default()
    };
    let name = manager.backup(&cfg, Some("before change")).expect("backup");
    assert!(name.starts_with("config_"));
    assert!(name.ends_with("_before-change.json"));
    assert_eq!(manager.list_backups().unwrap(), vec![name.clone()]);
    assert_eq!(manager.restore(&name).unwrap(), cfg);

    let err = manager.restore("config_missing.json").unwrap_err();
    assert!(matches!(err, ConfigError::BackupNotFound(_)));
}
