use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use fintrack_core::{CoreError, KeyValueStore};
use tracing::{debug, info};

const DATA_EXTENSION: &str = "json";
const BACKUP_PREFIX: &str = "snapshot";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const BACKUP_TIMESTAMP_LEN: usize = 15;
const BACKUP_SEQUENCE_WIDTH: usize = 4;
const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_RETENTION: usize = 5;

/// Filesystem-backed key-value store: one JSON document per key.
///
/// Layout under `root`:
/// `data/<key>.json` for live values and
/// `backups/snapshot_<YYYYmmdd_HHMMSS>_<seq>[_note]/` for point-in-time copies.
/// The sequence number grows with every backup and orders backups taken
/// within the same second.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
    data_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, CoreError> {
        Self::with_retention(root, DEFAULT_RETENTION)
    }

    pub fn with_retention(root: impl Into<PathBuf>, retention: usize) -> Result<Self, CoreError> {
        let root = root.into();
        let data_dir = root.join("data");
        let backups_dir = root.join("backups");
        fs::create_dir_all(&data_dir)?;
        fs::create_dir_all(&backups_dir)?;
        Ok(Self {
            root,
            data_dir,
            backups_dir,
            retention: retention.max(1),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn key_path(&self, key: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", canonical_name(key), DATA_EXTENSION))
    }

    /// Copies every stored key into a new timestamped backup directory.
    ///
    /// Older backups beyond the retention limit are pruned afterwards; the
    /// backup just written is always kept.
    pub fn backup(&self, note: Option<&str>) -> Result<BackupInfo, CoreError> {
        let now = Utc::now();
        let existing = self.list_backups()?;
        let sequence = existing
            .iter()
            .map(|backup| backup.sequence)
            .max()
            .map_or(1, |max| max + 1);
        let mut name = format!(
            "{}_{}_{:0width$}",
            BACKUP_PREFIX,
            now.format(BACKUP_TIMESTAMP_FORMAT),
            sequence,
            width = BACKUP_SEQUENCE_WIDTH
        );
        if let Some(label) = sanitize_backup_note(note) {
            name.push('_');
            name.push_str(&label);
        }

        let dir = self.backups_dir.join(&name);
        fs::create_dir_all(&dir)?;
        let mut files = 0;
        for path in self.data_files()? {
            if let Some(file_name) = path.file_name() {
                fs::copy(&path, dir.join(file_name))?;
                files += 1;
            }
        }
        info!(backup = %name, files, "created data backup");
        self.prune_backups(&name)?;
        Ok(BackupInfo {
            created_at: parse_backup_timestamp(&name),
            sequence,
            name,
            path: dir,
            files,
        })
    }

    /// Backups, newest first.
    ///
    /// Ordered by sequence number, then timestamp, then name.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, CoreError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if !name.starts_with(BACKUP_PREFIX) {
                continue;
            }
            let files = json_files_in(&path)?.len();
            entries.push(BackupInfo {
                name: name.to_string(),
                created_at: parse_backup_timestamp(name),
                sequence: parse_backup_sequence(name).unwrap_or(0),
                path: path.clone(),
                files,
            });
        }
        entries.sort_by(|a, b| {
            b.sequence
                .cmp(&a.sequence)
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| b.name.cmp(&a.name))
        });
        Ok(entries)
    }

    /// Replaces the live data with the content of backup `name`.
    pub fn restore(&self, name: &str) -> Result<BackupInfo, CoreError> {
        let info = self
            .list_backups()?
            .into_iter()
            .find(|backup| backup.name == name)
            .ok_or_else(|| CoreError::Storage(format!("backup `{name}` not found")))?;
        for path in self.data_files()? {
            fs::remove_file(path)?;
        }
        for path in json_files_in(&info.path)? {
            if let Some(file_name) = path.file_name() {
                fs::copy(&path, self.data_dir.join(file_name))?;
            }
        }
        info!(backup = %info.name, files = info.files, "restored data backup");
        Ok(info)
    }

    fn data_files(&self) -> Result<Vec<PathBuf>, CoreError> {
        json_files_in(&self.data_dir)
    }

    fn prune_backups(&self, keep: &str) -> Result<(), CoreError> {
        let stale = self
            .list_backups()?
            .into_iter()
            .filter(|backup| backup.name != keep)
            .skip(self.retention.saturating_sub(1));
        for stale in stale {
            debug!(backup = %stale.name, "pruning backup");
            fs::remove_dir_all(stale.path)?;
        }
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let path = self.key_path(key);
        let tmp = tmp_path(&path);
        write_atomic(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json:{}", self.root.display())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackupInfo {
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    /// Position in creation order; `0` for names without a sequence.
    pub sequence: u32,
    pub path: PathBuf,
    pub files: usize,
}

fn json_files_in(dir: &Path) -> Result<Vec<PathBuf>, CoreError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some(DATA_EXTENSION) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "value".into()
    } else {
        sanitized
    }
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Reads the `YYYYmmdd_HHMMSS` stamp that follows the `snapshot_` prefix.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let rest = name.strip_prefix(BACKUP_PREFIX)?.strip_prefix('_')?;
    let stamp = rest.get(..BACKUP_TIMESTAMP_LEN)?;
    NaiveDateTime::parse_from_str(stamp, BACKUP_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn parse_backup_sequence(name: &str) -> Option<u32> {
    let rest = name.strip_prefix(BACKUP_PREFIX)?.strip_prefix('_')?;
    let digits = rest
        .get(BACKUP_TIMESTAMP_LEN..)?
        .strip_prefix('_')?
        .get(..BACKUP_SEQUENCE_WIDTH)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
