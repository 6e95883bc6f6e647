use std::{
    cmp::Reverse,
    fs::{self, File, OpenOptions},
    io::{self, BufReader, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use chrono::Utc;
use csv::{ReaderBuilder, Terminator, WriterBuilder};
use tracing::{info, warn};

use crate::{
    errors::StorageError,
    utils::{ensure_dir, ensure_parent, tmp_path},
};

use super::{BackupInfo, LedgerStore, RawRow, Result};

pub(crate) const BACKUP_DIR: &str = "backups";
const BACKUP_EXTENSION: &str = "csv";
/// Backups are named `<stem>_YYYYMMDD_HHMMSS_mmm.csv`; milliseconds keep rewrites made
/// within the same second apart.
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%3f";
/// Number of backups kept when none is configured.
pub const DEFAULT_RETENTION: usize = 5;

/// Flat-file ledger: one comma-separated record per line, no header row.
///
/// Rewrites stage the new contents next to the ledger and rename them into place. The
/// file being replaced is first copied into the backups directory, which keeps the
/// `retention` most recent copies.
#[derive(Debug, Clone)]
pub struct CsvLedgerStore {
    path: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl CsvLedgerStore {
    /// Store at `path`, keeping backups in a `backups` directory next to it.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let backups_dir = path
            .parent()
            .map(|parent| parent.join(BACKUP_DIR))
            .unwrap_or_else(|| PathBuf::from(BACKUP_DIR));
        Self::with_backups(path, backups_dir, DEFAULT_RETENTION)
    }

    pub fn with_backups(
        path: impl Into<PathBuf>,
        backups_dir: impl Into<PathBuf>,
        retention: usize,
    ) -> Self {
        Self {
            path: path.into(),
            backups_dir: backups_dir.into(),
            retention: retention.max(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Backups of this ledger, newest first.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let prefix = format!("{}_", self.stem());
        let entries = fs::read_dir(&self.backups_dir)
            .map_err(|err| StorageError::io("list backups in", &self.backups_dir, err))?;
        let mut backups = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|err| StorageError::io("list backups in", &self.backups_dir, err))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            let name = match path.file_name().and_then(|name| name.to_str()) {
                Some(name) if name.starts_with(&prefix) => name.to_string(),
                _ => continue,
            };
            backups.push(BackupInfo { name, path });
        }
        // The timestamp suffix is fixed width, so name order is creation order.
        backups.sort_by_key(|info| Reverse(info.name.clone()));
        Ok(backups)
    }

    /// Replaces the ledger with the contents of the backup called `name`.
    pub fn restore_backup(&self, name: &str) -> Result<()> {
        let backup_path = self.backups_dir.join(name);
        if !backup_path.is_file() {
            return Err(StorageError::BackupNotFound(name.to_string()));
        }
        let rows = read_rows(&backup_path)?;
        self.rewrite_all(&rows)?;
        info!(
            "restored `{}` from backup `{}` ({} rows)",
            self.path.display(),
            name,
            rows.len()
        );
        Ok(())
    }

    fn stem(&self) -> String {
        self.path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("ledger")
            .to_string()
    }

    fn backup_existing_file(&self) -> Result<Option<BackupInfo>> {
        if !self.path.is_file() {
            return Ok(None);
        }
        ensure_dir(&self.backups_dir)
            .map_err(|err| StorageError::io("create", &self.backups_dir, err))?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let name = format!("{}_{}.{}", self.stem(), timestamp, BACKUP_EXTENSION);
        let path = self.backups_dir.join(&name);
        fs::copy(&self.path, &path).map_err(|err| StorageError::io("back up", &self.path, err))?;
        info!("backed up `{}` to `{}`", self.path.display(), path.display());
        self.prune_backups();
        Ok(Some(BackupInfo { name, path }))
    }

    fn prune_backups(&self) {
        let backups = match self.list_backups() {
            Ok(backups) => backups,
            Err(err) => {
                warn!("unable to prune backups: {}", err);
                return;
            }
        };
        for entry in backups.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&entry.path) {
                warn!("unable to remove old backup `{}`: {}", entry.path.display(), err);
            }
        }
    }

    /// Makes sure the next appended record starts on its own line.
    fn terminate_last_line(&self, file: &mut File) -> Result<()> {
        let len = file
            .metadata()
            .map_err(|err| StorageError::io("inspect", &self.path, err))?
            .len();
        if len == 0 {
            return Ok(());
        }
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))
            .and_then(|_| file.read_exact(&mut last))
            .map_err(|err| StorageError::io("inspect", &self.path, err))?;
        if last[0] != b'\n' {
            file.write_all(b"\n")
                .map_err(|err| StorageError::io("append to", &self.path, err))?;
        }
        Ok(())
    }
}

impl LedgerStore for CsvLedgerStore {
    fn load_all(&self) -> Result<Vec<RawRow>> {
        match File::open(&self.path) {
            Ok(file) => read_from(file, &self.path),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(StorageError::io("open", &self.path, err)),
        }
    }

    fn append(&self, row: &RawRow) -> Result<()> {
        ensure_parent(&self.path)
            .map_err(|err| StorageError::io("create directory for", &self.path, err))?;
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|err| StorageError::io("open", &self.path, err))?;
        self.terminate_last_line(&mut file)?;

        let mut writer = csv_writer(file);
        writer
            .write_record(row.fields())
            .map_err(|err| StorageError::csv("write", &self.path, err))?;
        writer
            .flush()
            .map_err(|err| StorageError::io("flush", &self.path, err))?;
        writer
            .get_ref()
            .sync_all()
            .map_err(|err| StorageError::io("sync", &self.path, err))?;
        info!("appended 1 row to `{}`", self.path.display());
        Ok(())
    }

    fn rewrite_all(&self, rows: &[RawRow]) -> Result<()> {
        ensure_parent(&self.path)
            .map_err(|err| StorageError::io("create directory for", &self.path, err))?;
        self.backup_existing_file()?;

        let tmp = tmp_path(&self.path);
        let result = write_rows(&tmp, rows).and_then(|_| {
            fs::rename(&tmp, &self.path).map_err(|err| StorageError::io("replace", &self.path, err))
        });
        if result.is_err() && tmp.is_file() {
            let _ = fs::remove_file(&tmp);
        }
        result?;
        info!("rewrote `{}` with {} rows", self.path.display(), rows.len());
        Ok(())
    }
}

fn csv_writer<W: Write>(inner: W) -> csv::Writer<W> {
    WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(inner)
}

fn read_rows(path: &Path) -> Result<Vec<RawRow>> {
    let file = File::open(path).map_err(|err| StorageError::io("open", path, err))?;
    read_from(file, path)
}

fn read_from(file: File, path: &Path) -> Result<Vec<RawRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(BufReader::new(file));
    let mut rows: Vec<RawRow> = Vec::new();
    for record in reader.byte_records() {
        let record = record.map_err(|err| StorageError::csv("read", path, err))?;
        rows.push(
            record
                .iter()
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .collect(),
        );
    }
    Ok(rows)
}

fn write_rows(path: &Path, rows: &[RawRow]) -> Result<()> {
    let file = File::create(path).map_err(|err| StorageError::io("create", path, err))?;
    let mut writer = csv_writer(file);
    for row in rows {
        writer
            .write_record(row.fields())
            .map_err(|err| StorageError::csv("write", path, err))?;
    }
    writer
        .flush()
        .map_err(|err| StorageError::io("flush", path, err))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|err| StorageError::io("sync", path, err))?;
    Ok(())
}
