//! Per-category, per-day JSON snapshots.
//!
//! # Layout
//!
//! ```text
//! data_dir/
//! ├── news/
//! │   ├── items_2025-05-05.json
//! │   └── items_2025-05-06.json
//! ├── papers/
//! └── github/
//! ```
//!
//! Each file holds a JSON array of records for one category and one local
//! date. A file goes from absent to populated on the first `add` that brings
//! something new, may be rewritten by later `add` calls the same day, and is
//! deleted whole by `purge` once its date falls out of the retention window.
//!
//! # Concurrency
//!
//! There is no locking. Two processes adding to the same category+day at
//! the same time race on load/save and the last save wins. Runs are expected
//! to be scheduled once a day, one process at a time.

use chrono::{Local, NaiveDate};
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

use crate::error::StoreError;
use crate::models::{Category, Record};

const FILE_PREFIX: &str = "items_";
const FILE_SUFFIX: &str = ".json";

/// Default number of days a daily file is kept.
pub const DEFAULT_RETENTION_DAYS: u32 = 7;

/// Handle on the data directory. Cheap to clone; holds no open files.
#[derive(Debug, Clone)]
pub struct DailyStore {
    root: PathBuf,
}

/// Today's date in local time, the key used for every daily file.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// File name for one day, e.g. `items_2025-05-06.json`.
pub fn file_name(day: NaiveDate) -> String {
    format!("{FILE_PREFIX}{}{FILE_SUFFIX}", day.format("%Y-%m-%d"))
}

/// Date encoded in a daily file name, or `None` for anything else.
pub fn parse_file_date(name: &str) -> Option<NaiveDate> {
    let date = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_SUFFIX)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

impl DailyStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn category_dir(&self, category: Category) -> PathBuf {
        self.root.join(category.as_str())
    }

    pub fn path_for(&self, category: Category, day: NaiveDate) -> PathBuf {
        self.category_dir(category).join(file_name(day))
    }

    /// Records stored for `category` on `day`, in storage order.
    ///
    /// A missing file is an empty list. A file that exists but does not parse
    /// is [`StoreError::Corrupt`].
    #[instrument(level = "debug", skip(self))]
    pub async fn load<T: Record>(
        &self,
        category: Category,
        day: NaiveDate,
    ) -> Result<Vec<T>, StoreError> {
        let path = self.path_for(category, day);
        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No daily file yet");
                return Ok(Vec::new());
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        serde_json::from_slice(&raw).map_err(|source| StoreError::Corrupt { path, source })
    }

    /// Overwrite the full record set for `category` on `day`.
    ///
    /// Writes a sibling temp file and renames it over the target, so readers
    /// see either the old or the new list.
    #[instrument(level = "debug", skip(self, records), fields(count = records.len()))]
    pub async fn save<T: Record>(
        &self,
        category: Category,
        day: NaiveDate,
        records: &[T],
    ) -> Result<(), StoreError> {
        let dir = self.category_dir(category);
        fs::create_dir_all(&dir)
            .await
            .map_err(|source| StoreError::Io {
                path: dir.clone(),
                source,
            })?;

        let path = self.path_for(category, day);
        let json = serde_json::to_vec_pretty(records).map_err(|source| StoreError::Corrupt {
            path: path.clone(),
            source,
        })?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).await.map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|source| StoreError::Io { path, source })?;
        Ok(())
    }

    /// Merge `new_records` into the file for `category` on `day`.
    ///
    /// Records whose `link` is already stored (or repeated earlier in
    /// `new_records`) are skipped, as are records without a title or link.
    /// The file is only written when something was added. Titles are not
    /// compared across runs.
    ///
    /// Returns the number of records added.
    #[instrument(level = "debug", skip(self, new_records), fields(incoming = new_records.len()))]
    pub async fn add<T: Record>(
        &self,
        category: Category,
        new_records: Vec<T>,
        day: NaiveDate,
    ) -> Result<usize, StoreError> {
        let mut existing: Vec<T> = self.load(category, day).await?;
        let mut links: HashSet<String> = existing.iter().map(|r| r.link().to_string()).collect();

        let mut added = 0;
        for record in new_records {
            if !record.is_valid() {
                continue;
            }
            if links.insert(record.link().to_string()) {
                existing.push(record);
                added += 1;
            }
        }

        if added > 0 {
            self.save(category, day, &existing).await?;
        }
        Ok(added)
    }

    /// Delete daily files at least `max_age_days` old, judged by the date in
    /// the file name relative to `today`.
    ///
    /// With a retention of 7 days a file dated exactly 7 days ago is deleted,
    /// and one dated 6 days ago is kept. Files whose names are not daily file
    /// names are left alone. When `category` is `None` every subdirectory of
    /// the data directory is swept.
    ///
    /// Returns the number of files removed.
    #[instrument(level = "info", skip(self))]
    pub async fn purge(
        &self,
        max_age_days: u32,
        category: Option<Category>,
        today: NaiveDate,
    ) -> Result<usize, StoreError> {
        let dirs = match category {
            Some(category) => vec![self.category_dir(category)],
            None => self.category_dirs().await?,
        };

        let mut removed = 0;
        for dir in dirs {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(source) => return Err(StoreError::Io { path: dir, source }),
            };

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|source| StoreError::Io {
                    path: dir.clone(),
                    source,
                })?
            {
                let name = entry.file_name();
                let Some(file_date) = name.to_str().and_then(parse_file_date) else {
                    continue;
                };
                let age = (today - file_date).num_days();
                if age < i64::from(max_age_days) {
                    continue;
                }

                let path = entry.path();
                match fs::remove_file(&path).await {
                    Ok(()) => {
                        removed += 1;
                        info!(path = %path.display(), age_days = age, "Purged daily file");
                    }
                    Err(e) => warn!(path = %path.display(), error = %e, "Failed to purge daily file"),
                }
            }
        }
        Ok(removed)
    }

    async fn category_dirs(&self) -> Result<Vec<PathBuf>, StoreError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|source| StoreError::Io {
                path: self.root.clone(),
                source,
            })?;

        let mut dirs = Vec::new();
        let mut entries = fs::read_dir(&self.root)
            .await
            .map_err(|source| StoreError::Io {
                path: self.root.clone(),
                source,
            })?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| StoreError::Io {
                path: self.root.clone(),
                source,
            })?
        {
            if entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false) {
                dirs.push(entry.path());
            }
        }
        Ok(dirs)
    }
}
