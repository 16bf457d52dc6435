use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::model::entry::WorkEntry;
use crate::repository::traits::EntryRepository;

const DEFAULT_FILE_NAME: &str = "entries.json";
const SYNCED_FILE_NAME: &str = "work-hours.json";

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct EntryDocument {
    pub entries: Vec<WorkEntry>,
}

#[derive(Clone, Debug)]
pub struct FileEntryRepository {
    file_path: PathBuf,
    // Synced folders are never created here.
    synced: bool,
}

impl FileEntryRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut path = match base_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        fs::create_dir_all(&path)
            .with_context(|| format!("Could not create data directory {}", path.display()))?;
        path.push(DEFAULT_FILE_NAME);

        Ok(FileEntryRepository {
            file_path: path,
            synced: false,
        })
    }

    pub fn synced(folder: impl AsRef<Path>) -> Self {
        FileEntryRepository {
            file_path: folder.as_ref().join(SYNCED_FILE_NAME),
            synced: true,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn read_document(&self) -> Result<EntryDocument> {
        if !self.file_path.exists() {
            debug!(path = %self.file_path.display(), "no entry file yet");
            return Ok(EntryDocument::default());
        }
        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        let document = serde_json::from_reader(reader)
            .with_context(|| format!("Malformed entry file {}", self.file_path.display()))?;
        Ok(document)
    }

    fn write_document(&self, entries: &[WorkEntry]) -> Result<()> {
        let tmp_path = self.file_path.with_extension("json.tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &DocumentRef { entries })?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        // Rename replaces the target in one step, so readers never see a
        // half-written document.
        fs::rename(&tmp_path, &self.file_path)?;
        Ok(())
    }
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    entries: &'a [WorkEntry],
}

impl EntryRepository for FileEntryRepository {
    fn authorize(&self) -> Result<()> {
        let dir = self
            .file_path
            .parent()
            .ok_or_else(|| anyhow!("Invalid entry file path {}", self.file_path.display()))?;
        if !dir.is_dir() {
            if self.synced {
                return Err(anyhow!("Synced folder {} is not available", dir.display()));
            }
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    fn load(&self) -> Result<Vec<WorkEntry>> {
        let document = self.read_document()?;
        info!(path = %self.file_path.display(), count = document.entries.len(), "loaded entries");
        Ok(document.entries)
    }

    fn save(&self, entries: &[WorkEntry]) -> Result<()> {
        self.write_document(entries)?;
        info!(path = %self.file_path.display(), count = entries.len(), "saved entries");
        Ok(())
    }

    fn describe(&self) -> String {
        let kind = if self.synced { "synced" } else { "local" };
        format!("{} ({})", self.file_path.display(), kind)
    }
}

pub fn default_data_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home_dir.join(".workhours"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entry::EntryId;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample() -> Vec<WorkEntry> {
        vec![
            WorkEntry {
                id: EntryId::Number(1),
                workplace: "Calma".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
                hours: 4,
                is_saturday: true,
            },
            WorkEntry {
                id: EntryId::generate(),
                workplace: "Holmes Place".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
                hours: 3,
                is_saturday: false,
            },
        ]
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let repo = FileEntryRepository::new(Some(dir.path().to_path_buf())).unwrap();
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_replaces_whole_collection() {
        let dir = TempDir::new().unwrap();
        let repo = FileEntryRepository::new(Some(dir.path().to_path_buf())).unwrap();

        let entries = sample();
        repo.save(&entries).unwrap();
        assert_eq!(repo.load().unwrap(), entries);

        repo.save(&entries[1..]).unwrap();
        assert_eq!(repo.load().unwrap(), entries[1..].to_vec());
        assert!(!dir.path().join("entries.json.tmp").exists());
    }

    #[test]
    fn test_document_shape() {
        let dir = TempDir::new().unwrap();
        let repo = FileEntryRepository::new(Some(dir.path().to_path_buf())).unwrap();
        repo.save(&sample()).unwrap();

        let raw = fs::read_to_string(repo.file_path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["entries"][0]["isSaturday"], true);
        assert_eq!(value["entries"][0]["date"], "2024-03-09");
    }

    #[test]
    fn test_loads_hours_stored_as_strings() {
        let dir = TempDir::new().unwrap();
        let repo = FileEntryRepository::new(Some(dir.path().to_path_buf())).unwrap();
        fs::write(
            repo.file_path(),
            r#"{"entries":[{"id":1709553600000,"workplace":"Calma","date":"2024-03-04","hours":"5","isSaturday":false}]}"#,
        )
        .unwrap();
        let loaded = repo.load().unwrap();
        assert_eq!(loaded[0].hours, 5);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let repo = FileEntryRepository::new(Some(dir.path().to_path_buf())).unwrap();
        fs::write(repo.file_path(), "{ not json").unwrap();
        assert!(repo.load().is_err());
    }

    #[test]
    fn test_out_of_range_hours_fail_the_load() {
        let dir = TempDir::new().unwrap();
        let repo = FileEntryRepository::new(Some(dir.path().to_path_buf())).unwrap();
        fs::write(
            repo.file_path(),
            r#"{"entries":[
                {"id":1,"workplace":"Calma","date":"2024-03-04","hours":4294967295,"isSaturday":false},
                {"id":2,"workplace":"Calma","date":"2024-03-05","hours":"2","isSaturday":false}
            ]}"#,
        )
        .unwrap();
        assert!(repo.load().is_err());
    }

    #[test]
    fn test_synced_folder_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = FileEntryRepository::synced(dir.path().join("Drive"));
        assert!(missing.authorize().is_err());
        assert!(!dir.path().join("Drive").exists());

        let present = FileEntryRepository::synced(dir.path());
        present.authorize().unwrap();
        present.save(&sample()).unwrap();
        assert!(dir.path().join("work-hours.json").exists());
        assert!(present.describe().ends_with("(synced)"));
    }
}
