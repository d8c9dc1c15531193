//! File system storage for snapshots
//!
//! Each snapshot is a JSON Lines file `<id>.jsonl` under `<base>/snapshots`.
//! The first line is a header carrying the id, timestamp, provenance and
//! record count; every following line is one flat category record. Listing
//! reads headers only, so it costs the same for a ten-record snapshot as for
//! a hundred-thousand-record one.

use catalog_core::error::{CatalogError, Result};
use catalog_core::snapshot::{Snapshot, SnapshotInfo, SnapshotMetadata, SnapshotStorage};
use catalog_core::types::{CategoryRecord, SnapshotId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Layout version written into every header
const FORMAT_VERSION: u32 = 1;

const EXTENSION: &str = "jsonl";

/// First line of a snapshot file
#[derive(Debug, Serialize, Deserialize)]
struct Header {
    format: u32,
    #[serde(flatten)]
    info: SnapshotInfo,
}

impl Header {
    fn for_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            format: FORMAT_VERSION,
            info: snapshot.info(),
        }
    }
}

/// File system based snapshot storage
pub struct FileSystemStorage {
    base_dir: PathBuf,
    snapshots_dir: PathBuf,
}

impl FileSystemStorage {
    /// Open (and create if needed) a store rooted at `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        let snapshots_dir = base_dir.join("snapshots");

        fs::create_dir_all(&snapshots_dir).map_err(|e| {
            CatalogError::from(e).with_context(format!(
                "Failed to create snapshots directory {}",
                snapshots_dir.display()
            ))
        })?;
        debug!("Using snapshot directory {:?}", snapshots_dir);

        Ok(Self {
            base_dir,
            snapshots_dir,
        })
    }

    /// Create storage in the platform data directory (~/.catalog as fallback)
    pub fn default_location() -> Result<Self> {
        Self::new(Self::default_base_dir())
    }

    /// Platform data directory used by [`FileSystemStorage::default_location`]
    pub fn default_base_dir() -> PathBuf {
        directories::ProjectDirs::from("com", "catalog", "catalog")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".catalog")
            })
    }

    fn snapshot_path(&self, id: &SnapshotId) -> PathBuf {
        self.snapshots_dir.join(format!("{}.{}", id, EXTENSION))
    }

    fn temp_path(&self, id: &SnapshotId) -> PathBuf {
        self.snapshots_dir.join(format!(".{}.{}.tmp", id, EXTENSION))
    }

    /// Write header and records to a hidden temp file, then rename it into place
    fn write_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        let temp_path = self.temp_path(&snapshot.id);
        let final_path = self.snapshot_path(&snapshot.id);

        let write = || -> Result<()> {
            let mut writer = BufWriter::new(fs::File::create(&temp_path)?);
            serde_json::to_writer(&mut writer, &Header::for_snapshot(snapshot))?;
            writer.write_all(b"\n")?;
            for record in &snapshot.records {
                serde_json::to_writer(&mut writer, record)?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
            Ok(())
        };

        let result = write()
            .and_then(|()| fs::rename(&temp_path, &final_path).map_err(CatalogError::from));
        if let Err(e) = result {
            let _ = fs::remove_file(&temp_path);
            return Err(e.with_context(format!("Failed to write snapshot {}", snapshot.id)));
        }

        debug!(
            "Saved snapshot {} ({} records) to {:?}",
            snapshot.id,
            snapshot.record_count(),
            final_path
        );
        Ok(())
    }

    fn open(&self, path: &Path) -> Result<BufReader<fs::File>> {
        match fs::File::open(path) {
            Ok(file) => Ok(BufReader::new(file)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let id = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("unknown");
                Err(CatalogError::SnapshotNotFound(id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Read and check the header line
    fn read_header(reader: &mut impl BufRead, path: &Path) -> Result<Header> {
        let mut line = String::new();
        reader.read_line(&mut line)?;
        let header: Header = serde_json::from_str(line.trim_end()).map_err(|e| {
            CatalogError::from(e).with_context(format!("Bad header in {}", path.display()))
        })?;

        if header.format != FORMAT_VERSION {
            return Err(CatalogError::Validation(format!(
                "Unsupported snapshot format {} in {}",
                header.format,
                path.display()
            )));
        }

        let stem = path.file_stem().and_then(|s| s.to_str());
        if stem != Some(header.info.id.as_str()) {
            return Err(CatalogError::Validation(format!(
                "Header id {} does not match file {}",
                header.info.id,
                path.display()
            )));
        }

        Ok(header)
    }

    fn read_snapshot(&self, path: &Path) -> Result<Snapshot> {
        let mut reader = self.open(path)?;
        let header = Self::read_header(&mut reader, path)?;

        let mut records = Vec::with_capacity(header.info.record_count);
        for (offset, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: CategoryRecord = serde_json::from_str(&line).map_err(|e| {
                CatalogError::from(e)
                    .with_context(format!("{}:{}", path.display(), offset + 2))
            })?;
            records.push(record);
        }

        if records.len() != header.info.record_count {
            return Err(CatalogError::Validation(format!(
                "Snapshot {} is truncated: header says {} records, found {}",
                header.info.id,
                header.info.record_count,
                records.len()
            )));
        }

        let info = header.info;
        Ok(Snapshot {
            id: info.id,
            created_at: info.created_at,
            metadata: SnapshotMetadata {
                source: info.source,
                label: info.label,
            },
            records,
        })
    }

    fn is_snapshot_file(path: &Path) -> bool {
        let visible = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| !n.starts_with('.'))
            .unwrap_or(false);
        visible && path.extension().map(|e| e == EXTENSION).unwrap_or(false)
    }

    /// Get base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get snapshots directory
    pub fn snapshots_dir(&self) -> &Path {
        &self.snapshots_dir
    }
}

impl SnapshotStorage for FileSystemStorage {
    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        self.write_snapshot(snapshot)
    }

    fn load(&self, id: &SnapshotId) -> Result<Snapshot> {
        self.read_snapshot(&self.snapshot_path(id))
    }

    fn list(&self) -> Result<Vec<SnapshotInfo>> {
        let entries = fs::read_dir(&self.snapshots_dir).map_err(|e| {
            CatalogError::from(e).with_context(format!(
                "Failed to read {}",
                self.snapshots_dir.display()
            ))
        })?;

        let mut snapshots = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !Self::is_snapshot_file(&path) {
                continue;
            }

            let header = self
                .open(&path)
                .and_then(|mut reader| Self::read_header(&mut reader, &path));
            match header {
                Ok(header) => snapshots.push(header.info),
                Err(e) => warn!("Skipping unreadable snapshot {:?}: {}", path, e),
            }
        }

        Ok(snapshots)
    }

    fn delete(&self, id: &SnapshotId) -> Result<()> {
        let path = self.snapshot_path(id);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Deleted snapshot {} from {:?}", id, path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CatalogError::SnapshotNotFound(id.to_string()))
            }
            Err(e) => Err(CatalogError::from(e)
                .with_context(format!("Failed to delete snapshot {}", id))),
        }
    }

    fn exists(&self, id: &SnapshotId) -> bool {
        self.snapshot_path(id).is_file()
    }
}
