use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

pub const INVENTORY: &str = "inventory";
pub const RESERVATIONS: &str = "reservations";
pub const ADMIN_USERS: &str = "admin_users";

#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Encode(String),
    Corrupt { name: String, reason: &'static str },
    InvalidName(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "io: {e}"),
            StoreError::Encode(e) => write!(f, "encode: {e}"),
            StoreError::Corrupt { name, reason } => write!(f, "blob {name} is corrupt: {reason}"),
            StoreError::InvalidName(name) => write!(f, "invalid blob name: {name:?}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::Io(e)
    }
}

/// Write one record as `[len][bincode][crc32]`.
fn encode_record(writer: &mut impl Write, payload: &[u8]) -> io::Result<()> {
    let len = payload.len() as u32;
    let crc = crc32fast::hash(payload);
    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(payload)?;
    writer.write_all(&crc.to_le_bytes())?;
    Ok(())
}

/// Named snapshot blobs in a data directory, one file per name.
///
/// Format per file: `[u32: len][bincode: value][u32: crc32]`.
/// - Saves go to `<name>.bin.tmp`, are fsynced, then renamed over `<name>.bin`,
///   so a crash leaves either the old or the new snapshot.
/// - A truncated or CRC-mismatched file loads as `StoreError::Corrupt`.
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Open (creating if needed) the data directory.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn blob_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        // Names become file names: no separators or dots.
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{name}.bin")))
    }

    pub fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        let path = self.blob_path(name)?;
        let payload = bincode::serialize(value).map_err(|e| StoreError::Encode(e.to_string()))?;

        let start = std::time::Instant::now();
        let tmp_path = path.with_extension("bin.tmp");
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        encode_record(&mut writer, &payload)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        fs::rename(&tmp_path, &path)?;

        metrics::histogram!(crate::observability::STORE_SAVE_DURATION_SECONDS, "blob" => name.to_string())
            .record(start.elapsed().as_secs_f64());
        tracing::debug!("saved blob {name} ({} bytes)", payload.len());
        Ok(())
    }

    /// `Ok(None)` when the blob was never saved.
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StoreError> {
        let path = self.blob_path(name)?;
        let mut file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;

        let corrupt = |reason| StoreError::Corrupt {
            name: name.to_string(),
            reason,
        };

        if bytes.len() < 8 {
            return Err(corrupt("truncated header"));
        }
        let len = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        if bytes.len() != 4 + len + 4 {
            return Err(corrupt("length mismatch"));
        }
        let payload = &bytes[4..4 + len];
        let crc_bytes = &bytes[4 + len..];
        let stored_crc = u32::from_le_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);
        if stored_crc != crc32fast::hash(payload) {
            return Err(corrupt("checksum mismatch"));
        }

        bincode::deserialize(payload)
            .map(Some)
            .map_err(|_| corrupt("undecodable payload"))
    }

    /// Load a blob, falling back to `default` when it is missing or unreadable.
    /// A corrupt file is moved to `<name>.bin.corrupt` first, so the next save
    /// cannot overwrite the only copy.
    pub fn load_or<T: DeserializeOwned>(&self, name: &str, default: impl FnOnce() -> T) -> T {
        match self.load(name) {
            Ok(Some(value)) => value,
            Ok(None) => default(),
            Err(e) => {
                if matches!(e, StoreError::Corrupt { .. }) {
                    self.quarantine(name);
                }
                tracing::warn!("failed to load {name}, using defaults: {e}");
                default()
            }
        }
    }

    fn quarantine(&self, name: &str) {
        let Ok(path) = self.blob_path(name) else { return };
        let target = path.with_extension("bin.corrupt");
        match fs::rename(&path, &target) {
            Ok(()) => tracing::warn!("moved corrupt blob to {}", target.display()),
            Err(e) => tracing::error!("failed to move corrupt blob {name} aside: {e}"),
        }
    }
}
