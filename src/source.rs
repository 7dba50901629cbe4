// src/source.rs
use crate::error::Result;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tracing::debug;

#[cfg(feature = "mmap")]
use memmap2::Mmap;

/// A metadata buffer plus the recording time reported by the prober
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMetadata {
    pub bytes: Bytes,
    pub creation_time: Option<String>,
}

impl RawMetadata {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        RawMetadata { bytes: bytes.into(), creation_time: None }
    }

    pub fn with_creation_time(mut self, creation_time: impl Into<String>) -> Self {
        self.creation_time = Some(creation_time.into());
        self
    }
}

/// Anything that can hand over a complete metadata buffer
pub trait MetadataSource {
    fn load(&self) -> Result<RawMetadata>;

    /// Name used for the report's `source` field
    fn name(&self) -> Option<String> {
        None
    }
}

impl MetadataSource for RawMetadata {
    fn load(&self) -> Result<RawMetadata> {
        Ok(self.clone())
    }
}

/// A standalone dump of a metadata track on disk
#[derive(Debug, Clone)]
pub struct DumpFile {
    path: PathBuf,
    creation_time: Option<String>,
}

impl DumpFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        DumpFile {
            path: path.as_ref().to_path_buf(),
            creation_time: None,
        }
    }

    pub fn with_creation_time(mut self, creation_time: impl Into<String>) -> Self {
        self.creation_time = Some(creation_time.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Map the dump into memory instead of reading it (requires "mmap" feature)
    #[cfg(feature = "mmap")]
    pub fn open_mmap(&self) -> Result<MappedDump> {
        let file = std::fs::File::open(&self.path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        debug!(path = %self.path.display(), len = mmap.len(), "mapped metadata dump");
        Ok(MappedDump {
            mmap,
            creation_time: self.creation_time.clone(),
        })
    }

    /// Read the dump on the tokio runtime (requires "async" feature)
    #[cfg(feature = "async")]
    pub async fn load_async(&self) -> Result<RawMetadata> {
        let bytes = tokio::fs::read(&self.path).await?;
        debug!(path = %self.path.display(), len = bytes.len(), "read metadata dump");
        Ok(RawMetadata {
            bytes: Bytes::from(bytes),
            creation_time: self.creation_time.clone(),
        })
    }
}

impl MetadataSource for DumpFile {
    fn load(&self) -> Result<RawMetadata> {
        let bytes = std::fs::read(&self.path)?;
        debug!(path = %self.path.display(), len = bytes.len(), "read metadata dump");
        Ok(RawMetadata {
            bytes: Bytes::from(bytes),
            creation_time: self.creation_time.clone(),
        })
    }

    fn name(&self) -> Option<String> {
        Some(self.path.display().to_string())
    }
}

/// Memory-mapped dump; decode straight from [`MappedDump::as_bytes`]
#[cfg(feature = "mmap")]
pub struct MappedDump {
    mmap: Mmap,
    creation_time: Option<String>,
}

#[cfg(feature = "mmap")]
impl MappedDump {
    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap
    }

    pub fn creation_time(&self) -> Option<&str> {
        self.creation_time.as_deref()
    }
}
