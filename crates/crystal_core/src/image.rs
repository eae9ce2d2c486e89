use std::fmt;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use log::{debug, info};

use crate::core_api::{CoreError, CoreErrorCode};
use crate::layout::ByteRange;

/// Every supported save is exactly 32 KiB of battery-backed SRAM.
pub const SAVE_SIZE: usize = 0x8000;

/// The whole save file held in memory. The length invariant is checked on
/// construction and every accessor rejects offsets past the end.
#[derive(Clone, PartialEq, Eq)]
pub struct SaveImage {
    bytes: Vec<u8>,
}

impl SaveImage {
    pub fn from_bytes<B: AsRef<[u8]>>(bytes: B) -> Result<Self, CoreError> {
        let bytes = bytes.as_ref();
        if bytes.len() != SAVE_SIZE {
            return Err(CoreError::new(
                CoreErrorCode::Format,
                format!(
                    "save image must be exactly {SAVE_SIZE} bytes, got {}",
                    bytes.len()
                ),
            ));
        }
        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    pub fn blank() -> Self {
        Self {
            bytes: vec![0u8; SAVE_SIZE],
        }
    }

    pub fn read_from(path: &Path) -> Result<Self, CoreError> {
        let mut file = File::open(path)?;
        let mut bytes = Vec::with_capacity(SAVE_SIZE);
        file.read_to_end(&mut bytes)?;
        debug!("read {} bytes from {}", bytes.len(), path.display());
        Self::from_bytes(bytes)
    }

    /// Writes the whole image next to `path` and renames it into place, so a
    /// failed write never leaves a half-written save behind.
    pub fn write_to(&self, path: &Path) -> Result<(), CoreError> {
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = Path::new(&tmp);

        let result = File::create(tmp)
            .and_then(|mut file| {
                file.write_all(&self.bytes)?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(tmp, path));
        if let Err(err) = result {
            let _ = fs::remove_file(tmp);
            return Err(err.into());
        }

        info!("wrote {} bytes to {}", self.bytes.len(), path.display());
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn u8_at(&self, offset: usize) -> Result<u8, CoreError> {
        Ok(self.slice(ByteRange::new(offset, offset + 1))?[0])
    }

    pub fn slice(&self, range: ByteRange) -> Result<&[u8], CoreError> {
        self.check(range)?;
        Ok(&self.bytes[range.start..range.end])
    }

    pub fn u16_le_at(&self, offset: usize) -> Result<u16, CoreError> {
        let raw = self.slice(ByteRange::new(offset, offset + 2))?;
        Ok(u16::from_le_bytes([raw[0], raw[1]]))
    }

    pub fn u16_be_at(&self, offset: usize) -> Result<u16, CoreError> {
        let raw = self.slice(ByteRange::new(offset, offset + 2))?;
        Ok(u16::from_be_bytes([raw[0], raw[1]]))
    }

    /// Raw mutable access for the codec layer and the transaction.
    pub(crate) fn write_u8(&mut self, offset: usize, value: u8) -> Result<(), CoreError> {
        self.write_slice(offset, &[value])
    }

    pub(crate) fn write_u16_le(&mut self, offset: usize, value: u16) -> Result<(), CoreError> {
        self.write_slice(offset, &value.to_le_bytes())
    }

    pub(crate) fn write_u16_be(&mut self, offset: usize, value: u16) -> Result<(), CoreError> {
        self.write_slice(offset, &value.to_be_bytes())
    }

    pub(crate) fn write_slice(&mut self, offset: usize, data: &[u8]) -> Result<(), CoreError> {
        let range = ByteRange::new(offset, offset + data.len());
        self.check(range)?;
        self.bytes[range.start..range.end].copy_from_slice(data);
        Ok(())
    }

    fn check(&self, range: ByteRange) -> Result<(), CoreError> {
        if range.start > range.end || range.end > self.bytes.len() {
            return Err(CoreError::new(
                CoreErrorCode::Format,
                format!("access {range} is outside the {SAVE_SIZE}-byte image"),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for SaveImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaveImage")
            .field("len", &self.bytes.len())
            .finish()
    }
}
