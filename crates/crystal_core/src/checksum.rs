//! Additive 16-bit bank checksums, bit-compatible with the game's own check.

use log::{debug, warn};
use serde::Serialize;

use crate::core_api::{CoreError, CoreErrorCode};
use crate::image::SaveImage;
use crate::layout::{BankId, BankLayout, BankRole, SaveLayout};

/// Sum of every byte in `[start, end)` of the bank's checksum range, mod 65536.
pub fn compute(image: &SaveImage, bank: &BankLayout) -> Result<u16, CoreError> {
    let bytes = image.slice(bank.checksum_range)?;
    Ok(bytes
        .iter()
        .fold(0u16, |sum, &byte| sum.wrapping_add(u16::from(byte))))
}

/// Little-endian value currently stored at the bank's checksum offset.
pub fn stored(image: &SaveImage, bank: &BankLayout) -> Result<u16, CoreError> {
    image.u16_le_at(bank.checksum_offset)
}

pub fn verify(image: &SaveImage, bank: &BankLayout) -> Result<bool, CoreError> {
    Ok(compute(image, bank)? == stored(image, bank)?)
}

pub(crate) fn write_checksum(image: &mut SaveImage, bank: &BankLayout) -> Result<u16, CoreError> {
    let sum = compute(image, bank)?;
    image.write_u16_le(bank.checksum_offset, sum)?;
    debug!(
        "{} checksum 0x{:04X} written at 0x{:04X}",
        bank.id, sum, bank.checksum_offset
    );
    Ok(sum)
}

/// The bank the game will load: primary if it verifies, else secondary.
pub fn authoritative_bank<'a>(
    image: &SaveImage,
    layout: &'a SaveLayout,
) -> Result<&'a BankLayout, CoreError> {
    let primary = layout.primary();
    if verify(image, primary)? {
        return Ok(primary);
    }

    let secondary = layout.secondary();
    if verify(image, secondary)? {
        warn!(
            "{} checksum is invalid; the game falls back to {}",
            primary.id, secondary.id
        );
        return Ok(secondary);
    }

    Err(CoreError::new(
        CoreErrorCode::BothBanksCorrupt,
        format!(
            "neither {} nor {} has a valid checksum; restore from a backup",
            primary.id, secondary.id
        ),
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BankStatus {
    pub bank: BankId,
    pub role: BankRole,
    pub stored: u16,
    pub computed: u16,
    pub valid: bool,
}

pub fn bank_status(image: &SaveImage, bank: &BankLayout) -> Result<BankStatus, CoreError> {
    let stored = stored(image, bank)?;
    let computed = compute(image, bank)?;
    Ok(BankStatus {
        bank: bank.id,
        role: bank.role,
        stored,
        computed,
        valid: stored == computed,
    })
}

/// Status of both banks, in layout order.
pub fn inspect(image: &SaveImage, layout: &SaveLayout) -> Result<[BankStatus; 2], CoreError> {
    Ok([
        bank_status(image, &layout.banks[0])?,
        bank_status(image, &layout.banks[1])?,
    ])
}

/// Turns a failed verification into a `ChecksumMismatch` error.
pub fn require_valid(image: &SaveImage, bank: &BankLayout) -> Result<(), CoreError> {
    let status = bank_status(image, bank)?;
    if status.valid {
        return Ok(());
    }
    Err(CoreError::new(
        CoreErrorCode::ChecksumMismatch,
        format!(
            "{} stores checksum 0x{:04X} but its data sums to 0x{:04X}",
            bank.id, status.stored, status.computed
        ),
    ))
}
