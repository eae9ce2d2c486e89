//! Three-byte packed BCD money, most significant digits first.

use crate::core_api::{CoreError, CoreErrorCode};
use crate::layout::Field;

use super::{BankView, BankViewMut};

pub const MAX_MONEY: u32 = 999_999;
pub const MONEY_WIDTH: usize = 3;

pub fn decode_bcd(bytes: &[u8]) -> Result<u32, CoreError> {
    let mut value = 0u32;
    for &byte in bytes {
        let high = byte >> 4;
        let low = byte & 0x0F;
        if high > 9 || low > 9 {
            return Err(CoreError::new(
                CoreErrorCode::InvalidEncoding,
                format!("byte 0x{byte:02X} is not a pair of decimal digits"),
            ));
        }
        value = value * 100 + u32::from(high) * 10 + u32::from(low);
    }
    Ok(value)
}

pub fn encode_bcd(value: u32) -> Result<[u8; MONEY_WIDTH], CoreError> {
    if value > MAX_MONEY {
        return Err(CoreError::new(
            CoreErrorCode::InvalidEncoding,
            format!("money {value} exceeds the maximum of {MAX_MONEY}"),
        ));
    }

    let mut out = [0u8; MONEY_WIDTH];
    let mut rest = value;
    for byte in out.iter_mut().rev() {
        let low = (rest % 10) as u8;
        rest /= 10;
        let high = (rest % 10) as u8;
        rest /= 10;
        *byte = (high << 4) | low;
    }
    Ok(out)
}

impl BankView<'_> {
    pub fn money(&self) -> Result<u32, CoreError> {
        decode_bcd(self.field_bytes(Field::Money)?)
    }
}

impl BankViewMut<'_> {
    pub(crate) fn set_money(&mut self, value: u32) -> Result<(), CoreError> {
        let encoded = encode_bcd(value)?;
        let offset = self.bank.offset(Field::Money)?;
        self.image.write_slice(offset, &encoded)
    }
}
