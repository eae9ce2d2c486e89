//! The game's 8-bit character set for player names and nicknames.

use crate::layout::NAME_LENGTH;

pub const TERMINATOR: u8 = 0x50;
/// Visible characters that fit in a name field; the last byte is always a
/// terminator.
pub const NAME_MAX_CHARS: usize = NAME_LENGTH - 1;

fn encode_char(c: char) -> u8 {
    match c {
        'A'..='Z' => 0x80 + (c as u8 - b'A'),
        'a'..='z' => 0xA0 + (c as u8 - b'a'),
        ' ' => 0x7F,
        '-' => 0xE3,
        '.' => 0xE8,
        '♂' => 0xEF,
        '♀' => 0xF5,
        _ => TERMINATOR,
    }
}

fn decode_byte(byte: u8) -> char {
    match byte {
        0x80..=0x99 => char::from(b'A' + (byte - 0x80)),
        0xA0..=0xB9 => char::from(b'a' + (byte - 0xA0)),
        0x7F => ' ',
        0xE3 => '-',
        0xE8 => '.',
        0xEF => '♂',
        0xF5 => '♀',
        _ => '?',
    }
}

/// Encodes a name into a terminator-padded 11-byte field. Never fails:
/// characters outside the table become terminators.
pub fn encode(name: &str) -> [u8; NAME_LENGTH] {
    let mut out = [TERMINATOR; NAME_LENGTH];
    for (slot, c) in out.iter_mut().zip(name.chars().take(NAME_MAX_CHARS)) {
        *slot = encode_char(c);
    }
    out
}

pub fn decode(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take_while(|&&byte| byte != TERMINATOR)
        .map(|&byte| decode_byte(byte))
        .collect()
}
