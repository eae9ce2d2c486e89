use std::fmt;

use serde::{Deserialize, Serialize};

/// Packed DVs that make a creature shiny: Attack 15, Defense/Speed/Special 10.
pub const SHINY_DVS: u16 = 0xFAAA;
/// Every DV at 15. Not shiny.
pub const PERFECT_DVS: u16 = 0xFFFF;

const SHINY_ATTACK_VALUES: [u8; 8] = [2, 3, 6, 7, 10, 11, 14, 15];

/// Determinant values, one nibble per stat, packed as
/// `attack<<12 | defense<<8 | speed<<4 | special`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dvs {
    pub attack: u8,
    pub defense: u8,
    pub speed: u8,
    pub special: u8,
}

impl Dvs {
    pub fn from_raw(raw: u16) -> Self {
        Self {
            attack: ((raw >> 12) & 0xF) as u8,
            defense: ((raw >> 8) & 0xF) as u8,
            speed: ((raw >> 4) & 0xF) as u8,
            special: (raw & 0xF) as u8,
        }
    }

    /// Nibbles above 15 are masked off.
    pub fn raw(&self) -> u16 {
        (u16::from(self.attack & 0xF) << 12)
            | (u16::from(self.defense & 0xF) << 8)
            | (u16::from(self.speed & 0xF) << 4)
            | u16::from(self.special & 0xF)
    }

    /// HP has no stored nibble; it is assembled from the low bit of the others.
    pub fn hp(&self) -> u8 {
        ((self.attack & 1) << 3)
            | ((self.defense & 1) << 2)
            | ((self.speed & 1) << 1)
            | (self.special & 1)
    }

    pub fn is_shiny(&self) -> bool {
        self.defense == 10
            && self.speed == 10
            && self.special == 10
            && SHINY_ATTACK_VALUES.contains(&self.attack)
    }

    pub fn shiny() -> Self {
        Self::from_raw(SHINY_DVS)
    }

    pub fn perfect() -> Self {
        Self::from_raw(PERFECT_DVS)
    }
}

impl fmt::Display for Dvs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HP={} Atk={} Def={} Spd={} Spc={}",
            self.hp(),
            self.attack,
            self.defense,
            self.speed,
            self.special
        )
    }
}
