//! Static description of the two save banks.
//!
//! Every supported game revision gets its own immutable [`SaveLayout`].
//! Offsets are absolute positions inside the 32 KiB save image. Bank 1 data
//! fields sit exactly [`MIRROR_DELTA`] bytes below their Bank 2 twins; the
//! checksum range and storage offsets do not follow that rule and are listed
//! literally.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core_api::{CoreError, CoreErrorCode};
use crate::image::SAVE_SIZE;

/// Distance between a Bank 2 data field and its Bank 1 copy.
pub const MIRROR_DELTA: usize = 0x0E00;

pub const NAME_LENGTH: usize = 11;
pub const PARTY_CAPACITY: usize = 6;
pub const PARTY_MON_SIZE: usize = 48;
pub const CHECKSUM_WIDTH: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        (self.start..self.end).contains(&offset)
    }

    pub fn covers(&self, other: &ByteRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn overlaps(&self, other: &ByteRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}..0x{:04X}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BankId {
    Bank1,
    Bank2,
}

impl BankId {
    pub fn number(self) -> u8 {
        match self {
            Self::Bank1 => 1,
            Self::Bank2 => 2,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Self::Bank1 => Self::Bank2,
            Self::Bank2 => Self::Bank1,
        }
    }
}

impl fmt::Display for BankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bank {}", self.number())
    }
}

/// The game loads the primary bank first and only falls back to the
/// secondary bank when the primary checksum fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BankRole {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PocketKind {
    Items,
    Balls,
    KeyItems,
    TmHm,
}

impl PocketKind {
    pub const ALL: [PocketKind; 4] = [Self::Items, Self::Balls, Self::KeyItems, Self::TmHm];

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Items => "items",
            Self::Balls => "balls",
            Self::KeyItems => "key_items",
            Self::TmHm => "tm_hm",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "items" | "item" => Some(Self::Items),
            "balls" | "ball" => Some(Self::Balls),
            "key_items" | "key-items" | "keyitems" => Some(Self::KeyItems),
            "tm_hm" | "tm-hm" | "tmhm" => Some(Self::TmHm),
            _ => None,
        }
    }
}

impl fmt::Display for PocketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Field {
    TrainerId,
    PlayerName,
    Money,
    PartyCount,
    PartySpecies,
    PartyData,
    OtNames,
    Nicknames,
}

impl Field {
    pub fn width(self) -> usize {
        match self {
            Self::TrainerId => 2,
            Self::PlayerName => NAME_LENGTH,
            Self::Money => 3,
            Self::PartyCount => 1,
            // species ids plus the 0xFF list terminator
            Self::PartySpecies => PARTY_CAPACITY + 1,
            Self::PartyData => PARTY_CAPACITY * PARTY_MON_SIZE,
            Self::OtNames | Self::Nicknames => PARTY_CAPACITY * NAME_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldOffset {
    pub field: Field,
    pub offset: usize,
}

/// Count byte, `capacity` two-byte `(item, quantity)` slots, then one
/// terminator byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PocketLayout {
    pub kind: PocketKind,
    pub count_offset: usize,
    pub capacity: usize,
}

impl PocketLayout {
    pub fn slot_offset(&self, index: usize) -> usize {
        self.count_offset + 1 + index * 2
    }

    pub fn terminator_offset(&self) -> usize {
        self.slot_offset(self.capacity)
    }

    pub fn range(&self) -> ByteRange {
        ByteRange::new(self.count_offset, self.terminator_offset() + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankLayout {
    pub id: BankId,
    pub role: BankRole,
    pub checksum_range: ByteRange,
    pub checksum_offset: usize,
    pub fields: &'static [FieldOffset],
    pub pockets: &'static [PocketLayout],
}

impl BankLayout {
    pub fn offset(&self, field: Field) -> Result<usize, CoreError> {
        self.fields
            .iter()
            .find(|entry| entry.field == field)
            .map(|entry| entry.offset)
            .ok_or_else(|| {
                CoreError::new(
                    CoreErrorCode::UnknownField,
                    format!("{:?} is not mapped in {}", field, self.id),
                )
            })
    }

    pub fn field_range(&self, field: Field) -> Result<ByteRange, CoreError> {
        let start = self.offset(field)?;
        Ok(ByteRange::new(start, start + field.width()))
    }

    pub fn pocket(&self, kind: PocketKind) -> Result<&PocketLayout, CoreError> {
        self.pockets
            .iter()
            .find(|pocket| pocket.kind == kind)
            .ok_or_else(|| {
                CoreError::new(
                    CoreErrorCode::UnknownField,
                    format!("pocket {kind} is not mapped in {}", self.id),
                )
            })
    }

    pub fn checksum_storage(&self) -> ByteRange {
        ByteRange::new(self.checksum_offset, self.checksum_offset + CHECKSUM_WIDTH)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Revision {
    CrystalUsEu,
}

impl Revision {
    pub fn layout(self) -> &'static SaveLayout {
        match self {
            Self::CrystalUsEu => &CRYSTAL_US_EU,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::CrystalUsEu => "crystal-us-eu",
        }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveLayout {
    pub revision: Revision,
    /// Stored in write order: Bank 1 first, then Bank 2.
    pub banks: [BankLayout; 2],
}

impl SaveLayout {
    pub fn bank(&self, id: BankId) -> &BankLayout {
        match id {
            BankId::Bank1 => &self.banks[0],
            BankId::Bank2 => &self.banks[1],
        }
    }

    pub fn primary(&self) -> &BankLayout {
        self.by_role(BankRole::Primary)
    }

    pub fn secondary(&self) -> &BankLayout {
        self.by_role(BankRole::Secondary)
    }

    fn by_role(&self, role: BankRole) -> &BankLayout {
        if self.banks[0].role == role {
            &self.banks[0]
        } else {
            &self.banks[1]
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let roles = (self.banks[0].role, self.banks[1].role);
        if roles.0 == roles.1 {
            return Err(format_error(format!(
                "{} layout needs one primary and one secondary bank, got {:?}",
                self.revision, roles
            )));
        }
        if self.banks[0].id == self.banks[1].id {
            return Err(format_error(format!(
                "{} layout lists {} twice",
                self.revision, self.banks[0].id
            )));
        }

        for bank in &self.banks {
            validate_bank(bank)?;
        }

        let [a, b] = &self.banks;
        let a_span = ByteRange::new(a.checksum_range.start, a.checksum_storage().end);
        let b_span = ByteRange::new(b.checksum_range.start, b.checksum_storage().end);
        if a.checksum_range.overlaps(&b.checksum_range)
            || a_span.overlaps(&b.checksum_storage())
            || b_span.overlaps(&a.checksum_storage())
        {
            return Err(format_error(format!(
                "{} and {} checksum regions overlap: {} vs {}",
                a.id, b.id, a.checksum_range, b.checksum_range
            )));
        }

        Ok(())
    }
}

fn validate_bank(bank: &BankLayout) -> Result<(), CoreError> {
    let range = bank.checksum_range;
    if range.start >= range.end || range.end > bank.checksum_offset {
        return Err(format_error(format!(
            "{} checksum range {} must end at or before storage 0x{:04X}",
            bank.id, range, bank.checksum_offset
        )));
    }
    if bank.checksum_storage().end > SAVE_SIZE {
        return Err(format_error(format!(
            "{} checksum storage 0x{:04X} lies outside the image",
            bank.id, bank.checksum_offset
        )));
    }

    for entry in bank.fields {
        let field_range = ByteRange::new(entry.offset, entry.offset + entry.field.width());
        if !range.covers(&field_range) {
            return Err(format_error(format!(
                "{} field {:?} at {} is outside checksum range {}",
                bank.id, entry.field, field_range, range
            )));
        }
    }
    for pocket in bank.pockets {
        if !range.covers(&pocket.range()) {
            return Err(format_error(format!(
                "{} pocket {} at {} is outside checksum range {}",
                bank.id,
                pocket.kind,
                pocket.range(),
                range
            )));
        }
    }

    Ok(())
}

fn format_error(message: String) -> CoreError {
    CoreError::new(CoreErrorCode::Format, message)
}

// US/EU Crystal, primary bank.
const B2_TRAINER_ID: usize = 0x2009;
const B2_PLAYER_NAME: usize = 0x200B;
const B2_MONEY: usize = 0x23DC;
const B2_ITEM_POCKET: usize = 0x241A;
const B2_BALL_POCKET: usize = 0x2465;
const B2_PARTY_COUNT: usize = 0x2865;
const B2_PARTY_SPECIES: usize = 0x2866;
const B2_PARTY_DATA: usize = 0x286D;
const B2_OT_NAMES: usize = 0x298D;
const B2_NICKNAMES: usize = 0x29CF;

const ITEM_POCKET_CAPACITY: usize = 20;
const BALL_POCKET_CAPACITY: usize = 12;

const CRYSTAL_BANK2_FIELDS: &[FieldOffset] = &[
    FieldOffset { field: Field::TrainerId, offset: B2_TRAINER_ID },
    FieldOffset { field: Field::PlayerName, offset: B2_PLAYER_NAME },
    FieldOffset { field: Field::Money, offset: B2_MONEY },
    FieldOffset { field: Field::PartyCount, offset: B2_PARTY_COUNT },
    FieldOffset { field: Field::PartySpecies, offset: B2_PARTY_SPECIES },
    FieldOffset { field: Field::PartyData, offset: B2_PARTY_DATA },
    FieldOffset { field: Field::OtNames, offset: B2_OT_NAMES },
    FieldOffset { field: Field::Nicknames, offset: B2_NICKNAMES },
];

const CRYSTAL_BANK1_FIELDS: &[FieldOffset] = &[
    FieldOffset { field: Field::TrainerId, offset: B2_TRAINER_ID - MIRROR_DELTA },
    FieldOffset { field: Field::PlayerName, offset: B2_PLAYER_NAME - MIRROR_DELTA },
    FieldOffset { field: Field::Money, offset: B2_MONEY - MIRROR_DELTA },
    FieldOffset { field: Field::PartyCount, offset: B2_PARTY_COUNT - MIRROR_DELTA },
    FieldOffset { field: Field::PartySpecies, offset: B2_PARTY_SPECIES - MIRROR_DELTA },
    FieldOffset { field: Field::PartyData, offset: B2_PARTY_DATA - MIRROR_DELTA },
    FieldOffset { field: Field::OtNames, offset: B2_OT_NAMES - MIRROR_DELTA },
    FieldOffset { field: Field::Nicknames, offset: B2_NICKNAMES - MIRROR_DELTA },
];

const CRYSTAL_BANK2_POCKETS: &[PocketLayout] = &[
    PocketLayout {
        kind: PocketKind::Items,
        count_offset: B2_ITEM_POCKET,
        capacity: ITEM_POCKET_CAPACITY,
    },
    PocketLayout {
        kind: PocketKind::Balls,
        count_offset: B2_BALL_POCKET,
        capacity: BALL_POCKET_CAPACITY,
    },
];

const CRYSTAL_BANK1_POCKETS: &[PocketLayout] = &[
    PocketLayout {
        kind: PocketKind::Items,
        count_offset: B2_ITEM_POCKET - MIRROR_DELTA,
        capacity: ITEM_POCKET_CAPACITY,
    },
    PocketLayout {
        kind: PocketKind::Balls,
        count_offset: B2_BALL_POCKET - MIRROR_DELTA,
        capacity: BALL_POCKET_CAPACITY,
    },
];

pub static CRYSTAL_US_EU: SaveLayout = SaveLayout {
    revision: Revision::CrystalUsEu,
    banks: [
        BankLayout {
            id: BankId::Bank1,
            role: BankRole::Secondary,
            checksum_range: ByteRange::new(0x1209, 0x1D83),
            checksum_offset: 0x1F0D,
            fields: CRYSTAL_BANK1_FIELDS,
            pockets: CRYSTAL_BANK1_POCKETS,
        },
        BankLayout {
            id: BankId::Bank2,
            role: BankRole::Primary,
            checksum_range: ByteRange::new(0x2009, 0x2D69),
            checksum_offset: 0x2D69,
            fields: CRYSTAL_BANK2_FIELDS,
            pockets: CRYSTAL_BANK2_POCKETS,
        },
    ],
};
