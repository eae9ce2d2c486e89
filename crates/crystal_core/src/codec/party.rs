//! Party slots 1 through 6: the species list, the 48-byte creature records,
//! and the two parallel 11-byte name tables.

use std::io::Cursor;

use serde::{Deserialize, Serialize};

use crate::core_api::{CoreError, CoreErrorCode};
use crate::dvs::Dvs;
use crate::layout::{Field, NAME_LENGTH, PARTY_CAPACITY, PARTY_MON_SIZE};
use crate::reader::{BigEndianReader, BigEndianWriter};
use crate::text;

use super::{slot_range, BankView, BankViewMut};

pub const SPECIES_LIST_TERMINATOR: u8 = 0xFF;
/// Largest value the three-byte experience field can hold.
pub const MAX_EXPERIENCE: u32 = 0x00FF_FFFF;

/// One party creature as stored in the save. Multi-byte fields are
/// big-endian on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyMon {
    pub species: u8,
    pub held_item: u8,
    pub moves: [u8; 4],
    pub ot_id: u16,
    pub experience: u32,
    /// HP, Attack, Defense, Speed, Special.
    pub stat_exp: [u16; 5],
    pub dvs: Dvs,
    pub pp: [u8; 4],
    pub friendship: u8,
    pub pokerus: u8,
    pub caught_data: u16,
    pub level: u8,
    pub status: u8,
    pub unused: u8,
    pub hp: u16,
    pub max_hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub speed: u16,
    pub special_attack: u16,
    pub special_defense: u16,
}

impl PartyMon {
    pub fn decode(bytes: &[u8]) -> Result<Self, CoreError> {
        if bytes.len() != PARTY_MON_SIZE {
            return Err(CoreError::new(
                CoreErrorCode::Format,
                format!(
                    "party record must be {PARTY_MON_SIZE} bytes, got {}",
                    bytes.len()
                ),
            ));
        }

        let mut r = BigEndianReader::new(bytes);
        Ok(Self {
            species: r.read_u8()?,
            held_item: r.read_u8()?,
            moves: r.read_array::<4>()?,
            ot_id: r.read_u16()?,
            experience: r.read_u24()?,
            stat_exp: r.read_u16_array::<5>()?,
            dvs: Dvs::from_raw(r.read_u16()?),
            pp: r.read_array::<4>()?,
            friendship: r.read_u8()?,
            pokerus: r.read_u8()?,
            caught_data: r.read_u16()?,
            level: r.read_u8()?,
            status: r.read_u8()?,
            unused: r.read_u8()?,
            hp: r.read_u16()?,
            max_hp: r.read_u16()?,
            attack: r.read_u16()?,
            defense: r.read_u16()?,
            speed: r.read_u16()?,
            special_attack: r.read_u16()?,
            special_defense: r.read_u16()?,
        })
    }

    pub fn encode(&self) -> Result<[u8; PARTY_MON_SIZE], CoreError> {
        if self.experience > MAX_EXPERIENCE {
            return Err(CoreError::new(
                CoreErrorCode::InvalidEncoding,
                format!("experience {} does not fit in three bytes", self.experience),
            ));
        }

        let mut out = [0u8; PARTY_MON_SIZE];
        let mut w = BigEndianWriter::new(Cursor::new(&mut out[..]));
        w.write_u8(self.species)?;
        w.write_u8(self.held_item)?;
        w.write_bytes(&self.moves)?;
        w.write_u16(self.ot_id)?;
        w.write_u24(self.experience)?;
        w.write_u16_slice(&self.stat_exp)?;
        w.write_u16(self.dvs.raw())?;
        w.write_bytes(&self.pp)?;
        w.write_u8(self.friendship)?;
        w.write_u8(self.pokerus)?;
        w.write_u16(self.caught_data)?;
        w.write_u8(self.level)?;
        w.write_u8(self.status)?;
        w.write_u8(self.unused)?;
        w.write_u16_slice(&[
            self.hp,
            self.max_hp,
            self.attack,
            self.defense,
            self.speed,
            self.special_attack,
            self.special_defense,
        ])?;
        Ok(out)
    }

    pub fn is_shiny(&self) -> bool {
        self.dvs.is_shiny()
    }
}

/// Maps a 1-based party slot to a table index.
pub fn slot_index(slot: usize) -> Result<usize, CoreError> {
    if (1..=PARTY_CAPACITY).contains(&slot) {
        Ok(slot - 1)
    } else {
        Err(CoreError::new(
            CoreErrorCode::InvalidSlot,
            format!("party slot {slot} is outside 1..={PARTY_CAPACITY}"),
        ))
    }
}

impl BankView<'_> {
    pub fn party_count(&self) -> Result<u8, CoreError> {
        self.image.u8_at(self.bank.offset(Field::PartyCount)?)
    }

    /// Slots the party count claims, clamped to the table size.
    pub fn occupied_slots(&self) -> Result<std::ops::RangeInclusive<usize>, CoreError> {
        let count = usize::from(self.party_count()?).min(PARTY_CAPACITY);
        Ok(1..=count)
    }

    /// Species id as listed in the party species table, which the game keeps
    /// alongside the species byte of each record.
    pub fn listed_species(&self, slot: usize) -> Result<u8, CoreError> {
        let index = slot_index(slot)?;
        self.image.u8_at(self.bank.offset(Field::PartySpecies)? + index)
    }

    pub fn party_mon_bytes(&self, slot: usize) -> Result<[u8; PARTY_MON_SIZE], CoreError> {
        let index = slot_index(slot)?;
        let base = self.bank.offset(Field::PartyData)?;
        let mut out = [0u8; PARTY_MON_SIZE];
        out.copy_from_slice(self.image.slice(slot_range(base, index, PARTY_MON_SIZE))?);
        Ok(out)
    }

    pub fn party_mon(&self, slot: usize) -> Result<PartyMon, CoreError> {
        PartyMon::decode(&self.party_mon_bytes(slot)?)
    }

    pub fn nickname_raw(&self, slot: usize) -> Result<[u8; NAME_LENGTH], CoreError> {
        self.name_raw(Field::Nicknames, slot)
    }

    pub fn nickname(&self, slot: usize) -> Result<String, CoreError> {
        Ok(text::decode(&self.nickname_raw(slot)?))
    }

    pub fn ot_name_raw(&self, slot: usize) -> Result<[u8; NAME_LENGTH], CoreError> {
        self.name_raw(Field::OtNames, slot)
    }

    pub fn ot_name(&self, slot: usize) -> Result<String, CoreError> {
        Ok(text::decode(&self.ot_name_raw(slot)?))
    }

    fn name_raw(&self, table: Field, slot: usize) -> Result<[u8; NAME_LENGTH], CoreError> {
        let index = slot_index(slot)?;
        let base = self.bank.offset(table)?;
        let mut out = [0u8; NAME_LENGTH];
        out.copy_from_slice(self.image.slice(slot_range(base, index, NAME_LENGTH))?);
        Ok(out)
    }
}

impl BankViewMut<'_> {
    pub(crate) fn set_party_mon_bytes(
        &mut self,
        slot: usize,
        bytes: &[u8; PARTY_MON_SIZE],
    ) -> Result<(), CoreError> {
        let index = slot_index(slot)?;
        let base = self.bank.offset(Field::PartyData)?;
        self.image
            .write_slice(slot_range(base, index, PARTY_MON_SIZE).start, bytes)
    }

    pub(crate) fn set_party_mon(&mut self, slot: usize, mon: &PartyMon) -> Result<(), CoreError> {
        let bytes = mon.encode()?;
        self.set_party_mon_bytes(slot, &bytes)
    }

    /// Reads, edits and writes back one record.
    pub(crate) fn update_party_mon<F>(&mut self, slot: usize, edit: F) -> Result<(), CoreError>
    where
        F: FnOnce(&mut PartyMon),
    {
        let mut mon = self.view().party_mon(slot)?;
        edit(&mut mon);
        self.set_party_mon(slot, &mon)
    }

    pub(crate) fn set_listed_species(&mut self, slot: usize, species: u8) -> Result<(), CoreError> {
        let index = slot_index(slot)?;
        let offset = self.bank.offset(Field::PartySpecies)? + index;
        self.image.write_u8(offset, species)
    }

    pub(crate) fn set_nickname_raw(
        &mut self,
        slot: usize,
        name: &[u8; NAME_LENGTH],
    ) -> Result<(), CoreError> {
        self.set_name_raw(Field::Nicknames, slot, name)
    }

    pub(crate) fn set_nickname(&mut self, slot: usize, name: &str) -> Result<(), CoreError> {
        self.set_nickname_raw(slot, &text::encode(name))
    }

    pub(crate) fn set_ot_name_raw(
        &mut self,
        slot: usize,
        name: &[u8; NAME_LENGTH],
    ) -> Result<(), CoreError> {
        self.set_name_raw(Field::OtNames, slot, name)
    }

    pub(crate) fn set_ot_name(&mut self, slot: usize, name: &str) -> Result<(), CoreError> {
        self.set_ot_name_raw(slot, &text::encode(name))
    }

    fn set_name_raw(
        &mut self,
        table: Field,
        slot: usize,
        name: &[u8; NAME_LENGTH],
    ) -> Result<(), CoreError> {
        let index = slot_index(slot)?;
        let base = self.bank.offset(table)?;
        self.image
            .write_slice(slot_range(base, index, NAME_LENGTH).start, name)
    }
}
