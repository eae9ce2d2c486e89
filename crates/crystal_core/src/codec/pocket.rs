//! Bag pockets: a count byte, `(item, quantity)` slots, and a `0xFF`
//! terminator after the last used slot.

use serde::Serialize;

use crate::core_api::{CoreError, CoreErrorCode};
use crate::layout::{PocketKind, PocketLayout};

use super::{BankView, BankViewMut};

pub const LIST_TERMINATOR: u8 = 0xFF;
/// Item id of a slot that was never written.
pub const EMPTY_ITEM: u8 = 0x00;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemSlot {
    pub item_id: u8,
    pub quantity: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PocketContents {
    pub pocket: PocketKind,
    pub count: u8,
    pub capacity: usize,
    pub slots: Vec<ItemSlot>,
}

/// What adding an item did to the pocket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AddOutcome {
    Added { slot: usize, quantity: u8 },
    Updated { slot: usize, old: u8, new: u8 },
}

fn is_listed(item_id: u8) -> bool {
    item_id != EMPTY_ITEM && item_id != LIST_TERMINATOR
}

impl BankView<'_> {
    pub fn pocket_count(&self, kind: PocketKind) -> Result<u8, CoreError> {
        self.image.u8_at(self.bank.pocket(kind)?.count_offset)
    }

    /// Slots the count byte claims, stopping early at an empty or terminator
    /// entry.
    pub fn pocket_slots(&self, kind: PocketKind) -> Result<Vec<ItemSlot>, CoreError> {
        let pocket = self.bank.pocket(kind)?;
        let count = usize::from(self.image.u8_at(pocket.count_offset)?).min(pocket.capacity);
        let mut slots = Vec::with_capacity(count);
        for index in 0..count {
            let slot = read_slot(self, pocket, index)?;
            if !is_listed(slot.item_id) {
                break;
            }
            slots.push(slot);
        }
        Ok(slots)
    }

    pub fn pocket_contents(&self, kind: PocketKind) -> Result<PocketContents, CoreError> {
        let pocket = self.bank.pocket(kind)?;
        Ok(PocketContents {
            pocket: kind,
            count: self.image.u8_at(pocket.count_offset)?,
            capacity: pocket.capacity,
            slots: self.pocket_slots(kind)?,
        })
    }

    pub fn item_quantity(&self, kind: PocketKind, item_id: u8) -> Result<Option<u8>, CoreError> {
        Ok(self
            .pocket_slots(kind)?
            .iter()
            .find(|slot| slot.item_id == item_id)
            .map(|slot| slot.quantity))
    }
}

fn read_slot(view: &BankView<'_>, pocket: &PocketLayout, index: usize) -> Result<ItemSlot, CoreError> {
    let offset = pocket.slot_offset(index);
    Ok(ItemSlot {
        item_id: view.image.u8_at(offset)?,
        quantity: view.image.u8_at(offset + 1)?,
    })
}

impl BankViewMut<'_> {
    /// Adds `quantity` of `item_id`. An existing stack grows and saturates at
    /// 255; otherwise the item takes the first free slot.
    pub(crate) fn add_item(
        &mut self,
        kind: PocketKind,
        item_id: u8,
        quantity: u8,
    ) -> Result<AddOutcome, CoreError> {
        if !is_listed(item_id) {
            return Err(CoreError::new(
                CoreErrorCode::InvalidEncoding,
                format!("item id 0x{item_id:02X} is reserved for list bookkeeping"),
            ));
        }
        if quantity == 0 {
            return Err(CoreError::new(
                CoreErrorCode::InvalidEncoding,
                "quantity must be at least 1",
            ));
        }

        let pocket = *self.bank.pocket(kind)?;
        let slots = self.view().pocket_slots(kind)?;

        if let Some(index) = slots.iter().position(|slot| slot.item_id == item_id) {
            let old = slots[index].quantity;
            let new = old.saturating_add(quantity);
            self.image.write_u8(pocket.slot_offset(index) + 1, new)?;
            return Ok(AddOutcome::Updated { slot: index, old, new });
        }

        let index = slots.len();
        if index >= pocket.capacity {
            return Err(CoreError::new(
                CoreErrorCode::PocketFull,
                format!(
                    "pocket {kind} already holds {} of {} item kinds",
                    index, pocket.capacity
                ),
            ));
        }

        self.image
            .write_slice(pocket.slot_offset(index), &[item_id, quantity])?;
        self.image
            .write_u8(pocket.slot_offset(index + 1), LIST_TERMINATOR)?;
        self.set_pocket_count(kind)?;
        Ok(AddOutcome::Added { slot: index, quantity })
    }

    /// Drops the whole stack of `item_id` and closes the gap.
    pub(crate) fn remove_item(&mut self, kind: PocketKind, item_id: u8) -> Result<u8, CoreError> {
        let pocket = *self.bank.pocket(kind)?;
        let mut slots = self.view().pocket_slots(kind)?;
        let Some(index) = slots.iter().position(|slot| slot.item_id == item_id) else {
            return Err(CoreError::new(
                CoreErrorCode::UnknownField,
                format!("item 0x{item_id:02X} is not in pocket {kind}"),
            ));
        };

        let removed = slots.remove(index);
        for (i, slot) in slots.iter().enumerate().skip(index) {
            self.image
                .write_slice(pocket.slot_offset(i), &[slot.item_id, slot.quantity])?;
        }
        self.image
            .write_u8(pocket.slot_offset(slots.len()), LIST_TERMINATOR)?;
        self.set_pocket_count(kind)?;
        Ok(removed.quantity)
    }

    /// Rewrites the count byte to the number of listed slots before the first
    /// empty or terminator entry.
    pub(crate) fn set_pocket_count(&mut self, kind: PocketKind) -> Result<u8, CoreError> {
        let pocket = *self.bank.pocket(kind)?;
        let mut count = 0usize;
        while count < pocket.capacity && is_listed(self.image.u8_at(pocket.slot_offset(count))?) {
            count += 1;
        }
        let count = u8::try_from(count).map_err(|_| {
            CoreError::new(
                CoreErrorCode::Format,
                format!("pocket {kind} capacity {} does not fit a count byte", pocket.capacity),
            )
        })?;
        self.image.write_u8(pocket.count_offset, count)?;
        Ok(count)
    }
}
