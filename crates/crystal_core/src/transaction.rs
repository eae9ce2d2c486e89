//! Mirrored writes over both banks with deferred checksum repair.
//!
//! Every edit lands in Bank 1 and then Bank 2 before the call returns. If
//! either write fails the image is restored to its state before the edit,
//! so the banks never disagree about a field. Checksums are only rewritten
//! by [`Transaction::commit`], and an image whose checksums are stale cannot
//! be serialized.

use std::path::Path;

use log::{debug, info, warn};
use serde::Serialize;

use crate::checksum::{self, BankStatus};
use crate::codec::party::PartyMon;
use crate::codec::pocket::AddOutcome;
use crate::codec::{self, BankView, BankViewMut, Divergence};
use crate::core_api::{CoreError, CoreErrorCode};
use crate::image::SaveImage;
use crate::layout::{BankId, NAME_LENGTH, PARTY_MON_SIZE, PocketKind, SaveLayout};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionState {
    /// Matches what was loaded or last persisted.
    Clean,
    /// Edited since the last commit; checksums are stale.
    Dirty,
    /// Checksums are current but the bytes have not been persisted.
    Committed,
}

#[derive(Debug, Clone)]
pub struct Transaction {
    image: SaveImage,
    layout: &'static SaveLayout,
    state: TransactionState,
}

impl Transaction {
    pub fn begin(image: SaveImage, layout: &'static SaveLayout) -> Result<Self, CoreError> {
        layout.validate()?;
        Ok(Self {
            image,
            layout,
            state: TransactionState::Clean,
        })
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn image(&self) -> &SaveImage {
        &self.image
    }

    pub fn layout(&self) -> &'static SaveLayout {
        self.layout
    }

    pub fn view(&self, bank: BankId) -> BankView<'_> {
        BankView::new(&self.image, self.layout.bank(bank))
    }

    pub fn bank_statuses(&self) -> Result<[BankStatus; 2], CoreError> {
        checksum::inspect(&self.image, self.layout)
    }

    /// Runs `edit` against Bank 1 and then Bank 2. On any error the image is
    /// put back as it was and the state is left alone.
    pub(crate) fn mirror<T, F>(&mut self, what: &str, mut edit: F) -> Result<[T; 2], CoreError>
    where
        F: FnMut(&mut BankViewMut<'_>) -> Result<T, CoreError>,
    {
        let undo = self.image.clone();
        let layout = self.layout;

        let [first, second] = &layout.banks;
        let applied = edit(&mut BankViewMut::new(&mut self.image, first));
        let result = applied.and_then(|a| {
            debug!("{what}: applied to {}", first.id);
            let b = edit(&mut BankViewMut::new(&mut self.image, second))?;
            debug!("{what}: applied to {}", second.id);
            Ok([a, b])
        });

        match result {
            Ok(out) => {
                self.state = TransactionState::Dirty;
                Ok(out)
            }
            Err(err) => {
                self.image = undo;
                debug!("{what}: rolled back ({err})");
                Err(err)
            }
        }
    }

    pub fn add_item(
        &mut self,
        kind: PocketKind,
        item_id: u8,
        quantity: u8,
    ) -> Result<AddOutcome, CoreError> {
        let [outcome, _] = self.mirror("add item", |bank| bank.add_item(kind, item_id, quantity))?;
        Ok(outcome)
    }

    /// Returns the quantity that was dropped.
    pub fn remove_item(&mut self, kind: PocketKind, item_id: u8) -> Result<u8, CoreError> {
        let [removed, _] = self.mirror("remove item", |bank| bank.remove_item(kind, item_id))?;
        Ok(removed)
    }

    pub fn set_pocket_count(&mut self, kind: PocketKind) -> Result<u8, CoreError> {
        let [count, _] = self.mirror("recount pocket", |bank| bank.set_pocket_count(kind))?;
        Ok(count)
    }

    pub fn set_money(&mut self, value: u32) -> Result<(), CoreError> {
        self.mirror("set money", |bank| bank.set_money(value))?;
        Ok(())
    }

    pub fn set_player_name(&mut self, name: &str) -> Result<(), CoreError> {
        self.mirror("set player name", |bank| bank.set_player_name(name))?;
        Ok(())
    }

    pub fn set_trainer_id(&mut self, trainer_id: u16) -> Result<(), CoreError> {
        self.mirror("set trainer id", |bank| bank.set_trainer_id(trainer_id))?;
        Ok(())
    }

    pub fn set_party_mon(&mut self, slot: usize, mon: &PartyMon) -> Result<(), CoreError> {
        self.mirror("set party record", |bank| bank.set_party_mon(slot, mon))?;
        Ok(())
    }

    pub fn set_party_mon_bytes(
        &mut self,
        slot: usize,
        bytes: &[u8; PARTY_MON_SIZE],
    ) -> Result<(), CoreError> {
        self.mirror("set party record", |bank| bank.set_party_mon_bytes(slot, bytes))?;
        Ok(())
    }

    pub fn set_nickname(&mut self, slot: usize, name: &str) -> Result<(), CoreError> {
        self.mirror("set nickname", |bank| bank.set_nickname(slot, name))?;
        Ok(())
    }

    pub fn set_nickname_raw(
        &mut self,
        slot: usize,
        name: &[u8; NAME_LENGTH],
    ) -> Result<(), CoreError> {
        self.mirror("set nickname", |bank| bank.set_nickname_raw(slot, name))?;
        Ok(())
    }

    pub fn set_ot_name(&mut self, slot: usize, name: &str) -> Result<(), CoreError> {
        self.mirror("set OT name", |bank| bank.set_ot_name(slot, name))?;
        Ok(())
    }

    pub fn set_ot_name_raw(
        &mut self,
        slot: usize,
        name: &[u8; NAME_LENGTH],
    ) -> Result<(), CoreError> {
        self.mirror("set OT name", |bank| bank.set_ot_name_raw(slot, name))?;
        Ok(())
    }

    /// Copies every mirrored field and pocket that differs from `source` onto
    /// the other bank and returns the regions that were rewritten. Nothing
    /// changes when the banks already agree.
    pub fn resync_from(&mut self, source: BankId) -> Result<Vec<Divergence>, CoreError> {
        let layout = self.layout;
        let regions = codec::divergent_regions(&self.image, layout)?;
        if regions.is_empty() {
            return Ok(regions);
        }

        let from = layout.bank(source);
        let to = layout.bank(source.other());
        let undo = self.image.clone();
        let copied = regions.iter().try_for_each(|region| {
            let bytes = self.image.slice(region.range(from)?)?.to_vec();
            self.image.write_slice(region.range(to)?.start, &bytes)
        });
        if let Err(err) = copied {
            self.image = undo;
            return Err(err);
        }

        warn!(
            "copied {} divergent region(s) from {} to {}",
            regions.len(),
            from.id,
            to.id
        );
        self.state = TransactionState::Dirty;
        Ok(regions)
    }

    /// Recomputes and stores both checksums, Bank 1 first. Safe to repeat.
    pub fn commit(&mut self) -> Result<[BankStatus; 2], CoreError> {
        for bank in &self.layout.banks {
            checksum::write_checksum(&mut self.image, bank)?;
        }
        if self.state == TransactionState::Dirty {
            info!("committed edits; both bank checksums rewritten");
        }
        self.state = TransactionState::Committed;
        self.bank_statuses()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        self.ensure_not_stale()?;
        Ok(self.image.to_bytes())
    }

    pub fn persist(&mut self, path: &Path) -> Result<(), CoreError> {
        self.ensure_not_stale()?;
        self.image.write_to(path)?;
        self.state = TransactionState::Clean;
        Ok(())
    }

    fn ensure_not_stale(&self) -> Result<(), CoreError> {
        if self.state == TransactionState::Dirty {
            return Err(CoreError::new(
                CoreErrorCode::ChecksumsStale,
                "edits are pending; commit before writing the save",
            ));
        }
        Ok(())
    }
}
