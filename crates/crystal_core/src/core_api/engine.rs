use std::path::Path;

use log::{info, warn};

use crate::catalog;
use crate::checksum::{self, BankStatus};
use crate::codec::pocket::PocketContents;
use crate::codec::{self, BankView, Divergence};
use crate::edit::EditOp;
use crate::image::SaveImage;
use crate::layout::{BankId, PocketKind, Revision, SaveLayout};
use crate::transaction::{Transaction, TransactionState};

use super::error::{CoreError, CoreErrorCode};
use super::types::{EditOutcome, EditReport, MoveEntry, PartyEntry, Snapshot, VerifyReport};

#[derive(Debug, Clone, Copy)]
pub struct Engine {
    revision: Revision,
}

#[derive(Debug)]
pub struct Session {
    revision: Revision,
    txn: Transaction,
    source_bank: BankId,
    opened_valid: bool,
    needs_resync: bool,
    original: SaveImage,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Revision::CrystalUsEu)
    }
}

impl Engine {
    pub fn new(revision: Revision) -> Self {
        Self { revision }
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn layout(&self) -> &'static SaveLayout {
        self.revision.layout()
    }

    pub fn open_bytes<B: AsRef<[u8]>>(&self, bytes: B) -> Result<Session, CoreError> {
        let image = SaveImage::from_bytes(bytes)?;
        self.open_image(image)
    }

    pub fn open_path(&self, path: &Path) -> Result<Session, CoreError> {
        let image = SaveImage::read_from(path).map_err(|e| {
            CoreError::new(e.code, format!("failed to open {}: {}", path.display(), e.message))
        })?;
        self.open_image(image)
    }

    pub fn open_image(&self, image: SaveImage) -> Result<Session, CoreError> {
        let original = image.clone();
        let txn = Transaction::begin(image, self.layout())?;
        let source_bank = checksum::authoritative_bank(txn.image(), txn.layout())?.id;
        let opened_valid = txn.bank_statuses()?.iter().all(|s| s.valid);
        if !opened_valid {
            warn!("a bank checksum failed verification; edits are disabled for this save");
        }
        let divergent = codec::divergent_regions(txn.image(), txn.layout())?;
        let needs_resync = opened_valid && !divergent.is_empty();
        if needs_resync {
            warn!(
                "both checksums verify but {} region(s) differ between banks; \
                 {source_bank} will be copied over before the first edit",
                divergent.len()
            );
        }

        Ok(Session {
            revision: self.revision,
            txn,
            source_bank,
            opened_valid,
            needs_resync,
            original,
        })
    }
}

impl Session {
    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn layout(&self) -> &'static SaveLayout {
        self.txn.layout()
    }

    pub fn state(&self) -> TransactionState {
        self.txn.state()
    }

    pub fn image(&self) -> &SaveImage {
        self.txn.image()
    }

    /// The bank the save was decoded from at open time.
    pub fn source_bank(&self) -> BankId {
        self.source_bank
    }

    /// False when either bank failed verification at open time.
    pub fn can_edit(&self) -> bool {
        self.opened_valid
    }

    /// True until the banks, which disagreed at open time, have been
    /// brought back in line with the source bank.
    pub fn needs_resync(&self) -> bool {
        self.needs_resync
    }

    pub fn view(&self) -> BankView<'_> {
        self.txn.view(self.source_bank)
    }

    pub fn bank_view(&self, bank: BankId) -> BankView<'_> {
        self.txn.view(bank)
    }

    pub fn bank_statuses(&self) -> Result<[BankStatus; 2], CoreError> {
        self.txn.bank_statuses()
    }

    pub fn snapshot(&self) -> Result<Snapshot, CoreError> {
        let view = self.view();
        Ok(Snapshot {
            revision: self.revision,
            state: self.state(),
            source_bank: self.source_bank,
            banks: self.bank_statuses()?.to_vec(),
            player_name: view.player_name()?,
            trainer_id: view.trainer_id()?,
            money: view
                .money()
                .inspect_err(|e| warn!("money could not be decoded: {e}"))
                .ok(),
            pockets: self.pockets()?,
            party_count: view.party_count()?,
            party: self.party()?,
        })
    }

    /// Every pocket the layout maps, in layout order.
    pub fn pockets(&self) -> Result<Vec<PocketContents>, CoreError> {
        let view = self.view();
        view.bank()
            .pockets
            .iter()
            .map(|pocket| view.pocket_contents(pocket.kind))
            .collect()
    }

    pub fn pocket(&self, kind: PocketKind) -> Result<PocketContents, CoreError> {
        self.view().pocket_contents(kind)
    }

    pub fn party(&self) -> Result<Vec<PartyEntry>, CoreError> {
        let view = self.view();
        view.occupied_slots()?
            .map(|slot| party_entry(&view, slot))
            .collect()
    }

    pub fn party_entry(&self, slot: usize) -> Result<PartyEntry, CoreError> {
        party_entry(&self.view(), slot)
    }

    pub fn verify(&self) -> Result<VerifyReport, CoreError> {
        let image = self.txn.image();
        let layout = self.layout();
        Ok(VerifyReport {
            banks: self.bank_statuses()?.to_vec(),
            authoritative: checksum::authoritative_bank(image, layout)
                .ok()
                .map(|bank| bank.id),
            divergent: codec::divergent_regions(image, layout)?,
        })
    }

    /// Applies one edit to both banks without committing. If the banks
    /// disagreed at open time, the other bank is first overwritten from the
    /// source bank so the edit starts from one consistent save.
    pub fn apply_edit(&mut self, op: &EditOp) -> Result<(), CoreError> {
        self.ensure_editable()?;
        self.resync()?;
        op.apply(&mut self.txn).inspect_err(|e| {
            warn!("rejected edit \"{op}\": {e}");
        })
    }

    /// Applies each op on its own, records what happened, and commits if
    /// anything changed. A failed op leaves the save as it was before that op.
    pub fn apply_edits(&mut self, ops: &[EditOp]) -> Result<EditReport, CoreError> {
        self.ensure_editable()?;
        let checksums_before = self.bank_statuses()?.to_vec();
        let resynced = self.resync()?;

        let outcomes: Vec<EditOutcome> = ops
            .iter()
            .map(|op| {
                let result = self.apply_edit(op);
                EditOutcome {
                    op: op.clone(),
                    description: op.to_string(),
                    applied: result.is_ok(),
                    error_code: result.as_ref().err().map(|e| e.code),
                    error: result.err().map(|e| e.message),
                }
            })
            .collect();

        let committed = if self.state() == TransactionState::Dirty {
            self.commit()?;
            true
        } else {
            false
        };

        Ok(EditReport {
            checksums_before,
            checksums_after: self.bank_statuses()?.to_vec(),
            resynced,
            outcomes,
            committed,
        })
    }

    pub fn commit(&mut self) -> Result<[BankStatus; 2], CoreError> {
        self.txn.commit()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        self.txn.to_bytes()
    }

    pub fn to_bytes_unmodified(&self) -> Vec<u8> {
        self.original.to_bytes()
    }

    pub fn persist(&mut self, path: &Path) -> Result<(), CoreError> {
        self.txn.persist(path)?;
        info!("saved {}", path.display());
        Ok(())
    }

    fn resync(&mut self) -> Result<Vec<Divergence>, CoreError> {
        if !self.needs_resync {
            return Ok(Vec::new());
        }
        let regions = self.txn.resync_from(self.source_bank)?;
        self.needs_resync = false;
        Ok(regions)
    }

    fn ensure_editable(&self) -> Result<(), CoreError> {
        if self.opened_valid {
            return Ok(());
        }
        Err(CoreError::new(
            CoreErrorCode::ChecksumMismatch,
            "a bank checksum was invalid when the save was opened; refusing to edit",
        ))
    }
}

fn party_entry(view: &BankView<'_>, slot: usize) -> Result<PartyEntry, CoreError> {
    let mon = view.party_mon(slot)?;
    let moves = mon
        .moves
        .iter()
        .zip(mon.pp)
        .map(|(&id, pp)| MoveEntry {
            id,
            name: catalog::move_name(id).map(str::to_string),
            pp,
        })
        .collect();

    Ok(PartyEntry {
        slot,
        species: mon.species,
        species_name: catalog::species_name(mon.species).map(str::to_string),
        nickname: view.nickname(slot)?,
        ot_name: view.ot_name(slot)?,
        level: mon.level,
        held_item: mon.held_item,
        held_item_name: catalog::held_item_name(mon.held_item).map(str::to_string),
        moves,
        shiny: mon.is_shiny(),
        dvs: mon.dvs,
        hp: mon.hp,
        max_hp: mon.max_hp,
        experience: mon.experience,
        stat_exp: mon.stat_exp,
        friendship: mon.friendship,
        status: mon.status,
    })
}
