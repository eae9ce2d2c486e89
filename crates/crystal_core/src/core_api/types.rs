use serde::Serialize;

use crate::checksum::BankStatus;
use crate::codec::Divergence;
use crate::codec::pocket::PocketContents;
use crate::core_api::CoreErrorCode;
use crate::dvs::Dvs;
use crate::edit::EditOp;
use crate::layout::{BankId, Revision};
use crate::transaction::TransactionState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub revision: Revision,
    pub state: TransactionState,
    pub source_bank: BankId,
    pub banks: Vec<BankStatus>,
    pub player_name: String,
    pub trainer_id: u16,
    /// `None` when the stored bytes are not valid BCD.
    pub money: Option<u32>,
    pub pockets: Vec<PocketContents>,
    pub party_count: u8,
    pub party: Vec<PartyEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveEntry {
    pub id: u8,
    pub name: Option<String>,
    pub pp: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartyEntry {
    pub slot: usize,
    pub species: u8,
    pub species_name: Option<String>,
    pub nickname: String,
    pub ot_name: String,
    pub level: u8,
    pub held_item: u8,
    pub held_item_name: Option<String>,
    pub moves: Vec<MoveEntry>,
    pub dvs: Dvs,
    pub shiny: bool,
    pub hp: u16,
    pub max_hp: u16,
    pub experience: u32,
    pub stat_exp: [u16; 5],
    pub friendship: u8,
    pub status: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditOutcome {
    pub op: EditOp,
    pub description: String,
    pub applied: bool,
    pub error_code: Option<CoreErrorCode>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditReport {
    pub checksums_before: Vec<BankStatus>,
    pub checksums_after: Vec<BankStatus>,
    /// Regions copied from the source bank before the first edit because the
    /// banks disagreed at open time.
    pub resynced: Vec<Divergence>,
    pub outcomes: Vec<EditOutcome>,
    pub committed: bool,
}

impl EditReport {
    pub fn applied_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.applied).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &EditOutcome> {
        self.outcomes.iter().filter(|o| !o.applied)
    }

    pub fn all_applied(&self) -> bool {
        self.outcomes.iter().all(|o| o.applied)
    }
}

/// Result of a full integrity check: checksums plus bank agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub banks: Vec<BankStatus>,
    pub authoritative: Option<BankId>,
    pub divergent: Vec<Divergence>,
}

impl VerifyReport {
    pub fn is_healthy(&self) -> bool {
        self.banks.iter().all(|b| b.valid) && self.divergent.is_empty()
    }
}
