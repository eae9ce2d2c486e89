//! High-level edits. Each [`EditOp`] runs as one mirrored write, so an op
//! either lands in both banks or in neither.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::codec::BankView;
use crate::codec::party::{PartyMon, slot_index};
use crate::core_api::{CoreError, CoreErrorCode};
use crate::dvs::Dvs;
use crate::image::SaveImage;
use crate::layout::{PocketKind, SaveLayout};
use crate::transaction::Transaction;

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 100;
pub const MAX_STAT_EXP: u16 = u16::MAX;
/// PP written by a party heal; the game caps each move at its own maximum.
pub const HEAL_PP: u8 = 35;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyTarget {
    Slot(usize),
    /// Every occupied slot.
    All,
}

impl fmt::Display for PartyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slot(slot) => write!(f, "slot {slot}"),
            Self::All => f.write_str("every party slot"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
pub enum EditOp {
    AddItem {
        pocket: PocketKind,
        item_id: u8,
        quantity: u8,
    },
    RemoveItem {
        pocket: PocketKind,
        item_id: u8,
    },
    SetMoney {
        amount: u32,
    },
    SetPlayerName {
        name: String,
    },
    SetNickname {
        slot: usize,
        name: String,
    },
    SetOtName {
        slot: usize,
        name: String,
    },
    MakeShiny {
        target: PartyTarget,
    },
    /// All DVs 15 and every stat experience value at its maximum.
    MaxStats {
        target: PartyTarget,
    },
    SetLevel {
        slot: usize,
        level: u8,
    },
    SetMove {
        slot: usize,
        move_slot: usize,
        move_id: u8,
    },
    SetHeldItem {
        slot: usize,
        item_id: u8,
    },
    SetSpecies {
        slot: usize,
        species: u8,
        #[serde(default)]
        level: Option<u8>,
    },
    HealParty,
    PlaceSuicune {
        slot: usize,
    },
}

fn clamp_level(level: u8) -> u8 {
    level.clamp(MIN_LEVEL, MAX_LEVEL)
}

fn require_occupied(view: &BankView<'_>, slot: usize) -> Result<(), CoreError> {
    slot_index(slot)?;
    let count = view.party_count()?;
    if slot > usize::from(count) {
        return Err(CoreError::new(
            CoreErrorCode::InvalidSlot,
            format!("party slot {slot} is empty; {} holds {count}", view.bank().id),
        ));
    }
    Ok(())
}

fn target_slots(view: &BankView<'_>, target: PartyTarget) -> Result<Vec<usize>, CoreError> {
    match target {
        PartyTarget::Slot(slot) => {
            require_occupied(view, slot)?;
            Ok(vec![slot])
        }
        PartyTarget::All => Ok(view.occupied_slots()?.collect()),
    }
}

fn make_suicune(mon: &mut PartyMon) {
    mon.species = catalog::SUICUNE;
    mon.level = 40;
    // Surf, Ice Beam, Rain Dance, Aurora Beam
    mon.moves = [57, 58, 240, 62];
    mon.pp = [15, 10, 5, 20];
    mon.dvs = Dvs::shiny();
    mon.stat_exp = [MAX_STAT_EXP; 5];
    mon.max_hp = 160;
    mon.hp = 160;
    mon.status = 0;
    mon.friendship = 255;
    mon.held_item = 0;
}

impl EditOp {
    pub fn apply(&self, txn: &mut Transaction) -> Result<(), CoreError> {
        let label = self.to_string();
        match self {
            Self::AddItem {
                pocket,
                item_id,
                quantity,
            } => txn.add_item(*pocket, *item_id, *quantity).map(drop),
            Self::RemoveItem { pocket, item_id } => txn.remove_item(*pocket, *item_id).map(drop),
            Self::SetMoney { amount } => txn.set_money(*amount),
            Self::SetPlayerName { name } => txn.set_player_name(name),
            Self::SetNickname { slot, name } => txn
                .mirror(&label, |bank| {
                    require_occupied(&bank.view(), *slot)?;
                    bank.set_nickname(*slot, name)
                })
                .map(drop),
            Self::SetOtName { slot, name } => txn
                .mirror(&label, |bank| {
                    require_occupied(&bank.view(), *slot)?;
                    bank.set_ot_name(*slot, name)
                })
                .map(drop),
            Self::MakeShiny { target } => update_targets(txn, &label, *target, |mon| {
                if !mon.dvs.is_shiny() {
                    mon.dvs = Dvs::shiny();
                }
            }),
            Self::MaxStats { target } => update_targets(txn, &label, *target, |mon| {
                mon.dvs = Dvs::perfect();
                mon.stat_exp = [MAX_STAT_EXP; 5];
            }),
            Self::SetLevel { slot, level } => {
                let level = clamp_level(*level);
                update_targets(txn, &label, PartyTarget::Slot(*slot), |mon| mon.level = level)
            }
            Self::SetMove {
                slot,
                move_slot,
                move_id,
            } => {
                if !(1..=4).contains(move_slot) {
                    return Err(CoreError::new(
                        CoreErrorCode::InvalidSlot,
                        format!("move slot {move_slot} is outside 1..=4"),
                    ));
                }
                let index = move_slot - 1;
                update_targets(txn, &label, PartyTarget::Slot(*slot), |mon| {
                    mon.moves[index] = *move_id
                })
            }
            Self::SetHeldItem { slot, item_id } => {
                update_targets(txn, &label, PartyTarget::Slot(*slot), |mon| {
                    mon.held_item = *item_id
                })
            }
            Self::SetSpecies {
                slot,
                species,
                level,
            } => txn
                .mirror(&label, |bank| {
                    require_occupied(&bank.view(), *slot)?;
                    bank.set_listed_species(*slot, *species)?;
                    bank.update_party_mon(*slot, |mon| {
                        mon.species = *species;
                        if let Some(level) = level {
                            mon.level = clamp_level(*level);
                        }
                    })
                })
                .map(drop),
            Self::HealParty => update_targets(txn, &label, PartyTarget::All, |mon| {
                mon.hp = mon.max_hp;
                mon.status = 0;
                mon.pp = [HEAL_PP; 4];
            }),
            Self::PlaceSuicune { slot } => txn
                .mirror(&label, |bank| {
                    require_occupied(&bank.view(), *slot)?;
                    bank.set_listed_species(*slot, catalog::SUICUNE)?;
                    bank.update_party_mon(*slot, make_suicune)
                })
                .map(drop),
        }
    }
}

fn update_targets<F>(
    txn: &mut Transaction,
    label: &str,
    target: PartyTarget,
    edit: F,
) -> Result<(), CoreError>
where
    F: Fn(&mut PartyMon),
{
    txn.mirror(label, |bank| {
        let slots = target_slots(&bank.view(), target)?;
        for slot in slots {
            bank.update_party_mon(slot, &edit)?;
        }
        Ok(())
    })
    .map(drop)
}

fn item_label(pocket: PocketKind, item_id: u8) -> String {
    let name = match pocket {
        PocketKind::Balls | PocketKind::Items => catalog::item_name(item_id),
        PocketKind::KeyItems | PocketKind::TmHm => None,
    };
    match name {
        Some(name) => name.to_string(),
        None => format!("item 0x{item_id:02X}"),
    }
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddItem {
                pocket,
                item_id,
                quantity,
            } => write!(
                f,
                "add {quantity} x {} to {pocket}",
                item_label(*pocket, *item_id)
            ),
            Self::RemoveItem { pocket, item_id } => {
                write!(f, "remove {} from {pocket}", item_label(*pocket, *item_id))
            }
            Self::SetMoney { amount } => write!(f, "set money to {amount}"),
            Self::SetPlayerName { name } => write!(f, "set player name to {name:?}"),
            Self::SetNickname { slot, name } => write!(f, "set slot {slot} nickname to {name:?}"),
            Self::SetOtName { slot, name } => write!(f, "set slot {slot} OT name to {name:?}"),
            Self::MakeShiny { target } => write!(f, "make {target} shiny"),
            Self::MaxStats { target } => write!(f, "max DVs and stat exp of {target}"),
            Self::SetLevel { slot, level } => write!(f, "set slot {slot} level to {level}"),
            Self::SetMove {
                slot,
                move_slot,
                move_id,
            } => write!(
                f,
                "set slot {slot} move {move_slot} to {}",
                catalog::move_name(*move_id).unwrap_or("?")
            ),
            Self::SetHeldItem { slot, item_id } => write!(
                f,
                "give slot {slot} {}",
                catalog::held_item_name(*item_id).unwrap_or("an unknown item")
            ),
            Self::SetSpecies { slot, species, .. } => write!(
                f,
                "turn slot {slot} into {}",
                catalog::species_name(*species).unwrap_or("an unknown species")
            ),
            Self::HealParty => f.write_str("heal the party"),
            Self::PlaceSuicune { slot } => write!(f, "place a shiny Suicune in slot {slot}"),
        }
    }
}

/// Applies `ops` in order to a copy of `image` and commits. Stops at the first
/// failing op and leaves `image` untouched.
pub fn apply_edits(
    image: &SaveImage,
    layout: &'static SaveLayout,
    ops: &[EditOp],
) -> Result<SaveImage, CoreError> {
    let mut txn = Transaction::begin(image.clone(), layout)?;
    for op in ops {
        op.apply(&mut txn)?;
    }
    txn.commit()?;
    Ok(txn.image().clone())
}

/// Canned edit lists for common bag top-ups.
pub mod presets {
    use super::EditOp;
    use crate::catalog;
    use crate::codec::money::MAX_MONEY;
    use crate::layout::PocketKind;

    pub const QUANTITY: u8 = 99;

    fn add(pocket: PocketKind, item_id: u8) -> EditOp {
        EditOp::AddItem {
            pocket,
            item_id,
            quantity: QUANTITY,
        }
    }

    pub fn master_balls() -> Vec<EditOp> {
        vec![add(PocketKind::Balls, catalog::MASTER_BALL)]
    }

    pub fn rare_candy() -> Vec<EditOp> {
        vec![add(PocketKind::Items, catalog::RARE_CANDY)]
    }

    pub fn all_balls() -> Vec<EditOp> {
        catalog::ball_ids()
            .map(|id| add(PocketKind::Balls, id))
            .collect()
    }

    pub fn healing_items() -> Vec<EditOp> {
        catalog::HEALING_ITEMS
            .iter()
            .map(|&id| add(PocketKind::Items, id))
            .collect()
    }

    pub fn stat_items() -> Vec<EditOp> {
        catalog::STAT_ITEMS
            .iter()
            .map(|&id| add(PocketKind::Items, id))
            .collect()
    }

    pub fn max_money() -> Vec<EditOp> {
        vec![EditOp::SetMoney { amount: MAX_MONEY }]
    }

    /// Every ball, healing and stat items, and maximum money. Master balls
    /// and rare candy are already part of those lists.
    pub fn all_items() -> Vec<EditOp> {
        let mut ops = all_balls();
        ops.extend(healing_items());
        ops.extend(stat_items());
        ops.extend(max_money());
        ops
    }
}
