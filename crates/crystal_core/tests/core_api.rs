use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crystal_core::catalog;
use crystal_core::codec::Divergence;
use crystal_core::core_api::{CoreErrorCode, Engine};
use crystal_core::edit::{EditOp, PartyTarget};
use crystal_core::image::{SAVE_SIZE, SaveImage};
use crystal_core::layout::{BankId, Field, MIRROR_DELTA, PocketKind, Revision};
use crystal_core::text;
use crystal_core::transaction::{Transaction, TransactionState};

const B2_CHECKSUM: usize = 0x2D69;
const B1_CHECKSUM: usize = 0x1F0D;

fn temp_output_path(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "crystal_se_{prefix}_{}_{}.sav",
        std::process::id(),
        nanos
    ))
}

/// Player "KRIS", id 0x3039, $3000, one Cyndaquil nicknamed "FLAME".
fn sample_save() -> Vec<u8> {
    let mut bytes = vec![0u8; SAVE_SIZE];
    for delta in [0, MIRROR_DELTA] {
        bytes[0x2009 - delta..0x200B - delta].copy_from_slice(&[0x30, 0x39]);
        bytes[0x200B - delta..0x2016 - delta].copy_from_slice(&text::encode("KRIS"));
        bytes[0x23DC - delta..0x23DF - delta].copy_from_slice(&[0x00, 0x30, 0x00]);
        bytes[0x2465 - delta..0x2468 - delta].copy_from_slice(&[1, 0x04, 5]);
        bytes[0x2468 - delta] = 0xFF;
        bytes[0x2865 - delta] = 1;
        bytes[0x2866 - delta..0x2868 - delta].copy_from_slice(&[155, 0xFF]);
        let mon = 0x286D - delta;
        bytes[mon] = 155;
        bytes[mon + 0x02] = 33;
        bytes[mon + 0x17] = 35;
        bytes[mon + 0x1F] = 5;
        bytes[mon + 0x23] = 19;
        bytes[mon + 0x25] = 19;
        bytes[0x298D - delta..0x2998 - delta].copy_from_slice(&text::encode("KRIS"));
        bytes[0x29CF - delta..0x29DA - delta].copy_from_slice(&text::encode("FLAME"));
    }
    let mut txn = Transaction::begin(
        SaveImage::from_bytes(bytes).expect("full save"),
        Revision::CrystalUsEu.layout(),
    )
    .expect("layout is valid");
    txn.commit().expect("commit");
    txn.to_bytes().expect("committed")
}

#[test]
fn snapshot_decodes_the_primary_bank() {
    let session = Engine::default()
        .open_bytes(sample_save())
        .expect("valid save");
    assert_eq!(session.source_bank(), BankId::Bank2);
    assert!(session.can_edit());

    let snapshot = session.snapshot().expect("decodes");
    assert_eq!(snapshot.revision, Revision::CrystalUsEu);
    assert_eq!(snapshot.state, TransactionState::Clean);
    assert_eq!(snapshot.player_name, "KRIS");
    assert_eq!(snapshot.trainer_id, 12345);
    assert_eq!(snapshot.money, Some(3_000));
    assert_eq!(snapshot.banks.len(), 2);
    assert!(snapshot.banks.iter().all(|b| b.valid));

    let balls = snapshot
        .pockets
        .iter()
        .find(|p| p.pocket == PocketKind::Balls)
        .expect("balls are listed");
    assert_eq!(balls.slots.len(), 1);
    assert_eq!(balls.slots[0].item_id, 0x04);

    assert_eq!(snapshot.party_count, 1);
    let mon = &snapshot.party[0];
    assert_eq!(mon.slot, 1);
    assert_eq!(mon.species_name.as_deref(), Some("Cyndaquil"));
    assert_eq!(mon.nickname, "FLAME");
    assert_eq!(mon.ot_name, "KRIS");
    assert_eq!(mon.level, 5);
    assert_eq!(mon.moves[0].name.as_deref(), Some("Tackle"));
    assert_eq!(mon.moves[0].pp, 35);
    assert!(!mon.shiny);
}

#[test]
fn open_falls_back_to_bank1_and_refuses_edits() {
    let mut bytes = sample_save();
    bytes[B2_CHECKSUM] ^= 0xFF;

    let mut session = Engine::default().open_bytes(&bytes).expect("bank 1 verifies");
    assert_eq!(session.source_bank(), BankId::Bank1);
    assert!(!session.can_edit());
    assert_eq!(session.snapshot().expect("decodes").player_name, "KRIS");

    let err = session
        .apply_edit(&EditOp::SetMoney { amount: 1 })
        .expect_err("bank 2 was not verified");
    assert_eq!(err.code, CoreErrorCode::ChecksumMismatch);
    let err = session.apply_edits(&[EditOp::HealParty]).expect_err("same");
    assert_eq!(err.code, CoreErrorCode::ChecksumMismatch);
    assert_eq!(session.to_bytes().expect("clean"), bytes);
}

#[test]
fn open_rejects_bad_input() {
    let err = Engine::default()
        .open_bytes(vec![0u8; 1024])
        .expect_err("short file");
    assert_eq!(err.code, CoreErrorCode::Format);

    let mut bytes = sample_save();
    bytes[B2_CHECKSUM] ^= 0xFF;
    bytes[B1_CHECKSUM] ^= 0xFF;
    let err = Engine::default().open_bytes(&bytes).expect_err("both corrupt");
    assert_eq!(err.code, CoreErrorCode::BothBanksCorrupt);
}

#[test]
fn apply_edits_reports_each_op_and_commits() {
    let mut session = Engine::new(Revision::CrystalUsEu)
        .open_bytes(sample_save())
        .expect("valid save");
    let report = session
        .apply_edits(&[
            EditOp::AddItem {
                pocket: PocketKind::Balls,
                item_id: catalog::MASTER_BALL,
                quantity: 99,
            },
            EditOp::MakeShiny {
                target: PartyTarget::Slot(3),
            },
            EditOp::SetLevel { slot: 1, level: 50 },
        ])
        .expect("session is editable");

    assert!(report.committed);
    assert_eq!(report.applied_count(), 2);
    assert!(!report.all_applied());
    let failed: Vec<_> = report.failed().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].error_code, Some(CoreErrorCode::InvalidSlot));
    assert!(report.checksums_before.iter().all(|s| s.valid));
    assert!(report.checksums_after.iter().all(|s| s.valid));
    assert_ne!(report.checksums_before[1].stored, report.checksums_after[1].stored);

    assert_eq!(session.state(), TransactionState::Committed);
    let snapshot = session.snapshot().expect("decodes");
    assert_eq!(snapshot.party[0].level, 50);
    let balls = session.pocket(PocketKind::Balls).expect("mapped");
    assert_eq!(balls.slots.len(), 2);

    let reopened = Engine::default()
        .open_bytes(session.to_bytes().expect("committed"))
        .expect("edited save verifies");
    assert!(reopened.verify().expect("verify").is_healthy());
}

#[test]
fn apply_edits_without_changes_leaves_the_session_clean() {
    let mut session = Engine::default().open_bytes(sample_save()).expect("valid");
    let report = session
        .apply_edits(&[EditOp::RemoveItem {
            pocket: PocketKind::Balls,
            item_id: 0x01,
        }])
        .expect("editable");
    assert!(!report.committed);
    assert_eq!(report.failed().count(), 1);
    assert_eq!(session.state(), TransactionState::Clean);
    assert_eq!(session.to_bytes().expect("clean"), session.to_bytes_unmodified());
}

#[test]
fn single_edits_must_be_committed_before_writing() {
    let path = temp_output_path("session");
    let mut session = Engine::default().open_bytes(sample_save()).expect("valid");
    session
        .apply_edit(&EditOp::SetPlayerName {
            name: "LYRA".into(),
        })
        .expect("edit");

    assert_eq!(
        session.to_bytes().expect_err("stale").code,
        CoreErrorCode::ChecksumsStale
    );
    assert_eq!(
        session.persist(&path).expect_err("stale").code,
        CoreErrorCode::ChecksumsStale
    );

    session.commit().expect("commit");
    session.persist(&path).expect("persist");
    assert_eq!(session.state(), TransactionState::Clean);

    let reopened = Engine::default().open_path(&path).expect("written save");
    assert_eq!(reopened.snapshot().expect("decodes").player_name, "LYRA");
    let _ = fs::remove_file(&path);
}

#[test]
fn verify_reports_divergent_banks() {
    let mut bytes = sample_save();
    // bank 1 money differs but both checksums are repaired
    bytes[0x23DC - MIRROR_DELTA + 2] = 0x01;
    let mut txn = Transaction::begin(
        SaveImage::from_bytes(bytes).expect("full save"),
        Revision::CrystalUsEu.layout(),
    )
    .expect("layout");
    txn.commit().expect("commit");

    let session = Engine::default()
        .open_image(txn.image().clone())
        .expect("valid");
    let report = session.verify().expect("verify");
    assert_eq!(report.authoritative, Some(BankId::Bank2));
    assert_eq!(report.divergent, vec![Divergence::Field(Field::Money)]);
    assert!(!report.is_healthy());
}

/// Re-signs both banks so their checksums verify whatever the contents.
fn recommitted(bytes: Vec<u8>) -> SaveImage {
    let mut txn = Transaction::begin(
        SaveImage::from_bytes(bytes).expect("full save"),
        Revision::CrystalUsEu.layout(),
    )
    .expect("layout");
    txn.commit().expect("commit");
    txn.image().clone()
}

#[test]
fn edits_resync_banks_that_disagree_despite_valid_checksums() {
    let mut bytes = sample_save();
    // bank 2 holds 99 Master Balls, bank 1 has an empty ball pocket
    bytes[0x2465..0x2468].copy_from_slice(&[1, 0x01, 99]);
    bytes[0x2468] = 0xFF;
    let b1_balls = 0x2465 - MIRROR_DELTA;
    bytes[b1_balls..b1_balls + 2].copy_from_slice(&[0, 0xFF]);

    let mut session = Engine::default()
        .open_image(recommitted(bytes))
        .expect("both checksums verify");
    assert!(session.can_edit());
    assert!(session.needs_resync());
    assert_eq!(
        session.verify().expect("verify").divergent,
        vec![Divergence::Pocket(PocketKind::Balls)]
    );

    let report = session
        .apply_edits(&[EditOp::AddItem {
            pocket: PocketKind::Balls,
            item_id: 0x01,
            quantity: 99,
        }])
        .expect("editable");
    assert_eq!(report.resynced, vec![Divergence::Pocket(PocketKind::Balls)]);
    assert_eq!(report.applied_count(), 1);
    assert!(report.committed);
    assert!(!session.needs_resync());

    for bank in [BankId::Bank1, BankId::Bank2] {
        assert_eq!(
            session
                .bank_view(bank)
                .item_quantity(PocketKind::Balls, 0x01)
                .expect("mapped"),
            Some(198)
        );
    }
    let verify = session.verify().expect("verify");
    assert!(verify.divergent.is_empty());
    assert!(verify.is_healthy());
}

#[test]
fn resync_runs_once_and_only_for_divergent_saves() {
    let mut bytes = sample_save();
    bytes[0x23DC - MIRROR_DELTA + 2] = 0x01;
    let mut session = Engine::default()
        .open_image(recommitted(bytes))
        .expect("valid");

    session
        .apply_edit(&EditOp::SetMoney { amount: 5 })
        .expect("editable");
    assert_eq!(session.state(), TransactionState::Dirty);
    assert!(session.verify().expect("verify").divergent.is_empty());

    let report = session
        .apply_edits(&[EditOp::SetMoney { amount: 7 }])
        .expect("editable");
    assert!(report.resynced.is_empty());

    let mut clean = Engine::default().open_bytes(sample_save()).expect("valid");
    assert!(!clean.needs_resync());
    let report = clean.apply_edits(&[]).expect("editable");
    assert!(report.resynced.is_empty());
    assert!(!report.committed);
}

#[test]
fn snapshot_survives_money_that_is_not_bcd() {
    let mut bytes = sample_save();
    for delta in [0, MIRROR_DELTA] {
        bytes[0x23DC - delta] = 0xFA;
    }
    let session = Engine::default()
        .open_image(recommitted(bytes))
        .expect("valid");

    let snapshot = session.snapshot().expect("other fields still decode");
    assert_eq!(snapshot.money, None);
    assert_eq!(snapshot.player_name, "KRIS");
    assert_eq!(snapshot.party.len(), 1);
    assert_eq!(snapshot.party[0].nickname, "FLAME");
}

#[test]
fn unmodified_bytes_round_trip() {
    let bytes = sample_save();
    let session = Engine::default().open_bytes(&bytes).expect("valid");
    assert_eq!(session.to_bytes_unmodified(), bytes);
    assert_eq!(session.to_bytes().expect("clean"), bytes);
}

#[test]
fn party_entry_rejects_slots_outside_the_table() {
    let session = Engine::default().open_bytes(sample_save()).expect("valid");
    assert_eq!(
        session.party_entry(0).expect_err("slot 0").code,
        CoreErrorCode::InvalidSlot
    );
    assert_eq!(session.party().expect("party").len(), 1);
    assert_eq!(session.party_entry(1).expect("slot 1").species, 155);
}

#[test]
fn catalog_names_common_ids() {
    assert_eq!(catalog::species_name(1), Some("Bulbasaur"));
    assert_eq!(catalog::species_name(catalog::SUICUNE), Some("Suicune"));
    assert_eq!(catalog::species_name(251), Some("Celebi"));
    assert_eq!(catalog::species_name(0), None);
    assert_eq!(catalog::move_name(57), Some("Surf"));
    assert_eq!(catalog::item_name(catalog::RARE_CANDY), Some("Rare Candy"));
    assert_eq!(catalog::held_item_name(0x53), Some("Leftovers"));
    assert_eq!(catalog::ball_ids().count(), 12);
}
