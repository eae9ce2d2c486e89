use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crystal_core::checksum;
use crystal_core::core_api::CoreErrorCode;
use crystal_core::image::{SAVE_SIZE, SaveImage};
use crystal_core::layout::{BankId, MIRROR_DELTA, PocketKind, Revision, SaveLayout};
use crystal_core::transaction::{Transaction, TransactionState};
use crystal_core::{load_image, serialize};

const B2_BALL_POCKET: usize = 0x2465;

fn layout() -> &'static SaveLayout {
    Revision::CrystalUsEu.layout()
}

fn begin(image: SaveImage) -> Transaction {
    Transaction::begin(image, layout()).expect("layout is valid")
}

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

/// Bank 1 holds `bank1_balls` distinct balls and Bank 2 holds `bank2_balls`.
fn uneven_ball_pockets(bank1_balls: u8, bank2_balls: u8) -> SaveImage {
    let mut bytes = vec![0u8; SAVE_SIZE];
    for (delta, count) in [(MIRROR_DELTA, bank1_balls), (0, bank2_balls)] {
        let base = B2_BALL_POCKET - delta;
        bytes[base] = count;
        for i in 0..count {
            let slot = base + 1 + usize::from(i) * 2;
            bytes[slot] = i + 1;
            bytes[slot + 1] = 1;
        }
        bytes[base + 1 + usize::from(count) * 2] = 0xFF;
    }
    let mut txn = begin(SaveImage::from_bytes(bytes).expect("full save"));
    txn.commit().expect("commit");
    txn.image().clone()
}

#[test]
fn state_moves_clean_dirty_committed_clean() {
    let path = temp_output_path("states");
    let mut txn = begin(SaveImage::blank());
    assert_eq!(txn.state(), TransactionState::Clean);

    txn.set_money(100).expect("edit");
    assert_eq!(txn.state(), TransactionState::Dirty);

    txn.commit().expect("commit");
    assert_eq!(txn.state(), TransactionState::Committed);

    txn.persist(&path).expect("persist");
    assert_eq!(txn.state(), TransactionState::Clean);

    let written = fs::read(&path).expect("saved file");
    assert_eq!(written.len(), SAVE_SIZE);
    assert_eq!(written, txn.image().to_bytes());
    let _ = fs::remove_file(&path);
}

#[test]
fn dirty_transactions_refuse_to_serialize_or_persist() {
    let path = temp_output_path("stale");
    let mut txn = begin(SaveImage::blank());
    txn.add_item(PocketKind::Balls, 0x01, 99).expect("edit");

    let err = txn.to_bytes().expect_err("checksums are stale");
    assert_eq!(err.code, CoreErrorCode::ChecksumsStale);
    let err = txn.persist(&path).expect_err("checksums are stale");
    assert_eq!(err.code, CoreErrorCode::ChecksumsStale);
    assert!(!path.exists());
    assert_eq!(txn.state(), TransactionState::Dirty);

    txn.commit().expect("commit");
    assert!(txn.to_bytes().is_ok());
}

#[test]
fn commit_twice_yields_identical_checksums() {
    let mut txn = begin(SaveImage::blank());
    txn.set_player_name("KRIS").expect("edit");
    let first = txn.commit().expect("commit");
    let bytes_first = txn.to_bytes().expect("committed");
    let second = txn.commit().expect("commit again");
    assert_eq!(first, second);
    assert_eq!(bytes_first, txn.to_bytes().expect("committed"));
}

#[test]
fn failure_in_bank2_rolls_back_bank1() {
    let image = uneven_ball_pockets(11, 12);
    let mut txn = begin(image.clone());

    let err = txn
        .add_item(PocketKind::Balls, 0x40, 1)
        .expect_err("bank 2 pocket is full");
    assert_eq!(err.code, CoreErrorCode::PocketFull);
    assert_eq!(txn.image(), &image);
    assert_eq!(txn.state(), TransactionState::Clean);
    assert_eq!(
        txn.view(BankId::Bank1).pocket_count(PocketKind::Balls).expect("mapped"),
        11
    );
}

#[test]
fn rejected_edit_keeps_an_earlier_dirty_state() {
    let mut txn = begin(SaveImage::blank());
    txn.set_money(5).expect("edit");
    let after_first = txn.image().clone();

    let err = txn.set_money(2_000_000).expect_err("too much money");
    assert_eq!(err.code, CoreErrorCode::InvalidEncoding);
    assert_eq!(txn.image(), &after_first);
    assert_eq!(txn.state(), TransactionState::Dirty);
}

#[test]
fn both_checksums_verify_after_commit() {
    let mut txn = begin(SaveImage::blank());
    txn.add_item(PocketKind::Items, 0x08, 10).expect("edit");
    txn.set_money(999_999).expect("edit");

    let stale = txn.bank_statuses().expect("inspect");
    assert!(stale.iter().all(|s| !s.valid));

    txn.commit().expect("commit");
    for bank in &layout().banks {
        assert!(checksum::verify(txn.image(), bank).expect("verify"));
    }
}

#[test]
fn unedited_images_round_trip_byte_for_byte() {
    let mut bytes = vec![0u8; SAVE_SIZE];
    for (i, byte) in bytes.iter_mut().enumerate().step_by(97) {
        *byte = (i % 251) as u8;
    }
    let image = load_image(&bytes).expect("full save");
    assert_eq!(serialize(&image), bytes);

    let txn = begin(image);
    assert_eq!(txn.to_bytes().expect("clean"), bytes);
}

#[test]
fn load_rejects_wrong_lengths() {
    for len in [0, SAVE_SIZE - 1, SAVE_SIZE + 1] {
        let err = load_image(&vec![0u8; len]).expect_err("wrong length");
        assert_eq!(err.code, CoreErrorCode::Format);
    }
}
