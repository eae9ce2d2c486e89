use crystal_core::core_api::CoreErrorCode;
use crystal_core::layout::{
    BankId, BankRole, ByteRange, CRYSTAL_US_EU, Field, MIRROR_DELTA, PocketKind, Revision,
};

#[test]
fn crystal_layout_validates() {
    CRYSTAL_US_EU.validate().expect("shipped layout must be valid");
    assert_eq!(Revision::CrystalUsEu.layout().revision, Revision::CrystalUsEu);
}

#[test]
fn bank2_is_primary_and_bank1_is_secondary() {
    let layout = Revision::CrystalUsEu.layout();
    assert_eq!(layout.primary().id, BankId::Bank2);
    assert_eq!(layout.secondary().id, BankId::Bank1);
    assert_eq!(layout.bank(BankId::Bank2).role, BankRole::Primary);
    assert_eq!(layout.banks[0].id, BankId::Bank1);
}

#[test]
fn data_fields_mirror_at_a_fixed_delta() {
    let layout = Revision::CrystalUsEu.layout();
    let bank1 = layout.bank(BankId::Bank1);
    let bank2 = layout.bank(BankId::Bank2);

    for entry in bank2.fields {
        let mirrored = bank1.offset(entry.field).expect("every field is mirrored");
        assert_eq!(mirrored + MIRROR_DELTA, entry.offset, "{:?}", entry.field);
    }
    for kind in [PocketKind::Items, PocketKind::Balls] {
        let a = bank1.pocket(kind).expect("mapped");
        let b = bank2.pocket(kind).expect("mapped");
        assert_eq!(a.count_offset + MIRROR_DELTA, b.count_offset);
        assert_eq!(a.capacity, b.capacity);
    }

    assert_eq!(bank1.offset(Field::PartyData).expect("mapped"), 0x1A6D);
    assert_eq!(bank2.offset(Field::Money).expect("mapped"), 0x23DC);
}

#[test]
fn checksum_fields_do_not_follow_the_delta() {
    let layout = Revision::CrystalUsEu.layout();
    let bank1 = layout.bank(BankId::Bank1);
    let bank2 = layout.bank(BankId::Bank2);

    assert_eq!(bank1.checksum_range, ByteRange::new(0x1209, 0x1D83));
    assert_eq!(bank1.checksum_offset, 0x1F0D);
    assert_eq!(bank2.checksum_range, ByteRange::new(0x2009, 0x2D69));
    assert_eq!(bank2.checksum_offset, 0x2D69);
    assert_ne!(bank1.checksum_offset + MIRROR_DELTA, bank2.checksum_offset);
}

#[test]
fn pocket_geometry_matches_the_save_format() {
    let balls = *Revision::CrystalUsEu
        .layout()
        .primary()
        .pocket(PocketKind::Balls)
        .expect("balls are mapped");
    assert_eq!(balls.count_offset, 0x2465);
    assert_eq!(balls.capacity, 12);
    assert_eq!(balls.slot_offset(0), 0x2466);
    assert_eq!(balls.terminator_offset(), 0x2466 + 12 * 2);

    let items = *Revision::CrystalUsEu
        .layout()
        .primary()
        .pocket(PocketKind::Items)
        .expect("items are mapped");
    assert_eq!(items.slot_offset(0), 0x241B);
    assert_eq!(items.capacity, 20);
}

#[test]
fn unmapped_pockets_are_unknown_fields() {
    let layout = Revision::CrystalUsEu.layout();
    for kind in [PocketKind::KeyItems, PocketKind::TmHm] {
        for bank in &layout.banks {
            let err = bank.pocket(kind).expect_err("not mapped in this revision");
            assert_eq!(err.code, CoreErrorCode::UnknownField);
            assert!(err.is_recoverable());
        }
    }
}

#[test]
fn validate_rejects_duplicate_roles() {
    let mut broken = CRYSTAL_US_EU;
    broken.banks[0].role = BankRole::Primary;
    let err = broken.validate().expect_err("two primaries");
    assert_eq!(err.code, CoreErrorCode::Format);
}

#[test]
fn validate_rejects_storage_inside_the_range() {
    let mut broken = CRYSTAL_US_EU;
    broken.banks[1].checksum_offset = 0x2100;
    let err = broken.validate().expect_err("storage precedes range end");
    assert_eq!(err.code, CoreErrorCode::Format);
}

#[test]
fn validate_rejects_overlapping_banks() {
    let mut broken = CRYSTAL_US_EU;
    broken.banks[0].checksum_range = ByteRange::new(0x1209, 0x2100);
    broken.banks[0].checksum_offset = 0x2E00;
    let err = broken.validate().expect_err("ranges overlap");
    assert_eq!(err.code, CoreErrorCode::Format);
}

#[test]
fn pocket_names_parse_case_insensitively() {
    assert_eq!(PocketKind::from_name("Balls"), Some(PocketKind::Balls));
    assert_eq!(PocketKind::from_name("tm-hm"), Some(PocketKind::TmHm));
    assert_eq!(PocketKind::from_name("berries"), None);
    assert_eq!(PocketKind::KeyItems.to_string(), "key_items");
}
