use crystal_core::core_api::{Engine, Session};
use crystal_core::edit::EditOp;
use crystal_core::image::{SAVE_SIZE, SaveImage};
use crystal_core::layout::{MIRROR_DELTA, PocketKind, Revision};
use crystal_core::text;
use crystal_core::transaction::Transaction;
use crystal_render::{
    FieldSelection, JsonStyle, TextRenderOptions, TextStyle, render_edit_report_json,
    render_edit_report_text, render_json_full, render_json_selected, render_text_with_options,
    render_trainer_card, render_verify_json, render_verify_text,
};
use serde_json::Value;

/// Player "KRIS", id 0x3039, $3000, five Poke Balls and a Cyndaquil "FLAME".
fn sample_session() -> Session {
    let mut bytes = vec![0u8; SAVE_SIZE];
    for delta in [0, MIRROR_DELTA] {
        bytes[0x2009 - delta..0x200B - delta].copy_from_slice(&[0x30, 0x39]);
        bytes[0x200B - delta..0x2016 - delta].copy_from_slice(&text::encode("KRIS"));
        bytes[0x23DC - delta..0x23DF - delta].copy_from_slice(&[0x00, 0x30, 0x00]);
        bytes[0x2465 - delta..0x2468 - delta].copy_from_slice(&[1, 0x04, 5]);
        bytes[0x2468 - delta] = 0xFF;
        bytes[0x241A - delta + 1] = 0xFF;
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
    Engine::default()
        .open_bytes(txn.to_bytes().expect("committed"))
        .expect("sample save verifies")
}

fn keys(value: &Value) -> Vec<&str> {
    value
        .as_object()
        .expect("json should be an object")
        .keys()
        .map(String::as_str)
        .collect()
}

#[test]
fn full_json_uses_canonical_top_level_order() {
    let snapshot = sample_session().snapshot().expect("decodes");
    let value = render_json_full(&snapshot, JsonStyle::CanonicalV1);

    assert_eq!(
        keys(&value),
        vec![
            "revision",
            "state",
            "source_bank",
            "player_name",
            "trainer_id",
            "money",
            "checksums",
            "pockets",
            "party_count",
            "party",
        ]
    );
    assert_eq!(value["revision"], "crystal-us-eu");
    assert_eq!(value["state"], "clean");
    assert_eq!(value["source_bank"], 2);
    assert_eq!(value["player_name"], "KRIS");
    assert_eq!(value["trainer_id"], 12345);
    assert_eq!(value["money"], 3000);
    assert_eq!(value["checksums"][0]["bank"], 1);
    assert_eq!(value["checksums"][1]["role"], "primary");
    assert_eq!(value["checksums"][1]["valid"], true);
    assert_eq!(keys(&value["pockets"]), vec!["items", "balls"]);
    assert_eq!(value["pockets"]["balls"]["items"][0]["name"], "Poke Ball");
    assert_eq!(value["pockets"]["balls"]["items"][0]["quantity"], 5);
    assert_eq!(value["pockets"]["balls"]["capacity"], 12);
}

#[test]
fn party_json_names_species_moves_and_dvs() {
    let snapshot = sample_session().snapshot().expect("decodes");
    let value = render_json_full(&snapshot, JsonStyle::CanonicalV1);
    let mon = &value["party"][0];

    assert_eq!(mon["slot"], 1);
    assert_eq!(mon["species_name"], "Cyndaquil");
    assert_eq!(mon["nickname"], "FLAME");
    assert_eq!(mon["level"], 5);
    assert_eq!(mon["held_item_name"], Value::Null);
    assert_eq!(mon["moves"][0]["name"], "Tackle");
    assert_eq!(mon["moves"][0]["pp"], 35);
    assert_eq!(keys(&mon["dvs"]), vec!["hp", "attack", "defense", "speed", "special"]);
    assert_eq!(mon["shiny"], false);
    assert_eq!(keys(&mon["stat_exp"]), vec!["hp", "atk", "def", "spd", "spc"]);
}

#[test]
fn selected_json_uses_canonical_subset_order() {
    let snapshot = sample_session().snapshot().expect("decodes");
    let fields = FieldSelection {
        party: true,
        checksums: true,
        ..FieldSelection::default()
    };
    assert!(fields.is_any_selected());
    assert!(!FieldSelection::default().is_any_selected());

    let value = render_json_selected(&snapshot, &fields, JsonStyle::CanonicalV1);
    assert_eq!(keys(&value), vec!["checksums", "party_count", "party"]);
}

#[test]
fn trainer_card_contains_expected_sections() {
    let snapshot = sample_session().snapshot().expect("decodes");
    let rendered = render_trainer_card(&snapshot);

    assert!(rendered.contains("TRAINER CARD"));
    assert!(rendered.contains("KRIS"));
    assert!(rendered.contains("12345"));
    assert!(rendered.contains("$3,000"));
    assert!(rendered.contains(" ::: Checksums :::"));
    assert!(rendered.contains(" ::: Balls (1/12) :::"));
    assert!(rendered.contains("Poke Ball"));
    assert!(rendered.contains(" ::: Party (1/6) :::"));
    assert!(rendered.contains("FLAME"));
    assert!(rendered.contains("Cyndaquil"));
    assert!(rendered.contains("Tackle (35)"));
    assert!(!rendered.contains("DVs:"));

    let verbose = render_text_with_options(
        &snapshot,
        TextStyle::TrainerCard,
        TextRenderOptions { verbose: true },
    );
    assert!(verbose.contains("DVs: HP="));
    assert!(verbose.contains("Stat Exp: HP=0"));
}

#[test]
fn verify_output_reports_healthy_banks() {
    let report = sample_session().verify().expect("verify");
    let text = render_verify_text(&report);
    assert!(text.contains("Loads from: Bank 2"));
    assert!(text.contains("identical"));
    assert!(text.contains("Result:     OK"));

    let json = render_verify_json(&report, JsonStyle::CanonicalV1);
    assert_eq!(json["healthy"], true);
    assert_eq!(json["authoritative"], 2);
    assert_eq!(json["divergent"], Value::Array(Vec::new()));
}

#[test]
fn edit_report_lists_each_outcome() {
    let mut session = sample_session();
    let report = session
        .apply_edits(&[
            EditOp::AddItem {
                pocket: PocketKind::Balls,
                item_id: 0x01,
                quantity: 99,
            },
            EditOp::SetLevel { slot: 4, level: 50 },
        ])
        .expect("session is editable");

    let text = render_edit_report_text(&report);
    assert!(text.contains("[ok]   add 99 x Master Ball to balls"));
    assert!(text.contains("[fail]"));
    assert!(text.contains("1 of 2 edits applied"));
    assert!(text.contains("Bank 2: 0x"));

    let json = render_edit_report_json(&report, JsonStyle::CanonicalV1);
    assert_eq!(json["committed"], true);
    assert_eq!(json["applied"], 1);
    assert_eq!(json["failed"], 1);
    assert_eq!(json["outcomes"][1]["error_code"], "InvalidSlot");
    assert_eq!(json["checksums_after"][1]["valid"], true);
}

fn recommitted_session(bytes: Vec<u8>) -> Session {
    let mut txn = Transaction::begin(
        SaveImage::from_bytes(bytes).expect("full save"),
        Revision::CrystalUsEu.layout(),
    )
    .expect("layout is valid");
    txn.commit().expect("commit");
    Engine::default()
        .open_image(txn.image().clone())
        .expect("both checksums verify")
}

#[test]
fn edit_report_names_regions_copied_between_banks() {
    let mut bytes = sample_session().to_bytes().expect("clean");
    bytes[0x2467 - MIRROR_DELTA] = 1;
    let mut session = recommitted_session(bytes);

    let report = session
        .apply_edits(&[EditOp::SetMoney { amount: 10 }])
        .expect("session is editable");

    let text = render_edit_report_text(&report);
    assert!(text.contains("banks disagreed; copied from the loaded bank: balls"));
    let json = render_edit_report_json(&report, JsonStyle::CanonicalV1);
    assert_eq!(json["resynced"], serde_json::json!(["balls"]));

    let clean = sample_session()
        .apply_edits(&[EditOp::SetMoney { amount: 10 }])
        .expect("session is editable");
    assert!(!render_edit_report_text(&clean).contains("banks disagreed"));
    assert_eq!(
        render_edit_report_json(&clean, JsonStyle::CanonicalV1)["resynced"],
        Value::Array(Vec::new())
    );
}

#[test]
fn undecodable_money_renders_as_unknown() {
    let mut bytes = sample_session().to_bytes().expect("clean");
    for delta in [0, MIRROR_DELTA] {
        bytes[0x23DE - delta] = 0x0B;
    }
    let snapshot = recommitted_session(bytes).snapshot().expect("decodes");

    let json = render_json_full(&snapshot, JsonStyle::CanonicalV1);
    assert_eq!(json["money"], Value::Null);
    assert_eq!(json["player_name"], "KRIS");

    let card = render_trainer_card(&snapshot);
    assert!(card.contains("$???"));
    assert!(card.contains("FLAME"));
}
