use std::fmt::Write as _;

use crystal_core::checksum::BankStatus;
use crystal_core::codec::Divergence;
use crystal_core::codec::pocket::PocketContents;
use crystal_core::core_api::{EditReport, PartyEntry, Snapshot, VerifyReport};
use crystal_core::layout::{BankRole, Field};
use crystal_core::transaction::TransactionState;
use serde_json::{Map as JsonMap, Value as JsonValue};

const SHEET_WIDTH: usize = 60;
const LABEL_WIDTH: usize = 12;
const NAME_COL_WIDTH: usize = 12;
const SPECIES_COL_WIDTH: usize = 12;
const MOVE_COL_WIDTH: usize = 14;
const STAT_EXP_LABELS: [&str; 5] = ["HP", "Atk", "Def", "Spd", "Spc"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    CanonicalV1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextStyle {
    #[default]
    TrainerCard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRenderOptions {
    /// Adds DVs, stat experience and raw ids to the party listing.
    pub verbose: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FieldSelection {
    pub info: bool,
    pub pockets: bool,
    pub party: bool,
    pub checksums: bool,
}

impl FieldSelection {
    pub fn is_any_selected(&self) -> bool {
        self.info || self.pockets || self.party || self.checksums
    }
}

pub fn render_json_full(snapshot: &Snapshot, style: JsonStyle) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => JsonValue::Object(default_json(snapshot)),
    }
}

pub fn render_json_selected(
    snapshot: &Snapshot,
    fields: &FieldSelection,
    style: JsonStyle,
) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => JsonValue::Object(selected_json(fields, snapshot)),
    }
}

pub fn render_verify_json(report: &VerifyReport, style: JsonStyle) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => {
            let mut out = JsonMap::new();
            out.insert("healthy".to_string(), JsonValue::Bool(report.is_healthy()));
            out.insert(
                "authoritative".to_string(),
                match report.authoritative {
                    Some(bank) => JsonValue::from(bank.number()),
                    None => JsonValue::Null,
                },
            );
            out.insert("checksums".to_string(), bank_statuses_to_json(&report.banks));
            out.insert("divergent".to_string(), divergences_to_json(&report.divergent));
            JsonValue::Object(out)
        }
    }
}

pub fn render_edit_report_json(report: &EditReport, style: JsonStyle) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => {
            let outcomes = report
                .outcomes
                .iter()
                .map(|outcome| {
                    let mut entry = JsonMap::new();
                    entry.insert(
                        "description".to_string(),
                        JsonValue::String(outcome.description.clone()),
                    );
                    entry.insert("applied".to_string(), JsonValue::Bool(outcome.applied));
                    if let Some(code) = outcome.error_code {
                        entry.insert(
                            "error_code".to_string(),
                            JsonValue::String(format!("{code:?}")),
                        );
                    }
                    if let Some(error) = &outcome.error {
                        entry.insert("error".to_string(), JsonValue::String(error.clone()));
                    }
                    JsonValue::Object(entry)
                })
                .collect();

            let mut out = JsonMap::new();
            out.insert("committed".to_string(), JsonValue::Bool(report.committed));
            out.insert(
                "applied".to_string(),
                JsonValue::from(report.applied_count()),
            );
            out.insert(
                "failed".to_string(),
                JsonValue::from(report.failed().count()),
            );
            out.insert(
                "checksums_before".to_string(),
                bank_statuses_to_json(&report.checksums_before),
            );
            out.insert(
                "checksums_after".to_string(),
                bank_statuses_to_json(&report.checksums_after),
            );
            out.insert("resynced".to_string(), divergences_to_json(&report.resynced));
            out.insert("outcomes".to_string(), JsonValue::Array(outcomes));
            JsonValue::Object(out)
        }
    }
}

pub fn render_trainer_card(snapshot: &Snapshot) -> String {
    render_text_with_options(snapshot, TextStyle::TrainerCard, TextRenderOptions::default())
}

pub fn render_text(snapshot: &Snapshot, style: TextStyle) -> String {
    render_text_with_options(snapshot, style, TextRenderOptions::default())
}

pub fn render_text_with_options(
    snapshot: &Snapshot,
    style: TextStyle,
    options: TextRenderOptions,
) -> String {
    match style {
        TextStyle::TrainerCard => {
            let mut out = String::new();
            write_header(&mut out, snapshot);
            write_checksums(&mut out, &snapshot.banks);
            write_pockets(&mut out, &snapshot.pockets);
            write_party(&mut out, &snapshot.party, options);
            out
        }
    }
}

/// Text for the sections picked in `fields`, in a fixed order.
pub fn render_text_selected(
    snapshot: &Snapshot,
    fields: &FieldSelection,
    options: TextRenderOptions,
) -> String {
    let mut out = String::new();
    if fields.info {
        write_header(&mut out, snapshot);
    }
    if fields.checksums {
        write_checksums(&mut out, &snapshot.banks);
    }
    if fields.pockets {
        write_pockets(&mut out, &snapshot.pockets);
    }
    if fields.party {
        write_party(&mut out, &snapshot.party, options);
    }
    out
}

pub fn render_verify_text(report: &VerifyReport) -> String {
    let mut out = String::new();
    write_checksums(&mut out, &report.banks);

    let authoritative = match report.authoritative {
        Some(bank) => bank.to_string(),
        None => "none".to_string(),
    };
    writeln!(&mut out, "{:<LABEL_WIDTH$}{}", "Loads from:", authoritative)
        .expect("writing to String cannot fail");
    if report.divergent.is_empty() {
        writeln!(&mut out, "{:<LABEL_WIDTH$}identical", "Banks:")
            .expect("writing to String cannot fail");
    } else {
        let names: Vec<&str> = report.divergent.iter().map(divergence_name).collect();
        writeln!(
            &mut out,
            "{:<LABEL_WIDTH$}differ in {}",
            "Banks:",
            names.join(", ")
        )
        .expect("writing to String cannot fail");
    }
    writeln!(
        &mut out,
        "{:<LABEL_WIDTH$}{}",
        "Result:",
        if report.is_healthy() { "OK" } else { "PROBLEMS FOUND" }
    )
    .expect("writing to String cannot fail");
    out
}

pub fn render_edit_report_text(report: &EditReport) -> String {
    let mut out = String::new();
    if !report.resynced.is_empty() {
        let names: Vec<&str> = report.resynced.iter().map(divergence_name).collect();
        writeln!(
            &mut out,
            "  banks disagreed; copied from the loaded bank: {}",
            names.join(", ")
        )
        .expect("writing to String cannot fail");
    }
    for outcome in &report.outcomes {
        if outcome.applied {
            writeln!(&mut out, "  [ok]   {}", outcome.description)
                .expect("writing to String cannot fail");
        } else {
            writeln!(
                &mut out,
                "  [fail] {}: {}",
                outcome.description,
                outcome.error.as_deref().unwrap_or("rejected")
            )
            .expect("writing to String cannot fail");
        }
    }
    writeln!(
        &mut out,
        "{} of {} edits applied",
        report.applied_count(),
        report.outcomes.len()
    )
    .expect("writing to String cannot fail");

    for (before, after) in report.checksums_before.iter().zip(&report.checksums_after) {
        writeln!(
            &mut out,
            "  {}: 0x{:04X} -> 0x{:04X}",
            before.bank, before.stored, after.stored
        )
        .expect("writing to String cannot fail");
    }
    if !report.committed {
        writeln!(&mut out, "No changes committed.").expect("writing to String cannot fail");
    }
    out
}

fn selected_json(fields: &FieldSelection, snapshot: &Snapshot) -> JsonMap<String, JsonValue> {
    let mut out = JsonMap::new();
    if fields.info {
        insert_info(&mut out, snapshot);
    }
    if fields.checksums {
        out.insert("checksums".to_string(), bank_statuses_to_json(&snapshot.banks));
    }
    if fields.pockets {
        out.insert("pockets".to_string(), pockets_to_json(&snapshot.pockets));
    }
    if fields.party {
        out.insert(
            "party_count".to_string(),
            JsonValue::from(snapshot.party_count),
        );
        out.insert("party".to_string(), party_to_json(&snapshot.party));
    }
    out
}

fn default_json(snapshot: &Snapshot) -> JsonMap<String, JsonValue> {
    let mut out = JsonMap::new();
    insert_info(&mut out, snapshot);
    out.insert("checksums".to_string(), bank_statuses_to_json(&snapshot.banks));
    out.insert("pockets".to_string(), pockets_to_json(&snapshot.pockets));
    out.insert(
        "party_count".to_string(),
        JsonValue::from(snapshot.party_count),
    );
    out.insert("party".to_string(), party_to_json(&snapshot.party));
    out
}

fn insert_info(out: &mut JsonMap<String, JsonValue>, snapshot: &Snapshot) {
    out.insert(
        "revision".to_string(),
        JsonValue::String(snapshot.revision.to_string()),
    );
    out.insert(
        "state".to_string(),
        JsonValue::String(state_name(snapshot.state).to_string()),
    );
    out.insert(
        "source_bank".to_string(),
        JsonValue::from(snapshot.source_bank.number()),
    );
    out.insert(
        "player_name".to_string(),
        JsonValue::String(snapshot.player_name.clone()),
    );
    out.insert(
        "trainer_id".to_string(),
        JsonValue::from(snapshot.trainer_id),
    );
    out.insert(
        "money".to_string(),
        snapshot.money.map_or(JsonValue::Null, JsonValue::from),
    );
}

fn bank_statuses_to_json(banks: &[BankStatus]) -> JsonValue {
    JsonValue::Array(
        banks
            .iter()
            .map(|status| {
                let mut entry = JsonMap::new();
                entry.insert("bank".to_string(), JsonValue::from(status.bank.number()));
                entry.insert(
                    "role".to_string(),
                    JsonValue::String(role_name(status.role).to_string()),
                );
                entry.insert(
                    "stored".to_string(),
                    JsonValue::String(format!("0x{:04X}", status.stored)),
                );
                entry.insert(
                    "computed".to_string(),
                    JsonValue::String(format!("0x{:04X}", status.computed)),
                );
                entry.insert("valid".to_string(), JsonValue::Bool(status.valid));
                JsonValue::Object(entry)
            })
            .collect(),
    )
}

fn pockets_to_json(pockets: &[PocketContents]) -> JsonValue {
    let mut out = JsonMap::new();
    for pocket in pockets {
        let items = pocket
            .slots
            .iter()
            .map(|slot| {
                let mut entry = JsonMap::new();
                entry.insert("id".to_string(), JsonValue::from(slot.item_id));
                entry.insert(
                    "name".to_string(),
                    optional_name(crystal_core::catalog::item_name(slot.item_id)),
                );
                entry.insert("quantity".to_string(), JsonValue::from(slot.quantity));
                JsonValue::Object(entry)
            })
            .collect();

        let mut entry = JsonMap::new();
        entry.insert("count".to_string(), JsonValue::from(pocket.count));
        entry.insert("capacity".to_string(), JsonValue::from(pocket.capacity));
        entry.insert("items".to_string(), JsonValue::Array(items));
        out.insert(pocket.pocket.to_string(), JsonValue::Object(entry));
    }
    JsonValue::Object(out)
}

fn party_to_json(party: &[PartyEntry]) -> JsonValue {
    JsonValue::Array(party.iter().map(party_entry_to_json).collect())
}

fn party_entry_to_json(mon: &PartyEntry) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert("slot".to_string(), JsonValue::from(mon.slot));
    out.insert("species".to_string(), JsonValue::from(mon.species));
    out.insert(
        "species_name".to_string(),
        optional_name(mon.species_name.as_deref()),
    );
    out.insert("nickname".to_string(), JsonValue::String(mon.nickname.clone()));
    out.insert("ot_name".to_string(), JsonValue::String(mon.ot_name.clone()));
    out.insert("level".to_string(), JsonValue::from(mon.level));
    out.insert("held_item".to_string(), JsonValue::from(mon.held_item));
    out.insert(
        "held_item_name".to_string(),
        optional_name(mon.held_item_name.as_deref()),
    );
    out.insert(
        "moves".to_string(),
        JsonValue::Array(
            mon.moves
                .iter()
                .map(|m| {
                    let mut entry = JsonMap::new();
                    entry.insert("id".to_string(), JsonValue::from(m.id));
                    entry.insert("name".to_string(), optional_name(m.name.as_deref()));
                    entry.insert("pp".to_string(), JsonValue::from(m.pp));
                    JsonValue::Object(entry)
                })
                .collect(),
        ),
    );

    let mut dvs = JsonMap::new();
    dvs.insert("hp".to_string(), JsonValue::from(mon.dvs.hp()));
    dvs.insert("attack".to_string(), JsonValue::from(mon.dvs.attack));
    dvs.insert("defense".to_string(), JsonValue::from(mon.dvs.defense));
    dvs.insert("speed".to_string(), JsonValue::from(mon.dvs.speed));
    dvs.insert("special".to_string(), JsonValue::from(mon.dvs.special));
    out.insert("dvs".to_string(), JsonValue::Object(dvs));
    out.insert("shiny".to_string(), JsonValue::Bool(mon.shiny));

    out.insert("hp".to_string(), JsonValue::from(mon.hp));
    out.insert("max_hp".to_string(), JsonValue::from(mon.max_hp));
    out.insert("experience".to_string(), JsonValue::from(mon.experience));
    let mut stat_exp = JsonMap::new();
    for (label, value) in STAT_EXP_LABELS.iter().zip(mon.stat_exp) {
        stat_exp.insert(label.to_ascii_lowercase(), JsonValue::from(value));
    }
    out.insert("stat_exp".to_string(), JsonValue::Object(stat_exp));
    out.insert("friendship".to_string(), JsonValue::from(mon.friendship));
    out.insert("status".to_string(), JsonValue::from(mon.status));
    JsonValue::Object(out)
}

fn write_header(out: &mut String, snapshot: &Snapshot) {
    writeln!(out).expect("writing to String cannot fail");
    writeln!(out, "{}", centered_no_trailing("POKEMON CRYSTAL", SHEET_WIDTH))
        .expect("writing to String cannot fail");
    writeln!(out, "{}", centered_no_trailing("TRAINER CARD", SHEET_WIDTH))
        .expect("writing to String cannot fail");
    writeln!(out).expect("writing to String cannot fail");

    writeln!(
        out,
        "  {:<LABEL_WIDTH$}{:<16}{:<LABEL_WIDTH$}{:05}",
        "Name:", snapshot.player_name, "ID No.:", snapshot.trainer_id
    )
    .expect("writing to String cannot fail");
    writeln!(
        out,
        "  {:<LABEL_WIDTH$}{:<16}{:<LABEL_WIDTH$}{}",
        "Money:",
        snapshot.money.map_or_else(
            || "$???".to_string(),
            |money| format!("${}", format_number_with_commas(money)),
        ),
        "Loaded:",
        snapshot.source_bank
    )
    .expect("writing to String cannot fail");
    if snapshot.state != TransactionState::Clean {
        writeln!(out, "  {:<LABEL_WIDTH$}{}", "State:", state_name(snapshot.state))
            .expect("writing to String cannot fail");
    }
    writeln!(out).expect("writing to String cannot fail");
}

fn write_checksums(out: &mut String, banks: &[BankStatus]) {
    writeln!(out, " ::: Checksums :::").expect("writing to String cannot fail");
    for status in banks {
        writeln!(
            out,
            "  {} ({:<9}) stored 0x{:04X}  computed 0x{:04X}  {}",
            status.bank,
            role_name(status.role),
            status.stored,
            status.computed,
            if status.valid { "OK" } else { "MISMATCH" }
        )
        .expect("writing to String cannot fail");
    }
    writeln!(out).expect("writing to String cannot fail");
}

fn write_pockets(out: &mut String, pockets: &[PocketContents]) {
    for pocket in pockets {
        writeln!(
            out,
            " ::: {} ({}/{}) :::",
            pocket_title(&pocket.pocket.to_string()),
            pocket.slots.len(),
            pocket.capacity
        )
        .expect("writing to String cannot fail");
        if pocket.slots.is_empty() {
            writeln!(out, "  (empty)").expect("writing to String cannot fail");
        }
        for slot in &pocket.slots {
            let name = crystal_core::catalog::item_name(slot.item_id)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Item 0x{:02X}", slot.item_id));
            writeln!(out, "  {:<20} x{:>3}", fit_column(&name, 20), slot.quantity)
                .expect("writing to String cannot fail");
        }
        writeln!(out).expect("writing to String cannot fail");
    }
}

fn write_party(out: &mut String, party: &[PartyEntry], options: TextRenderOptions) {
    writeln!(out, " ::: Party ({}/6) :::", party.len()).expect("writing to String cannot fail");
    if party.is_empty() {
        writeln!(out, "  (empty)").expect("writing to String cannot fail");
    }
    for mon in party {
        let species = match &mon.species_name {
            Some(name) => name.clone(),
            None => format!("#{:03}", mon.species),
        };
        writeln!(
            out,
            "  {}. {:<NAME_COL_WIDTH$}{:<SPECIES_COL_WIDTH$}Lv{:<4}HP {:>3}/{:<3}{}",
            mon.slot,
            fit_column(&mon.nickname, NAME_COL_WIDTH),
            fit_column(&species, SPECIES_COL_WIDTH),
            mon.level,
            mon.hp,
            mon.max_hp,
            if mon.shiny { " *shiny*" } else { "" }
        )
        .expect("writing to String cannot fail");

        let moves: Vec<String> = mon
            .moves
            .iter()
            .filter(|m| m.id != 0)
            .map(|m| {
                let name = m.name.clone().unwrap_or_else(|| format!("Move {}", m.id));
                fit_column(&format!("{name} ({})", m.pp), MOVE_COL_WIDTH + 6)
            })
            .collect();
        writeln!(out, "     Moves: {}", moves.join("  ").trim_end())
            .expect("writing to String cannot fail");
        if let Some(item) = &mon.held_item_name {
            writeln!(out, "     Holds: {item}").expect("writing to String cannot fail");
        }

        if options.verbose {
            writeln!(
                out,
                "     OT: {}  Exp: {}  Friendship: {}  Status: 0x{:02X}",
                mon.ot_name,
                format_number_with_commas(mon.experience),
                mon.friendship,
                mon.status
            )
            .expect("writing to String cannot fail");
            writeln!(out, "     DVs: {}", mon.dvs).expect("writing to String cannot fail");
            let stat_exp: Vec<String> = STAT_EXP_LABELS
                .iter()
                .zip(mon.stat_exp)
                .map(|(label, value)| format!("{label}={value}"))
                .collect();
            writeln!(out, "     Stat Exp: {}", stat_exp.join(" "))
                .expect("writing to String cannot fail");
        }
    }
    writeln!(out).expect("writing to String cannot fail");
}

fn optional_name(name: Option<&str>) -> JsonValue {
    match name {
        Some(name) => JsonValue::String(name.to_string()),
        None => JsonValue::Null,
    }
}

fn divergences_to_json(divergences: &[Divergence]) -> JsonValue {
    JsonValue::Array(
        divergences
            .iter()
            .map(|d| JsonValue::String(divergence_name(d).to_string()))
            .collect(),
    )
}

fn divergence_name(divergence: &Divergence) -> &'static str {
    match divergence {
        Divergence::Field(field) => match field {
            Field::TrainerId => "trainer_id",
            Field::PlayerName => "player_name",
            Field::Money => "money",
            Field::PartyCount => "party_count",
            Field::PartySpecies => "party_species",
            Field::PartyData => "party_data",
            Field::OtNames => "ot_names",
            Field::Nicknames => "nicknames",
        },
        Divergence::Pocket(kind) => kind.as_str(),
    }
}

fn state_name(state: TransactionState) -> &'static str {
    match state {
        TransactionState::Clean => "clean",
        TransactionState::Dirty => "dirty",
        TransactionState::Committed => "committed",
    }
}

fn role_name(role: BankRole) -> &'static str {
    match role {
        BankRole::Primary => "primary",
        BankRole::Secondary => "secondary",
    }
}

fn pocket_title(name: &str) -> String {
    name.split('_')
        .map(|word| match word {
            "tm" | "hm" => word.to_ascii_uppercase(),
            _ => {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn fit_column(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        let mut clipped: String = value.chars().take(width.saturating_sub(1)).collect();
        clipped.push(' ');
        clipped
    } else {
        format!("{value:<width$}")
    }
}

fn centered_no_trailing(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        return value.to_string();
    }
    let left = (width - len) / 2;
    format!("{}{}", " ".repeat(left), value)
}

fn format_number_with_commas(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
