use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, ValueEnum};
use crystal_core::core_api::{EditReport, Engine, Session};
use crystal_core::edit::{EditOp, PartyTarget, presets};
use crystal_core::layout::{PocketKind, Revision};
use crystal_render::{
    FieldSelection, JsonStyle, TextRenderOptions, TextStyle, render_edit_report_json,
    render_edit_report_text, render_json_full, render_json_selected, render_text_selected,
    render_text_with_options, render_verify_json, render_verify_text,
};
use log::info;
use serde_json::{Map as JsonMap, Value as JsonValue};

const BACKUP_SUFFIX: &str = ".backup_original";

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum RevisionArg {
    CrystalUsEu,
}

impl From<RevisionArg> for Revision {
    fn from(value: RevisionArg) -> Self {
        match value {
            RevisionArg::CrystalUsEu => Revision::CrystalUsEu,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(value_name = "SAVE.SRM")]
    path: PathBuf,
    #[arg(long, value_enum, default_value_t = RevisionArg::CrystalUsEu)]
    revision: RevisionArg,
    /// Trainer name, id, money and both bank checksums.
    #[arg(long)]
    info: bool,
    #[arg(long)]
    pockets: bool,
    #[arg(long)]
    party: bool,
    /// Check both checksums and compare the two banks.
    #[arg(long)]
    verify: bool,
    #[arg(long)]
    json: bool,
    /// -v for info logs and a detailed party listing, -vv for debug logs.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[arg(long)]
    masterballs: bool,
    #[arg(long)]
    rarecandy: bool,
    #[arg(long)]
    allballs: bool,
    /// Set money to 999,999.
    #[arg(long)]
    money: bool,
    #[arg(long = "set-money", value_name = "N", conflicts_with = "money")]
    set_money: Option<u32>,
    #[arg(long)]
    healing: bool,
    #[arg(long = "stat-items")]
    stat_items: bool,
    #[arg(long = "all-items")]
    all_items: bool,
    #[arg(long, value_name = "SLOT|all", value_parser = parse_party_target)]
    shiny: Option<PartyTarget>,
    #[arg(long, value_name = "SLOT|all", value_parser = parse_party_target)]
    maxstats: Option<PartyTarget>,
    #[arg(long, num_args = 2, value_names = ["SLOT", "LEVEL"])]
    level: Option<Vec<u8>>,
    /// Restore HP, PP and status for every party member.
    #[arg(long)]
    heal: bool,
    #[arg(long, value_name = "SLOT")]
    suicune: Option<usize>,
    #[arg(
        long = "add-item",
        value_name = "POCKET:ID[:QTY]",
        value_parser = parse_add_item
    )]
    add_item: Vec<EditOp>,
    /// JSON array of edit objects, applied after the flag edits.
    #[arg(long, value_name = "FILE.json")]
    edits: Option<PathBuf>,

    #[arg(long, value_name = "PATH", conflicts_with = "in_place")]
    output: Option<PathBuf>,
    /// Overwrite SAVE.SRM, keeping the first original as SAVE.SRM.backup_original.
    #[arg(long = "in-place")]
    in_place: bool,
}

impl Cli {
    fn field_selection(&self) -> FieldSelection {
        FieldSelection {
            info: self.info,
            pockets: self.pockets,
            party: self.party,
            checksums: self.info,
        }
    }

    /// Flag edits in a fixed order, followed by the contents of `--edits`.
    fn requested_edits(&self) -> Result<Vec<EditOp>, String> {
        let mut ops = Vec::new();
        if self.all_items {
            ops.extend(presets::all_items());
        } else {
            if self.masterballs {
                ops.extend(presets::master_balls());
            }
            if self.allballs {
                ops.extend(presets::all_balls());
            }
            if self.rarecandy {
                ops.extend(presets::rare_candy());
            }
            if self.healing {
                ops.extend(presets::healing_items());
            }
            if self.stat_items {
                ops.extend(presets::stat_items());
            }
            if self.money {
                ops.extend(presets::max_money());
            }
        }
        if let Some(amount) = self.set_money {
            ops.push(EditOp::SetMoney { amount });
        }
        ops.extend(self.add_item.iter().cloned());
        if let Some(target) = self.shiny {
            ops.push(EditOp::MakeShiny { target });
        }
        if let Some(target) = self.maxstats {
            ops.push(EditOp::MaxStats { target });
        }
        if let Some(values) = &self.level {
            if let [slot, level] = values.as_slice() {
                ops.push(EditOp::SetLevel {
                    slot: usize::from(*slot),
                    level: *level,
                });
            }
        }
        if let Some(slot) = self.suicune {
            ops.push(EditOp::PlaceSuicune { slot });
        }
        if self.heal {
            ops.push(EditOp::HealParty);
        }
        if let Some(path) = &self.edits {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
            let file_ops: Vec<EditOp> = serde_json::from_str(&text)
                .map_err(|e| format!("Error parsing {}: {e}", path.display()))?;
            ops.extend(file_ops);
        }
        Ok(ops)
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let fields = cli.field_selection();
    let edits = cli.requested_edits().unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(2);
    });
    let has_edits = !edits.is_empty() || cli.edits.is_some();
    let destination = if cli.in_place {
        Some(cli.path.clone())
    } else {
        cli.output.clone()
    };

    if has_edits && destination.is_none() {
        eprintln!("edit flags require --output <PATH> or --in-place");
        process::exit(2);
    }
    if !has_edits && destination.is_some() {
        eprintln!("--output and --in-place require at least one edit");
        process::exit(2);
    }

    let engine = Engine::new(cli.revision.into());
    let mut session = engine.open_path(&cli.path).unwrap_or_else(|e| {
        eprintln!("Error opening save file: {}", cli.path.display());
        eprintln!("  {e}");
        process::exit(1);
    });

    let report = if has_edits {
        let report = session.apply_edits(&edits).unwrap_or_else(|e| {
            eprintln!("Error applying edits: {e}");
            process::exit(1);
        });
        if !report.all_applied() {
            print_report(&session, &cli, fields, Some(&report), None);
            eprintln!(
                "{} of {} edits failed; nothing was written",
                report.failed().count(),
                report.outcomes.len()
            );
            process::exit(1);
        }
        Some(report)
    } else {
        None
    };

    if let Some(out_path) = &destination {
        if cli.in_place {
            backup_original(&cli.path).unwrap_or_else(|e| {
                eprintln!("Error backing up {}: {e}", cli.path.display());
                process::exit(1);
            });
        }
        session.persist(out_path).unwrap_or_else(|e| {
            eprintln!("Error writing {}: {e}", out_path.display());
            process::exit(1);
        });
    }

    print_report(&session, &cli, fields, report.as_ref(), destination.as_deref());
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn print_report(
    session: &Session,
    cli: &Cli,
    fields: FieldSelection,
    report: Option<&EditReport>,
    written: Option<&Path>,
) {
    let show_full = !fields.is_any_selected() && !cli.verify && report.is_none();
    let snapshot = if show_full || fields.is_any_selected() {
        Some(session.snapshot().unwrap_or_else(|e| {
            eprintln!("Error decoding save file: {e}");
            process::exit(1);
        }))
    } else {
        None
    };
    let verify = if cli.verify {
        Some(session.verify().unwrap_or_else(|e| {
            eprintln!("Error verifying save file: {e}");
            process::exit(1);
        }))
    } else {
        None
    };

    if cli.json {
        let mut out = JsonMap::new();
        if let Some(snapshot) = &snapshot {
            let rendered = if show_full {
                render_json_full(snapshot, JsonStyle::CanonicalV1)
            } else {
                render_json_selected(snapshot, &fields, JsonStyle::CanonicalV1)
            };
            if let JsonValue::Object(map) = rendered {
                out.extend(map);
            }
        }
        if let Some(verify) = &verify {
            out.insert(
                "verify".to_string(),
                render_verify_json(verify, JsonStyle::CanonicalV1),
            );
        }
        if let Some(report) = report {
            out.insert(
                "edits".to_string(),
                render_edit_report_json(report, JsonStyle::CanonicalV1),
            );
        }
        if let Some(path) = written {
            out.insert(
                "written".to_string(),
                JsonValue::String(path.display().to_string()),
            );
        }
        let rendered = serde_json::to_string_pretty(&JsonValue::Object(out)).unwrap_or_else(|e| {
            eprintln!("Error rendering JSON output: {e}");
            process::exit(1);
        });
        println!("{rendered}");
        return;
    }

    let options = TextRenderOptions {
        verbose: cli.verbose > 0,
    };
    if let Some(report) = report {
        print!("{}", render_edit_report_text(report));
    }
    if let Some(snapshot) = &snapshot {
        if show_full {
            print!(
                "{}",
                render_text_with_options(snapshot, TextStyle::TrainerCard, options)
            );
        } else {
            print!("{}", render_text_selected(snapshot, &fields, options));
        }
    }
    if let Some(verify) = &verify {
        print!("{}", render_verify_text(verify));
    }
    if let Some(path) = written {
        println!("Wrote edited save to {}", path.display());
    }
}

/// Copies `path` to `<path>.backup_original` unless that backup already
/// exists, so repeated in-place edits keep the very first original.
fn backup_original(path: &Path) -> std::io::Result<()> {
    let backup = backup_path(path);
    if backup.exists() {
        return Ok(());
    }
    fs::copy(path, &backup)?;
    info!("backed up {} to {}", path.display(), backup.display());
    Ok(())
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

fn parse_party_target(value: &str) -> Result<PartyTarget, String> {
    if value.eq_ignore_ascii_case("all") {
        return Ok(PartyTarget::All);
    }
    value
        .parse::<usize>()
        .map(PartyTarget::Slot)
        .map_err(|_| format!("expected a party slot 1-6 or 'all', got '{value}'"))
}

fn parse_add_item(value: &str) -> Result<EditOp, String> {
    let mut parts = value.split(':');
    let (Some(pocket), Some(item_id)) = (parts.next(), parts.next()) else {
        return Err(format!("expected POCKET:ID[:QTY], got '{value}'"));
    };
    let pocket =
        PocketKind::from_name(pocket).ok_or_else(|| format!("unknown pocket '{pocket}'"))?;
    let item_id = parse_byte(item_id)?;
    let quantity = match parts.next() {
        Some(qty) => parse_byte(qty)?,
        None => presets::QUANTITY,
    };
    if parts.next().is_some() {
        return Err(format!("expected POCKET:ID[:QTY], got '{value}'"));
    }
    Ok(EditOp::AddItem {
        pocket,
        item_id,
        quantity,
    })
}

fn parse_byte(value: &str) -> Result<u8, String> {
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => value.parse::<u8>(),
    };
    parsed.map_err(|_| format!("expected a value 0-255 or 0x00-0xFF, got '{value}'"))
}
