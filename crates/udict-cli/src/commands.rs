use anyhow::Context;
use bytes::Bytes;
use chrono::{Local, NaiveDate};
use colored::Colorize;
use serde_json::json;
use udict_merge::{update_dictionary, UpdateRequest};
use udict_model::Storage;

use crate::cli::{Cli, Command, OutputFormat, ShowArgs, UpdateArgs};
use crate::config::{expand_tilde, Config};
use crate::dates::values_for_day;
use crate::persist::{read_existing, write_atomic};
use crate::reload::{reload_ime, ReloadOutcome};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Update(args) => cmd_update(args, &cli.format),
        Command::Show(args) => cmd_show(args, &cli.format),
    }
}

fn load_config(path: &std::path::Path, db_override: Option<&std::path::Path>) -> anyhow::Result<Config> {
    let mut config = Config::load(path)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    if let Some(db) = db_override {
        config.db_path = expand_tilde(db)?;
    }
    Ok(config)
}

/// Turn the configured days into one update request for `today`.
pub fn build_request(config: &Config, today: NaiveDate) -> anyhow::Result<UpdateRequest> {
    let mut request = UpdateRequest::new(config.dictionary_name.clone(), config.pos);
    for day in &config.days {
        let values = values_for_day(today, day.offset_days, &config.formats)
            .with_context(|| format!("invalid day entry '{}'", day.key))?;
        request.add_values(day.key.clone(), values);
    }
    Ok(request)
}

fn cmd_update(args: UpdateArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = load_config(&args.config, args.db_path.as_deref())?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let request = build_request(&config, today)?;

    let raw = Bytes::from(read_existing(&config.db_path)?);
    let (new_raw, summary) = update_dictionary(&raw, &request)
        .with_context(|| format!("failed to parse dictionary file {}", config.db_path.display()))?;

    if args.dry_run {
        match format {
            OutputFormat::Json => {
                let keys: Vec<_> = request
                    .keys()
                    .iter()
                    .map(|kv| json!({ "key": kv.key, "values": kv.values }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&json!({ "dry_run": true, "keys": keys }))?);
            }
            OutputFormat::Text => {
                println!("{}", "Dry run only; no files will be written.".yellow());
                for kv in request.keys() {
                    println!("{}: {}", kv.key.bold(), kv.values.join(", "));
                }
            }
        }
        return Ok(());
    }

    if new_raw[..] == raw[..] {
        match format {
            OutputFormat::Json => println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "changed": false, "summary": summary }))?
            ),
            OutputFormat::Text => println!("{} No changes needed.", "✓".green()),
        }
        return Ok(());
    }

    let backup = write_atomic(&config.db_path, &new_raw, !args.no_backup)?;

    let reload = args
        .reload_enabled()
        .then(|| reload_ime(args.tool_path.as_deref()));

    match format {
        OutputFormat::Json => {
            let reload_json = match &reload {
                None => json!(null),
                Some(ReloadOutcome::Reloaded { note }) => json!({ "reloaded": true, "note": note }),
                Some(ReloadOutcome::Skipped { reason }) => json!({ "reloaded": false, "note": reason }),
            };
            let out = json!({
                "changed": true,
                "summary": summary,
                "db_path": config.db_path,
                "backup": backup,
                "reload": reload_json,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!(
                "{} Updated dictionary '{}' (id={}) with {} entries for {} keys.",
                "✓".green().bold(),
                summary.dictionary_name.bold(),
                summary.dictionary_id.to_string().cyan(),
                summary.entry_count,
                summary.key_count,
            );
            if summary.created {
                println!("  Created new dictionary");
            }
            println!("  Dictionary path: {}", config.db_path.display());
            if let Some(backup) = &backup {
                println!("  Backup written to: {}", backup.display());
            }
            match &reload {
                None => {}
                Some(ReloadOutcome::Reloaded { note: None }) => {
                    println!("{} Reloaded the IME.", "✓".green());
                }
                Some(ReloadOutcome::Reloaded { note: Some(note) }) => {
                    eprintln!("Reloaded the IME (note: {note})");
                }
                Some(ReloadOutcome::Skipped { reason }) => {
                    eprintln!("{} {reason}", "Reload skipped:".yellow());
                }
            }
        }
    }
    Ok(())
}

fn cmd_show(args: ShowArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let db_path = match (&args.db_path, args.config.exists()) {
        (Some(db), _) => expand_tilde(db)?,
        (None, true) => load_config(&args.config, None)?.db_path,
        (None, false) => anyhow::bail!(
            "no --db-path given and config {} not found",
            args.config.display()
        ),
    };

    let raw = Bytes::from(read_existing(&db_path)?);
    let storage = Storage::parse(&raw)
        .with_context(|| format!("failed to parse dictionary file {}", db_path.display()))?;

    match format {
        OutputFormat::Json => {
            let dictionaries: Vec<_> = storage
                .dictionaries
                .iter()
                .map(|d| {
                    json!({
                        "id": d.id,
                        "name": d.name,
                        "entries": d.entries.len(),
                        "unknown_fields": d.unknown_fields.len(),
                    })
                })
                .collect();
            let out = json!({
                "db_path": db_path,
                "dictionaries": dictionaries,
                "unknown_fields": storage.unknown_fields.len(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!("{} ({} bytes)", db_path.display().to_string().bold(), raw.len());
            if storage.dictionaries.is_empty() {
                println!("  No dictionaries.");
            }
            for d in &storage.dictionaries {
                println!(
                    "  {}  id={}  {} entries",
                    d.name.yellow(),
                    d.id.to_string().cyan(),
                    d.entries.len()
                );
                if !d.unknown_fields.is_empty() {
                    println!("    {} unrecognized fields", d.unknown_fields.len());
                }
            }
            if !storage.unknown_fields.is_empty() {
                println!("  {} unrecognized top-level fields", storage.unknown_fields.len());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, DayConfig};
    use udict_model::build_entry;

    fn config(db_path: std::path::PathBuf) -> Config {
        Config {
            dictionary_name: "dates".into(),
            db_path,
            pos: 1,
            days: vec![
                DayConfig { key: "きょう".into(), offset_days: 0 },
                DayConfig { key: "あした".into(), offset_days: 1 },
            ],
            formats: vec!["m/d(w)".into(), "yyyy-mm-dd".into(), "m/d(w)".into()],
        }
    }

    #[test]
    fn request_follows_config_order() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let request = build_request(&config("x.db".into()), today).unwrap();

        assert_eq!(request.dictionary_name, "dates");
        let keys = request.keys();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].key, "きょう");
        assert_eq!(keys[0].values, vec!["3/4(月)", "2024-03-04"]);
        assert_eq!(keys[1].key, "あした");
        assert_eq!(keys[1].values, vec!["3/5(火)", "2024-03-05"]);
    }

    #[test]
    fn request_builds_expected_entries() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let entries = build_request(&config("x.db".into()), today).unwrap().build_entries().unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0], build_entry("きょう", "3/4(月)", "", 1).unwrap());
        assert_eq!(entries[3], build_entry("あした", "2024-03-05", "", 1).unwrap());
    }

    #[test]
    fn end_to_end_update_and_rerun() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("user_dictionary.db");
        let cfg = config(db.clone());
        let today = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();

        let raw = Bytes::from(read_existing(&db).unwrap());
        let (first, summary) = update_dictionary(&raw, &build_request(&cfg, today).unwrap()).unwrap();
        assert!(summary.created);
        write_atomic(&db, &first, true).unwrap();

        let raw = Bytes::from(read_existing(&db).unwrap());
        let (second, summary) = update_dictionary(&raw, &build_request(&cfg, today).unwrap()).unwrap();
        assert!(!summary.created);
        assert_eq!(second, first);

        let next_day = today.succ_opt().unwrap();
        let (third, _) = update_dictionary(&raw, &build_request(&cfg, next_day).unwrap()).unwrap();
        let storage = Storage::parse(&Bytes::from(third)).unwrap();
        assert_eq!(storage.dictionaries.len(), 1);
        assert_eq!(storage.dictionaries[0].entries.len(), 4);
        assert_eq!(
            storage.dictionaries[0].entries[0].key().unwrap().as_deref(),
            Some("きょう")
        );
    }

    #[test]
    fn out_of_range_offset_fails_request() {
        let mut cfg = config("x.db".into());
        cfg.days.push(DayConfig { key: "いつか".into(), offset_days: 100_000_000 });
        let today = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();

        let err = build_request(&cfg, today).unwrap_err();
        assert!(err.to_string().contains("いつか"));
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::OffsetOutOfRange { offset_days: 100_000_000 })
        ));
    }
}
