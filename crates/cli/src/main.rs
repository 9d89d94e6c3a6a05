mod filestore;
mod registry;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use serde_json::json;

use moneta_core::{decode_rule, encode_rule, Rule, RuleEnvelope, RULE_TYPE_SPLIT};
use moneta_store::{RuleRecord, RuleStore, StoreError};

use crate::filestore::FileRuleStore;
use crate::registry::load_registry;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Moneta automation rule toolchain.
#[derive(Parser)]
#[command(name = "moneta", version, about = "Moneta automation rule toolchain")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a structured rule file to its persisted envelope
    Encode {
        /// Path to the structured rule JSON file
        rule: PathBuf,
        /// Path to the registry snapshot JSON file
        #[arg(long)]
        registry: PathBuf,
        /// Write the envelope here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Decode a persisted envelope back to a structured rule
    Decode {
        /// Path to the envelope JSON file
        envelope: PathBuf,
        /// Path to the registry snapshot JSON file
        #[arg(long)]
        registry: PathBuf,
        /// Write the rule here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Encode then decode a rule and report any drift
    Roundtrip {
        /// Path to the structured rule JSON file
        rule: PathBuf,
        /// Path to the registry snapshot JSON file
        #[arg(long)]
        registry: PathBuf,
    },

    /// Manage rules in a JSON-file store
    Store {
        /// Path to the rules store file
        #[arg(long)]
        db: PathBuf,
        #[command(subcommand)]
        command: StoreCommands,
    },
}

#[derive(Subcommand)]
enum StoreCommands {
    /// Encode a rule file and save it to the store
    Put {
        /// Path to the structured rule JSON file
        rule: PathBuf,
        /// Path to the registry snapshot JSON file
        #[arg(long)]
        registry: PathBuf,
        /// Rule id; derived from the rule name when omitted
        #[arg(long)]
        id: Option<String>,
    },
    /// Load a stored rule and print its structured form
    Get {
        id: String,
        /// Path to the registry snapshot JSON file
        #[arg(long)]
        registry: PathBuf,
    },
    /// List stored rules
    List,
    /// Delete a stored rule
    Delete { id: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Encode {
            rule,
            registry,
            out,
        } => run_encode(&rule, &registry, out.as_deref()),
        Commands::Decode {
            envelope,
            registry,
            out,
        } => run_decode(&envelope, &registry, out.as_deref()),
        Commands::Roundtrip { rule, registry } => run_roundtrip(&rule, &registry, cli.output),
        Commands::Store { db, command } => {
            let store = FileRuleStore::open(db);
            match command {
                StoreCommands::Put { rule, registry, id } => {
                    run_store_put(&store, &rule, &registry, id, cli.output).await
                }
                StoreCommands::Get { id, registry } => {
                    run_store_get(&store, &id, &registry).await
                }
                StoreCommands::List => run_store_list(&store, cli.output).await,
                StoreCommands::Delete { id } => run_store_delete(&store, &id).await,
            }
        }
    };

    if let Err(message) = result {
        eprintln!("error: {}", message);
        process::exit(1);
    }
}

// ── Codec commands ──────────────────────────────────────────────────

fn run_encode(rule_path: &Path, registry_path: &Path, out: Option<&Path>) -> Result<(), String> {
    let rule: Rule = read_json(rule_path)?;
    let resolver = load_registry(registry_path)?;
    let envelope = encode_rule(&rule, &resolver);
    write_output(out, &to_pretty(&envelope)?)
}

fn run_decode(
    envelope_path: &Path,
    registry_path: &Path,
    out: Option<&Path>,
) -> Result<(), String> {
    let envelope: RuleEnvelope = read_json(envelope_path)?;
    let resolver = load_registry(registry_path)?;
    let rule = decode_rule(&envelope, &resolver).map_err(|e| e.to_string())?;
    write_output(out, &to_pretty(&rule)?)
}

fn run_roundtrip(
    rule_path: &Path,
    registry_path: &Path,
    output: OutputFormat,
) -> Result<(), String> {
    let rule: Rule = read_json(rule_path)?;
    let resolver = load_registry(registry_path)?;
    let envelope = encode_rule(&rule, &resolver);
    let decoded = decode_rule(&envelope, &resolver).map_err(|e| e.to_string())?;

    let drifted = drifted_sections(&rule, &decoded)?;
    match output {
        OutputFormat::Json => {
            let report = json!({
                "clean": drifted.is_empty(),
                "drifted": drifted,
            });
            println!("{}", report);
        }
        OutputFormat::Text => {
            if drifted.is_empty() {
                println!("round trip clean");
            } else {
                println!("round trip drift in: {}", drifted.join(", "));
            }
        }
    }
    if drifted.is_empty() {
        Ok(())
    } else {
        Err("round trip is lossy for this rule and registry".to_string())
    }
}

/// Compare rule sections through their JSON forms and name the ones
/// that changed.
fn drifted_sections(before: &Rule, after: &Rule) -> Result<Vec<String>, String> {
    let before = serde_json::to_value(before).map_err(|e| e.to_string())?;
    let after = serde_json::to_value(after).map_err(|e| e.to_string())?;
    let mut drifted = Vec::new();
    for section in ["name", "description", "conditions", "actions", "splits"] {
        if before.get(section) != after.get(section) {
            drifted.push(section.to_string());
        }
    }
    Ok(drifted)
}

// ── Store commands ──────────────────────────────────────────────────

async fn run_store_put(
    store: &FileRuleStore,
    rule_path: &Path,
    registry_path: &Path,
    id: Option<String>,
    output: OutputFormat,
) -> Result<(), String> {
    let rule: Rule = read_json(rule_path)?;
    let resolver = load_registry(registry_path)?;
    let envelope = encode_rule(&rule, &resolver);
    let id = id.unwrap_or_else(|| derive_id(&envelope.name));

    let record = RuleRecord::new(
        &id,
        &envelope.name,
        &envelope.description,
        envelope.rule_type,
        &envelope.rule_data,
    );

    // Put is an upsert: create, or replace when the id is taken.
    let (record, verb) = match store.create_rule(record.clone()).await {
        Ok(created) => (created, "created"),
        Err(StoreError::DuplicateRule { .. }) => {
            let updated = store.update_rule(record).await.map_err(|e| e.to_string())?;
            (updated, "updated")
        }
        Err(e) => return Err(e.to_string()),
    };

    match output {
        OutputFormat::Json => println!(
            "{}",
            json!({"id": record.id, "action": verb, "rule_type": record.rule_type})
        ),
        OutputFormat::Text => println!("{} rule '{}'", verb, record.id),
    }
    Ok(())
}

async fn run_store_get(
    store: &FileRuleStore,
    id: &str,
    registry_path: &Path,
) -> Result<(), String> {
    let record = store.get_rule(id).await.map_err(|e| e.to_string())?;
    let resolver = load_registry(registry_path)?;
    let envelope = RuleEnvelope {
        name: record.name,
        description: record.description,
        rule_type: record.rule_type,
        rule_data: record.rule_data,
    };
    let rule = decode_rule(&envelope, &resolver).map_err(|e| e.to_string())?;
    println!("{}", to_pretty(&rule)?);
    Ok(())
}

async fn run_store_list(store: &FileRuleStore, output: OutputFormat) -> Result<(), String> {
    let records = store.list_rules().await.map_err(|e| e.to_string())?;
    match output {
        OutputFormat::Json => {
            let rows: Vec<_> = records
                .iter()
                .map(|r| json!({"id": r.id, "name": r.name, "rule_type": r.rule_type}))
                .collect();
            println!("{}", serde_json::Value::Array(rows));
        }
        OutputFormat::Text => {
            for record in records {
                let kind = if record.rule_type == RULE_TYPE_SPLIT {
                    "split"
                } else {
                    "standard"
                };
                println!("{}  {}  {}", record.id, kind, record.name);
            }
        }
    }
    Ok(())
}

async fn run_store_delete(store: &FileRuleStore, id: &str) -> Result<(), String> {
    store.delete_rule(id).await.map_err(|e| e.to_string())?;
    println!("deleted rule '{}'", id);
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("invalid JSON in {}: {}", path.display(), e))
}

fn to_pretty<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| e.to_string())
}

fn write_output(out: Option<&Path>, text: &str) -> Result<(), String> {
    match out {
        Some(path) => std::fs::write(path, format!("{}\n", text))
            .map_err(|e| format!("cannot write {}: {}", path.display(), e)),
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}

/// Derive a store id from a rule name: lowercase, alphanumerics kept,
/// runs of everything else collapsed to single dashes.
fn derive_id(name: &str) -> String {
    let mut id = String::new();
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !id.is_empty() {
                id.push('-');
            }
            pending_dash = false;
            id.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if id.is_empty() {
        "rule".to_string()
    } else {
        id
    }
}
