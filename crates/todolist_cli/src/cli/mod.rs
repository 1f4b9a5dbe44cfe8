use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use todolist_core::config::ConfigOverrides;
use todolist_core::model::Filter;

#[derive(Parser, Debug)]
#[command(name = "todolist", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Without TEXT the draft set by `draft` is added.
    ///
    /// Example: todolist add "Buy milk"
    Add { text: Vec<String> },
    /// Type into the new-task input without adding it yet
    ///
    /// Example: draft Buy milk
    Draft { text: Vec<String> },
    /// Mark a task as completed, or reopen a completed one
    ///
    /// Example: todolist toggle 1734652800000
    Toggle { id: u64 },
    /// Delete a task
    ///
    /// Example: todolist delete 1734652800000
    Delete { id: u64 },
    /// Edit a task's text
    ///
    /// Without TEXT the task is opened for editing in the current session.
    ///
    /// Example: todolist edit 1734652800000 "Buy organic milk"
    Edit { id: u64, text: Option<String> },
    /// Replace the text of the task being edited
    ///
    /// Example: change Buy oat milk
    Change { text: Vec<String> },
    /// Save the task being edited
    Save,
    /// Drop the edit in progress without saving
    Cancel,
    /// Show only the tasks matching a filter
    ///
    /// Example: filter pending
    Filter {
        #[arg(value_enum)]
        filter: FilterArg,
    },
    /// List tasks
    ///
    /// Example: todolist list
    /// Example: todolist list --filter completed
    List {
        #[arg(long, value_enum)]
        filter: Option<FilterArg>,
    },
    /// Switch between the light and dark theme
    ///
    /// Example: todolist theme
    /// Example: todolist theme --show
    Theme {
        #[arg(long)]
        show: bool,
    },
    /// Write every task to tasks.json
    ///
    /// Example: todolist export --output ~/backups
    Export {
        /// Directory to write tasks.json into
        #[arg(long, value_name = "DIR")]
        output: Option<PathBuf>,
    },
    /// Replace all tasks with the contents of a JSON file
    ///
    /// Example: todolist import ~/backups/tasks.json
    Import { file: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    All,
    Completed,
    Pending,
}

impl From<FilterArg> for Filter {
    fn from(value: FilterArg) -> Self {
        match value {
            FilterArg::All => Filter::All,
            FilterArg::Completed => Filter::Completed,
            FilterArg::Pending => Filter::Pending,
        }
    }
}

/// Flag name used to identify config override arguments by the runtime.
pub const CONFIG_OVERRIDE_FLAG: &str = "--config-override";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    StorePath,
    ExportDir,
    Color,
    Alias(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let (field, remainder) = key_raw
        .split_once('.')
        .map(|(field, rest)| (field.trim(), Some(rest.trim())))
        .unwrap_or((key_raw.trim(), None));

    let canonical_field =
        canonicalize_flag_name(field).ok_or_else(|| "override key cannot be empty".to_string())?;

    let scalar = |target: ConfigOverrideTarget| {
        if remainder.is_some() {
            Err(format!("{canonical_field} override cannot have subfields"))
        } else {
            Ok(ParsedConfigOverride {
                target,
                value: value.clone(),
            })
        }
    };

    match canonical_field.as_str() {
        "store_path" | "store" => scalar(ConfigOverrideTarget::StorePath),
        "export_dir" | "export" => scalar(ConfigOverrideTarget::ExportDir),
        "color" | "colour" => scalar(ConfigOverrideTarget::Color),
        "aliases" | "alias" => {
            let alias_name = remainder
                .filter(|segment| !segment.is_empty())
                .ok_or_else(|| "aliases override requires an alias name".to_string())?;
            Ok(ParsedConfigOverride {
                target: ConfigOverrideTarget::Alias(alias_name.to_string()),
                value: value.clone(),
            })
        }
        other => Err(format!("unknown config field '{other}'")),
    }
}

/// Folds every `--config-override` value into one set of overrides; later
/// values win.
pub fn collect_config_overrides(raw: &[String]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry)?;
        match parsed.target {
            ConfigOverrideTarget::StorePath => {
                overrides.store_path = Some(PathBuf::from(parsed.value));
            }
            ConfigOverrideTarget::ExportDir => {
                overrides.export_dir = Some(PathBuf::from(parsed.value));
            }
            ConfigOverrideTarget::Color => {
                overrides.color = Some(parse_switch(&parsed.value)?);
            }
            ConfigOverrideTarget::Alias(name) => {
                overrides.aliases.insert(name, parsed.value);
            }
        }
    }
    Ok(overrides)
}

fn parse_switch(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => Err(format!("color override expects true or false, got '{other}'")),
    }
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
