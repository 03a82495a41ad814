//! Config command implementation.
//!
//! View and manage configuration settings.
//! Config file is located at ~/.config/gitql/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;

use tokio::process::Command;

use directories::BaseDirs;
use gitql_engine::cache::DEFAULT_CAPACITY;
use gitql_engine::{EngineConfig, DEFAULT_LIMIT, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Largest page GitHub will serve.
pub const MAX_PAGE_SIZE: usize = 100;

/// Minimum token length to apply masking (show first and last N characters).
const TOKEN_MASK_MIN_LENGTH: usize = 8;

/// Number of characters to show at start/end of a masked token.
const TOKEN_MASK_VISIBLE_CHARS: usize = 4;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "GITQL_CONFIG";

/// Default config file contents.
const DEFAULT_CONFIG: &str = r#"# gitql configuration

# Config schema version (do not modify)
version = 1

# GitHub token (can also use GITHUB_TOKEN env var)
# token = "ghp_..."

# Token storage method: "config", "keyring", or "env"
# token_storage = "config"

[query]
# default_limit = 1         # rows returned when a query has no LIMIT
# page_size = 100           # records requested per fetch (1-100)

[cache]
# capacity = 128            # resolved owners and repositories to remember

[output]
# color = true
"#;

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// GitHub token (optional, can use env var instead).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Token storage method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_storage: Option<String>,

    /// Query defaults.
    #[serde(default)]
    pub query: QueryConfig,

    /// Resolution cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            token: None,
            token_storage: None,
            query: QueryConfig::default(),
            cache: CacheConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Engine defaults with config overrides applied.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            default_limit: self.query.default_limit.unwrap_or(DEFAULT_LIMIT),
            page_size: self.query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    pub fn cache_capacity(&self) -> usize {
        self.cache.capacity.unwrap_or(DEFAULT_CAPACITY)
    }

    /// True when the token should be read from the OS keyring.
    pub fn uses_keyring(&self) -> bool {
        self.token_storage.as_deref() == Some("keyring")
    }
}

/// Query configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Rows returned when a query has no LIMIT.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_limit: Option<usize>,

    /// Records requested per fetch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
}

/// Cache configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Resolution cache capacity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
}

/// Output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Gets the config directory path.
/// Uses XDG-style paths: ~/.config/gitql/ on all platforms.
fn get_config_dir() -> Result<PathBuf> {
    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("gitql"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("gitql"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Gets the config file path.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    let config_dir = get_config_dir()?;
    Ok(config_dir.join("config.toml"))
}

/// Loads the configuration from disk.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    migrate_config(config)
}

/// Migrates config to current version if needed.
fn migrate_config(mut config: Config) -> Result<Config> {
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Saves the configuration to disk.
pub fn save_config(config: &Config) -> Result<()> {
    let path = get_config_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| CommandError::Config(format!("Failed to serialize config: {}", e)))?;

    fs::write(&path, content)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    Ok(())
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;

    if ctx.json_output {
        let mut shown = serde_json::to_value(&config)?;
        if let Some(token) = config.token.as_deref() {
            shown["token"] = serde_json::Value::String(mask_token(token));
        }
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": shown,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        let engine = config.engine_config();
        println!("Settings:");
        if let Some(ref storage) = config.token_storage {
            println!("  token_storage: {}", storage);
        }
        if let Some(ref token) = config.token {
            println!("  token: {}", mask_token(token));
        }

        println!("\n[query]");
        println!("  default_limit: {}", engine.default_limit);
        println!("  page_size: {}", engine.page_size);

        println!("\n[cache]");
        println!("  capacity: {}", config.cache_capacity());

        println!("\n[output]");
        println!("  color: {}", config.output.color.unwrap_or(true));

        if !path.exists() {
            println!("\n(No config file exists. Run 'gitql config edit' to create one.)");
        }
    }

    Ok(())
}

/// Executes the config edit command.
pub async fn execute_edit(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    if !path.exists() {
        fs::write(&path, DEFAULT_CONFIG)
            .map_err(|e| CommandError::Config(format!("Failed to create config file: {}", e)))?;

        if !ctx.quiet && !ctx.json_output {
            eprintln!("Created default config at: {}", path.display());
        }
    }

    let editor = env::var("EDITOR")
        .or_else(|_| env::var("VISUAL"))
        .unwrap_or_else(|_| "vi".to_string());

    ctx.debug(format!("Opening {} with {}", path.display(), editor));

    let status = Command::new(&editor)
        .arg(&path)
        .status()
        .await
        .map_err(|e| CommandError::Config(format!("Failed to open editor '{}': {}", editor, e)))?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": if status.success() { "success" } else { "error" },
            "editor": editor,
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        if status.success() {
            // Surface syntax errors now rather than on the next query.
            load_config()?;
            println!("Config saved.");
        } else {
            eprintln!("Editor exited with error");
        }
    }

    Ok(())
}

/// Options for the config set command.
pub struct ConfigSetOptions {
    /// Configuration key.
    pub key: String,
    /// Configuration value.
    pub value: String,
}

/// Applies a single `key = value` assignment to `config`.
fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let (section, field) = match key.split_once('.') {
        Some((section, field)) => (Some(section), field),
        None => (None, key),
    };

    match (section, field) {
        (None, "token") => {
            config.token = Some(value.to_string());
        }
        (None, "token_storage") => {
            let valid = ["config", "keyring", "env"];
            if !valid.contains(&value) {
                return Err(CommandError::Config(format!(
                    "Invalid token_storage value '{}'. Valid values: {}",
                    value,
                    valid.join(", ")
                )));
            }
            config.token_storage = Some(value.to_string());
        }
        (Some("query"), "default_limit") => {
            config.query.default_limit = Some(parse_count(key, value, usize::MAX)?);
        }
        (Some("query"), "page_size") => {
            config.query.page_size = Some(parse_count(key, value, MAX_PAGE_SIZE)?);
        }
        (Some("cache"), "capacity") => {
            config.cache.capacity = Some(parse_count(key, value, usize::MAX)?);
        }
        (Some("output"), "color") => {
            config.output.color = Some(parse_bool(value)?);
        }
        _ => {
            return Err(CommandError::Config(format!(
                "Unknown config key '{}'. Valid keys: token, token_storage, query.default_limit, query.page_size, cache.capacity, output.color",
                key
            )));
        }
    }

    Ok(())
}

/// Executes the config set command.
pub fn execute_set(ctx: &CommandContext, opts: &ConfigSetOptions) -> Result<()> {
    let mut config = load_config()?;
    let path = get_config_path()?;

    apply_setting(&mut config, &opts.key, &opts.value)?;
    save_config(&config)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "key": opts.key,
            "value": opts.value,
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Set {} = {}", opts.key, opts.value);
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Masks a token for display, showing only the first and last N characters.
///
/// Uses character-based (not byte-based) indexing to safely handle
/// multi-byte UTF-8 characters.
pub fn mask_token(token: &str) -> String {
    let char_count = token.chars().count();
    if char_count > TOKEN_MASK_MIN_LENGTH {
        let prefix: String = token.chars().take(TOKEN_MASK_VISIBLE_CHARS).collect();
        let suffix: String = token
            .chars()
            .skip(char_count - TOKEN_MASK_VISIBLE_CHARS)
            .collect();
        format!("{}...{}", prefix, suffix)
    } else {
        "****".to_string()
    }
}

/// Parses a boolean value from string.
fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(CommandError::Config(format!(
            "Invalid boolean value '{}'. Use true/false, yes/no, 1/0, or on/off",
            s
        ))),
    }
}

/// Parses a positive count no larger than `max`.
fn parse_count(key: &str, s: &str, max: usize) -> Result<usize> {
    match s.parse::<usize>() {
        Ok(n) if (1..=max).contains(&n) => Ok(n),
        _ if max == usize::MAX => Err(CommandError::Config(format!(
            "Invalid {} value '{}'. Expected a positive integer",
            key, s
        ))),
        _ => Err(CommandError::Config(format!(
            "Invalid {} value '{}'. Expected an integer from 1 to {}",
            key, s, max
        ))),
    }
}
