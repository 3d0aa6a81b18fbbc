//! Configuration resolution for stemd
//!
//! Every component receives an explicit [`Config`]; there are no module-level
//! path globals. Resolution priority for each setting:
//!
//! 1. Command-line argument (highest)
//! 2. Environment variable
//! 3. TOML config file (`~/.config/stemd/config.toml` unless overridden)
//! 4. Compiled default

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, warn};

/// Default listen address (port matches the original service)
const DEFAULT_BIND: &str = "0.0.0.0:5001";

/// Terminal sessions older than this are purged by the retention sweeper
const DEFAULT_RETENTION_HOURS: u64 = 24;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "stemd", about = "Stem extraction service", version)]
pub struct Cli {
    /// Data root for downloads, stems, status and compressed output
    #[arg(long, env = "STEMD_DATA_ROOT")]
    pub data_root: Option<PathBuf>,

    /// Listen address, e.g. 0.0.0.0:5001
    #[arg(long, env = "STEMD_BIND")]
    pub bind: Option<String>,

    /// Path to TOML config file
    #[arg(long, env = "STEMD_CONFIG")]
    pub config_file: Option<PathBuf>,
}

/// TOML config file contents (all fields optional)
#[derive(Debug, Default, Deserialize)]
pub struct TomlConfig {
    pub data_root: Option<PathBuf>,
    pub bind: Option<String>,
    pub retention_hours: Option<u64>,
    #[serde(default)]
    pub tools: TomlTools,
}

/// `[tools]` table of the TOML config file
#[derive(Debug, Default, Deserialize)]
pub struct TomlTools {
    pub yt_dlp: Option<String>,
    pub demucs: Option<String>,
    pub demucs_model: Option<String>,
    pub ffmpeg: Option<String>,
    pub mp3_bitrate: Option<String>,
}

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root folder holding the four per-session data directories
    pub data_root: PathBuf,
    /// HTTP listen address
    pub bind: SocketAddr,
    /// Retention window for terminal sessions, in hours
    pub retention_hours: u64,
    /// External tool invocation settings
    pub tools: ToolsConfig,
}

/// External tool binaries and parameters
#[derive(Debug, Clone)]
pub struct ToolsConfig {
    /// yt-dlp binary (metadata probe + audio extraction)
    pub yt_dlp: String,
    /// demucs binary (source separation)
    pub demucs: String,
    /// demucs model name
    pub demucs_model: String,
    /// ffmpeg binary (WAV → MP3 transcoding)
    pub ffmpeg: String,
    /// MP3 bitrate passed to ffmpeg, e.g. "320k"
    pub mp3_bitrate: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            yt_dlp: "yt-dlp".to_string(),
            demucs: "demucs".to_string(),
            demucs_model: "mdx_extra".to_string(),
            ffmpeg: "ffmpeg".to_string(),
            mp3_bitrate: "320k".to_string(),
        }
    }
}

impl Config {
    /// Resolve configuration from CLI arguments, environment (via clap's env
    /// support), an optional TOML file, and compiled defaults.
    pub fn resolve(cli: Cli) -> Result<Config> {
        let toml_config = load_toml_config(cli.config_file.as_deref());

        let data_root = cli
            .data_root
            .or(toml_config.data_root)
            .unwrap_or_else(default_data_root);

        let bind_str = cli
            .bind
            .or(toml_config.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind_str
            .parse()
            .with_context(|| format!("Invalid bind address: {}", bind_str))?;

        let retention_hours = toml_config
            .retention_hours
            .unwrap_or(DEFAULT_RETENTION_HOURS);

        let defaults = ToolsConfig::default();
        let t = toml_config.tools;
        let tools = ToolsConfig {
            yt_dlp: t.yt_dlp.unwrap_or(defaults.yt_dlp),
            demucs: t.demucs.unwrap_or(defaults.demucs),
            demucs_model: t.demucs_model.unwrap_or(defaults.demucs_model),
            ffmpeg: t.ffmpeg.unwrap_or(defaults.ffmpeg),
            mp3_bitrate: t.mp3_bitrate.unwrap_or(defaults.mp3_bitrate),
        };

        Ok(Config {
            data_root,
            bind,
            retention_hours,
            tools,
        })
    }
}

/// Load the TOML config file if one exists
///
/// An explicit `--config-file` that cannot be read or parsed is logged and
/// ignored rather than aborting startup; the implicit default path is only
/// consulted when present.
fn load_toml_config(explicit: Option<&std::path::Path>) -> TomlConfig {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => return TomlConfig::default(),
        },
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str::<TomlConfig>(&content) {
            Ok(config) => {
                info!("Loaded config file: {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring unparseable config file {}: {}", path.display(), e);
                TomlConfig::default()
            }
        },
        Err(e) => {
            warn!("Ignoring unreadable config file {}: {}", path.display(), e);
            TomlConfig::default()
        }
    }
}

/// Default config file path: `~/.config/stemd/config.toml` (platform dependent)
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("stemd").join("config.toml"))
}

/// OS-dependent default data root
fn default_data_root() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("stemd"))
        .unwrap_or_else(|| PathBuf::from("./stemd_data"))
}
