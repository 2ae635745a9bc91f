// amoebax_cli/src/config.rs
#![forbid(unsafe_code)]

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use amoebax_engine::GridConfig;

/**
 * Optional TOML file passed with `--config`.
 *
 * Example:
 *   [grid]
 *   falling_time_ms = 120
 *
 *   [players]
 *   left = "advanced"
 *   right = "anticipatory-2"
 *
 * Every key is optional; command-line flags win over the file.
 */
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub grid: GridConfig,
    pub players: PlayersConfig,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayersConfig {
    pub left: Option<String>,
    pub right: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let cfg: FileConfig = toml::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        cfg.grid
            .validate()
            .with_context(|| format!("invalid [grid] section in {}", path.display()))?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_grid_section_keeps_defaults() {
        let cfg: FileConfig = toml::from_str(
            r#"
            [grid]
            falling_time_ms = 120

            [players]
            left = "advanced"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.grid.falling_time_ms, 120);
        assert_eq!(
            cfg.grid.dying_time_ms,
            GridConfig::default().dying_time_ms
        );
        assert_eq!(cfg.players.left.as_deref(), Some("advanced"));
        assert!(cfg.players.right.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<FileConfig>("[grid]\nfalling = 3\n").is_err());
    }
}
