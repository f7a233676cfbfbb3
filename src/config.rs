//! Deployment configuration.
//!
//! Two knobs only: the session cool-down and the documentation links used
//! in explanation text, overridable per guild (communities running a
//! different framework fork want their own docs). No other persisted
//! state.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_cooldown_secs() -> u64 {
    300
}

/// Documentation links referenced from explanation text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocLinks {
    pub on_message_dispatch: String,
    pub context: String,
    pub interaction: String,
}

impl Default for DocLinks {
    fn default() -> Self {
        Self {
            on_message_dispatch: "https://nextcord.readthedocs.io/en/latest/faq.html\
                #why-does-on-message-make-my-commands-stop-working"
                .to_string(),
            context: "https://nextcord.readthedocs.io/en/latest/ext/commands/api.html\
                #nextcord.ext.commands.Context"
                .to_string(),
            interaction: "https://nextcord.readthedocs.io/en/latest/api.html\
                #nextcord.Interaction"
                .to_string(),
        }
    }
}

impl DocLinks {
    /// Preset for communities on the disnake fork.
    pub fn disnake() -> Self {
        Self {
            on_message_dispatch: "https://docs.disnake.dev/en/latest/faq.html\
                #why-does-on-message-make-my-commands-stop-working"
                .to_string(),
            context: "https://docs.disnake.dev/en/latest/ext/commands/api.html\
                #disnake.ext.commands.Context"
                .to_string(),
            interaction: "https://docs.disnake.dev/en/latest/api.html#disnake.Interaction"
                .to_string(),
        }
    }
}

/// Per-deployment configuration, loadable from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelpConfig {
    /// Cool-down window in seconds before the same author/channel pair is
    /// helped again.
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
    /// Links used when a guild has no override.
    #[serde(default)]
    pub default_links: DocLinks,
    /// Per-guild link overrides, keyed by guild id.
    #[serde(default)]
    pub guilds: HashMap<u64, DocLinks>,
}

impl Default for HelpConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: default_cooldown_secs(),
            default_links: DocLinks::default(),
            guilds: HashMap::new(),
        }
    }
}

impl HelpConfig {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: HelpConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    /// Links for a guild, falling back to the defaults.
    pub fn links_for(&self, guild_id: Option<u64>) -> &DocLinks {
        guild_id
            .and_then(|id| self.guilds.get(&id))
            .unwrap_or(&self.default_links)
    }
}
