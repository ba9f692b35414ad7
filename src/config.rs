use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::{router::HIGHLIGHT_CHANNEL_PREFIX, util, ChannelState, Palette};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: String,
    /// Defaults to the host part of `server`
    pub network: Option<String>,
    pub nick: String,
    pub user: String,
    pub password: Option<String>,
    pub channels: Vec<String>,
    pub history_length: usize,
    pub prefix: String,
    pub palette: Palette,
}

impl Default for Config {
    fn default() -> Self {
        let (network, password, channels, palette) = <_>::default();
        Self {
            server: "irc.libera.chat:6667".into(),
            network,
            nick: "hilite".into(),
            user: "hilite".into(),
            password,
            channels,
            history_length: ChannelState::DEFAULT_HISTORY_LENGTH,
            prefix: HIGHLIGHT_CHANNEL_PREFIX.into(),
            palette,
        }
    }
}

impl Config {
    pub const CONFIG_VAR: &'static str = "HILITE_CONFIG";

    /// Reads the file named by `HILITE_CONFIG`, if any, then applies overrides
    /// from the environment
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = match std::env::var_os(Self::CONFIG_VAR) {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config '{}'", path.display()))?;
        serde_json::from_str(&data).with_context(|| format!("invalid config '{}'", path.display()))
    }

    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(server) = var("HILITE_SERVER") {
            self.server = server;
        }
        if let Some(network) = var("HILITE_NETWORK") {
            self.network.replace(network);
        }
        if let Some(nick) = var("HILITE_NICK") {
            self.nick = nick;
        }
        if let Some(user) = var("HILITE_USER") {
            self.user = user;
        }
        if let Some(password) = var("HILITE_PASSWORD") {
            self.password.replace(password);
        }
        if let Some(channels) = var("HILITE_CHANNELS") {
            self.channels = channels
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
                .collect();
        }
        if let Some(len) = var("HILITE_HISTORY_LENGTH") {
            self.history_length = len
                .trim()
                .parse()
                .with_context(|| format!("HILITE_HISTORY_LENGTH is not a number: '{len}'"))?;
        }
        if let Some(prefix) = var("HILITE_PREFIX") {
            self.prefix = prefix;
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.nick.trim().is_empty(), "nick cannot be empty");
        anyhow::ensure!(!self.server.trim().is_empty(), "server cannot be empty");
        anyhow::ensure!(self.history_length > 0, "history length must be at least 1");
        anyhow::ensure!(!self.prefix.is_empty(), "highlight window prefix cannot be empty");
        Ok(())
    }

    pub fn network(&self) -> &str {
        self.network
            .as_deref()
            .unwrap_or_else(|| util::host_of(&self.server))
    }
}
