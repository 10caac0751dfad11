use std::{fmt, path::PathBuf};

use eyre::Result;
use serde::Deserialize;

use crate::constants::ENV_PREFIX;

fn default_artifacts_path() -> PathBuf {
    PathBuf::from("artifacts")
}

fn default_confirmations() -> usize {
    1
}

/// The deploy binary's configuration. Every field is read from a
/// `MARKETPLACE_`-prefixed environment variable, e.g. `ethereum_url` from
/// `MARKETPLACE_ETHEREUM_URL`.
#[derive(Clone, Deserialize)]
pub struct DeployConfig {
    /// The JSON-RPC endpoint. If unset, a local anvil node is spawned.
    pub ethereum_url: Option<String>,
    /// The deployer's private key. Only optional for a spawned anvil node.
    pub private_key: Option<String>,
    #[serde(default = "default_artifacts_path")]
    pub artifacts_path: PathBuf,
    /// Block confirmations to wait for after each deployment.
    #[serde(default = "default_confirmations")]
    pub confirmations: usize,
    /// Where to write the deployed addresses as JSON, if anywhere.
    pub addresses_path: Option<PathBuf>,
}

impl DeployConfig {
    pub fn from_env() -> Result<Self> {
        Ok(envy::prefixed(ENV_PREFIX).from_env::<Self>()?)
    }

    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter::<_, Self>(vars)?)
    }
}

// Neither the private key nor the RPC URL, which often embeds a provider API
// key, ends up in logs.
impl fmt::Debug for DeployConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployConfig")
            .field("ethereum_url", &self.ethereum_url.as_ref().map(|_| "<redacted>"))
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("artifacts_path", &self.artifacts_path)
            .field("confirmations", &self.confirmations)
            .field("addresses_path", &self.addresses_path)
            .finish()
    }
}
