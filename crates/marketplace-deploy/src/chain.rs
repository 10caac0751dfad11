use std::{process::Command, sync::Arc, time::Duration};

use ethers::{
    core::utils::Anvil,
    middleware::{NonceManagerMiddleware, SignerMiddleware},
    providers::{
        Http, HttpClientError, HttpRateLimitRetryPolicy, Middleware, Provider, RetryClient,
        RetryClientBuilder, RetryPolicy,
    },
    signers::{LocalWallet, Signer},
    utils::AnvilInstance,
};
use eyre::{eyre, Result};
use tracing::{debug, info};

use crate::constants::ENV_PREFIX;

/// A signing client that retries rate limited and timed out RPC requests and
/// tracks the deployer's nonce locally.
pub type ChainClient<S> =
    NonceManagerMiddleware<SignerMiddleware<Provider<RetryClient<Http>>, S>>;

/// Only transport-level failures are retried. A rejected transaction is
/// reported as is, since resending the same signed payload can't change the
/// outcome.
fn retry_policy() -> Box<dyn RetryPolicy<HttpClientError>> {
    Box::<HttpRateLimitRetryPolicy>::default()
}

/// Spawns a local anvil node. `Anvil::spawn` panics when the binary is
/// missing or doesn't come up in time, so the binary is looked up first and
/// the spawn runs on a blocking task where a panic becomes an error.
async fn spawn_anvil() -> Result<AnvilInstance> {
    Command::new("anvil").arg("--version").output().map_err(|err| {
        eyre!(
            "anvil not found ({}); set {}ETHEREUM_URL to deploy to a running node",
            err,
            ENV_PREFIX
        )
    })?;
    tokio::task::spawn_blocking(|| Anvil::new().spawn())
        .await
        .map_err(|err| eyre!("anvil failed to start: {}", err))
}

/// A connection to the chain the marketplace is deployed to. Without an RPC
/// URL a throwaway anvil node is spawned, which lives as long as this value.
pub struct Chain {
    provider: Provider<Http>,
    client_version: String,
    maybe_anvil: Option<AnvilInstance>,
}

impl Chain {
    pub async fn connect(maybe_rpc_url: Option<String>) -> Result<Self> {
        let (provider, maybe_anvil) = match maybe_rpc_url {
            Some(rpc_url) => (Provider::<Http>::try_from(rpc_url.as_str())?, None),
            None => {
                let anvil = spawn_anvil().await?;
                info!(endpoint = %anvil.endpoint(), "spawned a local anvil node");
                (Provider::<Http>::try_from(anvil.endpoint())?, Some(anvil))
            }
        };
        let provider = provider.interval(Duration::from_millis(100));
        let client_version = provider.client_version().await?;
        debug!(client_version = %client_version, "connected to chain");

        Ok(Self {
            provider,
            client_version,
            maybe_anvil,
        })
    }

    /// A provider that can access the chain.
    pub fn provider(&self) -> Provider<Http> {
        self.provider.clone()
    }

    /// The node's `web3_clientVersion`.
    pub fn client_version(&self) -> &str {
        &self.client_version
    }

    /// Returns true if this chain is an anvil node spawned by `connect`.
    pub fn is_local(&self) -> bool {
        self.maybe_anvil.is_some()
    }

    /// Resolves the wallet that signs the deployments. A configured key
    /// always wins. A spawned anvil node falls back to its first dev account;
    /// any other chain requires a key.
    pub fn deployer(&self, maybe_private_key: Option<&str>) -> Result<LocalWallet> {
        if let Some(private_key) = maybe_private_key {
            return Ok(private_key.trim().parse::<LocalWallet>()?);
        }
        let anvil = self.maybe_anvil.as_ref().ok_or(eyre!(
            "a deployer private key is required to deploy to a remote chain"
        ))?;
        let key = anvil
            .keys()
            .first()
            .ok_or(eyre!("anvil didn't expose any dev accounts"))?;
        Ok(LocalWallet::from(key.clone()))
    }

    /// A client that signs with the given wallet. The signer asks the node
    /// for its chain id so that deployments are replay protected.
    pub async fn client<S: Signer + 'static>(&self, signer: S) -> Result<Arc<ChainClient<S>>> {
        let transport = RetryClientBuilder::default()
            .rate_limit_retries(10)
            .timeout_retries(3)
            .initial_backoff(Duration::from_millis(100))
            .build(self.provider.as_ref().clone(), retry_policy());
        let provider = Provider::new(transport).interval(Duration::from_millis(100));
        let client = SignerMiddleware::new_with_provider_chain(provider, signer).await?;
        let address = client.address();
        Ok(Arc::new(NonceManagerMiddleware::new(client, address)))
    }
}
