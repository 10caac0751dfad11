/// This script deploys the NFT rental marketplace:
///
/// - ERC4907
/// - NFTMarketPlace(erc4907, 1)
///
/// Both addresses are printed to stdout once their deployments confirm. The
/// script is configured through `MARKETPLACE_*` environment variables (a
/// `.env` file is loaded if present); without `MARKETPLACE_ETHEREUM_URL` it
/// deploys to a freshly spawned anvil node.
use std::{
    fs::{create_dir_all, File},
    io,
};

use dotenvy::dotenv;
use ethers::providers::Middleware;
use eyre::Result;
use marketplace_deploy::{
    artifacts::Artifacts,
    chain::Chain,
    config::DeployConfig,
    deploy::{deploy_marketplace, ArtifactDeployer},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Logs go to stderr so that stdout only carries the addresses.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = DeployConfig::from_env()?;
    info!(?config, "loaded deploy config");

    // Connect to the chain and get a client for the deployer.
    let chain = Chain::connect(config.ethereum_url.clone()).await?;
    let deployer = chain.deployer(config.private_key.as_deref())?;
    let client = chain.client(deployer).await?;
    info!(deployer = ?client.inner().address(), "deploying marketplace");

    // Deploy the contracts.
    let deployer = ArtifactDeployer::new(client, Artifacts::new(&config.artifacts_path))
        .confirmations(config.confirmations);
    let addresses = deploy_marketplace(&deployer, &mut io::stdout()).await?;

    // Write the addresses to a file if requested.
    if let Some(path) = config.addresses_path {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir_all(parent)?;
        }
        let f = File::create(&path)?;
        serde_json::to_writer_pretty(f, &addresses)?;
        info!(path = %path.display(), "wrote deployed addresses");
    }

    Ok(())
}
