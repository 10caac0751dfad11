/// This module deploys the marketplace: the `ERC4907` collection first, then
/// `NFTMarketPlace` pointed at it.
use std::{io::Write, sync::Arc};

use async_trait::async_trait;
use ethers::{
    abi::Token,
    contract::ContractFactory,
    providers::Middleware,
    types::{Address, U256},
    utils::to_checksum,
};
use eyre::{eyre, Result};
use marketplace_addresses::Addresses;
use tracing::{debug, info};

use crate::{
    artifacts::Artifacts,
    constants::{
        ERC4907, ERC4907_LABEL, MARKETPLACE_CONSTRUCTOR_LITERAL, NFT_MARKETPLACE,
        NFT_MARKETPLACE_LABEL,
    },
};

/// Something that can turn a contract name and constructor arguments into a
/// confirmed on-chain deployment.
#[async_trait]
pub trait ContractDeployer: Send + Sync {
    /// Deploys `contract` and resolves once the deployment is confirmed.
    async fn deploy(&self, contract: &str, args: Vec<Token>) -> Result<Address>;
}

/// Deploys contracts from compiled artifacts using an ethers client.
#[derive(Debug)]
pub struct ArtifactDeployer<M> {
    client: Arc<M>,
    artifacts: Artifacts,
    confirmations: usize,
}

impl<M: Middleware + 'static> ArtifactDeployer<M> {
    pub fn new(client: Arc<M>, artifacts: Artifacts) -> Self {
        Self {
            client,
            artifacts,
            confirmations: 1,
        }
    }

    /// Sets the number of blocks to wait for after each deployment.
    pub fn confirmations(mut self, confirmations: usize) -> Self {
        self.confirmations = confirmations;
        self
    }
}

#[async_trait]
impl<M: Middleware + 'static> ContractDeployer for ArtifactDeployer<M> {
    async fn deploy(&self, contract: &str, args: Vec<Token>) -> Result<Address> {
        let artifact = self.artifacts.load(contract)?;
        if !artifact.is_deployable() {
            return Err(eyre!(
                "{} is abstract or an interface and can't be deployed",
                artifact.name
            ));
        }

        let factory = ContractFactory::new(artifact.abi, artifact.bytecode, self.client.clone());
        debug!(
            contract = %artifact.name,
            args = args.len(),
            confirmations = self.confirmations,
            "submitting deployment"
        );
        let (instance, receipt) = factory
            .deploy_tokens(args)?
            .confirmations(self.confirmations)
            .send_with_receipt()
            .await?;
        info!(
            contract = %artifact.name,
            address = ?instance.address(),
            tx_hash = ?receipt.transaction_hash,
            gas_used = ?receipt.gas_used,
            "deployment confirmed"
        );

        Ok(instance.address())
    }
}

/// Deploys `ERC4907`, then `NFTMarketPlace` with the collection's address,
/// writing one `<label>: <address>` line to `out` after each confirmation.
/// The first error aborts the sequence.
pub async fn deploy_marketplace<D, W>(deployer: &D, out: &mut W) -> Result<Addresses>
where
    D: ContractDeployer + ?Sized,
    W: Write,
{
    let erc4907 = deployer.deploy(ERC4907, vec![]).await?;
    writeln!(out, "{}: {}", ERC4907_LABEL, to_checksum(&erc4907, None))?;

    let marketplace = deployer
        .deploy(
            NFT_MARKETPLACE,
            vec![
                Token::Address(erc4907),
                Token::Uint(U256::from(MARKETPLACE_CONSTRUCTOR_LITERAL)),
            ],
        )
        .await?;
    writeln!(
        out,
        "{}: {}",
        NFT_MARKETPLACE_LABEL,
        to_checksum(&marketplace, None)
    )?;

    Ok(Addresses {
        erc4907,
        marketplace,
    })
}
