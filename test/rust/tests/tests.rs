use std::path::PathBuf;

use ethers::{
    abi::{encode, Token},
    providers::Middleware,
    signers::{LocalWallet, Signer},
    types::{Address, Bytes, U256},
    utils::{get_contract_address, to_checksum},
};
use eyre::{eyre, Result};
use marketplace_addresses::Addresses;
use marketplace_deploy::{
    artifacts::Artifacts,
    chain::Chain,
    deploy::{deploy_marketplace, ArtifactDeployer},
};

fn fixtures(tree: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(tree)
}

// These tests spawn anvil, so they only run where anvil is installed.
#[ignore]
#[tokio::test]
async fn test_deploy_marketplace() -> Result<()> {
    // Set up the logger.
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    // Spin up anvil and deploy with its first dev account.
    let chain = Chain::connect(None).await?;
    let wallet = chain.deployer(None)?;
    let client = chain.client(wallet.clone()).await?;
    let deployer = ArtifactDeployer::new(client, Artifacts::new(fixtures("artifacts")));
    let mut out = Vec::new();
    let addresses = deploy_marketplace(&deployer, &mut out).await?;

    // The deployer's first two nonces went to the two deployments, in order.
    assert_eq!(
        addresses,
        Addresses {
            erc4907: get_contract_address(wallet.address(), 0u64),
            marketplace: get_contract_address(wallet.address(), 1u64),
        }
    );
    assert_eq!(
        String::from_utf8(out)?,
        format!(
            "4907 Contract Address: {}\nNFTMarketPlace Contract Address: {}\n",
            to_checksum(&addresses.erc4907, None),
            to_checksum(&addresses.marketplace, None),
        )
    );

    // Both contracts have code.
    let provider = chain.provider();
    for address in [addresses.erc4907, addresses.marketplace] {
        assert_eq!(
            provider.get_code(address, None).await?,
            Bytes::from(vec![0u8])
        );
    }

    // Anvil mines one block per transaction, so the marketplace deployment is
    // the only transaction in block 2. Its calldata ends with the encoded
    // constructor arguments.
    let block = provider
        .get_block_with_txs(2u64)
        .await?
        .ok_or(eyre!("block 2 wasn't mined"))?;
    assert_eq!(block.transactions.len(), 1);
    let tx = &block.transactions[0];
    assert_eq!(tx.to, None);
    let args = encode(&[
        Token::Address(addresses.erc4907),
        Token::Uint(U256::from(1)),
    ]);
    assert!(tx.input.ends_with(&args));

    Ok(())
}

#[ignore]
#[tokio::test]
async fn test_deploy_with_configured_key() -> Result<()> {
    let chain = Chain::connect(None).await?;

    // Anvil's second dev account.
    let wallet = chain.deployer(Some(
        "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
    ))?;
    assert_eq!(
        wallet.address(),
        "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".parse::<Address>()?
    );

    let client = chain.client(wallet.clone()).await?;
    let deployer =
        ArtifactDeployer::new(client, Artifacts::new(fixtures("artifacts"))).confirmations(1);
    let addresses = deploy_marketplace(&deployer, &mut Vec::<u8>::new()).await?;
    assert_eq!(addresses.erc4907, get_contract_address(wallet.address(), 0u64));

    Ok(())
}

#[ignore]
#[tokio::test]
async fn test_missing_marketplace_artifact_after_collection_deploys() -> Result<()> {
    let chain = Chain::connect(None).await?;
    let wallet: LocalWallet = chain.deployer(None)?;
    let client = chain.client(wallet.clone()).await?;
    let deployer = ArtifactDeployer::new(client, Artifacts::new(fixtures("collection-only")));
    let mut out = Vec::new();

    let err = deploy_marketplace(&deployer, &mut out).await.unwrap_err();
    assert!(err.to_string().contains("NFTMarketPlace"));

    // The collection was deployed and reported before the failure.
    let erc4907 = get_contract_address(wallet.address(), 0u64);
    assert_eq!(
        String::from_utf8(out)?,
        format!("4907 Contract Address: {}\n", to_checksum(&erc4907, None))
    );
    assert_eq!(
        chain.provider().get_transaction_count(wallet.address(), None).await?,
        U256::from(1)
    );

    Ok(())
}
