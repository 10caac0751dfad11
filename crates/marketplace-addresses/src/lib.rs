use ethers::types::Address;
use serde::{Deserialize, Serialize};

/// The addresses of a marketplace deployment.
#[derive(Default, Debug, Eq, PartialEq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Addresses {
    /// The rentable NFT collection.
    pub erc4907: Address,
    /// The marketplace that lists NFTs from `erc4907`.
    pub marketplace: Address,
}
