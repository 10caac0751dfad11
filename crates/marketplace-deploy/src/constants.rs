/// The rentable NFT contract. Its constructor takes no arguments.
pub const ERC4907: &str = "ERC4907";

/// The marketplace contract. Its constructor takes the address of the
/// `ERC4907` deployment followed by `MARKETPLACE_CONSTRUCTOR_LITERAL`.
pub const NFT_MARKETPLACE: &str = "NFTMarketPlace";

/// The second constructor argument of `NFTMarketPlace`. Passed through as-is.
pub const MARKETPLACE_CONSTRUCTOR_LITERAL: u64 = 1;

// Output labels.
pub const ERC4907_LABEL: &str = "4907 Contract Address";
pub const NFT_MARKETPLACE_LABEL: &str = "NFTMarketPlace Contract Address";

/// The prefix of every environment variable the deploy binary reads.
pub const ENV_PREFIX: &str = "MARKETPLACE_";
