use alloy_primitives::{address, Address};

/// The chain id of the Ethereum mainnet.
pub const MAINNET_L1_CHAIN_ID: u64 = 1;

/// The address of the Scroll Chain contract on mainnet.
pub const MAINNET_L1_SCROLL_CHAIN_ADDRESS: Address =
    address!("0xa13BAF47339d63B743e7Da8741db5456DAc1E556");

/// The L1 block at which the Scroll Chain contract was deployed on mainnet.
pub const MAINNET_L1_DEPLOYMENT_BLOCK: u64 = 18_306_000;

/// The chain id of the Sepolia testnet.
pub const SEPOLIA_L1_CHAIN_ID: u64 = 11_155_111;

/// The address of the Scroll Chain contract on Sepolia.
pub const SEPOLIA_L1_SCROLL_CHAIN_ADDRESS: Address =
    address!("0x2D567EcE699Eabe5afCd141eDB7A4f2D0D6ce8a0");

/// The L1 block at which the Scroll Chain contract was deployed on Sepolia.
pub const SEPOLIA_L1_DEPLOYMENT_BLOCK: u64 = 4_038_000;
