use alloy_sol_types::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    event CommitBatch(uint256 indexed batch_index, bytes32 indexed batch_hash);

    #[derive(Debug, PartialEq, Eq)]
    event RevertBatch(uint256 indexed batch_index, bytes32 indexed batch_hash);

    #[derive(Debug, PartialEq, Eq)]
    event FinalizeBatch(
        uint256 indexed batch_index,
        bytes32 indexed batch_hash,
        bytes32 state_root,
        bytes32 withdraw_root
    );
}
