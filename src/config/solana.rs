pub const PROVIDERS: [&str; 2] = [
    "https://api.mainnet-beta.solana.com",
    "https://solana-rpc.publicnode.com",
];

pub struct RPCMethod {
    pub get_epoch_info: &'static str,
    pub get_recent_performance_samples: &'static str,
    pub get_vote_accounts: &'static str,
}

pub const RPC_METHODS: RPCMethod = RPCMethod {
    get_epoch_info: "getEpochInfo",
    get_recent_performance_samples: "getRecentPerformanceSamples",
    get_vote_accounts: "getVoteAccounts",
};
