use alloy_primitives::U256;

/// Outcome of one full batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub wallets: Vec<WalletReport>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletReport {
    pub address: String,
    pub outcome: WalletOutcome,
    /// Native balance in wei, when the query ran.
    pub native_balance: Option<U256>,
    pub tokens: Vec<TokenReport>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletOutcome {
    /// All wallet-level steps ran; individual tokens may still have failed.
    Processed,
    /// The password prompt was dismissed and the wallet was not touched.
    Skipped,
    /// The wallet failed before its tokens could be processed.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenReport {
    pub contract: String,
    /// On-chain symbol, or the config hint / contract address when the
    /// symbol query never succeeded.
    pub symbol: String,
    /// Raw balance in base units; zero when the query never succeeded.
    pub balance: U256,
    pub action: TokenAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenAction {
    /// Balance reported; no transfer was offered (zero balance).
    BalanceOnly,
    /// Transfer offered and declined.
    Declined,
    /// Transfer broadcast and accepted by the node.
    Sent { tx_hash: String, nonce: u64 },
    /// This token failed; the rest of the run continued.
    Failed(String),
}

impl RunReport {
    pub fn failed_wallets(&self) -> usize {
        self.wallets
            .iter()
            .filter(|w| matches!(w.outcome, WalletOutcome::Failed(_)))
            .count()
    }

    pub fn failed_tokens(&self) -> usize {
        self.tokens()
            .filter(|t| matches!(t.action, TokenAction::Failed(_)))
            .count()
    }

    pub fn transfers_sent(&self) -> usize {
        self.tokens()
            .filter(|t| matches!(t.action, TokenAction::Sent { .. }))
            .count()
    }

    fn tokens(&self) -> impl Iterator<Item = &TokenReport> {
        self.wallets.iter().flat_map(|w| w.tokens.iter())
    }
}
