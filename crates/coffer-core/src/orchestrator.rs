//! Sequential wallet processing: decrypt, report balances, and on
//! confirmation build, sign, and broadcast transfers.
//!
//! Failures are isolated per wallet and per token; nothing in here aborts
//! the batch. The decrypted key for a wallet lives only while that wallet
//! is being processed and is zeroed when it goes out of scope.

use alloy_primitives::U256;
use secrecy::SecretString;

use coffer_evm::client::ChainClient;
use coffer_evm::{address, units};
use coffer_vault::{encryption, VaultError};

use crate::error::CoreError;
use crate::prompt::Prompt;
use crate::records::{TokenRef, Wallet};
use crate::report::{RunReport, TokenAction, TokenReport, WalletOutcome, WalletReport};
use crate::token::{self, TxParams};

/// Drives the decrypt → balances → confirm → transfer sequence over a
/// batch of wallets.
pub struct TransferOrchestrator<'a> {
    client: &'a dyn ChainClient,
    params: TxParams,
    native_symbol: String,
}

impl<'a> TransferOrchestrator<'a> {
    pub fn new(client: &'a dyn ChainClient, params: TxParams, native_symbol: &str) -> Self {
        Self {
            client,
            params,
            native_symbol: native_symbol.to_string(),
        }
    }

    /// Processes every wallet in order and returns the full report.
    pub fn run(&self, wallets: &[Wallet], prompt: &mut dyn Prompt) -> RunReport {
        let mut reports = Vec::with_capacity(wallets.len());
        for wallet in wallets {
            reports.push(self.process_wallet(wallet, prompt));
        }
        RunReport { wallets: reports }
    }

    fn process_wallet(&self, wallet: &Wallet, prompt: &mut dyn Prompt) -> WalletReport {
        tracing::info!(address = %wallet.address, "processing wallet");
        prompt.show(&format!("Wallet {}", wallet.address));

        let Some(password) = prompt.password(&wallet.address) else {
            prompt.show("  skipped");
            return WalletReport {
                address: wallet.address.clone(),
                outcome: WalletOutcome::Skipped,
                native_balance: None,
                tokens: Vec::new(),
            };
        };

        match self.process_unlocked(wallet, &password, prompt) {
            Ok((native_balance, tokens)) => WalletReport {
                address: wallet.address.clone(),
                outcome: WalletOutcome::Processed,
                native_balance: Some(native_balance),
                tokens,
            },
            Err(err) => {
                tracing::warn!(address = %wallet.address, error = %err, "wallet failed");
                prompt.show(&format!("  error: {err}"));
                WalletReport {
                    address: wallet.address.clone(),
                    outcome: WalletOutcome::Failed(err.to_string()),
                    native_balance: None,
                    tokens: Vec::new(),
                }
            }
        }
    }

    /// Wallet-level steps: decrypt the key, verify it belongs to the
    /// recorded address, report the native balance, then walk the tokens.
    ///
    /// The decrypted key is dropped, and thereby zeroed, on every path out
    /// of this function; per-token state never holds it past this scope.
    fn process_unlocked(
        &self,
        wallet: &Wallet,
        password: &SecretString,
        prompt: &mut dyn Prompt,
    ) -> Result<(U256, Vec<TokenReport>), CoreError> {
        let key = encryption::decrypt(&wallet.encrypted_key, password)?;
        let key_hex = key
            .as_utf8()
            .ok_or(CoreError::Decryption(VaultError::BadPasswordOrCiphertext))?;

        // A wrong password can slip past padding validation and yield a
        // plausible key; deriving the address catches that, and also
        // catches a miswired wallet file.
        let derived = address::address_of_private_key(key_hex)?;
        if derived != wallet.address {
            return Err(CoreError::KeyMismatch {
                expected: wallet.address.clone(),
                derived,
            });
        }
        tracing::debug!(address = %wallet.address, "key decrypted and verified");

        let native_balance = self.client.native_balance(&wallet.address)?;
        prompt.show(&format!(
            "  {} balance: {}",
            self.native_symbol,
            units::format_units_dp(native_balance, units::NATIVE_DECIMALS, 4)
        ));

        let mut nonce_floor = None;
        let mut tokens = Vec::with_capacity(wallet.tokens.len());
        for token_ref in &wallet.tokens {
            tokens.push(self.process_token(wallet, token_ref, key_hex, &mut nonce_floor, prompt));
        }

        Ok((native_balance, tokens))
    }

    fn process_token(
        &self,
        wallet: &Wallet,
        token_ref: &TokenRef,
        key_hex: &str,
        nonce_floor: &mut Option<u64>,
        prompt: &mut dyn Prompt,
    ) -> TokenReport {
        match self.token_flow(wallet, token_ref, key_hex, nonce_floor, prompt) {
            Ok(report) => report,
            Err(err) => {
                let label = token_ref
                    .symbol_hint
                    .as_deref()
                    .unwrap_or(&token_ref.contract);
                tracing::warn!(token = %token_ref.contract, error = %err, "token failed");
                prompt.show(&format!("  {label}: error: {err}"));
                TokenReport {
                    contract: token_ref.contract.clone(),
                    symbol: label.to_string(),
                    balance: U256::ZERO,
                    action: TokenAction::Failed(err.to_string()),
                }
            }
        }
    }

    fn token_flow(
        &self,
        wallet: &Wallet,
        token_ref: &TokenRef,
        key_hex: &str,
        nonce_floor: &mut Option<u64>,
        prompt: &mut dyn Prompt,
    ) -> Result<TokenReport, CoreError> {
        let (symbol, balance, decimals) =
            token::symbol_and_balance(self.client, &token_ref.contract, &wallet.address)?;
        prompt.show(&format!(
            "  {symbol} balance: {}",
            units::format_units_dp(balance, decimals, 4)
        ));

        let report = |action| TokenReport {
            contract: token_ref.contract.clone(),
            symbol: symbol.clone(),
            balance,
            action,
        };

        if balance.is_zero() {
            return Ok(report(TokenAction::BalanceOnly));
        }

        let Some(intent) = prompt.offer_transfer(&symbol) else {
            return Ok(report(TokenAction::Declined));
        };

        let request = token::build_transfer(
            self.client,
            &token_ref.contract,
            &wallet.address,
            &intent.recipient,
            &intent.amount,
            decimals,
            self.params,
            *nonce_floor,
        )?;
        let nonce = request.tx.nonce;

        let signed = self.client.sign(&request.tx, key_hex)?;
        let tx_hash = self.client.broadcast(&signed)?;

        // The next transfer from this wallet must not reuse this nonce,
        // even while the node still reports the old transaction count.
        *nonce_floor = Some(nonce + 1);

        tracing::info!(token = %symbol, %tx_hash, nonce, "transfer broadcast");
        prompt.show(&format!(
            "  sent {} {symbol} to {}: {tx_hash}",
            request.amount, request.recipient
        ));

        Ok(report(TokenAction::Sent { tx_hash, nonce }))
    }
}
