use secrecy::SecretString;

/// A transfer the user confirmed at the prompt, not yet validated.
///
/// The orchestrator re-validates both fields before any chain call, so a
/// `Prompt` implementation may pass raw user input through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferIntent {
    /// Recipient address.
    pub recipient: String,
    /// Amount in human decimal units, e.g. `"1.5"`.
    pub amount: String,
}

/// Decision surface the orchestrator drives.
///
/// All interactive input and all user-facing output go through this trait,
/// which keeps the orchestration logic runnable from scripted fixtures.
pub trait Prompt {
    /// Asks for the password of `address`. `None` skips the wallet.
    fn password(&mut self, address: &str) -> Option<SecretString>;

    /// Offers to transfer `symbol` out of the current wallet. `None`
    /// declines; the balance was shown via [`Prompt::show`] beforehand.
    fn offer_transfer(&mut self, symbol: &str) -> Option<TransferIntent>;

    /// Emits one progress or report line.
    fn show(&mut self, line: &str);
}
