//! Decrypted key plaintext with drop-time wiping.

use std::fmt;
use std::ops::Deref;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Plaintext recovered from an encrypted key blob.
///
/// The bytes are wiped when the value is dropped, and `Debug` never prints
/// them. In this system the payload is the private key as lowercase hex
/// text, so [`DecryptedKey::as_utf8`] is the usual way to read it.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DecryptedKey(Vec<u8>);

impl DecryptedKey {
    pub(crate) fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Views the plaintext as UTF-8 text, if it is valid text.
    ///
    /// Returns `None` for non-text plaintext, which in practice means a
    /// wrong password slipped past padding validation.
    pub fn as_utf8(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }
}

impl Deref for DecryptedKey {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for DecryptedKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for DecryptedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DecryptedKey(REDACTED)")
    }
}
