//! Signing key handling.
//!
//! The key lives in memory for the lifetime of the session and is never
//! written to disk; the hex input buffer is zeroized after parsing.

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use zeroize::Zeroizing;

use crate::error::{Result, WalletError};

/// An attached wallet key: secp256k1 signer plus its derived address.
pub struct WalletKey {
    signer: PrivateKeySigner,
}

impl WalletKey {
    /// Parse a hex-encoded private key, with or without a `0x` prefix.
    pub fn from_hex(key: &str) -> Result<Self> {
        let normalized = Zeroizing::new(key.trim().trim_start_matches("0x").to_string());
        if normalized.is_empty() {
            return Err(WalletError::Signing("Private key cannot be empty.".into()));
        }
        let signer: PrivateKeySigner = normalized
            .parse()
            .map_err(|_| WalletError::Signing("Invalid private key (expected 32 hex bytes).".into()))?;
        Ok(Self { signer })
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Shortened `0x1234…abcd` form for prompts and headers.
    pub fn short_address(&self) -> String {
        short_address(&self.address())
    }

    pub fn signer(&self) -> PrivateKeySigner {
        self.signer.clone()
    }
}

/// Shorten an address to its first and last four hex digits.
pub fn short_address(address: &Address) -> String {
    let full = format!("{address:#x}");
    format!("{}…{}", &full[..6], &full[full.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known test vector key; never fund it.
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn parses_prefixed_and_bare_keys() {
        let prefixed = WalletKey::from_hex(TEST_KEY).expect("prefixed key");
        let bare = WalletKey::from_hex(TEST_KEY.trim_start_matches("0x")).expect("bare key");
        assert_eq!(prefixed.address(), bare.address());
        assert_eq!(
            format!("{:#x}", prefixed.address()),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn rejects_empty_key() {
        assert!(matches!(
            WalletKey::from_hex("  "),
            Err(WalletError::Signing(_))
        ));
    }

    #[test]
    fn rejects_garbage_key() {
        assert!(matches!(
            WalletKey::from_hex("not-a-key"),
            Err(WalletError::Signing(_))
        ));
    }

    #[test]
    fn short_address_form() {
        let key = WalletKey::from_hex(TEST_KEY).expect("key");
        assert_eq!(key.short_address(), "0xf39f…2266");
    }
}
