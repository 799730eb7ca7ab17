//! ECDSA over P-256 with decimal scalar encoding.
//!
//! The gateway expects `signedR` and `signedS` as base-10 integer strings.
//! Payload bytes are used directly as the message representative: the
//! gateway already hands out the digest to sign, so no further hashing is
//! applied. The payload is read as a big-endian unsigned integer; if that
//! integer is wider than 256 bits only its top 256 bits are kept.

use alloy::primitives::U256;
use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use p256::ecdsa::{Signature, VerifyingKey};
use p256::FieldBytes;

use crate::signer::key::PrivateKey;
use crate::signer::{SignerError, SignerResult};

const FIELD_LEN: usize = 32;

/// An ECDSA signature in the gateway's wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalSignature {
    /// `r` as a base-10 integer string.
    pub r: String,
    /// `s` as a base-10 integer string.
    pub s: String,
}

impl DecimalSignature {
    fn from_signature(signature: &Signature) -> Self {
        let (r, s) = signature.split_bytes();
        Self {
            r: U256::from_be_slice(&r).to_string(),
            s: U256::from_be_slice(&s).to_string(),
        }
    }

    fn to_signature(&self) -> SignerResult<Signature> {
        let r = parse_decimal_scalar("r", &self.r)?;
        let s = parse_decimal_scalar("s", &self.s)?;
        Signature::from_scalars(FieldBytes::from(r), FieldBytes::from(s))
            .map_err(|e| SignerError::Signing(format!("invalid signature scalars: {}", e)))
    }
}

/// Sign `message` with `key`.
pub fn sign(key: &PrivateKey, message: &[u8]) -> SignerResult<DecimalSignature> {
    if message.is_empty() {
        return Err(SignerError::Signing("refusing to sign an empty message".to_string()));
    }

    let representative = message_representative(message);
    let signature: Signature = key
        .signing_key()
        .sign_prehash(&representative)
        .map_err(|e| SignerError::Signing(format!("signature computation failed: {}", e)))?;

    Ok(DecimalSignature::from_signature(&signature))
}

/// Check a decimal signature over `message` against `verifying_key`.
pub fn verify(
    verifying_key: &VerifyingKey,
    message: &[u8],
    signature: &DecimalSignature,
) -> SignerResult<()> {
    if message.is_empty() {
        return Err(SignerError::Signing("cannot verify an empty message".to_string()));
    }

    let signature = signature.to_signature()?;
    verifying_key
        .verify_prehash(&message_representative(message), &signature)
        .map_err(|e| SignerError::Signing(format!("signature verification failed: {}", e)))
}

fn message_representative(message: &[u8]) -> [u8; FIELD_LEN] {
    // Read as an unsigned integer, so leading zero bytes carry no width.
    let start = message.iter().position(|&b| b != 0).unwrap_or(message.len());
    let message = &message[start..];

    let mut field = [0u8; FIELD_LEN];
    if message.len() >= FIELD_LEN {
        field.copy_from_slice(&message[..FIELD_LEN]);
    } else {
        field[FIELD_LEN - message.len()..].copy_from_slice(message);
    }
    field
}

fn parse_decimal_scalar(name: &str, value: &str) -> SignerResult<[u8; FIELD_LEN]> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SignerError::Signing(format!(
            "signature component {} is not a decimal integer",
            name
        )));
    }
    let scalar = U256::from_str_radix(value, 10).map_err(|e| {
        SignerError::Signing(format!("signature component {} out of range: {}", name, e))
    })?;
    Ok(scalar.to_be_bytes::<FIELD_LEN>())
}
