//! Private key loading.
//!
//! Gateway identities are provisioned as PEM text. Two encodings are accepted:
//! - `PRIVATE KEY`: PKCS#8 wrapping an EC private key. The inner structure may
//!   be the short form that omits the curve parameters and public key.
//! - `EC PRIVATE KEY`: a bare SEC1 EC private key.

use p256::ecdsa::{SigningKey, VerifyingKey};
use p256::pkcs8::DecodePrivateKey;
use p256::SecretKey;
use zeroize::Zeroizing;

use crate::signer::ecdsa::{self, DecimalSignature};
use crate::signer::{SignerError, SignerResult};

const PKCS8_TAG: &str = "PRIVATE KEY";
const SEC1_TAG: &str = "EC PRIVATE KEY";

/// A parsed P-256 private key, ready for signing.
#[derive(Clone)]
pub struct PrivateKey {
    signing_key: SigningKey,
}

impl PrivateKey {
    /// Parse a PEM-encoded P-256 private key.
    ///
    /// CRLF line endings and keys whose newlines were escaped as a literal
    /// `\n` (common when keys travel through environment variables) are
    /// accepted.
    pub fn from_pem(pem_text: &str) -> SignerResult<Self> {
        let text = normalize_pem(pem_text);
        if text.is_empty() {
            return Err(SignerError::KeyParse("private key is empty".to_string()));
        }

        let block = pem::parse(text.as_bytes())
            .map_err(|e| SignerError::KeyParse(format!("invalid PEM: {}", e)))?;

        let secret_key = match block.tag() {
            PKCS8_TAG => SecretKey::from_pkcs8_der(block.contents()).map_err(|e| {
                SignerError::KeyParse(format!("invalid PKCS#8 P-256 key: {}", e))
            })?,
            SEC1_TAG => SecretKey::from_sec1_der(block.contents()).map_err(|e| {
                SignerError::KeyParse(format!("invalid SEC1 P-256 key: {}", e))
            })?,
            other => {
                return Err(SignerError::KeyParse(format!(
                    "unsupported PEM block '{}', expected '{}' or '{}'",
                    other, PKCS8_TAG, SEC1_TAG
                )))
            }
        };

        Ok(Self {
            signing_key: SigningKey::from(secret_key),
        })
    }

    /// The raw private scalar as lowercase hex.
    pub fn scalar_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(alloy::hex::encode(self.signing_key.to_bytes()))
    }

    /// The public half of this key.
    pub fn verifying_key(&self) -> &VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Sign `message` and return the decimal `(r, s)` pair.
    pub fn sign(&self, message: &[u8]) -> SignerResult<DecimalSignature> {
        ecdsa::sign(self, message)
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("curve", &"P-256")
            .field("scalar", &"<redacted>")
            .finish()
    }
}

fn normalize_pem(pem_text: &str) -> Zeroizing<String> {
    let trimmed = pem_text.trim();
    let unescaped = if !trimmed.contains('\n') && trimmed.contains("\\n") {
        trimmed.replace("\\r\\n", "\n").replace("\\n", "\n")
    } else {
        trimmed.replace("\r\n", "\n")
    };
    Zeroizing::new(unescaped)
}
