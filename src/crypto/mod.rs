// dkimsign - DKIM message signing library
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later
// version.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.

//! Cryptographic signing backends.
//!
//! The signing pipeline is agnostic to the concrete algorithm: it consumes
//! any implementation of [`PrivateKeySigner`]. The backends provided here
//! cover the *rsa-sha256* and *ed25519-sha256* DKIM algorithms; callers with
//! other needs (HSMs, test doubles) implement the trait themselves.

mod ed25519;
mod rsa;

pub use self::{ed25519::Ed25519Key, rsa::RsaSha256Key};

use ::rsa::RsaPrivateKey;
use ed25519_dalek::SigningKey as Ed25519SigningKey;
use pkcs8::{der::pem::PemLabel, Document, PrivateKeyInfo};
use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    io::{self, ErrorKind},
};

/// The private-key capability consumed by the signing pipeline.
///
/// Implementations are expected to be deterministic for a fixed key and
/// payload (true of PKCS#1 v1.5 RSA and of Ed25519), immutable after
/// construction, and safe to share across concurrent signing calls.
pub trait PrivateKeySigner {
    /// Returns the Base64-encoded signature over the payload.
    fn create_signature(&self, payload: &[u8]) -> Result<String, SigningError>;

    /// Returns the algorithm name used in the *a=* tag, eg `rsa-sha256`.
    fn algorithm(&self) -> &str;

    /// Returns the selector used in the *s=* tag.
    ///
    /// The selector identifies the published key record a verifier should
    /// fetch; it is copied into the signature verbatim, never resolved.
    fn selector(&self) -> &str;
}

/// An error that occurs when producing a signature.
#[derive(Debug, PartialEq, Eq)]
pub enum SigningError {
    SigningFailure,
}

impl Display for SigningError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::SigningFailure => write!(f, "signing failed"),
        }
    }
}

impl Error for SigningError {}

/// A private key read from a PKCS#8 document.
#[derive(Debug)]
pub enum SigningKey {
    Rsa(RsaPrivateKey),
    Ed25519(Ed25519SigningKey),
}

impl SigningKey {
    /// Reads a private key from a PEM-encoded PKCS#8 document, accepting
    /// either an RSA or an Ed25519 key.
    pub fn from_pkcs8_pem(s: &str) -> io::Result<Self> {
        let (label, private_key_der) = Document::from_pem(s)
            .map_err(|_| io::Error::new(ErrorKind::Other, "not a PEM document"))?;

        PrivateKeyInfo::validate_pem_label(label)
            .map_err(|_| io::Error::new(ErrorKind::Other, "not a PEM document"))?;

        let pk = PrivateKeyInfo::try_from(private_key_der.as_bytes())
            .map_err(|_| io::Error::new(ErrorKind::Other, "invalid private key format"))?;

        if let Ok(rpk) = RsaPrivateKey::try_from(pk.clone()) {
            Ok(Self::Rsa(rpk))
        } else if let Ok(esk) = Ed25519SigningKey::try_from(pk) {
            Ok(Self::Ed25519(esk))
        } else {
            Err(io::Error::new(ErrorKind::Other, "unknown private key type"))
        }
    }
}

/// Computes the SHA-256 digest of the given data.
pub fn digest_sha256(data: impl AsRef<[u8]>) -> Box<[u8]> {
    use digest::Digest;

    let mut hasher = sha2::Sha256::new();
    hasher.update(data.as_ref());
    Box::from(&hasher.finalize()[..])
}
