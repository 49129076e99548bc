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

//! DKIM signing (RFC 6376).
//!
//! A [`Signer`] combines validated [`Params`] with a private key and turns a
//! [`Message`] into a signed copy carrying a *DKIM-Signature* header as its
//! first header field.

use crate::{
    canonicalize::{canonicalize_body, canonicalize_headers, normalize_newlines},
    crypto::{PrivateKeySigner, SigningError},
    header::{HeaderName, HeaderValue},
    message::Message,
    util::encode_base64,
};
use tracing::trace;

mod config;
mod format;
mod params;

pub use config::{DkimConfig, KeyConfig, ParamsConfig};
pub use params::{default_signed_headers, ConfigError, Params};

/// The header field name carrying the signature.
pub const DKIM_SIGNATURE_NAME: &str = "DKIM-Signature";

const CRLF: &str = "\r\n";

/// A DKIM signer for some private key type.
#[derive(Clone, Debug)]
pub struct Signer<T> {
    params: Params,
    private_key: T,
}

impl<T> Signer<T> {
    pub fn new(params: Params, private_key: T) -> Self {
        Self { params, private_key }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn private_key(&self) -> &T {
        &self.private_key
    }
}

impl<T: PrivateKeySigner> Signer<T> {
    /// Signs a message, returning a signed copy.
    ///
    /// The input message is not modified. The returned copy carries the
    /// normalized body that was hashed, so that serializing it transmits
    /// exactly the octets covered by the signature, and the new
    /// *DKIM-Signature* header as its first header field.
    pub fn sign_message(&self, message: &Message) -> Result<Message, SigningError> {
        let mut signed = message.clone();
        let canonicalization = self.params.canonicalization();

        let body = normalize_newlines(&message.body().render());
        let canonical_body = canonicalize_body(&body, canonicalization.body);
        let body_hash = encode_base64(crate::crypto::digest_sha256(canonical_body));
        signed.set_body(body);

        trace!("body hash: {body_hash}");

        let skeleton = format::format_tag_string(
            &self.params,
            self.private_key.algorithm(),
            self.private_key.selector(),
            &body_hash,
        );

        // the unsigned header participates in its own hash, value ending at b=
        signed.headers_mut().push(
            HeaderName::new_unchecked(DKIM_SIGNATURE_NAME),
            HeaderValue::new(skeleton.clone()),
        );

        let mut selected = self.params.headers().to_vec();
        if !selected.iter().any(|name| *name == DKIM_SIGNATURE_NAME) {
            selected.push(HeaderName::new_unchecked("dkim-signature"));
        }

        let mut canonical =
            canonicalize_headers(canonicalization.header, signed.headers(), &selected);

        // no line terminator after the final (dkim-signature) header (§3.7)
        if canonical.ends_with(CRLF) {
            canonical.truncate(canonical.len() - CRLF.len());
        }

        trace!("signing canonical header block of {} bytes", canonical.len());

        let signature = self.private_key.create_signature(canonical.as_bytes())?;

        signed.headers_mut().remove_all(DKIM_SIGNATURE_NAME);
        signed.headers_mut().prepend(
            HeaderName::new_unchecked(DKIM_SIGNATURE_NAME),
            HeaderValue::new(skeleton + &signature),
        );

        Ok(signed)
    }
}
