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

//! A library for signing email messages with *DomainKeys Identified Mail*
//! (DKIM) signatures as described in [RFC 6376].
//!
//! The high-level API is the type [`Signer`]: configured once with validated
//! [`Params`] and a private key, it produces signed copies of [`Message`]
//! values, each carrying a *DKIM-Signature* header as its first header field.
//! The relevant items are re-exported at the top level.
//!
//! The building blocks are also public: module `canonicalize` implements the
//! *simple* and *relaxed* canonicalization algorithms, module `crypto` the
//! signing backends together with the [`PrivateKeySigner`] trait that custom
//! backends implement, and modules `header` and `message` the message model.
//!
//! # Usage
//!
//! ```
//! use dkimsign::{Params, RsaSha256Key, Message, Signer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let private_key_pem = include_str!("../tests/keys/rsa2048.pem");
//! let params = Params::new(
//!     "example.com",
//!     ["From", "To", "Subject"],
//!     "relaxed/simple".parse().unwrap(),
//!     "",
//! )?;
//! let key = RsaSha256Key::from_pkcs8_pem("202209", private_key_pem)?;
//! let signer = Signer::new(params, key);
//!
//! let mut message = Message::new();
//! message.add_header("From", "alice@example.com")?;
//! message.add_header("To", "bob@example.com")?;
//! message.add_header("Subject", "Greetings")?;
//! message.set_body("Hello friend!\n");
//!
//! let signed = signer.sign_message(&message)?;
//!
//! assert_eq!(signed.headers().iter().next().unwrap().0, "DKIM-Signature");
//! # Ok(())
//! # }
//! ```
//!
//! [RFC 6376]: https://www.rfc-editor.org/rfc/rfc6376

pub mod canonicalize;
pub mod crypto;
pub mod header;
pub mod message;
pub mod signer;

mod util;

pub use crate::{
    canonicalize::{Canonicalization, CanonicalizationAlgorithm},
    crypto::{Ed25519Key, PrivateKeySigner, RsaSha256Key, SigningError, SigningKey},
    header::{HeaderError, HeaderField, HeaderName, HeaderValue, Headers},
    message::{Body, Message, MimeBody, MimePart},
    signer::{
        default_signed_headers, ConfigError, DkimConfig, KeyConfig, Params, ParamsConfig, Signer,
        DKIM_SIGNATURE_NAME,
    },
    util::{decode_base64, encode_base64, CanonicalStr},
};
