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

//! Configuration surface for assembling a signer.
//!
//! These plain structures mirror the shape a deployment typically keeps in
//! its configuration files: signing parameters plus a set of named keys. No
//! environment variables or persisted state are involved.

use crate::{
    canonicalize::Canonicalization,
    crypto::{RsaSha256Key, SigningKey},
    signer::{default_signed_headers, ConfigError, Params, Signer},
};

/// Configuration for [`Params`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParamsConfig {
    /// The signing domain. Must be set; there is no usable default.
    pub domain: String,
    /// Header field names to sign.
    pub headers: Vec<String>,
    /// Canonicalization pair, eg `relaxed/simple`.
    pub canonicalization: String,
    /// Optional agent or user identifier for the *i=* tag.
    pub identifier: String,
}

impl Default for ParamsConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            headers: default_signed_headers(),
            canonicalization: "relaxed/simple".into(),
            identifier: String::new(),
        }
    }
}

/// A configured private key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyConfig {
    /// The DKIM algorithm this key serves, eg `rsa-sha256`.
    pub algorithm: String,
    /// The selector published alongside the key.
    pub selector: String,
    /// The private key as a PEM-encoded PKCS#8 document.
    pub private_key: String,
}

/// Complete DKIM signing configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DkimConfig {
    pub params: ParamsConfig,
    pub keys: Vec<KeyConfig>,
}

impl Params {
    /// Builds signing parameters from configuration values.
    ///
    /// The canonicalization string is parsed and validated against the full
    /// set of combinations; unrecognized values produce a [`ConfigError`]
    /// naming the valid choices.
    pub fn from_config(config: &ParamsConfig) -> Result<Self, ConfigError> {
        let canonicalization: Canonicalization =
            config.canonicalization.parse().map_err(|_| {
                ConfigError::UnsupportedCanonicalization {
                    value: config.canonicalization.clone(),
                    allowed: Canonicalization::ALL.into(),
                }
            })?;

        Self::new(
            config.domain.clone(),
            &config.headers,
            canonicalization,
            config.identifier.clone(),
        )
    }
}

impl Signer<RsaSha256Key> {
    /// Assembles a signer from configuration, using the configured
    /// *rsa-sha256* key.
    pub fn from_config(config: &DkimConfig) -> Result<Self, ConfigError> {
        let params = Params::from_config(&config.params)?;

        let key_config = config
            .keys
            .iter()
            .find(|key| key.algorithm.eq_ignore_ascii_case(RsaSha256Key::ALGORITHM))
            .ok_or(ConfigError::MissingKey(RsaSha256Key::ALGORITHM))?;

        let key = SigningKey::from_pkcs8_pem(&key_config.private_key)
            .map_err(|_| ConfigError::InvalidPrivateKey)?;

        let key = match key {
            SigningKey::Rsa(key) => key,
            SigningKey::Ed25519(_) => return Err(ConfigError::KeyAlgorithmMismatch),
        };

        Ok(Signer::new(params, RsaSha256Key::new(&key_config.selector, key)))
    }
}
