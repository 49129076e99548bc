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

use crate::{canonicalize::Canonicalization, header::HeaderName, util::CanonicalStr};
use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

const DEFAULT_HEADERS: [&str; 8] = [
    "CC",
    "Content-Type",
    "Date",
    "From",
    "MIME-Version",
    "Reply-To",
    "Subject",
    "To",
];

/// Returns the default set of header field names to sign.
pub fn default_signed_headers() -> Vec<String> {
    DEFAULT_HEADERS.iter().map(|name| (*name).into()).collect()
}

/// An error that occurs when constructing an invalid signing configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// The signing domain is empty.
    EmptyDomain,
    /// The canonicalization choice is not in the allowed set.
    UnsupportedCanonicalization {
        value: String,
        allowed: Box<[Canonicalization]>,
    },
    /// A signed header name is not a valid RFC 5322 field name.
    InvalidHeaderName(String),
    /// No key for the required algorithm is configured.
    MissingKey(&'static str),
    /// The configured private key cannot be parsed.
    InvalidPrivateKey,
    /// The configured private key does not match the requested algorithm.
    KeyAlgorithmMismatch,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDomain => write!(f, "domain cannot be empty"),
            Self::UnsupportedCanonicalization { value, allowed } => {
                write!(f, "invalid canonicalization '{value}': must be one of ")?;
                for (i, c) in allowed.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "'{}'", c.canonical_str())?;
                }
                Ok(())
            }
            Self::InvalidHeaderName(name) => write!(f, "invalid header field name '{name}'"),
            Self::MissingKey(algorithm) => write!(f, "no {algorithm} key configured"),
            Self::InvalidPrivateKey => write!(f, "cannot parse private key"),
            Self::KeyAlgorithmMismatch => {
                write!(f, "configured private key does not match the requested algorithm")
            }
        }
    }
}

impl Error for ConfigError {}

/// Validated, immutable signing policy.
///
/// A `Params` value is checked once, at construction, and then shared freely
/// across signing calls; no operation mutates it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Params {
    domain: String,
    headers: Vec<HeaderName>,
    canonicalization: Canonicalization,
    identifier: String,
}

impl Params {
    /// Creates signing parameters, allowing any of the four canonicalization
    /// combinations.
    pub fn new<I, S>(
        domain: impl Into<String>,
        headers: I,
        canonicalization: Canonicalization,
        identifier: impl Into<String>,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::restricted(domain, headers, canonicalization, identifier, &Canonicalization::ALL)
    }

    /// Creates signing parameters validated against a caller-chosen subset of
    /// canonicalization combinations.
    pub fn restricted<I, S>(
        domain: impl Into<String>,
        headers: I,
        canonicalization: Canonicalization,
        identifier: impl Into<String>,
        allowed: &[Canonicalization],
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domain = domain.into();
        if domain.is_empty() {
            return Err(ConfigError::EmptyDomain);
        }

        if !allowed.contains(&canonicalization) {
            return Err(ConfigError::UnsupportedCanonicalization {
                value: canonicalization.to_string(),
                allowed: allowed.into(),
            });
        }

        // lowercase, keep order, keep duplicates
        let mut headers = headers
            .into_iter()
            .map(|name| {
                let name = name.as_ref();
                HeaderName::new(name.to_ascii_lowercase())
                    .map_err(|_| ConfigError::InvalidHeaderName(name.into()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if !headers.iter().any(|name| *name == "from") {
            headers.push(HeaderName::new_unchecked("from"));
        }

        Ok(Self {
            domain,
            headers,
            canonicalization,
            identifier: identifier.into(),
        })
    }

    /// The *v=* tag value. Always 1.
    pub fn version(&self) -> u32 {
        1
    }

    /// The SDID claiming responsibility for the message, the *d=* tag value.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The header field names presented to the signing algorithm, in order,
    /// lowercased; the *h=* tag is their colon-joined form.
    ///
    /// Guaranteed to contain `from`.
    pub fn headers(&self) -> &[HeaderName] {
        &self.headers
    }

    /// The header/body canonicalization pair, the *c=* tag value.
    pub fn canonicalization(&self) -> Canonicalization {
        self.canonicalization
    }

    /// The agent or user identifier, the *i=* tag value; empty means the tag
    /// is omitted from the signature.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relaxed_simple() -> Canonicalization {
        "relaxed/simple".parse().unwrap()
    }

    #[test]
    fn empty_domain_rejected() {
        let err = Params::new("", ["From"], relaxed_simple(), "").unwrap_err();
        assert_eq!(err, ConfigError::EmptyDomain);
    }

    #[test]
    fn canonicalization_outside_allow_list_rejected() {
        let allowed = [relaxed_simple()];
        let err = Params::restricted(
            "example.com",
            ["From"],
            "simple/simple".parse().unwrap(),
            "",
            &allowed,
        )
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("simple/simple"));
        assert!(message.contains("must be one of 'relaxed/simple'"));
    }

    #[test]
    fn error_names_all_valid_choices() {
        let err = ConfigError::UnsupportedCanonicalization {
            value: "bogus".into(),
            allowed: Canonicalization::ALL.into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid canonicalization 'bogus': must be one of \
             'simple/simple', 'simple/relaxed', 'relaxed/simple', 'relaxed/relaxed'"
        );
    }

    #[test]
    fn headers_lowercased_order_preserved() {
        let params =
            Params::new("example.com", ["Subject", "TO", "From"], relaxed_simple(), "").unwrap();
        let names: Vec<_> = params.headers().iter().map(|n| n.as_ref()).collect();
        assert_eq!(names, ["subject", "to", "from"]);
    }

    #[test]
    fn from_appended_when_absent() {
        let params = Params::new("example.com", ["To", "Subject"], relaxed_simple(), "").unwrap();
        let names: Vec<_> = params.headers().iter().map(|n| n.as_ref()).collect();
        assert_eq!(names, ["to", "subject", "from"]);
    }

    #[test]
    fn empty_header_list_defaults_to_from() {
        let params =
            Params::new("example.com", Vec::<String>::new(), relaxed_simple(), "").unwrap();
        let names: Vec<_> = params.headers().iter().map(|n| n.as_ref()).collect();
        assert_eq!(names, ["from"]);
    }

    #[test]
    fn duplicates_not_removed() {
        let params =
            Params::new("example.com", ["From", "To", "To"], relaxed_simple(), "").unwrap();
        let names: Vec<_> = params.headers().iter().map(|n| n.as_ref()).collect();
        assert_eq!(names, ["from", "to", "to"]);
    }

    #[test]
    fn invalid_header_name_rejected() {
        let err = Params::new("example.com", ["Fr om"], relaxed_simple(), "").unwrap_err();
        assert_eq!(err, ConfigError::InvalidHeaderName("Fr om".into()));
    }
}
