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

//! Canonicalization of header fields and message bodies.
//!
//! The functions in this module implement the *simple* and *relaxed*
//! canonicalization algorithms of RFC 6376, section 3.4. They are pure text
//! transformations; hashing and signing happen elsewhere.

use crate::{
    header::{HeaderName, HeaderValue, Headers},
    util::CanonicalStr,
};
use std::{
    collections::HashSet,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

const CRLF: &str = "\r\n";

/// A canonicalization algorithm.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum CanonicalizationAlgorithm {
    /// The *simple* canonicalization algorithm.
    #[default]
    Simple,
    /// The *relaxed* canonicalization algorithm.
    Relaxed,
}

impl CanonicalStr for CanonicalizationAlgorithm {
    fn canonical_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Relaxed => "relaxed",
        }
    }
}

impl Display for CanonicalizationAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_str())
    }
}

impl FromStr for CanonicalizationAlgorithm {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("simple") {
            Ok(Self::Simple)
        } else if s.eq_ignore_ascii_case("relaxed") {
            Ok(Self::Relaxed)
        } else {
            Err("unknown canonicalization algorithm")
        }
    }
}

/// A pair of header/body canonicalization algorithms.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct Canonicalization {
    /// The header canonicalization.
    pub header: CanonicalizationAlgorithm,
    /// The body canonicalization.
    pub body: CanonicalizationAlgorithm,
}

impl Canonicalization {
    /// All four header/body combinations.
    pub const ALL: [Canonicalization; 4] = {
        use CanonicalizationAlgorithm::*;
        [
            Canonicalization { header: Simple, body: Simple },
            Canonicalization { header: Simple, body: Relaxed },
            Canonicalization { header: Relaxed, body: Simple },
            Canonicalization { header: Relaxed, body: Relaxed },
        ]
    };
}

impl From<(CanonicalizationAlgorithm, CanonicalizationAlgorithm)> for Canonicalization {
    fn from((header, body): (CanonicalizationAlgorithm, CanonicalizationAlgorithm)) -> Self {
        Self { header, body }
    }
}

impl CanonicalStr for Canonicalization {
    fn canonical_str(&self) -> &'static str {
        use CanonicalizationAlgorithm::*;

        match (self.header, self.body) {
            (Simple, Simple) => "simple/simple",
            (Simple, Relaxed) => "simple/relaxed",
            (Relaxed, Simple) => "relaxed/simple",
            (Relaxed, Relaxed) => "relaxed/relaxed",
        }
    }
}

impl Display for Canonicalization {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_str())
    }
}

impl fmt::Debug for Canonicalization {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{:?}", &self.header, &self.body)
    }
}

impl FromStr for Canonicalization {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // a single algorithm name means "simple" for the body (§3.5, c= tag)
        Ok(if let Some((header, body)) = s.split_once('/') {
            Self {
                header: CanonicalizationAlgorithm::from_str(header)?,
                body: CanonicalizationAlgorithm::from_str(body)?,
            }
        } else {
            Self {
                header: CanonicalizationAlgorithm::from_str(s)?,
                body: Default::default(),
            }
        })
    }
}

fn is_hwsp(c: char) -> bool {
    matches!(c, ' ' | '\t')
}

/// Converts all line-ending variants to CRLF, trims surrounding whitespace and
/// appends a single trailing CRLF.
///
/// This is applied to a message body once, before any canonicalization; an
/// empty body normalizes to the two-byte sequence CRLF.
pub fn normalize_newlines(body: &str) -> String {
    let mut result = String::with_capacity(body.len() + 2);

    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                result.push_str(CRLF);
            }
            // the remaining line-ending variants of Unicode text
            '\n' | '\x0b' | '\x0c' | '\u{85}' | '\u{2028}' | '\u{2029}' => {
                result.push_str(CRLF);
            }
            _ => result.push(c),
        }
    }

    let trimmed = result.trim_matches([' ', '\t', '\r', '\n', '\0'].as_slice());

    let mut normalized = String::with_capacity(trimmed.len() + 2);
    normalized.push_str(trimmed);
    normalized.push_str(CRLF);
    normalized
}

/// Produces the body canonicalization result for a normalized body.
///
/// The input must already be in the form produced by [`normalize_newlines`]:
/// CRLF line endings, no trailing blank lines, exactly one trailing CRLF.
pub fn canonicalize_body(body: &str, algorithm: CanonicalizationAlgorithm) -> String {
    match algorithm {
        CanonicalizationAlgorithm::Simple => body.into(),
        CanonicalizationAlgorithm::Relaxed => {
            let mut result = String::with_capacity(body.len());

            let mut lines = body.split(CRLF).peekable();
            while let Some(line) = lines.next() {
                let mut compressing = false;
                for c in line.chars() {
                    if is_hwsp(c) {
                        compressing = true;
                    } else {
                        if compressing {
                            result.push(' ');
                            compressing = false;
                        }
                        result.push(c);
                    }
                }
                // whitespace before the line break is deleted, not compressed
                if lines.peek().is_some() {
                    result.push_str(CRLF);
                }
            }

            result
        }
    }
}

/// Produces the header canonicalization result for the selected header names.
///
/// Each occurrence of a name in `selected` consumes the next matching header
/// instance from the bottom of the header collection up (§5.4.2). Names
/// without a matching instance contribute nothing.
pub fn canonicalize_headers(
    algorithm: CanonicalizationAlgorithm,
    headers: &Headers,
    selected: &[HeaderName],
) -> String {
    let mut result = String::new();
    let mut processed_indexes = HashSet::with_capacity(selected.len());

    for selected_name in selected {
        for (i, (name, value)) in headers
            .iter()
            .rev()
            .enumerate()
            .filter(|(i, _)| !processed_indexes.contains(i))
        {
            if name == selected_name {
                canonicalize_header(&mut result, algorithm, name.as_ref(), value);
                result.push_str(CRLF);

                processed_indexes.insert(i);

                break;
            }
        }
    }

    result
}

/// Canonicalizes a single header field into a result buffer.
///
/// The value source is the header's transport-encoded representation.
pub fn canonicalize_header(
    result: &mut String,
    algorithm: CanonicalizationAlgorithm,
    name: &str,
    value: &HeaderValue,
) {
    match algorithm {
        CanonicalizationAlgorithm::Simple => {
            // the original serialized line, formatting untouched
            result.push_str(name);
            result.push_str(": ");
            result.push_str(value.encoded());
        }
        CanonicalizationAlgorithm::Relaxed => {
            for c in name.chars() {
                result.push(c.to_ascii_lowercase());
            }
            result.push(':');
            canonicalize_header_value_relaxed(result, value.encoded());
        }
    }
}

fn canonicalize_header_value_relaxed(result: &mut String, value: &str) {
    fn is_space(c: char) -> bool {
        matches!(c, ' ' | '\t' | '\r' | '\n')
    }

    let value = value.trim_matches(is_space);

    let mut compressing = false;
    for c in value.chars() {
        if is_space(c) {
            compressing = true;
        } else {
            if compressing {
                result.push(' ');
                compressing = false;
            }
            result.push(c);
        }
    }
}
