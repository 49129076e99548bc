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

//! Representation of email header data.

use std::{
    error::Error,
    fmt::{self, Debug, Display, Formatter},
    hash::{Hash, Hasher},
    slice,
};

/// An error that occurs when constructing header data from invalid inputs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HeaderError;

impl Display for HeaderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "invalid header field")
    }
}

impl Error for HeaderError {}

/// A header field name.
///
/// Field names compare equal ASCII case-insensitively.
#[derive(Clone, Eq)]
pub struct HeaderName(Box<str>);

impl HeaderName {
    /// Creates a field name from an RFC 5322 printable-ASCII name.
    pub fn new(value: impl Into<Box<str>>) -> Result<Self, HeaderError> {
        let value = value.into();
        if value.is_empty() {
            return Err(HeaderError);
        }
        if !value.chars().all(|c| c.is_ascii_graphic() && c != ':') {
            return Err(HeaderError);
        }
        Ok(Self(value))
    }

    // for statically known-valid names only
    pub(crate) fn new_unchecked(value: impl Into<Box<str>>) -> Self {
        let value = value.into();
        debug_assert!(Self::new(value.clone()).is_ok());
        Self(value)
    }
}

impl AsRef<str> for HeaderName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Debug for HeaderName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for HeaderName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq for HeaderName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl PartialEq<&str> for HeaderName {
    fn eq(&self, other: &&str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl Hash for HeaderName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_ascii_lowercase().hash(state);
    }
}

/// A header field value.
///
/// A value carries its raw form and, optionally, a distinct transport-encoded
/// representation (for example MIME encoded-words for non-ASCII content). The
/// encoded representation is what canonicalization and serialization use.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct HeaderValue {
    raw: Box<str>,
    encoded: Option<Box<str>>,
}

impl HeaderValue {
    /// Creates a header value whose encoded representation equals the raw one.
    pub fn new(raw: impl Into<Box<str>>) -> Self {
        Self {
            raw: raw.into(),
            encoded: None,
        }
    }

    /// Creates a header value with a distinct transport-encoded representation.
    pub fn with_encoded(raw: impl Into<Box<str>>, encoded: impl Into<Box<str>>) -> Self {
        Self {
            raw: raw.into(),
            encoded: Some(encoded.into()),
        }
    }

    /// Returns the raw value.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the transport-encoded representation, falling back to the raw
    /// value when the two coincide.
    pub fn encoded(&self) -> &str {
        self.encoded.as_deref().unwrap_or(&self.raw)
    }
}

pub type HeaderField = (HeaderName, HeaderValue);

/// An ordered collection of header fields with case-insensitive lookup.
///
/// Duplicate field names are allowed; insertion order is preserved.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Headers(Vec<HeaderField>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a header collection from name/value string pairs.
    pub fn from_vec(fields: Vec<(String, String)>) -> Result<Self, HeaderError> {
        let fields = fields
            .into_iter()
            .map(|(name, value)| Ok((HeaderName::new(name)?, HeaderValue::new(value))))
            .collect::<Result<_, _>>()?;
        Ok(Self(fields))
    }

    /// Appends a header field at the end of the collection.
    pub fn push(&mut self, name: HeaderName, value: HeaderValue) {
        self.0.push((name, value));
    }

    /// Inserts a header field at the front of the collection.
    pub fn prepend(&mut self, name: HeaderName, value: HeaderValue) {
        self.0.insert(0, (name, value));
    }

    /// Returns the first header field with the given name.
    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.0
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, value)| value)
    }

    /// Returns all header fields with the given name, in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a HeaderValue> + 'a {
        self.0
            .iter()
            .filter(move |(n, _)| *n == name)
            .map(|(_, value)| value)
    }

    /// Removes all header fields with the given name, returning how many were
    /// removed.
    pub fn remove_all(&mut self, name: &str) -> usize {
        let before = self.0.len();
        self.0.retain(|(n, _)| *n != name);
        before - self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> slice::Iter<'_, HeaderField> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = &'a HeaderField;
    type IntoIter = slice::Iter<'a, HeaderField>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl AsRef<[HeaderField]> for Headers {
    fn as_ref(&self) -> &[HeaderField] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_name_ok() {
        assert!(HeaderName::new("abc").is_ok());

        assert!(HeaderName::new("").is_err());
        assert!(HeaderName::new("abc ").is_err());
        assert!(HeaderName::new("a:c").is_err());
    }

    #[test]
    fn header_name_formatting() {
        let name = HeaderName::new("Content-Type").unwrap();
        assert_eq!(format!("{name}"), "Content-Type");
        assert_eq!(format!("{name:?}"), "\"Content-Type\"");
    }

    #[test]
    fn headers_from_string_pairs() {
        let headers = Headers::from_vec(vec![
            ("From".into(), "me@example.com".into()),
            ("Subject".into(), "hi".into()),
        ])
        .unwrap();

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("from").unwrap().raw(), "me@example.com");

        let err = Headers::from_vec(vec![("bad name".into(), "x".into())]).unwrap_err();
        assert_eq!(err, HeaderError);
    }

    #[test]
    fn header_name_case_insensitive_eq() {
        let name = HeaderName::new("Content-Type").unwrap();
        assert_eq!(name, HeaderName::new("content-type").unwrap());
        assert_eq!(name, "CONTENT-TYPE");
    }

    #[test]
    fn header_value_encoded_fallback() {
        let plain = HeaderValue::new("hello");
        assert_eq!(plain.encoded(), "hello");

        let encoded = HeaderValue::with_encoded("grüezi", "=?utf-8?Q?gr=C3=BCezi?=");
        assert_eq!(encoded.raw(), "grüezi");
        assert_eq!(encoded.encoded(), "=?utf-8?Q?gr=C3=BCezi?=");
    }

    #[test]
    fn headers_lookup_and_removal() {
        let mut headers = Headers::new();
        headers.push(HeaderName::new("From").unwrap(), HeaderValue::new("me"));
        headers.push(HeaderName::new("To").unwrap(), HeaderValue::new("you"));
        headers.push(HeaderName::new("TO").unwrap(), HeaderValue::new("them"));

        assert_eq!(headers.get("to").map(HeaderValue::raw), Some("you"));
        assert_eq!(headers.get_all("to").count(), 2);
        assert_eq!(headers.get("subject"), None);

        assert_eq!(headers.remove_all("to"), 2);
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn headers_preserve_insertion_order() {
        let mut headers = Headers::new();
        headers.push(HeaderName::new("B").unwrap(), HeaderValue::new("2"));
        headers.push(HeaderName::new("C").unwrap(), HeaderValue::new("3"));
        headers.prepend(HeaderName::new("A").unwrap(), HeaderValue::new("1"));

        let names: Vec<_> = headers.iter().map(|(n, _)| n.as_ref()).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }
}
