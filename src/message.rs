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

//! A minimal mutable email message abstraction.
//!
//! This is the boundary the signing pipeline consumes: an ordered header
//! collection plus a body that is either a flat string or a structured MIME
//! multipart value rendering itself to its final string form. The pipeline
//! never mutates a caller's message; it clones it at the entry point.

use crate::header::{HeaderName, HeaderValue, Headers};
use std::time::{SystemTime, UNIX_EPOCH};

const CRLF: &str = "\r\n";

/// A message body.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Body {
    /// A flat text body.
    Text(String),
    /// A structured multipart body, rendered to text when the message is
    /// prepared for signing or transport.
    Mime(MimeBody),
}

impl Body {
    /// Renders the body to its final string form.
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Mime(mime) => mime.render(),
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Self::Text(text.into())
    }
}

impl From<MimeBody> for Body {
    fn from(mime: MimeBody) -> Self {
        Self::Mime(mime)
    }
}

/// A single part of a multipart MIME body.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MimePart {
    content_type: String,
    content: String,
}

impl MimePart {
    /// Creates a `text/plain` part with the given content.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content_type: "text/plain".into(),
            content: content.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// A multipart MIME body.
///
/// The part boundary is fixed when the body is created, so repeated renderings
/// of the same body value produce identical output.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MimeBody {
    parts: Vec<MimePart>,
    boundary: String,
}

impl MimeBody {
    /// Creates a multipart body with a freshly generated boundary.
    pub fn new(parts: Vec<MimePart>) -> Self {
        Self {
            parts,
            boundary: generate_boundary(),
        }
    }

    /// Creates a multipart body with a caller-chosen boundary.
    pub fn with_boundary(parts: Vec<MimePart>, boundary: impl Into<String>) -> Self {
        Self {
            parts,
            boundary: boundary.into(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn parts(&self) -> &[MimePart] {
        &self.parts
    }

    /// Renders the multipart structure to its final transport text.
    pub fn render(&self) -> String {
        let mut result = String::new();

        for part in &self.parts {
            result.push_str("--");
            result.push_str(&self.boundary);
            result.push_str(CRLF);
            result.push_str("Content-Type: ");
            result.push_str(&part.content_type);
            result.push_str(CRLF);
            result.push_str(CRLF);
            result.push_str(&part.content);
            result.push_str(CRLF);
        }

        result.push_str("--");
        result.push_str(&self.boundary);
        result.push_str("--");
        result.push_str(CRLF);

        result
    }
}

// A boundary must be unique per message, not unguessable. Prefer the system
// entropy source, fall back to the clock on platforms without one.
fn generate_boundary() -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let mut bytes = [0u8; 12];
    if getrandom::getrandom(&mut bytes).is_err() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |t| t.as_nanos());
        bytes.copy_from_slice(&nanos.to_be_bytes()[4..]);
    }

    let mut boundary = String::with_capacity(2 + bytes.len() * 2);
    boundary.push_str("=_");
    for b in bytes {
        boundary.push(HEX[(b >> 4) as usize] as char);
        boundary.push(HEX[(b & 0x0f) as usize] as char);
    }
    boundary
}

/// An email message: a header collection and a body.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Message {
    headers: Headers,
    body: Body,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<Body>) {
        self.body = body.into();
    }

    /// Appends a header field built from string values.
    pub fn add_header(
        &mut self,
        name: impl Into<Box<str>>,
        value: impl Into<Box<str>>,
    ) -> Result<(), crate::header::HeaderError> {
        let name = HeaderName::new(name)?;
        self.headers.push(name, HeaderValue::new(value));
        Ok(())
    }
}
