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

//! Construction of the DKIM-Signature tag string.

use crate::signer::Params;

/// Formats the signature tag string with an empty *b=* placeholder.
///
/// Tag order is fixed: `v, a, bh, c, d, h, s, [i], b`; the *i=* tag appears
/// only when the identifier is non-empty. The caller appends the Base64
/// signature data directly after the trailing `b=`.
pub(crate) fn format_tag_string(
    params: &Params,
    algorithm: &str,
    selector: &str,
    body_hash: &str,
) -> String {
    let signed_headers = params
        .headers()
        .iter()
        .map(|name| name.as_ref())
        .collect::<Vec<_>>()
        .join(":");

    let mut result = format!(
        "v={}; a={}; bh={}; c={}; d={}; h={}; s={}",
        params.version(),
        algorithm,
        body_hash,
        params.canonicalization(),
        params.domain(),
        signed_headers,
        selector,
    );

    if !params.identifier().is_empty() {
        result.push_str("; i=");
        result.push_str(params.identifier());
    }

    result.push_str("; b=");
    result
}
