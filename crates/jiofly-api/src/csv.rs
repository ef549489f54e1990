// Comma-separated composite field handling.
//
// The device packs several facts into one element as a fixed-order list,
// e.g. `<cpu>12,45</cpu>`. No quoting or escaping is ever emitted.

use crate::error::FieldError;

/// Split `value` on every occurrence of `delim`.
///
/// Empty segments are kept, including the trailing one after a final
/// delimiter: `"a,b,"` yields `["a", "b", ""]`.
pub fn split(value: &str, delim: char) -> Vec<&str> {
    value.split(delim).collect()
}

/// Pair the comma-separated tokens of `raw` with `names`, positionally.
///
/// Returns [`FieldError::Malformed`] when `raw` has fewer tokens than
/// `names`. Tokens beyond the declared arity are ignored.
pub fn decompose<'a>(
    field: &'static str,
    raw: &'a str,
    names: &'static [&'static str],
) -> Result<Vec<(&'static str, &'a str)>, FieldError> {
    let tokens = split(raw, ',');
    if tokens.len() < names.len() {
        return Err(FieldError::Malformed {
            field,
            expected: names.len(),
            found: tokens.len(),
        });
    }
    Ok(names.iter().copied().zip(tokens).collect())
}
