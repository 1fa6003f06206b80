//! Percent-encoded text decoding.
//!
//! Display values in the decoder's tree are percent-encoded the way the
//! legacy JavaScript `unescape` function expects: `%uXXXX` for BMP code
//! points and `%XX` for Latin-1 bytes. Malformed escape sequences pass
//! through verbatim instead of failing the fragment.

/// Decode a percent-encoded display value.
///
/// Handles `%uXXXX` and `%XX` escapes; any sequence that does not form a
/// valid escape is copied through unchanged.
///
/// # Example
///
/// ```
/// use pdfcheck::text::unescape;
///
/// assert_eq!(unescape("Address%201%3A"), "Address 1:");
/// assert_eq!(unescape("100%"), "100%");
/// ```
pub fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '%' {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        // %uXXXX form
        if i + 5 < chars.len() && chars[i + 1] == 'u' {
            if let Some(c) = decode_hex(&chars[i + 2..i + 6]) {
                out.push(c);
                i += 6;
                continue;
            }
        }

        // %XX form (Latin-1 byte)
        if i + 2 < chars.len() {
            if let Some(c) = decode_hex(&chars[i + 1..i + 3]) {
                out.push(c);
                i += 3;
                continue;
            }
        }

        out.push('%');
        i += 1;
    }

    out
}

/// Parse a slice of hex digits into a character, if all digits are valid
/// and the code point is representable.
fn decode_hex(digits: &[char]) -> Option<char> {
    let mut value: u32 = 0;
    for &d in digits {
        value = value.checked_mul(16)?.checked_add(d.to_digit(16)?)?;
    }
    char::from_u32(value)
}
