//! Normalization of payloads produced by QR scanners.
//!
//! Camera decoders hand back whatever was encoded in the image. Depending on
//! the display that rendered it this is the bare token code, a small JSON
//! object, or a deep link carrying the code as a query parameter.

use serde_json::Value;

/// Keys under which a token may appear in a JSON object or query string.
const TOKEN_KEYS: &[&str] = &["qr_token", "token"];

/// Reduce a scanned payload to the token code it carries.
///
/// Returns an empty string when the payload carries nothing usable; the
/// caller reports that as a missing `qr_token`.
pub fn normalize_scanned_payload(raw: &str) -> String {
    let trimmed = raw.trim();

    if trimmed.starts_with('{') {
        if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(trimmed) {
            return TOKEN_KEYS
                .iter()
                .find_map(|key| obj.get(*key).and_then(Value::as_str))
                .map(|token| token.trim().to_string())
                .unwrap_or_default();
        }
    }

    if let Some((_, query)) = trimmed.split_once('?') {
        let query = query.split('#').next().unwrap_or_default();
        for pair in query.split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if TOKEN_KEYS.contains(&key) {
                return percent_decode(value).trim().to_string();
            }
        }
    }

    trimmed.to_string()
}

/// Decode `application/x-www-form-urlencoded` escapes (`+` and `%XX`).
///
/// Malformed escapes are kept literally.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push((hi << 4) | lo);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
