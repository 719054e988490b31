//! Response metadata parsing: download file names and error bodies.
//!
//! Separated from the HTTP calls so it can be unit tested without a server.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Extract the suggested file name from a `Content-Disposition` value.
///
/// Prefers the RFC 5987 `filename*=charset''percent-encoded` form, then the
/// plain `filename=` parameter (up to the next `;`, quotes removed).
/// Returns `None` when no usable name is present.
pub fn filename_from_disposition(disposition: &str) -> Option<String> {
    static EXTENDED: OnceLock<Option<Regex>> = OnceLock::new();
    let extended = EXTENDED
        .get_or_init(|| Regex::new(r#"(?i)filename\*\s*=\s*[^']*'[^']*'([^;]+)"#).ok())
        .as_ref();

    if let Some(caps) = extended.and_then(|re| re.captures(disposition)) {
        if let Some(name) = caps.get(1).and_then(|m| percent_decode(m.as_str().trim())) {
            if let Some(clean) = sanitize_filename(&name) {
                return Some(clean);
            }
        }
    }

    let (_, rest) = disposition.split_once("filename=")?;
    let raw = rest.split(';').next().unwrap_or_default();
    sanitize_filename(&raw.replace('"', ""))
}

/// Reduce a server-suggested name to a bare file name.
///
/// Directory components are dropped so a download can never escape the
/// output directory.
pub fn sanitize_filename(name: &str) -> Option<String> {
    let base = name
        .trim()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if base.is_empty() || base == "." || base == ".." {
        None
    } else {
        Some(base.to_string())
    }
}

fn percent_decode(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = raw.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

/// Pull a human-readable message out of an error response body.
///
/// Understands `{"error": "..."}` and FastAPI's `{"detail": "..."}` /
/// `{"detail": [{"msg": "..."}, ...]}`. Returns `None` for anything else,
/// including non-JSON bodies.
pub fn error_message(body: &[u8]) -> Option<String> {
    let json: Value = serde_json::from_slice(body).ok()?;

    match json.get("detail") {
        Some(Value::String(s)) => return Some(s.clone()),
        Some(Value::Array(items)) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if !msgs.is_empty() {
                return Some(msgs.join(", "));
            }
        }
        _ => {}
    }

    json.get("error")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_filename() {
        assert_eq!(
            filename_from_disposition(r#"attachment; filename="out.png""#).as_deref(),
            Some("out.png")
        );
    }

    #[test]
    fn unquoted_filename_with_trailing_params() {
        assert_eq!(
            filename_from_disposition("attachment; filename=report.pdf; size=10").as_deref(),
            Some("report.pdf")
        );
    }

    #[test]
    fn extended_filename_wins() {
        let header = "attachment; filename*=utf-8''r%C3%A9sum%C3%A9.pdf";
        assert_eq!(
            filename_from_disposition(header).as_deref(),
            Some("résumé.pdf")
        );
    }

    #[test]
    fn missing_or_empty_name() {
        assert_eq!(filename_from_disposition("attachment"), None);
        assert_eq!(filename_from_disposition(r#"attachment; filename="""#), None);
    }

    #[test]
    fn path_components_are_stripped() {
        assert_eq!(
            filename_from_disposition(r#"attachment; filename="../../etc/passwd""#).as_deref(),
            Some("passwd")
        );
        assert_eq!(sanitize_filename(r"C:\temp\x.zip").as_deref(), Some("x.zip"));
        assert_eq!(sanitize_filename(".."), None);
    }

    #[test]
    fn error_field() {
        assert_eq!(
            error_message(br#"{"error":"bad format"}"#).as_deref(),
            Some("bad format")
        );
    }

    #[test]
    fn fastapi_detail_forms() {
        assert_eq!(
            error_message(br#"{"detail":"Not Found"}"#).as_deref(),
            Some("Not Found")
        );
        assert_eq!(
            error_message(br#"{"detail":[{"msg":"field required"},{"msg":"value is not a valid integer"}]}"#)
                .as_deref(),
            Some("field required, value is not a valid integer")
        );
    }

    #[test]
    fn unreadable_bodies() {
        assert_eq!(error_message(b"<html>502</html>"), None);
        assert_eq!(error_message(br#"{"message":"nope"}"#), None);
    }
}
