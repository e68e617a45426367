//! `Content-Disposition` filename extraction.
//!
//! Both forms servers send in practice are accepted: the RFC 5987 extended
//! `filename*=UTF-8''r%C3%A9sultat.xlsx` and the plain
//! `filename="report.xlsx"` / `filename=report.xlsx`. The extended form wins
//! when both are present.

use percent_encoding::percent_decode_str;

/// Suggested download name for a response, or `fallback` when the header is
/// missing or carries no usable filename.
pub fn suggested_filename(content_disposition: Option<&str>, fallback: &str) -> String {
    content_disposition
        .and_then(filename_from_disposition)
        .unwrap_or_else(|| fallback.to_string())
}

/// Extracts the filename carried by a `Content-Disposition` header value.
pub fn filename_from_disposition(header: &str) -> Option<String> {
    let params = parse_params(header);

    let extended = params
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("filename*"))
        .and_then(|(_, value)| decode_ext_value(value));
    if extended.is_some() {
        return extended;
    }

    params
        .into_iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("filename"))
        .map(|(_, value)| value)
        .filter(|value| !value.trim().is_empty())
}

/// Splits `attachment; a=b; c="d; e"` into `(key, unquoted value)` pairs.
/// Segments without `=` (the disposition type) are skipped.
fn parse_params(header: &str) -> Vec<(String, String)> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;
    for c in header.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => {
                current.push(c);
                escaped = true;
            }
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ';' if !in_quotes => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    segments.push(current);

    segments
        .iter()
        .filter_map(|segment| {
            let (key, value) = segment.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), unquote(value.trim())))
        })
        .collect()
}

fn unquote(value: &str) -> String {
    let Some(inner) = value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return value.to_string();
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Decodes an RFC 5987 `charset'language'value`. A value without the
/// charset/language prefix is percent-decoded as UTF-8.
fn decode_ext_value(value: &str) -> Option<String> {
    let mut parts = value.splitn(3, '\'');
    let (charset, encoded) = match (parts.next(), parts.next(), parts.next()) {
        (Some(charset), Some(_language), Some(encoded)) => (charset, encoded),
        (Some(bare), None, None) => ("utf-8", bare),
        _ => return None,
    };

    let decoded = if charset.eq_ignore_ascii_case("utf-8") {
        percent_decode_str(encoded).decode_utf8().ok()?.into_owned()
    } else if charset.eq_ignore_ascii_case("iso-8859-1") {
        percent_decode_str(encoded).map(char::from).collect()
    } else {
        return None;
    };

    if decoded.trim().is_empty() {
        None
    } else {
        Some(decoded)
    }
}
