//! Encoding and decoding of `file://` URIs to and from OS paths.
//!
//! Percent-decoding is strict: a `%` not followed by two hex digits is a
//! [`FileUriError::InvalidEscape`]. On Windows, a path whose first segment
//! looks like a drive letter (`/C:/...`) is decoded without its leading
//! slash, matching the convention used by `file:///C:/Users/...` URIs.

use std::fmt;

/// An error produced while parsing or writing a `file://` URI.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum FileUriError {
    #[error("file URI does not start with \"file:\"")]
    NotAFileUri,
    #[error("invalid percent-encoding escape in file URI")]
    InvalidEscape,
    #[error("file URI path is not valid UTF-8")]
    InvalidUtf8,
}

/// Decodes a `file://` URI into an OS path and a hostname.
///
/// The hostname is returned as a slice of `uri` (it never needs
/// percent-decoding: RFC 3986 reg-names are already unreserved-safe in
/// practice and this implementation does not decode it, matching common
/// `file://` usage where the authority is either empty or `localhost`).
pub fn parse_file_uri(uri: &str) -> Result<(String, &str), FileUriError> {
    let rest = uri.strip_prefix("file:").ok_or(FileUriError::NotAFileUri)?;
    let (authority, path) = if let Some(after_slashes) = rest.strip_prefix("//") {
        let end = after_slashes.find('/').unwrap_or(after_slashes.len());
        (&after_slashes[..end], &after_slashes[end..])
    } else {
        ("", rest)
    };
    let decoded = percent_decode(path)?;
    let path = to_os_path(&decoded);
    Ok((path, authority))
}

#[cfg(target_os = "windows")]
fn to_os_path(decoded: &str) -> String {
    let trimmed = if is_windows_drive_segment(decoded.as_bytes().get(1..).unwrap_or(b"")) {
        &decoded[1..]
    } else {
        decoded
    };
    trimmed.replace('/', "\\")
}

#[cfg(not(target_os = "windows"))]
fn to_os_path(decoded: &str) -> String {
    decoded.to_owned()
}

#[cfg(target_os = "windows")]
fn is_windows_drive_segment(bytes: &[u8]) -> bool {
    matches!(bytes, [letter, b':', ..] if letter.is_ascii_alphabetic())
}

fn percent_decode(s: &str) -> Result<String, FileUriError> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = *bytes.get(i + 1).ok_or(FileUriError::InvalidEscape)?;
            let lo = *bytes.get(i + 2).ok_or(FileUriError::InvalidEscape)?;
            let hi = (hi as char).to_digit(16).ok_or(FileUriError::InvalidEscape)?;
            let lo = (lo as char).to_digit(16).ok_or(FileUriError::InvalidEscape)?;
            out.push((hi * 16 + lo) as u8);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|_| FileUriError::InvalidUtf8)
}

/// Writes the `file://` URI for `path` (with authority `hostname`) into `sink`.
///
/// On Windows, `\` is converted to `/` and a leading drive letter is given its
/// own `/` prefix (`C:\Users` -> `file:///C:/Users`). If `path` is relative,
/// the `//authority` part is omitted entirely (matching the spec's "if path
/// is relative, omit authority").
pub fn write_file_uri(path: &str, hostname: &str, sink: &mut dyn fmt::Write) -> fmt::Result {
    sink.write_str("file:")?;
    let is_relative = is_relative_path(path);
    if !is_relative {
        sink.write_str("//")?;
        sink.write_str(hostname)?;
    }
    for segment in normalized_segments(path) {
        if !segment.is_empty() || !is_relative {
            sink.write_char('/')?;
        }
        percent_encode_segment(segment, sink)?;
    }
    Ok(())
}

#[cfg(target_os = "windows")]
fn is_relative_path(path: &str) -> bool {
    !(path.starts_with('/') || path.starts_with('\\') || is_windows_drive_segment(path.as_bytes()))
}

#[cfg(not(target_os = "windows"))]
fn is_relative_path(path: &str) -> bool {
    !path.starts_with('/')
}

#[cfg(target_os = "windows")]
fn normalized_segments(path: &str) -> std::str::Split<'_, char> {
    // Leak-free: we can't return an owned-replaced string from this fn without
    // allocating, so callers on Windows get `\`-aware splitting directly.
    path.split(|c| c == '/' || c == '\\')
}

#[cfg(not(target_os = "windows"))]
fn normalized_segments(path: &str) -> std::str::Split<'_, char> {
    path.split('/')
}

fn percent_encode_segment(segment: &str, sink: &mut dyn fmt::Write) -> fmt::Result {
    for byte in segment.bytes() {
        if is_pct_unreserved(byte) {
            sink.write_char(byte as char)?;
        } else {
            write!(sink, "%{byte:02X}")?;
        }
    }
    Ok(())
}

fn is_pct_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~' | b':')
}

/// Convenience wrapper around [`write_file_uri`] that allocates a `String`.
#[must_use]
pub fn to_file_uri_string(path: &str, hostname: &str) -> String {
    let mut s = String::new();
    write_file_uri(path, hostname, &mut s).expect("String writes are infallible");
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_simple() {
        let uri = to_file_uri_string("/tmp/a b", "");
        assert_eq!(uri, "file:///tmp/a%20b");
        let (path, host) = parse_file_uri(&uri).unwrap();
        assert_eq!(path, "/tmp/a b");
        assert_eq!(host, "");
    }

    #[test]
    fn parse_rejects_bad_escape() {
        assert_eq!(
            parse_file_uri("file:///tmp/a%2").unwrap_err(),
            FileUriError::InvalidEscape
        );
        assert_eq!(
            parse_file_uri("file:///tmp/a%zz").unwrap_err(),
            FileUriError::InvalidEscape
        );
    }

    #[test]
    fn parse_rejects_non_file_scheme() {
        assert_eq!(
            parse_file_uri("http://example.org/").unwrap_err(),
            FileUriError::NotAFileUri
        );
    }

    #[test]
    fn parse_preserves_hostname() {
        let (path, host) = parse_file_uri("file://example.org/tmp/a").unwrap();
        assert_eq!(path, "/tmp/a");
        assert_eq!(host, "example.org");
    }
}
