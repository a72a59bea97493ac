//! RFC 3986 URI parsing, resolution and relativisation.
//!
//! [`UriView`] is a borrowed, non-owning decomposition of a URI string into its
//! scheme/authority/path/query/fragment components. All operations here are
//! allocation-free: resolving a relative reference against a base, or
//! relativising an absolute URI against a base, produce a view that may borrow
//! from *both* inputs at once (the `path_prefix` slot carries whichever slice
//! or up-reference count is needed to reconstruct the full path on write).

mod file_uri;

use std::borrow::Cow;
use std::fmt;

pub use file_uri::{parse_file_uri, to_file_uri_string, write_file_uri, FileUriError};

/// The part of a [`UriView`]'s path that comes from elsewhere than its own
/// `path` field: either a borrowed slice of the base URI's path (used when
/// resolving a relative reference) or a count of `../` up-references (used
/// when relativising an absolute URI against a base).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathPrefix<'a> {
    #[default]
    None,
    /// A slice of a base URI's path, shared up to (and including) its last `/`.
    Shared(&'a str),
    /// The number of `../` segments needed to climb from the base to the
    /// point where the remaining `path` should be appended.
    UpRefs(usize),
}

/// A borrowed decomposition of a URI string, following RFC 3986 §3.
///
/// Every field is `None` when absent from the source (not merely empty):
/// `http://example.org` has an authority and an empty path, while
/// `http://example.org/` has authority and path `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriView<'a> {
    pub scheme: Option<&'a str>,
    pub authority: Option<&'a str>,
    pub path_prefix: PathPrefix<'a>,
    pub path: Cow<'a, str>,
    pub query: Option<&'a str>,
    pub fragment: Option<&'a str>,
}

impl Default for UriView<'_> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a> UriView<'a> {
    /// An empty view: all fields absent. Returned by [`parse`] on failure and
    /// used as the "not within base" sentinel by [`relativise`] when `uri`
    /// equals `base`.
    pub const fn empty() -> Self {
        Self {
            scheme: None,
            authority: None,
            path_prefix: PathPrefix::None,
            path: Cow::Borrowed(""),
            query: None,
            fragment: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.scheme.is_none()
            && self.authority.is_none()
            && matches!(self.path_prefix, PathPrefix::None)
            && self.path.is_empty()
            && self.query.is_none()
            && self.fragment.is_none()
    }

    pub const fn is_absolute(&self) -> bool {
        self.scheme.is_some()
    }
}

/// Returns true iff `s` begins with the URI scheme grammar
/// (`ALPHA (ALPHA | DIGIT | "+" | "-" | ".")*`) followed by `:`.
#[must_use]
pub fn has_scheme(s: &str) -> bool {
    scheme_len(s.as_bytes()).is_some()
}

fn scheme_len(bytes: &[u8]) -> Option<usize> {
    let first = *bytes.first()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b':' => return Some(i),
            b if b.is_ascii_alphanumeric() || b == b'+' || b == b'-' || b == b'.' => i += 1,
            _ => return None,
        }
    }
    None
}

/// Parses a URI reference into its components. Never fails: malformed input
/// (for example an authority-looking prefix with no actual `//`) simply falls
/// back to treating the whole string as a path. `parse("")` returns
/// [`UriView::empty`].
#[must_use]
pub fn parse(s: &'_ str) -> UriView<'_> {
    let mut rest = s;
    let mut view = UriView::empty();

    if let Some(colon) = scheme_len(rest.as_bytes()) {
        view.scheme = Some(&rest[..colon]);
        rest = &rest[colon + 1..];
    }

    if let Some(after_slashes) = rest.strip_prefix("//") {
        let end = after_slashes
            .find(['/', '?', '#'])
            .unwrap_or(after_slashes.len());
        view.authority = Some(&after_slashes[..end]);
        rest = &after_slashes[end..];
    }

    let path_end = rest.find(['?', '#']).unwrap_or(rest.len());
    view.path = Cow::Borrowed(&rest[..path_end]);
    rest = &rest[path_end..];

    if let Some(r) = rest.strip_prefix('?') {
        let end = r.find('#').unwrap_or(r.len());
        view.query = Some(&r[..end]);
        rest = &r[end..];
    }

    if let Some(r) = rest.strip_prefix('#') {
        view.fragment = Some(r);
    }

    view
}

/// Returns the last `/`-terminated prefix of `path` (everything up to and
/// including the final slash), or `""` if `path` has no slash.
fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(i) => &path[..=i],
        None => "",
    }
}

/// Removes `.` and `..` segments from a merged path per RFC 3986 §5.2.4.
/// Operates on an owned buffer because segment removal is not expressible as
/// a borrow of the (non-contiguous) inputs.
fn remove_dot_segments(path: &str) -> String {
    let mut input = path.to_owned();
    let mut output = String::with_capacity(path.len());
    while !input.is_empty() {
        if let Some(r) = input
            .strip_prefix("../")
            .or_else(|| input.strip_prefix("./"))
        {
            input = r.to_owned();
        } else if input == "/." {
            output.push('/');
            input.clear();
        } else if let Some(r) = input.strip_prefix("/./") {
            input = format!("/{r}");
        } else if input == "/.." {
            pop_last_segment(&mut output);
            output.push('/');
            input.clear();
        } else if let Some(r) = input.strip_prefix("/../") {
            pop_last_segment(&mut output);
            input = format!("/{r}");
        } else if input == "." || input == ".." {
            input.clear();
        } else {
            let seg_len = input[1..].find('/').map_or(input.len(), |i| i + 1);
            output.push_str(&input[..seg_len]);
            input = input[seg_len..].to_owned();
        }
    }
    output
}

fn pop_last_segment(output: &mut String) {
    if let Some(i) = output.rfind('/') {
        output.truncate(i);
    } else {
        output.clear();
    }
}

/// Resolves a (possibly relative) URI reference against an absolute base URI,
/// following RFC 3986 §5.2.2 ("strict" resolution, i.e. ignoring any
/// backwards-compatible scheme-relative handling). The returned view borrows
/// from both `reference` and `base`; when a merge is required, `path_prefix`
/// holds the relevant slice of `base`'s path and `path` holds the (dot-segment
/// normalised) tail contributed by `reference`.
#[must_use]
pub fn resolve<'a>(reference: &'a str, base: &'a str) -> UriView<'a> {
    let r = parse(reference);
    if r.is_absolute() {
        return UriView {
            path: normalize_path(r.path),
            ..r
        };
    }
    let b = parse(base);
    let mut out = UriView::empty();
    out.scheme = b.scheme;

    if r.authority.is_some() {
        out.authority = r.authority;
        out.path = normalize_path(r.path);
        out.query = r.query;
    } else {
        out.authority = b.authority;
        if r.path.is_empty() {
            out.path = b.path;
            out.query = r.query.or(b.query);
        } else if r.path.starts_with('/') {
            out.path = normalize_path(r.path);
            out.query = r.query;
        } else {
            // merge: base authority present + empty base path -> "/" + r.path
            let merged = if b.authority.is_some() && b.path.is_empty() {
                format!("/{}", r.path)
            } else {
                format!("{}{}", dirname(&b.path), r.path)
            };
            out.path = Cow::Owned(remove_dot_segments(&merged));
            out.query = r.query;
        }
    }
    out.fragment = r.fragment;
    out
}

/// Removes `.`/`..` segments, allocating only when the path actually
/// contains one (the common case for absolute references is a no-op).
fn normalize_path(path: Cow<'_, str>) -> Cow<'_, str> {
    if path.contains("/.") || path == ".." || path == "." {
        Cow::Owned(remove_dot_segments(&path))
    } else {
        path
    }
}

/// Returns the shortest reference that, resolved against `base`, yields
/// `uri`. If `uri` and `base` differ only in scheme or authority, `uri` is
/// returned unchanged (relativising across those would change its meaning).
/// If `uri` equals `base`, an empty view is returned.
#[must_use]
pub fn relativise<'a>(uri: &'a str, base: &'a str) -> UriView<'a> {
    let u = parse(uri);
    let b = parse(base);
    if u.scheme != b.scheme || u.authority != b.authority {
        return u;
    }
    if u.path == b.path && u.query == b.query && u.fragment == b.fragment {
        return UriView::empty();
    }

    // Re-derive the path as a plain `&'a str`: `u.path`/`b.path` are always
    // `Cow::Borrowed` here (nothing upstream of a bare `parse` allocates), so
    // this never falls into the `unreachable!` arm; it just lets us keep
    // `'a` instead of being stuck with a borrow of the local `u`/`b`.
    let u_path = parse_path(uri);
    let b_path = parse_path(base);

    let u_dir = dirname(u_path);
    let b_dir = dirname(b_path);

    // Longest common directory prefix ending at a `/`.
    let common_len = u_dir
        .as_bytes()
        .iter()
        .zip(b_dir.as_bytes())
        .take_while(|(a, b)| a == b)
        .count();
    let common = &u_dir[..common_len];
    let common = &common[..dirname(common).len()];

    let remaining_base = &b_path[common.len()..];
    let up_refs = remaining_base.matches('/').count();

    UriView {
        scheme: None,
        authority: None,
        path_prefix: PathPrefix::UpRefs(up_refs),
        path: Cow::Borrowed(&u_path[common.len()..]),
        query: u.query,
        fragment: u.fragment,
    }
}

/// Extracts just the path component of `s` as a `&'a str`, bypassing the
/// `Cow` indirection of a full [`UriView`] (which would otherwise tie the
/// borrow to the temporary view rather than to `s` itself).
fn parse_path<'a>(s: &'a str) -> &'a str {
    match parse(s).path {
        Cow::Borrowed(p) => p,
        Cow::Owned(_) => unreachable!("parse() never allocates its path"),
    }
}

/// True iff `uri` has the same scheme and authority as `base` and `uri`'s
/// path begins with `base`'s path up to and including the final `/`.
#[must_use]
pub fn is_within(uri: &str, base: &str) -> bool {
    let u = parse(uri);
    let b = parse(base);
    u.scheme == b.scheme && u.authority == b.authority && u.path.starts_with(dirname(&b.path))
}

/// Number of bytes [`write`] would emit for `view`, computed without writing.
#[must_use]
pub fn string_length(view: &UriView<'_>) -> usize {
    let mut len = 0;
    if let Some(s) = view.scheme {
        len += s.len() + 1;
    }
    if let Some(a) = view.authority {
        len += 2 + a.len();
    }
    len += match view.path_prefix {
        PathPrefix::None => 0,
        PathPrefix::Shared(s) => s.len(),
        PathPrefix::UpRefs(n) => n * 3,
    };
    len += view.path.len();
    if let Some(q) = view.query {
        len += 1 + q.len();
    }
    if let Some(f) = view.fragment {
        len += 1 + f.len();
    }
    len
}

/// Writes the canonical serialisation of `view` into `sink`.
pub fn write(view: &UriView<'_>, sink: &mut dyn fmt::Write) -> fmt::Result {
    if let Some(s) = view.scheme {
        sink.write_str(s)?;
        sink.write_char(':')?;
    }
    if let Some(a) = view.authority {
        sink.write_str("//")?;
        sink.write_str(a)?;
    }
    match view.path_prefix {
        PathPrefix::None => {}
        PathPrefix::Shared(s) => sink.write_str(s)?,
        PathPrefix::UpRefs(n) => {
            for _ in 0..n {
                sink.write_str("../")?;
            }
        }
    }
    sink.write_str(&view.path)?;
    if let Some(q) = view.query {
        sink.write_char('?')?;
        sink.write_str(q)?;
    }
    if let Some(f) = view.fragment {
        sink.write_char('#')?;
        sink.write_str(f)?;
    }
    Ok(())
}

/// Convenience wrapper around [`write`] that allocates a `String`.
#[must_use]
pub fn to_string(view: &UriView<'_>) -> String {
    let mut s = String::with_capacity(string_length(view));
    write(view, &mut s).expect("String writes are infallible");
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic() {
        let v = parse("http://example.org/a/b?q#f");
        assert_eq!(v.scheme, Some("http"));
        assert_eq!(v.authority, Some("example.org"));
        assert_eq!(v.path, "/a/b");
        assert_eq!(v.query, Some("q"));
        assert_eq!(v.fragment, Some("f"));
    }

    #[test]
    fn parse_no_authority() {
        let v = parse("mailto:foo@example.org");
        assert_eq!(v.scheme, Some("mailto"));
        assert_eq!(v.authority, None);
        assert_eq!(v.path, "foo@example.org");
    }

    #[test]
    fn has_scheme_basic() {
        assert!(has_scheme("http://example.org"));
        assert!(!has_scheme("foo/bar"));
        assert!(!has_scheme("//example.org"));
    }

    #[test]
    fn resolve_relative_path() {
        let resolved = resolve("foo/bar", "http://example.org/a/b");
        assert_eq!(to_string(&resolved), "http://example.org/a/foo/bar");
    }

    #[test]
    fn resolve_absolute_path() {
        let resolved = resolve("/foo/bar", "http://example.org/a/b");
        assert_eq!(to_string(&resolved), "http://example.org/foo/bar");
    }

    #[test]
    fn resolve_fragment_only() {
        let resolved = resolve("#frag", "http://example.org/a/b");
        assert_eq!(to_string(&resolved), "http://example.org/a/b#frag");
    }

    #[test]
    fn resolve_dot_segments() {
        let resolved = resolve("../c", "http://example.org/a/b/");
        assert_eq!(to_string(&resolved), "http://example.org/a/c");
    }

    #[test]
    fn relativise_round_trip() {
        let base = "http://example.org/a/b";
        let uri = "http://example.org/a/c";
        let rel = relativise(uri, base);
        assert!(is_within(uri, base));
        let back = resolve(&to_string(&rel), base);
        assert_eq!(to_string(&back), uri);
    }

    #[test]
    fn relativise_same_uri_is_empty() {
        let base = "http://example.org/a/b";
        assert!(relativise(base, base).is_empty());
    }

    #[test]
    fn relativise_different_authority_unchanged() {
        let base = "http://example.org/a/b";
        let uri = "http://other.org/a/b";
        let rel = relativise(uri, base);
        assert_eq!(to_string(&rel), uri);
    }

    #[test]
    fn is_within_basic() {
        assert!(is_within(
            "http://example.org/a/c",
            "http://example.org/a/b"
        ));
        assert!(!is_within(
            "http://example.org/x/c",
            "http://example.org/a/b"
        ));
    }
}
