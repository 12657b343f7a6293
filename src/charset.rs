//! Charset detection.
//!
//! Resolution precedence: a host-dictated charset wins outright; otherwise a
//! byte-order mark; otherwise a literal `@charset "name";` at byte 0 (only
//! possible once a BOM has ruled out UTF-16/32, since the literal scan
//! assumes an ASCII-compatible prefix); otherwise a referring-document hint;
//! otherwise UTF-8.

use crate::error::CssError;

/// Where a charset decision came from, mirroring the source's
/// `source` field so later detection passes know whether to keep looking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharsetSource {
    /// The host told us outright; nothing further to detect.
    Dictated,
    /// Found in the document itself (BOM or `@charset`).
    Document,
    /// Taken from the referring document's hint.
    ReferringDocument,
    /// No information was available; UTF-8 default applies.
    Default,
}

/// The detected charset name (an IANA/MIME charset label, e.g. `"UTF-8"`).
pub type Charset = String;

/// Detect the charset of `data` given the charset decision already in
/// effect (`source`). Returns the (possibly unchanged) charset and source,
/// or `CssError::NeedData` if fewer than 4 bytes are available and no prior
/// decision can be trusted. Falls back to UTF-8 if detection reaches the
/// end of its precedence chain without a usable encoding.
pub fn extract_charset(
    data: &[u8],
    current: Option<&Charset>,
    source: CharsetSource,
    referring_document_hint: Option<&Charset>,
) -> Result<(Charset, CharsetSource), CssError> {
    if source == CharsetSource::Dictated {
        return Ok((
            current.cloned().expect("dictated source always carries a charset"),
            CharsetSource::Dictated,
        ));
    }

    if data.len() < 4 {
        return Err(CssError::NeedData);
    }

    if let Some(bom) = detect_bom(data) {
        return Ok((bom.charset_name().to_string(), CharsetSource::Document));
    }

    if let Some(name) = detect_literal_charset_rule(data) {
        return Ok((name, CharsetSource::Document));
    }

    if source != CharsetSource::Default {
        // Already decided by something other than the default fallback
        // (e.g. a prior pass already settled on a referring-document hint);
        // nothing further to do.
        return Ok((
            current.cloned().expect("non-default source always carries a charset"),
            source,
        ));
    }

    if let Some(hint) = referring_document_hint {
        return Ok((hint.clone(), CharsetSource::ReferringDocument));
    }

    Ok(("UTF-8".to_string(), CharsetSource::Default))
}

/// A recognized byte-order mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bom {
    Utf32Be,
    Utf32Le,
    Utf16Be,
    Utf16Le,
    Utf8,
}

impl Bom {
    fn charset_name(self) -> &'static str {
        match self {
            Bom::Utf32Be => "UTF-32BE",
            Bom::Utf32Le => "UTF-32LE",
            Bom::Utf16Be => "UTF-16BE",
            Bom::Utf16Le => "UTF-16LE",
            Bom::Utf8 => "UTF-8",
        }
    }
}

fn detect_bom(data: &[u8]) -> Option<Bom> {
    // 4-byte BOMs must be checked before the 2-byte UTF-16 BOMs they share a
    // prefix with (`FF FE 00 00` vs `FF FE`).
    if data.starts_with(&[0x00, 0x00, 0xFE, 0xFF]) {
        return Some(Bom::Utf32Be);
    }
    if data.starts_with(&[0xFF, 0xFE, 0x00, 0x00]) {
        return Some(Bom::Utf32Le);
    }
    if data.starts_with(&[0xFE, 0xFF]) {
        return Some(Bom::Utf16Be);
    }
    if data.starts_with(&[0xFF, 0xFE]) {
        return Some(Bom::Utf16Le);
    }
    if data.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return Some(Bom::Utf8);
    }
    None
}

/// Scan for `@charset "name";` at byte 0, assuming an ASCII-compatible
/// prefix (no BOM was found, so this scan is only reached for single-byte
/// encodings).
fn detect_literal_charset_rule(data: &[u8]) -> Option<Charset> {
    const PREFIX: &[u8] = b"@charset \"";
    if !data.starts_with(PREFIX) {
        return None;
    }
    let rest = &data[PREFIX.len()..];
    let end = rest.iter().position(|&b| b == b'"')?;
    if rest.get(end + 1) != Some(&b';') {
        return None;
    }
    std::str::from_utf8(&rest[..end])
        .ok()
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_input_needs_data() {
        let result = extract_charset(&[0xEF, 0xBB], None, CharsetSource::Default, None);
        assert_eq!(result, Err(CssError::NeedData));
    }

    #[test]
    fn utf8_bom_detected() {
        let data = [0xEF, 0xBB, 0xBF, b'/', b'*'];
        let (charset, source) =
            extract_charset(&data, None, CharsetSource::Default, None).unwrap();
        assert_eq!(charset, "UTF-8");
        assert_eq!(source, CharsetSource::Document);
    }

    #[test]
    fn literal_charset_rule_detected() {
        let data = b"@charset \"ISO-8859-1\";\nbody{}";
        let (charset, source) =
            extract_charset(data, None, CharsetSource::Default, None).unwrap();
        assert_eq!(charset, "ISO-8859-1");
        assert_eq!(source, CharsetSource::Document);
    }

    #[test]
    fn dictated_charset_is_never_overridden() {
        let dictated = "Shift_JIS".to_string();
        let data = [0xEF, 0xBB, 0xBF, b'/', b'*'];
        let (charset, source) =
            extract_charset(&data, Some(&dictated), CharsetSource::Dictated, None).unwrap();
        assert_eq!(charset, "Shift_JIS");
        assert_eq!(source, CharsetSource::Dictated);
    }

    #[test]
    fn no_bom_no_charset_no_hint_defaults_to_utf8() {
        let data = b"body { color: red; }";
        let (charset, source) =
            extract_charset(data, None, CharsetSource::Default, None).unwrap();
        assert_eq!(charset, "UTF-8");
        assert_eq!(source, CharsetSource::Default);
    }

    #[test]
    fn referring_document_hint_used_when_no_document_charset() {
        let hint = "windows-1252".to_string();
        let data = b"body { color: red; }";
        let (charset, source) =
            extract_charset(data, None, CharsetSource::Default, Some(&hint)).unwrap();
        assert_eq!(charset, "windows-1252");
        assert_eq!(source, CharsetSource::ReferringDocument);
    }
}
