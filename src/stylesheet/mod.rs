//! Stylesheet assembly: turn raw source bytes into an ordered rule list
//! whose declarations carry bytecode emitted by [`crate::parse`].
//!
//! Built on the kept CSS-Syntax-Level-3 grammar skeleton
//! ([`crate::parser`]/[`crate::tokenizer`]): this module drives charset
//! detection, tokenizing, and the generic rule/declaration parse, then
//! resolves each selector via [`crate::selector::parse_selector`] and each
//! declaration via [`crate::parse::parse_property`].

use crate::bytecode::{self, Flags, Opv};
use crate::charset::{self, Charset, CharsetSource};
use crate::error::CssError;
use crate::parse::{self, ParsedValue, PropertyValue};
use crate::parser::{AtRule, CSSParser, ComponentValue, Declaration as RawDeclaration, StyleRule as RawStyleRule};
use crate::properties;
use crate::selector::{parse_selector, ParsedSelector};
use crate::strings::Dictionary;
use crate::tokenizer::{CSSToken, CSSTokenizer};
use crate::warning::warn_once;

/// Which actor authored a sheet (`spec.md` §3/§4.D). Used with a
/// declaration's `!important` flag to rank the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StyleOrigin {
    /// The implementation's default rules.
    UserAgent,
    /// Rules supplied by the end user (e.g. a browser accessibility sheet).
    User,
    /// Rules supplied by the document's author.
    Author,
}

impl StyleOrigin {
    /// The cascade's base rank for this origin (CSS 2.1 Table 6.1, before
    /// `!important` inversion).
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            StyleOrigin::UserAgent => 0,
            StyleOrigin::User => 1,
            StyleOrigin::Author => 2,
        }
    }
}

/// CSS level this sheet is parsed against. This engine only ever builds one
/// level, but `create`'s signature names the parameter (`spec.md` §4.C) so a
/// future CSS3-aware reader can be dispatched on it without breaking
/// callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CssLevel {
    /// CSS 2.1.
    #[default]
    Css21,
}

/// Bitmask over the CSS 2.1 media types (`spec.md` §4.C). An `@media` block
/// or a whole sheet is only active when its mask shares a bit with the
/// caller's active media set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MediaSet(u16);

impl MediaSet {
    /// `all`.
    pub const ALL: MediaSet = MediaSet(0b0000_0000_0001);
    /// `screen`.
    pub const SCREEN: MediaSet = MediaSet(0b0000_0000_0010);
    /// `print`.
    pub const PRINT: MediaSet = MediaSet(0b0000_0000_0100);
    /// `projection`.
    pub const PROJECTION: MediaSet = MediaSet(0b0000_0000_1000);
    /// `handheld`.
    pub const HANDHELD: MediaSet = MediaSet(0b0000_0001_0000);
    /// `embossed`.
    pub const EMBOSSED: MediaSet = MediaSet(0b0000_0010_0000);
    /// `braille`.
    pub const BRAILLE: MediaSet = MediaSet(0b0000_0100_0000);
    /// `speech`.
    pub const SPEECH: MediaSet = MediaSet(0b0000_1000_0000);
    /// `aural` (CSS 2.1's predecessor name for `speech`).
    pub const AURAL: MediaSet = MediaSet(0b0001_0000_0000);
    /// `tty`.
    pub const TTY: MediaSet = MediaSet(0b0010_0000_0000);
    /// `tv`.
    pub const TV: MediaSet = MediaSet(0b0100_0000_0000);
    /// Matches nothing; the result of an unrecognized media query.
    pub const NONE: MediaSet = MediaSet(0);

    /// Every media type at once — what a sheet or block with no explicit
    /// media restriction carries.
    #[must_use]
    pub const fn all() -> MediaSet {
        MediaSet::ALL.union(MediaSet::SCREEN).union(MediaSet::PRINT)
            .union(MediaSet::PROJECTION).union(MediaSet::HANDHELD)
            .union(MediaSet::EMBOSSED).union(MediaSet::BRAILLE)
            .union(MediaSet::SPEECH).union(MediaSet::AURAL)
            .union(MediaSet::TTY).union(MediaSet::TV)
    }

    /// Union of two media sets.
    #[must_use]
    pub const fn union(self, other: MediaSet) -> MediaSet {
        MediaSet(self.0 | other.0)
    }

    /// Whether `self` and `other` share at least one media type.
    #[must_use]
    pub const fn intersects(self, other: MediaSet) -> bool {
        self.0 & other.0 != 0
    }

    fn from_ident(name: &str) -> Option<MediaSet> {
        Some(match_ascii_lower(name)?)
    }
}

fn match_ascii_lower(name: &str) -> Option<MediaSet> {
    let lower = name.to_ascii_lowercase();
    Some(match lower.as_str() {
        "all" => MediaSet::ALL,
        "screen" => MediaSet::SCREEN,
        "print" => MediaSet::PRINT,
        "projection" => MediaSet::PROJECTION,
        "handheld" => MediaSet::HANDHELD,
        "embossed" => MediaSet::EMBOSSED,
        "braille" => MediaSet::BRAILLE,
        "speech" => MediaSet::SPEECH,
        "aural" => MediaSet::AURAL,
        "tty" => MediaSet::TTY,
        "tv" => MediaSet::TV,
        _ => return None,
    })
}

/// One selector group plus its compiled declaration bytecode (`spec.md`
/// §3 "Style block").
#[derive(Debug, Clone)]
pub struct StyleRule {
    /// The selectors this rule's style block applies through (comma-group).
    pub selectors: Vec<ParsedSelector>,
    /// The compiled declaration bytecode: a sequence of OPV-headed
    /// declarations, some list-valued, back to back.
    pub bytecode: Vec<u8>,
    /// Insertion order within the sheet; the cascade's final tiebreaker.
    pub rule_index: u32,
}

/// A tagged rule (`spec.md` §3 "Rule").
#[derive(Debug, Clone)]
pub enum Rule {
    /// A selector group plus declarations.
    Style(StyleRule),
    /// `@media`: a sub-list of rules gated by a media mask.
    Media {
        /// The block's media mask.
        media: MediaSet,
        /// Rules nested inside the block.
        rules: Vec<Rule>,
    },
    /// `@import`: a URI plus an optional media restriction. The imported
    /// sheet itself is not fetched by this engine (`spec.md` §1 Non-goals);
    /// the host resolves and loads it out of band.
    Import {
        /// The (unresolved, or resolver-absolutized) import URI.
        uri: String,
        /// The media restriction named on the `@import`, if any.
        media: MediaSet,
        /// Insertion order.
        rule_index: u32,
    },
}

/// An ordered CSS 2.1 stylesheet (`spec.md` §3 "Stylesheet", §4.C).
///
/// Built via [`Stylesheet::create`], fed with [`Stylesheet::append_data`],
/// and finalized with [`Stylesheet::data_done`]. `append_data` may be
/// called more than once to stream source bytes in; this implementation
/// buffers them and performs the actual tokenize/parse pass at
/// `data_done`, since the kept grammar skeleton operates over a complete
/// token vector rather than incrementally.
pub struct Stylesheet {
    level: CssLevel,
    url: String,
    title: Option<String>,
    origin: StyleOrigin,
    media: MediaSet,
    inline: bool,
    quirks: bool,
    dict: Dictionary,
    rules: Vec<Rule>,
    next_rule_index: u32,
    buffer: Vec<u8>,
    default_charset: Option<Charset>,
    referring_document_hint: Option<Charset>,
    charset: Option<(Charset, CharsetSource)>,
    done: bool,
}

impl Stylesheet {
    /// Begin assembling a new sheet (`spec.md` §4.C `create`).
    #[must_use]
    pub fn create(
        level: CssLevel,
        default_charset: Option<&str>,
        url: impl Into<String>,
        title: Option<String>,
        origin: StyleOrigin,
        media: MediaSet,
        inline: bool,
        quirks: bool,
    ) -> Stylesheet {
        Stylesheet {
            level,
            url: url.into(),
            title,
            origin,
            media,
            inline,
            quirks,
            dict: Dictionary::new(),
            rules: Vec::new(),
            next_rule_index: 0,
            buffer: Vec::new(),
            default_charset: default_charset.map(str::to_string),
            referring_document_hint: None,
            charset: None,
            done: false,
        }
    }

    /// Set the hint inherited from the document that references this
    /// sheet, consulted only if no document-internal charset is found
    /// (`spec.md` §6 precedence step 4).
    pub fn set_referring_document_hint(&mut self, hint: impl Into<String>) {
        self.referring_document_hint = Some(hint.into());
    }

    /// This sheet's origin.
    #[must_use]
    pub fn origin(&self) -> StyleOrigin {
        self.origin
    }

    /// This sheet's media restriction.
    #[must_use]
    pub fn media(&self) -> MediaSet {
        self.media
    }

    /// The CSS level this sheet was created against.
    #[must_use]
    pub fn level(&self) -> CssLevel {
        self.level
    }

    /// This sheet's URL, as passed to [`Stylesheet::create`].
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// This sheet's title, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Whether this sheet came from an inline `style` attribute rather than
    /// a linked/embedded sheet.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.inline
    }

    /// Whether this sheet is parsed under quirks-mode relaxations.
    #[must_use]
    pub fn is_quirks(&self) -> bool {
        self.quirks
    }

    /// This sheet's rules, in insertion order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// This sheet's string dictionary (shared with every `StringRef` its
    /// bytecode carries).
    #[must_use]
    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    /// Mutable access to this sheet's string dictionary, for callers
    /// resolving `StringRef`s read back out of the cascade.
    pub fn dictionary_mut(&mut self) -> &mut Dictionary {
        &mut self.dict
    }

    /// Append more source bytes (`spec.md` §4.C `append_data`). May be
    /// called repeatedly before [`Stylesheet::data_done`]. Returns
    /// `Err(CssError::NeedData)` only while charset detection cannot yet
    /// proceed (fewer than four bytes buffered and no charset already
    /// dictated); the caller should supply more bytes and call again.
    pub fn append_data(&mut self, bytes: &[u8]) -> Result<(), CssError> {
        if self.done {
            return Err(CssError::BadParam("append_data called after data_done"));
        }
        self.buffer.extend_from_slice(bytes);
        if self.charset.is_none() {
            match self.detect_charset() {
                Ok(resolved) => self.charset = Some(resolved),
                Err(CssError::NeedData) => return Err(CssError::NeedData),
                Err(other) => return Err(other),
            }
        }
        Ok(())
    }

    fn detect_charset(&self) -> Result<(Charset, CharsetSource), CssError> {
        let (current, source) = match &self.default_charset {
            Some(name) => (Some(name.clone()), CharsetSource::Dictated),
            None => (None, CharsetSource::Default),
        };
        charset::extract_charset(&self.buffer, current.as_ref(), source, self.referring_document_hint.as_ref())
    }

    /// Complete assembly (`spec.md` §4.C `data_done`). Resolves any
    /// remaining charset decision, decodes the buffered bytes, tokenizes,
    /// and parses the full rule list. After this call, `append_data` must
    /// not be called again.
    pub fn data_done(&mut self) -> Result<(), CssError> {
        if self.done {
            return Err(CssError::BadParam("data_done called twice"));
        }
        self.done = true;

        let (charset, _source) = match &self.charset {
            Some(resolved) => resolved.clone(),
            None => self.detect_charset()?,
        };

        let text = if charset.eq_ignore_ascii_case("UTF-8") {
            String::from_utf8_lossy(&self.buffer).into_owned()
        } else {
            warn_once(
                "stylesheet",
                &format!("charset {charset} has no transcoder in this engine; decoding as UTF-8"),
            );
            String::from_utf8_lossy(&self.buffer).into_owned()
        };

        let mut tokenizer = CSSTokenizer::new(text);
        tokenizer.run();
        let tokens = tokenizer.into_tokens();
        let raw = CSSParser::new(tokens).parse_stylesheet();

        let mut seen_charset = false;
        let mut seen_non_import_non_charset = false;

        for raw_rule in raw.rules {
            match raw_rule {
                crate::parser::Rule::Style(style_rule) => {
                    seen_non_import_non_charset = true;
                    if let Some(rule) = self.compile_style_rule(style_rule) {
                        self.rules.push(Rule::Style(rule));
                    }
                }
                crate::parser::Rule::At(at_rule) => {
                    self.handle_at_rule(at_rule, &mut seen_charset, &mut seen_non_import_non_charset);
                }
            }
        }

        Ok(())
    }

    /// Release this sheet's rules and interned strings. A no-op beyond
    /// ordinary drop semantics; kept as an explicit operation to mirror
    /// `spec.md` §4.C's public surface for callers translating from the
    /// handle-based original contract.
    pub fn destroy(self) {}

    fn handle_at_rule(&mut self, at_rule: AtRule, seen_charset: &mut bool, seen_other: &mut bool) {
        match at_rule.name.to_ascii_lowercase().as_str() {
            "charset" => {
                if *seen_charset || *seen_other {
                    warn_once("stylesheet", "@charset must be the first rule; dropping a later one");
                    return;
                }
                *seen_charset = true;
                // The charset decision was already made byte-level in
                // `detect_charset`; this rule is consumed for ordering
                // validation only.
            }
            "import" => {
                if *seen_other {
                    warn_once("stylesheet", "@import must precede all rules but @charset; dropping a late one");
                    return;
                }
                let Some((uri, media)) = parse_import_prelude(&at_rule.prelude) else {
                    warn_once("stylesheet", "malformed @import prelude; dropping");
                    return;
                };
                let rule_index = self.next_index();
                self.rules.push(Rule::Import { uri, media, rule_index });
            }
            "media" => {
                *seen_other = true;
                let media = parse_media_prelude(&at_rule.prelude);
                let Some(block) = at_rule.block else {
                    warn_once("stylesheet", "@media with no block; dropping");
                    return;
                };
                let tokens = flatten(&block);
                let inner = CSSParser::new(tokens).parse_stylesheet();
                let mut nested = Vec::new();
                for inner_rule in inner.rules {
                    match inner_rule {
                        crate::parser::Rule::Style(style_rule) => {
                            if let Some(rule) = self.compile_style_rule(style_rule) {
                                nested.push(Rule::Style(rule));
                            }
                        }
                        crate::parser::Rule::At(_) => {
                            warn_once("stylesheet", "nested at-rules inside @media are not supported; dropping");
                        }
                    }
                }
                self.rules.push(Rule::Media { media, rules: nested });
            }
            "font-face" | "page" => {
                *seen_other = true;
                warn_once("stylesheet", &format!("@{} is recognized but not applied by this engine", at_rule.name));
            }
            other => {
                *seen_other = true;
                warn_once("stylesheet", &format!("unrecognized at-rule @{other}; dropping"));
            }
        }
    }

    fn next_index(&mut self) -> u32 {
        let index = self.next_rule_index;
        self.next_rule_index += 1;
        index
    }

    fn compile_style_rule(&mut self, raw: RawStyleRule) -> Option<StyleRule> {
        let mut selectors = Vec::with_capacity(raw.selectors.len());
        for selector in &raw.selectors {
            match parse_selector(&selector.text) {
                Some(parsed) => selectors.push(parsed),
                None => {
                    warn_once("stylesheet", &format!("unparseable selector `{}`; dropping rule", selector.text));
                    return None;
                }
            }
        }
        if selectors.is_empty() {
            return None;
        }

        let mut bytecode = Vec::new();
        for decl in raw.declarations {
            self.compile_declaration(&decl, &mut bytecode);
        }

        let rule_index = self.next_index();
        Some(StyleRule { selectors, bytecode, rule_index })
    }

    fn compile_declaration(&mut self, decl: &RawDeclaration, out: &mut Vec<u8>) {
        let name = decl.name.to_ascii_lowercase();
        if !parse::is_known_property(&name) {
            warn_once("stylesheet", &format!("unrecognized property `{name}`; dropping declaration"));
            return;
        }
        let parsed = match parse::parse_property(&mut self.dict, &name, &decl.value) {
            Ok(parsed) => parsed,
            Err(CssError::Invalid { property }) => {
                warn_once("stylesheet", &format!("invalid value for `{property}`; dropping declaration"));
                return;
            }
            Err(_) => return,
        };
        let base_flags = if decl.important { Flags::IMPORTANT } else { Flags::NONE };
        match parsed {
            PropertyValue::Inherit(opcodes) => {
                for opcode in opcodes {
                    let opv = Opv::build(opcode, base_flags.union(Flags::INHERIT), 0);
                    bytecode::write_declaration(out, opv, &[]);
                }
            }
            PropertyValue::Values(values) => {
                for (opcode, value) in values {
                    write_value(out, opcode, base_flags, value);
                }
            }
        }
    }
}

fn write_value(out: &mut Vec<u8>, opcode: crate::bytecode::opcodes::Opcode, flags: Flags, value: ParsedValue) {
    match value {
        ParsedValue::Keyword(code) => {
            bytecode::write_declaration(out, Opv::build(opcode, flags, code), &[]);
            // `quotes: none`/`counter-reset: none` share their keyword code
            // with the list sentinel (`properties::list_sentinel`), so a
            // reader must see list framing after every list-grammar OPV
            // regardless of whether a list actually follows. Append an
            // empty list (just the terminator) here to keep that true.
            if properties::is_list_grammar(opcode) && code == properties::list_sentinel(opcode) {
                out.extend_from_slice(&code.to_le_bytes());
            }
        }
        ParsedValue::Value(code, operands) => {
            bytecode::write_declaration(out, Opv::build(opcode, flags, code), &operands);
        }
        ParsedValue::List(entries) => {
            let sentinel = properties::list_sentinel(opcode);
            let opv = Opv::build(opcode, flags, sentinel);
            out.extend_from_slice(&opv.to_le_bytes());
            let refs: Vec<(u16, &[crate::bytecode::Operand])> =
                entries.iter().map(|(code, ops)| (*code, ops.as_slice())).collect();
            bytecode::write_list(out, &refs, sentinel);
        }
    }
}

/// `@import url(...) medium-list;` or `@import "url" medium-list;`.
fn parse_import_prelude(prelude: &[ComponentValue]) -> Option<(String, MediaSet)> {
    let mut iter = prelude.iter().filter(|cv| !is_whitespace(cv));
    let first = iter.next()?;
    let uri = match first {
        ComponentValue::Token(CSSToken::Url(url)) => url.clone(),
        ComponentValue::Token(CSSToken::String(s)) => s.clone(),
        _ => return None,
    };
    let rest: Vec<ComponentValue> = iter.cloned().collect();
    let media = if rest.is_empty() { MediaSet::all() } else { parse_media_prelude(&rest) };
    Some((uri, media))
}

fn parse_media_prelude(prelude: &[ComponentValue]) -> MediaSet {
    let mut mask = MediaSet::NONE;
    for cv in prelude {
        if let ComponentValue::Token(CSSToken::Ident(name)) = cv {
            if let Some(bit) = MediaSet::from_ident(name) {
                mask = mask.union(bit);
            }
        }
    }
    if mask == MediaSet::NONE { MediaSet::all() } else { mask }
}

fn is_whitespace(cv: &ComponentValue) -> bool {
    matches!(cv, ComponentValue::Token(CSSToken::Whitespace))
}

/// Reconstruct a flat token stream from a block's component values, the
/// inverse of [`crate::parser::parser::CSSParser`]'s
/// consume-a-simple-block/consume-a-function algorithms, so an `@media`
/// block's contents can be re-parsed as a nested rule list.
fn flatten(values: &[ComponentValue]) -> Vec<CSSToken> {
    let mut out = Vec::new();
    flatten_into(values, &mut out);
    out.push(CSSToken::EOF);
    out
}

fn flatten_into(values: &[ComponentValue], out: &mut Vec<CSSToken>) {
    for value in values {
        match value {
            ComponentValue::Token(token) => out.push(token.clone()),
            ComponentValue::Function { name, value } => {
                out.push(CSSToken::Function(name.clone()));
                flatten_into(value, out);
                out.push(CSSToken::RightParen);
            }
            ComponentValue::Block { token, value } => {
                let (open, close) = match token {
                    '{' => (CSSToken::LeftBrace, CSSToken::RightBrace),
                    '[' => (CSSToken::LeftBracket, CSSToken::RightBracket),
                    '(' => (CSSToken::LeftParen, CSSToken::RightParen),
                    _ => continue,
                };
                out.push(open);
                flatten_into(value, out);
                out.push(close);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(css: &str) -> Stylesheet {
        let mut sheet = Stylesheet::create(
            CssLevel::Css21,
            Some("UTF-8"),
            "test.css",
            None,
            StyleOrigin::Author,
            MediaSet::all(),
            false,
            false,
        );
        sheet.append_data(css.as_bytes()).expect("append");
        sheet.data_done().expect("data_done");
        sheet
    }

    #[test]
    fn simple_rule_produces_one_style_rule() {
        let sheet = build("p { color: red; }");
        assert_eq!(sheet.rules().len(), 1);
        match &sheet.rules()[0] {
            Rule::Style(rule) => {
                assert_eq!(rule.selectors.len(), 1);
                assert!(!rule.bytecode.is_empty());
            }
            _ => panic!("expected a style rule"),
        }
    }

    #[test]
    fn short_input_needs_more_data() {
        let mut sheet = Stylesheet::create(
            CssLevel::Css21,
            None,
            "test.css",
            None,
            StyleOrigin::Author,
            MediaSet::all(),
            false,
            false,
        );
        assert_eq!(sheet.append_data(&[0xEF, 0xBB]), Err(CssError::NeedData));
        assert!(sheet.append_data(&[0xBF, b'p']).is_ok());
    }

    #[test]
    fn unknown_property_is_dropped_without_failing_rule() {
        let sheet = build("p { color: red; frobnicate: 1; font-size: 12px; }");
        match &sheet.rules()[0] {
            Rule::Style(rule) => assert!(!rule.bytecode.is_empty()),
            _ => panic!("expected a style rule"),
        }
    }

    #[test]
    fn media_block_gates_nested_rules() {
        let sheet = build("@media print { p { color: red; } }");
        match &sheet.rules()[0] {
            Rule::Media { media, rules } => {
                assert_eq!(*media, MediaSet::PRINT);
                assert_eq!(rules.len(), 1);
            }
            _ => panic!("expected a media rule"),
        }
    }

    #[test]
    fn late_import_is_dropped_with_warning() {
        let sheet = build("p { color: red; } @import url(late.css);");
        assert_eq!(sheet.rules().len(), 1);
    }

    #[test]
    fn import_rule_carries_uri_and_media() {
        let sheet = build("@import url(foo.css) screen;");
        match &sheet.rules()[0] {
            Rule::Import { uri, media, .. } => {
                assert_eq!(uri, "foo.css");
                assert_eq!(*media, MediaSet::SCREEN);
            }
            _ => panic!("expected an import rule"),
        }
    }

    #[test]
    fn invalid_selector_drops_whole_rule() {
        let sheet = build("div ~ p { color: red; } span { color: blue; }");
        assert_eq!(sheet.rules().len(), 1);
    }
}
