//! The property registry: for every longhand opcode, how its value is
//! spelled in CSS source and what operand(s) follow its OPV header.
//! This is the single source of truth both the property parsers and
//! the cascade's apply step read from, so the
//! `(opcode, value) -> operand schema` contract only has to be stated
//! once.
//!
//! Most CSS 2.1 longhands are "keyword or length/colour", which
//! [`Grammar`] models as data rather than as one hand-written parsing
//! function per property. A handful of properties — shorthand
//! expansion aside — have grammars too irregular to table-drive (`azimuth`,
//! `clip`, `content`, `quotes`, `counter-increment`/`counter-reset`,
//! `font-family`/`voice-family`, `line-height`, `font-weight`,
//! `border-spacing`, `play-during`, `text-decoration`); those get a
//! dedicated [`Grammar`] discriminant and a dedicated parser function in
//! [`crate::parse`], but still list their opcode here so lookup by name
//! stays uniform.

use crate::bytecode::opcodes::Opcode;
use crate::bytecode::units::UnitCategory;

/// How a longhand property's value is written in CSS source.
#[derive(Debug, Clone, Copy)]
pub enum Grammar {
    /// A closed set of keywords, nothing else.
    Keyword(&'static [(&'static str, u16)]),
    /// A keyword set, or else a number with an optionally-required unit.
    Numeric(Numeric),
    /// A colour, or a property-specific extra keyword (`invert` for
    /// `outline-color`).
    Colour {
        /// Keywords accepted in addition to named/hex colours.
        extra_keywords: &'static [(&'static str, u16)],
    },
    /// `none`, or a `url(...)`.
    UriOrNone,
    /// `azimuth`: angle or positional keywords, optionally combined with
    /// `behind`.
    Azimuth,
    /// `background-position`: one or two keyword/length/percentage
    /// values (horizontal then vertical, each with independent
    /// defaulting rules).
    Position2D,
    /// `elevation`: angle or a small keyword set.
    Elevation,
    /// `clip`: `auto` or `rect(...)` with up to four `auto`-or-length
    /// offsets.
    Clip,
    /// `content`: a heterogeneous sentinel-terminated list of strings,
    /// `counter()`/`counters()`, `attr()`, `open-quote`/`close-quote`/
    /// `no-open-quote`/`no-close-quote`, or `url(...)`.
    Content,
    /// `quotes`: `none`, or a sentinel-terminated list of open/close
    /// string pairs.
    Quotes,
    /// `counter-increment`/`counter-reset`: `none`, or a
    /// sentinel-terminated list of (name, integer) pairs.
    Counter,
    /// `font-family`/`voice-family`: a comma-separated list of
    /// generic-family keywords and/or quoted or unquoted family names.
    StringList,
    /// `line-height`: `normal`, a bare number (multiplier), or a
    /// length/percentage.
    LineHeight,
    /// `font-weight`: the relative/absolute keywords, or a multiple of
    /// 100 between 100 and 900.
    FontWeight,
    /// `border-spacing`: one length, or two (horizontal, then vertical).
    BorderSpacing,
    /// `play-during`: `auto`, `none`, or a `url(...)`.
    PlayDuring,
    /// `text-decoration`: `none`, or a combination of `underline` /
    /// `overline` / `line-through` / `blink`, encoded as a bitmask in
    /// the OPV value field (never `SET`; no operand follows).
    TextDecoration,
}

/// The keyword-or-number grammar shared by most length/number-valued
/// properties.
#[derive(Debug, Clone, Copy)]
pub struct Numeric {
    /// Keywords accepted instead of a number (e.g. `auto`, `normal`,
    /// `none`, the absolute font sizes, the `x-slow`..`x-fast` speech
    /// rates).
    pub keywords: &'static [(&'static str, u16)],
    /// The unit categories a `<dimension>`/`<percentage>` token may
    /// carry. [`UnitCategory::NONE`] means the value must be a bare
    /// `<number>` with no unit suffix at all (e.g. `z-index`,
    /// `orphans`, `pitch-range`).
    pub category: UnitCategory,
    /// Whether a negative value is accepted.
    pub negative_ok: bool,
    /// If set, a bare `<number>` (not just unitless zero) is accepted
    /// and re-encoded with this unit — `volume`'s `<number>` and
    /// `<percentage>` forms share one 0-100 scale, so the bare-number
    /// form is normalized to `Unit::Percentage` at parse time to keep
    /// the operand shape a pure function of `(opcode, value)`.
    pub bare_number_as: Option<crate::bytecode::units::Unit>,
    /// Inclusive range the numeric value (in its own unit, percentage
    /// points, or bare count) must fall within, if any.
    pub range: Option<(f64, f64)>,
}

impl Numeric {
    const fn plain(category: UnitCategory, negative_ok: bool) -> Numeric {
        Numeric {
            keywords: &[],
            category,
            negative_ok,
            bare_number_as: None,
            range: None,
        }
    }

    const fn with_keywords(
        keywords: &'static [(&'static str, u16)],
        category: UnitCategory,
        negative_ok: bool,
    ) -> Numeric {
        Numeric {
            keywords,
            category,
            negative_ok,
            bare_number_as: None,
            range: None,
        }
    }
}

/// One property's registry entry.
#[derive(Debug, Clone, Copy)]
pub struct PropertyDef {
    /// The longhand opcode.
    pub opcode: Opcode,
    /// How its value is parsed.
    pub grammar: Grammar,
}

const fn keyword(opcode: Opcode, table: &'static [(&'static str, u16)]) -> PropertyDef {
    PropertyDef {
        opcode,
        grammar: Grammar::Keyword(table),
    }
}

const fn numeric(opcode: Opcode, numeric: Numeric) -> PropertyDef {
    PropertyDef {
        opcode,
        grammar: Grammar::Numeric(numeric),
    }
}

const fn colour(opcode: Opcode, extra_keywords: &'static [(&'static str, u16)]) -> PropertyDef {
    PropertyDef {
        opcode,
        grammar: Grammar::Colour { extra_keywords },
    }
}

const LENGTH: UnitCategory = UnitCategory::LENGTH;
const LENGTH_PCT: UnitCategory = UnitCategory::LENGTH.union(UnitCategory::PERCENTAGE);
const TIME_PCT: UnitCategory = UnitCategory::TIME.union(UnitCategory::PERCENTAGE);
const FREQUENCY: UnitCategory = UnitCategory::FREQUENCY;
const BARE: UnitCategory = UnitCategory::NONE;

const BORDER_STYLE: &[(&str, u16)] = &[
    ("none", 0),
    ("hidden", 1),
    ("dotted", 2),
    ("dashed", 3),
    ("solid", 4),
    ("double", 5),
    ("groove", 6),
    ("ridge", 7),
    ("inset", 8),
    ("outset", 9),
];

const OUTLINE_STYLE: &[(&str, u16)] = &[
    ("none", 0),
    ("dotted", 1),
    ("dashed", 2),
    ("solid", 3),
    ("double", 4),
    ("groove", 5),
    ("ridge", 6),
    ("inset", 7),
    ("outset", 8),
];

const BORDER_WIDTH_KEYWORDS: &[(&str, u16)] = &[("thin", 0), ("medium", 1), ("thick", 2)];

const AUTO_ONLY: &[(&str, u16)] = &[("auto", 0)];
const NONE_ONLY: &[(&str, u16)] = &[("none", 0)];
const NORMAL_ONLY: &[(&str, u16)] = &[("normal", 0)];

/// Every longhand property, indexed by name for the parser and by
/// opcode for the cascade's apply step.
pub const PROPERTIES: &[PropertyDef] = &[
    // Aural properties with irregular grammars are listed with their
    // opcode and a marker `Grammar`; their actual parsing lives in
    // dedicated functions in `crate::parse`.
    PropertyDef { opcode: Opcode::Azimuth, grammar: Grammar::Azimuth },
    keyword(Opcode::BackgroundAttachment, &[("scroll", 0), ("fixed", 1)]),
    colour(Opcode::BackgroundColor, &[]),
    PropertyDef { opcode: Opcode::BackgroundImage, grammar: Grammar::UriOrNone },
    // background-position has its own two-value parser (component B);
    // registered here so name lookup and shorthand expansion both see
    // it, but its grammar is irregular enough to carry no table.
    PropertyDef { opcode: Opcode::BackgroundPosition, grammar: Grammar::Position2D },
    keyword(
        Opcode::BackgroundRepeat,
        &[("repeat", 0), ("repeat-x", 1), ("repeat-y", 2), ("no-repeat", 3)],
    ),
    keyword(Opcode::BorderCollapse, &[("collapse", 0), ("separate", 1)]),
    PropertyDef { opcode: Opcode::BorderSpacing, grammar: Grammar::BorderSpacing },
    colour(Opcode::BorderTopColor, &[]),
    colour(Opcode::BorderRightColor, &[]),
    colour(Opcode::BorderBottomColor, &[]),
    colour(Opcode::BorderLeftColor, &[]),
    keyword(Opcode::BorderTopStyle, BORDER_STYLE),
    keyword(Opcode::BorderRightStyle, BORDER_STYLE),
    keyword(Opcode::BorderBottomStyle, BORDER_STYLE),
    keyword(Opcode::BorderLeftStyle, BORDER_STYLE),
    numeric(Opcode::BorderTopWidth, Numeric::with_keywords(BORDER_WIDTH_KEYWORDS, LENGTH, false)),
    numeric(Opcode::BorderRightWidth, Numeric::with_keywords(BORDER_WIDTH_KEYWORDS, LENGTH, false)),
    numeric(Opcode::BorderBottomWidth, Numeric::with_keywords(BORDER_WIDTH_KEYWORDS, LENGTH, false)),
    numeric(Opcode::BorderLeftWidth, Numeric::with_keywords(BORDER_WIDTH_KEYWORDS, LENGTH, false)),
    numeric(Opcode::Bottom, Numeric::with_keywords(AUTO_ONLY, LENGTH_PCT, true)),
    keyword(Opcode::CaptionSide, &[("top", 0), ("bottom", 1)]),
    keyword(Opcode::Clear, &[("none", 0), ("left", 1), ("right", 2), ("both", 3)]),
    PropertyDef { opcode: Opcode::Clip, grammar: Grammar::Clip },
    colour(Opcode::Color, &[]),
    PropertyDef { opcode: Opcode::Content, grammar: Grammar::Content },
    PropertyDef { opcode: Opcode::CounterIncrement, grammar: Grammar::Counter },
    PropertyDef { opcode: Opcode::CounterReset, grammar: Grammar::Counter },
    PropertyDef { opcode: Opcode::CueAfter, grammar: Grammar::UriOrNone },
    PropertyDef { opcode: Opcode::CueBefore, grammar: Grammar::UriOrNone },
    keyword(
        Opcode::Cursor,
        &[
            ("auto", 0), ("crosshair", 1), ("default", 2), ("pointer", 3), ("move", 4),
            ("e-resize", 5), ("ne-resize", 6), ("nw-resize", 7), ("n-resize", 8),
            ("se-resize", 9), ("sw-resize", 10), ("s-resize", 11), ("w-resize", 12),
            ("text", 13), ("wait", 14), ("help", 15), ("progress", 16),
        ],
    ),
    keyword(Opcode::Direction, &[("ltr", 0), ("rtl", 1)]),
    keyword(
        Opcode::Display,
        &[
            ("none", 0), ("inline", 1), ("block", 2), ("list-item", 3), ("run-in", 4),
            ("inline-block", 5), ("table", 6), ("inline-table", 7), ("table-row-group", 8),
            ("table-header-group", 9), ("table-footer-group", 10), ("table-row", 11),
            ("table-column-group", 12), ("table-column", 13), ("table-cell", 14),
            ("table-caption", 15),
        ],
    ),
    PropertyDef { opcode: Opcode::Elevation, grammar: Grammar::Elevation },
    keyword(Opcode::EmptyCells, &[("show", 0), ("hide", 1)]),
    keyword(Opcode::Float, &[("none", 0), ("left", 1), ("right", 2)]),
    PropertyDef { opcode: Opcode::FontFamily, grammar: Grammar::StringList },
    numeric(
        Opcode::FontSize,
        Numeric::with_keywords(
            &[
                ("xx-small", 0), ("x-small", 1), ("small", 2), ("medium", 3), ("large", 4),
                ("x-large", 5), ("xx-large", 6), ("larger", 7), ("smaller", 8),
            ],
            LENGTH_PCT,
            false,
        ),
    ),
    keyword(Opcode::FontStyle, &[("normal", 0), ("italic", 1), ("oblique", 2)]),
    keyword(Opcode::FontVariant, &[("normal", 0), ("small-caps", 1)]),
    PropertyDef { opcode: Opcode::FontWeight, grammar: Grammar::FontWeight },
    numeric(Opcode::Height, Numeric::with_keywords(AUTO_ONLY, LENGTH_PCT, false)),
    numeric(Opcode::Left, Numeric::with_keywords(AUTO_ONLY, LENGTH_PCT, true)),
    numeric(Opcode::LetterSpacing, Numeric::with_keywords(NORMAL_ONLY, LENGTH, true)),
    PropertyDef { opcode: Opcode::LineHeight, grammar: Grammar::LineHeight },
    PropertyDef { opcode: Opcode::ListStyleImage, grammar: Grammar::UriOrNone },
    keyword(Opcode::ListStylePosition, &[("inside", 0), ("outside", 1)]),
    keyword(
        Opcode::ListStyleType,
        &[
            ("disc", 0), ("circle", 1), ("square", 2), ("decimal", 3),
            ("decimal-leading-zero", 4), ("lower-roman", 5), ("upper-roman", 6),
            ("lower-greek", 7), ("lower-latin", 8), ("upper-latin", 9), ("armenian", 10),
            ("georgian", 11), ("lower-alpha", 12), ("upper-alpha", 13), ("none", 14),
        ],
    ),
    numeric(Opcode::MarginTop, Numeric::with_keywords(AUTO_ONLY, LENGTH_PCT, true)),
    numeric(Opcode::MarginRight, Numeric::with_keywords(AUTO_ONLY, LENGTH_PCT, true)),
    numeric(Opcode::MarginBottom, Numeric::with_keywords(AUTO_ONLY, LENGTH_PCT, true)),
    numeric(Opcode::MarginLeft, Numeric::with_keywords(AUTO_ONLY, LENGTH_PCT, true)),
    numeric(Opcode::MaxHeight, Numeric::with_keywords(NONE_ONLY, LENGTH_PCT, false)),
    numeric(Opcode::MaxWidth, Numeric::with_keywords(NONE_ONLY, LENGTH_PCT, false)),
    numeric(Opcode::MinHeight, Numeric::plain(LENGTH_PCT, false)),
    numeric(Opcode::MinWidth, Numeric::plain(LENGTH_PCT, false)),
    numeric(Opcode::Orphans, Numeric::plain(BARE, false)),
    colour(Opcode::OutlineColor, &[("invert", 0)]),
    keyword(Opcode::OutlineStyle, OUTLINE_STYLE),
    numeric(Opcode::OutlineWidth, Numeric::with_keywords(BORDER_WIDTH_KEYWORDS, LENGTH, false)),
    keyword(Opcode::Overflow, &[("visible", 0), ("hidden", 1), ("scroll", 2), ("auto", 3)]),
    numeric(Opcode::PaddingTop, Numeric::plain(LENGTH_PCT, false)),
    numeric(Opcode::PaddingRight, Numeric::plain(LENGTH_PCT, false)),
    numeric(Opcode::PaddingBottom, Numeric::plain(LENGTH_PCT, false)),
    numeric(Opcode::PaddingLeft, Numeric::plain(LENGTH_PCT, false)),
    keyword(
        Opcode::PageBreakAfter,
        &[("auto", 0), ("always", 1), ("avoid", 2), ("left", 3), ("right", 4)],
    ),
    keyword(
        Opcode::PageBreakBefore,
        &[("auto", 0), ("always", 1), ("avoid", 2), ("left", 3), ("right", 4)],
    ),
    keyword(Opcode::PageBreakInside, &[("auto", 0), ("avoid", 1)]),
    numeric(Opcode::PauseAfter, Numeric::plain(TIME_PCT, false)),
    numeric(Opcode::PauseBefore, Numeric::plain(TIME_PCT, false)),
    numeric(
        Opcode::Pitch,
        Numeric::with_keywords(
            &[("x-low", 0), ("low", 1), ("medium", 2), ("high", 3), ("x-high", 4)],
            FREQUENCY,
            false,
        ),
    ),
    numeric(Opcode::PitchRange, Numeric { range: Some((0.0, 100.0)), ..Numeric::plain(BARE, false) }),
    PropertyDef { opcode: Opcode::PlayDuring, grammar: Grammar::PlayDuring },
    keyword(Opcode::Position, &[("static", 0), ("relative", 1), ("absolute", 2), ("fixed", 3)]),
    PropertyDef { opcode: Opcode::Quotes, grammar: Grammar::Quotes },
    numeric(Opcode::Richness, Numeric { range: Some((0.0, 100.0)), ..Numeric::plain(BARE, false) }),
    numeric(Opcode::Right, Numeric::with_keywords(AUTO_ONLY, LENGTH_PCT, true)),
    keyword(Opcode::Speak, &[("normal", 0), ("none", 1), ("spell-out", 2)]),
    keyword(Opcode::SpeakHeader, &[("once", 0), ("always", 1)]),
    keyword(Opcode::SpeakNumeral, &[("digits", 0), ("continuous", 1)]),
    keyword(Opcode::SpeakPunctuation, &[("code", 0), ("none", 1)]),
    numeric(
        Opcode::SpeechRate,
        Numeric::with_keywords(
            &[
                ("x-slow", 0), ("slow", 1), ("medium", 2), ("fast", 3), ("x-fast", 4),
                ("faster", 5), ("slower", 6),
            ],
            BARE,
            false,
        ),
    ),
    numeric(Opcode::Stress, Numeric { range: Some((0.0, 100.0)), ..Numeric::plain(BARE, false) }),
    keyword(Opcode::TableLayout, &[("auto", 0), ("fixed", 1)]),
    keyword(Opcode::TextAlign, &[("left", 0), ("right", 1), ("center", 2), ("justify", 3)]),
    PropertyDef { opcode: Opcode::TextDecoration, grammar: Grammar::TextDecoration },
    numeric(Opcode::TextIndent, Numeric::plain(LENGTH_PCT, true)),
    keyword(
        Opcode::TextTransform,
        &[("none", 0), ("capitalize", 1), ("uppercase", 2), ("lowercase", 3)],
    ),
    numeric(Opcode::Top, Numeric::with_keywords(AUTO_ONLY, LENGTH_PCT, true)),
    keyword(Opcode::UnicodeBidi, &[("normal", 0), ("embed", 1), ("bidi-override", 2)]),
    numeric(
        Opcode::VerticalAlign,
        Numeric::with_keywords(
            &[
                ("baseline", 0), ("sub", 1), ("super", 2), ("top", 3), ("text-top", 4),
                ("middle", 5), ("bottom", 6), ("text-bottom", 7),
            ],
            LENGTH_PCT,
            true,
        ),
    ),
    keyword(Opcode::Visibility, &[("visible", 0), ("hidden", 1), ("collapse", 2)]),
    PropertyDef { opcode: Opcode::VoiceFamily, grammar: Grammar::StringList },
    numeric(
        Opcode::Volume,
        Numeric {
            keywords: &[
                ("silent", 0), ("x-soft", 1), ("soft", 2), ("medium", 3), ("loud", 4),
                ("x-loud", 5),
            ],
            category: UnitCategory::PERCENTAGE,
            negative_ok: false,
            bare_number_as: Some(crate::bytecode::units::Unit::Percentage),
            range: Some((0.0, 100.0)),
        },
    ),
    keyword(Opcode::WhiteSpace, &[("normal", 0), ("pre", 1), ("nowrap", 2)]),
    numeric(Opcode::Widows, Numeric::plain(BARE, false)),
    numeric(Opcode::Width, Numeric::with_keywords(AUTO_ONLY, LENGTH_PCT, false)),
    numeric(Opcode::WordSpacing, Numeric::with_keywords(NORMAL_ONLY, LENGTH, true)),
    numeric(Opcode::ZIndex, Numeric::with_keywords(AUTO_ONLY, BARE, true)),
];

/// Look up a property's registry entry by its CSS name (kebab-case,
/// already lowercased by the caller).
#[must_use]
pub fn by_name(name: &str) -> Option<&'static PropertyDef> {
    PROPERTIES.iter().find(|def| def.opcode.property_name() == name)
}

/// Look up a property's registry entry by opcode.
#[must_use]
pub fn by_opcode(opcode: Opcode) -> &'static PropertyDef {
    PROPERTIES
        .iter()
        .find(|def| def.opcode == opcode)
        .expect("PROPERTIES is exhaustive over Opcode")
}

/// `line-height`'s second SET-like marker: a bare number (multiplier)
/// is written with this value rather than [`crate::bytecode::SET`], so
/// the operand kind (`Fixed` vs `FixedUnit`) stays a pure function of
/// `(opcode, value)` even though `line-height` accepts both a
/// unitless multiplier and a length/percentage.
pub const LINE_HEIGHT_NUMBER: u16 = 0xfffe;

/// Generic font-family/voice-family keywords (CSS 2.1 § 15.3).
pub const GENERIC_FAMILY_KEYWORDS: &[(&str, u16)] = &[
    ("serif", 0),
    ("sans-serif", 1),
    ("cursive", 2),
    ("fantasy", 3),
    ("monospace", 4),
];

/// `font-family`/`voice-family` list entry kinds.
pub const FAMILY_ENTRY_GENERIC: u16 = 0;
pub const FAMILY_ENTRY_NAMED: u16 = 1;
/// Sentinel terminating a `font-family`/`voice-family` list. Distinct
/// from any entry kind above.
pub const FAMILY_LIST_SENTINEL: u16 = crate::bytecode::SET;

/// `quotes` value when the keyword `none` is given (no list follows).
pub const QUOTES_NONE: u16 = 0;
/// `quotes` list entry kinds (alternating open/close per pair).
pub const QUOTES_ENTRY_OPEN: u16 = 1;
pub const QUOTES_ENTRY_CLOSE: u16 = 2;

/// `counter-increment`/`counter-reset` value when `none` is given.
pub const COUNTER_NONE: u16 = 0;
/// `counter-increment`/`counter-reset` list entry kind: every entry is
/// a (name, integer) pair.
pub const COUNTER_ENTRY: u16 = 1;

/// `content` list entry kinds.
pub const CONTENT_ENTRY_STRING: u16 = 0;
pub const CONTENT_ENTRY_OPEN_QUOTE: u16 = 1;
pub const CONTENT_ENTRY_CLOSE_QUOTE: u16 = 2;
pub const CONTENT_ENTRY_NO_OPEN_QUOTE: u16 = 3;
pub const CONTENT_ENTRY_NO_CLOSE_QUOTE: u16 = 4;
pub const CONTENT_ENTRY_ATTR: u16 = 5;
pub const CONTENT_ENTRY_URL: u16 = 6;
pub const CONTENT_ENTRY_COUNTER: u16 = 7;
pub const CONTENT_ENTRY_COUNTERS: u16 = 8;
/// Sentinel terminating a `content` list. No entry kind above reaches
/// this value.
pub const CONTENT_LIST_SENTINEL: u16 = crate::bytecode::SET;

/// The operand kinds that follow a non-keyword, non-list declaration
/// value, given its opcode and the OPV's decoded `value` field.
/// `None` means `value` denotes a plain keyword (no operands) for
/// this opcode, or that this opcode is list-valued and the caller
/// should use [`list_sentinel`]/[`list_entry_schema`] instead.
#[must_use]
pub fn operand_schema(opcode: Opcode, value: u16) -> Option<&'static [crate::bytecode::OperandKind]> {
    use crate::bytecode::OperandKind;
    if opcode == Opcode::LineHeight {
        return match value {
            LINE_HEIGHT_NUMBER => Some(&[OperandKind::Fixed]),
            crate::bytecode::SET => Some(&[OperandKind::FixedUnit]),
            _ => None,
        };
    }
    if opcode == Opcode::BackgroundPosition && value == crate::bytecode::SET {
        return Some(&[OperandKind::FixedUnit, OperandKind::FixedUnit]);
    }
    if opcode == Opcode::TextDecoration {
        // Bitmask lives entirely in the value field; no operands ever.
        return None;
    }
    if opcode == Opcode::Clip {
        // `value` is a 4-bit auto-mask here, never `SET`; callers read
        // clip with `clip_operand_schema(value)` directly instead.
        return None;
    }
    if value != crate::bytecode::SET {
        return None;
    }
    let def = by_opcode(opcode);
    Some(match def.grammar {
        Grammar::Numeric(Numeric { category, .. }) if category == UnitCategory::NONE => {
            &[OperandKind::Fixed]
        }
        Grammar::Numeric(_) => &[OperandKind::FixedUnit],
        Grammar::Colour { .. } => &[OperandKind::Colour],
        Grammar::UriOrNone => &[OperandKind::StringRef],
        Grammar::Azimuth | Grammar::Elevation => &[OperandKind::FixedUnit],
        Grammar::Clip => &[], // operand count varies with the auto-mask; see `clip_operand_schema`
        Grammar::FontWeight => &[OperandKind::Fixed],
        Grammar::BorderSpacing => &[OperandKind::FixedUnit, OperandKind::FixedUnit],
        Grammar::PlayDuring => &[OperandKind::StringRef],
        Grammar::Keyword(_) | Grammar::Content | Grammar::Quotes | Grammar::Counter
        | Grammar::StringList | Grammar::LineHeight | Grammar::TextDecoration
        | Grammar::Position2D => return None,
    })
}

/// `clip`'s value field is a 4-bit auto-mask (bit 0 = top, 1 = right, 2
/// = bottom, 3 = left; set means "auto"). The operand list carries one
/// `FixedUnit` per clear bit, in top/right/bottom/left order. `auto`
/// for the whole property is encoded as mask `0b1111` (equivalent used
/// value to `rect(auto, auto, auto, auto)` per CSS 2.1 § 11.1.2).
#[must_use]
pub fn clip_operand_schema(mask: u16) -> Vec<crate::bytecode::OperandKind> {
    use crate::bytecode::OperandKind;
    (0..4).filter(|bit| mask & (1 << bit) == 0).map(|_| OperandKind::FixedUnit).collect()
}

/// Whether `opcode`'s grammar is list-valued (`font-family`,
/// `voice-family`, `quotes`, `counter-increment`, `counter-reset`,
/// `content`).
#[must_use]
pub fn is_list_grammar(opcode: Opcode) -> bool {
    matches!(
        by_opcode(opcode).grammar,
        Grammar::StringList | Grammar::Quotes | Grammar::Counter | Grammar::Content
    )
}

/// The sentinel entry value terminating `opcode`'s list, if it is
/// list-valued.
#[must_use]
pub fn list_sentinel(opcode: Opcode) -> u16 {
    match by_opcode(opcode).grammar {
        Grammar::StringList => FAMILY_LIST_SENTINEL,
        Grammar::Quotes => QUOTES_NONE,
        Grammar::Counter => COUNTER_NONE,
        Grammar::Content => CONTENT_LIST_SENTINEL,
        _ => panic!("{:?} is not list-valued", opcode),
    }
}

/// The operand kinds following one list entry, given its entry kind.
#[must_use]
pub fn list_entry_schema(opcode: Opcode, entry_kind: u16) -> &'static [crate::bytecode::OperandKind] {
    use crate::bytecode::OperandKind;
    match by_opcode(opcode).grammar {
        Grammar::StringList => match entry_kind {
            FAMILY_ENTRY_GENERIC => &[OperandKind::Fixed],
            FAMILY_ENTRY_NAMED => &[OperandKind::StringRef],
            _ => &[],
        },
        Grammar::Quotes => &[OperandKind::StringRef],
        Grammar::Counter => &[OperandKind::StringRef, OperandKind::Fixed],
        Grammar::Content => match entry_kind {
            CONTENT_ENTRY_STRING | CONTENT_ENTRY_ATTR | CONTENT_ENTRY_URL => &[OperandKind::StringRef],
            CONTENT_ENTRY_OPEN_QUOTE
            | CONTENT_ENTRY_CLOSE_QUOTE
            | CONTENT_ENTRY_NO_OPEN_QUOTE
            | CONTENT_ENTRY_NO_CLOSE_QUOTE => &[],
            CONTENT_ENTRY_COUNTER => &[OperandKind::StringRef, OperandKind::Fixed],
            CONTENT_ENTRY_COUNTERS => {
                &[OperandKind::StringRef, OperandKind::StringRef, OperandKind::Fixed]
            }
            _ => &[],
        },
        _ => panic!("{:?} is not list-valued", opcode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_opcode_has_exactly_one_entry() {
        for opcode in crate::bytecode::ALL_OPCODES {
            let matches = PROPERTIES.iter().filter(|def| def.opcode == *opcode).count();
            assert_eq!(matches, 1, "{:?} should have exactly one PROPERTIES entry", opcode);
        }
    }

    #[test]
    fn by_name_finds_background_color() {
        let def = by_name("background-color").expect("registered");
        assert_eq!(def.opcode, Opcode::BackgroundColor);
    }

    #[test]
    fn by_name_rejects_shorthand() {
        assert!(by_name("margin").is_none());
        assert!(by_name("border").is_none());
    }

    #[test]
    fn keyword_tables_have_no_duplicate_codes() {
        for def in PROPERTIES {
            if let Grammar::Keyword(table) = def.grammar {
                let mut seen = std::collections::HashSet::new();
                for &(_, code) in table {
                    assert!(seen.insert(code), "{:?} keyword table has duplicate code", def.opcode);
                }
            }
        }
    }
}
