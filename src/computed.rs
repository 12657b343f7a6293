//! The computed-style record: the flat, typed output of the cascade for
//! one `(node, pseudo_element, pseudo_classes, media)` tuple.
//!
//! Properties a layout engine touches on nearly every element (box
//! model, font, color, display) are named fields on [`ComputedStyle`]
//! itself; properties most elements never set (aural/speech, tables,
//! generated content, counters) live in a lazily-allocated [`Uncommon`]
//! record reached through [`ComputedStyle::uncommon_mut`]. A style that
//! never touches an uncommon property never allocates one.

use crate::bytecode::colour::Colour;
use crate::bytecode::units::Unit;
use crate::fixed::Fixed;

/// A length or percentage, still carrying its unit — this engine does not
/// resolve relative lengths; layout interprets the unit.
pub type LengthPct = (Fixed, Unit);

/// One `content` list entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    /// A literal string.
    Str(String),
    /// `open-quote`.
    OpenQuote,
    /// `close-quote`.
    CloseQuote,
    /// `no-open-quote`.
    NoOpenQuote,
    /// `no-close-quote`.
    NoCloseQuote,
    /// `attr(name)`.
    Attr(String),
    /// `url(...)`.
    Uri(String),
    /// `counter(name, style)`.
    Counter(String, u16),
    /// `counters(name, separator, style)`.
    Counters(String, String, u16),
}

/// `text-decoration`'s bitmask (CSS 2.1 § 16.3.1): any combination of
/// `underline`, `overline`, `line-through`, `blink`, or none of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextDecoration(pub u8);

impl TextDecoration {
    /// `underline`.
    pub const UNDERLINE: TextDecoration = TextDecoration(0b0001);
    /// `overline`.
    pub const OVERLINE: TextDecoration = TextDecoration(0b0010);
    /// `line-through`.
    pub const LINE_THROUGH: TextDecoration = TextDecoration(0b0100);
    /// `blink`.
    pub const BLINK: TextDecoration = TextDecoration(0b1000);
    /// `none`.
    pub const NONE: TextDecoration = TextDecoration(0);

    /// Union of two decoration masks.
    #[must_use]
    pub const fn union(self, other: TextDecoration) -> TextDecoration {
        TextDecoration(self.0 | other.0)
    }
}

/// A keyword-valued property's resolved value: the CSS spelling (validated
/// against the property's closed keyword table at parse time, so this is
/// never an arbitrary string) plus its numeric code, kept for cheap
/// equality and for re-deriving the keyword when composing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyword(pub &'static str, pub u16);

/// A property whose value is either a closed keyword or a length/number,
/// shared by most CSS 2.1 box-model and numeric properties.
#[derive(Debug, Clone, PartialEq)]
pub enum LengthOrKeyword {
    /// One of the property's keywords (`auto`, `normal`, `none`, ...).
    Keyword(Keyword),
    /// A resolved length, percentage, angle, time, or frequency.
    Length(LengthPct),
    /// A bare number (`font-weight: 700`, `z-index: 3`, `orphans: 2`).
    Number(Fixed),
}

impl LengthOrKeyword {
    /// Construct the `auto` keyword value with code `0` — the convention
    /// every `Numeric` keyword table in [`crate::properties`] uses for the
    /// first (and usually only) keyword.
    #[must_use]
    pub const fn keyword(name: &'static str, code: u16) -> LengthOrKeyword {
        LengthOrKeyword::Keyword(Keyword(name, code))
    }
}

/// A resolved colour value, or the `invert` keyword `outline-color` alone
/// accepts in CSS 2.1 § 8.5.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColourValue {
    /// A resolved colour.
    Colour(Colour),
    /// `invert` (outline-color only).
    Invert,
}

/// `url(...)` or `none`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UriOrNone {
    /// No image/cue/cursor set.
    #[default]
    None,
    /// A resolved URI.
    Uri(String),
}

/// The properties most elements in a document set, or that a layout
/// engine consults on every element regardless.
#[derive(Debug, Clone, PartialEq)]
pub struct Common {
    /// `display`.
    pub display: Keyword,
    /// `position`.
    pub position: Keyword,
    /// `float`.
    pub float: Keyword,
    /// `clear`.
    pub clear: Keyword,
    /// `visibility`.
    pub visibility: Keyword,
    /// `overflow`.
    pub overflow: Keyword,

    /// `top`/`right`/`bottom`/`left`.
    pub top: LengthOrKeyword,
    /// See [`Self::top`].
    pub right: LengthOrKeyword,
    /// See [`Self::top`].
    pub bottom: LengthOrKeyword,
    /// See [`Self::top`].
    pub left: LengthOrKeyword,

    /// `width`/`height` and their min/max counterparts.
    pub width: LengthOrKeyword,
    /// See [`Self::width`].
    pub height: LengthOrKeyword,
    /// `min-width`.
    pub min_width: LengthOrKeyword,
    /// `min-height`.
    pub min_height: LengthOrKeyword,
    /// `max-width`.
    pub max_width: LengthOrKeyword,
    /// `max-height`.
    pub max_height: LengthOrKeyword,

    /// `margin-top/right/bottom/left`.
    pub margin_top: LengthOrKeyword,
    /// See [`Self::margin_top`].
    pub margin_right: LengthOrKeyword,
    /// See [`Self::margin_top`].
    pub margin_bottom: LengthOrKeyword,
    /// See [`Self::margin_top`].
    pub margin_left: LengthOrKeyword,

    /// `padding-top/right/bottom/left`.
    pub padding_top: LengthOrKeyword,
    /// See [`Self::padding_top`].
    pub padding_right: LengthOrKeyword,
    /// See [`Self::padding_top`].
    pub padding_bottom: LengthOrKeyword,
    /// See [`Self::padding_top`].
    pub padding_left: LengthOrKeyword,

    /// `border-top/right/bottom/left-width`.
    pub border_top_width: LengthOrKeyword,
    /// See [`Self::border_top_width`].
    pub border_right_width: LengthOrKeyword,
    /// See [`Self::border_top_width`].
    pub border_bottom_width: LengthOrKeyword,
    /// See [`Self::border_top_width`].
    pub border_left_width: LengthOrKeyword,
    /// `border-top/right/bottom/left-style`.
    pub border_top_style: Keyword,
    /// See [`Self::border_top_style`].
    pub border_right_style: Keyword,
    /// See [`Self::border_top_style`].
    pub border_bottom_style: Keyword,
    /// See [`Self::border_top_style`].
    pub border_left_style: Keyword,
    /// `border-top/right/bottom/left-color`.
    pub border_top_color: ColourValue,
    /// See [`Self::border_top_color`].
    pub border_right_color: ColourValue,
    /// See [`Self::border_top_color`].
    pub border_bottom_color: ColourValue,
    /// See [`Self::border_top_color`].
    pub border_left_color: ColourValue,

    /// `color`.
    pub color: Colour,
    /// `background-color`.
    pub background_color: ColourValue,
    /// `background-image`.
    pub background_image: UriOrNone,
    /// `background-repeat`.
    pub background_repeat: Keyword,
    /// `background-attachment`.
    pub background_attachment: Keyword,
    /// `background-position`: (horizontal, vertical).
    pub background_position: (LengthPct, LengthPct),

    /// `font-family`: ordered fallback list, generic families carried as
    /// their CSS keyword spelling.
    pub font_family: Vec<String>,
    /// `font-size`.
    pub font_size: LengthOrKeyword,
    /// `font-style`.
    pub font_style: Keyword,
    /// `font-variant`.
    pub font_variant: Keyword,
    /// `font-weight`: either a relative/absolute keyword or a `100..900`
    /// multiple of 100.
    pub font_weight: LengthOrKeyword,
    /// `line-height`: `normal`, a unitless multiplier (`Number`), or a
    /// length/percentage.
    pub line_height: LengthOrKeyword,

    /// `text-align`.
    pub text_align: Keyword,
    /// `text-indent`.
    pub text_indent: LengthPct,
    /// `white-space`.
    pub white_space: Keyword,
    /// `vertical-align`.
    pub vertical_align: LengthOrKeyword,
    /// `direction`.
    pub direction: Keyword,
    /// `unicode-bidi`.
    pub unicode_bidi: Keyword,
}

/// Properties rarely set on a given element: aural/speech, tables,
/// generated content/counters, and other CSS 2.1 corners. Boxed and
/// allocated only when one of these is actually written.
#[derive(Debug, Clone, PartialEq)]
pub struct Uncommon {
    /// `azimuth`.
    pub azimuth: LengthOrKeyword,
    /// `elevation`.
    pub elevation: LengthOrKeyword,
    /// `pitch`.
    pub pitch: LengthOrKeyword,
    /// `pitch-range`.
    pub pitch_range: Fixed,
    /// `richness`.
    pub richness: Fixed,
    /// `speech-rate`.
    pub speech_rate: LengthOrKeyword,
    /// `stress`.
    pub stress: Fixed,
    /// `volume`.
    pub volume: LengthOrKeyword,
    /// `voice-family`.
    pub voice_family: Vec<String>,
    /// `pause-before`/`pause-after`.
    pub pause_before: LengthPct,
    /// See [`Self::pause_before`].
    pub pause_after: LengthPct,
    /// `cue-before`/`cue-after`.
    pub cue_before: UriOrNone,
    /// See [`Self::cue_before`].
    pub cue_after: UriOrNone,
    /// `play-during`.
    pub play_during: Keyword,
    /// `play-during`'s resolved URI when not `auto`/`none`/`inherit`.
    pub play_during_uri: Option<String>,
    /// `speak`.
    pub speak: Keyword,
    /// `speak-header`.
    pub speak_header: Keyword,
    /// `speak-numeral`.
    pub speak_numeral: Keyword,
    /// `speak-punctuation`.
    pub speak_punctuation: Keyword,

    /// `table-layout`.
    pub table_layout: Keyword,
    /// `border-collapse`.
    pub border_collapse: Keyword,
    /// `border-spacing`: (horizontal, vertical).
    pub border_spacing: (LengthPct, LengthPct),
    /// `caption-side`.
    pub caption_side: Keyword,
    /// `empty-cells`.
    pub empty_cells: Keyword,

    /// `list-style-type`.
    pub list_style_type: Keyword,
    /// `list-style-position`.
    pub list_style_position: Keyword,
    /// `list-style-image`.
    pub list_style_image: UriOrNone,

    /// `content`: empty for `normal`/`none`.
    pub content: Vec<ContentPart>,
    /// `counter-increment`: `(name, by)` pairs.
    pub counter_increment: Vec<(String, Fixed)>,
    /// `counter-reset`: `(name, to)` pairs.
    pub counter_reset: Vec<(String, Fixed)>,
    /// `quotes`: `(open, close)` pairs, outermost first.
    pub quotes: Vec<(String, String)>,

    /// `clip`: `None` per side means `auto`.
    pub clip: [Option<LengthPct>; 4],
    /// `cursor`.
    pub cursor: Keyword,
    /// `page-break-before`/`-after`.
    pub page_break_before: Keyword,
    /// See [`Self::page_break_before`].
    pub page_break_after: Keyword,
    /// `page-break-inside`.
    pub page_break_inside: Keyword,
    /// `orphans`.
    pub orphans: Fixed,
    /// `widows`.
    pub widows: Fixed,
    /// `text-decoration`.
    pub text_decoration: TextDecoration,
    /// `text-transform`.
    pub text_transform: Keyword,
    /// `letter-spacing`.
    pub letter_spacing: LengthOrKeyword,
    /// `word-spacing`.
    pub word_spacing: LengthOrKeyword,
    /// `outline-width`.
    pub outline_width: LengthOrKeyword,
    /// `outline-style`.
    pub outline_style: Keyword,
    /// `outline-color`.
    pub outline_color: ColourValue,
    /// `z-index`.
    pub z_index: LengthOrKeyword,
}

/// The final typed value of every CSS 2.1 property for one element.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    /// Hot-path properties, always present.
    pub common: Common,
    /// Cold-path properties, `None` until first written.
    pub uncommon: Option<Box<Uncommon>>,
}

impl ComputedStyle {
    /// Build a style record with every property at its CSS 2.1 initial
    /// value: properties not set by any rule take their initial value.
    #[must_use]
    pub fn initial() -> ComputedStyle {
        ComputedStyle {
            common: Common::initial(),
            uncommon: None,
        }
    }

    /// Mutable access to the uncommon record, allocating it on first use.
    pub fn uncommon_mut(&mut self) -> &mut Uncommon {
        self.uncommon.get_or_insert_with(|| Box::new(Uncommon::initial()))
    }

    /// Read-only access to the uncommon record's initial values without
    /// allocating (used when composing a property that was never written
    /// on this style).
    #[must_use]
    pub fn uncommon_or_initial(&self) -> std::borrow::Cow<'_, Uncommon> {
        match &self.uncommon {
            Some(u) => std::borrow::Cow::Borrowed(u),
            None => std::borrow::Cow::Owned(Uncommon::initial()),
        }
    }
}

impl Common {
    /// CSS 2.1's initial values for every common-bucket property.
    #[must_use]
    pub fn initial() -> Common {
        let auto = LengthOrKeyword::keyword("auto", 0);
        let zero_px = LengthOrKeyword::Length((Fixed::ZERO, Unit::Px));
        Common {
            display: Keyword("inline", 0),
            position: Keyword("static", 0),
            float: Keyword("none", 0),
            clear: Keyword("none", 0),
            visibility: Keyword("visible", 0),
            overflow: Keyword("visible", 0),

            top: auto.clone(),
            right: auto.clone(),
            bottom: auto.clone(),
            left: auto.clone(),

            width: auto.clone(),
            height: auto.clone(),
            min_width: zero_px.clone(),
            min_height: zero_px.clone(),
            max_width: LengthOrKeyword::keyword("none", 0),
            max_height: LengthOrKeyword::keyword("none", 0),

            margin_top: zero_px.clone(),
            margin_right: zero_px.clone(),
            margin_bottom: zero_px.clone(),
            margin_left: zero_px.clone(),

            padding_top: zero_px.clone(),
            padding_right: zero_px.clone(),
            padding_bottom: zero_px.clone(),
            padding_left: zero_px.clone(),

            border_top_width: LengthOrKeyword::keyword("medium", 2),
            border_right_width: LengthOrKeyword::keyword("medium", 2),
            border_bottom_width: LengthOrKeyword::keyword("medium", 2),
            border_left_width: LengthOrKeyword::keyword("medium", 2),
            border_top_style: Keyword("none", 0),
            border_right_style: Keyword("none", 0),
            border_bottom_style: Keyword("none", 0),
            border_left_style: Keyword("none", 0),
            border_top_color: ColourValue::Colour(Colour::rgb(0, 0, 0)),
            border_right_color: ColourValue::Colour(Colour::rgb(0, 0, 0)),
            border_bottom_color: ColourValue::Colour(Colour::rgb(0, 0, 0)),
            border_left_color: ColourValue::Colour(Colour::rgb(0, 0, 0)),

            color: Colour::rgb(0, 0, 0),
            background_color: ColourValue::Colour(Colour::Transparent),
            background_image: UriOrNone::None,
            background_repeat: Keyword("repeat", 0),
            background_attachment: Keyword("scroll", 0),
            background_position: (
                (Fixed::ZERO, Unit::Percentage),
                (Fixed::ZERO, Unit::Percentage),
            ),

            font_family: Vec::new(),
            font_size: LengthOrKeyword::keyword("medium", 2),
            font_style: Keyword("normal", 0),
            font_variant: Keyword("normal", 0),
            font_weight: LengthOrKeyword::keyword("normal", 0),
            line_height: LengthOrKeyword::keyword("normal", 0),

            text_align: Keyword("left", 0),
            text_indent: (Fixed::ZERO, Unit::Px),
            white_space: Keyword("normal", 0),
            vertical_align: LengthOrKeyword::keyword("baseline", 0),
            direction: Keyword("ltr", 0),
            unicode_bidi: Keyword("normal", 0),
        }
    }
}

impl Uncommon {
    /// CSS 2.1's initial values for every uncommon-bucket property.
    #[must_use]
    pub fn initial() -> Uncommon {
        Uncommon {
            azimuth: LengthOrKeyword::keyword("center", 4),
            elevation: LengthOrKeyword::keyword("level", 0),
            pitch: LengthOrKeyword::keyword("medium", 2),
            pitch_range: Fixed::from_int(50),
            richness: Fixed::from_int(50),
            speech_rate: LengthOrKeyword::keyword("medium", 2),
            stress: Fixed::from_int(50),
            volume: LengthOrKeyword::keyword("medium", 2),
            voice_family: Vec::new(),
            pause_before: (Fixed::ZERO, Unit::Ms),
            pause_after: (Fixed::ZERO, Unit::Ms),
            cue_before: UriOrNone::None,
            cue_after: UriOrNone::None,
            play_during: Keyword("auto", 0),
            play_during_uri: None,
            speak: Keyword("normal", 0),
            speak_header: Keyword("once", 0),
            speak_numeral: Keyword("continuous", 0),
            speak_punctuation: Keyword("none", 0),

            table_layout: Keyword("auto", 0),
            border_collapse: Keyword("separate", 0),
            border_spacing: ((Fixed::ZERO, Unit::Px), (Fixed::ZERO, Unit::Px)),
            caption_side: Keyword("top", 0),
            empty_cells: Keyword("show", 0),

            list_style_type: Keyword("disc", 0),
            list_style_position: Keyword("outside", 0),
            list_style_image: UriOrNone::None,

            content: Vec::new(),
            counter_increment: Vec::new(),
            counter_reset: Vec::new(),
            quotes: Vec::new(),

            clip: [None, None, None, None],
            cursor: Keyword("auto", 0),
            page_break_before: Keyword("auto", 0),
            page_break_after: Keyword("auto", 0),
            page_break_inside: Keyword("auto", 0),
            orphans: Fixed::from_int(2),
            widows: Fixed::from_int(2),
            text_decoration: TextDecoration::NONE,
            text_transform: Keyword("none", 0),
            letter_spacing: LengthOrKeyword::keyword("normal", 0),
            word_spacing: LengthOrKeyword::keyword("normal", 0),
            outline_width: LengthOrKeyword::keyword("medium", 2),
            outline_style: Keyword("none", 0),
            outline_color: ColourValue::Invert,
            z_index: LengthOrKeyword::keyword("auto", 0),
        }
    }
}

impl Clone for LengthOrKeyword {
    fn clone(&self) -> Self {
        match self {
            LengthOrKeyword::Keyword(k) => LengthOrKeyword::Keyword(*k),
            LengthOrKeyword::Length(l) => LengthOrKeyword::Length(*l),
            LengthOrKeyword::Number(n) => LengthOrKeyword::Number(*n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_style_has_no_uncommon_allocation() {
        let style = ComputedStyle::initial();
        assert!(style.uncommon.is_none());
    }

    #[test]
    fn uncommon_mut_allocates_lazily() {
        let mut style = ComputedStyle::initial();
        assert!(style.uncommon.is_none());
        style.uncommon_mut().cursor = Keyword("pointer", 13);
        assert!(style.uncommon.is_some());
    }

    #[test]
    fn initial_color_is_black() {
        let style = ComputedStyle::initial();
        assert_eq!(style.common.color, Colour::rgb(0, 0, 0));
    }

    #[test]
    fn initial_display_is_inline() {
        let style = ComputedStyle::initial();
        assert_eq!(style.common.display, Keyword("inline", 0));
    }
}
