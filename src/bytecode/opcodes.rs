//! The opcode enum: one member per CSS 2.1 property.
//!
//! Shorthands (`margin`, `padding`, `border`, `border-top/right/bottom/left`,
//! `outline`, `font`, `background`, `list-style`, `cue`, `pause`) are not
//! separately encoded — they expand to their longhands at parse time, so
//! only longhand opcodes ever appear in a style block.

/// Property opcode. Fits in the 14-bit opcode field of an OPV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
#[non_exhaustive]
pub enum Opcode {
    /// `azimuth`
    Azimuth,
    /// `background-attachment`
    BackgroundAttachment,
    /// `background-color`
    BackgroundColor,
    /// `background-image`
    BackgroundImage,
    /// `background-position`
    BackgroundPosition,
    /// `background-repeat`
    BackgroundRepeat,
    /// `border-collapse`
    BorderCollapse,
    /// `border-spacing`
    BorderSpacing,
    /// `border-top-color`
    BorderTopColor,
    /// `border-right-color`
    BorderRightColor,
    /// `border-bottom-color`
    BorderBottomColor,
    /// `border-left-color`
    BorderLeftColor,
    /// `border-top-style`
    BorderTopStyle,
    /// `border-right-style`
    BorderRightStyle,
    /// `border-bottom-style`
    BorderBottomStyle,
    /// `border-left-style`
    BorderLeftStyle,
    /// `border-top-width`
    BorderTopWidth,
    /// `border-right-width`
    BorderRightWidth,
    /// `border-bottom-width`
    BorderBottomWidth,
    /// `border-left-width`
    BorderLeftWidth,
    /// `bottom`
    Bottom,
    /// `caption-side`
    CaptionSide,
    /// `clear`
    Clear,
    /// `clip`
    Clip,
    /// `color`
    Color,
    /// `content`
    Content,
    /// `counter-increment`
    CounterIncrement,
    /// `counter-reset`
    CounterReset,
    /// `cue-after`
    CueAfter,
    /// `cue-before`
    CueBefore,
    /// `cursor`
    Cursor,
    /// `direction`
    Direction,
    /// `display`
    Display,
    /// `elevation`
    Elevation,
    /// `empty-cells`
    EmptyCells,
    /// `float`
    Float,
    /// `font-family`
    FontFamily,
    /// `font-size`
    FontSize,
    /// `font-style`
    FontStyle,
    /// `font-variant`
    FontVariant,
    /// `font-weight`
    FontWeight,
    /// `height`
    Height,
    /// `left`
    Left,
    /// `letter-spacing`
    LetterSpacing,
    /// `line-height`
    LineHeight,
    /// `list-style-image`
    ListStyleImage,
    /// `list-style-position`
    ListStylePosition,
    /// `list-style-type`
    ListStyleType,
    /// `margin-top`
    MarginTop,
    /// `margin-right`
    MarginRight,
    /// `margin-bottom`
    MarginBottom,
    /// `margin-left`
    MarginLeft,
    /// `max-height`
    MaxHeight,
    /// `max-width`
    MaxWidth,
    /// `min-height`
    MinHeight,
    /// `min-width`
    MinWidth,
    /// `orphans`
    Orphans,
    /// `outline-color`
    OutlineColor,
    /// `outline-style`
    OutlineStyle,
    /// `outline-width`
    OutlineWidth,
    /// `overflow`
    Overflow,
    /// `padding-top`
    PaddingTop,
    /// `padding-right`
    PaddingRight,
    /// `padding-bottom`
    PaddingBottom,
    /// `padding-left`
    PaddingLeft,
    /// `page-break-after`
    PageBreakAfter,
    /// `page-break-before`
    PageBreakBefore,
    /// `page-break-inside`
    PageBreakInside,
    /// `pause-after`
    PauseAfter,
    /// `pause-before`
    PauseBefore,
    /// `pitch`
    Pitch,
    /// `pitch-range`
    PitchRange,
    /// `play-during`
    PlayDuring,
    /// `position`
    Position,
    /// `quotes`
    Quotes,
    /// `richness`
    Richness,
    /// `right`
    Right,
    /// `speak`
    Speak,
    /// `speak-header`
    SpeakHeader,
    /// `speak-numeral`
    SpeakNumeral,
    /// `speak-punctuation`
    SpeakPunctuation,
    /// `speech-rate`
    SpeechRate,
    /// `stress`
    Stress,
    /// `table-layout`
    TableLayout,
    /// `text-align`
    TextAlign,
    /// `text-decoration`
    TextDecoration,
    /// `text-indent`
    TextIndent,
    /// `text-transform`
    TextTransform,
    /// `top`
    Top,
    /// `unicode-bidi`
    UnicodeBidi,
    /// `vertical-align`
    VerticalAlign,
    /// `visibility`
    Visibility,
    /// `voice-family`
    VoiceFamily,
    /// `volume`
    Volume,
    /// `white-space`
    WhiteSpace,
    /// `widows`
    Widows,
    /// `width`
    Width,
    /// `word-spacing`
    WordSpacing,
    /// `z-index`
    ZIndex,
}

impl Opcode {
    /// The property name as it appears in CSS source, for diagnostics and
    /// the debug dump.
    #[must_use]
    pub fn property_name(self) -> &'static str {
        match self {
            Opcode::Azimuth => "azimuth",
            Opcode::BackgroundAttachment => "background-attachment",
            Opcode::BackgroundColor => "background-color",
            Opcode::BackgroundImage => "background-image",
            Opcode::BackgroundPosition => "background-position",
            Opcode::BackgroundRepeat => "background-repeat",
            Opcode::BorderCollapse => "border-collapse",
            Opcode::BorderSpacing => "border-spacing",
            Opcode::BorderTopColor => "border-top-color",
            Opcode::BorderRightColor => "border-right-color",
            Opcode::BorderBottomColor => "border-bottom-color",
            Opcode::BorderLeftColor => "border-left-color",
            Opcode::BorderTopStyle => "border-top-style",
            Opcode::BorderRightStyle => "border-right-style",
            Opcode::BorderBottomStyle => "border-bottom-style",
            Opcode::BorderLeftStyle => "border-left-style",
            Opcode::BorderTopWidth => "border-top-width",
            Opcode::BorderRightWidth => "border-right-width",
            Opcode::BorderBottomWidth => "border-bottom-width",
            Opcode::BorderLeftWidth => "border-left-width",
            Opcode::Bottom => "bottom",
            Opcode::CaptionSide => "caption-side",
            Opcode::Clear => "clear",
            Opcode::Clip => "clip",
            Opcode::Color => "color",
            Opcode::Content => "content",
            Opcode::CounterIncrement => "counter-increment",
            Opcode::CounterReset => "counter-reset",
            Opcode::CueAfter => "cue-after",
            Opcode::CueBefore => "cue-before",
            Opcode::Cursor => "cursor",
            Opcode::Direction => "direction",
            Opcode::Display => "display",
            Opcode::Elevation => "elevation",
            Opcode::EmptyCells => "empty-cells",
            Opcode::Float => "float",
            Opcode::FontFamily => "font-family",
            Opcode::FontSize => "font-size",
            Opcode::FontStyle => "font-style",
            Opcode::FontVariant => "font-variant",
            Opcode::FontWeight => "font-weight",
            Opcode::Height => "height",
            Opcode::Left => "left",
            Opcode::LetterSpacing => "letter-spacing",
            Opcode::LineHeight => "line-height",
            Opcode::ListStyleImage => "list-style-image",
            Opcode::ListStylePosition => "list-style-position",
            Opcode::ListStyleType => "list-style-type",
            Opcode::MarginTop => "margin-top",
            Opcode::MarginRight => "margin-right",
            Opcode::MarginBottom => "margin-bottom",
            Opcode::MarginLeft => "margin-left",
            Opcode::MaxHeight => "max-height",
            Opcode::MaxWidth => "max-width",
            Opcode::MinHeight => "min-height",
            Opcode::MinWidth => "min-width",
            Opcode::Orphans => "orphans",
            Opcode::OutlineColor => "outline-color",
            Opcode::OutlineStyle => "outline-style",
            Opcode::OutlineWidth => "outline-width",
            Opcode::Overflow => "overflow",
            Opcode::PaddingTop => "padding-top",
            Opcode::PaddingRight => "padding-right",
            Opcode::PaddingBottom => "padding-bottom",
            Opcode::PaddingLeft => "padding-left",
            Opcode::PageBreakAfter => "page-break-after",
            Opcode::PageBreakBefore => "page-break-before",
            Opcode::PageBreakInside => "page-break-inside",
            Opcode::PauseAfter => "pause-after",
            Opcode::PauseBefore => "pause-before",
            Opcode::Pitch => "pitch",
            Opcode::PitchRange => "pitch-range",
            Opcode::PlayDuring => "play-during",
            Opcode::Position => "position",
            Opcode::Quotes => "quotes",
            Opcode::Richness => "richness",
            Opcode::Right => "right",
            Opcode::Speak => "speak",
            Opcode::SpeakHeader => "speak-header",
            Opcode::SpeakNumeral => "speak-numeral",
            Opcode::SpeakPunctuation => "speak-punctuation",
            Opcode::SpeechRate => "speech-rate",
            Opcode::Stress => "stress",
            Opcode::TableLayout => "table-layout",
            Opcode::TextAlign => "text-align",
            Opcode::TextDecoration => "text-decoration",
            Opcode::TextIndent => "text-indent",
            Opcode::TextTransform => "text-transform",
            Opcode::Top => "top",
            Opcode::UnicodeBidi => "unicode-bidi",
            Opcode::VerticalAlign => "vertical-align",
            Opcode::Visibility => "visibility",
            Opcode::VoiceFamily => "voice-family",
            Opcode::Volume => "volume",
            Opcode::WhiteSpace => "white-space",
            Opcode::Widows => "widows",
            Opcode::Width => "width",
            Opcode::WordSpacing => "word-spacing",
            Opcode::ZIndex => "z-index",
        }
    }

    /// Whether this property inherits by default (CSS 2.1 per-property
    /// "Inherited" column). Used by the compose step and by `inherit`
    /// resolution when no rule set the property at all.
    #[must_use]
    pub fn inherits_by_default(self) -> bool {
        matches!(
            self,
            Opcode::Azimuth
                | Opcode::BorderCollapse
                | Opcode::BorderSpacing
                | Opcode::CaptionSide
                | Opcode::Color
                | Opcode::Cursor
                | Opcode::Direction
                | Opcode::Elevation
                | Opcode::EmptyCells
                | Opcode::FontFamily
                | Opcode::FontSize
                | Opcode::FontStyle
                | Opcode::FontVariant
                | Opcode::FontWeight
                | Opcode::LetterSpacing
                | Opcode::LineHeight
                | Opcode::ListStyleImage
                | Opcode::ListStylePosition
                | Opcode::ListStyleType
                | Opcode::Orphans
                | Opcode::PitchRange
                | Opcode::Pitch
                | Opcode::Quotes
                | Opcode::Richness
                | Opcode::Speak
                | Opcode::SpeakHeader
                | Opcode::SpeakNumeral
                | Opcode::SpeakPunctuation
                | Opcode::SpeechRate
                | Opcode::Stress
                | Opcode::TextAlign
                | Opcode::TextIndent
                | Opcode::TextTransform
                | Opcode::Visibility
                | Opcode::VoiceFamily
                | Opcode::Volume
                | Opcode::WhiteSpace
                | Opcode::Widows
                | Opcode::WordSpacing
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_names_are_kebab_case() {
        assert_eq!(Opcode::BackgroundColor.property_name(), "background-color");
        assert_eq!(Opcode::ZIndex.property_name(), "z-index");
    }

    #[test]
    fn color_inherits_but_background_color_does_not() {
        assert!(Opcode::Color.inherits_by_default());
        assert!(!Opcode::BackgroundColor.inherits_by_default());
    }

    #[test]
    fn visibility_inherits() {
        assert!(Opcode::Visibility.inherits_by_default());
    }
}
