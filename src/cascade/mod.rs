//! Selector matching and the cascade: for one element, gather every
//! declaration whose selector matches, rank the survivors, and
//! materialize a [`ComputedStyle`], then compose it with the parent's.
//!
//! Three phases, run in sequence for each node:
//!
//! - **Gather.** Walk every sheet's rule list (recursing into `@media`
//!   blocks gated by the caller's active media set), test each rule's
//!   selector group against the node, and decode the bytecode of every rule
//!   whose selector group matches.
//! - **Rank.** Per CSS 2.1 § 6.4.1/Table 6.1, order candidates by
//!   `(origin rank with `!important` inversion, specificity, rule index)`
//!   and keep only the winner per property.
//! - **Materialize & compose.** Decode each winning declaration's operands
//!   into the matching [`ComputedStyle`] field; explicit `inherit` and
//!   properties nobody set that inherit by default copy the parent's
//!   computed value, everything else keeps its initial or cascaded value.

use std::collections::{HashMap, HashSet};

use crate::bytecode::colour::Colour;
use crate::bytecode::opcodes::Opcode;
use crate::bytecode::{self, Operand, OperandKind, Reader, SET};
use crate::computed::{ColourValue, ComputedStyle, ContentPart, Keyword, LengthOrKeyword, TextDecoration, UriOrNone};
use crate::fixed::Fixed;
use crate::parse::{
    AZIMUTH_BEHIND_BIT, AZIMUTH_LEFTWARDS, AZIMUTH_NO_POSITION, AZIMUTH_POSITIONS, AZIMUTH_RIGHTWARDS,
    ELEVATION_KEYWORDS, FONT_WEIGHT_KEYWORDS,
};
use crate::properties::{self, Grammar};
use crate::selector::NodeRef;
use crate::strings::Dictionary;
use crate::stylesheet::{MediaSet, Rule, StyleOrigin, StyleRule, Stylesheet};

/// Compute the style of `node`, cascading `sheets` (in author-supplied
/// order; origin and `!important` — not sheet order — break ties) under
/// `active_media`, and composing the result against `parent` (`None` for
/// the root).
#[must_use]
pub fn compute_style<N: NodeRef>(
    sheets: &[&Stylesheet],
    node: N,
    active_media: MediaSet,
    parent: Option<&ComputedStyle>,
) -> ComputedStyle {
    let candidates = gather(sheets, node, active_media);
    let winners = rank(candidates);
    let mut style = materialize(&winners);
    compose(&mut style, parent, &winners);
    style
}

/// One matching declaration, tagged with everything the ranking step needs.
struct Candidate<'a> {
    origin: StyleOrigin,
    important: bool,
    specificity: crate::selector::Specificity,
    rule_index: u32,
    opcode: Opcode,
    kind: DeclKind,
    dict: &'a Dictionary,
}

/// A decoded declaration body, ready for the materialize step.
enum DeclKind {
    /// `inherit`: no value, always copy the parent's computed value.
    Inherit,
    /// A single typed value, possibly with inline operands.
    Value(u16, Vec<Operand>),
    /// A list-valued property (`font-family`, `quotes`, `counter-reset`, ...).
    List(Vec<(u16, Vec<Operand>)>),
}

fn gather<'a, N: NodeRef>(sheets: &[&'a Stylesheet], node: N, active_media: MediaSet) -> Vec<Candidate<'a>> {
    let mut candidates = Vec::new();
    for sheet in sheets {
        if !sheet.media().intersects(active_media) {
            continue;
        }
        let mut style_rules = Vec::new();
        collect_style_rules(sheet.rules(), sheet.media(), active_media, &mut style_rules);
        for rule in style_rules {
            let specificity = rule.selectors.iter().filter(|sel| sel.matches(node)).map(|sel| sel.specificity).max();
            let Some(specificity) = specificity else { continue };
            for decl in decode_style_block(&rule.bytecode) {
                candidates.push(Candidate {
                    origin: sheet.origin(),
                    important: decl.important,
                    specificity,
                    rule_index: rule.rule_index,
                    opcode: decl.opcode,
                    kind: decl.kind,
                    dict: sheet.dictionary(),
                });
            }
        }
    }
    candidates
}

/// Walk `rules`, recursing into `@media` blocks whose mask shares a bit
/// with both the sheet's own mask and the caller's active media.
fn collect_style_rules<'a>(rules: &'a [Rule], sheet_media: MediaSet, active_media: MediaSet, out: &mut Vec<&'a StyleRule>) {
    for rule in rules {
        match rule {
            Rule::Style(style_rule) => out.push(style_rule),
            Rule::Media { media, rules } => {
                if sheet_media.intersects(*media) && media.intersects(active_media) {
                    collect_style_rules(rules, sheet_media, active_media, out);
                }
            }
            Rule::Import { .. } => {}
        }
    }
}

/// One decoded declaration: its opcode, `!important` flag, and body.
struct Decl {
    opcode: Opcode,
    important: bool,
    kind: DeclKind,
}

/// Decode every OPV-headed declaration in a compiled style block. Bytecode
/// is only ever produced by [`crate::stylesheet`] from this crate's own
/// writer, so a malformed header indicates corruption, not untrusted input.
fn decode_style_block(block: &[u8]) -> Vec<Decl> {
    let mut reader = Reader::new(block);
    let mut out = Vec::new();
    while !reader.is_empty() {
        let opv = reader.read_opv().expect("well-formed style block");
        let opcode = opv.opcode();
        let flags = opv.flags();
        let important = flags.is_important();
        if flags.is_inherit() {
            out.push(Decl { opcode, important, kind: DeclKind::Inherit });
            continue;
        }
        let value = opv.value();
        if properties::is_list_grammar(opcode) {
            let sentinel = properties::list_sentinel(opcode);
            let mut entries = Vec::new();
            while let Some(entry_kind) = reader.read_list_entry(sentinel).expect("well-formed style block") {
                let schema = properties::list_entry_schema(opcode, entry_kind);
                let ops = read_operands(&mut reader, schema);
                entries.push((entry_kind, ops));
            }
            out.push(Decl { opcode, important, kind: DeclKind::List(entries) });
            continue;
        }
        let ops = if opcode == Opcode::Clip {
            read_operands(&mut reader, &properties::clip_operand_schema(value))
        } else {
            match properties::operand_schema(opcode, value) {
                Some(schema) => read_operands(&mut reader, schema),
                None => Vec::new(),
            }
        };
        out.push(Decl { opcode, important, kind: DeclKind::Value(value, ops) });
    }
    out
}

fn read_operands(reader: &mut Reader, schema: &[OperandKind]) -> Vec<Operand> {
    schema.iter().map(|&kind| reader.read_operand(kind).expect("well-formed style block")).collect()
}

/// CSS 2.1 Table 6.1: `!important` user-agent rules outrank everything,
/// then `!important` user, then `!important` author, then normal author,
/// normal user, normal user-agent.
fn effective_origin(origin: StyleOrigin, important: bool) -> u8 {
    let base = origin.rank();
    if important {
        5 - base
    } else {
        base
    }
}

/// Keep exactly one winning candidate per opcode: the one with the
/// greatest `(origin, specificity, rule_index)` key.
fn rank(candidates: Vec<Candidate>) -> HashMap<Opcode, Candidate> {
    let mut winners: HashMap<Opcode, Candidate> = HashMap::new();
    for candidate in candidates {
        let key = (effective_origin(candidate.origin, candidate.important), candidate.specificity, candidate.rule_index);
        let replace = match winners.get(&candidate.opcode) {
            Some(existing) => {
                let existing_key =
                    (effective_origin(existing.origin, existing.important), existing.specificity, existing.rule_index);
                key >= existing_key
            }
            None => true,
        };
        if replace {
            winners.insert(candidate.opcode, candidate);
        }
    }
    winners
}

/// Build a style starting from initial values, applying every winning
/// non-`inherit` declaration. `inherit` winners are left untouched here;
/// [`compose`] resolves them against the parent afterwards.
fn materialize(winners: &HashMap<Opcode, Candidate>) -> ComputedStyle {
    let mut style = ComputedStyle::initial();
    for (opcode, candidate) in winners {
        match &candidate.kind {
            DeclKind::Inherit => {}
            DeclKind::Value(value, operands) => apply_value(&mut style, candidate.dict, *opcode, *value, operands),
            DeclKind::List(entries) => apply_list(&mut style, candidate.dict, *opcode, entries),
        }
    }
    style
}

/// For every property, either an explicit `inherit` or silence on a
/// property that inherits by default copies the parent's computed value.
/// Everything else keeps what [`materialize`] already wrote (the cascaded
/// value, or the initial value if nothing matched).
fn compose(style: &mut ComputedStyle, parent: Option<&ComputedStyle>, winners: &HashMap<Opcode, Candidate>) {
    let Some(parent) = parent else { return };
    let explicit_inherit: HashSet<Opcode> = winners
        .iter()
        .filter(|entry| matches!(entry.1.kind, DeclKind::Inherit))
        .map(|entry| *entry.0)
        .collect();
    for &opcode in bytecode::ALL_OPCODES {
        let should_inherit =
            explicit_inherit.contains(&opcode) || (!winners.contains_key(&opcode) && opcode.inherits_by_default());
        if should_inherit {
            inherit_property(style, parent, opcode);
        }
    }
}

fn keyword_table(opcode: Opcode) -> &'static [(&'static str, u16)] {
    match properties::by_opcode(opcode).grammar {
        Grammar::Keyword(table) => table,
        Grammar::Numeric(numeric) => numeric.keywords,
        Grammar::Colour { extra_keywords } => extra_keywords,
        _ => &[],
    }
}

fn keyword_from(table: &[(&'static str, u16)], code: u16) -> Keyword {
    let name = table.iter().find(|(_, c)| *c == code).map(|(n, _)| *n).unwrap_or("");
    Keyword(name, code)
}

fn length_or_keyword(keywords: &[(&'static str, u16)], value: u16, operands: &[Operand]) -> LengthOrKeyword {
    if value == SET {
        match operands[0] {
            Operand::FixedUnit(f, u) => LengthOrKeyword::Length((f, u)),
            Operand::Fixed(f) => LengthOrKeyword::Number(f),
            _ => unreachable!("numeric grammar always carries a FixedUnit or Fixed operand"),
        }
    } else {
        LengthOrKeyword::Keyword(keyword_from(keywords, value))
    }
}

fn plain_fixed(operands: &[Operand]) -> Fixed {
    match operands[0] {
        Operand::Fixed(f) => f,
        _ => unreachable!("bare-number grammar always carries a Fixed operand"),
    }
}

fn length_pct(operands: &[Operand]) -> (Fixed, crate::bytecode::units::Unit) {
    match operands[0] {
        Operand::FixedUnit(f, u) => (f, u),
        _ => unreachable!("length/percentage grammar always carries a FixedUnit operand"),
    }
}

fn colour_value(value: u16, operands: &[Operand]) -> ColourValue {
    if value == SET {
        match operands[0] {
            Operand::Colour(c) => ColourValue::Colour(c),
            _ => unreachable!("colour grammar always carries a Colour operand"),
        }
    } else {
        ColourValue::Invert
    }
}

fn colour_plain(operands: &[Operand]) -> Colour {
    match operands[0] {
        Operand::Colour(c) => c,
        _ => unreachable!("colour grammar always carries a Colour operand"),
    }
}

fn uri_or_none(value: u16, operands: &[Operand], dict: &Dictionary) -> UriOrNone {
    if value == SET {
        UriOrNone::Uri(resolve(dict, &operands[0]))
    } else {
        UriOrNone::None
    }
}

fn resolve(dict: &Dictionary, operand: &Operand) -> String {
    match operand {
        Operand::StringRef(handle) => dict.resolve(*handle).to_string(),
        _ => unreachable!("uri/string grammar always carries a StringRef operand"),
    }
}

/// `azimuth`'s value packs a 4-bit position code (or the no-position
/// sentinel) and a separate `behind` bit; there's no static keyword table
/// to index since the combination, not a single code, names the keyword.
fn azimuth_name(value: u16) -> &'static str {
    if value == AZIMUTH_LEFTWARDS {
        return "leftwards";
    }
    if value == AZIMUTH_RIGHTWARDS {
        return "rightwards";
    }
    let behind = value & AZIMUTH_BEHIND_BIT != 0;
    let position = value & !AZIMUTH_BEHIND_BIT;
    if position == AZIMUTH_NO_POSITION {
        return if behind { "behind" } else { "center" };
    }
    match (AZIMUTH_POSITIONS.iter().find(|(_, c)| *c == position), behind) {
        (Some(("center", _)), true) => "behind center",
        (Some((name, _)), false) => name,
        (Some((name, _)), true) => match *name {
            "left-side" => "behind left-side",
            "far-left" => "behind far-left",
            "left" => "behind left",
            "center-left" => "behind center-left",
            "center-right" => "behind center-right",
            "right" => "behind right",
            "far-right" => "behind far-right",
            "right-side" => "behind right-side",
            other => other,
        },
        (None, _) => "center",
    }
}

#[allow(clippy::too_many_lines)]
fn apply_value(style: &mut ComputedStyle, dict: &Dictionary, opcode: Opcode, value: u16, operands: &[Operand]) {
    use Opcode::*;
    match opcode {
        // Plain keywords, common fields.
        BackgroundAttachment => style.common.background_attachment = keyword_from(keyword_table(opcode), value),
        BackgroundRepeat => style.common.background_repeat = keyword_from(keyword_table(opcode), value),
        BorderTopStyle => style.common.border_top_style = keyword_from(keyword_table(opcode), value),
        BorderRightStyle => style.common.border_right_style = keyword_from(keyword_table(opcode), value),
        BorderBottomStyle => style.common.border_bottom_style = keyword_from(keyword_table(opcode), value),
        BorderLeftStyle => style.common.border_left_style = keyword_from(keyword_table(opcode), value),
        Clear => style.common.clear = keyword_from(keyword_table(opcode), value),
        Direction => style.common.direction = keyword_from(keyword_table(opcode), value),
        Display => style.common.display = keyword_from(keyword_table(opcode), value),
        Float => style.common.float = keyword_from(keyword_table(opcode), value),
        FontStyle => style.common.font_style = keyword_from(keyword_table(opcode), value),
        FontVariant => style.common.font_variant = keyword_from(keyword_table(opcode), value),
        Overflow => style.common.overflow = keyword_from(keyword_table(opcode), value),
        Position => style.common.position = keyword_from(keyword_table(opcode), value),
        TextAlign => style.common.text_align = keyword_from(keyword_table(opcode), value),
        UnicodeBidi => style.common.unicode_bidi = keyword_from(keyword_table(opcode), value),
        Visibility => style.common.visibility = keyword_from(keyword_table(opcode), value),
        WhiteSpace => style.common.white_space = keyword_from(keyword_table(opcode), value),

        // Length-or-keyword, common fields.
        BorderTopWidth => style.common.border_top_width = length_or_keyword(keyword_table(opcode), value, operands),
        BorderRightWidth => style.common.border_right_width = length_or_keyword(keyword_table(opcode), value, operands),
        BorderBottomWidth => style.common.border_bottom_width = length_or_keyword(keyword_table(opcode), value, operands),
        BorderLeftWidth => style.common.border_left_width = length_or_keyword(keyword_table(opcode), value, operands),
        Bottom => style.common.bottom = length_or_keyword(keyword_table(opcode), value, operands),
        Left => style.common.left = length_or_keyword(keyword_table(opcode), value, operands),
        Right => style.common.right = length_or_keyword(keyword_table(opcode), value, operands),
        Top => style.common.top = length_or_keyword(keyword_table(opcode), value, operands),
        Height => style.common.height = length_or_keyword(keyword_table(opcode), value, operands),
        Width => style.common.width = length_or_keyword(keyword_table(opcode), value, operands),
        MarginTop => style.common.margin_top = length_or_keyword(keyword_table(opcode), value, operands),
        MarginRight => style.common.margin_right = length_or_keyword(keyword_table(opcode), value, operands),
        MarginBottom => style.common.margin_bottom = length_or_keyword(keyword_table(opcode), value, operands),
        MarginLeft => style.common.margin_left = length_or_keyword(keyword_table(opcode), value, operands),
        MaxHeight => style.common.max_height = length_or_keyword(keyword_table(opcode), value, operands),
        MaxWidth => style.common.max_width = length_or_keyword(keyword_table(opcode), value, operands),
        MinHeight => style.common.min_height = length_or_keyword(keyword_table(opcode), value, operands),
        MinWidth => style.common.min_width = length_or_keyword(keyword_table(opcode), value, operands),
        PaddingTop => style.common.padding_top = length_or_keyword(keyword_table(opcode), value, operands),
        PaddingRight => style.common.padding_right = length_or_keyword(keyword_table(opcode), value, operands),
        PaddingBottom => style.common.padding_bottom = length_or_keyword(keyword_table(opcode), value, operands),
        PaddingLeft => style.common.padding_left = length_or_keyword(keyword_table(opcode), value, operands),
        FontSize => style.common.font_size = length_or_keyword(keyword_table(opcode), value, operands),
        VerticalAlign => style.common.vertical_align = length_or_keyword(keyword_table(opcode), value, operands),

        TextIndent => style.common.text_indent = length_pct(operands),

        // Colour, common fields.
        Color => style.common.color = colour_plain(operands),
        BackgroundColor => style.common.background_color = colour_value(value, operands),
        BorderTopColor => style.common.border_top_color = colour_value(value, operands),
        BorderRightColor => style.common.border_right_color = colour_value(value, operands),
        BorderBottomColor => style.common.border_bottom_color = colour_value(value, operands),
        BorderLeftColor => style.common.border_left_color = colour_value(value, operands),

        BackgroundImage => style.common.background_image = uri_or_none(value, operands, dict),
        BackgroundPosition => {
            let h = length_pct(&operands[0..1]);
            let v = length_pct(&operands[1..2]);
            style.common.background_position = (h, v);
        }

        FontWeight => {
            style.common.font_weight = if value == SET {
                LengthOrKeyword::Number(plain_fixed(operands))
            } else {
                LengthOrKeyword::Keyword(keyword_from(FONT_WEIGHT_KEYWORDS, value))
            };
        }
        LineHeight => {
            style.common.line_height = if value == 0 {
                LengthOrKeyword::keyword("normal", 0)
            } else if value == properties::LINE_HEIGHT_NUMBER {
                LengthOrKeyword::Number(plain_fixed(operands))
            } else {
                LengthOrKeyword::Length(length_pct(operands))
            };
        }

        // Uncommon keywords.
        BorderCollapse => style.uncommon_mut().border_collapse = keyword_from(keyword_table(opcode), value),
        CaptionSide => style.uncommon_mut().caption_side = keyword_from(keyword_table(opcode), value),
        Cursor => style.uncommon_mut().cursor = keyword_from(keyword_table(opcode), value),
        EmptyCells => style.uncommon_mut().empty_cells = keyword_from(keyword_table(opcode), value),
        ListStylePosition => style.uncommon_mut().list_style_position = keyword_from(keyword_table(opcode), value),
        ListStyleType => style.uncommon_mut().list_style_type = keyword_from(keyword_table(opcode), value),
        OutlineStyle => style.uncommon_mut().outline_style = keyword_from(keyword_table(opcode), value),
        PageBreakAfter => style.uncommon_mut().page_break_after = keyword_from(keyword_table(opcode), value),
        PageBreakBefore => style.uncommon_mut().page_break_before = keyword_from(keyword_table(opcode), value),
        PageBreakInside => style.uncommon_mut().page_break_inside = keyword_from(keyword_table(opcode), value),
        Speak => style.uncommon_mut().speak = keyword_from(keyword_table(opcode), value),
        SpeakHeader => style.uncommon_mut().speak_header = keyword_from(keyword_table(opcode), value),
        SpeakNumeral => style.uncommon_mut().speak_numeral = keyword_from(keyword_table(opcode), value),
        SpeakPunctuation => style.uncommon_mut().speak_punctuation = keyword_from(keyword_table(opcode), value),
        TableLayout => style.uncommon_mut().table_layout = keyword_from(keyword_table(opcode), value),
        TextTransform => style.uncommon_mut().text_transform = keyword_from(keyword_table(opcode), value),

        // Uncommon length-or-keyword.
        LetterSpacing => style.uncommon_mut().letter_spacing = length_or_keyword(keyword_table(opcode), value, operands),
        OutlineWidth => style.uncommon_mut().outline_width = length_or_keyword(keyword_table(opcode), value, operands),
        WordSpacing => style.uncommon_mut().word_spacing = length_or_keyword(keyword_table(opcode), value, operands),
        ZIndex => style.uncommon_mut().z_index = length_or_keyword(keyword_table(opcode), value, operands),
        Pitch => style.uncommon_mut().pitch = length_or_keyword(keyword_table(opcode), value, operands),
        SpeechRate => style.uncommon_mut().speech_rate = length_or_keyword(keyword_table(opcode), value, operands),
        Volume => style.uncommon_mut().volume = length_or_keyword(keyword_table(opcode), value, operands),
        Elevation => style.uncommon_mut().elevation = length_or_keyword(ELEVATION_KEYWORDS, value, operands),
        Azimuth => {
            style.uncommon_mut().azimuth = if value == SET {
                LengthOrKeyword::Length(length_pct(operands))
            } else {
                LengthOrKeyword::Keyword(Keyword(azimuth_name(value), value))
            };
        }

        // Uncommon bare-number fields (no unit, no keyword).
        Orphans => style.uncommon_mut().orphans = plain_fixed(operands),
        Widows => style.uncommon_mut().widows = plain_fixed(operands),
        PitchRange => style.uncommon_mut().pitch_range = plain_fixed(operands),
        Richness => style.uncommon_mut().richness = plain_fixed(operands),
        Stress => style.uncommon_mut().stress = plain_fixed(operands),

        // Uncommon length/percentage pairs.
        PauseBefore => style.uncommon_mut().pause_before = length_pct(operands),
        PauseAfter => style.uncommon_mut().pause_after = length_pct(operands),
        BorderSpacing => {
            let h = length_pct(&operands[0..1]);
            let v = length_pct(&operands[1..2]);
            style.uncommon_mut().border_spacing = (h, v);
        }

        // Uncommon colour/uri.
        OutlineColor => style.uncommon_mut().outline_color = colour_value(value, operands),
        CueBefore => style.uncommon_mut().cue_before = uri_or_none(value, operands, dict),
        CueAfter => style.uncommon_mut().cue_after = uri_or_none(value, operands, dict),
        ListStyleImage => style.uncommon_mut().list_style_image = uri_or_none(value, operands, dict),

        PlayDuring => {
            let u = style.uncommon_mut();
            match value {
                0 => {
                    u.play_during = Keyword("auto", 0);
                    u.play_during_uri = None;
                }
                1 => {
                    u.play_during = Keyword("none", 1);
                    u.play_during_uri = None;
                }
                _ => {
                    u.play_during = Keyword("url", SET);
                    u.play_during_uri = Some(resolve(dict, &operands[0]));
                }
            }
        }

        Clip => {
            let mask = value;
            let mut iter = operands.iter();
            let mut sides = [None; 4];
            for (bit, side) in sides.iter_mut().enumerate() {
                if mask & (1 << bit) == 0 {
                    let operand = iter.next().expect("clip_operand_schema matched this mask");
                    *side = Some(match operand {
                        Operand::FixedUnit(f, u) => (*f, *u),
                        _ => unreachable!("clip grammar always carries FixedUnit operands"),
                    });
                }
            }
            style.uncommon_mut().clip = sides;
        }

        Opcode::TextDecoration => style.uncommon_mut().text_decoration = TextDecoration(value as u8),

        FontFamily | VoiceFamily | Quotes | CounterIncrement | CounterReset | Content => {
            unreachable!("{opcode:?} is list-valued; decoded via apply_list")
        }

        _ => unreachable!("{opcode:?} has no apply_value arm"),
    }
}

fn decode_family_list(dict: &Dictionary, entries: &[(u16, Vec<Operand>)]) -> Vec<String> {
    entries
        .iter()
        .map(|(kind, ops)| {
            if *kind == properties::FAMILY_ENTRY_GENERIC {
                let code = match ops[0] {
                    Operand::Fixed(f) => f.to_int() as u16,
                    _ => unreachable!("generic family entry carries a Fixed code"),
                };
                properties::GENERIC_FAMILY_KEYWORDS
                    .iter()
                    .find(|(_, c)| *c == code)
                    .map(|(n, _)| (*n).to_string())
                    .unwrap_or_default()
            } else {
                resolve(dict, &ops[0])
            }
        })
        .collect()
}

fn decode_counter_list(dict: &Dictionary, entries: &[(u16, Vec<Operand>)]) -> Vec<(String, Fixed)> {
    entries
        .iter()
        .map(|(_, ops)| {
            let name = resolve(dict, &ops[0]);
            let n = match ops[1] {
                Operand::Fixed(f) => f,
                _ => unreachable!("counter entry carries a Fixed integer"),
            };
            (name, n)
        })
        .collect()
}

fn decode_content_list(dict: &Dictionary, entries: &[(u16, Vec<Operand>)]) -> Vec<ContentPart> {
    entries
        .iter()
        .map(|(kind, ops)| match *kind {
            properties::CONTENT_ENTRY_STRING => ContentPart::Str(resolve(dict, &ops[0])),
            properties::CONTENT_ENTRY_OPEN_QUOTE => ContentPart::OpenQuote,
            properties::CONTENT_ENTRY_CLOSE_QUOTE => ContentPart::CloseQuote,
            properties::CONTENT_ENTRY_NO_OPEN_QUOTE => ContentPart::NoOpenQuote,
            properties::CONTENT_ENTRY_NO_CLOSE_QUOTE => ContentPart::NoCloseQuote,
            properties::CONTENT_ENTRY_ATTR => ContentPart::Attr(resolve(dict, &ops[0])),
            properties::CONTENT_ENTRY_URL => ContentPart::Uri(resolve(dict, &ops[0])),
            properties::CONTENT_ENTRY_COUNTER => {
                let name = resolve(dict, &ops[0]);
                let style = match ops[1] {
                    Operand::Fixed(f) => f.to_int() as u16,
                    _ => unreachable!("counter() entry carries a Fixed list-style code"),
                };
                ContentPart::Counter(name, style)
            }
            properties::CONTENT_ENTRY_COUNTERS => {
                let name = resolve(dict, &ops[0]);
                let separator = resolve(dict, &ops[1]);
                let style = match ops[2] {
                    Operand::Fixed(f) => f.to_int() as u16,
                    _ => unreachable!("counters() entry carries a Fixed list-style code"),
                };
                ContentPart::Counters(name, separator, style)
            }
            _ => unreachable!("unknown content entry kind {kind}"),
        })
        .collect()
}

fn apply_list(style: &mut ComputedStyle, dict: &Dictionary, opcode: Opcode, entries: &[(u16, Vec<Operand>)]) {
    match opcode {
        Opcode::FontFamily => style.common.font_family = decode_family_list(dict, entries),
        Opcode::VoiceFamily => style.uncommon_mut().voice_family = decode_family_list(dict, entries),
        Opcode::Quotes => {
            let mut pairs = Vec::new();
            let mut iter = entries.iter();
            while let (Some((_, open)), Some((_, close))) = (iter.next(), iter.next()) {
                pairs.push((resolve(dict, &open[0]), resolve(dict, &close[0])));
            }
            style.uncommon_mut().quotes = pairs;
        }
        Opcode::CounterIncrement => style.uncommon_mut().counter_increment = decode_counter_list(dict, entries),
        Opcode::CounterReset => style.uncommon_mut().counter_reset = decode_counter_list(dict, entries),
        Opcode::Content => style.uncommon_mut().content = decode_content_list(dict, entries),
        _ => unreachable!("{opcode:?} is not list-valued"),
    }
}

/// Copy `opcode`'s computed value from `parent` into `style`. Every
/// property reaches this function the same way, whether it inherits by
/// default or only because the declaration said `inherit` explicitly —
/// there is no special-cased guard for any one property.
#[allow(clippy::too_many_lines)]
fn inherit_property(style: &mut ComputedStyle, parent: &ComputedStyle, opcode: Opcode) {
    use Opcode::*;
    match opcode {
        BackgroundAttachment => style.common.background_attachment = parent.common.background_attachment,
        BackgroundColor => style.common.background_color = parent.common.background_color,
        BackgroundImage => style.common.background_image = parent.common.background_image.clone(),
        BackgroundPosition => style.common.background_position = parent.common.background_position,
        BackgroundRepeat => style.common.background_repeat = parent.common.background_repeat,
        BorderTopColor => style.common.border_top_color = parent.common.border_top_color,
        BorderRightColor => style.common.border_right_color = parent.common.border_right_color,
        BorderBottomColor => style.common.border_bottom_color = parent.common.border_bottom_color,
        BorderLeftColor => style.common.border_left_color = parent.common.border_left_color,
        BorderTopStyle => style.common.border_top_style = parent.common.border_top_style,
        BorderRightStyle => style.common.border_right_style = parent.common.border_right_style,
        BorderBottomStyle => style.common.border_bottom_style = parent.common.border_bottom_style,
        BorderLeftStyle => style.common.border_left_style = parent.common.border_left_style,
        BorderTopWidth => style.common.border_top_width = parent.common.border_top_width.clone(),
        BorderRightWidth => style.common.border_right_width = parent.common.border_right_width.clone(),
        BorderBottomWidth => style.common.border_bottom_width = parent.common.border_bottom_width.clone(),
        BorderLeftWidth => style.common.border_left_width = parent.common.border_left_width.clone(),
        Bottom => style.common.bottom = parent.common.bottom.clone(),
        Clear => style.common.clear = parent.common.clear,
        Color => style.common.color = parent.common.color,
        Direction => style.common.direction = parent.common.direction,
        Display => style.common.display = parent.common.display,
        Float => style.common.float = parent.common.float,
        FontFamily => style.common.font_family = parent.common.font_family.clone(),
        FontSize => style.common.font_size = parent.common.font_size.clone(),
        FontStyle => style.common.font_style = parent.common.font_style,
        FontVariant => style.common.font_variant = parent.common.font_variant,
        FontWeight => style.common.font_weight = parent.common.font_weight.clone(),
        Height => style.common.height = parent.common.height.clone(),
        Left => style.common.left = parent.common.left.clone(),
        LineHeight => style.common.line_height = parent.common.line_height.clone(),
        MarginTop => style.common.margin_top = parent.common.margin_top.clone(),
        MarginRight => style.common.margin_right = parent.common.margin_right.clone(),
        MarginBottom => style.common.margin_bottom = parent.common.margin_bottom.clone(),
        MarginLeft => style.common.margin_left = parent.common.margin_left.clone(),
        MaxHeight => style.common.max_height = parent.common.max_height.clone(),
        MaxWidth => style.common.max_width = parent.common.max_width.clone(),
        MinHeight => style.common.min_height = parent.common.min_height.clone(),
        MinWidth => style.common.min_width = parent.common.min_width.clone(),
        Overflow => style.common.overflow = parent.common.overflow,
        PaddingTop => style.common.padding_top = parent.common.padding_top.clone(),
        PaddingRight => style.common.padding_right = parent.common.padding_right.clone(),
        PaddingBottom => style.common.padding_bottom = parent.common.padding_bottom.clone(),
        PaddingLeft => style.common.padding_left = parent.common.padding_left.clone(),
        Position => style.common.position = parent.common.position,
        Right => style.common.right = parent.common.right.clone(),
        TextAlign => style.common.text_align = parent.common.text_align,
        TextIndent => style.common.text_indent = parent.common.text_indent,
        Top => style.common.top = parent.common.top.clone(),
        UnicodeBidi => style.common.unicode_bidi = parent.common.unicode_bidi,
        VerticalAlign => style.common.vertical_align = parent.common.vertical_align.clone(),
        Visibility => style.common.visibility = parent.common.visibility,
        WhiteSpace => style.common.white_space = parent.common.white_space,
        Width => style.common.width = parent.common.width.clone(),

        Azimuth => style.uncommon_mut().azimuth = parent.uncommon_or_initial().azimuth.clone(),
        BorderCollapse => style.uncommon_mut().border_collapse = parent.uncommon_or_initial().border_collapse,
        BorderSpacing => style.uncommon_mut().border_spacing = parent.uncommon_or_initial().border_spacing,
        CaptionSide => style.uncommon_mut().caption_side = parent.uncommon_or_initial().caption_side,
        Clip => style.uncommon_mut().clip = parent.uncommon_or_initial().clip,
        Content => style.uncommon_mut().content = parent.uncommon_or_initial().content.clone(),
        CounterIncrement => style.uncommon_mut().counter_increment = parent.uncommon_or_initial().counter_increment.clone(),
        CounterReset => style.uncommon_mut().counter_reset = parent.uncommon_or_initial().counter_reset.clone(),
        CueAfter => style.uncommon_mut().cue_after = parent.uncommon_or_initial().cue_after.clone(),
        CueBefore => style.uncommon_mut().cue_before = parent.uncommon_or_initial().cue_before.clone(),
        Cursor => style.uncommon_mut().cursor = parent.uncommon_or_initial().cursor,
        Elevation => style.uncommon_mut().elevation = parent.uncommon_or_initial().elevation.clone(),
        EmptyCells => style.uncommon_mut().empty_cells = parent.uncommon_or_initial().empty_cells,
        LetterSpacing => style.uncommon_mut().letter_spacing = parent.uncommon_or_initial().letter_spacing.clone(),
        ListStyleImage => style.uncommon_mut().list_style_image = parent.uncommon_or_initial().list_style_image.clone(),
        ListStylePosition => style.uncommon_mut().list_style_position = parent.uncommon_or_initial().list_style_position,
        ListStyleType => style.uncommon_mut().list_style_type = parent.uncommon_or_initial().list_style_type,
        Orphans => style.uncommon_mut().orphans = parent.uncommon_or_initial().orphans,
        OutlineColor => style.uncommon_mut().outline_color = parent.uncommon_or_initial().outline_color,
        OutlineStyle => style.uncommon_mut().outline_style = parent.uncommon_or_initial().outline_style,
        OutlineWidth => style.uncommon_mut().outline_width = parent.uncommon_or_initial().outline_width.clone(),
        PageBreakAfter => style.uncommon_mut().page_break_after = parent.uncommon_or_initial().page_break_after,
        PageBreakBefore => style.uncommon_mut().page_break_before = parent.uncommon_or_initial().page_break_before,
        PageBreakInside => style.uncommon_mut().page_break_inside = parent.uncommon_or_initial().page_break_inside,
        PauseAfter => style.uncommon_mut().pause_after = parent.uncommon_or_initial().pause_after,
        PauseBefore => style.uncommon_mut().pause_before = parent.uncommon_or_initial().pause_before,
        Pitch => style.uncommon_mut().pitch = parent.uncommon_or_initial().pitch.clone(),
        PitchRange => style.uncommon_mut().pitch_range = parent.uncommon_or_initial().pitch_range,
        PlayDuring => {
            let parent_uncommon = parent.uncommon_or_initial();
            let (play_during, play_during_uri) = (parent_uncommon.play_during, parent_uncommon.play_during_uri.clone());
            let u = style.uncommon_mut();
            u.play_during = play_during;
            u.play_during_uri = play_during_uri;
        }
        Quotes => style.uncommon_mut().quotes = parent.uncommon_or_initial().quotes.clone(),
        Richness => style.uncommon_mut().richness = parent.uncommon_or_initial().richness,
        Speak => style.uncommon_mut().speak = parent.uncommon_or_initial().speak,
        SpeakHeader => style.uncommon_mut().speak_header = parent.uncommon_or_initial().speak_header,
        SpeakNumeral => style.uncommon_mut().speak_numeral = parent.uncommon_or_initial().speak_numeral,
        SpeakPunctuation => style.uncommon_mut().speak_punctuation = parent.uncommon_or_initial().speak_punctuation,
        SpeechRate => style.uncommon_mut().speech_rate = parent.uncommon_or_initial().speech_rate.clone(),
        Stress => style.uncommon_mut().stress = parent.uncommon_or_initial().stress,
        TableLayout => style.uncommon_mut().table_layout = parent.uncommon_or_initial().table_layout,
        Opcode::TextDecoration => style.uncommon_mut().text_decoration = parent.uncommon_or_initial().text_decoration,
        TextTransform => style.uncommon_mut().text_transform = parent.uncommon_or_initial().text_transform,
        VoiceFamily => style.uncommon_mut().voice_family = parent.uncommon_or_initial().voice_family.clone(),
        Volume => style.uncommon_mut().volume = parent.uncommon_or_initial().volume.clone(),
        Widows => style.uncommon_mut().widows = parent.uncommon_or_initial().widows,
        WordSpacing => style.uncommon_mut().word_spacing = parent.uncommon_or_initial().word_spacing.clone(),
        ZIndex => style.uncommon_mut().z_index = parent.uncommon_or_initial().z_index.clone(),

        _ => unreachable!("{opcode:?} has no inherit_property arm"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::parse_selector;
    use crate::stylesheet::CssLevel;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Node(usize);

    struct Arena {
        tags: Vec<&'static str>,
        classes: Vec<Vec<&'static str>>,
        parents: Vec<Option<usize>>,
    }

    impl Arena {
        fn new() -> Self {
            Arena { tags: Vec::new(), classes: Vec::new(), parents: Vec::new() }
        }

        fn push(&mut self, tag: &'static str, class: Option<&'static str>, parent: Option<usize>) -> Node {
            self.tags.push(tag);
            self.classes.push(class.into_iter().collect());
            self.parents.push(parent);
            Node(self.tags.len() - 1)
        }
    }

    thread_local! {
        static ARENA: std::cell::RefCell<Arena> = std::cell::RefCell::new(Arena::new());
    }

    impl NodeRef for Node {
        fn tag_name(&self) -> &str {
            ARENA.with(|a| a.borrow().tags[self.0])
        }
        fn id(&self) -> Option<&str> {
            None
        }
        fn has_class(&self, class_name: &str) -> bool {
            ARENA.with(|a| a.borrow().classes[self.0].iter().any(|c| *c == class_name))
        }
        fn attribute(&self, _name: &str) -> Option<&str> {
            None
        }
        fn is_root(&self) -> bool {
            self.parent().is_none()
        }
        fn parent(&self) -> Option<Self> {
            ARENA.with(|a| a.borrow().parents[self.0].map(Node))
        }
        fn element_children(&self) -> Vec<Self> {
            Vec::new()
        }
        fn preceding_element_siblings(&self) -> Vec<Self> {
            Vec::new()
        }
        fn has_no_content(&self) -> bool {
            true
        }
    }

    fn reset_arena() {
        ARENA.with(|a| *a.borrow_mut() = Arena::new());
    }

    fn sheet_with(css: &str, origin: StyleOrigin) -> Stylesheet {
        let mut sheet =
            Stylesheet::create(CssLevel::Css21, Some("UTF-8"), "test://sheet", None, origin, MediaSet::ALL, false, false);
        sheet.append_data(css.as_bytes()).unwrap();
        sheet.data_done().unwrap();
        sheet
    }

    #[test]
    fn single_matching_declaration_wins() {
        reset_arena();
        let node = ARENA.with(|a| a.borrow_mut().push("p", None, None));
        let sheet = sheet_with("p { color: #ff0000; }", StyleOrigin::Author);
        let style = compute_style(&[&sheet], node, MediaSet::ALL, None);
        assert_eq!(style.common.color, Colour::rgb(0xff, 0, 0));
    }

    #[test]
    fn higher_specificity_wins_regardless_of_rule_order() {
        reset_arena();
        let node = ARENA.with(|a| a.borrow_mut().push("p", Some("x"), None));
        let sheet = sheet_with("p { color: blue; } .x { color: red; }", StyleOrigin::Author);
        let style = compute_style(&[&sheet], node, MediaSet::ALL, None);
        assert_eq!(style.common.color, Colour::rgb(0xff, 0, 0));
    }

    #[test]
    fn equal_specificity_later_rule_wins() {
        reset_arena();
        let node = ARENA.with(|a| a.borrow_mut().push("p", None, None));
        let sheet = sheet_with("p { color: red; } p { color: blue; }", StyleOrigin::Author);
        let style = compute_style(&[&sheet], node, MediaSet::ALL, None);
        assert_eq!(style.common.color, Colour::from_css21_keyword("blue").unwrap());
    }

    #[test]
    fn important_inverts_origin_order() {
        reset_arena();
        let node = ARENA.with(|a| a.borrow_mut().push("p", None, None));
        let author = sheet_with("p { color: red !important; }", StyleOrigin::Author);
        let user = sheet_with("p { color: blue; }", StyleOrigin::User);
        let style = compute_style(&[&user, &author], node, MediaSet::ALL, None);
        assert_eq!(style.common.color, Colour::rgb(0xff, 0, 0));
    }

    #[test]
    fn unset_inheriting_property_copies_parent() {
        reset_arena();
        let parent_node = ARENA.with(|a| a.borrow_mut().push("div", None, None));
        let child_node = ARENA.with(|a| a.borrow_mut().push("p", None, Some(parent_node.0)));
        let sheet = sheet_with("div { color: green; }", StyleOrigin::Author);
        let parent_style = compute_style(&[&sheet], parent_node, MediaSet::ALL, None);
        let child_style = compute_style(&[&sheet], child_node, MediaSet::ALL, Some(&parent_style));
        assert_eq!(child_style.common.color, parent_style.common.color);
    }

    #[test]
    fn non_inheriting_property_falls_back_to_initial() {
        reset_arena();
        let parent_node = ARENA.with(|a| a.borrow_mut().push("div", None, None));
        let child_node = ARENA.with(|a| a.borrow_mut().push("p", None, Some(parent_node.0)));
        let sheet = sheet_with("div { background-color: red; }", StyleOrigin::Author);
        let parent_style = compute_style(&[&sheet], parent_node, MediaSet::ALL, None);
        let child_style = compute_style(&[&sheet], child_node, MediaSet::ALL, Some(&parent_style));
        assert_eq!(child_style.common.background_color, crate::computed::Common::initial().background_color);
    }

    #[test]
    fn explicit_inherit_copies_parent_even_without_default_inheritance() {
        reset_arena();
        let parent_node = ARENA.with(|a| a.borrow_mut().push("div", None, None));
        let child_node = ARENA.with(|a| a.borrow_mut().push("p", None, Some(parent_node.0)));
        let sheet =
            sheet_with("div { background-color: red; } p { background-color: inherit; }", StyleOrigin::Author);
        let parent_style = compute_style(&[&sheet], parent_node, MediaSet::ALL, None);
        let child_style = compute_style(&[&sheet], child_node, MediaSet::ALL, Some(&parent_style));
        assert_eq!(child_style.common.background_color, parent_style.common.background_color);
    }

    #[test]
    fn margin_shorthand_expands_to_four_declarations() {
        reset_arena();
        let node = ARENA.with(|a| a.borrow_mut().push("p", None, None));
        let sheet = sheet_with("p { margin: 1px 2px 3px 4px; }", StyleOrigin::Author);
        let style = compute_style(&[&sheet], node, MediaSet::ALL, None);
        let px = |n: i32| LengthOrKeyword::Length((Fixed::from_int(n), crate::bytecode::units::Unit::Px));
        assert_eq!(style.common.margin_top, px(1));
        assert_eq!(style.common.margin_right, px(2));
        assert_eq!(style.common.margin_bottom, px(3));
        assert_eq!(style.common.margin_left, px(4));
    }

    #[test]
    fn media_block_gates_declarations() {
        reset_arena();
        let node = ARENA.with(|a| a.borrow_mut().push("p", None, None));
        let sheet = sheet_with("@media print { p { color: red; } }", StyleOrigin::Author);
        let screen = compute_style(&[&sheet], node, MediaSet::SCREEN, None);
        let print = compute_style(&[&sheet], node, MediaSet::PRINT, None);
        assert_eq!(screen.common.color, crate::computed::Common::initial().color);
        assert_eq!(print.common.color, Colour::rgb(0xff, 0, 0));
    }

    #[test]
    fn child_combinator_is_respected_by_the_cascade() {
        reset_arena();
        let parent_node = ARENA.with(|a| a.borrow_mut().push("div", None, None));
        let child_node = ARENA.with(|a| a.borrow_mut().push("p", Some("x"), Some(parent_node.0)));
        let sheet = sheet_with("div > p.x { color: red; }", StyleOrigin::Author);
        assert!(parse_selector("div > p.x").unwrap().matches(child_node));
        let style = compute_style(&[&sheet], child_node, MediaSet::ALL, None);
        assert_eq!(style.common.color, Colour::rgb(0xff, 0, 0));
    }
}
