//! Property-value parsers: turn a declaration's component-value list
//! into bytecode operands, driven by the grammar table in
//! [`crate::properties`].
//!
//! Every parser here takes its cursor by `&mut` and, on failure,
//! returns `Err(())` without having consumed anything the caller can
//! observe — [`parse_property`] and [`parse_longhand`] are the only
//! functions that convert that into a [`CssError::Invalid`] naming the
//! offending property, and the only ones callers outside this module
//! should call.

mod shorthand;

use crate::bytecode::colour::Colour;
use crate::bytecode::opcodes::Opcode;
use crate::bytecode::units::{Unit, UnitCategory};
use crate::bytecode::{Operand, SET};
use crate::error::CssError;
use crate::fixed::Fixed;
use crate::parser::ComponentValue;
use crate::properties::{self, Grammar, Numeric};
use crate::strings::Dictionary;
use crate::tokenizer::CSSToken;

pub use shorthand::is_known_property;

/// Result of parsing one property's declared value.
#[derive(Debug, Clone)]
pub enum PropertyValue {
    /// The whole declaration was the single keyword `inherit`; carries
    /// every longhand the property name covers (more than one only for
    /// a shorthand).
    Inherit(Vec<Opcode>),
    /// One or more `(opcode, value)` pairs to encode (more than one
    /// only for a shorthand).
    Values(Vec<(Opcode, ParsedValue)>),
}

/// One longhand's parsed value, independent of its eventual OPV flags.
#[derive(Debug, Clone)]
pub enum ParsedValue {
    /// A plain keyword discriminant; no operands follow.
    Keyword(u16),
    /// A non-keyword value: the OPV's value field plus its operands.
    Value(u16, Vec<Operand>),
    /// A sentinel-terminated list of `(entry kind, operands)` chunks.
    List(Vec<(u16, Vec<Operand>)>),
}

type PResult<T> = Result<T, ()>;

/// Parse `tokens` as the value of property `name` (already lowercased
/// by the caller), which must be a name [`is_known_property`] accepts.
pub fn parse_property(
    dict: &mut Dictionary,
    name: &str,
    tokens: &[ComponentValue],
) -> Result<PropertyValue, CssError> {
    if is_bare_inherit(tokens) {
        return Ok(PropertyValue::Inherit(shorthand::longhands_of(name)));
    }
    if let Some(def) = properties::by_name(name) {
        let value = parse_longhand(dict, def.opcode, tokens)?;
        return Ok(PropertyValue::Values(vec![(def.opcode, value)]));
    }
    shorthand::parse_shorthand(dict, name, tokens)
}

fn is_bare_inherit(tokens: &[ComponentValue]) -> bool {
    let mut cur = Cursor::new(tokens);
    let Some(cv) = cur.peek() else { return false };
    let is_inherit = matches!(ident_of(cv), Some(ident) if ident.eq_ignore_ascii_case("inherit"));
    is_inherit && {
        cur.advance();
        cur.is_empty()
    }
}

/// Parse `tokens` as the value of a single longhand `opcode`.
pub fn parse_longhand(
    dict: &mut Dictionary,
    opcode: Opcode,
    tokens: &[ComponentValue],
) -> Result<ParsedValue, CssError> {
    let mut cur = Cursor::new(tokens);
    let result = parse_longhand_inner(&mut cur, dict, opcode)
        .and_then(|value| if cur.is_empty() { Ok(value) } else { Err(()) });
    result.map_err(|()| CssError::Invalid { property: opcode.property_name() })
}

fn parse_longhand_inner(cur: &mut Cursor, dict: &mut Dictionary, opcode: Opcode) -> PResult<ParsedValue> {
    let def = properties::by_opcode(opcode);
    Ok(match def.grammar {
        Grammar::Keyword(table) => ParsedValue::Keyword(parse_keyword_value(cur, table)?),
        Grammar::Numeric(ref numeric) => {
            let (value, ops) = parse_numeric(cur, numeric)?;
            wrap(value, ops)
        }
        Grammar::Colour { extra_keywords } => {
            let (value, ops) = parse_colour_value(cur, extra_keywords)?;
            wrap(value, ops)
        }
        Grammar::UriOrNone => {
            let (value, ops) = parse_uri_or_none(cur, dict)?;
            wrap(value, ops)
        }
        Grammar::Azimuth => {
            let (value, ops) = parse_azimuth(cur)?;
            wrap(value, ops)
        }
        Grammar::Position2D => {
            let (value, ops) = parse_position_2d(cur)?;
            ParsedValue::Value(value, ops)
        }
        Grammar::Elevation => {
            let (value, ops) = parse_elevation(cur)?;
            wrap(value, ops)
        }
        Grammar::Clip => {
            let (value, ops) = parse_clip(cur)?;
            ParsedValue::Value(value, ops)
        }
        Grammar::Content => parse_content(cur, dict)?,
        Grammar::Quotes => parse_quotes(cur, dict)?,
        Grammar::Counter => parse_counter_list(cur, dict)?,
        Grammar::StringList => parse_family_list(cur, dict)?,
        Grammar::LineHeight => {
            let (value, ops) = parse_line_height(cur)?;
            if ops.is_empty() { ParsedValue::Keyword(value) } else { ParsedValue::Value(value, ops) }
        }
        Grammar::FontWeight => {
            let (value, ops) = parse_font_weight(cur)?;
            wrap(value, ops)
        }
        Grammar::BorderSpacing => {
            let (value, ops) = parse_border_spacing(cur)?;
            ParsedValue::Value(value, ops)
        }
        Grammar::PlayDuring => {
            let (value, ops) = parse_play_during(cur, dict)?;
            wrap(value, ops)
        }
        Grammar::TextDecoration => ParsedValue::Keyword(parse_text_decoration(cur)?),
    })
}

fn wrap(value: u16, ops: Vec<Operand>) -> ParsedValue {
    if ops.is_empty() { ParsedValue::Keyword(value) } else { ParsedValue::Value(value, ops) }
}

/// A cursor over one declaration's component-value list. Whitespace is
/// transparently skipped; positions can be saved and restored so a
/// failed alternative in a shorthand parser leaves no trace.
pub(crate) struct Cursor<'a> {
    items: &'a [ComponentValue],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(items: &'a [ComponentValue]) -> Self {
        Cursor { items, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn restore(&mut self, pos: usize) {
        self.pos = pos;
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.items.get(self.pos), Some(ComponentValue::Token(CSSToken::Whitespace))) {
            self.pos += 1;
        }
    }

    pub(crate) fn is_empty(&mut self) -> bool {
        self.skip_whitespace();
        self.pos >= self.items.len()
    }

    pub(crate) fn peek(&mut self) -> Option<&'a ComponentValue> {
        self.skip_whitespace();
        self.items.get(self.pos)
    }

    pub(crate) fn advance(&mut self) -> Option<&'a ComponentValue> {
        self.skip_whitespace();
        let item = self.items.get(self.pos);
        if item.is_some() {
            self.pos += 1;
        }
        item
    }

    pub(crate) fn eat_comma(&mut self) -> bool {
        if matches!(self.peek(), Some(ComponentValue::Token(CSSToken::Comma))) {
            self.pos += 1;
            true
        } else {
            false
        }
    }
}

fn ident_of(cv: &ComponentValue) -> Option<&str> {
    match cv {
        ComponentValue::Token(CSSToken::Ident(s)) => Some(s.as_str()),
        _ => None,
    }
}

fn string_of(cv: &ComponentValue) -> Option<&str> {
    match cv {
        ComponentValue::Token(CSSToken::String(s)) => Some(s.as_str()),
        _ => None,
    }
}

fn hash_of(cv: &ComponentValue) -> Option<&str> {
    match cv {
        ComponentValue::Token(CSSToken::Hash { value, .. }) => Some(value.as_str()),
        _ => None,
    }
}

fn function_of(cv: &ComponentValue) -> Option<(&str, &[ComponentValue])> {
    match cv {
        ComponentValue::Function { name, value } => Some((name.as_str(), value.as_slice())),
        _ => None,
    }
}

enum RawNumber<'a> {
    Bare(f64),
    Percent(f64),
    Dimension(f64, &'a str),
}

fn raw_number_of(cv: &ComponentValue) -> Option<RawNumber<'_>> {
    match cv {
        ComponentValue::Token(CSSToken::Number { value, .. }) => Some(RawNumber::Bare(*value)),
        ComponentValue::Token(CSSToken::Percentage { value, .. }) => Some(RawNumber::Percent(*value)),
        ComponentValue::Token(CSSToken::Dimension { value, unit, .. }) => {
            Some(RawNumber::Dimension(*value, unit.as_str()))
        }
        _ => None,
    }
}

fn parse_keyword_value(cur: &mut Cursor, table: &[(&str, u16)]) -> PResult<u16> {
    let cv = cur.peek().ok_or(())?;
    let ident = ident_of(cv).ok_or(())?;
    let code = table.iter().find(|(k, _)| k.eq_ignore_ascii_case(ident)).map(|&(_, c)| c).ok_or(())?;
    cur.advance();
    Ok(code)
}

fn parse_numeric(cur: &mut Cursor, grammar: &Numeric) -> PResult<(u16, Vec<Operand>)> {
    if let Some(cv) = cur.peek() {
        if let Some(ident) = ident_of(cv) {
            if let Some(&(_, code)) =
                grammar.keywords.iter().find(|(k, _)| k.eq_ignore_ascii_case(ident))
            {
                cur.advance();
                return Ok((code, vec![]));
            }
        }
    }
    let cv = cur.peek().ok_or(())?;
    let raw = raw_number_of(cv).ok_or(())?;
    match raw {
        RawNumber::Bare(v) => {
            if let Some(as_unit) = grammar.bare_number_as {
                check_range(v, grammar)?;
                if !grammar.negative_ok && v < 0.0 {
                    return Err(());
                }
                cur.advance();
                return Ok((SET, vec![Operand::FixedUnit(Fixed::from_f64(v), as_unit)]));
            }
            if grammar.category == UnitCategory::NONE {
                if !grammar.negative_ok && v < 0.0 {
                    return Err(());
                }
                check_range(v, grammar)?;
                cur.advance();
                return Ok((SET, vec![Operand::Fixed(Fixed::from_f64(v))]));
            }
            if v == 0.0 {
                cur.advance();
                return Ok((SET, vec![Operand::FixedUnit(Fixed::ZERO, Unit::Px)]));
            }
            Err(())
        }
        RawNumber::Percent(v) => {
            if !grammar.category.contains(UnitCategory::PERCENTAGE) {
                return Err(());
            }
            if !grammar.negative_ok && v < 0.0 {
                return Err(());
            }
            check_range(v, grammar)?;
            cur.advance();
            Ok((SET, vec![Operand::FixedUnit(Fixed::from_f64(v), Unit::Percentage)]))
        }
        RawNumber::Dimension(v, unit_str) => {
            let unit = Unit::from_ident(unit_str).ok_or(())?;
            if !grammar.category.contains(unit.category()) {
                return Err(());
            }
            if !grammar.negative_ok && v < 0.0 {
                return Err(());
            }
            check_range(v, grammar)?;
            cur.advance();
            Ok((SET, vec![Operand::FixedUnit(Fixed::from_f64(v), unit)]))
        }
    }
}

fn check_range(v: f64, grammar: &Numeric) -> PResult<()> {
    match grammar.range {
        Some((lo, hi)) if v < lo || v > hi => Err(()),
        _ => Ok(()),
    }
}

fn parse_colour_value(cur: &mut Cursor, extra_keywords: &[(&str, u16)]) -> PResult<(u16, Vec<Operand>)> {
    let cv = cur.peek().ok_or(())?;
    if let Some(ident) = ident_of(cv) {
        let lower = ident.to_ascii_lowercase();
        if let Some(&(_, code)) = extra_keywords.iter().find(|(k, _)| *k == lower) {
            cur.advance();
            return Ok((code, vec![]));
        }
        let colour = Colour::from_css21_keyword(&lower).ok_or(())?;
        cur.advance();
        return Ok((SET, vec![Operand::Colour(colour)]));
    }
    if let Some(digits) = hash_of(cv) {
        let colour = Colour::from_hex(digits).ok_or(())?;
        cur.advance();
        return Ok((SET, vec![Operand::Colour(colour)]));
    }
    if let Some((name, args)) = function_of(cv) {
        if name.eq_ignore_ascii_case("rgb") {
            let colour = parse_rgb_function(args).ok_or(())?;
            cur.advance();
            return Ok((SET, vec![Operand::Colour(colour)]));
        }
    }
    Err(())
}

fn parse_rgb_function(args: &[ComponentValue]) -> Option<Colour> {
    let mut cur = Cursor::new(args);
    let r = parse_rgb_channel(&mut cur)?;
    if !cur.eat_comma() {
        return None;
    }
    let g = parse_rgb_channel(&mut cur)?;
    if !cur.eat_comma() {
        return None;
    }
    let b = parse_rgb_channel(&mut cur)?;
    if !cur.is_empty() {
        return None;
    }
    Some(Colour::rgb(r, g, b))
}

fn parse_rgb_channel(cur: &mut Cursor) -> Option<u8> {
    let cv = cur.advance()?;
    match cv {
        ComponentValue::Token(CSSToken::Number { value, .. }) => Some(value.clamp(0.0, 255.0) as u8),
        ComponentValue::Token(CSSToken::Percentage { value, .. }) => {
            Some((value.clamp(0.0, 100.0) / 100.0 * 255.0).round() as u8)
        }
        _ => None,
    }
}

fn parse_uri_or_none(cur: &mut Cursor, dict: &mut Dictionary) -> PResult<(u16, Vec<Operand>)> {
    let cv = cur.peek().ok_or(())?;
    if let Some(ident) = ident_of(cv) {
        if ident.eq_ignore_ascii_case("none") {
            cur.advance();
            return Ok((0, vec![]));
        }
        return Err(());
    }
    if let ComponentValue::Token(CSSToken::Url(url)) = cv {
        let handle = dict.intern(url);
        cur.advance();
        return Ok((SET, vec![Operand::StringRef(handle)]));
    }
    if let Some((name, args)) = function_of(cv) {
        if name.eq_ignore_ascii_case("url") {
            if let Some(s) = args.first().and_then(string_of) {
                let handle = dict.intern(s);
                cur.advance();
                return Ok((SET, vec![Operand::StringRef(handle)]));
            }
        }
    }
    Err(())
}

pub(crate) const AZIMUTH_POSITIONS: &[(&str, u16)] = &[
    ("left-side", 0),
    ("far-left", 1),
    ("left", 2),
    ("center-left", 3),
    ("center", 4),
    ("center-right", 5),
    ("right", 6),
    ("far-right", 7),
    ("right-side", 8),
];
pub(crate) const AZIMUTH_LEFTWARDS: u16 = 11;
pub(crate) const AZIMUTH_RIGHTWARDS: u16 = 12;
pub(crate) const AZIMUTH_NO_POSITION: u16 = 15;
pub(crate) const AZIMUTH_BEHIND_BIT: u16 = 0x10;

/// `center-left`/`center-right` are looked up in the same
/// `AZIMUTH_POSITIONS` table whether `behind` precedes or follows the
/// position keyword, so both orders recognize them identically.
fn parse_azimuth(cur: &mut Cursor) -> PResult<(u16, Vec<Operand>)> {
    if let Some(cv) = cur.peek() {
        if let Some(ident) = ident_of(cv) {
            let lower = ident.to_ascii_lowercase();
            if lower == "leftwards" {
                cur.advance();
                return Ok((AZIMUTH_LEFTWARDS, vec![]));
            }
            if lower == "rightwards" {
                cur.advance();
                return Ok((AZIMUTH_RIGHTWARDS, vec![]));
            }
        }
    }
    let mut position: Option<u16> = None;
    let mut behind = false;
    for _ in 0..2 {
        let Some(cv) = cur.peek() else { break };
        let Some(ident) = ident_of(cv) else { break };
        let lower = ident.to_ascii_lowercase();
        if lower == "behind" && !behind {
            behind = true;
            cur.advance();
            continue;
        }
        if position.is_none() {
            if let Some(&(_, code)) = AZIMUTH_POSITIONS.iter().find(|(k, _)| *k == lower) {
                position = Some(code);
                cur.advance();
                continue;
            }
        }
        break;
    }
    if position.is_some() || behind {
        let mut value = position.unwrap_or(AZIMUTH_NO_POSITION);
        if behind {
            value |= AZIMUTH_BEHIND_BIT;
        }
        return Ok((value, vec![]));
    }
    let cv = cur.peek().ok_or(())?;
    if let RawNumber::Dimension(v, unit_str) = raw_number_of(cv).ok_or(())? {
        let unit = Unit::from_ident(unit_str).ok_or(())?;
        if unit.category() != UnitCategory::ANGLE {
            return Err(());
        }
        cur.advance();
        return Ok((SET, vec![Operand::FixedUnit(Fixed::from_f64(v), unit)]));
    }
    Err(())
}

pub(crate) const ELEVATION_KEYWORDS: &[(&str, u16)] =
    &[("below", 0), ("level", 1), ("above", 2), ("higher", 3), ("lower", 4)];

fn parse_elevation(cur: &mut Cursor) -> PResult<(u16, Vec<Operand>)> {
    let cv = cur.peek().ok_or(())?;
    if let Some(ident) = ident_of(cv) {
        if let Some(&(_, code)) = ELEVATION_KEYWORDS.iter().find(|(k, _)| k.eq_ignore_ascii_case(ident)) {
            cur.advance();
            return Ok((code, vec![]));
        }
        return Err(());
    }
    if let RawNumber::Dimension(v, unit_str) = raw_number_of(cv).ok_or(())? {
        let unit = Unit::from_ident(unit_str).ok_or(())?;
        if unit.category() != UnitCategory::ANGLE {
            return Err(());
        }
        cur.advance();
        return Ok((SET, vec![Operand::FixedUnit(Fixed::from_f64(v), unit)]));
    }
    Err(())
}

/// `clip`'s value field is the 4-bit auto-mask described in
/// `crate::properties::clip_operand_schema`.
fn parse_clip(cur: &mut Cursor) -> PResult<(u16, Vec<Operand>)> {
    let cv = cur.peek().ok_or(())?;
    if let Some(ident) = ident_of(cv) {
        if ident.eq_ignore_ascii_case("auto") {
            cur.advance();
            return Ok((0b1111, vec![]));
        }
        return Err(());
    }
    let (name, args) = function_of(cv).ok_or(())?;
    if !name.eq_ignore_ascii_case("rect") {
        return Err(());
    }
    let mut inner = Cursor::new(args);
    let mut mask = 0u16;
    let mut ops = Vec::new();
    for i in 0..4u16 {
        if i > 0 && !inner.eat_comma() {
            return Err(());
        }
        let item = inner.peek().ok_or(())?;
        if let Some(ident) = ident_of(item) {
            if ident.eq_ignore_ascii_case("auto") {
                inner.advance();
                mask |= 1 << i;
                continue;
            }
            return Err(());
        }
        match raw_number_of(item).ok_or(())? {
            RawNumber::Dimension(v, unit_str) => {
                let unit = Unit::from_ident(unit_str).ok_or(())?;
                if unit.category() != UnitCategory::LENGTH {
                    return Err(());
                }
                inner.advance();
                ops.push(Operand::FixedUnit(Fixed::from_f64(v), unit));
            }
            RawNumber::Bare(v) if v == 0.0 => {
                inner.advance();
                ops.push(Operand::FixedUnit(Fixed::ZERO, Unit::Px));
            }
            _ => return Err(()),
        }
    }
    if !inner.is_empty() {
        return Err(());
    }
    cur.advance();
    Ok((mask, ops))
}

pub(crate) const FONT_WEIGHT_KEYWORDS: &[(&str, u16)] =
    &[("normal", 0), ("bold", 1), ("bolder", 2), ("lighter", 3)];

fn parse_font_weight(cur: &mut Cursor) -> PResult<(u16, Vec<Operand>)> {
    let cv = cur.peek().ok_or(())?;
    if let Some(ident) = ident_of(cv) {
        if let Some(&(_, code)) =
            FONT_WEIGHT_KEYWORDS.iter().find(|(k, _)| k.eq_ignore_ascii_case(ident))
        {
            cur.advance();
            return Ok((code, vec![]));
        }
        return Err(());
    }
    if let Some(RawNumber::Bare(v)) = raw_number_of(cv) {
        let n = v as i64;
        if (100..=900).contains(&n) && n % 100 == 0 {
            cur.advance();
            return Ok((SET, vec![Operand::Fixed(Fixed::from_int(n as i32))]));
        }
    }
    Err(())
}

fn parse_line_height(cur: &mut Cursor) -> PResult<(u16, Vec<Operand>)> {
    let cv = cur.peek().ok_or(())?;
    if let Some(ident) = ident_of(cv) {
        if ident.eq_ignore_ascii_case("normal") {
            cur.advance();
            return Ok((0, vec![]));
        }
        return Err(());
    }
    match raw_number_of(cv).ok_or(())? {
        RawNumber::Bare(v) if v >= 0.0 => {
            cur.advance();
            Ok((properties::LINE_HEIGHT_NUMBER, vec![Operand::Fixed(Fixed::from_f64(v))]))
        }
        RawNumber::Percent(v) if v >= 0.0 => {
            cur.advance();
            Ok((SET, vec![Operand::FixedUnit(Fixed::from_f64(v), Unit::Percentage)]))
        }
        RawNumber::Dimension(v, unit_str) if v >= 0.0 => {
            let unit = Unit::from_ident(unit_str).ok_or(())?;
            if unit.category() != UnitCategory::LENGTH {
                return Err(());
            }
            cur.advance();
            Ok((SET, vec![Operand::FixedUnit(Fixed::from_f64(v), unit)]))
        }
        _ => Err(()),
    }
}

fn parse_plain_length(cur: &mut Cursor) -> PResult<(Fixed, Unit)> {
    let cv = cur.peek().ok_or(())?;
    match raw_number_of(cv).ok_or(())? {
        RawNumber::Bare(v) if v == 0.0 => {
            cur.advance();
            Ok((Fixed::ZERO, Unit::Px))
        }
        RawNumber::Dimension(v, unit_str) if v >= 0.0 => {
            let unit = Unit::from_ident(unit_str).ok_or(())?;
            if unit.category() != UnitCategory::LENGTH {
                return Err(());
            }
            cur.advance();
            Ok((Fixed::from_f64(v), unit))
        }
        _ => Err(()),
    }
}

fn parse_border_spacing(cur: &mut Cursor) -> PResult<(u16, Vec<Operand>)> {
    let (h_value, h_unit) = parse_plain_length(cur)?;
    let (v_value, v_unit) = if cur.is_empty() { (h_value, h_unit) } else { parse_plain_length(cur)? };
    Ok((SET, vec![Operand::FixedUnit(h_value, h_unit), Operand::FixedUnit(v_value, v_unit)]))
}

fn parse_play_during(cur: &mut Cursor, dict: &mut Dictionary) -> PResult<(u16, Vec<Operand>)> {
    let cv = cur.peek().ok_or(())?;
    if let Some(ident) = ident_of(cv) {
        if ident.eq_ignore_ascii_case("auto") {
            cur.advance();
            return Ok((0, vec![]));
        }
        if ident.eq_ignore_ascii_case("none") {
            cur.advance();
            return Ok((1, vec![]));
        }
        return Err(());
    }
    let (name, args) = function_of(cv).ok_or(())?;
    if !name.eq_ignore_ascii_case("url") {
        return Err(());
    }
    let url = args.first().and_then(string_of).ok_or(())?.to_string();
    let handle = dict.intern(&url);
    cur.advance();
    // `mix`/`repeat` modifiers, if present, are accepted and ignored:
    // CSS 2.1 play-during rarely combines them and nothing downstream
    // distinguishes the combination yet.
    while let Some(next) = cur.peek() {
        let is_modifier = ident_of(next)
            .map(|i| i.eq_ignore_ascii_case("mix") || i.eq_ignore_ascii_case("repeat"))
            .unwrap_or(false);
        if is_modifier {
            cur.advance();
        } else {
            break;
        }
    }
    Ok((SET, vec![Operand::StringRef(handle)]))
}

const POSITION_KEYWORD_PERCENT: &[(&str, f64)] =
    &[("left", 0.0), ("center", 50.0), ("right", 100.0), ("top", 0.0), ("bottom", 100.0)];

fn parse_position_2d(cur: &mut Cursor) -> PResult<(u16, Vec<Operand>)> {
    let first = parse_position_component(cur)?;
    let second =
        if cur.is_empty() { (Fixed::from_f64(50.0), Unit::Percentage) } else { parse_position_component(cur)? };
    if !cur.is_empty() {
        return Err(());
    }
    Ok((SET, vec![Operand::FixedUnit(first.0, first.1), Operand::FixedUnit(second.0, second.1)]))
}

fn parse_position_component(cur: &mut Cursor) -> PResult<(Fixed, Unit)> {
    let cv = cur.peek().ok_or(())?;
    if let Some(ident) = ident_of(cv) {
        let lower = ident.to_ascii_lowercase();
        if let Some(&(_, pct)) = POSITION_KEYWORD_PERCENT.iter().find(|(k, _)| *k == lower) {
            cur.advance();
            return Ok((Fixed::from_f64(pct), Unit::Percentage));
        }
        return Err(());
    }
    match raw_number_of(cv).ok_or(())? {
        RawNumber::Percent(v) => {
            cur.advance();
            Ok((Fixed::from_f64(v), Unit::Percentage))
        }
        RawNumber::Dimension(v, unit_str) => {
            let unit = Unit::from_ident(unit_str).ok_or(())?;
            if unit.category() != UnitCategory::LENGTH {
                return Err(());
            }
            cur.advance();
            Ok((Fixed::from_f64(v), unit))
        }
        RawNumber::Bare(v) if v == 0.0 => {
            cur.advance();
            Ok((Fixed::ZERO, Unit::Px))
        }
        _ => Err(()),
    }
}

fn parse_quotes(cur: &mut Cursor, dict: &mut Dictionary) -> PResult<ParsedValue> {
    if let Some(cv) = cur.peek() {
        if let Some(ident) = ident_of(cv) {
            if ident.eq_ignore_ascii_case("none") {
                cur.advance();
                return Ok(ParsedValue::Keyword(properties::QUOTES_NONE));
            }
        }
    }
    let mut entries = Vec::new();
    while !cur.is_empty() {
        let open = string_of(cur.peek().ok_or(())?).ok_or(())?.to_string();
        cur.advance();
        let close = string_of(cur.peek().ok_or(())?).ok_or(())?.to_string();
        cur.advance();
        let open_ref = dict.intern(&open);
        let close_ref = dict.intern(&close);
        entries.push((properties::QUOTES_ENTRY_OPEN, vec![Operand::StringRef(open_ref)]));
        entries.push((properties::QUOTES_ENTRY_CLOSE, vec![Operand::StringRef(close_ref)]));
    }
    if entries.is_empty() {
        return Err(());
    }
    Ok(ParsedValue::List(entries))
}

fn parse_counter_list(cur: &mut Cursor, dict: &mut Dictionary) -> PResult<ParsedValue> {
    if let Some(cv) = cur.peek() {
        if let Some(ident) = ident_of(cv) {
            if ident.eq_ignore_ascii_case("none") {
                cur.advance();
                return Ok(ParsedValue::Keyword(properties::COUNTER_NONE));
            }
        }
    }
    let mut entries = Vec::new();
    while !cur.is_empty() {
        let name = ident_of(cur.peek().ok_or(())?).ok_or(())?.to_string();
        cur.advance();
        let mut n = 1i32;
        if let Some(next) = cur.peek() {
            if let Some(RawNumber::Bare(v)) = raw_number_of(next) {
                n = v as i32;
                cur.advance();
            }
        }
        let handle = dict.intern(&name);
        entries.push((
            properties::COUNTER_ENTRY,
            vec![Operand::StringRef(handle), Operand::Fixed(Fixed::from_int(n))],
        ));
    }
    if entries.is_empty() {
        return Err(());
    }
    Ok(ParsedValue::List(entries))
}

fn parse_family_list(cur: &mut Cursor, dict: &mut Dictionary) -> PResult<ParsedValue> {
    let mut entries = Vec::new();
    loop {
        if cur.is_empty() {
            break;
        }
        let cv = cur.peek().ok_or(())?;
        if let Some(ident) = ident_of(cv) {
            let lower = ident.to_ascii_lowercase();
            if let Some(&(_, code)) =
                properties::GENERIC_FAMILY_KEYWORDS.iter().find(|(k, _)| *k == lower)
            {
                cur.advance();
                entries.push((
                    properties::FAMILY_ENTRY_GENERIC,
                    vec![Operand::Fixed(Fixed::from_int(code as i32))],
                ));
            } else {
                let mut name = ident.to_string();
                cur.advance();
                while let Some(next) = cur.peek() {
                    let Some(more) = ident_of(next) else { break };
                    name.push(' ');
                    name.push_str(more);
                    cur.advance();
                }
                let handle = dict.intern(&name);
                entries.push((properties::FAMILY_ENTRY_NAMED, vec![Operand::StringRef(handle)]));
            }
        } else if let Some(s) = string_of(cv) {
            let handle = dict.intern(s);
            cur.advance();
            entries.push((properties::FAMILY_ENTRY_NAMED, vec![Operand::StringRef(handle)]));
        } else {
            return Err(());
        }
        if !cur.eat_comma() {
            break;
        }
    }
    if entries.is_empty() {
        return Err(());
    }
    Ok(ParsedValue::List(entries))
}

fn list_style_type_code(ident: &str) -> PResult<u16> {
    let def = properties::by_opcode(Opcode::ListStyleType);
    let Grammar::Keyword(table) = def.grammar else { unreachable!("list-style-type is a keyword grammar") };
    table.iter().find(|(k, _)| k.eq_ignore_ascii_case(ident)).map(|&(_, c)| c).ok_or(())
}

fn parse_content(cur: &mut Cursor, dict: &mut Dictionary) -> PResult<ParsedValue> {
    let mut entries = Vec::new();
    while !cur.is_empty() {
        let cv = cur.peek().ok_or(())?;
        if let Some(s) = string_of(cv) {
            let handle = dict.intern(s);
            cur.advance();
            entries.push((properties::CONTENT_ENTRY_STRING, vec![Operand::StringRef(handle)]));
            continue;
        }
        if let Some(ident) = ident_of(cv) {
            let kind = match ident.to_ascii_lowercase().as_str() {
                "open-quote" => properties::CONTENT_ENTRY_OPEN_QUOTE,
                "close-quote" => properties::CONTENT_ENTRY_CLOSE_QUOTE,
                "no-open-quote" => properties::CONTENT_ENTRY_NO_OPEN_QUOTE,
                "no-close-quote" => properties::CONTENT_ENTRY_NO_CLOSE_QUOTE,
                _ => return Err(()),
            };
            cur.advance();
            entries.push((kind, vec![]));
            continue;
        }
        let (name, args) = function_of(cv).ok_or(())?;
        match name.to_ascii_lowercase().as_str() {
            "attr" => {
                let mut inner = Cursor::new(args);
                let ident = ident_of(inner.peek().ok_or(())?).ok_or(())?.to_string();
                let handle = dict.intern(&ident);
                cur.advance();
                entries.push((properties::CONTENT_ENTRY_ATTR, vec![Operand::StringRef(handle)]));
            }
            "url" => {
                let mut inner = Cursor::new(args);
                let s = string_of(inner.peek().ok_or(())?).ok_or(())?.to_string();
                let handle = dict.intern(&s);
                cur.advance();
                entries.push((properties::CONTENT_ENTRY_URL, vec![Operand::StringRef(handle)]));
            }
            "counter" => {
                let mut inner = Cursor::new(args);
                let name = ident_of(inner.peek().ok_or(())?).ok_or(())?.to_string();
                inner.advance();
                let style = if inner.eat_comma() {
                    let ident = ident_of(inner.peek().ok_or(())?).ok_or(())?;
                    let code = list_style_type_code(ident)?;
                    inner.advance();
                    code
                } else {
                    3 // decimal
                };
                let name_ref = dict.intern(&name);
                cur.advance();
                entries.push((
                    properties::CONTENT_ENTRY_COUNTER,
                    vec![Operand::StringRef(name_ref), Operand::Fixed(Fixed::from_int(style as i32))],
                ));
            }
            "counters" => {
                let mut inner = Cursor::new(args);
                let name = ident_of(inner.peek().ok_or(())?).ok_or(())?.to_string();
                inner.advance();
                if !inner.eat_comma() {
                    return Err(());
                }
                let sep = string_of(inner.peek().ok_or(())?).ok_or(())?.to_string();
                inner.advance();
                let style = if inner.eat_comma() {
                    let ident = ident_of(inner.peek().ok_or(())?).ok_or(())?;
                    let code = list_style_type_code(ident)?;
                    inner.advance();
                    code
                } else {
                    3
                };
                let name_ref = dict.intern(&name);
                let sep_ref = dict.intern(&sep);
                cur.advance();
                entries.push((
                    properties::CONTENT_ENTRY_COUNTERS,
                    vec![
                        Operand::StringRef(name_ref),
                        Operand::StringRef(sep_ref),
                        Operand::Fixed(Fixed::from_int(style as i32)),
                    ],
                ));
            }
            _ => return Err(()),
        }
    }
    if entries.is_empty() {
        return Err(());
    }
    Ok(ParsedValue::List(entries))
}

const TD_UNDERLINE: u16 = 1;
const TD_OVERLINE: u16 = 2;
const TD_LINE_THROUGH: u16 = 4;
const TD_BLINK: u16 = 8;

fn parse_text_decoration(cur: &mut Cursor) -> PResult<u16> {
    if let Some(cv) = cur.peek() {
        if let Some(ident) = ident_of(cv) {
            if ident.eq_ignore_ascii_case("none") {
                cur.advance();
                return Ok(0);
            }
        }
    }
    let mut mask = 0u16;
    while !cur.is_empty() {
        let ident = ident_of(cur.peek().ok_or(())?).ok_or(())?;
        let bit = match ident.to_ascii_lowercase().as_str() {
            "underline" => TD_UNDERLINE,
            "overline" => TD_OVERLINE,
            "line-through" => TD_LINE_THROUGH,
            "blink" => TD_BLINK,
            _ => return Err(()),
        };
        if mask & bit != 0 {
            return Err(());
        }
        mask |= bit;
        cur.advance();
    }
    if mask == 0 {
        return Err(());
    }
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{CSSParser, Declaration};
    use crate::tokenizer::CSSTokenizer;

    fn parse_decl(css: &str) -> Declaration {
        let mut tokenizer = CSSTokenizer::new(css);
        tokenizer.run();
        let mut parser = CSSParser::new(tokenizer.into_tokens());
        let decls = parser.parse_declaration_list();
        decls.into_iter().next().expect("one declaration")
    }

    #[test]
    fn colour_keyword_parses() {
        let decl = parse_decl("color: red;");
        let mut dict = Dictionary::new();
        let value = parse_longhand(&mut dict, Opcode::Color, &decl.value).unwrap();
        match value {
            ParsedValue::Value(SET_, ops) if SET_ == SET => {
                assert_eq!(ops, vec![Operand::Colour(Colour::rgb(0xff, 0, 0))]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn length_unitless_zero_is_px() {
        let decl = parse_decl("margin-top: 0;");
        let mut dict = Dictionary::new();
        let value = parse_longhand(&mut dict, Opcode::MarginTop, &decl.value).unwrap();
        match value {
            ParsedValue::Value(v, ops) if v == SET => {
                assert_eq!(ops, vec![Operand::FixedUnit(Fixed::ZERO, Unit::Px)]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn negative_width_rejected() {
        let decl = parse_decl("width: -5px;");
        let mut dict = Dictionary::new();
        assert!(parse_longhand(&mut dict, Opcode::Width, &decl.value).is_err());
    }

    #[test]
    fn negative_margin_accepted() {
        let decl = parse_decl("margin-left: -5px;");
        let mut dict = Dictionary::new();
        assert!(parse_longhand(&mut dict, Opcode::MarginLeft, &decl.value).is_ok());
    }

    #[test]
    fn azimuth_recognizes_center_right_before_and_after_behind() {
        let mut dict = Dictionary::new();
        let before = parse_decl("azimuth: behind center-right;");
        let after = parse_decl("azimuth: center-right behind;");
        let v1 = parse_longhand(&mut dict, Opcode::Azimuth, &before.value).unwrap();
        let v2 = parse_longhand(&mut dict, Opcode::Azimuth, &after.value).unwrap();
        let code = |pv: &ParsedValue| match pv {
            ParsedValue::Keyword(v) => *v,
            _ => panic!("expected keyword"),
        };
        assert_eq!(code(&v1), code(&v2));
        assert_eq!(code(&v1) & 0x0f, 5); // center-right
        assert_eq!(code(&v1) & AZIMUTH_BEHIND_BIT, AZIMUTH_BEHIND_BIT);
    }

    #[test]
    fn inherit_is_recognized_globally() {
        let decl = parse_decl("color: inherit;");
        let mut dict = Dictionary::new();
        let value = parse_property(&mut dict, "color", &decl.value).unwrap();
        assert!(matches!(value, PropertyValue::Inherit(opcodes) if opcodes == vec![Opcode::Color]));
    }

    #[test]
    fn quotes_none_is_keyword_not_list() {
        let decl = parse_decl("quotes: none;");
        let mut dict = Dictionary::new();
        let value = parse_longhand(&mut dict, Opcode::Quotes, &decl.value).unwrap();
        assert!(matches!(value, ParsedValue::Keyword(0)));
    }

    #[test]
    fn font_family_collapses_multi_word_names() {
        let decl = parse_decl("font-family: Times New Roman, serif;");
        let mut dict = Dictionary::new();
        let value = parse_longhand(&mut dict, Opcode::FontFamily, &decl.value).unwrap();
        let ParsedValue::List(entries) = value else { panic!("expected list") };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, properties::FAMILY_ENTRY_NAMED);
        assert_eq!(entries[1].0, properties::FAMILY_ENTRY_GENERIC);
    }
}
