//! The property bytecode: a compact, self-delimiting encoding of every CSS
//! 2.1 declaration.
//!
//! A declaration is one 32-bit OPV header — `opcode(14) | flags(2) |
//! value(16)` — followed by zero or more inline operands whose shape is a
//! pure function of `(opcode, value)`. List-valued properties append a
//! sequence of `(entry OPV, entry operands)` pairs terminated by a sentinel
//! entry value; see [`write_list`]/[`read_list`].

pub mod colour;
pub mod opcodes;
pub mod units;

use crate::error::CssError;
use crate::strings::StringRef;
use colour::Colour;
use opcodes::Opcode;
use units::Unit;

/// The designated value that signals "typed operands follow inline" rather
/// than a plain keyword discriminant.
pub const SET: u16 = 0xffff;

/// Flags packed into the OPV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags(u8);

impl Flags {
    /// No flags set.
    pub const NONE: Flags = Flags(0);
    /// The declaration's value is `inherit`.
    pub const INHERIT: Flags = Flags(0b01);
    /// The declaration carries `!important`.
    pub const IMPORTANT: Flags = Flags(0b10);

    /// Combine two flag sets.
    #[must_use]
    pub const fn union(self, other: Flags) -> Flags {
        Flags(self.0 | other.0)
    }

    /// Whether the inherit bit is set.
    #[must_use]
    pub const fn is_inherit(self) -> bool {
        self.0 & Self::INHERIT.0 != 0
    }

    /// Whether the important bit is set.
    #[must_use]
    pub const fn is_important(self) -> bool {
        self.0 & Self::IMPORTANT.0 != 0
    }

    fn from_bits(bits: u8) -> Flags {
        Flags(bits & 0b11)
    }

    const fn bits(self) -> u8 {
        self.0
    }
}

/// The 32-bit OPV header: `opcode(14) | flags(2) | value(16)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opv(u32);

impl Opv {
    /// Pack an opcode, flag set, and value into one OPV word.
    #[must_use]
    pub fn build(opcode: Opcode, flags: Flags, value: u16) -> Opv {
        let opcode_bits = opcode_to_bits(opcode) as u32 & 0x3fff;
        let flags_bits = flags.bits() as u32 & 0b11;
        let value_bits = value as u32;
        Opv((opcode_bits << 18) | (flags_bits << 16) | value_bits)
    }

    /// Extract the opcode.
    #[must_use]
    pub fn opcode(self) -> Opcode {
        bits_to_opcode(((self.0 >> 18) & 0x3fff) as u16)
    }

    /// Extract the flags.
    #[must_use]
    pub fn flags(self) -> Flags {
        Flags::from_bits(((self.0 >> 16) & 0b11) as u8)
    }

    /// Extract the value field.
    #[must_use]
    pub fn value(self) -> u16 {
        (self.0 & 0xffff) as u16
    }

    /// True if this declaration's value is `inherit`.
    #[must_use]
    pub fn is_inherit(self) -> bool {
        self.flags().is_inherit()
    }

    /// True if this declaration carries `!important`.
    #[must_use]
    pub fn is_important(self) -> bool {
        self.flags().is_important()
    }

    /// Raw little-endian byte encoding: one 32-bit OPV, little-endian
    /// within a buffer.
    #[must_use]
    pub fn to_le_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    /// Decode from little-endian bytes.
    #[must_use]
    pub fn from_le_bytes(bytes: [u8; 4]) -> Opv {
        Opv(u32::from_le_bytes(bytes))
    }
}

/// Stable numbering of opcodes within the 14-bit field. This indirection
/// keeps [`Opcode`]'s declaration order free to change without breaking
/// already-encoded bytecode (none is persisted across process boundaries
/// per `spec.md` §6, but keeping the mapping centralized avoids relying on
/// `Opcode`'s discriminant values directly).
fn opcode_to_bits(opcode: Opcode) -> u16 {
    ALL_OPCODES
        .iter()
        .position(|&o| o == opcode)
        .expect("ALL_OPCODES is exhaustive over Opcode") as u16
}

fn bits_to_opcode(bits: u16) -> Opcode {
    ALL_OPCODES[bits as usize]
}

/// Every opcode, in a fixed, stable order. Kept in sync with [`Opcode`] by
/// the exhaustiveness test below.
pub(crate) const ALL_OPCODES: &[Opcode] = &[
    Opcode::Azimuth,
    Opcode::BackgroundAttachment,
    Opcode::BackgroundColor,
    Opcode::BackgroundImage,
    Opcode::BackgroundPosition,
    Opcode::BackgroundRepeat,
    Opcode::BorderCollapse,
    Opcode::BorderSpacing,
    Opcode::BorderTopColor,
    Opcode::BorderRightColor,
    Opcode::BorderBottomColor,
    Opcode::BorderLeftColor,
    Opcode::BorderTopStyle,
    Opcode::BorderRightStyle,
    Opcode::BorderBottomStyle,
    Opcode::BorderLeftStyle,
    Opcode::BorderTopWidth,
    Opcode::BorderRightWidth,
    Opcode::BorderBottomWidth,
    Opcode::BorderLeftWidth,
    Opcode::Bottom,
    Opcode::CaptionSide,
    Opcode::Clear,
    Opcode::Clip,
    Opcode::Color,
    Opcode::Content,
    Opcode::CounterIncrement,
    Opcode::CounterReset,
    Opcode::CueAfter,
    Opcode::CueBefore,
    Opcode::Cursor,
    Opcode::Direction,
    Opcode::Display,
    Opcode::Elevation,
    Opcode::EmptyCells,
    Opcode::Float,
    Opcode::FontFamily,
    Opcode::FontSize,
    Opcode::FontStyle,
    Opcode::FontVariant,
    Opcode::FontWeight,
    Opcode::Height,
    Opcode::Left,
    Opcode::LetterSpacing,
    Opcode::LineHeight,
    Opcode::ListStyleImage,
    Opcode::ListStylePosition,
    Opcode::ListStyleType,
    Opcode::MarginTop,
    Opcode::MarginRight,
    Opcode::MarginBottom,
    Opcode::MarginLeft,
    Opcode::MaxHeight,
    Opcode::MaxWidth,
    Opcode::MinHeight,
    Opcode::MinWidth,
    Opcode::Orphans,
    Opcode::OutlineColor,
    Opcode::OutlineStyle,
    Opcode::OutlineWidth,
    Opcode::Overflow,
    Opcode::PaddingTop,
    Opcode::PaddingRight,
    Opcode::PaddingBottom,
    Opcode::PaddingLeft,
    Opcode::PageBreakAfter,
    Opcode::PageBreakBefore,
    Opcode::PageBreakInside,
    Opcode::PauseAfter,
    Opcode::PauseBefore,
    Opcode::Pitch,
    Opcode::PitchRange,
    Opcode::PlayDuring,
    Opcode::Position,
    Opcode::Quotes,
    Opcode::Richness,
    Opcode::Right,
    Opcode::Speak,
    Opcode::SpeakHeader,
    Opcode::SpeakNumeral,
    Opcode::SpeakPunctuation,
    Opcode::SpeechRate,
    Opcode::Stress,
    Opcode::TableLayout,
    Opcode::TextAlign,
    Opcode::TextDecoration,
    Opcode::TextIndent,
    Opcode::TextTransform,
    Opcode::Top,
    Opcode::UnicodeBidi,
    Opcode::VerticalAlign,
    Opcode::Visibility,
    Opcode::VoiceFamily,
    Opcode::Volume,
    Opcode::WhiteSpace,
    Opcode::Widows,
    Opcode::Width,
    Opcode::WordSpacing,
    Opcode::ZIndex,
];

/// One typed operand following an OPV header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    /// A fixed-point number plus its unit (e.g. a length or angle).
    FixedUnit(crate::fixed::Fixed, Unit),
    /// A bare fixed-point number (e.g. `font-weight: 700`, `z-index`).
    Fixed(crate::fixed::Fixed),
    /// A resolved colour.
    Colour(Colour),
    /// A reference into the sheet's string dictionary.
    StringRef(StringRef),
}

impl Operand {
    /// Append this operand's bytes to `out`.
    fn write(self, out: &mut Vec<u8>) {
        match self {
            Operand::FixedUnit(fixed, unit) => {
                out.extend_from_slice(&fixed.to_raw().to_le_bytes());
                out.extend_from_slice(&(unit_to_bits(unit) as u32).to_le_bytes());
            }
            Operand::Fixed(fixed) => {
                out.extend_from_slice(&fixed.to_raw().to_le_bytes());
            }
            Operand::Colour(colour) => {
                let tag: u32 = match colour {
                    Colour::Transparent => 1,
                    Colour::Argb(_) => 0,
                };
                out.extend_from_slice(&colour.to_bits().to_le_bytes());
                out.extend_from_slice(&tag.to_le_bytes());
            }
            Operand::StringRef(handle) => {
                out.extend_from_slice(&string_ref_to_bits(handle).to_le_bytes());
            }
        }
    }
}

/// What operand(s) follow an OPV header, a pure function of `(opcode,
/// value)` per `spec.md` §3's invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    /// `Operand::FixedUnit`
    FixedUnit,
    /// `Operand::Fixed`
    Fixed,
    /// `Operand::Colour`
    Colour,
    /// `Operand::StringRef`
    StringRef,
}

impl OperandKind {
    /// Byte length this operand kind occupies in the stream.
    #[must_use]
    pub const fn byte_len(self) -> usize {
        match self {
            OperandKind::FixedUnit => 8,
            OperandKind::Fixed => 4,
            OperandKind::Colour => 8,
            OperandKind::StringRef => 4,
        }
    }
}

fn unit_to_bits(unit: Unit) -> u8 {
    unit as u8
}

fn bits_to_unit(bits: u8) -> Option<Unit> {
    const UNITS: [Unit; 16] = [
        Unit::Px,
        Unit::Em,
        Unit::Ex,
        Unit::In,
        Unit::Cm,
        Unit::Mm,
        Unit::Pt,
        Unit::Pc,
        Unit::Percentage,
        Unit::Deg,
        Unit::Grad,
        Unit::Rad,
        Unit::S,
        Unit::Ms,
        Unit::Hz,
        Unit::Khz,
    ];
    UNITS.get(bits as usize).copied()
}

fn string_ref_to_bits(handle: StringRef) -> u32 {
    handle.to_raw()
}

/// Write one declaration (OPV plus operands) to `out`.
pub fn write_declaration(out: &mut Vec<u8>, opv: Opv, operands: &[Operand]) {
    out.extend_from_slice(&opv.to_le_bytes());
    for &operand in operands {
        operand.write(out);
    }
}

/// Append a sentinel-terminated list of `(entry value, operands)` chunks for
/// a list-valued property (`font-family`, `voice-family`, `quotes`,
/// `content`, `counter-increment`, `counter-reset`). Each chunk is written as
/// a small entry header (`entry value` as 2 bytes) followed by its operands;
/// the list ends with the 2-byte `sentinel` value and no operands.
pub fn write_list(out: &mut Vec<u8>, entries: &[(u16, &[Operand])], sentinel: u16) {
    for &(value, operands) in entries {
        out.extend_from_slice(&value.to_le_bytes());
        for &operand in operands {
            operand.write(out);
        }
    }
    out.extend_from_slice(&sentinel.to_le_bytes());
}

/// A cursor for reading bytecode back out of a style block.
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Begin reading `bytes` from the start.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, pos: 0 }
    }

    /// Current byte offset.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Whether every byte has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn read_u32(&mut self) -> Result<u32, CssError> {
        let slice = self
            .bytes
            .get(self.pos..self.pos + 4)
            .ok_or(CssError::Eof)?;
        self.pos += 4;
        Ok(u32::from_le_bytes(slice.try_into().expect("checked length 4")))
    }

    fn read_u16(&mut self) -> Result<u16, CssError> {
        let slice = self
            .bytes
            .get(self.pos..self.pos + 2)
            .ok_or(CssError::Eof)?;
        self.pos += 2;
        Ok(u16::from_le_bytes(slice.try_into().expect("checked length 2")))
    }

    /// Read one OPV header.
    pub fn read_opv(&mut self) -> Result<Opv, CssError> {
        self.read_u32().map(Opv)
    }

    /// Read one operand of the given kind.
    pub fn read_operand(&mut self, kind: OperandKind) -> Result<Operand, CssError> {
        Ok(match kind {
            OperandKind::FixedUnit => {
                let raw = self.read_u32()? as i32;
                let unit_bits = self.read_u32()?;
                let unit = bits_to_unit(unit_bits as u8).ok_or(CssError::Eof)?;
                Operand::FixedUnit(crate::fixed::Fixed::from_raw(raw), unit)
            }
            OperandKind::Fixed => {
                let raw = self.read_u32()? as i32;
                Operand::Fixed(crate::fixed::Fixed::from_raw(raw))
            }
            OperandKind::Colour => {
                let bits = self.read_u32()?;
                let tag = self.read_u32()?;
                let colour = if tag == 1 {
                    Colour::Transparent
                } else {
                    Colour::Argb(bits)
                };
                Operand::Colour(colour)
            }
            OperandKind::StringRef => {
                let bits = self.read_u32()?;
                Operand::StringRef(string_ref_from_bits(bits))
            }
        })
    }

    /// Read a full declaration given the operand schema for its
    /// `(opcode, value)` pair.
    pub fn read_declaration(&mut self, schema: &[OperandKind]) -> Result<(Opv, Vec<Operand>), CssError> {
        let opv = self.read_opv()?;
        let mut operands = Vec::with_capacity(schema.len());
        for &kind in schema {
            operands.push(self.read_operand(kind)?);
        }
        Ok((opv, operands))
    }

    /// Read one entry header (2-byte value) of a sentinel-terminated list.
    /// Returns `None` once `sentinel` is read.
    pub fn read_list_entry(&mut self, sentinel: u16) -> Result<Option<u16>, CssError> {
        let value = self.read_u16()?;
        if value == sentinel {
            Ok(None)
        } else {
            Ok(Some(value))
        }
    }
}

fn string_ref_from_bits(bits: u32) -> StringRef {
    StringRef::from_raw(bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::Fixed;

    #[test]
    fn opv_round_trips_opcode_flags_value() {
        let opv = Opv::build(Opcode::Color, Flags::IMPORTANT, SET);
        assert_eq!(opv.opcode(), Opcode::Color);
        assert_eq!(opv.flags(), Flags::IMPORTANT);
        assert_eq!(opv.value(), SET);
        assert!(opv.is_important());
        assert!(!opv.is_inherit());
    }

    #[test]
    fn opv_byte_round_trip() {
        let opv = Opv::build(Opcode::MarginTop, Flags::NONE, SET);
        let bytes = opv.to_le_bytes();
        assert_eq!(Opv::from_le_bytes(bytes), opv);
    }

    #[test]
    fn all_opcodes_table_is_exhaustive_and_unique() {
        use std::collections::HashSet;
        let set: HashSet<_> = ALL_OPCODES.iter().collect();
        assert_eq!(set.len(), ALL_OPCODES.len(), "duplicate opcode in table");
    }

    #[test]
    fn declaration_with_colour_operand_round_trips() {
        let mut dict = crate::strings::Dictionary::new();
        let _unused = &mut dict;
        let opv = Opv::build(Opcode::Color, Flags::NONE, SET);
        let operand = Operand::Colour(Colour::rgb(0xff, 0x00, 0x00));
        let mut buf = Vec::new();
        write_declaration(&mut buf, opv, &[operand]);

        let mut reader = Reader::new(&buf);
        let (read_opv, operands) = reader
            .read_declaration(&[OperandKind::Colour])
            .expect("decode");
        assert_eq!(read_opv, opv);
        assert_eq!(operands, vec![operand]);
        assert!(reader.is_empty());
    }

    #[test]
    fn declaration_with_fixed_unit_operand_round_trips() {
        let opv = Opv::build(Opcode::MarginTop, Flags::NONE, SET);
        let operand = Operand::FixedUnit(Fixed::from_int(4), Unit::Px);
        let mut buf = Vec::new();
        write_declaration(&mut buf, opv, &[operand]);

        let mut reader = Reader::new(&buf);
        let (_, operands) = reader
            .read_declaration(&[OperandKind::FixedUnit])
            .expect("decode");
        assert_eq!(operands, vec![operand]);
    }

    #[test]
    fn unterminated_buffer_yields_eof_not_panic() {
        let mut reader = Reader::new(&[0u8, 1, 2]);
        assert_eq!(reader.read_opv(), Err(CssError::Eof));
    }

    #[test]
    fn inherit_declaration_has_no_operands() {
        let opv = Opv::build(Opcode::Color, Flags::INHERIT, 0);
        let mut buf = Vec::new();
        write_declaration(&mut buf, opv, &[]);
        let mut reader = Reader::new(&buf);
        let (read_opv, operands) = reader.read_declaration(&[]).expect("decode");
        assert!(read_opv.is_inherit());
        assert!(operands.is_empty());
    }

    #[test]
    fn list_terminates_on_sentinel() {
        const QUOTES_STRING: u16 = 1;
        const QUOTES_NONE: u16 = 0;
        let a = crate::strings::StringRef::from_raw(0);
        let b = crate::strings::StringRef::from_raw(1);
        let mut buf = Vec::new();
        write_list(
            &mut buf,
            &[(QUOTES_STRING, &[Operand::StringRef(a), Operand::StringRef(b)])],
            QUOTES_NONE,
        );

        let mut reader = Reader::new(&buf);
        let first = reader.read_list_entry(QUOTES_NONE).expect("entry").unwrap();
        assert_eq!(first, QUOTES_STRING);
        let _open = reader.read_operand(OperandKind::StringRef).unwrap();
        let _close = reader.read_operand(OperandKind::StringRef).unwrap();
        let end = reader.read_list_entry(QUOTES_NONE).expect("sentinel");
        assert_eq!(end, None);
        assert!(reader.is_empty());
    }
}
