//! CSS 2.1 units: the closed set, grouped into categories for range checks.

/// A CSS 2.1 unit. Percentage is included here rather than modeled as a
/// separate value type, since both are grouped into the same closed set
/// with a bit-mask grouping for category checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Unit {
    /// Pixels.
    Px,
    /// Font-relative em.
    Em,
    /// Font-relative ex (x-height).
    Ex,
    /// Inches.
    In,
    /// Centimeters.
    Cm,
    /// Millimeters.
    Mm,
    /// Points (1/72 inch).
    Pt,
    /// Picas (12 points).
    Pc,
    /// Percentage of some context-dependent reference value.
    Percentage,
    /// Degrees.
    Deg,
    /// Gradians.
    Grad,
    /// Radians.
    Rad,
    /// Seconds.
    S,
    /// Milliseconds.
    Ms,
    /// Hertz.
    Hz,
    /// Kilohertz.
    Khz,
}

/// A bitmask over [`Unit`] categories, used by range checks to reject e.g. a
/// `border-width` given in `deg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitCategory(u8);

impl UnitCategory {
    /// Length units: px, em, ex, in, cm, mm, pt, pc.
    pub const LENGTH: UnitCategory = UnitCategory(0b0000_0001);
    /// Percentage.
    pub const PERCENTAGE: UnitCategory = UnitCategory(0b0000_0010);
    /// Angle units: deg, grad, rad.
    pub const ANGLE: UnitCategory = UnitCategory(0b0000_0100);
    /// Time units: s, ms.
    pub const TIME: UnitCategory = UnitCategory(0b0000_1000);
    /// Frequency units: Hz, kHz.
    pub const FREQUENCY: UnitCategory = UnitCategory(0b0001_0000);
    /// The empty set.
    pub const NONE: UnitCategory = UnitCategory(0);

    /// Union of two masks.
    #[must_use]
    pub const fn union(self, other: UnitCategory) -> UnitCategory {
        UnitCategory(self.0 | other.0)
    }

    /// True if `self` shares any bit with `other`.
    #[must_use]
    pub const fn intersects(self, other: UnitCategory) -> bool {
        (self.0 & other.0) != 0
    }

    /// True if `self` contains every bit of `other`.
    #[must_use]
    pub const fn contains(self, other: UnitCategory) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl Unit {
    /// The category this unit belongs to, for range-check validation.
    #[must_use]
    pub const fn category(self) -> UnitCategory {
        match self {
            Unit::Px | Unit::Em | Unit::Ex | Unit::In | Unit::Cm | Unit::Mm | Unit::Pt
            | Unit::Pc => UnitCategory::LENGTH,
            Unit::Percentage => UnitCategory::PERCENTAGE,
            Unit::Deg | Unit::Grad | Unit::Rad => UnitCategory::ANGLE,
            Unit::S | Unit::Ms => UnitCategory::TIME,
            Unit::Hz | Unit::Khz => UnitCategory::FREQUENCY,
        }
    }

    /// Parse a CSS unit identifier (case-insensitive), or `None` for an
    /// unrecognized suffix.
    #[must_use]
    pub fn from_ident(ident: &str) -> Option<Unit> {
        Some(match_ignore_ascii_case(ident)?)
    }
}

fn match_ignore_ascii_case(ident: &str) -> Option<Unit> {
    let lower = ident.to_ascii_lowercase();
    Some(match lower.as_str() {
        "px" => Unit::Px,
        "em" => Unit::Em,
        "ex" => Unit::Ex,
        "in" => Unit::In,
        "cm" => Unit::Cm,
        "mm" => Unit::Mm,
        "pt" => Unit::Pt,
        "pc" => Unit::Pc,
        "%" => Unit::Percentage,
        "deg" => Unit::Deg,
        "grad" => Unit::Grad,
        "rad" => Unit::Rad,
        "s" => Unit::S,
        "ms" => Unit::Ms,
        "hz" => Unit::Hz,
        "khz" => Unit::Khz,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_category_rejects_angle_units() {
        let length_only = UnitCategory::LENGTH;
        assert!(length_only.contains(Unit::Px.category()));
        assert!(!length_only.contains(Unit::Deg.category()));
    }

    #[test]
    fn ident_parsing_is_case_insensitive() {
        assert_eq!(Unit::from_ident("PX"), Some(Unit::Px));
        assert_eq!(Unit::from_ident("Khz"), Some(Unit::Khz));
        assert_eq!(Unit::from_ident("furlong"), None);
    }
}
