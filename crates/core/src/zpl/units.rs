//! Millimetre → dot conversion and rotation codes.

use serde::{Deserialize, Serialize};

/// Default print resolution.
pub const DEFAULT_DPI: u32 = 203;

const MM_PER_INCH: f64 = 25.4;
const PT_PER_INCH: f64 = 72.0;

/// Print resolution in dots per inch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resolution(pub u32);

impl Resolution {
    /// Integer dots per millimetre.
    ///
    /// The common printer heads use the manufacturer's nominal values;
    /// anything else is `dpi / 25.4` rounded, at least 1.
    pub fn dots_per_mm(self) -> u32 {
        match self.0 {
            152 => 6,
            203 => 8,
            300 => 12,
            600 => 24,
            dpi => (f64::from(dpi) / MM_PER_INCH).round().max(1.0) as u32,
        }
    }

    /// Convert millimetres to dots, rounding half up. Negative and
    /// non-finite input clamps to 0.
    pub fn mm_to_dots(self, mm: f64) -> u32 {
        to_dots(mm * f64::from(self.dots_per_mm()))
    }

    /// Convert typographic points to dots.
    pub fn pt_to_dots(self, pt: f64) -> u32 {
        to_dots(pt * MM_PER_INCH / PT_PER_INCH * f64::from(self.dots_per_mm()))
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self(DEFAULT_DPI)
    }
}

impl From<u32> for Resolution {
    fn from(dpi: u32) -> Self {
        Self(dpi)
    }
}

fn to_dots(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        (value + 0.5).floor().min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

/// Field orientation, as used by `^A0`, `^BC` and friends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Orientation {
    /// 0°
    #[default]
    Normal,
    /// 90° clockwise.
    Rotated,
    /// 180°.
    Inverted,
    /// 270° clockwise.
    Bottom,
}

impl Orientation {
    /// Map a rotation in degrees. Only right angles are representable;
    /// anything else prints upright.
    pub fn from_degrees(degrees: Option<f64>) -> Self {
        let Some(d) = degrees.filter(|d| d.is_finite() && d.fract() == 0.0) else {
            return Self::Normal;
        };
        match (d as i64).rem_euclid(360) {
            90 => Self::Rotated,
            180 => Self::Inverted,
            270 => Self::Bottom,
            _ => Self::Normal,
        }
    }

    /// ZPL orientation letter.
    pub fn code(self) -> char {
        match self {
            Self::Normal => 'N',
            Self::Rotated => 'R',
            Self::Inverted => 'I',
            Self::Bottom => 'B',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nominal_dots_per_mm() {
        assert_eq!(Resolution(152).dots_per_mm(), 6);
        assert_eq!(Resolution(203).dots_per_mm(), 8);
        assert_eq!(Resolution(300).dots_per_mm(), 12);
        assert_eq!(Resolution(600).dots_per_mm(), 24);
    }

    #[test]
    fn other_dpi_is_computed() {
        assert_eq!(Resolution(406).dots_per_mm(), 16);
        assert_eq!(Resolution(1).dots_per_mm(), 1);
        assert_eq!(Resolution(0).dots_per_mm(), 1);
    }

    #[test]
    fn mm_to_dots_rounds_half_up() {
        let r = Resolution(203);
        assert_eq!(r.mm_to_dots(50.0), 400);
        assert_eq!(r.mm_to_dots(10.0), 80);
        assert_eq!(r.mm_to_dots(0.0625), 1);
        assert_eq!(r.mm_to_dots(0.06), 0);
        assert_eq!(r.mm_to_dots(-3.0), 0);
        assert_eq!(r.mm_to_dots(f64::NAN), 0);
    }

    #[test]
    fn points_to_dots() {
        // 12pt = 4.2333mm → 33.87 dots at 8 dots/mm
        assert_eq!(Resolution(203).pt_to_dots(12.0), 34);
        assert_eq!(Resolution(300).pt_to_dots(12.0), 51);
    }

    #[test]
    fn orientation_codes() {
        let code = |d| Orientation::from_degrees(d).code();
        assert_eq!(code(Some(0.0)), 'N');
        assert_eq!(code(Some(90.0)), 'R');
        assert_eq!(code(Some(180.0)), 'I');
        assert_eq!(code(Some(270.0)), 'B');
        assert_eq!(code(None), 'N');
        assert_eq!(code(Some(45.0)), 'N');
        assert_eq!(code(Some(-90.0)), 'B');
        assert_eq!(code(Some(450.0)), 'R');
        assert_eq!(code(Some(90.5)), 'N');
    }
}
