//! Fixed-point decimal accumulator for AVG and SUM
//!
//! Values are held as an i128 mantissa and a base-10 scale. Conversion from
//! f64 goes through the shortest round-trip decimal text of the float, so
//! `0.1` becomes exactly `1 / 10` rather than the nearest binary fraction.
//! Addition is exact; division rounds half away from zero.

use std::fmt;

/// Errors that can occur while manipulating decimal values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecimalError {
    /// Input was NaN or infinite
    NotFinite,
    /// Arithmetic overflowed the i128 mantissa
    Overflow,
    /// Attempted to divide by zero
    DivisionByZero,
}

impl fmt::Display for DecimalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecimalError::NotFinite => write!(f, "decimal input is not finite"),
            DecimalError::Overflow => write!(f, "decimal arithmetic overflow"),
            DecimalError::DivisionByZero => write!(f, "decimal division by zero"),
        }
    }
}

impl std::error::Error for DecimalError {}

/// Exact base-10 fixed-point value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decimal {
    mantissa: i128,
    scale: u32,
}

impl Decimal {
    pub const ZERO: Decimal = Decimal {
        mantissa: 0,
        scale: 0,
    };

    pub fn new(mantissa: i128, scale: u32) -> Self {
        Self { mantissa, scale }
    }

    /// Builds the decimal whose digits are the shortest text that round-trips `value`
    pub fn from_f64(value: f64) -> Result<Self, DecimalError> {
        if !value.is_finite() {
            return Err(DecimalError::NotFinite);
        }
        // f64 Display never uses exponent notation
        let text = value.to_string();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.as_str()),
        };
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));

        let mut mantissa: i128 = 0;
        for b in int_part.bytes().chain(frac_part.bytes()) {
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add(i128::from(b - b'0')))
                .ok_or(DecimalError::Overflow)?;
        }
        if negative {
            mantissa = -mantissa;
        }

        Ok(Self {
            mantissa,
            scale: frac_part.len() as u32,
        })
    }

    #[inline]
    pub fn mantissa(self) -> i128 {
        self.mantissa
    }

    #[inline]
    pub fn scale(self) -> u32 {
        self.scale
    }

    /// Exact sum
    pub fn checked_add(self, other: Decimal) -> Result<Decimal, DecimalError> {
        let scale = self.scale.max(other.scale);
        let a = rescale_up(self.mantissa, scale - self.scale)?;
        let b = rescale_up(other.mantissa, scale - other.scale)?;
        let mantissa = a.checked_add(b).ok_or(DecimalError::Overflow)?;
        Ok(Decimal { mantissa, scale })
    }

    /// `self / divisor`, rounded half away from zero to `scale` fractional digits
    pub fn div_round(self, divisor: i128, scale: u32) -> Result<Decimal, DecimalError> {
        if divisor == 0 {
            return Err(DecimalError::DivisionByZero);
        }
        let numerator = rescale_up(self.mantissa, scale)?;
        let denominator = rescale_up(divisor, self.scale)?;

        let mut quotient = numerator / denominator;
        let remainder = numerator % denominator;
        if remainder != 0 {
            let twice = remainder
                .unsigned_abs()
                .checked_mul(2)
                .ok_or(DecimalError::Overflow)?;
            if twice >= denominator.unsigned_abs() {
                let away = if (numerator < 0) != (denominator < 0) {
                    -1
                } else {
                    1
                };
                quotient += away;
            }
        }

        Ok(Decimal {
            mantissa: quotient,
            scale,
        })
    }

    /// Rounds half away from zero to `scale` fractional digits
    pub fn round(self, scale: u32) -> Result<Decimal, DecimalError> {
        self.div_round(1, scale)
    }

    /// Nearest f64 to this exact value
    pub fn to_f64(self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }
}

fn rescale_up(value: i128, by: u32) -> Result<i128, DecimalError> {
    10i128
        .checked_pow(by)
        .and_then(|factor| value.checked_mul(factor))
        .ok_or(DecimalError::Overflow)
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mantissa < 0 {
            f.write_str("-")?;
        }
        let digits = self.mantissa.unsigned_abs().to_string();
        let scale = self.scale as usize;
        if scale == 0 {
            return f.write_str(&digits);
        }
        if digits.len() <= scale {
            f.write_str("0.")?;
            for _ in digits.len()..scale {
                f.write_str("0")?;
            }
            return f.write_str(&digits);
        }
        let split = digits.len() - scale;
        write!(f, "{}.{}", &digits[..split], &digits[split..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: f64) -> Decimal {
        Decimal::from_f64(value).unwrap()
    }

    #[test]
    fn test_from_f64_uses_shortest_text() {
        assert_eq!(dec(0.1), Decimal::new(1, 1));
        assert_eq!(dec(90.02), Decimal::new(9002, 2));
        assert_eq!(dec(-3.5), Decimal::new(-35, 1));
        assert_eq!(dec(42.0), Decimal::new(42, 0));
        assert_eq!(dec(0.0), Decimal::ZERO);
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(Decimal::from_f64(f64::NAN), Err(DecimalError::NotFinite));
        assert_eq!(
            Decimal::from_f64(f64::INFINITY),
            Err(DecimalError::NotFinite)
        );
    }

    #[test]
    fn test_addition_is_exact() {
        // 0.1 + 0.2 drifts in binary floating point
        let sum = dec(0.1).checked_add(dec(0.2)).unwrap();
        assert_eq!(sum.to_string(), "0.3");
        assert_eq!(sum.to_f64(), 0.3);
    }

    #[test]
    fn test_mixed_scale_addition() {
        let sum = dec(1.5).checked_add(dec(2.25)).unwrap();
        assert_eq!(sum, Decimal::new(375, 2));
    }

    #[test]
    fn test_div_round_half_away_from_zero() {
        assert_eq!(Decimal::new(1, 0).div_round(8, 2).unwrap().to_string(), "0.13");
        assert_eq!(Decimal::new(-1, 0).div_round(8, 2).unwrap().to_string(), "-0.13");
        assert_eq!(Decimal::new(2, 0).div_round(3, 2).unwrap().to_string(), "0.67");
        assert_eq!(Decimal::new(10, 0).div_round(4, 2).unwrap().to_string(), "2.50");
    }

    #[test]
    fn test_round_exact_tie() {
        // 1.005 is below the tie in binary but exactly on it here
        assert_eq!(dec(1.005).round(2).unwrap().to_f64(), 1.01);
        assert_eq!(dec(-1.005).round(2).unwrap().to_f64(), -1.01);
        assert_eq!(dec(2.344).round(2).unwrap().to_f64(), 2.34);
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            Decimal::new(1, 0).div_round(0, 2),
            Err(DecimalError::DivisionByZero)
        );
    }

    #[test]
    fn test_display_small_values() {
        assert_eq!(Decimal::new(5, 3).to_string(), "0.005");
        assert_eq!(Decimal::new(-5, 3).to_string(), "-0.005");
        assert_eq!(Decimal::new(12345, 2).to_string(), "123.45");
    }
}
