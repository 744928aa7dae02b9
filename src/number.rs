// ABOUTME: Numeric tower with integer, ratio, real, and complex variants

use crate::error::NumberError;
use std::cmp::Ordering;
use std::fmt;

/// A number is one of four variants. Arithmetic lifts both operands to the
/// least upper bound of the promotion lattice (integer → ratio → real →
/// complex), computes, then reduces the result back to its simplest variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Int(i64),
    Real(f64),
    Ratio { num: i64, den: i64 },
    Complex { re: Box<Number>, im: Box<Number> },
}

/// Promotion rank; higher absorbs lower.
const RANK_INT: u8 = 0;
const RANK_RATIO: u8 = 1;
const RANK_REAL: u8 = 2;
const RANK_COMPLEX: u8 = 3;

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a.max(1)
}

impl Number {
    pub fn complex(re: Number, im: Number) -> Number {
        Number::Complex {
            re: Box::new(re),
            im: Box::new(im),
        }
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, Number::Complex { .. })
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Int(i) => *i == 0,
            Number::Real(d) => *d == 0.0,
            Number::Ratio { num, .. } => *num == 0,
            Number::Complex { re, im } => re.is_zero() && im.is_zero(),
        }
    }

    fn is_negative(&self) -> bool {
        match self {
            Number::Int(i) => *i < 0,
            Number::Real(d) => *d < 0.0,
            Number::Ratio { num, .. } => *num < 0,
            Number::Complex { .. } => false,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Number::Int(_) => RANK_INT,
            Number::Ratio { .. } => RANK_RATIO,
            Number::Real(_) => RANK_REAL,
            Number::Complex { .. } => RANK_COMPLEX,
        }
    }

    fn as_f64(&self) -> f64 {
        match self {
            Number::Int(i) => *i as f64,
            Number::Real(d) => *d,
            Number::Ratio { num, den } => *num as f64 / *den as f64,
            // Callers screen out complex before asking for a scalar.
            Number::Complex { re, .. } => re.as_f64(),
        }
    }

    fn lift_to(&self, rank: u8) -> Number {
        if rank == RANK_COMPLEX && !self.is_complex() {
            return Number::complex(self.clone(), Number::Int(0));
        }
        match (self, rank) {
            (Number::Int(i), RANK_RATIO) => Number::Ratio { num: *i, den: 1 },
            (Number::Int(_) | Number::Ratio { .. }, RANK_REAL) => Number::Real(self.as_f64()),
            _ => self.clone(),
        }
    }

    /// Collapse a number to its simplest variant: integer-valued reals become
    /// integers, ratios are normalized by gcd (denominator 1 collapses to an
    /// integer), and a complex with zero imaginary part becomes its real part.
    pub fn reduce(self) -> Number {
        match self {
            Number::Real(d) if d.fract() == 0.0 && d.is_finite() && d.abs() < i64::MAX as f64 => {
                Number::Int(d as i64)
            }
            Number::Ratio { num, den } => {
                if den == 0 {
                    return Number::Ratio { num, den };
                }
                let sign = if (num < 0) != (den < 0) { -1 } else { 1 };
                let g = gcd(num.unsigned_abs(), den.unsigned_abs()) as i64;
                let num = sign * (num.wrapping_abs() / g);
                let den = den.wrapping_abs() / g;
                if den == 1 {
                    Number::Int(num)
                } else {
                    Number::Ratio { num, den }
                }
            }
            Number::Complex { re, im } => {
                let re = re.reduce();
                let im = im.reduce();
                if im.is_zero() {
                    re
                } else {
                    Number::Complex {
                        re: Box::new(re),
                        im: Box::new(im),
                    }
                }
            }
            other => other,
        }
    }

    pub fn neg(&self) -> Number {
        match self {
            Number::Int(i) => Number::Int(i.wrapping_neg()),
            Number::Real(d) => Number::Real(-d),
            Number::Ratio { num, den } => Number::Ratio {
                num: num.wrapping_neg(),
                den: *den,
            },
            Number::Complex { re, im } => Number::complex(re.neg(), im.neg()),
        }
    }

    fn conjugate(&self) -> Number {
        match self {
            Number::Complex { re, im } => Number::complex((**re).clone(), im.neg()),
            other => other.clone(),
        }
    }

    pub fn add(&self, other: &Number) -> Number {
        let rank = self.rank().max(other.rank());
        let out = match (self.lift_to(rank), other.lift_to(rank)) {
            (Number::Int(a), Number::Int(b)) => Number::Int(a.wrapping_add(b)),
            (Number::Ratio { num: a, den: b }, Number::Ratio { num: c, den: d }) => {
                Number::Ratio {
                    num: a.wrapping_mul(d).wrapping_add(c.wrapping_mul(b)),
                    den: b.wrapping_mul(d),
                }
            }
            (Number::Real(a), Number::Real(b)) => Number::Real(a + b),
            (Number::Complex { re: a, im: b }, Number::Complex { re: x, im: y }) => {
                Number::complex(a.add(&x), b.add(&y))
            }
            _ => unreachable!("operands lifted to the same rank"),
        };
        out.reduce()
    }

    pub fn sub(&self, other: &Number) -> Number {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &Number) -> Number {
        let rank = self.rank().max(other.rank());
        let out = match (self.lift_to(rank), other.lift_to(rank)) {
            (Number::Int(a), Number::Int(b)) => Number::Int(a.wrapping_mul(b)),
            (Number::Ratio { num: a, den: b }, Number::Ratio { num: c, den: d }) => {
                Number::Ratio {
                    num: a.wrapping_mul(c),
                    den: b.wrapping_mul(d),
                }
            }
            (Number::Real(a), Number::Real(b)) => Number::Real(a * b),
            // (a + bi)(x + yi) = (ax - by) + (ay + xb)i
            (Number::Complex { re: a, im: b }, Number::Complex { re: x, im: y }) => {
                Number::complex(
                    a.mul(&x).sub(&b.mul(&y)),
                    a.mul(&y).add(&x.mul(&b)),
                )
            }
            _ => unreachable!("operands lifted to the same rank"),
        };
        out.reduce()
    }

    pub fn div(&self, other: &Number) -> Result<Number, NumberError> {
        if other.is_zero() {
            return Err(NumberError::DivisionByZero);
        }

        // Dividing by a complex multiplies through by its conjugate, which
        // reduces the denominator to a real by construction.
        if other.is_complex() {
            let conj = other.conjugate();
            let denominator = other.mul(&conj);
            let numerator = self.mul(&conj);
            return numerator.div(&denominator);
        }
        if let Number::Complex { re, im } = self {
            let out = Number::complex(re.div(other)?, im.div(other)?);
            return Ok(out.reduce());
        }

        let rank = self.rank().max(other.rank());
        let out = match (self.lift_to(rank), other.lift_to(rank)) {
            // Integer division promotes through a ratio and lands on a real.
            (Number::Int(a), Number::Int(b)) => {
                Number::Ratio { num: a, den: b }.ratio_to_real()
            }
            (Number::Ratio { num: a, den: b }, Number::Ratio { num: c, den: d }) => {
                Number::Ratio {
                    num: a.wrapping_mul(d),
                    den: b.wrapping_mul(c),
                }
            }
            (Number::Real(a), Number::Real(b)) => Number::Real(a / b),
            _ => unreachable!("complex operands handled above"),
        };
        Ok(out.reduce())
    }

    fn ratio_to_real(&self) -> Number {
        match self {
            Number::Ratio { num, den } => Number::Real(*num as f64 / *den as f64),
            other => other.clone(),
        }
    }

    /// Integer base and exponent stay integral (floating pow with a cast);
    /// any real or ratio operand produces a real. Complex operands are
    /// unsupported.
    pub fn pow(&self, exponent: &Number) -> Result<Number, NumberError> {
        if exponent.is_complex() || self.is_complex() {
            return Err(NumberError::ComplexExponent);
        }

        let out = match (self, exponent) {
            (Number::Int(base), Number::Int(exp)) => {
                Number::Int((*base as f64).powf(*exp as f64) as i64)
            }
            _ => Number::Real(self.as_f64().powf(exponent.as_f64())),
        };
        Ok(out.reduce())
    }

    /// Ordering is undefined on complex numbers. `None` means the comparison
    /// involved a NaN.
    pub fn try_cmp(&self, other: &Number) -> Result<Option<Ordering>, NumberError> {
        if self.is_complex() || other.is_complex() {
            return Err(NumberError::ComplexOrdering);
        }
        if let (Number::Int(a), Number::Int(b)) = (self, other) {
            return Ok(Some(a.cmp(b)));
        }
        Ok(self.as_f64().partial_cmp(&other.as_f64()))
    }

    /// Numbers are kept reduced, so values of different variants are never
    /// equal.
    pub fn num_eq(&self, other: &Number) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (Number::Real(a), Number::Real(b)) => a == b,
            (Number::Ratio { num: a, den: b }, Number::Ratio { num: c, den: d }) => {
                a == c && b == d
            }
            (Number::Complex { re: a, im: b }, Number::Complex { re: x, im: y }) => {
                a.num_eq(x) && b.num_eq(y)
            }
            _ => false,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Real(d) => write!(f, "{}", d),
            Number::Ratio { num, den } => write!(f, "{}/{}", num, den),
            Number::Complex { re, im } => {
                // A zero real part prints as a bare imaginary literal, which
                // the reader can take back in.
                if re.is_zero() {
                    write!(f, "{}i", im)
                } else if im.is_negative() {
                    write!(f, "{}-{}i", re, im.neg())
                } else {
                    write!(f, "{}+{}i", re, im)
                }
            }
        }
    }
}

/// Parse the body of a number token: sign, digits around an optional radix
/// point, an optional exponent, a trailing imaginary marker, or a ratio
/// written `N/D`.
pub fn parse_number(text: &str) -> Result<Number, NumberError> {
    let (negated, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    if let Some((num_text, den_text)) = body.split_once('/') {
        return parse_ratio(num_text, den_text, negated);
    }

    let mut before = String::new();
    let mut after = String::new();
    let mut exponent = String::new();
    let mut has_radix = false;
    let mut exponential = false;
    let mut imaginary = false;

    let chars: Vec<char> = body.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '.' {
            if exponential {
                return Err(NumberError::RadixInExponent);
            }
            if has_radix {
                return Err(NumberError::BadDigit);
            }
            has_radix = true;
        } else if c == 'e' {
            if exponential {
                return Err(NumberError::BadDigit);
            }
            exponential = true;
            if i + 1 == chars.len() {
                return Err(NumberError::MissingExponent);
            }
            if matches!(chars[i + 1], '+' | '-') {
                exponent.push(chars[i + 1]);
                i += 1;
            }
        } else if c == 'i' || c == 'I' {
            if i + 1 != chars.len() {
                return Err(NumberError::MisplacedImaginary);
            }
            imaginary = true;
        } else if !c.is_ascii_digit() {
            return Err(NumberError::BadDigit);
        } else if exponential {
            exponent.push(c);
        } else if has_radix {
            after.push(c);
        } else {
            before.push(c);
        }
        i += 1;
    }

    let exp: i32 = if exponent.is_empty() {
        if exponential {
            return Err(NumberError::MissingExponent);
        }
        0
    } else {
        exponent
            .parse()
            .map_err(|_| NumberError::MissingExponent)?
    };

    let magnitude = assemble(&before, &after, exp, negated);
    if imaginary {
        Ok(Number::complex(Number::Int(0), magnitude))
    } else {
        Ok(magnitude)
    }
}

fn parse_ratio(num_text: &str, den_text: &str, negated: bool) -> Result<Number, NumberError> {
    let all_digits =
        |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(num_text) || !all_digits(den_text) {
        return Err(NumberError::BadRatio);
    }
    let num: i64 = num_text.parse().map_err(|_| NumberError::BadRatio)?;
    let den: i64 = den_text.parse().map_err(|_| NumberError::BadRatio)?;
    if den == 0 {
        return Err(NumberError::DivisionByZero);
    }
    let num = if negated { -num } else { num };
    Ok(Number::Ratio { num, den }.reduce())
}

/// Build the final value once the pieces are known. The literal is an
/// integer exactly when the exponent absorbs every post-radix digit.
fn assemble(before: &str, after: &str, exp: i32, negated: bool) -> Number {
    let mantissa: f64 = format!("{before}.{after}").parse().unwrap_or(0.0);
    if exp >= 0 && after.len() <= exp as usize {
        let mut value = (mantissa * 10f64.powi(exp)).round() as i64;
        if negated {
            value = -value;
        }
        Number::Int(value)
    } else {
        let mut value = mantissa * 10f64.powi(exp);
        if negated {
            value = -value;
        }
        Number::Real(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integers() {
        assert_eq!(parse_number("42"), Ok(Number::Int(42)));
        assert_eq!(parse_number("-42"), Ok(Number::Int(-42)));
        assert_eq!(parse_number("+42"), Ok(Number::Int(42)));
        assert_eq!(parse_number("0"), Ok(Number::Int(0)));
    }

    #[test]
    fn test_parse_reals() {
        assert_eq!(parse_number("2.5"), Ok(Number::Real(2.5)));
        assert_eq!(parse_number("-2.5"), Ok(Number::Real(-2.5)));
        assert_eq!(parse_number(".5"), Ok(Number::Real(0.5)));
    }

    #[test]
    fn test_parse_exponents() {
        // The exponent absorbs the decimal part, so these are integers.
        assert_eq!(parse_number("1e2"), Ok(Number::Int(100)));
        assert_eq!(parse_number("1.5e1"), Ok(Number::Int(15)));
        assert_eq!(parse_number("2e+3"), Ok(Number::Int(2000)));
        assert_eq!(parse_number("1e-2"), Ok(Number::Real(0.01)));
        assert_eq!(parse_number("1.25e1"), Ok(Number::Real(12.5)));
    }

    #[test]
    fn test_parse_imaginary() {
        assert_eq!(
            parse_number("2i"),
            Ok(Number::complex(Number::Int(0), Number::Int(2)))
        );
        assert_eq!(
            parse_number("-1.5i"),
            Ok(Number::complex(Number::Int(0), Number::Real(-1.5)))
        );
    }

    #[test]
    fn test_parse_ratio_literals() {
        assert_eq!(parse_number("1/2"), Ok(Number::Ratio { num: 1, den: 2 }));
        assert_eq!(parse_number("2/4"), Ok(Number::Ratio { num: 1, den: 2 }));
        assert_eq!(parse_number("4/2"), Ok(Number::Int(2)));
        assert_eq!(parse_number("-1/2"), Ok(Number::Ratio { num: -1, den: 2 }));
        assert_eq!(parse_number("1/0"), Err(NumberError::DivisionByZero));
        assert_eq!(parse_number("1.5/2"), Err(NumberError::BadRatio));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_number("12ab"), Err(NumberError::BadDigit));
        assert_eq!(parse_number("1e"), Err(NumberError::MissingExponent));
        assert_eq!(parse_number("1e+"), Err(NumberError::MissingExponent));
        assert_eq!(parse_number("1i2"), Err(NumberError::MisplacedImaginary));
        assert_eq!(parse_number("1e2.5"), Err(NumberError::RadixInExponent));
        assert_eq!(parse_number("1.2.3"), Err(NumberError::BadDigit));
    }

    #[test]
    fn test_add_promotes_and_reduces() {
        let a = Number::Int(1);
        let b = Number::Real(2.5);
        assert_eq!(a.add(&b), Number::Real(3.5));

        // A real result that is mathematically integral collapses.
        let a = Number::Real(1.5);
        let b = Number::Real(2.5);
        assert_eq!(a.add(&b), Number::Int(4));
    }

    #[test]
    fn test_ratio_arithmetic() {
        let half = Number::Ratio { num: 1, den: 2 };
        let third = Number::Ratio { num: 1, den: 3 };
        assert_eq!(half.add(&third), Number::Ratio { num: 5, den: 6 });
        assert_eq!(half.add(&half), Number::Int(1));
        assert_eq!(half.mul(&Number::Int(2)), Number::Int(1));
        assert_eq!(
            half.div(&third).expect("dividing ratios"),
            Number::Ratio { num: 3, den: 2 }
        );
    }

    #[test]
    fn test_complex_addition_collapses_zero_imaginary() {
        let a = Number::complex(Number::Int(1), Number::Int(2));
        let b = Number::complex(Number::Int(3), Number::Int(-2));
        assert_eq!(a.add(&b), Number::Int(4));
    }

    #[test]
    fn test_complex_multiplication() {
        // (1 + 2i)(3 + 4i) = -5 + 10i
        let a = Number::complex(Number::Int(1), Number::Int(2));
        let b = Number::complex(Number::Int(3), Number::Int(4));
        assert_eq!(
            a.mul(&b),
            Number::complex(Number::Int(-5), Number::Int(10))
        );
    }

    #[test]
    fn test_integer_division_goes_real() {
        let out = Number::Int(1).div(&Number::Int(2)).expect("1/2");
        assert_eq!(out, Number::Real(0.5));

        let out = Number::Int(4).div(&Number::Int(2)).expect("4/2");
        assert_eq!(out, Number::Int(2));
    }

    #[test]
    fn test_division_by_zero_is_an_error() {
        assert_eq!(
            Number::Int(1).div(&Number::Int(0)),
            Err(NumberError::DivisionByZero)
        );
    }

    #[test]
    fn test_division_by_complex_reduces() {
        // i / i = 1
        let i = Number::complex(Number::Int(0), Number::Int(1));
        assert_eq!(i.div(&i).expect("i/i"), Number::Int(1));
    }

    #[test]
    fn test_pow() {
        assert_eq!(
            Number::Int(2).pow(&Number::Int(10)).expect("2^10"),
            Number::Int(1024)
        );
        assert_eq!(
            Number::Int(4).pow(&Number::Real(0.5)).expect("4^0.5"),
            Number::Int(2)
        );
        let i = Number::complex(Number::Int(0), Number::Int(1));
        assert_eq!(
            Number::Int(2).pow(&i),
            Err(NumberError::ComplexExponent)
        );
    }

    #[test]
    fn test_comparison() {
        assert_eq!(
            Number::Int(1).try_cmp(&Number::Int(2)),
            Ok(Some(Ordering::Less))
        );
        assert_eq!(
            Number::Real(2.5).try_cmp(&Number::Int(2)),
            Ok(Some(Ordering::Greater))
        );
        let i = Number::complex(Number::Int(0), Number::Int(1));
        assert_eq!(
            Number::Int(1).try_cmp(&i),
            Err(NumberError::ComplexOrdering)
        );
    }

    #[test]
    fn test_equality_across_variants_is_false() {
        // 1/2 stays a ratio and 0.5 a real; reduced variants never mix.
        let half_ratio = Number::Ratio { num: 1, den: 2 };
        assert!(!half_ratio.num_eq(&Number::Real(0.5)));
        assert!(Number::Int(3).num_eq(&Number::Int(3)));
    }

    #[test]
    fn test_negation() {
        assert_eq!(Number::Int(3).neg(), Number::Int(-3));
        assert_eq!(
            Number::Ratio { num: 1, den: 2 }.neg(),
            Number::Ratio { num: -1, den: 2 }
        );
        let c = Number::complex(Number::Int(1), Number::Int(-2));
        assert_eq!(c.neg(), Number::complex(Number::Int(-1), Number::Int(2)));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Number::Int(42)), "42");
        assert_eq!(format!("{}", Number::Real(0.5)), "0.5");
        assert_eq!(format!("{}", Number::Ratio { num: 1, den: 2 }), "1/2");
        assert_eq!(
            format!("{}", Number::complex(Number::Int(1), Number::Int(2))),
            "1+2i"
        );
        assert_eq!(
            format!("{}", Number::complex(Number::Int(1), Number::Int(-2))),
            "1-2i"
        );
    }
}
