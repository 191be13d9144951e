use crate::error::Error;
use crate::Value;
use std::fmt;
use std::str::FromStr;

/// a polynomial in one non-negative integer variable, used for the
/// user-supplied group-score and leftover-penalty functions.
/// coefficients are indexed by exponent; evaluation is Horner's scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Polynom(Vec<Value>);

impl Polynom {
    pub fn new(coefficients: Vec<Value>) -> Self {
        let mut poly = Self(coefficients);
        poly.normalize();
        poly
    }

    pub fn eval(&self, n: Value) -> Value {
        self.0.iter().rev().fold(0, |acc, &c| acc * n + c)
    }

    fn normalize(&mut self) {
        while self.0.last() == Some(&0) {
            self.0.pop();
        }
    }
}

/// grammar: a sum of terms, each matching [+-]?[0-9]*(n(^[0-9]+)?)?.
/// an empty coefficient means 1 (or -1 after a minus), a missing n
/// means a constant term, a missing exponent means 1.
impl FromStr for Polynom {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidArgument(format!("not a valid polynomial: {:?}", s));
        let bytes = s.as_bytes();
        let mut coefficients = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            let start = i;
            let negative = match bytes[i] {
                b'+' => {
                    i += 1;
                    false
                }
                b'-' => {
                    i += 1;
                    true
                }
                _ => false,
            };
            let digits = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            let mut coefficient = match digits == i {
                true => 1,
                false => s[digits..i].parse::<Value>().map_err(|_| invalid())?,
            };
            if negative {
                coefficient = -coefficient;
            }
            let exponent = if i < bytes.len() && bytes[i] == b'n' {
                i += 1;
                if i < bytes.len() && bytes[i] == b'^' {
                    i += 1;
                    let digits = i;
                    while i < bytes.len() && bytes[i].is_ascii_digit() {
                        i += 1;
                    }
                    if digits == i {
                        return Err(invalid());
                    }
                    s[digits..i].parse::<usize>().map_err(|_| invalid())?
                } else {
                    1
                }
            } else {
                0
            };
            if i == start {
                return Err(invalid());
            }
            if coefficients.len() < exponent + 1 {
                coefficients.resize(exponent + 1, 0);
            }
            coefficients[exponent] += coefficient;
        }
        Ok(Self::new(coefficients))
    }
}

impl fmt::Display for Polynom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut any = false;
        for exponent in (0..self.0.len()).rev() {
            let coefficient = self.0[exponent];
            if coefficient == 0 {
                continue;
            }
            match (any, coefficient < 0) {
                (false, true) => write!(f, "-")?,
                (false, false) => {}
                (true, true) => write!(f, "-")?,
                (true, false) => write!(f, "+")?,
            }
            write!(f, "{}", coefficient.abs())?;
            match exponent {
                0 => {}
                1 => write!(f, "n")?,
                _ => write!(f, "n^{}", exponent)?,
            }
            any = true;
        }
        if !any {
            write!(f, "0")?;
        }
        Ok(())
    }
}
