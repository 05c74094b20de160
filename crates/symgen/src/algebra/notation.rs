//! Text forms of operators.
//!
//! - Symbols: coordinate triplets such as `-y,x-y,z+1/3`. A component is a sum
//!   of signed terms; a term is a variable with an optional rational
//!   coefficient (`x`, `2y`, `1/2z`) or a rational constant.
//! - Rows (`Display` / `FromStr`): `d` rows, each the `d` linear entries
//!   followed by the translation entry, in fixed-width columns. The entry count
//!   `d·(d+1)` determines `d`, so the form round-trips.

use std::fmt;
use std::str::FromStr;

use nalgebra::{DMatrix, DVector};
use num_traits::{One, Signed, Zero};

use super::types::{Operator, Q};

const VARIABLES: [char; 3] = ['x', 'y', 'z'];

/// Failure to read an operator from text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub input: String,
    pub reason: String,
}

impl ParseError {
    fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot parse operator {:?}: {}", self.input, self.reason)
    }
}

impl std::error::Error for ParseError {}

impl Operator {
    /// Parse a coordinate-triplet symbol; the dimension is the number of
    /// comma-separated components (1 to 3).
    pub fn parse_symbol(s: &str) -> Result<Operator, ParseError> {
        let parts: Vec<&str> = s.split(',').collect();
        let d = parts.len();
        if d > VARIABLES.len() || s.trim().is_empty() {
            return Err(ParseError::new(s, format!("expected 1 to 3 components, got {d}")));
        }
        let mut linear = DMatrix::zeros(d, d);
        let mut shift = DVector::zeros(d);
        for (i, part) in parts.iter().enumerate() {
            parse_component(s, part, i, d, &mut linear, &mut shift)?;
        }
        Ok(Operator::new(linear, shift))
    }

    /// Coordinate-triplet symbol, e.g. `-x+1/2,y`.
    pub fn symbol(&self) -> String {
        let d = self.dimension();
        (0..d)
            .map(|i| {
                let mut out = String::new();
                for j in 0..d {
                    let c = self.linear[(i, j)];
                    if c.is_zero() {
                        continue;
                    }
                    let sign = if c.is_negative() { "-" } else { "+" };
                    let mag = c.abs();
                    let var = VARIABLES.get(j).copied().unwrap_or('?');
                    if mag.is_one() {
                        out.push_str(&format!("{sign}{var}"));
                    } else {
                        out.push_str(&format!("{sign}{mag}{var}"));
                    }
                }
                let t = self.shift[i];
                if !t.is_zero() {
                    let sign = if t.is_negative() { "-" } else { "+" };
                    out.push_str(&format!("{sign}{}", t.abs()));
                }
                match out.strip_prefix('+') {
                    Some(rest) => rest.to_string(),
                    None if out.is_empty() => "0".to_string(),
                    None => out,
                }
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn parse_component(
    input: &str,
    part: &str,
    row: usize,
    d: usize,
    linear: &mut DMatrix<Q>,
    shift: &mut DVector<Q>,
) -> Result<(), ParseError> {
    let chars: Vec<char> = part.chars().filter(|c| !c.is_whitespace()).collect();
    if chars.is_empty() {
        return Err(ParseError::new(input, format!("component {} is empty", row + 1)));
    }
    let mut pos = 0;
    while pos < chars.len() {
        let mut negative = false;
        if chars[pos] == '+' || chars[pos] == '-' {
            negative = chars[pos] == '-';
            pos += 1;
        }
        let start = pos;
        while pos < chars.len() && (chars[pos].is_ascii_digit() || chars[pos] == '/') {
            pos += 1;
        }
        let number: Option<Q> = if pos > start {
            let text: String = chars[start..pos].iter().collect();
            let value = Q::from_str(&text)
                .map_err(|_| ParseError::new(input, format!("bad number {text:?}")))?;
            Some(value)
        } else {
            None
        };
        let var = chars
            .get(pos)
            .and_then(|c| VARIABLES.iter().position(|v| *v == c.to_ascii_lowercase()));
        let sign = if negative { -Q::one() } else { Q::one() };
        match (number, var) {
            (coeff, Some(j)) => {
                if j >= d {
                    return Err(ParseError::new(
                        input,
                        format!("variable {} out of range in dimension {d}", VARIABLES[j]),
                    ));
                }
                linear[(row, j)] += sign * coeff.unwrap_or_else(Q::one);
                pos += 1;
            }
            (Some(value), None) => shift[row] += sign * value,
            (None, None) => {
                let found = chars.get(pos).map_or("end of input".to_string(), |c| format!("{c:?}"));
                return Err(ParseError::new(input, format!("unexpected {found}")));
            }
        }
    }
    Ok(())
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.dimension();
        for i in 0..d {
            if i > 0 {
                write!(f, "  ")?;
            }
            for j in 0..d {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:>2}", self.linear[(i, j)].to_string())?;
            }
            write!(f, " {:>4}", self.shift[i].to_string())?;
        }
        Ok(())
    }
}

impl FromStr for Operator {
    type Err = ParseError;

    /// Inverse of `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let entries = s
            .split_whitespace()
            .map(|tok| {
                Q::from_str(tok).map_err(|_| ParseError::new(s, format!("bad entry {tok:?}")))
            })
            .collect::<Result<Vec<Q>, _>>()?;
        let d = (1..=VARIABLES.len())
            .find(|d| d * (d + 1) == entries.len())
            .ok_or_else(|| {
                ParseError::new(s, format!("{} entries do not form an operator", entries.len()))
            })?;
        let linear = DMatrix::from_fn(d, d, |i, j| entries[i * (d + 1) + j]);
        let shift = DVector::from_fn(d, |i, _| entries[i * (d + 1) + d]);
        Ok(Operator::new(linear, shift))
    }
}
