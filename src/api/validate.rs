use thiserror::Error;

use crate::parser::ConfigError;

/// Rejection of a single raw token.
///
/// The display text is the exact message shown to the Cli user, so it must stay
/// precise and example-bearing.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub(crate) String);

/// A parse-and-check conversion from a raw token to a typed value.
///
/// Implementations are stateless; any bounds are fixed at construction time.
/// Attach a validator to a parameter via [`Checked`](./struct.Checked.html).
pub trait Validate {
    /// The typed value produced on success.
    type Output;

    /// Convert and constrain the raw `token`.
    fn validate(&self, token: &str) -> Result<Self::Output, ValidationError>;
}

/// An integer bounded inclusively by `min` and `max`.
///
/// ### Example
/// ```
/// use exarg::{BoundedInt, Validate};
///
/// let percent = BoundedInt::new(0, 100).unwrap();
/// assert_eq!(percent.validate("25").unwrap(), 25);
/// assert!(percent.validate("101").is_err());
/// ```
#[derive(Debug)]
pub struct BoundedInt {
    min: i64,
    max: i64,
}

impl BoundedInt {
    /// Create a bounded integer validator (`min <= max`).
    pub fn new(min: i64, max: i64) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError(format!(
                "bounded integer requires min <= max (min={min}, max={max})."
            )));
        }

        Ok(Self { min, max })
    }
}

impl Validate for BoundedInt {
    type Output = i64;

    fn validate(&self, token: &str) -> Result<i64, ValidationError> {
        match token.parse::<i64>() {
            Ok(value) if self.min <= value && value <= self.max => Ok(value),
            _ => Err(ValidationError(format!(
                "Expected an integer within [{min}-{max}]",
                min = self.min,
                max = self.max,
            ))),
        }
    }
}

/// A comma-delimited tuple of integers, each bounded by its positional `mins`/`maxs` entry.
#[derive(Debug)]
pub struct BoundedTuple {
    mins: Vec<i64>,
    maxs: Vec<i64>,
}

impl BoundedTuple {
    /// Create a bounded tuple validator; `mins` and `maxs` must have equal length.
    pub fn new(mins: Vec<i64>, maxs: Vec<i64>) -> Result<Self, ConfigError> {
        if mins.len() != maxs.len() {
            return Err(ConfigError(format!(
                "bounded tuple requires bounds of equal length (mins={mins}, maxs={maxs}).",
                mins = mins.len(),
                maxs = maxs.len(),
            )));
        }

        Ok(Self { mins, maxs })
    }
}

impl Validate for BoundedTuple {
    type Output = Vec<i64>;

    fn validate(&self, token: &str) -> Result<Vec<i64>, ValidationError> {
        let arity_error = || {
            ValidationError(format!(
                "Expected \"{n}\" comma-delimited \"integers\"",
                n = self.mins.len(),
            ))
        };
        let values = token
            .split(',')
            .map(|part| part.parse::<i64>())
            .collect::<Result<Vec<i64>, _>>()
            .map_err(|_| arity_error())?;

        if values.len() != self.mins.len() {
            return Err(arity_error());
        }

        for (i, value) in values.iter().enumerate() {
            if *value < self.mins[i] || *value > self.maxs[i] {
                return Err(ValidationError(format!(
                    "{tuple} is not within limits set by min={mins:?} and max={maxs:?}",
                    tuple = tuple_repr(&values),
                    mins = self.mins,
                    maxs = self.maxs,
                )));
            }
        }

        Ok(values)
    }
}

// Render like a Python tuple: `(1, 2)`, `(1,)`, `()`.
fn tuple_repr(values: &[i64]) -> String {
    match values {
        [single] => format!("({single},)"),
        _ => format!(
            "({})",
            values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<String>>()
                .join(", ")
        ),
    }
}

/// A comma-delimited list of integers; order and duplicates are preserved.
pub struct IntList;

impl Validate for IntList {
    type Output = Vec<i64>;

    fn validate(&self, token: &str) -> Result<Vec<i64>, ValidationError> {
        token
            .split(',')
            .map(|part| part.parse::<i64>())
            .collect::<Result<Vec<i64>, _>>()
            .map_err(|_| ValidationError("Expected comma-delimited integers".to_string()))
    }
}

/// A comma-delimited list of strings, split verbatim (no trimming).
/// Never fails; an empty token yields a single empty string.
pub struct StrList;

impl Validate for StrList {
    type Output = Vec<String>;

    fn validate(&self, token: &str) -> Result<Vec<String>, ValidationError> {
        Ok(token.split(',').map(str::to_string).collect())
    }
}

/// A comma-delimited mix of integers and `A:B` integer ranges (inclusive on both ends).
///
/// The result is ascending-sorted and duplicate-free regardless of input order;
/// downstream range-based consumers rely on the canonical, monotonic sequence.
/// The empty token yields `None` rather than an empty sequence.
///
/// ### Example
/// ```
/// use exarg::{IntRangeList, Validate};
///
/// assert_eq!(IntRangeList.validate("2,3:6,8").unwrap(), Some(vec![2, 3, 4, 5, 6, 8]));
/// assert_eq!(IntRangeList.validate("").unwrap(), None);
/// ```
pub struct IntRangeList;

impl Validate for IntRangeList {
    type Output = Option<Vec<i64>>;

    fn validate(&self, token: &str) -> Result<Option<Vec<i64>>, ValidationError> {
        if token.is_empty() {
            return Ok(None);
        }

        let endpoint_error = || {
            ValidationError(
                "Expected a mixed list of integers and integer ranges in form of A,B:C,D,E:F etc"
                    .to_string(),
            )
        };
        let mut values: Vec<i64> = Vec::default();

        for word in token.split(',') {
            let endpoints: Vec<&str> = word.split(':').collect();

            match endpoints.as_slice() {
                [single] => {
                    values.push(single.parse().map_err(|_| endpoint_error())?);
                }
                [start, end] => {
                    let start: i64 = start.parse().map_err(|_| endpoint_error())?;
                    let end: i64 = end.parse().map_err(|_| endpoint_error())?;
                    values.extend(start..=end);
                }
                _ => {
                    return Err(ValidationError(
                        "Expected int ranges in form of A:B".to_string(),
                    ));
                }
            }
        }

        values.sort_unstable();
        values.dedup();
        Ok(Some(values))
    }
}

/// A string with backslash-escape sequences decoded to their literal characters.
///
/// Recognizes the usual single-character escapes, octal, `\xHH`, `\uHHHH`, `\UHHHHHHHH`,
/// and backslash-newline continuation; unrecognized escapes are kept verbatim.
pub struct Unescaped;

impl Validate for Unescaped {
    type Output = String;

    fn validate(&self, token: &str) -> Result<String, ValidationError> {
        unescape(token)
    }
}

fn unescape(input: &str) -> Result<String, ValidationError> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.char_indices().peekable();

    while let Some((position, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let Some((_, escape)) = chars.next() else {
            return Err(ValidationError(format!(
                "\\ at end of string at position {position}"
            )));
        };

        match escape {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'v' => out.push('\x0b'),
            // Line continuation: the escaped newline is dropped.
            '\n' => {}
            '0'..='7' => {
                let mut value = escape.to_digit(8).expect("internal error - octal digit");

                // Up to two more octal digits.
                for _ in 0..2 {
                    match chars.peek() {
                        Some((_, digit @ '0'..='7')) => {
                            value = value * 8
                                + digit.to_digit(8).expect("internal error - octal digit");
                            chars.next();
                        }
                        _ => break,
                    }
                }

                out.push(decode_code_point(value, position)?);
            }
            'x' => {
                let value = take_hex(&mut chars, 2, position, "\\xHH")?;
                out.push(decode_code_point(value, position)?);
            }
            'u' => {
                let value = take_hex(&mut chars, 4, position, "\\uHHHH")?;
                out.push(decode_code_point(value, position)?);
            }
            'U' => {
                let value = take_hex(&mut chars, 8, position, "\\UHHHHHHHH")?;
                out.push(decode_code_point(value, position)?);
            }
            other => {
                // Unrecognized escapes pass through untouched.
                out.push('\\');
                out.push(other);
            }
        }
    }

    Ok(out)
}

fn take_hex(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    count: usize,
    position: usize,
    shape: &str,
) -> Result<u32, ValidationError> {
    let mut value: u32 = 0;

    for _ in 0..count {
        match chars.peek() {
            Some((_, digit)) if digit.is_ascii_hexdigit() => {
                value = value * 16 + digit.to_digit(16).expect("internal error - hex digit");
                chars.next();
            }
            _ => {
                return Err(ValidationError(format!(
                    "truncated {shape} escape at position {position}"
                )));
            }
        }
    }

    Ok(value)
}

fn decode_code_point(value: u32, position: usize) -> Result<char, ValidationError> {
    char::from_u32(value).ok_or_else(|| {
        ValidationError(format!(
            "illegal Unicode code point at position {position}"
        ))
    })
}
