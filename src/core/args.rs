//! Event arguments.
//!
//! Handlers receive a slice of [`Arg`] values. The set of variants is small on
//! purpose: it covers what a publisher typically passes along with a topic
//! (identifiers, counters, flags, free text) while staying comparable and
//! printable.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A single argument passed from a publisher to every handler of a topic.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Arg {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Arg::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Arg::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Arg::Float(v) => Some(*v),
            Arg::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Arg::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Arg::Null)
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Null => f.write_str("null"),
            Arg::Bool(v) => write!(f, "{v}"),
            Arg::Int(v) => write!(f, "{v}"),
            Arg::Float(v) => write!(f, "{v}"),
            Arg::Str(s) => f.write_str(s),
        }
    }
}

/// Parses shell-style words: `null`, `true`/`false`, integers and floats are
/// recognised, anything else becomes [`Arg::Str`].
///
/// A number is only produced when it is finite and prints back as the exact
/// input word, so `007`, `1.0`, `1e3` or `inf` stay strings.
impl FromStr for Arg {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = match s {
            "null" => Arg::Null,
            "true" => Arg::Bool(true),
            "false" => Arg::Bool(false),
            _ => {
                if let Some(v) = s.parse::<i64>().ok().filter(|v| v.to_string() == s) {
                    Arg::Int(v)
                } else if let Some(v) = s
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite() && v.to_string() == s)
                {
                    Arg::Float(v)
                } else {
                    Arg::Str(s.to_owned())
                }
            }
        };
        Ok(parsed)
    }
}

impl From<()> for Arg {
    fn from(_: ()) -> Self {
        Arg::Null
    }
}

impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        Arg::Bool(v)
    }
}

impl From<i32> for Arg {
    fn from(v: i32) -> Self {
        Arg::Int(v.into())
    }
}

impl From<i64> for Arg {
    fn from(v: i64) -> Self {
        Arg::Int(v)
    }
}

impl From<u32> for Arg {
    fn from(v: u32) -> Self {
        Arg::Int(v.into())
    }
}

impl From<f64> for Arg {
    fn from(v: f64) -> Self {
        Arg::Float(v)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Str(s.to_owned())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Str(s)
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(v: Option<T>) -> Self {
        v.map_or(Arg::Null, Into::into)
    }
}

/// Builds a `Vec<Arg>` from a list of values convertible into [`Arg`].
///
/// ```
/// use topicbus::{args, Arg};
///
/// assert_eq!(args!["create", 42], vec![Arg::Str("create".into()), Arg::Int(42)]);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::core::args::Arg>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::core::args::Arg::from($value)),+]
    };
}
