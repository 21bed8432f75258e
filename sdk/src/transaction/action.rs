//! # Actions
//!
//! One contract call: contract id, entry-point name and a JSON array of
//! arguments, stored as the exact JSON text that gets hashed.
//!
//! ## Argument encoding
//!
//! Arguments arrive as [`ActionArg`] values. Raw bytes are turned into text
//! once, here, by Latin-1 decoding (byte `0xE9` becomes `U+00E9`), so the
//! argument list is always a JSON array of scalars. The array is written
//! in the node tooling's layout: `", "` between items and
//! every character outside printable ASCII escaped as `\uXXXX`. The second
//! rule also guarantees the JSON text is pure ASCII, which the canonical
//! encoder's one-byte-per-char string rule relies on.
//!
//! Floats use the shortest round-trip digits, in positional form for
//! decimal exponents `-4..16` (always with a fractional part, `10.0`) and
//! otherwise as `d.ddde±XX` with at least two exponent digits (`1e-07`,
//! `1e+16`).
//!
//! ```
//! use iost_sdk::transaction::{Action, ActionArg};
//!
//! let action = Action::new(
//!     "token.iost",
//!     "transfer",
//!     ["iost", "alice", "bob", "10.0", ""].map(ActionArg::from),
//! )
//! .unwrap();
//! assert_eq!(action.data(), r#"["iost", "alice", "bob", "10.0", ""]"#);
//! ```

use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::{Number, Value};
use thiserror::Error;

use crate::encoding::{latin1_decode, CanonicalEncode, CanonicalEncoder};

/// Errors raised while building an [`Action`].
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("action contract id is empty")]
    EmptyContract,

    #[error("action entry-point name is empty")]
    EmptyActionName,

    #[error("argument is not representable as JSON: {0}")]
    InvalidArgument(String),

    #[error("failed to encode action arguments: {0}")]
    Encoding(String),
}

// ---------------------------------------------------------------------------
// ActionArg
// ---------------------------------------------------------------------------

/// One positional argument of a contract call.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionArg {
    Text(String),
    /// Latin-1 decoded into text before JSON encoding.
    Bytes(Vec<u8>),
    Number(Number),
    Bool(bool),
}

impl ActionArg {
    /// A floating-point argument. NaN and infinities have no JSON form.
    pub fn float(value: f64) -> Result<Self, ActionError> {
        Number::from_f64(value)
            .map(ActionArg::Number)
            .ok_or_else(|| ActionError::InvalidArgument(format!("{value} is not finite")))
    }

    fn into_json(self) -> Value {
        match self {
            ActionArg::Text(s) => Value::String(s),
            ActionArg::Bytes(b) => Value::String(latin1_decode(&b)),
            ActionArg::Number(n) => Value::Number(n),
            ActionArg::Bool(b) => Value::Bool(b),
        }
    }
}

impl From<&str> for ActionArg {
    fn from(s: &str) -> Self {
        ActionArg::Text(s.to_string())
    }
}

impl From<String> for ActionArg {
    fn from(s: String) -> Self {
        ActionArg::Text(s)
    }
}

impl From<&[u8]> for ActionArg {
    fn from(b: &[u8]) -> Self {
        ActionArg::Bytes(b.to_vec())
    }
}

impl From<Vec<u8>> for ActionArg {
    fn from(b: Vec<u8>) -> Self {
        ActionArg::Bytes(b)
    }
}

impl From<bool> for ActionArg {
    fn from(b: bool) -> Self {
        ActionArg::Bool(b)
    }
}

macro_rules! integer_args {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ActionArg {
                fn from(n: $t) -> Self {
                    ActionArg::Number(Number::from(n))
                }
            }
        )*
    };
}

integer_args!(i32, i64, u32, u64);

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// A single contract invocation inside a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Action {
    contract: String,
    action_name: String,
    data: String,
}

impl Action {
    /// Builds an action, JSON-encoding `args` as described in the module docs.
    pub fn new(
        contract: impl Into<String>,
        action_name: impl Into<String>,
        args: impl IntoIterator<Item = ActionArg>,
    ) -> Result<Self, ActionError> {
        let contract = contract.into();
        let action_name = action_name.into();
        if contract.is_empty() {
            return Err(ActionError::EmptyContract);
        }
        if action_name.is_empty() {
            return Err(ActionError::EmptyActionName);
        }
        let values: Vec<Value> = args.into_iter().map(ActionArg::into_json).collect();
        Ok(Self {
            contract,
            action_name,
            data: encode_json(&values)?,
        })
    }

    /// An action whose JSON argument text is already final, e.g. one decoded
    /// from a node response. The text is kept byte for byte.
    pub fn from_raw(
        contract: impl Into<String>,
        action_name: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            contract: contract.into(),
            action_name: action_name.into(),
            data: data.into(),
        }
    }

    pub fn contract(&self) -> &str {
        &self.contract
    }

    pub fn action_name(&self) -> &str {
        &self.action_name
    }

    /// The JSON argument array exactly as hashed.
    pub fn data(&self) -> &str {
        &self.data
    }
}

impl CanonicalEncode for Action {
    fn encode(&self, enc: &mut CanonicalEncoder) {
        enc.write_string(&self.contract)
            .write_string(&self.action_name)
            .write_string(&self.data);
    }
}

// ---------------------------------------------------------------------------
// JSON text
// ---------------------------------------------------------------------------

/// Compact JSON with `", "`/`": "` separators and ASCII-only output.
struct AsciiJsonFormatter;

impl Formatter for AsciiJsonFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    // Quotes, backslashes and C0 controls never reach this method;
    // serde_json escapes those itself before handing over the fragment.
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        for c in fragment.chars() {
            if (' '..='~').contains(&c) {
                writer.write_all(&[c as u8])?;
            } else {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }

    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(float_repr(&format!("{value:e}")).as_bytes())
    }

    fn write_f32<W>(&mut self, writer: &mut W, value: f32) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(float_repr(&format!("{value:e}")).as_bytes())
    }
}

/// Reformats the shortest `{:e}` rendering of a finite float (`-1.25e-7`)
/// into the layout described in the module docs.
fn float_repr(shortest: &str) -> String {
    let (sign, unsigned) = match shortest.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", shortest),
    };
    let (mantissa, exponent) = unsigned.split_once('e').unwrap_or((unsigned, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    let mut out = String::from(sign);
    if (-4..16).contains(&exponent) {
        // Position of the decimal point within `digits`.
        let point = exponent + 1;
        let len = digits.len() as i32;
        if point <= 0 {
            out.push_str("0.");
            out.extend(std::iter::repeat('0').take(point.unsigned_abs() as usize));
            out.push_str(&digits);
        } else if point >= len {
            out.push_str(&digits);
            out.extend(std::iter::repeat('0').take((point - len) as usize));
            out.push_str(".0");
        } else {
            let (int, frac) = digits.split_at(point as usize);
            out.push_str(int);
            out.push('.');
            out.push_str(frac);
        }
    } else {
        let (lead, rest) = digits.split_at(1.min(digits.len()));
        out.push_str(lead);
        if !rest.is_empty() {
            out.push('.');
            out.push_str(rest);
        }
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        out.push_str(&format!("e{exp_sign}{:02}", exponent.unsigned_abs()));
    }
    out
}

fn encode_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ActionError> {
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, AsciiJsonFormatter);
    value
        .serialize(&mut ser)
        .map_err(|e| ActionError::Encoding(e.to_string()))?;
    String::from_utf8(out).map_err(|e| ActionError::Encoding(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
