//! Key/value metadata appended to log lines.
//!
//! Fields render as ` (key=value, key=value)`. Strings stay bare unless they
//! are empty or contain whitespace or one of `,()=`, in which case they are
//! printed as a quoted, escaped literal so the suffix stays unambiguous.

use std::fmt;

use indexmap::IndexMap;

/// Characters that force a string value to be quoted.
const DELIMITERS: &[char] = &[',', '(', ')', '='];

/// A single metadata value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text; quoted when ambiguous.
    Str(String),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Floating point number.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Pre-rendered text, always printed bare.
    Display(String),
}

impl Value {
    /// Capture anything `Display` as a bare, non-string value.
    pub fn display(value: impl fmt::Display) -> Self {
        Self::Display(value.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(&render_str(s)),
            Self::Int(n) => write!(f, "{n}"),
            Self::UInt(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n:?}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Display(s) => f.write_str(s),
        }
    }
}

/// Check whether a string value needs quoting.
pub fn needs_quotes(s: &str) -> bool {
    s.is_empty() || s.chars().any(|c| c.is_whitespace() || DELIMITERS.contains(&c))
}

fn render_str(s: &str) -> String {
    if needs_quotes(s) {
        // Serializing a str cannot fail; the Debug form is a close fallback.
        serde_json::to_string(s).unwrap_or_else(|_| format!("{s:?}"))
    } else {
        s.to_string()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! impl_from_number {
    ($variant:ident, $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Self::$variant(<$target>::from(value))
                }
            }
        )+
    };
}

impl_from_number!(Int, i64: i8, i16, i32, i64);
impl_from_number!(UInt, u64: u8, u16, u32, u64);
impl_from_number!(Float, f64: f32, f64);

impl From<isize> for Value {
    fn from(value: isize) -> Self {
        Self::Int(value as i64)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Self::UInt(value as u64)
    }
}

/// Ordered metadata for one log line.
///
/// Keys keep their first insertion position. Inserting an existing key
/// replaces the value in place.
///
/// ```
/// use humanlog::{fields, Fields};
///
/// let fields = fields! { user = "alice", count = 2 };
/// assert_eq!(fields.to_string(), " (user=alice, count=2)");
/// assert_eq!(Fields::new().to_string(), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(IndexMap<String, Value>);

impl Fields {
    /// Create an empty set of fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing any existing value for `key` in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a field by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Render the metadata suffix for a log line.
///
/// Empty fields render as an empty string.
pub fn format_fields(fields: &Fields) -> String {
    if fields.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = fields.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!(" ({})", parts.join(", "))
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_fields(self))
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (key, value) in iter {
            fields.insert(key, value);
        }
        fields
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Fields
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Build [`Fields`] from `key = value` pairs.
///
/// ```
/// use humanlog::fields;
///
/// let fields = fields! { path = "/tmp/my file", items = 3 };
/// assert_eq!(fields.to_string(), r#" (path="/tmp/my file", items=3)"#);
/// assert!(fields!().is_empty());
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:ident = $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $(fields.insert(stringify!($key), $value);)+
        fields
    }};
}
