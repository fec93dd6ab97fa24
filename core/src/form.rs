//! Partial request encoding: field tables and the pair builder.
//!
//! # Design
//! Every operation declares a static table of [`Field`]s over its parameter
//! struct. A field knows its wire key and how to pull its value out of the
//! struct; `None` means absent. [`build`] walks the table in declaration
//! order and emits one [`WirePair`] per present scalar, one pair per sub-key
//! of a present composite, and nothing for absent fields. There is no error
//! path: required fields are non-optional in the parameter structs, so they
//! can never reach the builder as absent.

use std::collections::BTreeMap;

/// One flattened `key=value` entry of a form-encoded request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WirePair {
    pub key: String,
    pub value: String,
}

impl WirePair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl PartialEq<(&str, &str)> for WirePair {
    fn eq(&self, other: &(&str, &str)) -> bool {
        self.key == other.0 && self.value == other.1
    }
}

/// Rendering of a typed value to the text the API expects.
///
/// Total by construction: every well-typed value has exactly one wire form.
pub trait ToWire {
    fn to_wire(&self) -> String;
}

impl ToWire for str {
    fn to_wire(&self) -> String {
        self.to_string()
    }
}

impl ToWire for String {
    fn to_wire(&self) -> String {
        self.clone()
    }
}

macro_rules! decimal_to_wire {
    ($($ty:ty),*) => {
        $(
            impl ToWire for $ty {
                fn to_wire(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

decimal_to_wire!(u8, u16, u32, u64);

/// A structured value that expands into a fixed set of bracketed sub-keys.
///
/// Each sub-key travels with its value, so a field sends exactly the pairs
/// listed here, in this order.
pub trait Composite {
    fn sub_pairs(&self) -> Vec<(&'static str, String)>;
}

/// Free-form `key[entry]=value` map, sent in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Metadata(pub BTreeMap<String, String>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    fn entries(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// How a field's value is pulled from the parameter struct `P`.
pub enum Encode<P> {
    /// A single pair under the field's key.
    Scalar(fn(&P) -> Option<String>),
    /// One pair per declared sub-key, named `key[sub]`.
    Composite(fn(&P) -> Option<Vec<(&'static str, String)>>),
    /// One pair per entry, named `key[entry]`; the entry set is open.
    Nested(fn(&P) -> Option<Vec<(String, String)>>),
}

/// A single row of an operation's field table.
pub struct Field<P> {
    key: &'static str,
    encode: Encode<P>,
}

impl<P> Field<P> {
    pub const fn scalar(key: &'static str, value: fn(&P) -> Option<String>) -> Self {
        Self {
            key,
            encode: Encode::Scalar(value),
        }
    }

    pub const fn composite(key: &'static str, parts: fn(&P) -> Option<Vec<(&'static str, String)>>) -> Self {
        Self {
            key,
            encode: Encode::Composite(parts),
        }
    }

    pub const fn nested(key: &'static str, entries: fn(&P) -> Option<Vec<(String, String)>>) -> Self {
        Self {
            key,
            encode: Encode::Nested(entries),
        }
    }

    /// Field name, which is also its wire key (or key prefix for composites).
    pub fn key(&self) -> &'static str {
        self.key
    }

    fn encode_into(&self, values: &P, out: &mut Vec<WirePair>) {
        match &self.encode {
            Encode::Scalar(value) => {
                if let Some(value) = value(values) {
                    out.push(WirePair::new(self.key, value));
                }
            }
            Encode::Composite(parts) => {
                if let Some(parts) = parts(values) {
                    out.extend(
                        parts
                            .into_iter()
                            .map(|(sub, value)| WirePair::new(format!("{}[{sub}]", self.key), value)),
                    );
                }
            }
            Encode::Nested(entries) => {
                if let Some(entries) = entries(values) {
                    out.extend(
                        entries
                            .into_iter()
                            .map(|(entry, value)| WirePair::new(format!("{}[{entry}]", self.key), value)),
                    );
                }
            }
        }
    }
}

/// Encode the present fields of `values` in table order.
pub fn build<P>(fields: &[Field<P>], values: &P) -> Vec<WirePair> {
    let mut pairs = Vec::with_capacity(fields.len());
    for field in fields {
        field.encode_into(values, &mut pairs);
    }
    pairs
}

/// Render an optional scalar.
pub fn wire<T: ToWire + ?Sized>(value: Option<&T>) -> Option<String> {
    value.map(ToWire::to_wire)
}

/// Expand an optional composite.
pub fn parts<C: Composite>(value: Option<&C>) -> Option<Vec<(&'static str, String)>> {
    value.map(Composite::sub_pairs)
}

/// Expand optional metadata.
pub fn entries(value: Option<&Metadata>) -> Option<Vec<(String, String)>> {
    value.map(Metadata::entries)
}

/// Join a person's name the way the API stores it: `first last`, or
/// `first infix last` when a middle initial is given.
pub fn join_name(first: &str, middle: Option<char>, last: &str) -> String {
    match middle {
        Some(initial) => format!("{first} {initial} {last}"),
        None => format!("{first} {last}"),
    }
}
