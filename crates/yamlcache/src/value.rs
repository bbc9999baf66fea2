//! Tagged cache values.
//!
//! Every entry in the shared cache table is a [`ConfigValue`]. The variant
//! records which getter populated it, so reading a key back with a
//! different getter is detected instead of silently reinterpreted.
//!
//! # Example
//!
//! ```rust
//! use yamlcache::{CacheValue, ConfigValue, ValueKind};
//!
//! let value = "word".to_string().into_value();
//! assert_eq!(value.kind(), ValueKind::String);
//! assert_eq!(String::from_value(value.clone()), Ok("word".to_string()));
//! assert_eq!(bool::from_value(value), Err(ValueKind::String));
//! ```

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use serde_json::Value;

// ============================================================================
// ConfigValue Enum
// ============================================================================

/// A cached configuration value.
///
/// | Variant | Rust Type | Getter |
/// |---------|-----------|--------|
/// | `String` | `String` | `get_string` |
/// | `Bool` | `bool` | `get_bool` |
/// | `Int32` | `i32` | `get_int32` |
/// | `Int64` | `i64` | `get_int`, `get_int64` |
/// | `Float64` | `f64` | `get_float64` |
/// | `Duration` | [`Duration`] | `get_duration` |
/// | `StringSlice` | `Vec<String>` | `get_string_slice` |
/// | `Raw` | [`serde_json::Value`] | `get` |
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigValue {
    /// A string value.
    String(String),

    /// A boolean value.
    Bool(bool),

    /// A 32-bit signed integer.
    Int32(i32),

    /// A 64-bit signed integer.
    Int64(i64),

    /// A 64-bit float.
    Float64(f64),

    /// A time span.
    Duration(Duration),

    /// A list of strings.
    StringSlice(Vec<String>),

    /// An uncoerced document node (`Null` when the key is absent).
    Raw(Value),
}

/// The variant of a [`ConfigValue`], used in type mismatch errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`ConfigValue::String`]
    String,
    /// [`ConfigValue::Bool`]
    Bool,
    /// [`ConfigValue::Int32`]
    Int32,
    /// [`ConfigValue::Int64`]
    Int64,
    /// [`ConfigValue::Float64`]
    Float64,
    /// [`ConfigValue::Duration`]
    Duration,
    /// [`ConfigValue::StringSlice`]
    StringSlice,
    /// [`ConfigValue::Raw`]
    Raw,
}

impl ValueKind {
    /// Human-readable type name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Duration => "duration",
            Self::StringSlice => "string slice",
            Self::Raw => "raw value",
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ConfigValue {
    /// Which variant this is.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int32(_) => ValueKind::Int32,
            Self::Int64(_) => ValueKind::Int64,
            Self::Float64(_) => ValueKind::Float64,
            Self::Duration(_) => ValueKind::Duration,
            Self::StringSlice(_) => ValueKind::StringSlice,
            Self::Raw(_) => ValueKind::Raw,
        }
    }
}

// ============================================================================
// CacheValue
// ============================================================================

/// Rust types that can be stored in and read back from the cache.
pub trait CacheValue: Sized {
    /// The variant this type is stored as.
    const KIND: ValueKind;

    /// Wraps the value in its variant.
    fn into_value(self) -> ConfigValue;

    /// Unwraps a cached value.
    ///
    /// # Errors
    ///
    /// Returns the stored [`ValueKind`] when it is not [`Self::KIND`].
    fn from_value(value: ConfigValue) -> Result<Self, ValueKind>;
}

/// Generates `CacheValue` and `From<T>` implementations for each variant.
macro_rules! impl_cache_value {
    ($($t:ty => $variant:ident),+ $(,)?) => {
        $(
            impl CacheValue for $t {
                const KIND: ValueKind = ValueKind::$variant;

                fn into_value(self) -> ConfigValue {
                    ConfigValue::$variant(self)
                }

                fn from_value(value: ConfigValue) -> Result<Self, ValueKind> {
                    match value {
                        ConfigValue::$variant(v) => Ok(v),

                        other => Err(other.kind()),
                    }
                }
            }

            impl From<$t> for ConfigValue {
                fn from(v: $t) -> Self {
                    ConfigValue::$variant(v)
                }
            }
        )+
    };
}

impl_cache_value! {
    String => String,
    bool => Bool,
    i32 => Int32,
    i64 => Int64,
    f64 => Float64,
    Duration => Duration,
    Vec<String> => StringSlice,
    Value => Raw,
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(ConfigValue::from("x").kind(), ValueKind::String);
        assert_eq!(ConfigValue::from(true).kind(), ValueKind::Bool);
        assert_eq!(ConfigValue::from(1_i32).kind(), ValueKind::Int32);
        assert_eq!(ConfigValue::from(1_i64).kind(), ValueKind::Int64);
        assert_eq!(ConfigValue::from(1.0).kind(), ValueKind::Float64);
        assert_eq!(
            ConfigValue::from(Duration::from_secs(1)).kind(),
            ValueKind::Duration
        );
        assert_eq!(
            ConfigValue::from(vec!["a".to_string()]).kind(),
            ValueKind::StringSlice
        );
        assert_eq!(ConfigValue::from(json!({"a": 1})).kind(), ValueKind::Raw);
    }

    #[test]
    fn test_from_value_mismatch_reports_stored_kind() {
        assert_eq!(i32::from_value(ConfigValue::Int64(5)), Err(ValueKind::Int64));
        assert_eq!(
            Duration::from_value(ConfigValue::String("5s".into())),
            Err(ValueKind::String)
        );
        assert_eq!(f64::from_value(ConfigValue::Float64(1.5)), Ok(1.5));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ValueKind::StringSlice.to_string(), "string slice");
        assert_eq!(ValueKind::Float64.to_string(), "float64");
    }
}
