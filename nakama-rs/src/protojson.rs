//! Protobuf JSON conventions used by the Nakama gateway.
//!
//! The gateway marshals messages with protobuf JSON: 64-bit integers travel
//! as strings, enums as numbers, timestamps as RFC 3339 strings and wrapper
//! types (`BoolValue`, `StringValue`, ...) as bare values. The helpers here
//! let plain serde types read both that form and ordinary JSON, so every
//! endpoint shares one decode path.

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};
use serde_with::{DisplayFromStr, PickFirst, Same};
use std::fmt;
use std::marker::PhantomData;

/// `serde_as` adapter for 64-bit integers.
///
/// Serializes as a decimal string and accepts either a string or a number.
pub type Int64 = PickFirst<(DisplayFromStr, Same)>;

/// A fieldless protobuf enum with an `i32` wire value.
pub trait ProtoEnum: Sized + Copy + 'static {
    /// Name used in error messages.
    const TYPE_NAME: &'static str;

    fn as_i32(self) -> i32;

    /// Map a wire number; unknown numbers yield the fallback variant.
    fn from_i32(value: i32) -> Self;

    /// Map an upper-snake protobuf name.
    fn from_name(name: &str) -> Option<Self>;

    fn name(self) -> &'static str;
}

pub(crate) fn serialize_enum<S: Serializer, E: ProtoEnum>(
    value: &E,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_i32(value.as_i32())
}

pub(crate) fn deserialize_enum<'de, D: Deserializer<'de>, E: ProtoEnum>(
    deserializer: D,
) -> Result<E, D::Error> {
    deserializer.deserialize_any(EnumVisitor(PhantomData))
}

struct EnumVisitor<E>(PhantomData<E>);

impl<'de, E: ProtoEnum> Visitor<'de> for EnumVisitor<E> {
    type Value = E;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} as a number or name", E::TYPE_NAME)
    }

    fn visit_i64<Er: de::Error>(self, v: i64) -> Result<E, Er> {
        let v = i32::try_from(v)
            .map_err(|_| Er::custom(format!("{v} overflows {}", E::TYPE_NAME)))?;
        Ok(E::from_i32(v))
    }

    fn visit_u64<Er: de::Error>(self, v: u64) -> Result<E, Er> {
        let v = i32::try_from(v)
            .map_err(|_| Er::custom(format!("{v} overflows {}", E::TYPE_NAME)))?;
        Ok(E::from_i32(v))
    }

    fn visit_str<Er: de::Error>(self, v: &str) -> Result<E, Er> {
        if let Ok(n) = v.parse::<i32>() {
            return Ok(E::from_i32(n));
        }
        E::from_name(v).ok_or_else(|| Er::unknown_variant(v, &[]))
    }
}

/// Declare a protobuf enum with number-or-name serde support.
macro_rules! proto_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal => $wire:literal, )+
        }
        fallback = $fallback:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant = $value, )+
        }

        impl $crate::protojson::ProtoEnum for $name {
            const TYPE_NAME: &'static str = stringify!($name);

            fn as_i32(self) -> i32 {
                self as i32
            }

            fn from_i32(value: i32) -> Self {
                match value {
                    $( $value => Self::$variant, )+
                    _ => Self::$fallback,
                }
            }

            fn from_name(name: &str) -> Option<Self> {
                match name {
                    $( $wire => Some(Self::$variant), )+
                    _ => None,
                }
            }

            fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $wire, )+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$fallback
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", $crate::protojson::ProtoEnum::as_i32(*self))
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                $crate::protojson::serialize_enum(self, serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                $crate::protojson::deserialize_enum(deserializer)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_with::serde_as;

    proto_enum! {
        enum Color {
            Unknown = 0 => "UNKNOWN",
            Red = 1 => "RED",
            Green = 2 => "GREEN",
        }
        fallback = Unknown;
    }

    #[serde_as]
    #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
    struct Record {
        #[serde_as(as = "Int64")]
        #[serde(default)]
        score: i64,
        #[serde_as(as = "Option<Int64>")]
        rank: Option<i64>,
        #[serde(default)]
        color: Color,
    }

    #[test]
    fn test_int64_accepts_string_and_number() {
        let a: Record = serde_json::from_str(r#"{"score":"9007199254740993","rank":3}"#).unwrap();
        assert_eq!(a.score, 9_007_199_254_740_993);
        assert_eq!(a.rank, Some(3));

        let b: Record = serde_json::from_str(r#"{"score":-5}"#).unwrap();
        assert_eq!(b.score, -5);
        assert_eq!(b.rank, None);
    }

    #[test]
    fn test_int64_serializes_as_string() {
        let r = Record {
            score: 42,
            rank: None,
            color: Color::Green,
        };
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["score"], "42");
        assert_eq!(json["color"], 2);
    }

    #[test]
    fn test_enum_from_number_name_and_unknown() {
        let r: Record = serde_json::from_str(r#"{"color":1}"#).unwrap();
        assert_eq!(r.color, Color::Red);

        let r: Record = serde_json::from_str(r#"{"color":"GREEN"}"#).unwrap();
        assert_eq!(r.color, Color::Green);

        let r: Record = serde_json::from_str(r#"{"color":77}"#).unwrap();
        assert_eq!(r.color, Color::Unknown);

        assert!(serde_json::from_str::<Record>(r#"{"color":"PURPLE"}"#).is_err());
    }

    #[test]
    fn test_enum_display_is_wire_number() {
        assert_eq!(Color::Green.to_string(), "2");
        assert_eq!(Color::Red.name(), "RED");
    }
}
