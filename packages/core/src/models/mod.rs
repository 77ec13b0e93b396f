// ABOUTME: Entity, request and filter records for every ITMS resource
// ABOUTME: Field names follow the backend's camelCase JSON; enums its SCREAMING_SNAKE_CASE

use thiserror::Error;

/// Declares a closed wire enumeration with its JSON spelling and display label.
///
/// Generates `ALL`, `WIRE`, `as_str`, `label`, `Display` (wire spelling) and a
/// forgiving `FromStr` that accepts any case and `-`/space separators.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $variant:ident => ($wire:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire spellings of `ALL`, in the same order
            pub const WIRE: &'static [&'static str] = &[$($wire),+];

            /// Spelling used on the wire
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            /// Label shown to people
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_uppercase().replace(['-', ' '], "_");
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| $crate::models::ParseEnumError {
                        kind: stringify!($name),
                        value: s.to_string(),
                        expected: $name::ALL
                            .iter()
                            .map(|v| v.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }
    };
}

pub mod approval;
pub mod asset;
pub mod auth;
pub mod company;
pub mod dashboard;
pub mod incident;
pub mod issue;
pub mod partner;
pub mod project;
pub mod release;
pub mod specification;
pub mod sr;
pub mod user;

/// A string that names no variant of a wire enumeration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {kind} value: {value}. Must be one of: {expected}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}
