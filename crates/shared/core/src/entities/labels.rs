//! Labelled enums
//!
//! Every categorical value in a snapshot has exactly one wire label. The label
//! is what the spine line, the JSON journal and external surfaces carry, so
//! `as_str` and `FromStr` must stay inverse to each other.

use thiserror::Error;

/// A label that does not name any variant of the expected enum
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} label: {label:?}")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub label: String,
}

/// Declares an enum whose variants map one-to-one onto wire labels.
///
/// Variant order is significant: the derived `Ord` ranks later variants as
/// more severe, which the band types rely on.
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant ),+
        }

        impl $name {
            /// All variants in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire label
            pub fn as_str(&self) -> &'static str {
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
            type Err = $crate::entities::UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => Err($crate::entities::UnknownLabel {
                        kind: stringify!($name),
                        label: other.to_string(),
                    }),
                }
            }
        }
    };
}

pub(crate) use labelled_enum;

/// Replace characters that would break a delimited line (`|`, `,`, `(`, `)`,
/// `=`, whitespace) with `_`; empty labels become `na`.
pub fn sanitize_label(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| match c {
            '|' | ',' | '(' | ')' | '=' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect();
    if cleaned.is_empty() {
        "na".to_string()
    } else {
        cleaned
    }
}
