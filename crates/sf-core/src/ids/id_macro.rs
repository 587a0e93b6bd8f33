//! Common macros for implementing ID wrapper types.

/// Record ids handed out by the backend as integers.
macro_rules! impl_numeric_id {
    ($($name:ident),* $(,)?) => {
        $(
            impl $name {
                pub const fn new(raw: u64) -> Self {
                    Self(raw)
                }

                pub const fn get(&self) -> u64 {
                    self.0
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl From<u64> for $name {
                fn from(raw: u64) -> Self {
                    Self(raw)
                }
            }

            impl std::str::FromStr for $name {
                type Err = std::num::ParseIntError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    s.trim().parse::<u64>().map(Self)
                }
            }
        )*
    };
}

/// Opaque string ids (UUIDs minted by the backend).
macro_rules! impl_string_id {
    ($($name:ident),* $(,)?) => {
        $(
            impl $name {
                pub fn inner(&self) -> &String {
                    &self.0
                }

                pub fn into_inner(self) -> String {
                    self.0
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl From<String> for $name {
                fn from(s: String) -> Self {
                    Self(s)
                }
            }

            impl From<&str> for $name {
                fn from(s: &str) -> Self {
                    Self(s.to_string())
                }
            }

            impl AsRef<str> for $name {
                fn as_ref(&self) -> &str {
                    &self.0
                }
            }
        )*
    };
}

pub(crate) use impl_numeric_id;
pub(crate) use impl_string_id;
