//! GUID literal payload.

use std::fmt;
use std::str::FromStr;

/// A 128-bit globally unique identifier.
///
/// Displayed and parsed in the hyphenated 8-4-4-4-12 lowercase hex form.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Guid(u128);

impl Guid {
    /// The all-zero GUID.
    pub const NIL: Self = Self(0);

    /// Create a GUID from its raw 128-bit value.
    #[inline]
    pub const fn from_u128(raw: u128) -> Self {
        Self(raw)
    }

    /// Get the raw 128-bit value.
    #[inline]
    pub const fn as_u128(self) -> u128 {
        self.0
    }
}

/// Error returned when text is not a hyphenated GUID.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GuidParseError {
    input: String,
}

impl fmt::Display for GuidParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` is not a valid guid", self.input)
    }
}

impl std::error::Error for GuidParseError {}

/// Lengths of the hyphen-separated hex groups.
const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

impl FromStr for Guid {
    type Err = GuidParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || GuidParseError {
            input: s.to_string(),
        };

        let mut raw: u128 = 0;
        let mut parts = s.split('-');
        for len in GROUPS {
            let part = parts.next().ok_or_else(err)?;
            if part.len() != len || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(err());
            }
            let value = u128::from_str_radix(part, 16).map_err(|_| err())?;
            raw = (raw << (len * 4)) | value;
        }
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(Self(raw))
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = format!("{:032x}", self.0);
        write!(
            f,
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        )
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guid({self})")
    }
}

impl TryFrom<String> for Guid {
    type Error = GuidParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Guid> for String {
    fn from(value: Guid) -> Self {
        value.to_string()
    }
}
