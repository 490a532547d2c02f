use crate::core::alphabet::lookup;
use crate::core::constants::{CODE_LENGTH, SEPARATOR, SEPARATOR_POSITIONS};
use crate::util::error::DigipinError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// A validated DIGIPIN code of exactly [`CODE_LENGTH`] alphabet symbols.
///
/// `Display` renders the separated form (`39J-49L-L8T4`), [`Digipin::as_str`]
/// the bare symbols. Parsing strips separators and whitespace first.
///
/// # Example
/// ```
/// use digipin_rs::Digipin;
///
/// # fn main() -> Result<(), digipin_rs::DigipinError> {
/// let code: Digipin = "39J 49L L8T4".parse()?;
/// assert_eq!(code.as_str(), "39J49LL8T4");
/// assert_eq!(code.to_string(), "39J-49L-L8T4");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digipin(String);

impl Digipin {
    /// Wraps symbols already produced by the encoder.
    pub(crate) fn from_symbols(symbols: String) -> Self {
        debug_assert_eq!(symbols.len(), CODE_LENGTH);
        Self(symbols)
    }

    /// The bare symbols without separators.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The display form with separators, same as `to_string()`.
    pub fn formatted(&self) -> String {
        format_code(&self.0)
    }

    /// Iterates over the symbols in order.
    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.0.chars()
    }
}

impl FromStr for Digipin {
    type Err = DigipinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);

        let length = normalized.chars().count();
        if length != CODE_LENGTH {
            return Err(DigipinError::InvalidFormat { length });
        }

        if let Some((position, symbol)) = normalized
            .chars()
            .enumerate()
            .find(|(_, c)| lookup(*c).is_none())
        {
            return Err(DigipinError::InvalidSymbol { symbol, position });
        }

        Ok(Self(normalized))
    }
}

impl std::fmt::Display for Digipin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl AsRef<str> for Digipin {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Serialize for Digipin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.formatted())
    }
}

impl<'de> Deserialize<'de> for Digipin {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// JSON payload returned for an encode request: `{"digipin": "39J-49L-L8T4"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodeResponse {
    pub digipin: Digipin,
}

impl From<Digipin> for EncodeResponse {
    fn from(digipin: Digipin) -> Self {
        Self { digipin }
    }
}

/// Removes separators and whitespace. Does not validate or change case.
pub fn normalize(code: &str) -> String {
    code.chars()
        .filter(|c| *c != SEPARATOR && !c.is_whitespace())
        .collect()
}

/// Inserts separators into a bare code at the fixed display positions.
///
/// Input is not validated; separators are only inserted at positions the code reaches.
pub fn format_code(symbols: &str) -> String {
    let mut out = String::with_capacity(symbols.len() + SEPARATOR_POSITIONS.len());
    for (i, c) in symbols.chars().enumerate() {
        if i > 0 && SEPARATOR_POSITIONS.contains(&i) {
            out.push(SEPARATOR);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_separators_and_whitespace() {
        assert_eq!(normalize("39J-49L-L8T4"), "39J49LL8T4");
        assert_eq!(normalize(" 39J 49L\tL8T4\n"), "39J49LL8T4");
        assert_eq!(normalize("39j-49l"), "39j49l");
    }

    #[test]
    fn test_format_code() {
        assert_eq!(format_code("39J49LL8T4"), "39J-49L-L8T4");
        assert_eq!(format_code("39J4"), "39J-4");
        assert_eq!(format_code("39J"), "39J");
        assert_eq!(format_code(""), "");
    }

    #[test]
    fn test_parse_valid() -> Result<(), DigipinError> {
        let code: Digipin = "39J-49L-L8T4".parse()?;
        assert_eq!(code.as_str(), "39J49LL8T4");
        assert_eq!(code.to_string(), "39J-49L-L8T4");
        assert_eq!(code, "39J49LL8T4".parse()?);
        Ok(())
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(
            "".parse::<Digipin>(),
            Err(DigipinError::InvalidFormat { length: 0 })
        );
        assert_eq!(
            "AB".parse::<Digipin>(),
            Err(DigipinError::InvalidFormat { length: 2 })
        );
        assert_eq!(
            "39J-49L-L8T4C".parse::<Digipin>(),
            Err(DigipinError::InvalidFormat { length: 11 })
        );
    }

    #[test]
    fn test_parse_invalid_symbol_reports_position() {
        assert_eq!(
            "39J-49L-L0T4".parse::<Digipin>(),
            Err(DigipinError::InvalidSymbol {
                symbol: '0',
                position: 7
            })
        );
        assert_eq!(
            "39j49LL8T4".parse::<Digipin>(),
            Err(DigipinError::InvalidSymbol {
                symbol: 'j',
                position: 2
            })
        );
    }

    #[test]
    fn test_json_round_trip() -> Result<(), serde_json::Error> {
        let json = r#"{"digipin":"39J-49L-L8T4"}"#;
        let response: EncodeResponse = serde_json::from_str(json)?;
        assert_eq!(response.digipin.as_str(), "39J49LL8T4");
        assert_eq!(serde_json::to_string(&response)?, json);
        Ok(())
    }

    #[test]
    fn test_json_rejects_invalid_code() {
        let result: Result<EncodeResponse, _> = serde_json::from_str(r#"{"digipin":"AB"}"#);
        assert!(result.is_err());
    }
}
