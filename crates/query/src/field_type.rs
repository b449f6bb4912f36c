use std::fmt;
use std::str::FromStr;

use crate::error::UnknownFieldType;

/// Index field kinds understood by the remote service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FieldType {
    /// Exact-match string, e.g. an identifier
    Literal,
    /// Unsigned integer, supports range queries
    UInt,
    /// Tokenized full text
    Text,
}

impl FieldType {
    pub const ALL: [FieldType; 3] = [FieldType::Literal, FieldType::UInt, FieldType::Text];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Literal => "literal",
            FieldType::UInt => "uint",
            FieldType::Text => "text",
        }
    }

    /// Name of the options object in a field definition for this type
    pub fn options_key(&self) -> &'static str {
        match self {
            FieldType::Literal => "literal_options",
            FieldType::UInt => "u_int_options",
            FieldType::Text => "text_options",
        }
    }

    /// Whether clause values for this type are written unquoted
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::UInt)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str() == name)
            .ok_or_else(|| UnknownFieldType(s.to_string()))
    }
}
