use std::str::FromStr;

use super::CollectionError;

/// A single edit against a page, parsed from text.
///
/// Formats:
/// - `set:<section>:<index>:<field>=<value>`
/// - `add:<section>`
/// - `remove:<section>:<index>`
///
/// The value of a `set` may itself contain `:` and `=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    Set {
        section: String,
        index: usize,
        field: String,
        value: String,
    },
    Add {
        section: String,
    },
    Remove {
        section: String,
        index: usize,
    },
}

impl EditOp {
    pub fn section(&self) -> &str {
        match self {
            Self::Set { section, .. } | Self::Add { section } | Self::Remove { section, .. } => {
                section
            }
        }
    }
}

fn parse_index(raw: &str, op: &str) -> Result<usize, CollectionError> {
    raw.parse()
        .map_err(|_| CollectionError::InvalidEdit(op.to_string()))
}

impl FromStr for EditOp {
    type Err = CollectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CollectionError::InvalidEdit(s.to_string());
        let (verb, rest) = s.split_once(':').ok_or_else(invalid)?;

        match verb {
            "add" if !rest.is_empty() && !rest.contains(':') => Ok(Self::Add {
                section: rest.to_string(),
            }),
            "remove" => {
                let (section, index) = rest.split_once(':').ok_or_else(invalid)?;
                Ok(Self::Remove {
                    section: section.to_string(),
                    index: parse_index(index, s)?,
                })
            }
            "set" => {
                let (target, value) = rest.split_once('=').ok_or_else(invalid)?;
                let mut parts = target.splitn(3, ':');
                let section = parts.next().filter(|p| !p.is_empty()).ok_or_else(invalid)?;
                let index = parts.next().ok_or_else(invalid)?;
                let field = parts.next().filter(|p| !p.is_empty()).ok_or_else(invalid)?;
                Ok(Self::Set {
                    section: section.to_string(),
                    index: parse_index(index, s)?,
                    field: field.to_string(),
                    value: value.to_string(),
                })
            }
            _ => Err(invalid()),
        }
    }
}
