//! Editable record lists.
//!
//! Every review page (analysis, epics, team matching) shows one or more
//! ordered lists of small records that the user can edit in place, extend
//! with a blank record, or shorten. [`EditableCollection`] holds the working
//! copy of one such list together with its edit cursor. Pages combine
//! several collections and keep at most one of them in edit mode, reported
//! as an [`EditKey`].

mod edit;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use edit::EditOp;

/// Errors raised by collection operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CollectionError {
    #[error("index {index} out of range for {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("unknown section '{0}'")]
    UnknownSection(String),

    #[error("invalid edit '{0}': expected set:<section>:<index>:<field>=<value>, add:<section> or remove:<section>:<index>")]
    InvalidEdit(String),
}

/// A record shape that can be edited field by field.
///
/// Each shape has its own field enum, so a write can only target a field
/// that exists on that shape.
pub trait EditableRecord: Clone {
    type Field: Copy + Eq + fmt::Debug + FromStr<Err = CollectionError>;

    /// The record appended by an "Add" action: every field empty.
    fn blank() -> Self;

    fn get(&self, field: Self::Field) -> &str;

    fn set(&mut self, field: Self::Field, value: String);
}

/// What happens to the edit cursor when a record at or before it is removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleEditPolicy {
    /// Leave edit mode when the edited record is removed or shifted.
    #[default]
    Clear,
    /// Keep the raw index, even if it now points at another record or past the end.
    Preserve,
}

impl StaleEditPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Preserve => "preserve",
        }
    }
}

impl FromStr for StaleEditPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clear" => Ok(Self::Clear),
            "preserve" => Ok(Self::Preserve),
            other => Err(format!(
                "invalid stale edit policy '{}': expected clear or preserve",
                other
            )),
        }
    }
}

/// The record currently in edit mode on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditKey<S> {
    pub section: S,
    pub index: usize,
}

/// Working copy of an ordered record list plus its edit cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct EditableCollection<R> {
    items: Vec<R>,
    editing: Option<usize>,
    policy: StaleEditPolicy,
}

impl<R> Default for EditableCollection<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            editing: None,
            policy: StaleEditPolicy::default(),
        }
    }
}

impl<R: EditableRecord> EditableCollection<R> {
    pub fn new(items: Vec<R>) -> Self {
        Self::with_policy(items, StaleEditPolicy::default())
    }

    pub fn with_policy(items: Vec<R>, policy: StaleEditPolicy) -> Self {
        Self {
            items,
            editing: None,
            policy,
        }
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn into_items(self) -> Vec<R> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&R> {
        self.items.get(index)
    }

    /// Index of the record in edit mode, if any.
    pub fn editing(&self) -> Option<usize> {
        self.editing
    }

    pub fn policy(&self) -> StaleEditPolicy {
        self.policy
    }

    fn check_index(&self, index: usize) -> Result<(), CollectionError> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(CollectionError::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
        }
    }

    pub fn begin_edit(&mut self, index: usize) -> Result<(), CollectionError> {
        self.check_index(index)?;
        self.editing = Some(index);
        Ok(())
    }

    /// Write one field. Edit mode is kept so further fields of the same
    /// record can be changed before [`end_edit`](Self::end_edit).
    pub fn commit_field(
        &mut self,
        index: usize,
        field: R::Field,
        value: impl Into<String>,
    ) -> Result<(), CollectionError> {
        self.check_index(index)?;
        self.items[index].set(field, value.into());
        Ok(())
    }

    /// Write one field and leave edit mode.
    pub fn commit_and_end(
        &mut self,
        index: usize,
        field: R::Field,
        value: impl Into<String>,
    ) -> Result<(), CollectionError> {
        self.commit_field(index, field, value)?;
        self.editing = None;
        Ok(())
    }

    /// Append a record at the end and return its index. Does not enter edit mode.
    pub fn append(&mut self, record: R) -> usize {
        self.items.push(record);
        self.items.len() - 1
    }

    pub fn append_blank(&mut self) -> usize {
        self.append(R::blank())
    }

    /// Remove the record at `index`, shifting later records down by one.
    pub fn remove(&mut self, index: usize) -> Result<R, CollectionError> {
        self.check_index(index)?;
        let removed = self.items.remove(index);
        if self.policy == StaleEditPolicy::Clear {
            if let Some(editing) = self.editing {
                if editing >= index {
                    self.editing = None;
                }
            }
        }
        Ok(removed)
    }

    pub fn end_edit(&mut self) {
        self.editing = None;
    }

    /// Apply a parsed edit. The section of `op` is not checked; pages
    /// dispatch on it before calling this.
    pub fn apply(&mut self, op: &EditOp) -> Result<(), CollectionError> {
        match op {
            EditOp::Set {
                index,
                field,
                value,
                ..
            } => {
                let field = field.parse::<R::Field>()?;
                self.commit_field(*index, field, value.clone())
            }
            EditOp::Add { .. } => {
                self.append_blank();
                Ok(())
            }
            EditOp::Remove { index, .. } => self.remove(*index).map(|_| ()),
        }
    }
}

/// Record shape for plain string lists, such as the analysis modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleField {
    Value,
}

impl FromStr for ModuleField {
    type Err = CollectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "value" | "name" => Ok(Self::Value),
            other => Err(CollectionError::UnknownField(other.to_string())),
        }
    }
}

impl EditableRecord for String {
    type Field = ModuleField;

    fn blank() -> Self {
        String::new()
    }

    fn get(&self, _field: ModuleField) -> &str {
        self
    }

    fn set(&mut self, _field: ModuleField, value: String) {
        *self = value;
    }
}
