//! Link property keys and the per-link property store.
//!
//! # Responsibility
//! - Name the shell properties written by list items.
//! - Stage property writes until an explicit commit.
//!
//! # Invariants
//! - Reads only observe committed values.
//! - Well-known keys only accept values of their declared kind.

use crate::model::variant::{ScalarKind, VariantKind, VariantValue};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Shell property key: format identifier plus property id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyKey {
    pub format_id: Uuid,
    pub property_id: u32,
}

impl PropertyKey {
    pub const fn new(format_id: Uuid, property_id: u32) -> Self {
        Self {
            format_id,
            property_id,
        }
    }

    /// Kind a value must have to be stored under this key, if constrained.
    pub fn expected_kind(&self) -> Option<VariantKind> {
        if *self == TITLE {
            Some(VariantKind::Scalar(ScalarKind::String))
        } else if *self == IS_DEST_LIST_SEPARATOR {
            Some(VariantKind::Scalar(ScalarKind::Bool))
        } else {
            None
        }
    }
}

impl Display for PropertyKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:X} {}", self.format_id.braced(), self.property_id)
    }
}

/// Display title of a link.
pub const TITLE: PropertyKey = PropertyKey::new(
    Uuid::from_u128(0xF29F85E0_4FF9_1068_AB91_08002B27B3D9),
    2,
);

/// Marks a link as a visual separator in a destination list.
pub const IS_DEST_LIST_SEPARATOR: PropertyKey = PropertyKey::new(
    Uuid::from_u128(0x9F4C2855_9F79_4B39_A8D0_E1D42DE1D5F3),
    6,
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyStoreError {
    /// Value kind does not match what the key accepts.
    InvalidValue {
        key: PropertyKey,
        expected: VariantKind,
        actual: VariantKind,
    },
}

impl Display for PropertyStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue {
                key,
                expected,
                actual,
            } => write!(f, "property {key} expects {expected}, got {actual}"),
        }
    }
}

impl Error for PropertyStoreError {}

/// Property store contract exposed by each shell link.
pub trait PropertyStore {
    /// Returns the committed value for `key`.
    fn get_value(&self, key: PropertyKey) -> Option<VariantValue>;
    /// Stages a value; it becomes visible after [`PropertyStore::commit`].
    fn set_value(&mut self, key: PropertyKey, value: VariantValue)
        -> Result<(), PropertyStoreError>;
    fn commit(&mut self) -> Result<(), PropertyStoreError>;
    fn has_pending_changes(&self) -> bool;
}

/// In-process property store owned by a [`crate::model::list_item::ShellLink`].
#[derive(Debug, Default)]
pub struct LinkPropertyStore {
    committed: BTreeMap<PropertyKey, VariantValue>,
    pending: BTreeMap<PropertyKey, VariantValue>,
}

impl LinkPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PropertyStore for LinkPropertyStore {
    fn get_value(&self, key: PropertyKey) -> Option<VariantValue> {
        self.committed.get(&key).cloned()
    }

    fn set_value(
        &mut self,
        key: PropertyKey,
        value: VariantValue,
    ) -> Result<(), PropertyStoreError> {
        if let Some(expected) = key.expected_kind() {
            if value.kind() != expected {
                return Err(PropertyStoreError::InvalidValue {
                    key,
                    expected,
                    actual: value.kind(),
                });
            }
        }
        self.pending.insert(key, value);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), PropertyStoreError> {
        self.committed.append(&mut self.pending);
        Ok(())
    }

    fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }
}
