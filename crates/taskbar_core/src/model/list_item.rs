//! Jump list item model.
//!
//! # Responsibility
//! - Own one shell link (target, arguments, description, icon, properties).
//! - Expose typed getters/setters that go through the link's fixed-size
//!   UTF-16 buffers and property store.
//! - Snapshot committed link state into [`LinkRecord`] for the shell.
//!
//! # Invariants
//! - A `ListItem` is move-only; the link is never shared between owners.
//! - Separator items carry no title and no arguments.
//! - Getters strip trailing NUL padding from buffer reads.

use crate::model::property::{
    LinkPropertyStore, PropertyStore, PropertyStoreError, IS_DEST_LIST_SEPARATOR, TITLE,
};
use crate::model::variant::{VariantError, VariantValue};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Capacity, in UTF-16 units, of argument and description buffers.
pub const INFOTIPSIZE: usize = 1024;
/// Capacity, in UTF-16 units, of path buffers.
pub const MAX_PATH: usize = 260;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListItemKind {
    /// Launches the target with arguments.
    Arguments,
    Separator,
}

/// Icon file plus resource index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconLocation {
    pub path: String,
    pub index: i32,
}

/// Immutable snapshot of a committed link, as handed to the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub path: PathBuf,
    pub arguments: String,
    pub description: String,
    pub icon: Option<IconLocation>,
    pub title: String,
    pub separator: bool,
}

#[derive(Debug)]
pub enum ListItemError {
    /// Current executable path could not be resolved.
    ExecutablePath(std::io::Error),
    Variant(VariantError),
    Property(PropertyStoreError),
    /// Text does not fit the link's fixed-size buffer.
    InvalidArgument {
        field: &'static str,
        len: usize,
        max: usize,
    },
    /// Text contains a NUL, which would end the buffer early.
    InteriorNul { field: &'static str },
    /// Property writes were staged but not committed.
    UncommittedProperties,
    /// Separators cannot carry a title or arguments.
    SeparatorNotEditable(&'static str),
}

impl Display for ListItemError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExecutablePath(err) => write!(f, "cannot resolve executable path: {err}"),
            Self::Variant(err) => write!(f, "{err}"),
            Self::Property(err) => write!(f, "{err}"),
            Self::InvalidArgument { field, len, max } => {
                write!(f, "{field} is {len} UTF-16 units, limit is {max}")
            }
            Self::InteriorNul { field } => write!(f, "{field} must not contain NUL"),
            Self::UncommittedProperties => {
                write!(f, "link has property changes that were not committed")
            }
            Self::SeparatorNotEditable(field) => write!(f, "separator items have no {field}"),
        }
    }
}

impl Error for ListItemError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ExecutablePath(err) => Some(err),
            Self::Variant(err) => Some(err),
            Self::Property(err) => Some(err),
            Self::InvalidArgument { .. }
            | Self::InteriorNul { .. }
            | Self::UncommittedProperties
            | Self::SeparatorNotEditable(_) => None,
        }
    }
}

impl From<VariantError> for ListItemError {
    fn from(value: VariantError) -> Self {
        Self::Variant(value)
    }
}

impl From<PropertyStoreError> for ListItemError {
    fn from(value: PropertyStoreError) -> Self {
        Self::Property(value)
    }
}

fn encode_bounded(
    field: &'static str,
    text: &str,
    capacity: usize,
) -> Result<Vec<u16>, ListItemError> {
    if text.contains('\0') {
        return Err(ListItemError::InteriorNul { field });
    }
    let units = text.encode_utf16().collect::<Vec<_>>();
    let max = capacity - 1;
    if units.len() > max {
        return Err(ListItemError::InvalidArgument {
            field,
            len: units.len(),
            max,
        });
    }
    Ok(units)
}

/// Copies `source` into `buffer`, truncating to leave room for a NUL and
/// zero-filling the remainder.
fn copy_to_buffer(source: &[u16], buffer: &mut [u16]) {
    let Some(room) = buffer.len().checked_sub(1) else {
        return;
    };
    let len = source.len().min(room);
    buffer[..len].copy_from_slice(&source[..len]);
    buffer[len..].fill(0);
}

/// Decodes a NUL-padded buffer, dropping everything from the first NUL.
fn read_buffer(buffer: &[u16]) -> String {
    let end = buffer.iter().position(|unit| *unit == 0).unwrap_or(buffer.len());
    String::from_utf16_lossy(&buffer[..end])
}

/// Shell link object: launch target, presentation data and property store.
#[derive(Debug, Default)]
pub struct ShellLink {
    path: PathBuf,
    arguments: Vec<u16>,
    description: Vec<u16>,
    icon: Option<(Vec<u16>, i32)>,
    properties: LinkPropertyStore,
}

impl ShellLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
    }

    pub fn set_arguments(&mut self, arguments: &str) -> Result<(), ListItemError> {
        self.arguments = encode_bounded("arguments", arguments, INFOTIPSIZE)?;
        Ok(())
    }

    pub fn arguments_into(&self, buffer: &mut [u16]) {
        copy_to_buffer(&self.arguments, buffer);
    }

    pub fn set_description(&mut self, description: &str) -> Result<(), ListItemError> {
        self.description = encode_bounded("description", description, INFOTIPSIZE)?;
        Ok(())
    }

    pub fn description_into(&self, buffer: &mut [u16]) {
        copy_to_buffer(&self.description, buffer);
    }

    pub fn set_icon_location(&mut self, path: &str, index: i32) -> Result<(), ListItemError> {
        self.icon = Some((encode_bounded("icon path", path, MAX_PATH)?, index));
        Ok(())
    }

    /// Writes the icon path into `buffer` and returns the icon index.
    pub fn icon_location_into(&self, buffer: &mut [u16]) -> Option<i32> {
        let (path, index) = self.icon.as_ref()?;
        copy_to_buffer(path, buffer);
        Some(*index)
    }

    pub fn property_store(&self) -> &LinkPropertyStore {
        &self.properties
    }

    pub fn property_store_mut(&mut self) -> &mut LinkPropertyStore {
        &mut self.properties
    }
}

/// One entry in a jump list: a shell link plus grouping metadata.
#[derive(Debug)]
pub struct ListItem {
    link: ShellLink,
    kind: ListItemKind,
    group: String,
    icon_index: i32,
}

impl ListItem {
    /// Creates a task that relaunches the current executable with `arguments`.
    ///
    /// An empty `display_name` is allowed and reads back as empty text.
    pub fn create_with_arguments(
        arguments: &str,
        display_name: &str,
    ) -> Result<Self, ListItemError> {
        let path = std::env::current_exe().map_err(ListItemError::ExecutablePath)?;
        Self::create_with_target(path, arguments, display_name)
    }

    /// Creates a task launching `path` with `arguments`.
    pub fn create_with_target(
        path: impl Into<PathBuf>,
        arguments: &str,
        display_name: &str,
    ) -> Result<Self, ListItemError> {
        let mut link = ShellLink::new();
        link.set_path(path);
        link.set_arguments(arguments)?;

        let mut item = Self {
            link,
            kind: ListItemKind::Arguments,
            group: String::new(),
            icon_index: 0,
        };
        item.set_display_name(display_name)?;
        Ok(item)
    }

    pub fn create_separator() -> Result<Self, ListItemError> {
        let mut link = ShellLink::new();
        let store = link.property_store_mut();
        store.set_value(IS_DEST_LIST_SEPARATOR, VariantValue::from_bool(true))?;
        store.commit()?;

        Ok(Self {
            link,
            kind: ListItemKind::Separator,
            group: String::new(),
            icon_index: 0,
        })
    }

    /// Rebuilds an item from a shell snapshot, placing it in `group`.
    pub fn from_record(
        record: &LinkRecord,
        group: impl Into<String>,
    ) -> Result<Self, ListItemError> {
        let mut item = if record.separator {
            Self::create_separator()?
        } else {
            Self::create_with_target(&record.path, &record.arguments, &record.title)?
        };
        item.set_description(&record.description)?;
        if let Some(icon) = &record.icon {
            item.icon_index = icon.index;
            item.set_logo_path(&icon.path)?;
        }
        item.set_group_name(group);
        Ok(item)
    }

    pub fn kind(&self) -> ListItemKind {
        self.kind
    }

    pub fn is_separator(&self) -> bool {
        self.kind == ListItemKind::Separator
    }

    pub fn link(&self) -> &ShellLink {
        &self.link
    }

    /// Direct access for extra link properties. Writes must be committed
    /// before the item is published.
    pub fn properties_mut(&mut self) -> &mut LinkPropertyStore {
        self.link.property_store_mut()
    }

    /// Title property as text; empty when unset.
    pub fn display_name(&self) -> String {
        self.link
            .property_store()
            .get_value(TITLE)
            .map(|value| value.to_string_or(""))
            .unwrap_or_default()
    }

    /// Replaces and commits the title property.
    pub fn set_display_name(&mut self, display_name: &str) -> Result<(), ListItemError> {
        if self.is_separator() {
            return Err(ListItemError::SeparatorNotEditable("display name"));
        }
        let value = VariantValue::from_string(display_name)?;
        let store = self.link.property_store_mut();
        store.set_value(TITLE, value)?;
        store.commit()?;
        Ok(())
    }

    pub fn arguments(&self) -> String {
        let mut buffer = vec![0u16; INFOTIPSIZE];
        self.link.arguments_into(&mut buffer);
        read_buffer(&buffer)
    }

    pub fn set_arguments(&mut self, arguments: &str) -> Result<(), ListItemError> {
        if self.is_separator() {
            return Err(ListItemError::SeparatorNotEditable("arguments"));
        }
        self.link.set_arguments(arguments)
    }

    pub fn description(&self) -> String {
        let mut buffer = vec![0u16; INFOTIPSIZE];
        self.link.description_into(&mut buffer);
        read_buffer(&buffer)
    }

    pub fn set_description(&mut self, description: &str) -> Result<(), ListItemError> {
        self.link.set_description(description)
    }

    /// Icon path; empty when no icon was set.
    pub fn logo_path(&self) -> String {
        let mut buffer = vec![0u16; MAX_PATH];
        match self.link.icon_location_into(&mut buffer) {
            Some(_) => read_buffer(&buffer),
            None => String::new(),
        }
    }

    pub fn set_logo_path(&mut self, path: &str) -> Result<(), ListItemError> {
        self.link.set_icon_location(path, self.icon_index)
    }

    pub fn group_name(&self) -> &str {
        &self.group
    }

    pub fn set_group_name(&mut self, group: impl Into<String>) {
        self.group = group.into();
    }

    /// Snapshots committed link state.
    ///
    /// # Errors
    /// - `UncommittedProperties` when property writes are still staged.
    pub fn record(&self) -> Result<LinkRecord, ListItemError> {
        if self.link.property_store().has_pending_changes() {
            return Err(ListItemError::UncommittedProperties);
        }
        let mut icon_buffer = vec![0u16; MAX_PATH];
        let icon = self
            .link
            .icon_location_into(&mut icon_buffer)
            .map(|index| IconLocation {
                path: read_buffer(&icon_buffer),
                index,
            });

        Ok(LinkRecord {
            path: self.link.path().to_path_buf(),
            arguments: self.arguments(),
            description: self.description(),
            icon,
            title: self.display_name(),
            separator: self.is_separator(),
        })
    }
}
