//! External shell/taskbar collaborator contracts.
//!
//! # Responsibility
//! - Define the synchronous destination-list protocol used by the builder:
//!   begin, register categories and tasks, finalize or abort.
//! - Define read queries for system-maintained categories and the last
//!   published list.
//!
//! # Invariants
//! - At most one list transaction is open per shell at a time.
//! - Nothing registered inside a transaction is visible before finalize.

mod in_memory;

pub use in_memory::InMemoryShell;

use crate::model::list_item::LinkRecord;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ShellResult<T> = Result<T, ShellError>;

/// Slot count the shell reports when it has no better estimate.
pub const DEFAULT_MAX_SLOTS: u32 = 10;

/// Category maintained by the shell itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnownCategory {
    Frequent,
    Recent,
}

impl KnownCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Frequent => "frequent",
            Self::Recent => "recent",
        }
    }
}

/// Shell operations, used to attribute platform failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShellOperation {
    BeginList,
    AppendCategory,
    AddUserTasks,
    AppendKnownCategory,
    CommitList,
    AbortList,
    QueryKnownCategory,
    PublishedList,
}

impl ShellOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BeginList => "begin_list",
            Self::AppendCategory => "append_category",
            Self::AddUserTasks => "add_user_tasks",
            Self::AppendKnownCategory => "append_known_category",
            Self::CommitList => "commit_list",
            Self::AbortList => "abort_list",
            Self::QueryKnownCategory => "query_known_category",
            Self::PublishedList => "published_list",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    TransactionAlreadyOpen,
    NoOpenTransaction,
    EmptyCategoryName,
    /// Category contains an item the user removed from the list.
    RemovedItem { category: String },
    /// Platform reported a failure status for an operation.
    Platform { operation: ShellOperation, code: i32 },
}

impl Display for ShellError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TransactionAlreadyOpen => write!(f, "a list transaction is already open"),
            Self::NoOpenTransaction => write!(f, "no list transaction is open"),
            Self::EmptyCategoryName => write!(f, "category name must not be empty"),
            Self::RemovedItem { category } => {
                write!(f, "category `{category}` contains an item removed by the user")
            }
            Self::Platform { operation, code } => {
                write!(f, "{} failed with status {code:#010X}", operation.as_str())
            }
        }
    }
}

impl Error for ShellError {}

/// Ordered collection of link snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectCollection {
    items: Vec<LinkRecord>,
}

impl ObjectCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: LinkRecord) {
        self.items.push(record);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LinkRecord> {
        self.items.get(index)
    }

    pub fn contains(&self, record: &LinkRecord) -> bool {
        self.items.contains(record)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LinkRecord> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[LinkRecord] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<LinkRecord> {
        self.items
    }
}

impl From<Vec<LinkRecord>> for ObjectCollection {
    fn from(items: Vec<LinkRecord>) -> Self {
        Self { items }
    }
}

impl FromIterator<LinkRecord> for ObjectCollection {
    fn from_iter<I: IntoIterator<Item = LinkRecord>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ObjectCollection {
    type Item = &'a LinkRecord;
    type IntoIter = std::slice::Iter<'a, LinkRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Result of opening a list transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTransaction {
    /// Number of slots the shell will display.
    pub max_slots: u32,
    /// Items the user removed since they were last published.
    pub removed: ObjectCollection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedCategory {
    pub name: String,
    pub items: ObjectCollection,
}

/// Snapshot of a finalized destination list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedList {
    pub categories: Vec<PublishedCategory>,
    pub tasks: ObjectCollection,
    pub known_categories: Vec<KnownCategory>,
}

impl PublishedList {
    pub fn category(&self, name: &str) -> Option<&PublishedCategory> {
        self.categories.iter().find(|category| category.name == name)
    }
}

/// Destination-list service exposed by the shell.
///
/// All calls are blocking. Implementations guard the open transaction; callers
/// must end every successful [`ShellService::begin_list`] with exactly one
/// [`ShellService::commit_list`] or [`ShellService::abort_list`].
pub trait ShellService {
    fn is_supported(&self) -> bool;
    fn begin_list(&self) -> ShellResult<ListTransaction>;
    fn append_category(&self, name: &str, items: &ObjectCollection) -> ShellResult<()>;
    fn add_user_tasks(&self, items: &ObjectCollection) -> ShellResult<()>;
    fn append_known_category(&self, category: KnownCategory) -> ShellResult<()>;
    fn commit_list(&self) -> ShellResult<()>;
    fn abort_list(&self) -> ShellResult<()>;
    /// Returns up to `cap` entries of a system category; `0` requests all.
    fn known_category_items(
        &self,
        category: KnownCategory,
        cap: u32,
    ) -> ShellResult<ObjectCollection>;
    fn published_list(&self) -> ShellResult<PublishedList>;
}
