//! Grouped jump list builder.
//!
//! # Responsibility
//! - Collect list items into named groups in first-touched order.
//! - Publish groups, user tasks and known categories to the shell in one
//!   begin/register/finalize transaction.
//! - Query shell-maintained categories and the currently published list.
//!
//! # Invariants
//! - A group is either absent or holds at least one item.
//! - Every opened transaction is finalized or aborted before returning.
//! - Nothing is retried; a failed commit leaves the previous list visible.

use crate::model::list_item::{LinkRecord, ListItem, ListItemError};
use crate::shell::{
    KnownCategory, ListTransaction, ObjectCollection, ShellError, ShellService,
};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::thread::JoinHandle;

/// Default cap for known category queries.
pub const DEFAULT_KNOWN_CATEGORY_CAP: u32 = 10;

pub type JumpListResult<T> = Result<T, JumpListError>;

/// Builder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpListOptions {
    /// Entries requested by [`JumpList::items`]; `0` asks for the full list.
    pub known_category_cap: u32,
}

impl Default for JumpListOptions {
    fn default() -> Self {
        Self {
            known_category_cap: DEFAULT_KNOWN_CATEGORY_CAP,
        }
    }
}

/// Step of the publish transaction that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStage {
    Begin,
    RegisterTasks,
    RegisterCategory,
    RegisterKnownCategory,
    Finalize,
}

impl CommitStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Begin => "begin",
            Self::RegisterTasks => "register_tasks",
            Self::RegisterCategory => "register_category",
            Self::RegisterKnownCategory => "register_known_category",
            Self::Finalize => "finalize",
        }
    }
}

#[derive(Debug)]
pub enum JumpListError {
    /// An item could not be snapshotted or rebuilt.
    Item(ListItemError),
    /// The shell rejected a step of the publish transaction.
    Commit {
        stage: CommitStage,
        source: ShellError,
    },
    Query {
        category: KnownCategory,
        source: ShellError,
    },
    Load(ShellError),
    /// The background load worker panicked.
    WorkerPanicked,
}

impl JumpListError {
    fn commit(stage: CommitStage) -> impl FnOnce(ShellError) -> Self {
        move |source| Self::Commit { stage, source }
    }
}

impl Display for JumpListError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Item(err) => write!(f, "{err}"),
            Self::Commit { stage, source } => {
                write!(f, "jump list commit failed at {}: {source}", stage.as_str())
            }
            Self::Query { category, source } => {
                write!(f, "query for {} items failed: {source}", category.as_str())
            }
            Self::Load(err) => write!(f, "loading current jump list failed: {err}"),
            Self::WorkerPanicked => write!(f, "jump list load worker panicked"),
        }
    }
}

impl Error for JumpListError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Item(err) => Some(err),
            Self::Commit { source, .. } | Self::Query { source, .. } => Some(source),
            Self::Load(err) => Some(err),
            Self::WorkerPanicked => None,
        }
    }
}

impl From<ListItemError> for JumpListError {
    fn from(value: ListItemError) -> Self {
        Self::Item(value)
    }
}

/// Outcome of a successful [`JumpList::commit`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommitReport {
    pub max_slots: u32,
    /// Items the user removed; they were left out of every category.
    pub removed: Vec<LinkRecord>,
    /// Category names in registration order.
    pub categories: Vec<String>,
    /// Number of records contributed to user tasks, separators included.
    pub tasks: usize,
    pub known_categories: Vec<KnownCategory>,
}

/// Open shell transaction that aborts on drop unless finalized.
struct OpenTransaction<'a, S: ShellService> {
    shell: &'a S,
    finalized: bool,
}

impl<'a, S: ShellService> OpenTransaction<'a, S> {
    fn begin(shell: &'a S) -> JumpListResult<(Self, ListTransaction)> {
        let opened = shell
            .begin_list()
            .map_err(JumpListError::commit(CommitStage::Begin))?;
        Ok((
            Self {
                shell,
                finalized: false,
            },
            opened,
        ))
    }

    fn finalize(mut self) -> JumpListResult<()> {
        self.shell
            .commit_list()
            .map_err(JumpListError::commit(CommitStage::Finalize))?;
        self.finalized = true;
        Ok(())
    }
}

impl<S: ShellService> Drop for OpenTransaction<'_, S> {
    fn drop(&mut self) {
        if self.finalized {
            return;
        }
        if let Err(err) = self.shell.abort_list() {
            warn!("event=jump_list_abort module=jump_list status=error error={err}");
        }
    }
}

#[derive(Debug)]
struct ItemGroup {
    name: String,
    items: Vec<ListItem>,
}

/// Jump list builder over a shell service.
#[derive(Debug)]
pub struct JumpList<S: ShellService> {
    shell: S,
    options: JumpListOptions,
    groups: Vec<ItemGroup>,
    group_index: HashMap<String, usize>,
    known_categories: Vec<KnownCategory>,
}

impl<S: ShellService> JumpList<S> {
    pub fn new(shell: S) -> Self {
        Self::with_options(shell, JumpListOptions::default())
    }

    pub fn with_options(shell: S, options: JumpListOptions) -> Self {
        Self {
            shell,
            options,
            groups: Vec::new(),
            group_index: HashMap::new(),
            known_categories: Vec::new(),
        }
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    pub fn options(&self) -> JumpListOptions {
        self.options
    }

    /// Whether the shell can display jump lists at all.
    pub fn is_supported(&self) -> bool {
        self.shell.is_supported()
    }

    /// Moves `item` into the group named by its group key.
    pub fn add(&mut self, item: ListItem) -> &mut Self {
        match self.group_index.get(item.group_name()) {
            Some(&index) => self.groups[index].items.push(item),
            None => {
                let name = item.group_name().to_string();
                self.group_index.insert(name.clone(), self.groups.len());
                self.groups.push(ItemGroup {
                    name,
                    items: vec![item],
                });
            }
        }
        self
    }

    /// Includes a shell-maintained category in the next commit.
    pub fn add_known_category(&mut self, category: KnownCategory) -> &mut Self {
        if !self.known_categories.contains(&category) {
            self.known_categories.push(category);
        }
        self
    }

    pub fn known_categories(&self) -> &[KnownCategory] {
        &self.known_categories
    }

    /// Total number of items across all groups.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|group| group.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group keys in first-touched order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.name.as_str())
    }

    pub fn group(&self, name: &str) -> Option<&[ListItem]> {
        self.group_index
            .get(name)
            .map(|&index| self.groups[index].items.as_slice())
    }

    /// Shell-maintained entries of `category`, capped by the configured count.
    pub fn items(&self, category: KnownCategory) -> JumpListResult<ObjectCollection> {
        self.items_capped(category, self.options.known_category_cap)
    }

    /// Shell-maintained entries of `category`; `cap == 0` requests all.
    pub fn items_capped(
        &self,
        category: KnownCategory,
        cap: u32,
    ) -> JumpListResult<ObjectCollection> {
        let items = self
            .shell
            .known_category_items(category, cap)
            .map_err(|source| JumpListError::Query { category, source })?;
        info!(
            "event=known_category_query module=jump_list status=ok category={} cap={} count={}",
            category.as_str(),
            cap,
            items.len()
        );
        Ok(items)
    }

    /// Publishes all groups, tasks and known categories in one transaction.
    ///
    /// Items the user removed are left out of categories and returned in the
    /// report. Item snapshots are taken before the transaction opens.
    ///
    /// User tasks are registered group by group in first-touched order, not
    /// in overall insertion order. An ungrouped separator added after items
    /// of an earlier group lands after all of that group's items.
    ///
    /// # Errors
    /// - `Item` when an item has uncommitted property changes.
    /// - `Commit` when any shell step fails; the transaction is aborted and the
    ///   previously published list stays visible.
    pub fn commit(&self) -> JumpListResult<CommitReport> {
        match self.publish() {
            Ok(report) => {
                info!(
                    "event=jump_list_commit module=jump_list status=ok categories={} tasks={} known={} removed={} max_slots={}",
                    report.categories.len(),
                    report.tasks,
                    report.known_categories.len(),
                    report.removed.len(),
                    report.max_slots
                );
                Ok(report)
            }
            Err(err) => {
                error!("event=jump_list_commit module=jump_list status=error error={err}");
                Err(err)
            }
        }
    }

    fn publish(&self) -> JumpListResult<CommitReport> {
        let snapshots = self
            .groups
            .iter()
            .map(|group| {
                group
                    .items
                    .iter()
                    .map(ListItem::record)
                    .collect::<Result<Vec<_>, _>>()
                    .map(|records| (group.name.as_str(), records))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (transaction, opened) = OpenTransaction::begin(&self.shell)?;
        let mut report = CommitReport {
            max_slots: opened.max_slots,
            removed: opened.removed.into_vec(),
            ..CommitReport::default()
        };

        let mut category_slots = 0usize;
        for (name, records) in snapshots {
            let tasks = records.iter().cloned().collect::<ObjectCollection>();
            self.shell
                .add_user_tasks(&tasks)
                .map_err(JumpListError::commit(CommitStage::RegisterTasks))?;
            report.tasks += tasks.len();

            if name.is_empty() {
                continue;
            }
            let category = records
                .into_iter()
                .filter(|record| !record.separator && !report.removed.contains(record))
                .collect::<ObjectCollection>();
            if category.is_empty() {
                continue;
            }
            self.shell
                .append_category(name, &category)
                .map_err(JumpListError::commit(CommitStage::RegisterCategory))?;
            category_slots += category.len();
            report.categories.push(name.to_string());
        }

        for &known in &self.known_categories {
            self.shell
                .append_known_category(known)
                .map_err(JumpListError::commit(CommitStage::RegisterKnownCategory))?;
            report.known_categories.push(known);
        }

        if category_slots > report.max_slots as usize {
            warn!(
                "event=jump_list_commit module=jump_list status=truncated category_items={} max_slots={}",
                category_slots, report.max_slots
            );
        }

        transaction.finalize()?;
        Ok(report)
    }

    /// Publishes an empty list and drops all local groups and known categories.
    pub fn clear(&mut self) -> JumpListResult<()> {
        let result = OpenTransaction::begin(&self.shell)
            .and_then(|(transaction, _opened)| transaction.finalize());
        match result {
            Ok(()) => {
                self.groups.clear();
                self.group_index.clear();
                self.known_categories.clear();
                info!("event=jump_list_clear module=jump_list status=ok");
                Ok(())
            }
            Err(err) => {
                error!("event=jump_list_clear module=jump_list status=error error={err}");
                Err(err)
            }
        }
    }

    /// Rebuilds a builder from the list the shell currently publishes.
    ///
    /// Categories become groups. Tasks not already present in a category
    /// become ungrouped items.
    pub fn load_current(shell: S) -> JumpListResult<Self> {
        let published = shell.published_list().map_err(JumpListError::Load)?;
        let mut list = Self::new(shell);

        let mut categorized = Vec::new();
        for category in &published.categories {
            for record in &category.items {
                list.add(ListItem::from_record(record, category.name.as_str())?);
                categorized.push(record);
            }
        }
        for record in &published.tasks {
            match categorized.iter().position(|seen| *seen == record) {
                // Each category entry was also contributed once as a task.
                Some(position) => {
                    categorized.swap_remove(position);
                }
                None => {
                    list.add(ListItem::from_record(record, "")?);
                }
            }
        }
        for &known in &published.known_categories {
            list.add_known_category(known);
        }

        info!(
            "event=jump_list_load module=jump_list status=ok groups={} items={}",
            list.groups.len(),
            list.len()
        );
        Ok(list)
    }
}

impl<S: ShellService + Send + 'static> JumpList<S> {
    /// Runs [`JumpList::load_current`] on a worker thread.
    pub fn load_current_async(shell: S) -> LoadCurrentHandle<S> {
        LoadCurrentHandle {
            worker: std::thread::spawn(move || Self::load_current(shell)),
        }
    }
}

/// Pending result of [`JumpList::load_current_async`].
#[derive(Debug)]
pub struct LoadCurrentHandle<S: ShellService> {
    worker: JoinHandle<JumpListResult<JumpList<S>>>,
}

impl<S: ShellService> LoadCurrentHandle<S> {
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Blocks until the load completes.
    pub fn wait(self) -> JumpListResult<JumpList<S>> {
        self.worker
            .join()
            .map_err(|_| JumpListError::WorkerPanicked)?
    }
}
