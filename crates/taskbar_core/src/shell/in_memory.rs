//! Process-local shell implementation.
//!
//! Backs tests and the CLI. Clones share one state, the way separate handles
//! to the system shell observe the same destination list.

use crate::model::list_item::LinkRecord;
use crate::shell::{
    KnownCategory, ListTransaction, ObjectCollection, PublishedCategory, PublishedList,
    ShellError, ShellOperation, ShellResult, ShellService, DEFAULT_MAX_SLOTS,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const E_FAIL: i32 = 0x8000_4005_u32 as i32;

#[derive(Debug)]
struct UsageEntry {
    record: LinkRecord,
    uses: u32,
    last_used: u64,
}

#[derive(Debug)]
struct ShellState {
    supported: bool,
    max_slots: u32,
    draft: Option<PublishedList>,
    published: PublishedList,
    removed: Vec<LinkRecord>,
    usage: Vec<UsageEntry>,
    clock: u64,
    fail_next: Option<ShellOperation>,
}

impl ShellState {
    fn check(&mut self, operation: ShellOperation) -> ShellResult<()> {
        if self.fail_next == Some(operation) {
            self.fail_next = None;
            return Err(ShellError::Platform {
                operation,
                code: E_FAIL,
            });
        }
        Ok(())
    }

    fn draft_mut(&mut self) -> ShellResult<&mut PublishedList> {
        self.draft.as_mut().ok_or(ShellError::NoOpenTransaction)
    }
}

/// In-memory destination list with usage-driven Frequent/Recent categories.
#[derive(Debug, Clone)]
pub struct InMemoryShell {
    state: Arc<Mutex<ShellState>>,
}

impl Default for InMemoryShell {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryShell {
    pub fn new() -> Self {
        Self::with_max_slots(DEFAULT_MAX_SLOTS)
    }

    pub fn with_max_slots(max_slots: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(ShellState {
                supported: true,
                max_slots,
                draft: None,
                published: PublishedList::default(),
                removed: Vec::new(),
                usage: Vec::new(),
                clock: 0,
                fail_next: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ShellState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_supported(&self, supported: bool) {
        self.lock().supported = supported;
    }

    /// Makes the next call of `operation` fail with a platform status.
    pub fn fail_next(&self, operation: ShellOperation) {
        self.lock().fail_next = Some(operation);
    }

    /// Records one launch of `record` for the Frequent and Recent categories.
    pub fn note_usage(&self, record: LinkRecord) {
        let mut state = self.lock();
        state.clock += 1;
        let now = state.clock;
        match state.usage.iter_mut().find(|entry| entry.record == record) {
            Some(entry) => {
                entry.uses += 1;
                entry.last_used = now;
            }
            None => state.usage.push(UsageEntry {
                record,
                uses: 1,
                last_used: now,
            }),
        }
    }

    /// Simulates the user removing `record` from the visible list.
    ///
    /// Removals are remembered for the life of the shell. Later commits,
    /// including an empty one from `JumpList::clear`, do not forget them.
    pub fn remove_by_user(&self, record: &LinkRecord) {
        let mut state = self.lock();
        for category in &mut state.published.categories {
            category.items = category
                .items
                .iter()
                .filter(|item| *item != record)
                .cloned()
                .collect();
        }
        state.published.categories.retain(|category| !category.items.is_empty());
        if !state.removed.contains(record) {
            state.removed.push(record.clone());
        }
    }

    /// Last finalized list.
    pub fn published(&self) -> PublishedList {
        self.lock().published.clone()
    }

    pub fn has_open_transaction(&self) -> bool {
        self.lock().draft.is_some()
    }
}

impl ShellService for InMemoryShell {
    fn is_supported(&self) -> bool {
        self.lock().supported
    }

    fn begin_list(&self) -> ShellResult<ListTransaction> {
        let mut state = self.lock();
        state.check(ShellOperation::BeginList)?;
        if state.draft.is_some() {
            return Err(ShellError::TransactionAlreadyOpen);
        }
        state.draft = Some(PublishedList::default());
        Ok(ListTransaction {
            max_slots: state.max_slots,
            removed: state.removed.iter().cloned().collect(),
        })
    }

    fn append_category(&self, name: &str, items: &ObjectCollection) -> ShellResult<()> {
        let mut state = self.lock();
        state.check(ShellOperation::AppendCategory)?;
        if state.draft.is_none() {
            return Err(ShellError::NoOpenTransaction);
        }
        if name.trim().is_empty() {
            return Err(ShellError::EmptyCategoryName);
        }
        if items.iter().any(|item| state.removed.contains(item)) {
            return Err(ShellError::RemovedItem {
                category: name.to_string(),
            });
        }
        state.draft_mut()?.categories.push(PublishedCategory {
            name: name.to_string(),
            items: items.clone(),
        });
        Ok(())
    }

    fn add_user_tasks(&self, items: &ObjectCollection) -> ShellResult<()> {
        let mut state = self.lock();
        state.check(ShellOperation::AddUserTasks)?;
        let draft = state.draft_mut()?;
        for item in items {
            draft.tasks.push(item.clone());
        }
        Ok(())
    }

    fn append_known_category(&self, category: KnownCategory) -> ShellResult<()> {
        let mut state = self.lock();
        state.check(ShellOperation::AppendKnownCategory)?;
        let draft = state.draft_mut()?;
        if !draft.known_categories.contains(&category) {
            draft.known_categories.push(category);
        }
        Ok(())
    }

    fn commit_list(&self) -> ShellResult<()> {
        let mut state = self.lock();
        state.check(ShellOperation::CommitList)?;
        let draft = state.draft.take().ok_or(ShellError::NoOpenTransaction)?;
        state.published = draft;
        Ok(())
    }

    fn abort_list(&self) -> ShellResult<()> {
        let mut state = self.lock();
        state.check(ShellOperation::AbortList)?;
        state
            .draft
            .take()
            .map(|_| ())
            .ok_or(ShellError::NoOpenTransaction)
    }

    fn known_category_items(
        &self,
        category: KnownCategory,
        cap: u32,
    ) -> ShellResult<ObjectCollection> {
        let mut state = self.lock();
        state.check(ShellOperation::QueryKnownCategory)?;
        let mut entries = state.usage.iter().collect::<Vec<_>>();
        match category {
            KnownCategory::Recent => entries.sort_by(|a, b| b.last_used.cmp(&a.last_used)),
            KnownCategory::Frequent => entries.sort_by(|a, b| {
                b.uses
                    .cmp(&a.uses)
                    .then_with(|| b.last_used.cmp(&a.last_used))
            }),
        }
        let limit = if cap == 0 {
            entries.len()
        } else {
            cap as usize
        };
        Ok(entries
            .into_iter()
            .take(limit)
            .map(|entry| entry.record.clone())
            .collect())
    }

    fn published_list(&self) -> ShellResult<PublishedList> {
        let mut state = self.lock();
        state.check(ShellOperation::PublishedList)?;
        Ok(state.published.clone())
    }
}
