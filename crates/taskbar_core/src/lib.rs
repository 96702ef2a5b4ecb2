//! Core jump list logic for taskbar integration.
//! Typed link properties, grouped list building and the shell protocol live here;
//! executables only wire items together.

pub mod logging;
pub mod model;
pub mod service;
pub mod shell;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::list_item::{
    IconLocation, LinkRecord, ListItem, ListItemError, ListItemKind, ShellLink, INFOTIPSIZE,
    MAX_PATH,
};
pub use model::property::{
    LinkPropertyStore, PropertyKey, PropertyStore, PropertyStoreError, IS_DEST_LIST_SEPARATOR,
    TITLE,
};
pub use model::variant::{
    FileTime, ScalarKind, VariantError, VariantKind, VariantQuery, VariantResult, VariantValue,
};
pub use service::jump_list::{
    CommitReport, CommitStage, JumpList, JumpListError, JumpListOptions, JumpListResult,
    LoadCurrentHandle, DEFAULT_KNOWN_CATEGORY_CAP,
};
pub use shell::{
    InMemoryShell, KnownCategory, ListTransaction, ObjectCollection, PublishedCategory,
    PublishedList, ShellError, ShellOperation, ShellResult, ShellService, DEFAULT_MAX_SLOTS,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
