//! File actions module.
//!
//! Currently a single action: deleting selected duplicates, either
//! permanently (default) or by moving them to the system trash.
//!
//! ```no_run
//! use dupfinder::actions::{delete_selected, DeleteConfig, NoProgress};
//! use dupfinder::duplicates::{AddressTable, DuplicateSet};
//! use std::collections::BTreeSet;
//!
//! let table = AddressTable::build(&DuplicateSet::default());
//! let result = delete_selected::<NoProgress>(&table, &BTreeSet::new(), &DeleteConfig::trash(), None);
//! assert_eq!(result.bytes_freed, 0);
//! ```

pub mod delete;

pub use delete::{
    delete_selected, delete_to_trash, permanent_delete, BatchDeleteResult, DeleteConfig,
    DeleteError, DeleteFailure, DeleteProgressCallback, DeleteResult, NoProgress,
};
