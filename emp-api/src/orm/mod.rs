mod db;
pub mod department;
pub mod employee;
mod error;
pub mod testing;

pub use db::*;
pub use error::StoreError;

/// Which records a read returns. Soft-deleted rows stay in the same table and
/// are filtered out by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Only records whose active flag is set.
    #[default]
    Active,
    /// Active and soft-deleted records alike.
    All,
}

impl Visibility {
    pub fn from_flag(include_inactive: bool) -> Self {
        if include_inactive {
            Visibility::All
        } else {
            Visibility::Active
        }
    }

    /// Values of the active flag a query should accept.
    pub(crate) fn flags(self) -> Vec<bool> {
        match self {
            Visibility::Active => vec![true],
            Visibility::All => vec![true, false],
        }
    }
}

pub(crate) fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}
