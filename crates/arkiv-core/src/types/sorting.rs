//! Listing sort keys for the file tree.
//!
//! Folders always order before files; the requested key sorts within each
//! group, and creation time plus id break remaining ties.

use serde::{Deserialize, Serialize};

/// User-selectable sort key for tree listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Name A→Z.
    Alphabetical,
    /// Name Z→A.
    ReverseAlphabetical,
    /// Newest first (the default).
    #[default]
    Latest,
    /// Oldest first.
    Oldest,
    /// Largest first.
    Largest,
    /// Smallest first.
    Smallest,
}

impl SortBy {
    /// The secondary sort column and direction for this key.
    ///
    /// Returned as a static SQL fragment; the full listing order is
    /// `folders first, <this>, created_at DESC, id DESC`.
    pub fn order_column(&self) -> &'static str {
        match self {
            Self::Alphabetical => "name ASC",
            Self::ReverseAlphabetical => "name DESC",
            Self::Latest => "created_at DESC",
            Self::Oldest => "created_at ASC",
            Self::Largest => "size_bytes DESC NULLS LAST",
            Self::Smallest => "size_bytes ASC NULLS LAST",
        }
    }

    /// The complete `ORDER BY` clause for tree listings.
    pub fn order_clause(&self) -> String {
        format!(
            "ORDER BY (kind = 'folder') DESC, {}, created_at DESC, id DESC",
            self.order_column()
        )
    }

    /// Parse a query-string value, falling back to the default for
    /// unknown keys.
    pub fn parse(value: &str) -> Self {
        match value {
            "alphabetical" => Self::Alphabetical,
            "reverse_alphabetical" => Self::ReverseAlphabetical,
            "latest" => Self::Latest,
            "oldest" => Self::Oldest,
            "largest" => Self::Largest,
            "smallest" => Self::Smallest,
            _ => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folders_always_order_first() {
        for sort in [
            SortBy::Alphabetical,
            SortBy::ReverseAlphabetical,
            SortBy::Latest,
            SortBy::Oldest,
            SortBy::Largest,
            SortBy::Smallest,
        ] {
            assert!(
                sort.order_clause()
                    .starts_with("ORDER BY (kind = 'folder') DESC")
            );
        }
    }

    #[test]
    fn test_default_is_latest() {
        assert_eq!(SortBy::default(), SortBy::Latest);
        assert_eq!(SortBy::parse("bogus"), SortBy::Latest);
    }

    #[test]
    fn test_id_is_final_tiebreak() {
        assert!(SortBy::Alphabetical.order_clause().ends_with("id DESC"));
    }
}
