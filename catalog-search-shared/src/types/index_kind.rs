//! The kinds of search index maintained by the indexer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One search index per kind of source record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    DataDocs,
    Tables,
    Users,
}

impl IndexKind {
    /// All kinds, in the order a full bootstrap populates them.
    pub const ALL: [IndexKind; 3] = [IndexKind::DataDocs, IndexKind::Tables, IndexKind::Users];

    /// Short name, also used as the default document type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DataDocs => "datadocs",
            Self::Tables => "tables",
            Self::Users => "users",
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_order() {
        assert_eq!(
            IndexKind::ALL,
            [IndexKind::DataDocs, IndexKind::Tables, IndexKind::Users]
        );
    }

    #[test]
    fn test_names() {
        assert_eq!(IndexKind::DataDocs.to_string(), "datadocs");
        assert_eq!(IndexKind::Tables.as_str(), "tables");
        assert_eq!(IndexKind::Users.as_str(), "users");
    }
}
