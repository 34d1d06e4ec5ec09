//! Repository summaries.

use serde::{Deserialize, Serialize};

/// A repository visible to the authenticated user.
///
/// # Examples
///
/// ```
/// use markhub_protocol::RepositorySummary;
///
/// let repo = RepositorySummary {
///     id: 1296269,
///     name: "Hello-World".to_string(),
///     full_name: "octocat/Hello-World".to_string(),
///     private: false,
/// };
/// assert_eq!(repo.owner(), Some("octocat"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositorySummary {
    /// Provider-assigned numeric id.
    pub id: u64,
    /// Repository name without owner.
    pub name: String,
    /// `owner/name`.
    pub full_name: String,
    /// Whether the repository is private.
    pub private: bool,
}

impl RepositorySummary {
    /// Returns the owner part of [`full_name`](Self::full_name).
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.full_name.split_once('/').map(|(owner, _)| owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_is_split_from_full_name() {
        let repo = RepositorySummary {
            id: 7,
            name: "docs".to_string(),
            full_name: "acme/docs".to_string(),
            private: true,
        };
        assert_eq!(repo.owner(), Some("acme"));
    }

    #[test]
    fn owner_is_none_without_slash() {
        let repo = RepositorySummary {
            id: 7,
            name: "docs".to_string(),
            full_name: "docs".to_string(),
            private: false,
        };
        assert_eq!(repo.owner(), None);
    }

    #[test]
    fn serializes_with_provider_field_names() {
        let repo = RepositorySummary {
            id: 42,
            name: "docs".to_string(),
            full_name: "acme/docs".to_string(),
            private: false,
        };
        let json = serde_json::to_value(&repo).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 42,
                "name": "docs",
                "full_name": "acme/docs",
                "private": false,
            })
        );
    }
}
