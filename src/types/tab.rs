use serde::{Deserialize, Serialize};

use super::channel::TabId;

/// A browser tab hosting one page. Each tab owns exactly one mixer channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    pub url: String,
    pub title: String,
    pub label: String,
    pub created_at: i64,
}
