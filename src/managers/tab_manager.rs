use std::time::{SystemTime, UNIX_EPOCH};

use tracing::info;

use crate::types::channel::TabId;
use crate::types::errors::TabError;
use crate::types::tab::Tab;

/// Trait defining the tab management interface.
pub trait TabManagerTrait {
    fn create_tab(&mut self, url: &str, label: Option<&str>) -> TabId;
    fn close_tab(&mut self, tab_id: TabId) -> Result<(), TabError>;
    fn switch_tab(&mut self, tab_id: TabId) -> Result<(), TabError>;
    fn get_tab(&self, tab_id: TabId) -> Option<&Tab>;
    fn get_all_tabs(&self) -> Vec<&Tab>;
    fn get_active_tab(&self) -> Option<&Tab>;
    fn tab_count(&self) -> usize;
    fn update_tab_url(&mut self, tab_id: TabId, url: &str) -> Result<(), TabError>;
    fn update_tab_title(&mut self, tab_id: TabId, title: &str) -> Result<(), TabError>;
}

/// In-memory tab manager. Tabs are kept in creation order.
pub struct TabManager {
    tabs: Vec<Tab>,
    active_tab_id: Option<TabId>,
    next_id: TabId,
    label_prefix: String,
}

impl TabManager {
    pub fn new(label_prefix: &str) -> Self {
        Self {
            tabs: Vec::new(),
            active_tab_id: None,
            next_id: 0,
            label_prefix: label_prefix.to_string(),
        }
    }

    /// Prefix for labels of tabs created from now on.
    pub fn set_label_prefix(&mut self, label_prefix: &str) {
        self.label_prefix = label_prefix.to_string();
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn find_tab_index(&self, tab_id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    fn tab_mut(&mut self, tab_id: TabId) -> Result<&mut Tab, TabError> {
        self.tabs
            .iter_mut()
            .find(|t| t.id == tab_id)
            .ok_or(TabError::NotFound(tab_id))
    }
}

impl Default for TabManager {
    fn default() -> Self {
        Self::new("Tab")
    }
}

impl TabManagerTrait for TabManager {
    /// Create a new tab and make it active. Without an explicit label the tab
    /// is named `"{prefix} {n}"`, n being the number of open tabs before it.
    fn create_tab(&mut self, url: &str, label: Option<&str>) -> TabId {
        let id = self.next_id;
        self.next_id += 1;
        let label = match label {
            Some(l) if !l.trim().is_empty() => l.to_string(),
            _ => format!("{} {}", self.label_prefix, self.tabs.len()),
        };
        self.tabs.push(Tab {
            id,
            url: url.to_string(),
            title: label.clone(),
            label,
            created_at: Self::now(),
        });
        self.active_tab_id = Some(id);
        info!(tab = id, url, "tab created");
        id
    }

    /// Close a tab. If it was active, the neighbour that slides into its
    /// position (or the new last tab) becomes active.
    fn close_tab(&mut self, tab_id: TabId) -> Result<(), TabError> {
        let idx = self
            .find_tab_index(tab_id)
            .ok_or(TabError::NotFound(tab_id))?;
        self.tabs.remove(idx);

        if self.active_tab_id == Some(tab_id) {
            self.active_tab_id = if self.tabs.is_empty() {
                None
            } else {
                Some(self.tabs[idx.min(self.tabs.len() - 1)].id)
            };
        }
        info!(tab = tab_id, "tab closed");
        Ok(())
    }

    fn switch_tab(&mut self, tab_id: TabId) -> Result<(), TabError> {
        if self.find_tab_index(tab_id).is_none() {
            return Err(TabError::NotFound(tab_id));
        }
        self.active_tab_id = Some(tab_id);
        Ok(())
    }

    fn get_tab(&self, tab_id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    fn get_all_tabs(&self) -> Vec<&Tab> {
        self.tabs.iter().collect()
    }

    fn get_active_tab(&self) -> Option<&Tab> {
        self.active_tab_id.and_then(|id| self.get_tab(id))
    }

    fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    fn update_tab_url(&mut self, tab_id: TabId, url: &str) -> Result<(), TabError> {
        self.tab_mut(tab_id)?.url = url.to_string();
        Ok(())
    }

    fn update_tab_title(&mut self, tab_id: TabId, title: &str) -> Result<(), TabError> {
        self.tab_mut(tab_id)?.title = title.to_string();
        Ok(())
    }
}
