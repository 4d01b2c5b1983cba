//! Dashboard view state with pure transitions.
//!
//! Loads are tagged with a generation; a result for anything but the
//! latest generation is discarded, so an older load finishing late can
//! never overwrite newer data.

use serde::Serialize;

use remlic_entity::license::LicenseType;
use remlic_entity::user::Tier;

use super::entry::{DashboardView, TypeEntry};
use crate::license::matches_search;

/// Client-side dashboard state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardState {
    pub entries: Vec<TypeEntry>,
    pub tier: Tier,
    pub has_active_subscription: bool,
    /// Section expanded by the user, if any.
    pub selected_section: Option<LicenseType>,
    pub search: String,
    pub loading: bool,
    /// Message of the last failed load.
    pub error: Option<String>,
    /// Generation of the most recent refresh.
    pub generation: u64,
}

impl DashboardState {
    /// Start a refresh and return its generation.
    pub fn begin_refresh(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        self.generation
    }

    /// Apply a completed load. Returns `false` if it was stale.
    pub fn apply_loaded(&mut self, generation: u64, view: DashboardView) -> bool {
        if generation != self.generation {
            return false;
        }
        self.entries = view.entries;
        self.tier = view.tier;
        self.has_active_subscription = view.has_active_subscription;
        self.loading = false;
        true
    }

    /// Record a failed load. Returns `false` if it was stale.
    pub fn apply_failed(&mut self, generation: u64, message: impl Into<String>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.loading = false;
        self.error = Some(message.into());
        true
    }

    /// Expand a section, or collapse it if it is already expanded.
    pub fn select_section(&mut self, kind: LicenseType) {
        self.selected_section = match self.selected_section {
            Some(current) if current == kind => None,
            _ => Some(kind),
        };
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    /// Entries narrowed to the selected section, with records filtered by
    /// the search query. Counts and limits are left untouched.
    pub fn visible_records(&self) -> Vec<TypeEntry> {
        self.entries
            .iter()
            .filter(|e| self.selected_section.is_none_or(|s| s == e.license_type))
            .map(|e| TypeEntry {
                records: e
                    .records
                    .iter()
                    .filter(|r| matches_search(&r.record, &self.search))
                    .cloned()
                    .collect(),
                ..e.clone()
            })
            .collect()
    }
}
