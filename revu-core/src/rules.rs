//! Optimistic rule-configuration store.
//!
//! Keeps two generations of the rule map: *last-saved* (what the server has
//! acknowledged) and *working* (what the UI shows, possibly unsaved). Toggles
//! mutate only the working generation; an explicit save pushes the whole
//! working map to the server. A failed save never touches the working
//! generation: the user's toggles survive and can be re-saved.

use thiserror::Error;

use crate::types::RuleSet;

/// Save status of the rule set. Orthogonal to the analyze status axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleStatus {
    /// Working generation matches what the server acknowledged.
    #[default]
    Clean,
    /// Unsaved toggles exist.
    Dirty,
    /// A save request is in flight. Further saves are rejected until it settles.
    Saving,
}

/// Errors from rule-store operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The authoritative mapping has not arrived yet.
    #[error("rules are not loaded yet")]
    NotLoaded,
    /// A save request is already in flight for this session.
    #[error("a rules save is already in flight")]
    SaveInFlight,
}

/// Rule-name → enabled store with optimistic toggle and explicit save.
///
/// The key set is fixed by the server: toggling an unknown name is a no-op,
/// so the client can never invent or drop rules.
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    last_saved: RuleSet,
    working: RuleSet,
    /// Snapshot of the working generation taken at `begin_save`. This, not
    /// the live working map, is what a successful save promotes to
    /// last-saved, so toggles made while the request was in flight stay dirty.
    pending: Option<RuleSet>,
    loaded: bool,
    status: RuleStatus,
}

impl RuleStore {
    /// Creates an empty store awaiting the initial fetch.
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the initial `GET /rules` response has been applied.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Applies the authoritative mapping from the server.
    ///
    /// Establishes both generations as identical and the status as `Clean`.
    pub fn load_complete(&mut self, rules: RuleSet) {
        self.last_saved = rules.clone();
        self.working = rules;
        self.pending = None;
        self.loaded = true;
        self.status = RuleStatus::Clean;
    }

    /// Flips the working flag for `name` and marks the store dirty.
    ///
    /// Unknown names are a no-op. Fails with [`RuleError::NotLoaded`] before
    /// the initial fetch has completed.
    pub fn toggle(&mut self, name: &str) -> Result<(), RuleError> {
        if !self.loaded {
            return Err(RuleError::NotLoaded);
        }
        if let Some(enabled) = self.working.get_mut(name) {
            *enabled = !*enabled;
            // While Saving the status axis stays Saving; settlement will
            // recompute Clean vs Dirty from the generations.
            if self.status != RuleStatus::Saving {
                self.status = RuleStatus::Dirty;
            }
        }
        Ok(())
    }

    /// Starts a save: snapshots the working generation as the request payload.
    ///
    /// Rejects with [`RuleError::SaveInFlight`] while a previous save is
    /// unsettled, so the session never has two overlapping PUTs.
    pub fn begin_save(&mut self) -> Result<RuleSet, RuleError> {
        if !self.loaded {
            return Err(RuleError::NotLoaded);
        }
        if self.status == RuleStatus::Saving {
            return Err(RuleError::SaveInFlight);
        }
        let payload = self.working.clone();
        self.pending = Some(payload.clone());
        self.status = RuleStatus::Saving;
        Ok(payload)
    }

    /// Marks the in-flight save as acknowledged.
    ///
    /// The snapshot taken at `begin_save` becomes the last-saved generation.
    /// Status returns to `Clean` unless the working generation moved while
    /// the request was in flight, in which case it is `Dirty` again.
    pub fn save_succeeded(&mut self) {
        let Some(saved) = self.pending.take() else {
            return;
        };
        self.last_saved = saved;
        self.status = if self.working == self.last_saved {
            RuleStatus::Clean
        } else {
            RuleStatus::Dirty
        };
    }

    /// Marks the in-flight save as failed.
    ///
    /// The working generation is left exactly as the user had it (no rollback
    /// to last-saved) and the status returns to `Dirty` so the save can be
    /// re-attempted.
    pub fn save_failed(&mut self) {
        if self.pending.take().is_some() {
            self.status = RuleStatus::Dirty;
        }
    }

    /// Current save status.
    pub fn status(&self) -> RuleStatus {
        self.status
    }

    /// The working generation, i.e. what the UI renders.
    pub fn rules(&self) -> &RuleSet {
        &self.working
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_store() -> RuleStore {
        let mut store = RuleStore::new();
        store.load_complete(RuleSet::from([
            ("long-line".to_owned(), true),
            ("hardcoded-secret".to_owned(), true),
            ("unused-import".to_owned(), false),
        ]));
        store
    }

    #[test]
    fn toggle_before_load_is_an_invalid_state() {
        let mut store = RuleStore::new();
        assert_eq!(store.toggle("long-line"), Err(RuleError::NotLoaded));
    }

    #[test]
    fn toggle_flips_only_known_names() {
        let mut store = loaded_store();
        store.toggle("long-line").unwrap();
        assert_eq!(store.rules()["long-line"], false);
        assert_eq!(store.status(), RuleStatus::Dirty);

        let before = store.rules().clone();
        store.toggle("no-such-rule").unwrap();
        assert_eq!(store.rules(), &before, "unknown names never invent keys");
    }

    #[test]
    fn second_save_while_in_flight_is_rejected() {
        let mut store = loaded_store();
        store.toggle("long-line").unwrap();
        store.begin_save().unwrap();
        assert_eq!(store.begin_save(), Err(RuleError::SaveInFlight));
    }

    #[test]
    fn failed_save_keeps_user_toggles() {
        let mut store = loaded_store();
        store.toggle("long-line").unwrap();
        store.begin_save().unwrap();
        // Toggle during the in-flight save as well.
        store.toggle("unused-import").unwrap();
        store.save_failed();

        assert_eq!(store.status(), RuleStatus::Dirty);
        assert_eq!(store.rules()["long-line"], false);
        assert_eq!(store.rules()["unused-import"], true);
    }

    #[test]
    fn successful_save_promotes_the_sent_snapshot() {
        let mut store = loaded_store();
        store.toggle("long-line").unwrap();
        let payload = store.begin_save().unwrap();
        assert_eq!(payload["long-line"], false);
        store.save_succeeded();
        assert_eq!(store.status(), RuleStatus::Clean);
    }

    #[test]
    fn toggle_during_save_stays_dirty_after_success() {
        let mut store = loaded_store();
        store.toggle("long-line").unwrap();
        store.begin_save().unwrap();
        store.toggle("unused-import").unwrap();
        store.save_succeeded();

        // The mid-save toggle was not part of the acknowledged payload.
        assert_eq!(store.status(), RuleStatus::Dirty);
        assert_eq!(store.rules()["unused-import"], true);
    }
}
