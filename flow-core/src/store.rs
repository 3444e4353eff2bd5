//! Canvas state store.
//!
//! [`CanvasStore`] owns the screens being edited and hands out immutable
//! [`CanvasSnapshot`]s. Every effective mutation produces a new snapshot with a
//! higher revision and publishes it to registered observers. Snapshots are
//! `Arc`-shared and copied on write, so a reader holding one never sees later
//! changes.
//!
//! Unknown screen or element ids are not errors: the mutation is a logged
//! no-op that returns `false` or `None`.
//!
//! # Example
//!
//! ```
//! use flow_core::{CanvasStore, ElementTag};
//!
//! let mut store = CanvasStore::new();
//! let screen = store.snapshot().active.clone();
//! let id = store.add_element(&screen, ElementTag::TextHeading);
//! assert!(id.is_some());
//! assert_eq!(store.revision(), 1);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::components::default_field_name;
use crate::order::sync_visual_order_with_json;
use crate::{Element, ElementId, ElementTag, FlowError, FlowResult, Screen, ScreenId};

/// Callback invoked with each new snapshot.
pub type ObserverCallback = Box<dyn Fn(&CanvasSnapshot) + Send + Sync>;

/// Handle returned by [`CanvasStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Immutable view of the canvas at one revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSnapshot {
    /// Incremented by every effective mutation.
    pub revision: u64,
    /// Screens in flow order; never empty.
    pub screens: Vec<Screen>,
    /// Screen currently being edited.
    pub active: ScreenId,
}

impl CanvasSnapshot {
    /// Get a screen by id.
    #[must_use]
    pub fn screen(&self, id: &ScreenId) -> Option<&Screen> {
        self.screens.iter().find(|s| &s.id == id)
    }

    /// The active screen.
    #[must_use]
    pub fn active_screen(&self) -> Option<&Screen> {
        self.screen(&self.active)
    }

    fn locate(&self, screen: &ScreenId, id: ElementId) -> Option<(usize, usize)> {
        let index = self.index_of(screen)?;
        Some((index, self.screens[index].position(id)?))
    }

    fn index_of(&self, id: &ScreenId) -> Option<usize> {
        self.screens.iter().position(|s| &s.id == id)
    }

    fn fresh_screen_id(&self) -> ScreenId {
        loop {
            let id = ScreenId::generate();
            if self.index_of(&id).is_none() {
                return id;
            }
        }
    }
}

/// Owner of the canvas model.
pub struct CanvasStore {
    snapshot: Arc<CanvasSnapshot>,
    observers: Vec<(SubscriptionId, ObserverCallback)>,
    next_subscription: u64,
}

impl std::fmt::Debug for CanvasStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasStore")
            .field("snapshot", &self.snapshot)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for CanvasStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasStore {
    /// Create a store holding one empty screen.
    #[must_use]
    pub fn new() -> Self {
        let screen = Screen::new(ScreenId::generate(), "Screen 1");
        Self::with_snapshot(CanvasSnapshot {
            revision: 0,
            active: screen.id.clone(),
            screens: vec![screen],
        })
    }

    /// Create a store from existing screens; the first becomes active.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::EmptyCanvas`] if `screens` is empty.
    pub fn from_screens(screens: Vec<Screen>) -> FlowResult<Self> {
        let active = screens.first().ok_or(FlowError::EmptyCanvas)?.id.clone();
        Ok(Self::with_snapshot(CanvasSnapshot {
            revision: 0,
            screens,
            active,
        }))
    }

    fn with_snapshot(snapshot: CanvasSnapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<CanvasSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Current revision.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.snapshot.revision
    }

    /// Register an observer called after every effective mutation.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&CanvasSnapshot) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(callback)));
        id
    }

    /// Remove an observer. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    /// Plan a mutation against the current snapshot, then commit it.
    ///
    /// `plan` returns `None` when there is nothing to do; the snapshot is then
    /// left untouched and no copy is made. Otherwise `commit` receives the
    /// plan on a writable snapshot, the revision is bumped and observers are
    /// notified.
    fn apply<P, T>(
        &mut self,
        name: &str,
        plan: impl FnOnce(&CanvasSnapshot) -> Option<P>,
        commit: impl FnOnce(&mut CanvasSnapshot, P) -> T,
    ) -> Option<T> {
        let Some(planned) = plan(&self.snapshot) else {
            tracing::debug!(op = name, "Ignored no-op canvas mutation");
            return None;
        };
        let snapshot = Arc::make_mut(&mut self.snapshot);
        let out = commit(snapshot, planned);
        snapshot.revision += 1;
        tracing::trace!(op = name, revision = snapshot.revision, "Canvas mutated");
        let current: &CanvasSnapshot = &self.snapshot;
        for (_, observer) in &self.observers {
            observer(current);
        }
        Some(out)
    }

    /// Append an empty screen and return its id.
    pub fn add_screen(&mut self) -> ScreenId {
        let id = self.snapshot.fresh_screen_id();
        let screen = Screen::new(id.clone(), format!("Screen {}", self.snapshot.screens.len() + 1));
        self.apply("add_screen", |_| Some(screen), |s, screen| s.screens.push(screen));
        id
    }

    /// Remove a screen unless it is the last one.
    pub fn remove_screen(&mut self, id: &ScreenId) -> bool {
        self.apply(
            "remove_screen",
            |s| {
                if s.screens.len() <= 1 {
                    return None;
                }
                s.index_of(id)
            },
            |s, index| {
                s.screens.remove(index);
                if &s.active == id {
                    let neighbour = index.min(s.screens.len() - 1);
                    s.active = s.screens[neighbour].id.clone();
                }
            },
        )
        .is_some()
    }

    /// Make `id` the active screen.
    pub fn select_screen(&mut self, id: &ScreenId) -> bool {
        self.apply(
            "select_screen",
            |s| (&s.active != id && s.index_of(id).is_some()).then_some(()),
            |s, ()| s.active = id.clone(),
        )
        .is_some()
    }

    /// Insert a copy of a screen after the original, with fresh ids.
    pub fn duplicate_screen(&mut self, id: &ScreenId) -> Option<ScreenId> {
        self.apply(
            "duplicate_screen",
            |s| {
                let index = s.index_of(id)?;
                Some((index, s.screens[index].duplicate(s.fresh_screen_id())))
            },
            |s, (index, copy)| {
                let new_id = copy.id.clone();
                s.screens.insert(index + 1, copy);
                new_id
            },
        )
    }

    /// Change a screen's title and terminal flag.
    pub fn update_screen(&mut self, id: &ScreenId, title: &str, terminal: bool) -> bool {
        self.apply(
            "update_screen",
            |s| {
                let index = s.index_of(id)?;
                let screen = &s.screens[index];
                (screen.title != title || screen.terminal != terminal).then_some(index)
            },
            |s, index| {
                let screen = &mut s.screens[index];
                screen.title = title.to_string();
                screen.terminal = terminal;
            },
        )
        .is_some()
    }

    /// Replace every screen, e.g. after an import. Refused when empty.
    pub fn replace_screens(&mut self, screens: Vec<Screen>) -> bool {
        self.apply(
            "replace_screens",
            |_| (!screens.is_empty()).then_some(screens),
            |s, screens| {
                s.active = screens[0].id.clone();
                s.screens = screens;
            },
        )
        .is_some()
    }

    /// Append a default element of `tag` to a screen.
    pub fn add_element(&mut self, screen: &ScreenId, tag: ElementTag) -> Option<ElementId> {
        self.apply(
            "add_element",
            |s| s.index_of(screen),
            |s, index| {
                let element = Element::new(tag);
                let id = element.id;
                s.screens[index].elements.push(element);
                id
            },
        )
    }

    /// Move the element at `from` to `to`.
    pub fn move_element(&mut self, screen: &ScreenId, from: usize, to: usize) -> bool {
        self.apply(
            "move_element",
            |s| {
                let index = s.index_of(screen)?;
                let len = s.screens[index].elements.len();
                (from != to && from < len && to < len).then_some(index)
            },
            |s, index| {
                let elements = &mut s.screens[index].elements;
                let element = elements.remove(from);
                elements.insert(to, element);
            },
        )
        .is_some()
    }

    /// Replace the element sharing `element.id`, keeping its position.
    pub fn update_element(&mut self, screen: &ScreenId, element: Element) -> bool {
        self.apply(
            "update_element",
            |s| {
                let (index, position) = s.locate(screen, element.id)?;
                (s.screens[index].elements[position] != element).then_some((index, position, element))
            },
            |s, (index, position, element)| s.screens[index].elements[position] = element,
        )
        .is_some()
    }

    /// Remove an element.
    pub fn remove_element(&mut self, screen: &ScreenId, id: ElementId) -> bool {
        self.apply(
            "remove_element",
            |s| s.locate(screen, id),
            |s, (index, position)| {
                s.screens[index].elements.remove(position);
            },
        )
        .is_some()
    }

    /// Insert a copy of an element directly after it.
    ///
    /// Only the id changes. A copied form field keeps its name and so clashes
    /// with the original until renamed, see [`refresh_field_name`](Self::refresh_field_name).
    pub fn duplicate_element(&mut self, screen: &ScreenId, id: ElementId) -> Option<ElementId> {
        self.apply(
            "duplicate_element",
            |s| {
                let (index, position) = s.locate(screen, id)?;
                Some((index, position, s.screens[index].elements[position].duplicate()))
            },
            |s, (index, position, copy)| {
                let copy_id = copy.id;
                s.screens[index].elements.insert(position + 1, copy);
                copy_id
            },
        )
    }

    /// Reset a form field's name to the one derived from its id.
    ///
    /// Returns the new name, or `None` for unknown ids, non-field elements and
    /// fields that already carry that name.
    pub fn refresh_field_name(&mut self, screen: &ScreenId, id: ElementId) -> Option<String> {
        self.apply(
            "refresh_field_name",
            |s| {
                let (index, position) = s.locate(screen, id)?;
                let mut element = s.screens[index].elements[position].clone();
                let fresh = default_field_name(element.tag(), &element.id);
                let name = element.kind.component_mut().field_name_mut()?;
                if *name == fresh {
                    return None;
                }
                name.clone_from(&fresh);
                Some((index, position, element, fresh))
            },
            |s, (index, position, element, fresh)| {
                s.screens[index].elements[position] = element;
                fresh
            },
        )
    }

    /// Move a screen's footer to the end if it is not already there.
    pub fn sync_screen(&mut self, id: &ScreenId) -> bool {
        self.apply(
            "sync_screen",
            |s| {
                let index = s.index_of(id)?;
                let outcome = sync_visual_order_with_json(&s.screens[index]);
                outcome.moved.then_some((index, outcome.screen))
            },
            |s, (index, screen)| s.screens[index] = screen,
        )
        .is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    use super::*;
    use crate::ElementKind;

    fn active(store: &CanvasStore) -> ScreenId {
        store.snapshot().active.clone()
    }

    fn ids(store: &CanvasStore, screen: &ScreenId) -> Vec<ElementId> {
        store
            .snapshot()
            .screen(screen)
            .map(|s| s.elements.iter().map(|e| e.id).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_new_store_has_one_screen() {
        let store = CanvasStore::new();
        let snapshot = store.snapshot();
        assert_eq!(snapshot.screens.len(), 1);
        assert_eq!(snapshot.revision, 0);
        assert!(snapshot.active_screen().is_some());
    }

    #[test]
    fn test_from_screens_rejects_empty() {
        assert!(matches!(
            CanvasStore::from_screens(Vec::new()),
            Err(FlowError::EmptyCanvas)
        ));
    }

    #[test]
    fn test_add_and_remove_screens() {
        let mut store = CanvasStore::new();
        let first = active(&store);
        let second = store.add_screen();
        assert_ne!(first, second);
        assert_eq!(store.snapshot().screens.len(), 2);
        assert_eq!(store.snapshot().screens[1].title, "Screen 2");

        assert!(store.remove_screen(&first));
        assert!(!store.remove_screen(&second), "last screen must stay");
        assert_eq!(store.snapshot().screens.len(), 1);
        assert_eq!(active(&store), second);
    }

    #[test]
    fn test_active_pointer_moves_to_neighbour() {
        let mut store = CanvasStore::new();
        let a = active(&store);
        let b = store.add_screen();
        let c = store.add_screen();
        assert!(store.select_screen(&c));
        assert!(store.remove_screen(&c));
        assert_eq!(active(&store), b);
        assert!(store.select_screen(&a));
        assert!(store.remove_screen(&a));
        assert_eq!(active(&store), b);
    }

    #[test]
    fn test_select_unknown_screen_is_noop() {
        let mut store = CanvasStore::new();
        let before = store.revision();
        assert!(!store.select_screen(&ScreenId::from("NOPE")));
        assert!(!store.select_screen(&active(&store)));
        assert_eq!(store.revision(), before);
    }

    #[test]
    fn test_add_element_to_unknown_screen() {
        let mut store = CanvasStore::new();
        assert_eq!(store.add_element(&ScreenId::from("NOPE"), ElementTag::TextBody), None);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_move_element_is_permutation() {
        let mut store = CanvasStore::new();
        let screen = active(&store);
        for tag in [ElementTag::TextHeading, ElementTag::TextInput, ElementTag::Footer] {
            store.add_element(&screen, tag);
        }
        let before = ids(&store, &screen);
        assert!(store.move_element(&screen, 2, 0));
        let after = ids(&store, &screen);
        assert_eq!(after[0], before[2]);
        assert_eq!(
            before.iter().collect::<HashSet<_>>(),
            after.iter().collect::<HashSet<_>>()
        );

        let revision = store.revision();
        assert!(!store.move_element(&screen, 1, 1));
        assert!(!store.move_element(&screen, 0, 3));
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_update_element_in_place() {
        let mut store = CanvasStore::new();
        let screen = active(&store);
        store.add_element(&screen, ElementTag::TextHeading);
        let id = store.add_element(&screen, ElementTag::TextBody).expect("added");
        store.add_element(&screen, ElementTag::Footer);

        let mut element = store
            .snapshot()
            .screen(&screen)
            .and_then(|s| s.element(id))
            .cloned()
            .expect("element");
        if let ElementKind::TextBody(body) = &mut element.kind {
            body.text = "Updated".to_string();
        }
        assert!(store.update_element(&screen, element.clone()));
        let snapshot = store.snapshot();
        let screen_now = snapshot.screen(&screen).expect("screen");
        assert_eq!(screen_now.position(id), Some(1));
        assert_eq!(screen_now.element(id), Some(&element));

        let revision = store.revision();
        assert!(!store.update_element(&screen, element), "identical update");
        assert!(!store.update_element(&screen, Element::new(ElementTag::TextBody)));
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_duplicate_element_inserted_after_original() {
        let mut store = CanvasStore::new();
        let screen = active(&store);
        let input = store.add_element(&screen, ElementTag::TextInput).expect("added");
        store.add_element(&screen, ElementTag::Footer);

        let copy = store.duplicate_element(&screen, input).expect("duplicated");
        let snapshot = store.snapshot();
        let s = snapshot.screen(&screen).expect("screen");
        assert_eq!(s.position(copy), Some(1));
        let (original, duplicate) = (s.element(input).expect("original"), s.element(copy).expect("copy"));
        assert_ne!(original.id, duplicate.id);
        assert_eq!(original.kind, duplicate.kind);

        let report = crate::validation::validate_screen(s);
        assert!(report
            .errors
            .iter()
            .any(|d| d.code == crate::DiagnosticCode::DuplicateFieldName));
    }

    #[test]
    fn test_refresh_field_name_resolves_clash() {
        let mut store = CanvasStore::new();
        let screen = active(&store);
        let input = store.add_element(&screen, ElementTag::TextInput).expect("added");
        let copy = store.duplicate_element(&screen, input).expect("duplicated");

        let name = store.refresh_field_name(&screen, copy).expect("renamed");
        assert_eq!(name, format!("text_input_{}", copy.short()));
        let snapshot = store.snapshot();
        let s = snapshot.screen(&screen).expect("screen");
        let names: Vec<_> = s.form_fields().filter_map(|e| e.component().field_name()).collect();
        assert_eq!(names.len(), 2);
        assert_ne!(names[0], names[1]);

        let revision = store.revision();
        assert!(store.refresh_field_name(&screen, copy).is_none(), "already fresh");
        assert!(store.refresh_field_name(&screen, input).is_none(), "seeded name");
        let body = store.add_element(&screen, ElementTag::TextBody).expect("added");
        assert!(store.refresh_field_name(&screen, body).is_none(), "not a field");
        assert_eq!(store.revision(), revision + 1);
    }

    #[test]
    fn test_noop_mutation_keeps_shared_snapshot() {
        let mut store = CanvasStore::new();
        let screen = active(&store);
        store.add_element(&screen, ElementTag::TextBody);
        let held = store.snapshot();

        assert!(!store.move_element(&screen, 0, 0));
        assert!(!store.select_screen(&screen));
        assert!(!store.remove_element(&screen, ElementId::new()));
        assert!(!store.sync_screen(&screen));
        assert!(Arc::ptr_eq(&held, &store.snapshot()));

        assert!(store.add_element(&screen, ElementTag::Footer).is_some());
        assert!(!Arc::ptr_eq(&held, &store.snapshot()));
        assert_eq!(held.revision + 1, store.revision());
    }

    #[test]
    fn test_remove_element() {
        let mut store = CanvasStore::new();
        let screen = active(&store);
        let id = store.add_element(&screen, ElementTag::Image).expect("added");
        assert!(store.remove_element(&screen, id));
        assert!(!store.remove_element(&screen, id));
        assert!(ids(&store, &screen).is_empty());
    }

    #[test]
    fn test_duplicate_and_update_screen() {
        let mut store = CanvasStore::new();
        let screen = active(&store);
        store.add_element(&screen, ElementTag::TextBody);
        let copy = store.duplicate_screen(&screen).expect("duplicated");
        let snapshot = store.snapshot();
        assert_eq!(snapshot.screens[1].id, copy);
        assert_ne!(ids(&store, &screen), ids(&store, &copy));

        assert!(store.update_screen(&copy, "Done", true));
        assert!(!store.update_screen(&copy, "Done", true));
        let snapshot = store.snapshot();
        let updated = snapshot.screen(&copy).expect("screen");
        assert_eq!(updated.title, "Done");
        assert!(updated.terminal);
    }

    #[test]
    fn test_replace_screens() {
        let mut store = CanvasStore::new();
        assert!(!store.replace_screens(Vec::new()));
        let screen = Screen::new(ScreenId::from("IMPORTED"), "Imported");
        assert!(store.replace_screens(vec![screen]));
        assert_eq!(active(&store).as_str(), "IMPORTED");
    }

    #[test]
    fn test_sync_screen() {
        let mut store = CanvasStore::new();
        let screen = active(&store);
        store.add_element(&screen, ElementTag::TextBody);
        store.add_element(&screen, ElementTag::Footer);
        assert!(!store.sync_screen(&screen));
        assert!(store.move_element(&screen, 1, 0));
        assert!(store.sync_screen(&screen));
        let snapshot = store.snapshot();
        let last = snapshot.screen(&screen).and_then(|s| s.elements.last()).map(Element::tag);
        assert_eq!(last, Some(ElementTag::Footer));
    }

    #[test]
    fn test_old_snapshots_are_frozen() {
        let mut store = CanvasStore::new();
        let screen = active(&store);
        let before = store.snapshot();
        store.add_element(&screen, ElementTag::TextHeading);
        assert!(before.screen(&screen).expect("screen").is_empty());
        assert_eq!(before.revision, 0);
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_observers_see_each_effective_mutation() {
        let mut store = CanvasStore::new();
        let screen = active(&store);
        let calls = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(AtomicU64::new(0));
        let (c, l) = (Arc::clone(&calls), Arc::clone(&last));
        let sub = store.subscribe(move |snapshot| {
            c.fetch_add(1, Ordering::SeqCst);
            l.store(snapshot.revision, Ordering::SeqCst);
        });

        store.add_element(&screen, ElementTag::TextBody);
        store.add_element(&ScreenId::from("NOPE"), ElementTag::TextBody);
        store.add_screen();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(last.load(Ordering::SeqCst), store.revision());

        assert!(store.unsubscribe(sub));
        assert!(!store.unsubscribe(sub));
        store.add_screen();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
