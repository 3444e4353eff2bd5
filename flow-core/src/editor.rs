//! Editing session tying the store, validation and export together.

use std::collections::{BTreeSet, HashMap};

use crate::document::compile;
use crate::order::sync_visual_order_with_json;
use crate::validation::{validate_flow, validate_screen_with, FlowReport, ScreenReport};
use crate::{CanvasStore, CompileConfig, FlowDocument, Screen, ScreenId, ValidationConfig};

/// Result of [`Editor::export`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutcome {
    /// The compiled document, produced even when validation fails.
    pub document: FlowDocument,
    /// Diagnostics for the synchronized screens.
    pub report: FlowReport,
    /// Whether the document is ready to publish.
    pub is_valid: bool,
}

/// An editing session.
///
/// Reorders from drag and drop schedule a recheck that runs on the next
/// [`tick`](Self::tick). Diagnostics are cached per screen and revision, so
/// running checks eagerly or deferred gives the same results.
#[derive(Debug, Default)]
pub struct Editor {
    store: CanvasStore,
    validation: ValidationConfig,
    compile: CompileConfig,
    cache: HashMap<ScreenId, (u64, ScreenReport)>,
    pending: BTreeSet<ScreenId>,
}

impl Editor {
    /// Create a session over a fresh store.
    #[must_use]
    pub fn new(validation: ValidationConfig, compile: CompileConfig) -> Self {
        Self::with_store(CanvasStore::new(), validation, compile)
    }

    /// Create a session over an existing store.
    #[must_use]
    pub fn with_store(store: CanvasStore, validation: ValidationConfig, compile: CompileConfig) -> Self {
        Self {
            store,
            validation,
            compile,
            cache: HashMap::new(),
            pending: BTreeSet::new(),
        }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &CanvasStore {
        &self.store
    }

    /// Mutable access to the underlying store.
    pub fn store_mut(&mut self) -> &mut CanvasStore {
        &mut self.store
    }

    /// Complete a drag: move the element and schedule a recheck.
    pub fn after_drop(&mut self, screen: &ScreenId, from: usize, to: usize) -> bool {
        let moved = self.store.move_element(screen, from, to);
        if moved {
            self.pending.insert(screen.clone());
        }
        moved
    }

    /// Whether a recheck is scheduled.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Run scheduled rechecks. Returns how many screens were checked.
    pub fn tick(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending);
        let mut checked = 0;
        for id in pending {
            if self.refresh(&id).is_some() {
                checked += 1;
            }
        }
        checked
    }

    /// Diagnostics for a screen, recomputed if stale.
    pub fn diagnostics(&mut self, screen: &ScreenId) -> Option<ScreenReport> {
        let revision = self.store.revision();
        match self.cache.get(screen) {
            Some((at, report)) if *at == revision => Some(report.clone()),
            _ => self.refresh(screen),
        }
    }

    fn refresh(&mut self, id: &ScreenId) -> Option<ScreenReport> {
        let snapshot = self.store.snapshot();
        let Some(screen) = snapshot.screen(id) else {
            self.cache.remove(id);
            return None;
        };
        let report = validate_screen_with(screen, &self.validation);
        self.cache
            .insert(id.clone(), (snapshot.revision, report.clone()));
        Some(report)
    }

    /// Synchronize every screen, compile and validate.
    ///
    /// The store is left untouched.
    #[must_use]
    pub fn export(&self) -> ExportOutcome {
        let snapshot = self.store.snapshot();
        let screens: Vec<Screen> = snapshot
            .screens
            .iter()
            .map(|s| sync_visual_order_with_json(s).screen)
            .collect();

        let document = compile(&screens, &self.compile);
        let report = validate_flow(&screens, &self.validation);
        tracing::info!(
            screens = screens.len(),
            errors = report.error_count(),
            warnings = report.warning_count(),
            revision = snapshot.revision,
            "Exported flow"
        );

        ExportOutcome {
            document,
            is_valid: report.is_valid,
            report,
        }
    }
}
