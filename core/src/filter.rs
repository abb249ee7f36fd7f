//! Client-side filters over the loaded records.
//!
//! Each filter is a substring predicate on one field. The engine keeps the
//! set of enabled filters and answers which records belong in the view; the
//! view itself is always recomputed from the full record list.
//!
//! Two composition modes are supported. `Exclusive` shows only the subset of
//! the filter enabled most recently, and turning any filter off shows every
//! record even if the other filter is still flagged on. `Conjunctive` shows
//! the records that pass every enabled filter.

use std::collections::BTreeSet;

use crate::types::{Persona, PersonaField};

/// Substring that marks a record as lacking a RUC or a verification.
pub const NEGATIVE_MARKER: &str = "NO";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterKind {
    Ruc,
    Verified,
}

impl FilterKind {
    pub fn field(self) -> PersonaField {
        match self {
            FilterKind::Ruc => PersonaField::Ruc,
            FilterKind::Verified => PersonaField::Verified,
        }
    }

    /// Case-sensitive substring match against `NEGATIVE_MARKER`.
    pub fn matches(self, persona: &Persona) -> bool {
        persona.field(self.field()).contains(NEGATIVE_MARKER)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    Exclusive,
    Conjunctive,
}

#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    mode: FilterMode,
    enabled: BTreeSet<FilterKind>,
    // Exclusive mode: the filter whose subset is on screen, cleared whenever
    // any filter is turned off.
    shown: Option<FilterKind>,
}

impl FilterEngine {
    pub fn new(mode: FilterMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn is_enabled(&self, kind: FilterKind) -> bool {
        self.enabled.contains(&kind)
    }

    /// Flip `kind` and return its new state.
    pub fn toggle(&mut self, kind: FilterKind) -> bool {
        if self.enabled.remove(&kind) {
            self.shown = None;
            false
        } else {
            self.enabled.insert(kind);
            self.shown = Some(kind);
            true
        }
    }

    pub fn admits(&self, persona: &Persona) -> bool {
        match self.mode {
            FilterMode::Exclusive => self.shown.is_none_or(|kind| kind.matches(persona)),
            FilterMode::Conjunctive => self.enabled.iter().all(|kind| kind.matches(persona)),
        }
    }

    /// Indices into `records` of the rows to display, in list order.
    pub fn view(&self, records: &[Persona]) -> Vec<usize> {
        records
            .iter()
            .enumerate()
            .filter(|(_, persona)| self.admits(persona))
            .map(|(index, _)| index)
            .collect()
    }
}
