use std::path::PathBuf;

use rustc_hash::FxHashMap;

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    /// Past participle used in `File was <label> <path>`.
    pub(super) fn label(self) -> &'static str {
        match self {
            Self::Created => "added",
            Self::Modified => "changed",
            Self::Removed => "removed",
        }
    }
}

/// Debounced file events, removals first, then by path
pub(super) struct DebouncedEvents(pub(super) Vec<(PathBuf, ChangeKind)>);

impl DebouncedEvents {
    pub(super) fn from_changes(changes: FxHashMap<PathBuf, ChangeKind>) -> Self {
        let mut events: Vec<_> = changes.into_iter().collect();
        events.sort_by(|(a, ka), (b, kb)| {
            let removed = |k: &ChangeKind| *k != ChangeKind::Removed;
            removed(ka).cmp(&removed(kb)).then_with(|| a.cmp(b))
        });
        Self(events)
    }
}
