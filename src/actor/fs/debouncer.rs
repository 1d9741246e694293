use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

/// Last change seen for a path within one debounce window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ChangeKind {
    Changed,
    Removed,
}

impl ChangeKind {
    pub(super) fn label(self) -> &'static str {
        match self {
            Self::Changed => "changed",
            Self::Removed => "removed",
        }
    }
}

/// Pure debouncer: timing and event deduplication only.
pub(super) struct Debouncer {
    changes: FxHashMap<PathBuf, ChangeKind>,
    last_event: Option<Instant>,
    delay: Duration,
}

impl Debouncer {
    pub(super) fn new(delay: Duration) -> Self {
        Self {
            changes: FxHashMap::default(),
            last_event: None,
            delay,
        }
    }

    /// Add a notify event. The latest kind wins per path; metadata-only
    /// modifications and editor temp files are ignored.
    pub(super) fn add_event(&mut self, event: &notify::Event, now: Instant) {
        use notify::EventKind;
        use notify::event::ModifyKind;

        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Changed,
            EventKind::Modify(ModifyKind::Metadata(_)) => return,
            EventKind::Modify(_) => ChangeKind::Changed,
            EventKind::Remove(_) => ChangeKind::Removed,
            _ => return,
        };

        crate::debug!("watch"; "raw notify: {:?} {:?}", event.kind, event.paths);

        for path in &event.paths {
            if is_temp_file(path) {
                continue;
            }
            self.changes.insert(path.clone(), kind);
            self.last_event = Some(now);
        }
    }

    /// Take the collected changes once the quiet period has passed.
    pub(super) fn take_if_ready(&mut self, now: Instant) -> Option<FxHashMap<PathBuf, ChangeKind>> {
        let last_event = self.last_event?;
        if now.saturating_duration_since(last_event) < self.delay {
            return None;
        }
        self.last_event = None;
        let changes = std::mem::take(&mut self.changes);
        (!changes.is_empty()).then_some(changes)
    }

    /// Precise sleep duration until the next possible ready time.
    pub(super) fn sleep_duration(&self, now: Instant) -> Duration {
        let Some(last_event) = self.last_event else {
            return Duration::from_secs(86400);
        };
        self.delay
            .saturating_sub(now.saturating_duration_since(last_event))
            .max(Duration::from_millis(1))
    }
}

/// Check if path is a temp/backup file (editor artifacts).
pub(super) fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, EventKind, MetadataKind, ModifyKind, RemoveKind};

    fn event(kind: EventKind, path: &str) -> notify::Event {
        notify::Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn test_waits_for_quiet_period() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(300));
        d.add_event(
            &event(EventKind::Modify(ModifyKind::Data(DataChange::Content)), "/s/Hero.tsx"),
            start,
        );

        assert!(d.take_if_ready(start + Duration::from_millis(100)).is_none());
        assert_eq!(
            d.sleep_duration(start + Duration::from_millis(100)),
            Duration::from_millis(200)
        );

        let changes = d.take_if_ready(start + Duration::from_millis(300)).unwrap();
        assert_eq!(changes.get(Path::new("/s/Hero.tsx")), Some(&ChangeKind::Changed));
        assert!(d.take_if_ready(start + Duration::from_secs(1)).is_none());
    }

    #[test]
    fn test_latest_kind_wins() {
        let now = Instant::now();
        let mut d = Debouncer::new(Duration::ZERO);
        d.add_event(&event(EventKind::Create(CreateKind::File), "/s/A.tsx"), now);
        d.add_event(&event(EventKind::Remove(RemoveKind::File), "/s/A.tsx"), now);
        let changes = d.take_if_ready(now).unwrap();
        assert_eq!(changes.get(Path::new("/s/A.tsx")), Some(&ChangeKind::Removed));
    }

    #[test]
    fn test_ignores_noise() {
        let now = Instant::now();
        let mut d = Debouncer::new(Duration::ZERO);
        d.add_event(
            &event(EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any)), "/s/A.tsx"),
            now,
        );
        d.add_event(&event(EventKind::Create(CreateKind::File), "/s/.A.tsx.swp"), now);
        d.add_event(&event(EventKind::Create(CreateKind::File), "/s/A.tsx~"), now);
        assert!(d.take_if_ready(now).is_none());
        assert_eq!(d.sleep_duration(now), Duration::from_secs(86400));
    }

    #[test]
    fn test_temp_files() {
        assert!(is_temp_file(Path::new("Hero.tsx.bak")));
        assert!(is_temp_file(Path::new(".#Hero.tsx")));
        assert!(!is_temp_file(Path::new("Hero.tsx")));
    }
}
