use crate::models::{Project, ProjectCategory};
use std::collections::HashMap;

/// Lists older than this are refetched.
pub(crate) const STALE_AFTER_MS: i64 = 5 * 60 * 1000;

#[derive(Clone, Debug)]
struct CachedList {
    projects: Vec<Project>,
    fetched_ms: i64,
}

/// Per-category project lists for the public pages, so switching tabs does
/// not flash an empty grid while refetching.
#[derive(Clone, Debug, Default)]
pub(crate) struct ProjectsCache {
    lists: HashMap<ProjectCategory, CachedList>,
}

impl ProjectsCache {
    /// Whatever is cached, fresh or not. Good enough to paint while refetching.
    pub fn get(&self, category: ProjectCategory) -> Option<&[Project]> {
        self.lists.get(&category).map(|c| c.projects.as_slice())
    }

    pub fn is_stale(&self, category: ProjectCategory, now_ms: i64) -> bool {
        match self.lists.get(&category) {
            Some(c) => now_ms - c.fetched_ms > STALE_AFTER_MS,
            None => true,
        }
    }

    pub fn put(&mut self, category: ProjectCategory, projects: Vec<Project>, now_ms: i64) {
        self.lists.insert(
            category,
            CachedList {
                projects,
                fetched_ms: now_ms,
            },
        );
    }

    /// Admin edits call this so the public pages pick up changes.
    pub fn clear(&mut self) {
        self.lists.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_project;

    #[test]
    fn test_missing_list_is_stale() {
        let cache = ProjectsCache::default();
        assert!(cache.is_stale(ProjectCategory::Vibe, 0));
        assert!(cache.get(ProjectCategory::Vibe).is_none());
    }

    #[test]
    fn test_staleness_window() {
        let mut cache = ProjectsCache::default();
        cache.put(
            ProjectCategory::Automation,
            vec![test_project("2", ProjectCategory::Automation, Some(0))],
            1_000,
        );

        assert!(!cache.is_stale(ProjectCategory::Automation, 1_000 + STALE_AFTER_MS));
        assert!(cache.is_stale(ProjectCategory::Automation, 1_001 + STALE_AFTER_MS));
        assert!(cache.is_stale(ProjectCategory::Vibe, 1_000));
        assert_eq!(cache.get(ProjectCategory::Automation).map(<[Project]>::len), Some(1));
    }

    #[test]
    fn test_clear() {
        let mut cache = ProjectsCache::default();
        cache.put(ProjectCategory::Vibe, vec![], 0);
        cache.clear();
        assert!(cache.get(ProjectCategory::Vibe).is_none());
    }
}
