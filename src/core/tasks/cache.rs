use std::collections::BTreeMap;

use crate::api::tasks::Task;

/// Last fetched task list and its 1-based index lookup.
#[derive(Debug, Clone, Default)]
pub struct TaskCache {
    tasks: Vec<Task>,
    index_map: BTreeMap<usize, String>,
}

impl TaskCache {
    pub fn replace(&mut self, tasks: Vec<Task>) {
        self.index_map = tasks
            .iter()
            .enumerate()
            .map(|(i, task)| (i + 1, task.id.clone()))
            .collect();
        self.tasks = tasks;
    }

    /// Drop everything; called after any successful mutation.
    pub fn invalidate(&mut self) {
        self.tasks.clear();
        self.index_map.clear();
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn index_map(&self) -> &BTreeMap<usize, String> {
        &self.index_map
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Case-insensitive substring match on title or description, keeping
    /// each hit's index in the full list.
    pub fn search(&self, term: &str) -> Vec<(usize, &Task)> {
        let needle = term.to_lowercase();
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| {
                task.title.to_lowercase().contains(&needle)
                    || task
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .map(|(i, task)| (i + 1, task))
            .collect()
    }

    pub fn numbered(&self) -> impl Iterator<Item = (usize, &Task)> {
        self.tasks.iter().enumerate().map(|(i, task)| (i + 1, task))
    }
}
