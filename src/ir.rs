use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeStats {
    pub insertions: usize,
    pub deletions: usize,
}

/// A single commit as handed over by a history reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub id: String,
    /// Commit time in seconds since the Unix epoch.
    pub timestamp: i64,
    /// Offset of the committer's timezone from UTC, in minutes.
    #[serde(default)]
    pub offset_minutes: i32,
    #[serde(default)]
    pub parents: Vec<String>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub stats: ChangeStats,
    #[serde(default)]
    pub branch: Option<String>,
}

impl Commit {
    pub fn new(id: &str, timestamp: i64, parents: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            timestamp,
            offset_minutes: 0,
            parents: parents.iter().map(|p| p.to_string()).collect(),
            author: String::new(),
            message: String::new(),
            stats: ChangeStats::default(),
            branch: None,
        }
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

/// Parent and child lists per commit id, derived once from the commit list.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    parents: HashMap<String, Vec<String>>,
    children: HashMap<String, Vec<String>>,
}

impl Adjacency {
    pub fn from_commits(commits: &[Commit]) -> Self {
        let mut parents: HashMap<String, Vec<String>> = HashMap::new();
        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        for commit in commits {
            for parent in &commit.parents {
                children
                    .entry(parent.clone())
                    .or_default()
                    .push(commit.id.clone());
                parents
                    .entry(commit.id.clone())
                    .or_default()
                    .push(parent.clone());
            }
        }
        Self { parents, children }
    }

    pub fn parents(&self, id: &str) -> &[String] {
        self.parents.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn children(&self, id: &str) -> &[String] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of parents (merge degree).
    pub fn fan_in(&self, id: &str) -> usize {
        self.parents(id).len()
    }

    /// Number of children (branch-point degree).
    pub fn fan_out(&self, id: &str) -> usize {
        self.children(id).len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct History {
    pub commits: Vec<Commit>,
    pub branches: Vec<String>,
    pub default_branch: Option<String>,
    pub adjacency: Adjacency,
}

impl History {
    /// Sorts commits by timestamp (ties keep reader order), drops duplicate
    /// ids and derives the adjacency maps.
    pub fn new(commits: Vec<Commit>, branches: Vec<String>, default_branch: Option<String>) -> Self {
        let mut seen = HashSet::new();
        let mut commits: Vec<Commit> = commits
            .into_iter()
            .filter(|commit| seen.insert(commit.id.clone()))
            .collect();
        commits.sort_by_key(|commit| commit.timestamp);
        let adjacency = Adjacency::from_commits(&commits);
        Self {
            commits,
            branches,
            default_branch,
            adjacency,
        }
    }

    pub fn from_commits(commits: Vec<Commit>) -> Self {
        Self::new(commits, Vec::new(), None)
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn on_default_branch(&self, commit: &Commit) -> bool {
        match (&commit.branch, &self.default_branch) {
            (Some(branch), Some(default)) => branch == default,
            (None, None) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_sorts_by_timestamp_and_keeps_ties_stable() {
        let history = History::from_commits(vec![
            Commit::new("c", 30, &["b"]),
            Commit::new("a", 10, &[]),
            Commit::new("b2", 20, &["a"]),
            Commit::new("b", 20, &["a"]),
        ]);
        let ids: Vec<&str> = history.commits.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b2", "b", "c"]);
    }

    #[test]
    fn adjacency_tracks_fan_in_and_fan_out() {
        let history = History::from_commits(vec![
            Commit::new("a", 1, &[]),
            Commit::new("b", 2, &["a"]),
            Commit::new("c", 3, &["a"]),
            Commit::new("m", 4, &["b", "c"]),
        ]);
        let adj = &history.adjacency;
        assert_eq!(adj.fan_out("a"), 2);
        assert_eq!(adj.fan_in("m"), 2);
        assert_eq!(adj.parents("m"), ["b".to_string(), "c".to_string()]);
        assert_eq!(adj.children("b"), ["m".to_string()]);
        assert_eq!(adj.fan_out("m"), 0);
        assert_eq!(adj.fan_in("unknown"), 0);
    }

    #[test]
    fn duplicate_ids_are_loaded_once() {
        let history = History::from_commits(vec![
            Commit::new("a", 1, &[]),
            Commit::new("a", 1, &[]),
        ]);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn default_branch_membership() {
        let mut commit = Commit::new("a", 1, &[]);
        commit.branch = Some("main".to_string());
        let history = History::new(vec![], vec!["main".to_string()], Some("main".to_string()));
        assert!(history.on_default_branch(&commit));
        commit.branch = Some("topic".to_string());
        assert!(!history.on_default_branch(&commit));
    }
}
