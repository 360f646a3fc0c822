use crate::ir::{ChangeStats, Commit, History};
use git2::{BranchType, Oid, Repository, Sort};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{} is a bare repository", .0.display())]
    Bare(PathBuf),
    #[error(transparent)]
    Git(#[from] git2::Error),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid history file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Anything that can hand over a full commit history.
pub trait HistorySource {
    fn load_history(&self) -> Result<History, RepoError>;
}

/// Reads every commit reachable from any reference of a git repository.
#[derive(Debug, Clone)]
pub struct GitSource {
    path: PathBuf,
    with_stats: bool,
}

impl GitSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            with_stats: true,
        }
    }

    /// Skips the per-commit tree diff used for insertion/deletion counts.
    pub fn with_stats(mut self, with_stats: bool) -> Self {
        self.with_stats = with_stats;
        self
    }
}

impl HistorySource for GitSource {
    fn load_history(&self) -> Result<History, RepoError> {
        let repo = Repository::discover(&self.path)?;
        if repo.is_bare() {
            return Err(RepoError::Bare(self.path.clone()));
        }

        let branches = local_branches(&repo)?;
        let branch_names: Vec<String> = branches.keys().cloned().collect();
        let membership = branch_membership(&repo, &branches)?;
        let default_branch = resolve_default_branch(&repo, &branch_names);

        let mut walk = repo.revwalk()?;
        walk.set_sorting(Sort::TIME)?;
        walk.push_glob("*")?;
        if let Err(err) = walk.push_head() {
            log::debug!("HEAD not pushed: {}", err.message());
        }

        let mut commits = Vec::new();
        for oid in walk {
            let oid = oid?;
            let commit = repo.find_commit(oid)?;
            let stats = if self.with_stats {
                change_stats(&repo, &commit)?
            } else {
                ChangeStats::default()
            };
            let time = commit.time();
            commits.push(Commit {
                id: oid.to_string(),
                timestamp: time.seconds(),
                offset_minutes: time.offset_minutes(),
                parents: commit.parent_ids().map(|id| id.to_string()).collect(),
                author: String::from_utf8_lossy(commit.author().name_bytes()).into_owned(),
                message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
                stats,
                branch: membership.get(&oid).cloned(),
            });
            if commits.len() % 1000 == 0 {
                log::debug!("read {} commits", commits.len());
            }
        }
        log::info!(
            "loaded {} commits across {} branches from {}",
            commits.len(),
            branch_names.len(),
            self.path.display()
        );

        Ok(History::new(commits, branch_names, default_branch))
    }
}

/// Local branch tips keyed (and therefore ordered) by branch name.
fn local_branches(repo: &Repository) -> Result<BTreeMap<String, Oid>, RepoError> {
    let mut branches = BTreeMap::new();
    for entry in repo.branches(Some(BranchType::Local))? {
        let (branch, _) = entry?;
        let Some(name) = branch.name()? else {
            continue;
        };
        if let Some(target) = branch.get().target() {
            branches.insert(name.to_string(), target);
        }
    }
    Ok(branches)
}

/// Labels every commit with a branch that reaches it. Branches are visited
/// in name order and later ones overwrite earlier labels.
fn branch_membership(
    repo: &Repository,
    branches: &BTreeMap<String, Oid>,
) -> Result<HashMap<Oid, String>, RepoError> {
    let mut membership = HashMap::new();
    for (name, tip) in branches {
        let mut walk = repo.revwalk()?;
        walk.push(*tip)?;
        for oid in walk {
            membership.insert(oid?, name.clone());
        }
    }
    Ok(membership)
}

fn resolve_default_branch(repo: &Repository, branch_names: &[String]) -> Option<String> {
    if let Ok(head) = repo.head()
        && head.is_branch()
        && let Some(name) = head.shorthand()
    {
        return Some(name.to_string());
    }
    for candidate in ["main", "master"] {
        if branch_names.iter().any(|name| name == candidate) {
            return Some(candidate.to_string());
        }
    }
    // Unborn or detached HEAD: fall back to whatever HEAD points at.
    let head = repo.find_reference("HEAD").ok()?;
    let target = head.symbolic_target()?;
    Some(target.trim_start_matches("refs/heads/").to_string())
}

fn change_stats(repo: &Repository, commit: &git2::Commit) -> Result<ChangeStats, RepoError> {
    let tree = commit.tree()?;
    let parent_tree = if commit.parent_count() > 0 {
        Some(commit.parent(0)?.tree()?)
    } else {
        None
    };
    let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
    let stats = diff.stats()?;
    Ok(ChangeStats {
        insertions: stats.insertions(),
        deletions: stats.deletions(),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryFile {
    pub commits: Vec<Commit>,
    #[serde(default)]
    pub branches: Vec<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
}

impl From<HistoryFile> for History {
    fn from(file: HistoryFile) -> Self {
        History::new(file.commits, file.branches, file.default_branch)
    }
}

/// Reads a history previously exported as JSON.
#[derive(Debug, Clone)]
pub struct JsonSource {
    path: PathBuf,
}

impl JsonSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistorySource for JsonSource {
    fn load_history(&self) -> Result<History, RepoError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| RepoError::Io {
            path: self.path.clone(),
            source,
        })?;
        let history = parse_history(&contents)?;
        log::info!(
            "loaded {} commits from {}",
            history.len(),
            self.path.display()
        );
        Ok(history)
    }
}

pub fn parse_history(json: &str) -> Result<History, RepoError> {
    let file: HistoryFile = serde_json::from_str(json)?;
    Ok(file.into())
}
