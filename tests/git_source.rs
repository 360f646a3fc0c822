use std::fs;
use std::path::Path;

use git2::{ObjectType, Oid, Repository, Signature, Time};
use git_history_svg::{
    GitSource, HistorySource, LayoutConfig, RenderConfig, RepoError, RouteKind, Theme,
    compute_layout, render_svg,
};
use tempfile::tempdir;

fn commit_file(
    repo: &Repository,
    update_ref: &str,
    file: &str,
    content: &str,
    message: &str,
    seconds: i64,
    parents: &[Oid],
) -> Oid {
    let workdir = repo.workdir().expect("work tree");
    fs::write(workdir.join(file), content).expect("write file");
    let mut index = repo.index().expect("index");
    index.add_path(Path::new(file)).expect("stage file");
    index.write().expect("write index");
    let tree_id = index.write_tree().expect("write tree");
    let tree = repo.find_tree(tree_id).expect("find tree");
    let signature =
        Signature::new("Test User", "test@example.com", &Time::new(seconds, 60)).expect("signature");
    let parents: Vec<git2::Commit> = parents
        .iter()
        .map(|oid| repo.find_commit(*oid).expect("parent"))
        .collect();
    let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
    repo.commit(
        Some(update_ref),
        &signature,
        &signature,
        message,
        &tree,
        &parent_refs,
    )
    .expect("commit")
}

/// main: c1 - c2 - m, topic: c1 - t1, m merges t1.
fn init_branchy_repo(path: &Path) -> (Repository, [Oid; 4]) {
    let repo = Repository::init(path).expect("init repo");
    let c1 = commit_file(&repo, "refs/heads/main", "README.md", "one\n", "Initial commit", 1_000, &[]);
    repo.set_head("refs/heads/main").expect("set HEAD");
    let c2 = commit_file(&repo, "refs/heads/main", "README.md", "one\ntwo\n", "Second line", 2_000, &[c1]);
    {
        let base = repo.find_commit(c1).expect("c1");
        repo.branch("topic", &base, false).expect("create topic");
    }
    let t1 = commit_file(&repo, "refs/heads/topic", "topic.txt", "t\n", "Topic work", 3_000, &[c1]);
    let m = commit_file(&repo, "refs/heads/main", "merged.txt", "m\n", "Merge topic", 4_000, &[c2, t1]);
    (repo, [c1, c2, t1, m])
}

#[test]
fn reads_all_branches_in_timestamp_order() {
    let dir = tempdir().expect("temp dir");
    let (_repo, [c1, c2, t1, m]) = init_branchy_repo(dir.path());

    let history = GitSource::new(dir.path()).load_history().expect("history");
    let ids: Vec<String> = history.commits.iter().map(|c| c.id.clone()).collect();
    assert_eq!(
        ids,
        vec![c1.to_string(), c2.to_string(), t1.to_string(), m.to_string()]
    );
    assert_eq!(history.branches, vec!["main".to_string(), "topic".to_string()]);
    assert_eq!(history.default_branch.as_deref(), Some("main"));

    let first = &history.commits[0];
    assert_eq!(first.author, "Test User");
    assert_eq!(first.offset_minutes, 60);
    assert_eq!(first.stats.insertions, 1);
    assert_eq!(first.stats.deletions, 0);
    // Branches are visited by name, so "topic" overrides "main" on shared history.
    assert_eq!(first.branch.as_deref(), Some("topic"));
    assert_eq!(history.commits[1].branch.as_deref(), Some("main"));

    let merge = &history.commits[3];
    assert_eq!(merge.parents, vec![c2.to_string(), t1.to_string()]);
    assert_eq!(history.adjacency.fan_in(&merge.id), 2);
    assert_eq!(history.adjacency.fan_out(&c1.to_string()), 2);
}

#[test]
fn stats_can_be_skipped() {
    let dir = tempdir().expect("temp dir");
    init_branchy_repo(dir.path());
    let history = GitSource::new(dir.path())
        .with_stats(false)
        .load_history()
        .expect("history");
    assert!(history.commits.iter().all(|c| c.stats.insertions == 0));
}

#[test]
fn repository_renders_end_to_end() {
    let dir = tempdir().expect("temp dir");
    init_branchy_repo(dir.path());
    let history = GitSource::new(dir.path()).load_history().expect("history");
    let layout = compute_layout(&history, &LayoutConfig::default());
    assert_eq!(layout.nodes.len(), 4);
    assert_eq!(layout.connectors.len(), 4);
    assert!(layout.connectors.iter().all(|c| c.kind == RouteKind::SameRow));

    let render = RenderConfig {
        seed: Some(5),
        ..RenderConfig::default()
    };
    let svg = render_svg(&history, &layout, &Theme::galaxy(), &render);
    assert!(svg.contains("Merge topic"));
    assert!(svg.contains("Author: Test User | Date: 1970-01-01 01:16"));
}

#[test]
fn latin1_messages_keep_their_text() {
    let dir = tempdir().expect("temp dir");
    let repo = Repository::init(dir.path()).expect("init repo");
    let tree = repo
        .treebuilder(None)
        .expect("tree builder")
        .write()
        .expect("write tree");
    let mut raw = format!("tree {tree}\n").into_bytes();
    raw.extend_from_slice(b"author Ren\xe9 <rene@example.com> 1000 +0100\n");
    raw.extend_from_slice(b"committer Ren\xe9 <rene@example.com> 1000 +0100\n");
    raw.extend_from_slice(b"encoding ISO-8859-1\n\nFix caf\xe9 parser\n");
    let oid = repo
        .odb()
        .expect("odb")
        .write(ObjectType::Commit, &raw)
        .expect("write commit");
    repo.reference("refs/heads/main", oid, true, "latin-1 commit")
        .expect("create main");
    repo.set_head("refs/heads/main").expect("set HEAD");

    let history = GitSource::new(dir.path()).load_history().expect("history");
    assert_eq!(history.len(), 1);
    let commit = &history.commits[0];
    assert_eq!(commit.id, oid.to_string());
    assert_eq!(commit.message.trim_end(), "Fix caf\u{FFFD} parser");
    assert_eq!(commit.author, "Ren\u{FFFD}");
    assert_eq!(commit.offset_minutes, 60);
}

#[test]
fn empty_repository_loads_no_commits() {
    let dir = tempdir().expect("temp dir");
    Repository::init(dir.path()).expect("init repo");
    let history = GitSource::new(dir.path()).load_history().expect("history");
    assert!(history.is_empty());
    assert!(history.branches.is_empty());
}

#[test]
fn bare_repository_is_rejected() {
    let dir = tempdir().expect("temp dir");
    Repository::init_bare(dir.path()).expect("init bare repo");
    let err = GitSource::new(dir.path()).load_history().unwrap_err();
    assert!(matches!(err, RepoError::Bare(_)));
}
