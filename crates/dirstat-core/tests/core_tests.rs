use dirstat_core::{Node, NodeKind, ScanWarning, SkipMarker, WalkOptions, WarningKind};

/// Brute-force recomputation of the subtree sum, independent of the
/// aggregates stored on the nodes.
fn recompute_size(node: &Node) -> u64 {
    match &node.kind {
        NodeKind::Directory { .. } => node.children.iter().map(recompute_size).sum(),
        _ => node.size,
    }
}

fn build_nested() -> Node {
    let mut deep = Node::directory("deep", None);
    deep.children.push(Node::file("blob", 4096, None));
    deep.aggregate_children();

    let mut mid = Node::directory("mid", None);
    mid.children.push(deep);
    mid.children.push(Node::file("notes.txt", 123, None));
    mid.children.push(Node::symlink("link", "/etc", 8, None));
    mid.aggregate_children();

    let mut root = Node::directory("root", None);
    root.children.push(mid);
    root.children.push(Node::file("top", 1, None));
    root.aggregate_children();
    root
}

#[test]
fn aggregates_match_brute_force_recomputation() {
    let root = build_nested();
    assert_eq!(root.size, recompute_size(&root));
    assert_eq!(root.size, 4096 + 123 + 8 + 1);

    for child in &root.children {
        assert_eq!(child.size, recompute_size(child));
    }
}

#[test]
fn counts_aggregate_over_whole_subtree() {
    let root = build_nested();
    assert_eq!(root.file_count(), 3);
    assert_eq!(root.dir_count(), 2);
    // Entry count includes the node itself plus symlinks are not counted
    // as files or dirs.
    assert_eq!(root.entry_count(), 3 + 2 + 1);
}

#[test]
fn partial_flag_reaches_every_ancestor() {
    let mut leaf = Node::directory("unreadable", None);
    leaf.mark_skip(SkipMarker::Io);

    let mut mid = Node::directory("mid", None);
    mid.children.push(leaf);
    mid.children.push(Node::file("ok", 10, None));
    mid.aggregate_children();

    let mut root = Node::directory("root", None);
    root.children.push(mid);
    root.aggregate_children();

    assert!(root.partial);
    assert_eq!(root.size, 10);
}

#[test]
fn depth_limited_marker_is_a_lower_bound() {
    let mut truncated = Node::directory("big", None);
    truncated.mark_skip(SkipMarker::DepthLimited);

    let mut root = Node::directory("root", None);
    root.children.push(truncated);
    root.children.push(Node::file("f", 5, None));
    root.aggregate_children();

    assert_eq!(root.size, 5);
    assert!(root.partial);
}

#[test]
fn walk_options_defaults() {
    let options = WalkOptions::new("/scan");
    assert!(!options.follow_symlinks);
    assert!(options.exclude.is_empty());
    assert_eq!(options.max_depth, None);
    assert_eq!(options.threads, 0);
}

#[test]
fn warning_kinds_are_distinguishable() {
    let denied = ScanWarning::permission_denied("/locked");
    let io = ScanWarning::io(
        "/flaky",
        &std::io::Error::new(std::io::ErrorKind::Other, "boom"),
    );
    assert_eq!(denied.kind, WarningKind::PermissionDenied);
    assert_eq!(io.kind, WarningKind::Io);
    assert_ne!(denied.kind, io.kind);
}
