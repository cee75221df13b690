use crate::tree::{NodeId, Tree};

// ── Constants ───────────────────────────────────────────────────────────────

pub const SEPARATOR: char = '/';
pub const CURRENT: &str = ".";
pub const PARENT: &str = "..";

// ── Path functions ──────────────────────────────────────────────────────────

/// Non-empty segments of a path, in order.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).filter(|s| !s.is_empty())
}

/// Resolve `path` against `tree`, starting at `cwd` unless the path is absolute.
///
/// `..` at the root stays at the root. Any lookup that misses, or any segment
/// following a file, makes the whole resolution fail.
pub fn resolve(tree: &Tree, cwd: NodeId, path: &str) -> Option<NodeId> {
    let (mut current, rest) = match path.strip_prefix(SEPARATOR) {
        Some(rest) => (tree.root(), rest),
        None => (cwd, path),
    };
    tree.get(current)?;

    for segment in segments(rest) {
        let node = tree.get(current)?;
        let children = node.children()?;
        current = match segment {
            CURRENT => current,
            PARENT => tree.parent(current).unwrap_or(current),
            name => *children.get(name)?,
        };
    }

    Some(current)
}

/// True for paths that name the root and nothing else (`/`, `//`, ...).
pub fn is_root_path(path: &str) -> bool {
    path.starts_with(SEPARATOR) && path.trim_end_matches(SEPARATOR).is_empty()
}

/// Split a path into its parent path and basename.
///
/// Trailing separators are ignored. Returns `None` for the empty path and for
/// the root, which have no basename.
pub fn split_parent(path: &str) -> Option<(&str, &str)> {
    let trimmed = path.trim_end_matches(SEPARATOR);
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.rfind(SEPARATOR) {
        Some(pos) => {
            let parent = &trimmed[..pos];
            let parent = if parent.is_empty() { "/" } else { parent };
            Some((parent, &trimmed[pos + 1..]))
        }
        None => Some((CURRENT, trimmed)),
    }
}

/// Whether `name` can be stored as a child key.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name != CURRENT && name != PARENT && !name.contains(SEPARATOR)
}

// ── Tests ───────────────────────────────────────────────────────────────────
