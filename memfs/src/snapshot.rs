// ---------------------------------------------------------------------------
// Snapshot encode / decode + JSON file persistence
// ---------------------------------------------------------------------------
//
// Wire format, one record per node:
//
//   {"type": "directory", "name": "docs", "content": {"readme": { ... }}}
//   {"type": "file",      "name": "readme", "content": "hello"}
//
// `content` is a child map for directories and the body for files. Parent
// links are not stored; they are rebuilt while the tree is restored.
// ---------------------------------------------------------------------------

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::FsError;
use crate::fs::FileSystem;
use crate::path::is_valid_name;
use crate::tree::{NodeId, NodeKind, Tree};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SnapshotNode {
	Directory {
		#[serde(default)]
		name: String,
		#[serde(rename = "content", default)]
		children: BTreeMap<String, SnapshotNode>,
	},
	File {
		#[serde(default)]
		name: String,
		#[serde(default)]
		content: String,
	},
}

impl SnapshotNode {
	pub fn name(&self) -> &str {
		match self {
			Self::Directory { name, .. } | Self::File { name, .. } => name,
		}
	}
}

// ---------------------------------------------------------------------------
// FileSystem <-> SnapshotNode
// ---------------------------------------------------------------------------

impl FileSystem {
	/// Capture the whole tree as a plain value.
	pub fn snapshot(&self) -> SnapshotNode {
		snapshot_tree(&self.tree)
	}

	/// Build a fresh file system from a snapshot. The current directory is the
	/// restored root.
	pub fn restore(snapshot: &SnapshotNode) -> Result<Self, FsError> {
		let SnapshotNode::Directory { children, .. } = snapshot else {
			return Err(FsError::CorruptSnapshot(
				"root must be a directory".to_string(),
			));
		};
		let mut tree = Tree::new();
		restore_tree(&mut tree, children)?;
		info!(nodes = tree.node_count(), "snapshot restored");
		Ok(Self::from_tree(tree))
	}
}

/// Nodes are visited parents-first, then encoded in reverse so every child is
/// finished before the directory that holds it. No step recurses.
fn snapshot_tree(tree: &Tree) -> SnapshotNode {
	let order: Vec<NodeId> = tree.descendants(tree.root()).collect();
	let mut done: HashMap<NodeId, SnapshotNode> = HashMap::with_capacity(order.len());

	for id in order.into_iter().rev() {
		let Some(node) = tree.get(id) else {
			continue;
		};
		let encoded = match node.kind() {
			NodeKind::File { content } => SnapshotNode::File {
				name: node.name().to_string(),
				content: content.clone(),
			},
			NodeKind::Directory { children } => SnapshotNode::Directory {
				name: node.name().to_string(),
				children: children
					.iter()
					.filter_map(|(name, child)| Some((name.clone(), done.remove(child)?)))
					.collect(),
			},
		};
		done.insert(id, encoded);
	}

	done.remove(&tree.root()).unwrap_or_else(|| SnapshotNode::Directory {
		name: String::new(),
		children: BTreeMap::new(),
	})
}

fn restore_tree(tree: &mut Tree, children: &BTreeMap<String, SnapshotNode>) -> Result<(), FsError> {
	let mut pending = vec![(tree.root(), String::new(), children)];

	while let Some((parent, parent_path, children)) = pending.pop() {
		for (key, child) in children {
			let path = format!("{}/{}", parent_path, key);
			if !is_valid_name(key) {
				return Err(FsError::CorruptSnapshot(format!(
					"invalid entry name: {:?}",
					path
				)));
			}
			if child.name() != key {
				warn!(path = %path, recorded = child.name(), "entry name differs from its key, using key");
			}
			match child {
				SnapshotNode::File { content, .. } => {
					tree.create_file(parent, key, content.clone())
						.ok_or_else(|| FsError::CorruptSnapshot(path.clone()))?;
				}
				SnapshotNode::Directory { children, .. } => {
					let dir = tree
						.create_dir(parent, key)
						.ok_or_else(|| FsError::CorruptSnapshot(path.clone()))?;
					pending.push((dir, path, children));
				}
			}
		}
	}
	Ok(())
}

// ---------------------------------------------------------------------------
// File persistence
// ---------------------------------------------------------------------------

/// Write the file system's snapshot to `path` as JSON.
pub fn save_state(fs: &FileSystem, path: impl AsRef<Path>) -> Result<(), FsError> {
	let path = path.as_ref();
	let json = serde_json::to_string_pretty(&fs.snapshot())?;
	std::fs::write(path, json)?;
	info!(path = %path.display(), nodes = fs.tree().node_count(), "state saved");
	Ok(())
}

/// Parse snapshot JSON of any nesting depth.
///
/// serde_json stops at 128 levels by default, which a directory chain of about
/// 64 entries already reaches. The limit is lifted and the stack is grown on
/// demand instead.
fn decode(json: &str) -> Result<SnapshotNode, FsError> {
	let mut de = serde_json::Deserializer::from_str(json);
	de.disable_recursion_limit();
	let snapshot = SnapshotNode::deserialize(serde_stacker::Deserializer::new(&mut de))?;
	de.end()?;
	Ok(snapshot)
}

/// Read a JSON snapshot from `path` and rebuild a file system from it.
pub fn load_state(path: impl AsRef<Path>) -> Result<FileSystem, FsError> {
	let path = path.as_ref();
	let json = std::fs::read_to_string(path)?;
	let snapshot = decode(&json)?;
	let fs = FileSystem::restore(&snapshot)?;
	info!(path = %path.display(), "state loaded");
	Ok(fs)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> FileSystem {
		let mut fs = FileSystem::new();
		fs.mkdir("/docs").unwrap();
		fs.mkdir("/docs/old").unwrap();
		fs.touch("/docs/readme").unwrap();
		fs.echo("hello", "/docs/readme").unwrap();
		fs.touch("/docs/old/notes").unwrap();
		fs.echo("line one\nline two", "/docs/old/notes").unwrap();
		fs.touch("/empty").unwrap();
		fs
	}

	fn assert_parent_links(fs: &FileSystem, dir: NodeId) {
		let tree = fs.tree();
		for (name, child) in tree.get(dir).unwrap().children().unwrap() {
			let node = tree.get(*child).unwrap();
			assert_eq!(tree.parent(*child), Some(dir));
			assert_eq!(tree.child(dir, node.name()), Some(*child));
			assert_eq!(node.name(), name);
			if node.is_dir() {
				assert_parent_links(fs, *child);
			}
		}
	}

	#[test]
	fn snapshot_and_restore() {
		let fs = sample();
		let snap = fs.snapshot();
		let restored = FileSystem::restore(&snap).unwrap();
		assert_eq!(restored.snapshot(), snap);
		assert_eq!(restored.tree().node_count(), fs.tree().node_count());
		assert_eq!(restored.cat("/docs/old/notes").unwrap(), "line one\nline two");
		assert_parent_links(&restored, restored.tree().root());
	}

	#[test]
	fn restore_resets_cwd_to_root() {
		let mut fs = sample();
		fs.cd("/docs/old").unwrap();
		let restored = FileSystem::restore(&fs.snapshot()).unwrap();
		assert_eq!(restored.pwd(), "/");
	}

	#[test]
	fn wire_format_reuses_content_field() {
		let mut fs = FileSystem::new();
		fs.mkdir("/d").unwrap();
		fs.touch("/d/f").unwrap();
		fs.echo("x", "/d/f").unwrap();
		let value = serde_json::to_value(fs.snapshot()).unwrap();
		assert_eq!(
			value,
			serde_json::json!({
				"type": "directory",
				"name": "",
				"content": {
					"d": {
						"type": "directory",
						"name": "d",
						"content": {
							"f": {"type": "file", "name": "f", "content": "x"}
						}
					}
				}
			})
		);
	}

	#[test]
	fn decodes_existing_snapshot() {
		let json = r#"{
			"type": "directory", "name": "", "content": {
				"docs": {"type": "directory", "name": "docs", "content": {
					"readme": {"type": "file", "name": "readme", "content": "hello"}
				}}
			}
		}"#;
		let snap: SnapshotNode = serde_json::from_str(json).unwrap();
		let fs = FileSystem::restore(&snap).unwrap();
		assert_eq!(fs.cat("/docs/readme").unwrap(), "hello");
	}

	#[test]
	fn restore_rejects_file_root() {
		let snap = SnapshotNode::File {
			name: String::new(),
			content: "x".into(),
		};
		let err = FileSystem::restore(&snap).unwrap_err();
		assert!(matches!(err, FsError::CorruptSnapshot(_)));
	}

	#[test]
	fn restore_rejects_bad_keys() {
		for key in ["", ".", "..", "a/b"] {
			let mut children = BTreeMap::new();
			children.insert(
				key.to_string(),
				SnapshotNode::File {
					name: key.to_string(),
					content: String::new(),
				},
			);
			let snap = SnapshotNode::Directory {
				name: String::new(),
				children,
			};
			assert!(matches!(
				FileSystem::restore(&snap).unwrap_err(),
				FsError::CorruptSnapshot(_)
			));
		}
	}

	#[test]
	fn restore_prefers_key_over_recorded_name() {
		let mut children = BTreeMap::new();
		children.insert(
			"real".to_string(),
			SnapshotNode::File {
				name: "stale".to_string(),
				content: "body".into(),
			},
		);
		let snap = SnapshotNode::Directory {
			name: String::new(),
			children,
		};
		let fs = FileSystem::restore(&snap).unwrap();
		assert_eq!(fs.cat("/real").unwrap(), "body");
		assert!(fs.resolve("/stale").is_none());
	}

	#[test]
	fn save_and_load_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("state.json");
		let fs = sample();
		save_state(&fs, &path).unwrap();
		let loaded = load_state(&path).unwrap();
		assert_eq!(loaded.snapshot(), fs.snapshot());
	}

	#[test]
	fn deep_tree_survives_save_and_load() {
		let mut fs = FileSystem::new();
		for _ in 0..200 {
			fs.mkdir("d").unwrap();
			fs.cd("d").unwrap();
		}
		fs.touch("leaf").unwrap();
		fs.echo("bottom", "leaf").unwrap();
		let depth = fs.pwd();

		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("deep.json");
		save_state(&fs, &path).unwrap();
		let loaded = load_state(&path).unwrap();

		assert_eq!(loaded.tree().node_count(), 202);
		assert_eq!(loaded.cat(&format!("{}/leaf", depth)).unwrap(), "bottom");
		assert_eq!(loaded.snapshot(), fs.snapshot());
	}

	#[test]
	fn load_rejects_trailing_data() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("trailing.json");
		std::fs::write(&path, r#"{"type": "directory", "content": {}} extra"#).unwrap();
		assert!(matches!(load_state(&path).unwrap_err(), FsError::Json(_)));
	}

	#[test]
	fn load_missing_file_is_io_error() {
		let dir = tempfile::tempdir().unwrap();
		let err = load_state(dir.path().join("missing.json")).unwrap_err();
		assert!(matches!(err, FsError::Io(_)));
	}

	#[test]
	fn load_garbage_is_json_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("bad.json");
		std::fs::write(&path, "not json").unwrap();
		assert!(matches!(load_state(&path).unwrap_err(), FsError::Json(_)));
	}
}
