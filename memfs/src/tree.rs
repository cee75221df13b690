// ---------------------------------------------------------------------------
// Arena-backed node tree
// ---------------------------------------------------------------------------
//
// Nodes live in an `indextree` arena and refer to each other by `NodeId`. The
// arena owns the parent/child links; each directory payload also keeps a
// basename -> id map so lookups by name are direct and listings are sorted.
// The two views are changed together by `attach` and `detach` only.
//
// Freed arena slots are recycled with a fresh stamp, so an id taken before a
// removal never resolves to the node that later reuses its slot.
// ---------------------------------------------------------------------------

use std::collections::BTreeMap;

use indextree::Arena;

pub use indextree::NodeId;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
	Directory { children: BTreeMap<String, NodeId> },
	File { content: String },
}

/// Payload stored in each arena slot.
#[derive(Debug, Clone)]
pub struct Node {
	name: String,
	kind: NodeKind,
}

impl Node {
	fn directory(name: &str) -> Self {
		Self {
			name: name.to_string(),
			kind: NodeKind::Directory {
				children: BTreeMap::new(),
			},
		}
	}

	fn file(name: &str, content: String) -> Self {
		Self {
			name: name.to_string(),
			kind: NodeKind::File { content },
		}
	}

	/// Same name and body, but a directory copy starts with no children.
	fn shallow_copy(&self) -> Self {
		match &self.kind {
			NodeKind::Directory { .. } => Self::directory(&self.name),
			NodeKind::File { content } => Self::file(&self.name, content.clone()),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn kind(&self) -> &NodeKind {
		&self.kind
	}

	pub fn is_dir(&self) -> bool {
		matches!(self.kind, NodeKind::Directory { .. })
	}

	pub fn is_file(&self) -> bool {
		matches!(self.kind, NodeKind::File { .. })
	}

	/// Child map of a directory, `None` for files.
	pub fn children(&self) -> Option<&BTreeMap<String, NodeId>> {
		match &self.kind {
			NodeKind::Directory { children } => Some(children),
			NodeKind::File { .. } => None,
		}
	}

	/// Body of a file, `None` for directories.
	pub fn content(&self) -> Option<&str> {
		match &self.kind {
			NodeKind::File { content } => Some(content),
			NodeKind::Directory { .. } => None,
		}
	}
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Tree {
	arena: Arena<Node>,
	root: NodeId,
}

impl Default for Tree {
	fn default() -> Self {
		Self::new()
	}
}

impl Tree {
	// -- Constructor ------------------------------------------------------

	/// A tree holding only the root directory.
	pub fn new() -> Self {
		let mut arena = Arena::new();
		let root = arena.new_node(Node::directory(""));
		Self { arena, root }
	}

	// -- Lookups ----------------------------------------------------------

	pub fn root(&self) -> NodeId {
		self.root
	}

	/// Number of nodes reachable from the root, the root itself included.
	/// A fresh tree therefore reports 1.
	pub fn node_count(&self) -> usize {
		self.root.descendants(&self.arena).count()
	}

	pub fn contains(&self, id: NodeId) -> bool {
		self.arena.get(id).is_some() && !id.is_removed(&self.arena)
	}

	pub fn get(&self, id: NodeId) -> Option<&Node> {
		if !self.contains(id) {
			return None;
		}
		self.arena.get(id).map(indextree::Node::get)
	}

	fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
		if !self.contains(id) {
			return None;
		}
		self.arena.get_mut(id).map(indextree::Node::get_mut)
	}

	/// Parent of a live node; `None` for the root and for detached nodes.
	pub fn parent(&self, id: NodeId) -> Option<NodeId> {
		if !self.contains(id) {
			return None;
		}
		self.arena[id].parent()
	}

	pub fn child(&self, dir: NodeId, name: &str) -> Option<NodeId> {
		self.get(dir)?.children()?.get(name).copied()
	}

	/// True when `node` is `ancestor` itself or lies somewhere beneath it.
	pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
		self.contains(node) && node.ancestors(&self.arena).any(|id| id == ancestor)
	}

	/// `id` followed by everything beneath it, parents before children.
	pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
		self.contains(id)
			.then(|| id.descendants(&self.arena))
			.into_iter()
			.flatten()
	}

	/// Absolute path of a node, built by walking parent links.
	pub fn path_of(&self, id: NodeId) -> Option<String> {
		if !self.contains(id) {
			return None;
		}
		let mut names: Vec<&str> = id
			.ancestors(&self.arena)
			.filter(|&ancestor| ancestor != self.root)
			.map(|ancestor| self.arena[ancestor].get().name.as_str())
			.collect();
		if names.is_empty() {
			return Some("/".to_string());
		}
		names.reverse();
		Some(format!("/{}", names.join("/")))
	}

	// -- Structural mutation ----------------------------------------------

	/// Create a directory named `name` under `parent`.
	///
	/// An existing entry with the same name is replaced and freed.
	pub fn create_dir(&mut self, parent: NodeId, name: &str) -> Option<NodeId> {
		self.create(parent, Node::directory(name))
	}

	/// Create a file named `name` under `parent`, replacing any existing entry.
	pub fn create_file(&mut self, parent: NodeId, name: &str, content: String) -> Option<NodeId> {
		self.create(parent, Node::file(name, content))
	}

	fn create(&mut self, parent: NodeId, node: Node) -> Option<NodeId> {
		if !self.get(parent)?.is_dir() {
			return None;
		}
		let id = self.arena.new_node(node);
		if !self.attach(parent, id) {
			id.remove_subtree(&mut self.arena);
			return None;
		}
		Some(id)
	}

	/// Link a detached node under `parent`, keyed by its own name.
	///
	/// Whatever was stored under that name before is freed along with its
	/// subtree. Returns false (and changes nothing) if `parent` is not a live
	/// directory, if `child` is the root, still attached, unknown, or would end
	/// up beneath itself.
	pub fn attach(&mut self, parent: NodeId, child: NodeId) -> bool {
		if child == self.root || self.parent(child).is_some() {
			return false;
		}
		let name = match (self.get(parent), self.get(child)) {
			(Some(dir), Some(node)) if dir.is_dir() => node.name.clone(),
			_ => return false,
		};
		if parent.checked_append(child, &mut self.arena).is_err() {
			return false;
		}
		let replaced = match self.get_mut(parent).map(|node| &mut node.kind) {
			Some(NodeKind::Directory { children }) => children.insert(name, child),
			_ => None,
		};
		if let Some(old) = replaced {
			if old != child {
				old.remove_subtree(&mut self.arena);
			}
		}
		true
	}

	/// Unlink a node from its parent. The node and its subtree stay alive.
	pub fn detach(&mut self, id: NodeId) -> bool {
		let Some(parent) = self.parent(id) else {
			return false;
		};
		let name = self.arena[id].get().name.clone();
		if let Some(NodeKind::Directory { children }) =
			self.get_mut(parent).map(|node| &mut node.kind)
		{
			children.remove(&name);
		}
		id.detach(&mut self.arena);
		true
	}

	/// Unlink a node (if attached) and free it together with every descendant.
	pub fn remove(&mut self, id: NodeId) -> bool {
		if id == self.root || !self.contains(id) {
			return false;
		}
		self.detach(id);
		id.remove_subtree(&mut self.arena);
		true
	}

	/// Build a detached, independent copy of `src` and everything beneath it.
	///
	/// Every copied node is freshly allocated and gets its own parent link;
	/// file bodies are cloned, never shared. The walk uses an explicit stack,
	/// so depth is bounded by memory rather than the call stack.
	pub fn deep_copy(&mut self, src: NodeId) -> Option<NodeId> {
		let top = self.arena.new_node(self.get(src)?.shallow_copy());
		let mut pending = vec![(src, top)];
		while let Some((from, into)) = pending.pop() {
			let children: Vec<NodeId> = match self.get(from).and_then(Node::children) {
				Some(children) => children.values().copied().collect(),
				None => continue,
			};
			for child in children {
				let Some(node) = self.get(child).map(Node::shallow_copy) else {
					continue;
				};
				let copy = self.arena.new_node(node);
				if !self.attach(into, copy) {
					copy.remove_subtree(&mut self.arena);
					top.remove_subtree(&mut self.arena);
					return None;
				}
				pending.push((child, copy));
			}
		}
		Some(top)
	}

	/// Replace the body of a file. Returns false if `id` is not a live file.
	pub fn set_content(&mut self, id: NodeId, body: String) -> bool {
		match self.get_mut(id).map(|node| &mut node.kind) {
			Some(NodeKind::File { content }) => {
				*content = body;
				true
			}
			_ => false,
		}
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
