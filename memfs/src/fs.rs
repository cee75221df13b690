// ---------------------------------------------------------------------------
// File system operations
// ---------------------------------------------------------------------------

use tracing::debug;

use crate::error::FsError;
use crate::path::{is_root_path, is_valid_name, resolve, split_parent};
use crate::tree::{Node, NodeId, Tree};

/// An in-memory file system: one tree plus the current directory.
#[derive(Debug, Clone)]
pub struct FileSystem {
	pub(crate) tree: Tree,
	pub(crate) cwd: NodeId,
}

impl Default for FileSystem {
	fn default() -> Self {
		Self::new()
	}
}

impl FileSystem {
	// -- Constructor ------------------------------------------------------

	pub fn new() -> Self {
		Self::from_tree(Tree::new())
	}

	pub(crate) fn from_tree(tree: Tree) -> Self {
		let cwd = tree.root();
		Self { tree, cwd }
	}

	// -- Accessors --------------------------------------------------------

	pub fn tree(&self) -> &Tree {
		&self.tree
	}

	pub fn current_dir(&self) -> NodeId {
		self.cwd
	}

	/// Resolve a path relative to the current directory.
	pub fn resolve(&self, path: &str) -> Option<NodeId> {
		resolve(&self.tree, self.cwd, path)
	}

	// -- Helpers (private) ------------------------------------------------

	fn resolve_dir(&self, path: &str) -> Result<NodeId, FsError> {
		self.resolve(path)
			.filter(|id| self.tree.get(*id).is_some_and(Node::is_dir))
			.ok_or_else(|| FsError::directory_not_found(path))
	}

	fn resolve_file(&self, path: &str) -> Result<NodeId, FsError> {
		self.resolve(path)
			.filter(|id| self.tree.get(*id).is_some_and(Node::is_file))
			.ok_or_else(|| FsError::file_not_found(path))
	}

	/// Parent directory and basename for a node about to be created at `path`.
	fn creation_target<'a>(&self, path: &'a str) -> Result<(NodeId, &'a str), FsError> {
		if path.is_empty() {
			return Err(FsError::InvalidArgument("empty path".to_string()));
		}
		let (parent_path, name) = split_parent(path)
			.ok_or_else(|| FsError::InvalidTarget("cannot create root directory".to_string()))?;
		if !is_valid_name(name) {
			return Err(FsError::InvalidTarget(format!("invalid name: {}", name)));
		}
		let parent = self.resolve_dir(parent_path)?;
		if self.tree.child(parent, name).is_some() {
			return Err(FsError::AlreadyExists(path.to_string()));
		}
		Ok((parent, name))
	}

	/// The current directory must always be live. A removal or overwrite that
	/// took it out of the tree sends it back to the root.
	fn ensure_cwd_live(&mut self) {
		if !self.tree.contains(self.cwd) {
			debug!("current directory removed, resetting to root");
			self.cwd = self.tree.root();
		}
	}

	/// Resolve the source and destination of a move or copy.
	fn transfer_targets(&self, source: &str, destination: &str) -> Result<(NodeId, NodeId), FsError> {
		let invalid = || FsError::invalid_source_or_destination(source, destination);
		let src = self.resolve(source).ok_or_else(invalid)?;
		let dest = self.resolve(destination).ok_or_else(invalid)?;
		if !self.tree.get(dest).is_some_and(Node::is_dir) {
			return Err(invalid());
		}
		if self.tree.is_ancestor(src, dest) {
			return Err(FsError::InvalidTarget(format!(
				"cannot place {} inside itself: {}",
				source, destination
			)));
		}
		Ok((src, dest))
	}

	// -- Creation ---------------------------------------------------------

	pub fn mkdir(&mut self, path: &str) -> Result<NodeId, FsError> {
		if is_root_path(path) {
			return Err(FsError::InvalidTarget(
				"cannot create root directory".to_string(),
			));
		}
		let (parent, name) = self.creation_target(path)?;
		let id = self
			.tree
			.create_dir(parent, name)
			.ok_or_else(|| FsError::directory_not_found(path))?;
		debug!(path, "mkdir");
		Ok(id)
	}

	pub fn touch(&mut self, path: &str) -> Result<NodeId, FsError> {
		if !path.is_empty() && self.resolve(path).is_some() {
			return Err(FsError::AlreadyExists(path.to_string()));
		}
		let (parent, name) = self.creation_target(path)?;
		let id = self
			.tree
			.create_file(parent, name, String::new())
			.ok_or_else(|| FsError::directory_not_found(path))?;
		debug!(path, "touch");
		Ok(id)
	}

	// -- Navigation & reads -----------------------------------------------

	pub fn cd(&mut self, path: &str) -> Result<(), FsError> {
		self.cwd = self.resolve_dir(path)?;
		Ok(())
	}

	/// Absolute path of the current directory.
	pub fn pwd(&self) -> String {
		self.tree.path_of(self.cwd).unwrap_or_else(|| "/".to_string())
	}

	/// Child basenames of a directory, joined with `", "`. Lists the current
	/// directory when no path is given.
	pub fn ls(&self, path: Option<&str>) -> Result<String, FsError> {
		let path = path.unwrap_or(".");
		let dir = self.resolve_dir(path)?;
		let names: Vec<&str> = self
			.tree
			.get(dir)
			.and_then(Node::children)
			.map(|children| children.keys().map(String::as_str).collect())
			.unwrap_or_default();
		Ok(names.join(", "))
	}

	pub fn cat(&self, path: &str) -> Result<&str, FsError> {
		let file = self.resolve_file(path)?;
		self.tree
			.get(file)
			.and_then(Node::content)
			.ok_or_else(|| FsError::file_not_found(path))
	}

	/// Whether `pattern` occurs anywhere in the file's content.
	pub fn grep(&self, pattern: &str, path: &str) -> Result<bool, FsError> {
		Ok(self.cat(path)?.contains(pattern))
	}

	// -- Mutation ---------------------------------------------------------

	/// Overwrite an existing file. Never creates one.
	pub fn echo(&mut self, content: &str, path: &str) -> Result<(), FsError> {
		let file = self.resolve_file(path)?;
		if !self.tree.set_content(file, content.to_string()) {
			return Err(FsError::file_not_found(path));
		}
		debug!(path, size = content.len(), "echo");
		Ok(())
	}

	pub fn rm(&mut self, path: &str) -> Result<(), FsError> {
		let id = self
			.resolve(path)
			.ok_or_else(|| FsError::node_not_found(path))?;
		if id == self.tree.root() {
			return Err(FsError::InvalidTarget(
				"cannot remove root directory".to_string(),
			));
		}
		self.tree.remove(id);
		self.ensure_cwd_live();
		debug!(path, "rm");
		Ok(())
	}

	/// Move `source` into the `destination` directory under its own basename.
	///
	/// An entry of the same name already in the destination is replaced.
	pub fn mv(&mut self, source: &str, destination: &str) -> Result<(), FsError> {
		let (src, dest) = self.transfer_targets(source, destination)?;
		let invalid = || FsError::invalid_source_or_destination(source, destination);
		let old_parent = self.tree.parent(src).ok_or_else(invalid)?;
		if !self.tree.detach(src) {
			return Err(invalid());
		}
		if !self.tree.attach(dest, src) {
			self.tree.attach(old_parent, src);
			return Err(invalid());
		}
		self.ensure_cwd_live();
		debug!(source, destination, "mv");
		Ok(())
	}

	/// Copy `source` (recursively, for directories) into `destination`.
	///
	/// Returns the id of the new top-level copy.
	pub fn cp(&mut self, source: &str, destination: &str) -> Result<NodeId, FsError> {
		let (src, dest) = self.transfer_targets(source, destination)?;
		let copy = self
			.tree
			.deep_copy(src)
			.ok_or_else(|| FsError::invalid_source_or_destination(source, destination))?;
		if !self.tree.attach(dest, copy) {
			self.tree.remove(copy);
			return Err(FsError::invalid_source_or_destination(source, destination));
		}
		self.ensure_cwd_live();
		debug!(source, destination, "cp");
		Ok(copy)
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
