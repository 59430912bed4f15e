//! Named, ordered tree used to assemble JSON documents.
//!
//! Every node has an optional name (the root has none) and is either a leaf
//! holding a value or an interior node holding children. Children keep
//! insertion order, which becomes JSON member order.
//!
//! A node that holds a value never gains children, and a node with children
//! never takes a value. Requests that would break this return
//! [`TreeError::AlreadyHasAValue`] and leave the tree unchanged.

use tracing::warn;

use crate::error::TreeError;
use crate::limits::PATH_DELIMITER;

#[derive(Debug, Clone, PartialEq)]
pub struct MultiTree<V> {
    name: Option<String>,
    value: Option<V>,
    children: Vec<MultiTree<V>>,
}

impl<V> Default for MultiTree<V> {
    fn default() -> Self {
        Self { name: None, value: None, children: Vec::new() }
    }
}

impl<V> MultiTree<V> {
    /// Creates an unnamed, empty root.
    pub fn new() -> Self {
        Self::default()
    }

    fn named(name: &str, value: Option<V>) -> Self {
        Self { name: Some(name.to_string()), value, children: Vec::new() }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn is_leaf(&self) -> bool {
        self.value.is_some()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Iterates children in insertion order.
    pub fn children(&self) -> std::slice::Iter<'_, MultiTree<V>> {
        self.children.iter()
    }

    pub fn child(&self, index: usize) -> Result<&MultiTree<V>, TreeError> {
        self.children
            .get(index)
            .ok_or(TreeError::IndexOutOfBounds { index, count: self.children.len() })
    }

    pub fn child_by_name(&self, name: &str) -> Result<&MultiTree<V>, TreeError> {
        self.position(name)
            .map(|index| &self.children[index])
            .ok_or_else(|| TreeError::ChildNotFound { name: name.to_string() })
    }

    /// Stores `value` at `path`, creating missing interior nodes.
    ///
    /// Segments are separated by `/`; one leading `/` is ignored.
    pub fn add_leaf(&mut self, path: &str, value: V) -> Result<(), TreeError> {
        let result = split_path(path).and_then(|(parents, name)| {
            let parent = self.descend_mut(parents)?;
            parent.check_accepts_children()?;
            if parent.position(name).is_some() {
                return Err(TreeError::AlreadyHasAValue { name: name.to_string() });
            }
            parent.children.push(Self::named(name, Some(value)));
            Ok(())
        });
        result.inspect_err(|err| warn!(path, error = %err, "add_leaf failed"))
    }

    /// Adds an interior child at `path` and returns it.
    pub fn add_child(&mut self, path: &str) -> Result<&mut MultiTree<V>, TreeError> {
        let (parents, name) = split_path(path)?;
        let parent = self.descend_mut(parents)?;
        parent.check_accepts_children()?;
        if parent.position(name).is_some() {
            warn!(path, "add_child on existing name");
            return Err(TreeError::AlreadyHasAValue { name: name.to_string() });
        }
        let index = parent.children.len();
        parent.children.push(Self::named(name, None));
        Ok(&mut parent.children[index])
    }

    /// Returns the value stored at `path`.
    pub fn leaf_value(&self, path: &str) -> Result<&V, TreeError> {
        let path = path.strip_prefix(PATH_DELIMITER).unwrap_or(path);
        let mut node = self;
        for segment in path.split(PATH_DELIMITER) {
            if segment.is_empty() {
                return Err(TreeError::EmptyChildName);
            }
            node = node.child_by_name(segment)?;
        }
        node.value.as_ref().ok_or(TreeError::EmptyValue)
    }

    /// Turns an empty node into a leaf.
    pub fn set_value(&mut self, value: V) -> Result<(), TreeError> {
        if self.value.is_some() || !self.children.is_empty() {
            return Err(TreeError::AlreadyHasAValue { name: self.name.clone().unwrap_or_default() });
        }
        self.value = Some(value);
        Ok(())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|child| child.name.as_deref() == Some(name))
    }

    fn check_accepts_children(&self) -> Result<(), TreeError> {
        if self.value.is_some() {
            return Err(TreeError::AlreadyHasAValue { name: self.name.clone().unwrap_or_default() });
        }
        Ok(())
    }

    /// Walks `parents`, creating missing interior nodes.
    ///
    /// Conflicts can only occur on nodes that already exist, so a failed walk
    /// has not created anything.
    fn descend_mut(&mut self, parents: Option<&str>) -> Result<&mut MultiTree<V>, TreeError> {
        let mut node = self;
        for segment in parents.into_iter().flat_map(|p| p.split(PATH_DELIMITER)) {
            node.check_accepts_children()?;
            let index = match node.position(segment) {
                Some(index) => index,
                None => {
                    node.children.push(Self::named(segment, None));
                    node.children.len() - 1
                }
            };
            node = &mut node.children[index];
        }
        Ok(node)
    }
}

/// Splits a path into its parent segments and final name.
fn split_path(path: &str) -> Result<(Option<&str>, &str), TreeError> {
    let path = path.strip_prefix(PATH_DELIMITER).unwrap_or(path);
    let (parents, name) = match path.rsplit_once(PATH_DELIMITER) {
        Some((parents, name)) => (Some(parents), name),
        None => (None, path),
    };
    if name.is_empty() || parents.is_some_and(|p| p.split(PATH_DELIMITER).any(str::is_empty)) {
        return Err(TreeError::EmptyChildName);
    }
    Ok((parents, name))
}
