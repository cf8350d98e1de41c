//! Hierarchical time codes.
//!
//! Codes are colon-delimited paths (`Client:Project:Task`). A [`CodeTree`]
//! built from the known codes lets a report select or drop a code together
//! with everything below it.

use std::collections::{BTreeMap, HashSet};

use crate::event::Period;

/// What a tree node stands for.
///
/// The root is its own variant so it can never compare equal to a code,
/// including the empty code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodePath {
    Root,
    Code(String),
}

impl NodePath {
    pub fn as_code(&self) -> Option<&str> {
        match self {
            Self::Root => None,
            Self::Code(code) => Some(code),
        }
    }
}

/// A node of the code tree.
#[derive(Debug, Clone)]
pub struct CodeTreeNode {
    children: BTreeMap<String, CodeTreeNode>,
    path: NodePath,
}

impl CodeTreeNode {
    fn new(path: NodePath) -> Self {
        Self {
            children: BTreeMap::new(),
            path,
        }
    }

    /// The full colon-joined code this node stands for.
    pub const fn path(&self) -> &NodePath {
        &self.path
    }

    pub fn child(&self, segment: &str) -> Option<&Self> {
        self.children.get(segment)
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &Self)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The codes of this node and every node below it.
    ///
    /// The walk uses an explicit stack, so arbitrarily deep codes cannot
    /// exhaust the call stack.
    pub fn subtree_codes(&self) -> HashSet<&str> {
        let mut codes = HashSet::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Some(code) = node.path.as_code() {
                codes.insert(code);
            }
            stack.extend(node.children.values());
        }
        codes
    }
}

/// Hierarchy of the known codes.
#[derive(Debug, Clone)]
pub struct CodeTree {
    root: CodeTreeNode,
}

impl Default for CodeTree {
    fn default() -> Self {
        Self {
            root: CodeTreeNode::new(NodePath::Root),
        }
    }
}

impl CodeTree {
    /// Builds the tree. Intermediate nodes are created for every prefix, so
    /// `A:B:C` alone yields nodes for `A`, `A:B` and `A:B:C`.
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Self::default();
        for code in codes {
            tree.insert(code.as_ref());
        }
        tree
    }

    pub fn insert(&mut self, code: &str) {
        let mut node = &mut self.root;
        let mut so_far = String::new();
        for (i, segment) in code.split(':').enumerate() {
            if i != 0 {
                so_far.push(':');
            }
            so_far.push_str(segment);
            node = node
                .children
                .entry(segment.to_string())
                .or_insert_with(|| CodeTreeNode::new(NodePath::Code(so_far.clone())));
        }
    }

    pub const fn root(&self) -> &CodeTreeNode {
        &self.root
    }

    /// Follows the segments of `code` from the root.
    pub fn find(&self, code: &str) -> Option<&CodeTreeNode> {
        code.split(':')
            .try_fold(&self.root, |node, segment| node.child(segment))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.find(code).is_some()
    }

    /// The periods coded `code` or any code below it.
    ///
    /// An unknown code selects nothing. Input order is preserved.
    pub fn filter_in_subtree(&self, periods: &[Period], code: &str) -> Vec<Period> {
        let Some(node) = self.find(code) else {
            tracing::debug!(code, "code not in tree, selecting nothing");
            return Vec::new();
        };
        let codes = node.subtree_codes();
        periods
            .iter()
            .filter(|p| codes.contains(p.code.as_str()))
            .cloned()
            .collect()
    }

    /// The periods not coded `code` or any code below it.
    ///
    /// An unknown code yields an empty result, the same as
    /// [`CodeTree::filter_in_subtree`].
    pub fn filter_out_subtree(&self, periods: &[Period], code: &str) -> Vec<Period> {
        let Some(node) = self.find(code) else {
            tracing::debug!(code, "code not in tree, selecting nothing");
            return Vec::new();
        };
        let codes = node.subtree_codes();
        periods
            .iter()
            .filter(|p| !codes.contains(p.code.as_str()))
            .cloned()
            .collect()
    }
}

/// The periods whose code is exactly `code`.
pub fn filter_in(periods: &[Period], code: &str) -> Vec<Period> {
    periods.iter().filter(|p| p.code == code).cloned().collect()
}

/// The periods whose code is anything but `code`.
pub fn filter_out(periods: &[Period], code: &str) -> Vec<Period> {
    periods.iter().filter(|p| p.code != code).cloned().collect()
}
