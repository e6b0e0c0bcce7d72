//! The wrapper handle and its shared per-tree bookkeeping.

use core::fmt;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::value::{Value, ValueKind};

/// Shared per-tree state: a weak reference to the anchor node and the
/// single-slot "most recently written node" cell.
///
/// Every node of a tree holds this context strongly, so the cell outlives any
/// individual handle; the node references inside it are weak so bookkeeping
/// alone never keeps a detached node alive.
pub(crate) struct TreeCtx {
    pub(crate) root: RefCell<Weak<NodeInner>>,
    pub(crate) last_written: RefCell<Weak<NodeInner>>,
}

pub(crate) struct NodeInner {
    pub(crate) value: RefCell<Value>,
    pub(crate) tree: Rc<TreeCtx>,
}

/// A wrapper handle over one value in a dynamic tree.
///
/// Cloning a `Node` clones the handle, not the value: both handles read and
/// write the same slot. Equality compares wrapped values; handle identity is
/// [`Node::ptr_eq`].
///
/// `Node` is single-threaded by construction (`Rc`/`RefCell`), so it is
/// neither `Send` nor `Sync`.
#[derive(Clone)]
pub struct Node {
    pub(crate) inner: Rc<NodeInner>,
}

impl Node {
    /// Creates a standalone node wrapping an empty mapping. The node anchors
    /// its own tree.
    pub fn new() -> Self {
        Self::new_root(Value::empty_map())
    }

    /// Wraps `value` exactly as given; `Null` stays `Null` rather than being
    /// replaced by an empty mapping. An input that is already a wrapped node
    /// is adopted unchanged — same slot, same tree, no copy.
    pub fn from_value(value: impl Into<Value>) -> Self {
        match value.into() {
            Value::Node(node) => node,
            value => Self::new_root(value),
        }
    }

    pub(crate) fn new_root(value: Value) -> Self {
        debug_assert!(!matches!(value, Value::Node(_)));
        let tree = Rc::new(TreeCtx {
            root: RefCell::new(Weak::new()),
            last_written: RefCell::new(Weak::new()),
        });
        let inner = Rc::new(NodeInner {
            value: RefCell::new(value),
            tree,
        });
        *inner.tree.root.borrow_mut() = Rc::downgrade(&inner);
        Node { inner }
    }

    /// Wraps `value` as a member of an existing tree. Already-wrapped nodes
    /// are adopted unchanged, keeping the tree they were created under.
    pub(crate) fn new_child(value: Value, tree: &Rc<TreeCtx>) -> Self {
        let value = match value {
            Value::Node(node) => return node,
            value => value,
        };
        Node {
            inner: Rc::new(NodeInner {
                value: RefCell::new(value),
                tree: Rc::clone(tree),
            }),
        }
    }

    pub(crate) fn tree(&self) -> &Rc<TreeCtx> {
        &self.inner.tree
    }

    /// The node anchoring this tree. The anchor's own `root()` is itself.
    ///
    /// Returns `None` only if the anchor handle has been dropped while this
    /// descendant survived; the shared context (and with it
    /// [`last_written`](Node::last_written)) keeps working regardless.
    pub fn root(&self) -> Option<Node> {
        self.inner.tree.root.borrow().upgrade().map(|inner| Node { inner })
    }

    /// Whether this node is its own tree's anchor.
    pub fn is_root(&self) -> bool {
        self.root().is_some_and(|root| Node::ptr_eq(&root, self))
    }

    /// The node most recently stored by an attribute-set or index-set
    /// anywhere in this tree. Reads never update it. `None` before the first
    /// write, or if the recorded node has since been dropped.
    pub fn last_written(&self) -> Option<Node> {
        self.inner
            .tree
            .last_written
            .borrow()
            .upgrade()
            .map(|inner| Node { inner })
    }

    pub(crate) fn record_write(&self, stored: &Node) {
        *self.inner.tree.last_written.borrow_mut() = Rc::downgrade(&stored.inner);
    }

    /// Handle identity: do the two handles share one slot?
    pub fn ptr_eq(a: &Node, b: &Node) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    /// A clone of the wrapped value.
    pub fn value(&self) -> Value {
        self.inner.value.borrow().clone()
    }

    /// Runtime kind of the wrapped value.
    pub fn kind(&self) -> ValueKind {
        self.inner.value.borrow().kind()
    }

    /// Replaces the wrapped value, returning the previous one. A wrapped-node
    /// input is flattened to its inner value first (a node's own slot never
    /// holds another wrapper).
    pub fn replace_value(&self, value: impl Into<Value>) -> Value {
        let value = value.into().unwrapped();
        self.inner.value.replace(value)
    }

    /// Scoped use: hands the node to the closure and returns its result.
    /// Entry yields the node itself; there is nothing to release on exit.
    pub fn with<R>(&self, f: impl FnOnce(&Node) -> R) -> R {
        f(self)
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner.value.borrow(), f)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner.value.borrow(), f)
    }
}
