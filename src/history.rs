use std::fmt;
use std::sync::Arc;

#[derive(Debug)]
struct Node<A> {
    action: A,
    prev: Option<Arc<Node<A>>>,
}

/// Append-only move sequence with structural sharing.
///
/// `push` allocates one node and points it at the existing prefix, so every
/// child state of a search frame shares its parent's history instead of
/// copying it.
pub struct MoveHistory<A> {
    head: Option<Arc<Node<A>>>,
    len: usize,
}

impl<A> MoveHistory<A> {
    #[inline]
    pub fn new() -> Self {
        Self { head: None, len: 0 }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// New history with `action` appended; `self` is left untouched.
    #[inline]
    pub fn push(&self, action: A) -> Self {
        Self {
            head: Some(Arc::new(Node {
                action,
                prev: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    #[inline]
    pub fn last(&self) -> Option<&A> {
        self.head.as_deref().map(|n| &n.action)
    }

    /// Iterate from the most recent action back to the first.
    pub fn iter_rev(&self) -> impl Iterator<Item = &A> {
        let mut cur = self.head.as_deref();
        std::iter::from_fn(move || {
            let node = cur?;
            cur = node.prev.as_deref();
            Some(&node.action)
        })
    }

    /// True when `prefix` is held by `self` as shared nodes, not as a copy.
    pub fn shares_prefix_with(&self, prefix: &Self) -> bool {
        let Some(target) = &prefix.head else {
            return true;
        };
        let mut cur = self.head.as_ref();
        while let Some(node) = cur {
            if Arc::ptr_eq(node, target) {
                return true;
            }
            cur = node.prev.as_ref();
        }
        false
    }
}

impl<A: Clone> MoveHistory<A> {
    /// Actions in play order (oldest first).
    pub fn to_vec(&self) -> Vec<A> {
        let mut out: Vec<A> = self.iter_rev().cloned().collect();
        out.reverse();
        out
    }
}

impl<A> Default for MoveHistory<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Clone for MoveHistory<A> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
            len: self.len,
        }
    }
}

impl<A: PartialEq> PartialEq for MoveHistory<A> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter_rev().zip(other.iter_rev()).all(|(a, b)| a == b)
    }
}

impl<A: Eq> Eq for MoveHistory<A> {}

impl<A> FromIterator<A> for MoveHistory<A> {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |h, a| h.push(a))
    }
}

impl<A: fmt::Debug> fmt::Debug for MoveHistory<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut items: Vec<&A> = self.iter_rev().collect();
        items.reverse();
        f.debug_list().entries(items).finish()
    }
}
