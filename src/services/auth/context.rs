//! Per-request context carrier.
//!
//! `RequestContext` is an immutable chain of typed values. Attaching a value returns a new
//! context that shares everything already attached; the original is left untouched, so a
//! context handed to one call can never be changed underneath another.
//!
//! One context is created per request (see `middleware::auth::access`) and travels in the
//! request extensions; nothing here is global.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

struct Node {
    value: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
    parent: Option<Arc<Node>>,
}

#[derive(Clone, Default)]
pub struct RequestContext {
    head: Option<Arc<Node>>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a context that also carries `value`. O(1); `self` is unchanged.
    #[must_use]
    pub fn attach<T: Any + Send + Sync>(&self, value: T) -> Self {
        Self {
            head: Some(Arc::new(Node {
                value: Box::new(value),
                type_name: type_name::<T>(),
                parent: self.head.clone(),
            })),
        }
    }

    /// Most recently attached value of type `T`, if any.
    pub fn retrieve<T: Any>(&self) -> Option<&T> {
        self.nodes().find_map(|node| node.value.downcast_ref::<T>())
    }

    /// Number of values attached along the chain.
    #[cfg(test)]
    pub fn depth(&self) -> usize {
        self.nodes().count()
    }

    fn nodes(&self) -> impl Iterator<Item = &Node> {
        std::iter::successors(self.head.as_deref(), |node| node.parent.as_deref())
    }
}

impl fmt::Debug for RequestContext {
    // Type names only: values may be credentials.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.nodes().map(|node| node.type_name))
            .finish()
    }
}
