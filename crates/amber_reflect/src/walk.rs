//! Graph traversal support shared by the serializers.
//!
//! A serializer walks an object graph that may contain shared handles and,
//! through them, cycles. [`GraphWalker`] pairs the registry with a
//! [`VisitedSet`] keyed on value identity, so a value reached twice is
//! recognized and suppressed instead of rendered twice or recursed into
//! forever.

use std::collections::HashSet;

use crate::ops::{Array, Composite, List, Map, ShapeRef};
use crate::registry::TypeRegistry;
use crate::Amber;

// -----------------------------------------------------------------------------
// VisitedSet

/// Identity set over the values already rendered in one serialization call.
///
/// Keys are [`Amber::identity`] pointers. Shared handles report their
/// allocation's address, so every clone of the same handle lands on the same
/// key; owned values report their own address, which is unique among values
/// alive in the same graph.
#[derive(Default)]
pub struct VisitedSet(HashSet<*const ()>);

impl VisitedSet {
    /// Creates an empty set.
    #[inline]
    pub fn new() -> Self {
        Self(HashSet::new())
    }

    /// Marks a value as visited, returning `false` if it already was.
    #[inline]
    pub fn insert(&mut self, value: &dyn Amber) -> bool {
        self.0.insert(value.identity())
    }

    /// Whether the value has been marked.
    #[inline]
    pub fn contains(&self, value: &dyn Amber) -> bool {
        self.0.contains(&value.identity())
    }

    /// Forgets all marks.
    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

// -----------------------------------------------------------------------------
// ValueShape

/// How a serializer should render a value.
///
/// This is [`ShapeRef`] after the registry has had its say: a composite
/// whose type carries a text converter renders as text, and transparent
/// handles have been unwrapped to the value they share.
pub enum ValueShape<'v> {
    /// Render through the text converter, or skip if there is none.
    Scalar(&'v dyn Amber),
    Array(&'v dyn Array),
    List(&'v dyn List),
    Map(&'v dyn Map),
    Composite(&'v dyn Composite),
}

// -----------------------------------------------------------------------------
// GraphWalker

/// Per-call state for walking an object graph.
pub struct GraphWalker<'r> {
    registry: &'r TypeRegistry,
    visited: VisitedSet,
}

impl<'r> GraphWalker<'r> {
    /// Creates a walker with an empty visited set.
    #[inline]
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            visited: VisitedSet::new(),
        }
    }

    /// The registry this walker resolves against.
    #[inline]
    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// Decides how `value` should be rendered.
    ///
    /// Collections always render structurally. A composite renders as text
    /// when its type has a registered converter, matching how a type opts
    /// out of property expansion.
    pub fn classify<'v>(&self, value: &'v dyn Amber) -> ValueShape<'v> {
        match value.shape_ref() {
            ShapeRef::Scalar(inner) => ValueShape::Scalar(inner),
            ShapeRef::Array(inner) => ValueShape::Array(inner),
            ShapeRef::List(inner) => ValueShape::List(inner),
            ShapeRef::Map(inner) => ValueShape::Map(inner),
            ShapeRef::Composite(inner) => {
                if self.registry.converter_for(value.ty_id()).is_some() {
                    ValueShape::Scalar(inner as &dyn Amber)
                } else {
                    ValueShape::Composite(inner)
                }
            }
        }
    }

    /// Marks a value as rendered, returning `false` if it already was.
    #[inline]
    pub fn mark(&mut self, value: &dyn Amber) -> bool {
        self.visited.insert(value)
    }

    /// Whether the value has already been rendered in this call.
    #[inline]
    pub fn seen(&self, value: &dyn Amber) -> bool {
        self.visited.contains(value)
    }
}

// -----------------------------------------------------------------------------
// Tests
