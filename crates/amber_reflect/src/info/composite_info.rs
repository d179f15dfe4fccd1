use std::any::TypeId;
use std::collections::HashMap;

use crate::info::PropertyInfo;
use crate::{Named, TypeRef};

/// Descriptor of a named-property aggregate.
///
/// Properties are kept in declaration order, which is also serialization
/// order; the name index only accelerates lookups during reconstruction.
#[derive(Debug)]
pub struct CompositeInfo {
    type_ref: TypeRef,
    ty: TypeId,
    properties: Box<[PropertyInfo]>,
    indices: HashMap<&'static str, usize>,
}

impl CompositeInfo {
    /// Builds the descriptor of composite type `T` from its serializable
    /// properties, in declaration order.
    pub fn new<T: Named>(properties: &[PropertyInfo]) -> Self {
        let indices = properties
            .iter()
            .enumerate()
            .map(|(index, property)| (property.name(), index))
            .collect();

        Self {
            type_ref: TypeRef::of::<T>(),
            ty: TypeId::of::<T>(),
            properties: properties.to_vec().into_boxed_slice(),
            indices,
        }
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    pub fn ty_id(&self) -> TypeId {
        self.ty
    }

    /// The descriptor of the named property, if declared.
    pub fn property(&self, name: &str) -> Option<&PropertyInfo> {
        self.indices.get(name).map(|index| &self.properties[*index])
    }

    /// The descriptor at the given declaration position.
    pub fn property_at(&self, index: usize) -> Option<&PropertyInfo> {
        self.properties.get(index)
    }

    /// The declaration position of the named property, if declared.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    /// Iterates property descriptors in declaration order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &PropertyInfo> {
        self.properties.iter()
    }

    pub fn property_len(&self) -> usize {
        self.properties.len()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::Described;

    #[test]
    fn ordered_lookup() {
        struct Sample;

        impl Named for Sample {
            fn type_name() -> &'static str {
                "Sample"
            }
        }

        let info = CompositeInfo::new::<Sample>(&[
            PropertyInfo::of::<String>("name"),
            PropertyInfo::of::<u32>("count"),
        ]);

        assert_eq!(info.property_len(), 2);
        assert_eq!(info.index_of("count"), Some(1));
        assert_eq!(info.property("name").map(PropertyInfo::name), Some("name"));
        assert!(info.property("missing").is_none());

        let names: Vec<_> = info.iter().map(PropertyInfo::name).collect();
        assert_eq!(names, ["name", "count"]);

        assert_eq!(
            info.property("count").map(PropertyInfo::ty_id),
            Some(<u32 as Described>::type_info().ty_id()),
        );
    }
}
