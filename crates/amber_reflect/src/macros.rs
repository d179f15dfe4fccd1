//! The [`composite!`](crate::composite) declaration macro.

/// Declares a serializable composite type.
///
/// The macro defines a plain struct with public fields and implements
/// [`Named`], [`Described`], [`Amber`], [`Composite`] and [`Registrable`]
/// for it. Property slots follow the declaration order. An optional library
/// literal after the name overrides the default library.
///
/// Field types decide how a slot behaves:
///
/// - `T` holds the value directly.
/// - `Option<T>` makes the slot absent while `None`.
/// - `Arc<T>` shares the value; clones of the handle serialize once.
/// - `Option<Arc<T>>` combines both, the usual spelling for back-references.
///
/// Every field type must implement [`Registrable`]; registering the
/// composite registers them all.
///
/// # Examples
///
/// ```
/// use amber_reflect::{composite, ops::Composite, registry::TypeRegistry};
///
/// composite!(Device["demo"] {
///     id: u32,
///     name: String,
///     tags: Vec<String>,
/// });
///
/// let registry = TypeRegistry::new();
/// registry.register::<Device>();
///
/// let device = Device { id: 7, name: "relay".into(), tags: vec![] };
/// assert_eq!(device.property_len(), 3);
///
/// let device: &dyn Composite = &device;
/// assert_eq!(device.property_as::<u32>("id"), Some(&7));
/// ```
///
/// [`Named`]: crate::Named
/// [`Described`]: crate::info::Described
/// [`Amber`]: crate::Amber
/// [`Composite`]: crate::ops::Composite
/// [`Registrable`]: crate::registry::Registrable
#[macro_export]
macro_rules! composite {
    ($(#[$meta:meta])* $name:ident $([$library:literal])? { $($fields:tt)* }) => {
        $crate::__composite_parse! {
            meta { $(#[$meta])* }
            name { $name }
            library { $($library)? }
            binders { self name value registry }
            struct_fields { }
            names { }
            infos { }
            get { }
            get_mut { }
            set { }
            deps { }
            rest { $($fields)* }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __composite_parse {
    // Option<Arc<T>> slot
    (
        meta $meta:tt
        name { $name:ident }
        library $library:tt
        binders { $this:ident $nm:ident $val:ident $reg:ident }
        struct_fields { $($sf:tt)* }
        names { $($names:tt)* }
        infos { $($infos:tt)* }
        get { $($get:tt)* }
        get_mut { $($get_mut:tt)* }
        set { $($set:tt)* }
        deps { $($deps:tt)* }
        rest { $field:ident : Option<Arc<$t:ty>>, $($rest:tt)* }
    ) => {
        $crate::__composite_parse! {
            meta $meta
            name { $name }
            library $library
            binders { $this $nm $val $reg }
            struct_fields {
                $($sf)*
                pub $field: ::std::option::Option<::std::sync::Arc<$t>>,
            }
            names { $($names)* stringify!($field), }
            infos { $($infos)* $crate::info::PropertyInfo::of::<$t>(stringify!($field)), }
            get {
                $($get)*
                if $nm == stringify!($field) {
                    return $this.$field.as_ref().map(|value| value as &dyn $crate::Amber);
                }
            }
            get_mut {
                $($get_mut)*
                if $nm == stringify!($field) {
                    return $this.$field.as_mut().map(|value| value as &mut dyn $crate::Amber);
                }
            }
            set {
                $($set)*
                if $nm == stringify!($field) {
                    let value = match $val.downcast::<::std::sync::Arc<$t>>() {
                        Ok(shared) => {
                            $this.$field = Some(*shared);
                            return Ok(true);
                        }
                        Err(value) => value,
                    };
                    return match value.downcast::<$t>() {
                        Ok(value) => {
                            $this.$field = Some(::std::sync::Arc::new(*value));
                            Ok(true)
                        }
                        Err(value) => Err(value),
                    };
                }
            }
            deps { $($deps)* $reg.register::<$t>(); }
            rest { $($rest)* }
        }
    };

    // Arc<T> slot
    (
        meta $meta:tt
        name { $name:ident }
        library $library:tt
        binders { $this:ident $nm:ident $val:ident $reg:ident }
        struct_fields { $($sf:tt)* }
        names { $($names:tt)* }
        infos { $($infos:tt)* }
        get { $($get:tt)* }
        get_mut { $($get_mut:tt)* }
        set { $($set:tt)* }
        deps { $($deps:tt)* }
        rest { $field:ident : Arc<$t:ty>, $($rest:tt)* }
    ) => {
        $crate::__composite_parse! {
            meta $meta
            name { $name }
            library $library
            binders { $this $nm $val $reg }
            struct_fields {
                $($sf)*
                pub $field: ::std::sync::Arc<$t>,
            }
            names { $($names)* stringify!($field), }
            infos { $($infos)* $crate::info::PropertyInfo::of::<$t>(stringify!($field)), }
            get {
                $($get)*
                if $nm == stringify!($field) {
                    return Some(&$this.$field as &dyn $crate::Amber);
                }
            }
            get_mut {
                $($get_mut)*
                if $nm == stringify!($field) {
                    return Some(&mut $this.$field as &mut dyn $crate::Amber);
                }
            }
            set {
                $($set)*
                if $nm == stringify!($field) {
                    let value = match $val.downcast::<::std::sync::Arc<$t>>() {
                        Ok(shared) => {
                            $this.$field = *shared;
                            return Ok(true);
                        }
                        Err(value) => value,
                    };
                    return match value.downcast::<$t>() {
                        Ok(value) => {
                            $this.$field = ::std::sync::Arc::new(*value);
                            Ok(true)
                        }
                        Err(value) => Err(value),
                    };
                }
            }
            deps { $($deps)* $reg.register::<$t>(); }
            rest { $($rest)* }
        }
    };

    // Option<T> slot
    (
        meta $meta:tt
        name { $name:ident }
        library $library:tt
        binders { $this:ident $nm:ident $val:ident $reg:ident }
        struct_fields { $($sf:tt)* }
        names { $($names:tt)* }
        infos { $($infos:tt)* }
        get { $($get:tt)* }
        get_mut { $($get_mut:tt)* }
        set { $($set:tt)* }
        deps { $($deps:tt)* }
        rest { $field:ident : Option<$t:ty>, $($rest:tt)* }
    ) => {
        $crate::__composite_parse! {
            meta $meta
            name { $name }
            library $library
            binders { $this $nm $val $reg }
            struct_fields {
                $($sf)*
                pub $field: ::std::option::Option<$t>,
            }
            names { $($names)* stringify!($field), }
            infos { $($infos)* $crate::info::PropertyInfo::of::<$t>(stringify!($field)), }
            get {
                $($get)*
                if $nm == stringify!($field) {
                    return $this.$field.as_ref().map(|value| value as &dyn $crate::Amber);
                }
            }
            get_mut {
                $($get_mut)*
                if $nm == stringify!($field) {
                    return $this.$field.as_mut().map(|value| value as &mut dyn $crate::Amber);
                }
            }
            set {
                $($set)*
                if $nm == stringify!($field) {
                    return match $val.downcast::<$t>() {
                        Ok(value) => {
                            $this.$field = Some(*value);
                            Ok(true)
                        }
                        Err(value) => Err(value),
                    };
                }
            }
            deps { $($deps)* $reg.register::<$t>(); }
            rest { $($rest)* }
        }
    };

    // plain slot
    (
        meta $meta:tt
        name { $name:ident }
        library $library:tt
        binders { $this:ident $nm:ident $val:ident $reg:ident }
        struct_fields { $($sf:tt)* }
        names { $($names:tt)* }
        infos { $($infos:tt)* }
        get { $($get:tt)* }
        get_mut { $($get_mut:tt)* }
        set { $($set:tt)* }
        deps { $($deps:tt)* }
        rest { $field:ident : $t:ty, $($rest:tt)* }
    ) => {
        $crate::__composite_parse! {
            meta $meta
            name { $name }
            library $library
            binders { $this $nm $val $reg }
            struct_fields {
                $($sf)*
                pub $field: $t,
            }
            names { $($names)* stringify!($field), }
            infos { $($infos)* $crate::info::PropertyInfo::of::<$t>(stringify!($field)), }
            get {
                $($get)*
                if $nm == stringify!($field) {
                    return Some(&$this.$field as &dyn $crate::Amber);
                }
            }
            get_mut {
                $($get_mut)*
                if $nm == stringify!($field) {
                    return Some(&mut $this.$field as &mut dyn $crate::Amber);
                }
            }
            set {
                $($set)*
                if $nm == stringify!($field) {
                    return match $val.downcast::<$t>() {
                        Ok(value) => {
                            $this.$field = *value;
                            Ok(true)
                        }
                        Err(value) => Err(value),
                    };
                }
            }
            deps { $($deps)* $reg.register::<$t>(); }
            rest { $($rest)* }
        }
    };

    // all slots consumed
    (
        meta { $(#[$meta:meta])* }
        name { $name:ident }
        library { $($library:literal)? }
        binders { $this:ident $nm:ident $val:ident $reg:ident }
        struct_fields { $($sf:tt)* }
        names { $($names:tt)* }
        infos { $($infos:tt)* }
        get { $($get:tt)* }
        get_mut { $($get_mut:tt)* }
        set { $($set:tt)* }
        deps { $($deps:tt)* }
        rest { }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            $($sf)*
        }

        impl $name {
            const NAMES: &'static [&'static str] = &[$($names)*];
        }

        impl $crate::Named for $name {
            #[inline]
            fn type_name() -> &'static str {
                stringify!($name)
            }

            $(
                #[inline]
                fn library() -> &'static str {
                    $library
                }
            )?
        }

        impl $crate::info::Described for $name {
            fn type_info() -> &'static $crate::info::TypeInfo {
                static CELL: $crate::impls::TypeInfoCell = $crate::impls::TypeInfoCell::new();
                CELL.get_or_init(|| {
                    $crate::info::TypeInfo::Composite($crate::info::CompositeInfo::new::<$name>(
                        &[$($infos)*],
                    ))
                })
            }
        }

        impl $crate::Amber for $name {
            #[inline]
            fn type_ref(&self) -> $crate::TypeRef {
                $crate::TypeRef::of::<Self>()
            }

            #[inline]
            fn info(&self) -> &'static $crate::info::TypeInfo {
                <Self as $crate::info::Described>::type_info()
            }

            #[inline]
            fn shape(&self) -> $crate::Shape {
                $crate::Shape::Composite
            }

            #[inline]
            fn shape_ref(&self) -> $crate::ops::ShapeRef<'_> {
                $crate::ops::ShapeRef::Composite(self)
            }

            #[inline]
            fn shape_mut(&mut self) -> $crate::ops::ShapeMut<'_> {
                $crate::ops::ShapeMut::Composite(self)
            }

            fn set(
                &mut self,
                value: ::std::boxed::Box<dyn $crate::Amber>,
            ) -> Result<(), ::std::boxed::Box<dyn $crate::Amber>> {
                *self = *value.downcast::<Self>()?;
                Ok(())
            }
        }

        impl $crate::ops::Composite for $name {
            fn property(&$this, $nm: &str) -> Option<&dyn $crate::Amber> {
                $($get)*
                let _ = $nm;
                None
            }

            fn property_mut(&mut $this, $nm: &str) -> Option<&mut dyn $crate::Amber> {
                $($get_mut)*
                let _ = $nm;
                None
            }

            fn property_at(&self, index: usize) -> Option<&dyn $crate::Amber> {
                self.property(*Self::NAMES.get(index)?)
            }

            fn property_at_mut(&mut self, index: usize) -> Option<&mut dyn $crate::Amber> {
                self.property_mut(*Self::NAMES.get(index)?)
            }

            #[inline]
            fn property_name_at(&self, index: usize) -> Option<&str> {
                Self::NAMES.get(index).copied()
            }

            #[inline]
            fn property_len(&self) -> usize {
                Self::NAMES.len()
            }

            fn set_property(
                &mut $this,
                $nm: &str,
                $val: ::std::boxed::Box<dyn $crate::Amber>,
            ) -> Result<bool, ::std::boxed::Box<dyn $crate::Amber>> {
                $($set)*
                let _ = $nm;
                let _ = $val;
                Ok(false)
            }

            #[inline]
            fn iter_properties(&self) -> $crate::ops::PropertyIter<'_> {
                $crate::ops::PropertyIter::new(self)
            }
        }

        impl $crate::registry::Registrable for $name {
            fn type_entry() -> $crate::registry::TypeEntry {
                $crate::registry::TypeEntry::of::<$name>()
            }

            fn register_dependencies($reg: &$crate::registry::TypeRegistry) {
                $($deps)*
                let _ = $reg;
            }
        }
    };
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::any::TypeId;
    use std::sync::Arc;

    use crate::ops::Composite;
    use crate::registry::TypeRegistry;
    use crate::{Amber, Shape};

    composite!(Device["demo"] {
        id: u32,
        name: String,
        tags: Vec<String>,
    });

    composite!(Node {
        label: String,
        weight: Option<i64>,
        next: Option<Arc<Node>>,
    });

    #[test]
    fn declared_composite_exposes_slots_in_order() {
        let device = Device {
            id: 7,
            name: "relay".into(),
            tags: vec!["power".into()],
        };

        assert_eq!(device.shape(), Shape::Composite);
        assert_eq!(device.type_ref().name(), "Device");
        assert_eq!(device.type_ref().library(), "demo");
        assert_eq!(device.property_len(), 3);

        let names: Vec<&str> = device.iter_properties().map(|(name, _)| name).collect();
        assert_eq!(names, ["id", "name", "tags"]);

        let composite: &dyn Composite = &device;
        assert_eq!(composite.property_as::<u32>("id"), Some(&7));
        assert_eq!(
            composite.property_as::<Vec<String>>("tags"),
            Some(&vec!["power".to_string()])
        );
    }

    #[test]
    fn optional_slots_report_absent_values() {
        let node = Node {
            label: "a".into(),
            weight: None,
            next: None,
        };

        assert_eq!(node.property_len(), 3);
        assert!(node.property("weight").is_none());
        assert!(node.property("label").is_some());

        let values: Vec<bool> = node
            .iter_properties()
            .map(|(_, value)| value.is_some())
            .collect();
        assert_eq!(values, [true, false, false]);
    }

    #[test]
    fn set_property_fills_each_carrier() {
        let mut node = Node::default();

        assert!(node
            .set_property("label", Box::new(String::from("root")))
            .unwrap());
        assert!(node.set_property("weight", Box::new(5_i64)).unwrap());
        assert!(node.set_property("next", Box::new(Node::default())).unwrap());

        assert_eq!(node.label, "root");
        assert_eq!(node.weight, Some(5));
        assert!(node.next.is_some());
    }

    #[test]
    fn set_property_accepts_shared_handles_directly() {
        let mut node = Node::default();
        let next = Arc::new(Node {
            label: "next".into(),
            weight: None,
            next: None,
        });

        assert!(node
            .set_property("next", Box::new(Arc::clone(&next)))
            .unwrap());
        assert_eq!(node.next.as_ref().map(|n| n.label.as_str()), Some("next"));
    }

    #[test]
    fn set_property_rejects_mismatched_values() {
        let mut device = Device::default();

        assert!(device
            .set_property("id", Box::new("seven".to_string()))
            .is_err());
        assert!(!device.set_property("missing", Box::new(1_u32)).unwrap());
        assert_eq!(device.id, 0);
    }

    #[test]
    fn descriptor_lists_unwrapped_property_types() {
        let info = <Node as crate::info::Described>::type_info();
        let composite = info.as_composite().unwrap();

        assert_eq!(composite.property_len(), 3);
        let weight = composite.property("weight").unwrap();
        assert_eq!(weight.ty_id(), TypeId::of::<i64>());

        let next = composite.property("next").unwrap();
        assert_eq!(next.ty_id(), TypeId::of::<Node>());
        assert_eq!(next.type_ref().name(), "Node");
    }

    #[test]
    fn registering_a_composite_pulls_property_types() {
        let registry = TypeRegistry::new();
        registry.register::<Device>();

        assert!(registry.contains(TypeId::of::<Device>()));
        assert!(registry.contains(TypeId::of::<Vec<String>>()));

        registry.register::<Node>();
        assert!(registry.contains(TypeId::of::<Node>()));
    }
}
