//! Writing object graphs into document trees.

use amber_reflect::info::MapInfo;
use amber_reflect::ops::{Composite, Map};
use amber_reflect::registry::TypeRegistry;
use amber_reflect::walk::{GraphWalker, ValueShape};
use amber_reflect::{Amber, DEFAULT_LIBRARY, Shape, TEXT_TYPE, TypeRef};

use super::TreeError;
use crate::dom::Node;
use crate::tags;

// -----------------------------------------------------------------------------
// TreeSerializer

/// Renders object graphs as document trees.
///
/// The writer walks a value through the registry and builds the [`Node`]
/// shapes the readers expect: an `object` root, a `properties` block per
/// composite, an `items` block per collection, converter text for scalars.
/// Type attributes carry the runtime type wherever a reader could not infer
/// it, and leave out the defaults every reader assumes.
///
/// Three flags adjust the output. Deep serialization, on by default, expands
/// composite properties in place; with it off the writer keeps scalar
/// properties only, unless primary-properties-only mode readmits
/// collections. Saving the root type stamps `type` and `assembly` on the
/// root node; arrays always carry them, since the reader sizes an array
/// from its declared type.
///
/// Within one call every composite is written once. A value reached again,
/// through a shared handle or a cycle, is left out where it occurs the
/// second time.
pub struct TreeSerializer<'r> {
    registry: &'r TypeRegistry,
    deep_serialization: bool,
    primary_properties_only: bool,
    save_root_type: bool,
}

impl<'r> TreeSerializer<'r> {
    /// Creates a writer with deep serialization on.
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            deep_serialization: true,
            primary_properties_only: false,
            save_root_type: false,
        }
    }

    /// Whether composite and collection properties are expanded.
    #[must_use]
    pub fn with_deep_serialization(mut self, deep: bool) -> Self {
        self.deep_serialization = deep;
        self
    }

    /// Keeps collection properties even when deep serialization is off.
    #[must_use]
    pub fn with_primary_properties_only(mut self, primary: bool) -> Self {
        self.primary_properties_only = primary;
        self
    }

    /// Writes the root's type attributes even when it is not an array.
    #[must_use]
    pub fn with_save_root_type(mut self, save: bool) -> Self {
        self.save_root_type = save;
        self
    }

    /// Renders `value` as a document rooted at an `object` node.
    pub fn serialize(&self, value: &dyn Amber) -> Result<Node, TreeError> {
        self.object_node(value, None)
    }

    /// Renders `value` with a `name` attribute on the root node.
    pub fn serialize_named(&self, value: &dyn Amber, name: &str) -> Result<Node, TreeError> {
        self.object_node(value, Some(name))
    }

    /// Renders `value` and appends the resulting `object` node to `parent`.
    pub fn serialize_node(
        &self,
        parent: &mut Node,
        value: &dyn Amber,
        name: Option<&str>,
    ) -> Result<(), TreeError> {
        let node = self.object_node(value, name)?;
        parent.push_child(node);
        Ok(())
    }

    /// Renders `value` as a single-line document string.
    pub fn serialize_to_string(&self, value: &dyn Amber) -> Result<String, TreeError> {
        Ok(self.serialize(value)?.to_document_string())
    }

    fn object_node(&self, value: &dyn Amber, name: Option<&str>) -> Result<Node, TreeError> {
        let mut walker = GraphWalker::new(self.registry);
        let mut node = Node::new(tags::OBJECT);
        if let Some(name) = name {
            node.set_attr(tags::NAME, name);
        }
        if self.save_root_type || value.shape() == Shape::Array {
            write_type_attrs(&mut node, &value.type_ref());
        }
        self.write_content(&mut walker, &mut node, value)?;
        Ok(node)
    }

    /// Fills `node` with the rendering of `value`: converter text for a
    /// scalar, a `properties` block for a composite, an `items` block for a
    /// collection.
    fn write_content(
        &self,
        walker: &mut GraphWalker<'_>,
        node: &mut Node,
        value: &dyn Amber,
    ) -> Result<(), TreeError> {
        match walker.classify(value) {
            ValueShape::Scalar(inner) => {
                let text = self.registry.convert_to_text(inner)?;
                node.set_text(text);
            }
            ValueShape::Composite(composite) => {
                let mut properties = Node::new(tags::PROPERTIES);
                self.write_properties(walker, &mut properties, composite);
                node.push_child(properties);
            }
            ValueShape::Array(array) => {
                let element = value.info().as_array().map(|info| info.element());
                self.write_items(walker, node, array.iter(), element)?;
            }
            ValueShape::List(list) => {
                let element = value.info().as_list().map(|info| info.element());
                self.write_items(walker, node, list.iter(), element)?;
            }
            ValueShape::Map(map) => {
                self.write_entries(walker, node, value.info().as_map(), map)?;
            }
        }
        Ok(())
    }

    /// Writes one `property` node per present property of `composite`.
    ///
    /// Absent values, empty values and values already written elsewhere in
    /// this call are left out. A property that fails to render is logged and
    /// skipped, so one bad value does not lose the rest of the object.
    fn write_properties(
        &self,
        walker: &mut GraphWalker<'_>,
        properties: &mut Node,
        composite: &dyn Composite,
    ) {
        walker.mark(composite as &dyn Amber);
        for (name, value) in composite.iter_properties() {
            let Some(value) = value else { continue };
            if value.is_empty_value() || walker.seen(value) {
                continue;
            }
            if !self.wants(walker, value) {
                continue;
            }
            match self.property_node(walker, name, value, true) {
                Ok(node) => properties.push_child(node),
                Err(error) => log::warn!("skipping property `{name}`: {error}"),
            }
        }
    }

    /// Whether the gating flags admit a property of this shape.
    fn wants(&self, walker: &GraphWalker<'_>, value: &dyn Amber) -> bool {
        match walker.classify(value) {
            ValueShape::Scalar(_) => true,
            ValueShape::Array(_) | ValueShape::List(_) | ValueShape::Map(_) => {
                self.deep_serialization || self.primary_properties_only
            }
            ValueShape::Composite(_) => self.deep_serialization,
        }
    }

    fn property_node(
        &self,
        walker: &mut GraphWalker<'_>,
        name: &str,
        value: &dyn Amber,
        with_types: bool,
    ) -> Result<Node, TreeError> {
        let mut node = Node::new(tags::PROPERTY);
        node.set_attr(tags::NAME, name);
        if with_types {
            write_type_attrs(&mut node, &value.type_ref());
        }
        self.write_content(walker, &mut node, value)?;
        Ok(node)
    }

    /// Writes an `items` block under `parent`.
    ///
    /// When the collection's element type is fully declared the items carry
    /// no type attributes; otherwise each item labels itself with its
    /// runtime type.
    fn write_items<'v>(
        &self,
        walker: &mut GraphWalker<'_>,
        parent: &mut Node,
        elements: impl Iterator<Item = &'v dyn Amber>,
        element: Option<&TypeRef>,
    ) -> Result<(), TreeError> {
        let typed = element.is_some_and(TypeRef::is_sufficient);
        let mut items = Node::new(tags::ITEMS);
        for value in elements {
            let mut item = Node::new(tags::ITEM);
            if !typed {
                write_type_attrs(&mut item, &value.type_ref());
            }
            self.write_content(walker, &mut item, value)?;
            items.push_child(item);
        }
        parent.push_child(items);
        Ok(())
    }

    /// Writes map entries as items holding a `Key` and a `Value` property.
    fn write_entries(
        &self,
        walker: &mut GraphWalker<'_>,
        parent: &mut Node,
        info: Option<&MapInfo>,
        map: &dyn Map,
    ) -> Result<(), TreeError> {
        let typed =
            info.is_some_and(|info| info.key().is_sufficient() && info.value().is_sufficient());
        let mut items = Node::new(tags::ITEMS);
        for (key, value) in map.iter() {
            let mut item = Node::new(tags::ITEM);
            let mut properties = Node::new(tags::PROPERTIES);
            properties.push_child(self.property_node(walker, tags::KEY, key, !typed)?);
            properties.push_child(self.property_node(walker, tags::VALUE, value, !typed)?);
            item.push_child(properties);
            items.push_child(item);
        }
        parent.push_child(items);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Helpers

/// Writes `type` and `assembly` attributes, leaving out the defaults every
/// reader assumes: the text type and the base library.
fn write_type_attrs(node: &mut Node, type_ref: &TypeRef) {
    let name = type_ref.name();
    if !name.is_empty() && name != TEXT_TYPE {
        node.set_attr(tags::TYPE, name);
    }
    let library = type_ref.short_library();
    if !library.is_empty() && library != DEFAULT_LIBRARY {
        node.set_attr(tags::ASSEMBLY, library);
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use amber_reflect::composite;
    use amber_reflect::ops::DynamicList;

    use super::*;

    composite!(Sensor["plant"] {
        id: u32,
        label: String,
    });

    composite!(Rig["plant"] {
        name: String,
        sensors: Vec<Sensor>,
    });

    composite!(Note["plant"] {
        title: String,
        body: Option<String>,
    });

    composite!(Wiring["plant"] {
        primary: Option<Arc<Sensor>>,
        backup: Option<Arc<Sensor>>,
    });

    composite!(Panel["plant"] {
        label: String,
        sensor: Sensor,
        readings: Vec<u32>,
    });

    composite!(Labels["plant"] {
        by_key: HashMap<String, String>,
    });

    fn registry() -> TypeRegistry {
        let registry = TypeRegistry::new();
        registry.register::<Sensor>();
        registry.register::<Rig>();
        registry
    }

    #[test]
    fn a_composite_becomes_an_object_document() {
        let registry = registry();
        let sensor = Sensor {
            id: 7,
            label: "intake".into(),
        };

        let text = TreeSerializer::new(&registry)
            .serialize_to_string(&sensor)
            .unwrap();
        assert_eq!(
            text,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
             <object><properties>\
             <property name=\"id\" type=\"u32\">7</property>\
             <property name=\"label\">intake</property>\
             </properties></object>"
        );
    }

    #[test]
    fn the_root_can_carry_name_and_type() {
        let registry = registry();
        let sensor = Sensor {
            id: 1,
            label: "a".into(),
        };

        let node = TreeSerializer::new(&registry)
            .with_save_root_type(true)
            .serialize_named(&sensor, "intake")
            .unwrap();
        assert_eq!(node.attr(tags::NAME), Some("intake"));
        assert_eq!(node.attr(tags::TYPE), Some("Sensor"));
        assert_eq!(node.attr(tags::ASSEMBLY), Some("plant"));
    }

    #[test]
    fn a_scalar_root_renders_as_text() {
        let registry = registry();

        let text = TreeSerializer::new(&registry)
            .serialize_to_string(&5_u32)
            .unwrap();
        assert_eq!(
            text,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?><object>5</object>"
        );
    }

    #[test]
    fn a_list_root_holds_items_directly() {
        let registry = registry();
        let values = vec!["a".to_string(), "b".to_string()];

        let node = TreeSerializer::new(&registry).serialize(&values).unwrap();
        assert_eq!(node.attr(tags::TYPE), None);
        assert_eq!(
            node.to_document_string(),
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
             <object><items><item>a</item><item>b</item></items></object>"
        );
    }

    #[test]
    fn an_array_root_declares_its_type() {
        let registry = registry();
        let values: Box<[u32]> = vec![3, 4].into_boxed_slice();

        let text = TreeSerializer::new(&registry)
            .serialize_to_string(&values)
            .unwrap();
        assert_eq!(
            text,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
             <object type=\"Array&lt;u32&gt;\">\
             <items><item>3</item><item>4</item></items></object>"
        );
    }

    #[test]
    fn typed_items_carry_no_type_attributes() {
        let registry = registry();
        let rig = Rig {
            name: "north".into(),
            sensors: vec![Sensor {
                id: 1,
                label: "a".into(),
            }],
        };

        let text = TreeSerializer::new(&registry)
            .serialize_to_string(&rig)
            .unwrap();
        assert_eq!(
            text,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
             <object><properties>\
             <property name=\"name\">north</property>\
             <property name=\"sensors\" type=\"List&lt;Sensor&gt;\"><items>\
             <item><properties>\
             <property name=\"id\" type=\"u32\">1</property>\
             <property name=\"label\">a</property>\
             </properties></item>\
             </items></property>\
             </properties></object>"
        );
    }

    #[test]
    fn dynamic_items_label_themselves() {
        let registry = registry();
        let mut list = DynamicList::new();
        list.push(1_u32);
        list.push(String::from("two"));

        let text = TreeSerializer::new(&registry)
            .serialize_to_string(&list)
            .unwrap();
        assert_eq!(
            text,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
             <object><items>\
             <item type=\"u32\">1</item>\
             <item>two</item>\
             </items></object>"
        );
    }

    #[test]
    fn empty_and_absent_properties_are_left_out() {
        let registry = registry();
        let note = Note {
            title: String::new(),
            body: None,
        };

        let text = TreeSerializer::new(&registry)
            .serialize_to_string(&note)
            .unwrap();
        assert_eq!(
            text,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?><object><properties/></object>"
        );
    }

    #[test]
    fn a_shared_value_is_written_once() {
        let registry = registry();
        let shared = Arc::new(Sensor {
            id: 1,
            label: "a".into(),
        });
        let wiring = Wiring {
            primary: Some(Arc::clone(&shared)),
            backup: Some(shared),
        };

        let text = TreeSerializer::new(&registry)
            .serialize_to_string(&wiring)
            .unwrap();
        assert_eq!(
            text,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
             <object><properties>\
             <property name=\"primary\" type=\"Sensor\" assembly=\"plant\"><properties>\
             <property name=\"id\" type=\"u32\">1</property>\
             <property name=\"label\">a</property>\
             </properties></property>\
             </properties></object>"
        );
    }

    #[test]
    fn shallow_serialization_keeps_scalars_only() {
        let registry = registry();
        let panel = Panel {
            label: "main".into(),
            sensor: Sensor {
                id: 1,
                label: "a".into(),
            },
            readings: vec![9],
        };

        let shallow = TreeSerializer::new(&registry)
            .with_deep_serialization(false)
            .serialize(&panel)
            .unwrap();
        let names: Vec<_> = shallow
            .child(tags::PROPERTIES)
            .unwrap()
            .children()
            .iter()
            .filter_map(|property| property.attr(tags::NAME))
            .collect();
        assert_eq!(names, ["label"]);

        let primary = TreeSerializer::new(&registry)
            .with_deep_serialization(false)
            .with_primary_properties_only(true)
            .serialize(&panel)
            .unwrap();
        let names: Vec<_> = primary
            .child(tags::PROPERTIES)
            .unwrap()
            .children()
            .iter()
            .filter_map(|property| property.attr(tags::NAME))
            .collect();
        assert_eq!(names, ["label", "readings"]);
    }

    #[test]
    fn map_entries_become_key_value_properties() {
        let registry = registry();
        let mut labels = Labels {
            by_key: HashMap::new(),
        };
        labels.by_key.insert("zone".into(), "north".into());

        let text = TreeSerializer::new(&registry)
            .serialize_to_string(&labels)
            .unwrap();
        assert_eq!(
            text,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
             <object><properties>\
             <property name=\"by_key\" type=\"Map&lt;String, String&gt;\"><items>\
             <item><properties>\
             <property name=\"Key\">zone</property>\
             <property name=\"Value\">north</property>\
             </properties></item>\
             </items></property>\
             </properties></object>"
        );
    }

    #[test]
    fn a_scalar_without_a_converter_is_an_error() {
        let registry = TypeRegistry::empty();

        let result = TreeSerializer::new(&registry).serialize(&5_u32);
        assert!(matches!(result, Err(TreeError::Convert(_))));
    }

    #[test]
    fn serialize_node_appends_to_a_parent() {
        let registry = registry();
        let sensor = Sensor {
            id: 2,
            label: "b".into(),
        };

        let mut parent = Node::new("archive");
        TreeSerializer::new(&registry)
            .serialize_node(&mut parent, &sensor, Some("latest"))
            .unwrap();

        let object = parent.child(tags::OBJECT).unwrap();
        assert_eq!(object.attr(tags::NAME), Some("latest"));
        assert!(object.child(tags::PROPERTIES).is_some());
    }
}
