//! Reading document trees back into values.

use std::collections::HashMap;

use amber_reflect::composite;
use amber_reflect::info::{ListInfo, MapInfo};
use amber_reflect::ops::{Array, Composite, List, Map, ShapeMut};
use amber_reflect::registry::{Registrable, TypeRegistry};
use amber_reflect::{Amber, DEFAULT_LIBRARY, Shape, TEXT_TYPE, TypeRef};

use super::TreeError;
use crate::dom::{self, Node};
use crate::tags;

// -----------------------------------------------------------------------------
// TypeRecord

composite!(
    /// One entry of a document's embedded type dictionary.
    ///
    /// Documents that abbreviate their type attributes carry a
    /// `typedictionary` block mapping each abbreviation to the full type it
    /// stands for. The block is an ordinary serialized map with this record
    /// as its value type, so reading it is just another deserialization.
    TypeRecord {
        type_name: String,
        library_name: String,
    }
);

// -----------------------------------------------------------------------------
// ObjectInfo

/// What an object node declares about its value, before the registry gets
/// involved.
///
/// Collected from the node's attributes and children: the optional slot
/// name, the declared type with the wire defaults applied, the node's text,
/// and the binary constructor payload when one is present. A `type`
/// attribute matching a dictionary abbreviation is expanded here.
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    name: Option<String>,
    type_ref: TypeRef,
    value: String,
    ctor_param: Option<TypeRef>,
    ctor_payload: Option<String>,
}

impl ObjectInfo {
    /// Reads the declaration off a node.
    ///
    /// A missing `type` attribute means the text type and a missing
    /// `assembly` attribute means the base library, so plain string nodes
    /// need no attributes at all.
    pub fn read(node: &Node, types: &HashMap<String, TypeRef>) -> Self {
        let type_key = node.attr(tags::TYPE).unwrap_or(TEXT_TYPE);
        let type_ref = match types.get(type_key) {
            Some(type_ref) => type_ref.clone(),
            None => TypeRef::new(
                type_key.to_string(),
                node.attr(tags::ASSEMBLY).unwrap_or(DEFAULT_LIBRARY).to_string(),
            ),
        };
        let data = node
            .child(tags::CONSTRUCTOR)
            .and_then(|ctor| ctor.child(tags::BINARY_DATA));
        let (ctor_param, ctor_payload) = match data {
            Some(data) => (
                Some(TypeRef::new(
                    data.attr(tags::TYPE).unwrap_or(TEXT_TYPE).to_string(),
                    data.attr(tags::ASSEMBLY).unwrap_or(DEFAULT_LIBRARY).to_string(),
                )),
                Some(data.inner_text()),
            ),
            None => (None, None),
        };
        Self {
            name: node.attr(tags::NAME).map(str::to_string),
            type_ref,
            value: node.inner_text(),
            ctor_param,
            ctor_payload,
        }
    }

    /// The node's `name` attribute.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The declared type, defaults applied and abbreviations expanded.
    #[inline]
    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    /// The node's text, the value of a scalar node.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The declared type of the constructor payload.
    #[inline]
    pub fn ctor_param(&self) -> Option<&TypeRef> {
        self.ctor_param.as_ref()
    }

    /// The base64 constructor payload.
    #[inline]
    pub fn ctor_payload(&self) -> Option<&str> {
        self.ctor_payload.as_deref()
    }

    /// Whether the declared type names both a type and a library.
    #[inline]
    pub fn is_sufficient(&self) -> bool {
        self.type_ref.is_sufficient()
    }
}

// -----------------------------------------------------------------------------
// TreeDeserializer

/// Reads document trees back into values.
///
/// The reader mirrors [`TreeSerializer`](super::TreeSerializer):
/// `properties` blocks fill composites, `items` blocks fill collections,
/// node text goes through the registered converters. Types come from each
/// node's `type` and `assembly` attributes, resolved through the registry
/// with the text type and the base library as defaults.
///
/// Damaged values degrade instead of failing the read: text that does not
/// parse falls back to the type's default, a property the target has no
/// slot for is dropped, and a value that does not fit its slot is dropped
/// and logged. What does fail the read is structural damage, a declared
/// type the registry does not know, and creation failures the caller did
/// not ask to ignore.
pub struct TreeDeserializer<'r> {
    registry: &'r TypeRegistry,
    ignore_creation_errors: bool,
}

impl<'r> TreeDeserializer<'r> {
    /// Creates a reader over the registry.
    ///
    /// The type dictionary's own types are registered here, so any document
    /// carrying one can be read without further setup.
    pub fn new(registry: &'r TypeRegistry) -> Self {
        registry.register::<TypeRecord>();
        registry.register::<HashMap<String, TypeRecord>>();
        Self {
            registry,
            ignore_creation_errors: false,
        }
    }

    /// Turns creation failures on property nodes into dropped properties.
    ///
    /// The root still fails: ignoring its creation would leave nothing to
    /// return.
    #[must_use]
    pub fn with_ignore_creation_errors(mut self, ignore: bool) -> Self {
        self.ignore_creation_errors = ignore;
        self
    }

    /// Reads a value of `T` from document text.
    ///
    /// Empty input reads as `T::default()`, matching how absent values are
    /// stored.
    pub fn deserialize_str<T: Registrable>(&self, text: &str) -> Result<T, TreeError> {
        if text.is_empty() {
            return Ok(T::default());
        }
        let document = dom::parse_document(text)?;
        self.deserialize_node(&document)
    }

    /// Reads a value of `T` from a parsed document.
    ///
    /// The root's type attributes are ignored, the caller has already
    /// chosen the type; only an array root's item count is taken from the
    /// document, since arrays are created at their final size.
    pub fn deserialize_node<T: Registrable>(&self, document: &Node) -> Result<T, TreeError> {
        let root = find_root(document)?;
        let types = self.read_type_dictionary(root);
        let entry = T::type_entry();
        let mut value: Box<dyn Amber> = if entry.shape() == Shape::Array {
            self.registry.construct_sized(&entry, item_count(root))?
        } else {
            let text = root.inner_text();
            self.registry.construct(&entry, Some(text.as_str()))
        };
        self.fill(&mut *value, root, &types)?;
        value
            .take::<T>()
            .map_err(|_| TreeError::Malformed("value is not of the requested type"))
    }

    /// Reads a value whose type the document itself declares.
    pub fn deserialize_dynamic(&self, text: &str) -> Result<Box<dyn Amber>, TreeError> {
        let document = dom::parse_document(text)?;
        self.deserialize_dynamic_node(&document)
    }

    /// Reads a self-describing value from a parsed document.
    pub fn deserialize_dynamic_node(&self, document: &Node) -> Result<Box<dyn Amber>, TreeError> {
        let root = find_root(document)?;
        let types = self.read_type_dictionary(root);
        self.node_object(root, &types)
    }

    /// Reads the document's embedded type dictionary, if it carries one.
    ///
    /// The wire block is a serialized map of [`TypeRecord`] entries; records
    /// naming both a type and a library become the abbreviation table for
    /// the rest of the read. A dictionary that cannot be read is treated as
    /// absent; the node types then stand for themselves.
    fn read_type_dictionary(&self, root: &Node) -> HashMap<String, TypeRef> {
        let Some(node) = root.child(tags::TYPE_DICTIONARY) else {
            return HashMap::new();
        };
        let none = HashMap::new();
        match self.node_object(node, &none) {
            Ok(value) => match value.take::<HashMap<String, TypeRecord>>() {
                Ok(records) => records
                    .into_iter()
                    .filter(|(_, record)| {
                        !record.type_name.is_empty() && !record.library_name.is_empty()
                    })
                    .map(|(key, record)| (key, TypeRef::new(record.type_name, record.library_name)))
                    .collect(),
                Err(_) => {
                    log::debug!("type dictionary is not a type map, ignoring it");
                    HashMap::new()
                }
            },
            Err(error) => {
                log::debug!("unreadable type dictionary, ignoring it: {error}");
                HashMap::new()
            }
        }
    }

    /// Creates and fills the value a node describes.
    fn node_object(
        &self,
        node: &Node,
        types: &HashMap<String, TypeRef>,
    ) -> Result<Box<dyn Amber>, TreeError> {
        let mut value = self.node_value(node, types)?;
        self.fill(&mut *value, node, types)?;
        Ok(value)
    }

    /// Creates the value a node describes, without filling it.
    ///
    /// A binary constructor payload takes precedence over everything else.
    /// Arrays are created at the size their items declare. Anything else is
    /// built from the node's text, falling back to the type's default.
    fn node_value(
        &self,
        node: &Node,
        types: &HashMap<String, TypeRef>,
    ) -> Result<Box<dyn Amber>, TreeError> {
        let info = ObjectInfo::read(node, types);
        let entry = self.registry.resolve(info.type_ref())?;
        if let Some(payload) = info.ctor_payload() {
            return Ok(self.registry.construct_binary(&entry, payload)?);
        }
        if entry.shape() == Shape::Array {
            return Ok(self.registry.construct_sized(&entry, item_count(node))?);
        }
        Ok(self.registry.construct(&entry, Some(info.value())))
    }

    /// Fills a created value from the node's children, by shape.
    fn fill(
        &self,
        value: &mut dyn Amber,
        node: &Node,
        types: &HashMap<String, TypeRef>,
    ) -> Result<(), TreeError> {
        let info = value.info();
        match value.shape_mut() {
            ShapeMut::Composite(composite) => self.fill_properties(composite, node, types),
            ShapeMut::List(list) => self.fill_list(list, info.as_list(), node, types),
            ShapeMut::Array(array) => self.fill_array(array, node, types),
            ShapeMut::Map(map) => self.fill_map(map, info.as_map(), node, types),
            ShapeMut::Scalar(_) => Ok(()),
        }
    }

    /// Fills a composite from its `properties` block.
    ///
    /// Nameless property nodes are skipped. A declared type that does not
    /// resolve fails the document; a value the target has no slot for is
    /// dropped, and one that does not fit its slot is dropped and logged.
    fn fill_properties(
        &self,
        composite: &mut dyn Composite,
        node: &Node,
        types: &HashMap<String, TypeRef>,
    ) -> Result<(), TreeError> {
        let Some(properties) = node.child(tags::PROPERTIES) else {
            return Ok(());
        };
        for property in properties.children_tagged(tags::PROPERTY) {
            let Some(name) = property.attr(tags::NAME) else {
                continue;
            };
            let mut value = match self.node_value(property, types) {
                Ok(value) => value,
                Err(TreeError::Create(error)) if self.ignore_creation_errors => {
                    log::debug!("skipping property `{name}`: {error}");
                    continue;
                }
                Err(error) => return Err(error),
            };
            self.fill(&mut *value, property, types)?;
            if composite.set_property(name, value).is_err() {
                log::debug!("value for property `{name}` does not fit, dropping it");
            }
        }
        Ok(())
    }

    /// Fills a list from its `items` block.
    ///
    /// A typed list creates every element from its declared element type;
    /// in an untyped list each item declares its own.
    fn fill_list(
        &self,
        list: &mut dyn List,
        info: Option<&ListInfo>,
        node: &Node,
        types: &HashMap<String, TypeRef>,
    ) -> Result<(), TreeError> {
        let Some(items) = node.child(tags::ITEMS) else {
            return Ok(());
        };
        let element = info.map(ListInfo::element).filter(|e| e.is_sufficient());
        let entry = element.map(|e| self.registry.resolve(e)).transpose()?;
        for item in items.children_tagged(tags::ITEM) {
            let value = match &entry {
                Some(entry) => {
                    let text = item.inner_text();
                    let mut value = self.registry.construct(entry, Some(text.as_str()));
                    self.fill(&mut *value, item, types)?;
                    value
                }
                None => self.node_object(item, types)?,
            };
            if list.try_push(value).is_err() {
                log::debug!("item does not fit the list, dropping it");
            }
        }
        Ok(())
    }

    /// Fills an array from its `items` block, by position.
    fn fill_array(
        &self,
        array: &mut dyn Array,
        node: &Node,
        types: &HashMap<String, TypeRef>,
    ) -> Result<(), TreeError> {
        let Some(items) = node.child(tags::ITEMS) else {
            return Ok(());
        };
        let element = array.element();
        let entry = self.registry.resolve(&element)?;
        for (index, item) in items.children_tagged(tags::ITEM).enumerate() {
            let text = item.inner_text();
            let mut value = self.registry.construct(&entry, Some(text.as_str()));
            self.fill(&mut *value, item, types)?;
            if array.try_set(index, value).is_err() {
                log::debug!("item {index} does not fit the array, dropping it");
            }
        }
        Ok(())
    }

    /// Fills a map from its `items` block of `Key`/`Value` properties.
    ///
    /// Keys are created from their text alone; values are created and then
    /// filled like any other node. An entry missing its `Value` property,
    /// and an entry that does not fit the map, are dropped.
    fn fill_map(
        &self,
        map: &mut dyn Map,
        info: Option<&MapInfo>,
        node: &Node,
        types: &HashMap<String, TypeRef>,
    ) -> Result<(), TreeError> {
        let Some(items) = node.child(tags::ITEMS) else {
            return Ok(());
        };
        let entries = match info {
            Some(info) if info.key().is_sufficient() && info.value().is_sufficient() => Some((
                self.registry.resolve(info.key())?,
                self.registry.resolve(info.value())?,
            )),
            _ => None,
        };
        for item in items.children_tagged(tags::ITEM) {
            let Some(properties) = item.child(tags::PROPERTIES) else {
                continue;
            };
            let find = |name: &str| {
                properties
                    .children_tagged(tags::PROPERTY)
                    .find(|property| property.attr(tags::NAME) == Some(name))
            };
            let Some(key_node) = find(tags::KEY) else {
                continue;
            };
            let Some(value_node) = find(tags::VALUE) else {
                log::debug!("map entry without a value, dropping it");
                continue;
            };
            let key = match &entries {
                Some((key_entry, _)) => {
                    let text = key_node.inner_text();
                    self.registry.construct(key_entry, Some(text.as_str()))
                }
                None => self.node_value(key_node, types)?,
            };
            let value = match &entries {
                Some((_, value_entry)) => {
                    let text = value_node.inner_text();
                    let mut value = self.registry.construct(value_entry, Some(text.as_str()));
                    self.fill(&mut *value, value_node, types)?;
                    value
                }
                None => self.node_object(value_node, types)?,
            };
            if map.try_insert(key, value).is_err() {
                log::debug!("entry does not fit the map, dropping it");
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Helpers

/// Finds the `object` root: the document root itself, or its direct child.
fn find_root(document: &Node) -> Result<&Node, TreeError> {
    if document.tag() == tags::OBJECT {
        return Ok(document);
    }
    document
        .child(tags::OBJECT)
        .ok_or(TreeError::Malformed("document has no object node"))
}

/// Counts the items declared under a node, for sizing arrays.
fn item_count(node: &Node) -> usize {
    node.child(tags::ITEMS)
        .map(|items| items.children_tagged(tags::ITEM).count())
        .unwrap_or(0)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use amber_reflect::ops::{DynamicComposite, DynamicList};
    use amber_reflect::registry::{FromBinary, TypeEntry};
    use base64::prelude::{Engine as _, BASE64_STANDARD};

    use super::super::ser::TreeSerializer;
    use super::*;

    composite!(Sensor["plant"] {
        id: u32,
        label: String,
    });

    composite!(Rig["plant"] {
        name: String,
        sensors: Vec<Sensor>,
    });

    composite!(Labels["plant"] {
        by_key: HashMap<String, String>,
    });

    composite!(Snapshot["plant"] {
        payload: String,
    });

    impl FromBinary for Snapshot {
        fn from_bytes(bytes: &[u8]) -> Result<Self, String> {
            Ok(Self {
                payload: String::from_utf8(bytes.to_vec()).map_err(|error| error.to_string())?,
            })
        }
    }

    composite!(Vault["plant"] {
        snap: Snapshot,
    });

    composite!(Calib["plant"] {
        gains: Box<[u32]>,
    });

    fn registry() -> TypeRegistry {
        let registry = TypeRegistry::new();
        registry.register::<Sensor>();
        registry.register::<Rig>();
        registry.register::<Labels>();
        registry
    }

    #[test]
    fn a_document_round_trips_into_its_type() {
        let registry = registry();
        let sensor = Sensor {
            id: 7,
            label: "intake".into(),
        };

        let text = TreeSerializer::new(&registry)
            .serialize_to_string(&sensor)
            .unwrap();
        let back: Sensor = TreeDeserializer::new(&registry)
            .deserialize_str(&text)
            .unwrap();
        assert_eq!(back, sensor);
    }

    #[test]
    fn empty_input_reads_as_default() {
        let registry = registry();

        let back: Sensor = TreeDeserializer::new(&registry).deserialize_str("").unwrap();
        assert_eq!(back, Sensor::default());
    }

    #[test]
    fn a_scalar_document_parses_its_text() {
        let registry = registry();

        let value: u32 = TreeDeserializer::new(&registry)
            .deserialize_str("<object>5</object>")
            .unwrap();
        assert_eq!(value, 5);
    }

    #[test]
    fn the_object_root_may_sit_under_a_wrapper() {
        let registry = registry();

        let value: u32 = TreeDeserializer::new(&registry)
            .deserialize_str("<archive><object>9</object></archive>")
            .unwrap();
        assert_eq!(value, 9);
    }

    #[test]
    fn a_document_without_an_object_root_is_an_error() {
        let registry = registry();

        let result: Result<Sensor, _> =
            TreeDeserializer::new(&registry).deserialize_str("<other/>");
        assert!(matches!(result, Err(TreeError::Malformed(_))));
    }

    #[test]
    fn unknown_properties_are_dropped() {
        let registry = registry();
        let text = "<object><properties>\
                    <property name=\"ghost\">9</property>\
                    <property name=\"id\" type=\"u32\">3</property>\
                    </properties></object>";

        let back: Sensor = TreeDeserializer::new(&registry)
            .deserialize_str(text)
            .unwrap();
        assert_eq!(back.id, 3);
        assert_eq!(back.label, "");
    }

    #[test]
    fn nameless_properties_are_skipped() {
        let registry = registry();
        let text = "<object><properties><property>9</property></properties></object>";

        let back: Sensor = TreeDeserializer::new(&registry)
            .deserialize_str(text)
            .unwrap();
        assert_eq!(back, Sensor::default());
    }

    #[test]
    fn an_unresolvable_type_is_an_error() {
        let registry = registry();
        let text = "<object><properties>\
                    <property name=\"id\" type=\"Mystery\" assembly=\"void\">1</property>\
                    </properties></object>";

        let result: Result<Sensor, _> = TreeDeserializer::new(&registry).deserialize_str(text);
        assert!(matches!(result, Err(TreeError::Resolve(_))));
    }

    #[test]
    fn a_mismatched_value_is_dropped() {
        let registry = registry();
        let text = "<object><properties>\
                    <property name=\"id\">seven</property>\
                    <property name=\"label\">ok</property>\
                    </properties></object>";

        let back: Sensor = TreeDeserializer::new(&registry)
            .deserialize_str(text)
            .unwrap();
        assert_eq!(back.id, 0);
        assert_eq!(back.label, "ok");
    }

    #[test]
    fn arrays_are_sized_from_their_items() {
        let registry = registry();
        let text = "<object type=\"Array&lt;u32&gt;\">\
                    <items><item>3</item><item>4</item><item>5</item></items></object>";

        let values: Box<[u32]> = TreeDeserializer::new(&registry)
            .deserialize_str(text)
            .unwrap();
        assert_eq!(values.as_ref(), [3, 4, 5]);
    }

    #[test]
    fn an_array_property_is_sized_from_its_items() {
        let registry = registry();
        registry.register::<Calib>();
        let text = "<object><properties>\
                    <property name=\"gains\" type=\"Array&lt;u32&gt;\">\
                    <items><item>2</item><item>4</item><item>8</item></items>\
                    </property></properties></object>";

        let back: Calib = TreeDeserializer::new(&registry)
            .deserialize_str(text)
            .unwrap();
        assert_eq!(back.gains.as_ref(), [2, 4, 8]);
    }

    #[test]
    fn nested_composites_round_trip() {
        let registry = registry();
        let rig = Rig {
            name: "north".into(),
            sensors: vec![
                Sensor {
                    id: 1,
                    label: "a".into(),
                },
                Sensor {
                    id: 2,
                    label: "b".into(),
                },
            ],
        };

        let text = TreeSerializer::new(&registry)
            .serialize_to_string(&rig)
            .unwrap();
        let back: Rig = TreeDeserializer::new(&registry).deserialize_str(&text).unwrap();
        assert_eq!(back, rig);
    }

    #[test]
    fn map_entries_round_trip() {
        let registry = registry();
        let mut labels = Labels {
            by_key: HashMap::new(),
        };
        labels.by_key.insert("zone".into(), "north".into());

        let text = TreeSerializer::new(&registry)
            .serialize_to_string(&labels)
            .unwrap();
        let back: Labels = TreeDeserializer::new(&registry)
            .deserialize_str(&text)
            .unwrap();
        assert_eq!(back, labels);
    }

    #[test]
    fn dynamic_documents_declare_their_root_type() {
        let registry = registry();
        let sensor = Sensor {
            id: 4,
            label: "vent".into(),
        };

        let text = TreeSerializer::new(&registry)
            .with_save_root_type(true)
            .serialize_to_string(&sensor)
            .unwrap();
        let value = TreeDeserializer::new(&registry)
            .deserialize_dynamic(&text)
            .unwrap();
        assert_eq!(value.take::<Sensor>().ok(), Some(sensor));
    }

    #[test]
    fn a_type_dictionary_expands_abbreviations() {
        let registry = registry();
        let text = "<object type=\"1\">\
                    <typedictionary type=\"Map&lt;String, TypeRecord&gt;\"><items><item>\
                    <properties>\
                    <property name=\"Key\">1</property>\
                    <property name=\"Value\" type=\"TypeRecord\"><properties>\
                    <property name=\"type_name\">Sensor</property>\
                    <property name=\"library_name\">plant</property>\
                    </properties></property>\
                    </properties>\
                    </item></items></typedictionary>\
                    <properties>\
                    <property name=\"id\" type=\"u32\">8</property>\
                    <property name=\"label\">relay</property>\
                    </properties></object>";

        let value = TreeDeserializer::new(&registry)
            .deserialize_dynamic(text)
            .unwrap();
        let sensor = value.take::<Sensor>().ok();
        assert_eq!(
            sensor,
            Some(Sensor {
                id: 8,
                label: "relay".into(),
            })
        );
    }

    #[test]
    fn binary_constructors_rebuild_from_payload() {
        let registry = registry();
        registry.register_entry(TypeEntry::of::<Snapshot>().with_binary::<Snapshot>(), None);
        registry.register::<Vault>();

        let payload = BASE64_STANDARD.encode("hello");
        let text = format!(
            "<object><properties>\
             <property name=\"snap\" type=\"Snapshot\" assembly=\"plant\">\
             <constructor><binarydata>{payload}</binarydata></constructor>\
             </property></properties></object>"
        );

        let back: Vault = TreeDeserializer::new(&registry)
            .deserialize_str(&text)
            .unwrap();
        assert_eq!(back.snap.payload, "hello");
    }

    #[test]
    fn creation_errors_can_be_ignored() {
        let registry = registry();
        registry.register_entry(TypeEntry::of::<Snapshot>().with_binary::<Snapshot>(), None);
        registry.register::<Vault>();

        let text = "<object><properties>\
                    <property name=\"snap\" type=\"Snapshot\" assembly=\"plant\">\
                    <constructor><binarydata>!!!</binarydata></constructor>\
                    </property></properties></object>";

        let strict: Result<Vault, _> = TreeDeserializer::new(&registry).deserialize_str(text);
        assert!(matches!(strict, Err(TreeError::Create(_))));

        let tolerant: Vault = TreeDeserializer::new(&registry)
            .with_ignore_creation_errors(true)
            .deserialize_str(text)
            .unwrap();
        assert_eq!(tolerant.snap, Snapshot::default());
    }

    #[test]
    fn untyped_items_declare_themselves() {
        let registry = registry();
        registry.register_entry(TypeEntry::of::<DynamicList>(), None);

        let text = "<object type=\"DynamicList\"><items>\
                    <item type=\"u32\">1</item>\
                    <item>two</item>\
                    </items></object>";

        let value = TreeDeserializer::new(&registry)
            .deserialize_dynamic(text)
            .unwrap();
        let list = value.downcast_ref::<DynamicList>().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(0).and_then(|v| v.downcast_ref::<u32>()), Some(&1));
        assert_eq!(
            list.get(1).and_then(|v| v.downcast_ref::<String>()),
            Some(&"two".to_string())
        );
    }

    #[test]
    fn an_unregistered_schema_fills_a_dynamic_record() {
        let registry = registry();
        registry.register_entry(TypeEntry::of::<DynamicComposite>(), None);

        let text = "<object type=\"DynamicComposite\"><properties>\
                    <property name=\"anything\">goes</property>\
                    </properties></object>";

        let value = TreeDeserializer::new(&registry)
            .deserialize_dynamic(text)
            .unwrap();
        let record = value.downcast_ref::<DynamicComposite>().unwrap();
        assert_eq!(
            record
                .property("anything")
                .and_then(|v| v.downcast_ref::<String>()),
            Some(&"goes".to_string())
        );
    }
}
