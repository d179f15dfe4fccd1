//! Names of the nodes and attributes making up the document tree format.
//!
//! The vocabulary is fixed: a document is `object` nodes carrying `name`,
//! `type` and `assembly` attributes, with `properties` and `items` blocks
//! below them. Documents written by any build of the library use these
//! exact strings, so they live here rather than inline at the use sites.

/// Root and nested value nodes.
pub const OBJECT: &str = "object";

/// Attribute holding a value's property or root name.
pub const NAME: &str = "name";

/// Attribute holding a value's registered type name.
pub const TYPE: &str = "type";

/// Attribute holding the library a type belongs to.
pub const ASSEMBLY: &str = "assembly";

/// Block node grouping the property nodes of a composite.
pub const PROPERTIES: &str = "properties";

/// A single named property below a [`PROPERTIES`] block.
pub const PROPERTY: &str = "property";

/// Block node grouping the elements of a sequence or map.
pub const ITEMS: &str = "items";

/// A single element below an [`ITEMS`] block.
pub const ITEM: &str = "item";

/// Attribute reserved for explicit element positions. Read for
/// compatibility, never written.
pub const INDEX: &str = "index";

/// Property name of a map entry's key.
pub const KEY: &str = "Key";

/// Property name of a map entry's value.
pub const VALUE: &str = "Value";

/// Node holding the document's type dictionary: a map from short keys to
/// full type records, letting repeated type attributes be abbreviated.
pub const TYPE_DICTIONARY: &str = "typedictionary";

/// Node reserved for generic argument lists of dictionary entries. Read
/// for compatibility, never written.
pub const GENERIC_TYPE_ARGUMENTS: &str = "generictypearguments";

/// Node holding a binary constructor call for types that opt out of
/// property serialization.
pub const CONSTRUCTOR: &str = "constructor";

/// Node below [`CONSTRUCTOR`] holding the base64 payload.
pub const BINARY_DATA: &str = "binarydata";
