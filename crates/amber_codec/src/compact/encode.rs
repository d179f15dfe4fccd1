//! Rendering values into compact records.

use amber_reflect::Amber;
use amber_reflect::ops::Composite;
use amber_reflect::registry::TypeRegistry;
use amber_reflect::walk::{GraphWalker, ValueShape};

use super::CompactError;
use crate::tags;

/// Renders a value as compact text.
///
/// A composite becomes one `{ ... }` record of its present properties in
/// declaration order; a sequence becomes its elements joined with `", "`,
/// records for composite elements and converter text otherwise; a scalar
/// becomes its converter text. Shared composites are written once per
/// call, later references are left out. A top-level map has no compact
/// form and is rejected.
pub fn encode(registry: &TypeRegistry, value: &dyn Amber) -> Result<String, CompactError> {
    let mut walker = GraphWalker::new(registry);
    match walker.classify(value) {
        ValueShape::Scalar(inner) => Ok(walker.registry().convert_to_text(inner)?),
        ValueShape::Composite(composite) => record_text(&mut walker, composite),
        ValueShape::Array(array) => stream_text(&mut walker, array.iter()),
        ValueShape::List(list) => stream_text(&mut walker, list.iter()),
        ValueShape::Map(_) => Err(CompactError::UnsupportedValue {
            type_ref: value.type_ref(),
            shape: value.shape(),
        }),
    }
}

/// Joins top-level elements with `", "`, without surrounding brackets.
fn stream_text<'v>(
    walker: &mut GraphWalker<'_>,
    elements: impl Iterator<Item = &'v dyn Amber>,
) -> Result<String, CompactError> {
    let mut pieces = Vec::new();
    for element in elements {
        pieces.push(match walker.classify(element) {
            ValueShape::Scalar(inner) => walker.registry().convert_to_text(inner)?,
            ValueShape::Composite(composite) => record_text(walker, composite)?,
            ValueShape::Array(array) => sequence_text(walker, array.iter())?,
            ValueShape::List(list) => sequence_text(walker, list.iter())?,
            ValueShape::Map(_) => {
                return Err(CompactError::UnsupportedValue {
                    type_ref: element.type_ref(),
                    shape: element.shape(),
                });
            }
        });
    }
    Ok(pieces.join(", "))
}

/// Renders one composite as a `{ ... }` record.
fn record_text(
    walker: &mut GraphWalker<'_>,
    composite: &dyn Composite,
) -> Result<String, CompactError> {
    walker.mark(composite as &dyn Amber);
    let mut members = Vec::new();
    for (name, value) in composite.iter_properties() {
        let Some(value) = value else { continue };
        if value.is_empty_value() || walker.seen(value) {
            continue;
        }
        members.push(member_text(walker, name, value)?);
    }
    Ok(format!("{{ {} }}", members.join(", ")))
}

/// Renders one `"name" : value` member. Record and sequence values stand
/// unquoted after the separator; everything else is quoted.
fn member_text(
    walker: &mut GraphWalker<'_>,
    name: &str,
    value: &dyn Amber,
) -> Result<String, CompactError> {
    let text = value_text(walker, value)?;
    if text.starts_with("{ ") || text.starts_with('[') {
        Ok(format!("\"{name}\" : {text}"))
    } else {
        Ok(format!("\"{name}\" : \"{text}\""))
    }
}

fn value_text(walker: &mut GraphWalker<'_>, value: &dyn Amber) -> Result<String, CompactError> {
    match walker.classify(value) {
        ValueShape::Scalar(inner) => Ok(walker.registry().convert_to_text(inner)?),
        ValueShape::Composite(composite) => record_text(walker, composite),
        ValueShape::Array(array) => sequence_text(walker, array.iter()),
        ValueShape::List(list) => sequence_text(walker, list.iter()),
        ValueShape::Map(map) => {
            let mut entries = Vec::new();
            for (key, entry_value) in map.iter() {
                entries.push(format!(
                    "{{ {}, {} }}",
                    member_text(walker, tags::KEY, key)?,
                    member_text(walker, tags::VALUE, entry_value)?
                ));
            }
            Ok(format!("[{}]", entries.join(", ")))
        }
    }
}

/// Renders a sequence value bracketed: scalar elements joined with `"; "`,
/// structural elements as records joined with `", "`.
fn sequence_text<'v>(
    walker: &mut GraphWalker<'_>,
    elements: impl Iterator<Item = &'v dyn Amber>,
) -> Result<String, CompactError> {
    let mut pieces = Vec::new();
    let mut structural = false;
    for element in elements {
        pieces.push(match walker.classify(element) {
            ValueShape::Scalar(inner) => walker.registry().convert_to_text(inner)?,
            ValueShape::Composite(composite) => {
                structural = true;
                record_text(walker, composite)?
            }
            ValueShape::Array(array) => {
                structural = true;
                sequence_text(walker, array.iter())?
            }
            ValueShape::List(list) => {
                structural = true;
                sequence_text(walker, list.iter())?
            }
            ValueShape::Map(_) => {
                return Err(CompactError::UnsupportedValue {
                    type_ref: element.type_ref(),
                    shape: element.shape(),
                });
            }
        });
    }
    let separator = if structural { ", " } else { "; " };
    Ok(format!("[{}]", pieces.join(separator)))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use amber_reflect::composite;
    use amber_reflect::registry::TypeRegistry;

    use super::*;

    composite!(Entry["journal"] {
        label: String,
        count: u32,
    });

    composite!(Batch["journal"] {
        name: String,
        ids: Box<[u32]>,
    });

    composite!(Leaf["journal"] {
        tag: String,
    });

    composite!(Fork["journal"] {
        left: Option<Arc<Leaf>>,
        right: Option<Arc<Leaf>>,
    });

    composite!(Labels["journal"] {
        by_key: HashMap<String, String>,
    });

    fn registry() -> TypeRegistry {
        let registry = TypeRegistry::new();
        registry.register::<Entry>();
        registry.register::<Batch>();
        registry.register::<Fork>();
        registry.register::<Labels>();
        registry
    }

    #[test]
    fn a_composite_becomes_one_record() {
        let entry = Entry {
            label: "boot".into(),
            count: 2,
        };
        assert_eq!(
            encode(&registry(), &entry).unwrap(),
            r#"{ "label" : "boot", "count" : "2" }"#
        );
    }

    #[test]
    fn scalars_use_their_converter_text() {
        let registry = registry();
        assert_eq!(encode(&registry, &37_i64).unwrap(), "37");
        assert_eq!(encode(&registry, &String::from("plain")).unwrap(), "plain");
    }

    #[test]
    fn empty_properties_are_left_out() {
        let entry = Entry {
            label: String::new(),
            count: 9,
        };
        assert_eq!(encode(&registry(), &entry).unwrap(), r#"{ "count" : "9" }"#);
    }

    #[test]
    fn sequences_join_their_elements() {
        let registry = registry();
        let entries = vec![
            Entry {
                label: "a".into(),
                count: 1,
            },
            Entry {
                label: "b".into(),
                count: 2,
            },
        ];
        assert_eq!(
            encode(&registry, &entries).unwrap(),
            r#"{ "label" : "a", "count" : "1" }, { "label" : "b", "count" : "2" }"#
        );
        assert_eq!(encode(&registry, &vec![3_u32, 4, 5]).unwrap(), "3, 4, 5");
    }

    #[test]
    fn array_properties_render_bracketed() {
        let batch = Batch {
            name: "night".into(),
            ids: vec![7, 8, 9].into_boxed_slice(),
        };
        assert_eq!(
            encode(&registry(), &batch).unwrap(),
            r#"{ "name" : "night", "ids" : [7; 8; 9] }"#
        );
    }

    #[test]
    fn map_properties_render_as_entry_records() {
        let mut by_key = HashMap::new();
        by_key.insert("zone".to_string(), "north".to_string());
        let labels = Labels { by_key };
        assert_eq!(
            encode(&registry(), &labels).unwrap(),
            r#"{ "by_key" : [{ "Key" : "zone", "Value" : "north" }] }"#
        );
    }

    #[test]
    fn a_shared_composite_is_written_once() {
        let leaf = Arc::new(Leaf { tag: "common".into() });
        let fork = Fork {
            left: Some(Arc::clone(&leaf)),
            right: Some(leaf),
        };
        assert_eq!(
            encode(&registry(), &fork).unwrap(),
            r#"{ "left" : { "tag" : "common" } }"#
        );
    }

    #[test]
    fn a_top_level_map_is_rejected() {
        let mut map = HashMap::new();
        map.insert("k".to_string(), "v".to_string());
        let registry = TypeRegistry::new();
        registry.register::<HashMap<String, String>>();
        assert!(matches!(
            encode(&registry, &map),
            Err(CompactError::UnsupportedValue { .. })
        ));
    }
}
