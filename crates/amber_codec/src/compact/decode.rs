//! Binding compact records onto declared composites.

use std::any::TypeId;

use amber_reflect::info::PropertyInfo;
use amber_reflect::ops::{Composite, ShapeMut};
use amber_reflect::registry::{ConvertError, Registrable, TypeRegistry};
use amber_reflect::{Amber, Shape};

use super::{CompactError, scan};

/// Binds the first record of `text` onto a `T`, or `None` when the text
/// holds no record.
///
/// Properties whose names are not declared on `T` are dropped; that is
/// what lets old documents keep loading after a field is retired. A value
/// its converter rejects is an error: a record that names a known property
/// but damages its value is a damaged record.
///
/// Properties of list, map or composite shape have no built-in binding;
/// use [`decode_with`] to supply one.
pub fn decode<T>(registry: &TypeRegistry, text: &str) -> Result<Option<T>, CompactError>
where
    T: Registrable + Composite,
{
    decode_with(registry, text, unbound)
}

/// Binds every record of `text` onto its own `T`.
pub fn decode_all<T>(registry: &TypeRegistry, text: &str) -> Result<Vec<T>, CompactError>
where
    T: Registrable + Composite,
{
    decode_all_with(registry, text, unbound)
}

/// [`decode`] with a fallback binder for properties outside the built-in
/// shapes, called with the value under construction, the property's
/// descriptor and the raw value text.
pub fn decode_with<T, F>(
    registry: &TypeRegistry,
    text: &str,
    mut handler: F,
) -> Result<Option<T>, CompactError>
where
    T: Registrable + Composite,
    F: FnMut(&mut T, &PropertyInfo, &str) -> Result<(), CompactError>,
{
    match scan::next_record(text, 0)? {
        Some(record) => Ok(Some(bind_record(registry, record.body(), &mut handler)?)),
        None => Ok(None),
    }
}

/// [`decode_all`] with a fallback binder, applied record by record.
pub fn decode_all_with<T, F>(
    registry: &TypeRegistry,
    text: &str,
    mut handler: F,
) -> Result<Vec<T>, CompactError>
where
    T: Registrable + Composite,
    F: FnMut(&mut T, &PropertyInfo, &str) -> Result<(), CompactError>,
{
    let mut values = Vec::new();
    for record in scan::records(text) {
        values.push(bind_record(registry, record?.body(), &mut handler)?);
    }
    Ok(values)
}

fn unbound<T>(_: &mut T, info: &PropertyInfo, _: &str) -> Result<(), CompactError> {
    Err(CompactError::UnsupportedProperty {
        name: info.name().to_string(),
        shape: info.shape(),
    })
}

fn bind_record<T, F>(
    registry: &TypeRegistry,
    body: &str,
    handler: &mut F,
) -> Result<T, CompactError>
where
    T: Registrable + Composite,
    F: FnMut(&mut T, &PropertyInfo, &str) -> Result<(), CompactError>,
{
    let mut value = T::default();
    let Some(descriptor) = T::type_info().as_composite() else {
        return Ok(value);
    };
    for pair in scan::properties(body) {
        let (name, text) = pair?;
        let Some(info) = descriptor.property(name) else {
            continue;
        };
        if info.ty_id() == TypeId::of::<String>() {
            store(&mut value, name, Box::new(text.into_owned()));
            continue;
        }
        match info.shape() {
            Shape::Scalar => {
                let Some(converter) = registry.converter_for(info.ty_id()) else {
                    handler(&mut value, info, &text)?;
                    continue;
                };
                let parsed = converter.parse(&text).map_err(|cause| ConvertError::FromText {
                    type_ref: info.type_ref().clone(),
                    text: text.into_owned(),
                    cause,
                })?;
                store(&mut value, name, parsed);
            }
            Shape::Array => {
                if let Some(array) = array_from_text(registry, info, &text)? {
                    store(&mut value, name, array);
                }
            }
            _ => handler(&mut value, info, &text)?,
        }
    }
    Ok(value)
}

fn store<T: Composite>(value: &mut T, name: &str, boxed: Box<dyn Amber>) {
    if value.set_property(name, boxed).is_err() {
        log::debug!("bound value for `{name}` does not fit its slot");
    }
}

/// Rebuilds an array property from its rendered element run. Returns
/// `Ok(None)` when the element type has no converter to rebuild with, in
/// which case the property is left at its default.
fn array_from_text(
    registry: &TypeRegistry,
    info: &PropertyInfo,
    text: &str,
) -> Result<Option<Box<dyn Amber>>, CompactError> {
    let Some(array_info) = info.info().as_array() else {
        return Ok(None);
    };
    let Ok(element_entry) = registry.resolve(array_info.element()) else {
        return Ok(None);
    };
    let Some(converter) = registry.converter_for(element_entry.ty()) else {
        return Ok(None);
    };
    let Some(array_entry) = registry.entry(info.ty_id()) else {
        return Ok(None);
    };

    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(trimmed);
    let pieces: Vec<&str> = trimmed
        .split("; ")
        .filter(|piece| !piece.is_empty())
        .collect();

    let mut array = registry.construct_sized(&array_entry, pieces.len())?;
    if let ShapeMut::Array(slots) = array.shape_mut() {
        for (index, piece) in pieces.iter().enumerate() {
            let element = converter.parse(piece).map_err(|cause| ConvertError::FromText {
                type_ref: element_entry.type_ref().clone(),
                text: (*piece).to_string(),
                cause,
            })?;
            if slots.try_set(index, element).is_err() {
                log::debug!("element {index} does not fit array `{}`", info.name());
            }
        }
    }
    Ok(Some(array))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use amber_reflect::composite;
    use amber_reflect::registry::TypeRegistry;

    use super::super::encode::encode;
    use super::*;

    composite!(Entry["journal"] {
        label: String,
        count: u32,
    });

    composite!(Batch["journal"] {
        name: String,
        ids: Box<[u32]>,
    });

    composite!(Report["journal"] {
        title: String,
        lines: Vec<String>,
    });

    fn registry() -> TypeRegistry {
        let registry = TypeRegistry::new();
        registry.register::<Entry>();
        registry.register::<Batch>();
        registry.register::<Report>();
        registry
    }

    #[test]
    fn a_record_round_trips_through_encode() {
        let registry = registry();
        let entry = Entry {
            label: "boot".into(),
            count: 2,
        };
        let text = encode(&registry, &entry).unwrap();
        let back: Entry = decode(&registry, &text).unwrap().unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn empty_text_holds_no_record() {
        let registry = registry();
        assert_eq!(decode::<Entry>(&registry, "").unwrap(), None);
        assert_eq!(decode::<Entry>(&registry, "no records here").unwrap(), None);
    }

    #[test]
    fn unknown_properties_are_dropped() {
        let registry = registry();
        let back: Entry = decode(&registry, r#"{ "retired" : "x", "count" : "4" }"#)
            .unwrap()
            .unwrap();
        assert_eq!(back.count, 4);
        assert_eq!(back.label, "");
    }

    #[test]
    fn a_damaged_scalar_is_an_error() {
        let registry = registry();
        let result = decode::<Entry>(&registry, r#"{ "count" : "many" }"#);
        assert!(matches!(result, Err(CompactError::Convert(_))));
    }

    #[test]
    fn decode_all_binds_each_record() {
        let registry = registry();
        let text = r#"{ "label" : "a", "count" : "1" }, { "label" : "b", "count" : "2" }"#;
        let entries: Vec<Entry> = decode_all(&registry, text).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].label, "a");
        assert_eq!(entries[1].count, 2);
    }

    #[test]
    fn array_properties_are_rebuilt_at_their_length() {
        let registry = registry();
        let batch = Batch {
            name: "night".into(),
            ids: vec![7, 8, 9].into_boxed_slice(),
        };
        let text = encode(&registry, &batch).unwrap();
        let back: Batch = decode(&registry, &text).unwrap().unwrap();
        assert_eq!(back, batch);

        let bare: Batch = decode(&registry, r#"{ "ids" : "1; 2" }"#).unwrap().unwrap();
        assert_eq!(bare.ids.as_ref(), [1, 2]);
    }

    #[test]
    fn an_empty_sequence_rebuilds_empty() {
        let registry = registry();
        let back: Batch = decode(&registry, r#"{ "ids" : [], "name" : "x" }"#)
            .unwrap()
            .unwrap();
        assert!(back.ids.is_empty());
        assert_eq!(back.name, "x");
    }

    #[test]
    fn a_damaged_array_element_is_an_error() {
        let registry = registry();
        let result = decode::<Batch>(&registry, r#"{ "ids" : [1; x] }"#);
        assert!(matches!(result, Err(CompactError::Convert(_))));
    }

    #[test]
    fn unbound_shapes_error_without_a_handler() {
        let registry = registry();
        let result = decode::<Report>(&registry, r#"{ "lines" : [a; b] }"#);
        assert!(matches!(
            result,
            Err(CompactError::UnsupportedProperty { .. })
        ));
    }

    #[test]
    fn a_handler_binds_shapes_the_format_cannot() {
        let registry = registry();
        let text = r#"{ "title" : "daily", "lines" : [up; down] }"#;
        let report: Report = decode_with(&registry, text, |report: &mut Report, info, raw| {
            assert_eq!(info.name(), "lines");
            let raw = raw.trim_start_matches('[').trim_end_matches(']');
            report.lines = raw.split("; ").map(str::to_string).collect();
            Ok(())
        })
        .unwrap()
        .unwrap();
        assert_eq!(report.title, "daily");
        assert_eq!(report.lines, ["up", "down"]);
    }

    #[test]
    fn a_malformed_stream_fails_fast() {
        let registry = registry();
        let result = decode::<Entry>(&registry, r#"{ "label" : "x"#);
        assert!(matches!(
            result,
            Err(CompactError::MalformedRecord { .. })
        ));
    }
}
