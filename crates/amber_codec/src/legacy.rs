//! Upgrading stored context values from the legacy document format.
//!
//! Early releases stored collection-valued context entries as whole
//! documents. Current readers expect the compact record form, so an old
//! store is rewritten once on load: every value that looks like a document
//! is flattened into the stream the compact writer would produce today, and
//! everything else passes through untouched.

use std::collections::HashMap;

use crate::dom::{self, Node};
use crate::tags;
use crate::tree::TreeError;

/// The prolog that marks a stored value as a legacy document.
const DOCUMENT_MARK: &str = "<?xml";

/// Rewrites legacy document values in a context map to the compact form.
///
/// A value starting with an XML prolog is parsed and its object items are
/// joined into one comma-separated stream, which is how the compact codec
/// writes a top-level sequence. A marked value that does not parse fails
/// the upgrade.
pub fn upgrade_context(
    context: HashMap<String, String>,
) -> Result<HashMap<String, String>, TreeError> {
    context
        .into_iter()
        .map(|(key, value)| {
            let value = if value.starts_with(DOCUMENT_MARK) {
                flatten_items(&dom::parse_document(&value)?)
            } else {
                value
            };
            Ok((key, value))
        })
        .collect()
}

/// Joins the text of every `object/items/item` run in document order.
fn flatten_items(document: &Node) -> String {
    let mut parts = Vec::new();
    collect_items(document, &mut parts);
    parts.join(", ")
}

fn collect_items(node: &Node, parts: &mut Vec<String>) {
    if node.tag() == tags::OBJECT {
        for items in node.children_tagged(tags::ITEMS) {
            for item in items.children_tagged(tags::ITEM) {
                parts.push(item.inner_text());
            }
        }
    }
    for child in node.children() {
        collect_items(child, parts);
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use amber_reflect::registry::TypeRegistry;

    use super::*;
    use crate::compact;
    use crate::tree::TreeSerializer;

    #[test]
    fn list_documents_flatten_to_compact_streams() {
        let mut context = HashMap::new();
        context.insert(
            "readings".to_string(),
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
             <object><items><item>a</item><item>b</item></items></object>"
                .to_string(),
        );
        context.insert("plain".to_string(), "keep".to_string());

        let upgraded = upgrade_context(context).unwrap();
        assert_eq!(upgraded["readings"], "a, b");
        assert_eq!(upgraded["plain"], "keep");
    }

    #[test]
    fn upgraded_values_match_the_compact_writer() {
        let registry = TypeRegistry::new();
        let values = vec!["a".to_string(), "b".to_string()];

        let legacy = TreeSerializer::new(&registry)
            .serialize_to_string(&values)
            .unwrap();
        let stream = compact::encode(&registry, &values).unwrap();

        let mut context = HashMap::new();
        context.insert("values".to_string(), legacy);
        let upgraded = upgrade_context(context).unwrap();
        assert_eq!(upgraded["values"], stream);
    }

    #[test]
    fn a_document_without_items_flattens_to_nothing() {
        let mut context = HashMap::new();
        context.insert(
            "odd".to_string(),
            "<?xml version=\"1.0\" encoding=\"utf-8\"?><archive/>".to_string(),
        );

        let upgraded = upgrade_context(context).unwrap();
        assert_eq!(upgraded["odd"], "");
    }

    #[test]
    fn a_damaged_document_fails_the_upgrade() {
        let mut context = HashMap::new();
        context.insert(
            "broken".to_string(),
            "<?xml version=\"1.0\"?><object>".to_string(),
        );

        let result = upgrade_context(context);
        assert!(matches!(result, Err(TreeError::Dom(_))));
    }
}
