//! Strict parsing of the extractor's output, and the few tree queries the
//! table view needs.
//!
//! Mismatched or unclosed elements, undeclared entity references and content
//! outside the root element are all parse errors. Entity names resolve
//! through the declarations the extractor writes into the doctype.

use roxmltree::{Document, Node, ParsingOptions};

/// Parses well-formed table markup. The internal DTD subset is allowed so
/// that declared entities resolve.
pub fn parse(xml: &str) -> Result<Document<'_>, roxmltree::Error> {
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    Document::parse_with_options(xml, options)
}

/// Every `<table>` in the document, in document order.
pub fn tables<'a, 'input>(doc: &'a Document<'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    doc.descendants().filter(|node| node.has_tag_name("table"))
}

/// Descendant elements named `name`, in document order. `node` itself is not
/// included.
pub fn elements<'a, 'input>(
    node: Node<'a, 'input>,
    name: &str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.descendants()
        .skip(1)
        .filter(move |child| child.has_tag_name(name))
}

pub fn first_element<'a, 'input>(
    node: Node<'a, 'input>,
    name: &str,
) -> Option<Node<'a, 'input>> {
    elements(node, name).next()
}

/// Concatenation of every descendant text node.
pub fn text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|child| child.is_text())
        .filter_map(|child| child.text())
        .collect()
}
