//! Reading `<context-credentials>` declarations out of XML documents.
//!
//! Element and attribute names are matched on their local part, so the
//! declaration may live under any namespace prefix inside a larger document.

use roxmltree::{Document, Node};
use tracing::{debug, warn};

use super::descriptor::RawSourceNode;
use super::error::ConfigError;

/// Local name of the element that declares a scope's credential sources.
pub const DECLARATION_ELEMENT: &str = "context-credentials";

/// One `<context-credentials>` element and its sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
  /// 1-based line where the declaration element starts
  pub line: u32,
  /// Child elements in document order
  pub sources: Vec<RawSourceNode>,
}

/// Finds every credentials declaration in an XML document.
///
/// # Arguments
/// * `xml` - Full XML document text.
///
/// # Returns
/// Declarations in document order. An empty vector means the document has no
/// `<context-credentials>` element.
///
/// # Errors
/// Returns [`ConfigError::Xml`] if the document is not well-formed.
pub fn read_declarations(xml: &str) -> Result<Vec<Declaration>, ConfigError> {
  let document = Document::parse(xml)?;

  let declarations: Vec<Declaration> = document
    .descendants()
    .filter(|node| node.is_element() && node.tag_name().name() == DECLARATION_ELEMENT)
    .map(|element| read_declaration(&document, element))
    .collect();

  debug!("Found {} credentials declaration(s)", declarations.len());
  Ok(declarations)
}

fn read_declaration(document: &Document<'_>, element: Node<'_, '_>) -> Declaration {
  let line = document.text_pos_at(element.range().start).row;
  let sources: Vec<RawSourceNode> = element.children().filter(Node::is_element).map(read_source).collect();

  if sources.is_empty() {
    warn!("Credentials declaration at line {line} contains no sources");
  }

  Declaration { line, sources }
}

fn read_source(element: Node<'_, '_>) -> RawSourceNode {
  element
    .attributes()
    .fold(RawSourceNode::new(element.tag_name().name()), |node, attribute| {
      node.with_attribute(attribute.name(), attribute.value())
    })
}
