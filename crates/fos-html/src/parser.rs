//! HTML5 Parser implementation
//!
//! Uses html5ever's built-in RcDom and converts to our DOM format.

use std::io::Read;

use fos_dom::{Document, DomTree, Node, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::Result;

/// HTML5 parser
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a document URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document> {
        self.parse_reader(&mut html.as_bytes(), url)
    }

    /// Parse HTML from any byte source
    pub fn parse_reader<R: Read>(&self, input: &mut R, url: &str) -> Result<Document> {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(input)?;

        let mut document = Document::empty(url);
        self.convert_node(&dom.document, document.tree_mut(), NodeId::ROOT);
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        Ok(document)
    }

    /// Convert an RcDom node to our DOM format
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) {
        match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent);
                }
            }
            RcNodeData::Doctype { name, .. } => {
                let id = tree.push(Node::doctype(name.to_string()));
                Self::link(tree, parent, id);
            }
            RcNodeData::Text { contents } => {
                let id = tree.create_text(&contents.borrow());
                Self::link(tree, parent, id);
            }
            RcNodeData::Comment { contents } => {
                let id = tree.create_comment(contents);
                Self::link(tree, parent, id);
            }
            RcNodeData::Element { name, attrs, .. } => {
                let mut node = Node::element(&name.local);
                if let Some(elem) = node.as_element_mut() {
                    for attr in attrs.borrow().iter() {
                        elem.set_attr(&attr.name.local, attr.value.to_string());
                    }
                }
                let id = tree.push(node);
                Self::link(tree, parent, id);

                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, id);
                }
            }
            RcNodeData::ProcessingInstruction { .. } => {}
        }
    }

    fn link(tree: &mut DomTree, parent: NodeId, child: NodeId) {
        if let Err(err) = tree.append_child(parent, child) {
            tracing::warn!(?parent, ?child, %err, "dropping unlinkable node");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::new().parse(html).unwrap();

        assert!(doc.tree().len() > 1, "Expected more than 1 node, got {}", doc.tree().len());
        assert_eq!(doc.title(), "Test");
        assert_eq!(doc.text_content(doc.body()), "Hello");
    }

    #[test]
    fn test_parse_fragment() {
        let html = "<div><span>Text</span></div>";
        let doc = HtmlParser::new().parse(html).unwrap();

        // Even fragments get wrapped in html/head/body by html5ever
        assert!(doc.body().is_valid());
        assert_eq!(doc.text_content(doc.body()), "Text");
    }

    #[test]
    fn test_attributes_preserved() {
        let doc = HtmlParser::new()
            .parse(r#"<button id="go" aria-label="Go now" disabled>Go</button>"#)
            .unwrap();
        let button = doc.get_element_by_id("go").unwrap();
        assert_eq!(doc.tag_name(button), Some("button"));
        assert_eq!(doc.attribute(button, "aria-label"), Some("Go now"));
        assert_eq!(doc.attribute(button, "disabled"), Some(""));
    }
}
