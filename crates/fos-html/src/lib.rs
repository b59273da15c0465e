//! fOS HTML Parser
//!
//! HTML5 front end built on html5ever. Produces a live
//! [`fos_dom::Document`] for the accessibility tree and the virtual
//! screen reader to read.

mod parser;

pub use fos_dom::Document;
pub use parser::HtmlParser;

/// Parse an HTML string into a document
pub fn parse(html: &str) -> Result<Document> {
    HtmlParser::new().parse(html)
}

/// Result alias for parsing
pub type Result<T> = std::result::Result<T, HtmlError>;

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("Failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),
}
