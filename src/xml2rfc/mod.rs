//! Schema parser for the IETF xml2rfc vocabulary.
//!
//! Turns raw XML bytes into a validated [`DocumentNode`] tree rooted at
//! `rfc`. Only structural validation happens here: the root element, the
//! required `front`/`title`/`author`/`middle` children and required
//! attributes. Unknown elements are kept as [`OpaqueNode`] text.

mod node;
mod parser;
pub mod vocab;

pub use node::{Descendants, DocumentNode, Location, Node, OpaqueNode};
pub(crate) use node::LineIndex;
pub use parser::{parse_bytes, parse_str};
pub use vocab::Tag;
