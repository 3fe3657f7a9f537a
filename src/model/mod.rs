//! Semantic document model.
//!
//! The builder turns a parsed xml2rfc tree into these structures, the
//! resolver numbers them in place, and the serializers read them.

mod block;
mod document;
mod inline;
mod table;

pub use block::*;
pub use document::*;
pub use inline::*;
pub use table::*;
