//! STL file format support
//!
//! STL (`STereoLithography`) stores a bare triangle soup, ASCII or binary.
//! Files load as a single mesh node; export always writes binary STL.

mod parser;
mod writer;

pub use parser::StlParser;
pub use writer::write_stl;
