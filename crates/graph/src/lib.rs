pub mod assembler;
pub mod diagnostics;
pub mod schema;

pub use assembler::{AssemblerConfig, Assembly, GraphAssembler, DEFAULT_CATEGORY};
pub use diagnostics::{Diagnostic, Diagnostics, Stage};
pub use schema::{CanonicalGraph, CanonicalNode};

pub use ingest::{ContentItem, Edge};
