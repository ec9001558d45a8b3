pub mod builder;
pub mod palette;
pub mod schema;

pub use builder::{DatasetBuilder, DatasetConfig};
pub use palette::{PALETTE, Palette};
pub use schema::{Cluster, Dataset, Label, NodeData, Tag};
