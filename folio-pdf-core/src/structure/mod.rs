//! Navigation structures: outlines, named destinations and name trees.

mod destination;
mod name_tree;
mod outline;

pub use destination::NameDest;
pub use name_tree::NameTree;
pub use outline::{visible_count, OutlineItem};

pub(crate) use outline::write_outlines;
