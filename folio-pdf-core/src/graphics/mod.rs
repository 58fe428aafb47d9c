//! Color spaces shared by all pages.

mod separation;

pub use separation::Separation;
