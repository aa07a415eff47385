//! Breadth-first traversal engine

mod crawl;

pub use crawl::Crawl;
