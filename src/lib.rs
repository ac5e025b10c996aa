// Perfect clear odds: branch-and-bound search over a board-state graph
pub mod config;
pub mod error;
pub mod exhaustive;
pub mod graph;
pub mod piece;
pub mod repl;
pub mod search;
pub mod weights;

pub use graph::FieldGraph;
pub use piece::{Bag, Shape};
pub use search::{Query, SearchParams, Searcher};
pub use weights::WeightTable;
