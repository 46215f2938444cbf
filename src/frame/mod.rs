//! Generic tabular model shared by every provider adapter.
//!
//! - `table`: the column/row model and heuristic column lookup
//! - `slice`: dimension filtering (narrowing a cube to the intended slice)
//! - `extract`: turning a sliced table into an ordered series

pub mod extract;
pub mod slice;
pub mod table;

pub use extract::*;
pub use slice::*;
pub use table::*;
