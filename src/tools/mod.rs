pub mod categories;
pub mod search;

pub use categories::*;
pub use search::*;
