// package together all of the following and re-export
// in a partially flattened structure :
// : core component traits
// : working set and iterate types
// : user settings
// : main solver implementation

pub mod traits;
pub mod workingset;

//partially flatten top level pieces

mod settings;
mod solver;
pub use settings::*;
pub use solver::*;
