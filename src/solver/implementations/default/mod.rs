#![allow(non_snake_case)]

mod info;
mod info_print;
mod kktsystem;
mod problemdata;
mod settings;
mod solution;
mod solver;

//export flattened
pub use info::*;
pub use kktsystem::*;
pub use problemdata::*;
pub use settings::*;
pub use solution::*;
pub use solver::*;

cfg_if::cfg_if! {
    if #[cfg(feature = "serde")] {
        mod json;
        pub use json::*;
    }
}
