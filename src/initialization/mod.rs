pub use input_check::*;
pub use molecule::*;

mod input_check;
pub mod molecule;
