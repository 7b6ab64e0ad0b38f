pub mod bookoo;
pub mod traits;

pub use bookoo::*;
pub use traits::*;
