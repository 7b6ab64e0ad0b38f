pub mod dispatcher;
pub mod format;
pub mod protocol;
pub mod scales;
pub mod state;
pub mod system;
pub mod types;

pub use dispatcher::*;
pub use types::*;
