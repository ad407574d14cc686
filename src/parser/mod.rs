pub mod identifier;
pub mod parser;
pub mod types;

pub use identifier::*;
pub use parser::*;
pub use types::*;
