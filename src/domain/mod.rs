mod aggregate;
mod instant;
mod parse;
mod replay;
mod rows;
mod types;

pub use aggregate::*;
pub use instant::*;
pub use parse::*;
pub use replay::*;
pub use rows::*;
pub use types::*;
