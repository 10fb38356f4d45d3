mod gateway;
mod product;

pub use gateway::*;
pub use product::*;
