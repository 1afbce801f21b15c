mod contact;
mod criteria;

pub use contact::*;
pub use criteria::*;
