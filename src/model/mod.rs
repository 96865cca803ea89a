pub mod company;
pub mod page;
pub mod transaction;

pub use self::{company::*, page::*, transaction::*};
