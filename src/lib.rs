pub mod api;
pub mod cmd;
pub mod export;
pub mod frontend;
pub mod model;
pub mod sheet;

pub use color_eyre::eyre::Result;

pub use self::model::{Company, Transaction, TransactionPage};
