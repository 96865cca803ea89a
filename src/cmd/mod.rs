pub mod company;
pub mod convert;
pub mod fetch;
