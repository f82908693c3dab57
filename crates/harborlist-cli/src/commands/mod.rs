pub mod dealer;
pub mod finance;
