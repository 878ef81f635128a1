pub mod entities;
pub mod errors;
pub mod ledger;
pub mod ports;
