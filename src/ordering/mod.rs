//! The ordering engine: dense column positions per board and explicit card
//! order per column.

pub mod card_orderer;
pub mod column_orderer;
pub mod positions;

pub use card_orderer::{CardOrderer, ColumnView};
pub use column_orderer::ColumnOrderer;
