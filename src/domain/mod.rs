pub mod board;
pub mod card;
pub mod card_order;
pub mod column;
pub mod ids;

pub use board::Board;
pub use card::{Card, CardData, CardStatus};
pub use card_order::CardOrder;
pub use column::{Column, ColumnStatus};
pub use ids::{BoardId, CardId, ColumnId};
