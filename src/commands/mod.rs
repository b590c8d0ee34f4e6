//! CLI command implementations.

pub mod browse;
pub mod cart;
pub mod lookup;
pub mod search;

pub use browse::BrowseCommand;
pub use cart::{CartAction, CartCommand};
pub use lookup::LookupCommand;
pub use search::SearchCommand;
