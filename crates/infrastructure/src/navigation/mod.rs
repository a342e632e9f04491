//! Navigation adapters.

mod history;

pub use history::HistoryNavigator;
