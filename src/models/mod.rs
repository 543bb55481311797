mod budget;
mod month;
mod settings;
mod transaction;

pub use budget::Budget;
pub use month::YearMonth;
pub use settings::{CategoryChartType, Settings, Tab, TrendChartType, DEFAULT_THEME};
pub use transaction::{Transaction, TransactionType};
