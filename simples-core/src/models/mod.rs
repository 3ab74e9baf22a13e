mod annex;
mod bracket;
mod caps;
mod month_entry;
mod summary;

pub use annex::Annex;
pub use bracket::{BracketRow, BracketTable, BracketTableError, BracketTables};
pub use caps::Caps;
pub use month_entry::{ComputedMonth, MonthEntry};
pub use summary::SimulationSummary;
