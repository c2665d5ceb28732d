mod grid;
mod month;

pub use grid::{build_month_grid, DayCell, MonthGrid, MonthSummary};
pub use month::YearMonth;
