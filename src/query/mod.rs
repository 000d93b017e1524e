pub mod month;
pub mod period;

pub use month::MonthKey;
pub use period::Period;
