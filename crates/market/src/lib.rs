pub mod calendar;
pub mod minute;
pub mod tick;
