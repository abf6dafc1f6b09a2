//! Display formatting for terminal output

pub mod report;

pub use report::{
    double_separator, format_bar, format_percentage, percentage_of, separator, truncate,
};
