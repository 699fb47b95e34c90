pub mod date;
pub mod page;

pub use date::{format_date, parse_date};
pub use page::{Page, PageQuery, PageRequest};
