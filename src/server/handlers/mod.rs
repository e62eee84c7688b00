pub mod catalogs;
pub mod quotes;
