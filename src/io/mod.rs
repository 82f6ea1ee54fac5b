pub mod json;
pub mod report;
pub mod shell;
pub mod store;
pub mod tabular;
pub mod workbook;
