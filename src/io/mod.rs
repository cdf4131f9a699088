pub mod csv;
pub mod data;
pub mod results;
