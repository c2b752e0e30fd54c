pub mod clean;
pub mod generate;
