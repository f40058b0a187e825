pub mod generate;
pub mod index;
