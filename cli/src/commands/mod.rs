pub mod generate;
pub mod group;
pub mod keys;
