pub mod errors;
pub mod db;
pub mod category;
pub mod product;
