pub mod db;
pub mod errors;
pub mod link;
pub mod user;
