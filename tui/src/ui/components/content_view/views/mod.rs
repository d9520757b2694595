pub mod data;
pub mod edit;
pub mod none;
