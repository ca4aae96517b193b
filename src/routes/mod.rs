// route modules all import here
pub mod admin;
pub mod common;
pub mod orders;
pub mod products;
