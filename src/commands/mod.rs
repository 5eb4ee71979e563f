pub mod auth;
pub mod classes;
pub mod config;
pub mod offices;
pub mod records;
pub mod reservations;
pub mod revenue;
