pub mod auth;
pub mod customers;
pub mod service_types;
pub mod users;
