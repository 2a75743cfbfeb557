pub mod catalog;
pub mod configuration;
pub mod errors;
pub mod models;
pub mod qr;
pub mod routes;
pub mod services;
pub mod startup;
pub mod store;
pub mod telementry;
