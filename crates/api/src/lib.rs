pub mod auth;
pub mod error;
pub mod repo;
pub mod seed;
pub mod services;
pub mod validation;
