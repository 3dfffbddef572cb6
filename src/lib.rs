pub mod config;
pub mod error;
pub mod form;
pub mod models;
pub mod query;
pub mod refdata;
pub mod screen;
pub mod store;
pub mod view;
