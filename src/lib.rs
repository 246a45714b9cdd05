/// Filter-and-aggregate core of an earthquake dashboard
pub mod aggregates;
pub mod clients;
pub mod config;
pub mod country;
pub mod domain;
pub mod errors;
pub mod filters;
pub mod normalizer;
pub mod services;
pub mod utils;
