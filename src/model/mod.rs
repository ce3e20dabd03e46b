pub mod athlete;
pub mod config;
pub mod observation;
pub mod profile;
