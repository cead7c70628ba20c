pub mod db;
pub mod defaults;
pub mod feedback;
pub mod form;
pub mod locale;
pub mod models;
pub mod service;
pub mod timer;
