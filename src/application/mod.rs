pub mod catalog_service;
pub mod order_service;
pub mod recorder;
pub mod reservation;
