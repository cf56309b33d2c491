pub mod errors;
pub mod identity;
pub mod normalize;
pub mod order;
pub mod ports;
pub mod product;
