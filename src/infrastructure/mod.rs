pub mod catalog_repo;
pub mod memory;
pub mod models;
pub mod order_repo;

#[cfg(test)]
pub(crate) mod test_db;
