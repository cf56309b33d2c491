use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;
use crate::domain::product::{Product, ProductInput};

pub struct CatalogService<C> {
    repo: C,
}

impl<C: CatalogRepository> CatalogService<C> {
    pub fn new(repo: C) -> Self {
        Self { repo }
    }

    pub fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        self.repo.list()
    }

    pub fn get_product(&self, id: i64) -> Result<Product, DomainError> {
        self.repo.find_by_id(id)?.ok_or(DomainError::NotFound)
    }

    pub fn create_product(&self, input: ProductInput) -> Result<Product, DomainError> {
        input.validate()?;
        let product = self.repo.create(&input)?;
        log::info!("Created product {} ({})", product.id, product.name);
        Ok(product)
    }

    pub fn update_product(&self, id: i64, input: ProductInput) -> Result<Product, DomainError> {
        input.validate()?;
        self.repo.update(id, &input)?.ok_or(DomainError::NotFound)
    }

    pub fn delete_product(&self, id: i64) -> Result<(), DomainError> {
        if self.repo.delete(id)? {
            log::info!("Deleted product {}", id);
            Ok(())
        } else {
            Err(DomainError::NotFound)
        }
    }
}
