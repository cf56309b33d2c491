use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;
use crate::domain::product::{Product, ProductInput};
use crate::schema::products;

use super::models::{ProductChangeset, ProductRow};

#[derive(Clone)]
pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn changeset(input: &ProductInput) -> ProductChangeset<'_> {
    ProductChangeset {
        name: &input.name,
        price_cents: input.price_cents,
        stock: input.stock,
    }
}

impl CatalogRepository for DieselCatalogRepository {
    fn list(&self) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows: Vec<ProductRow> = products::table
            .order(products::id.asc())
            .select(ProductRow::as_select())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;
        let row: Option<ProductRow> = products::table
            .find(id)
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Product::from))
    }

    fn create(&self, input: &ProductInput) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;
        let row: ProductRow = diesel::insert_into(products::table)
            .values(&changeset(input))
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn update(&self, id: i64, input: &ProductInput) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;
        let row: Option<ProductRow> = diesel::update(products::table.find(id))
            .set(&changeset(input))
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .optional()?;
        Ok(row.map(Product::from))
    }

    fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        let deleted = diesel::delete(products::table.find(id)).execute(&mut conn)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::test_db::setup_db;

    fn widget(price_cents: i64, stock: i32) -> ProductInput {
        ProductInput {
            name: "widget".to_string(),
            price_cents,
            stock,
        }
    }

    #[tokio::test]
    async fn crud_roundtrip() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);

        let created = repo.create(&widget(500, 10)).expect("create failed");
        assert_eq!(
            repo.find_by_id(created.id).expect("find failed"),
            Some(created.clone())
        );

        let updated = repo
            .update(created.id, &widget(650, 4))
            .expect("update failed")
            .expect("product should exist");
        assert_eq!(updated.price_cents, 650);
        assert_eq!(updated.stock, 4);

        assert_eq!(repo.list().expect("list failed").len(), 1);
        assert!(repo.delete(created.id).expect("delete failed"));
        assert!(repo.find_by_id(created.id).expect("find failed").is_none());
    }

    #[tokio::test]
    async fn missing_product_is_reported() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);

        assert!(repo.update(42, &widget(1, 1)).expect("update failed").is_none());
        assert!(!repo.delete(42).expect("delete failed"));
    }

    #[tokio::test]
    async fn negative_stock_is_refused_by_the_database() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);

        let result = repo.create(&widget(100, -1));
        assert!(matches!(result, Err(DomainError::Internal(_))));
    }
}
