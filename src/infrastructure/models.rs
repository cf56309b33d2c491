use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::order::{OrderItemView, OrderView};
use crate::domain::product::Product;
use crate::schema::{order_items, orders, products};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub price_cents: i64,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = products)]
pub struct ProductChangeset<'a> {
    pub name: &'a str,
    pub price_cents: i64,
    pub stock: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub total_cents: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow<'a> {
    pub id: Uuid,
    pub user_id: &'a str,
    pub total_cents: i64,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: i64,
    pub qty: i32,
    pub price_cents: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: i64,
    pub qty: i32,
    pub price_cents: i64,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            price_cents: row.price_cents,
            stock: row.stock,
            created_at: row.created_at,
        }
    }
}

impl OrderRow {
    pub fn into_view(self, items: Vec<OrderItemRow>) -> OrderView {
        OrderView {
            id: self.id,
            user_id: self.user_id,
            created_at: self.created_at,
            total_cents: self.total_cents,
            items: items
                .into_iter()
                .map(|i| OrderItemView {
                    id: i.id,
                    product_id: i.product_id,
                    qty: i.qty,
                    price_cents: i.price_cents,
                })
                .collect(),
        }
    }
}
