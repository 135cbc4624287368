//! Product repository: the catalog listing plan and seller CRUD.
//!
//! The listing query is assembled dynamically with `sqlx::QueryBuilder`.
//! One filter-pushing function feeds both the page query and the count
//! query so `pages = ceil(total / limit)` is computed over exactly the
//! predicate that produced the page.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use marigold_core::{CategoryId, ProductId, ProductImageId, ProductStatus, UserId};

use super::RepositoryError;
use crate::catalog::shape::SellerSummary;
use crate::catalog::{LOW_STOCK_MAX, ListingSpec, SortKey, TOP_RATED_MIN_RATING};
use crate::models::{Product, ProductImage};

/// Product columns selected by every listing/detail query.
const PRODUCT_COLUMNS: &str = "p.id, p.seller_id, p.category_id, p.slug, p.name, p.description, \
     p.price, p.rating, p.inventory_count, p.status, p.featured, \
     p.created_at, p.updated_at";

/// Seller columns joined into listing rows.
const SELLER_COLUMNS: &str =
    "s.name AS seller_name, s.seller_verified, s.seller_rating AS seller_rating";

/// Fields for a new product created through the seller surface.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub category_id: Option<CategoryId>,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub inventory_count: i32,
    pub status: ProductStatus,
}

/// Partial update for a seller's own product. `None` fields are unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub category_id: Option<CategoryId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub inventory_count: Option<i32>,
    pub status: Option<ProductStatus>,
}

/// Aggregate counts for the analytics endpoint.
#[derive(Debug, Clone, Copy, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_users: i64,
    pub total_products: i64,
    pub active_products: i64,
    pub total_orders: i64,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Run the listing plan for a normalized spec.
    ///
    /// Returns the page of matching products (with joined seller fields)
    /// and the total count over the same predicate.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either query fails. Callers
    /// at the listing boundary degrade this to an empty result; mutation
    /// callers must propagate it.
    pub async fn list(
        &self,
        spec: &ListingSpec,
    ) -> Result<(Vec<(Product, SellerSummary)>, u64), RepositoryError> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {PRODUCT_COLUMNS}, s.id AS seller_user_id, {SELLER_COLUMNS}
             FROM products p
             JOIN users s ON s.id = p.seller_id
             LEFT JOIN categories c ON c.id = p.category_id"
        ));
        push_listing_filters(&mut query, spec);
        push_listing_order(&mut query, spec.sort);
        query.push(" LIMIT ");
        query.push_bind(i64::from(spec.limit));
        query.push(" OFFSET ");
        query.push_bind(spec.offset());

        let rows = query.build().fetch_all(self.pool).await?;
        let mut hits = Vec::with_capacity(rows.len());
        for row in &rows {
            hits.push((map_product(row)?, map_seller(row)?));
        }

        let mut count = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*)
             FROM products p
             JOIN users s ON s.id = p.seller_id
             LEFT JOIN categories c ON c.id = p.category_id",
        );
        push_listing_filters(&mut count, spec);
        let total: i64 = count.build_query_scalar().fetch_one(self.pool).await?;

        Ok((hits, total.try_into().unwrap_or(0)))
    }

    /// Get an active product by slug, with its seller fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_active_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<(Product, SellerSummary)>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS}, s.id AS seller_user_id, {SELLER_COLUMNS}
             FROM products p
             JOIN users s ON s.id = p.seller_id
             WHERE p.slug = $1 AND p.status = 'active'"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        row.as_ref()
            .map(|r| Ok::<_, RepositoryError>((map_product(r)?, map_seller(r)?)))
            .transpose()
    }

    /// Fetch gallery images for a set of products, grouped by product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn images_for(
        &self,
        product_ids: &[ProductId],
    ) -> Result<HashMap<ProductId, Vec<ProductImage>>, RepositoryError> {
        if product_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<i32> = product_ids.iter().map(|id| id.as_i32()).collect();
        let rows = sqlx::query(
            "SELECT id, product_id, url, alt_text, position
             FROM product_images
             WHERE product_id = ANY($1)
             ORDER BY product_id, position",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut grouped: HashMap<ProductId, Vec<ProductImage>> = HashMap::new();
        for row in &rows {
            let image = map_image(row)?;
            grouped.entry(image.product_id).or_default().push(image);
        }
        Ok(grouped)
    }

    /// List a seller's own products, any status, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_seller(&self, seller_id: UserId) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM products p
             WHERE p.seller_id = $1
             ORDER BY p.created_at DESC, p.id DESC"
        ))
        .bind(seller_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(map_product).collect()
    }

    /// Create a product owned by the given seller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        seller_id: UserId,
        new: &NewProduct,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query(&format!(
            "INSERT INTO products
                 (seller_id, category_id, slug, name, description, price, inventory_count, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {}",
            PRODUCT_COLUMNS.replace("p.", "")
        ))
        .bind(seller_id.as_i32())
        .bind(new.category_id.map(|id| id.as_i32()))
        .bind(&new.slug)
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(new.inventory_count)
        .bind(new.status)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("product slug already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        map_product(&row)
    }

    /// Patch a product, but only if it belongs to the given seller.
    ///
    /// The ownership predicate is part of the statement: a missing row and
    /// a row owned by someone else are indistinguishable to the caller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if nothing matched.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_own(
        &self,
        seller_id: UserId,
        product_id: ProductId,
        patch: &ProductPatch,
    ) -> Result<(), RepositoryError> {
        let mut query = QueryBuilder::<Postgres>::new("UPDATE products SET updated_at = now()");

        if let Some(category_id) = patch.category_id {
            query.push(", category_id = ");
            query.push_bind(category_id.as_i32());
        }
        if let Some(name) = &patch.name {
            query.push(", name = ");
            query.push_bind(name.clone());
        }
        if let Some(description) = &patch.description {
            query.push(", description = ");
            query.push_bind(description.clone());
        }
        if let Some(price) = patch.price {
            query.push(", price = ");
            query.push_bind(price);
        }
        if let Some(inventory_count) = patch.inventory_count {
            query.push(", inventory_count = ");
            query.push_bind(inventory_count);
        }
        if let Some(status) = patch.status {
            query.push(", status = ");
            query.push_bind(status);
        }

        query.push(" WHERE id = ");
        query.push_bind(product_id.as_i32());
        query.push(" AND seller_id = ");
        query.push_bind(seller_id.as_i32());

        let result = query.build().execute(self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a product, but only if it belongs to the given seller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if nothing matched.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete_own(
        &self,
        seller_id: UserId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1 AND seller_id = $2")
            .bind(product_id.as_i32())
            .bind(seller_id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Feature or unfeature a product on the storefront.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_featured(
        &self,
        product_id: ProductId,
        featured: bool,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE products SET featured = $1, updated_at = now() WHERE id = $2")
            .bind(featured)
            .bind(product_id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Aggregate counts for the analytics endpoint.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn catalog_stats(&self) -> Result<CatalogStats, RepositoryError> {
        let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        let total_products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;
        let active_products: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE status = 'active'")
                .fetch_one(self.pool)
                .await?;
        let total_orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(self.pool)
            .await?;

        Ok(CatalogStats {
            total_users,
            total_products,
            active_products,
            total_orders,
        })
    }
}

// =============================================================================
// Listing plan
// =============================================================================

/// Push the WHERE clause for a listing spec.
///
/// Used by both the page query and the count query - the two must always
/// see the same predicate. Active status is implicit and unconditional.
fn push_listing_filters(query: &mut QueryBuilder<'_, Postgres>, spec: &ListingSpec) {
    query.push(" WHERE p.status = 'active'");

    if let Some(term) = &spec.search {
        let pattern = like_pattern(term);
        query.push(" AND (p.name ILIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR p.description ILIKE ");
        query.push_bind(pattern);
        query.push(")");
    }

    if let Some(slug) = &spec.category {
        query.push(" AND c.slug = ");
        query.push_bind(slug.clone());
    }

    if let Some(min) = spec.min_price {
        query.push(" AND p.price >= ");
        query.push_bind(min);
    }
    if let Some(max) = spec.max_price {
        query.push(" AND p.price <= ");
        query.push_bind(max);
    }

    if let Some(floor) = spec.min_rating {
        query.push(" AND p.rating >= ");
        query.push_bind(floor);
    }

    if !spec.availability.is_empty() {
        let values: Vec<String> = spec
            .availability
            .iter()
            .map(|f| f.as_str().to_owned())
            .collect();
        query.push(format!(
            " AND (CASE WHEN p.inventory_count <= 0 THEN 'out_of_stock' \
                        WHEN p.inventory_count <= {LOW_STOCK_MAX} THEN 'low_stock' \
                        ELSE 'in_stock' END) = ANY("
        ));
        query.push_bind(values);
        query.push(")");
    }

    if !spec.seller_tiers.is_empty() {
        let values: Vec<String> = spec
            .seller_tiers
            .iter()
            .map(|t| t.as_str().to_owned())
            .collect();
        query.push(format!(
            " AND (CASE WHEN s.seller_verified AND COALESCE(s.seller_rating, 0) >= {TOP_RATED_MIN_RATING} \
                        THEN 'top_rated' \
                        WHEN s.seller_verified THEN 'verified' \
                        ELSE 'standard' END) = ANY("
        ));
        query.push_bind(values);
        query.push(")");
    }
}

/// Push the ORDER BY clause for a sort key.
///
/// Every ordering ends with `created_at DESC, id DESC` so pagination is
/// deterministic even when the primary key collides.
fn push_listing_order(query: &mut QueryBuilder<'_, Postgres>, sort: SortKey) {
    let order = match sort {
        SortKey::Newest => "p.created_at DESC, p.id DESC",
        SortKey::PriceAsc => "p.price ASC, p.created_at DESC, p.id DESC",
        SortKey::PriceDesc => "p.price DESC, p.created_at DESC, p.id DESC",
        SortKey::BestSelling => {
            "(SELECT COUNT(*) FROM order_items oi WHERE oi.product_id = p.id) DESC, \
             p.created_at DESC, p.id DESC"
        }
    };
    query.push(" ORDER BY ");
    query.push(order);
}

/// Escape LIKE metacharacters in a user-supplied search term.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

// =============================================================================
// Row mapping
// =============================================================================

fn map_product(row: &PgRow) -> Result<Product, RepositoryError> {
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;
    let status: ProductStatus = row.try_get("status")?;

    Ok(Product {
        id: ProductId::new(row.try_get("id")?),
        seller_id: UserId::new(row.try_get("seller_id")?),
        category_id: row
            .try_get::<Option<i32>, _>("category_id")?
            .map(CategoryId::new),
        slug: row.try_get("slug")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price: row.try_get("price")?,
        rating: row.try_get("rating")?,
        inventory_count: row.try_get("inventory_count")?,
        status,
        featured: row.try_get("featured")?,
        created_at,
        updated_at,
    })
}

fn map_seller(row: &PgRow) -> Result<SellerSummary, RepositoryError> {
    Ok(SellerSummary {
        id: UserId::new(row.try_get("seller_user_id")?),
        name: row.try_get("seller_name")?,
        verified: row.try_get("seller_verified")?,
        rating: row.try_get("seller_rating")?,
    })
}

fn map_image(row: &PgRow) -> Result<ProductImage, RepositoryError> {
    Ok(ProductImage {
        id: ProductImageId::new(row.try_get("id")?),
        product_id: ProductId::new(row.try_get("product_id")?),
        url: row.try_get("url")?,
        alt_text: row.try_get("alt_text")?,
        position: row.try_get("position")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("50% off_deal"), "%50\\% off\\_deal%");
        assert_eq!(like_pattern("back\\slash"), "%back\\\\slash%");
        assert_eq!(like_pattern("desk"), "%desk%");
    }

    #[test]
    fn test_listing_filters_always_include_active_predicate() {
        let mut query = QueryBuilder::<Postgres>::new("SELECT 1 FROM products p");
        push_listing_filters(&mut query, &ListingSpec::default());
        assert!(query.sql().contains("p.status = 'active'"));
    }

    #[test]
    fn test_listing_filters_bind_search_and_range() {
        let spec = ListingSpec {
            search: Some("desk".to_string()),
            min_price: Some(Decimal::new(1000, 2)),
            max_price: Some(Decimal::new(50000, 2)),
            ..ListingSpec::default()
        };
        let mut query = QueryBuilder::<Postgres>::new("SELECT 1 FROM products p");
        push_listing_filters(&mut query, &spec);
        let sql = query.sql();
        assert!(sql.contains("p.name ILIKE"));
        assert!(sql.contains("p.description ILIKE"));
        assert!(sql.contains("p.price >="));
        assert!(sql.contains("p.price <="));
    }

    #[test]
    fn test_empty_facet_sets_add_no_predicate() {
        let mut query = QueryBuilder::<Postgres>::new("SELECT 1 FROM products p");
        push_listing_filters(&mut query, &ListingSpec::default());
        let sql = query.sql();
        assert!(!sql.contains("inventory_count <= 0"));
        assert!(!sql.contains("seller_verified"));
    }

    #[test]
    fn test_every_sort_ends_with_stable_tiebreak() {
        for sort in [
            SortKey::Newest,
            SortKey::PriceAsc,
            SortKey::PriceDesc,
            SortKey::BestSelling,
        ] {
            let mut query = QueryBuilder::<Postgres>::new("SELECT 1");
            push_listing_order(&mut query, sort);
            assert!(
                query.sql().ends_with("p.created_at DESC, p.id DESC"),
                "sort {sort:?} lacks the stable tiebreak"
            );
        }
    }
}
