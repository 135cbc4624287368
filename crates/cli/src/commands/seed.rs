//! Seed the database with a demo catalog.
//!
//! Inserts two sellers, three categories, a mixed catalog of active and
//! draft products with gallery images, and a handful of orders so the
//! best-selling sort has signal. Idempotent: rows that already exist
//! (matched by slug/email) are left alone.

use rust_decimal::Decimal;
use sqlx::PgPool;

use super::{CommandError, connect};

struct SeedProduct {
    slug: &'static str,
    name: &'static str,
    description: &'static str,
    category: &'static str,
    price_cents: i64,
    inventory: i32,
    rating: f64,
    active: bool,
    seller: &'static str,
}

const CATEGORIES: &[(&str, &str)] = &[
    ("furniture", "Furniture"),
    ("ceramics", "Ceramics"),
    ("textiles", "Textiles"),
];

const SELLERS: &[(&str, &str, bool, Option<f64>)] = &[
    ("grain@marigoldmarket.dev", "Grain & Co", true, Some(4.8)),
    ("driftwood@marigoldmarket.dev", "Driftwood Goods", false, None),
];

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct { slug: "walnut-desk", name: "Walnut Desk", description: "Solid walnut writing desk with brass fittings", category: "furniture", price_cents: 64900, inventory: 8, rating: 4.6, active: true, seller: "grain@marigoldmarket.dev" },
    SeedProduct { slug: "oak-bookshelf", name: "Oak Bookshelf", description: "Five-shelf white oak bookcase", category: "furniture", price_cents: 42900, inventory: 3, rating: 4.3, active: true, seller: "grain@marigoldmarket.dev" },
    SeedProduct { slug: "cedar-bench", name: "Cedar Bench", description: "Weather-resistant cedar entry bench", category: "furniture", price_cents: 18900, inventory: 0, rating: 4.1, active: true, seller: "driftwood@marigoldmarket.dev" },
    SeedProduct { slug: "ash-side-table", name: "Ash Side Table", description: "Round side table in pale ash", category: "furniture", price_cents: 13900, inventory: 14, rating: 3.9, active: true, seller: "driftwood@marigoldmarket.dev" },
    SeedProduct { slug: "maple-stool", name: "Maple Stool", description: "Three-legged shop stool in hard maple", category: "furniture", price_cents: 9900, inventory: 22, rating: 4.0, active: true, seller: "grain@marigoldmarket.dev" },
    SeedProduct { slug: "glazed-vase", name: "Glazed Vase", description: "Hand-thrown vase with a tenmoku glaze", category: "ceramics", price_cents: 7400, inventory: 5, rating: 4.9, active: true, seller: "grain@marigoldmarket.dev" },
    SeedProduct { slug: "stoneware-mug", name: "Stoneware Mug", description: "12oz stoneware mug, speckled white", category: "ceramics", price_cents: 2800, inventory: 60, rating: 4.7, active: true, seller: "grain@marigoldmarket.dev" },
    SeedProduct { slug: "serving-bowl", name: "Serving Bowl", description: "Wide serving bowl with carved rim", category: "ceramics", price_cents: 5600, inventory: 12, rating: 4.4, active: true, seller: "driftwood@marigoldmarket.dev" },
    SeedProduct { slug: "bud-vase-set", name: "Bud Vase Set", description: "Set of three miniature bud vases", category: "ceramics", price_cents: 4200, inventory: 2, rating: 4.2, active: true, seller: "driftwood@marigoldmarket.dev" },
    SeedProduct { slug: "dinner-plates", name: "Dinner Plates", description: "Set of four wheel-thrown dinner plates", category: "ceramics", price_cents: 9800, inventory: 9, rating: 4.5, active: true, seller: "grain@marigoldmarket.dev" },
    SeedProduct { slug: "linen-throw", name: "Linen Throw", description: "Washed linen throw in rust", category: "textiles", price_cents: 8900, inventory: 18, rating: 4.8, active: true, seller: "grain@marigoldmarket.dev" },
    SeedProduct { slug: "wool-blanket", name: "Wool Blanket", description: "Heavyweight wool camp blanket", category: "textiles", price_cents: 15900, inventory: 7, rating: 4.6, active: true, seller: "driftwood@marigoldmarket.dev" },
    SeedProduct { slug: "woven-runner", name: "Woven Runner", description: "Handwoven table runner, undyed cotton", category: "textiles", price_cents: 4900, inventory: 0, rating: 3.8, active: true, seller: "driftwood@marigoldmarket.dev" },
    SeedProduct { slug: "canvas-apron", name: "Canvas Apron", description: "Waxed canvas work apron with leather straps", category: "textiles", price_cents: 7200, inventory: 31, rating: 4.3, active: true, seller: "grain@marigoldmarket.dev" },
    SeedProduct { slug: "hemp-cushion", name: "Hemp Cushion", description: "Floor cushion in heavy hemp twill", category: "textiles", price_cents: 6100, inventory: 4, rating: 4.0, active: true, seller: "driftwood@marigoldmarket.dev" },
    // Drafts: never visible on the public catalog
    SeedProduct { slug: "birch-coat-rack", name: "Birch Coat Rack", description: "Wall-mounted birch coat rack", category: "furniture", price_cents: 5400, inventory: 0, rating: 0.0, active: false, seller: "grain@marigoldmarket.dev" },
    SeedProduct { slug: "raku-bowl", name: "Raku Bowl", description: "Experimental raku-fired bowl", category: "ceramics", price_cents: 8800, inventory: 1, rating: 0.0, active: false, seller: "driftwood@marigoldmarket.dev" },
    SeedProduct { slug: "indigo-wrap", name: "Indigo Wrap", description: "Indigo-dyed wrap, first batch", category: "textiles", price_cents: 9600, inventory: 2, rating: 0.0, active: false, seller: "grain@marigoldmarket.dev" },
];

/// Orders per product slug, to give the best-selling sort signal.
const ORDER_COUNTS: &[(&str, i32)] = &[
    ("stoneware-mug", 6),
    ("linen-throw", 4),
    ("walnut-desk", 2),
    ("glazed-vase", 1),
];

/// Run the seeder.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    seed_categories(&pool).await?;
    seed_sellers(&pool).await?;
    seed_products(&pool).await?;
    seed_orders(&pool).await?;

    tracing::info!("Seed complete");
    Ok(())
}

async fn seed_categories(pool: &PgPool) -> Result<(), CommandError> {
    for (slug, name) in CATEGORIES {
        sqlx::query("INSERT INTO categories (slug, name) VALUES ($1, $2) ON CONFLICT (slug) DO NOTHING")
            .bind(slug)
            .bind(name)
            .execute(pool)
            .await?;
    }
    tracing::info!("Seeded {} categories", CATEGORIES.len());
    Ok(())
}

async fn seed_sellers(pool: &PgPool) -> Result<(), CommandError> {
    for (email, name, verified, rating) in SELLERS {
        sqlx::query(
            "INSERT INTO users (email, name, role, seller_verified, seller_rating)
             VALUES ($1, $2, 'seller', $3, $4)
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(email)
        .bind(name)
        .bind(verified)
        .bind(rating)
        .execute(pool)
        .await?;
    }
    tracing::info!("Seeded {} sellers", SELLERS.len());
    Ok(())
}

async fn seed_products(pool: &PgPool) -> Result<(), CommandError> {
    for product in PRODUCTS {
        let status = if product.active { "active" } else { "draft" };
        let inserted = sqlx::query(
            "INSERT INTO products
                 (seller_id, category_id, slug, name, description, price, rating,
                  inventory_count, status)
             SELECT s.id, c.id, $1, $2, $3, $4, $5, $6, $7::product_status
             FROM users s, categories c
             WHERE s.email = $8 AND c.slug = $9
             ON CONFLICT (slug) DO NOTHING
             RETURNING id",
        )
        .bind(product.slug)
        .bind(product.name)
        .bind(product.description)
        .bind(Decimal::new(product.price_cents, 2))
        .bind(product.rating)
        .bind(product.inventory)
        .bind(status)
        .bind(product.seller)
        .bind(product.category)
        .fetch_optional(pool)
        .await?;

        // Two gallery images per freshly-inserted product; the second one
        // has no alt text so listings fall back to the product name
        if let Some(row) = inserted {
            let product_id: i32 = sqlx::Row::try_get(&row, "id")?;
            sqlx::query(
                "INSERT INTO product_images (product_id, url, alt_text, position)
                 VALUES ($1, $2, $3, 0), ($1, $4, NULL, 1)",
            )
            .bind(product_id)
            .bind(format!("https://cdn.marigoldmarket.dev/p/{}-front.jpg", product.slug))
            .bind(format!("{} front view", product.name))
            .bind(format!("https://cdn.marigoldmarket.dev/p/{}-detail.jpg", product.slug))
            .execute(pool)
            .await?;
        }
    }
    tracing::info!("Seeded {} products", PRODUCTS.len());
    Ok(())
}

async fn seed_orders(pool: &PgPool) -> Result<(), CommandError> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        tracing::info!("Orders already present; skipping order seed");
        return Ok(());
    }

    // One buyer account holds all the demo orders
    sqlx::query(
        "INSERT INTO users (email, name) VALUES ('shopper@marigoldmarket.dev', 'Demo Shopper')
         ON CONFLICT (email) DO NOTHING",
    )
    .execute(pool)
    .await?;

    for (slug, count) in ORDER_COUNTS {
        for _ in 0..*count {
            sqlx::query(
                "WITH new_order AS (
                     INSERT INTO orders (user_id)
                     SELECT id FROM users WHERE email = 'shopper@marigoldmarket.dev'
                     RETURNING id
                 )
                 INSERT INTO order_items (order_id, product_id, quantity, unit_price)
                 SELECT new_order.id, p.id, 1, p.price
                 FROM new_order, products p
                 WHERE p.slug = $1",
            )
            .bind(slug)
            .execute(pool)
            .await?;
        }
    }
    tracing::info!("Seeded demo orders");
    Ok(())
}
