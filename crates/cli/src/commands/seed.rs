//! Catalog seeding command.
//!
//! Inserts the fixed product catalog into the `products` table. Product IDs
//! are pinned, so repeated runs are idempotent: existing rows are skipped
//! unless `--force` is given, in which case display fields and prices are
//! overwritten in place.

use tracing::info;

use marigold_api::store::{catalog, create_pool};

use super::{CommandError, database_url};

/// Seed the product catalog.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or an insert fails.
pub async fn run(force: bool) -> Result<(), CommandError> {
    let database_url = database_url()?;

    info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;

    let mut inserted = 0_u32;
    let mut skipped = 0_u32;

    for product in catalog::products() {
        let query = if force {
            sqlx::query(
                r"
                INSERT INTO products (id, name, description, price, image, category)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (id) DO UPDATE
                SET name = EXCLUDED.name,
                    description = EXCLUDED.description,
                    price = EXCLUDED.price,
                    image = EXCLUDED.image,
                    category = EXCLUDED.category,
                    updated_at = NOW()
                ",
            )
        } else {
            sqlx::query(
                r"
                INSERT INTO products (id, name, description, price, image, category)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (id) DO NOTHING
                ",
            )
        };

        let result = query
            .bind(product.id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.image)
            .bind(&product.category)
            .execute(&pool)
            .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
        } else {
            skipped += 1;
        }
    }

    info!(inserted, skipped, "Catalog seeding complete");
    Ok(())
}
