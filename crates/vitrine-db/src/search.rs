//! Search executor: runs the composed count and data queries.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use sqlx::{Pool, Postgres, Row};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use vitrine_core::{
    AttributeType, AttributeValue, PageWindow, Product, ProductSearchFilter, Result, SearchPage,
    SortSpec,
};

use crate::composer::PredicateComposer;
use crate::query_param::bind_params;
use crate::rows::products_from_rows;

/// Product search executor over PostgreSQL.
#[derive(Clone)]
pub struct PgProductSearch {
    pool: Pool<Postgres>,
    composer: PredicateComposer,
}

impl PgProductSearch {
    /// Create a new PgProductSearch with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            pool,
            composer: PredicateComposer::postgres(),
        }
    }

    /// Run one search page.
    ///
    /// The count and data queries share no state and are issued
    /// concurrently. No matches is an empty page, not an error.
    #[instrument(skip(self, filter), fields(
        subsystem = "database",
        component = "executor",
        op = "search",
        sort = %sort.field,
        limit = window.limit,
        offset = window.offset,
    ))]
    pub async fn search(
        &self,
        filter: &ProductSearchFilter,
        sort: SortSpec,
        window: PageWindow,
    ) -> Result<SearchPage> {
        let start = Instant::now();
        let fragments = self.composer.compose(filter, sort);

        debug!(
            attribute_joins = fragments.attribute_joins(),
            param_count = fragments.params().len(),
            "Composed product search query"
        );

        let count_sql = fragments.count_sql();
        let data_sql = fragments.data_sql();
        let data_params = fragments.data_params(window);

        let count_query =
            bind_params(sqlx::query(&count_sql), fragments.params()).fetch_one(&self.pool);
        let data_query = bind_params(sqlx::query(&data_sql), &data_params).fetch_all(&self.pool);
        let (count_row, rows) = tokio::try_join!(count_query, data_query)?;

        let total: i64 = count_row.try_get(0)?;
        let mut products = products_from_rows(&rows)?;

        if filter.include_attributes {
            self.load_attributes(&mut products).await?;
        }

        info!(
            total,
            result_count = products.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Product search complete"
        );

        Ok(SearchPage { products, total })
    }

    /// Attach each product's typed attribute map, in one query per page.
    pub async fn load_attributes(&self, products: &mut [Product]) -> Result<()> {
        if products.is_empty() {
            return Ok(());
        }
        let ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();

        let rows = sqlx::query(
            "SELECT pav.product_id, a.code, a.attribute_type, pav.value
             FROM attribute_value_map pav
             JOIN attributes a ON a.id = pav.attribute_id
             WHERE pav.product_id = ANY($1::uuid[])",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_product: HashMap<Uuid, BTreeMap<String, AttributeValue>> = HashMap::new();
        for row in rows {
            let product_id: Uuid = row.try_get("product_id")?;
            let code: String = row.try_get("code")?;
            let raw_type: String = row.try_get("attribute_type")?;
            let value: String = row.try_get("value")?;
            let attribute_type = raw_type.parse().unwrap_or(AttributeType::Text);
            by_product
                .entry(product_id)
                .or_default()
                .insert(code, AttributeValue::parse(attribute_type, &value));
        }

        for product in products.iter_mut() {
            product.attributes = Some(by_product.remove(&product.id).unwrap_or_default());
        }
        Ok(())
    }
}
