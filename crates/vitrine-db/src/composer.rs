//! Predicate composer: turns a [`ProductSearchFilter`] into SQL fragments.
//!
//! Composition is a fold. Each step takes a [`QueryFragments`] by value and
//! returns the next one; placeholder numbers are derived from the length of
//! the parameter list at the time a value is bound, so there is no counter to
//! keep in sync. Only composer-generated identifiers (`p`, `pcm`, `pavN`,
//! `attrN`) ever appear in fragment text; every filter value is bound.
//!
//! WHERE/JOIN parameters and ORDER BY parameters are kept apart so the count
//! query binds exactly the parameters it references.
//!
//! ```
//! use vitrine_core::{ProductSearchFilter, SortField, SortDirection, SortSpec};
//! use vitrine_db::PredicateComposer;
//!
//! let filter = ProductSearchFilter::new().with_price_range(Some(120.0), None);
//! let sort = SortSpec { field: SortField::Price, direction: SortDirection::Asc };
//! let fragments = PredicateComposer::postgres().compose(&filter, sort);
//!
//! assert!(fragments.count_sql().starts_with("SELECT COUNT(DISTINCT p.id)"));
//! ```

use vitrine_core::{
    AttributePredicate, AttributeRef, Comparison, PageWindow, ProductSearchFilter,
    ProductStatus, ProductVisibility, SearchScope, SortDirection, SortField, SortSpec,
};

use crate::dialect::{ArrayType, Postgres, SqlDialect};
use crate::escape_like;
use crate::query_param::QueryParam;
use crate::rows::PRODUCT_COLUMNS;

// =============================================================================
// QUERY FRAGMENTS
// =============================================================================

/// The composed pieces of a product search query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryFragments {
    joins: Vec<String>,
    conditions: Vec<String>,
    params: Vec<QueryParam>,
    order_by: Vec<String>,
    order_params: Vec<QueryParam>,
    category_joined: bool,
    attribute_joins: usize,
}

impl QueryFragments {
    /// Base query over non-deleted products.
    fn base() -> Self {
        Self {
            joins: Vec::new(),
            conditions: vec!["p.deleted_at IS NULL".to_string()],
            params: Vec::new(),
            order_by: Vec::new(),
            order_params: Vec::new(),
            category_joined: false,
            attribute_joins: 0,
        }
    }

    /// Bind a WHERE/JOIN parameter and return its 1-based index.
    fn bind(mut self, param: QueryParam) -> (Self, usize) {
        self.params.push(param);
        let index = self.params.len();
        (self, index)
    }

    /// Bind an ORDER BY parameter; numbered after every WHERE/JOIN parameter.
    fn bind_order(mut self, param: QueryParam) -> (Self, usize) {
        self.order_params.push(param);
        let index = self.params.len() + self.order_params.len();
        (self, index)
    }

    fn condition(mut self, sql: String) -> Self {
        self.conditions.push(sql);
        self
    }

    fn join(mut self, sql: String) -> Self {
        self.joins.push(sql);
        self
    }

    fn order(mut self, term: String) -> Self {
        self.order_by.push(term);
        self
    }

    pub fn joins(&self) -> &[String] {
        &self.joins
    }

    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    /// Parameters referenced by the FROM and WHERE clauses.
    pub fn params(&self) -> &[QueryParam] {
        &self.params
    }

    /// Parameters referenced only by the ORDER BY clause.
    pub fn order_params(&self) -> &[QueryParam] {
        &self.order_params
    }

    /// Number of attribute-value joins in the query.
    pub fn attribute_joins(&self) -> usize {
        self.attribute_joins
    }

    pub fn from_clause(&self) -> String {
        let mut from = String::from("products p");
        for join in &self.joins {
            from.push(' ');
            from.push_str(join);
        }
        from
    }

    pub fn where_clause(&self) -> String {
        self.conditions.join(" AND ")
    }

    pub fn order_by_clause(&self) -> String {
        self.order_by.join(", ")
    }

    /// Count of distinct matching products, ignoring pagination.
    pub fn count_sql(&self) -> String {
        format!(
            "SELECT COUNT(DISTINCT p.id) FROM {} WHERE {}",
            self.from_clause(),
            self.where_clause()
        )
    }

    /// One page of matching products, deduplicated by product id.
    ///
    /// LIMIT and OFFSET take the two placeholders after the ORDER BY
    /// parameters; see [`QueryFragments::data_params`].
    pub fn data_sql(&self) -> String {
        let limit = self.params.len() + self.order_params.len() + 1;
        format!(
            "SELECT {PRODUCT_COLUMNS} FROM {} WHERE {} GROUP BY p.id ORDER BY {} LIMIT ${} OFFSET ${}",
            self.from_clause(),
            self.where_clause(),
            self.order_by_clause(),
            limit,
            limit + 1
        )
    }

    /// Parameters for [`QueryFragments::data_sql`], in placeholder order.
    pub fn data_params(&self, window: PageWindow) -> Vec<QueryParam> {
        let mut params = Vec::with_capacity(self.params.len() + self.order_params.len() + 2);
        params.extend(self.params.iter().cloned());
        params.extend(self.order_params.iter().cloned());
        params.push(QueryParam::Int(window.limit));
        params.push(QueryParam::Int(window.offset));
        params
    }
}

// =============================================================================
// COMPOSER
// =============================================================================

/// Builds [`QueryFragments`] for a dialect.
#[derive(Debug, Clone, Default)]
pub struct PredicateComposer<D: SqlDialect = Postgres> {
    dialect: D,
}

impl PredicateComposer<Postgres> {
    /// Composer for PostgreSQL.
    pub fn postgres() -> Self {
        Self { dialect: Postgres }
    }
}

impl<D: SqlDialect> PredicateComposer<D> {
    pub fn new(dialect: D) -> Self {
        Self { dialect }
    }

    /// Compose the full query for a filter.
    ///
    /// Never fails: structural validation happens before composition, and
    /// incomplete attribute filters contribute nothing.
    pub fn compose(&self, filter: &ProductSearchFilter, sort: SortSpec) -> QueryFragments {
        let f = self.scope(QueryFragments::base(), filter);
        let f = self.text(f, filter.text_query());
        let f = self.categories(f, filter);
        let f = self.identities(f, filter);
        let f = self.ranges(f, filter);
        let f = self.flags(f, filter);
        let fragments = filter
            .attribute_predicates()
            .iter()
            .fold(f, |f, predicate| self.attribute(f, predicate));
        self.sort(fragments, sort, filter.text_query())
    }

    fn scope(&self, f: QueryFragments, filter: &ProductSearchFilter) -> QueryFragments {
        let storefront = filter.scope == SearchScope::Storefront;

        let status = filter
            .status
            .or(storefront.then_some(ProductStatus::Active));
        let f = match status {
            Some(status) => {
                let (f, n) = f.bind(QueryParam::String(status.as_str().to_string()));
                f.condition(format!("p.status = {}", self.dialect.placeholder(n)))
            }
            None => f,
        };

        match (filter.visibility, storefront) {
            (Some(visibility), _) => {
                let (f, n) = f.bind(QueryParam::String(visibility.as_str().to_string()));
                f.condition(format!("p.visibility = {}", self.dialect.placeholder(n)))
            }
            (None, true) => {
                let searchable = ProductVisibility::SEARCHABLE
                    .iter()
                    .map(|v| v.as_str().to_string())
                    .collect();
                let (f, n) = f.bind(QueryParam::StringArray(searchable));
                let sql = self.dialect.in_array("p.visibility", n, ArrayType::Text);
                f.condition(sql)
            }
            (None, false) => f,
        }
    }

    fn text(&self, f: QueryFragments, query: Option<&str>) -> QueryFragments {
        let Some(query) = query else {
            return f;
        };
        let (f, n) = f.bind(QueryParam::String(format!("%{}%", escape_like(query))));
        let any_column = [
            "p.name",
            "p.description",
            "p.short_description",
            "p.sku",
            "p.slug",
        ]
        .iter()
        .map(|column| self.dialect.ilike(column, n))
        .collect::<Vec<_>>()
        .join(" OR ");
        f.condition(format!("({any_column})"))
    }

    fn categories(&self, f: QueryFragments, filter: &ProductSearchFilter) -> QueryFragments {
        if !filter.has_category_constraint() {
            return f;
        }
        let mut f = f;
        if !f.category_joined {
            f = f.join("INNER JOIN product_category_map pcm ON pcm.product_id = p.id".to_string());
            f.category_joined = true;
        }
        if let Some(category_id) = filter.category_id {
            let (next, n) = f.bind(QueryParam::Uuid(category_id));
            f = next.condition(format!("pcm.category_id = {}", self.dialect.placeholder(n)));
        }
        if let Some(ids) = filter.category_ids.as_ref().filter(|ids| !ids.is_empty()) {
            let (next, n) = f.bind(QueryParam::UuidArray(ids.clone()));
            f = next.condition(self.dialect.in_array("pcm.category_id", n, ArrayType::Uuid));
        }
        f
    }

    fn identities(&self, f: QueryFragments, filter: &ProductSearchFilter) -> QueryFragments {
        let mut f = f;
        if let Some(brand_id) = filter.brand_id {
            let (next, n) = f.bind(QueryParam::Uuid(brand_id));
            f = next.condition(format!("p.brand_id = {}", self.dialect.placeholder(n)));
        }
        if let Some(ids) = filter.brand_ids.as_ref().filter(|ids| !ids.is_empty()) {
            let (next, n) = f.bind(QueryParam::UuidArray(ids.clone()));
            f = next.condition(self.dialect.in_array("p.brand_id", n, ArrayType::Uuid));
        }
        if let Some(product_type_id) = filter.product_type_id {
            let (next, n) = f.bind(QueryParam::Uuid(product_type_id));
            f = next.condition(format!(
                "p.product_type_id = {}",
                self.dialect.placeholder(n)
            ));
        }
        f
    }

    fn ranges(&self, f: QueryFragments, filter: &ProductSearchFilter) -> QueryFragments {
        [(">=", filter.min_price), ("<=", filter.max_price)]
            .into_iter()
            .fold(f, |f, (op, bound)| match bound {
                Some(price) => {
                    let (f, n) = f.bind(QueryParam::Float(price));
                    f.condition(format!("p.price {op} {}", self.dialect.placeholder(n)))
                }
                None => f,
            })
    }

    fn flags(&self, f: QueryFragments, filter: &ProductSearchFilter) -> QueryFragments {
        let f = [
            ("p.is_featured", filter.is_featured),
            ("p.is_new", filter.is_new),
            ("p.is_bestseller", filter.is_bestseller),
            ("p.has_variants", filter.has_variants),
        ]
        .into_iter()
        .fold(f, |f, (column, flag)| match flag {
            Some(flag) => {
                let (f, n) = f.bind(QueryParam::Bool(flag));
                f.condition(format!("{column} = {}", self.dialect.placeholder(n)))
            }
            None => f,
        });

        match filter.in_stock {
            Some(true) => f.condition("p.stock_quantity > 0".to_string()),
            Some(false) => f.condition("p.stock_quantity <= 0".to_string()),
            None => f,
        }
    }

    /// Join the value map under a fresh alias and constrain it.
    fn attribute(&self, f: QueryFragments, predicate: &AttributePredicate) -> QueryFragments {
        let i = f.attribute_joins;
        let pav = format!("pav{i}");

        let (f, attribute_match) = match &predicate.attribute {
            AttributeRef::Id(id) => {
                let (f, n) = f.bind(QueryParam::Uuid(*id));
                (f, self.dialect.placeholder(n))
            }
            AttributeRef::Code(code) => {
                let attr = format!("attr{i}");
                let (f, n) = f.bind(QueryParam::String(code.clone()));
                let f = f.join(format!(
                    "INNER JOIN attributes {attr} ON {attr}.code = {}",
                    self.dialect.placeholder(n)
                ));
                (f, format!("{attr}.id"))
            }
        };
        let mut f = f.join(format!(
            "INNER JOIN attribute_value_map {pav} ON {pav}.product_id = p.id AND {pav}.attribute_id = {attribute_match}"
        ));
        f.attribute_joins += 1;

        let value = format!("{pav}.value");
        let numeric = self.dialect.to_number(&value);
        match &predicate.comparison {
            Comparison::Equals(v) => {
                let (f, n) = f.bind(QueryParam::String(v.clone()));
                f.condition(format!("{value} = {}", self.dialect.placeholder(n)))
            }
            Comparison::NotEquals(v) => {
                let (f, n) = f.bind(QueryParam::String(v.clone()));
                f.condition(format!("{value} <> {}", self.dialect.placeholder(n)))
            }
            Comparison::In(values) => {
                let (f, n) = f.bind(QueryParam::StringArray(values.clone()));
                f.condition(self.dialect.in_array(&value, n, ArrayType::Text))
            }
            Comparison::NotIn(values) => {
                let (f, n) = f.bind(QueryParam::StringArray(values.clone()));
                f.condition(self.dialect.not_in_array(&value, n, ArrayType::Text))
            }
            Comparison::GreaterThan(x) => self.numeric(f, &numeric, ">", *x),
            Comparison::GreaterOrEqual(x) => self.numeric(f, &numeric, ">=", *x),
            Comparison::LessThan(x) => self.numeric(f, &numeric, "<", *x),
            Comparison::LessOrEqual(x) => self.numeric(f, &numeric, "<=", *x),
            Comparison::Between(low, high) => {
                let (f, lo) = f.bind(QueryParam::Float(*low));
                let (f, hi) = f.bind(QueryParam::Float(*high));
                f.condition(format!(
                    "{numeric} BETWEEN {} AND {}",
                    self.dialect.placeholder(lo),
                    self.dialect.placeholder(hi)
                ))
            }
            Comparison::Contains(needle) => {
                let (f, n) = f.bind(QueryParam::String(format!("%{}%", escape_like(needle))));
                f.condition(self.dialect.ilike(&value, n))
            }
        }
    }

    fn numeric(&self, f: QueryFragments, numeric: &str, op: &str, bound: f64) -> QueryFragments {
        let (f, n) = f.bind(QueryParam::Float(bound));
        f.condition(format!("{numeric} {op} {}", self.dialect.placeholder(n)))
    }

    /// Resolve the sort into ORDER BY terms. Always ends with `p.id ASC`.
    fn sort(&self, f: QueryFragments, sort: SortSpec, query: Option<&str>) -> QueryFragments {
        let dir = sort.direction.as_sql();
        let f = match sort.field {
            SortField::Name => f.order(format!("p.name {dir}")),
            SortField::Price => f.order(format!("p.price {dir}")),
            SortField::CreatedAt => f.order(format!("p.created_at {dir}")),
            SortField::Popularity => f
                .order(format!("p.review_count {dir}"))
                .order(self.dialect.order_nulls_last("p.rating", sort.direction)),
            SortField::Rating => f.order(self.dialect.order_nulls_last("p.rating", sort.direction)),
            SortField::Relevance => self.relevance(f, query),
        };
        f.order("p.id ASC".to_string())
    }

    /// Rank buckets: exact name, substring name, exact sku, everything else.
    fn relevance(&self, f: QueryFragments, query: Option<&str>) -> QueryFragments {
        let f = match query {
            Some(query) => {
                let (f, exact) = f.bind_order(QueryParam::String(query.to_string()));
                let (f, pattern) =
                    f.bind_order(QueryParam::String(format!("%{}%", escape_like(query))));
                let rank = format!(
                    "CASE WHEN {} THEN 1 WHEN {} THEN 2 WHEN {} THEN 3 ELSE 4 END ASC",
                    self.dialect.equals_ci("p.name", exact),
                    self.dialect.ilike("p.name", pattern),
                    self.dialect.equals_ci("p.sku", exact),
                );
                f.order(rank)
            }
            None => f,
        };
        f.order(format!("p.is_featured {}", SortDirection::Desc.as_sql()))
            .order(format!("p.created_at {}", SortDirection::Desc.as_sql()))
    }
}
