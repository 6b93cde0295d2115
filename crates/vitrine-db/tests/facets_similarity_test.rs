//! Integration tests for facets, similarity, suggestions, and attribute
//! lookup.
//!
//! Run with: `cargo test -p vitrine-db -- --ignored`

use vitrine_db::test_fixtures::{ProductSeed, TestDatabase};
use vitrine_db::{AttributeType, CatalogRepository, ProductStatus, ProductVisibility};

async fn setup() -> TestDatabase {
    dotenvy::dotenv().ok();
    TestDatabase::new().await
}

// =============================================================================
// FACETS
// =============================================================================

#[tokio::test]
#[ignore] // Requires DATABASE_URL
async fn test_price_buckets_never_report_zero_counts() {
    let test_db = setup().await;
    let seeder = test_db.seeder();
    // Clustered at both ends so the middle buckets are empty.
    for price in [10.0, 11.0, 12.0, 99.0, 100.0] {
        seeder
            .product(ProductSeed::new(&format!("Item {price}"), price))
            .await;
    }

    let facets = test_db.catalog.facets(10).await.expect("facets failed");

    assert!(!facets.price_ranges.is_empty());
    assert!(facets.price_ranges.iter().all(|b| b.count > 0));
    let total: i64 = facets.price_ranges.iter().map(|b| b.count).sum();
    assert_eq!(total, 5, "every product lands in exactly one bucket");
    let last = facets.price_ranges.last().unwrap();
    assert_eq!(last.max, 100.0);
    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL
async fn test_single_price_yields_single_bucket() {
    let test_db = setup().await;
    let seeder = test_db.seeder();
    seeder.product(ProductSeed::new("Same A", 25.0)).await;
    seeder.product(ProductSeed::new("Same B", 25.0)).await;

    let facets = test_db.catalog.facets(10).await.unwrap();
    assert_eq!(facets.price_ranges.len(), 1);
    assert_eq!(facets.price_ranges[0].min, 25.0);
    assert_eq!(facets.price_ranges[0].max, 25.0);
    assert_eq!(facets.price_ranges[0].count, 2);
    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL
async fn test_category_and_brand_facets_count_eligible_products_only() {
    let test_db = setup().await;
    let seeder = test_db.seeder();
    let lamps = seeder.category("Lamps").await;
    let desks = seeder.category("Desks").await;
    let acme = seeder.brand("Acme").await;

    seeder
        .product(ProductSeed::new("Lamp One", 20.0).in_category(lamps).brand(acme))
        .await;
    seeder
        .product(ProductSeed::new("Lamp Two", 30.0).in_category(lamps).brand(acme))
        .await;
    seeder
        .product(ProductSeed::new("Desk", 200.0).in_category(desks))
        .await;
    seeder
        .product(
            ProductSeed::new("Hidden Lamp", 20.0)
                .in_category(lamps)
                .brand(acme)
                .visibility(ProductVisibility::Hidden),
        )
        .await;
    seeder
        .product(
            ProductSeed::new("Retired Lamp", 20.0)
                .in_category(lamps)
                .status(ProductStatus::Archived),
        )
        .await;

    let facets = test_db.catalog.facets(10).await.unwrap();

    let names: Vec<(&str, i64)> = facets
        .categories
        .iter()
        .map(|b| (b.name.as_str(), b.count))
        .collect();
    assert_eq!(names, vec![("Lamps", 2), ("Desks", 1)]);
    assert_eq!(facets.brands.len(), 1);
    assert_eq!(facets.brands[0].id, acme);
    assert_eq!(facets.brands[0].count, 2);
    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL
async fn test_attribute_facets_use_display_labels_and_skip_unfilterable() {
    let test_db = setup().await;
    let seeder = test_db.seeder();
    let color = seeder.attribute("color", AttributeType::Enum, true, 2).await;
    let size = seeder.attribute("size", AttributeType::Text, true, 1).await;
    let notes = seeder.attribute("notes", AttributeType::Text, false, 0).await;
    seeder.display_value(color, "blk", "Black").await;

    let a = seeder.product(ProductSeed::new("A", 10.0)).await;
    let b = seeder.product(ProductSeed::new("B", 10.0)).await;
    seeder.set_attribute(a, color, "blk").await;
    seeder.set_attribute(b, color, "blk").await;
    seeder.set_attribute(a, size, "xl").await;
    seeder.set_attribute(a, notes, "fragile").await;

    let facets = test_db.catalog.facets(10).await.unwrap();

    let codes: Vec<&str> = facets.attributes.iter().map(|f| f.code.as_str()).collect();
    assert_eq!(codes, vec!["size", "color"], "ordered by attribute position");

    let color_facet = &facets.attributes[1];
    assert_eq!(color_facet.values.len(), 1);
    assert_eq!(color_facet.values[0].value, "blk");
    assert_eq!(color_facet.values[0].label, "Black");
    assert_eq!(color_facet.values[0].count, 2);

    let size_facet = &facets.attributes[0];
    assert_eq!(size_facet.values[0].label, "xl");
    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL
async fn test_facets_on_empty_catalog() {
    let test_db = setup().await;

    let facets = test_db.catalog.facets(10).await.unwrap();
    assert!(facets.categories.is_empty());
    assert!(facets.brands.is_empty());
    assert!(facets.price_ranges.is_empty());
    assert!(facets.attributes.is_empty());
    test_db.cleanup().await;
}

// =============================================================================
// SIMILARITY
// =============================================================================

#[tokio::test]
#[ignore] // Requires DATABASE_URL
async fn test_similar_excludes_source_and_orders_by_shared_count() {
    let test_db = setup().await;
    let seeder = test_db.seeder();
    let color = seeder.attribute("color", AttributeType::Enum, true, 1).await;
    let size = seeder.attribute("size", AttributeType::Text, true, 2).await;
    let fit = seeder.attribute("fit", AttributeType::Text, true, 3).await;

    let source = seeder.product(ProductSeed::new("Source", 10.0)).await;
    let close = seeder.product(ProductSeed::new("Close", 10.0)).await;
    let distant = seeder.product(ProductSeed::new("Distant", 10.0)).await;
    let unrelated = seeder.product(ProductSeed::new("Unrelated", 10.0)).await;

    for (attribute, value) in [(color, "red"), (size, "m"), (fit, "slim")] {
        seeder.set_attribute(source, attribute, value).await;
    }
    seeder.set_attribute(close, color, "red").await;
    seeder.set_attribute(close, size, "m").await;
    seeder.set_attribute(distant, color, "red").await;
    seeder.set_attribute(unrelated, color, "blue").await;

    let similar = test_db.catalog.similar(source, 10).await.unwrap();

    let ranked: Vec<_> = similar
        .iter()
        .map(|p| (p.id, p.shared_attributes))
        .collect();
    assert_eq!(ranked, vec![(close, Some(2)), (distant, Some(1))]);
    assert!(similar.iter().all(|p| p.id != source));
    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL
async fn test_similar_breaks_ties_by_rating() {
    let test_db = setup().await;
    let seeder = test_db.seeder();
    let color = seeder.attribute("color", AttributeType::Enum, true, 1).await;

    let source = seeder.product(ProductSeed::new("Source", 10.0)).await;
    let unrated = seeder.product(ProductSeed::new("Unrated", 10.0)).await;
    let rated = seeder
        .product(ProductSeed::new("Rated", 10.0).rating(4.5, 10))
        .await;
    for id in [source, unrated, rated] {
        seeder.set_attribute(id, color, "red").await;
    }

    let similar = test_db.catalog.similar(source, 10).await.unwrap();
    let ids: Vec<_> = similar.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![rated, unrated]);
    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL
async fn test_similar_for_product_without_attributes_is_empty() {
    let test_db = setup().await;
    let seeder = test_db.seeder();
    let color = seeder.attribute("color", AttributeType::Enum, true, 1).await;
    let bare = seeder.product(ProductSeed::new("Bare", 10.0)).await;
    let other = seeder.product(ProductSeed::new("Other", 10.0)).await;
    seeder.set_attribute(other, color, "red").await;

    let similar = test_db.catalog.similar(bare, 10).await.unwrap();
    assert!(similar.is_empty());

    let unknown = test_db.catalog.similar(uuid::Uuid::new_v4(), 10).await.unwrap();
    assert!(unknown.is_empty());
    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL
async fn test_similar_skips_deleted_and_inactive_candidates() {
    let test_db = setup().await;
    let seeder = test_db.seeder();
    let color = seeder.attribute("color", AttributeType::Enum, true, 1).await;
    let source = seeder.product(ProductSeed::new("Source", 10.0)).await;
    let live = seeder.product(ProductSeed::new("Live", 10.0)).await;
    let deleted = seeder.product(ProductSeed::new("Gone", 10.0).deleted()).await;
    let draft = seeder
        .product(ProductSeed::new("Draft", 10.0).status(ProductStatus::Draft))
        .await;
    for id in [source, live, deleted, draft] {
        seeder.set_attribute(id, color, "red").await;
    }

    let similar = test_db.catalog.similar(source, 10).await.unwrap();
    let ids: Vec<_> = similar.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![live]);
    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL
async fn test_related_by_category_ranks_by_shared_categories() {
    let test_db = setup().await;
    let seeder = test_db.seeder();
    let office = seeder.category("Office").await;
    let lighting = seeder.category("Lighting").await;

    let source = seeder
        .product(
            ProductSeed::new("Desk Lamp", 30.0)
                .in_category(office)
                .in_category(lighting),
        )
        .await;
    let both = seeder
        .product(
            ProductSeed::new("Task Lamp", 35.0)
                .in_category(office)
                .in_category(lighting),
        )
        .await;
    let one = seeder
        .product(ProductSeed::new("Stapler", 5.0).in_category(office))
        .await;
    seeder
        .product(
            ProductSeed::new("Hidden Lamp", 35.0)
                .in_category(lighting)
                .visibility(ProductVisibility::Hidden),
        )
        .await;

    let related = test_db.catalog.related_by_category(source, 10).await.unwrap();
    let ids: Vec<_> = related.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![both, one]);
    assert!(related.iter().all(|p| p.shared_attributes.is_none()));
    test_db.cleanup().await;
}

// =============================================================================
// SUGGESTIONS AND ATTRIBUTE LOOKUP
// =============================================================================

#[tokio::test]
#[ignore] // Requires DATABASE_URL
async fn test_suggestions_are_distinct_prefix_matches() {
    let test_db = setup().await;
    let seeder = test_db.seeder();
    seeder.product(ProductSeed::new("Wireless Mouse", 25.0)).await;
    seeder.product(ProductSeed::new("Wireless Mouse", 27.0)).await;
    seeder.product(ProductSeed::new("Wired Keyboard", 30.0)).await;
    seeder.product(ProductSeed::new("Mouse Pad Wireless", 5.0)).await;
    seeder
        .product(ProductSeed::new("Wireless Draft", 5.0).status(ProductStatus::Draft))
        .await;

    let names = test_db.catalog.suggestions("wi", 10).await.unwrap();
    assert_eq!(names, vec!["Wired Keyboard", "Wireless Mouse"]);

    let limited = test_db.catalog.suggestions("WI", 1).await.unwrap();
    assert_eq!(limited, vec!["Wired Keyboard"]);
    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL
async fn test_suggestions_blank_prefix_and_wildcards() {
    let test_db = setup().await;
    let seeder = test_db.seeder();
    seeder.product(ProductSeed::new("100% Cotton Tee", 15.0)).await;
    seeder.product(ProductSeed::new("1000 Piece Puzzle", 20.0)).await;

    assert!(test_db.catalog.suggestions("   ", 10).await.unwrap().is_empty());

    let names = test_db.catalog.suggestions("100%", 10).await.unwrap();
    assert_eq!(names, vec!["100% Cotton Tee"]);
    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL
async fn test_find_by_attribute_matches_exact_value() {
    let test_db = setup().await;
    let seeder = test_db.seeder();
    let color = seeder.attribute("color", AttributeType::Enum, true, 1).await;
    let red = seeder
        .product(ProductSeed::new("Red Tee", 10.0).rating(4.0, 3))
        .await;
    let red_best = seeder
        .product(ProductSeed::new("Red Hoodie", 40.0).rating(4.9, 30))
        .await;
    let hidden = seeder
        .product(ProductSeed::new("Red Secret", 10.0).visibility(ProductVisibility::Hidden))
        .await;
    let maroon = seeder.product(ProductSeed::new("Maroon Tee", 10.0)).await;
    seeder.set_attribute(red, color, "red").await;
    seeder.set_attribute(red_best, color, "red").await;
    seeder.set_attribute(hidden, color, "red").await;
    seeder.set_attribute(maroon, color, "dark red").await;

    let products = test_db.catalog.by_attribute("color", "red").await.unwrap();
    let ids: Vec<_> = products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![red_best, red]);

    let missing = test_db.catalog.by_attribute("nonexistent", "red").await.unwrap();
    assert!(missing.is_empty());
    test_db.cleanup().await;
}
