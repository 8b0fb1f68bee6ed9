//! Integration tests for the PostgreSQL repository, value loader and
//! paginator. They need a real database: set `DATABASE_URL` (a `.env`
//! file works) or the tests skip themselves.
use std::env;
use std::sync::Arc;

use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use facet_repository::{
    AppliedFilter, DataPaginator, DataRecord, DataRepository, PostgresDataRepository, ValueLoader,
};
use facet_schema::{AttributeDef, AttributeValue, FamilyDef, Schema, SchemaConfig};

async fn test_pool() -> Option<sqlx::PgPool> {
    dotenv().ok();
    let url = match env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL not set, skipping postgres integration test");
            return None;
        }
    };
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("failed to connect to DATABASE_URL");
    sqlx::migrate!("src/postgres/migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");
    Some(pool)
}

/// Schema with a per-run family code so reruns against a shared database
/// never see each other's rows.
fn test_schema() -> (Schema, String) {
    let family_code = format!("product_{}", Uuid::new_v4().simple());
    let config = SchemaConfig {
        attribute_types: vec![],
        attributes: vec![
            AttributeDef {
                code: "title".to_owned(),
                type_code: "string".to_owned(),
                multiple: true,
                required: true,
                searchable: true,
            },
            AttributeDef {
                code: "stock".to_owned(),
                type_code: "integer".to_owned(),
                multiple: false,
                required: false,
                searchable: false,
            },
        ],
        families: vec![FamilyDef {
            code: family_code.clone(),
            parent: None,
            attributes: vec!["title".to_owned(), "stock".to_owned()],
        }],
    };
    (Schema::from_config(config).unwrap(), family_code)
}

async fn seed_records(
    repository: &PostgresDataRepository,
    schema: &Schema,
    family_code: &str,
    titles: &[&str],
) -> Vec<DataRecord> {
    let family = schema.families().get(family_code).unwrap();
    let title = family.attribute("title").unwrap();
    let stock = family.attribute("stock").unwrap();

    let mut records = Vec::new();
    for (index, text) in titles.iter().enumerate() {
        let mut record = DataRecord::new(family, family_code);
        record
            .set_value(title, 0, AttributeValue::from(*text))
            .unwrap();
        record
            .set_value(stock, 0, AttributeValue::from(index as i64))
            .unwrap();
        records.push(record);
    }

    let values: Vec<_> = records
        .iter()
        .flat_map(|record| record.values.iter().cloned())
        .collect();

    let mut tx = repository.pool().begin().await.unwrap();
    repository.insert_data(&records, &mut tx).await.unwrap();
    repository.upsert_values(&values, &mut tx).await.unwrap();
    tx.commit().await.unwrap();

    records
}

#[tokio::test]
async fn loader_attaches_values_in_one_pass_and_is_idempotent() {
    let Some(pool) = test_pool().await else { return };
    let repository = PostgresDataRepository::new(pool.clone());
    let (schema, family_code) = test_schema();

    let seeded = seed_records(&repository, &schema, &family_code, &["alpha", "beta", "gamma"]).await;

    // Re-fetch the page without values, preserving the seeded order.
    let mut page: Vec<DataRecord> = Vec::new();
    for record in &seeded {
        page.push(repository.get_data(&record.id).await.unwrap());
    }
    assert!(page.iter().all(|record| record.values.is_empty()));

    let loader = ValueLoader::new(pool);
    loader.attach(&mut page).await.unwrap();

    assert_eq!(page.len(), seeded.len());
    for (loaded, original) in page.iter().zip(&seeded) {
        assert_eq!(loaded.id, original.id);
        assert_eq!(loaded.values.len(), 2);
        assert!(loaded
            .values
            .iter()
            .all(|value| value.populated_columns() == 1));
    }

    // Second load attaches the same set, no duplicates.
    loader.attach(&mut page).await.unwrap();
    assert!(page.iter().all(|record| record.values.len() == 2));
}

#[tokio::test]
async fn paginator_filters_by_attribute_and_attaches_values() {
    let Some(pool) = test_pool().await else { return };
    let repository = PostgresDataRepository::new(pool.clone());
    let (schema, family_code) = test_schema();

    seed_records(
        &repository,
        &schema,
        &family_code,
        &["alpha", "alpine", "beta"],
    )
    .await;

    let family = schema.families().get(&family_code).unwrap();
    let title = Arc::clone(family.attribute("title").unwrap());

    let paginator = DataPaginator::new(pool);
    let page = paginator
        .fetch_page(&family_code, &[AppliedFilter::new(title.clone(), "al")], 10, 0)
        .await
        .unwrap();

    assert_eq!(page.len(), 2);
    for record in &page {
        let first_title = record.values_of("title").next().unwrap();
        assert!(first_title.string_value.as_deref().unwrap().starts_with("al"));
    }

    // An empty filter is a no-op and the limit still slices the page.
    let page = paginator
        .fetch_page(&family_code, &[AppliedFilter::new(title, "")], 2, 0)
        .await
        .unwrap();
    assert_eq!(page.len(), 2);
}

#[tokio::test]
async fn upsert_converges_on_the_last_written_value() {
    let Some(pool) = test_pool().await else { return };
    let repository = PostgresDataRepository::new(pool.clone());
    let (schema, family_code) = test_schema();

    let mut seeded = seed_records(&repository, &schema, &family_code, &["draft"]).await;
    let record = &mut seeded[0];

    // Rewrite the title at the same (data, attribute, position) key.
    let family = schema.families().get(&family_code).unwrap();
    let title = family.attribute("title").unwrap();
    let rewritten = facet_repository::ValueRow::new(
        record.id,
        title,
        0,
        AttributeValue::from("published"),
    )
    .unwrap();

    let mut tx = repository.pool().begin().await.unwrap();
    repository
        .upsert_values(std::slice::from_ref(&rewritten), &mut tx)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let mut page = vec![repository.get_data(&record.id).await.unwrap()];
    ValueLoader::new(pool).attach(&mut page).await.unwrap();

    let titles: Vec<_> = page[0]
        .values_of("title")
        .filter_map(|value| value.string_value.as_deref())
        .collect();
    assert_eq!(titles, vec!["published"]);
}

#[tokio::test]
async fn deleting_data_cascades_to_its_values() {
    let Some(pool) = test_pool().await else { return };
    let repository = PostgresDataRepository::new(pool.clone());
    let (schema, family_code) = test_schema();

    let seeded = seed_records(&repository, &schema, &family_code, &["alpha"]).await;
    let data_id = seeded[0].id;

    let mut tx = repository.pool().begin().await.unwrap();
    repository.delete_data(&[data_id], &mut tx).await.unwrap();
    tx.commit().await.unwrap();

    let orphans: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM data_values WHERE data_id = $1")
            .bind(data_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(orphans, 0);
}
