//! Dataset repository for PostgreSQL.
//!
//! Datasets and their children are written in one transaction per dataset.
//! Facet filters are translated to SQL with [`QueryBuilder`]; every term is
//! bound as a parameter, only column names from [`TextColumn`] are spliced in.

use std::collections::HashMap;

use boreal_core::error::AppError;
use boreal_core::facets::{DatasetFilter, FilterClause, TextMatch};
use boreal_core::models::{
    Contact, Dataset, DatasetDetail, DateInfo, HarvestConfig, ImportCounts, NewDatasetGraph,
    Publication,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::{PgPool, Pool, Postgres, QueryBuilder};
use uuid::Uuid;

/// Column list for SELECT queries. Must remain a const literal to ensure SQL safety
/// since format!() bypasses sqlx compile-time validation.
const DATASET_COLUMNS: &str =
    "id, name, identifier, url, description, keywords, subjects, authors, imported_at";

/// Same columns qualified with the `d` alias used by filter queries.
const QUALIFIED_DATASET_COLUMNS: &str = "d.id, d.name, d.identifier, d.url, d.description, d.keywords, d.subjects, d.authors, d.imported_at";

/// Default ordering: import order.
const DEFAULT_ORDER: &str = "d.seq";

/// Repository for dataset persistence in PostgreSQL.
///
/// # Examples
///
/// ```no_run
/// use sqlx::postgres::PgPoolOptions;
/// use boreal_db::DatasetRepository;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = PgPoolOptions::new()
///     .max_connections(5)
///     .connect("postgresql://localhost/boreal")
///     .await?;
///
/// let repo = DatasetRepository::new(pool);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DatasetRepository {
    pool: Pool<Postgres>,
}

impl DatasetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a dataset with its contacts, publications and dates.
    ///
    /// All rows are written in a single transaction; on any error nothing is
    /// kept.
    pub async fn create(&self, graph: &NewDatasetGraph) -> Result<Dataset, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::DatabaseError)?;
        let new = &graph.dataset;

        let dataset: Dataset = sqlx::query_as(&format!(
            r#"
            INSERT INTO datasets (name, identifier, url, description, keywords, subjects, authors)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            DATASET_COLUMNS
        ))
        .bind(&new.name)
        .bind(&new.identifier)
        .bind(&new.url)
        .bind(&new.description)
        .bind(&new.keywords)
        .bind(&new.subjects)
        .bind(&new.authors)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::DatabaseError)?;

        for (position, contact) in graph.contacts.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO contacts (dataset_id, position, name, affiliation)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(dataset.id)
            .bind(position as i32)
            .bind(&contact.name)
            .bind(&contact.affiliation)
            .execute(&mut *tx)
            .await
            .map_err(AppError::DatabaseError)?;
        }

        for (position, publication) in graph.publications.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO publications (dataset_id, position, citation, url)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(dataset.id)
            .bind(position as i32)
            .bind(&publication.citation)
            .bind(&publication.url)
            .execute(&mut *tx)
            .await
            .map_err(AppError::DatabaseError)?;
        }

        if let Some(dates) = &graph.date_info {
            sqlx::query(
                r#"
                INSERT INTO date_infos (dataset_id, created_at, updated_at, published_at)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(dataset.id)
            .bind(dates.created_at)
            .bind(dates.updated_at)
            .bind(dates.published_at)
            .execute(&mut *tx)
            .await
            .map_err(AppError::DatabaseError)?;
        }

        tx.commit().await.map_err(AppError::DatabaseError)?;
        Ok(dataset)
    }

    /// Returns every dataset satisfying the filter, with children loaded.
    pub async fn find_by_filter(
        &self,
        filter: &DatasetFilter,
    ) -> Result<Vec<DatasetDetail>, AppError> {
        let mut qb = filter_query(filter);
        let datasets: Vec<Dataset> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;

        self.load_details(datasets).await
    }

    /// Retrieves one dataset with its children.
    pub async fn get_detail(&self, id: Uuid) -> Result<Option<DatasetDetail>, AppError> {
        let dataset: Option<Dataset> = sqlx::query_as(&format!(
            "SELECT {} FROM datasets WHERE id = $1",
            DATASET_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        match dataset {
            Some(dataset) => Ok(self.load_details(vec![dataset]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn exists_by_name(&self, name: &str) -> Result<bool, AppError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM datasets WHERE name = $1)")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Deletes a dataset; contacts, publications and dates go with it.
    /// Returns true if a row was deleted.
    pub async fn delete_cascade(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM datasets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn counts(&self) -> Result<ImportCounts, AppError> {
        let row: CountsRow = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM datasets) AS datasets,
                (SELECT COUNT(*) FROM contacts) AS contacts,
                (SELECT COUNT(*) FROM publications) AS publications,
                (SELECT COUNT(*) FROM date_infos) AS date_infos
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        Ok(ImportCounts {
            datasets: row.datasets.unwrap_or(0),
            contacts: row.contacts.unwrap_or(0),
            publications: row.publications.unwrap_or(0),
            date_infos: row.date_infos.unwrap_or(0),
        })
    }

    pub async fn list_harvest_configs(&self) -> Result<Vec<HarvestConfig>, AppError> {
        sqlx::query_as(
            r#"
            SELECT id, source_url, frequency, filters, active
            FROM harvest_configs
            ORDER BY source_url, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::DatabaseError)
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;
        Ok(())
    }

    /// Attaches contacts, publications and dates, preserving dataset order.
    async fn load_details(&self, datasets: Vec<Dataset>) -> Result<Vec<DatasetDetail>, AppError> {
        if datasets.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = datasets.iter().map(|d| d.id).collect();

        let contacts: Vec<Contact> = sqlx::query_as(
            r#"
            SELECT id, dataset_id, position, name, affiliation
            FROM contacts
            WHERE dataset_id = ANY($1)
            ORDER BY dataset_id, position
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        let publications: Vec<Publication> = sqlx::query_as(
            r#"
            SELECT id, dataset_id, position, citation, url
            FROM publications
            WHERE dataset_id = ANY($1)
            ORDER BY dataset_id, position
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        let date_infos: Vec<DateInfo> = sqlx::query_as(
            r#"
            SELECT id, dataset_id, created_at, updated_at, published_at
            FROM date_infos
            WHERE dataset_id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        let mut contacts_by_dataset: HashMap<Uuid, Vec<Contact>> = HashMap::new();
        for contact in contacts {
            contacts_by_dataset
                .entry(contact.dataset_id)
                .or_default()
                .push(contact);
        }

        let mut publications_by_dataset: HashMap<Uuid, Vec<Publication>> = HashMap::new();
        for publication in publications {
            publications_by_dataset
                .entry(publication.dataset_id)
                .or_default()
                .push(publication);
        }

        let mut dates_by_dataset: HashMap<Uuid, DateInfo> = date_infos
            .into_iter()
            .map(|d| (d.dataset_id, d))
            .collect();

        Ok(datasets
            .into_iter()
            .map(|dataset| {
                let id = dataset.id;
                DatasetDetail {
                    dataset,
                    contacts: contacts_by_dataset.remove(&id).unwrap_or_default(),
                    publications: publications_by_dataset.remove(&id).unwrap_or_default(),
                    date_info: dates_by_dataset.remove(&id),
                }
            })
            .collect())
    }
}

/// Builds the SELECT for a facet filter.
///
/// `date_infos` is joined one-to-one, so the join never duplicates rows.
fn filter_query(filter: &DatasetFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {} FROM datasets d LEFT JOIN date_infos di ON di.dataset_id = d.id WHERE TRUE",
        QUALIFIED_DATASET_COLUMNS
    ));

    for clause in &filter.clauses {
        qb.push(" AND ");
        match clause {
            FilterClause::AnyOf(options) => push_any_of(&mut qb, options),
            FilterClause::PublishedFrom(date) => {
                qb.push("di.published_at >= ");
                qb.push_bind(start_of_day(*date));
            }
            FilterClause::PublishedUntil(date) => match date.succ_opt() {
                Some(next) => {
                    qb.push("di.published_at < ");
                    qb.push_bind(start_of_day(next));
                }
                None => {
                    qb.push("di.published_at IS NOT NULL");
                }
            },
        }
    }

    qb.push(" ORDER BY ");
    qb.push(filter.ordering.map_or(DEFAULT_ORDER, |o| o.sql()));
    qb
}

fn push_any_of(qb: &mut QueryBuilder<'static, Postgres>, options: &[TextMatch]) {
    if options.is_empty() {
        qb.push("TRUE");
        return;
    }

    qb.push("(");
    for (i, option) in options.iter().enumerate() {
        if i > 0 {
            qb.push(" OR ");
        }
        qb.push("POSITION(LOWER(");
        qb.push_bind(option.term.clone());
        qb.push(") IN LOWER(COALESCE(d.");
        qb.push(option.column.column_name());
        qb.push(", ''))) > 0");
    }
    qb.push(")");
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Helper struct for deserializing aggregate counts from the database.
#[derive(sqlx::FromRow)]
struct CountsRow {
    datasets: Option<i64>,
    contacts: Option<i64>,
    publications: Option<i64>,
    date_infos: Option<i64>,
}

// =============================================================================
// Trait Implementation: DatasetStore
// =============================================================================

impl boreal_core::traits::DatasetStore for DatasetRepository {
    async fn create_dataset(&self, graph: &NewDatasetGraph) -> Result<Dataset, AppError> {
        DatasetRepository::create(self, graph).await
    }

    async fn find_by_filter(&self, filter: &DatasetFilter) -> Result<Vec<DatasetDetail>, AppError> {
        DatasetRepository::find_by_filter(self, filter).await
    }

    async fn get_detail(&self, id: Uuid) -> Result<Option<DatasetDetail>, AppError> {
        DatasetRepository::get_detail(self, id).await
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, AppError> {
        DatasetRepository::exists_by_name(self, name).await
    }

    async fn delete_cascade(&self, id: Uuid) -> Result<bool, AppError> {
        DatasetRepository::delete_cascade(self, id).await
    }

    async fn counts(&self) -> Result<ImportCounts, AppError> {
        DatasetRepository::counts(self).await
    }

    async fn list_harvest_configs(&self) -> Result<Vec<HarvestConfig>, AppError> {
        DatasetRepository::list_harvest_configs(self).await
    }

    async fn health_check(&self) -> Result<(), AppError> {
        DatasetRepository::health_check(self).await
    }
}
