use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Encounter {
    pub id: i64,
    pub pokemon: String,
    pub location: String,
    pub date: NaiveDate,
    pub notes: String,
}

impl Encounter {
    /// Entries on the same day are ordered by when they were logged.
    pub fn order_key(&self) -> (NaiveDate, i64) {
        (self.date, self.id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEncounter {
    pub pokemon: String,
    pub location: String,
    pub date: NaiveDate,
    pub notes: String,
}

/// A row of the CSV log kept by earlier versions. Older files have no
/// Notes column.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Pokemon")]
    pokemon: String,
    #[serde(rename = "Location")]
    location: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Notes", default)]
    notes: String,
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Creates the schema and seeds an empty log from `legacy_csv` if that file
/// exists.
pub async fn prepare(pool: &SqlitePool, legacy_csv: Option<&Path>) -> Result<(), AppError> {
    migrate(pool).await?;
    if let Some(path) = legacy_csv {
        import_csv(path, pool).await?;
    }
    Ok(())
}

/// Copies a CSV log into an empty table, keeping row order so later rows
/// still sort after earlier ones on the same day. Returns the number of
/// imported rows.
pub async fn import_csv(path: &Path, pool: &SqlitePool) -> Result<u64, AppError> {
    if !path.is_file() {
        return Ok(0);
    }

    let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM encounters")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        tracing::debug!("Encounter log is not empty, skipping {}", path.display());
        return Ok(0);
    }

    let encounters = read_csv(path)?;

    let mut tx = pool.begin().await?;
    for encounter in &encounters {
        sqlx::query(
            r#"
                INSERT INTO encounters (pokemon, location, date, notes)
                VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&encounter.pokemon)
        .bind(&encounter.location)
        .bind(encounter.date)
        .bind(&encounter.notes)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    tracing::info!("Imported {} encounters from {}", encounters.len(), path.display());
    Ok(encounters.len() as u64)
}

fn read_csv(path: &Path) -> Result<Vec<NewEncounter>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut encounters = Vec::new();
    for (i, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row = row?;
        match NaiveDate::parse_from_str(&row.date, "%m/%d/%Y") {
            Ok(date) => encounters.push(NewEncounter {
                pokemon: row.pokemon,
                location: row.location,
                date,
                notes: row.notes,
            }),
            // header is line 1
            Err(e) => tracing::warn!(line = i + 2, date = %row.date, "Skipping CSV row: {e}"),
        }
    }

    Ok(encounters)
}

pub async fn all(pool: &SqlitePool) -> Result<Vec<Encounter>, sqlx::Error> {
    sqlx::query_as::<_, Encounter>(
        r#"
            SELECT id, pokemon, location, date, notes
            FROM encounters
            ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn latest(pool: &SqlitePool) -> Result<Option<Encounter>, sqlx::Error> {
    sqlx::query_as::<_, Encounter>(
        r#"
            SELECT id, pokemon, location, date, notes
            FROM encounters
            ORDER BY date DESC, id DESC
            LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await
}

pub async fn insert(encounter: &NewEncounter, pool: &SqlitePool) -> Result<Encounter, sqlx::Error> {
    let encounter = sqlx::query_as::<_, Encounter>(
        r#"
            INSERT INTO encounters (pokemon, location, date, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING id, pokemon, location, date, notes
        "#,
    )
    .bind(&encounter.pokemon)
    .bind(&encounter.location)
    .bind(encounter.date)
    .bind(&encounter.notes)
    .fetch_one(pool)
    .await?;

    tracing::debug!(
        id = encounter.id,
        pokemon = %encounter.pokemon,
        "Logged encounter"
    );

    Ok(encounter)
}

#[cfg(test)]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;

    async fn pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        migrate(&pool).await.unwrap();
        pool
    }

    fn csv_file(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("pokemon_usage.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn csv_log_is_imported_once_in_row_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = csv_file(
            &dir,
            "Pokemon,Location,Date,Notes\n\
             Gengar,\"Lavender Town, Tower\",03/01/2024,\n\
             Pikachu,Route 2,3/1/2024,lucky\n\
             Abra,Route 24,not a date,\n",
        );
        let pool = pool().await;

        assert_eq!(import_csv(&path, &pool).await.unwrap(), 2);

        let log = all(&pool).await.unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].pokemon, "Gengar");
        assert_eq!(log[0].location, "Lavender Town, Tower");
        assert_eq!(log[1].pokemon, "Pikachu");
        assert_eq!(log[1].notes, "lucky");
        assert!(log.iter().all(|e| e.date == date));
        assert!(log[0].order_key() < log[1].order_key());

        assert_eq!(import_csv(&path, &pool).await.unwrap(), 0);
        assert_eq!(all(&pool).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn csv_without_notes_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = csv_file(&dir, "Pokemon,Location,Date\nMagikarp,Lake of Rage,12/31/2023\n");
        let pool = pool().await;

        prepare(&pool, Some(&path)).await.unwrap();

        let log = all(&pool).await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].notes, "");
        assert_eq!(log[0].date, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[tokio::test]
    async fn existing_log_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = csv_file(&dir, "Pokemon,Location,Date\nMagikarp,Lake of Rage,12/31/2023\n");
        let pool = pool().await;
        insert(
            &NewEncounter {
                pokemon: "Abra".into(),
                location: "Route 24".into(),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                notes: String::new(),
            },
            &pool,
        )
        .await
        .unwrap();

        assert_eq!(import_csv(&path, &pool).await.unwrap(), 0);
        assert_eq!(all(&pool).await.unwrap().len(), 1);

        let missing = dir.path().join("nope.csv");
        assert_eq!(import_csv(&missing, &pool).await.unwrap(), 0);
    }
}
