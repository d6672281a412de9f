//! In-memory `MovieRepo` used by handler and router tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repos::error::RepoError;
use crate::repos::movie_repo::{MovieFields, MovieRepo, MovieRow};

#[derive(Clone, Debug, Default)]
pub struct MemoryMovieRepo {
    rows: Arc<RwLock<HashMap<Uuid, MovieRow>>>,
}

impl MemoryMovieRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MovieRepo for MemoryMovieRepo {
    async fn ping(&self) -> Result<(), RepoError> {
        Ok(())
    }

    async fn list(&self) -> Result<Vec<MovieRow>, RepoError> {
        let rows = self.rows.read().await;
        let mut res: Vec<MovieRow> = rows.values().cloned().collect();
        res.sort_by(|a, b| a.released.cmp(&b.released).then_with(|| a.title.cmp(&b.title)));
        Ok(res)
    }

    async fn create(&self, fields: MovieFields, username: &str) -> Result<MovieRow, RepoError> {
        let mut rows = self.rows.write().await;
        ensure_unique(&rows, &fields, None)?;

        let now = Utc::now();
        let row = MovieRow {
            id: Uuid::new_v4(),
            title: fields.title,
            rated: fields.rated,
            released: fields.released,
            run_time: fields.run_time,
            director: fields.director,
            writer: fields.writer,
            create_user: username.to_owned(),
            created_at: now,
            update_user: username.to_owned(),
            updated_at: now,
        };
        rows.insert(row.id, row.clone());

        Ok(row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<MovieRow>, RepoError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        fields: MovieFields,
        username: &str,
    ) -> Result<Option<MovieRow>, RepoError> {
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&id) {
            return Ok(None);
        }
        ensure_unique(&rows, &fields, Some(id))?;

        let Some(row) = rows.get_mut(&id) else {
            return Ok(None);
        };
        row.title = fields.title;
        row.rated = fields.rated;
        row.released = fields.released;
        row.run_time = fields.run_time;
        row.director = fields.director;
        row.writer = fields.writer;
        row.update_user = username.to_owned();
        row.updated_at = Utc::now();

        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<MovieRow>, RepoError> {
        Ok(self.rows.write().await.remove(&id))
    }
}

// Same rule as the movies_title_released_key constraint.
fn ensure_unique(
    rows: &HashMap<Uuid, MovieRow>,
    fields: &MovieFields,
    except: Option<Uuid>,
) -> Result<(), RepoError> {
    let taken = rows.values().any(|row| {
        Some(row.id) != except && row.title == fields.title && row.released == fields.released
    });

    if taken {
        return Err(RepoError::Conflict {
            title: fields.title.clone(),
            released: fields.released,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::error::{Error, Kind};

    fn fields(title: &str) -> MovieFields {
        MovieFields {
            title: title.to_owned(),
            rated: "R".to_owned(),
            released: NaiveDate::from_ymd_opt(1999, 3, 31).unwrap(),
            run_time: 136,
            director: "Lana Wachowski".to_owned(),
            writer: "Lilly Wachowski".to_owned(),
        }
    }

    #[tokio::test]
    async fn create_then_get() {
        let repo = MemoryMovieRepo::new();
        let row = repo.create(fields("The Matrix"), "root@example.com").await.unwrap();

        let got = repo.get(row.id).await.unwrap().unwrap();
        assert_eq!(got, row);
        assert_eq!(got.create_user, "root@example.com");
    }

    #[tokio::test]
    async fn duplicate_title_and_release_is_a_conflict() {
        let repo = MemoryMovieRepo::new();
        repo.create(fields("The Matrix"), "root@example.com").await.unwrap();

        let err = repo
            .create(fields("The Matrix"), "root@example.com")
            .await
            .unwrap_err();
        assert_eq!(Error::from(err).kind(), Kind::Exist);
    }

    #[tokio::test]
    async fn update_stamps_the_acting_user() {
        let repo = MemoryMovieRepo::new();
        let row = repo.create(fields("The Matrix"), "root@example.com").await.unwrap();

        let mut changed = fields("The Matrix");
        changed.rated = "PG-13".to_owned();
        let updated = repo
            .update(row.id, changed, "ops@example.com")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.rated, "PG-13");
        assert_eq!(updated.create_user, "root@example.com");
        assert_eq!(updated.update_user, "ops@example.com");
    }

    #[tokio::test]
    async fn update_cannot_collide_with_another_movie() {
        let repo = MemoryMovieRepo::new();
        repo.create(fields("The Matrix"), "root@example.com").await.unwrap();
        let other = repo.create(fields("Bound"), "root@example.com").await.unwrap();

        let err = repo
            .update(other.id, fields("The Matrix"), "root@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Conflict { .. }));
    }

    #[tokio::test]
    async fn missing_rows() {
        let repo = MemoryMovieRepo::new();
        let id = Uuid::new_v4();

        assert!(repo.get(id).await.unwrap().is_none());
        assert!(repo.update(id, fields("x"), "u").await.unwrap().is_none());
        assert!(repo.delete(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_is_ordered_by_release() {
        let repo = MemoryMovieRepo::new();
        let mut late = fields("Jupiter Ascending");
        late.released = NaiveDate::from_ymd_opt(2015, 2, 6).unwrap();
        repo.create(late, "u").await.unwrap();
        repo.create(fields("The Matrix"), "u").await.unwrap();

        let titles: Vec<String> = repo.list().await.unwrap().into_iter().map(|m| m.title).collect();
        assert_eq!(titles, vec!["The Matrix", "Jupiter Ascending"]);
    }
}
