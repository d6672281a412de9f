/*
 * Responsibility
 * - Movies の request/response DTO
 * - validation: 入力不備は Kind::Invalid (param "field" に項目名)
 */
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Kind};
use crate::repos::movie_repo::{MovieFields, MovieRow};

const RELEASED_FORMAT: &str = "%Y-%m-%d";

/// Body of `POST /movies` and `PUT /movies/{id}`.
#[derive(Debug, Deserialize)]
pub struct MovieRequest {
    pub title: String,
    pub rated: String,
    pub released: String, // YYYY-MM-DD
    pub run_time: u32,    // minutes
    pub director: String,
    pub writer: String,
}

fn required(field: &'static str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::invalid(format!("{field} is required")).with_param("field", field));
    }
    Ok(())
}

impl MovieRequest {
    pub fn validate(self) -> Result<MovieFields, Error> {
        required("title", &self.title)?;
        required("rated", &self.rated)?;
        required("released", &self.released)?;
        required("director", &self.director)?;
        required("writer", &self.writer)?;

        let released = NaiveDate::parse_from_str(self.released.trim(), RELEASED_FORMAT)
            .map_err(|e| {
                Error::wrap_with(Kind::Invalid, "released must be formatted as YYYY-MM-DD", e)
                    .with_param("field", "released")
            })?;

        // run_time is stored as a postgres integer
        let run_time = i32::try_from(self.run_time)
            .ok()
            .filter(|minutes| *minutes > 0)
            .ok_or_else(|| {
                Error::invalid("run_time must be a positive number of minutes")
                    .with_param("field", "run_time")
            })?;

        Ok(MovieFields {
            title: self.title.trim().to_owned(),
            rated: self.rated.trim().to_owned(),
            released,
            run_time,
            director: self.director.trim().to_owned(),
            writer: self.writer.trim().to_owned(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub external_id: Uuid,
    pub title: String,
    pub rated: String,
    pub released: String,
    pub run_time: u32,
    pub director: String,
    pub writer: String,
    pub create_username: String,
    pub create_timestamp: DateTime<Utc>,
    pub update_username: String,
    pub update_timestamp: DateTime<Utc>,
}

impl From<MovieRow> for MovieResponse {
    fn from(row: MovieRow) -> Self {
        Self {
            external_id: row.id,
            title: row.title,
            rated: row.rated,
            released: row.released.format(RELEASED_FORMAT).to_string(),
            run_time: row.run_time.unsigned_abs(),
            director: row.director,
            writer: row.writer,
            create_username: row.create_user,
            create_timestamp: row.created_at,
            update_username: row.update_user,
            update_timestamp: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteMovieResponse {
    pub external_id: Uuid,
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> MovieRequest {
        MovieRequest {
            title: " Repo Man ".to_owned(),
            rated: "R".to_owned(),
            released: "1984-03-02".to_owned(),
            run_time: 92,
            director: "Alex Cox".to_owned(),
            writer: "Alex Cox".to_owned(),
        }
    }

    #[test]
    fn valid_request_becomes_fields() {
        let fields = request().validate().unwrap();
        assert_eq!(fields.title, "Repo Man");
        assert_eq!(fields.released, NaiveDate::from_ymd_opt(1984, 3, 2).unwrap());
    }

    #[test]
    fn blank_title_names_the_field() {
        let mut req = request();
        req.title = "   ".to_owned();

        let err = req.validate().unwrap_err();
        assert_eq!(err.kind(), Kind::Invalid);
        assert_eq!(err.message(), "title is required");
        assert_eq!(err.params_text(), "field=title");
    }

    #[test]
    fn bad_release_date_is_invalid() {
        let mut req = request();
        req.released = "03/02/1984".to_owned();

        let err = req.validate().unwrap_err();
        assert_eq!(err.kind(), Kind::Invalid);
        assert_eq!(err.params_text(), "field=released");
        assert!(err.cause_text().is_some());
    }

    #[test]
    fn zero_run_time_is_invalid() {
        let mut req = request();
        req.run_time = 0;
        assert_eq!(req.validate().unwrap_err().params_text(), "field=run_time");
    }

    #[test]
    fn run_time_must_fit_the_column() {
        let mut req = request();
        req.run_time = u32::MAX;
        let err = req.validate().unwrap_err();
        assert_eq!(err.kind(), Kind::Invalid);
        assert_eq!(err.params_text(), "field=run_time");
    }
}
