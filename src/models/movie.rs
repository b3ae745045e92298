use serde::{Deserialize, Serialize};

/// One movie as returned by the metadata API. Field names match the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub original_language: String,
}

impl MovieSummary {
    /// Release year for display, if the date is present and well formed.
    #[must_use]
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .filter(|y| y.chars().all(|c| c.is_ascii_digit()))
    }

    /// Builds the poster URL stored with a trending record.
    ///
    /// The path is appended verbatim after a separator, so TMDB's leading
    /// slash yields a double slash. The image CDN accepts both forms.
    #[must_use]
    pub fn poster_url(&self, image_base_url: &str) -> String {
        format!(
            "{}/{}",
            image_base_url,
            self.poster_path.as_deref().unwrap_or_default()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(release_date: Option<&str>, poster_path: Option<&str>) -> MovieSummary {
        MovieSummary {
            id: 438_631,
            title: "Dune".to_string(),
            vote_average: 7.8,
            poster_path: poster_path.map(str::to_string),
            release_date: release_date.map(str::to_string),
            original_language: "en".to_string(),
        }
    }

    #[test]
    fn test_deserialize_tmdb_shape() {
        let json = r#"{
            "id": 438631,
            "title": "Dune",
            "vote_average": 7.8,
            "poster_path": "/d5NXSklXo0qyIYkgV94XAgMIckC.jpg",
            "release_date": "2021-09-15",
            "original_language": "en",
            "adult": false,
            "genre_ids": [878, 12]
        }"#;

        let parsed: MovieSummary = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.id, 438_631);
        assert_eq!(parsed.release_year(), Some("2021"));
    }

    #[test]
    fn test_deserialize_tolerates_missing_optional_fields() {
        let parsed: MovieSummary =
            serde_json::from_str(r#"{"id": 1, "title": "Untitled", "poster_path": null}"#).unwrap();
        assert_eq!(parsed.poster_path, None);
        assert_eq!(parsed.release_year(), None);
        assert!(parsed.original_language.is_empty());
    }

    #[test]
    fn test_release_year_rejects_garbage() {
        assert_eq!(movie(Some(""), None).release_year(), None);
        assert_eq!(movie(Some("TBA"), None).release_year(), None);
    }

    #[test]
    fn test_poster_url_formats_with_base() {
        let m = movie(None, Some("/abc.jpg"));
        assert_eq!(
            m.poster_url("https://image.tmdb.org/t/p/w500"),
            "https://image.tmdb.org/t/p/w500//abc.jpg"
        );
    }
}
