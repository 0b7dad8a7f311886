//! Recommendation history types
use crate::error::{Result, SeedtuneError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What the recommendation was seeded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    /// Seeded from selected tracks
    Track,
    /// Seeded from a library playlist
    Playlist,
    /// Seeded from the user's own taste profile
    My,
}

impl RecommendationKind {
    /// Wire name used by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationKind::Track => "track",
            RecommendationKind::Playlist => "playlist",
            RecommendationKind::My => "my",
        }
    }
}

impl fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecommendationKind {
    type Err = SeedtuneError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "track" => Ok(RecommendationKind::Track),
            "playlist" => Ok(RecommendationKind::Playlist),
            "my" => Ok(RecommendationKind::My),
            other => Err(SeedtuneError::invalid_input(format!(
                "unknown recommendation type: {other}"
            ))),
        }
    }
}

/// One entry of the user's recommendation history
///
/// Seeds are stored comma-joined, exactly as the backend keeps them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Backend recommendation id
    pub recommendation_id: String,

    /// Owner (streaming-platform user id)
    pub user_id: String,

    /// Client-generated id used to deduplicate submissions
    #[serde(default)]
    pub unique_id: Option<String>,

    /// Display title
    pub title: String,

    /// Seed kind
    pub recommendation_type: RecommendationKind,

    /// Seed track ids, comma-joined
    #[serde(default)]
    pub track_ids: String,

    /// Seed artist ids, comma-joined
    #[serde(default)]
    pub artist_ids: String,

    /// Seed artist names, comma-joined
    #[serde(default)]
    pub artist_names: String,

    /// Seed genres, comma-joined
    #[serde(default)]
    pub artist_genres: String,

    /// Cover image
    #[serde(default)]
    pub album_image_url: Option<String>,

    /// Creation timestamp
    #[serde(default)]
    pub create_dt: Option<DateTime<Utc>>,
}

impl Recommendation {
    /// Seed track ids as a list
    pub fn seed_track_ids(&self) -> Vec<&str> {
        split_joined(&self.track_ids)
    }

    /// Seed artist ids as a list
    pub fn seed_artist_ids(&self) -> Vec<&str> {
        split_joined(&self.artist_ids)
    }

    /// Seed genres as a list
    pub fn seed_genres(&self) -> Vec<&str> {
        split_joined(&self.artist_genres)
    }

    /// Check that the entry can be submitted: it needs an id, an owner and
    /// at least one seed
    pub fn validate(&self) -> Result<()> {
        if self.recommendation_id.trim().is_empty() {
            return Err(SeedtuneError::invalid_input("recommendation id is empty"));
        }
        if self.user_id.trim().is_empty() {
            return Err(SeedtuneError::invalid_input("recommendation has no owner"));
        }
        if self.seed_track_ids().is_empty()
            && self.seed_artist_ids().is_empty()
            && self.seed_genres().is_empty()
        {
            return Err(SeedtuneError::invalid_input(format!(
                "recommendation {} has no seeds",
                self.recommendation_id
            )));
        }
        Ok(())
    }
}

fn split_joined(joined: &str) -> Vec<&str> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_str() {
        for kind in [
            RecommendationKind::Track,
            RecommendationKind::Playlist,
            RecommendationKind::My,
        ] {
            assert_eq!(kind.as_str().parse::<RecommendationKind>().unwrap(), kind);
        }
        assert!("album".parse::<RecommendationKind>().is_err());
    }

    fn seeded(track_ids: &str, artist_ids: &str, genres: &str) -> Recommendation {
        Recommendation {
            recommendation_id: "r1".to_string(),
            user_id: "u".to_string(),
            unique_id: None,
            title: "Mix".to_string(),
            recommendation_type: RecommendationKind::Track,
            track_ids: track_ids.to_string(),
            artist_ids: artist_ids.to_string(),
            artist_names: String::new(),
            artist_genres: genres.to_string(),
            album_image_url: None,
            create_dt: None,
        }
    }

    #[test]
    fn validate_requires_a_seed() {
        assert!(seeded("t1", "", "").validate().is_ok());
        assert!(seeded("", "", "jazz").validate().is_ok());

        let err = seeded(" , ", "", "").validate().unwrap_err();
        assert!(matches!(err, SeedtuneError::InvalidInput(msg) if msg.contains("no seeds")));
    }

    #[test]
    fn validate_requires_owner() {
        let mut rec = seeded("t1", "", "");
        rec.user_id = String::new();
        assert!(rec.validate().is_err());
    }

    #[test]
    fn seeds_split_and_trimmed() {
        let json = r#"{
            "recommendationId": "r1",
            "userId": "u",
            "title": "Chill mix",
            "recommendationType": "track",
            "trackIds": "t1, t2,,t3",
            "artistIds": "a1",
            "artistNames": "Alice",
            "artistGenres": "chill, ambient"
        }"#;

        let rec: Recommendation = serde_json::from_str(json).unwrap();
        assert_eq!(rec.seed_track_ids(), vec!["t1", "t2", "t3"]);
        assert_eq!(rec.seed_artist_ids(), vec!["a1"]);
        assert_eq!(rec.seed_genres(), vec!["chill", "ambient"]);
        assert_eq!(rec.recommendation_type, RecommendationKind::Track);
    }
}
