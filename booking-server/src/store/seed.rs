//! JSON seed data for the in-memory backend.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{
    InvalidId, Route, StationId, StopSpec, TimeError, TrainId, UserId, parse_time_of_day,
};

use super::error::StoreError;
use super::memory::MemoryStore;

/// Errors raised while loading a seed file.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// The file could not be read
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid seed JSON
    #[error("seed JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// An identifier in the file is empty
    #[error(transparent)]
    Id(#[from] InvalidId),

    /// A stop time could not be parsed
    #[error("route for train {train}: {source}")]
    Time {
        train: String,
        #[source]
        source: TimeError,
    },

    /// The store rejected a route
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A named directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedEntity {
    pub id: String,
    pub name: String,
}

/// One stop of a seeded route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedStop {
    pub station_id: String,
    #[serde(default)]
    pub arrival: Option<String>,
    #[serde(default)]
    pub departure: Option<String>,
    #[serde(default)]
    pub day_offset: u32,
    /// Defaults to the 1-based position in the route.
    #[serde(default)]
    pub stop_number: Option<u32>,
}

/// A train's route, stops in travel order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedRoute {
    pub train_id: String,
    pub stops: Vec<SeedStop>,
}

/// Contents of a seed file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub stations: Vec<SeedEntity>,
    #[serde(default)]
    pub trains: Vec<SeedEntity>,
    #[serde(default)]
    pub users: Vec<SeedEntity>,
    #[serde(default)]
    pub routes: Vec<SeedRoute>,
}

/// What a seed load added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub stations: usize,
    pub trains: usize,
    pub users: usize,
    pub routes: usize,
    pub stops: usize,
}

impl SeedRoute {
    fn to_route(&self) -> Result<Route, SeedError> {
        let train_id = TrainId::parse(&self.train_id)?;
        let time = |value: &Option<String>| {
            value
                .as_deref()
                .map(parse_time_of_day)
                .transpose()
                .map_err(|source| SeedError::Time {
                    train: self.train_id.clone(),
                    source,
                })
        };

        let mut specs = Vec::with_capacity(self.stops.len());
        for (idx, stop) in self.stops.iter().enumerate() {
            specs.push(StopSpec {
                station_id: StationId::parse(&stop.station_id)?,
                sequence: stop.stop_number.unwrap_or(idx as u32 + 1),
                arrival: time(&stop.arrival)?,
                departure: time(&stop.departure)?,
                day_offset: stop.day_offset,
            });
        }

        Route::new(train_id.clone(), specs)
            .map_err(|source| StoreError::InvalidRoute {
                train: train_id,
                source,
            })
            .map_err(SeedError::from)
    }
}

/// Read a seed file and apply it to the store.
pub async fn load_seed(path: &Path, store: &MemoryStore) -> Result<SeedSummary, SeedError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let seed: SeedFile = serde_json::from_str(&contents)?;
    apply_seed(&seed, store).await
}

/// Apply seed data to the store.
///
/// Every route is validated before anything is written, so an invalid route
/// leaves the store untouched.
pub async fn apply_seed(seed: &SeedFile, store: &MemoryStore) -> Result<SeedSummary, SeedError> {
    let stations = seed
        .stations
        .iter()
        .map(|e| Ok::<_, InvalidId>((StationId::parse(&e.id)?, e.name.clone())))
        .collect::<Result<Vec<_>, _>>()?;
    let trains = seed
        .trains
        .iter()
        .map(|e| Ok::<_, InvalidId>((TrainId::parse(&e.id)?, e.name.clone())))
        .collect::<Result<Vec<_>, _>>()?;
    let users = seed
        .users
        .iter()
        .map(|e| Ok::<_, InvalidId>((UserId::parse(&e.id)?, e.name.clone())))
        .collect::<Result<Vec<_>, _>>()?;
    let routes = seed
        .routes
        .iter()
        .map(SeedRoute::to_route)
        .collect::<Result<Vec<_>, _>>()?;

    let mut summary = SeedSummary {
        stations: stations.len(),
        trains: trains.len(),
        users: users.len(),
        routes: routes.len(),
        stops: 0,
    };

    for (id, name) in stations {
        store.add_station(id, name).await;
    }
    for (id, name) in trains {
        store.add_train(id, name).await;
    }
    for (id, name) in users {
        store.add_user(id, name).await;
    }
    for route in routes {
        let train = route.train_id().clone();
        let stops = store.insert_route(route).await?;
        debug!(train = %train, stops = stops.len(), "seeded route");
        summary.stops += stops.len();
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::Directory;
    use crate::store::ScheduleStore;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SEED: &str = r#"{
        "stations": [
            {"id": "NDLS", "name": "New Delhi"},
            {"id": "AGC", "name": "Agra Cantt"},
            {"id": "BPL", "name": "Bhopal Junction"}
        ],
        "trains": [{"id": "12002", "name": "Shatabdi Express"}],
        "users": [{"id": "U1", "name": "Asha"}],
        "routes": [{
            "train_id": "12002",
            "stops": [
                {"station_id": "NDLS", "departure": "06:00"},
                {"station_id": "AGC", "arrival": "07:50", "departure": "07:55"},
                {"station_id": "BPL", "arrival": "14:25:00"}
            ]
        }]
    }"#;

    fn write_seed(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn load_from_file() {
        let file = write_seed(SEED);
        let store = MemoryStore::new();

        let summary = load_seed(file.path(), &store).await.unwrap();
        assert_eq!(
            summary,
            SeedSummary {
                stations: 3,
                trains: 1,
                users: 1,
                routes: 1,
                stops: 3
            }
        );

        let train = TrainId::parse("12002").unwrap();
        let stops = store.stops_for_train(&train).await.unwrap();
        assert_eq!(stops.len(), 3);
        assert!(stops[0].is_start);
        assert!(stops[2].is_end);
        assert_eq!(stops[1].sequence, 2);
        assert_eq!(
            store
                .user_name(&UserId::parse("U1").unwrap())
                .await
                .unwrap()
                .as_deref(),
            Some("Asha")
        );
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_seed(&dir.path().join("nope.json"), &MemoryStore::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SeedError::Io { .. }));
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let file = write_seed("{ not json");
        let err = load_seed(file.path(), &MemoryStore::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SeedError::Json(_)));
    }

    #[tokio::test]
    async fn invalid_route_leaves_store_untouched() {
        let mut seed: SeedFile = serde_json::from_str(SEED).unwrap();
        // Arrives before it left.
        seed.routes[0].stops[1].arrival = Some("05:00".to_string());
        let store = MemoryStore::new();

        let err = apply_seed(&seed, &store).await.unwrap_err();
        assert!(matches!(
            err,
            SeedError::Store(StoreError::InvalidRoute { .. })
        ));
        assert!(
            !store
                .station_exists(&StationId::parse("NDLS").unwrap())
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn bad_time_names_the_train() {
        let mut seed: SeedFile = serde_json::from_str(SEED).unwrap();
        seed.routes[0].stops[0].departure = Some("6am".to_string());

        let err = apply_seed(&seed, &MemoryStore::new()).await.unwrap_err();
        assert!(err.to_string().starts_with("route for train 12002"));
    }

    #[tokio::test]
    async fn bundled_seed_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../data/seed.json");
        let summary = load_seed(&path, &MemoryStore::new()).await.unwrap();
        assert_eq!(summary.routes, 3);
    }

    #[test]
    fn sections_are_optional() {
        let seed: SeedFile = serde_json::from_str("{}").unwrap();
        assert_eq!(seed, SeedFile::default());
    }
}
