use std::path::Path;

use log::info;
use serde::{Deserialize, Deserializer};

use crate::error::ProcessingError;

#[derive(Deserialize, Debug, Clone)]
pub struct Route {
    pub route_id: String,
    #[serde(default)]
    pub route_short_name: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Trip {
    pub trip_id: String,
    pub route_id: String,
    pub service_id: String,
    #[serde(default)]
    pub shape_id: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct StopTime {
    pub trip_id: String,
    #[serde(default)]
    pub arrival_time: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ShapePoint {
    pub shape_id: String,
    pub shape_pt_lat: f64,
    pub shape_pt_lon: f64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Calendar {
    pub service_id: String,
    #[serde(deserialize_with = "deserialize_day_flag")]
    pub monday: bool,
    #[serde(deserialize_with = "deserialize_day_flag")]
    pub tuesday: bool,
    #[serde(deserialize_with = "deserialize_day_flag")]
    pub wednesday: bool,
    #[serde(deserialize_with = "deserialize_day_flag")]
    pub thursday: bool,
    #[serde(deserialize_with = "deserialize_day_flag")]
    pub friday: bool,
    #[serde(deserialize_with = "deserialize_day_flag")]
    pub saturday: bool,
    #[serde(deserialize_with = "deserialize_day_flag")]
    pub sunday: bool,
}

fn deserialize_day_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    match value.trim() {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(serde::de::Error::custom(format!(
            "invalid service day flag: {}",
            other
        ))),
    }
}

/// One invocation's immutable view of the feed tables. Row order matches the
/// files, which downstream code relies on for shape-point and pick-first
/// ordering.
#[derive(Debug, Default)]
pub struct Feed {
    pub routes: Vec<Route>,
    pub trips: Vec<Trip>,
    pub stop_times: Vec<StopTime>,
    pub shapes: Vec<ShapePoint>,
    pub calendar: Vec<Calendar>,
}

impl Feed {
    /// Loads the feed tables from `dir`. `shapes.txt` is only read when
    /// `with_shapes` is set; without it the shape table stays empty and
    /// distance calculation will refuse to run.
    pub fn load(dir: &Path, with_shapes: bool) -> Result<Feed, ProcessingError> {
        let routes = read_table(&dir.join("routes.txt"))?;
        let trips = read_table(&dir.join("trips.txt"))?;
        let stop_times = read_table(&dir.join("stop_times.txt"))?;
        let calendar = read_table(&dir.join("calendar.txt"))?;
        let shapes = if with_shapes {
            read_table(&dir.join("shapes.txt"))?
        } else {
            Vec::new()
        };

        info!(
            "loaded {} routes, {} trips, {} stop times, {} shape points, {} calendar rows",
            routes.len(),
            trips.len(),
            stop_times.len(),
            shapes.len(),
            calendar.len()
        );

        Ok(Feed {
            routes,
            trips,
            stop_times,
            shapes,
            calendar,
        })
    }
}

fn read_table<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, ProcessingError> {
    let mut reader =
        csv::Reader::from_path(path).map_err(|source| ProcessingError::MissingFeedFiles {
            path: path.to_path_buf(),
            source,
        })?;

    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row.map_err(|source| ProcessingError::MissingFeedFiles {
            path: path.to_path_buf(),
            source,
        })?);
    }

    Ok(rows)
}
