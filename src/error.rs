use std::path::PathBuf;

use thiserror::Error;

use crate::resolve::Day;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("required feed file {path:?} could not be read: {source}")]
    MissingFeedFiles {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("no route_short_name, route_id or trip_id was given")]
    MissingIdentifier,

    #[error("no route with route_short_name {short_name:?}")]
    UnknownRouteShortName { short_name: String },

    #[error("no trips found for route_id {route_id:?}")]
    UnknownRouteId { route_id: String },

    #[error("no trip with trip_id {trip_id:?}")]
    UnknownTripId { trip_id: String },

    #[error("{day:?} is not a lowercase day of the week")]
    InvalidDayFilter { day: String },

    #[error("no matching service operates on {day}")]
    NoServiceOnDay { day: Day },

    #[error("no trips were available at departing hour {hour}")]
    NoTripAtHour { hour: u8 },

    #[error("no shape points exist for trip {trip_id:?}")]
    MissingShapeGeometry { trip_id: String },

    #[error("trip {trip_id:?} has fewer than two usable stop times")]
    InsufficientScheduleData { trip_id: String },

    #[error("trip {trip_id:?} departs and arrives at the same time")]
    ZeroElapsedTime { trip_id: String },
}
