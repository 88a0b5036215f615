use log::{debug, warn};

use crate::error::ProcessingError;
use crate::gtfs::{Feed, ShapePoint};

/// One stop call on a trip. `arrival` is seconds since midnight, or `None`
/// when the feed value could not be parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledStop {
    pub arrival_time: String,
    pub arrival: Option<u32>,
}

/// Everything the speed calculation needs about one trip: its shape points
/// in path order and its stop calls sorted by arrival.
#[derive(Debug)]
pub struct TripData {
    pub trip_id: String,
    pub shape_points: Vec<ShapePoint>,
    pub schedule: Vec<ScheduledStop>,
}

impl TripData {
    pub fn extract(feed: &Feed, trip_id: &str) -> Result<TripData, ProcessingError> {
        let trip = feed
            .trips
            .iter()
            .find(|trip| trip.trip_id == trip_id)
            .ok_or_else(|| ProcessingError::UnknownTripId {
                trip_id: trip_id.to_owned(),
            })?;

        let shape_id =
            trip.shape_id
                .as_deref()
                .ok_or_else(|| ProcessingError::MissingShapeGeometry {
                    trip_id: trip_id.to_owned(),
                })?;
        // Row order in shapes.txt is path order; never re-sort these.
        let shape_points: Vec<ShapePoint> = feed
            .shapes
            .iter()
            .filter(|point| point.shape_id == shape_id)
            .cloned()
            .collect();
        if shape_points.is_empty() {
            return Err(ProcessingError::MissingShapeGeometry {
                trip_id: trip_id.to_owned(),
            });
        }

        let mut schedule: Vec<ScheduledStop> = feed
            .stop_times
            .iter()
            .filter(|stop_time| stop_time.trip_id == trip_id)
            .map(|stop_time| {
                let arrival = parse_arrival_time(&stop_time.arrival_time);
                if arrival.is_none() {
                    warn!(
                        "unparseable arrival_time {:?} on trip {}",
                        stop_time.arrival_time, trip_id
                    );
                }
                ScheduledStop {
                    arrival_time: stop_time.arrival_time.clone(),
                    arrival,
                }
            })
            .collect();
        // Unparseable arrivals are kept, sorted after every parsed value.
        schedule.sort_by_key(|stop| (stop.arrival.is_none(), stop.arrival));

        if let (Some(first), Some(last)) = (schedule.first(), schedule.last()) {
            debug!(
                "trip {} schedule spans {} to {} over {} stops",
                trip_id,
                first.arrival_time,
                last.arrival_time,
                schedule.len()
            );
        }

        Ok(TripData {
            trip_id: trip_id.to_owned(),
            shape_points,
            schedule,
        })
    }
}

/// Parses an `HH:MM:SS` wall-clock time to seconds since midnight. Hours of
/// 24 and above are accepted so overnight service sorts after the evening
/// it belongs to.
pub fn parse_arrival_time(value: &str) -> Option<u32> {
    let mut parts = value.trim().splitn(3, ':');
    let hours: u32 = parts.next()?.parse().ok()?;
    let minutes: u32 = parts.next()?.parse().ok()?;
    let seconds: u32 = parts.next()?.parse().ok()?;
    Some(hours * 3600 + minutes * 60 + seconds)
}
