use crate::error::ProcessingError;
use crate::gtfs::ShapePoint;
use crate::trip::TripData;

const EARTH_RADIUS_KM: f64 = 6371.0;
const MILES_PER_KM: f64 = 0.621371;

/// The computed result: the speed figure plus the two intermediates it was
/// derived from.
#[derive(Debug, Clone, Copy)]
pub struct SpeedReport {
    pub distance_miles: f64,
    pub elapsed_seconds: f64,
    pub speed_mph: f64,
}

/// Great-circle distance between two shape points in miles.
pub fn haversine_miles(from: &ShapePoint, to: &ShapePoint) -> f64 {
    let phi1 = from.shape_pt_lat.to_radians();
    let phi2 = to.shape_pt_lat.to_radians();
    let delta_phi = (to.shape_pt_lat - from.shape_pt_lat).to_radians();
    let delta_lambda = (to.shape_pt_lon - from.shape_pt_lon).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let km = EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    km * MILES_PER_KM
}

/// Sums consecutive pairwise distances over the points in sequence order.
/// The walk begins by comparing the first point with itself; that term is
/// always zero and leaves the total unchanged.
pub fn path_distance_miles(points: &[ShapePoint]) -> f64 {
    let Some(first) = points.first() else {
        return 0.0;
    };

    let mut previous = first;
    let mut distance = 0.0;
    for point in points {
        distance += haversine_miles(previous, point);
        previous = point;
    }
    distance
}

/// Scheduled duration of the trip: last sorted arrival minus first. Needs
/// two parseable bounds; anything less is unusable schedule data.
fn elapsed_seconds(data: &TripData) -> Result<u32, ProcessingError> {
    let unusable = || ProcessingError::InsufficientScheduleData {
        trip_id: data.trip_id.clone(),
    };

    if data.schedule.len() < 2 {
        return Err(unusable());
    }
    let start = data
        .schedule
        .first()
        .and_then(|stop| stop.arrival)
        .ok_or_else(unusable)?;
    let end = data
        .schedule
        .last()
        .and_then(|stop| stop.arrival)
        .ok_or_else(unusable)?;
    Ok(end - start)
}

/// Derives the average speed in miles per hour from the trip's path length
/// and scheduled duration.
pub fn average_speed(data: &TripData) -> Result<SpeedReport, ProcessingError> {
    let distance_miles = path_distance_miles(&data.shape_points);
    let elapsed = elapsed_seconds(data)?;
    if elapsed == 0 {
        return Err(ProcessingError::ZeroElapsedTime {
            trip_id: data.trip_id.clone(),
        });
    }

    let elapsed_seconds = f64::from(elapsed);
    let speed_mph = distance_miles / (elapsed_seconds / 3600.0);
    Ok(SpeedReport {
        distance_miles,
        elapsed_seconds,
        speed_mph,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trip::ScheduledStop;

    fn point(lat: f64, lon: f64) -> ShapePoint {
        ShapePoint {
            shape_id: "SH1".to_owned(),
            shape_pt_lat: lat,
            shape_pt_lon: lon,
        }
    }

    fn stop(arrival: Option<u32>) -> ScheduledStop {
        ScheduledStop {
            arrival_time: String::new(),
            arrival,
        }
    }

    fn trip_data(shape_points: Vec<ShapePoint>, arrivals: Vec<Option<u32>>) -> TripData {
        TripData {
            trip_id: "T1".to_owned(),
            shape_points,
            schedule: arrivals.into_iter().map(stop).collect(),
        }
    }

    // Moving 0.14472876 degrees of latitude along a meridian covers ten
    // miles under the 6371 km sphere used here.
    const TEN_MILES_LAT: f64 = 0.14472876;

    #[test]
    fn haversine_is_symmetric() {
        let a = point(40.0, -75.0);
        let b = point(40.7, -74.2);
        let there = haversine_miles(&a, &b);
        let back = haversine_miles(&b, &a);
        assert!((there - back).abs() < 1e-12);
        assert!(there > 0.0);
    }

    #[test]
    fn haversine_of_a_point_with_itself_is_zero() {
        let a = point(40.0, -75.0);
        assert_eq!(haversine_miles(&a, &a), 0.0);
    }

    #[test]
    fn one_degree_of_latitude_is_about_69_miles() {
        let d = haversine_miles(&point(0.0, 0.0), &point(1.0, 0.0));
        assert!((d - 69.09).abs() < 0.01);
    }

    #[test]
    fn path_distance_sums_consecutive_legs() {
        let points = vec![
            point(40.0, -75.0),
            point(40.0 + TEN_MILES_LAT, -75.0),
            point(40.0 + 2.0 * TEN_MILES_LAT, -75.0),
        ];
        let d = path_distance_miles(&points);
        assert!((d - 20.0).abs() < 1e-6);
    }

    #[test]
    fn leading_self_comparison_contributes_nothing() {
        // The accumulation walk starts at the first point compared with
        // itself. A two-point path must therefore equal the single leg.
        let a = point(40.0, -75.0);
        let b = point(40.0 + TEN_MILES_LAT, -75.0);
        let single_leg = haversine_miles(&a, &b);
        assert_eq!(path_distance_miles(&[a, b]), single_leg);
    }

    #[test]
    fn path_distance_of_one_point_is_zero() {
        assert_eq!(path_distance_miles(&[point(40.0, -75.0)]), 0.0);
        assert_eq!(path_distance_miles(&[]), 0.0);
    }

    #[test]
    fn ten_miles_in_an_hour_is_ten_mph() {
        let data = trip_data(
            vec![point(40.0, -75.0), point(40.0 + TEN_MILES_LAT, -75.0)],
            vec![Some(28800), Some(32400)],
        );
        let report = average_speed(&data).unwrap();
        assert!((report.distance_miles - 10.0).abs() < 1e-6);
        assert_eq!(report.elapsed_seconds, 3600.0);
        assert!((report.speed_mph - 10.0).abs() < 1e-6);
    }

    #[test]
    fn single_stop_is_insufficient() {
        let data = trip_data(vec![point(40.0, -75.0)], vec![Some(28800)]);
        let err = average_speed(&data).unwrap_err();
        assert!(matches!(
            err,
            ProcessingError::InsufficientScheduleData { .. }
        ));
    }

    #[test]
    fn unparseable_bound_is_insufficient() {
        // A missing arrival sorts last, so it becomes the end bound and the
        // duration cannot be computed.
        let data = trip_data(
            vec![point(40.0, -75.0)],
            vec![Some(28800), Some(29400), None],
        );
        let err = average_speed(&data).unwrap_err();
        assert!(matches!(
            err,
            ProcessingError::InsufficientScheduleData { .. }
        ));
    }

    #[test]
    fn zero_duration_is_an_error_not_infinity() {
        let data = trip_data(
            vec![point(40.0, -75.0), point(40.0 + TEN_MILES_LAT, -75.0)],
            vec![Some(28800), Some(28800)],
        );
        let err = average_speed(&data).unwrap_err();
        assert!(matches!(err, ProcessingError::ZeroElapsedTime { .. }));
    }
}
