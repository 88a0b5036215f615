use std::fmt;

use itertools::Itertools;
use log::{debug, info};

use crate::error::ProcessingError;
use crate::gtfs::{Calendar, Feed, Trip};
use crate::trip::parse_arrival_time;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// Accepts exactly the lowercase English weekday names used by the
    /// calendar table columns.
    pub fn from_name(name: &str) -> Result<Day, ProcessingError> {
        match name {
            "monday" => Ok(Day::Monday),
            "tuesday" => Ok(Day::Tuesday),
            "wednesday" => Ok(Day::Wednesday),
            "thursday" => Ok(Day::Thursday),
            "friday" => Ok(Day::Friday),
            "saturday" => Ok(Day::Saturday),
            "sunday" => Ok(Day::Sunday),
            other => Err(ProcessingError::InvalidDayFilter {
                day: other.to_owned(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wednesday",
            Day::Thursday => "thursday",
            Day::Friday => "friday",
            Day::Saturday => "saturday",
            Day::Sunday => "sunday",
        }
    }

    pub fn runs(&self, calendar: &Calendar) -> bool {
        match self {
            Day::Monday => calendar.monday,
            Day::Tuesday => calendar.tuesday,
            Day::Wednesday => calendar.wednesday,
            Day::Thursday => calendar.thursday,
            Day::Friday => calendar.friday,
            Day::Saturday => calendar.saturday,
            Day::Sunday => calendar.sunday,
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The normalized command-line input: at most one identifier is used, in
/// short-name, route-id, trip-id precedence order.
#[derive(Debug, Default)]
pub struct Selection {
    pub short_name: Option<String>,
    pub route_id: Option<String>,
    pub trip_id: Option<String>,
    pub hour: Option<u8>,
    pub day: Option<Day>,
}

/// Resolves the selection to exactly one trip id, or fails with the specific
/// reason no trip matches.
pub fn resolve_trip(feed: &Feed, selection: &Selection) -> Result<String, ProcessingError> {
    if let Some(short_name) = &selection.short_name {
        // Exact, case-sensitive match; when several routes share a short
        // name the first in table order wins.
        let route = feed
            .routes
            .iter()
            .find(|route| &route.route_short_name == short_name)
            .ok_or_else(|| ProcessingError::UnknownRouteShortName {
                short_name: short_name.clone(),
            })?;
        info!(
            "route_short_name {} resolved to route_id {}",
            short_name, route.route_id
        );
        resolve_route(feed, &route.route_id, selection)
    } else if let Some(route_id) = &selection.route_id {
        resolve_route(feed, route_id, selection)
    } else if let Some(trip_id) = &selection.trip_id {
        resolve_direct(feed, trip_id, selection)
    } else {
        Err(ProcessingError::MissingIdentifier)
    }
}

fn resolve_route(
    feed: &Feed,
    route_id: &str,
    selection: &Selection,
) -> Result<String, ProcessingError> {
    let mut candidates: Vec<&Trip> = feed
        .trips
        .iter()
        .filter(|trip| trip.route_id == route_id)
        .collect();
    if candidates.is_empty() {
        return Err(ProcessingError::UnknownRouteId {
            route_id: route_id.to_owned(),
        });
    }

    if let Some(day) = selection.day {
        candidates = restrict_to_day(feed, candidates, day)?;
    }

    match selection.hour {
        None => {
            // No filter narrows the choice, so the first candidate in feed
            // order is taken. This is arbitrary, not earliest-departure.
            let trip = candidates[0];
            info!(
                "no departing hour given, selecting trip {} at an arbitrary departing time",
                trip.trip_id
            );
            Ok(trip.trip_id.clone())
        }
        Some(hour) => {
            for trip in &candidates {
                let arrival_in_hour = feed
                    .stop_times
                    .iter()
                    .filter(|stop_time| stop_time.trip_id == trip.trip_id)
                    .find(|stop_time| {
                        parse_arrival_time(&stop_time.arrival_time)
                            .map(|seconds| seconds / 3600 == u32::from(hour))
                            .unwrap_or(false)
                    });
                if let Some(stop_time) = arrival_in_hour {
                    info!(
                        "trip {} calls at {} during hour {}",
                        trip.trip_id, stop_time.arrival_time, hour
                    );
                    return Ok(trip.trip_id.clone());
                }
            }
            Err(ProcessingError::NoTripAtHour { hour })
        }
    }
}

/// Keeps only candidates whose service operates on `day`. Services are
/// checked once each, in candidate order, and a service's flags come from
/// the first calendar row bearing its id.
fn restrict_to_day<'a>(
    feed: &Feed,
    candidates: Vec<&'a Trip>,
    day: Day,
) -> Result<Vec<&'a Trip>, ProcessingError> {
    let active: Vec<&str> = candidates
        .iter()
        .map(|trip| trip.service_id.as_str())
        .unique()
        .filter(|service_id| service_runs_on(feed, service_id, day))
        .collect();

    let remaining: Vec<&Trip> = candidates
        .into_iter()
        .filter(|trip| active.contains(&trip.service_id.as_str()))
        .collect();
    if remaining.is_empty() {
        return Err(ProcessingError::NoServiceOnDay { day });
    }
    Ok(remaining)
}

fn service_runs_on(feed: &Feed, service_id: &str, day: Day) -> bool {
    feed.calendar
        .iter()
        .find(|calendar| calendar.service_id == service_id)
        .map(|calendar| day.runs(calendar))
        .unwrap_or(false)
}

fn resolve_direct(
    feed: &Feed,
    trip_id: &str,
    selection: &Selection,
) -> Result<String, ProcessingError> {
    let trip = feed
        .trips
        .iter()
        .find(|trip| trip.trip_id == trip_id)
        .ok_or_else(|| ProcessingError::UnknownTripId {
            trip_id: trip_id.to_owned(),
        })?;

    if let Some(day) = selection.day {
        if !service_runs_on(feed, &trip.service_id, day) {
            return Err(ProcessingError::NoServiceOnDay { day });
        }
    }
    if selection.hour.is_some() {
        // The hour filter only narrows route-level selection; a directly
        // given trip id already names the trip.
        debug!("departing hour is ignored when a trip_id is given directly");
    }

    Ok(trip.trip_id.clone())
}
