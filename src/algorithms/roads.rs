//! Average road speed by weekday and hour.
//!
//! Inputs are two sources: travel records `{edge_id, enter_time, leave_time}`
//! with `YYYYMMDDTHHMMSS[.ffffff]` timestamps, and road edges
//! `{edge_id, start, end}` with `[lon, lat]` coordinates in degrees.

use crate::graph::Graph;
use crate::joiners::InnerJoiner;
use crate::mappers::{Apply, Project};
use crate::pipeline::Pipeline;
use crate::reducers::Sum;
use crate::row::{Row, RowExt, type_mismatch};
use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde_json::Value;

const EARTH_RADIUS_KM: f64 = 6373.0;

#[derive(Clone, Debug)]
pub struct RoadSpeedParams {
    pub enter_time_column: String,
    pub leave_time_column: String,
    pub edge_id_column: String,
    pub start_coord_column: String,
    pub end_coord_column: String,
    pub weekday_result_column: String,
    pub hour_result_column: String,
    pub speed_result_column: String,
}

impl Default for RoadSpeedParams {
    fn default() -> Self {
        Self {
            enter_time_column: "enter_time".to_string(),
            leave_time_column: "leave_time".to_string(),
            edge_id_column: "edge_id".to_string(),
            start_coord_column: "start".to_string(),
            end_coord_column: "end".to_string(),
            weekday_result_column: "weekday".to_string(),
            hour_result_column: "hour".to_string(),
            speed_result_column: "speed".to_string(),
        }
    }
}

/// Great-circle distance in kilometres between two `(lon, lat)` points.
pub fn haversine_km((lon1, lat1): (f64, f64), (lon2, lat2): (f64, f64)) -> f64 {
    let (lat1, lat2) = (lat1.to_radians(), lat2.to_radians());
    let (dlat, dlon) = (lat2 - lat1, (lon2 - lon1).to_radians());
    let a = (dlat / 2.0).sin().powi(2) + (dlon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

fn coordinate(row: &Row, column: &str) -> Result<(f64, f64)> {
    let v = row.field(column)?;
    match v.as_array().map(Vec::as_slice) {
        Some([lon, lat]) => match (lon.as_f64(), lat.as_f64()) {
            (Some(lon), Some(lat)) => Ok((lon, lat)),
            _ => Err(type_mismatch(column, "a [lon, lat] pair", v).into()),
        },
        _ => Err(type_mismatch(column, "a [lon, lat] pair", v).into()),
    }
}

fn timestamp(row: &Row, column: &str) -> Result<NaiveDateTime> {
    let raw = row.str_field(column)?;
    let format = if raw.contains('.') {
        "%Y%m%dT%H%M%S%.f"
    } else {
        "%Y%m%dT%H%M%S"
    };
    NaiveDateTime::parse_from_str(raw, format)
        .with_context(|| format!("parse timestamp `{raw}` in field `{column}`"))
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Average speed in km/h per (weekday, hour) of entering an edge.
///
/// Edge lengths come from the haversine distance between the edge's end
/// points; speed is total length over total travel time for the bucket.
/// Output rows are `{weekday, hour, speed}` ordered by weekday name, then hour.
pub fn road_speed_graph(times_input: &str, lengths_input: &str, params: &RoadSpeedParams) -> Graph {
    let p = Pipeline::default();
    let edge = params.edge_id_column.as_str();
    let weekday = params.weekday_result_column.as_str();
    let hour = params.hour_result_column.as_str();

    let (start, end) = (params.start_coord_column.clone(), params.end_coord_column.clone());
    let lengths = Graph::from_source_in(&p, lengths_input)
        .map(Apply::new("length", move |row: &Row| {
            Ok(Value::from(haversine_km(
                coordinate(row, &start)?,
                coordinate(row, &end)?,
            )))
        }))
        .sort(&[edge])
        .map(Project::new([edge, "length"]));

    let (enter, leave) = (params.enter_time_column.clone(), params.leave_time_column.clone());
    let (enter_day, enter_hour) = (enter.clone(), enter.clone());
    let travels = Graph::from_source_in(&p, times_input)
        .sort(&[edge])
        .join(InnerJoiner::new(), &lengths, &[edge])
        .sort(&[params.enter_time_column.as_str()])
        .map(Apply::new("seconds", move |row: &Row| {
            let elapsed = timestamp(row, &leave)? - timestamp(row, &enter)?;
            let micros = elapsed
                .num_microseconds()
                .ok_or_else(|| anyhow!("travel time out of range"))?;
            Ok(Value::from(micros as f64 / 1e6))
        }))
        .map(Project::new([params.enter_time_column.as_str(), "seconds", "length"]))
        .map(Apply::new(weekday, move |row: &Row| {
            let day = timestamp(row, &enter_day)?.weekday();
            Ok(Value::from(weekday_name(day)))
        }))
        .map(Apply::new(hour, move |row: &Row| {
            Ok(Value::from(timestamp(row, &enter_hour)?.hour()))
        }))
        .sort(&[weekday, hour]);

    let total_length = travels.reduce(Sum::new("length"), &[weekday, hour]);

    travels
        .reduce(Sum::new("seconds"), &[weekday, hour])
        .join(InnerJoiner::new(), &total_length, &[weekday, hour])
        .map(Apply::new(params.speed_result_column.clone(), |row: &Row| {
            Ok(Value::from(
                row.f64_field("length")? / row.f64_field("seconds")? * 3600.0,
            ))
        }))
        .map(Project::new([weekday, hour, params.speed_result_column.as_str()]))
}
