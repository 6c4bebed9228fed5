use std::{fmt, str::FromStr};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::{coords::Coordinates, error::WorkoutError};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(pub String);

impl WorkoutId {
    /// Last ten decimal digits of the creation time in milliseconds.
    pub fn from_timestamp_millis(millis: i64) -> Self {
        let digits = millis.to_string();
        let start = digits.len().saturating_sub(10);
        Self(digits[start..].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "running",
            WorkoutKind::Cycling => "cycling",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "Running",
            WorkoutKind::Cycling => "Cycling",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "🏃‍♂️",
            WorkoutKind::Cycling => "🚴‍♀️",
        }
    }
}

impl FromStr for WorkoutKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(WorkoutKind::Running),
            "cycling" => Ok(WorkoutKind::Cycling),
            other => Err(format!("unknown workout type: {other}")),
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The numeric inputs a workout is validated on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    Distance,
    Duration,
    Cadence,
    ElevationGain,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Metric::Distance => "distance",
            Metric::Duration => "duration",
            Metric::Cadence => "cadence",
            Metric::ElevationGain => "elevation gain",
        })
    }
}

/// Kind-specific payload. Serialized flat next to the common fields, tagged by `kind`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WorkoutDetails {
    Running {
        #[serde(rename = "cadenceSpm")]
        cadence_spm: f64,
    },
    Cycling {
        #[serde(rename = "elevationGainM")]
        elevation_gain_m: f64,
    },
}

impl WorkoutDetails {
    pub fn kind(&self) -> WorkoutKind {
        match self {
            WorkoutDetails::Running { .. } => WorkoutKind::Running,
            WorkoutDetails::Cycling { .. } => WorkoutKind::Cycling,
        }
    }
}

/// Pace for running, speed for cycling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DerivedMetric {
    PaceMinPerKm(f64),
    SpeedKmPerH(f64),
}

impl DerivedMetric {
    pub fn compute(distance_km: f64, duration_min: f64, kind: WorkoutKind) -> Self {
        match kind {
            WorkoutKind::Running => DerivedMetric::PaceMinPerKm(duration_min / distance_km),
            WorkoutKind::Cycling => DerivedMetric::SpeedKmPerH(distance_km / (duration_min / 60.0)),
        }
    }

    pub fn value(&self) -> f64 {
        match *self {
            DerivedMetric::PaceMinPerKm(v) | DerivedMetric::SpeedKmPerH(v) => v,
        }
    }
}

/// Validated numbers for a new workout, before it gets an id and a place on the map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorkoutInput {
    pub distance_km: f64,
    pub duration_min: f64,
    pub details: WorkoutDetails,
}

impl WorkoutInput {
    pub fn running(distance_km: f64, duration_min: f64, cadence_spm: f64) -> Self {
        Self {
            distance_km,
            duration_min,
            details: WorkoutDetails::Running { cadence_spm },
        }
    }

    pub fn cycling(distance_km: f64, duration_min: f64, elevation_gain_m: f64) -> Self {
        Self {
            distance_km,
            duration_min,
            details: WorkoutDetails::Cycling { elevation_gain_m },
        }
    }

    pub fn validate(&self) -> Result<(), WorkoutError> {
        require_positive(Metric::Distance, self.distance_km)?;
        require_positive(Metric::Duration, self.duration_min)?;
        match self.details {
            WorkoutDetails::Running { cadence_spm } => require_positive(Metric::Cadence, cadence_spm),
            WorkoutDetails::Cycling { elevation_gain_m } => {
                if elevation_gain_m.is_finite() && elevation_gain_m >= 0.0 {
                    Ok(())
                } else {
                    Err(WorkoutError::InvalidMetric {
                        metric: Metric::ElevationGain,
                        value: elevation_gain_m,
                    })
                }
            }
        }
    }
}

fn require_positive(metric: Metric, value: f64) -> Result<(), WorkoutError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(WorkoutError::InvalidMetric { metric, value })
    }
}

/// One logged activity. Immutable once built; the derived metric and the
/// description are fixed at construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredWorkout", into = "StoredWorkout")]
pub struct Workout {
    id: WorkoutId,
    created_at: DateTime<FixedOffset>,
    coords: Coordinates,
    distance_km: f64,
    duration_min: f64,
    details: WorkoutDetails,
    description: String,
    metric: DerivedMetric,
}

impl Workout {
    pub fn new(
        id: WorkoutId,
        created_at: DateTime<FixedOffset>,
        coords: Coordinates,
        input: WorkoutInput,
    ) -> Result<Self, WorkoutError> {
        input.validate()?;
        let kind = input.details.kind();
        Ok(Self {
            description: describe(kind, &created_at),
            metric: DerivedMetric::compute(input.distance_km, input.duration_min, kind),
            id,
            created_at,
            coords,
            distance_km: input.distance_km,
            duration_min: input.duration_min,
            details: input.details,
        })
    }

    pub fn id(&self) -> &WorkoutId {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<FixedOffset> {
        self.created_at
    }

    pub fn coords(&self) -> Coordinates {
        self.coords
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn kind(&self) -> WorkoutKind {
        self.details.kind()
    }

    pub fn details(&self) -> WorkoutDetails {
        self.details
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn metric(&self) -> DerivedMetric {
        self.metric
    }

    pub fn pace_min_per_km(&self) -> Option<f64> {
        match self.metric {
            DerivedMetric::PaceMinPerKm(pace) => Some(pace),
            DerivedMetric::SpeedKmPerH(_) => None,
        }
    }

    pub fn speed_km_per_h(&self) -> Option<f64> {
        match self.metric {
            DerivedMetric::SpeedKmPerH(speed) => Some(speed),
            DerivedMetric::PaceMinPerKm(_) => None,
        }
    }

    pub fn cadence_spm(&self) -> Option<f64> {
        match self.details {
            WorkoutDetails::Running { cadence_spm } => Some(cadence_spm),
            WorkoutDetails::Cycling { .. } => None,
        }
    }

    pub fn elevation_gain_m(&self) -> Option<f64> {
        match self.details {
            WorkoutDetails::Cycling { elevation_gain_m } => Some(elevation_gain_m),
            WorkoutDetails::Running { .. } => None,
        }
    }
}

/// "Running on April 14"
fn describe(kind: WorkoutKind, date: &DateTime<FixedOffset>) -> String {
    format!("{} on {}", kind.label(), date.format("%B %-d"))
}

/// Flat record as written to storage.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredWorkout {
    id: WorkoutId,
    created_at: DateTime<FixedOffset>,
    coords: Coordinates,
    distance_km: f64,
    duration_min: f64,
    description: String,
    #[serde(flatten)]
    details: WorkoutDetails,
}

impl TryFrom<StoredWorkout> for Workout {
    type Error = WorkoutError;

    fn try_from(stored: StoredWorkout) -> Result<Self, Self::Error> {
        let input = WorkoutInput {
            distance_km: stored.distance_km,
            duration_min: stored.duration_min,
            details: stored.details,
        };
        let mut workout = Workout::new(stored.id, stored.created_at, stored.coords, input)?;
        // Keep the description the record was saved with.
        workout.description = stored.description;
        Ok(workout)
    }
}

impl From<Workout> for StoredWorkout {
    fn from(workout: Workout) -> Self {
        Self {
            id: workout.id,
            created_at: workout.created_at,
            coords: workout.coords,
            distance_km: workout.distance_km,
            duration_min: workout.duration_min,
            description: workout.description,
            details: workout.details,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    use super::*;

    fn june_third() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 3, 9, 30, 0)
            .unwrap()
    }

    fn build(input: WorkoutInput) -> Result<Workout, WorkoutError> {
        Workout::new(
            WorkoutId("1717399800".to_string()),
            june_third(),
            Coordinates::new(45.0, 12.0),
            input,
        )
    }

    #[test]
    fn running_pace_is_duration_over_distance() {
        let workout = build(WorkoutInput::running(5.2, 24.0, 178.0)).unwrap();
        assert_eq!(workout.pace_min_per_km(), Some(24.0 / 5.2));
        assert_eq!(workout.speed_km_per_h(), None);
        assert_eq!(workout.cadence_spm(), Some(178.0));
        assert_eq!(workout.kind(), WorkoutKind::Running);
    }

    #[test]
    fn cycling_speed_is_km_per_hour() {
        let workout = build(WorkoutInput::cycling(25.0, 75.0, 520.0)).unwrap();
        assert_eq!(workout.speed_km_per_h(), Some(20.0));
        assert_eq!(workout.elevation_gain_m(), Some(520.0));
    }

    #[test]
    fn description_uses_full_month_and_day() {
        let workout = build(WorkoutInput::cycling(25.0, 75.0, 0.0)).unwrap();
        assert_eq!(workout.description(), "Cycling on June 3");
    }

    #[test]
    fn rejects_non_positive_and_non_finite() {
        assert_matches!(
            build(WorkoutInput::running(-3.0, 10.0, 150.0)),
            Err(WorkoutError::InvalidMetric { metric: Metric::Distance, .. })
        );
        assert_matches!(
            build(WorkoutInput::running(3.0, 0.0, 150.0)),
            Err(WorkoutError::InvalidMetric { metric: Metric::Duration, .. })
        );
        assert_matches!(
            build(WorkoutInput::running(3.0, 10.0, 0.0)),
            Err(WorkoutError::InvalidMetric { metric: Metric::Cadence, .. })
        );
        assert_matches!(
            build(WorkoutInput::cycling(f64::NAN, 10.0, 5.0)),
            Err(WorkoutError::InvalidMetric { metric: Metric::Distance, .. })
        );
        assert_matches!(
            build(WorkoutInput::cycling(10.0, f64::INFINITY, 5.0)),
            Err(WorkoutError::InvalidMetric { metric: Metric::Duration, .. })
        );
        assert_matches!(
            build(WorkoutInput::cycling(10.0, 30.0, -1.0)),
            Err(WorkoutError::InvalidMetric { metric: Metric::ElevationGain, .. })
        );
    }

    #[test]
    fn id_keeps_last_ten_digits() {
        let id = WorkoutId::from_timestamp_millis(1_717_399_800_123);
        assert_eq!(id.as_str(), "7399800123");
        assert_eq!(WorkoutId::from_timestamp_millis(42).as_str(), "42");
    }

    #[test]
    fn stored_record_is_flat_and_tagged() {
        let workout = build(WorkoutInput::running(5.0, 25.0, 170.0)).unwrap();
        let value = serde_json::to_value(&workout).unwrap();
        assert_eq!(value["kind"], "running");
        assert_eq!(value["cadenceSpm"], 170.0);
        assert_eq!(value["distanceKm"], 5.0);
        assert_eq!(value["coords"], serde_json::json!([45.0, 12.0]));
        assert_eq!(value["description"], "Running on June 3");
    }

    #[test]
    fn restored_record_regains_derived_metric() {
        let workout = build(WorkoutInput::cycling(30.0, 90.0, 200.0)).unwrap();
        let json = serde_json::to_string(&workout).unwrap();
        let restored: Workout = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, workout);
        assert_eq!(restored.speed_km_per_h(), Some(20.0));
    }

    #[test]
    fn restoring_invalid_record_fails() {
        let json = r#"{"id":"1","createdAt":"2024-06-03T09:30:00+02:00","coords":[1.0,2.0],
            "distanceKm":0.0,"durationMin":10.0,"description":"Running on June 3",
            "kind":"running","cadenceSpm":150.0}"#;
        assert!(serde_json::from_str::<Workout>(json).is_err());
    }

    #[test]
    fn parses_kind() {
        assert_eq!("cycling".parse::<WorkoutKind>(), Ok(WorkoutKind::Cycling));
        assert!("swimming".parse::<WorkoutKind>().is_err());
    }
}
