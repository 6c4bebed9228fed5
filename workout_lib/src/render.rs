use crate::workout::{Workout, WorkoutDetails, WorkoutId, WorkoutKind};

/// Popup attached to a workout's marker.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerPopup {
    pub content: String,
    pub class_name: String,
    pub max_width: f64,
    pub min_width: f64,
    pub auto_close: bool,
    pub close_on_click: bool,
}

impl MarkerPopup {
    pub fn for_workout(workout: &Workout) -> Self {
        Self {
            content: format!("{} {}", workout.kind().icon(), workout.description()),
            class_name: format!("{}-popup", workout.kind()),
            max_width: 250.0,
            min_width: 100.0,
            auto_close: false,
            close_on_click: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Detail {
    pub icon: &'static str,
    pub value: String,
    pub unit: &'static str,
}

impl Detail {
    fn new(icon: &'static str, value: String, unit: &'static str) -> Self {
        Self { icon, value, unit }
    }
}

/// One row of the workout list.
#[derive(Clone, Debug, PartialEq)]
pub struct ListEntry {
    pub id: WorkoutId,
    pub kind: WorkoutKind,
    pub title: String,
    pub details: Vec<Detail>,
}

impl ListEntry {
    pub fn for_workout(workout: &Workout) -> Self {
        let mut details = vec![
            Detail::new(workout.kind().icon(), workout.distance_km().to_string(), "km"),
            Detail::new("⏱", workout.duration_min().to_string(), "min"),
        ];

        let metric = format!("{:.1}", workout.metric().value());
        match workout.details() {
            WorkoutDetails::Running { cadence_spm } => {
                details.push(Detail::new("⚡️", metric, "min/km"));
                details.push(Detail::new("🦶🏼", cadence_spm.to_string(), "spm"));
            }
            WorkoutDetails::Cycling { elevation_gain_m } => {
                details.push(Detail::new("⚡️", metric, "km/h"));
                details.push(Detail::new("⛰", elevation_gain_m.to_string(), "m"));
            }
        }

        Self {
            id: workout.id().clone(),
            kind: workout.kind(),
            title: workout.description().to_string(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};

    use super::*;
    use crate::{coords::Coordinates, workout::WorkoutInput};

    fn workout(input: WorkoutInput) -> Workout {
        let now = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 4, 14, 8, 0, 0)
            .unwrap();
        Workout::new(WorkoutId("1".to_string()), now, Coordinates::new(1.0, 2.0), input).unwrap()
    }

    #[test]
    fn popup_is_styled_by_kind() {
        let popup = MarkerPopup::for_workout(&workout(WorkoutInput::running(5.0, 25.0, 170.0)));
        assert_eq!(popup.content, "🏃‍♂️ Running on April 14");
        assert_eq!(popup.class_name, "running-popup");
        assert!(!popup.auto_close && !popup.close_on_click);
    }

    #[test]
    fn running_entry_shows_pace_and_cadence() {
        let entry = ListEntry::for_workout(&workout(WorkoutInput::running(5.2, 24.0, 178.0)));
        assert_eq!(entry.title, "Running on April 14");
        let values: Vec<_> = entry.details.iter().map(|d| (d.value.as_str(), d.unit)).collect();
        assert_eq!(
            values,
            [("5.2", "km"), ("24", "min"), ("4.6", "min/km"), ("178", "spm")]
        );
    }

    #[test]
    fn cycling_entry_shows_speed_and_elevation() {
        let entry = ListEntry::for_workout(&workout(WorkoutInput::cycling(25.0, 75.0, 520.0)));
        assert_eq!(entry.details[2].value, "20.0");
        assert_eq!(entry.details[2].unit, "km/h");
        assert_eq!(entry.details[3].value, "520");
    }
}
