use crate::{
    error::WorkoutError,
    workout::{WorkoutInput, WorkoutKind},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Distance,
    Duration,
    Cadence,
    Elevation,
}

/// The workout form as the user typed it.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkoutForm {
    pub kind: WorkoutKind,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

impl Default for WorkoutForm {
    fn default() -> Self {
        Self {
            kind: WorkoutKind::Running,
            distance: String::new(),
            duration: String::new(),
            cadence: String::new(),
            elevation: String::new(),
        }
    }
}

impl WorkoutForm {
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Distance => self.distance = value,
            FormField::Duration => self.duration = value,
            FormField::Cadence => self.cadence = value,
            FormField::Elevation => self.elevation = value,
        }
    }

    /// Which kind-specific field is shown for the selected kind.
    pub fn visible_field(&self) -> FormField {
        match self.kind {
            WorkoutKind::Running => FormField::Cadence,
            WorkoutKind::Cycling => FormField::Elevation,
        }
    }

    pub fn parse(&self) -> Result<WorkoutInput, WorkoutError> {
        let distance = number(&self.distance);
        let duration = number(&self.duration);
        let input = match self.kind {
            WorkoutKind::Running => WorkoutInput::running(distance, duration, number(&self.cadence)),
            WorkoutKind::Cycling => WorkoutInput::cycling(distance, duration, number(&self.elevation)),
        };
        input.validate()?;
        Ok(input)
    }

    /// Empties the numeric fields, keeping the selected kind.
    pub fn clear(&mut self) {
        self.distance.clear();
        self.duration.clear();
        self.cadence.clear();
        self.elevation.clear();
    }
}

// Blank or non-numeric text is NaN so it fails validation.
fn number(text: &str) -> f64 {
    text.trim().parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::workout::{Metric, WorkoutDetails};

    fn form(kind: WorkoutKind, distance: &str, duration: &str, extra: &str) -> WorkoutForm {
        let mut form = WorkoutForm {
            kind,
            ..Default::default()
        };
        form.set(FormField::Distance, distance);
        form.set(FormField::Duration, duration);
        form.set(form.visible_field(), extra);
        form
    }

    #[test]
    fn parses_running() {
        let input = form(WorkoutKind::Running, "5.2", " 24 ", "178").parse().unwrap();
        assert_eq!(input, WorkoutInput::running(5.2, 24.0, 178.0));
    }

    #[test]
    fn cycling_allows_zero_elevation() {
        let input = form(WorkoutKind::Cycling, "25", "75", "0").parse().unwrap();
        assert_eq!(input.details, WorkoutDetails::Cycling { elevation_gain_m: 0.0 });
    }

    #[test]
    fn hidden_field_is_ignored() {
        let mut f = form(WorkoutKind::Cycling, "25", "75", "100");
        f.set(FormField::Cadence, "not a number");
        assert!(f.parse().is_ok());
    }

    #[test]
    fn blank_and_garbage_are_invalid() {
        assert_matches!(
            form(WorkoutKind::Running, "", "10", "150").parse(),
            Err(WorkoutError::InvalidMetric { metric: Metric::Distance, .. })
        );
        assert_matches!(
            form(WorkoutKind::Running, "3", "ten", "150").parse(),
            Err(WorkoutError::InvalidMetric { metric: Metric::Duration, .. })
        );
        assert_matches!(
            form(WorkoutKind::Running, "3", "10", "inf").parse(),
            Err(WorkoutError::InvalidMetric { metric: Metric::Cadence, .. })
        );
    }

    #[test]
    fn clear_keeps_kind() {
        let mut f = form(WorkoutKind::Cycling, "25", "75", "100");
        f.clear();
        assert_eq!(f.kind, WorkoutKind::Cycling);
        assert!(f.distance.is_empty() && f.elevation.is_empty());
    }
}
