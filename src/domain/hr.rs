use crate::{
    domain::record::{FieldValue, FormRecord, Record, RecordId},
    error::{ConsoleError, Result},
    form::{FieldDescriptor, FormValues, SelectOption},
};
use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

pub const SHIFT_ROLES: [&str; 4] = ["Cashier", "Stock", "Supervisor", "Security"];

/// A scheduled work shift for one employee.
///
/// A shift whose end time is earlier than its start runs past midnight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    pub id: RecordId,
    pub employee: String,
    pub role: String,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Shift {
    pub fn new(
        employee: impl Into<String>,
        role: impl Into<String>,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Self> {
        if start == end {
            return Err(ConsoleError::InvalidFieldValue {
                field: "end".to_string(),
                reason: "shift must not end when it starts".to_string(),
            });
        }
        Ok(Self {
            id: RecordId::new(),
            employee: employee.into(),
            role: role.into(),
            date,
            start,
            end,
            location: None,
            notes: None,
        })
    }

    pub fn duration(&self) -> Duration {
        let span = self.end - self.start;
        if span < Duration::zero() {
            span + Duration::days(1)
        } else {
            span
        }
    }

    pub fn hours(&self) -> f64 {
        self.duration().num_minutes() as f64 / 60.0
    }

    pub fn is_overnight(&self) -> bool {
        self.end < self.start
    }

    /// Whether two shifts of the same employee overlap in time
    pub fn overlaps(&self, other: &Shift) -> bool {
        if self.employee != other.employee {
            return false;
        }
        let (a_start, a_end) = self.window();
        let (b_start, b_end) = other.window();
        a_start < b_end && b_start < a_end
    }

    fn window(&self) -> (chrono::NaiveDateTime, chrono::NaiveDateTime) {
        let start = self.date.and_time(self.start);
        (start, start + self.duration())
    }
}

impl Record for Shift {
    const COLLECTION: &'static str = "shifts";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "employee" => FieldValue::text(&self.employee),
            "role" => FieldValue::text(&self.role),
            "date" => FieldValue::Date(self.date),
            "start" => FieldValue::Time(self.start),
            "end" => FieldValue::Time(self.end),
            "hours" => FieldValue::Number(self.hours()),
            "location" => self.location.clone().into(),
            "notes" => self.notes.clone().into(),
            _ => FieldValue::Empty,
        }
    }
}

impl FormRecord for Shift {
    fn form_fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::text("employee", "Employee").required(),
            FieldDescriptor::select(
                "role",
                "Role",
                SHIFT_ROLES.iter().map(|r| SelectOption::same(*r)),
            )
            .required(),
            FieldDescriptor::date("date", "Date").required(),
            FieldDescriptor::time("start", "Start Time").required(),
            FieldDescriptor::time("end", "End Time").required(),
            FieldDescriptor::text("location", "Location"),
            FieldDescriptor::textarea("notes", "Notes"),
        ]
    }

    fn to_form(&self) -> FormValues {
        FormValues::new()
            .with("employee", self.employee.as_str())
            .with("role", self.role.as_str())
            .with("date", self.date)
            .with("start", self.start)
            .with("end", self.end)
            .with("location", self.location.clone().unwrap_or_default())
            .with("notes", self.notes.clone().unwrap_or_default())
    }

    fn from_form(id: RecordId, values: &FormValues) -> Result<Self> {
        let required = |name: &str| ConsoleError::InvalidFieldValue {
            field: name.to_string(),
            reason: "value is required".to_string(),
        };
        let mut shift = Shift::new(
            values.require_text("employee")?,
            values.require_text("role")?,
            values.date("date")?.ok_or_else(|| required("date"))?,
            values.time("start")?.ok_or_else(|| required("start"))?,
            values.time("end")?.ok_or_else(|| required("end"))?,
        )?;
        shift.id = id;
        shift.location = values.text("location");
        shift.notes = values.text("notes");
        Ok(shift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    #[test]
    fn test_shift_hours() {
        let shift = Shift::new("Thandi", "Cashier", day(1), at(8, 0), at(16, 30)).unwrap();
        assert_eq!(shift.hours(), 8.5);
        assert!(!shift.is_overnight());
    }

    #[test]
    fn test_overnight_shift() {
        let shift = Shift::new("Sipho", "Security", day(1), at(22, 0), at(6, 0)).unwrap();
        assert!(shift.is_overnight());
        assert_eq!(shift.hours(), 8.0);
    }

    #[test]
    fn test_zero_length_shift_rejected() {
        assert!(Shift::new("Sipho", "Security", day(1), at(9, 0), at(9, 0)).is_err());
    }

    #[test]
    fn test_overlaps() {
        let night = Shift::new("Sipho", "Security", day(1), at(22, 0), at(6, 0)).unwrap();
        let early = Shift::new("Sipho", "Stock", day(2), at(5, 0), at(9, 0)).unwrap();
        let later = Shift::new("Sipho", "Stock", day(2), at(6, 0), at(14, 0)).unwrap();
        let other = Shift::new("Thandi", "Stock", day(2), at(5, 0), at(9, 0)).unwrap();

        assert!(night.overlaps(&early));
        assert!(!night.overlaps(&later));
        assert!(!night.overlaps(&other));
    }

    #[test]
    fn test_shift_form_round_trip() {
        let mut shift = Shift::new("Thandi", "Cashier", day(3), at(8, 0), at(16, 0)).unwrap();
        shift.location = Some("Main Street".to_string());

        let rebuilt = Shift::from_form(shift.id, &shift.to_form()).unwrap();
        assert_eq!(rebuilt, shift);
    }

    #[test]
    fn test_shift_from_form_missing_time() {
        let values = FormValues::new()
            .with("employee", "Thandi")
            .with("role", "Cashier")
            .with("date", "2024-04-03")
            .with("start", "08:00");

        let err = Shift::from_form(RecordId::new(), &values).unwrap_err();
        assert!(matches!(
            err,
            ConsoleError::InvalidFieldValue { ref field, .. } if field == "end"
        ));
    }
}
