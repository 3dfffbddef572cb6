use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};

use crate::models::{Appointment, AppointmentDraft, AppointmentStatus, AppointmentType, RecordId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Closed,
    /// Empty defaults, status preset to scheduled.
    Create,
    /// Prefilled from an existing appointment; the id is kept for the
    /// eventual update call.
    Edit(RecordId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormField {
    Name,
    Patient,
    Date,
    Time,
    Department,
    Doctor,
    AppointmentType,
    Notes,
    Status,
    Tags,
}

/// Raw field values as a UI would hold them, before any parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub name: String,
    pub patient: String,
    pub date: String,
    pub time: String,
    pub department: String,
    pub doctor: String,
    pub appointment_type: String,
    pub notes: String,
    pub status: String,
    pub tags: String,
}

/// The appointment form: Closed → Create/Edit → (validate) → submitting →
/// closed on success, unchanged on failure. Validation is synchronous and
/// local; an invalid form never reaches the gateway.
pub struct AppointmentForm {
    mode: FormMode,
    fields: FormFields,
    errors: BTreeMap<FormField, &'static str>,
    submitting: bool,
}

impl Default for AppointmentForm {
    fn default() -> Self {
        Self::new()
    }
}

impl AppointmentForm {
    pub fn new() -> Self {
        Self {
            mode: FormMode::Closed,
            fields: FormFields::default(),
            errors: BTreeMap::new(),
            submitting: false,
        }
    }

    pub fn open_create(&mut self) {
        self.fields = FormFields {
            status: AppointmentStatus::Scheduled.as_str().to_string(),
            ..FormFields::default()
        };
        self.errors.clear();
        self.submitting = false;
        self.mode = FormMode::Create;
    }

    /// Copies all fields verbatim from the selected appointment.
    pub fn open_edit(&mut self, appointment: &Appointment) {
        self.fields = FormFields {
            name: appointment.name.clone(),
            patient: appointment.patient.clone(),
            date: appointment.date.format("%Y-%m-%d").to_string(),
            time: appointment.time.format("%H:%M").to_string(),
            department: appointment.department.clone(),
            doctor: appointment.doctor.clone(),
            appointment_type: appointment.appointment_type.label().to_string(),
            notes: appointment.notes.clone(),
            status: appointment.status.as_str().to_string(),
            tags: appointment.tags.clone(),
        };
        self.errors.clear();
        self.submitting = false;
        self.mode = FormMode::Edit(appointment.id.clone());
    }

    pub fn close(&mut self) {
        self.mode = FormMode::Closed;
        self.fields = FormFields::default();
        self.errors.clear();
        self.submitting = false;
    }

    /// Writes a field value; any error on that field clears immediately.
    pub fn set(&mut self, field: FormField, value: &str) {
        let slot = match field {
            FormField::Name => &mut self.fields.name,
            FormField::Patient => &mut self.fields.patient,
            FormField::Date => &mut self.fields.date,
            FormField::Time => &mut self.fields.time,
            FormField::Department => &mut self.fields.department,
            FormField::Doctor => &mut self.fields.doctor,
            FormField::AppointmentType => &mut self.fields.appointment_type,
            FormField::Notes => &mut self.fields.notes,
            FormField::Status => &mut self.fields.status,
            FormField::Tags => &mut self.fields.tags,
        };
        *slot = value.to_string();
        self.errors.remove(&field);
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode != FormMode::Closed
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn errors(&self) -> &BTreeMap<FormField, &'static str> {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// The submit control is disabled while a call is in flight.
    pub fn can_submit(&self) -> bool {
        self.is_open() && !self.submitting
    }

    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            return "Saving...";
        }
        match self.mode {
            FormMode::Closed => "",
            FormMode::Create => "Create Appointment",
            FormMode::Edit(_) => "Update Appointment",
        }
    }

    /// Checks required-field presence and field formats. On success the
    /// writable payload is returned; otherwise the per-field errors are
    /// populated and the form stays in its current mode.
    pub fn validate(&mut self) -> Option<AppointmentDraft> {
        let mut errors = BTreeMap::new();
        let f = &self.fields;

        if f.name.trim().is_empty() {
            errors.insert(FormField::Name, "Appointment name is required");
        }
        if f.patient.trim().is_empty() {
            errors.insert(FormField::Patient, "Patient is required");
        }

        let date = if f.date.trim().is_empty() {
            errors.insert(FormField::Date, "Date is required");
            None
        } else {
            match NaiveDate::parse_from_str(f.date.trim(), "%Y-%m-%d") {
                Ok(d) => Some(d),
                Err(_) => {
                    errors.insert(FormField::Date, "Date must be YYYY-MM-DD");
                    None
                }
            }
        };

        let time = if f.time.trim().is_empty() {
            errors.insert(FormField::Time, "Time is required");
            None
        } else {
            match NaiveTime::parse_from_str(f.time.trim(), "%H:%M") {
                Ok(t) => Some(t),
                Err(_) => {
                    errors.insert(FormField::Time, "Time must be HH:MM");
                    None
                }
            }
        };

        if f.department.trim().is_empty() {
            errors.insert(FormField::Department, "Department is required");
        }
        if f.doctor.trim().is_empty() {
            errors.insert(FormField::Doctor, "Doctor is required");
        }

        let kind = if f.appointment_type.trim().is_empty() {
            errors.insert(FormField::AppointmentType, "Appointment type is required");
            None
        } else {
            match AppointmentType::parse(f.appointment_type.trim()) {
                Some(k) => Some(k),
                None => {
                    errors.insert(FormField::AppointmentType, "Unknown appointment type");
                    None
                }
            }
        };

        // Status is optional and defaults to scheduled.
        let status = if f.status.trim().is_empty() {
            Some(AppointmentStatus::Scheduled)
        } else {
            match AppointmentStatus::parse(f.status.trim()) {
                Some(s) => Some(s),
                None => {
                    errors.insert(FormField::Status, "Unknown status");
                    None
                }
            }
        };

        if !errors.is_empty() {
            self.errors = errors;
            return None;
        }

        self.errors.clear();
        Some(AppointmentDraft {
            name: f.name.clone(),
            tags: f.tags.clone(),
            patient: f.patient.clone(),
            date: date.unwrap(),
            time: time.unwrap(),
            department: f.department.clone(),
            doctor: f.doctor.clone(),
            appointment_type: kind.unwrap(),
            notes: f.notes.clone(),
            status: status.unwrap(),
        })
    }

    pub(crate) fn begin_submit(&mut self) {
        self.submitting = true;
    }

    /// Success closes the form; failure keeps it open with the entered
    /// values intact so the user can retry.
    pub(crate) fn finish_submit(&mut self, success: bool) {
        if success {
            self.close();
        } else {
            self.submitting = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_appointment() -> Appointment {
        serde_json::from_value(serde_json::json!({
            "Id": "a1",
            "Name": "Blood pressure check",
            "Tags": "cardio",
            "patient": "p1",
            "date": "2023-09-18",
            "time": "09:30",
            "department": "d1",
            "doctor": "doc1",
            "appointmentType": "Follow-up",
            "notes": "Medication review",
            "status": "scheduled",
        }))
        .unwrap()
    }

    fn fill_required(form: &mut AppointmentForm) {
        form.set(FormField::Name, "Annual checkup");
        form.set(FormField::Patient, "p1");
        form.set(FormField::Date, "2023-09-20");
        form.set(FormField::Time, "11:00");
        form.set(FormField::Department, "d1");
        form.set(FormField::Doctor, "doc1");
        form.set(FormField::AppointmentType, "Checkup");
    }

    #[test]
    fn empty_create_form_reports_every_required_field() {
        let mut form = AppointmentForm::new();
        form.open_create();
        assert!(form.validate().is_none());
        let errors = form.errors();
        for field in [
            FormField::Name,
            FormField::Patient,
            FormField::Date,
            FormField::Time,
            FormField::Department,
            FormField::Doctor,
            FormField::AppointmentType,
        ] {
            assert!(errors.contains_key(&field), "missing error for {field:?}");
        }
        // optional fields never error on emptiness
        assert!(!errors.contains_key(&FormField::Notes));
        assert!(!errors.contains_key(&FormField::Tags));
        assert!(!errors.contains_key(&FormField::Status));
        assert_eq!(*form.mode(), FormMode::Create);
    }

    #[test]
    fn status_defaults_to_scheduled_when_blank() {
        let mut form = AppointmentForm::new();
        form.open_create();
        fill_required(&mut form);
        form.set(FormField::Status, "");
        let draft = form.validate().expect("form should be valid");
        assert_eq!(draft.status, AppointmentStatus::Scheduled);
    }

    #[test]
    fn editing_a_field_clears_only_its_error() {
        let mut form = AppointmentForm::new();
        form.open_create();
        assert!(form.validate().is_none());
        form.set(FormField::Name, "Annual checkup");
        assert!(!form.errors().contains_key(&FormField::Name));
        assert!(form.errors().contains_key(&FormField::Patient));
    }

    #[test]
    fn malformed_date_and_time_are_field_errors() {
        let mut form = AppointmentForm::new();
        form.open_create();
        fill_required(&mut form);
        form.set(FormField::Date, "18/09/2023");
        form.set(FormField::Time, "9.30am");
        assert!(form.validate().is_none());
        assert_eq!(form.errors()[&FormField::Date], "Date must be YYYY-MM-DD");
        assert_eq!(form.errors()[&FormField::Time], "Time must be HH:MM");
    }

    #[test]
    fn edit_prefill_round_trips_to_the_original_payload() {
        let appointment = sample_appointment();
        let mut form = AppointmentForm::new();
        form.open_edit(&appointment);
        assert_eq!(*form.mode(), FormMode::Edit("a1".to_string()));
        let draft = form.validate().expect("prefilled form should be valid");
        assert_eq!(draft, AppointmentDraft::from(&appointment));
    }

    #[test]
    fn submit_lifecycle_labels_and_gating() {
        let mut form = AppointmentForm::new();
        assert!(!form.can_submit());
        form.open_create();
        assert_eq!(form.submit_label(), "Create Appointment");
        form.begin_submit();
        assert_eq!(form.submit_label(), "Saving...");
        assert!(!form.can_submit());
        form.finish_submit(false);
        assert!(form.is_open(), "failure keeps the form open");
        form.finish_submit(true);
        assert!(!form.is_open(), "success closes the form");
    }
}
