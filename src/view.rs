use chrono::{NaiveDate, NaiveTime};

use crate::models::{Appointment, AppointmentStatus, RecordId};
use crate::query::StatusFilter;
use crate::refdata::ReferenceData;

// Fallback labels for foreign references that no longer resolve.
pub const UNKNOWN_PATIENT: &str = "Unknown Patient";
pub const UNKNOWN_DEPARTMENT: &str = "Unknown Department";
pub const UNKNOWN_DOCTOR: &str = "Unknown Doctor";

/// One display row: foreign keys already resolved to labels.
#[derive(Debug, Clone)]
pub struct AppointmentRow {
    pub id: RecordId,
    pub name: String,
    pub patient: String,
    pub patient_code: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub department: String,
    pub doctor: String,
    pub appointment_type: &'static str,
    pub status: AppointmentStatus,
    pub notes: String,
}

/// Pure projection of the fetched appointments against the reference
/// directories. Unresolved references degrade to fixed placeholders
/// instead of failing the render.
pub fn rows(appointments: &[Appointment], refdata: &ReferenceData) -> Vec<AppointmentRow> {
    appointments
        .iter()
        .map(|a| AppointmentRow {
            id: a.id.clone(),
            name: a.name.clone(),
            patient: refdata
                .patients
                .label_of(&a.patient)
                .unwrap_or(UNKNOWN_PATIENT)
                .to_string(),
            patient_code: refdata
                .patients
                .get(&a.patient)
                .map(|p| p.patient_code.clone())
                .unwrap_or_default(),
            date: a.date,
            time: a.time,
            department: refdata
                .departments
                .label_of(&a.department)
                .unwrap_or(UNKNOWN_DEPARTMENT)
                .to_string(),
            doctor: refdata
                .doctors
                .label_of(&a.doctor)
                .unwrap_or(UNKNOWN_DOCTOR)
                .to_string(),
            appointment_type: a.appointment_type.label(),
            status: a.status,
            notes: a.notes.clone(),
        })
        .collect()
}

pub fn status_label(status: AppointmentStatus) -> &'static str {
    match status {
        AppointmentStatus::Scheduled => "Scheduled",
        AppointmentStatus::Completed => "Completed",
        AppointmentStatus::Cancelled => "Cancelled",
    }
}

/// Empty-state copy under the list, depending on whether anything is
/// being filtered at all.
pub fn empty_message(filter: StatusFilter, search: &str) -> &'static str {
    if !search.trim().is_empty() || filter != StatusFilter::All {
        "Try adjusting your search or filter criteria to find what you're looking for."
    } else {
        "Get started by creating your first appointment using the 'New Appointment' button."
    }
}
