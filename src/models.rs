use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::Table;

/// Ids are opaque strings assigned by the remote store on create; the
/// client never mints one.
pub type RecordId = String;

/* -------------------------
   Field enums
--------------------------*/

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(AppointmentStatus::Scheduled),
            "completed" => Some(AppointmentStatus::Completed),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentType {
    Checkup,
    Consultation,
    #[serde(rename = "Follow-up")]
    FollowUp,
    Emergency,
    #[serde(rename = "Pre-surgery")]
    PreSurgery,
    #[serde(rename = "Post-surgery")]
    PostSurgery,
    Vaccination,
    #[serde(rename = "Lab Work")]
    LabWork,
}

impl AppointmentType {
    /// Display label; identical to the value stored on the wire.
    pub fn label(self) -> &'static str {
        match self {
            AppointmentType::Checkup => "Checkup",
            AppointmentType::Consultation => "Consultation",
            AppointmentType::FollowUp => "Follow-up",
            AppointmentType::Emergency => "Emergency",
            AppointmentType::PreSurgery => "Pre-surgery",
            AppointmentType::PostSurgery => "Post-surgery",
            AppointmentType::Vaccination => "Vaccination",
            AppointmentType::LabWork => "Lab Work",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Checkup" => Some(AppointmentType::Checkup),
            "Consultation" => Some(AppointmentType::Consultation),
            "Follow-up" => Some(AppointmentType::FollowUp),
            "Emergency" => Some(AppointmentType::Emergency),
            "Pre-surgery" => Some(AppointmentType::PreSurgery),
            "Post-surgery" => Some(AppointmentType::PostSurgery),
            "Vaccination" => Some(AppointmentType::Vaccination),
            "Lab Work" => Some(AppointmentType::LabWork),
            _ => None,
        }
    }
}

/// The store keeps appointment times as local wall clock "HH:MM".
pub(crate) mod time_hm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(d)?;
        NaiveTime::parse_from_str(&s, "%H:%M").map_err(serde::de::Error::custom)
    }
}

/* -------------------------
   Records (full rows as read from the store)
--------------------------*/

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(rename = "Id")]
    pub id: RecordId,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Tags", default)]
    pub tags: String,
    #[serde(rename = "Owner", default)]
    pub owner: Option<String>,
    #[serde(rename = "CreatedOn", default)]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(rename = "CreatedBy", default)]
    pub created_by: Option<String>,
    #[serde(rename = "ModifiedOn", default)]
    pub modified_on: Option<DateTime<Utc>>,
    #[serde(rename = "ModifiedBy", default)]
    pub modified_by: Option<String>,
    pub patient: RecordId,
    pub date: NaiveDate,
    #[serde(with = "time_hm")]
    pub time: NaiveTime,
    pub department: RecordId,
    pub doctor: RecordId,
    #[serde(rename = "appointmentType")]
    pub appointment_type: AppointmentType,
    #[serde(default)]
    pub notes: String,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    #[serde(rename = "Id")]
    pub id: RecordId,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Tags", default)]
    pub tags: String,
    #[serde(rename = "Owner", default)]
    pub owner: Option<String>,
    #[serde(rename = "CreatedOn", default)]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(rename = "ModifiedOn", default)]
    pub modified_on: Option<DateTime<Utc>>,
    /// Patient-facing code, e.g. "P-10042".
    #[serde(rename = "patientId", default)]
    pub patient_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    #[serde(rename = "Id")]
    pub id: RecordId,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Tags", default)]
    pub tags: String,
    #[serde(rename = "Owner", default)]
    pub owner: Option<String>,
    #[serde(rename = "CreatedOn", default)]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(rename = "ModifiedOn", default)]
    pub modified_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(rename = "Id")]
    pub id: RecordId,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Tags", default)]
    pub tags: String,
    #[serde(rename = "Owner", default)]
    pub owner: Option<String>,
    #[serde(rename = "CreatedOn", default)]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(rename = "ModifiedOn", default)]
    pub modified_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub department: RecordId,
}

/* -------------------------
   Drafts (writable subset, sent on create/update)

   Identity, audit timestamps and owner are server-managed; keeping them
   out of the draft structs is what strips them from outgoing payloads.
--------------------------*/

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentDraft {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Tags")]
    pub tags: String,
    pub patient: RecordId,
    pub date: NaiveDate,
    #[serde(with = "time_hm")]
    pub time: NaiveTime,
    pub department: RecordId,
    pub doctor: RecordId,
    #[serde(rename = "appointmentType")]
    pub appointment_type: AppointmentType,
    pub notes: String,
    pub status: AppointmentStatus,
}

impl From<&Appointment> for AppointmentDraft {
    fn from(a: &Appointment) -> Self {
        Self {
            name: a.name.clone(),
            tags: a.tags.clone(),
            patient: a.patient.clone(),
            date: a.date,
            time: a.time,
            department: a.department.clone(),
            doctor: a.doctor.clone(),
            appointment_type: a.appointment_type,
            notes: a.notes.clone(),
            status: a.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientDraft {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Tags")]
    pub tags: String,
    #[serde(rename = "patientId")]
    pub patient_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentDraft {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Tags")]
    pub tags: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorDraft {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Tags")]
    pub tags: String,
    pub department: RecordId,
}

/* -------------------------
   Table bindings
--------------------------*/

pub struct Appointments;

impl Table for Appointments {
    const NAME: &'static str = "appointment";
    const FIELDS: &'static [&'static str] = &[
        "Id",
        "Name",
        "Tags",
        "Owner",
        "CreatedOn",
        "CreatedBy",
        "ModifiedOn",
        "ModifiedBy",
        "patient",
        "date",
        "time",
        "department",
        "doctor",
        "appointmentType",
        "notes",
        "status",
    ];
    type Record = Appointment;
    type Draft = AppointmentDraft;
}

pub struct Patients;

impl Table for Patients {
    const NAME: &'static str = "patient";
    const FIELDS: &'static [&'static str] = &[
        "Id", "Name", "Tags", "Owner", "CreatedOn", "ModifiedOn", "patientId",
    ];
    type Record = Patient;
    type Draft = PatientDraft;
}

pub struct Departments;

impl Table for Departments {
    const NAME: &'static str = "department";
    const FIELDS: &'static [&'static str] =
        &["Id", "Name", "Tags", "Owner", "CreatedOn", "ModifiedOn"];
    type Record = Department;
    type Draft = DepartmentDraft;
}

pub struct Doctors;

impl Table for Doctors {
    const NAME: &'static str = "doctor";
    const FIELDS: &'static [&'static str] = &[
        "Id", "Name", "Tags", "Owner", "CreatedOn", "ModifiedOn", "department",
    ];
    type Record = Doctor;
    type Draft = DoctorDraft;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appointment_type_labels_round_trip() {
        for t in [
            AppointmentType::Checkup,
            AppointmentType::Consultation,
            AppointmentType::FollowUp,
            AppointmentType::Emergency,
            AppointmentType::PreSurgery,
            AppointmentType::PostSurgery,
            AppointmentType::Vaccination,
            AppointmentType::LabWork,
        ] {
            assert_eq!(AppointmentType::parse(t.label()), Some(t));
        }
        assert!(AppointmentType::parse("Surgery").is_none());
    }

    #[test]
    fn draft_serializes_writable_fields_only() {
        let draft = AppointmentDraft {
            name: "Annual checkup".into(),
            tags: "".into(),
            patient: "p1".into(),
            date: NaiveDate::from_ymd_opt(2023, 9, 18).unwrap(),
            time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            department: "d1".into(),
            doctor: "doc1".into(),
            appointment_type: AppointmentType::Checkup,
            notes: "".into(),
            status: AppointmentStatus::Scheduled,
        };
        let value = serde_json::to_value(&draft).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("Name"));
        assert_eq!(obj["time"], "09:30");
        assert_eq!(obj["status"], "scheduled");
        assert!(!obj.contains_key("Id"));
        assert!(!obj.contains_key("Owner"));
        assert!(!obj.contains_key("CreatedOn"));
    }
}
