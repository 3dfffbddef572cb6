use std::collections::HashMap;

use crate::models::{Department, Departments, Doctor, Doctors, Patient, Patients};
use crate::store::{FilterSpec, TableClient};

/// Anything that can live in a lookup directory: an id plus a display label.
pub trait Labeled {
    fn id(&self) -> &str;
    fn label(&self) -> &str;
}

impl Labeled for Patient {
    fn id(&self) -> &str {
        &self.id
    }
    fn label(&self) -> &str {
        &self.name
    }
}

impl Labeled for Department {
    fn id(&self) -> &str {
        &self.id
    }
    fn label(&self) -> &str {
        &self.name
    }
}

impl Labeled for Doctor {
    fn id(&self) -> &str {
        &self.id
    }
    fn label(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Fetch not finished yet; dependent dropdowns stay disabled.
    Pending,
    Ready,
    /// Fetch failed; the option set stays empty but the page remains usable.
    Failed,
}

/// One read-mostly lookup collection, indexed by id for O(1) resolution.
/// The index is rebuilt whenever the collection is refreshed.
pub struct Directory<R: Labeled> {
    records: Vec<R>,
    index: HashMap<String, usize>,
    state: LoadState,
}

impl<R: Labeled> Default for Directory<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Labeled> Directory<R> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
            state: LoadState::Pending,
        }
    }

    fn fill(&mut self, records: Vec<R>) {
        self.index = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id().to_string(), i))
            .collect();
        self.records = records;
        self.state = LoadState::Ready;
    }

    fn fail(&mut self) {
        self.records.clear();
        self.index.clear();
        self.state = LoadState::Failed;
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == LoadState::Ready
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    pub fn label_of(&self, id: &str) -> Option<&str> {
        self.get(id).map(Labeled::label)
    }

    /// Option set for a dropdown, in fetch order (sorted by name).
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The three reference collections used to resolve foreign keys on
/// appointments. Loaded once per session, each independently, so one
/// failing never blocks the others.
#[derive(Default)]
pub struct ReferenceData {
    pub patients: Directory<Patient>,
    pub departments: Directory<Department>,
    pub doctors: Directory<Doctor>,
}

impl ReferenceData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches all three collections concurrently. Returns the names of
    /// the collections that failed, for a user-visible warning.
    pub async fn load(
        &mut self,
        patients: &TableClient<Patients>,
        departments: &TableClient<Departments>,
        doctors: &TableClient<Doctors>,
    ) -> Vec<&'static str> {
        let spec = FilterSpec::reference();
        let (p, d, doc) = tokio::join!(
            patients.list(&spec),
            departments.list(&spec),
            doctors.list(&spec),
        );

        let mut failed = Vec::new();
        match p {
            Ok(rows) => self.patients.fill(rows),
            Err(e) => {
                tracing::warn!("failed to load patients: {e}");
                self.patients.fail();
                failed.push("patients");
            }
        }
        match d {
            Ok(rows) => self.departments.fill(rows),
            Err(e) => {
                tracing::warn!("failed to load departments: {e}");
                self.departments.fail();
                failed.push("departments");
            }
        }
        match doc {
            Ok(rows) => self.doctors.fill(rows),
            Err(e) => {
                tracing::warn!("failed to load doctors: {e}");
                self.doctors.fail();
                failed.push("doctors");
            }
        }
        failed
    }
}
