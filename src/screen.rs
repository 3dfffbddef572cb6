// src/screen.rs

use std::sync::Arc;

use crate::form::{AppointmentForm, FormField, FormMode};
use crate::models::{Appointment, Appointments, Departments, Doctors, Patients};
use crate::query::{AppointmentQuery, StatusFilter};
use crate::refdata::ReferenceData;
use crate::store::{RecordStore, TableClient};
use crate::view::{self, AppointmentRow};

/// User-visible outcome of an operation; the front end decides how to
/// show it (toast, status line, log).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

/// The appointment management screen: owns the gateway clients, the
/// reference directories, the query state and the form. All context is
/// passed in explicitly at construction; there are no ambient singletons.
pub struct AppointmentScreen {
    appointments: TableClient<Appointments>,
    refdata: ReferenceData,
    query: AppointmentQuery,
    form: AppointmentForm,
    results: Vec<Appointment>,
    notices: Vec<Notice>,
}

impl AppointmentScreen {
    /// Loads the three reference collections (independently; one failing
    /// only degrades its dropdown) and the initial appointment list.
    pub async fn start(store: Arc<dyn RecordStore>, page_limit: u32) -> Self {
        let mut screen = Self {
            appointments: TableClient::new(Arc::clone(&store)),
            refdata: ReferenceData::new(),
            query: AppointmentQuery::new(page_limit),
            form: AppointmentForm::new(),
            results: Vec::new(),
            notices: Vec::new(),
        };

        let failed = screen
            .refdata
            .load(
                &TableClient::<Patients>::new(Arc::clone(&store)),
                &TableClient::<Departments>::new(Arc::clone(&store)),
                &TableClient::<Doctors>::new(store),
            )
            .await;
        for name in failed {
            screen.notices.push(Notice::Warning(format!(
                "Could not load {name}; related options are unavailable"
            )));
        }

        screen.refresh().await;
        screen
    }

    /// The invalidate-then-reload step: the previous result set is fully
    /// replaced by a fresh fetch under the current filter and search. A
    /// response overtaken by a newer request is discarded.
    pub async fn refresh(&mut self) {
        let ticket = self.query.issue();
        match self.appointments.list(&self.query.filter_spec()).await {
            Ok(records) => {
                if self.query.accept(ticket) {
                    self.results = records;
                }
            }
            Err(e) => {
                tracing::error!("failed to load appointments: {e}");
                if self.query.accept(ticket) {
                    self.results.clear();
                }
                self.notices
                    .push(Notice::Error("Failed to load appointments".to_string()));
            }
        }
    }

    pub async fn set_filter(&mut self, filter: StatusFilter) {
        if self.query.filter != filter {
            self.query.filter = filter;
            self.refresh().await;
        }
    }

    pub async fn set_search(&mut self, term: &str) {
        if self.query.search != term {
            self.query.search = term.to_string();
            self.refresh().await;
        }
    }

    pub fn open_create(&mut self) {
        self.form.open_create();
    }

    /// Prefills the form from a listed appointment. Returns false when the
    /// id is not in the current result set.
    pub fn open_edit(&mut self, id: &str) -> bool {
        match self.results.iter().find(|a| a.id == id) {
            Some(appointment) => {
                self.form.open_edit(appointment);
                true
            }
            None => false,
        }
    }

    pub fn cancel_form(&mut self) {
        self.form.close();
    }

    pub fn set_field(&mut self, field: FormField, value: &str) {
        self.form.set(field, value);
    }

    /// Validates locally, then creates or updates through the gateway.
    /// Success closes the form and refetches the list; failure keeps the
    /// form open with the entered values intact.
    pub async fn submit(&mut self) {
        if !self.form.can_submit() {
            return;
        }

        let Some(draft) = self.form.validate() else {
            self.notices
                .push(Notice::Error("Please fill all required fields".to_string()));
            return;
        };

        let mode = self.form.mode().clone();
        self.form.begin_submit();

        let outcome = match &mode {
            FormMode::Create => self
                .appointments
                .create(&draft)
                .await
                .map(|_| "Appointment created successfully"),
            FormMode::Edit(id) => self
                .appointments
                .update(id, &draft)
                .await
                .map(|_| "Appointment updated successfully"),
            FormMode::Closed => return,
        };

        match outcome {
            Ok(message) => {
                self.form.finish_submit(true);
                self.notices.push(Notice::Success(message.to_string()));
                self.refresh().await;
            }
            Err(e) => {
                tracing::error!("appointment save failed: {e}");
                self.form.finish_submit(false);
                let message = match mode {
                    FormMode::Edit(_) => "Failed to update appointment",
                    _ => "Failed to create appointment",
                };
                self.notices.push(Notice::Error(message.to_string()));
            }
        }
    }

    /// Deletes only after the confirmation prompt was acknowledged; on
    /// failure the list is left as it was.
    pub async fn delete(&mut self, id: &str, confirmed: bool) {
        if !confirmed {
            return;
        }

        match self.appointments.delete(id).await {
            Ok(true) => {
                self.notices.push(Notice::Success(
                    "Appointment deleted successfully".to_string(),
                ));
                self.refresh().await;
            }
            Ok(false) => {
                self.notices
                    .push(Notice::Error("Failed to delete appointment".to_string()));
            }
            Err(e) => {
                tracing::error!("appointment delete failed: {e}");
                self.notices
                    .push(Notice::Error("Failed to delete appointment".to_string()));
            }
        }
    }

    /// Display rows with foreign keys resolved via the reference data.
    pub fn rows(&self) -> Vec<AppointmentRow> {
        view::rows(&self.results, &self.refdata)
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn filter(&self) -> StatusFilter {
        self.query.filter
    }

    pub fn search(&self) -> &str {
        &self.query.search
    }

    pub fn form(&self) -> &AppointmentForm {
        &self.form
    }

    pub fn results(&self) -> &[Appointment] {
        &self.results
    }

    pub fn refdata(&self) -> &ReferenceData {
        &self.refdata
    }
}
