use crate::models::AppointmentStatus;
use crate::store::{FilterSpec, SortDir};

/// Appointment fields the free-text search runs over, combined with OR.
pub const SEARCH_FIELDS: &[&str] = &["Name", "patient", "doctor", "department"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Scheduled,
    Completed,
    Cancelled,
}

impl StatusFilter {
    pub fn status(self) -> Option<AppointmentStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Scheduled => Some(AppointmentStatus::Scheduled),
            StatusFilter::Completed => Some(AppointmentStatus::Completed),
            StatusFilter::Cancelled => Some(AppointmentStatus::Cancelled),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(StatusFilter::All),
            "scheduled" => Some(StatusFilter::Scheduled),
            "completed" => Some(StatusFilter::Completed),
            "cancelled" => Some(StatusFilter::Cancelled),
            _ => None,
        }
    }
}

/// Builds the list query from the current filter/search state and keeps a
/// monotonically increasing ticket per issued request, so a response that
/// was overtaken by a newer request is discarded instead of overwriting it.
#[derive(Debug)]
pub struct AppointmentQuery {
    pub filter: StatusFilter,
    pub search: String,
    page_limit: u32,
    issued: u64,
    applied: u64,
}

impl AppointmentQuery {
    pub fn new(page_limit: u32) -> Self {
        Self {
            filter: StatusFilter::All,
            search: String::new(),
            page_limit,
            issued: 0,
            applied: 0,
        }
    }

    /// Status exact-match when filtering, substring OR-search across the
    /// search fields when a term is present, date then time ascending.
    pub fn filter_spec(&self) -> FilterSpec {
        let mut spec = FilterSpec::new()
            .limit(self.page_limit)
            .order_by("date", SortDir::Asc)
            .order_by("time", SortDir::Asc);

        if let Some(status) = self.filter.status() {
            spec = spec.eq("status", status.as_str());
        }

        let term = self.search.trim();
        if !term.is_empty() {
            spec = spec.contains_any(SEARCH_FIELDS, term);
        }

        spec
    }

    /// Ticket for the request about to be issued.
    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Whether a response for `ticket` may be applied. Only the newest
    /// issued request wins; anything older is stale.
    pub fn accept(&mut self, ticket: u64) -> bool {
        if ticket == self.issued && ticket > self.applied {
            self.applied = ticket;
            true
        } else {
            false
        }
    }
}
