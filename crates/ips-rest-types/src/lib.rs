//! Response shapes shared by the `ips-rest` library and its command-line client.

use serde::{Deserialize, Serialize};

/// Body of `GET /core/hello`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hello {
    pub community_name: String,
    pub community_url: String,
    pub ips_version: String,
}

/// One page of a collection listing.
///
/// Every list endpoint answers with the same envelope; only `results`
/// changes shape between resources.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsPage<T> {
    #[serde(default = "first_page")]
    pub page: u64,
    #[serde(default)]
    pub per_page: u64,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub total_pages: u64,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

fn first_page() -> u64 {
    1
}

impl<T> ResultsPage<T> {
    /// Rebuild the page with every result passed through `f`, keeping the paging metadata.
    pub fn map<U, F>(self, f: F) -> ResultsPage<U>
    where
        F: FnMut(T) -> U,
    {
        ResultsPage {
            page: self.page,
            per_page: self.per_page,
            total_results: self.total_results,
            total_pages: self.total_pages,
            results: self.results.into_iter().map(f).collect(),
        }
    }

    pub fn is_last(&self) -> bool {
        self.page >= self.total_pages
    }
}

/// Detached confirmation returned after a successful delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Deleted {
    pub id: u64,
    pub deleted: bool,
}

impl Deleted {
    pub fn new(id: u64) -> Self {
        Self { id, deleted: true }
    }
}

/// Attendance answer for a calendar event RSVP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RsvpResponse {
    NotGoing,
    Going,
    Maybe,
}

impl RsvpResponse {
    /// Numeric code expected by the `response` parameter.
    pub fn code(self) -> u8 {
        match self {
            RsvpResponse::NotGoing => 0,
            RsvpResponse::Going => 1,
            RsvpResponse::Maybe => 2,
        }
    }
}
