//! Calendars and events.

use serde::Serialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::domain::coerce::{
    RefInput, Reference, Tags, datetime_param, read_datetime, read_flag, read_int, read_string,
};
use crate::domain::content::ContentArea;
use crate::domain::error::ClientError;
use crate::domain::hydrate::{Extensions, Hydrate, assign_id, hydrate};
use crate::domain::members::{Attribution, Member};
use crate::infra::http::Client;
use crate::infra::params::Params;

pub(crate) const EVENTS_PATH: &str = "/calendar/events";

#[derive(Debug, Clone, Serialize)]
pub struct Calendar {
    #[serde(skip)]
    client: Client,
    id: Option<u64>,
    name: Option<String>,
    url: Option<String>,
    #[serde(flatten)]
    extensions: Extensions,
}

impl Calendar {
    pub fn new(client: &Client, id: u64) -> Self {
        let mut calendar = Self::blank(client);
        calendar.id = Some(id);
        calendar
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}

impl Hydrate for Calendar {
    fn assign(&mut self, key: &str, value: &Value) -> Result<bool, ClientError> {
        match key {
            "id" => assign_id(&mut self.id, value)?,
            "name" => self.name = read_string("name", value)?,
            "url" => self.url = read_string("url", value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}

impl Reference for Calendar {
    type Scope = Client;

    fn blank(scope: &Client) -> Self {
        Self {
            client: scope.clone(),
            id: None,
            name: None,
            url: None,
            extensions: Extensions::default(),
        }
    }

    fn reference_id(&self) -> Option<u64> {
        self.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Event {
    #[serde(skip)]
    client: Client,
    id: Option<u64>,
    calendar: Option<Calendar>,
    #[serde(flatten)]
    attribution: Attribution,
    title: Option<String>,
    description: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    start: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    end: Option<OffsetDateTime>,
    /// iCalendar RRULE.
    recurrence: Option<String>,
    rsvp: bool,
    #[serde(rename = "rsvpLimit")]
    rsvp_limit: Option<i64>,
    prefix: Option<String>,
    tags: Tags,
    #[serde(with = "time::serde::rfc3339::option")]
    date: Option<OffsetDateTime>,
    ip_address: Option<String>,
    locked: bool,
    hidden: bool,
    featured: bool,
    #[serde(flatten)]
    extensions: Extensions,
}

impl Event {
    pub fn new(client: &Client) -> Self {
        Self {
            client: client.clone(),
            id: None,
            calendar: None,
            attribution: Attribution::default(),
            title: None,
            description: None,
            start: None,
            end: None,
            recurrence: None,
            rsvp: false,
            rsvp_limit: None,
            prefix: None,
            tags: Tags::default(),
            date: None,
            ip_address: None,
            locked: false,
            hidden: false,
            featured: false,
            extensions: Extensions::default(),
        }
    }

    pub fn from_bag(client: &Client, bag: &Map<String, Value>) -> Self {
        let mut event = Self::new(client);
        hydrate(&mut event, bag);
        event
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn area(&self) -> ContentArea {
        ContentArea::Calendar
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn calendar(&self) -> Option<&Calendar> {
        self.calendar.as_ref()
    }

    pub fn set_calendar(&mut self, calendar: impl Into<RefInput<Calendar>>) -> &mut Self {
        self.calendar = Some(calendar.into().resolve(&self.client));
        self
    }

    pub fn author(&self) -> Option<&Member> {
        self.attribution.author()
    }

    pub fn set_author(&mut self, author: impl Into<RefInput<Member>>) -> &mut Self {
        self.attribution.set_author(&self.client, author);
        self
    }

    pub fn author_name(&self) -> Option<&str> {
        self.attribution.author_name()
    }

    pub fn set_author_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.attribution.set_author_name(name);
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    pub fn start(&self) -> Option<OffsetDateTime> {
        self.start
    }

    pub fn set_start(&mut self, at: OffsetDateTime) -> &mut Self {
        self.start = Some(at);
        self
    }

    pub fn end(&self) -> Option<OffsetDateTime> {
        self.end
    }

    pub fn set_end(&mut self, at: OffsetDateTime) -> &mut Self {
        self.end = Some(at);
        self
    }

    pub fn recurrence(&self) -> Option<&str> {
        self.recurrence.as_deref()
    }

    pub fn set_recurrence(&mut self, rule: impl Into<String>) -> &mut Self {
        self.recurrence = Some(rule.into());
        self
    }

    pub fn has_rsvp(&self) -> bool {
        self.rsvp
    }

    pub fn set_rsvp(&mut self, enabled: bool) -> &mut Self {
        self.rsvp = enabled;
        self
    }

    pub fn rsvp_limit(&self) -> Option<i64> {
        self.rsvp_limit
    }

    pub fn set_rsvp_limit(&mut self, limit: i64) -> &mut Self {
        self.rsvp_limit = Some(limit);
        self
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn set_tags(&mut self, tags: impl Into<Tags>) -> &mut Self {
        self.tags = tags.into();
        self
    }

    pub fn date(&self) -> Option<OffsetDateTime> {
        self.date
    }

    pub fn set_date(&mut self, date: OffsetDateTime) -> &mut Self {
        self.date = Some(date);
        self
    }

    pub fn ip_address(&self) -> Option<&str> {
        self.ip_address.as_deref()
    }

    pub fn set_ip_address(&mut self, ip: impl Into<String>) -> &mut Self {
        self.ip_address = Some(ip.into());
        self
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) -> &mut Self {
        self.locked = locked;
        self
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) -> &mut Self {
        self.hidden = hidden;
        self
    }

    pub fn is_featured(&self) -> bool {
        self.featured
    }

    pub fn set_featured(&mut self, featured: bool) -> &mut Self {
        self.featured = featured;
        self
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub(crate) fn write_params(&self) -> Params {
        let mut params = Params::new();
        params.set_opt("calendar", self.calendar.as_ref().and_then(Calendar::id));
        self.attribution.write(&mut params);
        params
            .set_opt("title", self.title.clone())
            .set_opt("description", self.description.clone())
            .set_opt("start", datetime_param(self.start.as_ref()))
            .set_opt("end", datetime_param(self.end.as_ref()))
            .set_opt("recurrence", self.recurrence.clone())
            .flag("rsvp", self.rsvp)
            .set_opt("rsvpLimit", self.rsvp_limit)
            .set_opt("prefix", self.prefix.clone())
            .set("tags", self.tags.join())
            .set_opt("date", datetime_param(self.date.as_ref()))
            .set_opt("ip_address", self.ip_address.clone())
            .flag("locked", self.locked)
            .flag("hidden", self.hidden)
            .flag("featured", self.featured);
        params
    }
}

impl Reference for Event {
    type Scope = Client;

    fn blank(scope: &Client) -> Self {
        Self::new(scope)
    }

    fn reference_id(&self) -> Option<u64> {
        self.id
    }
}

impl Hydrate for Event {
    fn assign(&mut self, key: &str, value: &Value) -> Result<bool, ClientError> {
        if self.attribution.assign(&self.client, key, value)? {
            return Ok(true);
        }
        match key {
            "id" => assign_id(&mut self.id, value)?,
            "calendar" => {
                if let Some(input) = RefInput::<Calendar>::from_value(value) {
                    self.calendar = Some(input.resolve(&self.client));
                }
            }
            "title" => self.title = read_string("title", value)?,
            "description" => self.description = read_string("description", value)?,
            "start" => self.start = read_datetime("start", value)?,
            "end" => self.end = read_datetime("end", value)?,
            "recurrence" => self.recurrence = read_string("recurrence", value)?,
            "rsvp" => self.rsvp = read_flag("rsvp", value)?,
            "rsvpLimit" => self.rsvp_limit = read_int("rsvpLimit", value)?,
            "prefix" => self.prefix = read_string("prefix", value)?,
            "tags" => {
                if let Some(tags) = Tags::from_value(value) {
                    self.tags = tags;
                }
            }
            "date" => self.date = read_datetime("date", value)?,
            "ip_address" => self.ip_address = read_string("ip_address", value)?,
            "locked" => self.locked = read_flag("locked", value)?,
            "hidden" => self.hidden = read_flag("hidden", value)?,
            "featured" => self.featured = read_flag("featured", value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}
