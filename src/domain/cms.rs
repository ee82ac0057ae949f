//! Pages databases, their categories and records.

use serde::Serialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::domain::coerce::{
    RefInput, Reference, Tags, datetime_param, read_datetime, read_flag, read_string,
};
use crate::domain::content::{Comment, ContentArea, Review};
use crate::domain::error::ClientError;
use crate::domain::hydrate::{Extensions, Hydrate, assign_id, hydrate};
use crate::domain::members::{Attribution, Member};
use crate::infra::http::Client;
use crate::infra::params::Params;

const FIELD_KEY_PREFIX: &str = "field_";

/// A Pages database. Factory for the records, categories, comments and
/// reviews that live inside it.
#[derive(Debug, Clone)]
pub struct Database {
    client: Client,
    id: u64,
}

impl Database {
    pub fn new(client: &Client, id: u64) -> Self {
        Self {
            client: client.clone(),
            id,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn area(&self) -> ContentArea {
        ContentArea::Cms { database: self.id }
    }

    pub fn records_path(&self) -> String {
        format!("/cms/records/{}", self.id)
    }

    pub fn record(&self) -> Record {
        Record::blank(self)
    }

    pub fn record_from(&self, bag: &Map<String, Value>) -> Record {
        let mut record = Record::blank(self);
        hydrate(&mut record, bag);
        record
    }

    pub fn category(&self, id: u64) -> Category {
        RefInput::<Category>::Id(id).resolve(self)
    }

    pub fn comment(&self) -> Comment {
        Comment::new(&self.client, self.area())
    }

    pub fn review(&self) -> Review {
        Review::new(&self.client, self.area())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Category {
    id: Option<u64>,
    name: Option<String>,
    url: Option<String>,
    #[serde(flatten)]
    extensions: Extensions,
}

impl Category {
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

impl Hydrate for Category {
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

impl Reference for Category {
    type Scope = Database;

    fn blank(_scope: &Database) -> Self {
        Self::default()
    }

    fn reference_id(&self) -> Option<u64> {
        self.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Record {
    #[serde(skip)]
    database: Database,
    id: Option<u64>,
    category: Option<Category>,
    #[serde(flatten)]
    attribution: Attribution,
    fields: Map<String, Value>,
    prefix: Option<String>,
    tags: Tags,
    #[serde(with = "time::serde::rfc3339::option")]
    date: Option<OffsetDateTime>,
    ip_address: Option<String>,
    locked: bool,
    hidden: bool,
    pinned: bool,
    featured: bool,
    #[serde(flatten)]
    extensions: Extensions,
}

impl Reference for Record {
    type Scope = Database;

    fn blank(database: &Database) -> Self {
        Self {
            database: database.clone(),
            id: None,
            category: None,
            attribution: Attribution::default(),
            fields: Map::new(),
            prefix: None,
            tags: Tags::default(),
            date: None,
            ip_address: None,
            locked: false,
            hidden: false,
            pinned: false,
            featured: false,
            extensions: Extensions::default(),
        }
    }

    fn reference_id(&self) -> Option<u64> {
        self.id
    }
}

impl Record {
    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn client(&self) -> &Client {
        &self.database.client
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    pub fn set_category(&mut self, category: impl Into<RefInput<Category>>) -> &mut Self {
        self.category = Some(category.into().resolve(&self.database));
        self
    }

    pub fn author(&self) -> Option<&Member> {
        self.attribution.author()
    }

    pub fn set_author(&mut self, author: impl Into<RefInput<Member>>) -> &mut Self {
        self.attribution.set_author(&self.database.client, author);
        self
    }

    pub fn author_name(&self) -> Option<&str> {
        self.attribution.author_name()
    }

    pub fn set_author_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.attribution.set_author_name(name);
        self
    }

    /// Database fields in server order, keyed `field_<n>`.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// The first database field.
    pub fn title(&self) -> Option<&Value> {
        self.fields.values().next()
    }

    /// Overwrite the first database field. No-op while no fields are known.
    pub fn set_title(&mut self, title: impl Into<Value>) -> &mut Self {
        if let Some(slot) = self.fields.values_mut().next() {
            *slot = title.into();
        }
        self
    }

    /// The second database field.
    pub fn description(&self) -> Option<&Value> {
        self.fields.values().nth(1)
    }

    /// Overwrite the second database field. No-op while fewer than two fields are known.
    pub fn set_description(&mut self, description: impl Into<Value>) -> &mut Self {
        if let Some(slot) = self.fields.values_mut().nth(1) {
            *slot = description.into();
        }
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

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn set_pinned(&mut self, pinned: bool) -> &mut Self {
        self.pinned = pinned;
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
        let fields: Map<String, Value> = self
            .fields
            .iter()
            .map(|(key, value)| (wire_field_key(key).to_string(), value.clone()))
            .collect();

        let mut params = Params::new();
        params.set_opt("category", self.category.as_ref().and_then(Category::id));
        self.attribution.write(&mut params);
        params
            .set("fields", fields)
            .set_opt("prefix", self.prefix.clone())
            .set("tags", self.tags.join())
            .set_opt("date", datetime_param(self.date.as_ref()))
            .set_opt("ip_address", self.ip_address.clone())
            .flag("locked", self.locked)
            .flag("hidden", self.hidden)
            .flag("pinned", self.pinned)
            .flag("featured", self.featured);
        params
    }
}

/// `field_12` → `12`; keys without the prefix are sent as they are.
fn wire_field_key(key: &str) -> &str {
    match key.strip_prefix(FIELD_KEY_PREFIX) {
        Some(rest) if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) => rest,
        _ => key,
    }
}

impl Hydrate for Record {
    fn assign(&mut self, key: &str, value: &Value) -> Result<bool, ClientError> {
        if self.attribution.assign(&self.database.client, key, value)? {
            return Ok(true);
        }
        match key {
            "id" => assign_id(&mut self.id, value)?,
            "category" => {
                if let Some(input) = RefInput::<Category>::from_value(value) {
                    self.category = Some(input.resolve(&self.database));
                }
            }
            "fields" => match value {
                Value::Object(map) => self.fields = map.clone(),
                other => {
                    return Err(ClientError::invalid_field(
                        "fields",
                        format!("expected an object, got {other}"),
                    ));
                }
            },
            "title" => {
                self.set_title(value.clone());
            }
            "description" => {
                self.set_description(value.clone());
            }
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
            "pinned" => self.pinned = read_flag("pinned", value)?,
            "featured" => self.featured = read_flag("featured", value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}
