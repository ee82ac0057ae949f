//! Comments and reviews attached to Pages records, calendar events and gallery images.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::domain::coerce::{RefInput, datetime_param, read_datetime, read_flag, read_int, read_string};
use crate::domain::error::ClientError;
use crate::domain::hydrate::{Extensions, Hydrate, assign_id, hydrate};
use crate::domain::members::{Attribution, Member};
use crate::infra::http::Client;
use crate::infra::params::Params;

/// The application a comment or review belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentArea {
    Cms { database: u64 },
    Calendar,
    Gallery,
}

impl ContentArea {
    pub fn comments_path(&self) -> String {
        match self {
            Self::Cms { database } => format!("/cms/comments/{database}"),
            Self::Calendar => "/calendar/comments".to_string(),
            Self::Gallery => "/gallery/comments".to_string(),
        }
    }

    pub fn reviews_path(&self) -> String {
        match self {
            Self::Cms { database } => format!("/cms/reviews/{database}"),
            Self::Calendar => "/calendar/reviews".to_string(),
            Self::Gallery => "/gallery/reviews".to_string(),
        }
    }

    /// Parameter naming the parent item on writes and filters.
    pub fn item_key(&self) -> &'static str {
        match self {
            Self::Cms { .. } => "record",
            Self::Calendar => "event",
            Self::Gallery => "image",
        }
    }
}

impl fmt::Display for ContentArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cms { database } => write!(f, "cms database {database}"),
            Self::Calendar => f.write_str("calendar"),
            Self::Gallery => f.write_str("gallery"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    #[serde(skip)]
    client: Client,
    #[serde(skip)]
    area: ContentArea,
    id: Option<u64>,
    item_id: Option<u64>,
    #[serde(flatten)]
    attribution: Attribution,
    content: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    date: Option<OffsetDateTime>,
    ip_address: Option<String>,
    hidden: bool,
    #[serde(flatten)]
    extensions: Extensions,
}

impl Comment {
    pub fn new(client: &Client, area: ContentArea) -> Self {
        Self {
            client: client.clone(),
            area,
            id: None,
            item_id: None,
            attribution: Attribution::default(),
            content: None,
            date: None,
            ip_address: None,
            hidden: false,
            extensions: Extensions::default(),
        }
    }

    pub fn from_bag(client: &Client, area: ContentArea, bag: &Map<String, Value>) -> Self {
        let mut comment = Self::new(client, area);
        hydrate(&mut comment, bag);
        comment
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn area(&self) -> ContentArea {
        self.area
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    /// Id of the record, event or image this comment belongs to.
    pub fn item_id(&self) -> Option<u64> {
        self.item_id
    }

    pub fn set_item_id(&mut self, item: u64) -> &mut Self {
        self.item_id = Some(item);
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

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn set_content(&mut self, content: impl Into<String>) -> &mut Self {
        self.content = Some(content.into());
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

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) -> &mut Self {
        self.hidden = hidden;
        self
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub(crate) fn write_params(&self) -> Params {
        let mut params = Params::new();
        params.set_opt(self.area.item_key(), self.item_id);
        self.attribution.write(&mut params);
        params
            .set_opt("content", self.content.clone())
            .set_opt("date", datetime_param(self.date.as_ref()))
            .set_opt("ip_address", self.ip_address.clone())
            .flag("hidden", self.hidden);
        params
    }

    fn assign_item(&mut self, value: &Value) -> Result<(), ClientError> {
        match value {
            Value::Object(bag) => match bag.get("id") {
                Some(id) => assign_item_id(&mut self.item_id, id),
                None => Ok(()),
            },
            other => assign_item_id(&mut self.item_id, other),
        }
    }
}

fn assign_item_id(slot: &mut Option<u64>, value: &Value) -> Result<(), ClientError> {
    match value {
        Value::Null => Ok(()),
        Value::Number(n) => {
            *slot = n.as_u64();
            Ok(())
        }
        Value::String(s) => s
            .trim()
            .parse()
            .map(|id| *slot = Some(id))
            .map_err(|_| ClientError::invalid_field("item_id", format!("expected an id, got {s:?}"))),
        other => Err(ClientError::invalid_field(
            "item_id",
            format!("expected an id, got {other}"),
        )),
    }
}

impl Hydrate for Comment {
    fn assign(&mut self, key: &str, value: &Value) -> Result<bool, ClientError> {
        if self.attribution.assign(&self.client, key, value)? {
            return Ok(true);
        }
        match key {
            "id" => assign_id(&mut self.id, value)?,
            "item_id" | "record" | "event" | "image" => self.assign_item(value)?,
            "content" => self.content = read_string("content", value)?,
            "date" => self.date = read_datetime("date", value)?,
            "ip_address" => self.ip_address = read_string("ip_address", value)?,
            "hidden" => self.hidden = read_flag("hidden", value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}

/// A rated comment. Content is optional on the server and sent as an empty
/// string when unset.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    #[serde(flatten)]
    body: Comment,
    rating: Option<i64>,
}

impl Review {
    pub fn new(client: &Client, area: ContentArea) -> Self {
        Self {
            body: Comment::new(client, area),
            rating: None,
        }
    }

    pub fn from_bag(client: &Client, area: ContentArea, bag: &Map<String, Value>) -> Self {
        let mut review = Self::new(client, area);
        hydrate(&mut review, bag);
        review
    }

    pub fn client(&self) -> &Client {
        self.body.client()
    }

    pub fn area(&self) -> ContentArea {
        self.body.area()
    }

    pub fn id(&self) -> Option<u64> {
        self.body.id()
    }

    pub fn item_id(&self) -> Option<u64> {
        self.body.item_id()
    }

    pub fn set_item_id(&mut self, item: u64) -> &mut Self {
        self.body.set_item_id(item);
        self
    }

    pub fn author(&self) -> Option<&Member> {
        self.body.author()
    }

    pub fn set_author(&mut self, author: impl Into<RefInput<Member>>) -> &mut Self {
        self.body.set_author(author);
        self
    }

    pub fn author_name(&self) -> Option<&str> {
        self.body.author_name()
    }

    pub fn set_author_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.body.set_author_name(name);
        self
    }

    pub fn rating(&self) -> Option<i64> {
        self.rating
    }

    pub fn set_rating(&mut self, rating: i64) -> &mut Self {
        self.rating = Some(rating);
        self
    }

    pub fn content(&self) -> Option<&str> {
        self.body.content()
    }

    pub fn set_content(&mut self, content: impl Into<String>) -> &mut Self {
        self.body.set_content(content);
        self
    }

    pub fn date(&self) -> Option<OffsetDateTime> {
        self.body.date()
    }

    pub fn set_date(&mut self, date: OffsetDateTime) -> &mut Self {
        self.body.set_date(date);
        self
    }

    pub fn ip_address(&self) -> Option<&str> {
        self.body.ip_address()
    }

    pub fn set_ip_address(&mut self, ip: impl Into<String>) -> &mut Self {
        self.body.set_ip_address(ip);
        self
    }

    pub fn is_hidden(&self) -> bool {
        self.body.is_hidden()
    }

    pub fn set_hidden(&mut self, hidden: bool) -> &mut Self {
        self.body.set_hidden(hidden);
        self
    }

    pub fn extensions(&self) -> &Extensions {
        self.body.extensions()
    }

    pub(crate) fn write_params(&self) -> Params {
        let mut params = self.body.write_params();
        if params.get("content").is_none_or(Value::is_null) {
            params.set("content", "");
        }
        params.set_opt("rating", self.rating);
        params
    }
}

impl Hydrate for Review {
    fn assign(&mut self, key: &str, value: &Value) -> Result<bool, ClientError> {
        if key == "rating" {
            self.rating = read_int("rating", value)?;
            return Ok(true);
        }
        self.body.assign(key, value)
    }

    fn extensions_mut(&mut self) -> &mut Extensions {
        self.body.extensions_mut()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn client() -> Client {
        Client::new("https://community.test", "key").expect("client")
    }

    fn bag(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn area_paths_and_item_keys() {
        let cms = ContentArea::Cms { database: 2 };
        assert_eq!(cms.comments_path(), "/cms/comments/2");
        assert_eq!(cms.reviews_path(), "/cms/reviews/2");
        assert_eq!(cms.item_key(), "record");
        assert_eq!(ContentArea::Calendar.comments_path(), "/calendar/comments");
        assert_eq!(ContentArea::Gallery.reviews_path(), "/gallery/reviews");
        assert_eq!(ContentArea::Gallery.item_key(), "image");
    }

    #[test]
    fn comment_params_use_area_item_key() {
        let mut comment = Comment::new(&client(), ContentArea::Calendar);
        comment.set_item_id(14).set_author(3_u64).set_content("See you there");

        let params = comment.write_params();
        assert_eq!(params.get("event"), Some(&json!(14)));
        assert_eq!(params.get("author"), Some(&json!(3)));
        assert_eq!(params.get("content"), Some(&json!("See you there")));
        assert!(!params.contains_key("record"));
    }

    #[test]
    fn comment_hydrates_item_from_any_shape() {
        let area = ContentArea::Cms { database: 1 };
        let a = Comment::from_bag(&client(), area, &bag(json!({"id": 1, "item_id": 9})));
        let b = Comment::from_bag(&client(), area, &bag(json!({"id": 2, "record": {"id": 9}})));
        let c = Comment::from_bag(&client(), area, &bag(json!({"id": 3, "item_id": "9"})));
        assert_eq!(a.item_id(), Some(9));
        assert_eq!(b.item_id(), Some(9));
        assert_eq!(c.item_id(), Some(9));
    }

    #[test]
    fn review_defaults_empty_content() {
        let mut review = Review::new(&client(), ContentArea::Gallery);
        review.set_item_id(4).set_rating(5).set_author(0_u64).set_author_name("Visitor");

        let params = review.write_params();
        assert_eq!(params.get("content"), Some(&json!("")));
        assert_eq!(params.get("rating"), Some(&json!(5)));
        assert_eq!(params.get("image"), Some(&json!(4)));
        assert_eq!(params.get("author_name"), Some(&json!("Visitor")));
    }

    #[test]
    fn review_hydration_keeps_unknown_keys() {
        let review = Review::from_bag(
            &client(),
            ContentArea::Calendar,
            &bag(json!({"id": 6, "rating": "4", "content": "Good", "helpful": 2})),
        );
        assert_eq!(review.rating(), Some(4));
        assert_eq!(review.content(), Some("Good"));
        assert_eq!(review.extensions().get("helpful"), Some(&json!(2)));
    }
}
