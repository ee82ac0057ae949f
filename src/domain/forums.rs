//! Forums, topics and posts.

use serde::Serialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::domain::coerce::{
    RefInput, Reference, Tags, datetime_param, read_datetime, read_flag, read_int, read_string,
};
use crate::domain::error::ClientError;
use crate::domain::hydrate::{Extensions, Hydrate, assign_id, hydrate};
use crate::domain::members::{Attribution, Member};
use crate::infra::http::Client;
use crate::infra::params::Params;

pub(crate) const TOPICS_PATH: &str = "/forums/topics";
pub(crate) const POSTS_PATH: &str = "/forums/posts";

/// A forum container. Read-only; used as a reference and for scoped listings.
#[derive(Debug, Clone, Serialize)]
pub struct Forum {
    #[serde(skip)]
    client: Client,
    id: Option<u64>,
    name: Option<String>,
    topics: Option<i64>,
    url: Option<String>,
    #[serde(flatten)]
    extensions: Extensions,
}

impl Forum {
    pub fn new(client: &Client, id: u64) -> Self {
        let mut forum = Self::blank(client);
        forum.id = Some(id);
        forum
    }

    pub fn from_bag(client: &Client, bag: &Map<String, Value>) -> Self {
        let mut forum = Self::blank(client);
        hydrate(&mut forum, bag);
        forum
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

    /// Topic count as reported by the server.
    pub fn topics(&self) -> Option<i64> {
        self.topics
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}

impl Hydrate for Forum {
    fn assign(&mut self, key: &str, value: &Value) -> Result<bool, ClientError> {
        match key {
            "id" => assign_id(&mut self.id, value)?,
            "name" => self.name = read_string("name", value)?,
            "topics" => self.topics = read_int("topics", value)?,
            "url" => self.url = read_string("url", value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}

impl Reference for Forum {
    type Scope = Client;

    fn blank(scope: &Client) -> Self {
        Self {
            client: scope.clone(),
            id: None,
            name: None,
            topics: None,
            url: None,
            extensions: Extensions::default(),
        }
    }

    fn reference_id(&self) -> Option<u64> {
        self.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Topic {
    #[serde(skip)]
    client: Client,
    id: Option<u64>,
    forum: Option<Forum>,
    #[serde(flatten)]
    attribution: Attribution,
    title: Option<String>,
    post: Option<String>,
    prefix: Option<String>,
    tags: Tags,
    #[serde(with = "time::serde::rfc3339::option")]
    date: Option<OffsetDateTime>,
    ip_address: Option<String>,
    locked: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    open_time: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    close_time: Option<OffsetDateTime>,
    hidden: bool,
    pinned: bool,
    featured: bool,
    #[serde(flatten)]
    extensions: Extensions,
}

impl Topic {
    pub fn new(client: &Client) -> Self {
        Self {
            client: client.clone(),
            id: None,
            forum: None,
            attribution: Attribution::default(),
            title: None,
            post: None,
            prefix: None,
            tags: Tags::default(),
            date: None,
            ip_address: None,
            locked: false,
            open_time: None,
            close_time: None,
            hidden: false,
            pinned: false,
            featured: false,
            extensions: Extensions::default(),
        }
    }

    pub fn from_bag(client: &Client, bag: &Map<String, Value>) -> Self {
        let mut topic = Self::new(client);
        hydrate(&mut topic, bag);
        topic
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn forum(&self) -> Option<&Forum> {
        self.forum.as_ref()
    }

    pub fn set_forum(&mut self, forum: impl Into<RefInput<Forum>>) -> &mut Self {
        self.forum = Some(forum.into().resolve(&self.client));
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

    /// Content of the first post.
    pub fn post(&self) -> Option<&str> {
        self.post.as_deref()
    }

    pub fn set_post(&mut self, post: impl Into<String>) -> &mut Self {
        self.post = Some(post.into());
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

    pub fn open_time(&self) -> Option<OffsetDateTime> {
        self.open_time
    }

    pub fn set_open_time(&mut self, at: OffsetDateTime) -> &mut Self {
        self.open_time = Some(at);
        self
    }

    pub fn close_time(&self) -> Option<OffsetDateTime> {
        self.close_time
    }

    pub fn set_close_time(&mut self, at: OffsetDateTime) -> &mut Self {
        self.close_time = Some(at);
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
        let mut params = Params::new();
        params.set_opt("forum", self.forum.as_ref().and_then(Forum::id));
        self.attribution.write(&mut params);
        params
            .set_opt("title", self.title.clone())
            .set_opt("post", self.post.clone())
            .set_opt("prefix", self.prefix.clone())
            .set("tags", self.tags.join())
            .set_opt("date", datetime_param(self.date.as_ref()))
            .set_opt("ip_address", self.ip_address.clone())
            .flag("locked", self.locked)
            .set_opt("open_time", datetime_param(self.open_time.as_ref()))
            .set_opt("close_time", datetime_param(self.close_time.as_ref()))
            .flag("hidden", self.hidden)
            .flag("pinned", self.pinned)
            .flag("featured", self.featured);
        params
    }
}

impl Hydrate for Topic {
    fn assign(&mut self, key: &str, value: &Value) -> Result<bool, ClientError> {
        if self.attribution.assign(&self.client, key, value)? {
            return Ok(true);
        }
        match key {
            "id" => assign_id(&mut self.id, value)?,
            "forum" => {
                if let Some(input) = RefInput::<Forum>::from_value(value) {
                    self.forum = Some(input.resolve(&self.client));
                }
            }
            "title" => self.title = read_string("title", value)?,
            "post" => self.post = read_string("post", value)?,
            "prefix" => self.prefix = read_string("prefix", value)?,
            "tags" => {
                if let Some(tags) = Tags::from_value(value) {
                    self.tags = tags;
                }
            }
            "date" => self.date = read_datetime("date", value)?,
            "ip_address" => self.ip_address = read_string("ip_address", value)?,
            "locked" => self.locked = read_flag("locked", value)?,
            "open_time" => self.open_time = read_datetime("open_time", value)?,
            "close_time" => self.close_time = read_datetime("close_time", value)?,
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

impl Reference for Topic {
    type Scope = Client;

    fn blank(scope: &Client) -> Self {
        Self::new(scope)
    }

    fn reference_id(&self) -> Option<u64> {
        self.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Post {
    #[serde(skip)]
    client: Client,
    id: Option<u64>,
    topic: Option<Topic>,
    #[serde(flatten)]
    attribution: Attribution,
    post: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    date: Option<OffsetDateTime>,
    ip_address: Option<String>,
    hidden: bool,
    #[serde(flatten)]
    extensions: Extensions,
}

impl Post {
    pub fn new(client: &Client) -> Self {
        Self {
            client: client.clone(),
            id: None,
            topic: None,
            attribution: Attribution::default(),
            post: None,
            date: None,
            ip_address: None,
            hidden: false,
            extensions: Extensions::default(),
        }
    }

    pub fn from_bag(client: &Client, bag: &Map<String, Value>) -> Self {
        let mut post = Self::new(client);
        hydrate(&mut post, bag);
        post
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn topic(&self) -> Option<&Topic> {
        self.topic.as_ref()
    }

    pub fn set_topic(&mut self, topic: impl Into<RefInput<Topic>>) -> &mut Self {
        self.topic = Some(topic.into().resolve(&self.client));
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

    pub fn post(&self) -> Option<&str> {
        self.post.as_deref()
    }

    pub fn set_post(&mut self, post: impl Into<String>) -> &mut Self {
        self.post = Some(post.into());
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
        params.set_opt("topic", self.topic.as_ref().and_then(Topic::id));
        self.attribution.write(&mut params);
        params
            .set_opt("post", self.post.clone())
            .flag("hidden", self.hidden)
            .set_opt("date", datetime_param(self.date.as_ref()))
            .set_opt("ip_address", self.ip_address.clone());
        params
    }
}

impl Reference for Post {
    type Scope = Client;

    fn blank(scope: &Client) -> Self {
        Self::new(scope)
    }

    fn reference_id(&self) -> Option<u64> {
        self.id
    }
}

impl Hydrate for Post {
    fn assign(&mut self, key: &str, value: &Value) -> Result<bool, ClientError> {
        if self.attribution.assign(&self.client, key, value)? {
            return Ok(true);
        }
        match key {
            "id" => assign_id(&mut self.id, value)?,
            // list endpoints report the parent topic as `item_id`
            "topic" | "item_id" => {
                if let Some(input) = RefInput::<Topic>::from_value(value) {
                    self.topic = Some(input.resolve(&self.client));
                }
            }
            "post" | "content" => self.post = read_string("post", value)?,
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
    fn forum_reference_accepts_every_shape() {
        let client = client();
        let forum = Forum::new(&client, 7);

        let mut from_id = Topic::new(&client);
        from_id.set_forum(7_u64);
        let mut from_bag = Topic::new(&client);
        from_bag.set_forum(bag(json!({"id": 7, "name": "General"})));
        let mut from_instance = Topic::new(&client);
        from_instance.set_forum(forum);

        for topic in [&from_id, &from_bag, &from_instance] {
            assert_eq!(topic.forum().and_then(Forum::id), Some(7));
        }
        assert_eq!(from_bag.forum().and_then(Forum::name), Some("General"));
    }

    #[test]
    fn unrecognized_forum_input_is_ignored() {
        let topic = Topic::from_bag(&client(), &bag(json!({"forum": "general", "title": "T"})));
        assert!(topic.forum().is_none());
        assert_eq!(topic.title(), Some("T"));
    }

    #[test]
    fn topic_params_send_forum_id_and_flags() {
        let client = client();
        let mut topic = Topic::new(&client);
        topic
            .set_forum(2_u64)
            .set_author(5_u64)
            .set_title("Hello")
            .set_post("<p>Body</p>")
            .set_tags("a,b,a")
            .set_pinned(true);

        let params = topic.write_params();
        assert_eq!(params.get("forum"), Some(&json!(2)));
        assert_eq!(params.get("author"), Some(&json!(5)));
        assert_eq!(params.get("tags"), Some(&json!("a,b")));
        assert_eq!(params.get("pinned"), Some(&json!(1)));
        assert_eq!(params.get("locked"), Some(&json!(0)));
        assert!(!params.contains_key("author_name"));
    }

    #[test]
    fn topic_without_author_posts_as_guest() {
        let mut topic = Topic::new(&client());
        topic.set_author_name("Visitor");

        let params = topic.write_params();
        assert_eq!(params.get("author"), Some(&json!(0)));
        assert_eq!(params.get("author_name"), Some(&json!("Visitor")));
    }

    #[test]
    fn post_reads_list_shape() {
        let post = Post::from_bag(
            &client(),
            &bag(json!({"id": 40, "item_id": 9, "content": "<p>x</p>", "hidden": 0, "url": "u"})),
        );
        assert_eq!(post.topic().and_then(Topic::id), Some(9));
        assert_eq!(post.post(), Some("<p>x</p>"));
        assert_eq!(post.write_params().get("topic"), Some(&json!(9)));
        assert_eq!(post.extensions().get("url"), Some(&json!("u")));
    }
}
