//! Load / save / delete shared by every writable entity kind.

use async_trait::async_trait;
use ips_rest_types::Deleted;
use reqwest::Method;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::domain::calendar::{EVENTS_PATH, Event};
use crate::domain::cms::Record;
use crate::domain::content::{Comment, Review};
use crate::domain::error::ClientError;
use crate::domain::forums::{POSTS_PATH, Post, TOPICS_PATH, Topic};
use crate::domain::hydrate::{Hydrate, hydrate};
use crate::domain::members::{MEMBERS_PATH, Member};
use crate::infra::http::Client;
use crate::infra::params::Params;

/// Outcome of [`Resource::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Saved {
    /// The server assigned a new id.
    Created,
    /// An existing entity was updated in place.
    Updated,
}

impl Saved {
    pub fn is_created(self) -> bool {
        matches!(self, Self::Created)
    }
}

/// A remote entity with an id-addressed collection endpoint.
#[async_trait]
pub trait Resource: Hydrate + Send + Sync {
    /// Human-readable kind used in logs.
    const KIND: &'static str;

    fn client(&self) -> &Client;

    /// Collection path, e.g. `/forums/topics`.
    fn collection_path(&self) -> String;

    fn id(&self) -> Option<u64>;

    /// Every writable field; nulls are dropped on the wire.
    fn save_params(&self) -> Params;

    fn item_path(&self, id: u64) -> String {
        format!("{}/{id}", self.collection_path())
    }

    /// Fetch `<collection>/<id>` and hydrate this instance from it.
    ///
    /// Fails with [`ClientError::AlreadyLoaded`] without touching the network
    /// when the instance is already identified.
    #[instrument(skip(self), fields(kind = Self::KIND))]
    async fn load(&mut self, id: u64) -> Result<&mut Self, ClientError>
    where
        Self: Sized,
    {
        if self.id().is_some() {
            return Err(ClientError::AlreadyLoaded);
        }
        let path = self.item_path(id);
        let body = self.client().get(&path, &Params::new()).await?;
        let bag: Map<String, Value> = serde_json::from_value(body)?;
        hydrate(self, &bag);
        Ok(self)
    }

    /// POST every writable field to the item path when identified, or to the
    /// collection path otherwise. Only a create hydrates from the response;
    /// an update keeps the local field values.
    async fn save(&mut self) -> Result<Saved, ClientError>
    where
        Self: Sized,
    {
        self.save_with(Params::new()).await
    }

    /// [`Resource::save`] with additional parameters. Entries in `extra` never
    /// replace a field the entity writes itself.
    #[instrument(skip_all, fields(kind = Self::KIND))]
    async fn save_with(&mut self, extra: Params) -> Result<Saved, ClientError>
    where
        Self: Sized,
    {
        let (path, outcome) = match self.id() {
            Some(id) => (self.item_path(id), Saved::Updated),
            None => (self.collection_path(), Saved::Created),
        };
        let mut params = self.save_params();
        params.merge_missing(extra);
        let body = self
            .client()
            .authorized_request(&path, &params, Method::POST)
            .await?;
        if outcome.is_created() {
            let bag: Map<String, Value> = serde_json::from_value(body)?;
            hydrate(self, &bag);
        }
        debug!(id = ?self.id(), ?outcome, "saved");
        Ok(outcome)
    }

    /// DELETE the item. The in-memory instance is left untouched; the
    /// returned record is detached from it.
    #[instrument(skip_all, fields(kind = Self::KIND))]
    async fn delete(&self) -> Result<Deleted, ClientError> {
        let id = self.id().ok_or(ClientError::NotLoaded)?;
        self.client()
            .authorized_request(&self.item_path(id), &Params::new(), Method::DELETE)
            .await?;
        Ok(Deleted::new(id))
    }
}

#[async_trait]
impl Resource for Member {
    const KIND: &'static str = "member";

    fn client(&self) -> &Client {
        Member::client(self)
    }

    fn collection_path(&self) -> String {
        MEMBERS_PATH.to_string()
    }

    fn id(&self) -> Option<u64> {
        Member::id(self)
    }

    fn save_params(&self) -> Params {
        self.write_params()
    }
}

#[async_trait]
impl Resource for Topic {
    const KIND: &'static str = "topic";

    fn client(&self) -> &Client {
        Topic::client(self)
    }

    fn collection_path(&self) -> String {
        TOPICS_PATH.to_string()
    }

    fn id(&self) -> Option<u64> {
        Topic::id(self)
    }

    fn save_params(&self) -> Params {
        self.write_params()
    }
}

#[async_trait]
impl Resource for Post {
    const KIND: &'static str = "post";

    fn client(&self) -> &Client {
        Post::client(self)
    }

    fn collection_path(&self) -> String {
        POSTS_PATH.to_string()
    }

    fn id(&self) -> Option<u64> {
        Post::id(self)
    }

    fn save_params(&self) -> Params {
        self.write_params()
    }
}

#[async_trait]
impl Resource for Record {
    const KIND: &'static str = "record";

    fn client(&self) -> &Client {
        Record::client(self)
    }

    fn collection_path(&self) -> String {
        self.database().records_path()
    }

    fn id(&self) -> Option<u64> {
        Record::id(self)
    }

    fn save_params(&self) -> Params {
        self.write_params()
    }
}

#[async_trait]
impl Resource for Comment {
    const KIND: &'static str = "comment";

    fn client(&self) -> &Client {
        Comment::client(self)
    }

    fn collection_path(&self) -> String {
        self.area().comments_path()
    }

    fn id(&self) -> Option<u64> {
        Comment::id(self)
    }

    fn save_params(&self) -> Params {
        self.write_params()
    }
}

#[async_trait]
impl Resource for Review {
    const KIND: &'static str = "review";

    fn client(&self) -> &Client {
        Review::client(self)
    }

    fn collection_path(&self) -> String {
        self.area().reviews_path()
    }

    fn id(&self) -> Option<u64> {
        Review::id(self)
    }

    fn save_params(&self) -> Params {
        self.write_params()
    }
}

#[async_trait]
impl Resource for Event {
    const KIND: &'static str = "event";

    fn client(&self) -> &Client {
        Event::client(self)
    }

    fn collection_path(&self) -> String {
        EVENTS_PATH.to_string()
    }

    fn id(&self) -> Option<u64> {
        Event::id(self)
    }

    fn save_params(&self) -> Params {
        self.write_params()
    }
}
