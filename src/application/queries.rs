//! Collection listings, scoped accessors and parented sub-resource operations.

use ips_rest_types::{ResultsPage, RsvpResponse};
use reqwest::Method;
use serde_json::{Map, Value};
use tracing::debug;

use crate::application::lifecycle::Resource;
use crate::domain::calendar::{Calendar, EVENTS_PATH, Event};
use crate::domain::cms::{Database, Record};
use crate::domain::content::{Comment, ContentArea, Review};
use crate::domain::error::ClientError;
use crate::domain::coerce::{RefInput, Reference};
use crate::domain::forums::{Forum, POSTS_PATH, Post, TOPICS_PATH, Topic};
use crate::domain::members::{MEMBERS_PATH, Member};
use crate::infra::http::Client;
use crate::infra::params::Params;

/// GET a collection and rebuild its `results` through `make`.
async fn fetch_page<T, F>(
    client: &Client,
    path: &str,
    params: &Params,
    make: F,
) -> Result<ResultsPage<T>, ClientError>
where
    F: Fn(&Map<String, Value>) -> T,
{
    let body = client.get(path, params).await?;
    let page: ResultsPage<Map<String, Value>> = serde_json::from_value(body)?;
    debug!(
        path,
        page = page.page,
        total = page.total_results,
        "fetched collection page"
    );
    Ok(page.map(|bag| make(&bag)))
}

/// Copy of `params` filtered to one owner; the owner must be identified.
fn scoped<R: Reference>(params: &Params, key: &str, owner: &R) -> Result<Params, ClientError> {
    let id = owner.reference_id().ok_or(ClientError::NotLoaded)?;
    let mut params = params.clone();
    params.set(key, id);
    Ok(params)
}

impl Client {
    pub async fn get_members(&self, params: &Params) -> Result<ResultsPage<Member>, ClientError> {
        fetch_page(self, MEMBERS_PATH, params, |bag| Member::from_bag(self, bag)).await
    }

    pub async fn get_topics(&self, params: &Params) -> Result<ResultsPage<Topic>, ClientError> {
        fetch_page(self, TOPICS_PATH, params, |bag| Topic::from_bag(self, bag)).await
    }

    pub async fn get_posts(&self, params: &Params) -> Result<ResultsPage<Post>, ClientError> {
        fetch_page(self, POSTS_PATH, params, |bag| Post::from_bag(self, bag)).await
    }

    pub async fn get_events(&self, params: &Params) -> Result<ResultsPage<Event>, ClientError> {
        fetch_page(self, EVENTS_PATH, params, |bag| Event::from_bag(self, bag)).await
    }

    /// Comments of any content area.
    pub async fn get_comments(
        &self,
        area: ContentArea,
        params: &Params,
    ) -> Result<ResultsPage<Comment>, ClientError> {
        fetch_page(self, &area.comments_path(), params, |bag| {
            Comment::from_bag(self, area, bag)
        })
        .await
    }

    /// Reviews of any content area.
    pub async fn get_reviews(
        &self,
        area: ContentArea,
        params: &Params,
    ) -> Result<ResultsPage<Review>, ClientError> {
        fetch_page(self, &area.reviews_path(), params, |bag| {
            Review::from_bag(self, area, bag)
        })
        .await
    }

    pub fn database(&self, id: u64) -> Database {
        Database::new(self, id)
    }
}

impl Database {
    pub async fn get_records(&self, params: &Params) -> Result<ResultsPage<Record>, ClientError> {
        fetch_page(self.client(), &self.records_path(), params, |bag| {
            self.record_from(bag)
        })
        .await
    }

    pub async fn get_comments(&self, params: &Params) -> Result<ResultsPage<Comment>, ClientError> {
        self.client().get_comments(self.area(), params).await
    }

    pub async fn get_reviews(&self, params: &Params) -> Result<ResultsPage<Review>, ClientError> {
        self.client().get_reviews(self.area(), params).await
    }
}

impl Member {
    /// Posts authored by this member.
    pub async fn get_posts(&self, params: &Params) -> Result<ResultsPage<Post>, ClientError> {
        let params = scoped(params, "author", self)?;
        self.client().get_posts(&params).await
    }

    /// Topics started by this member.
    pub async fn get_topics(&self, params: &Params) -> Result<ResultsPage<Topic>, ClientError> {
        let params = scoped(params, "author", self)?;
        self.client().get_topics(&params).await
    }

    /// Events submitted by this member.
    pub async fn get_events(&self, params: &Params) -> Result<ResultsPage<Event>, ClientError> {
        let params = scoped(params, "author", self)?;
        self.client().get_events(&params).await
    }
}

impl Forum {
    pub async fn get_topics(&self, params: &Params) -> Result<ResultsPage<Topic>, ClientError> {
        let params = scoped(params, "forum", self)?;
        self.client().get_topics(&params).await
    }

    pub async fn get_posts(&self, params: &Params) -> Result<ResultsPage<Post>, ClientError> {
        let params = scoped(params, "forum", self)?;
        self.client().get_posts(&params).await
    }
}

impl Calendar {
    pub async fn get_events(&self, params: &Params) -> Result<ResultsPage<Event>, ClientError> {
        let params = scoped(params, "calendar", self)?;
        self.client().get_events(&params).await
    }
}

impl Topic {
    /// Posts in this topic, first post included.
    pub async fn get_posts(&self, params: &Params) -> Result<ResultsPage<Post>, ClientError> {
        let id = self.id().ok_or(ClientError::NotLoaded)?;
        let client = self.client();
        fetch_page(client, &format!("{TOPICS_PATH}/{id}/posts"), params, |bag| {
            Post::from_bag(client, bag)
        })
        .await
    }

    /// Create a post in this topic.
    pub async fn reply(
        &self,
        content: impl Into<String>,
        author: impl Into<RefInput<Member>>,
    ) -> Result<Post, ClientError> {
        let id = self.id().ok_or(ClientError::NotLoaded)?;
        let mut post = Post::new(self.client());
        post.set_topic(id).set_author(author).set_post(content);
        post.save().await?;
        Ok(post)
    }
}

impl Record {
    pub async fn get_comments(&self, params: &Params) -> Result<ResultsPage<Comment>, ClientError> {
        let path = format!("{}/comments", self.item_path(self.require_id()?));
        let area = self.database().area();
        let client = self.client();
        fetch_page(client, &path, params, |bag| Comment::from_bag(client, area, bag)).await
    }

    pub async fn get_reviews(&self, params: &Params) -> Result<ResultsPage<Review>, ClientError> {
        let path = format!("{}/reviews", self.item_path(self.require_id()?));
        let area = self.database().area();
        let client = self.client();
        fetch_page(client, &path, params, |bag| Review::from_bag(client, area, bag)).await
    }

    /// Post a comment on this record. `extra` fills fields the comment leaves unset.
    pub async fn comment(
        &self,
        content: impl Into<String>,
        author: impl Into<RefInput<Member>>,
        extra: Params,
    ) -> Result<Comment, ClientError> {
        let id = self.require_id()?;
        let mut comment = self.database().comment();
        comment.set_item_id(id).set_author(author).set_content(content);
        comment.save_with(extra).await?;
        Ok(comment)
    }

    /// Post a review on this record. `extra` fills fields the review leaves unset.
    pub async fn review(
        &self,
        rating: i64,
        content: impl Into<String>,
        author: impl Into<RefInput<Member>>,
        extra: Params,
    ) -> Result<Review, ClientError> {
        let id = self.require_id()?;
        let mut review = self.database().review();
        review
            .set_item_id(id)
            .set_rating(rating)
            .set_author(author)
            .set_content(content);
        review.save_with(extra).await?;
        Ok(review)
    }

    fn require_id(&self) -> Result<u64, ClientError> {
        self.id().ok_or(ClientError::NotLoaded)
    }
}

impl Event {
    pub async fn get_comments(&self, params: &Params) -> Result<ResultsPage<Comment>, ClientError> {
        let path = format!("{}/comments", self.item_path(self.require_id()?));
        let client = self.client();
        fetch_page(client, &path, params, |bag| {
            Comment::from_bag(client, ContentArea::Calendar, bag)
        })
        .await
    }

    pub async fn get_reviews(&self, params: &Params) -> Result<ResultsPage<Review>, ClientError> {
        let path = format!("{}/reviews", self.item_path(self.require_id()?));
        let client = self.client();
        fetch_page(client, &path, params, |bag| {
            Review::from_bag(client, ContentArea::Calendar, bag)
        })
        .await
    }

    /// Comment on this event. `extra` fills fields the comment leaves unset.
    pub async fn comment(
        &self,
        content: impl Into<String>,
        author: impl Into<RefInput<Member>>,
        extra: Params,
    ) -> Result<Comment, ClientError> {
        let id = self.require_id()?;
        let mut comment = Comment::new(self.client(), ContentArea::Calendar);
        comment.set_item_id(id).set_author(author).set_content(content);
        comment.save_with(extra).await?;
        Ok(comment)
    }

    /// Review this event. `extra` fills fields the review leaves unset.
    pub async fn review(
        &self,
        rating: i64,
        content: impl Into<String>,
        author: impl Into<RefInput<Member>>,
        extra: Params,
    ) -> Result<Review, ClientError> {
        let id = self.require_id()?;
        let mut review = Review::new(self.client(), ContentArea::Calendar);
        review
            .set_item_id(id)
            .set_rating(rating)
            .set_author(author)
            .set_content(content);
        review.save_with(extra).await?;
        Ok(review)
    }

    /// Record `member`'s attendance answer.
    pub async fn rsvp(&self, member: u64, response: RsvpResponse) -> Result<Value, ClientError> {
        let path = self.rsvp_path(member)?;
        let params = Params::new().with("response", response.code());
        self.client()
            .authorized_request(&path, &params, Method::PUT)
            .await
    }

    /// Withdraw `member`'s attendance answer.
    pub async fn cancel_rsvp(&self, member: u64) -> Result<Value, ClientError> {
        let path = self.rsvp_path(member)?;
        self.client()
            .authorized_request(&path, &Params::new(), Method::DELETE)
            .await
    }

    fn rsvp_path(&self, member: u64) -> Result<String, ClientError> {
        Ok(format!("{}/rsvps/{member}", self.item_path(self.require_id()?)))
    }

    fn require_id(&self) -> Result<u64, ClientError> {
        self.id().ok_or(ClientError::NotLoaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_filter_requires_an_id() {
        let client = Client::new("https://community.test", "key").expect("client");
        let err = scoped(&Params::new(), "author", &Member::new(&client)).expect_err("unidentified");
        assert!(matches!(err, ClientError::NotLoaded));
    }

    #[test]
    fn scoped_filter_overrides_caller_value() -> Result<(), ClientError> {
        let client = Client::new("https://community.test", "key")?;
        let forum = Forum::new(&client, 9);
        let params = scoped(&Params::new().with("forum", 1).with("page", 2), "forum", &forum)?;
        assert_eq!(params.get("forum"), Some(&Value::from(9)));
        assert_eq!(params.get("page"), Some(&Value::from(2)));
        Ok(())
    }
}
