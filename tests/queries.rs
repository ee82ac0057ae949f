#![deny(clippy::all, clippy::pedantic)]

use httpmock::MockServer;
use ips_rest::{
    Calendar, Client, ClientError, ContentArea, Event, Forum, Member, Params, RefInput, Resource,
    RsvpResponse, Topic,
};
use serde_json::json;

fn client(server: &MockServer) -> Client {
    Client::new(&server.base_url(), "test-key").expect("client")
}

#[tokio::test]
async fn member_listing_maps_results_and_keeps_paging() -> Result<(), ClientError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path("/api/core/members")
            .query_param("page", "2")
            .query_param("perPage", "2");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"page":2,"perPage":2,"totalResults":3,"totalPages":2,"results":[{"id":3,"name":"carol","primaryGroup":{"id":3}}]}"#);
    });

    let params = Params::new().with("page", 2).with("perPage", 2);
    let page = client(&server).get_members(&params).await?;
    mock.assert();

    assert_eq!(page.page, 2);
    assert_eq!(page.total_results, 3);
    assert!(page.is_last());
    assert_eq!(page.results.len(), 1);
    let member = &page.results[0];
    assert_eq!(member.id(), Some(3));
    assert_eq!(member.name(), Some("carol"));
    assert_eq!(member.primary_group().and_then(ips_rest::Group::id), Some(3));
    Ok(())
}

#[tokio::test]
async fn member_scoped_listings_filter_by_author() -> Result<(), ClientError> {
    let server = MockServer::start();
    let topics = server.mock(|when, then| {
        when.method("GET")
            .path("/api/forums/topics")
            .query_param("author", "8")
            .query_param("sortDir", "desc");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"page":1,"perPage":25,"totalResults":1,"totalPages":1,"results":[{"id":4,"title":"Mine","author":{"id":8}}]}"#);
    });
    let events = server.mock(|when, then| {
        when.method("GET")
            .path("/api/calendar/events")
            .query_param("author", "8");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"page":1,"perPage":25,"totalResults":0,"totalPages":0,"results":[]}"#);
    });

    let member = RefInput::<Member>::Id(8).resolve(&client(&server));
    let page = member
        .get_topics(&Params::new().with("sortDir", "desc"))
        .await?;
    topics.assert();
    assert_eq!(page.results[0].author().and_then(Member::id), Some(8));

    let page = member.get_events(&Params::new()).await?;
    events.assert();
    assert!(page.results.is_empty());
    Ok(())
}

#[tokio::test]
async fn scoped_listing_on_unidentified_owner_fails_locally() {
    let server = MockServer::start();
    let any = server.mock(|_when, then| {
        then.status(200).body("{}");
    });

    let member = Member::new(&client(&server));
    let err = member
        .get_posts(&Params::new())
        .await
        .expect_err("unidentified member");
    assert!(matches!(err, ClientError::NotLoaded));
    any.assert_calls(0);
}

#[tokio::test]
async fn forum_and_calendar_listings_use_their_filter_keys() -> Result<(), ClientError> {
    let server = MockServer::start();
    let posts = server.mock(|when, then| {
        when.method("GET")
            .path("/api/forums/posts")
            .query_param("forum", "2");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"page":1,"perPage":25,"totalResults":1,"totalPages":1,"results":[{"id":10,"item_id":4,"content":"hi"}]}"#);
    });
    let events = server.mock(|when, then| {
        when.method("GET")
            .path("/api/calendar/events")
            .query_param("calendar", "6");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"page":1,"perPage":25,"totalResults":1,"totalPages":1,"results":[{"id":1,"title":"Meetup","calendar":{"id":6,"name":"Local"}}]}"#);
    });

    let client = client(&server);
    let page = Forum::new(&client, 2).get_posts(&Params::new()).await?;
    posts.assert();
    assert_eq!(page.results[0].topic().and_then(Topic::id), Some(4));
    assert_eq!(page.results[0].post(), Some("hi"));

    let page = Calendar::new(&client, 6).get_events(&Params::new()).await?;
    events.assert();
    let event = &page.results[0];
    assert_eq!(event.title(), Some("Meetup"));
    assert_eq!(event.calendar().and_then(Calendar::name), Some("Local"));
    Ok(())
}

#[tokio::test]
async fn database_records_carry_their_database() -> Result<(), ClientError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET").path("/api/cms/records/3");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"page":1,"perPage":25,"totalResults":1,"totalPages":1,"results":[{"id":9,"category":{"id":1},"fields":{"field_1":"Title","field_2":"Body"}}]}"#);
    });

    let database = client(&server).database(3);
    let page = database.get_records(&Params::new()).await?;
    mock.assert();

    let record = &page.results[0];
    assert_eq!(record.id(), Some(9));
    assert_eq!(record.database().id(), 3);
    assert_eq!(record.title(), Some(&json!("Title")));
    assert_eq!(record.item_path(9), "/cms/records/3/9");
    Ok(())
}

#[tokio::test]
async fn record_comment_merges_extra_params() -> Result<(), ClientError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/api/cms/comments/3")
            .query_param("record", "9")
            .query_param("author", "5")
            .query_param("content", "Nice")
            .query_param("anonymous", "1");
        then.status(201)
            .header("content-type", "application/json")
            .body(r#"{"id":77,"item_id":9,"author":{"id":5},"content":"Nice"}"#);
    });

    let database = client(&server).database(3);
    let record = database.record_from(&serde_json::Map::from_iter([(
        "id".to_string(),
        json!(9),
    )]));
    let extra = Params::new().with("anonymous", 1).with("content", "ignored");
    let comment = record.comment("Nice", 5_u64, extra).await?;
    mock.assert();

    assert_eq!(comment.id(), Some(77));
    assert_eq!(comment.item_id(), Some(9));
    assert_eq!(comment.area(), ContentArea::Cms { database: 3 });
    Ok(())
}

#[tokio::test]
async fn event_review_posts_to_calendar_reviews() -> Result<(), ClientError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/api/calendar/reviews")
            .query_param("event", "14")
            .query_param("rating", "5")
            .query_param("author", "2");
        then.status(201)
            .header("content-type", "application/json")
            .body(r#"{"id":3,"item_id":14,"rating":5,"content":"Great"}"#);
    });

    let event = RefInput::<Event>::Id(14).resolve(&client(&server));
    let review = event.review(5, "Great", 2_u64, Params::new()).await?;
    mock.assert();
    assert_eq!(review.rating(), Some(5));
    assert_eq!(review.content(), Some("Great"));
    Ok(())
}

#[tokio::test]
async fn event_nested_comments_use_item_path() -> Result<(), ClientError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET").path("/api/calendar/events/14/comments");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"page":1,"perPage":25,"totalResults":1,"totalPages":1,"results":[{"id":1,"item_id":"14","content":"See you"}]}"#);
    });

    let event = RefInput::<Event>::Id(14).resolve(&client(&server));
    let page = event.get_comments(&Params::new()).await?;
    mock.assert();
    assert_eq!(page.results[0].item_id(), Some(14));
    assert_eq!(page.results[0].area(), ContentArea::Calendar);
    Ok(())
}

#[tokio::test]
async fn rsvp_sends_numeric_response() -> Result<(), ClientError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("PUT")
            .path("/api/calendar/events/14/rsvps/8")
            .query_param("response", "2");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"response":2}"#);
    });

    let event = RefInput::<Event>::Id(14).resolve(&client(&server));
    let body = event.rsvp(8, RsvpResponse::Maybe).await?;
    mock.assert();
    assert_eq!(body["response"], json!(2));
    Ok(())
}

#[tokio::test]
async fn topic_reply_creates_post_under_topic() -> Result<(), ClientError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/api/forums/posts")
            .query_param("topic", "5")
            .query_param("author", "0")
            .query_param("post", "Welcome aboard");
        then.status(201)
            .header("content-type", "application/json")
            .body(r#"{"id":50,"item_id":5,"content":"Welcome aboard"}"#);
    });

    let topic = RefInput::<Topic>::Id(5).resolve(&client(&server));
    let post = topic.reply("Welcome aboard", 0_u64).await?;
    mock.assert();
    assert_eq!(post.id(), Some(50));
    assert_eq!(post.topic().and_then(Topic::id), Some(5));
    Ok(())
}
