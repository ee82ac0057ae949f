#![deny(clippy::all, clippy::pedantic)]

use httpmock::MockServer;
use ips_rest::config::{LoadError, Overrides};
use ips_rest::{Client, ClientError};
use tempfile::NamedTempFile;

use crate::args::{
    AuthorArgs, Cli, Commands, EventsCmd, MembersCmd, PageArgs, PostsCmd, RecordsCmd, RsvpArg,
    SortDir, TopicsCmd,
};
use crate::client::{CliError, settings_from_cli};
use crate::handlers::{events, members, posts, records, topics};

fn client(server: &MockServer) -> Client {
    Client::new(&server.base_url(), "key").expect("client")
}

fn tmp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("tmp file");
    std::io::Write::write_all(&mut file, contents.as_bytes()).expect("write tmp");
    file
}

fn cli(key_file: Option<&NamedTempFile>, api_key_env: Option<&str>) -> Cli {
    Cli {
        overrides: Overrides {
            site: Some("https://community.example.com".to_string()),
            ..Default::default()
        },
        key_file: key_file.map(|file| file.path().to_path_buf()),
        api_key_env: api_key_env.map(str::to_string),
        command: Commands::Hello,
    }
}

#[test]
fn settings_prefer_key_file() -> Result<(), CliError> {
    let file = tmp_file("file-key\n");
    let settings = settings_from_cli(&cli(Some(&file), Some("env-key")))?;
    assert_eq!(settings.client.api_key, "file-key");
    Ok(())
}

#[test]
fn settings_fall_back_to_env_key() -> Result<(), CliError> {
    let settings = settings_from_cli(&cli(None, Some("env-key")))?;
    assert_eq!(settings.client.api_key, "env-key");
    assert!(!settings.client.accept_invalid_certs);
    Ok(())
}

#[test]
fn settings_error_without_key() {
    let err = settings_from_cli(&cli(None, None)).expect_err("missing key should fail");
    assert!(matches!(
        err,
        CliError::Config(LoadError::Invalid {
            key: "client.api_key",
            ..
        })
    ));
}

#[test]
fn read_value_prefers_file_over_inline() -> Result<(), CliError> {
    let file = tmp_file("from-file");
    let val = crate::io::read_value(Some("inline".into()), Some(file.path().to_path_buf()), "post")?;
    assert_eq!(val, "from-file");
    Ok(())
}

#[test]
fn read_value_requires_some_input() {
    let err = crate::io::read_value(None, None, "post").expect_err("no input");
    assert!(matches!(err, CliError::InvalidInput(_)));
}

#[tokio::test]
async fn members_list_forwards_paging() -> Result<(), CliError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path("/api/core/members")
            .query_param("page", "2")
            .query_param("perPage", "5")
            .query_param("sortDir", "desc")
            .query_param("name", "alice");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"page":2,"perPage":5,"totalResults":6,"totalPages":2,"results":[{"id":6,"name":"alice"}]}"#);
    });

    members::handle(
        &client(&server),
        MembersCmd::List {
            paging: PageArgs {
                page: Some(2),
                per_page: Some(5),
                sort_by: None,
                sort_dir: Some(SortDir::Desc),
            },
            name: Some("alice".into()),
        },
    )
    .await?;
    mock.assert();
    Ok(())
}

#[tokio::test]
async fn members_get_loads_by_id() -> Result<(), CliError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET").path("/api/core/members/12");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"id":12,"name":"alice","primaryGroup":{"id":3,"name":"Members"}}"#);
    });

    members::handle(&client(&server), MembersCmd::Get { id: 12 }).await?;
    mock.assert();
    Ok(())
}

#[tokio::test]
async fn api_errors_surface_from_handlers() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("DELETE").path("/api/core/members/3");
        then.status(404)
            .header("content-type", "application/json")
            .body(r#"{"errorCode":"1C292/2","errorMessage":"INVALID_ID"}"#);
    });

    let err = members::handle(&client(&server), MembersCmd::Delete { id: 3 })
        .await
        .expect_err("api error");
    mock.assert();
    match err {
        CliError::Client(ClientError::Api { code, message }) => {
            assert_eq!(code, "1C292/2");
            assert_eq!(message, "INVALID_ID");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn topics_create_posts_as_guest() -> Result<(), CliError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/api/forums/topics")
            .query_param("forum", "2")
            .query_param("title", "Hello")
            .query_param("post", "<p>Hi</p>")
            .query_param("author", "0")
            .query_param("author_name", "Visitor")
            .query_param("tags", "intro,news")
            .query_param("pinned", "1");
        then.status(201)
            .header("content-type", "application/json")
            .body(r#"{"id":40,"title":"Hello","forum":{"id":2}}"#);
    });

    topics::handle(
        &client(&server),
        TopicsCmd::Create {
            forum: 2,
            title: "Hello".into(),
            post: Some("<p>Hi</p>".into()),
            post_file: None,
            author: AuthorArgs {
                author: 0,
                author_name: Some("Visitor".into()),
            },
            tags: Some("intro, news".into()),
            hidden: false,
            pinned: true,
            locked: false,
        },
    )
    .await?;
    mock.assert();
    Ok(())
}

#[tokio::test]
async fn posts_list_inside_topic_uses_nested_path() -> Result<(), CliError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path("/api/forums/topics/5/posts")
            .query_param("page", "1");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"page":1,"perPage":25,"totalResults":1,"totalPages":1,"results":[{"id":9,"item_id":5,"content":"first"}]}"#);
    });

    posts::handle(
        &client(&server),
        PostsCmd::List {
            paging: PageArgs {
                page: Some(1),
                ..Default::default()
            },
            topic: Some(5),
            forum: None,
            author: None,
        },
    )
    .await?;
    mock.assert();
    Ok(())
}

#[tokio::test]
async fn posts_reply_creates_post_in_topic() -> Result<(), CliError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/api/forums/posts")
            .query_param("topic", "5")
            .query_param("author", "8")
            .query_param("post", "Thanks!");
        then.status(201)
            .header("content-type", "application/json")
            .body(r#"{"id":91,"item_id":5,"author":{"id":8},"content":"Thanks!"}"#);
    });

    posts::handle(
        &client(&server),
        PostsCmd::Reply {
            topic: 5,
            content: Some("Thanks!".into()),
            content_file: None,
            author: AuthorArgs {
                author: 8,
                author_name: None,
            },
        },
    )
    .await?;
    mock.assert();
    Ok(())
}

#[tokio::test]
async fn records_delete_targets_database_path() -> Result<(), CliError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("DELETE").path("/api/cms/records/3/9");
        then.status(200)
            .header("content-type", "application/json")
            .body("{}");
    });

    records::handle(
        &client(&server),
        RecordsCmd::Delete {
            database: 3,
            id: 9,
        },
    )
    .await?;
    mock.assert();
    Ok(())
}

#[tokio::test]
async fn events_rsvp_puts_response_code() -> Result<(), CliError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("PUT")
            .path("/api/calendar/events/4/rsvps/7")
            .query_param("response", "1");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"response":1}"#);
    });

    events::handle(
        &client(&server),
        EventsCmd::Rsvp {
            id: 4,
            member: 7,
            response: RsvpArg::Going,
        },
    )
    .await?;
    mock.assert();
    Ok(())
}

#[tokio::test]
async fn events_rsvp_cancel_deletes() -> Result<(), CliError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("DELETE").path("/api/calendar/events/4/rsvps/7");
        then.status(200)
            .header("content-type", "application/json")
            .body("{}");
    });

    events::handle(
        &client(&server),
        EventsCmd::Rsvp {
            id: 4,
            member: 7,
            response: RsvpArg::Cancel,
        },
    )
    .await?;
    mock.assert();
    Ok(())
}
