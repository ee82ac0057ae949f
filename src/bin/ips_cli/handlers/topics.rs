#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use ips_rest::{Client, RefInput, Resource, Topic};

use crate::args::{AuthorArgs, PageArgs, TopicsCmd};
use crate::client::CliError;
use crate::handlers::page_params;
use crate::io::read_value;
use crate::print::print_json;

pub async fn handle(client: &Client, cmd: TopicsCmd) -> Result<(), CliError> {
    match cmd {
        TopicsCmd::List {
            paging,
            forum,
            author,
        } => list(client, &paging, forum, author).await,
        TopicsCmd::Get { id } => get(client, id).await,
        TopicsCmd::Create {
            forum,
            title,
            post,
            post_file,
            author,
            tags,
            hidden,
            pinned,
            locked,
        } => {
            let input = TopicCreateInput {
                forum,
                title,
                post,
                post_file,
                author,
                tags,
                hidden,
                pinned,
                locked,
            };
            create(client, input).await
        }
        TopicsCmd::Delete { id } => delete(client, id).await,
    }
}

struct TopicCreateInput {
    forum: u64,
    title: String,
    post: Option<String>,
    post_file: Option<PathBuf>,
    author: AuthorArgs,
    tags: Option<String>,
    hidden: bool,
    pinned: bool,
    locked: bool,
}

async fn list(
    client: &Client,
    paging: &PageArgs,
    forum: Option<u64>,
    author: Option<u64>,
) -> Result<(), CliError> {
    let mut params = page_params(paging);
    params.set_opt("forum", forum).set_opt("author", author);
    let page = client.get_topics(&params).await?;
    print_json(&page)
}

async fn get(client: &Client, id: u64) -> Result<(), CliError> {
    let mut topic = Topic::new(client);
    topic.load(id).await?;
    print_json(&topic)
}

async fn create(client: &Client, input: TopicCreateInput) -> Result<(), CliError> {
    let post = read_value(input.post, input.post_file, "post")?;

    let mut topic = Topic::new(client);
    topic
        .set_forum(input.forum)
        .set_author(input.author.author)
        .set_title(input.title)
        .set_post(post)
        .set_hidden(input.hidden)
        .set_pinned(input.pinned)
        .set_locked(input.locked);
    if let Some(name) = input.author.author_name {
        topic.set_author_name(name);
    }
    if let Some(tags) = input.tags.as_deref() {
        topic.set_tags(tags);
    }

    topic.save().await?;
    print_json(&topic)
}

async fn delete(client: &Client, id: u64) -> Result<(), CliError> {
    let topic = RefInput::<Topic>::Id(id).resolve(client);
    let deleted = topic.delete().await?;
    print_json(&deleted)
}
