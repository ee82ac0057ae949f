#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use ips_rest::{Client, Post, RefInput, Resource, Topic};

use crate::args::{AuthorArgs, PageArgs, PostsCmd};
use crate::client::CliError;
use crate::handlers::page_params;
use crate::io::read_value;
use crate::print::print_json;

pub async fn handle(client: &Client, cmd: PostsCmd) -> Result<(), CliError> {
    match cmd {
        PostsCmd::List {
            paging,
            topic,
            forum,
            author,
        } => list(client, &paging, topic, forum, author).await,
        PostsCmd::Get { id } => get(client, id).await,
        PostsCmd::Reply {
            topic,
            content,
            content_file,
            author,
        } => reply(client, topic, content, content_file, author).await,
        PostsCmd::Delete { id } => delete(client, id).await,
    }
}

async fn list(
    client: &Client,
    paging: &PageArgs,
    topic: Option<u64>,
    forum: Option<u64>,
    author: Option<u64>,
) -> Result<(), CliError> {
    let mut params = page_params(paging);
    params.set_opt("forum", forum).set_opt("author", author);
    let page = match topic {
        Some(id) => {
            RefInput::<Topic>::Id(id)
                .resolve(client)
                .get_posts(&params)
                .await?
        }
        None => client.get_posts(&params).await?,
    };
    print_json(&page)
}

async fn get(client: &Client, id: u64) -> Result<(), CliError> {
    let mut post = Post::new(client);
    post.load(id).await?;
    print_json(&post)
}

async fn reply(
    client: &Client,
    topic: u64,
    content: Option<String>,
    content_file: Option<PathBuf>,
    author: AuthorArgs,
) -> Result<(), CliError> {
    let content = read_value(content, content_file, "content")?;
    let topic = RefInput::<Topic>::Id(topic).resolve(client);

    let post = match author.author_name {
        Some(name) => {
            let mut post = Post::new(client);
            post.set_topic(topic)
                .set_author(author.author)
                .set_author_name(name)
                .set_post(content);
            post.save().await?;
            post
        }
        None => topic.reply(content, author.author).await?,
    };
    print_json(&post)
}

async fn delete(client: &Client, id: u64) -> Result<(), CliError> {
    let post = RefInput::<Post>::Id(id).resolve(client);
    let deleted = post.delete().await?;
    print_json(&deleted)
}
