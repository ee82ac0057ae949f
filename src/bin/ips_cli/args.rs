//! Command-line surface for `ips-cli`.

#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use ips_rest::RsvpResponse;
use ips_rest::config::Overrides;

#[derive(Parser, Debug)]
#[command(name = "ips-cli", version, about = "Invision Community REST API CLI", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub overrides: Overrides,

    /// Path to file containing API key (takes precedence over env)
    #[arg(long, env = "IPS_REST_API_KEY_FILE")]
    pub key_file: Option<PathBuf>,

    /// API key from env; hidden so it stays out of help output
    #[arg(long = "api-key", hide = true, env = "IPS_REST_API_KEY", hide_env_values = true)]
    pub api_key_env: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Community name, URL and software version
    Hello,
    /// Member accounts
    Members(MembersArgs),
    /// Forum topics
    Topics(TopicsArgs),
    /// Forum posts
    Posts(PostsArgs),
    /// Pages database records
    Records(RecordsArgs),
    /// Calendar events
    Events(EventsArgs),
}

/// Paging and ordering shared by every listing.
#[derive(Args, Debug, Clone, Default)]
pub struct PageArgs {
    /// Page number, starting at 1
    #[arg(long)]
    pub page: Option<u64>,
    /// Results per page
    #[arg(long)]
    pub per_page: Option<u64>,
    /// Sort column understood by the endpoint
    #[arg(long)]
    pub sort_by: Option<String>,
    #[arg(long)]
    pub sort_dir: Option<SortDir>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }
}

/// Author of new content; id 0 posts as a guest under `--author-name`.
#[derive(Args, Debug, Clone, Default)]
pub struct AuthorArgs {
    #[arg(long, default_value_t = 0)]
    pub author: u64,
    #[arg(long)]
    pub author_name: Option<String>,
}

#[derive(Parser, Debug)]
pub struct MembersArgs {
    #[command(subcommand)]
    pub action: MembersCmd,
}

#[derive(Subcommand, Debug)]
pub enum MembersCmd {
    /// List members
    List {
        #[command(flatten)]
        paging: PageArgs,
        /// Filter by display name
        #[arg(long)]
        name: Option<String>,
    },
    /// Show one member
    Get { id: u64 },
    /// Delete a member
    Delete { id: u64 },
}

#[derive(Parser, Debug)]
pub struct TopicsArgs {
    #[command(subcommand)]
    pub action: TopicsCmd,
}

#[derive(Subcommand, Debug)]
pub enum TopicsCmd {
    /// List topics
    List {
        #[command(flatten)]
        paging: PageArgs,
        #[arg(long)]
        forum: Option<u64>,
        #[arg(long)]
        author: Option<u64>,
    },
    /// Show one topic
    Get { id: u64 },
    /// Start a topic
    Create {
        #[arg(long)]
        forum: u64,
        #[arg(long)]
        title: String,
        /// First post HTML
        #[arg(long)]
        post: Option<String>,
        /// Read the first post from a file
        #[arg(long)]
        post_file: Option<PathBuf>,
        #[command(flatten)]
        author: AuthorArgs,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        hidden: bool,
        #[arg(long)]
        pinned: bool,
        #[arg(long)]
        locked: bool,
    },
    /// Delete a topic
    Delete { id: u64 },
}

#[derive(Parser, Debug)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub action: PostsCmd,
}

#[derive(Subcommand, Debug)]
pub enum PostsCmd {
    /// List posts, optionally inside one topic
    List {
        #[command(flatten)]
        paging: PageArgs,
        #[arg(long)]
        topic: Option<u64>,
        #[arg(long)]
        forum: Option<u64>,
        #[arg(long)]
        author: Option<u64>,
    },
    /// Show one post
    Get { id: u64 },
    /// Reply to a topic
    Reply {
        #[arg(long)]
        topic: u64,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        content_file: Option<PathBuf>,
        #[command(flatten)]
        author: AuthorArgs,
    },
    /// Delete a post
    Delete { id: u64 },
}

#[derive(Parser, Debug)]
pub struct RecordsArgs {
    #[command(subcommand)]
    pub action: RecordsCmd,
}

#[derive(Subcommand, Debug)]
pub enum RecordsCmd {
    /// List records of a database
    List {
        #[arg(long)]
        database: u64,
        #[command(flatten)]
        paging: PageArgs,
        #[arg(long)]
        category: Option<u64>,
    },
    /// Show one record
    Get {
        #[arg(long)]
        database: u64,
        id: u64,
    },
    /// Delete a record
    Delete {
        #[arg(long)]
        database: u64,
        id: u64,
    },
}

#[derive(Parser, Debug)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub action: EventsCmd,
}

#[derive(Subcommand, Debug)]
pub enum EventsCmd {
    /// List events
    List {
        #[command(flatten)]
        paging: PageArgs,
        #[arg(long)]
        calendar: Option<u64>,
    },
    /// Show one event
    Get { id: u64 },
    /// Answer or withdraw an RSVP for a member
    Rsvp {
        id: u64,
        #[arg(long)]
        member: u64,
        #[arg(long)]
        response: RsvpArg,
    },
    /// Delete an event
    Delete { id: u64 },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RsvpArg {
    Going,
    Maybe,
    NotGoing,
    /// Remove the member's answer
    Cancel,
}

impl RsvpArg {
    pub fn response(self) -> Option<RsvpResponse> {
        match self {
            RsvpArg::Going => Some(RsvpResponse::Going),
            RsvpArg::Maybe => Some(RsvpResponse::Maybe),
            RsvpArg::NotGoing => Some(RsvpResponse::NotGoing),
            RsvpArg::Cancel => None,
        }
    }
}
