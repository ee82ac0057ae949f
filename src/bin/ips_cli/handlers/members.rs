#![deny(clippy::all, clippy::pedantic)]

use ips_rest::{Client, Member, RefInput, Resource};

use crate::args::{MembersCmd, PageArgs};
use crate::client::CliError;
use crate::handlers::page_params;
use crate::print::print_json;

pub async fn handle(client: &Client, cmd: MembersCmd) -> Result<(), CliError> {
    match cmd {
        MembersCmd::List { paging, name } => list(client, &paging, name).await,
        MembersCmd::Get { id } => get(client, id).await,
        MembersCmd::Delete { id } => delete(client, id).await,
    }
}

async fn list(client: &Client, paging: &PageArgs, name: Option<String>) -> Result<(), CliError> {
    let mut params = page_params(paging);
    params.set_opt("name", name);
    let page = client.get_members(&params).await?;
    print_json(&page)
}

async fn get(client: &Client, id: u64) -> Result<(), CliError> {
    let mut member = Member::new(client);
    member.load(id).await?;
    print_json(&member)
}

async fn delete(client: &Client, id: u64) -> Result<(), CliError> {
    let member = RefInput::<Member>::Id(id).resolve(client);
    let deleted = member.delete().await?;
    print_json(&deleted)
}
