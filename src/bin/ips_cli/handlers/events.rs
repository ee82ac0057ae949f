#![deny(clippy::all, clippy::pedantic)]

use ips_rest::{Client, Event, RefInput, Resource};

use crate::args::{EventsCmd, PageArgs, RsvpArg};
use crate::client::CliError;
use crate::handlers::page_params;
use crate::print::print_json;

pub async fn handle(client: &Client, cmd: EventsCmd) -> Result<(), CliError> {
    match cmd {
        EventsCmd::List { paging, calendar } => list(client, &paging, calendar).await,
        EventsCmd::Get { id } => get(client, id).await,
        EventsCmd::Rsvp {
            id,
            member,
            response,
        } => rsvp(client, id, member, response).await,
        EventsCmd::Delete { id } => delete(client, id).await,
    }
}

async fn list(client: &Client, paging: &PageArgs, calendar: Option<u64>) -> Result<(), CliError> {
    let mut params = page_params(paging);
    params.set_opt("calendar", calendar);
    let page = client.get_events(&params).await?;
    print_json(&page)
}

async fn get(client: &Client, id: u64) -> Result<(), CliError> {
    let mut event = Event::new(client);
    event.load(id).await?;
    print_json(&event)
}

async fn rsvp(client: &Client, id: u64, member: u64, answer: RsvpArg) -> Result<(), CliError> {
    let event = RefInput::<Event>::Id(id).resolve(client);
    let body = match answer.response() {
        Some(response) => event.rsvp(member, response).await?,
        None => event.cancel_rsvp(member).await?,
    };
    print_json(&body)
}

async fn delete(client: &Client, id: u64) -> Result<(), CliError> {
    let event = RefInput::<Event>::Id(id).resolve(client);
    let deleted = event.delete().await?;
    print_json(&deleted)
}
