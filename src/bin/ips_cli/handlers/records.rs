#![deny(clippy::all, clippy::pedantic)]

use ips_rest::{Client, Database, RefInput, Record, Resource};

use crate::args::{PageArgs, RecordsCmd};
use crate::client::CliError;
use crate::handlers::page_params;
use crate::print::print_json;

pub async fn handle(client: &Client, cmd: RecordsCmd) -> Result<(), CliError> {
    match cmd {
        RecordsCmd::List {
            database,
            paging,
            category,
        } => list(&client.database(database), &paging, category).await,
        RecordsCmd::Get { database, id } => get(&client.database(database), id).await,
        RecordsCmd::Delete { database, id } => delete(&client.database(database), id).await,
    }
}

async fn list(
    database: &Database,
    paging: &PageArgs,
    category: Option<u64>,
) -> Result<(), CliError> {
    let mut params = page_params(paging);
    params.set_opt("category", category);
    let page = database.get_records(&params).await?;
    print_json(&page)
}

async fn get(database: &Database, id: u64) -> Result<(), CliError> {
    let mut record = database.record();
    record.load(id).await?;
    print_json(&record)
}

async fn delete(database: &Database, id: u64) -> Result<(), CliError> {
    let record = RefInput::<Record>::Id(id).resolve(database);
    let deleted = record.delete().await?;
    print_json(&deleted)
}
