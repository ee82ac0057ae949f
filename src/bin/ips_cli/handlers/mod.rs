#![deny(clippy::all, clippy::pedantic)]

pub mod events;
pub mod members;
pub mod posts;
pub mod records;
pub mod topics;

use ips_rest::{Client, Params};

use crate::args::{PageArgs, SortDir};
use crate::client::CliError;
use crate::print::print_json;

pub async fn hello(client: &Client) -> Result<(), CliError> {
    let hello = client.hello().await?;
    print_json(&hello)
}

/// Query parameters for a listing, in the API's camelCase spelling.
pub fn page_params(paging: &PageArgs) -> Params {
    let mut params = Params::new();
    params
        .set_opt("page", paging.page)
        .set_opt("perPage", paging.per_page)
        .set_opt("sortBy", paging.sort_by.clone())
        .set_opt("sortDir", paging.sort_dir.map(SortDir::as_str));
    params
}
