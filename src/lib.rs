//! Async client for the Invision Community REST API.
//!
//! A [`Client`] carries the community URL and API key. Entities hold a clone
//! of it and talk to the server through [`Resource`] (`load`, `save`,
//! `delete`) and the collection queries on [`Client`], [`Database`],
//! [`Member`], [`Forum`], [`Calendar`], [`Topic`], [`Record`] and [`Event`].

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;

pub use application::lifecycle::{Resource, Saved};
pub use domain::calendar::{Calendar, Event};
pub use domain::cms::{Category, Database, Record};
pub use domain::coerce::{RefInput, Tags};
pub use domain::content::{Comment, ContentArea, Review};
pub use domain::error::ClientError;
pub use domain::forums::{Forum, Post, Topic};
pub use domain::groups::{Field, FieldGroup, Group};
pub use domain::hydrate::Extensions;
pub use domain::members::Member;
pub use infra::http::{Client, ClientOptions};
pub use infra::params::Params;
pub use ips_rest_types::{Deleted, Hello, ResultsPage, RsvpResponse};
