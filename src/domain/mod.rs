//! Entity schemas, hydration and reference coercion.

pub mod calendar;
pub mod cms;
pub mod coerce;
pub mod content;
pub mod error;
pub mod forums;
pub mod groups;
pub mod hydrate;
pub mod members;
