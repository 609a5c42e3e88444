//! Owner-related definitions.

use derive_more::{Display, From, Into};
use juniper::GraphQLScalar;
use service::domain;
use uuid::Uuid;

/// Unique identifier of a `Unit` owner.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::owner::Id)]
#[into(domain::owner::Id)]
#[graphql(name = "OwnerId", transparent)]
pub struct Id(Uuid);
