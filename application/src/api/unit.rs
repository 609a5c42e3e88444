//! `Unit`-related definitions.

use derive_more::{Display, From, Into};
use juniper::{GraphQLScalar, InputValue, ScalarValue, Value};
use service::domain;
use uuid::Uuid;

/// Unique identifier of a `Unit`: an individually rentable part of a
/// property.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::unit::Id)]
#[into(domain::unit::Id)]
#[graphql(name = "UnitId", transparent)]
pub struct Id(Uuid);

/// Display name of a `Unit`.
#[derive(Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "UnitName", with = Self, parse_token(String))]
pub struct Name(domain::unit::Name);

impl Name {
    fn to_output<S: ScalarValue>(&self) -> Value<S> {
        Value::scalar(self.0.to_string())
    }

    fn from_input<S: ScalarValue>(
        input: &InputValue<S>,
    ) -> Result<Self, String> {
        input
            .as_string_value()
            .ok_or_else(|| {
                format!(
                    "Cannot parse `UnitName` input scalar from non-string \
                     value: {input}",
                )
            })?
            .parse()
            .map(Self)
            .map_err(|e| format!("Cannot parse `UnitName` input scalar: {e}"))
    }
}
