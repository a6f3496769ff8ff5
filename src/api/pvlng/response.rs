use std::{fmt::Formatter, marker::PhantomData};

use serde::{
    Deserialize,
    Deserializer,
    de::{Error as _, SeqAccess, Visitor},
};

use crate::core::attribute::Attribute;

/// Data response: the channel attribute row followed by the data rows.
#[must_use]
#[derive(Clone, Debug)]
pub struct Response<R> {
    pub attribute: Attribute,
    pub rows: Vec<R>,
}

impl<'de, R: Deserialize<'de>> Deserialize<'de> for Response<R> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(ResponseVisitor(PhantomData))
    }
}

struct ResponseVisitor<R>(PhantomData<R>);

impl<'de, R: Deserialize<'de>> Visitor<'de> for ResponseVisitor<R> {
    type Value = Response<R>;

    fn expecting(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("an array with the leading attribute row")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let attribute = seq
            .next_element::<Attribute>()?
            .ok_or_else(|| A::Error::custom("the attribute row is missing"))?;
        let mut rows = Vec::with_capacity(seq.size_hint().unwrap_or_default());
        while let Some(row) = seq.next_element()? {
            rows.push(row);
        }
        Ok(Response { attribute, rows })
    }
}

impl<R> Response<R> {
    /// The latest row, [`None`] when there is no data (yet) for today.
    #[must_use]
    pub fn into_last(self) -> (Attribute, Option<R>) {
        let mut rows = self.rows;
        (self.attribute, rows.pop())
    }
}
