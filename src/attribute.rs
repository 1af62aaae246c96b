//! src/attribute.rs
use crate::error::UnknownAttribute;
use crate::order::OrderRecord;
use std::collections::HashSet;
use std::fmt;

const TAG_DELIMITERS: [char; 4] = [',', '#', '|', ';'];

/// The field a run aggregates by.
///
/// Names that do not match a known field are kept in [`AttributeSelector::Unknown`]
/// and only fail once a record is actually extracted.
#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(from = "String")]
pub enum AttributeSelector {
    /// The customer id of the order.
    Id,
    Status,
    Tags,
    PaymentMethod,
    FullName,
    Email,
    Phone,
    City,
    Unknown(String),
}

impl AttributeSelector {
    pub const AVAILABLE: [&'static str; 8] = [
        "id",
        "status",
        "tags",
        "paymentMethod",
        "fullName",
        "email",
        "phone",
        "city",
    ];

    pub fn parse(name: &str) -> Self {
        match name {
            "id" => Self::Id,
            "status" => Self::Status,
            "tags" => Self::Tags,
            "paymentMethod" => Self::PaymentMethod,
            "fullName" => Self::FullName,
            "email" => Self::Email,
            "phone" => Self::Phone,
            "city" => Self::City,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Id => "id",
            Self::Status => "status",
            Self::Tags => "tags",
            Self::PaymentMethod => "paymentMethod",
            Self::FullName => "fullName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::City => "city",
            Self::Unknown(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Returns the distinct values `record` contributes for this attribute.
    ///
    /// Absent fields contribute nothing. `tags` is split on `,` `#` `|` `;`,
    /// every other attribute contributes its value as is.
    pub fn extract(&self, record: &OrderRecord) -> Result<HashSet<String>, UnknownAttribute> {
        let value = match self {
            Self::Id => record.customer_field(|c| c.id.as_ref()),
            Self::Status => record.status.as_deref(),
            Self::Tags => return Ok(record.tags.as_deref().map(split_tags).unwrap_or_default()),
            Self::PaymentMethod => record.payment_method.as_deref(),
            Self::FullName => record.customer_field(|c| c.full_name.as_ref()),
            Self::Email => record.customer_field(|c| c.email.as_ref()),
            Self::Phone => record.customer_field(|c| c.phone.as_ref()),
            Self::City => record.customer_field(|c| c.city.as_ref()),
            Self::Unknown(name) => return Err(UnknownAttribute(name.clone())),
        };
        Ok(value.map(str::to_string).into_iter().collect())
    }
}

fn split_tags(tags: &str) -> HashSet<String> {
    tags.split(TAG_DELIMITERS)
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

impl From<String> for AttributeSelector {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<&str> for AttributeSelector {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl fmt::Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
