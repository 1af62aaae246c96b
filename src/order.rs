//! src/order.rs

/// One order as it appears in an input array.
///
/// Unknown JSON fields are ignored. Text fields may be missing or `null`;
/// `amount` and `createdAt` default to zero when missing but reject `null`.
#[derive(serde::Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: Option<String>,
    pub customer: Option<Customer>,
    pub status: Option<String>,
    pub tags: Option<String>,
    pub payment_method: Option<String>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub created_at: i64,
}

#[derive(serde::Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
}

impl OrderRecord {
    pub fn customer_field(&self, field: impl Fn(&Customer) -> Option<&String>) -> Option<&str> {
        self.customer.as_ref().and_then(field).map(String::as_str)
    }
}
