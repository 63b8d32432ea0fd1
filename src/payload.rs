use crate::models::Resident;
use crate::reference::{CURRENCY, DESCRIPTION_PREFIX, MERCHANT_ID, PAYMENT_VALIDITY_HOURS};

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

/// One payment attempt, prior to QR encoding. Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentPayload {
    pub merchant_id: String,
    pub transaction_id: String,
    pub amount: u64,
    pub currency: String,
    pub description: String,
    pub customer_name: String,
    pub customer_address: String,
    #[serde(serialize_with = "serialize_millis")]
    pub timestamp: DateTime<Utc>,
    #[serde(serialize_with = "serialize_millis")]
    pub expiry: DateTime<Utc>,
}

impl PaymentPayload {
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub fn build_payload(
    resident: &Resident,
    transaction_id: &str,
    now: DateTime<Utc>,
) -> PaymentPayload {
    PaymentPayload {
        merchant_id: MERCHANT_ID.to_string(),
        transaction_id: transaction_id.to_string(),
        amount: resident.amount,
        currency: CURRENCY.to_string(),
        description: format!("{DESCRIPTION_PREFIX} - {}", resident.name),
        customer_name: resident.name.clone(),
        customer_address: resident.address.clone(),
        timestamp: now,
        expiry: now + Duration::hours(PAYMENT_VALIDITY_HOURS),
    }
}

fn serialize_millis<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}
