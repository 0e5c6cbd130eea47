use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::Amount;

/// Raw receipt payload as submitted by a client.
///
/// Every field defaults when absent so that missing values surface as validation failures
/// rather than as JSON decoding errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReceiptSubmission {
    pub retailer: String,
    pub purchase_date: String,
    pub purchase_time: String,
    pub items: Vec<ItemSubmission>,
    pub total: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemSubmission {
    pub short_description: String,
    pub price: String,
}

/// A receipt that passed validation. Only the validator constructs these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub(crate) retailer: String,
    pub(crate) purchase_date: String,
    pub(crate) purchase_time: String,
    pub(crate) items: Vec<Item>,
    pub(crate) total: Amount,
}

impl Receipt {
    pub fn retailer(&self) -> &str {
        &self.retailer
    }

    pub fn purchase_date(&self) -> &str {
        &self.purchase_date
    }

    pub fn purchase_time(&self) -> &str {
        &self.purchase_time
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn total(&self) -> Amount {
        self.total
    }

    /// Day of month taken from the last two characters of the purchase date.
    pub fn purchase_day(&self) -> u32 {
        let len = self.purchase_date.len();
        self.purchase_date
            .get(len.saturating_sub(2)..)
            .and_then(|day| day.parse().ok())
            .unwrap_or(0)
    }

    /// Hour taken from the first two characters of the purchase time.
    pub fn purchase_hour(&self) -> u32 {
        self.purchase_time
            .get(..2)
            .and_then(|hour| hour.parse().ok())
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub(crate) short_description: String,
    pub(crate) price: Amount,
}

impl Item {
    pub fn short_description(&self) -> &str {
        &self.short_description
    }

    pub fn price(&self) -> Amount {
        self.price
    }

    pub fn trimmed_description_len(&self) -> usize {
        self.short_description.trim().chars().count()
    }
}

/// Validated receipt with its points attached. The points are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredReceipt {
    #[serde(flatten)]
    receipt: Receipt,
    points: u64,
}

impl ScoredReceipt {
    pub fn new(receipt: Receipt, points: u64) -> Self {
        Self { receipt, points }
    }

    pub fn receipt(&self) -> &Receipt {
        &self.receipt
    }

    pub fn points(&self) -> u64 {
        self.points
    }
}

/// Identifier assigned by the store when a scored receipt is saved.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptId(pub String);

const SHORT_ID_ALPHABET: &[u8; 57] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const SHORT_ID_LEN: usize = 22;

impl ReceiptId {
    /// Random v4 uuid rendered as a 22 character base57 string.
    pub fn generate() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    pub(crate) fn from_uuid(uuid: Uuid) -> Self {
        let base = SHORT_ID_ALPHABET.len() as u128;
        let mut value = uuid.as_u128();
        let mut encoded = Vec::with_capacity(SHORT_ID_LEN);
        for _ in 0..SHORT_ID_LEN {
            encoded.push(SHORT_ID_ALPHABET[(value % base) as usize]);
            value /= base;
        }
        encoded.reverse();
        Self(encoded.into_iter().map(char::from).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
