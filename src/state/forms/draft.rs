//! Payment draft and the record derived from it

use super::error::FormError;
use super::field::FormField;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Card numbers are capped at this many digits of input
pub const CARD_NUMBER_MAX_LEN: usize = 16;
/// Minimum card number length accepted on submit
pub const CARD_NUMBER_MIN_LEN: usize = 12;
pub const CVV_MAX_LEN: usize = 4;
pub const CVV_MIN_LEN: usize = 3;

/// The four inputs of the payment form, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentField {
    Name,
    CardNumber,
    Expiry,
    Cvv,
}

impl PaymentField {
    pub const ALL: [PaymentField; 4] = [
        PaymentField::Name,
        PaymentField::CardNumber,
        PaymentField::Expiry,
        PaymentField::Cvv,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// In-memory field values, not yet persisted
#[derive(Debug, Clone)]
pub struct PaymentDraft {
    pub name: FormField,
    pub card_number: FormField,
    pub expiry: FormField,
    pub cvv: FormField,
}

impl PaymentDraft {
    pub fn new() -> Self {
        Self {
            name: FormField::text("Cardholder Name"),
            card_number: FormField::digits("Card Number", CARD_NUMBER_MAX_LEN),
            expiry: FormField::text("Expiry (MM/YY)").with_placeholder("MM/YY"),
            cvv: FormField::digits("CVV", CVV_MAX_LEN).masked(),
        }
    }

    pub fn field(&self, field: PaymentField) -> &FormField {
        match field {
            PaymentField::Name => &self.name,
            PaymentField::CardNumber => &self.card_number,
            PaymentField::Expiry => &self.expiry,
            PaymentField::Cvv => &self.cvv,
        }
    }

    pub fn field_mut(&mut self, field: PaymentField) -> &mut FormField {
        match field {
            PaymentField::Name => &mut self.name,
            PaymentField::CardNumber => &mut self.card_number,
            PaymentField::Expiry => &mut self.expiry,
            PaymentField::Cvv => &mut self.cvv,
        }
    }

    fn has_empty_field(&self) -> bool {
        PaymentField::ALL.iter().any(|f| self.field(*f).is_empty())
    }

    fn has_short_card_details(&self) -> bool {
        self.card_number.len() < CARD_NUMBER_MIN_LEN || self.cvv.len() < CVV_MIN_LEN
    }

    /// Last four characters of the card number
    pub fn card_last4(&self) -> String {
        let digits = self.card_number.as_text();
        let skip = digits.chars().count().saturating_sub(4);
        digits.chars().skip(skip).collect()
    }
}

impl Default for PaymentDraft {
    fn default() -> Self {
        Self::new()
    }
}

/// The row written to the `payment_details` table. The full card number and
/// the CVV have no place here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub user_id: Uuid,
    pub name: String,
    pub card_last4: String,
    pub expiry: String,
}

/// Run the submit checks in order, stopping at the first failure.
pub fn validate(user: Option<Uuid>, draft: &PaymentDraft) -> Result<PaymentRecord, FormError> {
    let user_id = user.ok_or(FormError::Unauthenticated)?;
    if draft.has_empty_field() {
        return Err(FormError::MissingFields);
    }
    if draft.has_short_card_details() {
        return Err(FormError::InvalidCardDetails);
    }

    Ok(PaymentRecord {
        user_id,
        name: draft.name.as_text().to_string(),
        card_last4: draft.card_last4(),
        expiry: draft.expiry.as_text().to_string(),
    })
}
