use crate::error::{CheckoutError, Result};
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};

/// An amount in the currency's smallest unit (paise for INR).
///
/// Integer arithmetic keeps order totals exact; no floating point is
/// involved anywhere in the money path.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MinorUnits(i64);

impl MinorUnits {
    pub const ZERO: Self = Self(0);

    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl Add for MinorUnits {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for MinorUnits {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul<u32> for MinorUnits {
    type Output = Self;
    fn mul(self, rhs: u32) -> Self::Output {
        Self(self.0 * i64::from(rhs))
    }
}

impl Sum for MinorUnits {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// One line of the order: a named product with quantity and unit price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub name: String,
    pub quantity: u32,
    pub price: MinorUnits,
}

impl LineItem {
    pub fn new(name: impl Into<String>, quantity: u32, price: MinorUnits) -> Result<Self> {
        if quantity == 0 {
            return Err(CheckoutError::Validation(
                "line item quantity must be positive".to_string(),
            ));
        }
        if price < MinorUnits::ZERO {
            return Err(CheckoutError::Validation(
                "line item price cannot be negative".to_string(),
            ));
        }
        Ok(Self {
            name: name.into(),
            quantity,
            price,
        })
    }

    pub fn line_total(&self) -> MinorUnits {
        self.price * self.quantity
    }
}

/// The order being paid for. Items are fixed for the lifetime of the
/// session; totals are derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    items: Vec<LineItem>,
    protect_fee: MinorUnits,
    discount: MinorUnits,
}

impl CheckoutSession {
    pub fn new(items: Vec<LineItem>, protect_fee: MinorUnits, discount: MinorUnits) -> Result<Self> {
        if protect_fee < MinorUnits::ZERO {
            return Err(CheckoutError::Validation(
                "protect fee cannot be negative".to_string(),
            ));
        }
        if discount < MinorUnits::ZERO {
            return Err(CheckoutError::Validation(
                "discount cannot be negative".to_string(),
            ));
        }
        let session = Self {
            items,
            protect_fee,
            discount,
        };
        if session.total() < MinorUnits::ZERO {
            return Err(CheckoutError::Validation(
                "order total cannot be negative".to_string(),
            ));
        }
        Ok(session)
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn protect_fee(&self) -> MinorUnits {
        self.protect_fee
    }

    pub fn discount(&self) -> MinorUnits {
        self.discount
    }

    pub fn subtotal(&self) -> MinorUnits {
        self.items.iter().map(LineItem::line_total).sum()
    }

    pub fn total(&self) -> MinorUnits {
        self.subtotal() + self.protect_fee - self.discount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: i64, quantity: u32) -> LineItem {
        LineItem::new("Product", quantity, MinorUnits::new(price)).unwrap()
    }

    #[test]
    fn test_subtotal_sums_price_times_quantity() {
        let session = CheckoutSession::new(
            vec![item(15000, 1), item(15499, 2)],
            MinorUnits::ZERO,
            MinorUnits::ZERO,
        )
        .unwrap();
        assert_eq!(session.subtotal(), MinorUnits::new(15000 + 2 * 15499));
    }

    #[test]
    fn test_total_adds_fee_and_subtracts_discount() {
        let session = CheckoutSession::new(
            vec![item(15000, 1), item(15499, 1)],
            MinorUnits::new(129),
            MinorUnits::new(500),
        )
        .unwrap();
        assert_eq!(session.total(), MinorUnits::new(30499 + 129 - 500));
        assert_eq!(
            session.total(),
            session.subtotal() + session.protect_fee() - session.discount()
        );
    }

    #[test]
    fn test_zero_quantity_rejected() {
        assert!(matches!(
            LineItem::new("Product", 0, MinorUnits::new(100)),
            Err(CheckoutError::Validation(_))
        ));
    }

    #[test]
    fn test_negative_price_rejected() {
        assert!(matches!(
            LineItem::new("Product", 1, MinorUnits::new(-1)),
            Err(CheckoutError::Validation(_))
        ));
    }

    #[test]
    fn test_negative_total_rejected() {
        let result = CheckoutSession::new(
            vec![item(100, 1)],
            MinorUnits::ZERO,
            MinorUnits::new(200),
        );
        assert!(matches!(result, Err(CheckoutError::Validation(_))));
    }

    #[test]
    fn test_empty_order_is_valid() {
        let session =
            CheckoutSession::new(Vec::new(), MinorUnits::ZERO, MinorUnits::ZERO).unwrap();
        assert_eq!(session.total(), MinorUnits::ZERO);
    }
}
