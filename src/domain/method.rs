/// Payment methods offered on the checkout page.
///
/// Only card payments are wired to the submission flow; the remaining
/// methods are listed for selection but cannot be executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Upi,
    Card,
    Emi,
    NetBanking,
    CashOnDelivery,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Upi,
        PaymentMethod::Card,
        PaymentMethod::Emi,
        PaymentMethod::NetBanking,
        PaymentMethod::CashOnDelivery,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Upi => "upi",
            Self::Card => "card",
            Self::Emi => "emi",
            Self::NetBanking => "netbanking",
            Self::CashOnDelivery => "cod",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Upi => "UPI",
            Self::Card => "Credit / Debit / ATM Card",
            Self::Emi => "EMI",
            Self::NetBanking => "Net Banking",
            Self::CashOnDelivery => "Cash on Delivery",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Upi => "Pay by any UPI app",
            Self::Card => "Add and secure cards as per RBI guidelines",
            Self::Emi => "Get Debit and Cardless EMIs on HDFC Bank",
            Self::NetBanking => "Pay securely using your bank account",
            Self::CashOnDelivery => "Pay when you receive your order",
        }
    }

    /// Whether the submission flow can actually execute this method.
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Card)
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.id() == id)
    }
}
