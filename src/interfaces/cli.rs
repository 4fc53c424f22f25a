use crate::domain::method::PaymentMethod;
use crate::domain::ports::{CardDetails, CardField};
use crate::domain::session::{CheckoutSession, MinorUnits};
use crate::domain::state::{OutcomeStatus, PaymentOutcome};
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

/// Card input handle owned by the presentation layer. The controller reads
/// the collected details at submission time and clears them on success.
#[derive(Default)]
pub struct CliCardField {
    details: Mutex<Option<CardDetails>>,
}

impl CliCardField {
    pub fn collected(details: CardDetails) -> Self {
        Self {
            details: Mutex::new(Some(details)),
        }
    }

    /// A field that has not collected anything, as when the card form is
    /// not mounted yet.
    pub fn unmounted() -> Self {
        Self::default()
    }
}

impl CardField for CliCardField {
    fn details(&self) -> Option<CardDetails> {
        self.details
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn clear(&self) {
        *self.details.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Formats a minor-unit amount for display, e.g. `₹1,23,456.78` for INR.
pub fn format_amount(amount: MinorUnits, currency: &str) -> String {
    let value = amount.value();
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    let major = abs / 100;
    let minor = abs % 100;
    match currency {
        "inr" => format!("{sign}₹{}.{minor:02}", group_indian(major)),
        other => format!("{sign}{major}.{minor:02} {}", other.to_uppercase()),
    }
}

// Indian digit grouping: last three digits, then groups of two.
fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Renders the checkout page's textual surfaces to any writer: the method
/// list, the price summary, and the outcome banner.
pub struct SummaryRenderer<W: Write> {
    writer: W,
    currency: String,
}

impl<W: Write> SummaryRenderer<W> {
    pub fn new(writer: W, currency: &str) -> Self {
        Self {
            writer,
            currency: currency.to_string(),
        }
    }

    pub fn write_methods(&mut self, selected: PaymentMethod) -> io::Result<()> {
        for method in PaymentMethod::ALL {
            let marker = if method == selected { "x" } else { " " };
            let availability = if method.is_enabled() {
                ""
            } else {
                " (unavailable)"
            };
            writeln!(
                self.writer,
                "({marker}) {}{availability} - {}",
                method.label(),
                method.description()
            )?;
        }
        Ok(())
    }

    pub fn write_summary(&mut self, session: &CheckoutSession) -> io::Result<()> {
        let count = session.items().len();
        let noun = if count == 1 { "item" } else { "items" };
        writeln!(self.writer, "Price Summary")?;
        writeln!(
            self.writer,
            "  Price ({count} {noun}): {}",
            format_amount(session.subtotal(), &self.currency)
        )?;
        writeln!(
            self.writer,
            "  Protect Promise Fee: {}",
            format_amount(session.protect_fee(), &self.currency)
        )?;
        if session.discount() > MinorUnits::ZERO {
            writeln!(
                self.writer,
                "  Discount: -{}",
                format_amount(session.discount(), &self.currency)
            )?;
        }
        writeln!(
            self.writer,
            "  Total Amount: {}",
            format_amount(session.total(), &self.currency)
        )
    }

    pub fn write_outcome(&mut self, outcome: &PaymentOutcome) -> io::Result<()> {
        let prefix = match outcome.status {
            OutcomeStatus::Succeeded => "OK",
            OutcomeStatus::Failed => "ERROR",
        };
        writeln!(self.writer, "[{prefix}] {}", outcome.message)
    }

    pub fn write_config_warning(&mut self, warning: &str) -> io::Result<()> {
        writeln!(self.writer, "[WARNING] {warning}")
    }
}
