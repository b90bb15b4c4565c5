use crate::{
    domain::record::{FieldValue, FormRecord, Record, RecordId},
    error::{ConsoleError, Result},
    form::{FieldDescriptor, FormValues, SelectOption},
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const LEAD_SOURCES: [&str; 5] = ["Website", "Referral", "Cold Call", "Event", "Social Media"];
pub const LEAD_STATUSES: [&str; 5] = ["New", "Contacted", "Qualified", "Converted", "Lost"];
pub const CUSTOMER_SEGMENTS: [&str; 3] = ["Enterprise", "SMB", "Individual"];
pub const QUOTE_STATUSES: [&str; 4] = ["Draft", "Sent", "Accepted", "Declined"];

/// Default VAT applied to quotes, in percent
pub const DEFAULT_TAX_RATE: f64 = 15.0;

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn options(values: &[&str]) -> Vec<SelectOption> {
    values.iter().map(|v| SelectOption::same(*v)).collect()
}

/// A prospective customer in the sales pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: RecordId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub source: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_value: Option<f64>,
    pub created_on: NaiveDate,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Lead {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            name: name.into(),
            company: None,
            email: email.into(),
            phone: None,
            source: LEAD_SOURCES[0].to_string(),
            status: LEAD_STATUSES[0].to_string(),
            estimated_value: None,
            created_on: today(),
            tags: Vec::new(),
        }
    }

    /// Whether the lead is still being worked
    pub fn is_open(&self) -> bool {
        !matches!(self.status.as_str(), "Converted" | "Lost")
    }
}

impl Record for Lead {
    const COLLECTION: &'static str = "leads";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "name" => FieldValue::text(&self.name),
            "company" => self.company.clone().into(),
            "email" => FieldValue::text(&self.email),
            "phone" => self.phone.clone().into(),
            "source" => FieldValue::text(&self.source),
            "status" => FieldValue::text(&self.status),
            "estimated_value" => self.estimated_value.into(),
            "created_on" => FieldValue::Date(self.created_on),
            "tags" => FieldValue::List(self.tags.clone()),
            _ => FieldValue::Empty,
        }
    }
}

impl FormRecord for Lead {
    fn form_fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::text("name", "Full Name").required().with_icon("user"),
            FieldDescriptor::text("company", "Company").with_icon("building"),
            FieldDescriptor::email("email", "Email")
                .required()
                .with_icon("mail")
                .with_placeholder("name@company.com"),
            FieldDescriptor::text("phone", "Phone").with_icon("phone"),
            FieldDescriptor::select("source", "Lead Source", options(&LEAD_SOURCES)).required(),
            FieldDescriptor::select("status", "Status", options(&LEAD_STATUSES))
                .required()
                .with_default(LEAD_STATUSES[0]),
            FieldDescriptor::number("estimated_value", "Estimated Value"),
            FieldDescriptor::custom("tags", "Tags", "TagInput"),
        ]
    }

    fn to_form(&self) -> FormValues {
        let mut values = FormValues::new()
            .with("name", self.name.as_str())
            .with("company", self.company.clone().unwrap_or_default())
            .with("email", self.email.as_str())
            .with("phone", self.phone.clone().unwrap_or_default())
            .with("source", self.source.as_str())
            .with("status", self.status.as_str())
            .with("created_on", self.created_on)
            .with("tags", self.tags.clone());
        if let Some(value) = self.estimated_value {
            values.insert("estimated_value", value);
        }
        values
    }

    fn from_form(id: RecordId, values: &FormValues) -> Result<Self> {
        Ok(Self {
            id,
            name: values.require_text("name")?,
            company: values.text("company"),
            email: values.require_text("email")?,
            phone: values.text("phone"),
            source: values.require_text("source")?,
            status: values
                .text("status")
                .unwrap_or_else(|| LEAD_STATUSES[0].to_string()),
            estimated_value: values.number("estimated_value")?,
            created_on: values.date("created_on")?.unwrap_or_else(today),
            tags: values.list("tags"),
        })
    }
}

/// An account the business sells to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub segment: String,
    pub customer_since: NaiveDate,
    #[serde(default)]
    pub lifetime_value: f64,
}

impl Customer {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            name: name.into(),
            email: email.into(),
            phone: None,
            address: None,
            segment: CUSTOMER_SEGMENTS[1].to_string(),
            customer_since: today(),
            lifetime_value: 0.0,
        }
    }

    /// Creates the customer a won lead turns into
    pub fn from_lead(lead: &Lead) -> Self {
        let mut customer = Self::new(
            lead.company.clone().unwrap_or_else(|| lead.name.clone()),
            lead.email.clone(),
        );
        customer.phone = lead.phone.clone();
        customer
    }
}

impl Record for Customer {
    const COLLECTION: &'static str = "customers";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "name" => FieldValue::text(&self.name),
            "email" => FieldValue::text(&self.email),
            "phone" => self.phone.clone().into(),
            "address" => self.address.clone().into(),
            "segment" => FieldValue::text(&self.segment),
            "customer_since" => FieldValue::Date(self.customer_since),
            "lifetime_value" => FieldValue::Number(self.lifetime_value),
            _ => FieldValue::Empty,
        }
    }
}

impl FormRecord for Customer {
    fn form_fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::text("name", "Customer Name").required(),
            FieldDescriptor::email("email", "Email").required(),
            FieldDescriptor::text("phone", "Phone"),
            FieldDescriptor::textarea("address", "Address"),
            FieldDescriptor::select("segment", "Segment", options(&CUSTOMER_SEGMENTS)).required(),
            FieldDescriptor::date("customer_since", "Customer Since"),
        ]
    }

    fn to_form(&self) -> FormValues {
        FormValues::new()
            .with("name", self.name.as_str())
            .with("email", self.email.as_str())
            .with("phone", self.phone.clone().unwrap_or_default())
            .with("address", self.address.clone().unwrap_or_default())
            .with("segment", self.segment.as_str())
            .with("customer_since", self.customer_since)
            .with("lifetime_value", self.lifetime_value)
    }

    fn from_form(id: RecordId, values: &FormValues) -> Result<Self> {
        Ok(Self {
            id,
            name: values.require_text("name")?,
            email: values.require_text("email")?,
            phone: values.text("phone"),
            address: values.text("address"),
            segment: values.require_text("segment")?,
            customer_since: values.date("customer_since")?.unwrap_or_else(today),
            lifetime_value: values.number("lifetime_value")?.unwrap_or(0.0),
        })
    }
}

/// A priced offer sent to a customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: RecordId,
    pub customer: String,
    pub subject: String,
    pub subtotal: f64,
    pub tax_rate: f64,
    pub issued_on: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<NaiveDate>,
    pub status: String,
}

impl Quote {
    pub fn new(customer: impl Into<String>, subject: impl Into<String>, subtotal: f64) -> Self {
        Self {
            id: RecordId::new(),
            customer: customer.into(),
            subject: subject.into(),
            subtotal,
            tax_rate: DEFAULT_TAX_RATE,
            issued_on: today(),
            valid_until: None,
            status: QUOTE_STATUSES[0].to_string(),
        }
    }

    pub fn tax(&self) -> f64 {
        round_cents(self.subtotal * self.tax_rate / 100.0)
    }

    pub fn total(&self) -> f64 {
        round_cents(self.subtotal + self.tax())
    }

    /// Sets the validity end, which may not precede the issue date
    pub fn set_valid_until(&mut self, date: NaiveDate) -> Result<()> {
        if date < self.issued_on {
            return Err(ConsoleError::InvalidDateRange {
                start: self.issued_on.to_string(),
                end: date.to_string(),
            });
        }
        self.valid_until = Some(date);
        Ok(())
    }

    pub fn is_expired(&self, on: NaiveDate) -> bool {
        self.valid_until.map(|until| on > until).unwrap_or(false)
    }
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

impl Record for Quote {
    const COLLECTION: &'static str = "quotes";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "customer" => FieldValue::text(&self.customer),
            "subject" => FieldValue::text(&self.subject),
            "subtotal" => FieldValue::Number(self.subtotal),
            "tax_rate" => FieldValue::Number(self.tax_rate),
            "tax" => FieldValue::Number(self.tax()),
            "total" => FieldValue::Number(self.total()),
            "issued_on" => FieldValue::Date(self.issued_on),
            "valid_until" => self.valid_until.into(),
            "status" => FieldValue::text(&self.status),
            _ => FieldValue::Empty,
        }
    }
}

impl FormRecord for Quote {
    fn form_fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::text("customer", "Customer Name").required(),
            FieldDescriptor::text("subject", "Subject").required(),
            FieldDescriptor::number("subtotal", "Amount").required(),
            // Shown for reference; the rate is fixed by the business
            FieldDescriptor::text("tax", "Tax (%)")
                .disabled()
                .with_default(DEFAULT_TAX_RATE.to_string()),
            FieldDescriptor::date("issued_on", "Issue Date"),
            FieldDescriptor::date("valid_until", "Valid Until"),
            FieldDescriptor::select("status", "Status", options(&QUOTE_STATUSES))
                .with_default(QUOTE_STATUSES[0]),
        ]
    }

    fn to_form(&self) -> FormValues {
        let mut values = FormValues::new()
            .with("customer", self.customer.as_str())
            .with("subject", self.subject.as_str())
            .with("subtotal", self.subtotal)
            .with("tax", self.tax_rate.to_string())
            .with("issued_on", self.issued_on)
            .with("status", self.status.as_str());
        if let Some(until) = self.valid_until {
            values.insert("valid_until", until);
        }
        values
    }

    fn from_form(id: RecordId, values: &FormValues) -> Result<Self> {
        let mut quote = Self {
            id,
            customer: values.require_text("customer")?,
            subject: values.require_text("subject")?,
            subtotal: values.number("subtotal")?.unwrap_or(0.0),
            tax_rate: values.number("tax")?.unwrap_or(DEFAULT_TAX_RATE),
            issued_on: values.date("issued_on")?.unwrap_or_else(today),
            valid_until: None,
            status: values
                .text("status")
                .unwrap_or_else(|| QUOTE_STATUSES[0].to_string()),
        };
        if let Some(until) = values.date("valid_until")? {
            quote
                .set_valid_until(until)
                .map_err(|_| ConsoleError::InvalidFieldValue {
                    field: "valid_until".to_string(),
                    reason: "must not be before the issue date".to_string(),
                })?;
        }
        Ok(quote)
    }
}
