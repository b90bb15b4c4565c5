use crate::{
    domain::record::{FieldValue, FormRecord, Record, RecordId},
    error::{ConsoleError, Result},
    form::{FieldDescriptor, FormValues, SelectOption},
};
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const ASSET_CATEGORIES: [&str; 5] = ["IT Equipment", "Furniture", "Vehicles", "Machinery", "Office Supplies"];
pub const ASSET_STATUSES: [&str; 4] = ["In Use", "In Storage", "Under Repair", "Disposed"];

/// A tracked fixed asset or stock item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: RecordId,
    pub tag: String,
    pub name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub purchased_on: NaiveDate,
    pub purchase_cost: f64,
    /// Straight-line depreciation period; zero means the asset is not depreciated
    #[serde(default)]
    pub useful_life_years: u32,
    #[serde(default)]
    pub quantity: u32,
    pub status: String,
}

impl Asset {
    pub fn new(
        tag: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        purchase_cost: f64,
    ) -> Self {
        Self {
            id: RecordId::new(),
            tag: tag.into(),
            name: name.into(),
            category: category.into(),
            location: None,
            assigned_to: None,
            purchased_on: Utc::now().date_naive(),
            purchase_cost,
            useful_life_years: 0,
            quantity: 1,
            status: ASSET_STATUSES[0].to_string(),
        }
    }

    /// Value after straight-line depreciation in whole months up to `on`
    pub fn book_value(&self, on: NaiveDate) -> f64 {
        if self.status == "Disposed" {
            return 0.0;
        }
        if self.useful_life_years == 0 {
            return self.purchase_cost;
        }
        let months = months_between(self.purchased_on, on);
        let life_months = f64::from(self.useful_life_years) * 12.0;
        let remaining = (1.0 - f64::from(months) / life_months).max(0.0);
        (self.purchase_cost * remaining * 100.0).round() / 100.0
    }

    /// Stock items at or below this count need reordering
    pub fn is_low_stock(&self, threshold: u32) -> bool {
        self.status != "Disposed" && self.quantity <= threshold
    }
}

fn months_between(from: NaiveDate, to: NaiveDate) -> u32 {
    if to <= from {
        return 0;
    }
    let mut months = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    if to.day() < from.day() {
        months -= 1;
    }
    months.max(0) as u32
}

impl Record for Asset {
    const COLLECTION: &'static str = "assets";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "tag" => FieldValue::text(&self.tag),
            "name" => FieldValue::text(&self.name),
            "category" => FieldValue::text(&self.category),
            "location" => self.location.clone().into(),
            "assigned_to" => self.assigned_to.clone().into(),
            "purchased_on" => FieldValue::Date(self.purchased_on),
            "purchase_cost" => FieldValue::Number(self.purchase_cost),
            "useful_life_years" => FieldValue::Number(f64::from(self.useful_life_years)),
            "quantity" => FieldValue::Number(f64::from(self.quantity)),
            "status" => FieldValue::text(&self.status),
            _ => FieldValue::Empty,
        }
    }
}

fn whole_number(values: &FormValues, name: &str) -> Result<Option<u32>> {
    match values.number(name)? {
        None => Ok(None),
        Some(n) if n >= 0.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX) => Ok(Some(n as u32)),
        Some(_) => Err(ConsoleError::InvalidFieldValue {
            field: name.to_string(),
            reason: "expected a whole number".to_string(),
        }),
    }
}

impl FormRecord for Asset {
    fn form_fields() -> Vec<FieldDescriptor> {
        let select = |name: &str, label: &str, values: &[&str]| {
            FieldDescriptor::select(name, label, values.iter().map(|v| SelectOption::same(*v)))
        };
        vec![
            FieldDescriptor::text("tag", "Asset Tag").required().with_placeholder("AST-0001"),
            FieldDescriptor::text("name", "Asset Name").required(),
            select("category", "Category", &ASSET_CATEGORIES).required(),
            FieldDescriptor::text("location", "Location"),
            FieldDescriptor::text("assigned_to", "Assigned To"),
            FieldDescriptor::date("purchased_on", "Purchase Date").required(),
            FieldDescriptor::number("purchase_cost", "Purchase Cost").required(),
            FieldDescriptor::number("useful_life_years", "Useful Life (years)"),
            FieldDescriptor::number("quantity", "Quantity").with_default(1.0),
            select("status", "Status", &ASSET_STATUSES).with_default(ASSET_STATUSES[0]),
        ]
    }

    fn to_form(&self) -> FormValues {
        FormValues::new()
            .with("tag", self.tag.as_str())
            .with("name", self.name.as_str())
            .with("category", self.category.as_str())
            .with("location", self.location.clone().unwrap_or_default())
            .with("assigned_to", self.assigned_to.clone().unwrap_or_default())
            .with("purchased_on", self.purchased_on)
            .with("purchase_cost", self.purchase_cost)
            .with("useful_life_years", f64::from(self.useful_life_years))
            .with("quantity", f64::from(self.quantity))
            .with("status", self.status.as_str())
    }

    fn from_form(id: RecordId, values: &FormValues) -> Result<Self> {
        Ok(Self {
            id,
            tag: values.require_text("tag")?,
            name: values.require_text("name")?,
            category: values.require_text("category")?,
            location: values.text("location"),
            assigned_to: values.text("assigned_to"),
            purchased_on: values
                .date("purchased_on")?
                .unwrap_or_else(|| Utc::now().date_naive()),
            purchase_cost: values.number("purchase_cost")?.unwrap_or(0.0),
            useful_life_years: whole_number(values, "useful_life_years")?.unwrap_or(0),
            quantity: whole_number(values, "quantity")?.unwrap_or(1),
            status: values
                .text("status")
                .unwrap_or_else(|| ASSET_STATUSES[0].to_string()),
        })
    }
}
