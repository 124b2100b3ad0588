use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::battery::{BatteryCategory, ConditionGrade};

/// A battery saved by a seller, with the estimate computed at submission time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Battery {
    pub id: u64,
    pub battery_type: BatteryCategory,
    pub manufacturer: String,
    pub model_number: String,
    pub battery_age: f64,
    pub capacity: f64,
    pub condition: ConditionGrade,
    pub estimated_price: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBattery {
    pub battery_type: BatteryCategory,
    pub manufacturer: String,
    pub model_number: String,
    pub battery_age: f64,
    pub capacity: f64,
    pub condition: ConditionGrade,
    pub estimated_price: Option<f64>,
}

/// Marketplace listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceItem {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub description: String,
    pub condition: String,
    pub specifications: String,
    pub price: f64,
    pub stock: u32,
    #[serde(rename = "capacityKWh")]
    pub capacity_kwh: Option<f64>,
    pub capacity_percentage: Option<f64>,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMarketplaceItem {
    pub name: String,
    pub category: String,
    pub description: String,
    pub condition: String,
    pub specifications: String,
    pub price: f64,
    pub stock: u32,
    #[serde(default, rename = "capacityKWh")]
    pub capacity_kwh: Option<f64>,
    #[serde(default)]
    pub capacity_percentage: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Administrative level a subsidy is granted at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubsidyRegion {
    Federal,
    State,
    Local,
}

/// Incentive category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubsidyKind {
    Tax,
    Grant,
    Rebate,
    Loan,
}

impl SubsidyKind {
    /// Parse the labels used by the finder form ("Tax credits", "Rebates",
    /// "Low-interest loans") as well as the bare kind names
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();
        if label.starts_with("tax") {
            Some(Self::Tax)
        } else if label.starts_with("grant") {
            Some(Self::Grant)
        } else if label.starts_with("rebate") {
            Some(Self::Rebate)
        } else if label.contains("loan") {
            Some(Self::Loan)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subsidy {
    pub id: u64,
    pub title: String,
    pub region: SubsidyRegion,
    /// Jurisdiction for state and local programs
    pub state: Option<String>,
    #[serde(rename = "type")]
    pub kind: SubsidyKind,
    pub benefit_amount: String,
    pub eligibility: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubsidy {
    pub title: String,
    pub region: SubsidyRegion,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(rename = "type")]
    pub kind: SubsidyKind,
    pub benefit_amount: String,
    pub eligibility: String,
    pub description: String,
    #[serde(default = "default_active")]
    pub status: String,
}

/// Community idea
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub author: String,
    pub organization: Option<String>,
    pub tags: Vec<String>,
    pub likes: u64,
    pub comments: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIdea {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryOption {
    Pickup,
    Dropoff,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupRequest {
    pub id: u64,
    pub battery_id: u64,
    pub address: String,
    pub preferred_date: DateTime<Utc>,
    pub delivery_option: DeliveryOption,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPickupRequest {
    pub battery_id: u64,
    pub address: String,
    pub preferred_date: DateTime<Utc>,
    pub delivery_option: DeliveryOption,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryType {
    Sell,
    Buy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessInquiry {
    pub id: u64,
    pub company_name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub battery_details: String,
    pub inquiry_type: InquiryType,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBusinessInquiry {
    pub company_name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub battery_details: String,
    pub inquiry_type: InquiryType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub id: u64,
    pub organization_name: String,
    pub organization_type: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contribution_type: String,
    pub details: String,
    pub idea: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContribution {
    pub organization_name: String,
    pub organization_type: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contribution_type: String,
    pub details: String,
    #[serde(default)]
    pub idea: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterSubscriber {
    pub id: u64,
    pub email: String,
    pub topic: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewNewsletterSubscriber {
    pub email: String,
    #[serde(default = "default_topic")]
    pub topic: String,
}

/// Headline market statistic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
    pub id: u64,
    pub data_type: String,
    pub value: f64,
    pub unit: String,
    pub change: Option<f64>,
    pub year: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMarketData {
    pub data_type: String,
    pub value: f64,
    pub unit: String,
    #[serde(default)]
    pub change: Option<f64>,
    pub year: i32,
}

/// Chart series keyed by chart type; `data` is passed to the client untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub id: u64,
    pub chart_type: String,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChartData {
    pub chart_type: String,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsCategory {
    Growth,
    Environment,
    Materials,
}

/// Dashboard card: one headline number plus its chart series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEntry {
    pub id: u64,
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub category: AnalyticsCategory,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

fn default_active() -> String {
    "active".to_string()
}

fn default_topic() -> String {
    "all".to_string()
}
