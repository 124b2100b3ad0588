pub mod memory;
mod seed;

use serde::Deserialize;

use crate::error::AppError;
use crate::models::marketplace::{
    AnalyticsEntry, Battery, BusinessInquiry, ChartData, Contribution, Idea, MarketData,
    MarketplaceItem, NewBattery, NewBusinessInquiry, NewChartData, NewContribution, NewIdea,
    NewMarketData, NewMarketplaceItem, NewNewsletterSubscriber, NewPickupRequest, NewSubsidy,
    NewsletterSubscriber, PickupRequest, Subsidy, SubsidyKind, SubsidyRegion,
};

pub use memory::MemStorage;

/// Repository for every marketplace entity.
///
/// Handlers only see this trait; `MemStorage` is the in-process
/// implementation. All list operations return records in id order.
pub trait Storage: Send + Sync + 'static {
    // Batteries
    fn create_battery(&self, battery: NewBattery) -> Battery;
    fn get_battery(&self, id: u64) -> Option<Battery>;
    fn list_batteries(&self) -> Vec<Battery>;
    fn update_estimated_price(&self, id: u64, price: f64) -> Option<Battery>;

    // Marketplace
    fn create_product(&self, item: NewMarketplaceItem) -> MarketplaceItem;
    fn list_products(&self) -> Vec<MarketplaceItem>;
    fn get_product(&self, id: u64) -> Option<MarketplaceItem>;
    fn search_products(&self, term: &str) -> Vec<MarketplaceItem>;
    fn filter_products(&self, filter: &ProductFilter) -> Vec<MarketplaceItem>;

    // Subsidies
    fn create_subsidy(&self, subsidy: NewSubsidy) -> Subsidy;
    fn list_subsidies(&self) -> Vec<Subsidy>;
    fn search_subsidies(&self, term: &str) -> Vec<Subsidy>;
    fn filter_subsidies(&self, region: Option<SubsidyRegion>, kind: Option<SubsidyKind>) -> Vec<Subsidy>;
    /// Federal programs plus those of `state`
    fn subsidies_by_state(&self, state: &str) -> Vec<Subsidy>;
    /// Subsidies whose kind matches a finder label; unknown labels match nothing
    fn subsidies_by_category(&self, label: &str) -> Vec<Subsidy>;

    // Community ideas
    fn create_idea(&self, idea: NewIdea) -> Idea;
    fn list_ideas(&self) -> Vec<Idea>;
    fn like_idea(&self, id: u64) -> Option<Idea>;

    // Pickup requests
    fn create_pickup(&self, request: NewPickupRequest) -> Result<PickupRequest, AppError>;
    fn pickups_for_battery(&self, battery_id: u64) -> Vec<PickupRequest>;

    // Business inquiries
    fn create_inquiry(&self, inquiry: NewBusinessInquiry) -> BusinessInquiry;
    fn list_inquiries(&self) -> Vec<BusinessInquiry>;
    fn get_inquiry(&self, id: u64) -> Option<BusinessInquiry>;

    // Contributions
    fn create_contribution(&self, contribution: NewContribution) -> Contribution;
    fn list_contributions(&self) -> Vec<Contribution>;

    /// Subscribe an email; an existing subscription (case-insensitive) is returned as is
    fn subscribe(&self, subscriber: NewNewsletterSubscriber) -> NewsletterSubscriber;

    // Market data and charts
    fn add_market_data(&self, data: NewMarketData) -> MarketData;
    fn list_market_data(&self) -> Vec<MarketData>;
    fn market_data_by_type(&self, data_type: &str) -> Vec<MarketData>;
    fn add_chart_data(&self, chart: NewChartData) -> ChartData;
    fn get_chart_data(&self, chart_type: &str) -> Option<ChartData>;

    fn list_analytics(&self) -> Vec<AnalyticsEntry>;
}

/// Capacity bands used by the marketplace filter (kWh)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapacityBand {
    /// Below 20
    Small,
    /// 20 to 60 inclusive
    Medium,
    /// Above 60 up to 100
    Large,
    /// Above 100
    Industrial,
}

impl CapacityBand {
    pub fn contains(&self, kwh: f64) -> bool {
        match self {
            Self::Small => kwh < 20.0,
            Self::Medium => (20.0..=60.0).contains(&kwh),
            Self::Large => kwh > 60.0 && kwh <= 100.0,
            Self::Industrial => kwh > 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    /// Listing order
    #[default]
    Featured,
    PriceLow,
    PriceHigh,
    Newest,
    /// Highest remaining capacity percentage first
    Capacity,
}

/// Marketplace filter form. `"all"` or empty strings leave a field unfiltered.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub condition: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    #[serde(deserialize_with = "deserialize_band")]
    pub capacity: Option<CapacityBand>,
    #[serde(alias = "q")]
    pub search: Option<String>,
    #[serde(alias = "sortBy")]
    pub sort: ProductSort,
}

impl ProductFilter {
    pub fn matches(&self, item: &MarketplaceItem) -> bool {
        if let Some(category) = active(&self.category) {
            if !item.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(condition) = active(&self.condition) {
            if !item.condition.eq_ignore_ascii_case(condition) {
                return false;
            }
        }
        if self.min_price.is_some_and(|min| item.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| item.price > max) {
            return false;
        }
        if let Some(band) = self.capacity {
            match item.capacity_kwh {
                Some(kwh) if band.contains(kwh) => {}
                _ => return false,
            }
        }
        if let Some(term) = active(&self.search) {
            if !product_matches(item, term) {
                return false;
            }
        }
        true
    }

    pub fn sort(&self, items: &mut [MarketplaceItem]) {
        match self.sort {
            ProductSort::Featured => items.sort_by_key(|item| item.id),
            ProductSort::PriceLow => items.sort_by(|a, b| a.price.total_cmp(&b.price)),
            ProductSort::PriceHigh => items.sort_by(|a, b| b.price.total_cmp(&a.price)),
            ProductSort::Newest => {
                items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)))
            }
            ProductSort::Capacity => items.sort_by(|a, b| {
                let a = a.capacity_percentage.unwrap_or(f64::NEG_INFINITY);
                let b = b.capacity_percentage.unwrap_or(f64::NEG_INFINITY);
                b.total_cmp(&a)
            }),
        }
    }
}

/// Case-insensitive match on name, description, specifications or tags
pub(crate) fn product_matches(item: &MarketplaceItem, term: &str) -> bool {
    let term = term.to_lowercase();
    item.name.to_lowercase().contains(&term)
        || item.description.to_lowercase().contains(&term)
        || item.specifications.to_lowercase().contains(&term)
        || item.tags.iter().any(|tag| tag.to_lowercase().contains(&term))
}

fn active(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

fn deserialize_band<'de, D>(deserializer: D) -> Result<Option<CapacityBand>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(band) => serde_json::from_value(serde_json::Value::String(band.to_lowercase()))
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(id: u64, price: f64, kwh: Option<f64>, pct: Option<f64>) -> MarketplaceItem {
        MarketplaceItem {
            id,
            name: format!("Pack {}", id),
            category: "ev-batteries".to_string(),
            description: "Used pack".to_string(),
            condition: "good".to_string(),
            specifications: "spec".to_string(),
            price,
            stock: 1,
            capacity_kwh: kwh,
            capacity_percentage: pct,
            image_url: None,
            tags: vec!["Second-Life".to_string()],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_capacity_band_edges() {
        assert!(CapacityBand::Small.contains(19.9));
        assert!(!CapacityBand::Small.contains(20.0));
        assert!(CapacityBand::Medium.contains(20.0));
        assert!(CapacityBand::Medium.contains(60.0));
        assert!(!CapacityBand::Large.contains(60.0));
        assert!(CapacityBand::Large.contains(100.0));
        assert!(CapacityBand::Industrial.contains(100.1));
    }

    #[test]
    fn test_filter_deserializes_form_values() {
        let filter: ProductFilter = serde_json::from_str(
            r#"{"category": "all", "capacity": "Medium", "maxPrice": 2000, "sortBy": "price_high"}"#,
        )
        .unwrap();
        assert_eq!(filter.capacity, Some(CapacityBand::Medium));
        assert_eq!(filter.max_price, Some(2000.0));
        assert_eq!(filter.sort, ProductSort::PriceHigh);
        assert!(filter.matches(&item(1, 1200.0, Some(24.0), None)));
        assert!(!filter.matches(&item(2, 1200.0, None, None)));
        assert!(!filter.matches(&item(3, 3500.0, Some(24.0), None)));

        let filter: ProductFilter = serde_json::from_str(r#"{"capacity": "all"}"#).unwrap();
        assert!(filter.capacity.is_none());
    }

    #[test]
    fn test_unknown_band_is_rejected() {
        assert!(serde_json::from_str::<ProductFilter>(r#"{"capacity": "huge"}"#).is_err());
    }

    #[test]
    fn test_search_covers_tags() {
        let filter = ProductFilter {
            search: Some("second-life".to_string()),
            ..ProductFilter::default()
        };
        assert!(filter.matches(&item(1, 10.0, None, None)));
    }

    #[test]
    fn test_capacity_sort_puts_unknown_last() {
        let mut items = vec![
            item(1, 10.0, None, None),
            item(2, 10.0, None, Some(75.0)),
            item(3, 10.0, None, Some(90.0)),
        ];
        let filter = ProductFilter {
            sort: ProductSort::Capacity,
            ..ProductFilter::default()
        };
        filter.sort(&mut items);
        let ids: Vec<u64> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }
}
