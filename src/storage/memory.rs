use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use super::{product_matches, seed, ProductFilter, Storage};
use crate::error::AppError;
use crate::models::marketplace::{
    AnalyticsEntry, Battery, BusinessInquiry, ChartData, Contribution, Idea, MarketData,
    MarketplaceItem, NewBattery, NewBusinessInquiry, NewChartData, NewContribution, NewIdea,
    NewMarketData, NewMarketplaceItem, NewNewsletterSubscriber, NewPickupRequest, NewSubsidy,
    NewsletterSubscriber, PickupRequest, Subsidy, SubsidyKind, SubsidyRegion,
};

/// One entity collection with its own id sequence starting at 1
struct Table<T> {
    rows: DashMap<u64, T>,
    next_id: AtomicU64,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Self {
            rows: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    fn insert_with(&self, build: impl FnOnce(u64) -> T) -> T {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    fn get(&self, id: u64) -> Option<T> {
        self.rows.get(&id).map(|row| row.value().clone())
    }

    fn update(&self, id: u64, apply: impl FnOnce(&mut T)) -> Option<T> {
        self.rows.get_mut(&id).map(|mut row| {
            apply(row.value_mut());
            row.value().clone()
        })
    }

    /// Rows matching `keep`, in id order
    fn select(&self, keep: impl Fn(&T) -> bool) -> Vec<T> {
        let mut rows: Vec<(u64, T)> = self
            .rows
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        rows.sort_by_key(|(id, _)| *id);
        rows.into_iter().map(|(_, row)| row).collect()
    }

    fn all(&self) -> Vec<T> {
        self.select(|_| true)
    }
}

/// In-memory `Storage`, seeded with demo marketplace content
pub struct MemStorage {
    batteries: Table<Battery>,
    products: Table<MarketplaceItem>,
    subsidies: Table<Subsidy>,
    ideas: Table<Idea>,
    pickups: Table<PickupRequest>,
    inquiries: Table<BusinessInquiry>,
    contributions: Table<Contribution>,
    /// Keyed by lowercased email
    subscribers: DashMap<String, NewsletterSubscriber>,
    subscriber_ids: AtomicU64,
    market_data: Table<MarketData>,
    charts: Table<ChartData>,
    analytics: Table<AnalyticsEntry>,
}

impl MemStorage {
    /// Empty storage
    pub fn empty() -> Self {
        Self {
            batteries: Table::new(),
            products: Table::new(),
            subsidies: Table::new(),
            ideas: Table::new(),
            pickups: Table::new(),
            inquiries: Table::new(),
            contributions: Table::new(),
            subscribers: DashMap::new(),
            subscriber_ids: AtomicU64::new(1),
            market_data: Table::new(),
            charts: Table::new(),
            analytics: Table::new(),
        }
    }

    /// Storage pre-populated with market data, charts, analytics,
    /// subsidies, ideas and marketplace listings
    pub fn seeded() -> Self {
        let storage = Self::empty();
        seed::populate(&storage);
        debug!(
            products = storage.products.rows.len(),
            subsidies = storage.subsidies.rows.len(),
            "Seeded in-memory storage"
        );
        storage
    }

    pub(super) fn add_analytics(&self, build: impl FnOnce(u64) -> AnalyticsEntry) -> AnalyticsEntry {
        self.analytics.insert_with(build)
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::seeded()
    }
}

impl Storage for MemStorage {
    fn create_battery(&self, battery: NewBattery) -> Battery {
        self.batteries.insert_with(|id| Battery {
            id,
            battery_type: battery.battery_type,
            manufacturer: battery.manufacturer,
            model_number: battery.model_number,
            battery_age: battery.battery_age,
            capacity: battery.capacity,
            condition: battery.condition,
            estimated_price: battery.estimated_price,
            created_at: Utc::now(),
        })
    }

    fn get_battery(&self, id: u64) -> Option<Battery> {
        self.batteries.get(id)
    }

    fn list_batteries(&self) -> Vec<Battery> {
        self.batteries.all()
    }

    fn update_estimated_price(&self, id: u64, price: f64) -> Option<Battery> {
        self.batteries
            .update(id, |battery| battery.estimated_price = Some(price))
    }

    fn create_product(&self, item: NewMarketplaceItem) -> MarketplaceItem {
        self.products.insert_with(|id| MarketplaceItem {
            id,
            name: item.name,
            category: item.category,
            description: item.description,
            condition: item.condition,
            specifications: item.specifications,
            price: item.price,
            stock: item.stock,
            capacity_kwh: item.capacity_kwh,
            capacity_percentage: item.capacity_percentage,
            image_url: item.image_url,
            tags: item.tags,
            created_at: Utc::now(),
        })
    }

    fn list_products(&self) -> Vec<MarketplaceItem> {
        self.products.all()
    }

    fn get_product(&self, id: u64) -> Option<MarketplaceItem> {
        self.products.get(id)
    }

    fn search_products(&self, term: &str) -> Vec<MarketplaceItem> {
        self.products.select(|item| product_matches(item, term))
    }

    fn filter_products(&self, filter: &ProductFilter) -> Vec<MarketplaceItem> {
        let mut items = self.products.select(|item| filter.matches(item));
        filter.sort(&mut items);
        items
    }

    fn create_subsidy(&self, subsidy: NewSubsidy) -> Subsidy {
        self.subsidies.insert_with(|id| Subsidy {
            id,
            title: subsidy.title,
            region: subsidy.region,
            state: subsidy.state,
            kind: subsidy.kind,
            benefit_amount: subsidy.benefit_amount,
            eligibility: subsidy.eligibility,
            description: subsidy.description,
            status: subsidy.status,
            created_at: Utc::now(),
        })
    }

    fn list_subsidies(&self) -> Vec<Subsidy> {
        self.subsidies.all()
    }

    fn search_subsidies(&self, term: &str) -> Vec<Subsidy> {
        let term = term.to_lowercase();
        self.subsidies.select(|s| {
            s.title.to_lowercase().contains(&term)
                || s.description.to_lowercase().contains(&term)
                || s.eligibility.to_lowercase().contains(&term)
        })
    }

    fn filter_subsidies(&self, region: Option<SubsidyRegion>, kind: Option<SubsidyKind>) -> Vec<Subsidy> {
        self.subsidies.select(|s| {
            region.map_or(true, |r| s.region == r) && kind.map_or(true, |k| s.kind == k)
        })
    }

    fn subsidies_by_state(&self, state: &str) -> Vec<Subsidy> {
        let state = state.trim();
        self.subsidies.select(|s| {
            s.region == SubsidyRegion::Federal
                || s.state
                    .as_deref()
                    .is_some_and(|own| own.eq_ignore_ascii_case(state))
        })
    }

    fn subsidies_by_category(&self, label: &str) -> Vec<Subsidy> {
        match SubsidyKind::from_label(label) {
            Some(kind) => self.filter_subsidies(None, Some(kind)),
            None => Vec::new(),
        }
    }

    fn create_idea(&self, idea: NewIdea) -> Idea {
        self.ideas.insert_with(|id| Idea {
            id,
            title: idea.title,
            description: idea.description,
            author: idea.author,
            organization: idea.organization,
            tags: idea.tags,
            likes: 0,
            comments: 0,
            created_at: Utc::now(),
        })
    }

    fn list_ideas(&self) -> Vec<Idea> {
        self.ideas.all()
    }

    fn like_idea(&self, id: u64) -> Option<Idea> {
        self.ideas.update(id, |idea| idea.likes += 1)
    }

    fn create_pickup(&self, request: NewPickupRequest) -> Result<PickupRequest, AppError> {
        if self.get_battery(request.battery_id).is_none() {
            return Err(AppError::NotFound(format!(
                "Battery {} not found",
                request.battery_id
            )));
        }

        Ok(self.pickups.insert_with(|id| PickupRequest {
            id,
            battery_id: request.battery_id,
            address: request.address,
            preferred_date: request.preferred_date,
            delivery_option: request.delivery_option,
            status: "pending".to_string(),
            created_at: Utc::now(),
        }))
    }

    fn pickups_for_battery(&self, battery_id: u64) -> Vec<PickupRequest> {
        self.pickups.select(|p| p.battery_id == battery_id)
    }

    fn create_inquiry(&self, inquiry: NewBusinessInquiry) -> BusinessInquiry {
        self.inquiries.insert_with(|id| BusinessInquiry {
            id,
            company_name: inquiry.company_name,
            contact_person: inquiry.contact_person,
            email: inquiry.email,
            phone: inquiry.phone,
            battery_details: inquiry.battery_details,
            inquiry_type: inquiry.inquiry_type,
            status: "pending".to_string(),
            created_at: Utc::now(),
        })
    }

    fn list_inquiries(&self) -> Vec<BusinessInquiry> {
        self.inquiries.all()
    }

    fn get_inquiry(&self, id: u64) -> Option<BusinessInquiry> {
        self.inquiries.get(id)
    }

    fn create_contribution(&self, contribution: NewContribution) -> Contribution {
        self.contributions.insert_with(|id| Contribution {
            id,
            organization_name: contribution.organization_name,
            organization_type: contribution.organization_type,
            contact_name: contribution.contact_name,
            contact_email: contribution.contact_email,
            contribution_type: contribution.contribution_type,
            details: contribution.details,
            idea: contribution.idea,
            status: "pending".to_string(),
            created_at: Utc::now(),
        })
    }

    fn list_contributions(&self) -> Vec<Contribution> {
        self.contributions.all()
    }

    fn subscribe(&self, subscriber: NewNewsletterSubscriber) -> NewsletterSubscriber {
        let key = subscriber.email.trim().to_lowercase();
        self.subscribers
            .entry(key)
            .or_insert_with(|| NewsletterSubscriber {
                id: self.subscriber_ids.fetch_add(1, Ordering::Relaxed),
                email: subscriber.email.trim().to_string(),
                topic: subscriber.topic,
                created_at: Utc::now(),
            })
            .value()
            .clone()
    }

    fn add_market_data(&self, data: NewMarketData) -> MarketData {
        self.market_data.insert_with(|id| MarketData {
            id,
            data_type: data.data_type,
            value: data.value,
            unit: data.unit,
            change: data.change,
            year: data.year,
            created_at: Utc::now(),
        })
    }

    fn list_market_data(&self) -> Vec<MarketData> {
        self.market_data.all()
    }

    fn market_data_by_type(&self, data_type: &str) -> Vec<MarketData> {
        self.market_data.select(|d| d.data_type == data_type)
    }

    fn add_chart_data(&self, chart: NewChartData) -> ChartData {
        self.charts.insert_with(|id| ChartData {
            id,
            chart_type: chart.chart_type,
            data: chart.data,
            created_at: Utc::now(),
        })
    }

    fn get_chart_data(&self, chart_type: &str) -> Option<ChartData> {
        self.charts
            .select(|c| c.chart_type == chart_type)
            .into_iter()
            .next()
    }

    fn list_analytics(&self) -> Vec<AnalyticsEntry> {
        self.analytics.all()
    }
}
