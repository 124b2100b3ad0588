use chrono::Utc;
use serde_json::json;

use super::memory::MemStorage;
use super::Storage;
use crate::models::marketplace::{
    AnalyticsCategory, AnalyticsEntry, NewChartData, NewIdea, NewMarketData, NewMarketplaceItem,
    NewSubsidy, SubsidyKind, SubsidyRegion,
};

pub(super) fn populate(storage: &MemStorage) {
    seed_market_data(storage);
    seed_chart_data(storage);
    seed_analytics(storage);
    seed_subsidies(storage);
    seed_ideas(storage);
    seed_products(storage);
}

fn seed_market_data(storage: &MemStorage) {
    let rows = [
        ("recycled_batteries", 14253.0, "units", 23.5),
        ("market_value", 84.2, "million USD", 18.3),
        ("resource_recovery", 5842.0, "kg", 31.2),
    ];

    for (data_type, value, unit, change) in rows {
        storage.add_market_data(NewMarketData {
            data_type: data_type.to_string(),
            value,
            unit: unit.to_string(),
            change: Some(change),
            year: 2023,
        });
    }
}

fn seed_chart_data(storage: &MemStorage) {
    storage.add_chart_data(NewChartData {
        chart_type: "market_gap".to_string(),
        data: json!({
            "labels": ["2018", "2019", "2020", "2021", "2022", "2023", "2024 (Projected)"],
            "datasets": [
                {
                    "label": "EV Battery Demand",
                    "data": [120, 190, 300, 450, 620, 800, 950],
                    "borderColor": "#3B82F6",
                    "backgroundColor": "rgba(59, 130, 246, 0.1)"
                },
                {
                    "label": "Battery Supply",
                    "data": [100, 150, 230, 380, 500, 650, 720],
                    "borderColor": "#F59E0B",
                    "backgroundColor": "rgba(245, 158, 11, 0.1)"
                }
            ]
        }),
    });

    storage.add_chart_data(NewChartData {
        chart_type: "recovery_rates".to_string(),
        data: json!({
            "labels": ["Lithium", "Cobalt", "Nickel", "Manganese", "Copper", "Aluminum"],
            "datasets": [
                {
                    "label": "Traditional Methods",
                    "data": [30, 60, 55, 40, 75, 80],
                    "backgroundColor": "rgba(107, 114, 128, 0.7)"
                },
                {
                    "label": "Recovery Process",
                    "data": [85, 92, 88, 75, 95, 97],
                    "backgroundColor": "rgba(16, 185, 129, 0.7)"
                }
            ]
        }),
    });
}

fn seed_analytics(storage: &MemStorage) {
    let entries = [
        (
            "Recycling Volume Growth",
            23.5,
            "%",
            AnalyticsCategory::Growth,
            json!({"labels": ["2020", "2021", "2022", "2023"], "values": [5210, 7940, 11540, 14253]}),
        ),
        (
            "CO2 Emissions Avoided",
            1260.0,
            "tonnes",
            AnalyticsCategory::Environment,
            json!({"labels": ["2020", "2021", "2022", "2023"], "values": [410, 640, 930, 1260]}),
        ),
        (
            "Materials Recovered",
            5842.0,
            "kg",
            AnalyticsCategory::Materials,
            json!({
                "labels": ["Lithium", "Cobalt", "Nickel", "Manganese", "Copper"],
                "values": [812, 1135, 1702, 640, 1553]
            }),
        ),
    ];

    for (name, value, unit, category, data) in entries {
        storage.add_analytics(|id| AnalyticsEntry {
            id,
            name: name.to_string(),
            value,
            unit: unit.to_string(),
            category,
            data,
            created_at: Utc::now(),
        });
    }
}

fn seed_subsidies(storage: &MemStorage) {
    storage.create_subsidy(NewSubsidy {
        title: "Federal Electric Vehicle Tax Credit".to_string(),
        region: SubsidyRegion::Federal,
        state: None,
        kind: SubsidyKind::Tax,
        benefit_amount: "Up to $7,500".to_string(),
        eligibility: "New electric vehicles purchased after January 1, 2023".to_string(),
        description: "Tax credit for purchasing new qualified plug-in electric drive motor \
                      vehicles. Credit amount depends on battery capacity and other factors."
            .to_string(),
        status: "active".to_string(),
    });

    storage.create_subsidy(NewSubsidy {
        title: "Battery Recycling Infrastructure Grant".to_string(),
        region: SubsidyRegion::State,
        state: Some("California".to_string()),
        kind: SubsidyKind::Grant,
        benefit_amount: "Up to $500,000".to_string(),
        eligibility: "Businesses establishing battery recycling facilities".to_string(),
        description: "Grants for establishing or expanding lithium-ion battery recycling \
                      infrastructure. Covers up to 50% of eligible equipment and facility costs."
            .to_string(),
        status: "active".to_string(),
    });

    storage.create_subsidy(NewSubsidy {
        title: "Energy Storage Rebate Program".to_string(),
        region: SubsidyRegion::Local,
        state: Some("New York".to_string()),
        kind: SubsidyKind::Rebate,
        benefit_amount: "$0.25/Wh, up to $5,000".to_string(),
        eligibility: "Residential and commercial energy storage installations".to_string(),
        description: "Rebates for installing storage systems built from second-life EV \
                      batteries, improving grid resilience."
            .to_string(),
        status: "active".to_string(),
    });
}

fn seed_ideas(storage: &MemStorage) {
    let ideas = [
        (
            "Battery Storage Microgrids for Rural Communities",
            "Microgrids built from repurposed EV batteries to supply reliable electricity to rural communities.",
            "Sarah Johnson",
            "GreenTech Solutions",
            ["Energy Access", "Second-Life"],
        ),
        (
            "Mobile Battery Diagnostic Labs",
            "Mobile labs that visit communities to assess, repair and collect batteries where recycling infrastructure is thin.",
            "Michael Chen",
            "CleanEnergy Institute",
            ["Infrastructure", "Collection"],
        ),
        (
            "Educational Battery Recycling Program",
            "School programs with hands-on workshops and collection drives about battery recycling.",
            "Elena Rodriguez",
            "Sustainable Future NGO",
            ["Education", "Community"],
        ),
    ];

    for (title, description, author, organization, tags) in ideas {
        storage.create_idea(NewIdea {
            title: title.to_string(),
            description: description.to_string(),
            author: author.to_string(),
            organization: Some(organization.to_string()),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        });
    }
}

fn seed_products(storage: &MemStorage) {
    struct Listing {
        name: &'static str,
        category: &'static str,
        description: &'static str,
        condition: &'static str,
        specifications: &'static str,
        price: f64,
        stock: u32,
        capacity_kwh: Option<f64>,
        capacity_percentage: Option<f64>,
        tags: &'static [&'static str],
    }

    let listings = [
        Listing {
            name: "Tesla Model S Battery Pack",
            category: "ev-batteries",
            description: "Used Tesla Model S battery pack in excellent condition",
            condition: "excellent",
            specifications: "85 kWh | 90% Capacity",
            price: 3500.0,
            stock: 5,
            capacity_kwh: Some(85.0),
            capacity_percentage: Some(90.0),
            tags: &["EV", "Second-Life"],
        },
        Listing {
            name: "Nissan Leaf Battery Module",
            category: "ev-batteries",
            description: "Used Nissan Leaf battery module, good condition",
            condition: "good",
            specifications: "24 kWh | 75% Capacity",
            price: 1200.0,
            stock: 12,
            capacity_kwh: Some(24.0),
            capacity_percentage: Some(75.0),
            tags: &["EV", "Module"],
        },
        Listing {
            name: "Home Energy Storage System",
            category: "energy-storage",
            description: "Refurbished home energy storage system",
            condition: "excellent",
            specifications: "10 kWh | Refurbished",
            price: 4200.0,
            stock: 3,
            capacity_kwh: Some(10.0),
            capacity_percentage: None,
            tags: &["Home", "Refurbished"],
        },
        Listing {
            name: "Electric Bike Battery Pack",
            category: "ev-batteries",
            description: "Used e-bike battery in fair condition",
            condition: "fair",
            specifications: "48V 15Ah | 55% Capacity",
            price: 250.0,
            stock: 8,
            capacity_kwh: Some(0.72),
            capacity_percentage: Some(55.0),
            tags: &["E-Bike"],
        },
        Listing {
            name: "Battery Management System",
            category: "components",
            description: "New universal battery management system",
            condition: "new",
            specifications: "Universal | 100A max",
            price: 350.0,
            stock: 15,
            capacity_kwh: None,
            capacity_percentage: None,
            tags: &["BMS"],
        },
        Listing {
            name: "Solar Battery Combo Kit",
            category: "energy-storage",
            description: "Solar panel and battery storage combo kit",
            condition: "good",
            specifications: "5 kWh | Solar panels included",
            price: 2800.0,
            stock: 2,
            capacity_kwh: Some(5.0),
            capacity_percentage: None,
            tags: &["Solar", "Kit"],
        },
        Listing {
            name: "Portable Power Station",
            category: "energy-storage",
            description: "Portable power station with lithium battery",
            condition: "excellent",
            specifications: "1.5 kWh | 2000W inverter",
            price: 950.0,
            stock: 7,
            capacity_kwh: Some(1.5),
            capacity_percentage: None,
            tags: &["Portable"],
        },
        Listing {
            name: "Battery Testing Equipment",
            category: "accessories",
            description: "Professional grade battery testing equipment",
            condition: "new",
            specifications: "Professional grade | Calibrated",
            price: 480.0,
            stock: 4,
            capacity_kwh: None,
            capacity_percentage: None,
            tags: &["Diagnostics"],
        },
    ];

    for listing in listings {
        storage.create_product(NewMarketplaceItem {
            name: listing.name.to_string(),
            category: listing.category.to_string(),
            description: listing.description.to_string(),
            condition: listing.condition.to_string(),
            specifications: listing.specifications.to_string(),
            price: listing.price,
            stock: listing.stock,
            capacity_kwh: listing.capacity_kwh,
            capacity_percentage: listing.capacity_percentage,
            image_url: None,
            tags: listing.tags.iter().map(|t| t.to_string()).collect(),
        });
    }
}
