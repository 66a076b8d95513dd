use serde::Serialize;

/// Public listing card for an interviewer on the marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceListing {
    pub id: &'static str,
    pub name: &'static str,
    pub role: &'static str,
    pub expertise: &'static [&'static str],
    pub years_of_experience: u32,
}

const CATALOG: &[MarketplaceListing] = &[
    MarketplaceListing {
        id: "freelancer-1",
        name: "Alex Rivera",
        role: "Senior Frontend Engineer",
        expertise: &["React", "TypeScript", "Design Systems"],
        years_of_experience: 7,
    },
    MarketplaceListing {
        id: "freelancer-2",
        name: "Priya Desai",
        role: "Backend Architect",
        expertise: &["Node.js", "Microservices", "AWS"],
        years_of_experience: 9,
    },
    MarketplaceListing {
        id: "freelancer-3",
        name: "Martin Fischer",
        role: "Data Engineer",
        expertise: &["Python", "Airflow", "Snowflake"],
        years_of_experience: 6,
    },
];

/// The static listing catalog, in display order.
pub fn catalog() -> &'static [MarketplaceListing] {
    CATALOG
}
