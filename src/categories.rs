use serde::{Deserialize, Serialize};

/// One of the two independent budgeting contexts. Each domain carries its
/// own category weight table and its own once-per-day logging policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    School,
    Life,
}

impl Domain {
    pub fn plan(&self) -> &'static CategoryPlan {
        match self {
            Domain::School => &SCHOOL_PLAN,
            Domain::Life => &LIFE_PLAN,
        }
    }

    /// What the period's total amount is called in this domain.
    pub fn amount_label(&self) -> &'static str {
        match self {
            Domain::School => "allowance",
            Domain::Life => "budget",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Domain::School => write!(f, "school"),
            Domain::Life => write!(f, "life"),
        }
    }
}

/// Savings tip shown when a category goes over its threshold.
#[derive(Debug, Clone, Copy)]
pub enum Tip {
    /// "{text} ₱{overspend + extra}" - tips that estimate what the cheaper
    /// alternative would have saved on top of the overspend itself.
    SaveEstimate { text: &'static str, extra: f64 },
    /// A flat one-liner with no amount attached.
    Flat(&'static str),
}

/// A named spending bucket with a fixed fraction of the period's total.
#[derive(Debug, Clone)]
pub struct CategorySpec {
    pub key: &'static str,
    pub weight: f64,
    pub label: &'static str,
    pub icon: &'static str,
    /// Examples shown next to the prompt ("Jeep, Grab, Gas").
    pub hint: &'static str,
    /// Whether the conversation asks for a spent amount. Unprompted
    /// categories never receive a `spent` entry.
    pub prompted: bool,
    /// Guaranteed categories are credited in full to total_saved.
    pub guaranteed: bool,
    pub tip: Option<Tip>,
}

/// Immutable per-domain category table. Weights sum to 1.0 exactly.
#[derive(Debug, Clone)]
pub struct CategoryPlan {
    pub categories: &'static [CategorySpec],
}

impl CategoryPlan {
    pub fn get(&self, key: &str) -> Option<&CategorySpec> {
        self.categories.iter().find(|c| c.key == key)
    }

    /// Categories the conversation walks through, in declared order.
    pub fn prompted(&self) -> impl Iterator<Item = &CategorySpec> {
        self.categories.iter().filter(|c| c.prompted)
    }

    pub fn prompted_at(&self, index: usize) -> Option<&CategorySpec> {
        self.prompted().nth(index)
    }

    pub fn prompted_count(&self) -> usize {
        self.prompted().count()
    }
}

pub static SCHOOL_PLAN: CategoryPlan = CategoryPlan {
    categories: &[
        CategorySpec {
            key: "transport",
            weight: 0.20,
            label: "Transportation",
            icon: "🚗",
            hint: "jeep, Grab, gas",
            prompted: true,
            guaranteed: false,
            tip: Some(Tip::SaveEstimate {
                text: "🚗 Try jeep/UV next time to save",
                extra: 20.0,
            }),
        },
        CategorySpec {
            key: "lunch",
            weight: 0.30,
            label: "Lunch",
            icon: "🍔",
            hint: "canteen, baon",
            prompted: true,
            guaranteed: false,
            tip: Some(Tip::SaveEstimate {
                text: "🍱 Meal prep could save",
                extra: 30.0,
            }),
        },
        CategorySpec {
            key: "merienda",
            weight: 0.15,
            label: "Merienda",
            icon: "🍎",
            hint: "snacks, coffee",
            prompted: true,
            guaranteed: false,
            tip: Some(Tip::SaveEstimate {
                text: "🍎 Bring snacks to save",
                extra: 15.0,
            }),
        },
        CategorySpec {
            key: "school_supplies",
            weight: 0.10,
            label: "School Supplies",
            icon: "📚",
            hint: "books, photocopy, projects",
            prompted: true,
            guaranteed: false,
            tip: Some(Tip::Flat("📚 Plan projects early to avoid rush costs")),
        },
        CategorySpec {
            key: "load_data",
            weight: 0.10,
            label: "Load/Data",
            icon: "📱",
            hint: "internet, mobile load",
            prompted: true,
            guaranteed: false,
            tip: None,
        },
        CategorySpec {
            key: "savings",
            weight: 0.15,
            label: "Savings",
            icon: "💰",
            hint: "guaranteed savings",
            prompted: false,
            guaranteed: true,
            tip: None,
        },
    ],
};

pub static LIFE_PLAN: CategoryPlan = CategoryPlan {
    categories: &[
        CategorySpec {
            key: "personal_care",
            weight: 0.15,
            label: "Personal Care",
            icon: "💇",
            hint: "haircut, toiletries",
            prompted: true,
            guaranteed: false,
            tip: Some(Tip::Flat("💇 Look for student discounts next time")),
        },
        CategorySpec {
            key: "entertainment",
            weight: 0.25,
            label: "Entertainment",
            icon: "🎬",
            hint: "movies, gala, shopping",
            prompted: true,
            guaranteed: false,
            tip: Some(Tip::Flat("🎬 Suggest budget-friendly activities")),
        },
        CategorySpec {
            key: "food_delivery",
            weight: 0.20,
            label: "Food Delivery",
            icon: "🍕",
            hint: "GrabFood, FoodPanda",
            prompted: true,
            guaranteed: false,
            tip: Some(Tip::SaveEstimate {
                text: "🍕 Cook at home to save",
                extra: 25.0,
            }),
        },
        CategorySpec {
            key: "hobbies",
            weight: 0.15,
            label: "Hobbies",
            icon: "🎮",
            hint: "games, books, sports",
            prompted: true,
            guaranteed: false,
            tip: None,
        },
        // Emergency is a buffer: it is never asked for during the
        // conversation, so whatever is left of it counts toward savings.
        CategorySpec {
            key: "emergency",
            weight: 0.15,
            label: "Emergency",
            icon: "🚨",
            hint: "unexpected expenses",
            prompted: false,
            guaranteed: false,
            tip: None,
        },
        CategorySpec {
            key: "savings",
            weight: 0.10,
            label: "Savings",
            icon: "💰",
            hint: "life savings",
            prompted: false,
            guaranteed: true,
            tip: None,
        },
    ],
};
