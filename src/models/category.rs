//! Expense category model
//!
//! Categories form a closed set. Each carries a default share of the trip
//! budget that is used when no explicit allocation is supplied.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classification for every expense recorded against a trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseCategory {
    /// Airfare
    Flight,
    /// Hotels, rentals, hostels
    Accommodation,
    /// Meals, drinks, groceries
    FoodBeverage,
    /// Local transport: taxis, trains, fuel
    Transportation,
    /// Tickets, tours, entrance fees
    Activities,
    /// Souvenirs and purchases
    Shopping,
    /// Medical and other unplanned costs
    Emergency,
    /// Anything else
    Miscellaneous,
}

impl ExpenseCategory {
    /// Every category, in allocation order
    pub const ALL: [ExpenseCategory; 8] = [
        Self::Flight,
        Self::Accommodation,
        Self::FoodBeverage,
        Self::Transportation,
        Self::Activities,
        Self::Shopping,
        Self::Emergency,
        Self::Miscellaneous,
    ];

    /// Default share of the total budget, in whole percent
    ///
    /// The table sums to 100.
    pub const fn default_percentage(&self) -> u32 {
        match self {
            Self::Flight => 20,
            Self::Accommodation => 30,
            Self::FoodBeverage => 20,
            Self::Transportation => 10,
            Self::Activities => 10,
            Self::Shopping => 5,
            Self::Emergency => 3,
            Self::Miscellaneous => 2,
        }
    }

    /// Machine-readable code, matching the serialized form
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Flight => "FLIGHT",
            Self::Accommodation => "ACCOMMODATION",
            Self::FoodBeverage => "FOOD_BEVERAGE",
            Self::Transportation => "TRANSPORTATION",
            Self::Activities => "ACTIVITIES",
            Self::Shopping => "SHOPPING",
            Self::Emergency => "EMERGENCY",
            Self::Miscellaneous => "MISCELLANEOUS",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flight => write!(f, "Flight"),
            Self::Accommodation => write!(f, "Accommodation"),
            Self::FoodBeverage => write!(f, "Food & Beverage"),
            Self::Transportation => write!(f, "Transportation"),
            Self::Activities => write!(f, "Activities"),
            Self::Shopping => write!(f, "Shopping"),
            Self::Emergency => write!(f, "Emergency"),
            Self::Miscellaneous => write!(f, "Miscellaneous"),
        }
    }
}

impl FromStr for ExpenseCategory {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' ', '&'], "_");
        match normalized.as_str() {
            "flight" | "flights" | "airfare" => Ok(Self::Flight),
            "accommodation" | "hotel" | "lodging" => Ok(Self::Accommodation),
            "food_beverage" | "food" | "food___beverage" | "dining" => Ok(Self::FoodBeverage),
            "transportation" | "transport" => Ok(Self::Transportation),
            "activities" | "activity" => Ok(Self::Activities),
            "shopping" => Ok(Self::Shopping),
            "emergency" => Ok(Self::Emergency),
            "miscellaneous" | "misc" | "other" => Ok(Self::Miscellaneous),
            _ => Err(CategoryParseError(s.to_string())),
        }
    }
}

/// Error returned when a category name is not recognized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryParseError(pub String);

impl fmt::Display for CategoryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown expense category: {}", self.0)
    }
}

impl std::error::Error for CategoryParseError {}
