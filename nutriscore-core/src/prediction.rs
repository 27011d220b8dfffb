//! Response types returned by the prediction service.
//!
//! Field names on the wire follow the service's dataset columns, so several
//! carry spaces and units (`"Dish Name"`, `"Calories (kcal)"`).

/// Outcome of a successful prediction request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PredictionResult {
    /// Predicted nutritional score, nominally on a `0..=100` scale.
    pub score: f64,
    /// Textual category for the score, e.g. `"Very Good"`.
    pub category: String,
    /// Reference dishes closest to the submitted values, in service order.
    /// Absent or `null` on the wire is treated like an empty list.
    #[cfg_attr(feature = "serde", serde(default))]
    pub matches: Option<Vec<Match>>,
}

impl PredictionResult {
    /// Build a result carrying `matches`.
    #[must_use]
    pub fn new(score: f64, category: impl Into<String>, matches: Vec<Match>) -> Self {
        Self {
            score,
            category: category.into(),
            matches: Some(matches),
        }
    }
}

/// A reference dish returned alongside the score.
///
/// Only the name, score and calories are displayed; the remaining columns are
/// carried through when the service provides them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Match {
    /// Dish name.
    #[cfg_attr(feature = "serde", serde(rename = "Dish Name"))]
    pub dish_name: String,
    /// The dish's own nutritional score.
    #[cfg_attr(feature = "serde", serde(rename = "Nutritional_Score"))]
    pub nutritional_score: f64,
    /// Energy in kilocalories.
    #[cfg_attr(feature = "serde", serde(rename = "Calories (kcal)"))]
    pub calories: f64,
    /// Protein in grams.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "Protein (g)", default, skip_serializing_if = "Option::is_none")
    )]
    pub protein: Option<f64>,
    /// Carbohydrates in grams.
    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "Carbohydrates (g)",
            default,
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub carbohydrates: Option<f64>,
    /// Free sugar in grams.
    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "Free Sugar (g)",
            default,
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub free_sugar: Option<f64>,
    /// Distance between the submitted values and this dish.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub distance: Option<f64>,
}

impl Match {
    /// Build a match from the three displayed columns.
    #[must_use]
    pub fn new(dish_name: impl Into<String>, nutritional_score: f64, calories: f64) -> Self {
        Self {
            dish_name: dish_name.into(),
            nutritional_score,
            calories,
            protein: None,
            carbohydrates: None,
            free_sugar: None,
            distance: None,
        }
    }
}

/// A dish returned by the search endpoint.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchHit {
    /// Dish name.
    #[cfg_attr(feature = "serde", serde(rename = "Dish Name"))]
    pub dish_name: String,
    /// The dish's nutritional score.
    #[cfg_attr(feature = "serde", serde(rename = "Nutritional_Score"))]
    pub nutritional_score: f64,
}
