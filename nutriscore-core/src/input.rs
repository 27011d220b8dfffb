//! Form inputs and their coercion into numeric prediction values.

use std::fmt;
use std::str::FromStr;

use crate::error::UnknownFieldError;

/// The four numeric inputs sent to the prediction service.
///
/// Values are not validated: negative or very large numbers pass through to
/// the service unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputValues {
    /// Energy in kilocalories.
    pub calories: f64,
    /// Protein in grams.
    pub protein: f64,
    /// Carbohydrates in grams.
    pub carbs: f64,
    /// Free sugar in grams.
    pub sugar: f64,
}

impl InputValues {
    /// Construct values from the four measurements.
    #[must_use]
    pub const fn new(calories: f64, protein: f64, carbs: f64, sugar: f64) -> Self {
        Self {
            calories,
            protein,
            carbs,
            sugar,
        }
    }

    /// Return the value for `field`.
    #[must_use]
    pub const fn get(&self, field: Field) -> f64 {
        match field {
            Field::Calories => self.calories,
            Field::Protein => self.protein,
            Field::Carbs => self.carbs,
            Field::Sugar => self.sugar,
        }
    }
}

/// Identifies one of the four input fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Energy in kilocalories.
    Calories,
    /// Protein in grams.
    Protein,
    /// Carbohydrates in grams.
    Carbs,
    /// Free sugar in grams.
    Sugar,
}

impl Field {
    /// All fields in form order.
    pub const ALL: [Self; 4] = [Self::Calories, Self::Protein, Self::Carbs, Self::Sugar];

    /// Lower-case field name, matching the JSON key sent to the service.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Calories => "calories",
            Self::Protein => "protein",
            Self::Carbs => "carbs",
            Self::Sugar => "sugar",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownFieldError {
                name: wanted.to_owned(),
            })
    }
}

/// Raw text currently held by the four input fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    calories: String,
    protein: String,
    carbs: String,
    sugar: String,
}

impl FormFields {
    /// Build a form with the given field text.
    #[must_use]
    pub fn new(
        calories: impl Into<String>,
        protein: impl Into<String>,
        carbs: impl Into<String>,
        sugar: impl Into<String>,
    ) -> Self {
        Self {
            calories: calories.into(),
            protein: protein.into(),
            carbs: carbs.into(),
            sugar: sugar.into(),
        }
    }

    /// Current text of `field`.
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        self.slot(field)
    }

    /// Replace the text of `field`.
    pub fn set(&mut self, field: Field, text: impl Into<String>) {
        *self.slot_mut(field) = text.into();
    }

    /// Empty every field.
    pub fn clear(&mut self) {
        for field in Field::ALL {
            self.slot_mut(field).clear();
        }
    }

    /// Whether every field is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Field::ALL.into_iter().all(|field| self.slot(field).is_empty())
    }

    /// Coerce the field text into numbers; empty or invalid text becomes `0`.
    #[must_use]
    pub fn values(&self) -> InputValues {
        InputValues::new(
            coerce_number(&self.calories),
            coerce_number(&self.protein),
            coerce_number(&self.carbs),
            coerce_number(&self.sugar),
        )
    }

    fn slot(&self, field: Field) -> &String {
        match field {
            Field::Calories => &self.calories,
            Field::Protein => &self.protein,
            Field::Carbs => &self.carbs,
            Field::Sugar => &self.sugar,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Calories => &mut self.calories,
            Field::Protein => &mut self.protein,
            Field::Carbs => &mut self.carbs,
            Field::Sugar => &mut self.sugar,
        }
    }
}

/// Parse numeric input text the way the form does.
///
/// Surrounding whitespace is ignored. Empty text, unparsable text and
/// non-finite values (`inf`, `NaN`) all yield `0.0`.
///
/// # Examples
///
/// ```
/// use nutriscore_core::coerce_number;
///
/// assert_eq!(coerce_number(" 12.5 "), 12.5);
/// assert_eq!(coerce_number(""), 0.0);
/// assert_eq!(coerce_number("lots"), 0.0);
/// assert_eq!(coerce_number("-3"), -3.0);
/// ```
#[must_use]
pub fn coerce_number(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}
