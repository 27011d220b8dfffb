//! Display regions owned by the prediction controller.
//!
//! [`ViewState`] is a plain snapshot of what a front end shows: the form
//! inputs, the fill meter, the score and label text, and the rendered match
//! list. Front ends read it; only [`crate::PredictionController`] writes it.

use std::fmt;
use std::time::Duration;

use crate::FormFields;

/// Score text shown before any prediction and after a failure.
pub const SCORE_PLACEHOLDER: &str = "—";
/// Score text shown while a request is in flight.
pub const LOADING_SCORE: &str = "...";
/// Label shown while a request is in flight.
pub const LOADING_LABEL: &str = "Predicting...";
/// Meter fill, in percent, shown while a request is in flight.
pub const LOADING_FILL: u8 = 6;
/// Label shown before any prediction and after a reset.
pub const IDLE_LABEL: &str = "No prediction yet";
/// Label shown after a failure; also the title of the error entry.
pub const ERROR_LABEL: &str = "Error";
/// Placeholder shown when a prediction carries no matches.
pub const NO_MATCHES: &str = "No matches found";
/// Presentation delay added per match entry.
pub const MATCH_STAGGER: Duration = Duration::from_millis(120);

/// Digits needed after the point to print any `f64` exactly.
const EXACT_FRACTION_DIGITS: usize = 1074;

/// Format a score with exactly two decimals.
///
/// Values exactly halfway between two hundredths round away from zero, so
/// `87.125` shows as `87.13`. Everything else rounds to the nearest
/// hundredth of the stored value, which is why `1.005` (stored just below
/// the tie) shows as `1.00`.
///
/// # Examples
///
/// ```
/// use nutriscore_core::format_score;
///
/// assert_eq!(format_score(87.5), "87.50");
/// assert_eq!(format_score(9.123), "9.12");
/// assert_eq!(format_score(12.625), "12.63");
/// ```
#[must_use]
pub fn format_score(score: f64) -> String {
    let nearest = format!("{score:.2}");
    if !score.is_finite() {
        return nearest;
    }
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, score);
    let Some((whole, fraction)) = exact.split_once('.') else {
        return nearest;
    };
    let Some((hundredths, rest)) = fraction.split_at_checked(2) else {
        return nearest;
    };
    let is_tie = rest
        .strip_prefix('5')
        .is_some_and(|zeros| zeros.bytes().all(|digit| digit == b'0'));
    if is_tie {
        round_tie_away_from_zero(whole, hundredths)
    } else {
        nearest
    }
}

/// Add one hundredth to the magnitude of `whole.hundredths`.
fn round_tie_away_from_zero(whole: &str, hundredths: &str) -> String {
    let (sign, magnitude) = whole
        .strip_prefix('-')
        .map_or(("", whole), |digits| ("-", digits));
    let mut digits: Vec<u8> = magnitude.bytes().chain(hundredths.bytes()).collect();
    let mut carry = true;
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            carry = false;
            break;
        }
    }
    if carry {
        digits.insert(0, b'1');
    }
    let (units, cents) = digits.split_at(digits.len().saturating_sub(2));
    format!(
        "{sign}{}.{}",
        String::from_utf8_lossy(units),
        String::from_utf8_lossy(cents)
    )
}

/// Fill level of the score meter, in whole percent within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct MeterFill(u8);

impl MeterFill {
    /// An empty meter.
    pub const EMPTY: Self = Self(0);

    /// Fill used while a request is in flight.
    pub const LOADING: Self = Self(LOADING_FILL);

    /// Derive the fill from a score.
    ///
    /// Halves round up, so `87.5` fills `88%`. Scores outside the meter's
    /// scale are held at the nearest end and `NaN` leaves the meter empty.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "half-up rounding needs an offset before flooring"
    )]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "the value is clamped to 0..=100 before the cast"
    )]
    pub fn from_score(score: f64) -> Self {
        if score.is_nan() {
            return Self::EMPTY;
        }
        let rounded = (score + 0.5).floor().clamp(0.0, 100.0);
        Self(rounded as u8)
    }

    /// Fill level in percent.
    #[must_use]
    pub const fn percent(self) -> u8 {
        self.0
    }
}

impl fmt::Display for MeterFill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// A match as it appears in the match list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMatch {
    /// Dish name.
    pub title: String,
    /// Dish score with two decimals.
    pub score_text: String,
    /// Calories in shortest decimal form.
    pub calories_text: String,
    /// Presentation delay for staggered display.
    pub delay: Duration,
}

impl RenderedMatch {
    /// Secondary line shown under the title.
    #[must_use]
    pub fn meta(&self) -> String {
        format!(
            "Score: {} · Calories: {} kcal",
            self.score_text, self.calories_text
        )
    }
}

/// One element of the rendered match list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    /// Muted placeholder text, e.g. [`NO_MATCHES`].
    Placeholder(String),
    /// A rendered match.
    Match(RenderedMatch),
    /// The synthetic entry describing a failed request.
    Error {
        /// Entry title, always [`ERROR_LABEL`].
        title: String,
        /// Failure message.
        message: String,
    },
}

impl fmt::Display for ListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placeholder(text) => f.write_str(text),
            Self::Match(entry) => write!(f, "{}: {}", entry.title, entry.meta()),
            Self::Error { title, message } => write!(f, "{title}: {message}"),
        }
    }
}

/// Everything a front end displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Text of the four input fields.
    pub form: FormFields,
    /// Score meter fill.
    pub meter: MeterFill,
    /// Score display.
    pub score_text: String,
    /// Label display.
    pub label: String,
    /// Rendered match list; empty after a reset.
    pub matches: Vec<ListItem>,
}

impl ViewState {
    /// View shown before any prediction, holding `form` in the inputs.
    #[must_use]
    pub fn idle(form: FormFields) -> Self {
        Self {
            form,
            meter: MeterFill::EMPTY,
            score_text: SCORE_PLACEHOLDER.to_owned(),
            label: IDLE_LABEL.to_owned(),
            matches: Vec::new(),
        }
    }

    /// Whether a request is currently shown as in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.label == LOADING_LABEL
    }

    /// Failure message of the error entry, when the view shows a failure.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.matches.iter().find_map(|item| match item {
            ListItem::Error { message, .. } => Some(message.as_str()),
            ListItem::Placeholder(_) | ListItem::Match(_) => None,
        })
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::idle(FormFields::default())
    }
}
