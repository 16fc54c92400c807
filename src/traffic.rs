//! # Traffic Classifier
//! Pure mapping from a `TravelSample` to a delay tier, priority and display glyph.
//! No I/O; thresholds are the two constants below.

use serde::{Deserialize, Serialize};

use crate::sources::types::TravelSample;

/// Delay strictly above this is at least `Busy`.
pub const BUSY_THRESHOLD_SECS: i64 = 300;
/// Delay strictly above this is `Severe`.
pub const SEVERE_THRESHOLD_SECS: i64 = 900;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Clear,
    Busy,
    Severe,
}

impl Tier {
    pub fn priority(self) -> Priority {
        match self {
            Tier::Severe => Priority::High,
            Tier::Clear | Tier::Busy => Priority::Normal,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Tier::Clear => "🟢",
            Tier::Busy => "🟡",
            Tier::Severe => "🔴",
        }
    }

    /// ntfy emoji shortcode for the tier.
    fn tag(self) -> &'static str {
        match self {
            Tier::Clear => "white_check_mark",
            Tier::Busy => "hourglass",
            Tier::Severe => "rotating_light",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Normal,
    High,
}

impl Priority {
    /// ntfy priority scale (1..=5, 3 is default).
    pub fn ntfy_level(self) -> u8 {
        match self {
            Priority::Normal => 3,
            Priority::High => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::High => "high",
        }
    }
}

/// Glyph used when there is no travel time at all.
pub const UNMEASURED_SYMBOL: &str = "⚪";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelayClassification {
    pub tier: Tier,
    /// `current - historic`, floored at 0.
    pub delay_seconds: i64,
    pub priority: Priority,
    pub display_symbol: &'static str,
    pub current_seconds: Option<i64>,
    pub historic_seconds: Option<i64>,
}

impl DelayClassification {
    pub fn is_measured(&self) -> bool {
        self.current_seconds.is_some()
    }

    /// `Clear`, `+15m Busy`, `+1h 5m Delay`, or `N/A`.
    pub fn title_phrase(&self) -> String {
        if !self.is_measured() {
            return "N/A".to_string();
        }
        match self.tier {
            Tier::Clear => "Clear".to_string(),
            Tier::Busy => format!("+{} Busy", fmt_hm(Some(self.delay_seconds))),
            Tier::Severe => format!("+{} Delay", fmt_hm(Some(self.delay_seconds))),
        }
    }

    pub fn tags(&self) -> Vec<&'static str> {
        vec!["car", self.tier.tag()]
    }
}

/// Tier for a delay in seconds. Boundaries resolve to the lower tier.
pub fn classify_delay(delay_seconds: i64) -> Tier {
    if delay_seconds > SEVERE_THRESHOLD_SECS {
        Tier::Severe
    } else if delay_seconds > BUSY_THRESHOLD_SECS {
        Tier::Busy
    } else {
        Tier::Clear
    }
}

pub fn classify(sample: &TravelSample) -> DelayClassification {
    let Some((current, historic)) = sample.normalized() else {
        return DelayClassification {
            tier: Tier::Clear,
            delay_seconds: 0,
            priority: Priority::Normal,
            display_symbol: UNMEASURED_SYMBOL,
            current_seconds: None,
            historic_seconds: None,
        };
    };

    let delay_seconds = (current - historic).max(0);
    let tier = classify_delay(delay_seconds);
    DelayClassification {
        tier,
        delay_seconds,
        priority: tier.priority(),
        display_symbol: tier.symbol(),
        current_seconds: Some(current),
        historic_seconds: Some(historic),
    }
}

/// `1h 5m` / `42m`; missing or non-positive durations render as `N/A`.
pub fn fmt_hm(seconds: Option<i64>) -> String {
    match seconds {
        Some(s) if s > 0 => {
            let (h, m) = (s / 3600, (s % 3600) / 60);
            if h > 0 {
                format!("{h}h {m}m")
            } else {
                format!("{m}m")
            }
        }
        _ => "N/A".to_string(),
    }
}
