//! Fasting plan registry.
//!
//! Plans are a fixed table; the user only chooses among them. The chosen id
//! is persisted by [`crate::FastingRepository::select_plan`].

use serde::Serialize;

/// Plan used when nothing has been selected yet.
pub const DEFAULT_PLAN_ID: &str = "16:8";

/// A named fasting/eating window ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FastingPlan {
    /// Ratio id, e.g. `"16:8"`.
    pub id: &'static str,
    /// Length of the fasting window in hours.
    pub window_hours: u32,
    pub label: &'static str,
    /// Display color as a hex string.
    pub color: &'static str,
}

impl FastingPlan {
    pub fn window_secs(&self) -> i64 {
        i64::from(self.window_hours) * 3600
    }

    /// Hours left for eating in a 24h day.
    pub fn eating_hours(&self) -> u32 {
        24u32.saturating_sub(self.window_hours)
    }

    pub fn window(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.window_hours))
    }
}

static PLANS: [FastingPlan; 3] = [
    FastingPlan {
        id: "16:8",
        window_hours: 16,
        label: "16 hours fast / 8 hours eat",
        color: "#FB6B6B",
    },
    FastingPlan {
        id: "18:6",
        window_hours: 18,
        label: "18 hours fast / 6 hours eat",
        color: "#3AB0FF",
    },
    FastingPlan {
        id: "20:4",
        window_hours: 20,
        label: "20 hours fast / 4 hours eat",
        color: "#7ED957",
    },
];

/// All plans, in display order.
pub fn plans() -> &'static [FastingPlan] {
    &PLANS
}

pub fn find_plan(id: &str) -> Option<&'static FastingPlan> {
    PLANS.iter().find(|p| p.id == id)
}

pub fn default_plan() -> &'static FastingPlan {
    // DEFAULT_PLAN_ID is always the first entry.
    &PLANS[0]
}
