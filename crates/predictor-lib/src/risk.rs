//! Fault risk classification and maintenance advice
//!
//! Maps a fault probability in [0, 1] to a risk tier and builds the ordered
//! list of maintenance suggestions shown to operators.

use crate::models::{FaultRequest, Locale, RiskLevel};

/// Probability at which risk becomes medium (inclusive)
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.3;

/// Probability at which risk becomes high (inclusive)
pub const HIGH_RISK_THRESHOLD: f64 = 0.6;

/// Above this probability maintenance is due immediately
const IMMEDIATE_MAINTENANCE_PROBABILITY: f64 = 0.7;

/// Above this probability maintenance is due within days
const SOON_MAINTENANCE_PROBABILITY: f64 = 0.4;

const LOW_HEALTH_SCORE: f64 = 60.0;
const OVERDUE_MAINTENANCE_DAYS: u64 = 90;
const FREQUENT_FAULT_COUNT: u64 = 3;
const HIGH_VOLTAGE_FLUCTUATION: f64 = 30.0;

/// Discretizes fault probability into risk tiers
#[derive(Debug, Clone)]
pub struct RiskClassifier {
    pub medium_threshold: f64,
    pub high_threshold: f64,
}

impl Default for RiskClassifier {
    fn default() -> Self {
        Self {
            medium_threshold: MEDIUM_RISK_THRESHOLD,
            high_threshold: HIGH_RISK_THRESHOLD,
        }
    }
}

impl RiskClassifier {
    /// Boundary values belong to the higher tier
    pub fn classify(&self, probability: f64) -> RiskLevel {
        if probability < self.medium_threshold {
            RiskLevel::Low
        } else if probability < self.high_threshold {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

/// Localized label for a risk tier
pub fn risk_text(level: RiskLevel, locale: Locale) -> &'static str {
    match (locale, level) {
        (Locale::En, RiskLevel::Low) => "Low risk",
        (Locale::En, RiskLevel::Medium) => "Medium risk",
        (Locale::En, RiskLevel::High) => "High risk",
        (Locale::Zh, RiskLevel::Low) => "低风险",
        (Locale::Zh, RiskLevel::Medium) => "中风险",
        (Locale::Zh, RiskLevel::High) => "高风险",
    }
}

/// Message keys, in the order they are appended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advice {
    MaintainImmediately,
    MaintainWithinDays,
    RoutineSchedule,
    LowHealthScore,
    MaintenanceOverdue,
    FrequentFaults,
    VoltageUnstable,
    NormalOperation,
}

impl Advice {
    pub fn text(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => match self {
                Advice::MaintainImmediately => {
                    "High fault risk: schedule maintenance immediately"
                }
                Advice::MaintainWithinDays => {
                    "Elevated fault risk: schedule maintenance within 3 days"
                }
                Advice::RoutineSchedule => "Keep the routine maintenance schedule",
                Advice::LowHealthScore => {
                    "Health score is below 60: inspect key components"
                }
                Advice::MaintenanceOverdue => {
                    "Last maintenance was over 90 days ago: arrange an inspection"
                }
                Advice::FrequentFaults => {
                    "Frequent past faults: review the root causes of recurring failures"
                }
                Advice::VoltageUnstable => {
                    "Voltage fluctuation is high: check the power supply and wiring"
                }
                Advice::NormalOperation => "Equipment is operating normally",
            },
            Locale::Zh => match self {
                Advice::MaintainImmediately => "故障风险高，建议立即安排维护",
                Advice::MaintainWithinDays => "故障风险较高，建议3天内安排维护",
                Advice::RoutineSchedule => "按常规计划进行维护",
                Advice::LowHealthScore => "健康度评分低于60，建议检查关键部件",
                Advice::MaintenanceOverdue => "距离上次维护已超过90天，建议尽快检查",
                Advice::FrequentFaults => "历史故障次数较多，建议排查故障根因",
                Advice::VoltageUnstable => "电压波动较大，建议检查供电线路",
                Advice::NormalOperation => "设备运行正常",
            },
        }
    }
}

/// Builds maintenance suggestions from threshold rules
#[derive(Debug, Clone, Default)]
pub struct MaintenanceAdvisor;

impl MaintenanceAdvisor {
    pub fn new() -> Self {
        Self
    }

    /// Triggered advice in priority order; the tiered rule always fires first
    pub fn advise(&self, probability: f64, request: &FaultRequest) -> Vec<Advice> {
        let tier = if probability > IMMEDIATE_MAINTENANCE_PROBABILITY {
            Advice::MaintainImmediately
        } else if probability > SOON_MAINTENANCE_PROBABILITY {
            Advice::MaintainWithinDays
        } else {
            Advice::RoutineSchedule
        };

        let mut advice = vec![tier];
        if request.health_score < LOW_HEALTH_SCORE {
            advice.push(Advice::LowHealthScore);
        }
        if request.days_since_last_maintenance > OVERDUE_MAINTENANCE_DAYS {
            advice.push(Advice::MaintenanceOverdue);
        }
        if request.fault_history_count > FREQUENT_FAULT_COUNT {
            advice.push(Advice::FrequentFaults);
        }
        if request.voltage_fluctuation > HIGH_VOLTAGE_FLUCTUATION {
            advice.push(Advice::VoltageUnstable);
        }
        advice
    }

    /// Localized primary suggestion and full list
    pub fn suggestions(
        &self,
        probability: f64,
        request: &FaultRequest,
        locale: Locale,
    ) -> (String, Vec<String>) {
        let suggestions: Vec<String> = self
            .advise(probability, request)
            .iter()
            .map(|a| a.text(locale).to_string())
            .collect();
        let primary = suggestions
            .first()
            .cloned()
            .unwrap_or_else(|| Advice::NormalOperation.text(locale).to_string());
        (primary, suggestions)
    }
}
