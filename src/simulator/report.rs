//! Simulation report generation.

use crate::stats::{CurrencyId, CurrencyWallet};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RunOutcome {
    Died,
    Victorious,
    /// Hit the time limit with the player still alive.
    TimedOut,
}

/// Statistics for one combat run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub stage: u32,
    pub outcome: RunOutcome,
    pub seconds: f64,
    pub kills: u32,
    pub levels_gained: u32,
    pub collected: CurrencyWallet,
    /// Upgrades bought right before this run.
    pub upgrades_bought: u32,
    pub unlocked_after: u32,
}

/// Aggregated results from all runs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimReport {
    pub num_runs: u32,
    pub deaths: u32,
    pub victories: u32,
    pub timeouts: u32,
    pub avg_seconds: f64,
    pub avg_kills: f64,
    pub total_collected: CurrencyWallet,
    pub currency_per_second: f64,
    pub upgrades_bought: u32,
    pub final_unlocked_stage: u32,
    pub final_level: i32,
    pub run_stats: Vec<RunStats>,
}

impl SimReport {
    pub fn from_runs(runs: Vec<RunStats>, final_level: i32) -> Self {
        let num_runs = runs.len() as u32;
        let count = |outcome: RunOutcome| runs.iter().filter(|r| r.outcome == outcome).count() as u32;
        let divisor = num_runs.max(1) as f64;

        let total_seconds: f64 = runs.iter().map(|r| r.seconds).sum();
        let mut total_collected = CurrencyWallet::new();
        for run in &runs {
            for currency in CurrencyId::ALL {
                total_collected.add(currency, run.collected.get(currency));
            }
        }
        let currency_per_second = if total_seconds > 0.0 {
            total_collected.total() as f64 / total_seconds
        } else {
            0.0
        };

        Self {
            num_runs,
            deaths: count(RunOutcome::Died),
            victories: count(RunOutcome::Victorious),
            timeouts: count(RunOutcome::TimedOut),
            avg_seconds: total_seconds / divisor,
            avg_kills: runs.iter().map(|r| r.kills as f64).sum::<f64>() / divisor,
            total_collected,
            currency_per_second,
            upgrades_bought: runs.iter().map(|r| r.upgrades_bought).sum(),
            final_unlocked_stage: runs.last().map_or(1, |r| r.unlocked_after),
            final_level,
            run_stats: runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {} total, {} victories, {} deaths, {} timed out\n\n",
            self.num_runs, self.victories, self.deaths, self.timeouts
        ));

        report.push_str("── COMBAT ───────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Run Length:      {:.1}s\n", self.avg_seconds));
        report.push_str(&format!("  Avg Kills:           {:.1}\n", self.avg_kills));
        report.push_str(&format!("  Final Level:         {}\n\n", self.final_level));

        report.push_str("── ECONOMY ──────────────────────────────────────────────────────\n");
        for currency in CurrencyId::ALL {
            report.push_str(&format!(
                "  {:<20} {}\n",
                format!("{}:", currency.name()),
                self.total_collected.get(currency)
            ));
        }
        report.push_str(&format!(
            "  Income:              {:.2}/s\n",
            self.currency_per_second
        ));
        report.push_str(&format!(
            "  Upgrades Bought:     {}\n\n",
            self.upgrades_bought
        ));

        report.push_str("── PROGRESSION ──────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Unlocked Stage:      {}\n",
            self.final_unlocked_stage
        ));
        if self.num_runs > 0 && self.victories == 0 && self.timeouts == self.num_runs {
            report.push_str("  ⚠️  No run ended - attrition too low?\n");
        }
        if self.num_runs > 0 && self.deaths == self.num_runs {
            report.push_str("  ⚠️  Every run died - stage too hard for this build?\n");
        }

        report
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
