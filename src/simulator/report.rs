//! Simulation report generation.

use crate::character::realm::Realm;
use serde::Serialize;
use std::collections::BTreeMap;

/// What happened in a single run.
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub final_realm: Realm,
    pub final_level: u8,
    pub total_ticks: u64,
    pub reached_target: bool,
    pub tribulations_faced: u32,
    pub tribulations_survived: u32,
    pub total_deaths: u64,
    pub adventures: u32,
    pub items_refined: u32,
    /// Tick each realm was first entered, indexed by realm.
    pub realm_entry_ticks: Vec<Option<u64>>,
}

impl RunStats {
    pub fn new() -> Self {
        let mut realm_entry_ticks = vec![None; Realm::all().len()];
        realm_entry_ticks[Realm::QiRefining.index()] = Some(0);
        Self {
            final_realm: Realm::QiRefining,
            final_level: 1,
            total_ticks: 0,
            reached_target: false,
            tribulations_faced: 0,
            tribulations_survived: 0,
            total_deaths: 0,
            adventures: 0,
            items_refined: 0,
            realm_entry_ticks,
        }
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_runs: u32,
    pub target_realm: Realm,
    pub runs_completed: u32,
    pub runs_timed_out: u32,

    pub avg_total_deaths: f64,
    pub avg_ticks_to_complete: f64,
    pub avg_tribulations_faced: f64,
    /// Survived / faced across all runs.
    pub tribulation_survival_rate: f64,

    /// Final realm -> number of runs that ended there.
    pub realm_distribution: BTreeMap<Realm, u32>,
    /// Average entry tick per realm over the runs that reached it.
    pub avg_ticks_to_realm: Vec<Option<f64>>,

    #[serde(skip)]
    pub run_stats: Vec<RunStats>,
}

impl SimReport {
    pub fn from_runs(runs: Vec<RunStats>, target_realm: Realm, max_ticks: u64) -> Self {
        let num_runs = runs.len() as u32;
        let divisor = num_runs.max(1) as f64;
        let runs_completed = runs.iter().filter(|r| r.reached_target).count() as u32;
        let runs_timed_out = runs
            .iter()
            .filter(|r| !r.reached_target && r.total_ticks >= max_ticks)
            .count() as u32;

        let avg_total_deaths = runs.iter().map(|r| r.total_deaths as f64).sum::<f64>() / divisor;
        let avg_ticks_to_complete = runs
            .iter()
            .filter(|r| r.reached_target)
            .map(|r| r.total_ticks as f64)
            .sum::<f64>()
            / runs_completed.max(1) as f64;

        let faced: u32 = runs.iter().map(|r| r.tribulations_faced).sum();
        let survived: u32 = runs.iter().map(|r| r.tribulations_survived).sum();
        let avg_tribulations_faced = faced as f64 / divisor;
        let tribulation_survival_rate = if faced == 0 {
            0.0
        } else {
            survived as f64 / faced as f64
        };

        let mut realm_distribution = BTreeMap::new();
        for run in &runs {
            *realm_distribution.entry(run.final_realm).or_insert(0) += 1;
        }

        let avg_ticks_to_realm = Realm::all()
            .iter()
            .map(|realm| {
                let entries: Vec<u64> = runs
                    .iter()
                    .filter_map(|r| r.realm_entry_ticks.get(realm.index()).copied().flatten())
                    .collect();
                if entries.is_empty() {
                    None
                } else {
                    Some(entries.iter().sum::<u64>() as f64 / entries.len() as f64)
                }
            })
            .collect();

        Self {
            num_runs,
            target_realm,
            runs_completed,
            runs_timed_out,
            avg_total_deaths,
            avg_ticks_to_complete,
            avg_tribulations_faced,
            tribulation_survival_rate,
            realm_distribution,
            avg_ticks_to_realm,
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
            "Runs: {} total, {} reached {}, {} timed out\n\n",
            self.num_runs, self.runs_completed, self.target_realm, self.runs_timed_out
        ));

        report.push_str("── PROGRESSION ──────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Avg Ticks to Target:   {:.0}\n",
            self.avg_ticks_to_complete
        ));
        report.push_str(&format!(
            "  Avg Deaths:            {:.2}\n",
            self.avg_total_deaths
        ));
        report.push_str(&format!(
            "  Avg Tribulations:      {:.2}\n",
            self.avg_tribulations_faced
        ));
        report.push_str(&format!(
            "  Tribulation Survival:  {:.1}%\n\n",
            self.tribulation_survival_rate * 100.0
        ));

        report.push_str("── REALM ENTRY (avg tick) ───────────────────────────────────────\n");
        for realm in Realm::all() {
            if let Some(Some(tick)) = self.avg_ticks_to_realm.get(realm.index()) {
                report.push_str(&format!("  {:<16} {:>10.0}\n", realm.name(), tick));
            }
        }
        report.push('\n');

        report.push_str("── FINAL REALM ──────────────────────────────────────────────────\n");
        for realm in Realm::all() {
            let count = self.realm_distribution.get(&realm).copied().unwrap_or(0);
            if count == 0 {
                continue;
            }
            let pct = (count as f64 / self.num_runs.max(1) as f64) * 100.0;
            let bar: String = "█".repeat((pct / 5.0) as usize);
            report.push_str(&format!("  {:<16} {:>5.1}% {}\n", realm.name(), pct, bar));
        }

        report
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(reached: bool, ticks: u64, faced: u32, survived: u32) -> RunStats {
        let mut stats = RunStats::new();
        stats.reached_target = reached;
        stats.total_ticks = ticks;
        stats.tribulations_faced = faced;
        stats.tribulations_survived = survived;
        stats.total_deaths = (faced - survived) as u64;
        if reached {
            stats.final_realm = Realm::Foundation;
            stats.realm_entry_ticks[Realm::Foundation.index()] = Some(ticks);
        }
        stats
    }

    #[test]
    fn test_aggregates() {
        let report = SimReport::from_runs(
            vec![run(true, 100, 2, 1), run(true, 300, 1, 1), run(false, 1_000, 1, 0)],
            Realm::Foundation,
            1_000,
        );
        assert_eq!(report.num_runs, 3);
        assert_eq!(report.runs_completed, 2);
        assert_eq!(report.runs_timed_out, 1);
        assert!((report.avg_ticks_to_complete - 200.0).abs() < 1e-9);
        assert!((report.tribulation_survival_rate - 0.5).abs() < 1e-9);
        assert_eq!(report.realm_distribution.get(&Realm::Foundation), Some(&2));
        assert_eq!(report.realm_distribution.get(&Realm::QiRefining), Some(&1));
        assert_eq!(report.avg_ticks_to_realm[Realm::Foundation.index()], Some(200.0));
        assert_eq!(report.avg_ticks_to_realm[Realm::GoldenCore.index()], None);
    }

    #[test]
    fn test_json_skips_run_stats() {
        let report = SimReport::from_runs(vec![run(true, 10, 1, 1)], Realm::Foundation, 100);
        let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
        assert_eq!(json["runs_completed"], 1);
        assert!(json.get("run_stats").is_none());
        assert_eq!(json["realm_distribution"]["Foundation"], 1);
        assert!(report.to_text().contains("Foundation"));
    }
}
