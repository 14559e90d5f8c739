//! Plain-text rendering of evaluations, comparisons and searches, plus CSV
//! export of a trajectory for external plotting.
//!
//! Everything here returns a `String`; printing is left to the caller.

use ht_sim::Trajectory;

use crate::compare::Comparison;
use crate::evaluate::Evaluation;
use crate::search::SearchResult;

const RULE_WIDTH: usize = 60;
const TABLE_WIDTH: usize = 70;

fn rule(c: &str, width: usize) -> String {
    format!("{}\n", c.repeat(width))
}

pub fn format_evaluation(eval: &Evaluation) -> String {
    let g = eval.gains;
    let m = eval.metrics;
    let mut out = rule("=", RULE_WIDTH);
    out.push_str(&format!(
        "RESULTS FOR Kp={:.2}, Ki={:.2}, Kd={:.2}\n",
        g.kp, g.ki, g.kd
    ));
    out.push_str(&rule("=", RULE_WIDTH));
    out.push_str(&format!("Response time (95%)    : {:.1} s\n", m.response_time));
    out.push_str(&format!("Maximum overshoot      : {:.1} %\n", m.overshoot_percent));
    out.push_str(&format!("Steady-state MSE       : {:.2}\n", m.steady_state_mse));
    out.push_str(&format!("Oscillation variance   : {:.2}\n", m.oscillation_variance));
    out.push_str(&format!(
        "Pump duty              : {:.1} %\n",
        eval.trajectory.pump_duty() * 100.0
    ));
    out.push_str(&format!("GLOBAL SCORE           : {:.2}\n", m.score));
    out
}

pub fn format_comparison(comparison: &Comparison) -> String {
    let mut out = rule("=", TABLE_WIDTH);
    out.push_str(&format!(
        "{:>6} {:>6} {:>6} {:>8} {:>5}  {:<25}\n",
        "Kp", "Ki", "Kd", "Score", "Rank", "Description"
    ));
    out.push_str(&rule("-", TABLE_WIDTH));
    for e in &comparison.entries {
        let p = &e.preset;
        out.push_str(&format!(
            "{:>6.1} {:>6.1} {:>6.1} {:>8.1} {:>5}  {:<25}\n",
            p.kp,
            p.ki,
            p.kd,
            e.score(),
            e.rank,
            p.label
        ));
    }
    out.push_str(&rule("=", TABLE_WIDTH));
    if let Some(best) = comparison.best_entry() {
        out.push_str(&format!("BEST CONFIGURATION: {}\n", best.preset.label));
        out.push_str(&format!(
            "Kp={:.1}, Ki={:.1}, Kd={:.1}\n",
            best.preset.kp, best.preset.ki, best.preset.kd
        ));
        out.push_str(&rule("=", TABLE_WIDTH));
    }
    out
}

pub fn format_search(result: &SearchResult) -> String {
    let g = result.gains;
    let mut out = rule("=", RULE_WIDTH);
    out.push_str("  OPTIMAL GAINS FOUND\n");
    out.push_str(&rule("=", RULE_WIDTH));
    out.push_str(&format!("  Kp = {:.2}\n", g.kp));
    out.push_str(&format!("  Ki = {:.2}\n", g.ki));
    out.push_str(&format!("  Kd = {:.2}\n", g.kd));
    out.push_str(&format!(
        "  score {:.2} -> {:.2} ({} iterations, {} evaluations, {:?})\n",
        result.initial_score, result.score, result.iterations, result.evaluations, result.termination
    ));
    out.push_str(&rule("=", RULE_WIDTH));
    out
}

/// CSV with one row per sample: `time_s,humidity,output,p,i,d,pump_on`.
pub fn series_csv(trajectory: &Trajectory) -> String {
    let mut csv = String::from("time_s,humidity,output,p,i,d,pump_on\n");
    for s in &trajectory.samples {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            s.time,
            s.humidity,
            s.output,
            s.p,
            s.i,
            s.d,
            u8::from(s.pump_on)
        ));
    }
    csv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{Preset, compare};
    use crate::evaluate::evaluate;
    use ht_controls::ControllerGains;
    use ht_sim::SimOptions;

    #[test]
    fn evaluation_report_mentions_gains_and_score() {
        let eval = evaluate(ControllerGains::new(3.0, 0.5, 1.0), &SimOptions::default()).unwrap();
        let text = format_evaluation(&eval);
        assert!(text.contains("Kp=3.00, Ki=0.50, Kd=1.00"));
        assert!(text.contains("Response time (95%)    : 8.4 s"));
        assert!(text.contains(&format!("{:.2}", eval.metrics.score)));
    }

    #[test]
    fn comparison_report_names_best() {
        let presets = vec![
            Preset::new(1.0, 0.5, 1.0, "A"),
            Preset::new(5.0, 0.5, 1.0, "B"),
        ];
        let c = compare(&presets, &SimOptions::default()).unwrap();
        let text = format_comparison(&c);
        assert!(text.contains("BEST CONFIGURATION: A"));
        assert_eq!(text.lines().filter(|l| l.starts_with("   1.0")).count(), 1);
    }

    #[test]
    fn comparison_report_without_valid_best_omits_best_section() {
        let mut c = compare(&[Preset::new(3.0, 0.5, 1.0, "only")], &SimOptions::default()).unwrap();
        c.best = 3;
        let text = format_comparison(&c);
        assert!(text.contains("only"));
        assert!(!text.contains("BEST CONFIGURATION"));
    }

    #[test]
    fn search_report_lists_gains() {
        let result = SearchResult {
            gains: ControllerGains::new(2.0, 0.3, 0.5),
            score: 60.0,
            initial_score: 70.0,
            iterations: 3,
            evaluations: 17,
            converged: true,
            termination: ht_tune::Termination::ProjectedGradient,
        };
        let text = format_search(&result);
        assert!(text.contains("  Kp = 2.00\n"));
        assert!(text.contains("score 70.00 -> 60.00 (3 iterations, 17 evaluations, ProjectedGradient)"));
    }

    #[test]
    fn csv_has_header_and_one_row_per_sample() {
        let eval = evaluate(ControllerGains::new(3.0, 0.5, 1.0), &SimOptions::default()).unwrap();
        let csv = series_csv(&eval.trajectory);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("time_s,humidity,output,p,i,d,pump_on"));
        assert_eq!(lines.count(), 200);
        assert!(csv.lines().nth(1).unwrap().starts_with("0,20,"));
    }
}
