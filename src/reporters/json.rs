//! JSON reporter
//!
//! Outputs the status report as pretty-printed JSON: the stored user
//! document (`username`, `achievements`, `user_progress`) plus
//! `current_rank` and `next_rank`.

use super::StatusReport;
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &StatusReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_json_render_valid() {
        let report = test_report();
        let json_str = render(&report).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["username"], "ada");
        assert_eq!(parsed["user_progress"]["total_points"], 852);
        assert_eq!(parsed["current_rank"]["name"], "Cardboard");
        assert_eq!(parsed["next_rank"]["points_required"], 1000);
        assert_eq!(parsed["points_needed"], 148);
        assert_eq!(
            parsed["achievements"].as_array().expect("achievements array").len(),
            crate::game::ACHIEVEMENTS.len()
        );
    }

    #[test]
    fn test_json_top_rank_has_null_next() {
        let mut report = test_report();
        report.next_rank = None;
        let parsed: serde_json::Value =
            serde_json::from_str(&render(&report).expect("render JSON")).expect("parse JSON");
        assert!(parsed["next_rank"].is_null());
    }
}
