//! Display helpers for oncoctl output.

use onco_common::{HealthResponse, RiskLevel, RiskResult};
use owo_colors::OwoColorize;

/// Width of the confidence bar in cells
pub const BAR_WIDTH: usize = 20;

/// `[████████░░░░...]  42.0%`; out-of-range scores are clamped for drawing only
pub fn confidence_bar(score: f64) -> String {
    let clamped = if score.is_finite() { score.clamp(0.0, 1.0) } else { 0.0 };
    let filled = (clamped * BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {:5.1}%",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled),
        score * 100.0
    )
}

fn risk_badge(assessment: &str, color: bool) -> String {
    let level = RiskLevel::from_assessment(assessment);
    let text = format!(" {} ", assessment);
    if !color {
        return format!("[{}]", assessment);
    }
    match level {
        RiskLevel::High => text.white().on_red().bold().to_string(),
        RiskLevel::Medium => text.black().on_yellow().bold().to_string(),
        RiskLevel::Low => text.black().on_green().bold().to_string(),
        RiskLevel::Unknown => text.bold().to_string(),
    }
}

fn extra_f64(result: &RiskResult, key: &str) -> Option<f64> {
    result.extra.get(key).and_then(|v| v.as_f64())
}

/// Render a result as the success view or the "Analysis Failed" view
pub fn render_result(result: &RiskResult, color: bool) -> String {
    if let Some(error) = &result.error {
        let title = if color {
            "Analysis Failed".red().bold().to_string()
        } else {
            "Analysis Failed".to_string()
        };
        return format!("{}\n  {}\n", title, error);
    }

    let mut out = String::new();
    let title = match result.extra_str("patientName").filter(|n| !n.is_empty()) {
        Some(name) => format!("Analysis Results for {}", name),
        None => "Analysis Result".to_string(),
    };
    let title = if color { title.bold().to_string() } else { title };
    out.push_str(&format!("{}\n", title));
    out.push_str(&format!(
        "  Risk        {}\n",
        risk_badge(&result.risk_assessment, color)
    ));
    if let Some(cancer_type) = result.cancer_type.as_deref().filter(|c| !c.is_empty()) {
        out.push_str(&format!("  Type        {}\n", cancer_type));
    }
    out.push_str(&format!(
        "  Confidence  {}\n",
        confidence_bar(result.confidence_score)
    ));
    // Demo cases carry their own test metrics
    if let Some(sensitivity) = extra_f64(result, "sensitivity") {
        out.push_str(&format!("  Sensitivity {}\n", confidence_bar(sensitivity)));
    }
    if let Some(specificity) = extra_f64(result, "specificity") {
        out.push_str(&format!("  Specificity {}\n", confidence_bar(specificity)));
    }

    if let Some(detail) = result.extra_str("diagnosisDetail") {
        out.push_str(&format!("\n  {}\n", detail));
    }
    out
}

pub fn render_health(health: &HealthResponse, color: bool) -> String {
    let status = if color && health.status == "healthy" {
        health.status.green().to_string()
    } else {
        health.status.clone()
    };
    format!(
        "oncod v{}  {}  predictor={}  uptime={}s\n",
        health.version, status, health.predictor, health.uptime_seconds
    )
}
