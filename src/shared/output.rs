use std::io::Write;

use colored::Colorize;

use crate::shared::fusion::RiskLevel;
use crate::shared::results::Analysis;

/// Print an analysis as colored terminal text to stderr.
pub fn print_text(analysis: &Analysis, verbose: bool) {
    write_text(&mut std::io::stderr(), analysis, verbose);
}

/// Write an analysis as colored terminal text to an arbitrary writer.
pub fn write_text(w: &mut dyn Write, analysis: &Analysis, verbose: bool) {
    let fusion = &analysis.fusion;
    let risk_colored = match fusion.risk_level {
        RiskLevel::Low => fusion.risk_level.to_string().green(),
        RiskLevel::Medium => fusion.risk_level.to_string().yellow(),
        RiskLevel::High => fusion.risk_level.to_string().truecolor(255, 165, 0), // orange
        RiskLevel::Critical => fusion.risk_level.to_string().red().bold(),
    };

    let _ = writeln!(
        w,
        "{} {} (score: {}/100)",
        "fraudscan:".bold(),
        risk_colored,
        fusion.final_score
    );
    let _ = writeln!(
        w,
        "  Rules: {}/100  Tactics: {}/100  Profile: {}",
        analysis.adjustment.adjusted_rule_score,
        analysis.adjustment.adjusted_tactic_score,
        analysis.adjustment.profile_used
    );

    if analysis.semantic.enabled {
        let _ = writeln!(
            w,
            "  External: {} (p={:.2}, confidence={:.2})",
            analysis.semantic.label, analysis.semantic.probability, analysis.semantic.confidence
        );
        let _ = writeln!(
            w,
            "  Agreement: {}  Dominance: {}",
            fusion.agreement.as_str(),
            fusion.dominance.as_str()
        );
    } else {
        let _ = writeln!(w, "  External: disabled (rule score carried through)");
    }

    if !fusion.guards_fired.is_empty() {
        let _ = writeln!(
            w,
            "  {} Guards fired: {}",
            "!!".red().bold(),
            fusion.guards_fired.join(", ")
        );
    }

    if !analysis.rules.matched_evidence.is_empty() {
        let _ = writeln!(w, "  Evidence:");
        for item in &analysis.rules.matched_evidence {
            let _ = writeln!(w, "    [{}] {}", item.category, item.phrase);
        }
    }

    if !analysis.tactics.categories.is_empty() || verbose {
        let _ = writeln!(w, "  {}", analysis.tactics.explanation);
    }

    if verbose {
        for reason in &analysis.rules.url.reasons {
            let _ = writeln!(w, "    {} {}", ">".dimmed(), reason.dimmed());
        }
        for (category, multiplier) in &analysis.adjustment.multipliers_applied {
            let _ = writeln!(w, "    {} {} x{}", ">".dimmed(), category, multiplier);
        }
    }
}

/// Print an analysis as JSON.
pub fn print_json(analysis: &Analysis) {
    let json = serde_json::to_string_pretty(analysis).expect("Failed to serialize");
    println!("{json}");
}
