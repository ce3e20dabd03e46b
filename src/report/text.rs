use crate::model::observation::Source;
use crate::pipeline::stage5_report::AthleteExport;
use crate::report::{SummaryData, format_f64_2};

pub fn render_athlete_report(export: &AthleteExport) -> String {
    let mut out = String::new();

    let title = format!("Force-Velocity Profile - {}", export.athlete);
    out.push_str(&title);
    out.push('\n');
    out.push_str(&"=".repeat(title.chars().count()));
    out.push_str("\n\n");

    out.push_str(&format!("F0: {} N\n", format_f64_2(export.f0_n)));
    out.push_str(&format!("V0: {} m/s\n", format_f64_2(export.v0_m_s)));
    out.push_str(&format!("Pmax: {} W\n", format_f64_2(export.pmax_w)));
    out.push_str(&format!(
        "F0 relative: {} N/kg\n\n",
        format_f64_2(export.f0_rel_n_kg)
    ));

    out.push_str(&format!("Pmax rank: {}\n", export.pmax_rank));
    out.push_str(&format!("F0 rank: {}\n", export.f0_rank));
    out.push_str(&format!("V0 rank: {}\n\n", export.v0_rank));

    out.push_str(&format!(
        "Interpretation: {}\n",
        export.interpretation.label()
    ));
    if export.f0_n < 0.0 || export.v0_m_s < 0.0 {
        out.push_str("Note: negative F0 or V0; the points do not describe a decreasing force-velocity line.\n");
    }

    out.push_str("\nPoints (source, load kg, velocity m/s, force N)\n");
    for obs in &export.observations {
        let source = match obs.source {
            Source::Jump => "jump",
            Source::Loaded => "loaded",
        };
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\n",
            source,
            obs.load_kg,
            format_f64_2(obs.velocity_m_s),
            format_f64_2(obs.force_n)
        ));
    }

    out
}

pub fn render_squad_report(summary: &SummaryData) -> String {
    let mut out = String::new();

    out.push_str("Squad Force-Velocity Report\n");
    out.push_str("===========================\n\n");

    out.push_str(&format!(
        "Athletes profiled: {} (omitted {}, without body mass {})\n",
        summary.counts.profiled, summary.counts.omitted, summary.counts.without_mass
    ));
    out.push_str(&format!(
        "Points: {} jump, {} loaded\n\n",
        summary.counts.jump_points, summary.counts.loaded_points
    ));

    for (metric, unit) in [("pmax", "W"), ("f0", "N"), ("v0", "m/s")] {
        let Some(entries) = summary.rankings.get(metric) else {
            continue;
        };
        out.push_str(&format!("Ranking by {}\n", metric.to_ascii_uppercase()));
        for e in entries {
            out.push_str(&format!(
                "{:>3}. {} {} {}\n",
                e.rank,
                e.athlete,
                format_f64_2(e.value),
                unit
            ));
        }
        out.push('\n');
    }

    if !summary.omitted.is_empty() {
        out.push_str("Not profiled\n");
        for o in &summary.omitted {
            out.push_str(&format!("- {}: {}\n", o.athlete, o.reason));
        }
    }

    out
}
