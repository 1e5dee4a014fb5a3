use std::fmt::Write;

use planar_truss::AnalysisResult;

/// Render a plain-text summary of an analysis.
#[must_use]
pub fn render_report(result: &AnalysisResult) -> String {
    let mut output = String::new();

    writeln!(&mut output, "Node displacements").expect("writing to string cannot fail");
    for node in &result.nodes {
        writeln!(
            &mut output,
            "  {:>6}  dx = {:+.4e}  dy = {:+.4e}",
            node.id.to_string(),
            node.dx,
            node.dy
        )
        .expect("writing to string cannot fail");
    }

    writeln!(&mut output, "Member forces").expect("writing to string cannot fail");
    for member in &result.members {
        write!(
            &mut output,
            "  {:>6}  force = {:+.4e}  stress = {:+.4e}  {}",
            member.id.to_string(),
            member.force,
            member.stress,
            member.classification
        )
        .expect("writing to string cannot fail");
        if let Some(fos) = member.factor_of_safety {
            write!(&mut output, "  FoS = {fos:.2}").expect("writing to string cannot fail");
        }
        output.push('\n');
    }

    writeln!(&mut output, "Support reactions").expect("writing to string cannot fail");
    for reaction in &result.reactions {
        writeln!(
            &mut output,
            "  {:>6}  rx = {:+.4e}  ry = {:+.4e}",
            reaction.id.to_string(),
            reaction.rx,
            reaction.ry
        )
        .expect("writing to string cannot fail");
    }

    // Summary lines only make sense when the lists are non-empty.
    if let Some(member) = result.max_stress_member() {
        writeln!(
            &mut output,
            "Highest stress: {} ({:+.4e})",
            member.id, member.stress
        )
        .expect("writing to string cannot fail");
    }
    if let Some(member) = result.min_factor_of_safety_member() {
        if let Some(fos) = member.factor_of_safety {
            writeln!(&mut output, "Lowest factor of safety: {} ({fos:.2})", member.id)
                .expect("writing to string cannot fail");
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use planar_truss::{Classification, MemberId, MemberResult, NodeId, NodeResult, Reaction};

    #[test]
    fn formats_human_readable_report() {
        let result = AnalysisResult::new(
            vec![MemberResult {
                id: MemberId(3),
                force: -1_000.0,
                stress: -1.0e5,
                classification: Classification::Compression,
                factor_of_safety: Some(2_500.0),
            }],
            vec![NodeResult {
                id: NodeId(2),
                dx: -5.0e-7,
                dy: 0.0,
            }],
            vec![Reaction {
                id: NodeId(1),
                rx: 1_000.0,
                ry: 0.0,
            }],
        );
        let report = render_report(&result);
        assert!(report.contains("dx = -5.0000e-7"));
        assert!(report.contains("Compression"));
        assert!(report.contains("FoS = 2500.00"));
        assert!(report.contains("rx = +1.0000e3"));
        assert!(report.contains("Highest stress: M3"));
        assert!(report.contains("Lowest factor of safety: M3 (2500.00)"));
    }
}
