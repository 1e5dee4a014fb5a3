use planar_truss::{analyze, force, point, MemberId, ModelBuilder, NodeId, SupportType};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A roof truss: two rafters meeting at an apex, tied at the eaves
    let mut truss = ModelBuilder::new();

    // Define nodes
    let left = truss.add_node(NodeId(1), point(0.0, 0.0))?;
    let right = truss.add_node(NodeId(2), point(6.0, 0.0))?;
    let apex = truss.add_node(NodeId(3), point(3.0, 2.0))?;

    // Define supports and loads
    truss.set_support(left, SupportType::Pin)?;
    truss.set_support(right, SupportType::Roller)?;
    truss.set_load(apex, force(2_000.0, -50_000.0))?;

    // Define members, all in the same steel
    for (id, start, end) in [(1, left, right), (2, right, apex), (3, apex, left)] {
        let member = truss.add_member(MemberId(id), start, end, 0.005, 210.0e9)?;
        truss.set_member_yield_strength(member, 250.0e6)?;
    }

    let result = analyze(&truss.build())?;

    for member in &result.members {
        println!(
            "Member {}: {:+.1} N ({})",
            member.id, member.force, member.classification
        );
    }
    match result.min_factor_of_safety_member() {
        Some(member) => println!(
            "Critical member {} factor of safety: {:.2}",
            member.id,
            member.factor_of_safety.unwrap_or(f64::INFINITY)
        ),
        None => println!("Factor of safety is unavailable."),
    }

    Ok(())
}
