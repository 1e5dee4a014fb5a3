use planar_truss::{analyze, force, point, MemberId, ModelBuilder, NodeId, SupportType};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut truss = ModelBuilder::new();
    let a = truss.add_node(NodeId(1), point(0.0, 0.0))?;
    let b = truss.add_node(NodeId(2), point(1.0, 0.0))?;
    truss.set_support(a, SupportType::Pin)?;
    truss.set_support(b, SupportType::Roller)?;
    truss.set_load(b, force(-1000.0, 0.0))?;
    truss.add_member(MemberId(1), a, b, 0.01, 200.0e9)?;

    let result = analyze(&truss.build())?;

    if let Some(displacement) = result.node(b) {
        println!("ux = {:.3e} m", displacement.dx);
    }

    Ok(())
}
