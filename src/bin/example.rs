//! Plane Frame FEA example - portal frame plus a two-bar truss
//!
//! Installs `env_logger` as the sink for the library's `log` calls, per
//! this crate's logging policy (the library only depends on the `log`
//! facade; binaries choose the sink).

use plane_frame_fea::prelude::*;

fn portal_frame() {
    println!("=== Portal frame: dead + wind load combination ===\n");

    let mut structure = Structure::new();

    let height = 4.0;
    let span = 6.0;
    let e = 200e9;
    let a = 0.00494;
    let iz = 7.2e-5;

    structure.add_node("N1", Node::new(0.0, 0.0)).unwrap();
    structure.add_node("N2", Node::new(span, 0.0)).unwrap();
    structure.add_node("N3", Node::new(0.0, height)).unwrap();
    structure.add_node("N4", Node::new(span, height)).unwrap();

    structure
        .add_element("Col1", "N1", "N3", Element::Frame(FrameElement::new(e, a, iz)))
        .unwrap();
    structure
        .add_element("Col2", "N2", "N4", Element::Frame(FrameElement::new(e, a, iz)))
        .unwrap();
    structure
        .add_element("Beam", "N3", "N4", Element::Frame(FrameElement::new(e, a, iz)))
        .unwrap();

    structure.set_support("N1", Support::fixed()).unwrap();
    structure.set_support("N2", Support::fixed()).unwrap();

    structure
        .add_uniform_load("Beam", FrameUniformLoad::full_span_transverse(-20_000.0, "Dead"))
        .unwrap();
    structure.add_nodal_load("N3", NodalLoad::fx(10_000.0, "Wind")).unwrap();

    structure.select_load_case("Dead");
    structure.select_load_case("Wind");
    structure.solve(SolveOptions::default()).expect("analysis failed");

    let post = PostProcessor::new(&structure).unwrap();
    let combo = LoadCombination::new("1.2D + 1.0W").with_case("Dead", 1.2).with_case("Wind", 1.0);

    for node_name in ["N1", "N2", "N3", "N4"] {
        let disp = post.node_displacement_combo(node_name, &combo).unwrap();
        println!(
            "  {node_name}: Ux={:.4}mm, Uy={:.4}mm, Rz={:.6}rad",
            disp.ux * 1000.0,
            disp.uy * 1000.0,
            disp.rz
        );
    }

    println!("\nSupport reactions:");
    for node_name in ["N1", "N2"] {
        let dead = post.support_reaction(node_name, "Dead").unwrap();
        let wind = post.support_reaction(node_name, "Wind").unwrap();
        let combined = dead.scale(1.2).add(&wind.scale(1.0));
        println!(
            "  {node_name}: Fx={:.2}kN, Fy={:.2}kN, Mz={:.2}kN*m",
            combined.fx / 1000.0,
            combined.fy / 1000.0,
            combined.mz / 1000.0
        );
    }

    println!("\nBeam midspan moment (combo): {:.2} kN*m\n", {
        let mid = post.element_internal_forces_combo("Beam", &combo, span / 2.0).unwrap();
        mid.mz / 1000.0
    });
}

fn two_bar_truss() {
    println!("=== Two-bar truss: apex load ===\n");

    let mut structure = Structure::new();
    let e = 200e9;
    let a = 0.002;
    let half_span = 3.0;

    structure.add_node("Left", Node::new(0.0, 0.0)).unwrap();
    structure.add_node("Right", Node::new(2.0 * half_span, 0.0)).unwrap();
    structure.add_node("Apex", Node::new(half_span, half_span)).unwrap();

    structure
        .add_element("BarL", "Left", "Apex", Element::Truss(TrussElement::new(e, a)))
        .unwrap();
    structure
        .add_element("BarR", "Right", "Apex", Element::Truss(TrussElement::new(e, a)))
        .unwrap();

    // A truss bar contributes no rotational stiffness, so Rz must be
    // restrained explicitly at every node or the assembled system is
    // singular in that DOF.
    structure.set_support("Left", Support::new(true, true, true)).unwrap();
    structure.set_support("Right", Support::new(true, true, true)).unwrap();
    structure.set_support("Apex", Support::new(false, false, true)).unwrap();

    structure.add_nodal_load("Apex", NodalLoad::fy(-10_000.0, "Case 1")).unwrap();
    structure.select_load_case("Case 1");
    structure.solve(SolveOptions::default()).expect("analysis failed");

    let post = PostProcessor::new(&structure).unwrap();
    let apex = post.node_displacement("Apex", "Case 1").unwrap();
    println!("  Apex displacement: Uy={:.4}mm", apex.uy * 1000.0);

    for bar in ["BarL", "BarR"] {
        let end = post.element_local_end_forces(bar, "Case 1").unwrap();
        println!("  {bar} axial force: {:.2} kN", end.fx_j / 1000.0);
    }
    println!();
}

fn main() {
    env_logger::init();
    portal_frame();
    two_bar_truss();
}
