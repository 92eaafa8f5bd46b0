//! End-to-end scenarios exercising the assemble-solve-recover pipeline
//! through the public API only.

use approx::assert_relative_eq;
use plane_frame_fea::prelude::*;

fn cantilever(e: f64, a: f64, iz: f64, length: f64, tip_fy: f64) -> Structure {
    let mut s = Structure::new();
    s.add_node("N1", Node::new(0.0, 0.0)).unwrap();
    s.add_node("N2", Node::new(length, 0.0)).unwrap();
    s.add_element("M1", "N1", "N2", Element::Frame(FrameElement::new(e, a, iz))).unwrap();
    s.set_support("N1", Support::fixed()).unwrap();
    s.add_nodal_load("N2", NodalLoad::fy(tip_fy, "Case 1")).unwrap();
    s.select_load_case("Case 1");
    s
}

#[test]
fn scenario_1_cantilever_tip_load() {
    let e = 200e9;
    let iz = 2e4 / e; // EI = 2e4
    let length = 5.0;
    let mut s = cantilever(e, 0.01, iz, length, -10_000.0);
    s.solve(SolveOptions::default().with_logging(false)).unwrap();

    let post = PostProcessor::new(&s).unwrap();
    let tip = post.node_displacement("N2", "Case 1").unwrap();
    let expected_tip = -10_000.0 * length.powi(3) / (3.0 * e * iz);
    assert_relative_eq!(tip.uy, expected_tip, epsilon = 1e-6 * expected_tip.abs());

    let reaction = post.support_reaction("N1", "Case 1").unwrap();
    assert_relative_eq!(reaction.fy, 10_000.0, epsilon = 1e-6);
    assert_relative_eq!(reaction.mz, 50_000.0, epsilon = 1e-3 * 50_000.0);
}

fn simply_supported_beam(w: f64, length: f64, e: f64, iz: f64, load_case: &str) -> Structure {
    let mut s = Structure::new();
    s.add_node("N1", Node::new(0.0, 0.0)).unwrap();
    s.add_node("N2", Node::new(length, 0.0)).unwrap();
    s.add_element("M1", "N1", "N2", Element::Frame(FrameElement::new(e, 0.01, iz))).unwrap();
    s.set_support("N1", Support::pinned()).unwrap();
    s.set_support("N2", Support::roller_y()).unwrap();
    s.add_uniform_load("M1", FrameUniformLoad::full_span_transverse(w, load_case)).unwrap();
    s
}

#[test]
fn scenario_2_simply_supported_uniform_load() {
    let length = 6.0;
    let w = -5_000.0;
    let e = 200e9;
    let iz = 8e-5;
    let mut s = simply_supported_beam(w, length, e, iz, "Case 1");
    s.select_load_case("Case 1");
    s.solve(SolveOptions::default().with_logging(false)).unwrap();

    let post = PostProcessor::new(&s).unwrap();
    let r1 = post.support_reaction("N1", "Case 1").unwrap();
    let r2 = post.support_reaction("N2", "Case 1").unwrap();
    assert_relative_eq!(r1.fy, 15_000.0, epsilon = 1e-3 * 15_000.0);
    assert_relative_eq!(r2.fy, 15_000.0, epsilon = 1e-3 * 15_000.0);

    let mid = post.element_internal_forces_at("M1", "Case 1", length / 2.0).unwrap();
    assert_relative_eq!(mid.mz, 22_500.0, epsilon = 1e-3 * 22_500.0);

    let disp = post.element_displacement_at("M1", "Case 1", length / 2.0).unwrap();
    let expected = 5.0 * w * length.powi(4) / (384.0 * e * iz);
    assert_relative_eq!(disp.uy, expected, epsilon = 1e-6 * expected.abs());
}

#[test]
fn scenario_3_two_bar_truss_apex_load() {
    let mut s = Structure::new();
    let e = 200e9;
    let a = 0.001;
    let half_span = 3.0;

    s.add_node("Left", Node::new(0.0, 0.0)).unwrap();
    s.add_node("Right", Node::new(2.0 * half_span, 0.0)).unwrap();
    s.add_node("Apex", Node::new(half_span, half_span)).unwrap();

    s.add_element("BarL", "Left", "Apex", Element::Truss(TrussElement::new(e, a))).unwrap();
    s.add_element("BarR", "Right", "Apex", Element::Truss(TrussElement::new(e, a))).unwrap();

    s.set_support("Left", Support::fixed()).unwrap();
    s.set_support("Right", Support::fixed()).unwrap();
    s.set_support("Apex", Support::new(false, false, true)).unwrap();

    s.add_nodal_load("Apex", NodalLoad::fy(-10_000.0, "Case 1")).unwrap();
    s.select_load_case("Case 1");
    s.solve(SolveOptions::default().with_logging(false)).unwrap();

    let post = PostProcessor::new(&s).unwrap();
    let apex = post.node_displacement("Apex", "Case 1").unwrap();
    assert!(apex.uy < 0.0);

    let expected_axial = 10_000.0 / std::f64::consts::SQRT_2;
    for bar in ["BarL", "BarR"] {
        let end = post.element_local_end_forces(bar, "Case 1").unwrap();
        assert_relative_eq!(end.fx_j.abs(), expected_axial, epsilon = 1e-3 * expected_axial);
    }
}

#[test]
fn scenario_4_propped_cantilever_settlement() {
    let length = 4.0;
    let e = 200e9;
    let iz = 2e-4;
    let settlement = -0.01;

    let mut s = Structure::new();
    s.add_node("N1", Node::new(0.0, 0.0)).unwrap();
    s.add_node("N2", Node::new(length, 0.0)).unwrap();
    s.add_element("M1", "N1", "N2", Element::Frame(FrameElement::new(e, 0.01, iz))).unwrap();
    s.set_support("N1", Support::fixed()).unwrap();
    s.set_support("N2", Support::roller_y()).unwrap();
    s.add_support_displacement("N2", SupportDisplacementLoad::settlement_y(settlement, "Case 1")).unwrap();
    s.select_load_case("Case 1");
    s.solve(SolveOptions::default().with_logging(false)).unwrap();

    let post = PostProcessor::new(&s).unwrap();
    let tip = post.node_displacement("N2", "Case 1").unwrap();
    assert_relative_eq!(tip.uy, settlement, epsilon = 1e-12);

    let fixed_end = post.element_internal_forces_at("M1", "Case 1", 0.0).unwrap();
    let expected_moment_magnitude = (3.0 * e * iz * settlement / length.powi(2)).abs();
    assert_relative_eq!(fixed_end.mz.abs(), expected_moment_magnitude, epsilon = 1e-3 * expected_moment_magnitude);

    let r1 = post.support_reaction("N1", "Case 1").unwrap();
    let r2 = post.support_reaction("N2", "Case 1").unwrap();
    assert_relative_eq!(r1.fy + r2.fy, 0.0, epsilon = 1e-6);
}

#[test]
fn scenario_5_load_combination() {
    let length = 6.0;
    let e = 200e9;
    let iz = 8e-5;

    let mut s = Structure::new();
    s.add_node("N1", Node::new(0.0, 0.0)).unwrap();
    s.add_node("N2", Node::new(length, 0.0)).unwrap();
    s.add_element("M1", "N1", "N2", Element::Frame(FrameElement::new(e, 0.01, iz))).unwrap();
    s.set_support("N1", Support::pinned()).unwrap();
    s.set_support("N2", Support::roller_y()).unwrap();
    s.add_uniform_load("M1", FrameUniformLoad::full_span_transverse(-5_000.0, "Dead")).unwrap();
    s.add_uniform_load("M1", FrameUniformLoad::full_span_transverse(-3_000.0, "Live")).unwrap();
    s.select_load_case("Dead");
    s.select_load_case("Live");
    s.solve(SolveOptions::default().with_logging(false)).unwrap();

    let post = PostProcessor::new(&s).unwrap();
    let combo = LoadCombination::new("1.2D + 1.6L").with_case("Dead", 1.2).with_case("Live", 1.6);
    let mid = post.element_internal_forces_combo("M1", &combo, length / 2.0).unwrap();

    let dead_moment = 5_000.0 * length.powi(2) / 8.0;
    let live_moment = 3_000.0 * length.powi(2) / 8.0;
    let expected = 1.2 * dead_moment + 1.6 * live_moment;
    assert_relative_eq!(mid.mz, expected, epsilon = 1e-3 * expected);
}

#[test]
fn scenario_6_mechanism_is_singular() {
    let mut s = Structure::new();
    s.add_node("N1", Node::new(0.0, 0.0)).unwrap();
    s.add_node("N2", Node::new(5.0, 0.0)).unwrap();
    s.add_element("M1", "N1", "N2", Element::Truss(TrussElement::new(200e9, 0.001))).unwrap();
    // Neither node is restrained at all - an unanchored bar is a rigid-body
    // mechanism, so the assembled free-free block is singular.
    s.add_nodal_load("N2", NodalLoad::fy(-1_000.0, "Case 1")).unwrap();
    s.select_load_case("Case 1");

    let err = s.solve(SolveOptions::default().with_logging(false)).unwrap_err();
    assert!(matches!(err, StructureError::Singular));
    assert_eq!(s.status(), AnalysisStatus::Failure);
}

#[test]
fn static_equilibrium_holds_for_every_scenario() {
    let mut s = simply_supported_beam(-5_000.0, 6.0, 200e9, 8e-5, "Case 1");
    s.select_load_case("Case 1");
    s.solve(SolveOptions::default().with_logging(false)).unwrap();

    let post = PostProcessor::new(&s).unwrap();
    let r1 = post.support_reaction("N1", "Case 1").unwrap();
    let r2 = post.support_reaction("N2", "Case 1").unwrap();
    let applied = -5_000.0 * 6.0;
    assert_relative_eq!(r1.fy + r2.fy + applied, 0.0, epsilon = 1e-6 * applied.abs());
}

#[test]
fn doubling_load_doubles_displacement_and_reactions() {
    let length = 5.0;
    let e = 200e9;
    let iz = 1e-4;

    let mut s1 = cantilever(e, 0.01, iz, length, -10_000.0);
    s1.select_load_case("Case 1");
    s1.solve(SolveOptions::default().with_logging(false)).unwrap();

    let mut s2 = cantilever(e, 0.01, iz, length, -20_000.0);
    s2.select_load_case("Case 1");
    s2.solve(SolveOptions::default().with_logging(false)).unwrap();

    let post1 = PostProcessor::new(&s1).unwrap();
    let post2 = PostProcessor::new(&s2).unwrap();

    let d1 = post1.node_displacement("N2", "Case 1").unwrap();
    let d2 = post2.node_displacement("N2", "Case 1").unwrap();
    assert_relative_eq!(d2.uy, 2.0 * d1.uy, epsilon = 1e-9 * d1.uy.abs());

    let r1 = post1.support_reaction("N1", "Case 1").unwrap();
    let r2 = post2.support_reaction("N1", "Case 1").unwrap();
    assert_relative_eq!(r2.fy, 2.0 * r1.fy, epsilon = 1e-9 * r1.fy.abs());
}

#[test]
fn internal_forces_at_zero_match_local_end_forces() {
    let mut s = cantilever(200e9, 0.01, 1e-4, 5.0, -10_000.0);
    s.select_load_case("Case 1");
    s.solve(SolveOptions::default().with_logging(false)).unwrap();

    let post = PostProcessor::new(&s).unwrap();
    let end = post.element_local_end_forces("M1", "Case 1").unwrap();
    let at_zero = post.element_internal_forces_at("M1", "Case 1", 0.0).unwrap();
    assert_relative_eq!(at_zero.fx, end.fx_i, epsilon = 1e-9);
    assert_relative_eq!(at_zero.fy, end.fy_i, epsilon = 1e-9);
    assert_relative_eq!(at_zero.mz, end.mz_i, epsilon = 1e-9);
}
