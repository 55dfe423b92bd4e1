//! Ports in, interfaces extracted, signals materialized, text out.

use hdlkit_conformance::{make_config, synthesize_and_render, PipelineError, Unit};
use hdlkit_intf::{IntfDirection, InterfaceDef, IntfError};
use hdlkit_ir::PortDirection::{In, Out};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn handshaked() -> InterfaceDef {
    InterfaceDef::new("Handshaked")
        .leaf("valid", Out, 1)
        .leaf("data", Out, 8)
}

fn ready_handshaked() -> InterfaceDef {
    InterfaceDef::new("ReadyHandshaked")
        .extends(handshaked())
        .leaf("ready", In, 1)
}

#[test]
fn master_instance_renders_port_bindings() {
    init_logging();
    let config = make_config("").unwrap();
    let (text, names) = synthesize_and_render(
        &config,
        "source",
        &[
            ("clk", In, 1),
            ("m_valid", Out, 1),
            ("m_data", Out, 8),
            ("m_ready", In, 1),
        ],
        &[ready_handshaked()],
    )
    .unwrap();
    assert_eq!(names, vec!["m"]);
    assert!(text.starts_with("ENTITY source IS"));
    assert!(text.contains("m_data : OUT STD_LOGIC_VECTOR(7 DOWNTO 0)"));
    assert!(text.contains("CONSTANT m_data_0 : STD_LOGIC_VECTOR(7 DOWNTO 0);"));
    assert!(text.contains("SIGNAL m_ready_0 : STD_LOGIC;"));
    assert!(text.contains("m_valid <= m_valid_0;"));
    assert!(text.contains("m_ready_0 <= m_ready;"));
    assert!(!text.contains("clk_0"));
}

#[test]
fn extracted_roots_follow_port_directions() {
    let config = make_config("").unwrap();
    let mut unit = Unit::new(
        &config,
        "sink",
        &[
            ("s_valid", In, 1),
            ("s_data", In, 8),
            ("s_ready", Out, 1),
            ("clk", In, 1),
        ],
    );
    let found = unit.extract(&ready_handshaked()).unwrap();
    assert_eq!(found.len(), 1);
    let root = found[0].1;
    assert_eq!(unit.synth.node(root).direction, IntfDirection::Slave);
    assert_eq!(unit.unclaimed_ports(), vec!["clk"]);
}

#[test]
fn leftover_ports_feed_the_next_class() {
    let config = make_config("").unwrap();
    let (_, names) = synthesize_and_render(
        &config,
        "mixed",
        &[
            ("a_valid", Out, 1),
            ("a_data", Out, 8),
            ("a_ready", In, 1),
            ("b_valid", In, 1),
            ("b_data", In, 8),
        ],
        &[ready_handshaked(), handshaked()],
    )
    .unwrap();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn mixed_directions_leave_ports_unclaimed() {
    let config = make_config("").unwrap();
    let mut unit = Unit::new(&config, "odd", &[("x_valid", Out, 1), ("x_data", In, 8)]);
    let found = unit.extract(&handshaked()).unwrap();
    assert!(found.is_empty());
    assert_eq!(unit.unclaimed_ports(), vec!["x_valid", "x_data"]);
    assert!(unit.synth.is_empty());
}

#[test]
fn inside_view_connects_output_from_input() {
    init_logging();
    let config = make_config("").unwrap();
    let mut unit = Unit::new(
        &config,
        "pipe",
        &[
            ("in_valid", In, 1),
            ("in_data", In, 8),
            ("out_valid", Out, 1),
            ("out_data", Out, 8),
        ],
    );
    let found = unit.extract(&handshaked()).unwrap();
    let names: Vec<&str> = found.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["in", "out"]);
    let (input, output) = (found[0].1, found[1].1);
    assert_eq!(unit.synth.node(input).direction, IntfDirection::Slave);
    assert_eq!(unit.synth.node(output).direction, IntfDirection::Master);

    // directions are resolved from outside the unit
    unit.synth.reverse_direction(input);
    unit.synth.reverse_direction(output);
    unit.materialize("in", input);
    unit.materialize("out", output);
    unit.connect(output, input).unwrap();

    let text = unit.render(&config.codegen).unwrap();
    assert!(text.contains("in_valid_0 <= in_valid;"));
    assert!(text.contains("out_valid_0 <= in_valid_0;"));
    assert!(text.contains("out_data_0 <= in_data_0;"));
    assert!(text.contains("out_data <= out_data_0;"));
}

#[test]
fn connecting_before_materializing_fails() {
    let config = make_config("").unwrap();
    let mut unit = Unit::new(
        &config,
        "pipe",
        &[
            ("in_valid", In, 1),
            ("in_data", In, 8),
            ("out_valid", Out, 1),
            ("out_data", Out, 8),
        ],
    );
    let found = unit.extract(&handshaked()).unwrap();
    let err = unit.connect(found[1].1, found[0].1).unwrap_err();
    assert!(matches!(err, IntfError::Configuration { .. }));
}

#[test]
fn nested_first_member_is_reported() {
    let def = InterfaceDef::new("Wrapped")
        .nested("inner", Out, handshaked())
        .leaf("en", Out, 1);
    let config = make_config("").unwrap();
    let err = synthesize_and_render(&config, "w", &[("w_inner", Out, 1)], &[def]).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Intf(IntfError::Configuration { .. })
    ));
}
