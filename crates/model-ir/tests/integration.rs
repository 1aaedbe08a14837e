// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Integration tests: build → compute → transform → archive → load.

use ir_archive::{Archive, ArchiveFormat};
use model_ir::{
    BinaryOperationNode, BinaryOperationType, ConstantNode, ErrorCategory, InputNode, Model,
    ModelError, ModelLoader, ModelTransformer, Node, NodeRegistry, OutputNode, PortElements,
    PortType,
};
use serde_json::{json, Value};

// ── Helpers ────────────────────────────────────────────────────

/// y = (x * scale) - x[reversed], read back through an output node.
fn sample_model() -> Model {
    let mut model = Model::new();
    let input = InputNode::<f64>::new(3);
    let scale = ConstantNode::new(vec![2.0, 4.0, 8.0]);
    let x = PortElements::from_port(input.output());
    let reversed = PortElements::from_ranges(
        (0..3)
            .rev()
            .flat_map(|i| x.slice(i, 1).map(|e| e.ranges().to_vec()).unwrap_or_default()),
    );
    let scaled = BinaryOperationNode::<f64>::new(
        x.clone(),
        PortElements::from_port(scale.output()),
        BinaryOperationType::Multiply,
    )
    .unwrap();
    let diff = BinaryOperationNode::<f64>::new(
        PortElements::from_port(scaled.output()),
        reversed,
        BinaryOperationType::Subtract,
    )
    .unwrap();
    let output = OutputNode::<f64>::new(PortElements::from_port(diff.output()));

    model.add_node(input).unwrap();
    model.add_node(scale).unwrap();
    model.add_node(scaled).unwrap();
    model.add_node(diff).unwrap();
    model.add_node(output).unwrap();
    model
}

/// Feeds the single input node and returns the single output node's values.
fn evaluate(model: &mut Model, values: Vec<f64>) -> Vec<f64> {
    let input = model.input_nodes().unwrap()[0];
    model
        .node_as_mut::<InputNode<f64>>(input)
        .unwrap()
        .set_input(values)
        .unwrap();
    model.compute().unwrap();
    let output = model.output_nodes().unwrap()[0];
    model
        .node_as::<OutputNode<f64>>(output)
        .unwrap()
        .output()
        .values()
}

fn type_names(model: &Model) -> Vec<String> {
    model.iter().map(|n| n.runtime_type_name()).collect()
}

fn port_shapes(model: &Model) -> Vec<(PortType, usize)> {
    model
        .iter()
        .flat_map(|n| {
            n.output_ports()
                .iter()
                .map(|p| (p.port_type(), p.size()))
                .collect::<Vec<_>>()
        })
        .collect()
}

// JSON builders for hand-written archives.

fn uint(v: u64) -> Value {
    json!({ "type": "uint", "value": v })
}

fn string(s: &str) -> Value {
    json!({ "type": "string", "value": s })
}

fn object(v: Value) -> Value {
    json!({ "type": "object", "value": v })
}

fn array(items: Vec<Value>) -> Value {
    json!({ "type": "array", "value": items })
}

fn output_port(size: u64) -> Value {
    object(json!({
        "name": string("output"),
        "type": string("double"),
        "size": uint(size),
    }))
}

fn input_node_entry(id: u64) -> Value {
    input_node_entry_sized(id, 1)
}

fn input_node_entry_sized(id: u64, size: u64) -> Value {
    object(json!({
        "type": string("InputNode<double>"),
        "id": uint(id),
        "state": object(json!({ "output": output_port(size) })),
    }))
}

fn range(node: u64, start: u64, count: u64) -> Value {
    object(json!({
        "node": uint(node),
        "port": string("output"),
        "start": uint(start),
        "count": uint(count),
    }))
}

fn output_node_entry(id: u64, reads: u64) -> Value {
    output_node_entry_with(id, vec![range(reads, 0, 1)], 1)
}

fn output_node_entry_with(id: u64, ranges: Vec<Value>, size: u64) -> Value {
    object(json!({
        "type": string("OutputNode<double>"),
        "id": uint(id),
        "state": object(json!({
            "input": object(json!({
                "name": string("input"),
                "type": string("double"),
                "elements": object(json!({ "ranges": array(ranges) })),
            })),
            "output": output_port(size),
        })),
    }))
}

fn archive_of(entries: Vec<Value>) -> Archive {
    serde_json::from_value(json!({
        "format_version": uint(1),
        "nodes": array(entries),
    }))
    .unwrap()
}

// ── Scenarios ──────────────────────────────────────────────────

#[test]
fn test_single_input_node_scenario() {
    let mut model = Model::new();
    let mut input = InputNode::<f64>::new(3);
    input.set_input(vec![1.0, 2.0, 3.0]).unwrap();
    let id = model.add_node(input).unwrap();

    model.compute().unwrap();
    let node = model.node_as::<InputNode<f64>>(id).unwrap();
    assert_eq!(node.output().values(), vec![1.0, 2.0, 3.0]);

    let mut copy = ModelTransformer::new().copy_model(&model).unwrap();
    assert_eq!(copy.len(), 1);
    let copied = copy.iter().next().unwrap();
    assert_eq!(copied.runtime_type_name(), "InputNode<double>");
    assert_eq!(copied.as_input_node().unwrap().dimension(), 3);

    let copied_id = copied.id();
    let node = copy.node_as_mut::<InputNode<f64>>(copied_id).unwrap();
    // The buffer is not carried over.
    assert_eq!(node.input_values(), &[0.0, 0.0, 0.0]);
    node.set_input(vec![1.0, 2.0, 3.0]).unwrap();
    copy.compute().unwrap();
    let node = copy.node_as::<InputNode<f64>>(copied_id).unwrap();
    assert_eq!(node.output().values(), vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_sample_model_computes() {
    let mut model = sample_model();
    // [1*2 - 3, 2*4 - 2, 3*8 - 1]
    assert_eq!(evaluate(&mut model, vec![1.0, 2.0, 3.0]), vec![-1.0, 6.0, 23.0]);
}

#[test]
fn test_identity_transform_preserves_everything() {
    let mut source = sample_model();
    let mut copy = ModelTransformer::new().copy_model(&source).unwrap();

    assert_eq!(copy.len(), source.len());
    assert_eq!(type_names(&copy), type_names(&source));
    assert_eq!(port_shapes(&copy), port_shapes(&source));
    for values in [vec![1.0, 2.0, 3.0], vec![-0.5, 0.0, 1e9]] {
        assert_eq!(
            evaluate(&mut copy, values.clone()),
            evaluate(&mut source, values)
        );
    }
}

#[test]
fn test_archive_round_trip_preserves_behaviour() {
    let mut source = sample_model();
    let registry = NodeRegistry::default();
    for format in [ArchiveFormat::Json, ArchiveFormat::MessagePack] {
        let bytes = format.encode(&ModelLoader::to_archive(&source)).unwrap();
        let mut restored = ModelLoader::from_archive(&format.decode(&bytes).unwrap(), &registry)
            .unwrap();

        assert_eq!(type_names(&restored), type_names(&source));
        assert_eq!(port_shapes(&restored), port_shapes(&source));
        let constant = restored
            .iter()
            .find_map(|n| n.as_any().downcast_ref::<ConstantNode<f64>>())
            .unwrap();
        assert_eq!(constant.values(), &[2.0, 4.0, 8.0]);
        assert_eq!(
            evaluate(&mut restored, vec![0.25, -7.0, 3.5]),
            evaluate(&mut source, vec![0.25, -7.0, 3.5])
        );
    }
}

#[test]
fn test_file_round_trip_and_text_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.msgpack");
    ModelLoader::save(&sample_model(), &path, ArchiveFormat::MessagePack).unwrap();

    let mut model = ModelLoader::load(&path, &NodeRegistry::default()).unwrap();
    let input = model.input_nodes().unwrap()[0];
    model
        .input_node_mut(input)
        .unwrap()
        .set_input_text(&["1", "2", "3"])
        .unwrap();
    model.compute().unwrap();
    let output = model.output_nodes().unwrap()[0];
    let values = model
        .node(output)
        .unwrap()
        .as_output_node()
        .unwrap()
        .output()
        .value_strings();
    assert_eq!(values, vec!["-1", "6", "23"]);
}

#[test]
fn test_handwritten_archive_loads() {
    let archive = archive_of(vec![input_node_entry(10), output_node_entry(11, 10)]);
    let mut model = ModelLoader::from_archive(&archive, &NodeRegistry::default()).unwrap();
    assert_eq!(type_names(&model), vec!["InputNode<double>", "OutputNode<double>"]);
    assert_eq!(evaluate(&mut model, vec![4.5]), vec![4.5]);
}

#[test]
fn test_cyclic_archive_is_rejected() {
    let archive = archive_of(vec![output_node_entry(1, 2), output_node_entry(2, 1)]);
    let err = ModelLoader::from_archive(&archive, &NodeRegistry::default()).unwrap_err();
    assert!(matches!(err, ModelError::CycleDetected { ref nodes } if nodes.len() == 2));
    assert_eq!(err.category(), ErrorCategory::OrderingViolation);
}

#[test]
fn test_self_reference_is_rejected() {
    let archive = archive_of(vec![output_node_entry(1, 1)]);
    let err = ModelLoader::from_archive(&archive, &NodeRegistry::default()).unwrap_err();
    assert!(matches!(err, ModelError::CycleDetected { .. }));
}

#[test]
fn test_dangling_archive_reference() {
    let archive = archive_of(vec![input_node_entry(1), output_node_entry(2, 99)]);
    let err = ModelLoader::from_archive(&archive, &NodeRegistry::default()).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::DanglingReference);
}

#[test]
fn test_unknown_node_type_in_archive() {
    let mut entry = input_node_entry(1);
    entry["value"]["type"] = string("FancyNode<double>");
    let archive = archive_of(vec![entry]);
    let err = ModelLoader::from_archive(&archive, &NodeRegistry::default()).unwrap_err();
    assert!(matches!(err, ModelError::UnknownNodeType(ref name) if name == "FancyNode<double>"));
    assert_eq!(err.category(), ErrorCategory::UnknownNodeType);
}

#[test]
fn test_type_mismatch_in_archive() {
    let mut entry = output_node_entry(2, 1);
    entry["value"]["type"] = string("OutputNode<float>");
    entry["value"]["state"]["value"]["input"]["value"]["type"] = string("float");
    entry["value"]["state"]["value"]["output"]["value"]["type"] = string("float");
    let archive = archive_of(vec![input_node_entry(1), entry]);
    let err = ModelLoader::from_archive(&archive, &NodeRegistry::default()).unwrap_err();
    assert!(matches!(err, ModelError::TypeMismatch { .. }));
}

#[test]
fn test_range_past_upstream_end_is_rejected() {
    let archive = archive_of(vec![
        input_node_entry(1),
        output_node_entry_with(2, vec![range(1, 5, 1)], 1),
    ]);
    let err = ModelLoader::from_archive(&archive, &NodeRegistry::default()).unwrap_err();
    assert!(matches!(err, ModelError::RangeOutOfBounds { start: 5, end: 6, size: 1, .. }));
}

#[test]
fn test_range_end_overflow_is_rejected() {
    let archive = archive_of(vec![
        input_node_entry(1),
        output_node_entry_with(2, vec![range(1, u64::MAX, 1)], 1),
    ]);
    let err = ModelLoader::from_archive(&archive, &NodeRegistry::default()).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Archive);
    assert!(err.to_string().contains("out of range"), "{err}");
}

#[test]
fn test_total_count_overflow_is_rejected() {
    let archive = archive_of(vec![
        input_node_entry(1),
        output_node_entry_with(2, vec![range(1, 0, u64::MAX), range(1, 0, 2)], 2),
    ]);
    let err = ModelLoader::from_archive(&archive, &NodeRegistry::default()).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Archive);
    assert!(err.to_string().contains("out of range"), "{err}");
}

#[test]
fn test_oversized_port_is_rejected() {
    for size in [u64::MAX, model_ir::MAX_ARCHIVED_PORT_SIZE as u64 + 1] {
        let archive = archive_of(vec![input_node_entry_sized(1, size)]);
        let err = ModelLoader::from_archive(&archive, &NodeRegistry::default()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Archive);
        assert!(err.to_string().contains("port size"), "{err}");
    }
}
