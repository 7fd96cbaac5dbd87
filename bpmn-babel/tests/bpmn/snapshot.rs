//! Full output snapshot of a small loose document.

use bpmn_babel::{convert, SerializeOptions};
use insta::assert_snapshot;

const ORDER: &str = r#"<definitions id="Definitions_Order">
  <process id="Order" name="Order">
    <startEvent id="start" name="Placed"><outgoing>f1</outgoing></startEvent>
    <exclusiveGateway id="gw"><incoming>f1</incoming><outgoing>f2</outgoing></exclusiveGateway>
    <endEvent id="end"><incoming>f2</incoming></endEvent>
    <sequenceFlow id="f1" sourceRef="start" targetRef="gw"/>
    <sequenceFlow id="f2" sourceRef="gw" targetRef="end"><conditionExpression>amount &gt; 10</conditionExpression></sequenceFlow>
  </process>
  <BPMNShape id="start_di" bpmnElement="start"><Bounds x="0" y="50"/></BPMNShape>
  <BPMNShape id="gw_di" bpmnElement="gw"><Bounds x="100" y="43"/></BPMNShape>
  <BPMNShape id="end_di" bpmnElement="end"><Bounds x="200" y="50" width="36" height="36"/></BPMNShape>
</definitions>"#;

#[test]
fn test_small_process_snapshot() {
    let output = convert(ORDER, "order.bpmn", &SerializeOptions::default())
        .expect("order should convert");

    assert_snapshot!(output, @r###"
    <?xml version="1.0" encoding="UTF-8"?>
    <bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL" xmlns:bpmndi="http://www.omg.org/spec/BPMN/20100524/DI" xmlns:dc="http://www.omg.org/spec/DD/20100524/DC" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:zeebe="http://camunda.org/schema/zeebe/1.0" xmlns:di="http://www.omg.org/spec/DD/20100524/DI" xmlns:modeler="http://camunda.org/schema/modeler/1.0" id="Definitions_Order" targetNamespace="http://bpmn.io/schema/bpmn" exporter="Camunda Modeler" exporterVersion="5.42.0" modeler:executionPlatform="Camunda Cloud" modeler:executionPlatformVersion="8.8.0">
      <bpmn:process id="Order" name="Order" isExecutable="true">
        <bpmn:startEvent id="start" name="Placed">
          <bpmn:outgoing>f1</bpmn:outgoing>
        </bpmn:startEvent>
        <bpmn:exclusiveGateway id="gw">
          <bpmn:incoming>f1</bpmn:incoming>
          <bpmn:outgoing>f2</bpmn:outgoing>
        </bpmn:exclusiveGateway>
        <bpmn:endEvent id="end">
          <bpmn:incoming>f2</bpmn:incoming>
        </bpmn:endEvent>
        <bpmn:sequenceFlow id="f1" sourceRef="start" targetRef="gw">
        </bpmn:sequenceFlow>
        <bpmn:sequenceFlow id="f2" sourceRef="gw" targetRef="end">
          <bpmn:conditionExpression xsi:type="bpmn:tFormalExpression">=amount &gt; 10</bpmn:conditionExpression>
        </bpmn:sequenceFlow>
      </bpmn:process>
      <bpmndi:BPMNDiagram id="BPMNDiagram_1">
        <bpmndi:BPMNPlane id="BPMNPlane_1" bpmnElement="Order">
          <bpmndi:BPMNShape id="start_di" bpmnElement="start">
            <dc:Bounds x="100" y="107" width="36" height="36" />
          </bpmndi:BPMNShape>
          <bpmndi:BPMNShape id="gw_di" bpmnElement="gw">
            <dc:Bounds x="200" y="100" width="50" height="50" />
          </bpmndi:BPMNShape>
          <bpmndi:BPMNShape id="end_di" bpmnElement="end">
            <dc:Bounds x="300" y="107" width="36" height="36" />
          </bpmndi:BPMNShape>
          <bpmndi:BPMNEdge id="f1_di" bpmnElement="f1">
            <di:waypoint x="136" y="125" />
            <di:waypoint x="200" y="125" />
          </bpmndi:BPMNEdge>
          <bpmndi:BPMNEdge id="f2_di" bpmnElement="f2">
            <di:waypoint x="250" y="125" />
            <di:waypoint x="300" y="125" />
          </bpmndi:BPMNEdge>
        </bpmndi:BPMNPlane>
      </bpmndi:BPMNDiagram>
    </bpmn:definitions>
    "###);
}
