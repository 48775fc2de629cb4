//! Decoding of response envelopes and typed result readers.

use serde::Deserialize;
use serde_json::{json, Value};
use test_case::test_case;
use tinkerline_client::{
    Edge, GremlinError, Property, Response, ResponseResult, Status, StatusCode, Vertex,
    VertexProperty,
};

fn success(data: Value) -> Response {
    Response {
        status: Status {
            code: StatusCode::SUCCESS,
            ..Status::default()
        },
        result: ResponseResult {
            data,
            ..ResponseResult::default()
        },
        ..Response::default()
    }
}

#[derive(Debug, PartialEq, Deserialize)]
struct Person {
    id: i64,
    name: String,
    age: i32,
}

#[test]
fn test_decode_value_map_response() {
    let rsp: Response = serde_json::from_str(
        r#"{
        "requestId": "a65f2d39-1efa-45d2-a06a-c736476500fc",
        "result": {
            "data": {
                "@type": "g:List",
                "@value": [
                    {
                        "@type": "g:Map",
                        "@value": [
                            {"@type": "g:T", "@value": "id"}, {"@type": "g:Int64", "@value": 1},
                            {"@type": "g:T", "@value": "label"}, "person",
                            "name", {"@type": "g:List", "@value": ["marko"]},
                            "age", {"@type": "g:List", "@value": [{"@type": "g:Int32", "@value": 29}]}
                        ]
                    },
                    {
                        "@type": "g:Map",
                        "@value": [
                            {"@type": "g:T", "@value": "id"}, {"@type": "g:Int64", "@value": 6},
                            {"@type": "g:T", "@value": "label"}, "person",
                            "name", {"@type": "g:List", "@value": ["peter"]},
                            "age", {"@type": "g:List", "@value": [{"@type": "g:Int32", "@value": 35}]}
                        ]
                    }
                ]
            },
            "meta": {"@type": "g:Map", "@value": []}
        },
        "status": {
            "attributes": {"@type": "g:Map", "@value": []},
            "code": 200,
            "message": ""
        }
    }"#,
    )
    .unwrap();

    assert_eq!(rsp.request_id, "a65f2d39-1efa-45d2-a06a-c736476500fc");
    assert_eq!(rsp.status.code, StatusCode::SUCCESS);
    assert!(rsp.status.message.is_empty());
    assert!(rsp.status.attributes.is_empty());
    assert!(rsp.result.meta.is_empty());

    let vm = rsp.read_value_map().unwrap();
    assert_eq!(vm.len(), 2);

    let people: Vec<Person> = vm.decode().unwrap();
    assert_eq!(
        people,
        vec![
            Person { id: 1, name: "marko".into(), age: 29 },
            Person { id: 6, name: "peter".into(), age: 35 },
        ]
    );
}

#[test]
fn test_decode_response_with_error() {
    let rsp: Response = serde_json::from_str(
        r#"{
        "requestId": "41d2e28a-20a4-4ab0-b379-d810dede3786",
        "result": {"data": null, "meta": {"@type": "g:Map", "@value": []}},
        "status": {
            "attributes": {"@type": "g:Map", "@value": []},
            "code": 500,
            "message": "Database Down"
        }
    }"#,
    )
    .unwrap();

    let err = rsp.err().unwrap_err();
    assert!(err.to_string().contains("Database Down"));

    let rsp: Response = serde_json::from_str(r#"{"status": null}"#).unwrap();
    assert!(rsp.err().is_err());
}

#[test]
fn test_status_attributes_are_untagged() {
    let rsp: Response = serde_json::from_str(
        r#"{
        "requestId": "id",
        "result": {"data": null, "meta": {"@type": "g:Map", "@value": []}},
        "status": {
            "attributes": {
                "@type": "g:Map",
                "@value": ["host", "/127.0.0.1:8182", "retries", {"@type": "g:Int32", "@value": 2}]
            },
            "code": 204,
            "message": null
        }
    }"#,
    )
    .unwrap();

    assert_eq!(rsp.status.code, StatusCode::NO_CONTENT);
    assert_eq!(rsp.status.attributes["host"], json!("/127.0.0.1:8182"));
    assert_eq!(rsp.status.attributes["retries"], json!(2));
    assert!(rsp.err().is_ok());
}

#[test]
fn test_read_val() {
    let mut rsp = success(json!({"@type": "g:Int32", "@value": 15}));
    assert_eq!(rsp.read_val::<i32>().unwrap(), 15);
    assert!(rsp.read_val::<String>().is_err());

    rsp.status.code = StatusCode::SERVER_ERROR;
    assert!(rsp.read_val::<i32>().is_err());
}

// ============================================================================
// Graph elements
// ============================================================================

#[test]
fn test_read_vertices() {
    let rsp = success(json!({
        "@type": "g:List",
        "@value": [
            {"@type": "g:Vertex", "@value": {"id": {"@type": "g:Int64", "@value": 1}, "label": "person"}},
            {"@type": "g:Vertex", "@value": {"id": {"@type": "g:Int64", "@value": 6}, "label": "person"}}
        ]
    }));

    assert_eq!(
        rsp.read_vertices().unwrap(),
        vec![Vertex::new(1, "person"), Vertex::new(6, "person")]
    );
}

#[test]
fn test_read_vertex_properties() {
    let rsp = success(json!({
        "@type": "g:List",
        "@value": [
            {
                "@type": "g:VertexProperty",
                "@value": {"id": {"@type": "g:Int64", "@value": 0}, "label": "name", "value": "marko"}
            },
            {
                "@type": "g:VertexProperty",
                "@value": {
                    "id": {"@type": "g:Int64", "@value": 2},
                    "label": "age",
                    "value": {"@type": "g:Int32", "@value": 29}
                }
            }
        ]
    }));

    assert_eq!(
        rsp.read_vertex_properties().unwrap(),
        vec![
            VertexProperty::new(0, "name", "marko"),
            VertexProperty::new(2, "age", 29),
        ]
    );
}

#[test]
fn test_read_edges() {
    let rsp = success(json!({
        "@type": "g:List",
        "@value": [{
            "@type": "g:Edge",
            "@value": {
                "id": {"@type": "g:Int32", "@value": 12},
                "inV": {"@type": "g:Int64", "@value": 3},
                "inVLabel": "software",
                "label": "created",
                "outV": {"@type": "g:Int64", "@value": 6},
                "outVLabel": "person"
            }
        }]
    }));

    assert_eq!(
        rsp.read_edges().unwrap(),
        vec![Edge::new(
            12,
            "created",
            Vertex::new(6, "person"),
            Vertex::new(3, "software"),
        )]
    );
}

#[test]
fn test_read_properties() {
    let rsp = success(json!({
        "@type": "g:List",
        "@value": [{
            "@type": "g:Property",
            "@value": {"key": "weight", "value": {"@type": "g:Double", "@value": 0.2}}
        }]
    }));

    assert_eq!(
        rsp.read_properties().unwrap(),
        vec![Property::new("weight", 0.2)]
    );
}

#[test]
fn test_read_value_map_single() {
    let rsp = success(json!({
        "@type": "g:List",
        "@value": [{
            "@type": "g:Map",
            "@value": ["name", {"@type": "g:List", "@value": ["alex"]}]
        }]
    }));

    #[derive(Deserialize)]
    struct Named {
        name: String,
    }
    let named: Named = rsp.read_value_map().unwrap().decode_one().unwrap();
    assert_eq!(named.name, "alex");
}

// ============================================================================
// Scalar readers
// ============================================================================

fn list(values: Value) -> Value {
    json!({"@type": "g:List", "@value": values})
}

#[test_case(list(json!([true])), Some(true); "simple")]
#[test_case(list(json!([false, true])), Some(false); "multi")]
#[test_case(list(json!([])), None; "empty")]
#[test_case(list(json!(["user"])), None; "bad type")]
fn test_read_bool(data: Value, want: Option<bool>) {
    let got = success(data).read_bool();
    match want {
        Some(want) => assert_eq!(got.unwrap(), want),
        None => assert!(got.is_err()),
    }
}

#[test_case(list(json!([{"@type": "g:Int64", "@value": 42}])), Some(42); "simple")]
#[test_case(list(json!([{"@type": "g:Int64", "@value": 55}, {"@type": "g:Int64", "@value": 13}])), Some(55); "multi")]
#[test_case(list(json!([])), None; "empty")]
#[test_case(list(json!([true])), None; "bad type")]
fn test_read_int(data: Value, want: Option<i64>) {
    let got = success(data).read_int();
    match want {
        Some(want) => assert_eq!(got.unwrap(), want),
        None => assert!(got.is_err()),
    }
}

#[test_case(list(json!(["foo"])), Some("foo"); "simple")]
#[test_case(list(json!([])), None; "empty")]
#[test_case(list(json!([true])), None; "bad type")]
fn test_read_string(data: Value, want: Option<&str>) {
    let got = success(data).read_string();
    match want {
        Some(want) => assert_eq!(got.unwrap(), want),
        None => assert!(got.is_err()),
    }
}

#[test]
fn test_empty_result_error() {
    let err = success(list(json!([]))).read_int().unwrap_err();
    assert!(matches!(err, GremlinError::EmptyResult));
}
