//! # Response Normalization Tests
//!
//! Checks the mapping from every SheetDB body shape onto a row list.

use serde_json::json;
use sheetdb::{normalize, CellValue, ResponseBody, Row};

fn expected_rows() -> Vec<Row> {
    serde_json::from_value(json!([
        { "Date": "2024-01-02", "Close": "185.64" },
        { "Date": "2024-01-03", "Close": "184.25" }
    ]))
    .unwrap()
}

#[test]
fn test_bare_list_is_returned_unchanged() {
    let body = json!([
        { "Date": "2024-01-02", "Close": "185.64" },
        { "Date": "2024-01-03", "Close": "184.25" }
    ]);

    assert!(matches!(
        ResponseBody::from_value(body.clone()),
        ResponseBody::Rows(_)
    ));
    assert_eq!(normalize(body), expected_rows());
}

#[test]
fn test_wrapped_list_is_unwrapped() {
    let body = json!({
        "data": [
            { "Date": "2024-01-02", "Close": "185.64" },
            { "Date": "2024-01-03", "Close": "184.25" }
        ],
        "meta": { "total": 2 }
    });

    assert!(matches!(
        ResponseBody::from_value(body.clone()),
        ResponseBody::Wrapped(_)
    ));
    assert_eq!(normalize(body), expected_rows());
}

#[test]
fn test_empty_list_stays_empty() {
    assert_eq!(ResponseBody::from_value(json!([])), ResponseBody::Rows(vec![]));
    assert!(normalize(json!({ "data": [] })).is_empty());
}

#[test]
fn test_unrecognized_shapes_become_empty() {
    let bodies = [
        json!(null),
        json!(42),
        json!("rows"),
        json!(true),
        json!({ "error": "Sheet not found" }),
        json!({ "data": "not a list" }),
        json!({ "data": null }),
    ];

    for body in bodies {
        assert_eq!(
            ResponseBody::from_value(body.clone()),
            ResponseBody::Unrecognized,
            "Expected {body} to be unrecognized"
        );
        assert!(normalize(body).is_empty());
    }
}

#[test]
fn test_cell_values_keep_their_json_type() {
    let rows = normalize(json!([
        { "Ticker": "AAPL", "Volume": 5_800_000, "Change": -0.75, "Active": true, "Note": null }
    ]));

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row["Ticker"], CellValue::String("AAPL".to_string()));
    assert_eq!(row["Volume"], CellValue::from(5_800_000_i64));
    assert_eq!(row["Active"], CellValue::Bool(true));
    assert!(row["Note"].is_null());
    match &row["Change"] {
        CellValue::Number(n) => assert_eq!(n.as_f64(), Some(-0.75)),
        other => panic!("Expected a number, got {other:?}"),
    }
}

#[test]
fn test_nested_cells_keep_the_whole_list() {
    let body = json!([
        { "Date": "2024-01-02", "Close": "185.64" },
        { "Date": "2024-01-03", "Close": "184.25", "Meta": { "src": "x" }, "Tags": ["q1", 2] }
    ]);

    let rows = normalize(body);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["Close"], CellValue::from("185.64"));
    assert_eq!(rows[1]["Close"], CellValue::from("184.25"));
    assert_eq!(rows[1]["Meta"], CellValue::Other(json!({ "src": "x" })));
    assert_eq!(rows[1]["Tags"], CellValue::Other(json!(["q1", 2])));
}

#[test]
fn test_rows_serialize_back_to_the_original_list() {
    let body = json!({
        "data": [
            { "Ticker": "AAPL", "Volume": 5_800_000, "Meta": { "src": "x" } },
            { "Ticker": "MSFT", "Active": false, "Note": null }
        ]
    });

    let rows = normalize(body.clone());

    assert_eq!(serde_json::to_value(&rows).unwrap(), body["data"]);
}

#[test]
fn test_non_object_items_are_skipped_individually() {
    let rows = normalize(json!([
        "a",
        { "Ticker": "AAPL" },
        42,
        { "Ticker": "MSFT" }
    ]));

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["Ticker"], CellValue::from("AAPL"));
    assert_eq!(rows[1]["Ticker"], CellValue::from("MSFT"));
    assert_eq!(
        ResponseBody::from_value(json!(["a", "b"])),
        ResponseBody::Rows(vec![])
    );
}
