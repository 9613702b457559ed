use pathlab_extract::{
    ColumnBreakpoints, ExtractionResult, LayoutProfile, PageContent, PatientInfo, TestRecord,
    Token, VerticalWindow, build_records, cluster_rows, extract_page,
};
use pretty_assertions::assert_eq;

fn token(text: &str, x: f64, y: f64) -> Token {
    Token::new(text, x, y).expect("fixture token is valid")
}

fn page(text: &str, tokens: Vec<Token>) -> PageContent {
    PageContent {
        text: text.to_string(),
        tokens,
    }
}

#[test]
fn hemoglobin_row_end_to_end() {
    let tokens = vec![
        token("Hemoglobin", 10.0, 240.0),
        token("13.5", 280.0, 240.0),
        token("g/dL", 390.0, 240.0),
        token("12-16", 490.0, 240.0),
    ];

    let result = extract_page(&page("", tokens), &LayoutProfile::default())
        .expect("extraction should succeed");

    assert_eq!(
        result.tests,
        vec![TestRecord {
            test_name: "Hemoglobin".to_string(),
            result: "13.5".to_string(),
            units: "g/dL".to_string(),
            bio_ref_interval: "12-16".to_string(),
        }]
    );
}

#[test]
fn method_line_alone_in_a_row_is_filtered() {
    let tokens = vec![
        token("Hemoglobin", 10.0, 240.0),
        token("13.5", 280.0, 240.0),
        token("(Method)", 10.0, 260.0),
    ];

    let result = extract_page(&page("", tokens), &LayoutProfile::default())
        .expect("extraction should succeed");

    assert_eq!(result.tests.len(), 1);
    assert_eq!(result.tests[0].test_name, "Hemoglobin");
}

#[test]
fn empty_input_gives_empty_result() {
    let result = extract_page(&PageContent::default(), &LayoutProfile::default())
        .expect("empty input is not an error");

    assert_eq!(result, ExtractionResult::default());
    assert_eq!(result.patient_info, PatientInfo::default());
    assert!(result.tests.is_empty());
}

#[test]
fn name_is_cut_before_collected() {
    let result = extract_page(
        &page("Name: John Doe Collected: 01/01/2024 10:00AM", Vec::new()),
        &LayoutProfile::default(),
    )
    .expect("extraction should succeed");

    assert_eq!(result.patient_info.name, "John Doe");
    assert_eq!(result.patient_info.collected, "01/01/2024 10:00AM");
}

#[test]
fn tokens_outside_window_yield_no_rows() {
    let profile = LayoutProfile::default();
    let tokens = vec![
        token("Name", 10.0, 12.0),
        token("Hemoglobin", 10.0, 237.0),
        token("Signature", 10.0, 679.0),
        token("Page", 300.0, 800.0),
    ];

    let rows = cluster_rows(
        &tokens,
        profile.window,
        profile.row_threshold,
        &profile.header_labels,
    );
    assert!(rows.is_empty());
}

#[test]
fn boundary_token_goes_to_the_result_column() {
    let tokens = vec![
        token("Creatinine", 10.0, 300.0),
        token("0.9", 272.0, 300.0),
    ];

    let result = extract_page(&page("", tokens), &LayoutProfile::default())
        .expect("extraction should succeed");

    assert_eq!(result.tests[0].test_name, "Creatinine");
    assert_eq!(result.tests[0].result, "0.9");
}

#[test]
fn rows_come_out_in_document_order_whatever_the_token_order() {
    let tokens = vec![
        token("Urea", 10.0, 420.0),
        token("28", 280.0, 421.0),
        token("Sodium", 10.0, 300.0),
        token("140", 280.0, 299.0),
        token("Potassium", 10.0, 360.0),
        token("4.2", 280.0, 362.0),
    ];

    let result = extract_page(&page("", tokens), &LayoutProfile::default())
        .expect("extraction should succeed");
    let names = result
        .tests
        .iter()
        .map(|test| (test.test_name.as_str(), test.result.as_str()))
        .collect::<Vec<_>>();

    assert_eq!(
        names,
        vec![("Sodium", "140"), ("Potassium", "4.2"), ("Urea", "28")]
    );
}

#[test]
fn noise_rows_never_become_records() {
    let tokens = vec![
        token("LIVERPANEL", 10.0, 250.0),
        token("(Photometry)", 10.0, 270.0),
        token("5.1", 280.0, 290.0),
        token("g/dL", 390.0, 290.0),
        token("Albumin", 10.0, 310.0),
        token("4.2", 280.0, 310.0),
        token("TestName", 10.0, 330.0),
        token("Results", 280.0, 330.0),
    ];

    let result = extract_page(&page("", tokens), &LayoutProfile::default())
        .expect("extraction should succeed");

    assert_eq!(result.tests.len(), 1);
    for test in &result.tests {
        assert!(!test.test_name.is_empty());
        assert!(!test.test_name.starts_with('('));
        assert!(!test.test_name.contains("LIVERPANEL"));
    }
}

#[test]
fn close_tokens_share_a_row_in_every_order() {
    let base = [
        token("Total", 10.0, 500.0),
        token("Cholesterol", 45.0, 503.0),
        token("182", 280.0, 497.0),
        token("mg/dL", 390.0, 501.0),
    ];
    let orders = [[0, 1, 2, 3], [2, 3, 0, 1], [3, 1, 2, 0], [1, 0, 3, 2]];

    for order in orders {
        let tokens = order.iter().map(|&i| base[i].clone()).collect::<Vec<_>>();
        let rows = cluster_rows(&tokens, VerticalWindow::default(), 10.0, &[]);
        assert_eq!(rows.len(), 1, "order {order:?}");

        let mut members = rows[0]
            .tokens
            .iter()
            .map(|token| token.text.as_str())
            .collect::<Vec<_>>();
        members.sort_unstable();
        assert_eq!(members, vec!["182", "Cholesterol", "Total", "mg/dL"]);
    }
}

#[test]
fn first_seen_anchor_decides_ambiguous_membership() {
    let tokens = vec![
        token("A", 10.0, 300.0),
        token("B", 10.0, 308.0),
        token("C", 10.0, 316.0),
    ];
    let rows = cluster_rows(&tokens, VerticalWindow::default(), 10.0, &[]);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].anchor, 300.0);
    assert_eq!(rows[0].tokens.len(), 2);
    assert_eq!(rows[1].anchor, 316.0);

    let records = build_records(rows, &ColumnBreakpoints::default(), &[]);
    assert_eq!(records[0].test_name, "A B");
    assert_eq!(records[1].test_name, "C");
}
