use dynalist_core::{parse_url, DocumentUrl};

fn url(doc_id: &str, zoom_node_id: &str, query: &str) -> DocumentUrl {
    DocumentUrl {
        doc_id: doc_id.to_string(),
        zoom_node_id: zoom_node_id.to_string(),
        query: query.to_string(),
    }
}

#[test]
fn plain_url() {
    assert_eq!(
        parse_url("https://host/d/ABC123").unwrap(),
        url("ABC123", "", "")
    );
    assert_eq!(
        parse_url("https://dynalist.io/d/5_zeWJ0rbUeWXOu_svUrFd3h").unwrap(),
        url("5_zeWJ0rbUeWXOu_svUrFd3h", "", "")
    );
}

#[test]
fn zoom_url() {
    assert_eq!(
        parse_url("https://host/d/ABC123#z=XYZ").unwrap(),
        url("ABC123", "XYZ", "")
    );
    assert_eq!(
        parse_url("https://dynalist.io/d/5_zeWJ0rbUeWXOu_svUrFd3h#z=bdBGyB8FtmnVL2JLPWIePLdf")
            .unwrap(),
        url("5_zeWJ0rbUeWXOu_svUrFd3h", "bdBGyB8FtmnVL2JLPWIePLdf", "")
    );
}

#[test]
fn query_url() {
    assert_eq!(
        parse_url("https://dynalist.io/d/5_zeWJ0rbUeWXOu_svUrFd3h#q=pylint").unwrap(),
        url("5_zeWJ0rbUeWXOu_svUrFd3h", "", "pylint")
    );
}

#[test]
fn zoom_and_query_url() {
    let parsed = parse_url(
        "https://dynalist.io/d/5_zeWJ0rbUeWXOu_svUrFd3h#z=bdBGyB8FtmnVL2JLPWIePLdf&q=pylint",
    )
    .unwrap();
    assert_eq!(
        parsed,
        url("5_zeWJ0rbUeWXOu_svUrFd3h", "bdBGyB8FtmnVL2JLPWIePLdf", "pylint")
    );
    assert_eq!(parsed.zoom_node(), Some("bdBGyB8FtmnVL2JLPWIePLdf"));
    assert_eq!(parsed.query_text(), Some("pylint"));
}

#[test]
fn non_document_urls_fail_with_input() {
    for input in ["", "not-a-url", "https://www.example.com", "https://host/x/ABC"] {
        let err = parse_url(input).unwrap_err();
        assert_eq!(err.input, input);
        assert!(err.to_string().contains("not a document URL"));
    }
}
