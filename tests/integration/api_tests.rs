use crate::helpers::{delete, get_json, post_csv, post_json, start_api};
use crate::mock_gemini::MockGeminiServer;
use base64::Engine;
use hyper::StatusCode;
use serde_json::json;

async fn setup() -> (MockGeminiServer, String) {
    let mock = MockGeminiServer::new();
    let gemini_url = mock.start().await;
    let api = start_api(&gemini_url).await;
    (mock, api)
}

fn image_payload() -> serde_json::Value {
    let content = base64::engine::general_purpose::STANDARD.encode(b"fake jpeg bytes");
    json!({ "content": content, "mimeType": "image/jpeg" })
}

fn extraction(certificate_id: &str, student_name: &str) -> serde_json::Value {
    json!({
        "isAcademicCertificate": true,
        "studentName": student_name,
        "certificateId": certificate_id,
        "tamperingDetected": false,
        "tamperingScore": 0
    })
}

async fn seed_record(api: &str, certificate_id: &str, student_name: &str) {
    let (status, _) = post_json(
        api,
        "/api/records",
        json!({ "certificateId": certificate_id, "studentName": student_name }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_record_crud_lifecycle() {
    let (_mock, api) = setup().await;

    let (status, records) = get_json(&api, "/api/records").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(records.as_array().unwrap().len(), 0);

    let (status, created) = post_json(
        &api,
        "/api/records",
        json!({
            "certificateId": "4MW22CS145",
            "studentName": "Mohammed Ali",
            "degreeName": "Bachelor of Engineering",
            "institution": "VTU",
            "graduationYear": 2025
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["status"], "active");

    let (_, records) = get_json(&api, "/api/records").await;
    assert_eq!(records.as_array().unwrap().len(), 1);
    assert_eq!(records[0]["certificateId"], "4MW22CS145");

    let (status, _) = delete(&api, &format!("/api/records/{}", id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = delete(&api, &format!("/api/records/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_csv_import_skips_incomplete_rows() {
    let (_mock, api) = setup().await;

    let csv = "register_number,student_name,semester,exam_month_year,total_marks,class_or_result,college\n\
               4MW22CS183,VINYAS,6,JUL-2025,,PASS,VTU\n\
               4MW22CS999,,6,JUL-2025,,PASS,VTU\n\
               4MW22CS145,Mohammed Ali,6,JUL-2025,,PASS,VTU";

    let (status, body) = post_csv(&api, "/api/records/import", csv).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["imported"], 2);

    let (_, records) = get_json(&api, "/api/records").await;
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 2);
    // Newest first: the last imported row lands on top.
    assert_eq!(records[0]["certificateId"], "4MW22CS145");
    assert_eq!(records[0]["degreeName"], "Semester 6");
    assert_eq!(records[0]["graduationYear"], 2025);
}

#[tokio::test]
async fn test_verify_genuine_document() {
    let (mock, api) = setup().await;
    seed_record(&api, "4MW22CS145", "Mohammed Ali").await;
    mock.set_extraction(Some(extraction("4MW22CS145", "Mohammed Ali")));

    let (status, result) = post_json(&api, "/api/verify", image_payload()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["isGenuine"], true);
    assert_eq!(result["confidenceScore"], 100);
    assert_eq!(result["matchedRecord"]["certificateId"], "4MW22CS145");
    assert_eq!(result["analysisNotes"], "Record found in registry.");
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn test_verify_matches_despite_id_punctuation() {
    let (mock, api) = setup().await;
    seed_record(&api, "4MW22CS145", "Mohammed Ali").await;
    mock.set_extraction(Some(extraction("4MW-22-CS-145", "Mohammed Ali")));

    let (status, result) = post_json(&api, "/api/verify", image_payload()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["isGenuine"], true);
}

#[tokio::test]
async fn test_verify_name_mismatch_is_no_match() {
    let (mock, api) = setup().await;
    seed_record(&api, "4MW22CS145", "Mohammed Ali").await;
    mock.set_extraction(Some(extraction("4MW22CS145", "Someone Else")));

    let (status, result) = post_json(&api, "/api/verify", image_payload()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["isGenuine"], false);
    assert_eq!(result["confidenceScore"], 0);
    assert!(result.get("matchedRecord").is_none());
}

#[tokio::test]
async fn test_verify_non_academic_document() {
    let (mock, api) = setup().await;
    seed_record(&api, "4MW22CS145", "Mohammed Ali").await;
    mock.set_extraction(Some(json!({
        "isAcademicCertificate": false,
        "studentName": "",
        "certificateId": ""
    })));

    let (status, result) = post_json(&api, "/api/verify", image_payload()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["isGenuine"], false);
    assert_eq!(result["confidenceScore"], 0);
    assert!(result["analysisNotes"]
        .as_str()
        .unwrap()
        .contains("not appear to be an academic"));
}

#[tokio::test]
async fn test_verify_tampered_document_is_found_but_untrusted() {
    let (mock, api) = setup().await;
    seed_record(&api, "4MW22CS145", "Mohammed Ali").await;
    mock.set_extraction(Some(json!({
        "isAcademicCertificate": true,
        "studentName": "Mohammed Ali",
        "certificateId": "4MW22CS145",
        "tamperingDetected": true,
        "tamperingScore": 80,
        "forensicNotes": "Font inconsistency around the USN."
    })));

    let (status, result) = post_json(&api, "/api/verify", image_payload()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["isGenuine"], false);
    assert_eq!(result["confidenceScore"], 45);
    assert_eq!(result["tamperingDetected"], true);
    assert_eq!(result["matchedRecord"]["certificateId"], "4MW22CS145");
    assert_eq!(result["analysisNotes"], "Font inconsistency around the USN.");
}

#[tokio::test]
async fn test_verify_extraction_failure_is_bad_gateway() {
    let (mock, api) = setup().await;
    seed_record(&api, "4MW22CS145", "Mohammed Ali").await;
    // No queued extraction: the mock answers HTTP 500.
    mock.set_extraction(None);

    let (status, body) = post_json(&api, "/api/verify", image_payload()).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn test_verify_rejects_bad_base64_before_extraction() {
    let (mock, api) = setup().await;

    let (status, body) = post_json(
        &api,
        "/api/verify",
        json!({ "content": "not base64!!!", "mimeType": "image/jpeg" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("base64"));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (_mock, api) = setup().await;
    let (status, _) = get_json(&api, "/api/unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
