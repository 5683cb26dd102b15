// End-to-end: questionnaire in, readable .docx out.

use std::io::{Cursor, Read};

use chrono::{TimeZone, Utc};
use pw_policy::questions::ids;
use pw_policy::{Industry, OrganizationProfile, QuestionnaireAnswers, SizeClass};
use pw_render::{PolicyGenerator, RenderConfig};
use tempfile::TempDir;
use zip::ZipArchive;

fn document_xml(bytes: &[u8]) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut part = archive.by_name("word/document.xml").unwrap();
    let mut xml = String::new();
    part.read_to_string(&mut xml).unwrap();
    xml
}

#[test]
fn generated_document_reflects_answers() {
    let tmp = TempDir::new().unwrap();
    let generator = PolicyGenerator::with_config(RenderConfig::new(tmp.path()));
    let profile = OrganizationProfile::new("Northwind Clinic", Industry::Healthcare, SizeClass::Ig2)
        .with_mfa(true)
        .with_mdm(true);
    let answers: QuestionnaireAnswers = serde_json::from_str(
        r#"{
            "q23_byod": "Allowed with MDM",
            "q10_mfa_name": "Duo",
            "q34_incident_manager_name": "Dana Lee"
        }"#,
    )
    .unwrap();
    assert!(answers.get(ids::BYOD).is_some());

    let at = Utc.with_ymd_and_hms(2025, 9, 10, 11, 12, 13).unwrap();
    let result = generator.generate_at(profile, &answers, at).unwrap();
    assert!(result
        .filename
        .starts_with("Northwind_Clinic_Acceptable_Use_Policy_20250910_111213_"));

    let xml = document_xml(&std::fs::read(&result.path).unwrap());
    assert!(xml.contains("Northwind Clinic"));
    assert!(xml.contains("Dana Lee"));
    assert!(xml.contains("Personal Devices (BYOD)"));
    assert!(xml.contains("September 10, 2025"));
    assert!(!xml.contains("{{"));
}

#[test]
fn identical_requests_in_separate_dirs_write_identical_bytes() {
    let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
    let answers = QuestionnaireAnswers::new().with(ids::BYOD, "Not allowed");
    let mut outputs = Vec::new();
    for _ in 0..2 {
        let tmp = TempDir::new().unwrap();
        let generator = PolicyGenerator::with_config(RenderConfig::new(tmp.path()));
        let profile = OrganizationProfile::new("Acme Co", Industry::Retail, SizeClass::Ig1);
        let result = generator.generate_at(profile, &answers, at).unwrap();
        outputs.push((result.filename, std::fs::read(&result.path).unwrap()));
    }
    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn located_file_matches_result() {
    let tmp = TempDir::new().unwrap();
    let generator = PolicyGenerator::with_config(RenderConfig::new(tmp.path()));
    let profile = OrganizationProfile::new("Acme Co", Industry::Other, SizeClass::Ig1);
    let answers = QuestionnaireAnswers::new().with(ids::BYOD, "Guest network only");
    let result = generator.generate(profile, &answers).unwrap();
    let located = generator.renderer().locate(&result.filename).unwrap();
    assert_eq!(located, result.path);
}
