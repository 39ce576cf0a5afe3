//! Purely local checks over an in-memory facility record.

use onboard_types::FacilityRecord;
use serde_json::Value;

/// Document status fields that must all read `APPROVED` for a facility's
/// paperwork to count as complete.
pub const DOCUMENT_STATUS_FIELDS: [&str; 11] = [
    "wregisAssignmentStatus",
    "financeAgreementStatus",
    "solarInstallationContractStatus",
    "interconnectionAgreementStatus",
    "ptoLetterStatus",
    "singleLineDiagramStatus",
    "sitePlanStatus",
    "panelInverterDatasheetStatus",
    "revenueMeterDataStatus",
    "utilityMeterPhotoStatus",
    "acknowledgementOfStationServiceStatus",
];

/// Fields a residential facility must have filled in before its details
/// count as complete.
pub const REQUIRED_FACILITY_FIELDS: [&str; 9] = [
    "commercialOperationDate",
    "interconnectedUtilityId",
    "eiaPlantId",
    "energyStorageCapacity",
    "hasOnSiteLoad",
    "hasNetMetering",
    "wregisEligibilityDate",
    "wregisId",
    "rpsId",
];

const APPROVED: &str = "APPROVED";
const VERIFIED: &str = "verified";
const NOT_APPLICABLE: &str = "N/A";

/// The facility's `status` is `verified`, ignoring case.
pub fn is_verified(facility: &FacilityRecord) -> bool {
    facility
        .status()
        .map(|status| status.trim().eq_ignore_ascii_case(VERIFIED))
        .unwrap_or(false)
}

/// Every tracked document status is `APPROVED`, ignoring case.
///
/// Absent or non-string fields count as not approved.
pub fn documents_approved(facility: &FacilityRecord) -> bool {
    pending_documents(facility).is_empty()
}

/// Document status fields that are not yet approved.
pub fn pending_documents(facility: &FacilityRecord) -> Vec<&'static str> {
    DOCUMENT_STATUS_FIELDS
        .iter()
        .copied()
        .filter(|field| {
            !facility
                .str_field(field)
                .map(|status| status.trim().eq_ignore_ascii_case(APPROVED))
                .unwrap_or(false)
        })
        .collect()
}

/// Verified outright, or all paperwork approved.
pub fn is_verified_or_documents_approved(facility: &FacilityRecord) -> bool {
    is_verified(facility) || documents_approved(facility)
}

/// Required fields that are missing or blank.
pub fn missing_required_fields(facility: &FacilityRecord) -> Vec<&'static str> {
    REQUIRED_FACILITY_FIELDS
        .iter()
        .copied()
        .filter(|field| !facility.field(field).map(value_is_present).unwrap_or(false))
        .collect()
}

/// All required fields are filled in.
pub fn required_fields_complete(facility: &FacilityRecord) -> bool {
    missing_required_fields(facility).is_empty()
}

/// Whether a field value counts as filled in.
///
/// Booleans and numbers always do, so `false` and `0` are valid answers.
/// Strings must be non-blank and not the `N/A` placeholder.
pub fn value_is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(_) | Value::Number(_) => true,
        Value::String(s) => {
            let s = s.trim();
            !s.is_empty() && !s.eq_ignore_ascii_case(NOT_APPLICABLE)
        }
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Optional string is non-blank after trimming.
pub fn is_present(value: Option<&str>) -> bool {
    value.map(|s| !s.trim().is_empty()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn all_approved() -> FacilityRecord {
        let mut fields = Map::new();
        for field in DOCUMENT_STATUS_FIELDS {
            fields.insert(field.to_string(), json!("APPROVED"));
        }
        FacilityRecord::new(fields)
    }

    fn complete_residential() -> FacilityRecord {
        FacilityRecord::from_value(json!({
            "commercialOperationDate": "2024-03-01",
            "interconnectedUtilityId": "PGE",
            "eiaPlantId": "61234",
            "energyStorageCapacity": 0,
            "hasOnSiteLoad": false,
            "hasNetMetering": true,
            "wregisEligibilityDate": "2024-04-01",
            "wregisId": "W-100",
            "rpsId": "RPS-9"
        }))
    }

    #[test]
    fn test_all_documents_approved() {
        assert!(documents_approved(&all_approved()));
    }

    #[test]
    fn test_document_approval_case_insensitive() {
        let mut facility = all_approved();
        facility.set("ptoLetterStatus", json!("approved"));
        facility.set("sitePlanStatus", json!("Approved "));
        assert!(documents_approved(&facility));
    }

    #[test]
    fn test_any_single_document_flips_result() {
        for field in DOCUMENT_STATUS_FIELDS {
            for bad in [json!("PENDING"), json!("REJECTED"), Value::Null, json!(true)] {
                let mut facility = all_approved();
                facility.set(field, bad.clone());
                assert!(!documents_approved(&facility), "{} = {:?}", field, bad);
                assert_eq!(pending_documents(&facility), vec![field]);
            }

            let mut fields = all_approved().fields().clone();
            fields.remove(field);
            assert!(!documents_approved(&FacilityRecord::new(fields)));
        }
    }

    #[test]
    fn test_empty_facility_has_all_documents_pending() {
        assert_eq!(pending_documents(&FacilityRecord::default()).len(), 11);
    }

    #[test]
    fn test_verified_status() {
        let facility = FacilityRecord::from_value(json!({ "status": "VERIFIED" }));
        assert!(is_verified(&facility));
        assert!(is_verified_or_documents_approved(&facility));

        let pending = FacilityRecord::from_value(json!({ "status": "pending" }));
        assert!(!is_verified(&pending));
        assert!(!is_verified_or_documents_approved(&pending));
        assert!(is_verified_or_documents_approved(&all_approved()));
    }

    #[test]
    fn test_false_and_zero_count_as_present() {
        let facility = complete_residential();
        assert!(required_fields_complete(&facility));
    }

    #[test]
    fn test_blank_and_placeholder_strings_missing() {
        for bad in [json!(""), json!("   "), json!("N/A"), json!("n/a"), Value::Null] {
            let mut facility = complete_residential();
            facility.set("wregisId", bad);
            assert_eq!(missing_required_fields(&facility), vec!["wregisId"]);
        }

        let mut fields = complete_residential().fields().clone();
        fields.remove("rpsId");
        assert_eq!(
            missing_required_fields(&FacilityRecord::new(fields)),
            vec!["rpsId"]
        );
    }

    #[test]
    fn test_is_present() {
        assert!(is_present(Some("Jane Doe")));
        assert!(!is_present(Some("  ")));
        assert!(!is_present(None));
    }
}
