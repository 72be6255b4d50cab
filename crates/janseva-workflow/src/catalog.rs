//! # Built-In Service Catalog
//!
//! The services this kiosk build offers, shipped as immutable
//! configuration. Which steps a flow walks through, which fields each
//! step collects, and which documents must be attested all live here —
//! the state machine contains no per-service conditionals.
//!
//! Reference prefixes (`NVR`, `COR`, `LCK`, `PVC`) tag the record
//! family of locally fabricated reference numbers so status lookups can
//! disambiguate them.

use janseva_core::{
    DocumentSpec, FieldFormat, FieldSpec, LookupKind, ServiceDefinition, ServiceId, StepKind,
    StepSpec,
};

fn step(kind: StepKind, title: &str, fields: Vec<FieldSpec>) -> StepSpec {
    StepSpec {
        kind,
        title: title.to_string(),
        fields,
    }
}

fn voter_new_registration() -> ServiceDefinition {
    ServiceDefinition {
        id: ServiceId::new("voter-new-registration"),
        label_en: "New Voter Registration".to_string(),
        label_hi: "नया मतदाता पंजीकरण".to_string(),
        reference_prefix: Some("NVR".to_string()),
        lookup: None,
        eta_description: "Processed in 15-21 working days".to_string(),
        steps: vec![
            step(
                StepKind::FormEntry,
                "Personal Details",
                vec![
                    FieldSpec::required("first_name", "First Name", FieldFormat::FreeText),
                    FieldSpec::required("last_name", "Last Name", FieldFormat::FreeText),
                    FieldSpec::required(
                        "relation_name",
                        "Father's/Husband's Name",
                        FieldFormat::FreeText,
                    ),
                    FieldSpec::required("dob", "Date of Birth", FieldFormat::Date),
                    FieldSpec::required("mobile", "Mobile Number", FieldFormat::Mobile),
                    FieldSpec::optional("house_no", "House Number", FieldFormat::FreeText),
                    FieldSpec::required("street", "Street/Locality", FieldFormat::FreeText),
                    FieldSpec::required("city", "City/Village", FieldFormat::FreeText),
                    FieldSpec::required("district", "District", FieldFormat::FreeText),
                    FieldSpec::required("pincode", "PIN Code", FieldFormat::Pincode),
                ],
            ),
            step(StepKind::DocumentChecklist, "Required Documents", vec![]),
            step(StepKind::OtpVerification, "Verify Mobile Number", vec![]),
            step(StepKind::Review, "Review & Submit", vec![]),
        ],
        documents: vec![
            DocumentSpec::mandatory("Proof of Age", "आयु प्रमाण"),
            DocumentSpec::mandatory("Proof of Address", "पते का प्रमाण"),
            DocumentSpec::mandatory("Passport-Size Photograph", "पासपोर्ट आकार का फोटो"),
            DocumentSpec::optional("Aadhaar Card", "आधार कार्ड"),
        ],
    }
}

fn voter_correction() -> ServiceDefinition {
    ServiceDefinition {
        id: ServiceId::new("voter-correction"),
        label_en: "Voter Card Correction".to_string(),
        label_hi: "मतदाता कार्ड सुधार".to_string(),
        reference_prefix: Some("COR".to_string()),
        lookup: None,
        eta_description: "Processed in 7-10 working days".to_string(),
        steps: vec![
            step(
                StepKind::FormEntry,
                "Correction Details",
                vec![
                    FieldSpec::required("epic_number", "EPIC Number", FieldFormat::FreeText),
                    FieldSpec::required(
                        "field_to_correct",
                        "Field to Correct",
                        FieldFormat::FreeText,
                    ),
                    FieldSpec::required("corrected_value", "Corrected Value", FieldFormat::FreeText),
                    FieldSpec::required("mobile", "Mobile Number", FieldFormat::Mobile),
                ],
            ),
            step(StepKind::DocumentChecklist, "Supporting Documents", vec![]),
            step(StepKind::OtpVerification, "Verify Mobile Number", vec![]),
            step(StepKind::Review, "Review & Submit", vec![]),
        ],
        documents: vec![
            DocumentSpec::mandatory("Existing Voter Card", "मौजूदा मतदाता कार्ड"),
            DocumentSpec::mandatory(
                "Proof of the Corrected Detail",
                "सुधारे गए विवरण का प्रमाण",
            ),
        ],
    }
}

fn voter_search() -> ServiceDefinition {
    ServiceDefinition {
        id: ServiceId::new("voter-search"),
        label_en: "Search Voter Record".to_string(),
        label_hi: "मतदाता रिकॉर्ड खोजें".to_string(),
        reference_prefix: None,
        lookup: Some(LookupKind::Search),
        eta_description: String::new(),
        steps: vec![step(
            StepKind::FormEntry,
            "Search Criteria",
            vec![
                FieldSpec::required("name", "Name", FieldFormat::FreeText),
                FieldSpec::optional("relation_name", "Father's/Husband's Name", FieldFormat::FreeText),
                FieldSpec::optional("district", "District", FieldFormat::FreeText),
                FieldSpec::optional("identifier", "EPIC Number", FieldFormat::FreeText),
            ],
        )],
        documents: vec![],
    }
}

fn aadhaar_download() -> ServiceDefinition {
    ServiceDefinition {
        id: ServiceId::new("aadhaar-download"),
        label_en: "Download Aadhaar".to_string(),
        label_hi: "आधार डाउनलोड करें".to_string(),
        reference_prefix: None,
        lookup: Some(LookupKind::Download),
        eta_description: String::new(),
        steps: vec![step(
            StepKind::FormEntry,
            "Identity Details",
            vec![
                FieldSpec::required("aadhaar", "Aadhaar Number", FieldFormat::Aadhaar),
                FieldSpec::required("dob", "Date of Birth", FieldFormat::Date),
            ],
        )],
        documents: vec![],
    }
}

fn aadhaar_lock_unlock() -> ServiceDefinition {
    ServiceDefinition {
        id: ServiceId::new("aadhaar-lock-unlock"),
        label_en: "Lock/Unlock Aadhaar Biometrics".to_string(),
        label_hi: "आधार बायोमेट्रिक्स लॉक/अनलॉक".to_string(),
        reference_prefix: Some("LCK".to_string()),
        lookup: None,
        eta_description: "Effective immediately after processing".to_string(),
        steps: vec![
            step(
                StepKind::FormEntry,
                "Lock/Unlock Request",
                vec![
                    FieldSpec::required("aadhaar", "Aadhaar Number", FieldFormat::Aadhaar),
                    FieldSpec::required("action", "Action (lock or unlock)", FieldFormat::FreeText),
                    FieldSpec::required("mobile", "Registered Mobile Number", FieldFormat::Mobile),
                ],
            ),
            step(StepKind::OtpVerification, "Verify Mobile Number", vec![]),
            step(StepKind::Review, "Review & Confirm", vec![]),
        ],
        documents: vec![],
    }
}

fn aadhaar_pvc_order() -> ServiceDefinition {
    ServiceDefinition {
        id: ServiceId::new("aadhaar-pvc-order"),
        label_en: "Order Aadhaar PVC Card".to_string(),
        label_hi: "आधार पीवीसी कार्ड ऑर्डर करें".to_string(),
        reference_prefix: Some("PVC".to_string()),
        lookup: None,
        eta_description: "Delivered by post in 10-15 working days".to_string(),
        steps: vec![
            step(
                StepKind::FormEntry,
                "Order Details",
                vec![
                    FieldSpec::required("aadhaar", "Aadhaar Number", FieldFormat::Aadhaar),
                    FieldSpec::required("mobile", "Registered Mobile Number", FieldFormat::Mobile),
                    FieldSpec::required("pincode", "Delivery PIN Code", FieldFormat::Pincode),
                ],
            ),
            step(StepKind::OtpVerification, "Verify Mobile Number", vec![]),
            step(StepKind::Review, "Review & Order", vec![]),
        ],
        documents: vec![],
    }
}

fn status_check() -> ServiceDefinition {
    ServiceDefinition {
        id: ServiceId::new("status-check"),
        label_en: "Track Application Status".to_string(),
        label_hi: "आवेदन की स्थिति देखें".to_string(),
        reference_prefix: None,
        lookup: Some(LookupKind::Status),
        eta_description: String::new(),
        steps: vec![step(
            StepKind::FormEntry,
            "Application Reference",
            vec![FieldSpec::required(
                "reference_number",
                "Reference Number",
                FieldFormat::FreeText,
            )],
        )],
        documents: vec![],
    }
}

/// All services this kiosk build offers, in menu order.
pub fn builtin_services() -> Vec<ServiceDefinition> {
    vec![
        voter_new_registration(),
        voter_correction(),
        voter_search(),
        aadhaar_download(),
        aadhaar_lock_unlock(),
        aadhaar_pvc_order(),
        status_check(),
    ]
}

/// The service definition for `id`, if offered.
pub fn find(id: &ServiceId) -> Option<ServiceDefinition> {
    builtin_services().into_iter().find(|s| &s.id == id)
}

// ─── Tests ───────────────────────────────────────────────────────────
