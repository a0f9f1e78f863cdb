use apidoc_core::metadata::ModuleSnapshot;
use apidoc_core::pipeline::{annotations, samples};
use apidoc_core::{
    AnnotationRequest, AppError, CapturingReporter, Conventions, DocumentOutcome, DocumentSet,
    FsWorkspace, MemoryWorkspace, SamplesRequest, SnapshotSession,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;

const CONTROLLER: &str = "src/v05/users_controller.rs";
const USER: &str = "src/v05/models/user.rs";
const DESCRIPTIONS: &str = "src/docs/descriptions.rs";
const REGISTRY: &str = "src/swagger/external_models.rs";
const USER_EXAMPLE: &str = "src/swagger/response_examples/user_response_example.rs";

fn session() -> SnapshotSession {
    let api: ModuleSnapshot = serde_json::from_value(json!({
        "module": "acme_api",
        "types": [
            { "name": "acme_api::v05::users_controller::UsersController",
              "base": "web::ControllerBase",
              "methods": [
                { "name": "get_user",
                  "parameters": [ { "name": "user_id", "type": "String" } ],
                  "attributes": [
                    { "name": "response", "args": [ { "int": 200 }, { "type": "acme_api::v05::models::User" } ] },
                    { "name": "response", "args": [ { "int": 404 }, { "type": "acme_api::v05::models::Problem" } ] }
                  ] }
              ] },
            { "name": "acme_api::v05::models::User",
              "properties": [
                { "name": "user_id", "type": "String" },
                { "name": "name", "type": "String" },
                { "name": "active", "type": "bool" },
                { "name": "address", "type": "acme_api::v05::models::Address" },
                { "name": "balance", "type": "emoney_shared::Money" }
              ] },
            { "name": "acme_api::v05::models::Address",
              "properties": [ { "name": "street", "type": "String" } ] },
            { "name": "acme_api::v05::models::Problem",
              "properties": [ { "name": "detail", "type": "String" } ] }
        ]
    }))
    .unwrap();
    let shared: ModuleSnapshot = serde_json::from_value(json!({
        "module": "emoney_shared",
        "types": [
            { "name": "emoney_shared::Money",
              "properties": [ { "name": "amount_cents", "type": "i64" },
                              { "name": "currency", "type": "String" } ] }
        ]
    }))
    .unwrap();
    let web: ModuleSnapshot = serde_json::from_value(json!({
        "module": "web",
        "types": [ { "name": "web::ControllerBase" } ]
    }))
    .unwrap();
    SnapshotSession::from_snapshots(vec![api, shared, web])
}

fn conventions() -> Conventions {
    Conventions {
        allowed_module_prefixes: vec!["emoney".into()],
        ..Conventions::default()
    }
}

fn controller_source() -> &'static str {
    r#"use axum::extract::Path;

pub struct UsersController;

impl UsersController {
    #[utoipa::path(get, path = "/users/{user_id}")]
    pub async fn get_user(
        Path(user_id): Path<String>,
    ) -> String {
        user_id
    }
}
"#
}

fn user_source() -> &'static str {
    r#"use serde::Serialize;

#[derive(Serialize)]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub active: bool,
    pub address: Address,
    pub balance: Money,
}
"#
}

fn descriptions_source() -> &'static str {
    "pub struct Descriptions;

impl Descriptions {
    pub const Unrelated: &str = \"Unrelated\";
}
"
}

fn registry_source() -> &'static str {
    "use std::any::TypeId;

pub fn external_model_types() -> Vec<TypeId> {
    let external_model_types = [
        TypeId::of::<crate::v05::Legacy>(),
    ];
    external_model_types.to_vec()
}
"
}

fn workspace() -> MemoryWorkspace {
    MemoryWorkspace::new()
        .with_document(CONTROLLER, controller_source())
        .with_document(USER, user_source())
        .with_document(DESCRIPTIONS, descriptions_source())
        .with_document(REGISTRY, registry_source())
}

fn annotation_request(dry_run: bool) -> AnnotationRequest {
    AnnotationRequest {
        controller: Some("Users".into()),
        version_prefix: "v0.5".into(),
        imports: vec!["crate::docs::Descriptions".into()],
        dry_run,
        ..AnnotationRequest::default()
    }
}

#[test]
fn test_annotations_patch_models_controller_and_registries() {
    let s = session();
    let mut docs = workspace();
    let mut reporter = CapturingReporter::default();

    let report = annotations::run(
        &s,
        &conventions(),
        &annotation_request(false),
        &mut docs,
        &mut reporter,
    )
    .unwrap();

    assert_eq!(
        report.outcome("v05::users_controller::UsersController"),
        Some(&DocumentOutcome::Written)
    );
    assert_eq!(report.outcome("v05::models::User"), Some(&DocumentOutcome::Written));
    assert!(matches!(
        report.outcome("v05::models::Address"),
        Some(DocumentOutcome::Skipped(_))
    ));
    assert!(matches!(
        report.outcome("emoney_shared::Money"),
        Some(DocumentOutcome::Skipped(_))
    ));
    assert!(report.outcome("v05::models::Problem").is_none());
    assert_eq!(report.outcome("descriptions.rs"), Some(&DocumentOutcome::Written));
    assert_eq!(report.outcome("external_models.rs"), Some(&DocumentOutcome::Written));

    let user = docs.text(USER).unwrap();
    assert!(user.starts_with("use serde::Serialize;\nuse crate::docs::Descriptions;\n"));
    assert!(user.contains(
        "    #[schema(description = Descriptions::UserUserId)]\n    pub user_id: String,"
    ));
    assert!(user.contains(
        "    #[schema(description = Descriptions::UserBalance)]\n    pub balance: Money,"
    ));

    let controller = docs.text(CONTROLLER).unwrap();
    assert!(controller.contains(
        "        #[param(description = Descriptions::UsersControllerUserId)]\n        Path(user_id): Path<String>,"
    ));

    let descriptions = docs.text(DESCRIPTIONS).unwrap();
    for region in [
        "UsersController",
        "User",
        "v05::models::Address",
        "emoney_shared::Money",
    ] {
        assert_eq!(
            descriptions.matches(&format!("// region: {}\n", region)).count(),
            1,
            "region {region}"
        );
    }
    assert!(descriptions.contains("    pub const UserName: &str = \"UserName\";"));
    assert!(descriptions.contains("    pub const AddressStreet: &str = \"AddressStreet\";"));
    assert!(descriptions.contains("    pub const MoneyAmountCents: &str = \"MoneyAmountCents\";"));
    assert!(descriptions.contains("    pub const Unrelated: &str = \"Unrelated\";"));

    let registry = docs.text(REGISTRY).unwrap();
    assert!(registry.contains(
        "        TypeId::of::<crate::v05::Legacy>(),
        TypeId::of::<crate::v05::models::Address>(),
        TypeId::of::<emoney_shared::Money>(),
    ];"
    ));
}

#[test]
fn test_annotations_second_run_changes_nothing() {
    let s = session();
    let mut docs = workspace();
    let mut reporter = CapturingReporter::default();
    annotations::run(&s, &conventions(), &annotation_request(false), &mut docs, &mut reporter)
        .unwrap();
    let after_first: Vec<String> = [CONTROLLER, USER, DESCRIPTIONS, REGISTRY]
        .iter()
        .map(|p| docs.text(p).unwrap().to_string())
        .collect();

    let report =
        annotations::run(&s, &conventions(), &annotation_request(false), &mut docs, &mut reporter)
            .unwrap();
    let after_second: Vec<String> = [CONTROLLER, USER, DESCRIPTIONS, REGISTRY]
        .iter()
        .map(|p| docs.text(p).unwrap().to_string())
        .collect();

    assert_eq!(after_first, after_second);
    assert_eq!(report.outcome("v05::models::User"), Some(&DocumentOutcome::Unchanged));
    assert_eq!(report.outcome("descriptions.rs"), Some(&DocumentOutcome::Unchanged));
    assert_eq!(report.outcome("external_models.rs"), Some(&DocumentOutcome::Unchanged));
}

#[test]
fn test_annotations_dry_run_prints_only() {
    let s = session();
    let mut docs = workspace();
    let mut reporter = CapturingReporter::default();

    let report =
        annotations::run(&s, &conventions(), &annotation_request(true), &mut docs, &mut reporter)
            .unwrap();

    assert_eq!(report.outcome("v05::models::User"), Some(&DocumentOutcome::Printed));
    assert_eq!(docs.text(USER), Some(user_source()));
    assert_eq!(docs.text(DESCRIPTIONS), Some(descriptions_source()));

    let output = reporter.output();
    assert!(output.contains(USER));
    assert!(output.contains("#[schema(description = Descriptions::UserUserId)]"));
    assert!(output.contains("// region: User"));
}

const MODELS_MODULE: &str = "src/v05/models/mod.rs";

fn models_module_source() -> &'static str {
    r#"mod user;

pub struct Address {
    pub street: String,
}
"#
}

#[test]
fn test_annotations_prefer_file_named_after_type() {
    let s = session();
    let mut docs = workspace().with_document(MODELS_MODULE, models_module_source());
    let mut reporter = CapturingReporter::default();

    let report =
        annotations::run(&s, &conventions(), &annotation_request(false), &mut docs, &mut reporter)
            .unwrap();

    assert_eq!(report.outcome("v05::models::User"), Some(&DocumentOutcome::Written));
    assert_eq!(report.outcome("v05::models::Address"), Some(&DocumentOutcome::Written));
    assert!(docs.text(USER).unwrap().contains("Descriptions::UserUserId"));
    assert!(docs
        .text(MODELS_MODULE)
        .unwrap()
        .contains("    #[schema(description = Descriptions::AddressStreet)]\n    pub street: String,"));
}

#[test]
fn test_annotations_print_shared_document_once() {
    let s = session();
    let shared = r#"pub struct User {
    pub user_id: String,
    pub name: String,
}

pub struct Address {
    pub street: String,
}
"#;
    let mut docs = MemoryWorkspace::new()
        .with_document(CONTROLLER, controller_source())
        .with_document(MODELS_MODULE, shared)
        .with_document(DESCRIPTIONS, descriptions_source())
        .with_document(REGISTRY, registry_source());
    let mut reporter = CapturingReporter::default();

    let report =
        annotations::run(&s, &conventions(), &annotation_request(true), &mut docs, &mut reporter)
            .unwrap();

    assert_eq!(report.outcome("v05::models::User"), Some(&DocumentOutcome::Printed));
    assert_eq!(report.outcome("v05::models::Address"), Some(&DocumentOutcome::Printed));
    assert_eq!(
        reporter.lines.iter().filter(|line| *line == MODELS_MODULE).count(),
        1
    );
    assert_eq!(docs.text(MODELS_MODULE), Some(shared));

    let output = reporter.output();
    assert_eq!(output.matches("pub const AddressStreet").count(), 1);
    assert_eq!(output.matches("pub const UserUserId").count(), 1);
}

#[test]
fn test_annotations_single_type() {
    let s = session();
    let mut docs = workspace();
    let mut reporter = CapturingReporter::default();
    let request = AnnotationRequest {
        type_name: Some("v05::models::User".into()),
        ..AnnotationRequest::default()
    };

    let report = annotations::run(&s, &conventions(), &request, &mut docs, &mut reporter).unwrap();

    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.outcome("v05::models::User"), Some(&DocumentOutcome::Written));
    assert_eq!(docs.text(CONTROLLER), Some(controller_source()));
    assert_eq!(docs.text(REGISTRY), Some(registry_source()));
}

#[test]
fn test_missing_target_is_an_error() {
    let s = session();
    let mut docs = workspace();
    let mut reporter = CapturingReporter::default();

    let err = annotations::run(
        &s,
        &conventions(),
        &AnnotationRequest::default(),
        &mut docs,
        &mut reporter,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::MissingArgument(_)));

    let err = samples::run(
        &s,
        &conventions(),
        &SamplesRequest::default(),
        &mut docs,
        &mut reporter,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::MissingArgument(_)));
}

#[test]
fn test_missing_descriptions_document_is_skipped() {
    let s = session();
    let mut docs = MemoryWorkspace::new().with_document(USER, user_source());
    let mut reporter = CapturingReporter::default();

    let report =
        annotations::run(&s, &conventions(), &annotation_request(false), &mut docs, &mut reporter)
            .unwrap();

    assert_eq!(report.outcome("v05::models::User"), Some(&DocumentOutcome::Written));
    assert!(matches!(
        report.outcome("descriptions.rs"),
        Some(DocumentOutcome::Skipped(_))
    ));
    assert!(report.skipped() >= 3);
}

fn samples_request(dry_run: bool) -> SamplesRequest {
    SamplesRequest {
        controller: Some("Users".into()),
        version_prefix: "v05".into(),
        dry_run,
        ..SamplesRequest::default()
    }
}

const USER_EXAMPLE_SOURCE: &str = r#"use crate::v05::models::User;
use crate::swagger::ExamplesProvider;

pub struct UserResponseExample;

impl ExamplesProvider<User> for UserResponseExample {
    fn get_examples(&self) -> User {
        User {
            name: "Ada".into(),
        }
    }
}
"#;

#[test]
fn test_samples_populate_existing_and_create_missing() {
    let s = session();
    let mut docs = MemoryWorkspace::new().with_document(USER_EXAMPLE, USER_EXAMPLE_SOURCE);
    let mut reporter = CapturingReporter::default();

    let report = samples::run(&s, &conventions(), &samples_request(false), &mut docs, &mut reporter)
        .unwrap();

    assert_eq!(report.outcome("v05::models::User"), Some(&DocumentOutcome::Written));
    assert_eq!(report.outcome("v05::models::Address"), Some(&DocumentOutcome::Created));
    assert_eq!(report.outcome("emoney_shared::Money"), Some(&DocumentOutcome::Created));
    assert!(report.outcome("v05::models::Problem").is_none());

    let user = docs.text(USER_EXAMPLE).unwrap();
    assert!(user.contains(
        "        User {
            name: \"Ada\".into(),
            user_id: uuid::Uuid::new_v4().to_string(),
            active: false,
            address: Default::default(),
            balance: Default::default(),
        }"
    ));

    let address = docs
        .text("swagger/response_examples/address_response_example.rs")
        .unwrap();
    assert!(address.starts_with("use crate::v05::models::Address;\n"));
    assert!(address.contains("impl ExamplesProvider<Address> for AddressResponseExample {"));
    assert!(address.contains("            street: Descriptions::AddressStreet.into(),"));

    let money = docs
        .text("swagger/response_examples/money_response_example.rs")
        .unwrap();
    assert!(money.starts_with("use emoney_shared::Money;\n"));
    assert!(money.contains("            currency: Descriptions::MoneyCurrency.into(),"));
    assert!(money.contains("            amount_cents: "));

    let again =
        samples::run(&s, &conventions(), &samples_request(false), &mut docs, &mut reporter)
            .unwrap();
    assert_eq!(again.outcome("v05::models::User"), Some(&DocumentOutcome::Unchanged));
    assert_eq!(again.outcome("v05::models::Address"), Some(&DocumentOutcome::Unchanged));
}

#[test]
fn test_samples_dry_run_and_unknown_type() {
    let s = session();
    let mut docs = MemoryWorkspace::new();
    let mut reporter = CapturingReporter::default();

    let report = samples::run(&s, &conventions(), &samples_request(true), &mut docs, &mut reporter)
        .unwrap();
    assert_eq!(report.outcome("v05::models::User"), Some(&DocumentOutcome::Printed));
    assert!(docs.documents().is_empty());
    assert!(reporter.output().contains("user_response_example.rs"));

    let request = SamplesRequest {
        type_name: Some("v05::models::Nope".into()),
        ..SamplesRequest::default()
    };
    let report = samples::run(&s, &conventions(), &request, &mut docs, &mut reporter).unwrap();
    assert_eq!(report.skipped(), 1);
}

#[test]
fn test_annotations_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    for (path, text) in [
        (USER, user_source()),
        (DESCRIPTIONS, descriptions_source()),
        (REGISTRY, registry_source()),
    ] {
        let full = dir.path().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, text).unwrap();
    }
    fs::create_dir_all(dir.path().join("target/debug")).unwrap();
    fs::write(dir.path().join("target/debug/user.rs"), user_source()).unwrap();

    let s = session();
    let mut docs = FsWorkspace::open(dir.path()).unwrap();
    assert_eq!(docs.documents().len(), 3);
    let mut reporter = CapturingReporter::default();
    let request = AnnotationRequest {
        type_name: Some("v05::models::User".into()),
        imports: vec!["crate::docs::Descriptions".into()],
        ..AnnotationRequest::default()
    };

    annotations::run(&s, &conventions(), &request, &mut docs, &mut reporter).unwrap();

    let user = fs::read_to_string(dir.path().join(USER)).unwrap();
    assert!(user.contains("#[schema(description = Descriptions::UserActive)]"));
    let descriptions = fs::read_to_string(dir.path().join(DESCRIPTIONS)).unwrap();
    assert!(descriptions.contains("// endregion: User"));
    let untouched = fs::read_to_string(dir.path().join("target/debug/user.rs")).unwrap();
    assert_eq!(untouched, user_source());
}
