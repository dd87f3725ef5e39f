use common::classify::{classify, parse_input, InputKind};
use common::config::ClientConfig;
use common::model::{CellValue, DeclaredType};
use common::requests::{Method, RequestBuilder, Session};
use common::responses::{Envelope, TableBody};
use common::table::{project, DataTableState, DraftCell, PendingAction, TableConfig};
use serde_json::json;

const GROUPS: &str = r#"{"columns":["name"],"data":[{"id":1,"name":"A"}],"dtypes":{"name":"VARCHAR"}}"#;

fn groups_config() -> TableConfig {
    TableConfig::new("groups/").with_editable_columns(["name"])
}

fn load_groups() -> DataTableState {
    let envelope = Envelope::decode(200, GROUPS).unwrap().into_table();
    assert!(envelope.ok);
    let mut state = DataTableState::new();
    state.load(envelope.into_snapshot().unwrap());
    state
}

#[test]
fn fetch_groups_yields_loaded_table() {
    let state = load_groups();
    let table = state.loaded().unwrap();
    assert_eq!(table.snapshot().rows().len(), 1);
    assert!(table.selection().is_empty());
    assert!(table.draft().is_empty());
}

#[test]
fn double_toggle_clears_selection() {
    let mut state = load_groups();
    state.toggle_select(1);
    assert!(state.loaded().unwrap().selection().contains(1));
    state.toggle_select(1);
    assert!(state.loaded().unwrap().selection().is_empty());
}

#[test]
fn successful_add_clears_draft_and_reloads() {
    let config = groups_config();
    let mut state = load_groups();
    state.edit_draft(&config, "name", "B").unwrap();

    let plan = state.submit_add(&config).unwrap().unwrap();
    assert_eq!(plan.action, PendingAction::Add);

    let builder = RequestBuilder::new(ClientConfig::new("http://api.test/").unwrap());
    let session = Session::from_token("abc");
    let request = builder
        .build(&plan.route, plan.method, &plan.payload, Some(&session))
        .unwrap();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url.as_str(), "http://api.test/groups/");
    assert_eq!(request.body.as_deref(), Some(r#"{"name":"B"}"#));

    let response = Envelope::decode(200, r#"{"result":"OK"}"#).unwrap();
    assert!(state.finish(plan.action, response.ok));
    assert!(state.loaded().unwrap().draft().is_empty());
}

#[test]
fn unauthenticated_response_has_no_table() {
    let envelope = Envelope::decode(401, r#"{"detail":"Not authenticated"}"#).unwrap();
    assert!(!envelope.ok);
    assert_eq!(envelope.status, 401);

    let table = envelope.into_table();
    assert!(table.table().is_none());
    assert!(matches!(table.body, TableBody::Failed(_)));
}

#[test]
fn integer_column_takes_fractional_numbers() {
    let dtype = DeclaredType::scalar("INTEGER");
    assert_eq!(classify(&dtype), InputKind::Number);
    assert_eq!(parse_input(&dtype, "3.5"), Ok(Some(CellValue::Number(3.5))));

    let config = TableConfig::new("records/").with_editable_columns(["amount"]);
    let body = json!({
        "columns": ["id", "amount"],
        "data": [],
        "dtypes": {"id": "INTEGER", "amount": "INTEGER"}
    });
    let mut state = DataTableState::new();
    state.load(Envelope::new(200, body).into_table().into_snapshot().unwrap());
    state.edit_draft(&config, "amount", "3.5").unwrap();

    let view = project(state.loaded().unwrap(), &config);
    match &view.draft.unwrap()[2] {
        DraftCell::Input(cell) => assert_eq!(cell.kind.html_type(), "number"),
        other => panic!("unexpected cell {other:?}"),
    }
    let plan = state.submit_add(&config).unwrap().unwrap();
    assert_eq!(plan.payload.get("amount"), Some(&json!(3.5)));
}

#[test]
fn delete_then_reload_round() {
    let config = groups_config();
    let mut state = load_groups();
    state.toggle_select(1);
    let plan = state.submit_delete(&config).unwrap();

    let builder = RequestBuilder::default();
    let request = builder
        .build(&plan.route, plan.method, &plan.payload, None)
        .unwrap();
    assert_eq!(request.method, Method::Delete);
    assert_eq!(request.body.as_deref(), Some(r#"{"id":[1]}"#));

    let failed = Envelope::decode(403, r#"{"detail":"Forbidden"}"#).unwrap();
    assert!(!state.finish(plan.action, failed.ok));
    assert!(state.loaded().unwrap().selection().contains(1));

    let plan = state.submit_delete(&config).unwrap();
    assert!(state.finish(plan.action, true));
    state.load(Envelope::decode(200, GROUPS).unwrap().into_table().into_snapshot().unwrap());
    assert!(state.loaded().unwrap().selection().is_empty());
}

#[test]
fn unreadable_number_shows_error_and_disables_add() {
    let config = TableConfig::new("records/").with_editable_columns(["amount"]);
    let body = json!({
        "columns": ["id", "amount"],
        "data": [],
        "dtypes": {"id": "INTEGER", "amount": "FLOAT"}
    });
    let mut state = DataTableState::new();
    state.load(Envelope::new(200, body).into_table().into_snapshot().unwrap());
    state.edit_draft(&config, "amount", "12").unwrap();
    state.reject_input(&config, "amount").unwrap();

    let view = project(state.loaded().unwrap(), &config);
    assert!(!view.can_add);
    match &view.draft.unwrap()[2] {
        DraftCell::Input(cell) => assert!(cell.error.is_some()),
        other => panic!("unexpected cell {other:?}"),
    }
    assert_eq!(state.submit_add(&config).unwrap(), None);
}
