use agenda_core::{
    Appointment, AppointmentStore, FieldPolicy, FileAppointmentStore, LoadIssue, StoreConfig,
};
use std::fs;
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> FileAppointmentStore {
    let config = StoreConfig::new(dir.path().join("data"), "repositorio.txt", FieldPolicy::Strict)
        .unwrap();
    FileAppointmentStore::new(&config)
}

fn appointment(id: &str, patient: &str) -> Appointment {
    Appointment::new(id, patient, "Dr. Marcos", "2025-03-14", "09:30")
}

#[test]
fn ensure_initialized_creates_directory_and_empty_file() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    assert!(!store.path().exists());

    store.ensure_initialized().unwrap();

    assert!(store.path().is_file());
    assert_eq!(fs::read_to_string(store.path()).unwrap(), "");
}

#[test]
fn ensure_initialized_does_not_truncate() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.append(&appointment("Cons01", "Ana")).unwrap();

    store.ensure_initialized().unwrap();

    assert_eq!(store.load_all().records.len(), 1);
}

#[test]
fn load_all_on_fresh_location_is_empty_and_creates_file() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let outcome = store.load_all();

    assert!(outcome.records.is_empty());
    assert!(outcome.is_clean());
    assert!(store.path().is_file());
}

#[test]
fn append_writes_one_terminated_line_per_record() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store.append(&appointment("Cons01", "Ana Silva")).unwrap();
    store.append(&appointment("Cons02", "Bruno Costa")).unwrap();

    assert_eq!(
        fs::read_to_string(store.path()).unwrap(),
        "Cons01,Ana Silva,Dr. Marcos,2025-03-14,09:30\n\
         Cons02,Bruno Costa,Dr. Marcos,2025-03-14,09:30\n"
    );
}

#[test]
fn replace_all_leaves_exactly_the_given_sequence() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    for (id, name) in [("Cons01", "Ana"), ("Cons02", "Bia"), ("Cons03", "Caio")] {
        store.append(&appointment(id, name)).unwrap();
    }

    let replacement = vec![appointment("Cons03", "Caio"), appointment("Cons01", "Ana")];
    store.replace_all(&replacement).unwrap();

    assert_eq!(store.load_all().records, replacement);
    assert_eq!(
        fs::read_to_string(store.path()).unwrap(),
        "Cons03,Caio,Dr. Marcos,2025-03-14,09:30\nCons01,Ana,Dr. Marcos,2025-03-14,09:30\n"
    );
}

#[test]
fn replace_all_with_empty_set_empties_file() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.append(&appointment("Cons01", "Ana")).unwrap();

    store.replace_all(&[]).unwrap();

    assert_eq!(fs::read_to_string(store.path()).unwrap(), "");
}

#[test]
fn malformed_line_is_skipped_and_reported() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.ensure_initialized().unwrap();
    fs::write(
        store.path(),
        "Cons01,Ana,Dr. A,2025-01-01,08:00\n\
         \n\
         Cons02,corrupted\n\
         Cons03,Caio,Dr. C,2025-01-03,10:00\n",
    )
    .unwrap();

    let outcome = store.load_all();

    let ids: Vec<_> = outcome.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["Cons01", "Cons03"]);
    assert_eq!(outcome.issues.len(), 1);
    match &outcome.issues[0] {
        LoadIssue::Malformed { line_number, error } => {
            assert_eq!(*line_number, 3);
            assert_eq!(error.fields, 2);
        }
        other => panic!("unexpected issue: {other}"),
    }
}

#[test]
fn crlf_terminated_lines_decode_cleanly() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.ensure_initialized().unwrap();
    fs::write(store.path(), "Cons01,Ana,Dr. A,2025-01-01,08:00\r\n").unwrap();

    let records = store.load_all().into_records();

    assert_eq!(records, vec![Appointment::new("Cons01", "Ana", "Dr. A", "2025-01-01", "08:00")]);
}

#[test]
fn invalid_utf8_line_is_skipped_without_hiding_later_records() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.ensure_initialized().unwrap();
    let mut bytes = b"Cons01,Ana,Dr. A,2025-01-01,08:00\n".to_vec();
    bytes.extend_from_slice(b"C\xff,x\n");
    bytes.extend_from_slice(b"Cons03,Caio,Dr. C,2025-01-03,10:00\n");
    fs::write(store.path(), bytes).unwrap();

    let outcome = store.load_all();

    let ids: Vec<_> = outcome.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["Cons01", "Cons03"]);
    assert!(matches!(
        outcome.issues.as_slice(),
        [LoadIssue::InvalidUtf8 { line_number: 2 }]
    ));
    assert!(outcome.into_complete_records().is_ok());
}

#[test]
fn padded_line_decodes_to_trimmed_fields() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.ensure_initialized().unwrap();
    fs::write(store.path(), "  Cons01,Ana,Dr. A,2025-01-01,08:00 \t\n").unwrap();

    let records = store.load_all().into_records();

    assert_eq!(records, vec![Appointment::new("Cons01", "Ana", "Dr. A", "2025-01-01", "08:00")]);
}

#[test]
fn unreadable_location_reports_io_issue() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("data");
    fs::write(&blocker, "not a directory").unwrap();
    let store = store_in(&dir);

    let outcome = store.load_all();

    assert!(outcome.records.is_empty());
    assert!(matches!(outcome.issues.as_slice(), [LoadIssue::Io(_)]));
    assert!(outcome.into_complete_records().is_err());
    assert!(store.append(&appointment("Cons01", "Ana")).is_err());
}

#[test]
fn separate_configs_do_not_share_state() {
    let first_dir = TempDir::new().unwrap();
    let second_dir = TempDir::new().unwrap();
    let first = store_in(&first_dir);
    let second = store_in(&second_dir);

    first.append(&appointment("Cons01", "Ana")).unwrap();

    assert_eq!(first.load_all().records.len(), 1);
    assert!(second.load_all().records.is_empty());
}
