use agenda_core::{
    AppointmentPatch, AppointmentStore, FieldPolicy, FileAppointmentStore, NewAppointment,
    ScheduleService, ServiceError, StoreConfig,
};
use std::fs;
use tempfile::TempDir;

fn file_service(dir: &TempDir) -> ScheduleService<FileAppointmentStore> {
    let config = StoreConfig::new(dir.path(), "repositorio.txt", FieldPolicy::Strict).unwrap();
    ScheduleService::new(FileAppointmentStore::new(&config), FieldPolicy::Strict)
}

fn request(patient: &str, doctor: &str, date: &str) -> NewAppointment {
    NewAppointment {
        patient: patient.to_string(),
        doctor: doctor.to_string(),
        date: date.to_string(),
        time: "09:30".to_string(),
    }
}

fn seed_two(service: &ScheduleService<FileAppointmentStore>) {
    service
        .create(&request("Ana Silva", "Dr. Marcos", "2025-03-14"))
        .unwrap();
    service
        .create(&request("Bruno Costa", "Dra. Helena", "2025-04-02"))
        .unwrap();
}

#[test]
fn create_yields_sequential_ids_from_empty_store() {
    let dir = TempDir::new().unwrap();
    let service = file_service(&dir);

    let ids: Vec<_> = ["Ana", "Bia", "Caio"]
        .iter()
        .map(|name| service.create(&request(name, "Dr. A", "2025-01-01")).unwrap().id)
        .collect();

    assert_eq!(ids, vec!["Cons01", "Cons02", "Cons03"]);
    let listed: Vec<_> = service.list_all().into_iter().map(|r| r.id).collect();
    assert_eq!(listed, ids);
}

#[test]
fn list_all_reflects_external_file_changes() {
    let dir = TempDir::new().unwrap();
    let service = file_service(&dir);
    seed_two(&service);

    fs::write(
        service.store().path(),
        "Cons09,Zé,Dr. Z,2025-09-09,19:00\n",
    )
    .unwrap();

    let listed = service.list_all();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, "Cons09");
}

#[test]
fn update_only_time_leaves_other_fields() {
    let dir = TempDir::new().unwrap();
    let service = file_service(&dir);
    seed_two(&service);
    let before = service.find("Cons02").unwrap();

    let patch = AppointmentPatch {
        time: Some("16:15".to_string()),
        ..AppointmentPatch::default()
    };
    assert!(service.update("2", &patch).unwrap());

    let after = service.find("Cons02").unwrap();
    assert_eq!(after.time, "16:15");
    assert_eq!(after.id, before.id);
    assert_eq!(after.patient_name, before.patient_name);
    assert_eq!(after.doctor_name, before.doctor_name);
    assert_eq!(after.date, before.date);
    assert_eq!(service.find("Cons01").unwrap().time, "09:30");
}

#[test]
fn update_missing_id_returns_false_without_writing() {
    let dir = TempDir::new().unwrap();
    let service = file_service(&dir);
    seed_two(&service);
    let before = fs::read_to_string(service.store().path()).unwrap();

    let patch = AppointmentPatch {
        patient: Some("Nobody".to_string()),
        ..AppointmentPatch::default()
    };
    assert!(!service.update("Cons42", &patch).unwrap());

    assert_eq!(fs::read_to_string(service.store().path()).unwrap(), before);
}

#[test]
fn delete_missing_id_keeps_record_count() {
    let dir = TempDir::new().unwrap();
    let service = file_service(&dir);
    seed_two(&service);

    assert!(!service.delete("xyz").unwrap());
    assert!(!service.delete("7").unwrap());

    assert_eq!(service.list_all().len(), 2);
}

#[test]
fn delete_existing_id_removes_only_that_record() {
    let dir = TempDir::new().unwrap();
    let service = file_service(&dir);
    seed_two(&service);
    service
        .create(&request("Caio Reis", "Dr. Marcos", "2025-05-05"))
        .unwrap();

    assert!(service.delete(" cons02 ").unwrap());

    let ids: Vec<_> = service.list_all().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["Cons01", "Cons03"]);
}

#[test]
fn delete_removes_every_duplicate_id() {
    let dir = TempDir::new().unwrap();
    let service = file_service(&dir);
    service.store().ensure_initialized().unwrap();
    fs::write(
        service.store().path(),
        "Cons01,Ana,Dr. A,2025-01-01,08:00\n\
         Cons02,Bia,Dr. B,2025-01-02,09:00\n\
         Cons01,Ana again,Dr. A,2025-01-03,10:00\n",
    )
    .unwrap();

    assert!(service.delete("1").unwrap());

    let ids: Vec<_> = service.list_all().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["Cons02"]);
}

#[test]
fn next_id_follows_last_record_after_delete() {
    let dir = TempDir::new().unwrap();
    let service = file_service(&dir);
    seed_two(&service);
    service
        .create(&request("Caio Reis", "Dr. Marcos", "2025-05-05"))
        .unwrap();

    assert!(service.delete("Cons03").unwrap());
    let created = service
        .create(&request("Dora Melo", "Dr. Marcos", "2025-06-06"))
        .unwrap();

    assert_eq!(created.id, "Cons03");
}

#[test]
fn search_matches_names_case_insensitively_and_dates() {
    let dir = TempDir::new().unwrap();
    let service = file_service(&dir);
    seed_two(&service);

    let silva = service.search("silva");
    assert_eq!(silva.len(), 1);
    assert_eq!(silva[0].patient_name, "Ana Silva");

    // "co" hits the doctor "Dr. Marcos" and the patient "Bruno Costa".
    let co: Vec<_> = service.search("CO").into_iter().map(|r| r.id).collect();
    assert_eq!(co, vec!["Cons01", "Cons02"]);

    let by_doctor = service.search("helena");
    assert_eq!(by_doctor.len(), 1);
    assert_eq!(by_doctor[0].id, "Cons02");

    let by_date = service.search("2025-03");
    assert_eq!(by_date.len(), 1);
    assert_eq!(by_date[0].id, "Cons01");

    assert_eq!(service.search("").len(), 2);
    assert!(service.search("nobody").is_empty());
}

#[test]
fn corrupted_line_does_not_hide_valid_records() {
    let dir = TempDir::new().unwrap();
    let service = file_service(&dir);
    seed_two(&service);
    let mut content = fs::read_to_string(service.store().path()).unwrap();
    content.push_str("garbage without fields\n");
    fs::write(service.store().path(), content).unwrap();

    let listed = service.list_all();

    assert_eq!(listed.len(), 2);
    assert_eq!(service.search("bruno").len(), 1);
}

#[test]
fn update_rewrites_file_without_corrupted_lines() {
    let dir = TempDir::new().unwrap();
    let service = file_service(&dir);
    seed_two(&service);
    let mut content = fs::read_to_string(service.store().path()).unwrap();
    content.push_str("broken\n");
    fs::write(service.store().path(), content).unwrap();

    let patch = AppointmentPatch {
        doctor: Some("Dr. Novo".to_string()),
        ..AppointmentPatch::default()
    };
    assert!(service.update("Cons01", &patch).unwrap());

    assert_eq!(
        fs::read_to_string(service.store().path()).unwrap(),
        "Cons01,Ana Silva,Dr. Novo,2025-03-14,09:30\n\
         Cons02,Bruno Costa,Dra. Helena,2025-04-02,09:30\n"
    );
}

#[test]
fn update_changes_only_first_duplicate_id() {
    let dir = TempDir::new().unwrap();
    let service = file_service(&dir);
    service.store().ensure_initialized().unwrap();
    fs::write(
        service.store().path(),
        "Cons01,Ana,Dr. A,2025-01-01,08:00\n\
         Cons02,Bia,Dr. B,2025-01-02,09:00\n\
         Cons01,Ana again,Dr. A,2025-01-03,10:00\n",
    )
    .unwrap();

    let patch = AppointmentPatch {
        time: Some("18:45".to_string()),
        ..AppointmentPatch::default()
    };
    assert!(service.update("1", &patch).unwrap());

    assert_eq!(
        fs::read_to_string(service.store().path()).unwrap(),
        "Cons01,Ana,Dr. A,2025-01-01,18:45\n\
         Cons02,Bia,Dr. B,2025-01-02,09:00\n\
         Cons01,Ana again,Dr. A,2025-01-03,10:00\n"
    );
}

#[test]
fn delete_after_invalid_utf8_line_keeps_later_records() {
    let dir = TempDir::new().unwrap();
    let service = file_service(&dir);
    service.store().ensure_initialized().unwrap();
    let mut bytes = b"Cons01,Ana,Dr. A,2025-01-01,08:00\n".to_vec();
    bytes.extend_from_slice(b"C\xff,x\n");
    bytes.extend_from_slice(b"Cons03,Caio,Dr. C,2025-01-03,10:00\n");
    fs::write(service.store().path(), bytes).unwrap();

    assert!(service.delete("Cons01").unwrap());

    let ids: Vec<_> = service.list_all().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["Cons03"]);
    assert_eq!(
        fs::read_to_string(service.store().path()).unwrap(),
        "Cons03,Caio,Dr. C,2025-01-03,10:00\n"
    );
}

#[test]
fn padded_line_is_found_by_short_id() {
    let dir = TempDir::new().unwrap();
    let service = file_service(&dir);
    service.store().ensure_initialized().unwrap();
    fs::write(service.store().path(), " Cons01,Ana,Dr. A,2025-01-01,08:00 \n").unwrap();

    let found = service.find("1").unwrap();

    assert_eq!(found.id, "Cons01");
    assert_eq!(found.time, "08:00");
}

#[test]
fn unusable_data_dir_surfaces_repo_errors() {
    let dir = TempDir::new().unwrap();
    let not_a_dir = dir.path().join("agenda");
    fs::write(&not_a_dir, "plain file").unwrap();
    let config = StoreConfig::new(&not_a_dir, "repositorio.txt", FieldPolicy::Strict).unwrap();
    let service = ScheduleService::new(FileAppointmentStore::new(&config), FieldPolicy::Strict);

    let created = service.create(&request("Ana Silva", "Dr. Marcos", "2025-03-14"));
    assert!(matches!(created, Err(ServiceError::Repo(_))));

    let patch = AppointmentPatch {
        time: Some("10:00".to_string()),
        ..AppointmentPatch::default()
    };
    assert!(matches!(service.update("1", &patch), Err(ServiceError::Repo(_))));
    assert!(matches!(service.delete("1"), Err(ServiceError::Repo(_))));
    assert_eq!(fs::read_to_string(&not_a_dir).unwrap(), "plain file");
}
