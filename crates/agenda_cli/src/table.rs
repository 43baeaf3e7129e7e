//! Grid rendering for appointment lists.

use agenda_core::Appointment;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct AppointmentRow<'a> {
    #[tabled(rename = "ID")]
    id: &'a str,
    #[tabled(rename = "Patient")]
    patient: &'a str,
    #[tabled(rename = "Doctor")]
    doctor: &'a str,
    #[tabled(rename = "Date")]
    date: &'a str,
    #[tabled(rename = "Time")]
    time: &'a str,
}

impl<'a> From<&'a Appointment> for AppointmentRow<'a> {
    fn from(record: &'a Appointment) -> Self {
        Self {
            id: &record.id,
            patient: &record.patient_name,
            doctor: &record.doctor_name,
            date: &record.date,
            time: &record.time,
        }
    }
}

/// Renders `rows` as a bordered grid with a trailing newline.
pub fn render(rows: &[Appointment]) -> String {
    let mut table = Table::new(rows.iter().map(AppointmentRow::from));
    table.with(Style::ascii());
    format!("{table}\n")
}
