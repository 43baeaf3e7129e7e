//! Text menu over the scheduling service.
//!
//! # Responsibility
//! - Prompt for input, call one service operation, print its result.
//! - Convert typed dates to storage form before calling core.
//!
//! # Invariants
//! - No domain rule lives here; every decision is delegated to core.
//! - End of input ends the menu without an error.

use crate::date_input::{to_storage_date, DISPLAY_DATE_HINT};
use crate::table;
use agenda_core::{
    Appointment, AppointmentPatch, AppointmentStore, IdPolicy, NewAppointment, ScheduleService,
};
use log::error;
use std::io::{self, BufRead, Write};

const MSG_SUCCESS: &str = ">> Operation completed successfully.";
const MSG_ID_NOT_FOUND: &str = ">> Error: ID not found.";
const MSG_NO_RESULTS: &str = ">> No appointments found.";
const MSG_PRESS_ENTER: &str = "Press Enter to return...";

/// Interactive menu bound to one service and one input/output pair.
pub struct Menu<'a, S: AppointmentStore, P: IdPolicy, R: BufRead, W: Write> {
    service: &'a ScheduleService<S, P>,
    input: R,
    output: W,
}

impl<'a, S: AppointmentStore, P: IdPolicy, R: BufRead, W: Write> Menu<'a, S, P, R, W> {
    pub fn new(service: &'a ScheduleService<S, P>, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    /// Runs the menu until the user picks `0` or input ends.
    pub fn run(mut self) -> io::Result<()> {
        match self.main_loop() {
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                self.output.flush()?;
                Ok(())
            }
            other => other,
        }
    }

    fn main_loop(&mut self) -> io::Result<()> {
        loop {
            write!(self.output, "\n\n")?;
            writeln!(self.output, "=== APPOINTMENT SCHEDULING SYSTEM ===")?;
            writeln!(self.output, "1. Schedule new appointment")?;
            writeln!(self.output, "2. List all appointments")?;
            writeln!(self.output, "3. Update appointment")?;
            writeln!(self.output, "4. Delete appointment")?;
            writeln!(self.output, "5. Search report")?;
            writeln!(self.output, "0. Exit")?;

            let option = self.prompt("\nChoose an option: ")?;
            match option.trim() {
                "0" => {
                    writeln!(self.output, "Shutting down...")?;
                    self.output.flush()?;
                    return Ok(());
                }
                "1" => self.view_create()?,
                "2" => self.view_list()?,
                "3" => self.view_update()?,
                "4" => self.view_delete()?,
                "5" => self.view_search()?,
                _ => {
                    writeln!(self.output, "Invalid option!")?;
                    self.prompt("Press Enter to continue...")?;
                }
            }
        }
    }

    fn view_create(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n--- New Appointment ---")?;
        let patient = self.prompt("Patient name: ")?;
        let doctor = self.prompt("Doctor name: ")?;
        let date = self.prompt_date()?;
        let time = self.prompt("Time (HH:MM): ")?;

        let request = NewAppointment {
            patient,
            doctor,
            date,
            time,
        };
        match self.service.create(&request) {
            Ok(created) => writeln!(self.output, "\n{MSG_SUCCESS} ID: {}", created.id)?,
            Err(err) => self.report_error("create", &err)?,
        }
        self.prompt(MSG_PRESS_ENTER)?;
        Ok(())
    }

    fn view_list(&mut self) -> io::Result<()> {
        self.show_all()?;
        self.prompt(&format!("\n{MSG_PRESS_ENTER}"))?;
        Ok(())
    }

    fn view_update(&mut self) -> io::Result<()> {
        self.show_all()?;
        writeln!(self.output, "\n--- Update Appointment ---")?;
        let id = self.prompt("Appointment ID to change (e.g. 1 or Cons01): ")?;

        writeln!(self.output, "\n(Leave blank to keep the current value)")?;
        let patch = AppointmentPatch {
            patient: Some(self.prompt("New patient name: ")?),
            doctor: Some(self.prompt("New doctor name: ")?),
            time: Some(self.prompt("New time (HH:MM): ")?),
        };

        match self.service.update(&id, &patch) {
            Ok(true) => writeln!(self.output, "\n{MSG_SUCCESS}")?,
            Ok(false) => writeln!(self.output, "\n{MSG_ID_NOT_FOUND}")?,
            Err(err) => self.report_error("update", &err)?,
        }
        self.prompt(MSG_PRESS_ENTER)?;
        Ok(())
    }

    fn view_delete(&mut self) -> io::Result<()> {
        self.show_all()?;
        writeln!(self.output, "\n--- Delete Appointment ---")?;
        let id = self.prompt("Appointment ID to DELETE: ")?;

        match self.service.delete(&id) {
            Ok(true) => writeln!(self.output, "\n{MSG_SUCCESS}")?,
            Ok(false) => writeln!(self.output, "\n{MSG_ID_NOT_FOUND}")?,
            Err(err) => self.report_error("delete", &err)?,
        }
        self.prompt(MSG_PRESS_ENTER)?;
        Ok(())
    }

    fn view_search(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n--- Search Report ---")?;
        let term = self.prompt("Type a patient name, doctor name or date: ")?;
        let results = self.service.search(term.trim());
        self.show_table(&results)?;
        self.prompt(&format!("\n{MSG_PRESS_ENTER}"))?;
        Ok(())
    }

    fn show_all(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n--- All Appointments ---")?;
        let records = self.service.list_all();
        self.show_table(&records)
    }

    fn show_table(&mut self, rows: &[Appointment]) -> io::Result<()> {
        if rows.is_empty() {
            return writeln!(self.output, "\n{MSG_NO_RESULTS}");
        }
        write!(self.output, "{}", table::render(rows))
    }

    fn prompt_date(&mut self) -> io::Result<String> {
        loop {
            let input = self.prompt(&format!("Date ({DISPLAY_DATE_HINT}): "))?;
            if let Some(date) = to_storage_date(&input) {
                return Ok(date);
            }
            writeln!(
                self.output,
                ">> Invalid date! Use the format {DISPLAY_DATE_HINT}."
            )?;
        }
    }

    fn report_error(&mut self, operation: &str, err: &dyn std::error::Error) -> io::Result<()> {
        error!(
            "event=menu_action module=cli status=error op={} error={}",
            operation, err
        );
        writeln!(self.output, "\n>> Error: {err}")
    }

    /// Prints `label`, then reads one line without its terminator.
    fn prompt(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            ));
        }
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }
}
