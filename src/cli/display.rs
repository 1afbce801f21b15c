use chrono::{DateTime, Local, Utc};
use std::fmt::Write;

use crate::cli::ui::truncate;
use crate::models::{Contact, ContactSummary};

const NOT_SPECIFIED: &str = "Not specified";
const NO_NOTES: &str = "No notes available";

/// Column widths for the contact table: #, first, last, phone, email, company
const WIDTHS: [usize; 6] = [4, 14, 14, 16, 24, 16];

fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// One table line for a listed contact. `number` is 1-based.
pub fn format_summary_row(number: usize, summary: &ContactSummary) -> String {
    let cells = [
        number.to_string(),
        summary.first_name.clone(),
        summary.last_name.clone(),
        summary.phone.clone(),
        summary.email.clone().unwrap_or_default(),
        summary.company.clone().unwrap_or_default(),
    ];
    format_cells(&cells)
}

fn format_cells(cells: &[String]) -> String {
    let mut line = String::new();
    for (cell, width) in cells.iter().zip(WIDTHS) {
        let _ = write!(line, "{:<width$}  ", truncate(cell, width), width = width);
    }
    line.trim_end().to_string()
}

pub fn format_table_header() -> String {
    let headers = ["#", "First Name", "Last Name", "Phone", "Email", "Company"];
    format_cells(&headers.map(String::from))
}

/// Print a listing with its header and the total count.
pub fn print_contact_table(rows: &[ContactSummary]) {
    if rows.is_empty() {
        println!("No contacts.");
    } else {
        println!("{}", format_table_header());
        for (i, summary) in rows.iter().enumerate() {
            println!("{}", format_summary_row(i + 1, summary));
        }
    }
    println!("\nContacts: {}", rows.len());
}

/// Full details for one contact. Every field is shown; empty optional
/// fields read "Not specified".
pub fn format_contact_details(contact: &Contact) -> String {
    let optional = |v: &Option<String>| v.clone().unwrap_or_else(|| NOT_SPECIFIED.to_string());

    let mut out = String::new();
    let _ = writeln!(out, "{}\n", contact.display_name());
    let _ = writeln!(out, "  Phone:    {}", contact.phone);
    let _ = writeln!(out, "  Email:    {}", optional(&contact.email));
    let _ = writeln!(out, "  Address:  {}", optional(&contact.address));
    let _ = writeln!(out, "  Company:  {}", optional(&contact.company));
    let _ = writeln!(out, "\n  Notes:");
    match contact.notes {
        Some(ref notes) => {
            for line in notes.lines() {
                let _ = writeln!(out, "  {}", line);
            }
        }
        None => {
            let _ = writeln!(out, "  {}", NO_NOTES);
        }
    }
    let _ = writeln!(out, "\n  Created:  {}", format_timestamp(&contact.created_at));
    let _ = writeln!(out, "  Modified: {}", format_timestamp(&contact.modified_at));
    let _ = write!(out, "  ID:       {}", contact.id);
    out
}

pub fn print_contact_details(contact: &Contact) {
    println!("{}", format_contact_details(contact));
}
