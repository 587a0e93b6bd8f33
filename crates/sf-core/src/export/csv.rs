//! Report text for the admin export buttons.
//!
//! Every field is wrapped in double quotes and embedded quotes are doubled,
//! so commas and line breaks inside values survive a spreadsheet import.

use crate::admin::{Institution, SponsorshipRequest};

const INSTITUTION_HEADERS: [&str; 11] = [
    "ID",
    "Name",
    "Contact Person",
    "Email",
    "Phone",
    "Payment Status",
    "Total Amount",
    "Paid Amount",
    "Last Payment",
    "Sponsorship Status",
    "Sports",
];

const SPONSORSHIP_HEADERS: [&str; 9] = [
    "ID",
    "Institution ID",
    "Institution",
    "Type",
    "Status",
    "Requested Amount",
    "Sponsored Amount",
    "Sponsor",
    "Reason",
];

pub fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn line<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| quote(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Header line followed by one line per row, `\n` separated.
pub fn to_csv<S: AsRef<str>>(headers: &[&str], rows: &[Vec<S>]) -> String {
    let mut out = line(headers);
    for row in rows {
        out.push('\n');
        out.push_str(&line(row));
    }
    out
}

/// `12345` → `"123.45"`.
fn decimal(minor: u64) -> String {
    format!("{}.{:02}", minor / 100, minor % 100)
}

fn status_label<T: serde::Serialize>(status: &T) -> String {
    serde_json::to_value(status)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

pub fn institutions_csv(institutions: &[Institution]) -> String {
    let rows: Vec<Vec<String>> = institutions
        .iter()
        .map(|i| {
            vec![
                i.id.to_string(),
                i.name.clone(),
                i.contact_person.clone(),
                i.email.clone(),
                i.phone.clone(),
                status_label(&i.payment_status),
                decimal(i.total_amount),
                decimal(i.paid_amount),
                i.last_payment.map(|d| d.to_string()).unwrap_or_default(),
                status_label(&i.sponsorship_status),
                i.sports.join("; "),
            ]
        })
        .collect();
    to_csv(&INSTITUTION_HEADERS, &rows)
}

pub fn sponsorships_csv(requests: &[SponsorshipRequest]) -> String {
    let rows: Vec<Vec<String>> = requests
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.institution_id.to_string(),
                r.institution_name.clone(),
                status_label(&r.sponsorship_type),
                status_label(&r.status),
                decimal(r.requested_amount),
                r.sponsored_amount.map(decimal).unwrap_or_default(),
                r.sponsor_name.clone().unwrap_or_default(),
                r.reason.clone(),
            ]
        })
        .collect();
    to_csv(&SPONSORSHIP_HEADERS, &rows)
}
