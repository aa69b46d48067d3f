//! Rendering zones as BIND master-file text
//!
//! The whole file is produced in memory: a synthesized SOA at the apex
//! followed by the desired record sets in canonical order. Output is
//! deterministic for a given serial, so regenerated files diff cleanly.

use std::borrow::Cow;

use crate::rr::{
    Name, RecordKind, RecordSet, SerialNumber, ascii_name, decoded_name, naptr_text, quote_txt,
};

use super::FileConfig;

/// One record set prepared for rendering.
struct Row<'a> {
    set: &'a RecordSet,
    /// Owner name relative to the origin, ASCII form, empty at the apex.
    relative: String,
    /// Relative owner name in its decoded form.
    decoded: String,
    /// Absolute decoded owner name, used in the name comment.
    decoded_fqdn: String,
}

/// Render the full zone file text for `zone`.
///
/// `sets` is the complete desired state; ordering on input does not
/// matter, the writer sorts by owner name, type, and values.
pub(super) fn render(
    zone: &Name,
    serial: SerialNumber,
    config: &FileConfig,
    sets: &[&RecordSet],
) -> String {
    let origin = ascii_name(zone);
    let decoded_origin = decoded_name(zone);

    let mut rows: Vec<Row<'_>> = sets
        .iter()
        .map(|set| {
            let ascii = ascii_name(&set.name);
            let decoded = decoded_name(&set.name);
            Row {
                relative: relative_name(&ascii, &origin),
                decoded: relative_name(&decoded, &decoded_origin),
                decoded_fqdn: decoded,
                set,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        (a.relative.as_str(), a.set.kind, &a.set.values)
            .cmp(&(b.relative.as_str(), b.set.kind, &b.set.values))
    });

    let width = rows.iter().map(|row| row.relative.len()).max().unwrap_or(0);
    let primary = primary_nameserver(&origin, &rows);
    let email = hostmaster_email(&config.hostmaster_email, &origin);

    let mut text = String::new();
    if origin != decoded_origin {
        text.push_str(&format!("; Zone name: {decoded_origin}\n"));
    }
    text.push_str(&format!("$ORIGIN {origin}\n\n"));
    text.push_str(&format!(
        "@ {} IN SOA {} {} (\n",
        config.default_ttl, primary, email
    ));
    text.push_str(&format!("    {serial} ; Serial\n"));
    text.push_str(&format!("    {} ; Refresh\n", config.refresh));
    text.push_str(&format!("    {} ; Retry\n", config.retry));
    text.push_str(&format!("    {} ; Expire\n", config.expire));
    text.push_str(&format!("    {} ; NXDOMAIN ttl\n", config.nxdomain));
    text.push_str(")\n\n");

    let mut previous: Option<String> = None;
    for row in &rows {
        for value in &row.set.values {
            let mut name = if row.relative.is_empty() {
                "@".to_owned()
            } else {
                row.relative.clone()
            };
            if previous.as_deref() == Some(name.as_str()) {
                name.clear();
            } else {
                previous = Some(name.clone());
                if name != row.decoded {
                    text.push_str(&format!("; Name: {}\n", row.decoded_fqdn));
                }
            }
            let value = render_value(row.set.kind, value);
            text.push_str(&format!(
                "{name:<width$} {ttl:>8} IN {kind:<8} {value}\n",
                ttl = row.set.ttl.secs(),
                kind = row.set.kind.as_str(),
            ));
        }
    }

    text
}

fn render_value(kind: RecordKind, value: &str) -> Cow<'_, str> {
    match kind {
        RecordKind::Txt => Cow::Owned(quote_txt(value)),
        RecordKind::Naptr => naptr_text(value).render(),
        _ => Cow::Borrowed(value),
    }
}

/// Owner name relative to the origin, both in presentation form.
fn relative_name(owner: &str, origin: &str) -> String {
    if owner == origin {
        return String::new();
    }
    owner
        .strip_suffix(origin)
        .and_then(|stem| stem.strip_suffix('.'))
        .unwrap_or(owner)
        .to_owned()
}

/// First value of the apex NS set, or a placeholder when none exists.
fn primary_nameserver<'a>(origin: &str, rows: &[Row<'a>]) -> Cow<'a, str> {
    for row in rows {
        if row.relative.is_empty() && row.set.kind == RecordKind::Ns {
            if let Some(value) = row.set.values.first() {
                return Cow::Borrowed(value.as_str());
            }
        }
    }
    tracing::warn!(
        zone = origin,
        "unable to find a primary nameserver, using placeholder"
    );
    Cow::Owned(format!("ns.{origin}"))
}

/// SOA RNAME form of the configured contact.
///
/// A full address keeps its domain; a bare username is qualified with
/// the zone name. Dots in the username are escaped so they stay inside
/// one label.
fn hostmaster_email(email: &str, origin: &str) -> String {
    let mut pieces: Vec<String> = email.split('@').map(str::to_owned).collect();
    pieces[0] = pieces[0].replace('.', "\\.");
    if pieces.len() == 2 {
        pieces.join(".")
    } else {
        format!("{}.{origin}", pieces[0])
    }
}
