use std::borrow::Cow;
use std::error::Error;

use hickory_proto::rr::{Name, RData, Record};
use hickory_proto::serialize::txt::Parser;

use super::{RecordKind, TimeToLive};

/// Maximum length of a single character-string on the wire.
///
/// TXT rdata longer than this renders as multiple quoted segments.
pub(crate) const TXT_CHUNK_SIZE: usize = 255;

/// A single resource record as exchanged with sources and targets.
///
/// Owner names are absolute and dot-terminated. The rdata is carried in
/// its textual form: TXT values are the unquoted concatenation of their
/// character-strings, NAPTR values are the six space-separated fields
/// without quoting (an absent regexp leaves its field empty), and every
/// other type uses its native presentation format. Identity is
/// structural: two records are the same record when name, type, and
/// rdata all match.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rr {
    pub name: Name,
    pub kind: RecordKind,
    pub ttl: TimeToLive,
    pub rdata: String,
}

impl Rr {
    pub fn new(name: Name, kind: RecordKind, ttl: TimeToLive, rdata: impl Into<String>) -> Self {
        Rr {
            name,
            kind,
            ttl,
            rdata: rdata.into(),
        }
    }

    /// Convert a wire record into the supported set.
    ///
    /// Returns `None` when the record's type falls outside the supported
    /// mask, which readers treat as "drop silently".
    pub fn from_wire(record: &Record) -> Option<Self> {
        let kind = RecordKind::from_record_type(record.record_type())?;
        Some(Rr {
            name: record.name().clone(),
            kind,
            ttl: TimeToLive::from_secs(record.ttl()),
            rdata: rdata_text(record.data()),
        })
    }
}

/// Textual form of wire rdata, inverse of [`rdata_from_text`].
pub(crate) fn rdata_text(data: &RData) -> String {
    match data {
        RData::TXT(txt) => txt
            .txt_data()
            .iter()
            .map(|chunk| String::from_utf8_lossy(chunk))
            .collect(),
        RData::NAPTR(naptr) => format!(
            "{} {} {} {} {} {}",
            naptr.order(),
            naptr.preference(),
            String::from_utf8_lossy(naptr.flags()),
            String::from_utf8_lossy(naptr.services()),
            String::from_utf8_lossy(naptr.regexp()),
            naptr.replacement(),
        ),
        other => other.to_string(),
    }
}

/// Parse textual rdata back into a wire value.
///
/// The text is rendered into one synthetic master-file line and run
/// through the zone-file grammar, so quoting and escape handling match
/// the file format exactly. Relative names in the rdata resolve against
/// `zone`.
pub(crate) fn rdata_from_text(
    zone: &Name,
    name: &Name,
    kind: RecordKind,
    ttl: TimeToLive,
    text: &str,
) -> Result<RData, Box<dyn Error + Send + Sync>> {
    let value = match kind {
        RecordKind::Txt => Cow::Owned(quote_txt(text)),
        RecordKind::Naptr => naptr_text(text).render(),
        _ => Cow::Borrowed(text),
    };
    let line = format!("{} {} IN {} {}\n", name.to_ascii(), ttl, kind, value);
    let (_, parsed) = Parser::new(line, None, Some(zone.clone())).parse()?;
    parsed
        .into_values()
        .flat_map(|rrset| {
            rrset
                .records_without_rrsigs()
                .cloned()
                .collect::<Vec<_>>()
        })
        .next()
        .map(|record| record.data().clone())
        .ok_or_else(|| format!("no {kind} rdata in {text:?}").into())
}

/// Quote a TXT value for presentation.
///
/// Embedded `"` characters are escaped, and values longer than
/// [`TXT_CHUNK_SIZE`] bytes split into consecutive quoted segments on
/// the same line. Splits happen at character boundaries so no segment
/// exceeds the limit.
pub(crate) fn quote_txt(value: &str) -> String {
    let escaped = value.replace('"', "\\\"");
    let mut segments = Vec::new();
    let mut current = String::new();
    for ch in escaped.chars() {
        if current.len() + ch.len_utf8() > TXT_CHUNK_SIZE {
            segments.push(current);
            current = String::new();
        }
        current.push(ch);
    }
    segments.push(current);
    let quoted: Vec<String> = segments
        .iter()
        .map(|segment| format!("\"{segment}\""))
        .collect();
    quoted.join(" ")
}

/// NAPTR rdata decomposed by field count.
///
/// The textual form is order, preference, flags, service, regexp,
/// replacement. An empty regexp collapses under whitespace splitting,
/// leaving five fields; anything shorter cannot be decomposed and is
/// passed through untouched.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum NaptrText<'a> {
    Full {
        order: &'a str,
        preference: &'a str,
        flags: &'a str,
        service: &'a str,
        regexp: &'a str,
        replacement: String,
    },
    EmptyRegexp {
        order: &'a str,
        preference: &'a str,
        flags: &'a str,
        service: &'a str,
        replacement: &'a str,
    },
    Opaque(&'a str),
}

pub(crate) fn naptr_text(value: &str) -> NaptrText<'_> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [order, preference, flags, service, replacement] => NaptrText::EmptyRegexp {
            order,
            preference,
            flags,
            service,
            replacement,
        },
        [order, preference, flags, service, regexp, rest @ ..] => NaptrText::Full {
            order,
            preference,
            flags,
            service,
            regexp,
            replacement: rest.join(" "),
        },
        _ => NaptrText::Opaque(value),
    }
}

impl<'a> NaptrText<'a> {
    /// Presentation form with flags, service, and regexp quoted.
    ///
    /// Consumes the decomposition; the result borrows from the text it
    /// was split from.
    pub(crate) fn render(self) -> Cow<'a, str> {
        match self {
            NaptrText::Full {
                order,
                preference,
                flags,
                service,
                regexp,
                replacement,
            } => Cow::Owned(format!(
                "{order} {preference} \"{flags}\" \"{service}\" \"{regexp}\" {replacement}"
            )),
            NaptrText::EmptyRegexp {
                order,
                preference,
                flags,
                service,
                replacement,
            } => Cow::Owned(format!(
                "{order} {preference} \"{flags}\" \"{service}\" \"\" {replacement}"
            )),
            NaptrText::Opaque(value) => Cow::Borrowed(value),
        }
    }
}
