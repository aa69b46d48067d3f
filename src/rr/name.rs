use hickory_proto::rr::Name;

/// Unescaped presentation form of `name`.
///
/// [`Name::to_ascii`] backslash-escapes characters that are unusual in
/// hostnames but legal in zone names, `/` in RFC 2317 delegations among
/// them. Zone files and the filenames derived from them want the
/// literal label text, so this joins the raw labels instead. Labels are
/// already IDNA ASCII at this point.
pub(crate) fn ascii_name(name: &Name) -> String {
    let mut labels = name.iter();
    let mut text = String::new();
    if let Some(label) = labels.next() {
        text.push_str(&String::from_utf8_lossy(label));
    }
    for label in labels {
        text.push('.');
        text.push_str(&String::from_utf8_lossy(label));
    }
    if name.is_root() || name.is_fqdn() {
        text.push('.');
    }
    text
}

/// Decoded presentation form of `name`.
///
/// IDNA labels come back as Unicode. Names without them render through
/// [`ascii_name`], so the two forms compare equal exactly when there is
/// nothing to decode.
pub(crate) fn decoded_name(name: &Name) -> String {
    if name.to_ascii() == name.to_utf8() {
        ascii_name(name)
    } else {
        name.to_utf8()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delegation() -> Name {
        let mut name = Name::from_labels([
            "0/25".as_bytes(),
            b"2",
            b"0",
            b"192",
            b"in-addr",
            b"arpa",
        ])
        .unwrap();
        name.set_fqdn(true);
        name
    }

    #[test]
    fn names_render_without_escapes() {
        let name = Name::from_utf8("www.unit.tests.").unwrap();
        assert_eq!(ascii_name(&name), "www.unit.tests.");
        assert_eq!(ascii_name(&Name::root()), ".");

        let zone = delegation();
        assert_eq!(ascii_name(&zone), "0/25.2.0.192.in-addr.arpa.");
        // hickory's own presentation form escapes the slash
        assert_eq!(zone.to_ascii(), "0\\/25.2.0.192.in-addr.arpa.");
    }

    #[test]
    fn decoded_names_differ_only_for_idna() {
        let plain = Name::from_utf8("www.unit.tests.").unwrap();
        assert_eq!(decoded_name(&plain), ascii_name(&plain));
        assert_eq!(decoded_name(&delegation()), "0/25.2.0.192.in-addr.arpa.");

        let idna = Name::from_utf8("münchen.example.com.").unwrap();
        assert_eq!(ascii_name(&idna), "xn--mnchen-3ya.example.com.");
        assert_eq!(decoded_name(&idna), "münchen.example.com.");
    }
}
