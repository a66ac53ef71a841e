//! Address validation for the `to_ip` converter.
//!
//! Deliberately more lenient than `std::net`: IPv4 octets may carry leading
//! zeros, and IPv6 accepts a bracketed form and a `%zone` suffix.

/// Four dot-separated decimal octets of 1-3 digits, each at most 255.
pub fn is_ipv4(s: &str) -> bool {
    let mut count = 0;
    for octet in s.split('.') {
        count += 1;
        if count > 4
            || octet.is_empty()
            || octet.len() > 3
            || !octet.bytes().all(|b| b.is_ascii_digit())
            || octet.parse::<u16>().map_or(true, |n| n > 255)
        {
            return false;
        }
    }
    count == 4
}

/// Validate an IPv6 address, returning it without brackets or zone.
pub fn ipv6(s: &str) -> Option<&str> {
    let mut addr = s;
    if addr.contains(']') {
        let inner = addr.strip_prefix('[')?;
        addr = &inner[..inner.find(']')?];
    }
    if let Some(zone) = addr.find('%') {
        addr = &addr[..zone];
    }

    let groups: Vec<&str> = addr.split(':').collect();
    let n = groups.len();
    if !(3..=8).contains(&n) {
        return None;
    }

    // An empty group at either end is only valid as part of "::".
    if groups[0].is_empty() && !groups[1].is_empty() {
        return None;
    }
    if groups[n - 1].is_empty() && !groups[n - 2].is_empty() {
        return None;
    }

    let mut inner_empty = 0;
    for (i, group) in groups.iter().enumerate() {
        if group.is_empty() {
            if i > 0 && i < n - 1 {
                inner_empty += 1;
            }
            continue;
        }
        let is_hex = group.len() <= 4 && group.bytes().all(|b| b.is_ascii_hexdigit());
        if !is_hex && !(i == n - 1 && is_ipv4(group)) {
            return None;
        }
    }

    if (inner_empty == 0 && n == 8) || inner_empty == 1 {
        Some(addr)
    } else {
        None
    }
}
