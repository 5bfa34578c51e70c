//! Numeric DNS response codes (RFC 1035 §4.1.1, RFC 6891 extended codes).

pub const SUCCESS: u16 = 0;
pub const FORMAT_ERROR: u16 = 1;
pub const SERVER_FAILURE: u16 = 2;
pub const NAME_ERROR: u16 = 3;
pub const NOT_IMPLEMENTED: u16 = 4;
pub const REFUSED: u16 = 5;

/// Mnemonic for a response code, `None` for unassigned values.
pub fn name(rcode: u16) -> Option<&'static str> {
    let name = match rcode {
        0 => "NOERROR",
        1 => "FORMERR",
        2 => "SERVFAIL",
        3 => "NXDOMAIN",
        4 => "NOTIMP",
        5 => "REFUSED",
        6 => "YXDOMAIN",
        7 => "YXRRSET",
        8 => "NXRRSET",
        9 => "NOTAUTH",
        10 => "NOTZONE",
        16 => "BADVERS",
        17 => "BADKEY",
        18 => "BADTIME",
        19 => "BADMODE",
        20 => "BADNAME",
        21 => "BADALG",
        22 => "BADTRUNC",
        23 => "BADCOOKIE",
        _ => return None,
    };
    Some(name)
}

pub(crate) fn suffix(rcode: &u16) -> String {
    match name(*rcode) {
        Some(name) => format!(" ({})", name),
        None => String::new(),
    }
}
