use std::net::{Ipv4Addr, TcpListener};

use crate::{BACKEND_PORT_CANDIDATES, BACKEND_PORT_FALLBACK, BACKEND_PORT_INVALID_OVERRIDE};

/// Any bind failure counts as "in use" so a doubtful port is never handed out.
pub(crate) fn is_port_free(port: u16) -> bool {
    TcpListener::bind((Ipv4Addr::LOCALHOST, port)).is_ok()
}

pub(crate) fn parse_port_override(raw: &str) -> u16 {
    raw.trim()
        .parse::<u16>()
        .ok()
        .filter(|port| *port != 0)
        .unwrap_or(BACKEND_PORT_INVALID_OVERRIDE)
}

pub(crate) fn resolve_backend_port(port_override: Option<&str>) -> u16 {
    resolve_backend_port_with(port_override, is_port_free)
}

pub(crate) fn resolve_backend_port_with<F>(port_override: Option<&str>, is_free: F) -> u16
where
    F: Fn(u16) -> bool,
{
    if let Some(raw) = port_override.filter(|value| !value.is_empty()) {
        return parse_port_override(raw);
    }

    BACKEND_PORT_CANDIDATES
        .into_iter()
        .find(|port| is_free(*port))
        .unwrap_or(BACKEND_PORT_FALLBACK)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn override_wins_without_probing() {
        let probed = RefCell::new(Vec::new());
        let port = resolve_backend_port_with(Some("6123"), |port| {
            probed.borrow_mut().push(port);
            true
        });

        assert_eq!(port, 6123);
        assert!(probed.borrow().is_empty());
    }

    #[test]
    fn unparsable_override_falls_back_to_5000() {
        assert_eq!(resolve_backend_port_with(Some("not-a-port"), |_| true), 5000);
        assert_eq!(resolve_backend_port_with(Some("70000"), |_| true), 5000);
        assert_eq!(resolve_backend_port_with(Some("0"), |_| true), 5000);
    }

    #[test]
    fn override_with_trailing_garbage_is_rejected_whole() {
        assert_eq!(parse_port_override("5002abc"), 5000);
        assert_eq!(parse_port_override(" 5002 "), 5002);
    }

    #[test]
    fn probes_candidates_in_order() {
        let probed = RefCell::new(Vec::new());
        let port = resolve_backend_port_with(None, |port| {
            probed.borrow_mut().push(port);
            port == 5002
        });

        assert_eq!(port, 5002);
        assert_eq!(*probed.borrow(), vec![5001, 5000, 5002]);
    }

    #[test]
    fn uses_last_resort_when_every_candidate_is_taken() {
        assert_eq!(resolve_backend_port_with(None, |_| false), 5001);
    }

    #[test]
    fn is_port_free_reports_bound_port_as_taken() {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).expect("bind ephemeral port");
        let port = listener.local_addr().expect("local addr").port();

        assert!(!is_port_free(port));
        drop(listener);
    }
}
