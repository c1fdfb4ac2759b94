//! Converts textual resource quantities into normalized numeric units.
//! Pure string parsing, no I/O. Unrecognized input is the caller's signal to
//! treat the field as absent, not a panic.

use crate::error::{ControllerError, Result};

/// Parses a Kubernetes CPU quantity into cores. Strings suffixed `m` are
/// millicores (divided by 1000); otherwise the string is whole cores.
pub fn parse_cpu(raw: &str) -> Result<f64> {
    let raw = raw.trim();
    if let Some(millis) = raw.strip_suffix('m') {
        millis
            .parse::<f64>()
            .map(|value| value / 1000.0)
            .map_err(|_| ControllerError::MalformedQuantity(raw.to_string()))
    } else {
        raw.parse::<f64>()
            .map_err(|_| ControllerError::MalformedQuantity(raw.to_string()))
    }
}

/// Parses a Kubernetes memory quantity into mebibytes. `Ki`/`Mi`/`Gi`/`Ti`
/// suffixes are powers of 1024; an unsuffixed string is bytes.
pub fn parse_memory(raw: &str) -> Result<f64> {
    let raw = raw.trim();
    const KI: f64 = 1024.0;
    const MI: f64 = KI * 1024.0;
    const GI: f64 = MI * 1024.0;
    const TI: f64 = GI * 1024.0;

    let malformed = || ControllerError::MalformedQuantity(raw.to_string());

    if let Some(value) = raw.strip_suffix("Ki") {
        value.parse::<f64>().map(|v| v * KI / MI).map_err(|_| malformed())
    } else if let Some(value) = raw.strip_suffix("Mi") {
        value.parse::<f64>().map_err(|_| malformed())
    } else if let Some(value) = raw.strip_suffix("Gi") {
        value.parse::<f64>().map(|v| v * GI / MI).map_err(|_| malformed())
    } else if let Some(value) = raw.strip_suffix("Ti") {
        value.parse::<f64>().map(|v| v * TI / MI).map_err(|_| malformed())
    } else {
        raw.parse::<f64>().map(|bytes| bytes / MI).map_err(|_| malformed())
    }
}

/// Parses an accelerator (e.g. `nvidia.com/gpu`) quantity as a non-negative
/// device count.
pub fn parse_accelerator(raw: &str) -> Result<f64> {
    let raw = raw.trim();
    let count = raw
        .parse::<f64>()
        .map_err(|_| ControllerError::MalformedQuantity(raw.to_string()))?;
    if count < 0.0 {
        return Err(ControllerError::MalformedQuantity(raw.to_string()));
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_millicores() {
        assert_eq!(parse_cpu("500m").unwrap(), 0.5);
    }

    #[test]
    fn cpu_whole_cores() {
        assert_eq!(parse_cpu("4").unwrap(), 4.0);
    }

    #[test]
    fn cpu_rejects_garbage() {
        assert!(parse_cpu("four").is_err());
    }

    #[test]
    fn memory_suffixes() {
        assert_eq!(parse_memory("1Ki").unwrap(), 1.0 / 1024.0);
        assert_eq!(parse_memory("8192Mi").unwrap(), 8192.0);
        assert_eq!(parse_memory("1Gi").unwrap(), 1024.0);
        assert_eq!(parse_memory("1Ti").unwrap(), 1024.0 * 1024.0);
    }

    #[test]
    fn memory_unsuffixed_is_bytes() {
        let mib = 1024.0 * 1024.0;
        assert_eq!(parse_memory(&(mib * 2.0).to_string()).unwrap(), 2.0);
    }

    #[test]
    fn accelerator_whole_count() {
        assert_eq!(parse_accelerator("2").unwrap(), 2.0);
    }

    #[test]
    fn accelerator_rejects_negative() {
        assert!(parse_accelerator("-1").is_err());
    }

    #[test]
    fn accelerator_rejects_garbage() {
        assert!(parse_accelerator("two").is_err());
    }
}
