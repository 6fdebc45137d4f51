//! Parsing for Kubernetes-style resource quantity strings.
//!
//! CPU: bare number = cores, `m` = millicores, `u` = microcores,
//! `n` = nanocores. Memory: `Ki/Mi/Gi/Ti` binary multiples, `k/M/G`
//! decimal multiples, bare number = bytes.

use std::fmt;

/// A quantity string that could not be parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantityError(pub String);

impl fmt::Display for QuantityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid quantity: {:?}", self.0)
    }
}

/// Converts a CPU quantity string to cores.
pub fn parse_cpu(qty: &str) -> Result<f64, QuantityError> {
    let q = qty.trim();
    let (digits, div) = match q.as_bytes().last() {
        Some(b'n') => (&q[..q.len() - 1], 1e9),
        Some(b'u') => (&q[..q.len() - 1], 1e6),
        Some(b'm') => (&q[..q.len() - 1], 1e3),
        _ => (q, 1.0),
    };
    digits
        .parse::<f64>()
        .map(|v| v / div)
        .map_err(|_| QuantityError(qty.to_string()))
}

/// Converts a memory quantity string to bytes.
pub fn parse_memory(qty: &str) -> Result<f64, QuantityError> {
    let q = qty.trim();
    const UNITS: [(&str, f64); 7] = [
        ("Ki", 1024.0),
        ("Mi", 1024.0 * 1024.0),
        ("Gi", 1024.0 * 1024.0 * 1024.0),
        ("Ti", 1024.0 * 1024.0 * 1024.0 * 1024.0),
        ("k", 1e3),
        ("M", 1e6),
        ("G", 1e9),
    ];
    for (suffix, mul) in UNITS {
        if let Some(digits) = q.strip_suffix(suffix) {
            return digits
                .parse::<f64>()
                .map(|v| v * mul)
                .map_err(|_| QuantityError(qty.to_string()));
        }
    }
    q.parse::<f64>().map_err(|_| QuantityError(qty.to_string()))
}

#[cfg(test)]
mod tests {

    //! - cpu suffixes: n/u/m and bare cores
    //! - memory suffixes: binary, decimal and bare bytes
    //! - malformed strings are rejected, not defaulted

    use super::*;

    #[test]
    fn cpu_suffixes() {
        assert_eq!(parse_cpu("2").unwrap(), 2.0);
        assert_eq!(parse_cpu("250m").unwrap(), 0.25);
        assert_eq!(parse_cpu("1234u").unwrap(), 0.001234);
        let nano = parse_cpu("164202573n").unwrap();
        assert!((nano - 0.164202573).abs() < 1e-12);
    }

    #[test]
    fn memory_suffixes() {
        assert_eq!(parse_memory("512Mi").unwrap(), 536870912.0);
        assert_eq!(parse_memory("1Gi").unwrap(), 1073741824.0);
        assert_eq!(parse_memory("4Ki").unwrap(), 4096.0);
        assert_eq!(parse_memory("2Ti").unwrap(), 2.0 * 1024f64.powi(4));
        assert_eq!(parse_memory("500k").unwrap(), 500_000.0);
        assert_eq!(parse_memory("5M").unwrap(), 5_000_000.0);
        assert_eq!(parse_memory("1G").unwrap(), 1_000_000_000.0);
        assert_eq!(parse_memory("1024").unwrap(), 1024.0);
    }

    #[test]
    fn rejects_malformed() {
        assert!(parse_cpu("abc").is_err());
        assert!(parse_cpu("").is_err());
        assert!(parse_memory("12Qi").is_err());
        assert!(parse_memory("").is_err());
    }
}
