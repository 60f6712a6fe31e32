const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Label for the picked file, e.g. `9.77 KB` for 10 000 bytes. Binary steps of 1024.
pub fn format_size(size: u64) -> String {
    let exponent = match size.checked_ilog2() {
        Some(bits) => ((bits / 10) as usize).min(UNITS.len() - 1),
        None => 0,
    };
    if exponent == 0 {
        return format!("{size} B");
    }

    let scaled = size as f64 / (1u64 << (10 * exponent)) as f64;
    format!("{scaled:.2} {}", UNITS[exponent])
}

#[cfg(test)]
mod tests {
    use super::format_size;

    #[test]
    fn bytes_stay_whole() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
    }

    #[test]
    fn larger_sizes_use_binary_units() {
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(10_000), "9.77 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_size(3 << 40), "3.00 TB");
    }

    #[test]
    fn caps_at_petabytes() {
        assert_eq!(format_size(2048 << 50), "2048.00 PB");
        assert_eq!(format_size(u64::MAX), "16384.00 PB");
    }
}
