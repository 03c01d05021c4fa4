pub mod constants;

/// Round to one decimal place, the precision all reported temperatures use.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_tenth() {
        assert_eq!(round_tenth(86.04), 86.0);
        assert_eq!(round_tenth(87.75), 87.8);
        assert_eq!(round_tenth(-10.26), -10.3);
        assert_eq!(round_tenth(32.0), 32.0);
    }
}
