use rand::Rng;

const CODE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a coupon code in the `VYAAS-XXXX` format.
pub fn generate_coupon_code() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..4)
        .map(|_| CODE_CHARS[rng.gen_range(0..CODE_CHARS.len())] as char)
        .collect();
    format!("VYAAS-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coupon_code_format() {
        let code = generate_coupon_code();
        assert_eq!(code.len(), 10);
        assert!(code.starts_with("VYAAS-"));
        assert!(
            code[6..]
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }
}
