use rand::Rng;

pub fn random_alphanum_upper<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut out = String::with_capacity(len);
    for _ in 0..len {
        let idx = rng.gen_range(0..CHARSET.len());
        out.push(char::from(CHARSET[idx]));
    }
    out
}

/// Makes `input` safe as a single path component: whitespace runs become one
/// underscore, separators and other reserved characters become underscores.
pub fn file_name_component(input: &str) -> String {
    const RESERVED: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];
    let mut out = String::with_capacity(input.len());
    let mut prev_space = false;
    for ch in input.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push('_');
            }
            prev_space = true;
            continue;
        }
        prev_space = false;
        if RESERVED.contains(&ch) || ch.is_control() {
            out.push('_');
        } else {
            out.push(ch);
        }
    }
    out
}

pub fn format_rupiah(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 3);
    out.push_str("Rp ");
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn alphanum_suffix_is_uppercase() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let value = random_alphanum_upper(&mut rng, 64);
        assert_eq!(value.len(), 64);
        assert!(value
            .chars()
            .all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit()));
    }

    #[test]
    fn whitespace_runs_become_one_underscore() {
        assert_eq!(file_name_component("Budi Santoso"), "Budi_Santoso");
        assert_eq!(file_name_component("Siti  \tNur haliza"), "Siti_Nur_haliza");
        assert_eq!(file_name_component("Dedi"), "Dedi");
    }

    #[test]
    fn path_separators_are_replaced() {
        assert_eq!(file_name_component("Budi S/O Santoso"), "Budi_S_O_Santoso");
        assert_eq!(file_name_component("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(file_name_component("a\\b:c*d?e\"f<g>h|i"), "a_b_c_d_e_f_g_h_i");
        assert!(!file_name_component("x\u{0}y").contains('\u{0}'));
    }

    #[test]
    fn rupiah_uses_dot_grouping() {
        assert_eq!(format_rupiah(0), "Rp 0");
        assert_eq!(format_rupiah(999), "Rp 999");
        assert_eq!(format_rupiah(175_000), "Rp 175.000");
        assert_eq!(format_rupiah(1_250_000), "Rp 1.250.000");
    }

    #[test]
    fn search_is_case_insensitive() {
        assert!(contains_ignore_case("Jl. Kalita Blok A", "blok a"));
        assert!(!contains_ignore_case("Budi Santoso", "siti"));
    }
}
