/// First `max_chars` characters of `text` followed by `...`.
pub fn truncate_label(text: &str, max_chars: usize) -> String {
    let mut label = text.chars().take(max_chars).collect::<String>();
    label.push_str("...");
    label
}

/// Uniform sample in `min..max`, tolerating an empty or inverted range.
pub fn sample_range(rng: &mut impl rand::Rng, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_label("Réseau déconnecté ?", 8), "Réseau d...");
        assert_eq!(truncate_label("", 20), "...");
    }

    #[test]
    fn degenerate_ranges_return_min() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(sample_range(&mut rng, 2.0, 2.0), 2.0);
        assert_eq!(sample_range(&mut rng, 3.0, 1.0), 3.0);

        let value = sample_range(&mut rng, 0.15, 0.4);
        assert!((0.15..0.4).contains(&value));
    }
}
