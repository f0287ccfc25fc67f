use brandkit_text::{
    FontCache, FontMetrics, TextStyle, advance_after_prefix, glyph_positions, measure_ink_width,
};

fn latin_metrics() -> FontMetrics {
    // Uppercase A-Z plus space, with advances loosely shaped like a condensed display face.
    let mut cmap = vec![(' ', 1u16)];
    let mut advances = vec![0u16, 174];
    for (i, ch) in ('A'..='Z').enumerate() {
        cmap.push((ch, (i + 2) as u16));
        advances.push(320 + ((i as u16 * 37) % 180));
    }
    FontMetrics::from_tables(cmap, advances, 1000).unwrap()
}

const SAMPLES: &[&str] = &["A", "ARCHON", "CUSTODYZERO", "CUSTODY", "Z", "THE CAPABILITY"];

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

#[test]
fn advance_after_is_ink_width_plus_one_gap() {
    let metrics = latin_metrics();
    for &text in SAMPLES {
        for &(size, spacing) in &[(13.0, 0.05), (72.0, 0.12), (110.0, 0.15), (26.0, 0.0)] {
            let style = TextStyle::new(size, spacing);
            let ink = measure_ink_width(text, &metrics, &style).unwrap();
            let after = advance_after_prefix(text, &metrics, &style).unwrap();
            assert!(
                close(after, ink + style.letter_spacing_px()),
                "{text:?} @ {size}px/{spacing}em: ink={ink} after={after}"
            );
        }
    }
}

#[test]
fn widths_are_monotone_in_font_size() {
    let metrics = latin_metrics();
    for &text in SAMPLES {
        let mut last_ink = 0.0;
        let mut last_after = 0.0;
        for step in 1..=40 {
            let style = TextStyle::new(step as f64 * 4.0, 0.12);
            let ink = measure_ink_width(text, &metrics, &style).unwrap();
            let after = advance_after_prefix(text, &metrics, &style).unwrap();
            assert!(ink >= last_ink, "{text:?}: ink shrank at {}px", style.font_size);
            assert!(after >= last_after, "{text:?}: advance shrank at {}px", style.font_size);
            last_ink = ink;
            last_after = after;
        }
    }
}

#[test]
fn zero_spacing_makes_both_measures_agree() {
    let metrics = latin_metrics();
    let style = TextStyle::new(64.0, 0.0);
    for &text in SAMPLES {
        let ink = measure_ink_width(text, &metrics, &style).unwrap();
        let after = advance_after_prefix(text, &metrics, &style).unwrap();
        let plain: f64 = glyph_positions(text, &metrics, &style)
            .unwrap()
            .iter()
            .map(|g| g.advance)
            .sum();
        assert!(close(ink, plain) && close(after, plain), "{text:?}");
    }
}

#[test]
fn prefix_advance_plus_suffix_ink_equals_full_ink() {
    let metrics = latin_metrics();
    let style = TextStyle::new(110.0, 0.15);
    let full = measure_ink_width("CUSTODYZERO", &metrics, &style).unwrap();
    let prefix = advance_after_prefix("CUSTODY", &metrics, &style).unwrap();
    let suffix = measure_ink_width("ZERO", &metrics, &style).unwrap();
    assert!(close(full, prefix + suffix), "{full} vs {prefix} + {suffix}");
}

fn system_font_path() -> Option<std::path::PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .map(std::path::PathBuf::from)
    .find(|p| p.is_file())
}

#[test]
fn real_font_measures_positive_widths() {
    let Some(path) = system_font_path() else {
        eprintln!("Skipping test: no system font found");
        return;
    };

    let mut cache = FontCache::new();
    let font = cache.get_or_load(&path).expect("parse system font");
    let again = cache.get_or_load(&path).expect("cached font");
    assert!(std::sync::Arc::ptr_eq(&font, &again));
    assert_eq!(cache.len(), 1);

    let style = TextStyle::new(72.0, 0.12);
    let ink = measure_ink_width("ARCHON", &font.metrics, &style).unwrap();
    assert!(ink > 0.0);
    let after = advance_after_prefix("ARCHON", &font.metrics, &style).unwrap();
    assert!(close(after, ink + style.letter_spacing_px()));
}
