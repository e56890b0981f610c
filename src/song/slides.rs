//! Re-chunking of base slides into presentation slides. The same stored song
//! can render one, two, or four lines per slide without re-parsing, trading
//! granularity for on-screen density.

use crate::models::Slide;

/// Transform two-line base slides into presentation slides of the requested
/// line count.
///
/// Supported values: `1` flattens every line into its own slide, `2` is the
/// identity, `4` merges slides pairwise (an odd tail slide is kept verbatim).
/// Any other value yields an empty list rather than an error; the config
/// layer only admits the supported sizes, so the fallthrough exists purely so
/// downstream renders "no slides" instead of panicking.
pub fn rechunk(slides: &[Slide], lines_per_slide: usize) -> Vec<Slide> {
    match lines_per_slide {
        1 => slides
            .iter()
            .flat_map(|slide| slide.lines.iter().cloned())
            .map(|line| Slide { lines: vec![line] })
            .collect(),
        2 => slides.to_vec(),
        4 => slides
            .chunks(2)
            .map(|pair| {
                let mut lines = pair[0].lines.clone();
                if let Some(second) = pair.get(1) {
                    lines.extend(second.lines.iter().cloned());
                }
                Slide { lines }
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_slides() -> Vec<Slide> {
        vec![
            Slide::new(["a1", "a2"]),
            Slide::new(["b1", "b2"]),
            Slide::new(["c1", "c2"]),
        ]
    }

    #[test]
    fn size_one_flattens_to_single_lines() {
        let out = rechunk(&base_slides(), 1);
        let total_lines: usize = base_slides().iter().map(|s| s.lines.len()).sum();
        assert_eq!(out.len(), total_lines);
        assert!(out.iter().all(|s| s.lines.len() == 1));
        assert_eq!(out[0], Slide::new(["a1"]));
        assert_eq!(out[5], Slide::new(["c2"]));
    }

    #[test]
    fn size_two_is_identity() {
        assert_eq!(rechunk(&base_slides(), 2), base_slides());
        assert_eq!(rechunk(&[], 2), Vec::<Slide>::new());
    }

    #[test]
    fn size_four_merges_pairs() {
        let input = vec![
            Slide::new(["a1", "a2"]),
            Slide::new(["b1", "b2"]),
            Slide::new(["c1", "c2"]),
            Slide::new(["d1", "d2"]),
        ];
        let out = rechunk(&input, 4);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], Slide::new(["a1", "a2", "b1", "b2"]));
        assert_eq!(out[1], Slide::new(["c1", "c2", "d1", "d2"]));
    }

    #[test]
    fn size_four_keeps_odd_tail_verbatim() {
        let out = rechunk(&base_slides(), 4);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1], Slide::new(["c1", "c2"]));
    }

    #[test]
    fn unsupported_sizes_yield_empty() {
        assert!(rechunk(&base_slides(), 0).is_empty());
        assert!(rechunk(&base_slides(), 3).is_empty());
        assert!(rechunk(&base_slides(), 8).is_empty());
    }
}
