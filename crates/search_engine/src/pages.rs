/// Pages fetched concurrently per batch.
pub const DEFAULT_BATCH_SIZE: usize = 3;

/// `page-007.html` for page 7. Pages are 1-based.
pub fn page_filename(page: u32) -> String {
    format!("page-{page:03}.html")
}

/// Ordered page filenames split into consecutive batches.
///
/// A zero batch size is treated as one so the scan always makes progress.
pub fn page_batches(total_pages: u32, batch_size: usize) -> Vec<Vec<String>> {
    let files: Vec<String> = (1..=total_pages).map(page_filename).collect();
    files
        .chunks(batch_size.max(1))
        .map(<[String]>::to_vec)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn filenames_are_zero_padded() {
        assert_eq!(page_filename(1), "page-001.html");
        assert_eq!(page_filename(42), "page-042.html");
        assert_eq!(page_filename(1234), "page-1234.html");
    }

    #[test]
    fn seven_pages_make_three_batches() {
        let batches = page_batches(7, DEFAULT_BATCH_SIZE);
        assert_eq!(
            batches,
            vec![
                vec!["page-001.html", "page-002.html", "page-003.html"],
                vec!["page-004.html", "page-005.html", "page-006.html"],
                vec!["page-007.html"],
            ]
        );
    }

    #[test]
    fn no_pages_no_batches() {
        assert!(page_batches(0, DEFAULT_BATCH_SIZE).is_empty());
    }

    proptest! {
        #[test]
        fn batch_k_holds_pages_3k_plus_1_onwards(total in 0u32..200) {
            let batches = page_batches(total, DEFAULT_BATCH_SIZE);
            prop_assert_eq!(batches.len() as u32, total.div_ceil(3));
            for (k, batch) in batches.iter().enumerate() {
                let first = 3 * k as u32 + 1;
                let last = (3 * k as u32 + 3).min(total);
                let expected: Vec<String> = (first..=last).map(page_filename).collect();
                prop_assert_eq!(batch, &expected);
            }
        }
    }
}
