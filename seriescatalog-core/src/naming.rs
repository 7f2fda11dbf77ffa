//! Output file names, derived purely from record fields.

use std::collections::HashSet;

use crate::render::has_detail_page;
use crate::series::Series;

/// Lowercase ASCII slug: runs of anything but letters and digits become `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

fn series_slug(series: &Series) -> String {
    series
        .id()
        .map(slugify)
        .filter(|s| !s.is_empty())
        .or_else(|| series.title().map(slugify).filter(|s| !s.is_empty()))
        .unwrap_or_else(|| "series".to_string())
}

/// File name of a series detail page: slug of the id, falling back to the title.
///
/// Not unique on its own; use [`detail_page_names`] when naming a whole list.
pub fn series_file_name(series: &Series, extension: &str) -> String {
    format!("series-{}.{}", series_slug(series), extension)
}

/// Detail page file name for every series in `series_list`, in list order.
///
/// `None` for series without a detail page. A name already taken earlier in
/// the list gets the first free numeric suffix (`series-hope-2.html`), so
/// every page in one pass has its own file.
pub fn detail_page_names(series_list: &[Series], extension: &str) -> Vec<Option<String>> {
    let mut taken = HashSet::new();
    series_list
        .iter()
        .map(|series| {
            if !has_detail_page(series) {
                return None;
            }
            let slug = series_slug(series);
            let mut name = format!("series-{}.{}", slug, extension);
            let mut suffix = 2;
            while taken.contains(&name) {
                name = format!("series-{}-{}.{}", slug, suffix, extension);
                suffix += 1;
            }
            taken.insert(name.clone());
            Some(name)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::AccessLevel;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Abide in Me (Part 2)"), "abide-in-me-part-2");
        assert_eq!(slugify("--"), "");
    }

    #[test]
    fn test_series_file_name_fallbacks() {
        let mut series = Series::new();
        assert_eq!(series_file_name(&series, "html"), "series-series.html");

        series.set_title("Fruit of the Spirit".to_string());
        assert_eq!(series_file_name(&series, "html"), "series-fruit-of-the-spirit.html");

        series.set_id("FOTS-2014".to_string());
        assert_eq!(series_file_name(&series, "json"), "series-fots-2014.json");
    }

    fn public(id: &str, title: &str) -> Series {
        let mut series = Series::new();
        series.set_id(id.to_string());
        series.set_title(title.to_string());
        series.set_visibility(Some(AccessLevel::Public));
        series
    }

    #[test]
    fn test_detail_page_names_are_unique() {
        let mut private = public("hope", "Hidden Hope");
        private.set_visibility(Some(AccessLevel::Private));
        let list = vec![
            public("Hope!", "Hope Part One"),
            private,
            public("hope", "Hope Part Two"),
            public("hope-2", "Hope Again"),
        ];

        assert_eq!(
            detail_page_names(&list, "html"),
            vec![
                Some("series-hope.html".to_string()),
                None,
                Some("series-hope-2.html".to_string()),
                Some("series-hope-2-2.html".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_slugs_fall_back_and_stay_unique() {
        let list = vec![public("\u{00e9}", "\u{00c9}"), public("\u{00fc}", "\u{00dc}")];
        assert_eq!(
            detail_page_names(&list, "json"),
            vec![Some("series-series.json".to_string()), Some("series-series-2.json".to_string())]
        );
    }
}
