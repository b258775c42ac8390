//! Deterministic catalog filtering and sorting
//!
//! Pure function of its inputs: same courses, query, filter and sort
//! always produce the same ordered output, and equal-key elements keep
//! their pre-sort relative order (`sort_by` is stable). This keeps tests
//! deterministic and re-renders free of visual jitter.

use crate::{
    normalize::native_to_wei,
    types::{CourseView, SortOption, StatusFilter},
};

/// Filters and sorts the catalog for display
///
/// A course passes the text filter iff the query (case-insensitive) is a
/// substring of its name or description; an empty query passes everything.
/// Both predicates are ANDed. The input is not mutated; a new ordered
/// sequence is returned.
pub fn apply(
    courses: &[CourseView],
    query: &str,
    status: StatusFilter,
    sort: SortOption,
) -> Vec<CourseView> {
    let needle = query.to_lowercase();

    let mut filtered: Vec<CourseView> = courses
        .iter()
        .filter(|course| {
            let matches_query = needle.is_empty()
                || course.name.to_lowercase().contains(&needle)
                || course.description.to_lowercase().contains(&needle);

            let matches_status = match status {
                StatusFilter::All => true,
                StatusFilter::Active => course.is_active,
                StatusFilter::Inactive => !course.is_active,
            };

            matches_query && matches_status
        })
        .cloned()
        .collect();

    filtered.sort_by(|a, b| match sort {
        SortOption::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortOption::PriceAsc => price_wei(a).cmp(&price_wei(b)),
        SortOption::PriceDesc => price_wei(b).cmp(&price_wei(a)),
        SortOption::Students => b.student_count.cmp(&a.student_count),
    });

    filtered
}

/// Exact smallest-unit price for comparison
///
/// Normalized views always carry a parseable price; a view constructed by
/// hand with a broken price sorts as zero rather than panicking.
fn price_wei(course: &CourseView) -> u128 {
    native_to_wei(&course.price_native).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(name: &str, price: &str, active: bool, students: u64) -> CourseView {
        CourseView {
            id: name.to_lowercase(),
            name: name.to_string(),
            description: format!("{} fundamentals", name),
            price_native: price.to_string(),
            is_active: active,
            student_count: students,
        }
    }

    fn sample() -> Vec<CourseView> {
        vec![
            course("Alpha", "1.0", true, 10),
            course("Beta", "2.0", false, 30),
            course("Gamma", "0.5", true, 20),
        ]
    }

    #[test]
    fn filters_active_and_sorts_by_price() {
        let result = apply(&sample(), "", StatusFilter::Active, SortOption::PriceAsc);
        let names: Vec<&str> = result.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Gamma", "Alpha"]);
    }

    #[test]
    fn query_matches_name_or_description_case_insensitively() {
        let result = apply(&sample(), "GAMMA", StatusFilter::All, SortOption::Name);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Gamma");

        let by_description = apply(&sample(), "beta funda", StatusFilter::All, SortOption::Name);
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].name, "Beta");
    }

    #[test]
    fn empty_query_passes_everything() {
        assert_eq!(
            apply(&sample(), "", StatusFilter::All, SortOption::Name).len(),
            3
        );
    }

    #[test]
    fn sorts_by_students_descending() {
        let result = apply(&sample(), "", StatusFilter::All, SortOption::Students);
        let names: Vec<&str> = result.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Beta", "Gamma", "Alpha"]);
    }

    #[test]
    fn equal_keys_keep_pre_sort_order() {
        let courses = vec![
            course("First", "1.0", true, 5),
            course("Second", "1.0", true, 5),
            course("Third", "1.0", true, 5),
        ];
        for sort in [SortOption::PriceAsc, SortOption::PriceDesc, SortOption::Students] {
            let result = apply(&courses, "", StatusFilter::All, sort);
            let names: Vec<&str> = result.iter().map(|c| c.name.as_str()).collect();
            assert_eq!(names, ["First", "Second", "Third"], "sort {:?}", sort);
        }
    }

    #[test]
    fn is_idempotent() {
        let once = apply(&sample(), "a", StatusFilter::Active, SortOption::PriceDesc);
        let twice = apply(&once, "a", StatusFilter::Active, SortOption::PriceDesc);
        assert_eq!(once, twice);
    }

    #[test]
    fn widening_the_status_filter_never_shrinks_the_result() {
        let narrow = apply(&sample(), "a", StatusFilter::Active, SortOption::Name);
        let wide = apply(&sample(), "a", StatusFilter::All, SortOption::Name);
        assert!(wide.len() >= narrow.len());
        for c in &narrow {
            assert!(wide.iter().any(|w| w.id == c.id));
        }
    }

    #[test]
    fn input_is_not_mutated() {
        let courses = sample();
        let before = courses.clone();
        let _ = apply(&courses, "", StatusFilter::All, SortOption::Students);
        assert_eq!(courses, before);
    }
}
