//! Property ordering.
//!
//! Properties are ordered by descending `YamlProperty.order`; ties fall back
//! to the natural order of [`Property`] (lexicographic by name). Unannotated
//! properties have order 0 and interleave with annotated ones accordingly.

use std::cmp::Ordering;

use super::Property;

/// Total order over properties: greater `order` first, then natural order.
pub fn compare_properties(p1: &Property, p2: &Property) -> Ordering {
    p2.order().cmp(&p1.order()).then_with(|| p1.cmp(p2))
}

/// Ordered set of properties: sorted by [`compare_properties`], duplicates removed.
pub fn ordered_properties<'a, I>(properties: I) -> Vec<Property>
where
    I: IntoIterator<Item = &'a Property>,
{
    let mut ordered: Vec<Property> = properties.into_iter().cloned().collect();
    ordered.sort_by(compare_properties);
    ordered.dedup_by(|a, b| compare_properties(a, b) == Ordering::Equal);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::TypeDescriptor;

    fn names(properties: &[Property]) -> Vec<&str> {
        properties.iter().map(Property::name).collect()
    }

    #[test]
    fn test_higher_order_comes_first() {
        let descriptor = TypeDescriptor::builder("T")
            .property("c", |p| p.order(-5))
            .property("b", |p| p)
            .property("a", |p| p.order(10))
            .build()
            .unwrap();

        let ordered = ordered_properties(descriptor.properties());
        assert_eq!(names(&ordered), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_ties_fall_back_to_name() {
        let descriptor = TypeDescriptor::builder("T")
            .property("zeta", |p| p.order(1))
            .property("alpha", |p| p.order(1))
            .property("mid", |p| p)
            .property("beta", |p| p)
            .build()
            .unwrap();

        let ordered = ordered_properties(descriptor.properties());
        assert_eq!(names(&ordered), vec!["alpha", "zeta", "beta", "mid"]);
    }

    #[test]
    fn test_renamed_property_sorts_by_emitted_name() {
        let descriptor = TypeDescriptor::builder("T")
            .property("a_field", |p| p.key("z"))
            .property("m", |p| p)
            .build()
            .unwrap();

        let ordered = ordered_properties(descriptor.properties());
        assert_eq!(names(&ordered), vec!["m", "z"]);
    }

    #[test]
    fn test_ordering_is_idempotent_and_deduplicated() {
        let descriptor = TypeDescriptor::builder("T")
            .property("b", |p| p.order(2))
            .property("a", |p| p)
            .property("c", |p| p.order(-1))
            .build()
            .unwrap();

        let mut doubled = descriptor.properties().to_vec();
        doubled.extend_from_slice(descriptor.properties());

        let once = ordered_properties(&doubled);
        let twice = ordered_properties(&once);

        assert_eq!(once.len(), 3);
        assert_eq!(names(&once), names(&twice));
    }

    #[test]
    fn test_comparator_is_antisymmetric() {
        let descriptor = TypeDescriptor::builder("T")
            .property("a", |p| p.order(i32::MIN))
            .property("b", |p| p.order(i32::MAX))
            .build()
            .unwrap();
        let [a, b] = [&descriptor.properties()[0], &descriptor.properties()[1]];

        assert_eq!(compare_properties(b, a), Ordering::Less);
        assert_eq!(compare_properties(a, b), Ordering::Greater);
        assert_eq!(compare_properties(a, a), Ordering::Equal);
    }
}
