//! Category selection and dense label assignment.

use std::collections::{BTreeMap, HashMap};

use crate::types::{AnnotationRecord, LabelSpace};

/// Select the categories to train on and assign them dense class ids.
///
/// Without `top_k` every category of the index is selected. With `top_k`, the
/// categories are ranked by annotation count (descending, ties by ascending id)
/// and the first `k` with at least one annotation are kept.
///
/// Class ids follow the lexicographic order of category names (then id), so the
/// mapping does not depend on declaration order in the source document.
pub fn select_categories(
    categories: &BTreeMap<u32, String>,
    annotations: &[AnnotationRecord],
    top_k: Option<usize>,
) -> LabelSpace {
    let mut selected: Vec<u32> = match top_k {
        None => categories.keys().copied().collect(),
        Some(k) => {
            let counts = count_annotations_per_category(categories, annotations);
            let mut ranked: Vec<(u32, usize)> = counts.into_iter().collect();
            ranked.sort_by(|(id_a, count_a), (id_b, count_b)| {
                count_b.cmp(count_a).then(id_a.cmp(id_b))
            });
            ranked.into_iter().take(k).map(|(id, _)| id).collect()
        }
    };

    selected.sort_by(|a, b| categories[a].cmp(&categories[b]).then(a.cmp(b)));

    let remap = selected
        .iter()
        .enumerate()
        .map(|(class_id, &category_id)| (category_id, class_id))
        .collect();
    let names = selected.iter().map(|id| categories[id].clone()).collect();

    LabelSpace { remap, names }
}

/// Count annotations per known category id. Unknown ids are not counted.
pub fn count_annotations_per_category(
    categories: &BTreeMap<u32, String>,
    annotations: &[AnnotationRecord],
) -> HashMap<u32, usize> {
    let mut counts = HashMap::new();
    for annotation in annotations {
        if categories.contains_key(&annotation.category_id) {
            *counts.entry(annotation.category_id).or_insert(0) += 1;
        }
    }
    counts
}

/// Group the annotations of selected categories by image id, keeping document order.
pub fn group_by_image<'a>(
    annotations: &'a [AnnotationRecord],
    label_space: &LabelSpace,
) -> HashMap<u32, Vec<&'a AnnotationRecord>> {
    let mut grouped: HashMap<u32, Vec<&AnnotationRecord>> = HashMap::new();
    for annotation in annotations {
        if label_space.class_id(annotation.category_id).is_some() {
            grouped.entry(annotation.image_id).or_default().push(annotation);
        }
    }
    grouped
}
