use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{BTreeMap, HashSet};
use std::fs;

use taco2yolo::categories::{group_by_image, select_categories};
use taco2yolo::config::{validate_ratio, validate_top_k};
use taco2yolo::conversion::{coco_bbox_to_yolo, convert_annotations, render_label_file};
use taco2yolo::dataset::split_dataset;
use taco2yolo::io::staged_stem;
use taco2yolo::types::AnnotationRecord;
use taco2yolo::{ConvertError, ImageResolver, NormalizedBox, StagedImage};

fn annotation(image_id: u32, category_id: u32, bbox: [f64; 4]) -> AnnotationRecord {
    AnnotationRecord {
        image_id,
        category_id,
        bbox: Some(bbox),
    }
}

fn categories(entries: &[(u32, &str)]) -> BTreeMap<u32, String> {
    entries
        .iter()
        .map(|&(id, name)| (id, name.to_string()))
        .collect()
}

fn staged_images(count: u32) -> Vec<StagedImage> {
    (1..=count)
        .map(|id| StagedImage {
            stem: staged_stem(id),
            image_file: format!("{}.jpg", staged_stem(id)),
        })
        .collect()
}

#[test]
fn test_validate_ratio() {
    assert!(validate_ratio("0.5").is_ok());
    assert!(validate_ratio("1.0").is_ok());
    assert!(validate_ratio("0.0").is_ok());
    assert!(validate_ratio("-0.1").is_err());
    assert!(validate_ratio("1.1").is_err());
    assert!(validate_ratio("abc").is_err());
}

#[test]
fn test_validate_top_k() {
    assert_eq!(validate_top_k("10"), Ok(10));
    assert!(validate_top_k("0").is_err());
    assert!(validate_top_k("-1").is_err());
}

#[test]
fn test_coco_bbox_to_yolo() {
    let normalized = coco_bbox_to_yolo([10.0, 10.0, 10.0, 10.0], 100, 100).unwrap();

    assert!((normalized.x_center - 0.15).abs() < 1e-12);
    assert!((normalized.y_center - 0.15).abs() < 1e-12);
    assert!((normalized.width - 0.1).abs() < 1e-12);
    assert!((normalized.height - 0.1).abs() < 1e-12);
}

#[test]
fn test_bbox_round_trip_inside_image() {
    let (img_w, img_h) = (1920u32, 1080u32);
    let boxes = [
        [0.0, 0.0, 1920.0, 1080.0],
        [12.5, 40.25, 300.0, 2.0],
        [1000.0, 500.0, 919.0, 579.0],
        [733.3, 211.7, 45.9, 88.1],
    ];

    for bbox in boxes {
        let n = coco_bbox_to_yolo(bbox, img_w, img_h).unwrap();
        let w = n.width * img_w as f64;
        let h = n.height * img_h as f64;
        let x = n.x_center * img_w as f64 - w / 2.0;
        let y = n.y_center * img_h as f64 - h / 2.0;
        for (got, want) in [x, y, w, h].iter().zip(bbox.iter()) {
            assert!((got - want).abs() < 1e-4, "{:?} -> {:?}", bbox, n);
        }
    }
}

#[test]
fn test_degenerate_boxes_are_rejected() {
    assert_eq!(coco_bbox_to_yolo([5.0, 5.0, 0.5, 10.0], 100, 100), None);
    assert_eq!(coco_bbox_to_yolo([5.0, 5.0, 10.0, 0.9], 100, 100), None);
    assert_eq!(coco_bbox_to_yolo([5.0, 5.0, 1.0, 10.0], 100, 100), None);
    assert_eq!(coco_bbox_to_yolo([5.0, 5.0, 10.0, 10.0], 0, 100), None);
}

#[test]
fn test_out_of_bounds_box_is_clamped() {
    let normalized = coco_bbox_to_yolo([-5.0, -5.0, 20.0, 20.0], 10, 10).unwrap();

    assert_eq!(
        normalized,
        NormalizedBox {
            x_center: 0.5,
            y_center: 0.5,
            width: 1.0,
            height: 1.0,
        }
    );

    let far = coco_bbox_to_yolo([50.0, 50.0, 20.0, 20.0], 10, 10).unwrap();
    assert_eq!(far.x_center, 1.0);
    assert_eq!(far.y_center, 1.0);
    assert_eq!(far.width, 1.0);
}

#[test]
fn test_label_line_format() {
    let normalized = coco_bbox_to_yolo([10.0, 10.0, 10.0, 10.0], 100, 100).unwrap();
    assert_eq!(
        normalized.to_label_line(3),
        "3 0.150000 0.150000 0.100000 0.100000"
    );
}

#[test]
fn test_convert_annotations_filters() {
    let label_space = select_categories(&categories(&[(1, "bottle")]), &[], None);
    let kept = annotation(1, 1, [10.0, 10.0, 10.0, 10.0]);
    let degenerate = annotation(1, 1, [10.0, 10.0, 0.5, 10.0]);
    let unselected = annotation(1, 7, [10.0, 10.0, 10.0, 10.0]);
    let no_bbox = AnnotationRecord {
        image_id: 1,
        category_id: 1,
        bbox: None,
    };

    let lines = convert_annotations(
        &[&kept, &degenerate, &unselected, &no_bbox],
        &label_space,
        100,
        100,
    );

    assert_eq!(lines, vec!["0 0.150000 0.150000 0.100000 0.100000"]);
    assert_eq!(render_label_file(&lines), format!("{}\n", lines[0]));
    assert_eq!(render_label_file(&[]), "");
}

#[test]
fn test_remap_sorted_by_name() {
    let forward = categories(&[(10, "can"), (3, "bottle"), (7, "lid")]);
    let label_space = select_categories(&forward, &[], None);

    assert_eq!(label_space.names, vec!["bottle", "can", "lid"]);
    assert_eq!(label_space.class_id(3), Some(0));
    assert_eq!(label_space.class_id(10), Some(1));
    assert_eq!(label_space.class_id(7), Some(2));
}

#[test]
fn test_remap_independent_of_declaration_order() {
    let first = categories(&[(1, "paper"), (2, "glass"), (3, "plastic bag")]);
    let second = categories(&[(3, "plastic bag"), (1, "paper"), (2, "glass")]);

    assert_eq!(
        select_categories(&first, &[], None),
        select_categories(&second, &[], None)
    );
}

#[test]
fn test_top_k_ties_broken_by_id() {
    let cats = categories(&[(1, "can"), (2, "bottle"), (3, "lid"), (4, "cup")]);
    let annotations = vec![
        annotation(1, 1, [0.0, 0.0, 5.0, 5.0]),
        annotation(1, 1, [0.0, 0.0, 5.0, 5.0]),
        annotation(1, 2, [0.0, 0.0, 5.0, 5.0]),
        annotation(2, 2, [0.0, 0.0, 5.0, 5.0]),
        annotation(2, 2, [0.0, 0.0, 5.0, 5.0]),
        annotation(2, 3, [0.0, 0.0, 5.0, 5.0]),
        annotation(3, 3, [0.0, 0.0, 5.0, 5.0]),
        annotation(3, 99, [0.0, 0.0, 5.0, 5.0]),
    ];

    let top_two = select_categories(&cats, &annotations, Some(2));
    assert_eq!(top_two.names, vec!["bottle", "can"]);
    assert_eq!(top_two.class_id(2), Some(0));
    assert_eq!(top_two.class_id(1), Some(1));
    assert_eq!(top_two.class_id(3), None);

    // Categories without annotations are never picked by top-k
    let all = select_categories(&cats, &annotations, Some(10));
    assert_eq!(all.names, vec!["bottle", "can", "lid"]);
}

#[test]
fn test_group_by_image_drops_unselected() {
    let cats = categories(&[(1, "can"), (2, "bottle")]);
    let annotations = vec![
        annotation(1, 1, [0.0, 0.0, 5.0, 5.0]),
        annotation(1, 2, [0.0, 0.0, 6.0, 6.0]),
        annotation(2, 1, [0.0, 0.0, 7.0, 7.0]),
    ];
    let label_space = select_categories(&cats, &annotations, Some(1));

    let grouped = group_by_image(&annotations, &label_space);

    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped[&1].len(), 1);
    assert_eq!(grouped[&1][0].category_id, 1);
    assert_eq!(grouped[&2].len(), 1);
}

#[test]
fn test_split_dataset_is_deterministic() {
    let first = split_dataset(staged_images(10), 0.8, &mut StdRng::seed_from_u64(42));
    let second = split_dataset(staged_images(10), 0.8, &mut StdRng::seed_from_u64(42));

    assert_eq!(first, second);
    assert_eq!(first.train.len(), 8);
    assert_eq!(first.val.len(), 2);

    let train: HashSet<_> = first.train.iter().collect();
    let val: HashSet<_> = first.val.iter().collect();
    assert!(train.is_disjoint(&val));
    assert_eq!(train.len() + val.len(), 10);
}

#[test]
fn test_split_dataset_fixed_assignment_for_seed_42() {
    let split = split_dataset(staged_images(2), 0.8, &mut StdRng::seed_from_u64(42));

    let train: Vec<&str> = split.train.iter().map(|s| s.stem.as_str()).collect();
    let val: Vec<&str> = split.val.iter().map(|s| s.stem.as_str()).collect();
    assert_eq!(train, vec!["00000002"]);
    assert_eq!(val, vec!["00000001"]);
}

#[test]
fn test_split_dataset_ignores_input_order() {
    let mut reversed = staged_images(25);
    reversed.reverse();

    let sorted = split_dataset(staged_images(25), 0.8, &mut StdRng::seed_from_u64(7));
    let from_reversed = split_dataset(reversed, 0.8, &mut StdRng::seed_from_u64(7));

    assert_eq!(sorted, from_reversed);
}

#[test]
fn test_split_dataset_ratio_bounds() {
    let all_val = split_dataset(staged_images(5), 0.0, &mut StdRng::seed_from_u64(42));
    assert!(all_val.train.is_empty());
    assert_eq!(all_val.val.len(), 5);

    let all_train = split_dataset(staged_images(5), 1.0, &mut StdRng::seed_from_u64(42));
    assert_eq!(all_train.train.len(), 5);
    assert!(all_train.val.is_empty());

    let empty = split_dataset(Vec::new(), 0.8, &mut StdRng::seed_from_u64(42));
    assert!(empty.train.is_empty() && empty.val.is_empty());
}

#[test]
fn test_resolver_prefers_recorded_path() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("batch_1")).unwrap();
    fs::create_dir_all(root.join("batch_2")).unwrap();
    fs::write(root.join("batch_1/000001.jpg"), b"one").unwrap();
    fs::write(root.join("batch_2/000001.jpg"), b"two").unwrap();

    let resolver = ImageResolver::new(root);

    assert_eq!(
        resolver.resolve("batch_2/000001.jpg").unwrap(),
        root.join("batch_2/000001.jpg")
    );
}

#[test]
fn test_resolver_searches_batch_directories() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("batch_3")).unwrap();
    fs::create_dir_all(root.join("batch_5")).unwrap();
    fs::write(root.join("batch_5/IMG_0042.JPG"), b"img").unwrap();
    fs::write(root.join("batch_3/IMG_0042.JPG"), b"img").unwrap();

    let resolver = ImageResolver::new(root);

    assert_eq!(
        resolver.resolve("IMG_0042.JPG").unwrap(),
        root.join("batch_3/IMG_0042.JPG")
    );
    assert_eq!(
        resolver.resolve("batch_1/IMG_0042.JPG").unwrap(),
        root.join("batch_3/IMG_0042.JPG")
    );
}

#[test]
fn test_resolver_searches_batches_under_glob_like_root() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path().join("taco[v1]*");
    fs::create_dir_all(root.join("batch_2")).unwrap();
    fs::write(root.join("batch_2/IMG_7.jpg"), b"img").unwrap();

    let resolver = ImageResolver::new(&root);

    assert_eq!(
        resolver.resolve("IMG_7.jpg").unwrap(),
        root.join("batch_2/IMG_7.jpg")
    );
}

#[test]
fn test_resolver_reports_missing_image() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("batch_1/nested")).unwrap();
    fs::create_dir_all(root.join("other")).unwrap();
    fs::write(root.join("batch_1/nested/deep.jpg"), b"img").unwrap();
    fs::write(root.join("other/elsewhere.jpg"), b"img").unwrap();

    let resolver = ImageResolver::new(root);

    for recorded in ["deep.jpg", "elsewhere.jpg", "batch_1/gone.jpg"] {
        match resolver.resolve(recorded) {
            Err(ConvertError::ImageNotFound { file_name }) => assert_eq!(file_name, recorded),
            other => panic!("expected ImageNotFound for {}, got {:?}", recorded, other),
        }
    }
}
