use crate::types::{AnnotationRecord, LabelSpace, NormalizedBox};

/// Convert a COCO `[x_min, y_min, width, height]` pixel box to YOLO form.
///
/// Boxes no larger than one pixel on either side are annotation noise and yield
/// `None`. Components are clamped to `[0, 1]`; a box left with no extent after
/// clamping also yields `None`.
pub fn coco_bbox_to_yolo(
    bbox: [f64; 4],
    image_width: u32,
    image_height: u32,
) -> Option<NormalizedBox> {
    let [x, y, w, h] = bbox;
    if !(w > 1.0 && h > 1.0) || image_width == 0 || image_height == 0 {
        return None;
    }

    let img_w = image_width as f64;
    let img_h = image_height as f64;

    let x_center = clamp_unit((x + w / 2.0) / img_w);
    let y_center = clamp_unit((y + h / 2.0) / img_h);
    let width = clamp_unit(w / img_w);
    let height = clamp_unit(h / img_h);

    if !(width > 0.0 && height > 0.0) {
        return None;
    }

    Some(NormalizedBox {
        x_center,
        y_center,
        width,
        height,
    })
}

fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Convert the annotations of one image to YOLO label lines.
///
/// Annotations outside the label space, without a bbox, or rejected by
/// [`coco_bbox_to_yolo`] produce no line.
pub fn convert_annotations(
    annotations: &[&AnnotationRecord],
    label_space: &LabelSpace,
    image_width: u32,
    image_height: u32,
) -> Vec<String> {
    annotations
        .iter()
        .filter_map(|annotation| {
            let class_id = label_space.class_id(annotation.category_id)?;
            let bbox = annotation.bbox?;
            let normalized = coco_bbox_to_yolo(bbox, image_width, image_height)?;
            Some(normalized.to_label_line(class_id))
        })
        .collect()
}

/// Render label lines as file contents; no boxes means an empty file.
pub fn render_label_file(lines: &[String]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let mut contents = lines.join("\n");
    contents.push('\n');
    contents
}
