//! OCR engine wrapper over `pure-onnx-ocr`.

use std::path::Path;

use image::DynamicImage;

use crate::error::OcrError;

use super::{OcrResult, OcrWord};

/// Recognizer backed by `pure-onnx-ocr` models loaded from a directory
/// (`det.onnx`, `latin_rec.onnx`, `latin_dict.txt`).
///
/// Without the `ocr` cargo feature this type still exists so callers
/// compile, but construction always reports the backend unavailable.
pub struct OcrEngine {
    #[cfg(feature = "ocr")]
    inner: pure_onnx_ocr::engine::OcrEngine,
}

impl OcrEngine {
    /// Load models from `model_dir`.
    #[cfg(feature = "ocr")]
    pub fn from_dir(model_dir: &Path) -> Result<Self, OcrError> {
        use tracing::info;

        let det_path = model_dir.join("det.onnx");
        let rec_path = model_dir.join("latin_rec.onnx");
        let dict_path = model_dir.join("latin_dict.txt");

        if !det_path.exists() || !rec_path.exists() || !dict_path.exists() {
            return Err(OcrError::Unavailable(format!(
                "OCR models not found in {}",
                model_dir.display()
            )));
        }

        let inner = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("loaded OCR engine from {}", model_dir.display());
        Ok(Self { inner })
    }

    #[cfg(not(feature = "ocr"))]
    pub fn from_dir(_model_dir: &Path) -> Result<Self, OcrError> {
        Err(OcrError::Unavailable(
            "stex-core was built without the `ocr` feature".to_string(),
        ))
    }

    /// Recognize one page image into positioned words.
    #[cfg(feature = "ocr")]
    pub fn recognize(&self, image: &DynamicImage) -> Result<OcrResult, OcrError> {
        use image::GenericImageView;
        use tracing::debug;

        let (width, height) = image.dimensions();
        let results = self
            .inner
            .run_from_image(image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        debug!("OCR returned {} regions for {}x{} image", results.len(), width, height);

        let words: Vec<OcrWord> = results
            .iter()
            .map(|r| {
                let (x0, y0, x1, y1) = polygon_rect(&r.bounding_box);
                OcrWord {
                    text: r.text.replace("[UNK]", " ").trim().to_string(),
                    x0,
                    y0,
                    x1,
                    y1,
                    // Backend reports 0..1; the engine works in percent.
                    conf: r.confidence * 100.0,
                }
            })
            .filter(|w| !w.text.is_empty())
            .collect();

        Ok(OcrResult { words, image_size: (width, height) }.finish())
    }

    #[cfg(not(feature = "ocr"))]
    pub fn recognize(&self, _image: &DynamicImage) -> Result<OcrResult, OcrError> {
        Err(OcrError::Unavailable(
            "stex-core was built without the `ocr` feature".to_string(),
        ))
    }
}

/// Axis-aligned rectangle of a detection polygon's first four points.
#[cfg(feature = "ocr")]
fn polygon_rect(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f32, f32, f32, f32) {
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for coord in polygon.exterior().coords().take(4) {
        min_x = min_x.min(coord.x as f32);
        min_y = min_y.min(coord.y as f32);
        max_x = max_x.max(coord.x as f32);
        max_y = max_y.max(coord.y as f32);
    }
    (min_x, min_y, max_x, max_y)
}
