//! End-to-end processing of a carrier
//!
//! The pipeline extracts text from a carrier, asks a [`CorrectionModel`] for
//! the corrected text, identifies word-level corrections and projects them
//! back onto the same carrier. Recognition happens once, when an image
//! carrier is built, and those detections are reused for highlighting.

use std::time::Instant;

use image::RgbImage;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::CorrectionConfig;
use crate::diff::Correction;
use crate::document::markup::{compact_html, decode_bytes};
use crate::document::DocumentTree;
use crate::engine::CorrectionEngine;
use crate::error::Result;
use crate::geometry::{Detection, Rect};
use crate::highlight::{project_onto_image, project_onto_tree};
use crate::render;

/// Turns an image into text detections
pub trait Recognizer: Send + Sync {
    fn recognize(&self, image: &RgbImage) -> Result<Vec<Detection>>;

    fn name(&self) -> &str {
        "recognizer"
    }
}

/// Turns text into grammatically corrected text
pub trait CorrectionModel: Send + Sync {
    fn correct(&self, text: &str) -> Result<String>;

    fn name(&self) -> &str {
        "model"
    }
}

/// The medium corrections are projected onto
#[derive(Debug, Clone)]
pub enum Carrier {
    Image {
        image: RgbImage,
        detections: Vec<Detection>,
    },
    Document(DocumentTree),
    PlainText(String),
}

/// Carrier kind as reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Image,
    Document,
    PlainText,
}

impl Carrier {
    /// Run recognition once and keep its detections with the image
    pub fn recognize(image: RgbImage, recognizer: &dyn Recognizer) -> Result<Self> {
        let detections = recognizer.recognize(&image)?;
        debug!(
            recognizer = recognizer.name(),
            detections = detections.len(),
            "recognized image"
        );
        Ok(Carrier::Image { image, detections })
    }

    /// Parse document bytes of unknown encoding
    pub fn from_markup_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Carrier::Document(DocumentTree::parse_html(&decode_bytes(bytes))?))
    }

    pub fn kind(&self) -> InputKind {
        match self {
            Carrier::Image { .. } => InputKind::Image,
            Carrier::Document(_) => InputKind::Document,
            Carrier::PlainText(_) => InputKind::PlainText,
        }
    }
}

/// Summary of one processing run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingReport {
    pub input_kind: InputKind,
    pub original_text: String,
    pub corrected_text: String,
    pub corrections: Vec<Correction>,
    pub corrections_count: usize,
    /// Rectangles drawn or words wrapped in the marker
    pub highlights_count: usize,
    pub processing_time_seconds: f64,
}

impl ProcessingReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A highlighted carrier and its report
#[derive(Debug, Clone)]
pub struct Processed {
    pub carrier: Carrier,
    pub report: ProcessingReport,
    /// Rectangles drawn on an image carrier, empty for other carriers
    pub rects: Vec<Rect>,
}

impl Processed {
    /// Transportable form of the highlighted carrier: a PNG data URL, the
    /// compacted markup, or the corrected text
    pub fn output(&self) -> Result<String> {
        match &self.carrier {
            Carrier::Image { image, .. } => render::to_data_url(image),
            Carrier::Document(tree) => Ok(compact_html(&tree.to_html()?)),
            Carrier::PlainText(_) => Ok(self.report.corrected_text.clone()),
        }
    }
}

/// Correction pipeline bound to one model
pub struct Pipeline {
    engine: CorrectionEngine,
    model: Box<dyn CorrectionModel>,
}

impl Pipeline {
    pub fn new(config: CorrectionConfig, model: Box<dyn CorrectionModel>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            engine: CorrectionEngine::new(config),
            model,
        })
    }

    pub fn engine(&self) -> &CorrectionEngine {
        &self.engine
    }

    /// Extract, correct, identify and highlight
    pub fn process(&self, carrier: Carrier) -> Result<Processed> {
        let started = Instant::now();
        let input_kind = carrier.kind();
        let original_text = self.extract_text(&carrier);

        if original_text.trim().is_empty() {
            info!(?input_kind, "no text to correct");
            return Ok(Processed {
                carrier,
                report: ProcessingReport {
                    input_kind,
                    original_text: String::new(),
                    corrected_text: String::new(),
                    corrections: Vec::new(),
                    corrections_count: 0,
                    highlights_count: 0,
                    processing_time_seconds: started.elapsed().as_secs_f64(),
                },
                rects: Vec::new(),
            });
        }

        let corrected_text = self.model.correct(&original_text)?;
        debug!(model = self.model.name(), "corrected text");

        let corrections = self.engine.identify(&original_text, &corrected_text)?;
        let (carrier, rects, highlights_count) = self.project(carrier, &corrections);

        info!(
            ?input_kind,
            corrections = corrections.len(),
            highlights = highlights_count,
            "processed carrier"
        );

        Ok(Processed {
            carrier,
            report: ProcessingReport {
                input_kind,
                original_text,
                corrected_text,
                corrections_count: corrections.len(),
                corrections,
                highlights_count,
                processing_time_seconds: started.elapsed().as_secs_f64(),
            },
            rects,
        })
    }

    /// Text sent to the model: detection texts joined by a space, the
    /// document's content text, or the plain text itself
    pub fn extract_text(&self, carrier: &Carrier) -> String {
        match carrier {
            Carrier::Image { detections, .. } => detections
                .iter()
                .map(|d| d.text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
            Carrier::Document(tree) => tree.extract_text(&self.engine.config().skip_tags),
            Carrier::PlainText(text) => text.clone(),
        }
    }

    fn project(&self, carrier: Carrier, corrections: &[Correction]) -> (Carrier, Vec<Rect>, usize) {
        let config = self.engine.config();
        let tokenizer = self.engine.tokenizer();

        match carrier {
            Carrier::Image {
                mut image,
                detections,
            } => {
                let rects: Vec<Rect> = project_onto_image(
                    &detections,
                    corrections,
                    config.confidence_threshold,
                    tokenizer,
                )
                .into_iter()
                .map(|h| h.rect)
                .collect();
                render::draw_highlights(&mut image, &rects);
                let count = rects.len();
                (Carrier::Image { image, detections }, rects, count)
            }
            Carrier::Document(mut tree) => {
                let outcome = project_onto_tree(&mut tree, corrections, config, tokenizer);
                (Carrier::Document(tree), Vec::new(), outcome.highlighted_words)
            }
            Carrier::PlainText(text) => (Carrier::PlainText(text), Vec::new(), 0),
        }
    }
}
