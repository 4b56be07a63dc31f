//! Basic usage example of the proofmark library
//!
//! Set `RUST_LOG=proofmark_core=debug` to see the engine's tracing output.

use image::RgbImage;
use proofmark_core::{
    highlight_image, identify_corrections, Carrier, CorrectionConfig, CorrectionEngine, Detection,
    DocumentTree, HighlightMarker, JoinPolicy, Pipeline, Rect, Recognizer, RuleBasedCorrector,
};
use tracing_subscriber::EnvFilter;

const LINE: &str = "----------------------------------------";

fn main() -> proofmark_core::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Proofmark Examples ===\n");

    // Example 1: Identify corrections between two texts
    example_identify();

    // Example 2: Tokenizer join policy
    example_join_policy()?;

    // Example 3: Highlight rectangles on an image
    example_image()?;

    // Example 4: Full pipeline over a document
    example_document_pipeline()?;

    Ok(())
}

fn example_identify() {
    println!("Example 1: Identify Corrections");
    println!("{}", LINE);

    let original = "Their going too the park tomorow.";
    let corrected = "They're going to the park tomorrow.";

    println!("Original:  {}", original);
    println!("Corrected: {}", corrected);
    println!("\nCorrections:");
    for (i, correction) in identify_corrections(original, corrected, 2).iter().enumerate() {
        println!("  {}. {}", i + 1, correction);
    }
    println!("\n");
}

fn example_join_policy() -> proofmark_core::Result<()> {
    println!("Example 2: Join Policy");
    println!("{}", LINE);

    for policy in [JoinPolicy::Split, JoinPolicy::KeepInternal] {
        let engine = CorrectionEngine::new(
            CorrectionConfig::new()
                .with_context_words(1)
                .with_join_policy(policy),
        );
        let corrections = engine.identify("I dont know.", "I don't know.")?;
        println!("{:?}:", policy);
        for correction in &corrections {
            println!("  {}", correction);
        }
    }
    println!("\n");
    Ok(())
}

fn example_image() -> proofmark_core::Result<()> {
    println!("Example 3: Image Highlighting");
    println!("{}", LINE);

    let detections = vec![
        Detection::from_rect(Rect::new(10.0, 10.0, 150.0, 30.0), "This are wrong", 0.92),
        Detection::from_rect(Rect::new(10.0, 40.0, 150.0, 60.0), "they are blurry", 0.31),
    ];
    let text: Vec<&str> = detections.iter().map(|d| d.text.as_str()).collect();
    let corrections = identify_corrections(&text.join(" "), "This is wrong they are blurry", 3);

    for rect in highlight_image(Some(detections.as_slice()), &corrections, 0.5)? {
        println!(
            "  rect ({:.1}, {:.1}) - ({:.1}, {:.1})",
            rect.x1, rect.y1, rect.x2, rect.y2
        );
    }
    println!("\n");
    Ok(())
}

/// Recognizer returning canned detections
struct CannedRecognizer;

impl Recognizer for CannedRecognizer {
    fn recognize(&self, _image: &RgbImage) -> proofmark_core::Result<Vec<Detection>> {
        Ok(vec![Detection::from_rect(
            Rect::new(0.0, 0.0, 200.0, 24.0),
            "I recieve teh letter",
            0.88,
        )])
    }

    fn name(&self) -> &str {
        "canned"
    }
}

fn example_document_pipeline() -> proofmark_core::Result<()> {
    println!("Example 4: Pipeline");
    println!("{}", LINE);

    let config = CorrectionConfig::new().with_marker(HighlightMarker::new("mark").with_class("fix"));
    let pipeline = Pipeline::new(config, Box::new(RuleBasedCorrector::new()))?;

    let html = "<html>\n  <body>\n    <h1>Grammer notes</h1>\n    <p>We dont recieve mail.</p>\n  </body>\n</html>";
    let processed = pipeline.process(Carrier::Document(DocumentTree::parse_html(html)?))?;
    println!("Document output:\n  {}", processed.output()?);
    println!("Report:\n{}", processed.report.to_json()?);

    let image = Carrier::recognize(RgbImage::new(220, 32), &CannedRecognizer)?;
    let processed = pipeline.process(image)?;
    println!(
        "Image: {} corrections, {} rectangles drawn",
        processed.report.corrections_count,
        processed.rects.len()
    );
    Ok(())
}
