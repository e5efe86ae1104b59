use std::path::Path;

use touki::{ExtractWarning, UnicodeNorm};

use crate::cli::TextFormat;
use crate::shared::{open_document, to_json_line};

pub fn run(file: &Path, format: &TextFormat, unicode_norm: Option<UnicodeNorm>) -> Result<(), i32> {
    let doc = open_document(file, unicode_norm)?;
    let result = doc.text_with_warnings().map_err(|e| {
        eprintln!("Error: failed to extract text: {e}");
        1
    })?;
    log_warnings(&result.warnings);

    match format {
        TextFormat::Text => println!("{}", result.value),
        TextFormat::Json => {
            let obj = serde_json::json!({
                "file": file.display().to_string(),
                "pages": doc.page_count(),
                "text": result.value,
                "warnings": result.warnings,
            });
            println!("{}", to_json_line(&obj)?);
        }
    }
    Ok(())
}

/// Report extraction warnings through the log.
pub fn log_warnings(warnings: &[ExtractWarning]) {
    for warning in warnings {
        tracing::warn!(code = %warning.code, page = ?warning.page, "{}", warning.description);
    }
}
