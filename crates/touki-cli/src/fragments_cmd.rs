use std::path::Path;

use touki::{Document, Page, UnicodeNorm};

use crate::cli::OutputFormat;
use crate::shared::{ProgressReporter, csv_escape, open_document, resolve_pages, to_json_line};
use crate::text_cmd::log_warnings;

pub fn run(
    file: &Path,
    pages: Option<&str>,
    format: &OutputFormat,
    unicode_norm: Option<UnicodeNorm>,
) -> Result<(), i32> {
    let doc = open_document(file, unicode_norm)?;
    let page_indices = resolve_pages(pages, doc.page_count())?;
    let progress = ProgressReporter::new("page", page_indices.len());

    match format {
        OutputFormat::Text => println!("page\tx\ty\ttext"),
        OutputFormat::Csv => println!("page,x,y,text"),
        OutputFormat::Json => {}
    }

    for (i, &idx) in page_indices.iter().enumerate() {
        progress.report(i + 1);
        let page = read_page(&doc, idx)?;
        log_warnings(&page.warnings);

        match format {
            OutputFormat::Text => {
                for frag in &page.fragments {
                    println!("{}\t{:.3}\t{:.3}\t{}", idx + 1, frag.x, frag.y, frag.text);
                }
            }
            OutputFormat::Csv => {
                for frag in &page.fragments {
                    println!(
                        "{},{:.3},{:.3},{}",
                        idx + 1,
                        frag.x,
                        frag.y,
                        csv_escape(&frag.text)
                    );
                }
            }
            OutputFormat::Json => {
                let obj = serde_json::json!({
                    "page": idx + 1,
                    "width": page.width,
                    "height": page.height,
                    "fragments": page.fragments,
                });
                println!("{}", to_json_line(&obj)?);
            }
        }
    }

    progress.finish();
    Ok(())
}

fn read_page(doc: &Document, idx: usize) -> Result<Page, i32> {
    doc.page(idx).map_err(|e| {
        eprintln!("Error reading page {}: {e}", idx + 1);
        1
    })
}
