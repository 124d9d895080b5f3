use crate::compare::ComparisonTable;
use anyhow::{Context, Result};
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Render the comparison as a standalone HTML document
pub fn render_html(table: &ComparisonTable) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Property Comparison</title>\n<style>\n\
         body { font-family: sans-serif; margin: 24px; }\n\
         table { border-collapse: collapse; width: 100%; }\n\
         th, td { border: 1px solid #ccc; padding: 6px 10px; text-align: left; }\n\
         th { background: #f3f4f6; }\n\
         </style>\n</head>\n<body>\n<h1>Property Comparison</h1>\n<table>\n",
    );

    html.push_str("<thead><tr><th>Feature</th>");
    for column in &table.columns {
        html.push_str(&format!("<th>{}</th>", escape(column)));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for row in &table.rows {
        html.push_str(&format!("<tr><th>{}</th>", escape(&row.label)));
        for value in &row.values {
            html.push_str(&format!("<td>{}</td>", escape(value)));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    html
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// File stem shared by the HTML, JSON and PDF exports of one comparison
pub fn export_stem(table: &ComparisonTable) -> String {
    let ids: Vec<String> = table.ids.iter().map(|id| id.to_string()).collect();
    format!("comparison-{}", ids.join("-"))
}

/// Prints comparison tables to PDF with headless Chrome
pub struct PdfExporter {
    browser: Browser,
    export_dir: PathBuf,
}

impl PdfExporter {
    pub fn new(export_dir: impl Into<PathBuf>) -> Result<Self> {
        info!("Launching headless Chrome...");

        let options = LaunchOptions::default_builder()
            .headless(true)
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;

        Ok(Self {
            browser,
            export_dir: export_dir.into(),
        })
    }

    /// Write `<export_dir>/comparison-<ids>.pdf` and return its path
    pub fn export(&self, table: &ComparisonTable) -> Result<PathBuf> {
        if table.is_empty() {
            anyhow::bail!("Nothing selected to export");
        }

        std::fs::create_dir_all(&self.export_dir)
            .with_context(|| format!("Failed to create {}", self.export_dir.display()))?;

        let stem = export_stem(table);
        let html_path = self.export_dir.join(format!("{}.html", stem));
        std::fs::write(&html_path, render_html(table))
            .with_context(|| format!("Failed to write {}", html_path.display()))?;

        let url = file_url(&html_path)?;
        debug!("Rendering {}", url);

        let tab = self.browser.new_tab()?;
        tab.navigate_to(&url)?;
        tab.wait_until_navigated()?;

        let pdf = tab
            .print_to_pdf(Some(PrintToPdfOptions {
                landscape: Some(true),
                print_background: Some(true),
                ..PrintToPdfOptions::default()
            }))
            .context("Failed to print comparison to PDF")?;

        let pdf_path = self.export_dir.join(format!("{}.pdf", stem));
        std::fs::write(&pdf_path, pdf)
            .with_context(|| format!("Failed to write {}", pdf_path.display()))?;

        info!("Saved comparison PDF to {}", pdf_path.display());
        Ok(pdf_path)
    }
}

fn file_url(path: &Path) -> Result<String> {
    let absolute = std::fs::canonicalize(path)
        .with_context(|| format!("Failed to resolve {}", path.display()))?;
    Ok(format!("file://{}", absolute.display()))
}
