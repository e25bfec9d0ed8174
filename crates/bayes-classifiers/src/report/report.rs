//! Minimal HTML report builder: a titled page of sections holding maud
//! markup and embedded plotly figures.
use std::fs::File;
use std::io::Write;
use std::path::Path;

use maud::{html, Markup, PreEscaped, DOCTYPE};
use plotly::Plot;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";

const STYLE: &str = "
body { font-family: sans-serif; margin: 0 auto; max-width: 1100px; padding: 20px; color: #222; }
header { display: flex; align-items: center; gap: 16px; border-bottom: 2px solid #ddd; }
header img { height: 48px; }
section { margin-top: 28px; }
table { border-collapse: collapse; margin: 10px 0; }
th, td { border: 1px solid #ccc; padding: 4px 10px; text-align: right; }
th { background: #f2f2f2; }
.muted { color: #777; font-size: 0.9em; }
";

/// One titled block of a [`Report`].
#[derive(Debug, Clone)]
pub struct ReportSection {
    title: String,
    blocks: Vec<Markup>,
}

impl ReportSection {
    pub fn new(title: &str) -> Self {
        ReportSection {
            title: title.to_string(),
            blocks: Vec::new(),
        }
    }

    pub fn add_content(&mut self, content: Markup) {
        self.blocks.push(content);
    }

    /// Embed `plot` inline; the page loads plotly.js once in its head.
    pub fn add_plot(&mut self, plot: Plot) {
        let id = format!(
            "plot-{}-{}",
            self.title.to_lowercase().replace(' ', "-"),
            self.blocks.len()
        );
        self.blocks
            .push(html! { div class="plot" { (PreEscaped(plot.to_inline_html(Some(id.as_str())))) } });
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    fn render(&self) -> Markup {
        html! {
            section {
                h2 { (self.title) }
                @for block in &self.blocks {
                    (block)
                }
            }
        }
    }
}

/// A standalone HTML report.
#[derive(Debug, Clone)]
pub struct Report {
    software: String,
    version: String,
    logo: Option<String>,
    title: String,
    sections: Vec<ReportSection>,
}

impl Report {
    pub fn new(software: &str, version: &str, logo: Option<&str>, title: &str) -> Self {
        Report {
            software: software.to_string(),
            version: version.to_string(),
            logo: logo.map(str::to_string),
            title: title.to_string(),
            sections: Vec::new(),
        }
    }

    pub fn add_section(&mut self, section: ReportSection) {
        self.sections.push(section);
    }

    pub fn sections(&self) -> &[ReportSection] {
        &self.sections
    }

    pub fn render(&self) -> Markup {
        let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    title { (self.title) }
                    script src=(PLOTLY_CDN) {}
                    style { (PreEscaped(STYLE)) }
                }
                body {
                    header {
                        @if let Some(logo) = &self.logo {
                            img src=(logo) alt=(self.software);
                        }
                        div {
                            h1 { (self.title) }
                            p class="muted" {
                                (self.software) " v" (self.version) " | generated " (generated)
                            }
                        }
                    }
                    @for section in &self.sections {
                        (section.render())
                    }
                }
            }
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let mut file = File::create(path.as_ref())?;
        file.write_all(self.render().into_string().as_bytes())?;
        log::info!("Report saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_sections_in_order() {
        let mut report = Report::new("bayes", "0.1.0", None, "Evaluation");
        let mut first = ReportSection::new("Summary");
        first.add_content(html! { p { "accuracy 0.9" } });
        report.add_section(first);
        report.add_section(ReportSection::new("Folds"));

        let page = report.render().into_string();
        assert!(page.contains("<title>Evaluation</title>"));
        let summary = page.find("<h2>Summary</h2>").unwrap();
        let folds = page.find("<h2>Folds</h2>").unwrap();
        assert!(summary < folds);
        assert!(page.contains("accuracy 0.9"));
    }

    #[test]
    fn saves_html_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");
        Report::new("bayes", "0.1.0", None, "Empty").save_to_file(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("<!DOCTYPE html>"));
    }
}
