use minijinja::{context, Environment};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::model::{Bmi, PlanKind, RawForm};

// A numbered marker only counts at the start of a line and must not be followed
// by a digit, so "2.5 km" stays intact. Markdown emphasis around the marker
// ("**1.**") is swallowed with it; any other character after the dot belongs
// to the section.
static SECTION_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t*#]*\d+\.(\*+|[^\d]|$)").expect("invalid section marker pattern")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionLine {
    Bullet { text: String },
    Entry { title: String, body: Option<String> },
    Text { text: String },
}

impl SectionLine {
    fn parse(line: &str) -> Self {
        let cleaned = line.replace("**", "");
        let line = cleaned.trim();
        if let Some(rest) = line.strip_prefix('-') {
            return SectionLine::Bullet {
                text: rest.trim().to_string(),
            };
        }
        if let Some((title, rest)) = line.split_once(':') {
            let body = rest.trim();
            return SectionLine::Entry {
                title: title.trim().to_string(),
                body: (!body.is_empty()).then(|| body.to_string()),
            };
        }
        SectionLine::Text {
            text: line.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub lines: Vec<SectionLine>,
}

impl Section {
    fn parse(chunk: &str) -> Option<Self> {
        let lines: Vec<SectionLine> = chunk
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && *line != "**")
            .map(SectionLine::parse)
            .collect();
        (!lines.is_empty()).then_some(Self { lines })
    }
}

/// Splits upstream text on numbered-list markers, dropping blank sections.
pub fn split_sections(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut start = 0;

    for caps in SECTION_MARKER.captures_iter(text) {
        let Some(marker) = caps.get(0) else {
            continue;
        };
        let resume = match caps.get(1) {
            Some(tail) if tail.as_str().starts_with(|c: char| !c.is_whitespace() && c != '*') => {
                tail.start()
            }
            _ => marker.end(),
        };
        sections.extend(Section::parse(&text[start..marker.start()]));
        start = resume;
    }
    sections.extend(Section::parse(&text[start..]));
    sections
}

/// What the form handler shows after a submission.
#[derive(Debug, Clone)]
pub struct PlanReport {
    pub kind: PlanKind,
    pub name: String,
    pub bmi: Bmi,
    pub text: Option<String>,
}

impl PlanReport {
    pub fn title(&self) -> String {
        match self.kind {
            PlanKind::Exercise => format!("Personalized Exercise Plan for {}", self.name),
            PlanKind::Diet => format!("Healthy Diet Recommendation for {}", self.name),
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self.kind {
            PlanKind::Exercise => "No exercise plan available.",
            PlanKind::Diet => "No recommendation available.",
        }
    }

    pub fn sections(&self) -> Option<Vec<Section>> {
        self.text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .map(split_sections)
    }

    pub fn to_text(&self) -> String {
        let Some(sections) = self.sections() else {
            return self.empty_message().to_string();
        };

        let mut out = String::new();
        out.push_str(&self.title());
        out.push('\n');
        out.push_str(&format!(
            "Your BMI: {} ({})\n",
            self.bmi,
            self.bmi.category()
        ));

        for section in &sections {
            out.push('\n');
            for line in &section.lines {
                match line {
                    SectionLine::Bullet { text } => {
                        out.push_str("  - ");
                        out.push_str(text);
                    }
                    SectionLine::Entry { title, body } => {
                        out.push_str(title);
                        out.push(':');
                        if let Some(body) = body {
                            out.push_str("\n  ");
                            out.push_str(body);
                        }
                    }
                    SectionLine::Text { text } => {
                        out.push_str("  ");
                        out.push_str(text);
                    }
                }
                out.push('\n');
            }
        }
        out
    }
}

macro_rules! page_file {
    ($name:literal) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/", $name))
    };
}

static PAGES: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_template("base.html", page_file!("base.html"))
        .expect("invalid base template");
    env.add_template("index.html", page_file!("index.html"))
        .expect("invalid index template");
    env.add_template("plan.html", page_file!("plan.html"))
        .expect("invalid plan template");
    env
});

/// The input form, optionally with a message shown above it.
pub fn form_page(form: &RawForm, message: Option<&str>) -> Result<String, minijinja::Error> {
    PAGES.get_template("index.html")?.render(context! {
        form => form,
        message => message,
    })
}

pub fn plan_page(report: &PlanReport) -> Result<String, minijinja::Error> {
    PAGES.get_template("plan.html")?.render(context! {
        title => report.title(),
        bmi => report.bmi.to_string(),
        category => report.bmi.category().label(),
        sections => report.sections(),
        empty_message => report.empty_message(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(text: Option<&str>) -> PlanReport {
        PlanReport {
            kind: PlanKind::Exercise,
            name: "Kim".into(),
            bmi: Bmi::from_metric(70.0, 175.0),
            text: text.map(str::to_string),
        }
    }

    #[test]
    fn splits_numbered_sections_into_heading_and_body() {
        let sections = split_sections("1. Warm-up: stretch\n2. Cardio: run");
        assert_eq!(
            sections,
            vec![
                Section {
                    lines: vec![SectionLine::Entry {
                        title: "Warm-up".into(),
                        body: Some("stretch".into()),
                    }],
                },
                Section {
                    lines: vec![SectionLine::Entry {
                        title: "Cardio".into(),
                        body: Some("run".into()),
                    }],
                },
            ]
        );
    }

    #[test]
    fn markers_without_space_still_split() {
        let expected = vec![
            Section {
                lines: vec![SectionLine::Entry {
                    title: "Warm-up".into(),
                    body: Some("stretch".into()),
                }],
            },
            Section {
                lines: vec![SectionLine::Entry {
                    title: "Cardio".into(),
                    body: Some("run".into()),
                }],
            },
        ];
        assert_eq!(split_sections("1.Warm-up: stretch\n2.Cardio: run"), expected);
        assert_eq!(
            split_sections("1.**Warm-up:** stretch\n2.**Cardio:** run"),
            expected
        );
    }

    #[test]
    fn line_leading_decimal_is_not_a_marker() {
        let sections = split_sections("1. Intervals:\n2.5 km easy\n10.25 km long");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].lines.len(), 3);
    }

    #[test]
    fn decimals_do_not_split() {
        let sections = split_sections("1. Cardio: jog 2.5 km\n- then walk 1.5 km\n2. Cooldown");
        assert_eq!(sections.len(), 2);
        assert_eq!(
            sections[0].lines[1],
            SectionLine::Bullet {
                text: "then walk 1.5 km".into()
            }
        );
    }

    #[test]
    fn preamble_and_markdown_are_handled() {
        let text = "Here is your plan\n\n**1. Strength:** squats\n\n2.   \n3. Rest";
        let sections = split_sections(text);
        assert_eq!(sections.len(), 3);
        assert_eq!(
            sections[0].lines[0],
            SectionLine::Text {
                text: "Here is your plan".into()
            }
        );
        assert_eq!(
            sections[1].lines[0],
            SectionLine::Entry {
                title: "Strength".into(),
                body: Some("squats".into()),
            }
        );
        assert_eq!(
            sections[2].lines[0],
            SectionLine::Text {
                text: "Rest".into()
            }
        );
    }

    #[test]
    fn colon_body_keeps_later_colons() {
        assert_eq!(
            SectionLine::parse("Schedule: Mon: legs"),
            SectionLine::Entry {
                title: "Schedule".into(),
                body: Some("Mon: legs".into()),
            }
        );
        assert_eq!(
            SectionLine::parse("Notes:"),
            SectionLine::Entry {
                title: "Notes".into(),
                body: None,
            }
        );
    }

    #[test]
    fn plan_page_renders_sections() {
        let html = plan_page(&report(Some("1. Warm-up: stretch\n2. Cardio: run"))).unwrap();
        assert!(html.contains("Personalized Exercise Plan for Kim"));
        assert!(html.contains("22.86"));
        assert!(html.contains("Normal Weight"));
        assert_eq!(html.matches("class=\"recommendation-section\"").count(), 2);
        assert!(html.contains("<h4>Warm-up:</h4>"));
        assert!(html.contains("<p>stretch</p>"));
    }

    #[test]
    fn plan_page_escapes_upstream_text() {
        let html = plan_page(&report(Some("1. <script>alert(1)</script>"))).unwrap();
        assert!(!html.contains("<script>alert(1)"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn missing_text_shows_empty_message() {
        let r = report(None);
        assert_eq!(r.to_text(), "No exercise plan available.");
        assert!(plan_page(&r).unwrap().contains("No exercise plan available."));
    }

    #[test]
    fn text_report_lists_sections() {
        let text = report(Some("1. Warm-up: stretch\n- arms\n2. Cardio: run")).to_text();
        assert!(text.starts_with(
            "Personalized Exercise Plan for Kim\nYour BMI: 22.86 (Normal Weight)\n"
        ));
        assert!(text.contains("Warm-up:\n  stretch\n  - arms\n"));
        assert!(text.contains("Cardio:\n  run\n"));
    }

    #[test]
    fn form_page_keeps_values_and_message() {
        let form = RawForm {
            name: "Kim".into(),
            gender: "female".into(),
            ..RawForm::default()
        };
        let html = form_page(&form, Some("Please fill in all fields")).unwrap();
        assert!(html.contains("Please fill in all fields"));
        assert!(html.contains("value=\"Kim\""));
        assert!(html.contains("<option value=\"female\" selected>"));
    }
}
